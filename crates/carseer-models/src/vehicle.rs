use serde::{Deserialize, Deserializer, Serialize};

/// Reported vehicle condition.
///
/// Free text that does not name one of the four grades is kept verbatim as
/// `Unknown` so it can be echoed back; it prices as neutral.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Condition {
    Excellent,
    #[default]
    Good,
    Fair,
    Poor,
    Unknown(String),
}

impl Condition {
    pub fn as_str(&self) -> &str {
        match self {
            Condition::Excellent => "Excellent",
            Condition::Good => "Good",
            Condition::Fair => "Fair",
            Condition::Poor => "Poor",
            Condition::Unknown(raw) => raw,
        }
    }
}

impl From<String> for Condition {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "excellent" => Condition::Excellent,
            "good" => Condition::Good,
            "fair" => Condition::Fair,
            "poor" => Condition::Poor,
            _ => Condition::Unknown(raw),
        }
    }
}

impl From<&str> for Condition {
    fn from(raw: &str) -> Self {
        Condition::from(raw.to_string())
    }
}

impl From<Condition> for String {
    fn from(condition: Condition) -> Self {
        condition.as_str().to_string()
    }
}

/// The vehicle being valued. Sole input to the valuation engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VehicleQuery {
    pub make: String,
    pub model: String,
    /// Model year.
    pub year: i32,
    #[serde(default)]
    pub trim: Option<String>,
    /// Odometer reading in miles. None or zero = not reported.
    #[serde(default)]
    pub mileage: Option<f64>,
    /// Defaults to Good when omitted or null.
    #[serde(default, deserialize_with = "condition_or_default")]
    pub condition: Condition,
    #[serde(default)]
    pub zip_code: Option<String>,
}

fn condition_or_default<'de, D>(deserializer: D) -> Result<Condition, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.map(Condition::from).unwrap_or_default())
}

impl VehicleQuery {
    pub fn new(make: impl Into<String>, model: impl Into<String>, year: i32) -> Self {
        Self {
            make: make.into(),
            model: model.into(),
            year,
            trim: None,
            mileage: None,
            condition: Condition::Good,
            zip_code: None,
        }
    }

    pub fn with_trim(mut self, trim: impl Into<String>) -> Self {
        self.trim = Some(trim.into());
        self
    }

    pub fn with_mileage(mut self, mileage: f64) -> Self {
        self.mileage = Some(mileage);
        self
    }

    pub fn with_condition(mut self, condition: impl Into<Condition>) -> Self {
        self.condition = condition.into();
        self
    }

    pub fn with_zip_code(mut self, zip_code: impl Into<String>) -> Self {
        self.zip_code = Some(zip_code.into());
        self
    }

    /// Trim text, or "" when none was given.
    pub fn trim_str(&self) -> &str {
        self.trim.as_deref().unwrap_or("")
    }
}
