use carseer_models::Condition;
use serde::{Deserialize, Serialize};

use crate::error::PricingError;

/// A named trim level and its value multiplier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrimAdjustment {
    pub name: String,
    pub multiplier: f64,
}

/// Ordered trim multipliers. Order is the tie-break for equally good matches.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct AdjustmentTable {
    entries: Vec<TrimAdjustment>,
}

impl AdjustmentTable {
    pub fn new(entries: Vec<TrimAdjustment>) -> Result<Self, PricingError> {
        let table = Self { entries };
        table.validate()?;
        Ok(table)
    }

    pub(crate) fn from_parts(entries: Vec<TrimAdjustment>) -> Self {
        Self { entries }
    }

    pub fn validate(&self) -> Result<(), PricingError> {
        for entry in &self.entries {
            if entry.name.trim().is_empty() {
                return Err(PricingError::InvalidTable(
                    "trim adjustment with empty name".to_string(),
                ));
            }
            if !entry.multiplier.is_finite() || entry.multiplier <= 0.0 {
                return Err(PricingError::InvalidTable(format!(
                    "trim {} has non-positive multiplier {}",
                    entry.name, entry.multiplier
                )));
            }
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.multiplier)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrimAdjustment> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a AdjustmentTable {
    type Item = &'a TrimAdjustment;
    type IntoIter = std::slice::Iter<'a, TrimAdjustment>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Multipliers for the four condition grades. Unknown conditions price at 1.0.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct ConditionTable {
    pub excellent: f64,
    pub good: f64,
    pub fair: f64,
    pub poor: f64,
}

impl Default for ConditionTable {
    fn default() -> Self {
        Self {
            excellent: 1.1,
            good: 1.0,
            fair: 0.8,
            poor: 0.6,
        }
    }
}

impl ConditionTable {
    pub fn multiplier(&self, condition: &Condition) -> f64 {
        match condition {
            Condition::Excellent => self.excellent,
            Condition::Good => self.good,
            Condition::Fair => self.fair,
            Condition::Poor => self.poor,
            Condition::Unknown(_) => 1.0,
        }
    }

    pub fn validate(&self) -> Result<(), PricingError> {
        let all = [self.excellent, self.good, self.fair, self.poor];
        if all.iter().all(|m| m.is_finite() && *m > 0.0) {
            Ok(())
        } else {
            Err(PricingError::InvalidTable(
                "condition multipliers must be positive".to_string(),
            ))
        }
    }
}
