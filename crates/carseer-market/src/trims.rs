//! Static trim lists offered to the trim picker.

use std::collections::BTreeSet;

use carseer_models::Segment;

/// Offered for every vehicle.
pub const BASIC_TRIMS: &[&str] = &["Base", "Sport", "Premium", "Limited"];

pub fn segment_trims(segment: Segment) -> &'static [&'static str] {
    match segment {
        Segment::Luxury => &["Base", "Sport", "Premium", "Executive", "AMG", "M", "RS"],
        Segment::SuperLuxury => &["Base", "Extended", "Black Badge", "Mulliner", "First Edition"],
        Segment::Exotic => &["Base", "Sport", "Performance", "Competition", "Spyder"],
        Segment::Premium => &["Base", "Premium", "F-Sport", "Sport", "Turbo"],
        Segment::Mainstream => &["L", "LE", "SE", "XLE", "Sport", "Limited"],
    }
}

pub fn make_trims(make: &str) -> &'static [&'static str] {
    match make {
        "Mercedes-Benz" => &["Base", "AMG", "AMG Line", "Maybach"],
        "BMW" => &["Base", "M Sport", "M", "M Competition"],
        "Audi" => &["Base", "Premium", "Premium Plus", "Prestige", "S", "RS"],
        "Porsche" => &["Base", "S", "GTS", "Turbo", "Turbo S"],
        "Ferrari" => &["Base", "Pista", "Speciale"],
        "Lamborghini" => &["Base", "Performante", "STO", "SVJ"],
        "Toyota" => &["L", "LE", "XLE", "SE", "XSE", "TRD"],
        "Honda" => &["LX", "Sport", "EX", "EX-L", "Touring"],
        "Ford" => &["XL", "XLT", "Lariat", "Limited", "Platinum"],
        _ => &[],
    }
}

pub fn model_trims(make: &str, model: &str) -> &'static [&'static str] {
    match (make, model) {
        ("Porsche", "911") => &["Carrera", "Carrera S", "Carrera 4S", "GT3", "GT3 RS", "Turbo S"],
        ("Honda", "Civic") => &["LX", "Sport", "EX", "Touring", "Si", "Type R"],
        ("Toyota", "Camry") => &["LE", "SE", "XLE", "XSE", "TRD"],
        ("Tesla", "Model S") => &["Long Range", "Plaid"],
        ("Tesla", "Model 3") => &["Standard Range", "Long Range", "Performance"],
        ("BMW", "3 Series") => &["330i", "330e", "M340i"],
        ("Mercedes-Benz", "C-Class") => &["C 300", "AMG C 43", "AMG C 63"],
        _ => &[],
    }
}

/// Basic, segment, make, and model trims for a vehicle, unmerged.
pub fn static_trims(segment: Segment, make: &str, model: &str) -> Vec<String> {
    BASIC_TRIMS
        .iter()
        .chain(segment_trims(segment))
        .chain(make_trims(make))
        .chain(model_trims(make, model))
        .map(|trim| trim.to_string())
        .collect()
}

/// Deduplicate and order trim names: "Base" first, the rest sorted.
///
/// Names are whitespace-trimmed and blanks dropped. Any casing of "base"
/// collapses into the single leading "Base".
pub fn merge_trims(trims: impl IntoIterator<Item = String>) -> Vec<String> {
    let rest: BTreeSet<String> = trims
        .into_iter()
        .map(|trim| trim.trim().to_string())
        .filter(|trim| !trim.is_empty() && !trim.eq_ignore_ascii_case("base"))
        .collect();

    std::iter::once("Base".to_string()).chain(rest).collect()
}
