//! Built-in pricing tables.

use std::collections::BTreeMap;

use carseer_models::Segment;

use crate::adjustments::{ConditionTable, TrimAdjustment};
use crate::catalog::MakeTable;
use crate::policy::{DepreciationPolicy, SegmentPolicy};

type Models = &'static [(&'static str, f64)];

const CATALOG: &[(Segment, &[(&str, Models)])] = &[
    (
        Segment::Luxury,
        &[
            (
                "Mercedes-Benz",
                &[
                    ("S-Class", 95_000.0),
                    ("E-Class", 65_000.0),
                    ("C-Class", 45_000.0),
                    ("G-Class", 130_000.0),
                    ("SLS AMG", 250_000.0),
                    ("AMG GT", 120_000.0),
                ],
            ),
            (
                "BMW",
                &[
                    ("7 Series", 85_000.0),
                    ("5 Series", 55_000.0),
                    ("3 Series", 45_000.0),
                    ("X7", 75_000.0),
                    ("M8", 130_000.0),
                ],
            ),
            (
                "Audi",
                &[
                    ("A8", 85_000.0),
                    ("A6", 55_000.0),
                    ("A4", 45_000.0),
                    ("Q7", 65_000.0),
                    ("RS e-tron GT", 140_000.0),
                ],
            ),
        ],
    ),
    (
        Segment::SuperLuxury,
        &[
            (
                "Rolls-Royce",
                &[
                    ("Phantom", 450_000.0),
                    ("Ghost", 350_000.0),
                    ("Cullinan", 400_000.0),
                ],
            ),
            (
                "Bentley",
                &[
                    ("Continental GT", 200_000.0),
                    ("Flying Spur", 250_000.0),
                    ("Bentayga", 180_000.0),
                ],
            ),
            (
                "Aston Martin",
                &[
                    ("DB11", 200_000.0),
                    ("Vantage", 150_000.0),
                    ("DBX", 180_000.0),
                ],
            ),
        ],
    ),
    (
        Segment::Exotic,
        &[
            (
                "Ferrari",
                &[("F8", 280_000.0), ("SF90", 520_000.0), ("812", 340_000.0)],
            ),
            (
                "Lamborghini",
                &[
                    ("Huracan", 210_000.0),
                    ("Aventador", 420_000.0),
                    ("Urus", 230_000.0),
                ],
            ),
            (
                "McLaren",
                &[
                    ("720S", 300_000.0),
                    ("GT", 200_000.0),
                    ("Artura", 225_000.0),
                ],
            ),
        ],
    ),
    (
        Segment::Premium,
        &[
            (
                "Lexus",
                &[("LS", 75_000.0), ("ES", 45_000.0), ("RX", 55_000.0)],
            ),
            (
                "Porsche",
                &[
                    ("911", 110_000.0),
                    ("Cayenne", 75_000.0),
                    ("Panamera", 90_000.0),
                ],
            ),
            (
                "Tesla",
                &[
                    ("Model S", 90_000.0),
                    ("Model 3", 45_000.0),
                    ("Model X", 100_000.0),
                ],
            ),
        ],
    ),
    (
        Segment::Mainstream,
        &[
            (
                "Toyota",
                &[
                    ("Camry", 27_000.0),
                    ("Corolla", 22_000.0),
                    ("RAV4", 28_000.0),
                ],
            ),
            (
                "Honda",
                &[
                    ("Accord", 27_000.0),
                    ("Civic", 23_000.0),
                    ("CR-V", 28_000.0),
                ],
            ),
            (
                "Ford",
                &[
                    ("F-150", 35_000.0),
                    ("Mustang", 30_000.0),
                    ("Explorer", 35_000.0),
                ],
            ),
        ],
    ),
];

/// (segment, fallback base, rate, floor, mileage threshold, mileage impact, range fraction)
const SEGMENT_ROWS: &[(Segment, f64, f64, f64, f64, f64, f64)] = &[
    (Segment::Luxury, 60_000.0, 0.10, 0.20, 100_000.0, 0.5, 0.15),
    (Segment::SuperLuxury, 200_000.0, 0.08, 0.30, 50_000.0, 0.6, 0.20),
    (Segment::Exotic, 250_000.0, 0.07, 0.40, 30_000.0, 0.7, 0.20),
    (Segment::Premium, 50_000.0, 0.11, 0.15, 120_000.0, 0.4, 0.12),
    (Segment::Mainstream, 25_000.0, 0.12, 0.10, 150_000.0, 0.3, 0.10),
];

const TRIMS: &[(&str, f64)] = &[
    // Performance
    ("AMG", 1.5),
    ("M", 1.5),
    ("RS", 1.4),
    ("F", 1.3),
    ("Type R", 1.3),
    ("GT", 1.4),
    ("Sport", 1.1),
    // Luxury
    ("Premium", 1.2),
    ("Luxury", 1.25),
    ("Executive", 1.3),
    ("Maybach", 2.0),
    // Base
    ("Base", 1.0),
    ("Standard", 1.0),
    ("L", 1.0),
    // Special editions
    ("Black Series", 2.0),
    ("Competition", 1.6),
    ("Limited", 1.15),
];

pub fn catalog_prices() -> BTreeMap<Segment, MakeTable> {
    CATALOG
        .iter()
        .map(|(segment, makes)| {
            let makes = makes
                .iter()
                .map(|(make, models)| {
                    let models = models
                        .iter()
                        .map(|(model, price)| (model.to_string(), *price))
                        .collect();
                    (make.to_string(), models)
                })
                .collect();
            (*segment, makes)
        })
        .collect()
}

pub fn fallback_prices() -> BTreeMap<Segment, f64> {
    SEGMENT_ROWS
        .iter()
        .map(|(segment, fallback, ..)| (*segment, *fallback))
        .collect()
}

pub fn segment_policies() -> BTreeMap<Segment, SegmentPolicy> {
    SEGMENT_ROWS
        .iter()
        .map(|&(segment, _, rate, floor_fraction, threshold, impact, range)| {
            let policy = SegmentPolicy {
                depreciation: DepreciationPolicy {
                    rate,
                    floor_fraction,
                },
                mileage_threshold: threshold,
                mileage_impact: impact,
                range_fraction: range,
            };
            (segment, policy)
        })
        .collect()
}

pub fn trim_adjustments() -> Vec<TrimAdjustment> {
    TRIMS
        .iter()
        .map(|(name, multiplier)| TrimAdjustment {
            name: name.to_string(),
            multiplier: *multiplier,
        })
        .collect()
}

pub fn conditions() -> ConditionTable {
    ConditionTable::default()
}
