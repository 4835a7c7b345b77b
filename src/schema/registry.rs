//! Canonical HCC field declarations.

use std::sync::OnceLock;

use super::domain::{FieldSpec, NumericRange, Schema};

/// Canonical field order; raw rows are parsed positionally against it.
pub const FIELD_ORDER: [&str; 49] = [
    "Gender", "Symptoms", "Alcohol", "HBsAg", "HBeAg", "HBcAb", "HCVAb", "Cirrhosis", "Endemic",
    "Smoking", "Diabetes", "Obesity", "Hemochro", "AHT", "CRI", "HIV", "NASH", "Varices", "Spleno",
    "PHT", "PVT", "Metastasis", "Hallmark", "Age", "Grams_day", "Packs_year", "PS",
    "Encephalopathy", "Ascites", "INR", "AFP", "Hemoglobin", "MCV", "Leucocytes", "Platelets",
    "Albumin", "Total_Bil", "ALT", "AST", "GGT", "ALP", "TP", "Creatinine", "Nodules", "Major_Dim",
    "Dir_Bil", "Iron", "Sat", "Ferritin",
];

/// Fields whose values come from a fixed option set.
const CATEGORICAL: [&str; 26] = [
    "Gender", "Symptoms", "Alcohol", "HBsAg", "HBeAg", "HBcAb", "HCVAb", "Cirrhosis", "Endemic",
    "Smoking", "Diabetes", "Obesity", "Hemochro", "AHT", "CRI", "HIV", "NASH", "Varices", "Spleno",
    "PHT", "PVT", "Metastasis", "Hallmark", "PS", "Encephalopathy", "Ascites",
];

/// Declared inclusive ranges, derived once from the training cohort.
const RANGES: [(&str, f64, f64); 22] = [
    ("AFP", 0.0, 2624.0),
    ("Hemoglobin", 6.23, 19.869999999999997),
    ("MCV", 71.91, 118.99000000000001),
    ("Leucocytes", 0.0, 111.75),
    ("Platelets", 0.0, 458541.0),
    ("Albumin", 1.5700000000000003, 5.529999999999999),
    ("Total_Bil", 0.0, 6.8074312500000005),
    ("ALT", 0.0, 155.2),
    ("AST", 0.0, 211.7),
    ("GGT", 0.0, 769.7),
    ("ALP", 0.0, 516.7),
    ("TP", 4.190000000000001, 9.91),
    ("Creatinine", 0.0009493670886076, 1.836139240506329),
    ("Nodules", 0.0, 11.8),
    ("Major_Dim", 0.0, 17.85),
    ("Dir_Bil", 0.0, 4.361000000000001),
    ("Iron", 69.7, 109.3),
    ("Sat", 20.0, 64.0),
    ("Ferritin", 91.19999999999999, 988.8),
    ("Grams_day", 0.0, 270.0),
    ("Packs_year", 0.0, 54.0),
    ("INR", 0.5849999999999999, 2.125),
];

fn options_for(field: &str) -> &'static [&'static str] {
    match field {
        "Gender" => &["Male", "Female"],
        "Alcohol" | "Cirrhosis" => &["Yes", "No"],
        "PS" => &["Active", "Selfcare", "Ambulatory", "Disabled"],
        "Encephalopathy" => &["Grade I/II", "Grade III/IV", "None"],
        "Ascites" => &["Mild", "Moderate/Severe", "None"],
        _ => &["Yes", "No", "?"],
    }
}

fn range_for(field: &str) -> Option<NumericRange> {
    RANGES
        .iter()
        .find(|(name, _, _)| *name == field)
        .map(|&(_, min, max)| NumericRange::new(min, max))
}

fn build() -> Schema {
    let fields = FIELD_ORDER
        .iter()
        .map(|&name| {
            if CATEGORICAL.contains(&name) {
                FieldSpec::categorical(name, options_for(name).iter().copied())
            } else {
                FieldSpec::numeric(name, range_for(name))
            }
        })
        .collect();
    Schema::from_declared(fields)
}

/// The canonical HCC schema, built on first use.
pub fn hcc() -> &'static Schema {
    static SCHEMA: OnceLock<Schema> = OnceLock::new();
    SCHEMA.get_or_init(build)
}
