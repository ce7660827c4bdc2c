//! Built-in location and condition catalogs.
//!
//! Earlier revisions kept these as free-form string dictionaries mutated at
//! runtime; they are now static enumerated tables, built once and validated
//! at load time. Countries map to timezones and regions, and each country
//! carries a condition -> suggested-medicines table.

use crate::types::*;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog_internal);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

/// A supported country with its timezones and selectable regions.
///
/// When a country spans several timezones, the region at index `i` resolves
/// to the timezone at index `i`; single-timezone countries resolve without a
/// region choice.
#[derive(Clone, Debug)]
pub struct Country {
    pub name: String,
    pub timezones: Vec<String>,
    pub regions: Vec<String>,
}

/// The complete catalog of countries and per-country condition tables
#[derive(Clone, Debug)]
pub struct Catalog {
    pub countries: HashMap<String, Country>,
    /// country -> condition -> suggested medicines
    pub conditions: HashMap<String, HashMap<String, Vec<String>>>,
}

/// Builds the default catalog of countries and condition tables
///
/// **Note**: For production use, prefer `get_default_catalog()` which returns
/// a cached reference. This function is retained for testing and custom
/// catalog creation.
pub fn build_default_catalog() -> Catalog {
    build_default_catalog_internal()
}

fn country(name: &str, timezones: &[&str], regions: &[&str]) -> (String, Country) {
    (
        name.to_string(),
        Country {
            name: name.to_string(),
            timezones: timezones.iter().map(|s| s.to_string()).collect(),
            regions: regions.iter().map(|s| s.to_string()).collect(),
        },
    )
}

fn condition_set(entries: &[(&str, &[&str])]) -> HashMap<String, Vec<String>> {
    entries
        .iter()
        .map(|(condition, medicines)| {
            (
                condition.to_string(),
                medicines.iter().map(|m| m.to_string()).collect(),
            )
        })
        .collect()
}

fn india_conditions() -> HashMap<String, Vec<String>> {
    condition_set(&[
        (
            "Hypertension",
            &["Amlodipine 5mg", "Telmisartan 40mg", "Atenolol 50mg"],
        ),
        (
            "Diabetes Type 2",
            &["Metformin 500mg", "Glimepiride 1mg", "Sitagliptin 50mg"],
        ),
        (
            "Hypothyroidism",
            &["Thyroxine 50mcg", "Levothyroxine 100mcg"],
        ),
        (
            "Asthma",
            &["Salbutamol Inhaler", "Budesonide", "Montelukast"],
        ),
        (
            "COPD",
            &["Tiotropium Inhaler", "Formoterol", "N-Acetylcysteine"],
        ),
        (
            "Heart Disease",
            &["Aspirin 75mg", "Atorvastatin 10mg", "Metoprolol 25mg"],
        ),
        (
            "Arthritis",
            &["Diclofenac 50mg", "Paracetamol 500mg", "Hydroxychloroquine"],
        ),
        ("Depression", &["Escitalopram 10mg", "Sertraline 50mg"]),
        ("Anxiety", &["Alprazolam 0.5mg", "Propranolol 20mg"]),
        (
            "Migraine",
            &["Sumatriptan 50mg", "Propranolol 40mg", "Topiramate 25mg"],
        ),
    ])
}

fn us_conditions() -> HashMap<String, Vec<String>> {
    condition_set(&[
        (
            "Hypertension",
            &["Lisinopril 10mg", "Amlodipine 5mg", "Losartan 50mg"],
        ),
        (
            "Diabetes Type 2",
            &["Metformin 500mg", "Insulin Glargine", "Sitagliptin 100mg"],
        ),
        ("Hypothyroidism", &["Levothyroxine 50mcg", "Synthroid 75mcg"]),
        (
            "Asthma",
            &["Albuterol Inhaler", "Fluticasone 250mcg", "Montelukast 10mg"],
        ),
        ("COPD", &["Tiotropium Respimat", "Albuterol", "Prednisone"]),
        (
            "Heart Disease",
            &["Aspirin 81mg", "Atorvastatin 20mg", "Metoprolol 50mg"],
        ),
        (
            "Arthritis",
            &["Ibuprofen 400mg", "Naproxen 500mg", "Methotrexate"],
        ),
        (
            "Depression",
            &["Sertraline 50mg", "Fluoxetine 20mg", "Bupropion XL"],
        ),
        ("Anxiety", &["Buspirone 10mg", "Hydroxyzine 25mg"]),
        (
            "Migraine",
            &["Sumatriptan 100mg", "Rizatriptan 10mg", "Topiramate 50mg"],
        ),
    ])
}

fn build_default_catalog_internal() -> Catalog {
    let countries: HashMap<String, Country> = [
        country("India", &["Asia/Kolkata"], &["All India"]),
        country(
            "United States",
            &[
                "America/New_York",
                "America/Chicago",
                "America/Denver",
                "America/Los_Angeles",
            ],
            &[
                "Eastern (NY, FL)",
                "Central (TX, IL)",
                "Mountain (CO, AZ)",
                "Pacific (CA, WA)",
            ],
        ),
        country("United Kingdom", &["Europe/London"], &["All UK"]),
        country(
            "Australia",
            &[
                "Australia/Sydney",
                "Australia/Melbourne",
                "Australia/Brisbane",
                "Australia/Perth",
            ],
            &[
                "New South Wales",
                "Victoria",
                "Queensland",
                "Western Australia",
            ],
        ),
        country(
            "Canada",
            &["America/Toronto", "America/Vancouver", "America/Edmonton"],
            &["Ontario/Quebec", "British Columbia", "Alberta"],
        ),
        country("Germany", &["Europe/Berlin"], &["All Germany"]),
        country("France", &["Europe/Paris"], &["All France"]),
        country("Japan", &["Asia/Tokyo"], &["All Japan"]),
        country("China", &["Asia/Shanghai"], &["All China"]),
        country(
            "Brazil",
            &["America/Sao_Paulo", "America/Manaus"],
            &["Southeast", "North"],
        ),
        country("Spain", &["Europe/Madrid"], &["All Spain"]),
        country("Italy", &["Europe/Rome"], &["All Italy"]),
    ]
    .into_iter()
    .collect();

    let india = india_conditions();
    let us = us_conditions();

    let mut conditions = HashMap::new();
    conditions.insert("India".to_string(), india.clone());
    conditions.insert("United States".to_string(), us.clone());
    for name in ["United Kingdom", "Germany", "France", "Spain", "Italy", "Australia", "Canada"] {
        conditions.insert(name.to_string(), us.clone());
    }
    for name in ["Japan", "China", "Brazil"] {
        conditions.insert(name.to_string(), india.clone());
    }

    Catalog {
        countries,
        conditions,
    }
}

impl Catalog {
    /// Country names in stable alphabetical order, for menus
    pub fn country_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.countries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Resolve the timezone for a country and region index.
    ///
    /// Single-timezone countries ignore the region index.
    pub fn timezone_for(&self, country: &str, region_index: usize) -> Option<&str> {
        let info = self.countries.get(country)?;
        if info.timezones.len() == 1 {
            info.timezones.first().map(String::as_str)
        } else {
            info.timezones.get(region_index).map(String::as_str)
        }
    }

    /// Condition names for a country, in stable alphabetical order
    pub fn conditions_for(&self, country: &str) -> Option<Vec<&str>> {
        let table = self.conditions.get(country)?;
        let mut names: Vec<&str> = table.keys().map(String::as_str).collect();
        names.sort_unstable();
        Some(names)
    }

    /// Suggested medicines for a condition in a country
    pub fn medicines_for(&self, country: &str, condition: &str) -> Option<&[String]> {
        self.conditions
            .get(country)?
            .get(condition)
            .map(Vec::as_slice)
    }

    /// Validate the catalog for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (name, info) in &self.countries {
            if name.is_empty() || info.name.is_empty() {
                errors.push("Country has empty name".to_string());
            }
            if name != &info.name {
                errors.push(format!(
                    "Country key '{}' doesn't match country.name '{}'",
                    name, info.name
                ));
            }
            if info.timezones.is_empty() {
                errors.push(format!("Country '{}' has no timezones", name));
            }
            // The region list indexes into the timezone list
            if info.timezones.len() > 1 && info.regions.len() != info.timezones.len() {
                errors.push(format!(
                    "Country '{}' has {} regions for {} timezones",
                    name,
                    info.regions.len(),
                    info.timezones.len()
                ));
            }

            match self.conditions.get(name) {
                None => errors.push(format!("Country '{}' has no condition table", name)),
                Some(table) => {
                    if table.is_empty() {
                        errors.push(format!("Country '{}' has an empty condition table", name));
                    }
                    for (condition, medicines) in table {
                        if medicines.is_empty() {
                            errors.push(format!(
                                "Condition '{}' in '{}' suggests no medicines",
                                condition, name
                            ));
                        }
                    }
                }
            }
        }

        for name in self.conditions.keys() {
            if !self.countries.contains_key(name) {
                errors.push(format!(
                    "Condition table references unknown country '{}'",
                    name
                ));
            }
        }

        errors
    }
}
