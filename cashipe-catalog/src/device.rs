use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Refurbishment grade assigned to a catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum DeviceGrade {
    Fair,
    Good,
    Superb,
}

/// Immutable reference data describing a sellable device model.
///
/// The (category, brand, model) triple is unique; entries are maintained by
/// an out-of-band admin process and only read here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceCatalogEntry {
    pub id: Uuid,
    pub category: String,
    pub brand: String,
    pub model: String,
    pub base_price: i64,
    pub storage_options: Vec<String>,
    pub conditions: Vec<String>,
    pub grade: Option<DeviceGrade>,
}

/// Best-effort brand/model identification from an IMEI or serial prefix.
///
/// Allocation prefixes starting "35" map to Apple handsets and "86" to
/// Samsung; everything else is generic. A TAC database lookup would replace
/// this heuristic.
pub fn identify_by_imei(identifier: &str) -> (&'static str, &'static str) {
    if identifier.starts_with("35") {
        ("Apple", "iPhone")
    } else if identifier.starts_with("86") {
        ("Samsung", "Galaxy")
    } else {
        ("Generic", "Device")
    }
}

impl DeviceCatalogEntry {
    pub fn new(
        category: impl Into<String>,
        brand: impl Into<String>,
        model: impl Into<String>,
        base_price: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            category: category.into(),
            brand: brand.into(),
            model: model.into(),
            base_price,
            storage_options: vec![
                "64 GB".to_string(),
                "128 GB".to_string(),
                "256 GB".to_string(),
                "512 GB".to_string(),
            ],
            conditions: vec![
                "Like New".to_string(),
                "Good".to_string(),
                "Fair".to_string(),
                "Needs Repair".to_string(),
            ],
            grade: None,
        }
    }
}
