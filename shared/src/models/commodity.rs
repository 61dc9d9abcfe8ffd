//! Commodity and facility context

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Commodity handled by a deployment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CommodityType {
    Cocoa,
    Coffee,
    Shrimp,
}

impl CommodityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommodityType::Cocoa => "cocoa",
            CommodityType::Coffee => "coffee",
            CommodityType::Shrimp => "shrimp",
        }
    }
}

impl std::fmt::Display for CommodityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CommodityType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cocoa" => Ok(CommodityType::Cocoa),
            "coffee" => Ok(CommodityType::Coffee),
            "shrimp" => Ok(CommodityType::Shrimp),
            other => Err(LedgerError::UnsupportedOperation(format!(
                "unknown commodity type '{}'",
                other
            ))),
        }
    }
}

/// Role flags of the facility a transformation happens at
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(default)]
pub struct FacilityFlags {
    pub is_laboratory: bool,
    pub is_classification_process: bool,
    pub is_freezing_process: bool,
    pub is_collection_facility: bool,
    pub is_field_inspection: bool,
}
