//! Vehicle domain entity

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::shared::errors::TaxError;

/// Vehicle category as reported by registration data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleCategory {
    /// Ordinary passenger car
    #[serde(alias = "ordinary")]
    Car,
    Motorcycle,
    Tractor,
    Emergency,
    Diplomat,
    /// Foreign-registered vehicle
    Foreign,
    Military,
    Bus,
}

impl VehicleCategory {
    pub const ALL: [VehicleCategory; 8] = [
        Self::Car,
        Self::Motorcycle,
        Self::Tractor,
        Self::Emergency,
        Self::Diplomat,
        Self::Foreign,
        Self::Military,
        Self::Bus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Car => "car",
            Self::Motorcycle => "motorcycle",
            Self::Tractor => "tractor",
            Self::Emergency => "emergency",
            Self::Diplomat => "diplomat",
            Self::Foreign => "foreign",
            Self::Military => "military",
            Self::Bus => "bus",
        }
    }
}

impl std::fmt::Display for VehicleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleCategory {
    type Err = TaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "car" | "ordinary" => Ok(Self::Car),
            "motorcycle" => Ok(Self::Motorcycle),
            "tractor" => Ok(Self::Tractor),
            "emergency" => Ok(Self::Emergency),
            "diplomat" => Ok(Self::Diplomat),
            "foreign" => Ok(Self::Foreign),
            "military" => Ok(Self::Military),
            "bus" => Ok(Self::Bus),
            other => Err(TaxError::invalid_input(format!(
                "unknown vehicle category: {other:?}"
            ))),
        }
    }
}

/// Anything that can report which category a vehicle belongs to.
///
/// `None` means the category is unknown; the tax calculator rejects such
/// vehicles instead of guessing.
pub trait VehicleCategoryProvider {
    fn vehicle_category(&self) -> Option<VehicleCategory>;
}

impl VehicleCategoryProvider for VehicleCategory {
    fn vehicle_category(&self) -> Option<VehicleCategory> {
        Some(*self)
    }
}

impl<T: VehicleCategoryProvider + ?Sized> VehicleCategoryProvider for &T {
    fn vehicle_category(&self) -> Option<VehicleCategory> {
        (**self).vehicle_category()
    }
}

/// A registered vehicle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub registration: String,
    pub category: Option<VehicleCategory>,
}

impl Vehicle {
    pub fn new(registration: impl Into<String>, category: VehicleCategory) -> Self {
        Self {
            registration: registration.into(),
            category: Some(category),
        }
    }

    /// Vehicle whose category could not be determined
    pub fn uncategorised(registration: impl Into<String>) -> Self {
        Self {
            registration: registration.into(),
            category: None,
        }
    }
}

impl VehicleCategoryProvider for Vehicle {
    fn vehicle_category(&self) -> Option<VehicleCategory> {
        self.category
    }
}

// ── Tests ──────────────────────────────────────────────────────
