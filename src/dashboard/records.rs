use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Temperature,
    Security,
    Network,
    Energy,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Temperature,
        Category::Security,
        Category::Network,
        Category::Energy,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            Category::Temperature => "temperature",
            Category::Security => "security",
            Category::Network => "network",
            Category::Energy => "energy",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Category::Temperature => "Temperature",
            Category::Security => "Security System",
            Category::Network => "Network",
            Category::Energy => "Energy",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown dashboard category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.slug().eq_ignore_ascii_case(raw.trim()))
            .ok_or_else(|| UnknownCategory(raw.to_owned()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureDetail {
    pub current_temp: u32,
    pub target_temp: u32,
    pub status: HvacStatus,
    pub energy: HvacEnergy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HvacStatus {
    pub system: String,
    pub mode: String,
    pub filter: String,
    pub maintenance: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HvacEnergy {
    pub today: String,
    pub week: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityDetail {
    pub status: String,
    pub last_updated: String,
    pub sensors: Vec<Sensor>,
}

impl SecurityDetail {
    pub fn is_armed(&self) -> bool {
        self.status == "Armed"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sensor {
    pub name: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkDetail {
    pub status: String,
    pub connected_devices: u32,
    pub ssid: String,
    pub speed: String,
    pub ip_address: String,
    pub devices: Vec<NetworkDevice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkDevice {
    pub name: String,
    pub ip: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyDetail {
    pub total: f64,
    pub breakdown: Vec<EnergyShare>,
}

// Percentages are shown as given and need not sum to 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyShare {
    pub name: String,
    pub value: f64,
    pub percentage: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", content = "data", rename_all = "snake_case")]
pub enum DetailRecord {
    Temperature(TemperatureDetail),
    Security(SecurityDetail),
    Network(NetworkDetail),
    Energy(EnergyDetail),
}

impl DetailRecord {
    pub fn category(&self) -> Category {
        match self {
            DetailRecord::Temperature(_) => Category::Temperature,
            DetailRecord::Security(_) => Category::Security,
            DetailRecord::Network(_) => Category::Network,
            DetailRecord::Energy(_) => Category::Energy,
        }
    }
}
