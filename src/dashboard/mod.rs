mod mock;
mod records;

use std::sync::RwLock;

use serde::Serialize;
use tracing::debug;

pub use records::{
    Category, DetailRecord, EnergyDetail, EnergyShare, HvacEnergy, HvacStatus, NetworkDetail,
    NetworkDevice, SecurityDetail, Sensor, TemperatureDetail, UnknownCategory,
};

pub const STATUS_LINE: &str = "All systems operational";

#[derive(Debug, Clone, PartialEq)]
pub struct HomeSnapshot {
    pub temperature: TemperatureDetail,
    pub security: SecurityDetail,
    pub network: NetworkDetail,
    pub energy: EnergyDetail,
}

impl HomeSnapshot {
    pub fn mock() -> Self {
        Self {
            temperature: mock::temperature(),
            security: mock::security(),
            network: mock::network(),
            energy: mock::energy(),
        }
    }

    pub fn record(&self, category: Category) -> DetailRecord {
        match category {
            Category::Temperature => DetailRecord::Temperature(self.temperature.clone()),
            Category::Security => DetailRecord::Security(self.security.clone()),
            Category::Network => DetailRecord::Network(self.network.clone()),
            Category::Energy => DetailRecord::Energy(self.energy.clone()),
        }
    }

    pub fn tiles(&self) -> Vec<TileSummary> {
        vec![
            TileSummary {
                category: Category::Temperature,
                title: Category::Temperature.title().to_owned(),
                value: self.temperature.current_temp.to_string(),
                unit: Some("°F".to_owned()),
                secondary_value: Some(format!("{}°F", self.temperature.target_temp)),
                secondary_label: Some("Target".to_owned()),
                color: "#FFF5F5".to_owned(),
            },
            TileSummary {
                category: Category::Security,
                title: Category::Security.title().to_owned(),
                value: self.security.status.clone(),
                unit: None,
                secondary_value: None,
                secondary_label: None,
                color: "#F2FCE2".to_owned(),
            },
            TileSummary {
                category: Category::Network,
                title: Category::Network.title().to_owned(),
                value: self.network.status.clone(),
                unit: None,
                secondary_value: Some(format!("{} devices", self.network.connected_devices)),
                secondary_label: None,
                color: "#F0F7FF".to_owned(),
            },
            TileSummary {
                category: Category::Energy,
                title: Category::Energy.title().to_owned(),
                value: self.energy.total.to_string(),
                unit: Some("kWh".to_owned()),
                secondary_value: None,
                secondary_label: Some("Today".to_owned()),
                color: "#F6F1FF".to_owned(),
            },
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileSummary {
    pub category: Category,
    pub title: String,
    pub value: String,
    pub unit: Option<String>,
    pub secondary_value: Option<String>,
    pub secondary_label: Option<String>,
    pub color: String,
}

impl TileSummary {
    pub fn secondary(&self) -> Option<(&str, &str)> {
        match (&self.secondary_label, &self.secondary_value) {
            (Some(label), Some(value)) => Some((label.as_str(), value.as_str())),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailPanel {
    pub title: String,
    pub record: DetailRecord,
}

impl DetailPanel {
    pub fn new(record: DetailRecord) -> Self {
        Self {
            title: record.category().title().to_owned(),
            record,
        }
    }

    pub fn category(&self) -> Category {
        self.record.category()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub status_line: String,
    pub tiles: Vec<TileSummary>,
    pub breakdown: Vec<EnergyShare>,
    pub detail: Option<DetailPanel>,
}

#[derive(Debug)]
pub struct DashboardController {
    home: HomeSnapshot,
    open: RwLock<Option<Category>>,
}

impl Default for DashboardController {
    fn default() -> Self {
        Self::new(HomeSnapshot::mock())
    }
}

impl DashboardController {
    pub fn new(home: HomeSnapshot) -> Self {
        Self {
            home,
            open: RwLock::new(None),
        }
    }

    pub fn select_tile(&self, category: Category) {
        debug!(%category, "detail panel opened");
        *self
            .open
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(category);
    }

    pub fn close_detail(&self) {
        let previous = self
            .open
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(category) = previous {
            debug!(%category, "detail panel closed");
        }
    }

    pub fn open_tile(&self) -> Option<Category> {
        *self
            .open
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn view(&self) -> DashboardView {
        DashboardView {
            status_line: STATUS_LINE.to_owned(),
            tiles: self.home.tiles(),
            breakdown: self.home.energy.breakdown.clone(),
            detail: self
                .open_tile()
                .map(|category| DetailPanel::new(self.home.record(category))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Category, DashboardController, DetailRecord, HomeSnapshot};

    #[test]
    fn always_shows_four_tiles_in_fixed_order() {
        let view = DashboardController::default().view();
        let categories = view
            .tiles
            .iter()
            .map(|tile| tile.category)
            .collect::<Vec<_>>();
        assert_eq!(categories, Category::ALL.to_vec());
        assert!(view.detail.is_none());
    }

    #[test]
    fn reselecting_leaves_exactly_one_panel_open() {
        let dashboard = DashboardController::default();
        dashboard.select_tile(Category::Temperature);
        dashboard.close_detail();
        assert_eq!(dashboard.open_tile(), None);

        dashboard.select_tile(Category::Network);
        let detail = dashboard.view().detail.expect("network panel should be open");
        assert_eq!(detail.category(), Category::Network);
        assert_eq!(detail.title, "Network");

        dashboard.select_tile(Category::Security);
        assert_eq!(dashboard.open_tile(), Some(Category::Security));
    }

    #[test]
    fn detail_record_always_matches_selected_category() {
        let home = HomeSnapshot::mock();
        for category in Category::ALL {
            assert_eq!(home.record(category).category(), category);
        }
    }

    #[test]
    fn energy_breakdown_is_kept_verbatim() {
        let dashboard = DashboardController::default();
        dashboard.select_tile(Category::Energy);

        let detail = dashboard.view().detail.expect("energy panel should be open");
        let DetailRecord::Energy(energy) = detail.record else {
            panic!("expected energy record");
        };
        assert_eq!(energy.total, 23.5);
        assert_eq!(energy.breakdown.len(), 5);
        let percentages = energy
            .breakdown
            .iter()
            .map(|share| u32::from(share.percentage))
            .collect::<Vec<_>>();
        assert_eq!(percentages, vec![35, 23, 16, 9, 6]);
        assert_eq!(percentages.iter().sum::<u32>(), 89);
    }

    #[test]
    fn tile_secondary_requires_label_and_value() {
        let tiles = HomeSnapshot::mock().tiles();
        assert_eq!(tiles[0].secondary(), Some(("Target", "73°F")));
        assert_eq!(tiles[0].value, "72");
        assert_eq!(tiles[2].secondary(), None);
        assert_eq!(tiles[3].value, "23.5");
        assert_eq!(tiles[3].secondary(), None);
    }

    #[test]
    fn security_snapshot_has_one_inactive_sensor() {
        let home = HomeSnapshot::mock();
        assert!(home.security.is_armed());
        let inactive = home
            .security
            .sensors
            .iter()
            .filter(|sensor| !sensor.active)
            .map(|sensor| sensor.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(inactive, vec!["Kitchen Window"]);
    }
}
