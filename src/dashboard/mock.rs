use super::records::{
    EnergyDetail, EnergyShare, HvacEnergy, HvacStatus, NetworkDetail, NetworkDevice,
    SecurityDetail, Sensor, TemperatureDetail,
};

pub fn temperature() -> TemperatureDetail {
    TemperatureDetail {
        current_temp: 72,
        target_temp: 73,
        status: HvacStatus {
            system: "Running".to_owned(),
            mode: "Cooling".to_owned(),
            filter: "Clean".to_owned(),
            maintenance: "45 days".to_owned(),
        },
        energy: HvacEnergy {
            today: "8.2 kWh".to_owned(),
            week: "52.4 kWh".to_owned(),
        },
    }
}

pub fn security() -> SecurityDetail {
    SecurityDetail {
        status: "Armed".to_owned(),
        last_updated: "Last updated 15 min ago".to_owned(),
        sensors: [
            ("Front Door", true),
            ("Back Door", true),
            ("Living Room Window", true),
            ("Kitchen Window", false),
            ("Motion Sensor", true),
        ]
        .into_iter()
        .map(|(name, active)| Sensor {
            name: name.to_owned(),
            active,
        })
        .collect(),
    }
}

pub fn network() -> NetworkDetail {
    NetworkDetail {
        status: "Connected".to_owned(),
        connected_devices: 12,
        ssid: "Home_Network".to_owned(),
        speed: "300 Mbps".to_owned(),
        ip_address: "192.168.1.1".to_owned(),
        devices: [
            ("Living Room TV", "192.168.1.10"),
            ("Kitchen Speaker", "192.168.1.11"),
            ("Bedroom Thermostat", "192.168.1.12"),
            ("Front Door Camera", "192.168.1.13"),
            ("Smartphone", "192.168.1.14"),
            ("Laptop", "192.168.1.15"),
        ]
        .into_iter()
        .map(|(name, ip)| NetworkDevice {
            name: name.to_owned(),
            ip: ip.to_owned(),
        })
        .collect(),
    }
}

pub fn energy() -> EnergyDetail {
    EnergyDetail {
        total: 23.5,
        breakdown: [
            ("HVAC", 8.2, 35),
            ("Water Heater", 5.4, 23),
            ("Kitchen", 3.8, 16),
            ("Laundry", 2.1, 9),
            ("Lighting", 1.5, 6),
        ]
        .into_iter()
        .map(|(name, value, percentage)| EnergyShare {
            name: name.to_owned(),
            value,
            percentage,
        })
        .collect(),
    }
}
