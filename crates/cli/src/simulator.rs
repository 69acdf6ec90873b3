//! Random sensor feed standing in for a real device connection.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use twin_core::{OperatingStatus, SensorSnapshot};

/// Reading ranges of the simulated production line.
const RANGES: [(&str, f64, f64); 5] = [
    ("temperature", 20.0, 35.0),
    ("humidity", 40.0, 70.0),
    ("pressure", 1000.0, 1050.0),
    ("vibration", 0.0, 10.0),
    ("energy", 50.0, 80.0),
];

/// Chance of a snapshot reporting `warning` status.
const WARNING_PROBABILITY: f64 = 0.1;

pub struct Simulator {
    rng: StdRng,
    device_id: Option<String>,
}

impl Simulator {
    /// A seeded simulator repeats the same feed; no seed draws one from the OS.
    pub fn new(seed: Option<u64>, device_id: Option<String>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng, device_id }
    }

    pub fn next_snapshot(&mut self) -> SensorSnapshot {
        let readings: Vec<(&str, f64)> = RANGES
            .iter()
            .map(|&(key, lo, hi)| (key, self.rng.gen_range(lo..hi)))
            .collect();

        let status = if self.rng.gen_bool(WARNING_PROBABILITY) {
            OperatingStatus::Warning
        } else {
            OperatingStatus::Operational
        };

        let snapshot = SensorSnapshot::now(readings).with_status(status);
        match &self.device_id {
            Some(id) => snapshot.with_device(id.clone()),
            None => snapshot,
        }
    }
}
