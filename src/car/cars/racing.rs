use async_trait::async_trait;
use tracing::debug;

use crate::{
    car::{
        car::Car,
        types::{CarType, DriveReport},
    },
    timestamp::Timestamp,
};

/// Track-tuned racing machine.
pub struct RacingCar {
    name: String,
}

impl RacingCar {
    pub fn new() -> Self {
        Self {
            name: "racing_car".to_string(),
        }
    }
}

impl Default for RacingCar {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Car for RacingCar {
    async fn drive(&self) -> DriveReport {
        let report = DriveReport {
            car_type: self.car_type(),
            description: "Racing car roaring down the track".to_string(),
            driven_at: Timestamp::now(),
        };
        debug!("drive: {:?}", report);
        report
    }

    fn car_type(&self) -> CarType {
        CarType::Racing
    }

    fn name(&self) -> &str {
        &self.name
    }
}
