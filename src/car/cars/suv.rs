use async_trait::async_trait;
use tracing::debug;

use crate::{
    car::{
        car::Car,
        types::{CarType, DriveReport},
    },
    timestamp::Timestamp,
};

/// Everyday sport utility vehicle.
pub struct SuvCar {
    name: String,
}

impl SuvCar {
    pub fn new() -> Self {
        Self {
            name: "suv_car".to_string(),
        }
    }
}

impl Default for SuvCar {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Car for SuvCar {
    async fn drive(&self) -> DriveReport {
        let report = DriveReport {
            car_type: self.car_type(),
            description: "SUV cruising on the open road".to_string(),
            driven_at: Timestamp::now(),
        };
        debug!("drive: {:?}", report);
        report
    }

    fn car_type(&self) -> CarType {
        CarType::Suv
    }

    fn name(&self) -> &str {
        &self.name
    }
}
