use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::timestamp::Timestamp;

/// Identity key a car is registered and looked up under.
///
/// `Custom` keeps the key space open: lookups for types this build does not
/// ship parse into `Custom` instead of failing, and resolve against the
/// registry as ordinary misses.
#[derive(
    Debug,
    Clone,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
)]
#[strum(serialize_all = "lowercase")]
#[serde(from = "String", into = "String")]
pub enum CarType {
    #[default]
    Suv,
    Racing,
    #[strum(default, to_string = "{0}")]
    Custom(String),
}

impl From<String> for CarType {
    fn from(s: String) -> Self {
        CarType::from_str(&s).unwrap_or(CarType::Custom(s))
    }
}

impl From<CarType> for String {
    fn from(car_type: CarType) -> Self {
        car_type.to_string()
    }
}

/// Outcome of driving a car.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DriveReport {
    pub car_type: CarType,
    pub description: String,
    pub driven_at: Timestamp,
}

#[derive(Debug, Error)]
pub enum CarError {
    #[error("No cars registered")]
    EmptyRegistry,

    #[error("Car not found: {0}")]
    NotFound(CarType),

    #[error("Car already registered: {0}")]
    AlreadyRegistered(CarType),

    #[error("Unknown car type: {0}")]
    UnknownCarType(String),

    #[error("Car type not specified")]
    TypeNotSpecified,
}

pub type CarResult<T> = Result<T, CarError>;
