use thiserror::Error;

use crate::car::types::CarError;
use crate::system::SystemError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("System error: {0}")]
    System(#[from] SystemError),
    #[error("Car error: {0}")]
    Car(#[from] CarError),
    // event error
    #[error("Event error: {0}")]
    Event(#[from] crate::event_bus::EventError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type InternalResult<T> = Result<T, Error>;

// エラー作成用のヘルパー関数
impl Error {
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Error::Internal(message.into())
    }
}
