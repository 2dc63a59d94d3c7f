use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use thiserror::Error;
use tracing::{debug, instrument};

use crate::{
    car::{
        car::Car,
        registry::CarRegistry,
        types::{CarError, CarType, DriveReport},
    },
    config::SystemConfig,
    event_bus::{ErrorEvent, ErrorSeverity, Event, EventBus, EventType, Value},
};

#[derive(Debug, Error)]
pub enum SystemError {
    #[error("System already initialized")]
    AlreadyInitialized,

    #[error("Car error: {0}")]
    Car(#[from] CarError),
}

pub type SystemResult<T> = Result<T, SystemError>;

/// Entry point owning the event bus and the car registry.
///
/// Initialization succeeds at most once: the first `initialize` call loads
/// every configured car and later calls fail with `AlreadyInitialized`,
/// while a failed attempt rolls back and may be retried. Lookups and drives
/// go through the facade so failures surface on the error channel as well
/// as in the returned result.
pub struct System {
    config: SystemConfig,
    car_registry: Arc<CarRegistry>,
    event_bus: Arc<EventBus>,
    initializing: AtomicBool,
    initialized: AtomicBool,
}

impl System {
    pub fn new(config: SystemConfig) -> Self {
        let event_bus = Arc::new(EventBus::new(config.event_buffer_size));
        let car_registry = Arc::new(CarRegistry::new(
            config.car_configs.clone(),
            event_bus.clone(),
        ));

        Self {
            config,
            car_registry,
            event_bus,
            initializing: AtomicBool::new(false),
            initialized: AtomicBool::new(false),
        }
    }

    pub fn event_bus(&self) -> Arc<EventBus> {
        self.event_bus.clone()
    }

    pub fn car_registry(&self) -> &Arc<CarRegistry> {
        &self.car_registry
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Loads every configured car into the registry.
    ///
    /// `is_initialized` turns true only after registration completed, never
    /// while an attempt is still in flight. A failed attempt re-arms the
    /// guard; the registry rolled itself back, so a retry starts clean.
    #[instrument(level = "debug", skip(self))]
    pub async fn initialize(&self) -> SystemResult<()> {
        if self
            .initializing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(SystemError::AlreadyInitialized);
        }

        if let Err(err) = self.car_registry.register_cars().await {
            self.initializing.store(false, Ordering::SeqCst);
            let _ = self
                .event_bus
                .publish_error(ErrorEvent {
                    error_type: "car registry initialization failed".to_string(),
                    message: err.to_string(),
                    severity: ErrorSeverity::Error,
                    parameters: HashMap::new(),
                })
                .await;
            return Err(err.into());
        }

        self.initialized.store(true, Ordering::SeqCst);
        Ok(())
    }

    /// Looks up a registered car by its identity key.
    pub async fn resolve_car(&self, car_type: &CarType) -> SystemResult<Arc<dyn Car>> {
        match self.car_registry.resolve(car_type).await {
            Ok(car) => Ok(car),
            Err(err) => {
                self.publish_car_error(car_type, &err).await;
                Err(err.into())
            }
        }
    }

    /// Resolves a car and drives it.
    #[instrument(level = "debug", skip(self))]
    pub async fn drive_car(&self, car_type: &CarType) -> SystemResult<DriveReport> {
        let car = self.resolve_car(car_type).await?;
        let report = car.drive().await;

        let _ = self
            .event_bus
            .publish(Event {
                event_type: EventType::CarDriven,
                parameters: {
                    let mut params = HashMap::new();
                    params.insert(
                        "car_type".to_string(),
                        Value::String(report.car_type.to_string()),
                    );
                    params.insert(
                        "description".to_string(),
                        Value::String(report.description.clone()),
                    );
                    params.insert(
                        "driven_at".to_string(),
                        Value::String(report.driven_at.to_string()),
                    );
                    params
                },
            })
            .await;
        debug!("drive report: {:?}", report);
        Ok(report)
    }

    async fn publish_car_error(&self, car_type: &CarType, error: &CarError) {
        let severity = match error {
            CarError::EmptyRegistry => ErrorSeverity::Error,
            _ => ErrorSeverity::Warning,
        };
        let _ = self
            .event_bus
            .publish_error(ErrorEvent {
                error_type: "car resolution failed".to_string(),
                message: error.to_string(),
                severity,
                parameters: {
                    let mut params = HashMap::new();
                    params.insert(
                        "car_type".to_string(),
                        Value::String(car_type.to_string()),
                    );
                    params
                },
            })
            .await;
    }
}
