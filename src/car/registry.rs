use dashmap::{mapref::entry::Entry, DashMap};
use std::{collections::HashMap, sync::Arc};
use tracing::{debug, info, instrument, warn};

use crate::{
    config::CarConfigs,
    event_bus::{Event, EventBus, EventType, Value},
};

use super::{
    car::Car,
    cars::{racing::RacingCar, suv::SuvCar},
    types::{CarError, CarResult, CarType},
};

/// Car registry keyed by [`CarType`].
///
/// The lookup key is the registration key, so resolution is a single map
/// lookup instead of a scan over every registered instance. Each car is held
/// as a shared `Arc<dyn Car>` and every successful resolve hands out the
/// same instance.
pub struct CarRegistry {
    configs: CarConfigs,
    cars: Arc<DashMap<CarType, Arc<dyn Car>>>,
    event_bus: Arc<EventBus>,
}

impl CarRegistry {
    pub fn new(configs: CarConfigs, event_bus: Arc<EventBus>) -> Self {
        Self {
            configs,
            cars: Arc::new(DashMap::new()),
            event_bus,
        }
    }

    /// Registers every enabled car from the configuration.
    ///
    /// On failure the cars this call already registered are removed again,
    /// so a failed run leaves the registry as it found it.
    #[instrument(level = "debug", skip(self))]
    pub async fn register_cars(&self) -> CarResult<()> {
        let mut registered = Vec::new();
        for config in self.configs.cars.iter() {
            if !config.enabled {
                debug!("skipping disabled car: {}", config.car_type);
                continue;
            }
            if let Err(err) = self.register_car(config.car_type.clone()).await {
                // ロールバック
                for car_type in registered {
                    self.cars.remove(&car_type);
                }
                return Err(err);
            }
            registered.push(config.car_type.clone());
        }

        let _ = self
            .event_bus
            .publish(Event {
                event_type: EventType::RegistryInitialized,
                parameters: {
                    let mut params = HashMap::new();
                    params.insert(
                        "car_count".to_string(),
                        Value::Integer(self.cars.len() as i64),
                    );
                    params
                },
            })
            .await;
        info!("car registry initialized: {} cars", self.cars.len());
        Ok(())
    }

    /// Carの登録
    #[instrument(level = "debug", skip(self))]
    pub async fn register_car(&self, car_type: CarType) -> CarResult<()> {
        let car = self.create_car(&car_type).await?;
        self.register_car_with(car_type.clone(), car.clone()).await?;

        let _ = self
            .event_bus
            .publish(Event {
                event_type: EventType::CarRegistered,
                parameters: {
                    let mut params = HashMap::new();
                    params.insert(
                        "car_type".to_string(),
                        Value::String(car_type.to_string()),
                    );
                    params.insert("car_name".to_string(), Value::String(car.name().to_string()));
                    params
                },
            })
            .await;

        Ok(())
    }

    pub async fn register_car_with(
        &self,
        car_type: CarType,
        car: Arc<dyn Car>,
    ) -> CarResult<()> {
        validate_car_type(&car_type)?;
        match self.cars.entry(car_type) {
            Entry::Occupied(entry) => Err(CarError::AlreadyRegistered(entry.key().clone())),
            Entry::Vacant(entry) => {
                entry.insert(car);
                Ok(())
            }
        }
    }

    /// Factory method mapping an identity key to its implementation.
    #[instrument(level = "debug", skip(self))]
    pub async fn create_car(&self, car_type: &CarType) -> CarResult<Arc<dyn Car>> {
        validate_car_type(car_type)?;
        match car_type {
            CarType::Suv => Ok(Arc::new(SuvCar::new())),
            CarType::Racing => Ok(Arc::new(RacingCar::new())),
            CarType::Custom(name) => Err(CarError::UnknownCarType(name.clone())),
        }
    }

    /// Carの取得
    pub async fn resolve(&self, car_type: &CarType) -> CarResult<Arc<dyn Car>> {
        validate_car_type(car_type)?;
        if self.cars.is_empty() {
            warn!("no cars registered");
            return Err(CarError::EmptyRegistry);
        }
        match self.cars.get(car_type) {
            Some(entry) => {
                debug!("resolved car: {}", car_type);
                Ok(entry.value().clone())
            }
            None => {
                warn!("car not found: {}", car_type);
                Err(CarError::NotFound(car_type.clone()))
            }
        }
    }

    pub fn car_types(&self) -> Vec<CarType> {
        let mut types = self
            .cars
            .iter()
            .map(|entry| entry.key().clone())
            .collect::<Vec<_>>();
        types.sort();
        types
    }

    pub fn len(&self) -> usize {
        self.cars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cars.is_empty()
    }
}

fn validate_car_type(car_type: &CarType) -> CarResult<()> {
    match car_type {
        CarType::Custom(name) if name.is_empty() => Err(CarError::TypeNotSpecified),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use crate::{car::types::DriveReport, config::CarConfig, timestamp::Timestamp};

    use super::*;

    struct StubCar {
        car_type: CarType,
    }

    #[async_trait]
    impl Car for StubCar {
        async fn drive(&self) -> DriveReport {
            DriveReport {
                car_type: self.car_type.clone(),
                description: "stub drive".to_string(),
                driven_at: Timestamp::now(),
            }
        }

        fn car_type(&self) -> CarType {
            self.car_type.clone()
        }

        fn name(&self) -> &str {
            "stub_car"
        }
    }

    fn get_registry(configs: CarConfigs) -> CarRegistry {
        let event_bus = Arc::new(EventBus::new(20));
        CarRegistry::new(configs, event_bus)
    }

    #[tokio::test]
    async fn test_register_and_resolve() {
        let registry = get_registry(CarConfigs::default());
        registry.register_cars().await.unwrap();
        assert_eq!(registry.len(), 2);

        // Carの取得
        let suv = registry.resolve(&CarType::Suv).await.unwrap();
        assert_eq!(suv.car_type(), CarType::Suv);
        let racing = registry.resolve(&CarType::Racing).await.unwrap();
        assert_eq!(racing.car_type(), CarType::Racing);

        // 登録されていないCar
        let result = registry.resolve(&CarType::Custom("truck".to_string())).await;
        assert!(matches!(result, Err(CarError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_resolve_returns_shared_instance() {
        let registry = get_registry(CarConfigs::default());
        registry.register_cars().await.unwrap();

        let first = registry.resolve(&CarType::Suv).await.unwrap();
        let second = registry.resolve(&CarType::Suv).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_resolve_empty_registry() {
        let registry = get_registry(CarConfigs { cars: vec![] });
        assert!(registry.is_empty());

        let result = registry.resolve(&CarType::Suv).await;
        assert!(matches!(result, Err(CarError::EmptyRegistry)));
    }

    #[tokio::test]
    async fn test_register_car_with() {
        let registry = get_registry(CarConfigs { cars: vec![] });
        let car_type = CarType::Custom("stub".to_string());
        let car = Arc::new(StubCar {
            car_type: car_type.clone(),
        });

        registry
            .register_car_with(car_type.clone(), car.clone())
            .await
            .unwrap();
        let resolved = registry.resolve(&car_type).await.unwrap();
        assert_eq!(resolved.name(), "stub_car");

        // 重複登録
        let result = registry.register_car_with(car_type.clone(), car).await;
        assert!(matches!(result, Err(CarError::AlreadyRegistered(_))));
    }

    #[tokio::test]
    async fn test_register_cars_twice() {
        let registry = get_registry(CarConfigs::default());
        registry.register_cars().await.unwrap();

        let result = registry.register_cars().await;
        assert!(matches!(result, Err(CarError::AlreadyRegistered(_))));
        assert_eq!(registry.len(), 2);
    }

    #[tokio::test]
    async fn test_disabled_car_not_registered() {
        let registry = get_registry(CarConfigs {
            cars: vec![
                CarConfig {
                    car_type: CarType::Suv,
                    enabled: true,
                },
                CarConfig {
                    car_type: CarType::Racing,
                    enabled: false,
                },
            ],
        });
        registry.register_cars().await.unwrap();

        assert_eq!(registry.len(), 1);
        let result = registry.resolve(&CarType::Racing).await;
        assert!(matches!(result, Err(CarError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_create_car_unknown_type() {
        let registry = get_registry(CarConfigs::default());

        let result = registry
            .create_car(&CarType::Custom("truck".to_string()))
            .await;
        assert!(matches!(result, Err(CarError::UnknownCarType(name)) if name == "truck"));

        let result = registry.create_car(&CarType::Custom("".to_string())).await;
        assert!(matches!(result, Err(CarError::TypeNotSpecified)));
    }

    #[tokio::test]
    async fn test_car_types_sorted() {
        let registry = get_registry(CarConfigs::default());
        registry.register_cars().await.unwrap();

        assert_eq!(registry.car_types(), vec![CarType::Suv, CarType::Racing]);
    }

    #[tokio::test]
    async fn test_register_publishes_event() {
        let event_bus = Arc::new(EventBus::new(20));
        let registry = CarRegistry::new(CarConfigs::default(), event_bus.clone());
        let (mut event_rx, _) = event_bus.subscribe();

        registry.register_cars().await.unwrap();

        let event = event_rx.recv().await.unwrap();
        assert_eq!(event.event_type, EventType::CarRegistered);
        assert_eq!(
            event.parameters.get("car_type"),
            Some(&Value::String("suv".to_string()))
        );
        let event = event_rx.recv().await.unwrap();
        assert_eq!(
            event.parameters.get("car_type"),
            Some(&Value::String("racing".to_string()))
        );
        let event = event_rx.recv().await.unwrap();
        assert_eq!(event.event_type, EventType::RegistryInitialized);
        assert_eq!(event.parameters.get("car_count"), Some(&Value::Integer(2)));
    }

    #[tokio::test]
    async fn test_concurrent_registration() {
        let registry = Arc::new(get_registry(CarConfigs { cars: vec![] }));

        // 並行アクセスのテスト
        let mut handles = vec![];
        for i in 0..10 {
            let registry_clone = registry.clone();
            let handle = tokio::spawn(async move {
                let car_type = CarType::Custom(format!("stub_{}", i));
                let car = Arc::new(StubCar {
                    car_type: car_type.clone(),
                });
                registry_clone.register_car_with(car_type, car).await
            });
            handles.push(handle);
        }

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(registry.len(), 10);
    }

    #[tokio::test]
    async fn test_failed_register_cars_rolls_back() {
        let registry = get_registry(CarConfigs {
            cars: vec![
                CarConfig {
                    car_type: CarType::Suv,
                    enabled: true,
                },
                CarConfig {
                    car_type: CarType::Custom("hovercraft".to_string()),
                    enabled: true,
                },
            ],
        });

        let result = registry.register_cars().await;
        assert!(matches!(result, Err(CarError::UnknownCarType(_))));
        // 失敗した呼び出しで登録されたCarは残らない
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_rollback_keeps_directly_registered_cars() {
        let registry = get_registry(CarConfigs {
            cars: vec![
                CarConfig {
                    car_type: CarType::Suv,
                    enabled: true,
                },
                CarConfig {
                    car_type: CarType::Custom("hovercraft".to_string()),
                    enabled: true,
                },
            ],
        });
        let stub_type = CarType::Custom("stub".to_string());
        registry
            .register_car_with(
                stub_type.clone(),
                Arc::new(StubCar {
                    car_type: stub_type.clone(),
                }),
            )
            .await
            .unwrap();

        let result = registry.register_cars().await;
        assert!(matches!(result, Err(CarError::UnknownCarType(_))));
        // ロールバックは呼び出し前からあったCarに触れない
        assert_eq!(registry.car_types(), vec![stub_type]);
    }
}
