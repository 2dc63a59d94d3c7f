use async_trait::async_trait;

use super::types::{CarType, DriveReport};

/// Contract every registered car satisfies.
///
/// Implementations are stateless and never fail to drive; the registry hands
/// them out as shared `Arc<dyn Car>` instances, so the same object serves
/// every lookup of its type.
#[mockall::automock]
#[async_trait]
pub trait Car: Send + Sync {
    /// Drives the car and reports what happened.
    async fn drive(&self) -> DriveReport;

    /// Identity key this car registers under.
    fn car_type(&self) -> CarType;

    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::car::cars::{racing::RacingCar, suv::SuvCar};

    #[tokio::test]
    async fn test_drive_reports_own_type() {
        let car = SuvCar::new();
        let report = car.drive().await;
        assert_eq!(report.car_type, CarType::Suv);
        assert_eq!(report.car_type, car.car_type());
    }

    #[tokio::test]
    async fn test_variants_report_distinct_output() {
        let suv = SuvCar::new();
        let racing = RacingCar::new();
        let suv_report = suv.drive().await;
        let racing_report = racing.drive().await;
        assert_ne!(suv_report.description, racing_report.description);
    }

    #[tokio::test]
    async fn test_mock_car() {
        let mut mock = MockCar::new();
        mock.expect_car_type().return_const(CarType::Suv);
        mock.expect_drive().returning(|| DriveReport {
            car_type: CarType::Suv,
            description: "mock drive".to_string(),
            ..Default::default()
        });

        assert_eq!(mock.car_type(), CarType::Suv);
        assert_eq!(mock.drive().await.description, "mock drive");
    }
}
