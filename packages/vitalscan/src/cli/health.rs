use super::Adapter;
use crate::fallback::{self, ErrorResponse};
use crate::prediction::RiskPrediction;

#[cfg(feature = "ml")]
use crate::{error::Error, manager::ModelManager, patient::HealthRequest};

/// `health_prediction`
pub struct HealthCommand;

impl Adapter for HealthCommand {
    const NAME: &'static str = "health_prediction";
    const ABOUT: &'static str = "Predicts cardiovascular risk, diabetes risk and an overall health score";

    type Response = RiskPrediction;

    fn unavailable(reason: &str) -> ErrorResponse<RiskPrediction> {
        fallback::health_unavailable(reason)
    }

    fn error(message: String) -> ErrorResponse<RiskPrediction> {
        fallback::health_error(message)
    }

    #[cfg(feature = "ml")]
    fn handle(manager: &ModelManager, request: &str) -> Result<RiskPrediction, Error> {
        let features = HealthRequest::parse(request)?.features();
        manager.predict_health_risk(&features)
    }
}
