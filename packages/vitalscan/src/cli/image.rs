use super::Adapter;
use crate::fallback::{self, ErrorResponse};
use crate::prediction::ImageAnalysis;

#[cfg(feature = "ml")]
use crate::{error::Error, imaging::ImageRequest, manager::ModelManager};

/// `image_analysis`
pub struct ImageCommand;

impl Adapter for ImageCommand {
    const NAME: &'static str = "image_analysis";
    const ABOUT: &'static str = "Simulated medical image analysis keyed on the image filename";

    type Response = ImageAnalysis;

    fn unavailable(reason: &str) -> ErrorResponse<ImageAnalysis> {
        fallback::image_unavailable(reason)
    }

    fn error(message: String) -> ErrorResponse<ImageAnalysis> {
        fallback::image_error(message)
    }

    #[cfg(feature = "ml")]
    fn handle(manager: &ModelManager, request: &str) -> Result<ImageAnalysis, Error> {
        let request = ImageRequest::parse(request)?;
        Ok(manager.analyze_image(&request.filename, &request.analysis_type))
    }
}
