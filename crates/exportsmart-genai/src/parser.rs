use exportsmart_models::analysis::{AnalysisResult, ProductIdentification, HISTORICAL_MONTHS};
use serde::de::DeserializeOwned;

use crate::error::GenerationError;

fn decode<T: DeserializeOwned>(raw: Option<&str>, what: &str) -> Result<T, String> {
    let raw = raw
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| format!("no {what} content returned"))?;
    serde_json::from_str(raw.trim()).map_err(|e| format!("invalid {what} response: {e}"))
}

/// Parse the raw service text into a [`ProductIdentification`]. Every field is required.
pub fn parse_identification(raw: Option<&str>) -> Result<ProductIdentification, GenerationError> {
    decode(raw, "identification").map_err(GenerationError::Identification)
}

/// Parse the raw service text into an [`AnalysisResult`].
///
/// Every required field must be present and `historicalData` must hold exactly
/// [`HISTORICAL_MONTHS`] entries.
pub fn parse_analysis(raw: Option<&str>) -> Result<AnalysisResult, GenerationError> {
    let result: AnalysisResult = decode(raw, "analysis").map_err(GenerationError::Analysis)?;
    if result.historical_data.len() != HISTORICAL_MONTHS {
        return Err(GenerationError::Analysis(format!(
            "expected {HISTORICAL_MONTHS} months of historical data, got {}",
            result.historical_data.len()
        )));
    }
    Ok(result)
}
