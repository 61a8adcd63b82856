use std::sync::Arc;
use std::time::Instant;

use exportsmart_models::analysis::{AnalysisResult, ProductIdentification};
use exportsmart_models::config::GenerationConfig;
use exportsmart_models::export_request::ExportRequest;
use exportsmart_models::generation::{GenerationRequest, IdentificationMode};
use tracing::{debug, error, info};

use crate::error::GenerationError;
use crate::gemini::GeminiService;
use crate::parser::{parse_analysis, parse_identification};
use crate::prompts::{
    analysis_prompt, analysis_system_instruction, identification_prompt,
    IDENTIFICATION_SYSTEM_INSTRUCTION,
};
use crate::schema::{analysis_schema, identification_schema};
use crate::service::GenerationService;

/// Builds prompts, calls the generation service and validates what comes back.
pub struct ExportAdvisor {
    service: Arc<dyn GenerationService>,
    config: GenerationConfig,
}

impl ExportAdvisor {
    pub fn new(service: Arc<dyn GenerationService>, config: GenerationConfig) -> Self {
        Self { service, config }
    }

    /// Advisor backed by [`GeminiService`]. Fails when the API key is not set.
    pub fn from_config(config: &GenerationConfig) -> Result<Self, GenerationError> {
        let service = GeminiService::from_config(config)?;
        Ok(Self::new(Arc::new(service), config.clone()))
    }

    pub fn service_name(&self) -> &str {
        self.service.name()
    }

    pub fn identification_request(&self, input: &str, mode: IdentificationMode) -> GenerationRequest {
        GenerationRequest {
            prompt: identification_prompt(input, mode),
            system_instruction: IDENTIFICATION_SYSTEM_INSTRUCTION.to_string(),
            response_schema: identification_schema(),
            temperature: self.config.identification_temperature,
        }
    }

    pub fn analysis_request(&self, request: &ExportRequest) -> GenerationRequest {
        GenerationRequest {
            prompt: analysis_prompt(request),
            system_instruction: analysis_system_instruction(),
            response_schema: analysis_schema(),
            temperature: self.config.analysis_temperature,
        }
    }

    /// Classify a product from a description (`Description`) or describe an HS code (`Code`).
    ///
    /// Blank input is rejected without calling the service. Transport and
    /// credential errors propagate unchanged.
    pub async fn identify_product(
        &self,
        input: &str,
        mode: IdentificationMode,
    ) -> Result<ProductIdentification, GenerationError> {
        if input.trim().is_empty() {
            return Err(GenerationError::Identification("input is empty".into()));
        }

        debug!(service = %self.service.name(), %mode, "Identifying product");
        let raw = self
            .service
            .generate(&self.identification_request(input, mode))
            .await?;
        let identification = parse_identification(raw.as_deref())?;

        info!(hs_code = %identification.hs_code, category = %identification.category, "Product identified");
        Ok(identification)
    }

    /// Run the landed-cost analysis for `request`.
    ///
    /// Every failure other than a missing credential is reported as
    /// [`GenerationError::Analysis`].
    pub async fn analyze_export(
        &self,
        request: &ExportRequest,
    ) -> Result<AnalysisResult, GenerationError> {
        let start = Instant::now();
        debug!(service = %self.service.name(), destination = %request.destination, hs_code = %request.hs_code, "Starting export analysis");

        let raw = match self.service.generate(&self.analysis_request(request)).await {
            Ok(raw) => raw,
            Err(e @ GenerationError::MissingCredential(_)) => return Err(e),
            Err(e) => {
                error!(error = %e, "Generation service call failed");
                return Err(GenerationError::Analysis(e.to_string()));
            }
        };
        let result = parse_analysis(raw.as_deref())?;

        info!(
            destination = %request.destination,
            cost_lines = result.cost_table.len(),
            elapsed_ms = start.elapsed().as_millis(),
            "Export analysis complete"
        );
        Ok(result)
    }
}
