use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::AnalysisResult;
use crate::export_request::ExportRequest;

/// A persisted simulation: the submitted form plus the analysis it produced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavedSimulation {
    pub id: Uuid,
    /// Creation instant, stored as epoch milliseconds.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub form_data: ExportRequest,
    pub result: AnalysisResult,
}

impl SavedSimulation {
    pub fn new(form_data: ExportRequest, result: AnalysisResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            form_data,
            result,
        }
    }
}
