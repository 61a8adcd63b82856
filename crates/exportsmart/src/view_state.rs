//! Explicit, serializable state behind the simulator form and results panel.

use std::fmt;
use std::str::FromStr;

use exportsmart_models::analysis::AnalysisResult;
use exportsmart_models::export_request::{ExportRequest, TransportMode};
use exportsmart_models::generation::IdentificationMode;
use exportsmart_models::simulation::SavedSimulation;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who last wrote a product field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FieldState {
    #[default]
    Empty,
    /// Filled by product identification.
    AutoFilled,
    /// Typed by the user.
    UserOverridden,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LoadingState {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResultTab {
    #[default]
    Summary,
    HistoryChart,
    CostTable,
    Fiscal,
    Strategies,
}

impl ResultTab {
    pub const ALL: [ResultTab; 5] = [
        Self::Summary,
        Self::HistoryChart,
        Self::CostTable,
        Self::Fiscal,
        Self::Strategies,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::HistoryChart => "history_chart",
            Self::CostTable => "cost_table",
            Self::Fiscal => "fiscal",
            Self::Strategies => "strategies",
        }
    }
}

impl FromStr for ResultTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|tab| tab.as_str() == needle)
            .ok_or_else(|| format!("unknown tab: {s}"))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    Calculator,
    History,
}

/// The two product fields that identification can fill.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProductField {
    Description,
    HsCode,
}

impl ProductField {
    /// The input mode under which this field is the identification target's source.
    fn lock_mode(&self) -> IdentificationMode {
        match self {
            Self::Description => IdentificationMode::Description,
            Self::HsCode => IdentificationMode::Code,
        }
    }
}

impl fmt::Display for ProductField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Description => f.write_str("product description"),
            Self::HsCode => f.write_str("HS/NCM code"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ViewState {
    pub form: ExportRequest,
    pub identification_input: String,
    pub input_mode: IdentificationMode,
    pub description_field: FieldState,
    pub code_field: FieldState,
    pub identifying: bool,
    pub loading: LoadingState,
    pub error_message: Option<String>,
    pub analysis: Option<AnalysisResult>,
    pub active_tab: ResultTab,
    pub view: View,
    pub last_saved_id: Option<Uuid>,
    pub history: Vec<SavedSimulation>,
    /// Transport mode proposed by the last successful identification.
    pub suggested_transport: Option<TransportMode>,
}

impl ViewState {
    pub fn field_state(&self, field: ProductField) -> FieldState {
        match field {
            ProductField::Description => self.description_field,
            ProductField::HsCode => self.code_field,
        }
    }

    pub(crate) fn field_state_mut(&mut self, field: ProductField) -> &mut FieldState {
        match field {
            ProductField::Description => &mut self.description_field,
            ProductField::HsCode => &mut self.code_field,
        }
    }

    /// Read-only when the input mode targets this field and identification filled it.
    pub fn is_locked(&self, field: ProductField) -> bool {
        self.input_mode == field.lock_mode() && self.field_state(field) == FieldState::AutoFilled
    }

    pub fn is_busy(&self) -> bool {
        self.identifying || self.loading == LoadingState::Loading
    }

    pub fn can_identify(&self) -> bool {
        !self.is_busy() && !self.identification_input.trim().is_empty()
    }

    pub fn can_submit(&self) -> bool {
        !self.is_busy()
            && !self.form.product_description.trim().is_empty()
            && !self.form.hs_code.trim().is_empty()
    }

    pub fn can_save(&self) -> bool {
        self.analysis.is_some() && self.last_saved_id.is_none()
    }
}
