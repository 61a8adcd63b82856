use exportsmart_genai::ExportAdvisor;
use exportsmart_models::agreements::{lookup_agreement, TradeAgreement};
use exportsmart_models::analysis::ProductIdentification;
use exportsmart_models::config::ControllerConfig;
use exportsmart_models::export_request::{
    Currency, ExportRequest, Incoterm, RequestError, TransportMode,
};
use exportsmart_models::generation::IdentificationMode;
use exportsmart_models::simulation::SavedSimulation;
use exportsmart_store::{HistoryStore, LocalStorage, StoreError};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::view_state::{FieldState, LoadingState, ProductField, ResultTab, View, ViewState};

pub const IDENTIFICATION_FAILED_MESSAGE: &str =
    "Could not identify the product. Try a more detailed input or fill in the fields manually.";
pub const INCOMPLETE_PRODUCT_MESSAGE: &str =
    "Please fill in the product description and the HS/NCM code.";
pub const ANALYSIS_FAILED_MESSAGE: &str =
    "An error occurred while processing the simulation. Check your connection and try again.";

#[derive(Error, Debug)]
pub enum ControllerError {
    #[error("Invalid request: {0}")]
    Validation(#[from] RequestError),

    #[error("The {0} field is locked after automatic identification")]
    FieldLocked(ProductField),

    #[error("Another operation is in progress")]
    Busy,

    #[error("There is no analysis to save")]
    NothingToSave,

    #[error("Simulation already saved as {0}")]
    AlreadySaved(Uuid),

    #[error("Simulation not found: {0}")]
    NotFound(Uuid),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

/// Drives a [`ViewState`] through its transitions.
///
/// The state is only changed through the methods below; generation failures
/// end up in `error_message` rather than as errors.
pub struct Simulator<S: LocalStorage> {
    advisor: ExportAdvisor,
    history: HistoryStore<S>,
    config: ControllerConfig,
    state: ViewState,
}

impl<S: LocalStorage> Simulator<S> {
    /// Start on an empty form with the saved history loaded.
    pub fn new(advisor: ExportAdvisor, history: HistoryStore<S>, config: ControllerConfig) -> Self {
        let mut simulator = Self {
            advisor,
            history,
            config,
            state: ViewState::default(),
        };
        simulator.refresh_history();
        simulator
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn form(&self) -> &ExportRequest {
        &self.state.form
    }

    pub fn history_store(&self) -> &HistoryStore<S> {
        &self.history
    }

    /// Agreement between Brazil/Mercosur and the current destination, if any.
    pub fn agreement_banner(&self) -> Option<&'static TradeAgreement> {
        lookup_agreement(&self.state.form.destination)
    }

    pub fn set_destination(&mut self, destination: impl Into<String>) {
        self.state.form.destination = destination.into();
    }

    pub fn select_transport(&mut self, mode: TransportMode) {
        self.state.form.transport_mode = mode;
    }

    pub fn set_incoterm(&mut self, incoterm: Incoterm) {
        self.state.form.incoterm = incoterm;
    }

    pub fn set_currency(&mut self, currency: Currency) {
        self.state.form.currency = currency;
    }

    pub fn set_fob_value(&mut self, value: Decimal) {
        self.state.form.fob_value = value;
    }

    /// Zero leaves the freight to be estimated.
    pub fn set_freight_cost(&mut self, value: Decimal) {
        self.state.form.freight_cost = value;
    }

    /// Zero leaves the insurance to be estimated.
    pub fn set_insurance_cost(&mut self, value: Decimal) {
        self.state.form.insurance_cost = value;
    }

    /// Field states are left untouched.
    pub fn set_input_mode(&mut self, mode: IdentificationMode) {
        self.state.input_mode = mode;
    }

    pub fn set_identification_input(&mut self, input: impl Into<String>) {
        self.state.identification_input = input.into();
    }

    /// Manual edit of a product field. Rejected while the field is locked.
    pub fn set_field(
        &mut self,
        field: ProductField,
        value: impl Into<String>,
    ) -> Result<(), ControllerError> {
        if self.state.is_locked(field) {
            return Err(ControllerError::FieldLocked(field));
        }

        let value = value.into();
        *self.state.field_state_mut(field) = if value.trim().is_empty() {
            FieldState::Empty
        } else {
            FieldState::UserOverridden
        };
        match field {
            ProductField::Description => self.state.form.product_description = value,
            ProductField::HsCode => self.state.form.hs_code = value,
        }
        Ok(())
    }

    /// Replace the whole draft. Non-empty product fields count as typed by the user.
    pub fn load_form(&mut self, form: ExportRequest) {
        self.state.description_field = typed_state(&form.product_description);
        self.state.code_field = typed_state(&form.hs_code);
        self.state.form = form;
    }

    /// Classify `identification_input` and fill both product fields.
    ///
    /// Blank input is a no-op returning `Ok(None)`. A failed identification
    /// also returns `Ok(None)` and leaves a message in `error_message`.
    pub async fn identify_product(
        &mut self,
    ) -> Result<Option<ProductIdentification>, ControllerError> {
        if self.state.is_busy() {
            return Err(ControllerError::Busy);
        }
        let input = self.state.identification_input.trim().to_string();
        if input.is_empty() {
            return Ok(None);
        }

        self.state.identifying = true;
        self.state.error_message = None;
        let outcome = self
            .advisor
            .identify_product(&input, self.state.input_mode)
            .await;
        self.state.identifying = false;

        match outcome {
            Ok(identification) => {
                self.apply_identification(&identification);
                Ok(Some(identification))
            }
            Err(e) => {
                error!(error = %e, mode = %self.state.input_mode, "Product identification failed");
                self.state.error_message = Some(IDENTIFICATION_FAILED_MESSAGE.to_string());
                Ok(None)
            }
        }
    }

    fn apply_identification(&mut self, identification: &ProductIdentification) {
        self.state.form.hs_code = identification.hs_code.clone();
        self.state.form.product_description = identification.description.clone();
        self.state.code_field = filled_state(&identification.hs_code);
        self.state.description_field = filled_state(&identification.description);

        let suggested = identification.suggested_transport_mode;
        self.state.suggested_transport = Some(suggested);
        if self.config.apply_suggested_transport {
            self.state.form.transport_mode = suggested;
        }
        debug!(hs_code = %identification.hs_code, %suggested, applied = self.config.apply_suggested_transport, "Identification applied");
    }

    /// Run the analysis for the current draft.
    ///
    /// On a generation failure the state moves to `Error` with a user-facing
    /// message and the method still returns `Ok(())`.
    pub async fn submit(&mut self) -> Result<(), ControllerError> {
        if self.state.is_busy() {
            return Err(ControllerError::Busy);
        }
        if let Err(e) = self.state.form.validate() {
            self.state.error_message = Some(match &e {
                RequestError::MissingProductReference | RequestError::IncompleteProduct => {
                    INCOMPLETE_PRODUCT_MESSAGE.to_string()
                }
                other => other.to_string(),
            });
            return Err(e.into());
        }

        self.state.loading = LoadingState::Loading;
        self.state.error_message = None;
        self.state.analysis = None;
        self.state.last_saved_id = None;
        self.state.active_tab = ResultTab::Summary;

        match self.advisor.analyze_export(&self.state.form).await {
            Ok(result) => {
                info!(destination = %self.state.form.destination, total_usd = ?result.total_raw_cost(), "Simulation ready");
                self.state.analysis = Some(result);
                self.state.loading = LoadingState::Success;
            }
            Err(e) => {
                error!(error = %e, destination = %self.state.form.destination, "Simulation failed");
                self.state.loading = LoadingState::Error;
                self.state.error_message = Some(ANALYSIS_FAILED_MESSAGE.to_string());
            }
        }
        Ok(())
    }

    /// Persist the current draft and analysis. Allowed once per analysis.
    pub fn save(&mut self) -> Result<SavedSimulation, ControllerError> {
        let analysis = self
            .state
            .analysis
            .as_ref()
            .ok_or(ControllerError::NothingToSave)?;
        if let Some(id) = self.state.last_saved_id {
            return Err(ControllerError::AlreadySaved(id));
        }

        let saved = self.history.save(&self.state.form, analysis)?;
        self.state.last_saved_id = Some(saved.id);
        self.refresh_history();
        Ok(saved)
    }

    /// Bring a saved simulation back into the calculator.
    pub fn load_simulation(&mut self, id: Uuid) -> Result<(), ControllerError> {
        let saved = self.history.get(id).ok_or(ControllerError::NotFound(id))?;

        self.state.identification_input = saved.form_data.product_description.clone();
        self.state.input_mode = IdentificationMode::Description;
        self.load_form(saved.form_data);
        self.state.analysis = Some(saved.result);
        self.state.loading = LoadingState::Success;
        self.state.error_message = None;
        self.state.view = View::Calculator;
        self.state.last_saved_id = Some(saved.id);
        self.state.active_tab = ResultTab::Summary;
        Ok(())
    }

    pub fn delete_simulation(&mut self, id: Uuid) -> Result<(), ControllerError> {
        self.state.history = self.history.delete_by_id(id)?;
        if self.state.last_saved_id == Some(id) {
            self.state.last_saved_id = None;
        }
        Ok(())
    }

    pub fn refresh_history(&mut self) {
        self.state.history = self.history.load_all();
    }

    pub fn select_tab(&mut self, tab: ResultTab) {
        self.state.active_tab = tab;
    }

    pub fn show_view(&mut self, view: View) {
        if view == View::History {
            self.refresh_history();
        }
        self.state.view = view;
    }
}

fn filled_state(value: &str) -> FieldState {
    if value.trim().is_empty() {
        FieldState::Empty
    } else {
        FieldState::AutoFilled
    }
}

fn typed_state(value: &str) -> FieldState {
    if value.trim().is_empty() {
        FieldState::Empty
    } else {
        FieldState::UserOverridden
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use exportsmart_genai::test_support::{
        argentina_request, sample_analysis_json, sample_identification_json, ScriptedService,
    };
    use exportsmart_genai::GenerationError;
    use exportsmart_models::config::GenerationConfig;
    use exportsmart_store::MemoryStorage;
    use rust_decimal_macros::dec;

    fn simulator_with(service: ScriptedService, config: ControllerConfig) -> Simulator<MemoryStorage> {
        let advisor = ExportAdvisor::new(Arc::new(service), GenerationConfig::default());
        Simulator::new(advisor, HistoryStore::new(MemoryStorage::new()), config)
    }

    fn simulator(service: ScriptedService) -> Simulator<MemoryStorage> {
        simulator_with(service, ControllerConfig::default())
    }

    async fn analyzed(service: ScriptedService) -> Simulator<MemoryStorage> {
        let mut sim = simulator(service.with_text(sample_analysis_json(12)));
        sim.load_form(argentina_request());
        sim.submit().await.unwrap();
        sim
    }

    #[tokio::test]
    async fn identification_fills_and_locks_fields() {
        let mut sim = simulator(ScriptedService::new().with_text(sample_identification_json()));
        sim.select_transport(TransportMode::Road);
        sim.set_identification_input("cotton t-shirts");

        let id = sim.identify_product().await.unwrap().unwrap();
        let state = sim.state();
        assert_eq!(id.hs_code, "6109.10.00");
        assert_eq!(state.form.hs_code, "6109.10.00");
        assert_eq!(state.form.product_description, "Cotton T-shirts, knitted");
        assert_eq!(state.description_field, FieldState::AutoFilled);
        assert_eq!(state.code_field, FieldState::AutoFilled);
        assert_eq!(state.form.transport_mode, TransportMode::Maritime);
        assert_eq!(state.suggested_transport, Some(TransportMode::Maritime));
        assert!(!state.identifying);

        assert!(sim.state().is_locked(ProductField::Description));
        let err = sim.set_field(ProductField::Description, "other").unwrap_err();
        assert!(matches!(err, ControllerError::FieldLocked(ProductField::Description)));
        // The code field is not the input mode's target, so it stays editable.
        sim.set_field(ProductField::HsCode, "6109.90.00").unwrap();
        assert_eq!(sim.state().code_field, FieldState::UserOverridden);
    }

    #[tokio::test]
    async fn suggestion_recorded_but_not_applied_when_disabled() {
        let mut sim = simulator_with(
            ScriptedService::new().with_text(sample_identification_json()),
            ControllerConfig {
                apply_suggested_transport: false,
            },
        );
        sim.select_transport(TransportMode::Air);
        sim.set_identification_input("t-shirts");
        sim.identify_product().await.unwrap();

        assert_eq!(sim.form().transport_mode, TransportMode::Air);
        assert_eq!(sim.state().suggested_transport, Some(TransportMode::Maritime));
    }

    #[tokio::test]
    async fn switching_mode_moves_the_lock() {
        let mut sim = simulator(ScriptedService::new().with_text(sample_identification_json()));
        sim.set_identification_input("t-shirts");
        sim.identify_product().await.unwrap();

        sim.set_input_mode(IdentificationMode::Code);
        assert_eq!(sim.state().description_field, FieldState::AutoFilled);
        sim.set_field(ProductField::Description, "Polo shirts").unwrap();
        assert!(matches!(
            sim.set_field(ProductField::HsCode, "6105"),
            Err(ControllerError::FieldLocked(ProductField::HsCode))
        ));
    }

    #[tokio::test]
    async fn blank_identification_is_noop() {
        let service = Arc::new(ScriptedService::new());
        let advisor = ExportAdvisor::new(service.clone(), GenerationConfig::default());
        let mut sim = Simulator::new(
            advisor,
            HistoryStore::new(MemoryStorage::new()),
            ControllerConfig::default(),
        );
        sim.set_identification_input("   ");

        assert!(sim.identify_product().await.unwrap().is_none());
        assert_eq!(service.call_count(), 0);
        assert!(sim.state().error_message.is_none());
    }

    #[tokio::test]
    async fn failed_identification_sets_message() {
        let mut sim = simulator(
            ScriptedService::new().with_error(GenerationError::Transport("timeout".into())),
        );
        sim.set_identification_input("mystery item");

        assert!(sim.identify_product().await.unwrap().is_none());
        assert_eq!(
            sim.state().error_message.as_deref(),
            Some(IDENTIFICATION_FAILED_MESSAGE)
        );
        assert!(!sim.state().identifying);
        assert_eq!(sim.state().description_field, FieldState::Empty);
    }

    #[tokio::test]
    async fn submit_survives_overflowing_cost_table() {
        let mut payload: serde_json::Value =
            serde_json::from_str(&sample_analysis_json(12)).unwrap();
        for line in payload["costTable"].as_array_mut().unwrap() {
            line["rawValue"] = serde_json::json!(rust_decimal::Decimal::MAX.to_string());
        }

        let mut sim = simulator(ScriptedService::new().with_text(payload.to_string()));
        sim.load_form(argentina_request());
        sim.submit().await.unwrap();

        assert_eq!(sim.state().loading, LoadingState::Success);
        let analysis = sim.state().analysis.as_ref().unwrap();
        assert_eq!(analysis.total_raw_cost(), None);
    }

    #[test]
    fn clearing_a_field_resets_state() {
        let mut sim = simulator(ScriptedService::new());
        sim.set_field(ProductField::HsCode, "0901").unwrap();
        assert_eq!(sim.state().code_field, FieldState::UserOverridden);
        sim.set_field(ProductField::HsCode, "").unwrap();
        assert_eq!(sim.state().code_field, FieldState::Empty);
    }

    #[tokio::test]
    async fn submit_requires_both_product_fields() {
        let service = Arc::new(ScriptedService::new());
        let advisor = ExportAdvisor::new(service.clone(), GenerationConfig::default());
        let mut sim = Simulator::new(
            advisor,
            HistoryStore::new(MemoryStorage::new()),
            ControllerConfig::default(),
        );
        sim.set_destination("Chile");
        sim.set_field(ProductField::Description, "Coffee").unwrap();

        let err = sim.submit().await.unwrap_err();
        assert!(matches!(
            err,
            ControllerError::Validation(RequestError::IncompleteProduct)
        ));
        assert_eq!(
            sim.state().error_message.as_deref(),
            Some(INCOMPLETE_PRODUCT_MESSAGE)
        );
        assert_eq!(sim.state().loading, LoadingState::Idle);
        assert_eq!(service.call_count(), 0);
    }

    #[tokio::test]
    async fn successful_submit_stores_analysis() {
        let sim = analyzed(ScriptedService::new()).await;
        let state = sim.state();

        assert_eq!(state.loading, LoadingState::Success);
        assert_eq!(state.analysis.as_ref().unwrap().historical_data.len(), 12);
        assert!(state.error_message.is_none());
        assert!(state.can_save());
        assert_eq!(sim.agreement_banner().unwrap().name, "Mercosur (ACE 18)");
    }

    #[tokio::test]
    async fn failed_submit_clears_previous_result() {
        let mut sim = simulator(
            ScriptedService::new()
                .with_text(sample_analysis_json(12))
                .with_error(GenerationError::Transport("503".into())),
        );
        sim.load_form(argentina_request());
        sim.submit().await.unwrap();
        assert_eq!(sim.state().loading, LoadingState::Success);
        sim.select_tab(ResultTab::CostTable);
        sim.save().unwrap();

        sim.submit().await.unwrap();
        let state = sim.state();
        assert_eq!(state.loading, LoadingState::Error);
        assert!(state.analysis.is_none());
        assert!(state.last_saved_id.is_none());
        assert_eq!(state.active_tab, ResultTab::Summary);
        assert_eq!(state.error_message.as_deref(), Some(ANALYSIS_FAILED_MESSAGE));
    }

    #[tokio::test]
    async fn malformed_history_is_an_error_state() {
        let mut sim = simulator(ScriptedService::new().with_text(sample_analysis_json(11)));
        sim.load_form(argentina_request());
        sim.submit().await.unwrap();

        assert_eq!(sim.state().loading, LoadingState::Error);
        assert!(sim.state().analysis.is_none());
    }

    #[tokio::test]
    async fn save_once_per_analysis() {
        let mut sim = analyzed(ScriptedService::new()).await;

        let saved = sim.save().unwrap();
        assert_eq!(sim.state().last_saved_id, Some(saved.id));
        assert_eq!(sim.state().history, vec![saved.clone()]);
        assert!(!sim.state().can_save());
        assert!(matches!(
            sim.save(),
            Err(ControllerError::AlreadySaved(id)) if id == saved.id
        ));
    }

    #[test]
    fn save_without_analysis_fails() {
        let mut sim = simulator(ScriptedService::new());
        assert!(matches!(sim.save(), Err(ControllerError::NothingToSave)));
    }

    #[tokio::test]
    async fn load_simulation_restores_calculator() {
        let mut sim = analyzed(ScriptedService::new()).await;
        let saved = sim.save().unwrap();

        sim.load_form(ExportRequest::default());
        sim.show_view(View::History);
        sim.select_tab(ResultTab::Fiscal);
        sim.load_simulation(saved.id).unwrap();

        let state = sim.state();
        assert_eq!(state.view, View::Calculator);
        assert_eq!(state.form, saved.form_data);
        assert_eq!(state.analysis.as_ref(), Some(&saved.result));
        assert_eq!(state.identification_input, "Cotton T-shirts");
        assert_eq!(state.input_mode, IdentificationMode::Description);
        assert_eq!(state.last_saved_id, Some(saved.id));
        assert_eq!(state.active_tab, ResultTab::Summary);
        assert_eq!(state.description_field, FieldState::UserOverridden);
    }

    #[test]
    fn load_unknown_simulation() {
        let mut sim = simulator(ScriptedService::new());
        let id = Uuid::new_v4();
        assert!(matches!(
            sim.load_simulation(id),
            Err(ControllerError::NotFound(missing)) if missing == id
        ));
    }

    #[tokio::test]
    async fn delete_updates_history() {
        let mut sim = analyzed(ScriptedService::new()).await;
        let saved = sim.save().unwrap();

        sim.delete_simulation(saved.id).unwrap();
        assert!(sim.state().history.is_empty());
        assert!(sim.state().last_saved_id.is_none());
        assert!(sim.history_store().load_all().is_empty());
    }

    #[test]
    fn history_loaded_on_start() {
        let storage = MemoryStorage::new();
        let store = HistoryStore::new(storage);
        let result = serde_json::from_str(&sample_analysis_json(12)).unwrap();
        let saved = store.save(&argentina_request(), &result).unwrap();

        let advisor = ExportAdvisor::new(Arc::new(ScriptedService::new()), GenerationConfig::default());
        let sim = Simulator::new(advisor, store, ControllerConfig::default());
        assert_eq!(sim.state().history, vec![saved]);
    }

    #[test]
    fn form_setters_update_draft() {
        let mut sim = simulator(ScriptedService::new());
        sim.set_destination("Vietnam");
        sim.set_incoterm(Incoterm::Cif);
        sim.set_currency(Currency::Eur);
        sim.set_fob_value(dec!(2500));
        sim.set_freight_cost(dec!(300));
        sim.set_insurance_cost(dec!(25));

        let form = sim.form();
        assert_eq!(form.incoterm, Incoterm::Cif);
        assert_eq!(form.currency, Currency::Eur);
        assert_eq!(form.fob_value, dec!(2500));
        assert!(form.freight_specified());
        assert!(!sim.agreement_banner().unwrap().is_active());
    }
}
