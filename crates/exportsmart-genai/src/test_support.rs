//! Test doubles for [`GenerationService`] and shared fixtures.
//!
//! `ScriptedService` replays queued outcomes and records every request.
//! `ScenarioService` reads the prompt and applies the rules documented in the
//! analysis system instruction (agreement exemption, freight/insurance
//! estimation per transport mode), so end-to-end flows produce plausible numbers.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use exportsmart_models::export_request::{Currency, ExportRequest, Incoterm, TransportMode};
use exportsmart_models::generation::GenerationRequest;
use rust_decimal::Decimal;
use serde_json::json;

use crate::error::GenerationError;
use crate::service::GenerationService;

const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// Replays queued outcomes in order. An exhausted queue answers with a transport error.
#[derive(Default)]
pub struct ScriptedService {
    outcomes: Mutex<VecDeque<Result<Option<String>, GenerationError>>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.push(Ok(Some(text.into())));
        self
    }

    pub fn with_empty(self) -> Self {
        self.push(Ok(None));
        self
    }

    pub fn with_error(self, error: GenerationError) -> Self {
        self.push(Err(error));
        self
    }

    pub fn push(&self, outcome: Result<Option<String>, GenerationError>) {
        if let Ok(mut queue) = self.outcomes.lock() {
            queue.push_back(outcome);
        }
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }
}

#[async_trait]
impl GenerationService for ScriptedService {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<Option<String>, GenerationError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        self.outcomes
            .lock()
            .ok()
            .and_then(|mut queue| queue.pop_front())
            .unwrap_or_else(|| Err(GenerationError::Transport("no scripted response left".into())))
    }
}

/// Answers identification and analysis calls by reading the prompt.
#[derive(Default)]
pub struct ScenarioService;

impl ScenarioService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl GenerationService for ScenarioService {
    fn name(&self) -> &str {
        "scenario"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<Option<String>, GenerationError> {
        let is_analysis = request.response_schema["properties"]
            .get("historicalData")
            .is_some();
        let body = if is_analysis {
            evaluate_analysis(&request.prompt)
        } else {
            evaluate_identification(&request.prompt)
        };
        Ok(Some(body.to_string()))
    }
}

/// Value after `label` on its own prompt line.
fn prompt_field<'a>(prompt: &'a str, label: &str) -> Option<&'a str> {
    prompt
        .lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix(label))
        .map(str::trim)
}

/// Parse "USD 10000" style amounts. `None` when the amount was not provided.
fn prompt_amount(prompt: &str, label: &str) -> Option<Decimal> {
    let value = prompt_field(prompt, label)?;
    value.split_whitespace().nth(1)?.parse().ok()
}

fn evaluate_identification(prompt: &str) -> serde_json::Value {
    let lower = prompt.to_lowercase();
    let (hs_code, description, category, mode) = if lower.contains("coffee") || lower.contains("0901") {
        ("0901.21.00", "Roasted coffee, not decaffeinated", "Food", TransportMode::Maritime)
    } else if lower.contains("smartphone") || lower.contains("8517") {
        ("8517.13.00", "Smartphones for cellular networks", "Electronics", TransportMode::Air)
    } else if lower.contains("t-shirt") || lower.contains("6109") {
        ("6109.10.00", "Cotton T-shirts, knitted", "Textiles", TransportMode::Maritime)
    } else {
        ("9999.99.99", "Unclassified goods", "General", TransportMode::Road)
    };

    json!({
        "hsCode": hs_code,
        "description": description,
        "category": category,
        "suggestedTransportMode": mode.as_str(),
    })
}

fn evaluate_analysis(prompt: &str) -> serde_json::Value {
    let destination = prompt_field(prompt, "Destination country:").unwrap_or("destination");
    let mode: TransportMode = prompt_field(prompt, "Transport mode:")
        .and_then(|m| m.parse().ok())
        .unwrap_or_default();
    let fob = prompt_amount(prompt, "FOB value:").unwrap_or(Decimal::ZERO);
    let has_agreement = prompt.contains("TRADE AGREEMENT DETECTED");

    let freight = prompt_amount(prompt, "International freight:").unwrap_or_else(|| match mode {
        TransportMode::Maritime => Decimal::from(3000),
        TransportMode::Air => fob * Decimal::new(10, 2),
        TransportMode::Road => fob * Decimal::new(5, 2),
    });
    let insurance = prompt_amount(prompt, "International insurance:")
        .unwrap_or_else(|| ((fob + freight) * Decimal::new(110, 2) * Decimal::new(1, 2)).round_dp(2));
    let duty_rate = if has_agreement {
        Decimal::ZERO
    } else {
        Decimal::new(12, 2)
    };
    let cif = fob + freight + insurance;
    let duty = (cif * duty_rate).round_dp(2);
    let landed = cif + duty;

    let history: Vec<_> = MONTHS
        .iter()
        .enumerate()
        .map(|(i, month)| {
            let seasonal = Decimal::from(100 + (i as i64 % 4) * 5);
            json!({
                "month": format!("{month}/24"),
                "averageFobValue": (fob * seasonal / Decimal::from(100)).round_dp(2),
            })
        })
        .collect();

    let duty_note = if has_agreement {
        "Exempt under trade agreement"
    } else {
        "MFN tariff"
    };

    json!({
        "executiveSummary": format!("**{destination}**: simulated landed cost for {mode} transport."),
        "fiscalAnalysis": format!("- Import duty: {}%", duty_rate * Decimal::from(100)),
        "costTable": [
            {"item": "FOB value", "value": format!("US$ {fob}"), "rawValue": fob},
            {"item": "Freight", "value": format!("US$ {freight}"), "rawValue": freight},
            {"item": "Insurance", "value": format!("US$ {insurance}"), "rawValue": insurance},
            {"item": "Import duty", "value": format!("US$ {duty}"), "rawValue": duty, "note": duty_note},
        ],
        "finalLandedCost": format!("**US$ {landed}**"),
        "strategies": "- Consolidate shipments to dilute freight.",
        "historicalData": history,
    })
}

/// A complete identification payload for cotton T-shirts.
pub fn sample_identification_json() -> String {
    json!({
        "hsCode": "6109.10.00",
        "description": "Cotton T-shirts, knitted",
        "category": "Textiles",
        "suggestedTransportMode": "Maritime",
    })
    .to_string()
}

/// A complete analysis payload with `months` historical points.
pub fn sample_analysis_json(months: usize) -> String {
    let history: Vec<_> = (0..months)
        .map(|i| {
            json!({
                "month": format!("{}/24", MONTHS[i % MONTHS.len()]),
                "averageFobValue": 4.1 + (i as f64) * 0.1,
            })
        })
        .collect();

    json!({
        "executiveSummary": "**Argentina** is Brazil's main Mercosur partner.",
        "fiscalAnalysis": "- Import duty: **0%** under Mercosur (ACE 18)\n- VAT: 21%",
        "costTable": [
            {"item": "FOB value", "value": "US$ 10,000.00", "rawValue": 10000},
            {"item": "Road freight", "value": "US$ 500.00", "rawValue": 500, "note": "Estimated at 5% of FOB"},
            {"item": "Import duty", "value": "0%", "rawValue": 0, "note": "Mercosur exemption"},
        ],
        "finalLandedCost": "**US$ 12,825.00** delivered in Buenos Aires.",
        "strategies": "- Obtain the Mercosur certificate of origin before shipping.",
        "historicalData": history,
    })
    .to_string()
}

/// Cotton T-shirts to Argentina by sea, FOB US$ 10,000, freight and insurance left for estimation.
pub fn argentina_request() -> ExportRequest {
    ExportRequest {
        destination: "Argentina".to_string(),
        product_description: "Cotton T-shirts".to_string(),
        hs_code: "6109.10.00".to_string(),
        transport_mode: TransportMode::Maritime,
        incoterm: Incoterm::Fob,
        fob_value: Decimal::from(10000),
        freight_cost: Decimal::ZERO,
        insurance_cost: Decimal::ZERO,
        currency: Currency::Usd,
    }
}
