use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum TransportMode {
    #[default]
    Maritime,
    Air,
    Road,
}

impl TransportMode {
    pub const ALL: [TransportMode; 3] = [Self::Maritime, Self::Air, Self::Road];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Maritime => "Maritime",
            Self::Air => "Air",
            Self::Road => "Road",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportMode {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| RequestError::UnknownTransportMode(s.to_string()))
    }
}

/// Incoterms 2020. Serialized as the full display label, e.g. `"FOB - Free on Board"`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Incoterm {
    #[serde(rename = "EXW - Ex Works")]
    Exw,
    #[serde(rename = "FCA - Free Carrier")]
    Fca,
    #[serde(rename = "CPT - Carriage Paid To")]
    Cpt,
    #[serde(rename = "CIP - Carriage and Insurance Paid To")]
    Cip,
    #[serde(rename = "DAP - Delivered at Place")]
    Dap,
    #[serde(rename = "DPU - Delivered at Place Unloaded")]
    Dpu,
    #[serde(rename = "DDP - Delivered Duty Paid")]
    Ddp,
    #[serde(rename = "FAS - Free Alongside Ship")]
    Fas,
    #[default]
    #[serde(rename = "FOB - Free on Board")]
    Fob,
    #[serde(rename = "CFR - Cost and Freight")]
    Cfr,
    #[serde(rename = "CIF - Cost, Insurance and Freight")]
    Cif,
}

impl Incoterm {
    pub const ALL: [Incoterm; 11] = [
        Self::Exw,
        Self::Fca,
        Self::Cpt,
        Self::Cip,
        Self::Dap,
        Self::Dpu,
        Self::Ddp,
        Self::Fas,
        Self::Fob,
        Self::Cfr,
        Self::Cif,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::Exw => "EXW",
            Self::Fca => "FCA",
            Self::Cpt => "CPT",
            Self::Cip => "CIP",
            Self::Dap => "DAP",
            Self::Dpu => "DPU",
            Self::Ddp => "DDP",
            Self::Fas => "FAS",
            Self::Fob => "FOB",
            Self::Cfr => "CFR",
            Self::Cif => "CIF",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Exw => "EXW - Ex Works",
            Self::Fca => "FCA - Free Carrier",
            Self::Cpt => "CPT - Carriage Paid To",
            Self::Cip => "CIP - Carriage and Insurance Paid To",
            Self::Dap => "DAP - Delivered at Place",
            Self::Dpu => "DPU - Delivered at Place Unloaded",
            Self::Ddp => "DDP - Delivered Duty Paid",
            Self::Fas => "FAS - Free Alongside Ship",
            Self::Fob => "FOB - Free on Board",
            Self::Cfr => "CFR - Cost and Freight",
            Self::Cif => "CIF - Cost, Insurance and Freight",
        }
    }
}

impl fmt::Display for Incoterm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts either the three-letter code or the full label, case-insensitively.
impl FromStr for Incoterm {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|term| {
                term.code().eq_ignore_ascii_case(needle) || term.label().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| RequestError::UnknownIncoterm(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Brl,
}

impl Currency {
    pub const ALL: [Currency; 3] = [Self::Usd, Self::Eur, Self::Brl];

    pub fn code(&self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Brl => "BRL",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| RequestError::UnknownCurrency(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("Destination country is required")]
    EmptyDestination,

    #[error("Provide a product description or an HS/NCM code")]
    MissingProductReference,

    #[error("Both the product description and the HS/NCM code are required")]
    IncompleteProduct,

    #[error("{0} must not be negative")]
    NegativeAmount(&'static str),

    #[error("Unknown transport mode: {0}")]
    UnknownTransportMode(String),

    #[error("Unknown incoterm: {0}")]
    UnknownIncoterm(String),

    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),
}

/// The simulation input as entered by the user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub destination: String,
    pub product_description: String,
    pub hs_code: String,
    pub transport_mode: TransportMode,
    pub incoterm: Incoterm,
    pub fob_value: Decimal,
    /// Zero means "not provided", the model estimates it.
    pub freight_cost: Decimal,
    /// Zero means "not provided", the model estimates it.
    pub insurance_cost: Decimal,
    pub currency: Currency,
}

impl ExportRequest {
    /// True when at least one of description / HS code is filled in.
    pub fn has_product_reference(&self) -> bool {
        !self.product_description.trim().is_empty() || !self.hs_code.trim().is_empty()
    }

    pub fn freight_specified(&self) -> bool {
        !self.freight_cost.is_zero()
    }

    pub fn insurance_specified(&self) -> bool {
        !self.insurance_cost.is_zero()
    }

    /// Checks everything a full analysis needs.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.destination.trim().is_empty() {
            return Err(RequestError::EmptyDestination);
        }
        if !self.has_product_reference() {
            return Err(RequestError::MissingProductReference);
        }
        if self.product_description.trim().is_empty() || self.hs_code.trim().is_empty() {
            return Err(RequestError::IncompleteProduct);
        }
        for (field, amount) in [
            ("fobValue", self.fob_value),
            ("freightCost", self.freight_cost),
            ("insuranceCost", self.insurance_cost),
        ] {
            if amount < Decimal::ZERO {
                return Err(RequestError::NegativeAmount(field));
            }
        }
        Ok(())
    }
}
