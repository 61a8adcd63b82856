//! Static registry of preferential trade agreements between Brazil/Mercosur
//! and export destinations.
//!
//! Keys are country names. Lookups trim and lowercase the input and compare
//! against lowercased keys; there is no fuzzy or partial matching.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum AgreementStatus {
    Active,
    UnderNegotiation,
}

impl fmt::Display for AgreementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => f.write_str("Active"),
            Self::UnderNegotiation => f.write_str("Under negotiation"),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TradeAgreement {
    pub name: &'static str,
    /// Agreement type, e.g. "Customs union" or "Free trade".
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub benefit: &'static str,
    pub status: AgreementStatus,
}

impl TradeAgreement {
    pub fn is_active(&self) -> bool {
        self.status == AgreementStatus::Active
    }
}

const fn active(
    name: &'static str,
    kind: &'static str,
    benefit: &'static str,
) -> TradeAgreement {
    TradeAgreement {
        name,
        kind,
        benefit,
        status: AgreementStatus::Active,
    }
}

const fn negotiating(
    name: &'static str,
    kind: &'static str,
    benefit: &'static str,
) -> TradeAgreement {
    TradeAgreement {
        name,
        kind,
        benefit,
        status: AgreementStatus::UnderNegotiation,
    }
}

/// One entry per country key.
pub static TRADE_AGREEMENTS: &[(&str, TradeAgreement)] = &[
    (
        "Argentina",
        active(
            "Mercosur (ACE 18)",
            "Customs union",
            "Full exemption from import duty (0% tariff) for goods with a certificate of origin.",
        ),
    ),
    (
        "Paraguay",
        active(
            "Mercosur (ACE 18)",
            "Customs union",
            "Full exemption from import duty (0% tariff).",
        ),
    ),
    (
        "Uruguay",
        active(
            "Mercosur (ACE 18)",
            "Customs union",
            "Full exemption from import duty (0% tariff).",
        ),
    ),
    (
        "Chile",
        active(
            "Brazil-Chile (ACE 35)",
            "Free trade",
            "100% tariff preference (0% tariff) for the vast majority of industrial and agro-industrial goods.",
        ),
    ),
    (
        "Mexico",
        active(
            "Brazil-Mexico (ACE 53 / ACE 55)",
            "Economic complementation agreement",
            "Significant tariff preferences. ACE 55 covers the automotive sector with duty-free quotas.",
        ),
    ),
    (
        "Colombia",
        active(
            "Mercosur-Colombia (ACE 72)",
            "Free trade",
            "Tariff phase-out schedule nearly complete, reaching a zero rate for most HS codes.",
        ),
    ),
    (
        "Peru",
        active(
            "Mercosur-Peru (ACE 58)",
            "Free trade",
            "Full free trade zone. The vast majority of goods enter at 0% duty.",
        ),
    ),
    (
        "Bolivia",
        active(
            "Mercosur-Bolivia (ACE 36)",
            "Free trade",
            "100% tariff preference for almost every Brazilian product.",
        ),
    ),
    (
        "Ecuador",
        active(
            "Mercosur-Ecuador (ACE 59)",
            "Economic complementation agreement",
            "Preferential access with reduced or zero tariffs for several sectors.",
        ),
    ),
    (
        "Israel",
        active(
            "Mercosur-Israel",
            "Free trade",
            "Tariff exemption for industrial goods. Mercosur's first extra-regional agreement.",
        ),
    ),
    (
        "Egypt",
        active(
            "Mercosur-Egypt",
            "Free trade",
            "Gradual tariff reductions started in 2017 for several product groups.",
        ),
    ),
    (
        "India",
        active(
            "Mercosur-India",
            "Fixed preference agreement",
            "Import duty discounts of 10% to 100% for a specific list of 450 HS codes.",
        ),
    ),
    (
        "European Union",
        negotiating(
            "Mercosur-EU",
            "Bi-regional association",
            "Expected elimination of tariffs on 91% of Brazilian exports to Europe.",
        ),
    ),
    (
        "Singapore",
        negotiating(
            "Mercosur-Singapore",
            "Free trade",
            "Signed in 2023. Aims to eliminate tariffs on almost 100% of bilateral trade.",
        ),
    ),
    (
        "Switzerland",
        negotiating(
            "Mercosur-EFTA",
            "Free trade",
            "Under review and ratification. Will ease agribusiness and manufactured exports.",
        ),
    ),
    (
        "Norway",
        negotiating(
            "Mercosur-EFTA",
            "Free trade",
            "Part of the EFTA bloc; the agreement will reduce customs costs for biotechnology and industry.",
        ),
    ),
    (
        "Vietnam",
        negotiating(
            "Brazil-Vietnam trade dialogue",
            "Strategic partnership",
            "No full free trade agreement yet, but favorable sanitary protocols exist for meat and grains.",
        ),
    ),
];

/// Find the agreement for a destination country.
///
/// Unknown countries return `None`. Both the agreement banner and the analysis
/// prompt go through this function.
pub fn lookup_agreement(country: &str) -> Option<&'static TradeAgreement> {
    let needle = country.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    TRADE_AGREEMENTS
        .iter()
        .find(|(key, _)| key.to_lowercase() == needle)
        .map(|(_, agreement)| agreement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn argentina_is_active_mercosur() {
        let agreement = lookup_agreement("Argentina").unwrap();
        assert_eq!(agreement.name, "Mercosur (ACE 18)");
        assert_eq!(agreement.status, AgreementStatus::Active);
        assert!(agreement.is_active());
    }

    #[test]
    fn lookup_ignores_case_and_surrounding_whitespace() {
        let variants = ["chile", "CHILE", "  Chile\t", "cHiLe "];
        for variant in variants {
            assert_eq!(
                lookup_agreement(variant),
                lookup_agreement("Chile"),
                "variant {variant:?}"
            );
        }
        assert!(lookup_agreement("european union").is_some());
    }

    #[test]
    fn unknown_or_partial_names_have_no_agreement() {
        assert!(lookup_agreement("Japan").is_none());
        assert!(lookup_agreement("Argent").is_none());
        assert!(lookup_agreement("Argentina Republic").is_none());
        assert!(lookup_agreement("").is_none());
        assert!(lookup_agreement("   ").is_none());
    }

    #[test]
    fn keys_are_unique_case_insensitively() {
        let mut seen = HashSet::new();
        for (key, _) in TRADE_AGREEMENTS {
            assert!(seen.insert(key.to_lowercase()), "duplicate key {key}");
        }
    }

    #[test]
    fn negotiations_are_flagged() {
        let eu = lookup_agreement("European Union").unwrap();
        assert_eq!(eu.status, AgreementStatus::UnderNegotiation);
        assert_eq!(eu.status.to_string(), "Under negotiation");
    }

    #[test]
    fn serializes_kind_as_type() {
        let json = serde_json::to_value(lookup_agreement("Peru").unwrap()).unwrap();
        assert_eq!(json["type"], "Free trade");
        assert_eq!(json["status"], "Active");
    }
}
