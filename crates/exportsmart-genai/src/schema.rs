//! Response schemas in the Gemini `responseSchema` dialect (OpenAPI subset, upper-case type names).

use exportsmart_models::export_request::TransportMode;
use serde_json::{json, Value};

/// Shape of a [`ProductIdentification`](exportsmart_models::ProductIdentification).
pub fn identification_schema() -> Value {
    let modes: Vec<&str> = TransportMode::ALL.iter().map(|m| m.as_str()).collect();
    json!({
        "type": "OBJECT",
        "properties": {
            "hsCode": {
                "type": "STRING",
                "description": "The HS / NCM code (at least 6 digits)"
            },
            "description": {
                "type": "STRING",
                "description": "Concise technical and commercial description of the product"
            },
            "category": {
                "type": "STRING",
                "description": "Broad product category (e.g. Textiles, Electronics, Food)"
            },
            "suggestedTransportMode": {
                "type": "STRING",
                "enum": modes,
                "description": "Most common transport mode for this kind of cargo"
            }
        },
        "required": ["hsCode", "description", "category", "suggestedTransportMode"]
    })
}

/// Shape of an [`AnalysisResult`](exportsmart_models::AnalysisResult).
pub fn analysis_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "executiveSummary": {
                "type": "STRING",
                "description": "Executive summary with the main risks, opportunities and country context."
            },
            "fiscalAnalysis": {
                "type": "STRING",
                "description": "Full fiscal analysis detailing taxes, rules, agreements and technical risks."
            },
            "costTable": {
                "type": "ARRAY",
                "description": "Cost simulation table.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "item": {
                            "type": "STRING",
                            "description": "Cost line name (e.g. FOB value, Freight, Import duty, VAT)"
                        },
                        "value": {
                            "type": "STRING",
                            "description": "Formatted value with currency or percentage (e.g. US$ 10,000.00 or 15%)"
                        },
                        "rawValue": {
                            "type": "NUMBER",
                            "description": "Estimated absolute amount in US dollars, used for charting."
                        },
                        "note": {
                            "type": "STRING",
                            "description": "Short explanatory note (optional)"
                        }
                    },
                    "required": ["item", "value", "rawValue"]
                }
            },
            "finalLandedCost": {
                "type": "STRING",
                "description": "Text highlighting the final landed price and a short impact analysis."
            },
            "strategies": {
                "type": "STRING",
                "description": "Tax and logistics optimisation strategies."
            },
            "historicalData": {
                "type": "ARRAY",
                "description": "Simulated trade statistics for the HS code and destination over the last 12 months.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "month": {
                            "type": "STRING",
                            "description": "Month/year, e.g. 'JAN/24'"
                        },
                        "averageFobValue": {
                            "type": "NUMBER",
                            "description": "Average FOB value in USD for that month."
                        }
                    },
                    "required": ["month", "averageFobValue"]
                }
            }
        },
        "required": [
            "executiveSummary",
            "fiscalAnalysis",
            "costTable",
            "finalLandedCost",
            "strategies",
            "historicalData"
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required(schema: &Value) -> Vec<&str> {
        schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect()
    }

    #[test]
    fn identification_requires_every_field() {
        let schema = identification_schema();
        assert_eq!(
            required(&schema),
            vec!["hsCode", "description", "category", "suggestedTransportMode"]
        );
        assert_eq!(
            schema["properties"]["suggestedTransportMode"]["enum"],
            json!(["Maritime", "Air", "Road"])
        );
    }

    #[test]
    fn analysis_note_is_optional() {
        let schema = analysis_schema();
        assert_eq!(required(&schema).len(), 6);
        let item = &schema["properties"]["costTable"]["items"];
        assert_eq!(required(item), vec!["item", "value", "rawValue"]);
        assert!(item["properties"]["note"].is_object());
    }

    #[test]
    fn numeric_fields_use_number_type() {
        let schema = analysis_schema();
        assert_eq!(
            schema["properties"]["costTable"]["items"]["properties"]["rawValue"]["type"],
            "NUMBER"
        );
        assert_eq!(
            schema["properties"]["historicalData"]["items"]["properties"]["averageFobValue"]["type"],
            "NUMBER"
        );
    }
}
