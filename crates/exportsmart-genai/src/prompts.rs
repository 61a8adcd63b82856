use exportsmart_models::agreements::lookup_agreement;
use exportsmart_models::export_request::ExportRequest;
use exportsmart_models::generation::IdentificationMode;
use rust_decimal::Decimal;

/// Sentence used when the destination has no preferential agreement with Brazil/Mercosur.
pub const MFN_FALLBACK: &str = "There are no known preferential trade agreements between Brazil and \
     this destination. Use MFN (Most Favored Nation) tariffs.";

pub const IDENTIFICATION_SYSTEM_INSTRUCTION: &str =
    "You are an expert customs tariff classifier. Return JSON only.";

/// Persona and knowledge base for the landed-cost analysis.
pub fn analysis_system_instruction() -> String {
    "## 1. PERSONA\n\n\
     You are \"Export Smart\", a foreign-trade specialist focused on exports and international \
     pricing. You master trade statistics (ComexStat), NCM / HS codes, trade agreements, \
     per-country tariff rules, the Harmonized System, Incoterms 2020, the full customs clearance \
     structure and the taxes applied in more than 190 countries. Your analyses are precise, clear \
     and strategic.\n\n\
     ## 2. OBJECTIVE\n\n\
     Run a complete export cost simulation (Landed Cost) from the data supplied by the user and \
     return the analysis as structured JSON following the schema provided with the call.\n\n\
     ## 3. CALCULATION RULES\n\n\
     - Identify the destination country and analyze its macroeconomic and trade context with Brazil.\n\
     - Research the applicable destination taxes: Import Duty (MFN), VAT/GST, Excise (if \
     applicable) and other customs fees (port fees, clearance fees).\n\
     - The Incoterm defines the point where responsibility transfers. Adjust the calculation \
     accordingly. The Landed Cost includes every cost up to final delivery in the destination.\n\
     - Landed Cost = FOB + Freight + Insurance + Taxes + Fees.\n\n\
     ## 4. KNOWLEDGE BASE\n\n\
     When freight or insurance are not provided, ESTIMATE them with these parameters:\n\
     - Maritime freight (container): US$ 1,500 to US$ 6,000 depending on the route (Americas, \
     Europe, Asia). Smaller LCL loads: US$ 80 to US$ 200 per cubic meter.\n\
     - Air freight: highly variable. Use 5% to 15% of the FOB value for high-value cargo; \
     US$ 3 to US$ 8 per kg for general cargo.\n\
     - Road freight (Mercosur): 3% to 8% of the FOB value depending on distance.\n\
     - International insurance: market practice is 0.5% to 1.5% of the CIF value. When CIF is not \
     formed, estimate on 110% of FOB + Freight.\n\n\
     ## 5. TRADE AGREEMENTS\n\n\
     If the destination has an ACTIVE agreement with Brazil/Mercosur (e.g. Mercosur, ACEs with \
     Chile, Mexico, Colombia), APPLY the tariff preference (reduction or exemption of Import \
     Duty) and HIGHLIGHT the advantage. If an agreement is under negotiation (e.g. EU), mention \
     its status and future potential.\n\n\
     ## 6. DE MINIMIS\n\n\
     Check the destination's de minimis threshold, the value below which shipments may be exempt:\n\
     - United States: the US$ 800 de minimis exemption WAS CANCELLED for most commercial goods, \
     especially textiles, footwear and other consumer goods. Assume it does NOT apply unless the \
     shipment is a sample with no declared commercial value.\n\
     - European Union: the EUR 22 de minimis was abolished. All imports are subject to VAT. \
     Import duty is exempt below EUR 150.\n\
     - Canada: C$ 20.\n\
     - Australia: A$ 1,000.\n\
     - Mercosur: no unified de minimis rule for commercial purposes.\n\n\
     ## 7. HISTORICAL DATA\n\n\
     You MUST generate simulated trade statistics for `historicalData`: a series of exactly 12 \
     consecutive months (e.g. 'JAN/24' to 'DEC/24') with realistic fluctuations of \
     `averageFobValue` for the given HS code and country. Monthly variation must be plausible \
     (seasonality, exchange rate), not random noise. This is CRITICAL.\n\n\
     ## 8. OUTPUT\n\n\
     - Output a single JSON object, with no text before or after it.\n\
     - Follow the response schema strictly.\n\
     - Use Markdown in the text fields (executiveSummary, fiscalAnalysis, finalLandedCost, \
     strategies): bold, lists.\n\
     - Monetary values must state their currency (preferably USD).\n\n\
     ## 9. TONE\n\n\
     Professional, precise, strategic and didactic. Avoid excessive jargon and explain complex \
     concepts (Incoterms, tax types) briefly.\n"
        .to_string()
}

/// Classification instruction for one identification call.
pub fn identification_prompt(input: &str, mode: IdentificationMode) -> String {
    let input = input.trim();
    match mode {
        IdentificationMode::Description => format!(
            "Identify the most likely NCM / HS code (Harmonized System) for the following product \
             description: \"{input}\". Also provide a standard technical description."
        ),
        IdentificationMode::Code => format!(
            "Identify the commercial technical description for the NCM / HS code: \"{input}\"."
        ),
    }
}

/// Agreement paragraph for the analysis prompt: the registry entry verbatim, or [`MFN_FALLBACK`].
pub fn agreement_context(destination: &str) -> String {
    match lookup_agreement(destination) {
        Some(agreement) => format!(
            "TRADE AGREEMENT DETECTED: {} ({}). Benefit: {}. Status: {}. Consider this agreement \
             explicitly in the Import Duty calculation and in your fiscal analysis.",
            agreement.name, agreement.kind, agreement.benefit, agreement.status
        ),
        None => MFN_FALLBACK.to_string(),
    }
}

fn amount_or_estimate(currency: &str, amount: Decimal, specified: bool) -> String {
    if specified {
        format!("{currency} {amount}")
    } else {
        format!("{currency} Not provided (estimate from the knowledge base)")
    }
}

/// User prompt for a landed-cost analysis of `request`.
pub fn analysis_prompt(request: &ExportRequest) -> String {
    let currency = request.currency.code();
    let mode = request.transport_mode;

    format!(
        "## EXPORT DATA\n\n\
         Destination country: {destination}\n\
         Product: {product}\n\
         NCM / HS code: {hs_code}\n\
         Transport mode: {mode}\n\
         Incoterm: {incoterm}\n\
         FOB value: {currency} {fob}\n\
         International freight: {freight}\n\
         International insurance: {insurance}\n\n\
         {agreement}\n\n\
         ## INSTRUCTIONS\n\n\
         1. Run the complete export simulation (Landed Cost).\n\
         2. You MUST generate the 12 months of historical data as described in the system instruction.\n\
         3. Use the 'Product' field to contextualize the rules (e.g. textiles to the USA fall under \
         the end of de minimis).\n\
         4. If freight or insurance are 0 / not provided, ESTIMATE them from the knowledge base in \
         the system instruction, specifically for the selected TRANSPORT MODE ({mode}).\n\
         5. Check whether the FOB value falls within the destination's de minimis or simplified \
         regime thresholds.\n\
         6. If a trade agreement applies per the context above, apply the tariff reduction.\n",
        destination = request.destination.trim(),
        product = request.product_description.trim(),
        hs_code = request.hs_code.trim(),
        incoterm = request.incoterm.label(),
        fob = request.fob_value,
        freight = amount_or_estimate(currency, request.freight_cost, request.freight_specified()),
        insurance = amount_or_estimate(
            currency,
            request.insurance_cost,
            request.insurance_specified()
        ),
        agreement = agreement_context(&request.destination),
    )
}
