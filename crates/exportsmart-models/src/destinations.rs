/// The most common export destinations, largest volumes first.
///
/// Used for listing and hints only. Any free-text destination is accepted.
pub const TOP_DESTINATIONS: &[&str] = &[
    "China", "United States", "Argentina", "Netherlands", "Spain",
    "Chile", "Singapore", "Mexico", "Japan", "Germany",
    "India", "South Korea", "Italy", "Belgium", "United Kingdom",
    "Paraguay", "Uruguay", "France", "Colombia", "United Arab Emirates",
    "Turkey", "Saudi Arabia", "Canada", "Malaysia", "Vietnam",
    "Peru", "Thailand", "Portugal", "Russia", "Egypt",
    "Indonesia", "South Africa", "Taiwan", "Hong Kong", "Switzerland",
    "Bangladesh", "Algeria", "Oman", "Philippines", "Poland",
    "Morocco", "Australia", "Pakistan", "Iran", "Iraq",
    "Nigeria", "Israel", "Sweden", "Denmark", "Norway",
    "Venezuela", "Bolivia", "Ecuador", "Finland", "Dominican Republic",
    "Panama", "Kuwait", "Bahrain", "Qatar", "Jordan",
    "Lebanon", "Angola", "Mozambique", "Kenya", "Ghana",
    "Ivory Coast", "Tanzania", "New Zealand", "Austria", "Ireland",
    "Czech Republic", "Hungary", "Romania", "Greece", "Ukraine",
    "Kazakhstan", "Sri Lanka", "Myanmar", "Guatemala", "Costa Rica",
    "El Salvador", "Honduras", "Nicaragua", "Trinidad and Tobago", "Jamaica",
    "Cuba", "Syria", "Tunisia", "Libya", "Senegal",
    "Cameroon", "Gabon", "Slovenia", "Croatia", "Serbia",
    "Bulgaria", "Estonia", "Latvia", "Lithuania", "Luxembourg",
];

pub fn is_known_destination(country: &str) -> bool {
    let needle = country.trim();
    TOP_DESTINATIONS
        .iter()
        .any(|known| known.eq_ignore_ascii_case(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_has_one_hundred_entries() {
        assert_eq!(TOP_DESTINATIONS.len(), 100);
    }

    #[test]
    fn known_destination_match_is_case_insensitive() {
        assert!(is_known_destination("united states"));
        assert!(is_known_destination(" Japan "));
        assert!(!is_known_destination("Atlantis"));
    }
}
