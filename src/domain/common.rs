use uuid::Uuid;

/// Identifies entities that expose a stable unique identifier.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Supplies a presentation-ready label for the shell or logs.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Parses a user-entered amount, rejecting blanks and non-finite values.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let trimmed = raw.trim().trim_start_matches('$').replace(',', "");
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}
