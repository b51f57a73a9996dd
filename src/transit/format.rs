use crate::transit::Arrival;

/// Countdown text for one train.
pub fn format_minutes(minutes: u32) -> String {
    if minutes == 1 {
        "1 min away".to_string()
    } else {
        format!("{minutes} mins away")
    }
}

/// The two arrival lines shown under the title.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayText {
    pub primary: String,
    pub secondary: String,
}

impl DisplayText {
    fn new(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            secondary: secondary.into(),
        }
    }

    /// Text shown before the first refresh completes.
    pub fn loading() -> Self {
        Self::new("--", "Loading…")
    }

    /// Text shown when a refresh tick fails unexpectedly.
    pub fn error() -> Self {
        Self::new("Error", "--")
    }

    /// `None` is a failed fetch; an empty slice means no trains are coming.
    pub fn from_arrivals(arrivals: Option<&[Arrival]>, destination_label: &str) -> Self {
        let Some(arrivals) = arrivals else {
            return Self::new("--", "No Data");
        };
        let Some(first) = arrivals.first() else {
            return Self::new("No trains", format!("No service to {destination_label}"));
        };
        // A flagged first train is never shown as a countdown. The second
        // train's line still replaces the alert hint when there is one.
        let primary = if first.needs_alert() {
            "No trains".to_string()
        } else {
            format_minutes(first.minutes)
        };
        let secondary = match arrivals.get(1) {
            Some(next) if next.needs_alert() => "No other train inbound".to_string(),
            Some(next) => format!("Next: {}", format_minutes(next.minutes)),
            None => "No additional trains".to_string(),
        };
        Self::new(primary, secondary)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transit/format.rs"]
mod tests;
