//! Transit arrivals: record type, payload parsing, feed adapters, and display text.

pub(crate) mod feed;
pub(crate) mod format;
pub(crate) mod payload;

/// One upcoming train.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Arrival {
    /// Whole minutes until arrival, rounded down.
    pub minutes: u32,
    /// Schedule-based estimate rather than a live position.
    pub is_scheduled: bool,
    pub is_delayed: bool,
}

impl Arrival {
    pub fn live(minutes: u32) -> Self {
        Self {
            minutes,
            is_scheduled: false,
            is_delayed: false,
        }
    }

    /// Scheduled-only or delayed trains are never shown as a countdown.
    pub fn needs_alert(&self) -> bool {
        self.is_scheduled || self.is_delayed
    }
}

/// Which arrivals a feed should return.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArrivalQuery {
    pub stop_id: String,
    pub route: String,
    /// Case-insensitive substring of the destination name.
    pub destination: String,
    pub max_results: usize,
}

impl ArrivalQuery {
    /// Train Tracker arrivals request for this stop.
    pub fn request_url(&self, base_url: &str, api_key: &str) -> String {
        format!(
            "{base_url}?key={}&stpid={}&max={}&outputType=JSON",
            encode_query_value(api_key),
            encode_query_value(&self.stop_id),
            self.max_results
        )
    }

    /// Sort ascending by minutes and keep the first `max_results`.
    pub fn finish(&self, mut arrivals: Vec<Arrival>) -> Vec<Arrival> {
        arrivals.sort_by_key(|a| a.minutes);
        arrivals.truncate(self.max_results);
        arrivals
    }
}

fn encode_query_value(v: &str) -> String {
    let mut out = String::with_capacity(v.len());
    for b in v.bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~') {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{b:02X}"));
        }
    }
    out
}

pub use feed::{CommandFeed, PayloadFileFeed, StaticFeed, TimeoutFeed, TransitFeed};
pub use format::{DisplayText, format_minutes};
pub use payload::parse_arrivals;

#[cfg(test)]
#[path = "../../tests/unit/transit/mod.rs"]
mod tests;
