use chrono::NaiveDateTime;
use serde_json::Value;

use crate::{
    foundation::error::{KioskError, KioskResult},
    transit::{Arrival, ArrivalQuery},
};

const ARRIVAL_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y%m%d %H:%M:%S"];

/// Parse a Train Tracker arrivals payload (`ctatt.eta[]`) relative to `now`.
///
/// Entries for other routes or destinations are ignored, as are entries with an
/// unreadable `arrT` or an arrival already in the past. The result is sorted and
/// truncated per `query`.
pub fn parse_arrivals(
    payload: &str,
    query: &ArrivalQuery,
    now: NaiveDateTime,
) -> KioskResult<Vec<Arrival>> {
    let root: Value = serde_json::from_str(payload)
        .map_err(|e| KioskError::feed(format!("arrivals payload is not JSON: {e}")))?;
    let etas = root
        .get("ctatt")
        .and_then(|c| c.get("eta"))
        .and_then(Value::as_array)
        .ok_or_else(|| KioskError::feed("arrivals payload has no ctatt.eta array"))?;

    let destination = query.destination.to_lowercase();
    let mut out = Vec::with_capacity(etas.len());
    for eta in etas {
        if eta.get("rt").and_then(Value::as_str) != Some(query.route.as_str()) {
            continue;
        }
        let dest = eta
            .get("destNm")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_lowercase();
        if !dest.contains(&destination) {
            continue;
        }
        let Some(arrives) = eta
            .get("arrT")
            .and_then(Value::as_str)
            .and_then(parse_arrival_time)
        else {
            tracing::debug!(entry = %eta, "skipping arrival with unreadable arrT");
            continue;
        };
        let minutes = (arrives - now).num_milliseconds().div_euclid(60_000);
        let Ok(minutes) = u32::try_from(minutes) else {
            continue;
        };
        out.push(Arrival {
            minutes,
            is_scheduled: flag(eta.get("isSch")),
            is_delayed: flag(eta.get("isDly")),
        });
    }
    Ok(query.finish(out))
}

fn parse_arrival_time(s: &str) -> Option<NaiveDateTime> {
    ARRIVAL_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s.trim(), fmt).ok())
}

fn flag(v: Option<&Value>) -> bool {
    match v {
        Some(Value::String(s)) => s == "1",
        Some(Value::Number(n)) => n.as_u64() == Some(1),
        Some(Value::Bool(b)) => *b,
        _ => false,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transit/payload.rs"]
mod tests;
