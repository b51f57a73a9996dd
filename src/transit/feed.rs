use std::{
    collections::VecDeque,
    path::PathBuf,
    process::{Command, Stdio},
    sync::{Arc, Mutex, TryLockError, mpsc},
    time::Duration,
};

use chrono::NaiveDateTime;

use crate::{
    foundation::config::FeedConfig,
    foundation::error::{KioskError, KioskResult},
    transit::{Arrival, ArrivalQuery, payload::parse_arrivals},
};

/// Source of upcoming arrivals.
///
/// `None` means the fetch failed and is distinct from `Some(vec![])`, which means no
/// matching trains are coming.
pub trait TransitFeed {
    fn fetch_arrivals(&mut self, query: &ArrivalQuery) -> Option<Vec<Arrival>>;
}

impl<F: TransitFeed + ?Sized> TransitFeed for Box<F> {
    fn fetch_arrivals(&mut self, query: &ArrivalQuery) -> Option<Vec<Arrival>> {
        (**self).fetch_arrivals(query)
    }
}

fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

fn log_failure(source: &str, r: KioskResult<Vec<Arrival>>) -> Option<Vec<Arrival>> {
    match r {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(source, error = %e, "arrivals fetch failed");
            None
        }
    }
}

/// Canned responses, replayed in order. The last one repeats once the list runs out.
#[derive(Clone, Debug, Default)]
pub struct StaticFeed {
    responses: VecDeque<Option<Vec<Arrival>>>,
    calls: usize,
}

impl StaticFeed {
    pub fn new(responses: impl IntoIterator<Item = Option<Vec<Arrival>>>) -> Self {
        Self {
            responses: responses.into_iter().collect(),
            calls: 0,
        }
    }

    pub fn always(response: Option<Vec<Arrival>>) -> Self {
        Self::new([response])
    }

    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl TransitFeed for StaticFeed {
    fn fetch_arrivals(&mut self, query: &ArrivalQuery) -> Option<Vec<Arrival>> {
        self.calls += 1;
        let next = if self.responses.len() > 1 {
            self.responses.pop_front().flatten()
        } else {
            self.responses.front().cloned().flatten()
        };
        next.map(|v| query.finish(v))
    }
}

/// Reads a payload file written by an external fetcher (cron job, sidecar).
#[derive(Clone, Debug)]
pub struct PayloadFileFeed {
    path: PathBuf,
    now: fn() -> NaiveDateTime,
}

impl PayloadFileFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            now: local_now,
        }
    }

    /// Replace the wall clock used to turn arrival times into minutes.
    pub fn with_clock(mut self, now: fn() -> NaiveDateTime) -> Self {
        self.now = now;
        self
    }

    fn fetch(&self, query: &ArrivalQuery) -> KioskResult<Vec<Arrival>> {
        let payload = std::fs::read_to_string(&self.path).map_err(|e| {
            KioskError::feed(format!("read payload '{}': {e}", self.path.display()))
        })?;
        parse_arrivals(&payload, query, (self.now)())
    }
}

impl TransitFeed for PayloadFileFeed {
    fn fetch_arrivals(&mut self, query: &ArrivalQuery) -> Option<Vec<Arrival>> {
        log_failure("payload-file", self.fetch(query))
    }
}

/// Runs an external HTTP client against the arrivals endpoint and parses its stdout.
#[derive(Clone, Debug)]
pub struct CommandFeed {
    program: String,
    base_url: String,
    api_key: String,
    max_time: Duration,
    now: fn() -> NaiveDateTime,
}

impl CommandFeed {
    pub fn new(program: impl Into<String>, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            max_time: Duration::from_secs(10),
            now: local_now,
        }
    }

    /// Transfer limit handed to the client itself.
    pub fn with_max_time(mut self, max_time: Duration) -> Self {
        self.max_time = max_time;
        self
    }

    pub fn args(&self, query: &ArrivalQuery) -> Vec<String> {
        vec![
            "-sS".to_string(),
            "--fail".to_string(),
            "--max-time".to_string(),
            self.max_time.as_secs().max(1).to_string(),
            query.request_url(&self.base_url, &self.api_key),
        ]
    }

    fn fetch(&self, query: &ArrivalQuery) -> KioskResult<Vec<Arrival>> {
        let output = Command::new(&self.program)
            .args(self.args(query))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| KioskError::feed(format!("failed to run '{}': {e}", self.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(KioskError::feed(format!(
                "'{}' exited with status {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }
        let body = String::from_utf8_lossy(&output.stdout);
        parse_arrivals(&body, query, (self.now)())
    }
}

impl TransitFeed for CommandFeed {
    fn fetch_arrivals(&mut self, query: &ArrivalQuery) -> Option<Vec<Arrival>> {
        log_failure("command", self.fetch(query))
    }
}

/// Bounds a blocking feed with a deadline.
///
/// The inner fetch runs on a helper thread. If it misses the deadline the call
/// reports failure, and later calls keep failing fast until that fetch returns.
pub struct TimeoutFeed<F> {
    inner: Arc<Mutex<F>>,
    timeout: Duration,
}

impl<F: TransitFeed + Send + 'static> TimeoutFeed<F> {
    pub fn new(inner: F, timeout: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(inner)),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl<F: TransitFeed + Send + 'static> TransitFeed for TimeoutFeed<F> {
    fn fetch_arrivals(&mut self, query: &ArrivalQuery) -> Option<Vec<Arrival>> {
        match self.inner.try_lock() {
            Ok(_) => {}
            Err(TryLockError::WouldBlock) => {
                tracing::warn!("previous arrivals fetch still in flight");
                return None;
            }
            Err(TryLockError::Poisoned(_)) => {
                tracing::error!("arrivals feed poisoned by an earlier panic");
                return None;
            }
        }

        let (tx, rx) = mpsc::channel();
        let inner = Arc::clone(&self.inner);
        let query = query.clone();
        let spawned = std::thread::Builder::new()
            .name("kiosk-feed".to_string())
            .spawn(move || {
                let result = match inner.lock() {
                    Ok(mut feed) => feed.fetch_arrivals(&query),
                    Err(_) => None,
                };
                // Receiver is gone once the deadline passed.
                let _ = tx.send(result);
            });
        if let Err(e) = spawned {
            tracing::error!(error = %e, "failed to spawn feed thread");
            return None;
        }

        match rx.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                tracing::warn!(timeout_ms = self.timeout.as_millis() as u64, "arrivals fetch timed out");
                None
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                tracing::error!("feed thread exited without a result");
                None
            }
        }
    }
}

/// Build the configured feed, wrapped in its deadline.
pub fn feed_from_config(cfg: &FeedConfig) -> KioskResult<Box<dyn TransitFeed>> {
    if let Some(path) = &cfg.payload_path {
        tracing::info!(path = %path.display(), "using payload-file feed");
        return Ok(Box::new(TimeoutFeed::new(
            PayloadFileFeed::new(path.clone()),
            cfg.timeout(),
        )));
    }
    let api_key = cfg
        .api_key
        .as_deref()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| KioskError::config("transit API key is required for the live feed"))?;
    tracing::info!(command = %cfg.command, stop_id = %cfg.stop_id, "using command feed");
    let feed = CommandFeed::new(&cfg.command, &cfg.base_url, api_key).with_max_time(cfg.timeout());
    Ok(Box::new(TimeoutFeed::new(feed, cfg.timeout())))
}

#[cfg(test)]
#[path = "../../tests/unit/transit/feed.rs"]
mod tests;
