use crate::{Error, Result};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Elapsed time in milliseconds, never negative
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Millis(f64);

impl Millis {
    pub const ZERO: Millis = Millis(0.0);

    /// Wrap a millisecond value, clamping negative and NaN inputs to zero
    pub fn new(ms: f64) -> Self {
        if ms.is_nan() || ms < 0.0 {
            Millis(0.0)
        } else {
            Millis(ms)
        }
    }

    pub fn from_duration(duration: Duration) -> Self {
        Millis(duration.as_secs_f64() * 1000.0)
    }

    /// Full precision value, used for correction arithmetic
    pub fn as_f64(&self) -> f64 {
        self.0
    }

    /// Nearest whole millisecond, used for display
    pub fn rounded(&self) -> u64 {
        self.0.round() as u64
    }
}

impl fmt::Display for Millis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.rounded())
    }
}

/// Labels for one start/end bracket and the measurement taken from it.
///
/// Pairs handed out by [`Timer::pair`] carry a per-timer sequence number,
/// so two calls bracketing the same phase never read each other's marks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkPair {
    pub start: String,
    pub end: String,
    pub measure: String,
}

impl MarkPair {
    #[cfg(test)]
    fn fixed(phase: &str) -> Self {
        Self {
            start: format!("{phase}-start"),
            end: format!("{phase}-end"),
            measure: format!("{phase}-audit"),
        }
    }

    fn numbered(phase: &str, seq: u64) -> Self {
        Self {
            start: format!("{phase}-start#{seq}"),
            end: format!("{phase}-end#{seq}"),
            measure: format!("{phase}-audit#{seq}"),
        }
    }
}

/// Named timestamps and the measurements derived from them
#[derive(Debug, Default)]
pub struct Timer {
    marks: Mutex<HashMap<String, Instant>>,
    measurements: Mutex<HashMap<String, Vec<Millis>>>,
    seq: AtomicU64,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current monotonic time under `label`
    pub fn mark(&self, label: impl Into<String>) {
        let label = label.into();
        tracing::trace!("mark {}", label);
        self.marks.lock().insert(label, Instant::now());
    }

    /// Compute the time elapsed between two marks and store it under `label`.
    ///
    /// Both marks are consumed. Measuring a pair that was never marked is a
    /// programming error and is reported as [`Error::MissingMark`].
    pub fn measure(&self, label: &str, start: &str, end: &str) -> Result<Millis> {
        let (started, ended) = {
            let mut marks = self.marks.lock();
            let started = marks
                .get(start)
                .copied()
                .ok_or_else(|| Error::MissingMark(start.to_string()))?;
            let ended = marks
                .get(end)
                .copied()
                .ok_or_else(|| Error::MissingMark(end.to_string()))?;
            marks.remove(start);
            marks.remove(end);
            (started, ended)
        };

        let elapsed = Millis::from_duration(ended.saturating_duration_since(started));
        tracing::debug!("measure {} = {:.3}ms", label, elapsed.as_f64());

        self.measurements
            .lock()
            .entry(label.to_string())
            .or_default()
            .push(elapsed);

        Ok(elapsed)
    }

    /// Latest measurement recorded under `label`
    pub fn duration(&self, label: &str) -> Result<Millis> {
        self.measurements
            .lock()
            .get(label)
            .and_then(|entries| entries.last().copied())
            .ok_or_else(|| Error::MissingMeasurement(label.to_string()))
    }

    /// All measurements recorded under `label`, oldest first
    pub fn entries(&self, label: &str) -> Vec<Millis> {
        self.measurements
            .lock()
            .get(label)
            .cloned()
            .unwrap_or_default()
    }

    /// Hand out labels for one call bracketing `phase`
    pub fn pair(&self, phase: &str) -> MarkPair {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        MarkPair::numbered(phase, seq)
    }

    pub fn start(&self, pair: &MarkPair) {
        self.mark(pair.start.clone());
    }

    /// Mark the end of `pair`, measure it and return the measurement
    pub fn finish(&self, pair: &MarkPair) -> Result<Millis> {
        self.mark(pair.end.clone());
        self.measure(&pair.measure, &pair.start, &pair.end)?;
        self.duration(&pair.measure)
    }

    /// Drop the marks of a bracket that will never be measured
    pub fn discard(&self, pair: &MarkPair) {
        let mut marks = self.marks.lock();
        if marks.remove(&pair.start).is_some() {
            tracing::trace!("discarded {}", pair.start);
        }
        marks.remove(&pair.end);
    }

    /// Marks recorded but not yet consumed by a measurement
    pub fn pending_marks(&self) -> usize {
        self.marks.lock().len()
    }
}
