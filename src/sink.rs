use crate::metrics::Metrics;
use crate::passage::{LetterDelta, Passage};
use crate::session::SessionResult;

/// Presentation side of the engine. Implementations mirror what they are
/// told; the engine keeps the authoritative state.
///
/// Under the strict policy a missed letter is reported `Incorrect` and then
/// `Current` again within one batch of deltas.
pub trait RenderSink {
    /// A new passage was selected; anything shown for a prior session is stale
    fn on_passage(&mut self, passage: &Passage);
    fn on_letters(&mut self, deltas: &[LetterDelta]);
    fn on_metrics(&mut self, metrics: &Metrics, remaining_secs: f64);
    fn on_complete(&mut self, result: &SessionResult);
    /// A reset failed; the engine holds no passage and nothing prior is valid
    fn on_clear(&mut self);
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn on_passage(&mut self, _passage: &Passage) {}
    fn on_letters(&mut self, _deltas: &[LetterDelta]) {}
    fn on_metrics(&mut self, _metrics: &Metrics, _remaining_secs: f64) {}
    fn on_complete(&mut self, _result: &SessionResult) {}
    fn on_clear(&mut self) {}
}

#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    Passage(String),
    Letters(Vec<LetterDelta>),
    Metrics { metrics: Metrics, remaining_secs: f64 },
    Complete(Box<SessionResult>),
    Cleared,
}

/// Keeps every notification in order, for headless runs and tests
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub events: Vec<SinkEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn completions(&self) -> Vec<&SessionResult> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SinkEvent::Complete(r) => Some(r.as_ref()),
                _ => None,
            })
            .collect()
    }

    pub fn last_metrics(&self) -> Option<&Metrics> {
        self.events.iter().rev().find_map(|e| match e {
            SinkEvent::Metrics { metrics, .. } => Some(metrics),
            _ => None,
        })
    }

    pub fn letter_deltas(&self) -> Vec<LetterDelta> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SinkEvent::Letters(d) => Some(d.iter().copied()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl RenderSink for RecordingSink {
    fn on_passage(&mut self, passage: &Passage) {
        self.events.push(SinkEvent::Passage(passage.text().to_string()));
    }

    fn on_letters(&mut self, deltas: &[LetterDelta]) {
        if !deltas.is_empty() {
            self.events.push(SinkEvent::Letters(deltas.to_vec()));
        }
    }

    fn on_metrics(&mut self, metrics: &Metrics, remaining_secs: f64) {
        self.events.push(SinkEvent::Metrics {
            metrics: *metrics,
            remaining_secs,
        });
    }

    fn on_complete(&mut self, result: &SessionResult) {
        self.events.push(SinkEvent::Complete(Box::new(result.clone())));
    }

    fn on_clear(&mut self) {
        self.events.push(SinkEvent::Cleared);
    }
}

/// Optional audio collaborator. Fire-and-forget: the engine never waits on it.
pub trait Speaker {
    fn speak(&mut self, text: &str);
}

/// Sends announcements to the log instead of a speech engine
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSpeaker;

impl Speaker for LogSpeaker {
    fn speak(&mut self, text: &str) {
        log::info!("announce: {text}");
    }
}
