use crate::clock::{ClockStatus, MonotonicTime, SessionClock, TimeSource};
use crate::config::{validate_duration, Config};
use crate::corpus::PassageProvider;
use crate::error::{EngineError, Result};
use crate::metrics::Metrics;
use crate::passage::{CursorPosition, Passage, Tier};
use crate::session::{FinishReason, Session, SessionResult, SessionState};
use crate::sink::{RenderSink, Speaker};
use crate::time_series::{WpmSample, WpmSeries};
use crate::validator::InputValidator;
use chrono::Local;
use rand::rngs::StdRng;
use rand::Rng;
use std::time::Duration;

/// Owns one typing session end to end: passage selection, validation, the
/// countdown and the metrics snapshot. Everything happens in response to one
/// call at a time; nothing here blocks.
pub struct SessionOrchestrator<S: RenderSink, T: TimeSource = MonotonicTime, R: Rng = StdRng> {
    provider: PassageProvider<R>,
    time: T,
    sink: S,
    speaker: Option<Box<dyn Speaker>>,
    config: Config,
    session: Session,
    pending: Option<Passage>,
    validator: InputValidator,
    clock: SessionClock,
    metrics: Metrics,
    wpm_series: WpmSeries,
    result: Option<SessionResult>,
}

impl<S: RenderSink, T: TimeSource, R: Rng> SessionOrchestrator<S, T, R> {
    /// Builds an idle orchestrator with no passage; call [`reset`](Self::reset)
    /// before starting.
    pub fn new(provider: PassageProvider<R>, time: T, sink: S, config: Config) -> Self {
        Self {
            provider,
            time,
            sink,
            speaker: None,
            session: Session::new(config.tier, config.duration_secs),
            pending: None,
            validator: InputValidator::new(config.policy),
            clock: SessionClock::new(config.duration_secs),
            metrics: Metrics::default(),
            wpm_series: WpmSeries::new(),
            result: None,
            config,
        }
    }

    /// Builds an orchestrator and selects the first passage from `config`
    pub fn from_config(
        provider: PassageProvider<R>,
        time: T,
        sink: S,
        config: Config,
    ) -> Result<Self> {
        config.validate()?;
        let (tier, duration_secs) = (config.tier, config.duration_secs);
        let mut orchestrator = Self::new(provider, time, sink, config);
        orchestrator.reset(tier, duration_secs)?;
        Ok(orchestrator)
    }

    pub fn with_speaker(mut self, speaker: impl Speaker + 'static) -> Self {
        self.speaker = Some(Box::new(speaker));
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> SessionState {
        self.session.state
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn validator(&self) -> &InputValidator {
        &self.validator
    }

    pub fn cursor(&self) -> CursorPosition {
        self.validator.cursor()
    }

    pub fn passage(&self) -> Option<&Passage> {
        self.pending.as_ref().or_else(|| self.validator.passage())
    }

    pub fn wpm_series(&self) -> &WpmSeries {
        &self.wpm_series
    }

    /// Final report, once the session has finished
    pub fn result(&self) -> Option<&SessionResult> {
        self.result.as_ref()
    }

    pub fn remaining_secs(&self) -> f64 {
        self.clock.remaining_secs(self.time.now())
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Throws away the current session, whatever its state, and prepares a
    /// fresh one. On error the orchestrator is left idle without a passage.
    pub fn reset(&mut self, tier: Tier, duration_secs: u64) -> Result<()> {
        self.clock.cancel();

        self.config.tier = tier;
        self.config.duration_secs = duration_secs;
        self.session = Session::new(tier, duration_secs);
        self.pending = None;
        self.validator = InputValidator::new(self.config.policy);
        self.clock = SessionClock::new(duration_secs);
        self.metrics = Metrics::default();
        self.wpm_series = WpmSeries::new();
        self.result = None;

        let selected =
            validate_duration(duration_secs).and_then(|_| self.provider.select_passage(tier));
        let passage = match selected {
            Ok(passage) => passage,
            Err(err) => {
                log::debug!("reset to {tier} failed: {err}");
                self.sink.on_clear();
                return Err(err);
            }
        };

        log::debug!(
            "reset: {tier} passage of {} words, {duration_secs}s",
            passage.word_count()
        );
        self.sink.on_passage(&passage);
        self.sink.on_metrics(&self.metrics, duration_secs as f64);
        self.pending = Some(passage);
        Ok(())
    }

    /// New session with the same tier and duration
    pub fn restart(&mut self) -> Result<()> {
        self.reset(self.session.tier, self.session.duration_secs)
    }

    /// Idle to running. Does nothing if already running or finished.
    pub fn start(&mut self) -> Result<()> {
        if self.session.state != SessionState::Idle {
            log::trace!("start ignored in {:?}", self.session.state);
            return Ok(());
        }
        let passage = self.pending.take().ok_or(EngineError::NoPassage)?;

        let now = self.time.now();
        self.clock.start(now);
        self.session.started_at = Some(now);
        self.session.state = SessionState::Running;
        log::debug!("session started");

        let deltas = self.validator.start(passage);
        self.sink.on_letters(&deltas);
        self.sink
            .on_metrics(&self.metrics, self.clock.remaining_secs(now));
        Ok(())
    }

    pub fn submit_keystroke(&mut self, c: char) {
        if self.session.state != SessionState::Running {
            log::trace!("keystroke {c:?} ignored in {:?}", self.session.state);
            return;
        }

        // The clock may have run out between ticks
        if self.clock.has_run_out(self.time.now()) {
            self.tick();
            return;
        }

        let deltas = self.validator.submit_keystroke(c);
        self.sink.on_letters(&deltas);

        if self.validator.is_finished() {
            self.finalize(self.time.now(), FinishReason::Exhausted);
        }
    }

    /// Advances the countdown and publishes live metrics
    pub fn tick(&mut self) {
        if self.session.state != SessionState::Running {
            return;
        }

        let now = self.time.now();
        match self.clock.tick(now) {
            ClockStatus::Running { remaining_secs } => {
                self.refresh_metrics(now);
                self.wpm_series
                    .push(WpmSample::new(self.session.elapsed_secs, self.metrics.wpm));
                self.sink.on_metrics(&self.metrics, remaining_secs);
            }
            ClockStatus::Expired => {
                let deltas = self.validator.finish();
                self.sink.on_letters(&deltas);
                self.finalize(now, FinishReason::Expired);
            }
            ClockStatus::Idle | ClockStatus::Stopped => {}
        }
    }

    fn refresh_metrics(&mut self, now: Duration) {
        let elapsed = self.clock.elapsed_secs(now);
        self.session.elapsed_secs = elapsed;
        self.metrics = Metrics::derive(elapsed, self.validator.tally());
    }

    fn finalize(&mut self, now: Duration, finished_by: FinishReason) {
        if self.session.state == SessionState::Finished {
            return;
        }

        self.clock.stop(now);
        self.refresh_metrics(now);
        self.session.state = SessionState::Finished;
        self.wpm_series
            .push(WpmSample::new(self.session.elapsed_secs, self.metrics.wpm));

        let result = SessionResult {
            tier: self.session.tier,
            duration_secs: self.session.duration_secs,
            elapsed_secs: self.session.elapsed_secs,
            finished_by,
            metrics: self.metrics,
            best_streak: self.validator.tally().best_streak,
            wpm_series: self.wpm_series.clone(),
            wpm_std_dev: self.wpm_series.std_dev().unwrap_or(0.0),
            completed_at: Local::now(),
        };

        log::info!(
            "session finished ({finished_by:?}): {} wpm, {}% accuracy",
            result.metrics.wpm,
            result.metrics.accuracy_percent
        );

        self.sink.on_metrics(&self.metrics, self.clock.remaining_secs(now));
        self.sink.on_complete(&result);
        if let Some(speaker) = self.speaker.as_mut() {
            speaker.speak(&result.announcement());
        }
        self.result = Some(result);
    }
}
