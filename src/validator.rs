use crate::metrics::Tally;
use crate::passage::{CursorPosition, LetterDelta, LetterStatus, Passage};
use crate::typing_policy::{self, TypingPolicy};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidatorState {
    #[default]
    Idle,
    Running,
    Finished,
}

/// Matches keystrokes against a passage one letter at a time
#[derive(Debug, Clone, Default)]
pub struct InputValidator {
    policy: TypingPolicy,
    state: ValidatorState,
    passage: Option<Passage>,
    statuses: Vec<Vec<LetterStatus>>,
    cursor: CursorPosition,
    tally: Tally,
    // strict policy: the letter under the cursor has already been missed
    missed_at_cursor: bool,
}

impl InputValidator {
    pub fn new(policy: TypingPolicy) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    pub fn policy(&self) -> TypingPolicy {
        self.policy
    }

    pub fn state(&self) -> ValidatorState {
        self.state
    }

    pub fn cursor(&self) -> CursorPosition {
        self.cursor
    }

    pub fn tally(&self) -> &Tally {
        &self.tally
    }

    pub fn passage(&self) -> Option<&Passage> {
        self.passage.as_ref()
    }

    pub fn statuses(&self) -> &[Vec<LetterStatus>] {
        &self.statuses
    }

    pub fn status(&self, pos: CursorPosition) -> Option<LetterStatus> {
        self.statuses
            .get(pos.word)
            .and_then(|w| w.get(pos.letter))
            .copied()
    }

    pub fn is_running(&self) -> bool {
        self.state == ValidatorState::Running
    }

    pub fn is_finished(&self) -> bool {
        self.state == ValidatorState::Finished
    }

    /// Begins validation of `passage`. Ignored unless idle.
    pub fn start(&mut self, passage: Passage) -> Vec<LetterDelta> {
        if self.state != ValidatorState::Idle {
            log::trace!("validator start ignored in {:?}", self.state);
            return vec![];
        }

        self.statuses = passage
            .words()
            .iter()
            .map(|w| vec![LetterStatus::Pending; w.len()])
            .collect();
        self.passage = Some(passage);
        self.cursor = CursorPosition::default();
        self.tally = Tally::default();
        self.missed_at_cursor = false;
        self.state = ValidatorState::Running;

        vec![self.set_status(self.cursor, LetterStatus::Current)]
    }

    /// Compares `c` with the expected letter. Keystrokes outside a running
    /// session are dropped.
    pub fn submit_keystroke(&mut self, c: char) -> Vec<LetterDelta> {
        if self.state != ValidatorState::Running {
            log::trace!("keystroke {c:?} ignored in {:?}", self.state);
            return vec![];
        }
        typing_policy::apply_keystroke(self, c)
    }

    /// Ends validation early (the clock ran out). The letter under the cursor
    /// goes back to pending.
    pub fn finish(&mut self) -> Vec<LetterDelta> {
        if self.state != ValidatorState::Running {
            return vec![];
        }
        self.state = ValidatorState::Finished;
        self.missed_at_cursor = false;
        vec![self.set_status(self.cursor, LetterStatus::Pending)]
    }

    pub(crate) fn expected(&self) -> Option<char> {
        self.passage.as_ref().and_then(|p| p.letter(self.cursor))
    }

    pub(crate) fn record_keystroke(&mut self, correct: bool) {
        // counters saturate; strict mode puts no bound on keystrokes per session
        self.tally.total_keystrokes = self.tally.total_keystrokes.saturating_add(1);
        if correct {
            self.tally.correct_keystrokes = self.tally.correct_keystrokes.saturating_add(1);
            self.tally.correct_streak = self.tally.correct_streak.saturating_add(1);
            self.tally.best_streak = self.tally.best_streak.max(self.tally.correct_streak);
        } else {
            self.tally.correct_streak = 0;
        }
    }

    pub(crate) fn has_missed_at_cursor(&self) -> bool {
        self.missed_at_cursor
    }

    pub(crate) fn mark_missed_at_cursor(&mut self) {
        self.missed_at_cursor = true;
    }

    /// Settles the letter under the cursor with `status` and moves on. Crossing
    /// a word boundary counts the word if all its letters are correct; moving
    /// past the final letter finishes the run.
    pub(crate) fn commit(&mut self, status: LetterStatus) -> Vec<LetterDelta> {
        let mut deltas = vec![self.set_status(self.cursor, status)];
        self.missed_at_cursor = false;

        let Some(passage) = self.passage.as_ref() else {
            return deltas;
        };

        if passage.is_last_in_word(self.cursor) {
            let word_clean = self.statuses[self.cursor.word]
                .iter()
                .all(|s| *s == LetterStatus::Correct);
            if word_clean {
                self.tally.correct_word_count = self.tally.correct_word_count.saturating_add(1);
            }
        }

        match passage.next_position(self.cursor) {
            Some(next) => {
                self.cursor = next;
                deltas.push(self.set_status(next, LetterStatus::Current));
            }
            None => {
                log::debug!("passage exhausted at {:?}", self.cursor);
                self.state = ValidatorState::Finished;
            }
        }

        deltas
    }

    pub(crate) fn set_status(&mut self, pos: CursorPosition, status: LetterStatus) -> LetterDelta {
        if let Some(slot) = self
            .statuses
            .get_mut(pos.word)
            .and_then(|w| w.get_mut(pos.letter))
        {
            *slot = status;
        }
        LetterDelta::new(pos, status)
    }
}
