use crate::passage::{LetterDelta, LetterStatus};
use crate::validator::InputValidator;
use serde::{Deserialize, Serialize};

/// What a mismatched keystroke does to the cursor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypingPolicy {
    /// Mark the letter incorrect and move on
    #[default]
    Advance,
    /// Hold the cursor until the right character is typed
    Strict,
}

pub fn write_advance(v: &mut InputValidator, c: char) -> Vec<LetterDelta> {
    let Some(expected) = v.expected() else {
        return vec![];
    };
    let correct = c == expected;
    v.record_keystroke(correct);
    // Always commit and advance
    v.commit(if correct {
        LetterStatus::Correct
    } else {
        LetterStatus::Incorrect
    })
}

pub fn write_strict(v: &mut InputValidator, c: char) -> Vec<LetterDelta> {
    let Some(expected) = v.expected() else {
        return vec![];
    };
    let correct = c == expected;
    v.record_keystroke(correct);

    if correct {
        // A letter that needed a retry is committed as incorrect, so its word
        // never counts as clean.
        let status = if v.has_missed_at_cursor() {
            LetterStatus::Incorrect
        } else {
            LetterStatus::Correct
        };
        return v.commit(status);
    }

    // Cursor stays for retry. The flash is reported, then the letter is current again.
    v.mark_missed_at_cursor();
    let pos = v.cursor();
    vec![
        LetterDelta::new(pos, LetterStatus::Incorrect),
        LetterDelta::new(pos, LetterStatus::Current),
    ]
}

pub fn apply_keystroke(v: &mut InputValidator, c: char) -> Vec<LetterDelta> {
    match v.policy() {
        TypingPolicy::Advance => write_advance(v, c),
        TypingPolicy::Strict => write_strict(v, c),
    }
}
