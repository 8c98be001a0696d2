use serde::Serialize;

/// Counters committed by the validator. Only letters that have been left
/// behind by the cursor contribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub correct_word_count: u32,
    pub correct_streak: u32,
    pub best_streak: u32,
    pub total_keystrokes: u32,
    pub correct_keystrokes: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Metrics {
    pub correct_word_count: u32,
    pub correct_streak: u32,
    pub total_keystrokes: u32,
    pub correct_keystrokes: u32,
    pub wpm: u32,
    pub accuracy_percent: u32,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::derive(0.0, &Tally::default())
    }
}

impl Metrics {
    pub fn derive(elapsed_secs: f64, tally: &Tally) -> Self {
        Self {
            correct_word_count: tally.correct_word_count,
            correct_streak: tally.correct_streak,
            total_keystrokes: tally.total_keystrokes,
            correct_keystrokes: tally.correct_keystrokes,
            wpm: words_per_minute(tally.correct_word_count, elapsed_secs),
            accuracy_percent: accuracy_percent(tally.correct_keystrokes, tally.total_keystrokes),
        }
    }
}

/// Completed correct words per minute. Elapsed time is floored at one second.
pub fn words_per_minute(correct_words: u32, elapsed_secs: f64) -> u32 {
    let secs = if elapsed_secs.is_finite() {
        elapsed_secs.max(1.0)
    } else {
        1.0
    };
    (correct_words as f64 * 60.0 / secs).floor() as u32
}

/// Rounded share of matching keystrokes; 100 before anything was typed
pub fn accuracy_percent(correct_keystrokes: u32, total_keystrokes: u32) -> u32 {
    if total_keystrokes == 0 {
        return 100;
    }
    let correct = correct_keystrokes.min(total_keystrokes);
    (100.0 * correct as f64 / total_keystrokes as f64).round() as u32
}
