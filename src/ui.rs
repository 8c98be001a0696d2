pub mod charting;

use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Chart, Dataset, GraphType, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    metrics::Metrics,
    passage::{LetterDelta, LetterStatus, Passage},
    session::SessionResult,
    sink::RenderSink,
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

/// Terminal mirror of the engine's state, redrawn after every event
#[derive(Debug, Default)]
pub struct View {
    caption: String,
    words: Vec<Vec<char>>,
    statuses: Vec<Vec<LetterStatus>>,
    metrics: Metrics,
    remaining_secs: f64,
    started: bool,
    result: Option<SessionResult>,
}

impl View {
    pub fn new() -> Self {
        Self::default()
    }

    /// Free-form label shown above the passage, e.g. the tier
    pub fn set_caption(&mut self, caption: impl Into<String>) {
        self.caption = caption.into();
    }

    pub fn status(&self, word: usize, letter: usize) -> Option<LetterStatus> {
        self.statuses.get(word).and_then(|w| w.get(letter)).copied()
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn result(&self) -> Option<&SessionResult> {
        self.result.as_ref()
    }

    pub fn prompt_text(&self) -> String {
        self.words
            .iter()
            .map(|w| w.iter().collect::<String>())
            .join(" ")
    }

    fn passage_line(&self) -> Line<'static> {
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let green_bold_style = bold_style.fg(Color::Green);
        let red_bold_style = bold_style.fg(Color::Red);
        let dim_bold_style = bold_style.add_modifier(Modifier::DIM);
        let underlined_dim_bold_style = dim_bold_style.add_modifier(Modifier::UNDERLINED);

        let mut spans = Vec::new();
        for (w, (word, statuses)) in self.words.iter().zip(&self.statuses).enumerate() {
            if w > 0 {
                spans.push(Span::raw(" "));
            }
            for (c, status) in word.iter().zip(statuses) {
                let style = match status {
                    LetterStatus::Correct => green_bold_style,
                    LetterStatus::Incorrect => red_bold_style,
                    LetterStatus::Current => underlined_dim_bold_style,
                    LetterStatus::Pending => dim_bold_style,
                };
                spans.push(Span::styled(c.to_string(), style));
            }
        }
        Line::from(spans)
    }

    fn render_typing(&self, area: Rect, buf: &mut Buffer) {
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_bold_style = bold_style.add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
        let prompt_width = self.prompt_text().width();
        let prompt_occupied_lines = if prompt_width <= max_chars_per_line as usize {
            1
        } else {
            ((prompt_width as f64 / max_chars_per_line as f64).ceil() + 1.0) as u16
        };
        let padding = area.height.saturating_sub(prompt_occupied_lines + 4) / 2;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Length(padding),
                Constraint::Length(2),
                Constraint::Length(prompt_occupied_lines),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        let status = format!(
            "{}{:.1}s   {} wpm   {}% acc   streak {}",
            if self.caption.is_empty() {
                String::new()
            } else {
                format!("{}   ", self.caption)
            },
            self.remaining_secs,
            self.metrics.wpm,
            self.metrics.accuracy_percent,
            self.metrics.correct_streak
        );
        Paragraph::new(Span::styled(status, dim_bold_style))
            .alignment(Alignment::Center)
            .render(chunks[1], buf);

        Paragraph::new(self.passage_line())
            .alignment(if prompt_occupied_lines == 1 {
                Alignment::Center
            } else {
                Alignment::Left
            })
            .wrap(Wrap { trim: true })
            .render(chunks[2], buf);

        let legend = if self.started {
            "(enter) restart / (tab) next tier / (esc)ape"
        } else {
            "start typing to begin / (tab) next tier / (esc)ape"
        };
        Paragraph::new(Span::styled(legend, italic_style))
            .alignment(Alignment::Center)
            .render(chunks[4], buf);
    }

    fn render_results(&self, result: &SessionResult, area: Rect, buf: &mut Buffer) {
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);
        let magenta_style = Style::default().fg(Color::Magenta);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Min(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(area);

        let samples = result.wpm_series.samples();
        let (overall_duration, highest_wpm) =
            charting::compute_chart_params(samples, result.duration_secs);
        let coords = result.wpm_series.coords();
        let datasets = vec![Dataset::default()
            .marker(Marker::Braille)
            .style(magenta_style)
            .graph_type(GraphType::Line)
            .data(&coords)];

        Chart::new(datasets)
            .x_axis(
                Axis::default()
                    .title("seconds")
                    .bounds([0.0, overall_duration])
                    .labels(vec![
                        Span::styled("0", bold_style),
                        Span::styled(charting::format_label(overall_duration), bold_style),
                    ]),
            )
            .y_axis(
                Axis::default()
                    .title("wpm")
                    .bounds([0.0, highest_wpm])
                    .labels(vec![
                        Span::styled("0", bold_style),
                        Span::styled(charting::format_label(highest_wpm), bold_style),
                    ]),
            )
            .render(chunks[0], buf);

        let m = &result.metrics;
        Paragraph::new(Span::styled(
            format!(
                "{} wpm   {}% acc   {:.2} sd",
                m.wpm, m.accuracy_percent, result.wpm_std_dev
            ),
            bold_style,
        ))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

        Paragraph::new(Span::styled(
            format!(
                "{} words   {}/{} keystrokes   best streak {}   {} {}s",
                m.correct_word_count,
                m.correct_keystrokes,
                m.total_keystrokes,
                result.best_streak,
                result.tier,
                result.duration_secs
            ),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .render(chunks[2], buf);

        Paragraph::new(Span::styled(
            "(enter) retry / (tab) next tier / (esc)ape",
            italic_style,
        ))
        .render(chunks[4], buf);
    }
}

impl RenderSink for View {
    fn on_passage(&mut self, passage: &Passage) {
        self.words = passage.words().to_vec();
        self.statuses = self
            .words
            .iter()
            .map(|w| vec![LetterStatus::Pending; w.len()])
            .collect();
        self.metrics = Metrics::default();
        self.started = false;
        self.result = None;
    }

    fn on_letters(&mut self, deltas: &[LetterDelta]) {
        self.started = true;
        for d in deltas {
            if let Some(slot) = self
                .statuses
                .get_mut(d.position.word)
                .and_then(|w| w.get_mut(d.position.letter))
            {
                *slot = d.status;
            }
        }
    }

    fn on_metrics(&mut self, metrics: &Metrics, remaining_secs: f64) {
        self.metrics = *metrics;
        self.remaining_secs = remaining_secs;
    }

    fn on_complete(&mut self, result: &SessionResult) {
        self.result = Some(result.clone());
    }

    fn on_clear(&mut self) {
        let caption = std::mem::take(&mut self.caption);
        *self = Self {
            caption,
            ..Self::default()
        };
    }
}

impl Widget for &View {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match &self.result {
            Some(result) => self.render_results(result, area, buf),
            None => self.render_typing(area, buf),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passage::CursorPosition;
    use ratatui::{backend::TestBackend, Terminal};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_view_mirrors_deltas() {
        let mut view = View::new();
        view.on_passage(&Passage::parse("ab c").unwrap());

        view.on_letters(&[
            LetterDelta::new(CursorPosition::new(0, 0), LetterStatus::Correct),
            LetterDelta::new(CursorPosition::new(0, 1), LetterStatus::Current),
        ]);

        assert_eq!(view.status(0, 0), Some(LetterStatus::Correct));
        assert_eq!(view.status(0, 1), Some(LetterStatus::Current));
        assert_eq!(view.status(1, 0), Some(LetterStatus::Pending));
        assert_eq!(view.prompt_text(), "ab c");
    }

    #[test]
    fn test_out_of_range_delta_is_ignored() {
        let mut view = View::new();
        view.on_passage(&Passage::parse("a").unwrap());
        view.on_letters(&[LetterDelta::new(
            CursorPosition::new(4, 4),
            LetterStatus::Correct,
        )]);
        assert_eq!(view.status(0, 0), Some(LetterStatus::Pending));
    }

    #[test]
    fn test_render_typing_screen() {
        let mut view = View::new();
        view.set_caption("easy");
        view.on_passage(&Passage::parse("hello world").unwrap());
        view.on_metrics(&Metrics::default(), 30.0);

        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|f| f.render_widget(&view, f.area())).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("hello world"));
        assert!(text.contains("30.0s"));
        assert!(text.contains("start typing"));
    }

    #[test]
    fn test_clear_drops_passage_and_result() {
        let mut view = View::new();
        view.set_caption("hard");
        view.on_passage(&Passage::parse("ab").unwrap());
        view.on_letters(&[LetterDelta::new(
            CursorPosition::new(0, 0),
            LetterStatus::Correct,
        )]);
        view.on_clear();

        assert_eq!(view.prompt_text(), "");
        assert_eq!(view.status(0, 0), None);
        assert!(view.result().is_none());
        assert_eq!(*view.metrics(), Metrics::default());

        let mut terminal = Terminal::new(TestBackend::new(60, 10)).unwrap();
        terminal.draw(|f| f.render_widget(&view, f.area())).unwrap();
        assert!(buffer_text(&terminal).contains("hard"));
    }

    #[test]
    fn test_new_passage_clears_result() {
        let mut view = View::new();
        view.on_passage(&Passage::parse("x").unwrap());
        view.on_letters(&[LetterDelta::new(
            CursorPosition::new(0, 0),
            LetterStatus::Incorrect,
        )]);
        view.on_passage(&Passage::parse("y z").unwrap());

        assert!(view.result().is_none());
        assert_eq!(view.status(0, 0), Some(LetterStatus::Pending));
        assert_eq!(view.prompt_text(), "y z");
    }
}
