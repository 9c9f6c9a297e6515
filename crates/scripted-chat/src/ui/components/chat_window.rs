use crossterm::event::{
    KeyCode,
    KeyEvent,
    KeyEventKind,
    KeyModifiers,
};
use ratatui::style::{
    Color,
    Style,
    Stylize as _,
};
use ratatui::text::{
    Line,
    Span,
};
use ratatui::widgets::{
    Block,
    Borders,
    Paragraph,
    Wrap,
};

use super::{
    Component,
    RatingBar,
};
use crate::database::ConversationRecord;
use crate::ui::action::{
    Action,
    Scroll,
};

/// The conversation history: question/answer rows, the typing animation for
/// the newest answer, row selection, and the inline rating bar.
#[derive(Default)]
pub struct ChatWindow {
    conversations: Vec<ConversationRecord>,
    selected: usize,
    /// Row whose response is currently being typed out, if any.
    animating: Option<usize>,
    /// Characters of the animating response revealed so far.
    typed_chars: usize,
    /// Row being rated, at most one at a time.
    rating: Option<(usize, RatingBar)>,
    /// The feedback dialog is open, so keys belong to it.
    overlay_open: bool,
    scroll: u16,
    /// Pin the view to the bottom (newest row).
    follow: bool,
    /// Bring the selected row into view on the next draw.
    snap_to_selected: bool,
}

impl ChatWindow {
    /// The response text a row currently shows. Only the animation target
    /// renders a prefix; every other row shows its full stored response.
    fn shown_response(&self, index: usize) -> String {
        let Some(record) = self.conversations.get(index) else {
            return String::new();
        };
        if self.animating == Some(index) {
            record.response.chars().take(self.typed_chars).collect()
        } else {
            record.response.clone()
        }
    }

    fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
        self.follow = false;
        self.snap_to_selected = true;
    }

    fn select_next(&mut self) {
        if !self.conversations.is_empty() {
            self.selected = (self.selected + 1).min(self.conversations.len() - 1);
            self.snap_to_selected = true;
        }
    }

    /// One animation step: reveal one more character of the target response.
    /// Returns true when a character was revealed.
    fn advance_animation(&mut self) -> bool {
        let Some(index) = self.animating else {
            return false;
        };
        let total = self
            .conversations
            .get(index)
            .map(|record| record.response.chars().count())
            .unwrap_or_default();
        if self.typed_chars < total {
            self.typed_chars += 1;
            true
        } else {
            self.animating = None;
            false
        }
    }
}

impl Component for ChatWindow {
    fn draw(&mut self, f: &mut ratatui::Frame<'_>, rect: ratatui::prelude::Rect) -> eyre::Result<()> {
        let inner_width = rect.width.saturating_sub(2).max(1);
        let inner_height = rect.height.saturating_sub(2);
        let estimate = |text_chars: usize| (text_chars as u16 / inner_width) + 1;

        let mut lines: Vec<Line<'_>> = Vec::new();
        // Wrap-estimated first display line of each row, for scrolling.
        let mut row_offsets: Vec<u16> = Vec::new();
        let mut total_lines: u16 = 0;

        if self.conversations.is_empty() {
            lines.push(Line::from(Span::styled(
                "Ask a question to get started.",
                Style::default().fg(Color::DarkGray),
            )));
        }

        for (index, record) in self.conversations.iter().enumerate() {
            row_offsets.push(total_lines);
            let marker = if index == self.selected { "› " } else { "  " };

            let question = format!("{marker}Q: {}", record.question);
            total_lines += estimate(question.chars().count());
            lines.push(Line::from(Span::styled(
                question,
                Style::default().fg(Color::Cyan).bold(),
            )));

            let shown = self.shown_response(index);
            let answer = format!("  A: {shown}");
            total_lines += estimate(answer.chars().count());
            lines.push(Line::from(vec![
                Span::styled("  A: ", Style::default().fg(Color::Green).bold()),
                Span::raw(shown),
            ]));

            match &self.rating {
                Some((rating_index, bar)) if *rating_index == index => {
                    let mut spans = vec![Span::raw("  Rate: ")];
                    spans.extend(bar.line().spans);
                    lines.push(Line::from(spans));
                    total_lines += 1;
                },
                _ if record.rating > 0 => {
                    let mut spans = vec![Span::raw("  ")];
                    spans.extend(RatingBar::display(record.rating).line().spans);
                    lines.push(Line::from(spans));
                    total_lines += 1;
                },
                _ => {},
            }

            if !record.feedback.is_empty() {
                for (i, feedback_line) in record.feedback.lines().enumerate() {
                    let prefix = if i == 0 { "  Feedback: " } else { "            " };
                    let text = format!("{prefix}{feedback_line}");
                    total_lines += estimate(text.chars().count());
                    lines.push(Line::from(Span::styled(text, Style::default().fg(Color::DarkGray))));
                }
            }

            lines.push(Line::from(""));
            total_lines += 1;
        }

        let max_scroll = total_lines.saturating_sub(inner_height);
        if self.follow {
            self.scroll = max_scroll;
        } else if self.snap_to_selected {
            if let Some(&row_start) = row_offsets.get(self.selected) {
                let row_end = row_offsets
                    .get(self.selected + 1)
                    .copied()
                    .unwrap_or(total_lines);
                if row_start < self.scroll {
                    self.scroll = row_start;
                } else if row_end > self.scroll + inner_height {
                    self.scroll = row_end.saturating_sub(inner_height);
                }
            }
            self.snap_to_selected = false;
        }
        self.scroll = self.scroll.min(max_scroll);

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Blue))
                    .title(" Chat "),
            )
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0));

        f.render_widget(paragraph, rect);

        Ok(())
    }

    fn handle_key_events(&mut self, key: KeyEvent) -> eyre::Result<Option<Action>> {
        if key.kind != KeyEventKind::Press || self.overlay_open {
            return Ok(None);
        }

        // An active rating bar captures the keyboard for its row.
        if let Some((index, bar)) = &mut self.rating {
            let index = *index;
            if key.code == KeyCode::Esc {
                return Ok(Some(Action::CloseOverlay));
            }
            if let Some(rating) = bar.handle_key(key) {
                return Ok(Some(Action::Rate { index, rating }));
            }
            return Ok(None);
        }

        match (key.code, key.modifiers) {
            (KeyCode::Up, _) => {
                self.select_previous();
                Ok(Some(Action::Render))
            },
            (KeyCode::Down, _) => {
                self.select_next();
                Ok(Some(Action::Render))
            },
            (KeyCode::Char('r'), KeyModifiers::CONTROL) if !self.conversations.is_empty() => {
                Ok(Some(Action::OpenRating(self.selected)))
            },
            (KeyCode::Char('f'), KeyModifiers::CONTROL) if !self.conversations.is_empty() => {
                Ok(Some(Action::OpenFeedback(self.selected)))
            },
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: Action) -> eyre::Result<Option<Action>> {
        match action {
            Action::Tick => {
                if self.advance_animation() {
                    return Ok(Some(Action::Render));
                }
            },
            Action::Conversations { list, animate } => {
                self.conversations = list;
                // Any visible rating bar is stale after a refresh.
                self.rating = None;
                if let Some(index) = animate {
                    self.animating = Some(index);
                    self.typed_chars = 0;
                    self.selected = index;
                    self.follow = true;
                }
                self.selected = self.selected.min(self.conversations.len().saturating_sub(1));
                return Ok(Some(Action::Render));
            },
            Action::OpenRating(index) => {
                if let Some(record) = self.conversations.get(index) {
                    self.rating = Some((index, RatingBar::new(record.rating)));
                    self.selected = index;
                    self.snap_to_selected = true;
                    return Ok(Some(Action::Render));
                }
            },
            Action::OpenFeedback(_) => {
                self.overlay_open = true;
            },
            Action::Feedback { .. } | Action::CloseOverlay => {
                self.overlay_open = false;
                self.rating = None;
                return Ok(Some(Action::Render));
            },
            Action::Scroll(scroll) => {
                self.follow = false;
                match scroll {
                    Scroll::Up(n) => self.scroll = self.scroll.saturating_sub(n),
                    Scroll::Down(n) => self.scroll = self.scroll.saturating_add(n),
                }
                return Ok(Some(Action::Render));
            },
            _ => {},
        }

        Ok(None)
    }
}
