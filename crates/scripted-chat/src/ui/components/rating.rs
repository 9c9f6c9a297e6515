use crossterm::event::{
    KeyCode,
    KeyEvent,
};
use ratatui::style::{
    Color,
    Style,
};
use ratatui::text::{
    Line,
    Span,
};

const MAX_RATING: u8 = 5;

/// Five-star rating widget.
///
/// The widget only reports a chosen value; persisting it is the caller's
/// job. The same widget renders already-rated rows read-only, in which case
/// key handling is a no-op.
#[derive(Debug, Clone)]
pub struct RatingBar {
    value: u8,
    read_only: bool,
}

impl RatingBar {
    /// Interactive bar, pre-selected with the row's current rating.
    pub fn new(initial: u8) -> Self {
        Self {
            value: initial.min(MAX_RATING),
            read_only: false,
        }
    }

    /// Read-only display of an existing rating.
    pub fn display(value: u8) -> Self {
        Self {
            value: value.min(MAX_RATING),
            read_only: true,
        }
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    /// Handles a key, returning the chosen rating once one is confirmed.
    ///
    /// Digits 1-5 choose immediately (the keyboard equivalent of clicking a
    /// star); Left/Right adjust the preview and Enter confirms it.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<u8> {
        if self.read_only {
            return None;
        }
        match key.code {
            KeyCode::Char(c @ '1'..='5') => {
                self.value = c as u8 - b'0';
                Some(self.value)
            },
            KeyCode::Left => {
                self.value = self.value.saturating_sub(1).max(1);
                None
            },
            KeyCode::Right => {
                self.value = (self.value + 1).min(MAX_RATING);
                None
            },
            KeyCode::Enter if (1..=MAX_RATING).contains(&self.value) => Some(self.value),
            _ => None,
        }
    }

    pub fn line(&self) -> Line<'static> {
        let mut spans = Vec::new();
        for position in 1..=MAX_RATING {
            if position <= self.value {
                spans.push(Span::styled("★ ", Style::default().fg(Color::Yellow)));
            } else {
                spans.push(Span::styled("☆ ", Style::default().fg(Color::DarkGray)));
            }
        }
        if !self.read_only {
            spans.push(Span::styled(
                " (1-5 or ←/→, Enter to confirm, Esc to cancel)",
                Style::default().fg(Color::DarkGray),
            ));
        }
        Line::from(spans)
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_digit_chooses_exactly_that_value() {
        for k in 1..=5u8 {
            let mut bar = RatingBar::new(0);
            let chosen = bar.handle_key(key(KeyCode::Char((b'0' + k) as char)));
            assert_eq!(chosen, Some(k));
        }
    }

    #[test]
    fn test_arrows_preview_enter_confirms() {
        let mut bar = RatingBar::new(0);
        assert_eq!(bar.handle_key(key(KeyCode::Right)), None);
        assert_eq!(bar.handle_key(key(KeyCode::Right)), None);
        assert_eq!(bar.value(), 2);
        assert_eq!(bar.handle_key(key(KeyCode::Left)), None);
        assert_eq!(bar.handle_key(key(KeyCode::Enter)), Some(1));
    }

    #[test]
    fn test_enter_without_selection_does_nothing() {
        let mut bar = RatingBar::new(0);
        assert_eq!(bar.handle_key(key(KeyCode::Enter)), None);
    }

    #[test]
    fn test_value_stays_in_bounds() {
        let mut bar = RatingBar::new(5);
        bar.handle_key(key(KeyCode::Right));
        assert_eq!(bar.value(), 5);

        let mut bar = RatingBar::new(1);
        bar.handle_key(key(KeyCode::Left));
        assert_eq!(bar.value(), 1);
    }

    #[test]
    fn test_read_only_reports_nothing() {
        let mut bar = RatingBar::display(3);
        assert_eq!(bar.handle_key(key(KeyCode::Char('5'))), None);
        assert_eq!(bar.handle_key(key(KeyCode::Enter)), None);
        assert_eq!(bar.value(), 3);
    }

    #[test]
    fn test_display_clamps_out_of_range_values() {
        assert_eq!(RatingBar::display(9).value(), 5);
    }
}
