use crossterm::event::KeyEventKind;
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
};

use super::Component;
use crate::ui::action::Action;

/// Single-line question input. Loses keyboard focus while a rating bar or
/// the feedback dialog is open.
pub struct InputBar {
    input: String,
    cursor_position: usize,
    focused: bool,
}

impl Default for InputBar {
    fn default() -> Self {
        Self {
            input: String::new(),
            cursor_position: 0,
            focused: true,
        }
    }
}

impl InputBar {
    fn move_cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    fn move_cursor_right(&mut self) {
        self.cursor_position = self.cursor_position.saturating_add(1).min(self.input.chars().count());
    }

    fn enter_char(&mut self, new_char: char) {
        let byte_index = self.byte_index();
        self.input.insert(byte_index, new_char);
        self.move_cursor_right();
    }

    fn delete_char(&mut self) {
        if self.cursor_position != 0 {
            let current_index = self.cursor_position;
            let before_char_to_delete = self.input.chars().take(current_index - 1);
            let after_char_to_delete = self.input.chars().skip(current_index);
            self.input = before_char_to_delete.chain(after_char_to_delete).collect();
            self.move_cursor_left();
        }
    }

    fn byte_index(&self) -> usize {
        self.input
            .char_indices()
            .map(|(i, _)| i)
            .nth(self.cursor_position)
            .unwrap_or(self.input.len())
    }

    /// Takes the current text, clearing the field. An empty submission is
    /// allowed; the lookup treats the empty string as matching the first
    /// script entry, like the original.
    fn submit_message(&mut self) -> String {
        let message = std::mem::take(&mut self.input);
        self.cursor_position = 0;
        message
    }
}

impl Component for InputBar {
    fn draw(&mut self, f: &mut ratatui::Frame<'_>, rect: ratatui::prelude::Rect) -> eyre::Result<()> {
        let input = Paragraph::new(Line::from(vec![
            Span::styled(">", Style::default().fg(Color::Red)),
            Span::raw(" "),
            Span::styled(self.input.as_str(), Style::default().fg(Color::Yellow)),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::new().blue())
                .title("Type your question (Enter to ask, ↑/↓ select, Ctrl+R rate, Ctrl+F feedback, Ctrl+C quit)"),
        );
        f.render_widget(input, rect);

        if self.focused {
            f.set_cursor_position((
                // +3 to account for the "> " prefix and the border
                rect.x + self.cursor_position as u16 + 3,
                rect.y + 1,
            ));
        }

        Ok(())
    }

    fn handle_key_events(&mut self, key: crossterm::event::KeyEvent) -> eyre::Result<Option<Action>> {
        if !self.focused {
            return Ok(None);
        }
        if let KeyEventKind::Press = key.kind {
            match key.code {
                crossterm::event::KeyCode::Backspace => {
                    self.delete_char();
                },
                crossterm::event::KeyCode::Enter => {
                    let message = self.submit_message();
                    return Ok(Some(Action::Submit(message)));
                },
                crossterm::event::KeyCode::Left => {
                    self.move_cursor_left();
                },
                crossterm::event::KeyCode::Right => {
                    self.move_cursor_right();
                },
                crossterm::event::KeyCode::Char(ch) if !key.modifiers.contains(crossterm::event::KeyModifiers::CONTROL) => {
                    self.enter_char(ch);
                },
                _ => {},
            }
        }

        Ok(None)
    }

    fn update(&mut self, action: Action) -> eyre::Result<Option<Action>> {
        match action {
            Action::OpenRating(_) | Action::OpenFeedback(_) => self.focused = false,
            Action::Rate { .. } | Action::Feedback { .. } | Action::CloseOverlay => self.focused = true,
            _ => {},
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{
        KeyCode,
        KeyEvent,
        KeyModifiers,
    };

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(bar: &mut InputBar, text: &str) {
        for ch in text.chars() {
            bar.handle_key_events(key(KeyCode::Char(ch))).unwrap();
        }
    }

    #[test]
    fn test_enter_submits_and_clears() {
        let mut bar = InputBar::default();
        type_str(&mut bar, "What is your name?");

        let action = bar.handle_key_events(key(KeyCode::Enter)).unwrap();
        assert_eq!(action, Some(Action::Submit("What is your name?".into())));
        assert_eq!(bar.input, "");
        assert_eq!(bar.cursor_position, 0);
    }

    #[test]
    fn test_empty_submission_is_allowed() {
        let mut bar = InputBar::default();
        let action = bar.handle_key_events(key(KeyCode::Enter)).unwrap();
        assert_eq!(action, Some(Action::Submit(String::new())));
    }

    #[test]
    fn test_backspace_and_cursor_movement() {
        let mut bar = InputBar::default();
        type_str(&mut bar, "abc");
        bar.handle_key_events(key(KeyCode::Left)).unwrap();
        bar.handle_key_events(key(KeyCode::Backspace)).unwrap();
        assert_eq!(bar.input, "ac");
    }

    #[test]
    fn test_unfocused_bar_ignores_keys() {
        let mut bar = InputBar::default();
        bar.update(Action::OpenFeedback(0)).unwrap();
        type_str(&mut bar, "hello");
        assert_eq!(bar.input, "");
        assert_eq!(bar.handle_key_events(key(KeyCode::Enter)).unwrap(), None);

        bar.update(Action::CloseOverlay).unwrap();
        type_str(&mut bar, "hi");
        assert_eq!(bar.input, "hi");
    }
}
