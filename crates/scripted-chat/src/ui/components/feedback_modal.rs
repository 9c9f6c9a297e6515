use crossterm::event::{
    KeyCode,
    KeyEvent,
    KeyEventKind,
    KeyModifiers,
};
use ratatui::layout::{
    Constraint,
    Flex,
    Layout,
    Rect,
};
use ratatui::style::{
    Color,
    Style,
};
use ratatui::widgets::{
    Block,
    Borders,
    Clear,
    Paragraph,
    Wrap,
};

use super::Component;
use crate::ui::action::Action;

/// Modal dialog capturing free-text feedback for one row.
///
/// Enter inserts a newline, Ctrl+S submits (clearing the field), Esc
/// dismisses without submitting. Empty feedback is a valid submission.
#[derive(Default)]
pub struct FeedbackModal {
    active: bool,
    target: Option<usize>,
    text: String,
}

impl FeedbackModal {
    fn centered(area: Rect) -> Rect {
        let [area] = Layout::horizontal([Constraint::Percentage(60)])
            .flex(Flex::Center)
            .areas(area);
        let [area] = Layout::vertical([Constraint::Percentage(50)])
            .flex(Flex::Center)
            .areas(area);
        area
    }
}

impl Component for FeedbackModal {
    fn draw(&mut self, f: &mut ratatui::Frame<'_>, rect: ratatui::prelude::Rect) -> eyre::Result<()> {
        if !self.active {
            return Ok(());
        }

        let area = Self::centered(rect);
        f.render_widget(Clear, area);

        let paragraph = Paragraph::new(self.text.as_str())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Magenta))
                    .title(" Provide Feedback ")
                    .title_bottom(" Ctrl+S to submit, Esc to close "),
            )
            .wrap(Wrap { trim: false });
        f.render_widget(paragraph, area);

        Ok(())
    }

    fn handle_key_events(&mut self, key: KeyEvent) -> eyre::Result<Option<Action>> {
        if !self.active || key.kind != KeyEventKind::Press {
            return Ok(None);
        }

        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) => {
                self.active = false;
                self.target = None;
                self.text.clear();
                Ok(Some(Action::CloseOverlay))
            },
            (KeyCode::Char('s'), KeyModifiers::CONTROL) => {
                let text = std::mem::take(&mut self.text);
                let Some(index) = self.target.take() else {
                    self.active = false;
                    return Ok(Some(Action::CloseOverlay));
                };
                self.active = false;
                Ok(Some(Action::Feedback { index, text }))
            },
            (KeyCode::Enter, _) => {
                self.text.push('\n');
                Ok(Some(Action::Render))
            },
            (KeyCode::Backspace, _) => {
                self.text.pop();
                Ok(Some(Action::Render))
            },
            (KeyCode::Char(ch), modifiers) if !modifiers.contains(KeyModifiers::CONTROL) => {
                self.text.push(ch);
                Ok(Some(Action::Render))
            },
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: Action) -> eyre::Result<Option<Action>> {
        if let Action::OpenFeedback(index) = action {
            self.active = true;
            self.target = Some(index);
            return Ok(Some(Action::Render));
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    fn type_str(modal: &mut FeedbackModal, text: &str) {
        for ch in text.chars() {
            modal.handle_key_events(key(KeyCode::Char(ch))).unwrap();
        }
    }

    #[test]
    fn test_inactive_modal_ignores_keys() {
        let mut modal = FeedbackModal::default();
        assert_eq!(modal.handle_key_events(key(KeyCode::Char('a'))).unwrap(), None);
    }

    #[test]
    fn test_submit_reports_text_and_clears_field() {
        let mut modal = FeedbackModal::default();
        modal.update(Action::OpenFeedback(2)).unwrap();
        type_str(&mut modal, "very helpful");

        let action = modal.handle_key_events(ctrl('s')).unwrap();
        assert_eq!(
            action,
            Some(Action::Feedback {
                index: 2,
                text: "very helpful".into(),
            })
        );
        assert!(!modal.active);
        assert_eq!(modal.text, "");
    }

    #[test]
    fn test_empty_feedback_is_a_valid_submission() {
        let mut modal = FeedbackModal::default();
        modal.update(Action::OpenFeedback(0)).unwrap();

        let action = modal.handle_key_events(ctrl('s')).unwrap();
        assert_eq!(
            action,
            Some(Action::Feedback {
                index: 0,
                text: String::new(),
            })
        );
    }

    #[test]
    fn test_escape_dismisses_without_reporting() {
        let mut modal = FeedbackModal::default();
        modal.update(Action::OpenFeedback(1)).unwrap();
        type_str(&mut modal, "discarded");

        let action = modal.handle_key_events(key(KeyCode::Esc)).unwrap();
        assert_eq!(action, Some(Action::CloseOverlay));
        assert!(!modal.active);
        assert_eq!(modal.text, "");
    }

    #[test]
    fn test_enter_inserts_newline() {
        let mut modal = FeedbackModal::default();
        modal.update(Action::OpenFeedback(0)).unwrap();
        type_str(&mut modal, "line one");
        modal.handle_key_events(key(KeyCode::Enter)).unwrap();
        type_str(&mut modal, "line two");

        let action = modal.handle_key_events(ctrl('s')).unwrap();
        assert_eq!(
            action,
            Some(Action::Feedback {
                index: 0,
                text: "line one\nline two".into(),
            })
        );
    }
}
