use crossterm::event::{
    KeyEvent,
    MouseEvent,
};
use eyre::Result;
use ratatui::Frame;
use ratatui::layout::Rect;

use super::action::Action;
use super::tui::Event;

mod app;
mod chat_window;
mod feedback_modal;
mod input_bar;
mod rating;

pub use app::*;
pub use chat_window::*;
pub use feedback_modal::*;
pub use input_bar::*;
pub use rating::*;

pub trait Component: Send + Sync + 'static {
    fn init(&mut self) -> Result<()> {
        Ok(())
    }
    fn handle_terminal_events(&mut self, event: Event) -> Result<Option<Action>> {
        let r = match event {
            Event::Key(key_event) => self.handle_key_events(key_event)?,
            Event::Mouse(mouse_event) => self.handle_mouse_events(mouse_event)?,
            _ => None,
        };
        Ok(r)
    }
    #[allow(unused_variables)]
    fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        Ok(None)
    }
    #[allow(unused_variables)]
    fn handle_mouse_events(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        Ok(None)
    }
    #[allow(unused_variables)]
    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        Ok(None)
    }
    fn draw(&mut self, f: &mut Frame<'_>, rect: Rect) -> Result<()>;
}
