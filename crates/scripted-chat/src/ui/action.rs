use serde::{
    Deserialize,
    Serialize,
};

use crate::database::ConversationRecord;

/// Messages exchanged between the event loop and the components.
///
/// Every action is broadcast to all components after the [App](super::App)
/// has handled its own side of it, so components react to each other purely
/// through this enum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Tick,
    Render,
    Resize(u16, u16),
    Quit,
    ClearScreen,
    Error(String),
    /// The user pressed Enter in the input bar.
    Submit(String),
    /// The store was re-read; `animate` marks the row whose response should
    /// play the typing animation from the start.
    Conversations {
        list: Vec<ConversationRecord>,
        animate: Option<usize>,
    },
    /// Show the rating bar for the given row.
    OpenRating(usize),
    /// A rating was chosen for the given row.
    Rate { index: usize, rating: u8 },
    /// Show the feedback dialog for the given row.
    OpenFeedback(usize),
    /// Feedback text was submitted for the given row.
    Feedback { index: usize, text: String },
    /// The active rating bar or feedback dialog was dismissed without
    /// submitting.
    CloseOverlay,
    Scroll(Scroll),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scroll {
    Up(u16),
    Down(u16),
}
