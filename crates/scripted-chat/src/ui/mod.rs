pub mod action;
pub mod components;
pub mod config;
pub mod tui;

pub use components::{
    App,
    ChatWindow,
    Component,
    FeedbackModal,
    InputBar,
    RatingBar,
};
