pub mod database;
pub mod logging;
pub mod script;
pub mod ui;
pub mod util;

use std::sync::Arc;

use database::ConversationStore;
use script::Script;
use ui::config::Config;
use ui::{
    App,
    ChatWindow,
    Component,
    FeedbackModal,
    InputBar,
};

pub fn get_app(store: ConversationStore, script: Script) -> App {
    App {
        config: Config::default(),
        should_quit: false,
        store,
        script,
        components: {
            let mut components = Vec::<Box<dyn Component>>::new();

            // ChatWindow displays the history and drives the typing animation
            components.push(Box::new(ChatWindow::default()));

            // InputBar accepts the user's questions
            components.push(Box::new(InputBar::default()));

            // FeedbackModal overlays the frame when feedback is requested
            components.push(Box::new(FeedbackModal::default()));

            Arc::new(tokio::sync::Mutex::new(components))
        },
    }
}
