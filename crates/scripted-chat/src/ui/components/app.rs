use std::sync::Arc;

use crossterm::event::KeyEventKind;
use eyre::Result;
use ratatui::layout::{
    Constraint,
    Layout,
};
use tokio::sync::Mutex;
use tokio::sync::mpsc::unbounded_channel;
use tracing::error;

use super::Component;
use crate::database::{
    ConversationRecord,
    ConversationStore,
};
use crate::script::Script;
use crate::ui::action::Action;
use crate::ui::config::{
    Config,
    Mode,
};
use crate::ui::tui::{
    Event,
    Tui,
};

/// One character of the typing animation per tick: 20 ticks/s = 50 ms/char.
const TYPING_TICKS_PER_SECOND: f64 = 20.0;
const FRAME_RATE: f64 = 60.0;

pub struct App {
    pub config: Config,
    pub should_quit: bool,
    pub store: ConversationStore,
    pub script: Script,
    pub components: Arc<Mutex<Vec<Box<dyn Component>>>>,
}

impl App {
    pub async fn run(&mut self) -> Result<()> {
        let (render_tx, mut render_rx) = unbounded_channel::<()>();
        let (action_tx, mut action_rx) = unbounded_channel::<Action>();

        let mut tui = Tui::new(TYPING_TICKS_PER_SECOND, FRAME_RATE)?;
        tui.enter()?;

        let mut terminal_event_receiver = tui.event_rx.take().expect("Missing event receiver");
        let components_clone = self.components.clone();

        // Render task. Dropping `render_tx` ends it, and dropping `tui` with
        // it restores the terminal.
        tokio::spawn(async move {
            while render_rx.recv().await.is_some() {
                let mut components = components_clone.lock().await;
                let drawn = tui.terminal.draw(|f| {
                    // Chat window on top, input bar fixed at the bottom; the
                    // feedback modal overlays the whole frame.
                    let chunks = Layout::vertical([
                        Constraint::Min(1),
                        Constraint::Length(3),
                    ])
                    .split(f.area());

                    for (i, component) in components.iter_mut().enumerate() {
                        let rect = match i {
                            0 => chunks[0],
                            1 => chunks[1],
                            _ => f.area(),
                        };

                        if let Err(e) = component.draw(f, rect) {
                            error!("Error rendering component {:?}", e);
                        }
                    }
                });
                if let Err(e) = drawn {
                    error!("Error drawing frame: {:?}", e);
                }
            }
        });

        // Event monitoring task: global keybindings first, everything else
        // is offered to each component.
        let config = self.config.clone();
        let action_tx_clone = action_tx.clone();
        let components_clone = self.components.clone();

        tokio::spawn(async move {
            let mut key_event_buf = Vec::<crossterm::event::KeyEvent>::new();

            while let Some(event) = terminal_event_receiver.recv().await {
                let Ok(action) = handle_ui_events(&event, &mut key_event_buf, &config) else {
                    error!("Error converting tui events to action");
                    continue;
                };

                match action {
                    Some(action) => {
                        if let Err(e) = action_tx_clone.send(action) {
                            error!("Error sending action: {:?}", e);
                        }
                    },
                    None => {
                        // The received input did not correspond to any global
                        // action, so let each component handle the event.
                        let mut components = components_clone.lock().await;

                        for component in components.iter_mut() {
                            match component.handle_terminal_events(event.clone()) {
                                Ok(action) => {
                                    if let Some(action) = action {
                                        if let Err(e) = action_tx_clone.send(action) {
                                            error!("Error sending action from component handle event: {:?}", e);
                                        }
                                    }
                                },
                                Err(e) => {
                                    error!("Error handling event by component: {:?}", e);
                                },
                            }
                        }
                    },
                }
            }
        });

        // Seed the view with the persisted history.
        let list = self.store.all().await;
        let _ = action_tx.send(Action::Conversations { list, animate: None });

        // Main loop
        while let Some(action) = action_rx.recv().await {
            match &action {
                Action::Render | Action::ClearScreen => {
                    if let Err(e) = render_tx.send(()) {
                        error!("Error sending rendering message to rendering task: {:?}", e);
                    }
                },
                Action::Quit => self.should_quit = true,
                Action::Submit(input) => {
                    // The response is fixed at ask-time and never recomputed.
                    let response = self.script.respond(input);
                    let record = ConversationRecord::new(input.clone(), response);
                    match self.store.add(record).await {
                        Ok(list) => {
                            let animate = Some(list.len() - 1);
                            let _ = action_tx.send(Action::Conversations { list, animate });
                        },
                        Err(e) => {
                            error!("Failed to persist conversation: {e}");
                            let _ = action_tx.send(Action::Error(e.to_string()));
                        },
                    }
                },
                Action::Rate { index, rating } => {
                    if let Some(record) = self.store.all().await.get(*index) {
                        let mut record = record.clone();
                        record.rating = *rating;
                        match self.store.update(*index, record).await {
                            Ok(list) => {
                                let _ = action_tx.send(Action::Conversations { list, animate: None });
                            },
                            Err(e) => {
                                error!("Failed to persist rating: {e}");
                                let _ = action_tx.send(Action::Error(e.to_string()));
                            },
                        }
                    }
                },
                Action::Feedback { index, text } => {
                    if let Some(record) = self.store.all().await.get(*index) {
                        let mut record = record.clone();
                        record.feedback = text.clone();
                        match self.store.update(*index, record).await {
                            Ok(list) => {
                                let _ = action_tx.send(Action::Conversations { list, animate: None });
                            },
                            Err(e) => {
                                error!("Failed to persist feedback: {e}");
                                let _ = action_tx.send(Action::Error(e.to_string()));
                            },
                        }
                    }
                },
                Action::Tick
                | Action::Resize(_, _)
                | Action::Error(_)
                | Action::Scroll(_)
                | Action::Conversations { .. }
                | Action::OpenRating(_)
                | Action::OpenFeedback(_)
                | Action::CloseOverlay => {},
            }

            {
                let mut components = self.components.lock().await;
                for component in components.iter_mut() {
                    match component.update(action.clone()) {
                        Ok(subsequent_action) => {
                            if let Some(subsequent_action) = subsequent_action {
                                if let Err(e) = action_tx.send(subsequent_action) {
                                    error!("Error sending subsequent action: {:?}", e);
                                }
                            }
                        },
                        Err(e) => error!("Error updating component: {:?}", e),
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }
}

#[inline]
fn handle_ui_events(
    event: &Event,
    key_event_buf: &mut Vec<crossterm::event::KeyEvent>,
    config: &Config,
) -> Result<Option<Action>> {
    match event {
        Event::Tick => Ok(Some(Action::Tick)),
        Event::Render => Ok(Some(Action::Render)),
        Event::Resize(x, y) => Ok(Some(Action::Resize(*x, *y))),
        Event::Key(key) => {
            match key.kind {
                KeyEventKind::Release => {
                    let mut idx = None::<usize>;
                    for (i, event) in key_event_buf.iter().enumerate() {
                        if event.code == key.code {
                            idx.replace(i);
                        }
                    }

                    if let Some(idx) = idx {
                        key_event_buf.remove(idx);
                    }

                    Ok(None)
                },
                KeyEventKind::Press => {
                    let Some(keybindings) = &config.keybindings.0.get(&Mode::default()) else {
                        return Ok(None);
                    };

                    match keybindings.get(&vec![*key]) {
                        Some(action) => Ok(Some(action.clone())),
                        _ => {
                            // If the key was not handled as a single key action,
                            // then consider it for multi-key combinations.
                            key_event_buf.push(*key);

                            // Check for multi-key combinations
                            let action = keybindings.get(key_event_buf).cloned();
                            if action.is_none() && key_event_buf.len() > 3 {
                                key_event_buf.clear();
                            }
                            Ok(action)
                        },
                    }
                },
                KeyEventKind::Repeat => Ok(None),
            }
        },
        Event::Init | Event::Error | Event::FocusGained | Event::FocusLost | Event::Paste(_) | Event::Mouse(_) => {
            Ok(None)
        },
    }
}
