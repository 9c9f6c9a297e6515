use std::io::{
    Stdout,
    stdout,
};
use std::time::Duration;

use crossterm::cursor;
use crossterm::event::{
    Event as CrosstermEvent,
    EventStream,
    KeyEvent,
    KeyEventKind,
    MouseEvent,
};
use crossterm::terminal::{
    EnterAlternateScreen,
    LeaveAlternateScreen,
};
use eyre::Result;
use futures::StreamExt;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc::{
    UnboundedReceiver,
    UnboundedSender,
    unbounded_channel,
};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Raw events produced by the terminal plus the two timers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Init,
    Error,
    Tick,
    Render,
    FocusGained,
    FocusLost,
    Paste(String),
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
}

/// Terminal guard plus the event pump.
///
/// `tick_rate` drives animation stepping (ticks per second), `frame_rate`
/// drives redraws. The pump task is cancelled on [Tui::exit], so no timer
/// outlives the view.
pub struct Tui {
    pub terminal: Terminal<CrosstermBackend<Stdout>>,
    pub event_rx: Option<UnboundedReceiver<Event>>,
    pub event_tx: UnboundedSender<Event>,
    pub tick_rate: f64,
    pub frame_rate: f64,
    task: Option<JoinHandle<()>>,
    cancellation_token: CancellationToken,
}

impl Tui {
    pub fn new(tick_rate: f64, frame_rate: f64) -> Result<Self> {
        let (event_tx, event_rx) = unbounded_channel();
        Ok(Self {
            terminal: Terminal::new(CrosstermBackend::new(stdout()))?,
            event_rx: Some(event_rx),
            event_tx,
            tick_rate,
            frame_rate,
            task: None,
            cancellation_token: CancellationToken::new(),
        })
    }

    /// Enters raw mode and the alternate screen, then starts the event pump.
    pub fn enter(&mut self) -> Result<()> {
        crossterm::terminal::enable_raw_mode()?;
        crossterm::execute!(stdout(), EnterAlternateScreen, cursor::Hide)?;
        self.start();
        Ok(())
    }

    fn start(&mut self) {
        let tick_delay = Duration::from_secs_f64(1.0 / self.tick_rate);
        let render_delay = Duration::from_secs_f64(1.0 / self.frame_rate);
        self.cancellation_token = CancellationToken::new();
        let cancellation_token = self.cancellation_token.clone();
        let event_tx = self.event_tx.clone();

        self.task = Some(tokio::spawn(async move {
            let mut reader = EventStream::new();
            let mut tick_interval = tokio::time::interval(tick_delay);
            let mut render_interval = tokio::time::interval(render_delay);
            let _ = event_tx.send(Event::Init);

            loop {
                tokio::select! {
                    _ = cancellation_token.cancelled() => break,
                    _ = tick_interval.tick() => {
                        let _ = event_tx.send(Event::Tick);
                    },
                    _ = render_interval.tick() => {
                        let _ = event_tx.send(Event::Render);
                    },
                    maybe_event = reader.next() => {
                        match maybe_event {
                            Some(Ok(event)) => match event {
                                CrosstermEvent::Key(key) if key.kind != KeyEventKind::Repeat => {
                                    let _ = event_tx.send(Event::Key(key));
                                },
                                CrosstermEvent::Key(_) => {},
                                CrosstermEvent::Mouse(mouse) => {
                                    let _ = event_tx.send(Event::Mouse(mouse));
                                },
                                CrosstermEvent::Resize(x, y) => {
                                    let _ = event_tx.send(Event::Resize(x, y));
                                },
                                CrosstermEvent::FocusGained => {
                                    let _ = event_tx.send(Event::FocusGained);
                                },
                                CrosstermEvent::FocusLost => {
                                    let _ = event_tx.send(Event::FocusLost);
                                },
                                CrosstermEvent::Paste(text) => {
                                    let _ = event_tx.send(Event::Paste(text));
                                },
                            },
                            Some(Err(_)) => {
                                let _ = event_tx.send(Event::Error);
                            },
                            None => break,
                        }
                    },
                }
            }
        }));
    }

    /// Stops the event pump and restores the terminal.
    pub fn exit(&mut self) -> Result<()> {
        self.cancellation_token.cancel();
        if crossterm::terminal::is_raw_mode_enabled()? {
            self.terminal.flush()?;
            crossterm::execute!(stdout(), LeaveAlternateScreen, cursor::Show)?;
            crossterm::terminal::disable_raw_mode()?;
        }
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        if let Err(err) = self.exit() {
            tracing::error!("failed to restore terminal: {err}");
        }
    }
}

/// Best-effort terminal restore, safe to call from a panic hook or after the
/// render task has already dropped the [Tui].
pub fn restore() -> Result<()> {
    if crossterm::terminal::is_raw_mode_enabled()? {
        crossterm::execute!(stdout(), LeaveAlternateScreen, cursor::Show)?;
        crossterm::terminal::disable_raw_mode()?;
    }
    Ok(())
}
