use crossterm::event::{self, KeyEvent, KeyEventKind};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::warn;

#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Polls the terminal on its own thread and forwards events to the main loop.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    _tx: mpsc::UnboundedSender<Event>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let event_tx = tx.clone();

        std::thread::spawn(move || {
            loop {
                let event = match event::poll(tick_rate) {
                    Ok(true) => match event::read() {
                        // Releases and repeats would double every keystroke
                        Ok(event::Event::Key(key)) if key.kind == KeyEventKind::Press => {
                            Event::Key(key)
                        }
                        Ok(event::Event::Resize(_, _)) => Event::Resize,
                        Ok(_) => continue,
                        Err(e) => {
                            warn!("Failed to read terminal event: {}", e);
                            continue;
                        }
                    },
                    Ok(false) => Event::Tick,
                    Err(e) => {
                        warn!("Failed to poll terminal: {}", e);
                        std::thread::sleep(tick_rate);
                        Event::Tick
                    }
                };

                if event_tx.send(event).is_err() {
                    break;
                }
            }
        });

        Self { rx, _tx: tx }
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}
