use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::{FutureExt, StreamExt};
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio_util::sync::CancellationToken;

/// Input the application loop reacts to
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Tick,
    Key(KeyEvent),
    Resize(u16, u16),
    /// Reading the terminal failed
    Error(String),
}

impl Event {
    /// Terminal events the dashboard reacts to; key releases and repeats,
    /// mouse and focus changes are dropped.
    fn from_terminal(event: CrosstermEvent) -> Option<Self> {
        match event {
            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
            CrosstermEvent::Resize(w, h) => Some(Event::Resize(w, h)),
            _ => None,
        }
    }
}

/// Terminal input plus a steady tick, delivered over a channel
pub struct EventHandler {
    receiver: mpsc::UnboundedReceiver<Event>,
    cancel: CancellationToken,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        tokio::spawn(read_terminal(sender, tick_rate, cancel.clone()));

        Self { receiver, cancel }
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.receiver.recv().await
    }

    /// Stop the reader task; `next` drains what is queued, then returns `None`
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

async fn read_terminal(sender: UnboundedSender<Event>, tick_rate: Duration, cancel: CancellationToken) {
    let mut reader = EventStream::new();
    let mut ticks = tokio::time::interval(tick_rate);

    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticks.tick() => Some(Event::Tick),
            read = reader.next().fuse() => match read {
                Some(Ok(event)) => Event::from_terminal(event),
                Some(Err(e)) => Some(Event::Error(e.to_string())),
                None => break,
            },
        };

        // The receiver is gone once the app loop has exited
        if event.is_some_and(|event| sender.send(event).is_err()) {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers, MouseEvent, MouseEventKind};

    fn key(kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code: KeyCode::Char('j'),
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_key_press_is_forwarded() {
        let press = key(KeyEventKind::Press);
        assert_eq!(Event::from_terminal(CrosstermEvent::Key(press)), Some(Event::Key(press)));
    }

    #[test]
    fn test_key_release_and_repeat_are_dropped() {
        assert_eq!(Event::from_terminal(CrosstermEvent::Key(key(KeyEventKind::Release))), None);
        assert_eq!(Event::from_terminal(CrosstermEvent::Key(key(KeyEventKind::Repeat))), None);
    }

    #[test]
    fn test_resize_is_forwarded() {
        assert_eq!(Event::from_terminal(CrosstermEvent::Resize(120, 40)), Some(Event::Resize(120, 40)));
    }

    #[test]
    fn test_other_terminal_events_are_dropped() {
        let mouse = MouseEvent {
            kind: MouseEventKind::Moved,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(Event::from_terminal(CrosstermEvent::Mouse(mouse)), None);
        assert_eq!(Event::from_terminal(CrosstermEvent::FocusGained), None);
    }
}
