use crossterm::event::{self, Event as CrosstermEvent, KeyEvent};
use futures::StreamExt;
use syspanel::publisher::SnapshotUpdate;
use tokio::sync::mpsc;

#[derive(Clone, Debug)]
pub enum Event {
    Key(KeyEvent),
    Snapshot(SnapshotUpdate),
    Resize,
}

pub struct EventHandler {
    tx: mpsc::UnboundedSender<Event>,
    rx: mpsc::UnboundedReceiver<Event>,
    task: tokio::task::JoinHandle<()>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel::<Event>();

        let input_tx = tx.clone();
        let task = tokio::spawn(async move {
            let mut reader = event::EventStream::new();

            while let Some(maybe_event) = reader.next().await {
                let Ok(evt) = maybe_event else {
                    break;
                };
                let mapped = match evt {
                    CrosstermEvent::Key(key) => Some(Event::Key(key)),
                    CrosstermEvent::Resize(_, _) => Some(Event::Resize),
                    _ => None,
                };
                if let Some(e) = mapped
                    && input_tx.send(e).is_err()
                {
                    break;
                }
            }
        });

        Self { tx, rx, task }
    }

    /// Sender for snapshot pushes. Unbounded, so no update is dropped while
    /// the loop is busy drawing.
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.tx.clone()
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        self.task.abort();
    }
}
