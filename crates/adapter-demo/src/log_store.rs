//! The visible console: an append-only list of status lines.
//!
//! Flows never touch the [`LogStore`] directly. They hold a [`LogSink`],
//! which queues lines on the app's update channel so every append is applied
//! by the event loop, in arrival order.

use tokio::sync::mpsc::UnboundedSender;

use crate::app::AppEvent;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LogStore {
    entries: Vec<String>,
}

impl LogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: impl Into<String>) {
        self.entries.push(entry.into());
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Write end of the app's update channel, handed to flows and wallet
/// observers.
#[derive(Debug, Clone)]
pub struct LogSink {
    events: UnboundedSender<AppEvent>,
}

impl LogSink {
    pub fn new(events: UnboundedSender<AppEvent>) -> Self {
        Self { events }
    }

    pub fn append(&self, line: impl Into<String>) {
        self.send(AppEvent::Log(line.into()));
    }

    /// Queue any update for the app loop.
    pub fn send(&self, event: AppEvent) {
        if let Err(e) = self.events.send(event) {
            log::debug!("{:?} dropped, app loop has stopped", e.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn append_preserves_order() {
        let mut store = LogStore::new();
        assert!(store.is_empty());
        for i in 0..100 {
            store.append(format!("line {i}"));
        }
        assert_eq!(store.len(), 100);
        for (i, entry) in store.entries().iter().enumerate() {
            assert_eq!(entry, &format!("line {i}"));
        }
    }

    #[test]
    fn duplicate_lines_are_kept() {
        let mut store = LogStore::new();
        store.append("same");
        store.append("same");
        assert_eq!(store.entries(), &["same".to_string(), "same".to_string()]);
    }

    #[test]
    fn sink_queues_lines_in_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sink = LogSink::new(tx);
        sink.append("first");
        sink.clone().append("second");

        let mut store = LogStore::new();
        while let Ok(AppEvent::Log(line)) = rx.try_recv() {
            store.append(line);
        }
        assert_eq!(store.entries(), &["first".to_string(), "second".to_string()]);
    }

    #[test]
    fn sink_survives_closed_loop() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let sink = LogSink::new(tx);
        sink.append("nobody listening");
        sink.send(AppEvent::Disconnected { selection: 1 });
    }

    #[test]
    fn sink_forwards_connection_updates() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        LogSink::new(tx).send(AppEvent::Disconnected { selection: 3 });
        assert_eq!(rx.try_recv().unwrap(), AppEvent::Disconnected { selection: 3 });
    }
}
