use crate::domain::Notification;
use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::warn;

/// Destination for routed notifications (the app's notification store)
///
/// Fire-and-forget: implementations must not block the stream task.
pub trait NotificationSink: Send + Sync {
    fn add_notification(&self, notification: Notification);
}

impl<F> NotificationSink for F
where
    F: Fn(Notification) + Send + Sync,
{
    fn add_notification(&self, notification: Notification) {
        self(notification)
    }
}

/// Sink that forwards notifications to a crossbeam channel
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: Sender<Notification>,
}

impl ChannelSink {
    pub fn new() -> (Self, Receiver<Notification>) {
        let (tx, rx) = unbounded();
        (Self { tx }, rx)
    }
}

impl NotificationSink for ChannelSink {
    fn add_notification(&self, notification: Notification) {
        if let Err(e) = self.tx.send(notification) {
            warn!("[Notifications] Receiver gone, dropping '{}'", e.0.title);
        }
    }
}
