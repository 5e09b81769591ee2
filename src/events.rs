//! In-process "content changed" notifications
//!
//! Views holding a collection subscribe and refetch when a mutation of the
//! same kind is confirmed elsewhere.

use chrono::{DateTime, Utc};
use log::{trace, warn};
use tokio::sync::broadcast;

use crate::models::ContentKind;

/// Topic name carried by every notification
pub const CHANGE_TOPIC: &str = "waman-data-updated";

#[derive(Debug, Clone, PartialEq)]
pub struct ContentChanged {
    pub topic: &'static str,
    pub kind: ContentKind,
    pub at: DateTime<Utc>,
}

/// Publish/subscribe channel for content changes
#[derive(Debug, Clone)]
pub struct ChangeBus {
    sender: broadcast::Sender<ContentChanged>,
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new(64)
    }
}

impl ChangeBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Notify subscribers; returns how many received it
    pub fn publish(&self, kind: ContentKind) -> usize {
        let event = ContentChanged {
            topic: CHANGE_TOPIC,
            kind,
            at: Utc::now(),
        };
        match self.sender.send(event) {
            Ok(receivers) => receivers,
            Err(_) => {
                trace!("no subscribers for {} change", kind);
                0
            }
        }
    }

    pub fn subscribe(&self) -> ChangeSubscription {
        ChangeSubscription {
            receiver: self.sender.subscribe(),
            kinds: None,
        }
    }

    /// Subscription that only yields changes to `kinds`
    pub fn subscribe_to(&self, kinds: &[ContentKind]) -> ChangeSubscription {
        ChangeSubscription {
            receiver: self.sender.subscribe(),
            kinds: Some(kinds.to_vec()),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

pub struct ChangeSubscription {
    receiver: broadcast::Receiver<ContentChanged>,
    kinds: Option<Vec<ContentKind>>,
}

impl ChangeSubscription {
    fn wants(&self, kind: ContentKind) -> bool {
        self.kinds.as_ref().map_or(true, |kinds| kinds.contains(&kind))
    }

    /// Next relevant change; `None` once every bus handle is dropped.
    ///
    /// A subscriber that falls behind skips the missed notifications. Any
    /// later one still triggers a full refetch, so nothing is lost.
    pub async fn next(&mut self) -> Option<ContentChanged> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.wants(event.kind) => return Some(event),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    warn!("change subscriber lagged, skipped {} notifications", missed);
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Drain pending notifications without waiting
    pub fn try_next(&mut self) -> Option<ContentChanged> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) if self.wants(event.kind) => return Some(event),
                Ok(_) => continue,
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => return None,
            }
        }
    }
}
