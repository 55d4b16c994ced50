//! Change notification fan-out

use larder_core::ChangeSet;
use tokio::sync::broadcast;

/// Notifications a slow subscriber may fall behind by before it lags
const CHANNEL_CAPACITY: usize = 100;

/// Broadcasts one [`ChangeSet`] per committed transaction
///
/// Subscribers that fall too far behind receive
/// [`broadcast::error::RecvError::Lagged`] and should re-read the graph.
#[derive(Debug, Clone)]
pub struct ChangeNotifier {
    tx: broadcast::Sender<ChangeSet>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeSet> {
        self.tx.subscribe()
    }

    /// Send to every current subscriber. Returns how many received it.
    pub fn publish(&self, changes: ChangeSet) -> usize {
        if changes.is_empty() {
            return 0;
        }
        // no subscribers is not an error
        self.tx.send(changes).unwrap_or(0)
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use larder_core::IngredientId;

    #[tokio::test]
    async fn test_publish_reaches_subscribers() {
        let notifier = ChangeNotifier::new();
        assert_eq!(notifier.publish(ChangeSet::new()), 0);

        let mut rx = notifier.subscribe();
        let mut changes = ChangeSet::new();
        changes.record_created(IngredientId::new());

        assert_eq!(notifier.publish(changes.clone()), 1);
        assert_eq!(rx.recv().await.unwrap(), changes);
    }

    #[test]
    fn test_publish_without_subscribers() {
        let notifier = ChangeNotifier::new();
        let mut changes = ChangeSet::new();
        changes.record_removed(IngredientId::new());
        assert_eq!(notifier.publish(changes), 0);
        assert_eq!(notifier.subscriber_count(), 0);
    }
}
