use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::types::WsEvent;

pub type WsSender = mpsc::UnboundedSender<WsEvent>;

/// Process-local registry of live connections, keyed by user id. Each user's
/// "room" holds every connection that user currently has open (multiple tabs
/// or devices all receive pushes). Injected through `AppState` so the fan-out
/// path and the socket handler share one instance and tests can build their
/// own.
#[derive(Clone)]
pub struct RoomRegistry {
    rooms: Arc<DashMap<Uuid, HashMap<Uuid, WsSender>>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self {
            rooms: Arc::new(DashMap::new()),
        }
    }

    /// Register a connection under the user's room.
    pub fn join(&self, user_id: Uuid, connection_id: Uuid, sender: WsSender) {
        self.rooms
            .entry(user_id)
            .or_default()
            .insert(connection_id, sender);
    }

    /// Deregister a connection; a no-op when it was never joined. Empty rooms
    /// are dropped.
    pub fn leave(&self, user_id: Uuid, connection_id: Uuid) {
        if let Some(mut room) = self.rooms.get_mut(&user_id) {
            room.remove(&connection_id);
            let empty = room.is_empty();
            drop(room);
            if empty {
                // Re-checked under the shard lock: a join may have landed
                // between the drop above and this call
                self.rooms.remove_if(&user_id, |_, room| room.is_empty());
            }
        }
    }

    /// Push an event to every connection in the user's room; returns how many
    /// sends succeeded. Senders are snapshotted first so a concurrent
    /// join/leave never races the iteration, and a closed channel (connection
    /// torn down mid-publish) is simply skipped.
    pub fn publish(&self, user_id: Uuid, event: WsEvent) -> usize {
        let senders: Vec<WsSender> = match self.rooms.get(&user_id) {
            Some(room) => room.values().cloned().collect(),
            None => return 0,
        };

        let mut delivered = 0;
        for sender in senders {
            if sender.send(event.clone()).is_ok() {
                delivered += 1;
            }
        }
        delivered
    }

    pub fn connection_count(&self, user_id: Uuid) -> usize {
        self.rooms.get(&user_id).map(|room| room.len()).unwrap_or(0)
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::Notification;
    use chrono::Utc;

    fn event(user_id: Uuid) -> WsEvent {
        WsEvent::Notification(Notification {
            id: Uuid::new_v4(),
            user_id,
            message: "hello".to_string(),
            is_read: false,
            created_at: Utc::now(),
        })
    }

    #[tokio::test]
    async fn both_connections_of_a_user_receive_one_publish() {
        let registry = RoomRegistry::new();
        let user_id = Uuid::new_v4();
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();

        registry.join(user_id, Uuid::new_v4(), tx_a);
        registry.join(user_id, Uuid::new_v4(), tx_b);

        let delivered = registry.publish(user_id, event(user_id));

        assert_eq!(delivered, 2);
        assert!(rx_a.try_recv().is_ok());
        assert!(rx_b.try_recv().is_ok());
    }

    #[tokio::test]
    async fn publish_to_empty_room_delivers_nothing() {
        let registry = RoomRegistry::new();
        assert_eq!(registry.publish(Uuid::new_v4(), event(Uuid::new_v4())), 0);
    }

    #[tokio::test]
    async fn other_users_do_not_receive_the_event() {
        let registry = RoomRegistry::new();
        let user_a = Uuid::new_v4();
        let user_b = Uuid::new_v4();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();

        registry.join(user_b, Uuid::new_v4(), tx_b);

        assert_eq!(registry.publish(user_a, event(user_a)), 0);
        assert!(rx_b.try_recv().is_err());
    }

    #[tokio::test]
    async fn leave_removes_only_that_connection() {
        let registry = RoomRegistry::new();
        let user_id = Uuid::new_v4();
        let conn_a = Uuid::new_v4();
        let conn_b = Uuid::new_v4();
        let (tx_a, _rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();

        registry.join(user_id, conn_a, tx_a);
        registry.join(user_id, conn_b, tx_b);
        registry.leave(user_id, conn_a);

        assert_eq!(registry.connection_count(user_id), 1);
        assert_eq!(registry.publish(user_id, event(user_id)), 1);
        assert!(rx_b.try_recv().is_ok());
    }

    #[tokio::test]
    async fn leave_is_idempotent() {
        let registry = RoomRegistry::new();
        let user_id = Uuid::new_v4();
        let conn = Uuid::new_v4();
        let (tx, _rx) = mpsc::unbounded_channel();

        registry.join(user_id, conn, tx);
        registry.leave(user_id, conn);
        registry.leave(user_id, conn);
        registry.leave(Uuid::new_v4(), Uuid::new_v4());

        assert_eq!(registry.connection_count(user_id), 0);
    }

    #[tokio::test]
    async fn rejoin_after_leave_receives_again() {
        let registry = RoomRegistry::new();
        let user_id = Uuid::new_v4();
        let conn = Uuid::new_v4();

        let (tx, _rx) = mpsc::unbounded_channel();
        registry.join(user_id, conn, tx);
        registry.leave(user_id, conn);

        let (tx2, mut rx2) = mpsc::unbounded_channel();
        registry.join(user_id, Uuid::new_v4(), tx2);

        assert_eq!(registry.publish(user_id, event(user_id)), 1);
        assert!(rx2.try_recv().is_ok());
    }

    #[tokio::test]
    async fn closed_channel_is_skipped() {
        let registry = RoomRegistry::new();
        let user_id = Uuid::new_v4();
        let (tx_dead, rx_dead) = mpsc::unbounded_channel();
        let (tx_live, mut rx_live) = mpsc::unbounded_channel();
        drop(rx_dead);

        registry.join(user_id, Uuid::new_v4(), tx_dead);
        registry.join(user_id, Uuid::new_v4(), tx_live);

        assert_eq!(registry.publish(user_id, event(user_id)), 1);
        assert!(rx_live.try_recv().is_ok());
    }
}
