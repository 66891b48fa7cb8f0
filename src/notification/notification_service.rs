use super::{notification_models::Notification, notification_repository::NotificationRepository};
use crate::error::Result;
use crate::websocket::{RoomRegistry, WsEvent};
use uuid::Uuid;

/// Durable-then-live delivery: a notification is persisted first, then
/// pushed best-effort to every connection in the target user's room. With no
/// live connection the record still lands in the store and is picked up by
/// the next list fetch.
#[derive(Clone)]
pub struct NotificationService {
    repo: NotificationRepository,
    rooms: RoomRegistry,
}

impl NotificationService {
    pub fn new(repo: NotificationRepository, rooms: RoomRegistry) -> Self {
        Self { repo, rooms }
    }

    pub async fn publish(&self, user_id: Uuid, message: &str) -> Result<Notification> {
        let notification = self.repo.create(user_id, message).await?;

        let delivered = self
            .rooms
            .publish(user_id, WsEvent::Notification(notification.clone()));
        tracing::debug!(%user_id, delivered, "notification pushed");

        Ok(notification)
    }
}
