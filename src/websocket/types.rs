use crate::notification::Notification;
use serde::Serialize;

/// Server-to-client events, one JSON text frame each.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsEvent {
    Notification(Notification),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn notification_event_is_tagged() {
        let event = WsEvent::Notification(Notification {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            message: "New task \"demo\" created".to_string(),
            is_read: false,
            created_at: Utc::now(),
        });

        let json: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "notification");
        assert_eq!(json["read"], false);
        assert_eq!(json["message"], "New task \"demo\" created");
    }
}
