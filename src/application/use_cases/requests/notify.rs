use uuid::Uuid;

use crate::application::dto::notifications::NewNotification;
use crate::application::ports::notification_repository::NotificationRepository;
use crate::domain::maintenance::request::MaintenanceRequest;

async fn send<N: NotificationRepository + ?Sized>(
    notifications: &N,
    recipient_id: Uuid,
    message: String,
    request_id: Uuid,
) {
    let note = NewNotification {
        recipient_id,
        message,
        request_id: Some(request_id),
    };
    if let Err(err) = notifications.create(&note).await {
        tracing::warn!(
            request_id = %request_id,
            recipient_id = %recipient_id,
            error = ?err,
            "notification_create_failed"
        );
    }
}

/// Tells the assigned technician about the request, unless they assigned it themselves.
pub async fn notify_assignment<N: NotificationRepository + ?Sized>(
    notifications: &N,
    request: &MaintenanceRequest,
    actor_id: Uuid,
) {
    let Some(technician_id) = request.technician_id else {
        return;
    };
    if technician_id == actor_id {
        return;
    }
    let message = format!("You have been assigned to '{}'", request.subject);
    send(notifications, technician_id, message, request.id).await;
}

/// Tells the creator and the client about a status change; the actor is skipped.
pub async fn notify_status_change<N: NotificationRepository + ?Sized>(
    notifications: &N,
    request: &MaintenanceRequest,
    actor_id: Uuid,
) {
    let mut recipients: Vec<Uuid> = Vec::with_capacity(2);
    for id in [request.created_by_id, request.client_id].into_iter().flatten() {
        if id != actor_id && !recipients.contains(&id) {
            recipients.push(id);
        }
    }
    for recipient_id in recipients {
        let message = format!("'{}' is now {}", request.subject, request.status.label());
        send(notifications, recipient_id, message, request.id).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::access::RequestScope;
    use crate::application::ports::request_repository::RequestRepository;
    use crate::testing::{Fixture, InMemoryStore};

    #[tokio::test]
    async fn status_message_names_subject_and_label() {
        let store = InMemoryStore::new();
        let fx = Fixture::build(&store);
        let request = RequestRepository::get(&store, &RequestScope::All, fx.client_of)
            .await
            .unwrap()
            .unwrap();
        let client = store.viewer("client");
        let other = store.viewer("other");

        notify_status_change(&store, &request, client.user_id).await;

        assert!(store.notifications_for(client.user_id).is_empty());
        let notes = store.notifications_for(other.user_id);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].message, "'Office AC filter' is now Repaired");
        assert_eq!(notes[0].request_id, Some(fx.client_of));
    }
}
