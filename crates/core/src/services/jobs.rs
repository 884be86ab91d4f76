//! Background notification fan-out.
//!
//! Notifications are written as a side effect of other actions (friend
//! added, review liked) and must never fail those actions. Producers hand a
//! task to an in-process queue and move on; a worker owns the actual insert
//! and logs-and-drops anything that goes wrong.

use beanbook_common::IdGenerator;
use beanbook_db::entities::notification;
use beanbook_db::repositories::NotificationRepository;
use chrono::Utc;
use sea_orm::Set;
use tokio::sync::mpsc;

/// Channel buffer size for pending notification writes.
const NOTIFY_BUFFER_SIZE: usize = 1000;

/// A pending notification write.
#[derive(Debug, Clone)]
pub struct NotifyTask {
    /// The user to notify.
    pub user_id: String,
    /// Human-readable event text.
    pub body: String,
}

/// Handle for enqueueing notification writes.
#[derive(Clone)]
pub struct Notifier {
    sender: mpsc::Sender<NotifyTask>,
}

impl Notifier {
    /// Enqueue a notification for a user.
    pub async fn notify(
        &self,
        user_id: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<(), &'static str> {
        self.sender
            .send(NotifyTask {
                user_id: user_id.into(),
                body: body.into(),
            })
            .await
            .map_err(|_| "Notification queue is closed")
    }
}

/// Spawn the notification worker and return the producer handle.
#[must_use]
pub fn start_notification_worker(repo: NotificationRepository) -> Notifier {
    let (sender, receiver) = mpsc::channel(NOTIFY_BUFFER_SIZE);

    tokio::spawn(run_notification_worker(repo, receiver));

    Notifier { sender }
}

/// Drain the queue until every producer handle is dropped.
async fn run_notification_worker(
    repo: NotificationRepository,
    mut receiver: mpsc::Receiver<NotifyTask>,
) {
    let id_gen = IdGenerator::new();

    while let Some(task) = receiver.recv().await {
        let model = notification::ActiveModel {
            id: Set(id_gen.generate()),
            user_id: Set(task.user_id.clone()),
            body: Set(task.body),
            created_at: Set(Utc::now().into()),
        };

        if let Err(e) = repo.create(model).await {
            tracing::warn!(error = %e, user_id = %task.user_id, "Dropping failed notification write");
        }
    }

    tracing::debug!("Notification worker stopped");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn stored(id: &str, user_id: &str, body: &str) -> notification::Model {
        notification::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            body: body.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_worker_writes_queued_tasks_and_stops_on_close() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[stored("n1", "u2", "Theo added you as a friend.")]])
                .into_connection(),
        );
        let repo = NotificationRepository::new(db);

        let (sender, receiver) = mpsc::channel(8);
        let notifier = Notifier { sender };

        notifier
            .notify("u2", "Theo added you as a friend.")
            .await
            .unwrap();
        drop(notifier);

        // Runs to completion once the last producer is gone.
        run_notification_worker(repo, receiver).await;
    }

    #[tokio::test]
    async fn test_worker_survives_failed_insert() {
        // No mock results queued: the insert fails, the worker logs and
        // keeps draining instead of bailing out.
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let repo = NotificationRepository::new(db);

        let (sender, receiver) = mpsc::channel(8);
        let notifier = Notifier { sender };

        notifier.notify("u2", "ignored").await.unwrap();
        drop(notifier);

        run_notification_worker(repo, receiver).await;
    }

    #[tokio::test]
    async fn test_notify_fails_when_worker_is_gone() {
        let (sender, receiver) = mpsc::channel(8);
        drop(receiver);

        let notifier = Notifier { sender };
        let result = notifier.notify("u1", "lost").await;

        assert!(result.is_err());
    }
}
