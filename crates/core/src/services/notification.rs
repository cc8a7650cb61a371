//! Notification service.

use chrono::Utc;
use lectro_common::{AppResult, IdGenerator};
use lectro_db::{entities::notification, repositories::NotificationRepository};
use sea_orm::{ConnectionTrait, Set};

/// Number of notifications returned by [`NotificationService::list_for_user`].
pub const NOTIFICATION_LIST_LIMIT: u64 = 20;

/// A notification that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationDraft {
    pub user_id: String,
    pub title: String,
    pub message: String,
}

impl NotificationDraft {
    /// Address a notification to a user.
    pub fn new(
        user_id: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Notification service for business logic.
#[derive(Clone)]
pub struct NotificationService {
    notification_repo: NotificationRepository,
    id_gen: IdGenerator,
}

impl NotificationService {
    /// Create a new notification service.
    #[must_use]
    pub const fn new(notification_repo: NotificationRepository) -> Self {
        Self {
            notification_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Store drafts as unread notifications on the caller's connection.
    ///
    /// All drafts go out in one insert. Returns how many were written.
    pub async fn emit<C>(&self, conn: &C, drafts: Vec<NotificationDraft>) -> AppResult<u64>
    where
        C: ConnectionTrait,
    {
        let now = Utc::now();
        let models = drafts
            .into_iter()
            .map(|draft| notification::ActiveModel {
                id: Set(self.id_gen.generate()),
                user_id: Set(draft.user_id),
                title: Set(draft.title),
                message: Set(draft.message),
                is_read: Set(false),
                created_at: Set(now.into()),
            })
            .collect();

        self.notification_repo.insert_many_in(conn, models).await
    }

    /// The most recent notifications for a user, newest first.
    pub async fn list_for_user(&self, user_id: &str) -> AppResult<Vec<notification::Model>> {
        self.notification_repo
            .find_by_user(user_id, NOTIFICATION_LIST_LIMIT)
            .await
    }

    /// Mark one notification as read.
    ///
    /// A notification belonging to another user, or one that does not
    /// exist, is silently ignored.
    pub async fn mark_as_read(&self, user_id: &str, notification_id: &str) -> AppResult<()> {
        let updated = self
            .notification_repo
            .mark_as_read_for_user(notification_id, user_id)
            .await?;

        if updated == 0 {
            tracing::debug!(user_id, notification_id, "No notification marked as read");
        }

        Ok(())
    }

    /// Mark all notifications as read.
    pub async fn mark_all_as_read(&self, user_id: &str) -> AppResult<u64> {
        self.notification_repo.mark_all_as_read(user_id).await
    }

    /// Count unread notifications.
    pub async fn count_unread(&self, user_id: &str) -> AppResult<u64> {
        self.notification_repo.count_unread(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn service(db: &Arc<sea_orm::DatabaseConnection>) -> NotificationService {
        NotificationService::new(NotificationRepository::new(Arc::clone(db)))
    }

    #[tokio::test]
    async fn test_emit_writes_one_batch() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 2,
                }])
                .into_connection(),
        );

        let service = service(&db);
        let written = service
            .emit(
                db.as_ref(),
                vec![
                    NotificationDraft::new("lecA", "Swap Approved by HOD", "approved"),
                    NotificationDraft::new("lecB", "Swap Approved by HOD", "approved"),
                ],
            )
            .await
            .unwrap();

        assert_eq!(written, 2);
    }

    #[tokio::test]
    async fn test_emit_nothing() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = service(&db);
        let written = service.emit(db.as_ref(), Vec::new()).await.unwrap();

        assert_eq!(written, 0);
    }

    #[tokio::test]
    async fn test_mark_as_read_foreign_is_silent() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let service = service(&db);
        let result = service.mark_as_read("user1", "someone-elses").await;

        assert!(result.is_ok());
    }
}
