//! Dashboard service.
//!
//! Aggregates the counters shown on the admin landing page.

use lisan_common::AppResult;
use lisan_db::repositories::{
    AnnouncementRepository, FeedbackRepository, LearningModuleRepository, LessonRepository,
    UserRepository,
};
use serde::Serialize;

/// Aggregate counters for the admin dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: u64,
    pub verified_users: u64,
    pub premium_users: u64,
    pub active_announcements: u64,
    pub published_modules: u64,
    pub total_lessons: u64,
    pub pending_feedback: u64,
}

/// Service computing dashboard statistics.
#[derive(Clone)]
pub struct DashboardService {
    user_repo: UserRepository,
    announcement_repo: AnnouncementRepository,
    module_repo: LearningModuleRepository,
    lesson_repo: LessonRepository,
    feedback_repo: FeedbackRepository,
}

impl DashboardService {
    /// Create a new dashboard service.
    #[must_use]
    pub const fn new(
        user_repo: UserRepository,
        announcement_repo: AnnouncementRepository,
        module_repo: LearningModuleRepository,
        lesson_repo: LessonRepository,
        feedback_repo: FeedbackRepository,
    ) -> Self {
        Self {
            user_repo,
            announcement_repo,
            module_repo,
            lesson_repo,
            feedback_repo,
        }
    }

    /// Compute the current dashboard counters.
    pub async fn stats(&self) -> AppResult<DashboardStats> {
        let total_users = self.user_repo.count().await?;
        let verified_users = self.user_repo.count_verified().await?;
        let premium_users = self.user_repo.count_premium().await?;
        let active_announcements = self.announcement_repo.count_active().await?;
        let published_modules = self.module_repo.count_published().await?;
        let total_lessons = self.lesson_repo.count().await?;
        let pending_feedback = self.feedback_repo.count_pending().await?;

        Ok(DashboardStats {
            total_users,
            verified_users,
            premium_users,
            active_announcements,
            published_modules,
            total_lessons,
            pending_feedback,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_stats_aggregates_counters() {
        let counts = [100_i64, 40, 25, 3, 8, 120, 5];
        let mut mock = MockDatabase::new(DatabaseBackend::Postgres);
        for n in counts {
            mock = mock.append_query_results([[maplit::btreemap! {
                "num_items" => sea_orm::Value::BigInt(Some(n))
            }]]);
        }
        let db = Arc::new(mock.into_connection());

        let service = DashboardService::new(
            UserRepository::new(db.clone()),
            AnnouncementRepository::new(db.clone()),
            LearningModuleRepository::new(db.clone()),
            LessonRepository::new(db.clone()),
            FeedbackRepository::new(db),
        );

        let stats = service.stats().await.unwrap();

        assert_eq!(stats.total_users, 100);
        assert_eq!(stats.verified_users, 40);
        assert_eq!(stats.premium_users, 25);
        assert_eq!(stats.active_announcements, 3);
        assert_eq!(stats.published_modules, 8);
        assert_eq!(stats.total_lessons, 120);
        assert_eq!(stats.pending_feedback, 5);
    }

    #[test]
    fn test_stats_serialize_camel_case() {
        let stats = DashboardStats {
            total_users: 1,
            verified_users: 1,
            premium_users: 0,
            active_announcements: 0,
            published_modules: 0,
            total_lessons: 0,
            pending_feedback: 0,
        };

        let json = serde_json::to_value(&stats).unwrap();
        assert!(json.get("totalUsers").is_some());
        assert!(json.get("pendingFeedback").is_some());
    }
}
