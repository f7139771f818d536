//! Support service: FAQs and user feedback.

use chrono::Utc;
use lisan_common::{AppError, AppResult, IdGenerator, Page, PageRequest};
use lisan_db::{
    entities::faq,
    entities::feedback::{self, FeedbackStatus},
    repositories::{FaqFilter, FaqRepository, FeedbackFilter, FeedbackRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use super::events::{EventAction, EventBus, ResourceKind};

/// Service for managing FAQ entries and feedback submissions.
#[derive(Clone)]
pub struct SupportService {
    faq_repo: FaqRepository,
    feedback_repo: FeedbackRepository,
    events: EventBus,
    id_gen: IdGenerator,
}

/// Input for creating an FAQ entry.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateFaqInput {
    #[validate(length(min = 1, max = 512))]
    pub question: String,

    #[validate(length(min = 1))]
    pub answer: String,

    #[validate(length(min = 1, max = 64))]
    pub category: String,

    /// New entries default to unpublished.
    #[serde(default)]
    pub is_published: bool,
}

/// Input for updating an FAQ entry.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateFaqInput {
    #[validate(length(min = 1, max = 512))]
    pub question: Option<String>,

    #[validate(length(min = 1))]
    pub answer: Option<String>,

    #[validate(length(min = 1, max = 64))]
    pub category: Option<String>,

    pub is_published: Option<bool>,
}

/// Input for submitting feedback.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateFeedbackInput {
    #[validate(length(min = 1, max = 256))]
    pub subject: String,

    #[validate(length(min = 1, max = 4096))]
    pub message: String,
}

impl SupportService {
    /// Create a new support service.
    #[must_use]
    pub const fn new(
        faq_repo: FaqRepository,
        feedback_repo: FeedbackRepository,
        events: EventBus,
    ) -> Self {
        Self {
            faq_repo,
            feedback_repo,
            events,
            id_gen: IdGenerator::new(),
        }
    }

    /// List FAQ entries with search, category and published filters.
    pub async fn list_faqs(
        &self,
        filter: &FaqFilter,
        page: PageRequest,
    ) -> AppResult<Page<faq::Model>> {
        self.faq_repo.list(filter, page).await
    }

    /// Get an FAQ entry by ID.
    pub async fn get_faq(&self, id: &str) -> AppResult<faq::Model> {
        self.faq_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("FAQ not found: {id}")))
    }

    /// Create an FAQ entry.
    pub async fn create_faq(&self, input: CreateFaqInput) -> AppResult<faq::Model> {
        input.validate()?;

        let model = faq::ActiveModel {
            id: Set(self.id_gen.generate()),
            question: Set(input.question),
            answer: Set(input.answer),
            category: Set(input.category),
            is_published: Set(input.is_published),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        };

        let created = self.faq_repo.create(model).await?;

        self.events
            .publish(ResourceKind::Faq, &created.id, EventAction::Created);

        Ok(created)
    }

    /// Update an FAQ entry.
    pub async fn update_faq(&self, id: &str, input: UpdateFaqInput) -> AppResult<faq::Model> {
        input.validate()?;

        let existing = self.get_faq(id).await?;
        let mut active: faq::ActiveModel = existing.into();

        if let Some(question) = input.question {
            active.question = Set(question);
        }
        if let Some(answer) = input.answer {
            active.answer = Set(answer);
        }
        if let Some(category) = input.category {
            active.category = Set(category);
        }
        if let Some(is_published) = input.is_published {
            active.is_published = Set(is_published);
        }

        active.updated_at = Set(Some(Utc::now()));

        let updated = self.faq_repo.update(active).await?;

        self.events
            .publish(ResourceKind::Faq, id, EventAction::Updated);

        Ok(updated)
    }

    /// Publish or unpublish an FAQ entry. Idempotent.
    pub async fn set_faq_published(&self, id: &str, value: bool) -> AppResult<faq::Model> {
        let updated = self.faq_repo.set_published(id, value).await?;
        self.events
            .publish(ResourceKind::Faq, id, EventAction::Toggled);
        Ok(updated)
    }

    /// Delete an FAQ entry.
    pub async fn delete_faq(&self, id: &str) -> AppResult<()> {
        self.faq_repo.delete(id).await?;
        self.events
            .publish(ResourceKind::Faq, id, EventAction::Deleted);
        Ok(())
    }

    /// List feedback with search and status filters.
    pub async fn list_feedback(
        &self,
        filter: &FeedbackFilter,
        page: PageRequest,
    ) -> AppResult<Page<feedback::Model>> {
        self.feedback_repo.list(filter, page).await
    }

    /// Get a feedback entry by ID.
    pub async fn get_feedback(&self, id: &str) -> AppResult<feedback::Model> {
        self.feedback_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Feedback not found: {id}")))
    }

    /// Submit feedback. `user_id` is the submitting account, if known.
    pub async fn create_feedback(
        &self,
        input: CreateFeedbackInput,
        user_id: Option<&str>,
    ) -> AppResult<feedback::Model> {
        input.validate()?;

        let model = feedback::ActiveModel {
            id: Set(self.id_gen.generate()),
            subject: Set(input.subject),
            message: Set(input.message),
            status: Set(FeedbackStatus::Pending),
            user_id: Set(user_id.map(str::to_string)),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        };

        let created = self.feedback_repo.create(model).await?;

        self.events
            .publish(ResourceKind::Feedback, &created.id, EventAction::Created);

        Ok(created)
    }

    /// Move a feedback entry to a new status. Idempotent.
    pub async fn set_feedback_status(
        &self,
        id: &str,
        status: FeedbackStatus,
    ) -> AppResult<feedback::Model> {
        let updated = self.feedback_repo.set_status(id, status).await?;
        self.events
            .publish(ResourceKind::Feedback, id, EventAction::Updated);
        Ok(updated)
    }

    /// Delete a feedback entry.
    pub async fn delete_feedback(&self, id: &str) -> AppResult<()> {
        self.feedback_repo.delete(id).await?;
        self.events
            .publish(ResourceKind::Feedback, id, EventAction::Deleted);
        Ok(())
    }
}
