//! Repository layer.
//!
//! One repository per resource, each holding a shared database handle.
//! Driver errors are translated to [`AppError`] here so the rest of the
//! stack never matches on ORM error codes.

mod announcement;
mod badge;
mod faq;
mod feedback;
mod learning_module;
mod lesson;
mod level;
mod user;

pub use announcement::{AnnouncementFilter, AnnouncementRepository};
pub use badge::{BadgeFilter, BadgeRepository};
pub use faq::{FaqFilter, FaqRepository};
pub use feedback::{FeedbackFilter, FeedbackRepository};
pub use learning_module::{LearningModuleFilter, LearningModuleRepository};
pub use lesson::LessonRepository;
pub use level::LevelRepository;
pub use user::{UserFilter, UserRepository};

use lisan_common::AppError;
use sea_orm::{DbErr, SqlErr};

/// Translate a read error into the application taxonomy.
pub(crate) fn map_read_err(e: DbErr) -> AppError {
    AppError::Database(e.to_string())
}

/// Translate a write error into the application taxonomy.
///
/// `conflict` is the message used when the underlying error is a
/// unique-constraint violation (e.g. "Email already exists").
pub(crate) fn map_write_err(e: DbErr, conflict: &str) -> AppError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::Conflict(conflict.to_string()),
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
            AppError::BadRequest("Referenced record does not exist".to_string())
        }
        _ => AppError::Database(e.to_string()),
    }
}

/// Translate a write error, picking the conflict message from the text of
/// the violated unique constraint. For tables with more than one unique
/// column.
pub(crate) fn map_write_err_with(
    e: DbErr,
    conflict: impl FnOnce(&str) -> &'static str,
) -> AppError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(constraint)) => {
            AppError::Conflict(conflict(&constraint).to_string())
        }
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
            AppError::BadRequest("Referenced record does not exist".to_string())
        }
        _ => AppError::Database(e.to_string()),
    }
}
