//! Business logic services.

pub mod announcement;
pub mod dashboard;
pub mod events;
pub mod gamification;
pub mod learning;
pub mod support;
pub mod user;

pub use announcement::{AnnouncementService, CreateAnnouncementInput, UpdateAnnouncementInput};
pub use dashboard::{DashboardService, DashboardStats};
pub use events::{DomainEvent, EventAction, EventBus, ResourceKind};
pub use gamification::{
    CreateBadgeInput, CreateLevelInput, GamificationService, UpdateBadgeInput, UpdateLevelInput,
};
pub use learning::{
    CreateLessonInput, CreateModuleInput, LearningService, UpdateLessonInput, UpdateModuleInput,
};
pub use support::{
    CreateFaqInput, CreateFeedbackInput, SupportService, UpdateFaqInput,
};
pub use user::{CreateUserInput, UpdateUserInput, UserService};
