//! SeaORM entities for the Lisan domain model.

pub mod announcement;
pub mod badge;
pub mod faq;
pub mod feedback;
pub mod learning_module;
pub mod lesson;
pub mod level;
pub mod user;

pub use announcement::Entity as Announcement;
pub use badge::Entity as Badge;
pub use faq::Entity as Faq;
pub use feedback::Entity as Feedback;
pub use learning_module::Entity as LearningModule;
pub use lesson::Entity as Lesson;
pub use level::Entity as Level;
pub use user::Entity as User;
