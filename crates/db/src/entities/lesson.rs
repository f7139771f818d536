//! Lesson entity.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of lesson content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum LessonType {
    #[sea_orm(string_value = "video")]
    Video,
    #[sea_orm(string_value = "quiz")]
    Quiz,
    #[sea_orm(string_value = "gesture_practice")]
    GesturePractice,
}

/// A single lesson within a learning module.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "lesson")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Owning module.
    pub module_id: String,

    pub title: String,

    pub lesson_type: LessonType,

    /// Video or quiz asset URL.
    #[sea_orm(nullable)]
    pub content_url: Option<String>,

    /// XP awarded on completion.
    pub xp_reward: i32,

    /// Target gesture label; only set when `lesson_type` is gesture practice.
    #[sea_orm(nullable)]
    pub gesture_target: Option<String>,

    /// Position within the module.
    pub order_index: i32,

    pub created_at: DateTime<Utc>,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::learning_module::Entity",
        from = "Column::ModuleId",
        to = "super::learning_module::Column::Id"
    )]
    Module,
}

impl Related<super::learning_module::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Module.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
