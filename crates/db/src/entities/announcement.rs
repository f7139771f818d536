//! Announcement entity.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Category of an announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementCategory {
    #[sea_orm(string_value = "content")]
    Content,
    #[sea_orm(string_value = "warning")]
    Warning,
    #[sea_orm(string_value = "update")]
    Update,
    #[sea_orm(string_value = "event")]
    Event,
    #[sea_orm(string_value = "tips")]
    Tips,
}

/// Announcement model for platform-wide notices.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "announcement")]
pub struct Model {
    /// Unique announcement ID.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Title of the announcement.
    pub title: String,

    /// Content/body of the announcement.
    #[sea_orm(column_type = "Text")]
    pub content: String,

    pub category: AnnouncementCategory,

    /// Image URL for the announcement (optional).
    #[sea_orm(nullable)]
    pub image_url: Option<String>,

    /// Video URL for the announcement (optional).
    #[sea_orm(nullable)]
    pub video_url: Option<String>,

    /// Whether the announcement is pinned to the top of lists.
    pub is_pinned: bool,

    /// Whether the announcement is currently active/visible.
    pub is_active: bool,

    /// When the announcement becomes visible. Always present.
    pub publish_at: DateTime<Utc>,

    /// Admin user that created the announcement.
    #[sea_orm(nullable)]
    pub created_by_id: Option<String>,

    /// Denormalized creator name for list views.
    pub created_by_name: String,

    /// When the announcement was created.
    pub created_at: DateTime<Utc>,

    /// When the announcement was last updated.
    #[sea_orm(nullable)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
