//! Review entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "review")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Author user ID
    #[sea_orm(indexed)]
    pub user_id: String,

    #[sea_orm(indexed)]
    pub cafe_id: String,

    #[sea_orm(column_type = "Text")]
    pub text: String,

    /// Rating, 1-5 by convention
    pub rating: i16,

    /// JSON array of photo URLs (blob store references)
    #[sea_orm(column_type = "Text", nullable)]
    pub photos: Option<String>,

    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    /// Deserialize the stored photo list, tolerating a missing column.
    #[must_use]
    pub fn photo_urls(&self) -> Vec<String> {
        self.photos
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_default()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Author,

    #[sea_orm(
        belongs_to = "super::cafe::Entity",
        from = "Column::CafeId",
        to = "super::cafe::Column::Id",
        on_delete = "Cascade"
    )]
    Cafe,

    #[sea_orm(has_many = "super::review_like::Entity")]
    Likes,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::cafe::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cafe.def()
    }
}

impl Related<super::review_like::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Likes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
