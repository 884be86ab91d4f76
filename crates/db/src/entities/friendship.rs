//! Friendship entity.
//!
//! Friendship is an undirected relation stored once per pair in canonical
//! order: `user_a_id` always holds the lexicographically smaller user ID.
//! Existence checks and removals therefore work from either side.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "friendship")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Smaller user ID of the pair
    #[sea_orm(indexed)]
    pub user_a_id: String,

    /// Larger user ID of the pair
    #[sea_orm(indexed)]
    pub user_b_id: String,

    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    /// The counterpart of `user_id` in this edge.
    ///
    /// Returns `user_b_id` when `user_id` is the smaller side, `user_a_id`
    /// otherwise.
    #[must_use]
    pub fn counterpart_of(&self, user_id: &str) -> &str {
        if self.user_a_id == user_id {
            &self.user_b_id
        } else {
            &self.user_a_id
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserAId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    UserA,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserBId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    UserB,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserA.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_counterpart_of_either_side() {
        let edge = Model {
            id: "f1".to_string(),
            user_a_id: "alpha".to_string(),
            user_b_id: "beta".to_string(),
            created_at: Utc::now().into(),
        };

        assert_eq!(edge.counterpart_of("alpha"), "beta");
        assert_eq!(edge.counterpart_of("beta"), "alpha");
    }
}
