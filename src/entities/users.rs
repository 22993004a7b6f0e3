use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub username: String,

    /// Stored lowercased; every write path normalizes before persisting.
    #[sea_orm(unique)]
    pub email: String,

    /// Argon2id password hash
    pub password_hash: String,

    pub role: Role,

    /// Stored filename under the media directory; `None` falls back to the
    /// placeholder icon.
    pub profile_icon: Option<String>,

    pub is_active: bool,

    pub created_at: String,
}

/// Closed role set. Every authorization boundary matches on this exhaustively.
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "farmer")]
    Farmer,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Farmer => "farmer",
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::crops::Entity")]
    Crops,
}

impl Related<super::crops::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Crops.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
