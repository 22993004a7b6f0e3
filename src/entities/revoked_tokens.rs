use sea_orm::entity::prelude::*;

/// Blacklist for refresh tokens. Access tokens are never stored here; they
/// expire on their own.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "revoked_tokens")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub jti: String,

    /// Unix seconds; rows past this point are safe to purge.
    pub expires_at: i64,

    pub revoked_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
