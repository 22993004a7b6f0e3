use anyhow::{Context, Result};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, Set};

use crate::entities::prelude::*;
use crate::entities::revoked_tokens;

pub struct TokenRepository {
    conn: DatabaseConnection,
}

impl TokenRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Blacklist a refresh token. Idempotent: revoking an already-revoked jti
    /// is a no-op.
    pub async fn revoke(&self, jti: &str, expires_at: i64) -> Result<()> {
        let insert = RevokedTokens::insert(revoked_tokens::ActiveModel {
            jti: Set(jti.to_string()),
            expires_at: Set(expires_at),
            revoked_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::column(revoked_tokens::Column::Jti)
                .do_nothing()
                .to_owned(),
        )
        .exec(&self.conn)
        .await;

        match insert {
            Ok(_) | Err(DbErr::RecordNotInserted) => Ok(()),
            Err(e) => Err(e).context("Failed to revoke token"),
        }
    }

    pub async fn is_revoked(&self, jti: &str) -> Result<bool> {
        let count = RevokedTokens::find()
            .filter(revoked_tokens::Column::Jti.eq(jti))
            .count(&self.conn)
            .await
            .context("Failed to query revoked token")?;

        Ok(count > 0)
    }

    /// Drop blacklist rows whose tokens have expired anyway.
    pub async fn purge_expired(&self, now: i64) -> Result<u64> {
        let result = RevokedTokens::delete_many()
            .filter(revoked_tokens::Column::ExpiresAt.lt(now))
            .exec(&self.conn)
            .await
            .context("Failed to purge expired token blacklist entries")?;

        Ok(result.rows_affected)
    }
}
