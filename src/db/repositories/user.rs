use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use thiserror::Error;
use tokio::task;

use crate::config::SecurityConfig;
use crate::entities::users::{self, Role};

/// Account write failures that handlers surface as field-level validation
/// errors. Everything else bubbles up as a database error.
#[derive(Debug, Error)]
pub enum UserStoreError {
    #[error("A user with this email already exists")]
    EmailTaken,

    #[error("A user with this username already exists")]
    UsernameTaken,

    #[error("User not found")]
    NotFound,

    #[error(transparent)]
    Db(#[from] DbErr),

    #[error("{0}")]
    Internal(String),
}

/// User data handed out of the repository. The password hash never leaves
/// this module.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub profile_icon: Option<String>,
    pub is_active: bool,
    pub created_at: String,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            role: model.role,
            profile_icon: model.profile_icon,
            is_active: model.is_active,
            created_at: model.created_at,
        }
    }
}

/// Partial update for the self-service profile path.
#[derive(Debug, Default)]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub profile_icon: Option<String>,
}

/// Partial update for the admin farmer-management path.
#[derive(Debug, Default)]
pub struct FarmerUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub is_active: Option<bool>,
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Create a user. Email is lowercased before any check or write, and the
    /// uniqueness checks run in the same transaction as the insert so a
    /// concurrent duplicate surfaces as a validation failure, not corruption.
    pub async fn create(
        &self,
        username: &str,
        email: &str,
        password: &str,
        role: Role,
        security: &SecurityConfig,
    ) -> Result<User, UserStoreError> {
        let email = email.to_lowercase();

        let password = password.to_string();
        let security = security.clone();
        let password_hash = task::spawn_blocking(move || hash_password(&password, &security))
            .await
            .map_err(|e| UserStoreError::Internal(format!("Password hashing task panicked: {e}")))?
            .map_err(|e| UserStoreError::Internal(e.to_string()))?;

        let txn = self.conn.begin().await?;

        if users::Entity::find()
            .filter(users::Column::Email.eq(email.as_str()))
            .one(&txn)
            .await?
            .is_some()
        {
            return Err(UserStoreError::EmailTaken);
        }

        if users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&txn)
            .await?
            .is_some()
        {
            return Err(UserStoreError::UsernameTaken);
        }

        let model = users::ActiveModel {
            username: Set(username.to_string()),
            email: Set(email),
            password_hash: Set(password_hash),
            role: Set(role),
            profile_icon: Set(None),
            is_active: Set(true),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        Ok(User::from(model))
    }

    /// Look up by case-normalized email and verify the password. Returns
    /// `None` for unknown email, wrong password, or a deactivated account,
    /// without distinguishing the three.
    ///
    /// Argon2 verification runs on `spawn_blocking`; it is CPU-bound and
    /// would stall the async runtime otherwise.
    pub async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, UserStoreError> {
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email.to_lowercase()))
            .filter(users::Column::IsActive.eq(true))
            .one(&self.conn)
            .await?;

        let Some(user) = user else {
            return Ok(None);
        };

        let password_hash = user.password_hash.clone();
        let password = password.to_string();

        let is_valid = task::spawn_blocking(move || {
            let parsed_hash = PasswordHash::new(&password_hash)
                .map_err(|e| format!("Invalid password hash format: {e}"))?;

            Ok::<bool, String>(
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed_hash)
                    .is_ok(),
            )
        })
        .await
        .map_err(|e| UserStoreError::Internal(format!("Password verification panicked: {e}")))?
        .map_err(UserStoreError::Internal)?;

        Ok(is_valid.then(|| User::from(user)))
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<User>, UserStoreError> {
        let user = users::Entity::find_by_id(id).one(&self.conn).await?;
        Ok(user.map(User::from))
    }

    /// Farmer-role accounts, newest first.
    pub async fn list_farmers(&self) -> Result<Vec<User>, UserStoreError> {
        let farmers = users::Entity::find()
            .filter(users::Column::Role.eq(Role::Farmer))
            .order_by_desc(users::Column::CreatedAt)
            .order_by_desc(users::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(farmers.into_iter().map(User::from).collect())
    }

    /// Scoped to Farmer-role rows: an admin id resolves to `None` here.
    pub async fn get_farmer(&self, id: i32) -> Result<Option<User>, UserStoreError> {
        let farmer = users::Entity::find_by_id(id)
            .filter(users::Column::Role.eq(Role::Farmer))
            .one(&self.conn)
            .await?;

        Ok(farmer.map(User::from))
    }

    pub async fn count_farmers(&self) -> Result<u64, UserStoreError> {
        let count = users::Entity::find()
            .filter(users::Column::Role.eq(Role::Farmer))
            .count(&self.conn)
            .await?;

        Ok(count)
    }

    /// Self-service profile update. All-or-nothing: every uniqueness check
    /// runs in the transaction that carries the write, and a single failure
    /// leaves the row untouched. Role is deliberately not updatable here.
    pub async fn update_profile(
        &self,
        id: i32,
        update: ProfileUpdate,
    ) -> Result<User, UserStoreError> {
        let txn = self.conn.begin().await?;

        let user = users::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(UserStoreError::NotFound)?;

        let mut active: users::ActiveModel = user.into();

        if let Some(email) = update.email {
            let email = email.to_lowercase();
            if users::Entity::find()
                .filter(users::Column::Email.eq(email.as_str()))
                .filter(users::Column::Id.ne(id))
                .one(&txn)
                .await?
                .is_some()
            {
                return Err(UserStoreError::EmailTaken);
            }
            active.email = Set(email);
        }

        if let Some(username) = update.username {
            if users::Entity::find()
                .filter(users::Column::Username.eq(username.as_str()))
                .filter(users::Column::Id.ne(id))
                .one(&txn)
                .await?
                .is_some()
            {
                return Err(UserStoreError::UsernameTaken);
            }
            active.username = Set(username);
        }

        if let Some(icon) = update.profile_icon {
            active.profile_icon = Set(Some(icon));
        }

        let updated = active.update(&txn).await?;
        txn.commit().await?;

        Ok(User::from(updated))
    }

    /// Admin farmer-management update. Same transactional all-or-nothing
    /// shape as `update_profile`, pre-filtered to Farmer-role rows.
    pub async fn update_farmer(
        &self,
        id: i32,
        update: FarmerUpdate,
    ) -> Result<User, UserStoreError> {
        let txn = self.conn.begin().await?;

        let farmer = users::Entity::find_by_id(id)
            .filter(users::Column::Role.eq(Role::Farmer))
            .one(&txn)
            .await?
            .ok_or(UserStoreError::NotFound)?;

        let mut active: users::ActiveModel = farmer.into();

        if let Some(email) = update.email {
            let email = email.to_lowercase();
            if users::Entity::find()
                .filter(users::Column::Email.eq(email.as_str()))
                .filter(users::Column::Id.ne(id))
                .one(&txn)
                .await?
                .is_some()
            {
                return Err(UserStoreError::EmailTaken);
            }
            active.email = Set(email);
        }

        if let Some(username) = update.username {
            if users::Entity::find()
                .filter(users::Column::Username.eq(username.as_str()))
                .filter(users::Column::Id.ne(id))
                .one(&txn)
                .await?
                .is_some()
            {
                return Err(UserStoreError::UsernameTaken);
            }
            active.username = Set(username);
        }

        if let Some(is_active) = update.is_active {
            active.is_active = Set(is_active);
        }

        let updated = active.update(&txn).await?;
        txn.commit().await?;

        Ok(User::from(updated))
    }

    /// Hard delete of a Farmer-role account; crops cascade at the schema
    /// level. Returns `false` when no matching farmer exists.
    pub async fn delete_farmer(&self, id: i32) -> Result<bool, UserStoreError> {
        let result = users::Entity::delete_many()
            .filter(users::Column::Id.eq(id))
            .filter(users::Column::Role.eq(Role::Farmer))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool, UserStoreError> {
        let count = users::Entity::find()
            .filter(users::Column::Email.eq(email.to_lowercase()))
            .count(&self.conn)
            .await?;

        Ok(count > 0)
    }
}

/// Hash a password using Argon2id with the configured cost parameters.
pub fn hash_password(password: &str, config: &SecurityConfig) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let params = Params::new(
        config.argon2_memory_cost_kib,
        config.argon2_time_cost,
        config.argon2_parallelism,
        None,
    )
    .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}
