use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::entities::crops::{self, CropType};
use crate::entities::users::Role;

pub mod migrator;
pub mod repositories;

pub use repositories::crop::{CropUpdate, CropWithOwner};
pub use repositories::user::{FarmerUpdate, ProfileUpdate, User, UserStoreError};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.starts_with("sqlite::memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn crop_repo(&self) -> repositories::crop::CropRepository {
        repositories::crop::CropRepository::new(self.conn.clone())
    }

    fn token_repo(&self) -> repositories::token::TokenRepository {
        repositories::token::TokenRepository::new(self.conn.clone())
    }

    // ========== Users ==========

    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
        role: Role,
        security: &SecurityConfig,
    ) -> Result<User, UserStoreError> {
        self.user_repo()
            .create(username, email, password, role, security)
            .await
    }

    pub async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, UserStoreError> {
        self.user_repo().verify_credentials(email, password).await
    }

    pub async fn get_user(&self, id: i32) -> Result<Option<User>, UserStoreError> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn list_farmers(&self) -> Result<Vec<User>, UserStoreError> {
        self.user_repo().list_farmers().await
    }

    pub async fn get_farmer(&self, id: i32) -> Result<Option<User>, UserStoreError> {
        self.user_repo().get_farmer(id).await
    }

    pub async fn count_farmers(&self) -> Result<u64, UserStoreError> {
        self.user_repo().count_farmers().await
    }

    pub async fn update_profile(
        &self,
        id: i32,
        update: ProfileUpdate,
    ) -> Result<User, UserStoreError> {
        self.user_repo().update_profile(id, update).await
    }

    pub async fn update_farmer(
        &self,
        id: i32,
        update: FarmerUpdate,
    ) -> Result<User, UserStoreError> {
        self.user_repo().update_farmer(id, update).await
    }

    pub async fn delete_farmer(&self, id: i32) -> Result<bool, UserStoreError> {
        self.user_repo().delete_farmer(id).await
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool, UserStoreError> {
        self.user_repo().email_exists(email).await
    }

    // ========== Crops ==========

    pub async fn create_crop(
        &self,
        farmer_id: i32,
        name: &str,
        crop_type: CropType,
        quantity: i32,
    ) -> Result<crops::Model> {
        self.crop_repo()
            .create(farmer_id, name, crop_type, quantity)
            .await
    }

    pub async fn list_crops(&self) -> Result<Vec<CropWithOwner>> {
        self.crop_repo().list_all().await
    }

    pub async fn list_crops_for_farmer(&self, farmer_id: i32) -> Result<Vec<CropWithOwner>> {
        self.crop_repo().list_for_farmer(farmer_id).await
    }

    pub async fn get_crop(&self, id: i32) -> Result<Option<CropWithOwner>> {
        self.crop_repo().get(id).await
    }

    pub async fn get_owned_crop(&self, id: i32, farmer_id: i32) -> Result<Option<CropWithOwner>> {
        self.crop_repo().get_owned(id, farmer_id).await
    }

    pub async fn update_crop(&self, crop: crops::Model, update: CropUpdate) -> Result<crops::Model> {
        self.crop_repo().update(crop, update).await
    }

    pub async fn delete_crop(&self, id: i32) -> Result<bool> {
        self.crop_repo().delete(id).await
    }

    pub async fn delete_owned_crop(&self, id: i32, farmer_id: i32) -> Result<bool> {
        self.crop_repo().delete_owned(id, farmer_id).await
    }

    pub async fn count_crops(&self) -> Result<u64> {
        self.crop_repo().count_all().await
    }

    pub async fn count_crops_for_farmer(&self, farmer_id: i32) -> Result<u64> {
        self.crop_repo().count_for_farmer(farmer_id).await
    }

    pub async fn sum_quantity_by_type(&self, farmer_id: i32) -> Result<Vec<(String, i64)>> {
        self.crop_repo().sum_quantity_by_type(farmer_id).await
    }

    pub async fn farmer_totals_desc(&self) -> Result<Vec<(i32, i64)>> {
        self.crop_repo().farmer_totals_desc().await
    }

    pub async fn total_crop_quantity(&self) -> Result<i64> {
        self.crop_repo().total_quantity().await
    }

    pub async fn quantity_per_farmer(&self) -> Result<Vec<(String, i64)>> {
        self.crop_repo().quantity_per_farmer().await
    }

    pub async fn crop_rows_per_farmer(&self) -> Result<Vec<(i32, String, i64)>> {
        self.crop_repo().rows_per_farmer().await
    }

    pub async fn count_crops_by_type(&self, farmer_id: i32) -> Result<Vec<(String, i64)>> {
        self.crop_repo().count_by_type_for_farmer(farmer_id).await
    }

    // ========== Tokens ==========

    pub async fn revoke_token(&self, jti: &str, expires_at: i64) -> Result<()> {
        self.token_repo().revoke(jti, expires_at).await
    }

    pub async fn is_token_revoked(&self, jti: &str) -> Result<bool> {
        self.token_repo().is_revoked(jti).await
    }

    pub async fn purge_expired_tokens(&self, now: i64) -> Result<u64> {
        self.token_repo().purge_expired(now).await
    }
}
