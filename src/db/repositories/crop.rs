use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};

use crate::entities::crops::{self, CropType};
use crate::entities::prelude::*;
use crate::entities::users;

/// A crop row joined with its owner's username, the shape every listing and
/// detail endpoint renders.
#[derive(Debug, Clone)]
pub struct CropWithOwner {
    pub crop: crops::Model,
    pub farmer_username: String,
}

/// Partial update for either crop surface.
#[derive(Debug, Default)]
pub struct CropUpdate {
    pub name: Option<String>,
    pub crop_type: Option<CropType>,
    pub quantity: Option<i32>,
}

pub struct CropRepository {
    conn: DatabaseConnection,
}

impl CropRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(
        &self,
        farmer_id: i32,
        name: &str,
        crop_type: CropType,
        quantity: i32,
    ) -> Result<crops::Model> {
        let model = crops::ActiveModel {
            farmer_id: Set(farmer_id),
            name: Set(name.to_string()),
            crop_type: Set(crop_type),
            quantity: Set(quantity),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert crop")?;

        Ok(model)
    }

    /// All crops, newest first, with owner usernames.
    pub async fn list_all(&self) -> Result<Vec<CropWithOwner>> {
        let rows = Crops::find()
            .find_also_related(Users)
            .order_by_desc(crops::Column::CreatedAt)
            .order_by_desc(crops::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list crops")?;

        Ok(rows.into_iter().map(with_owner).collect())
    }

    /// One farmer's crops, newest first.
    pub async fn list_for_farmer(&self, farmer_id: i32) -> Result<Vec<CropWithOwner>> {
        let rows = Crops::find()
            .find_also_related(Users)
            .filter(crops::Column::FarmerId.eq(farmer_id))
            .order_by_desc(crops::Column::CreatedAt)
            .order_by_desc(crops::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list crops for farmer")?;

        Ok(rows.into_iter().map(with_owner).collect())
    }

    /// Unscoped lookup for the admin detail surface.
    pub async fn get(&self, id: i32) -> Result<Option<CropWithOwner>> {
        let row = Crops::find_by_id(id)
            .find_also_related(Users)
            .one(&self.conn)
            .await
            .context("Failed to query crop")?;

        Ok(row.map(with_owner))
    }

    /// Owner-scoped lookup: rows outside the owner's set are indistinguishable
    /// from absent rows.
    pub async fn get_owned(&self, id: i32, farmer_id: i32) -> Result<Option<CropWithOwner>> {
        let row = Crops::find_by_id(id)
            .filter(crops::Column::FarmerId.eq(farmer_id))
            .find_also_related(Users)
            .one(&self.conn)
            .await
            .context("Failed to query crop")?;

        Ok(row.map(with_owner))
    }

    pub async fn update(&self, crop: crops::Model, update: CropUpdate) -> Result<crops::Model> {
        let mut active: crops::ActiveModel = crop.into();

        if let Some(name) = update.name {
            active.name = Set(name);
        }
        if let Some(crop_type) = update.crop_type {
            active.crop_type = Set(crop_type);
        }
        if let Some(quantity) = update.quantity {
            active.quantity = Set(quantity);
        }

        let updated = active
            .update(&self.conn)
            .await
            .context("Failed to update crop")?;

        Ok(updated)
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Crops::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete crop")?;

        Ok(result.rows_affected > 0)
    }

    pub async fn delete_owned(&self, id: i32, farmer_id: i32) -> Result<bool> {
        let result = Crops::delete_many()
            .filter(crops::Column::Id.eq(id))
            .filter(crops::Column::FarmerId.eq(farmer_id))
            .exec(&self.conn)
            .await
            .context("Failed to delete crop")?;

        Ok(result.rows_affected > 0)
    }

    // ========================================================================
    // Aggregates
    // ========================================================================

    pub async fn count_all(&self) -> Result<u64> {
        let count = Crops::find().count(&self.conn).await?;
        Ok(count)
    }

    pub async fn count_for_farmer(&self, farmer_id: i32) -> Result<u64> {
        let count = Crops::find()
            .filter(crops::Column::FarmerId.eq(farmer_id))
            .count(&self.conn)
            .await?;
        Ok(count)
    }

    /// Summed quantity per crop-type key for one farmer. Types with no rows
    /// are absent; callers fill in zeros.
    pub async fn sum_quantity_by_type(&self, farmer_id: i32) -> Result<Vec<(String, i64)>> {
        let rows: Vec<(String, i64)> = Crops::find()
            .select_only()
            .column(crops::Column::CropType)
            .column_as(crops::Column::Quantity.sum(), "total_quantity")
            .filter(crops::Column::FarmerId.eq(farmer_id))
            .group_by(crops::Column::CropType)
            .into_tuple()
            .all(&self.conn)
            .await
            .context("Failed to aggregate quantities by crop type")?;

        Ok(rows)
    }

    /// Every farmer's summed quantity, highest first. Feeds the rank scan.
    pub async fn farmer_totals_desc(&self) -> Result<Vec<(i32, i64)>> {
        let rows: Vec<(i32, i64)> = Crops::find()
            .select_only()
            .column(crops::Column::FarmerId)
            .column_as(crops::Column::Quantity.sum(), "total_quantity")
            .group_by(crops::Column::FarmerId)
            .order_by_desc(crops::Column::Quantity.sum())
            .into_tuple()
            .all(&self.conn)
            .await
            .context("Failed to aggregate farmer totals")?;

        Ok(rows)
    }

    /// Summed quantity across every crop row; zero when the table is empty.
    pub async fn total_quantity(&self) -> Result<i64> {
        let total: Option<Option<i64>> = Crops::find()
            .select_only()
            .column_as(crops::Column::Quantity.sum(), "total_quantity")
            .into_tuple()
            .one(&self.conn)
            .await
            .context("Failed to sum crop quantities")?;

        Ok(total.flatten().unwrap_or(0))
    }

    /// Per-farmer summed quantity keyed by username, username ascending.
    /// Only farmers owning at least one crop appear.
    pub async fn quantity_per_farmer(&self) -> Result<Vec<(String, i64)>> {
        let rows: Vec<(String, i64)> = Crops::find()
            .select_only()
            .column_as(users::Column::Username, "farmer_username")
            .column_as(crops::Column::Quantity.sum(), "total_quantity")
            .join(JoinType::InnerJoin, crops::Relation::Users.def())
            .group_by(users::Column::Username)
            .order_by_asc(users::Column::Username)
            .into_tuple()
            .all(&self.conn)
            .await
            .context("Failed to aggregate quantity per farmer")?;

        Ok(rows)
    }

    /// Per-farmer crop row counts, username ascending. The dashboard variant
    /// of `quantity_per_farmer`; the two are deliberately distinct.
    pub async fn rows_per_farmer(&self) -> Result<Vec<(i32, String, i64)>> {
        let rows: Vec<(i32, String, i64)> = Crops::find()
            .select_only()
            .column(crops::Column::FarmerId)
            .column_as(users::Column::Username, "farmer_username")
            .column_as(crops::Column::Id.count(), "total_crops")
            .join(JoinType::InnerJoin, crops::Relation::Users.def())
            .group_by(crops::Column::FarmerId)
            .group_by(users::Column::Username)
            .order_by_asc(users::Column::Username)
            .into_tuple()
            .all(&self.conn)
            .await
            .context("Failed to count crops per farmer")?;

        Ok(rows)
    }

    /// Row counts per crop-type key for one farmer, ordered by key.
    pub async fn count_by_type_for_farmer(&self, farmer_id: i32) -> Result<Vec<(String, i64)>> {
        let rows: Vec<(String, i64)> = Crops::find()
            .select_only()
            .column(crops::Column::CropType)
            .column_as(crops::Column::Id.count(), "count")
            .filter(crops::Column::FarmerId.eq(farmer_id))
            .group_by(crops::Column::CropType)
            .order_by_asc(crops::Column::CropType)
            .into_tuple()
            .all(&self.conn)
            .await
            .context("Failed to count crops by type")?;

        Ok(rows)
    }
}

fn with_owner((crop, owner): (crops::Model, Option<users::Model>)) -> CropWithOwner {
    let farmer_username = owner.map_or_else(String::new, |u| u.username);
    CropWithOwner {
        crop,
        farmer_username,
    }
}
