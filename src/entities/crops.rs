use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "crops")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub farmer_id: i32,

    pub name: String,

    pub crop_type: CropType,

    /// Validated non-negative at the API boundary.
    pub quantity: i32,

    pub created_at: String,
}

/// Fixed crop classification. `ALL` preserves the canonical enumeration order
/// used by the stats endpoints.
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum CropType {
    #[sea_orm(string_value = "cereal")]
    Cereal,
    #[sea_orm(string_value = "legume")]
    Legume,
    #[sea_orm(string_value = "vegetable")]
    Vegetable,
    #[sea_orm(string_value = "fruit")]
    Fruit,
    #[sea_orm(string_value = "root_tuber")]
    RootTuber,
    #[sea_orm(string_value = "oil_crop")]
    OilCrop,
    #[sea_orm(string_value = "fodder")]
    Fodder,
    #[sea_orm(string_value = "other")]
    Other,
}

impl CropType {
    pub const ALL: [Self; 8] = [
        Self::Cereal,
        Self::Legume,
        Self::Vegetable,
        Self::Fruit,
        Self::RootTuber,
        Self::OilCrop,
        Self::Fodder,
        Self::Other,
    ];

    /// The stored key, as it appears in the database and dashboard payloads.
    #[must_use]
    pub const fn as_key(self) -> &'static str {
        match self {
            Self::Cereal => "cereal",
            Self::Legume => "legume",
            Self::Vegetable => "vegetable",
            Self::Fruit => "fruit",
            Self::RootTuber => "root_tuber",
            Self::OilCrop => "oil_crop",
            Self::Fodder => "fodder",
            Self::Other => "other",
        }
    }

    /// Human-readable label used by the stats payloads.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cereal => "Cereal/Grain",
            Self::Legume => "Legume",
            Self::Vegetable => "Vegetable",
            Self::Fruit => "Fruit",
            Self::RootTuber => "Root/Tuber",
            Self::OilCrop => "Oil Crop",
            Self::Fodder => "Fodder/Forage",
            Self::Other => "Other",
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::FarmerId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
