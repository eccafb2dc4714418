//! Expense records.
//!
//! An `Expense` always belongs to exactly one user and one expense type. The
//! owner is set from the authenticated caller on insert and never changes.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{MoneyCents, expense_types};

/// An expense as returned by the engine, joined with its type name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub user_id: Uuid,
    pub type_id: i32,
    pub type_name: String,
    pub amount: MoneyCents,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub type_id: i32,
    pub amount_minor: i64,
    pub description: Option<String>,
    /// Lowercased `description`, matched by search.
    pub description_folded: Option<String>,
    pub date: Date,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::expense_types::Entity",
        from = "Column::TypeId",
        to = "super::expense_types::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    ExpenseType,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::expense_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExpenseType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Expense {
    pub(crate) fn from_model(model: Model, type_name: String) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            type_id: model.type_id,
            type_name,
            amount: MoneyCents::new(model.amount_minor),
            description: model.description,
            date: model.date,
            created_at: model.created_at,
        }
    }
}

impl From<(Model, expense_types::Model)> for Expense {
    fn from((model, expense_type): (Model, expense_types::Model)) -> Self {
        Self::from_model(model, expense_type.name)
    }
}
