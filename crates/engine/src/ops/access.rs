use sea_orm::{ConnectionTrait, QueryFilter, QueryOrder, Select, SelectTwo, prelude::*};
use uuid::Uuid;

use crate::{EngineError, Expense, ResultEngine, expense_types, expenses};

use super::Engine;

/// Restricts a query on `expenses` to the rows owned by one user.
///
/// Every expense query in the engine goes through this before it is executed.
pub(super) trait OwnedBy: QueryFilter + Sized {
    fn owned_by(self, user_id: Uuid) -> Self;
}

impl<T> OwnedBy for T
where
    T: QueryFilter + Sized,
{
    fn owned_by(self, user_id: Uuid) -> Self {
        self.filter(expenses::Column::UserId.eq(user_id))
    }
}

/// Expenses owned by `user_id`, unordered.
pub(super) fn owned(user_id: Uuid) -> Select<expenses::Entity> {
    expenses::Entity::find().owned_by(user_id)
}

/// Expenses owned by `user_id` joined with their type, newest date first.
pub(super) fn owned_with_type(user_id: Uuid) -> SelectTwo<expenses::Entity, expense_types::Entity> {
    owned(user_id)
        .find_also_related(expense_types::Entity)
        .order_by_desc(expenses::Column::Date)
        .order_by_desc(expenses::Column::CreatedAt)
}

/// Convert joined rows into expenses.
///
/// `type_id` is a non-null foreign key, so a row without a type cannot occur.
pub(super) fn into_expenses(
    rows: Vec<(expenses::Model, Option<expense_types::Model>)>,
) -> Vec<Expense> {
    rows.into_iter()
        .filter_map(|(model, expense_type)| {
            expense_type.map(|expense_type| Expense::from((model, expense_type)))
        })
        .collect()
}

fn expense_not_found() -> EngineError {
    EngineError::NotFound("expense".to_string())
}

impl Engine {
    /// Load an expense only if `user_id` owns it.
    ///
    /// A missing row and a row owned by another user produce the same error.
    pub(super) async fn require_owned_expense<C: ConnectionTrait>(
        &self,
        db: &C,
        user_id: Uuid,
        expense_id: Uuid,
    ) -> ResultEngine<Expense> {
        owned(user_id)
            .filter(expenses::Column::Id.eq(expense_id))
            .find_also_related(expense_types::Entity)
            .one(db)
            .await?
            .and_then(|(model, expense_type)| {
                expense_type.map(|expense_type| Expense::from((model, expense_type)))
            })
            .ok_or_else(expense_not_found)
    }

    /// Check the affected-row count of a conditional write on an owned row.
    pub(super) fn require_affected(rows_affected: u64) -> ResultEngine<()> {
        if rows_affected == 0 {
            return Err(expense_not_found());
        }
        Ok(())
    }

    pub(super) async fn require_expense_type<C: ConnectionTrait>(
        &self,
        db: &C,
        type_id: i32,
    ) -> ResultEngine<expense_types::Model> {
        expense_types::Entity::find_by_id(type_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::invalid("type_id", format!("unknown expense type {type_id}")))
    }
}
