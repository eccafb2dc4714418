use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*, sea_query::Expr};
use uuid::Uuid;

use crate::{Expense, ExpenseInput, ResultEngine, expenses};

use super::{
    Engine,
    access::{OwnedBy, into_expenses, owned_with_type},
    with_tx,
};

impl Engine {
    /// All expenses owned by `user_id`, newest date first.
    pub async fn list_all(&self, user_id: Uuid) -> ResultEngine<Vec<Expense>> {
        let rows = owned_with_type(user_id).all(&self.database).await?;
        Ok(into_expenses(rows))
    }

    /// One expense, if `user_id` owns it.
    pub async fn get_by_id(&self, user_id: Uuid, expense_id: Uuid) -> ResultEngine<Expense> {
        self.require_owned_expense(&self.database, user_id, expense_id)
            .await
    }

    /// Insert an expense owned by `user_id`.
    ///
    /// Returns the stored row with its server-assigned id and creation time.
    pub async fn create(&self, user_id: Uuid, input: ExpenseInput) -> ResultEngine<Expense> {
        let fields = input.validate()?;
        with_tx!(self, |db_tx| {
            let expense_type = self.require_expense_type(&db_tx, fields.type_id).await?;

            let model = expenses::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                user_id: ActiveValue::Set(user_id),
                type_id: ActiveValue::Set(fields.type_id),
                amount_minor: ActiveValue::Set(fields.amount.cents()),
                description_folded: ActiveValue::Set(fields.description_folded()),
                description: ActiveValue::Set(fields.description),
                date: ActiveValue::Set(fields.date),
                created_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;

            tracing::debug!(expense_id = %model.id, %user_id, "expense created");
            Ok(Expense::from((model, expense_type)))
        })
    }

    /// Replace type, amount, description and date of an owned expense.
    ///
    /// The write is a single `UPDATE ... WHERE id = ? AND user_id = ?`; no
    /// matching row means not found.
    pub async fn update(
        &self,
        user_id: Uuid,
        expense_id: Uuid,
        input: ExpenseInput,
    ) -> ResultEngine<Expense> {
        let fields = input.validate()?;
        with_tx!(self, |db_tx| {
            self.require_expense_type(&db_tx, fields.type_id).await?;

            let result = expenses::Entity::update_many()
                .col_expr(expenses::Column::TypeId, Expr::value(fields.type_id))
                .col_expr(
                    expenses::Column::AmountMinor,
                    Expr::value(fields.amount.cents()),
                )
                .col_expr(
                    expenses::Column::Description,
                    Expr::value(fields.description.clone()),
                )
                .col_expr(
                    expenses::Column::DescriptionFolded,
                    Expr::value(fields.description_folded()),
                )
                .col_expr(expenses::Column::Date, Expr::value(fields.date))
                .filter(expenses::Column::Id.eq(expense_id))
                .owned_by(user_id)
                .exec(&db_tx)
                .await?;
            Self::require_affected(result.rows_affected)?;

            tracing::debug!(%expense_id, %user_id, "expense updated");
            self.require_owned_expense(&db_tx, user_id, expense_id)
                .await
        })
    }

    /// Delete an owned expense and return its last state.
    pub async fn delete(&self, user_id: Uuid, expense_id: Uuid) -> ResultEngine<Expense> {
        with_tx!(self, |db_tx| {
            let expense = self
                .require_owned_expense(&db_tx, user_id, expense_id)
                .await?;

            let result = expenses::Entity::delete_many()
                .filter(expenses::Column::Id.eq(expense_id))
                .owned_by(user_id)
                .exec(&db_tx)
                .await?;
            Self::require_affected(result.rows_affected)?;

            tracing::debug!(%expense_id, %user_id, "expense deleted");
            Ok(expense)
        })
    }
}
