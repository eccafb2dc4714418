use sea_orm::{QueryOrder, prelude::*};

use crate::{ExpenseType, ResultEngine, expense_types};

use super::Engine;

impl Engine {
    /// All expense types, by name.
    pub async fn list_expense_types(&self) -> ResultEngine<Vec<ExpenseType>> {
        let models = expense_types::Entity::find()
            .order_by_asc(expense_types::Column::Name)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(ExpenseType::from).collect())
    }
}
