use sea_orm::{
    FromQueryResult, JoinType, QueryOrder, QuerySelect,
    prelude::*,
    sea_query::{Expr, SimpleExpr},
};
use uuid::Uuid;

use crate::{
    CategorySpending, DateBounds, MoneyCents, ResultEngine, SpendingTotal, expense_types,
    expenses,
};

use super::{Engine, access::owned, list::ApplyExpenseFilters};

#[derive(Debug, FromQueryResult)]
struct CategoryRow {
    type_id: i32,
    category: String,
    total_minor: i64,
    count: i64,
}

impl From<CategoryRow> for CategorySpending {
    fn from(row: CategoryRow) -> Self {
        Self {
            type_id: row.type_id,
            category: row.category,
            total: MoneyCents::new(row.total_minor),
            count: u64::try_from(row.count).unwrap_or_default(),
        }
    }
}

fn amount_sum() -> SimpleExpr {
    Expr::col((expenses::Entity, expenses::Column::AmountMinor)).sum()
}

fn expense_count() -> SimpleExpr {
    Expr::col((expenses::Entity, expenses::Column::Id)).count()
}

impl Engine {
    /// Total spent by `user_id`, optionally within an inclusive date range.
    ///
    /// Bounds come as a pair: both or neither.
    pub async fn total_spending(
        &self,
        user_id: Uuid,
        bounds: &DateBounds,
    ) -> ResultEngine<SpendingTotal> {
        let range = bounds.resolve()?;

        let row: Option<(Option<i64>, i64)> = owned(user_id)
            .within(range)
            .select_only()
            .column_as(amount_sum(), "total_minor")
            .column_as(expense_count(), "count")
            .into_tuple()
            .one(&self.database)
            .await?;

        // SUM over no rows is NULL.
        let (total_minor, count) = row.unwrap_or((None, 0));
        Ok(SpendingTotal {
            total: MoneyCents::new(total_minor.unwrap_or(0)),
            count: u64::try_from(count).unwrap_or_default(),
            range,
        })
    }

    /// Spending grouped by expense type, largest total first.
    ///
    /// Types without a matching expense are not listed.
    pub async fn spending_by_category(
        &self,
        user_id: Uuid,
        bounds: &DateBounds,
    ) -> ResultEngine<Vec<CategorySpending>> {
        let range = bounds.resolve()?;

        let rows: Vec<CategoryRow> = owned(user_id)
            .within(range)
            .select_only()
            .column_as(expenses::Column::TypeId, "type_id")
            .column_as(expense_types::Column::Name, "category")
            .column_as(amount_sum(), "total_minor")
            .column_as(expense_count(), "count")
            .join(JoinType::InnerJoin, expenses::Relation::ExpenseType.def())
            .group_by(expenses::Column::TypeId)
            .group_by(expense_types::Column::Name)
            .order_by_desc(amount_sum())
            .order_by_asc(expense_types::Column::Name)
            .into_model::<CategoryRow>()
            .all(&self.database)
            .await?;

        Ok(rows.into_iter().map(CategorySpending::from).collect())
    }
}
