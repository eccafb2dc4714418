use sea_orm::{
    QueryFilter,
    prelude::*,
    sea_query::{Expr, LikeExpr},
};
use uuid::Uuid;

use crate::{
    DateBounds, DateRange, EngineError, Expense, ResultEngine, expenses,
    util::{LIKE_ESCAPE, escape_like, fold_case, required_text},
};

use super::{
    Engine,
    access::{into_expenses, owned_with_type},
};

/// Narrowing predicates applied on top of the ownership scope.
pub(super) trait ApplyExpenseFilters: QueryFilter + Sized {
    fn within(self, range: Option<DateRange>) -> Self;
}

impl<T> ApplyExpenseFilters for T
where
    T: QueryFilter + Sized,
{
    fn within(self, range: Option<DateRange>) -> Self {
        match range {
            Some(range) => self.filter(expenses::Column::Date.between(range.start, range.end)),
            None => self,
        }
    }
}

impl Engine {
    /// Owned expenses dated within `[start_date, end_date]`, newest first.
    ///
    /// Both bounds are required.
    pub async fn filter_by_date_range(
        &self,
        user_id: Uuid,
        bounds: &DateBounds,
    ) -> ResultEngine<Vec<Expense>> {
        let range = bounds.require()?;
        let rows = owned_with_type(user_id)
            .within(Some(range))
            .all(&self.database)
            .await?;
        Ok(into_expenses(rows))
    }

    /// Owned expenses of one type, newest first.
    pub async fn filter_by_type(&self, user_id: Uuid, type_id: i32) -> ResultEngine<Vec<Expense>> {
        let rows = owned_with_type(user_id)
            .filter(expenses::Column::TypeId.eq(type_id))
            .all(&self.database)
            .await?;
        Ok(into_expenses(rows))
    }

    /// Owned expenses whose description contains `term`, ignoring case.
    ///
    /// Wildcards in `term` are matched literally. Expenses without a
    /// description never match.
    pub async fn search(&self, user_id: Uuid, term: Option<&str>) -> ResultEngine<Vec<Expense>> {
        let term = required_text(term).ok_or_else(|| EngineError::missing(["term"]))?;
        let pattern = format!("%{}%", escape_like(&fold_case(term)));

        // SQLite's LOWER() only folds ASCII, so match the column folded on write.
        let folded = Expr::col((expenses::Entity, expenses::Column::DescriptionFolded));
        let rows = owned_with_type(user_id)
            .filter(folded.like(LikeExpr::new(pattern).escape(LIKE_ESCAPE)))
            .all(&self.database)
            .await?;
        Ok(into_expenses(rows))
    }
}
