//! Ownership-scoped expense engine.
//!
//! The engine is the single place that decides what a user may see or change:
//! every expense read, write, filter, search and aggregate takes the
//! authenticated user id first and applies it inside the SQL statement.
//!
//! ```no_run
//! # async fn example(db: sea_orm::DatabaseConnection, user_id: uuid::Uuid) -> Result<(), engine::EngineError> {
//! use engine::{DateBounds, Engine, ExpenseInput};
//!
//! let engine = Engine::builder().database(db).build().await?;
//! engine
//!     .create(user_id, ExpenseInput::new(1, 12_50, "2024-01-05").description("Lunch"))
//!     .await?;
//! let january = engine
//!     .total_spending(user_id, &DateBounds::between("2024-01-01", "2024-01-31"))
//!     .await?;
//! # let _ = january;
//! # Ok(())
//! # }
//! ```

pub use commands::{ExpenseInput, NewUser};
pub use error::{EngineError, ErrorKind};
pub use expense_types::ExpenseType;
pub use expenses::Expense;
pub use money::MoneyCents;
pub use ops::{Engine, EngineBuilder};
pub use range::{DateBounds, DateRange};
pub use summary::{CategorySpending, SpendingTotal};
pub use users::User;

mod commands;
mod error;
mod expense_types;
mod expenses;
mod money;
mod ops;
mod range;
mod summary;
mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
