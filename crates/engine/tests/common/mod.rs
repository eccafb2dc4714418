#![allow(dead_code)]

use sea_orm::{Database, DatabaseConnection};

use engine::{Engine, ExpenseInput, NewUser};
use migration::MigratorTrait;
use uuid::Uuid;

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

pub async fn register(engine: &Engine, name: &str) -> Uuid {
    engine
        .create_user(NewUser::new(
            name,
            format!("{name}@example.com"),
            "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA",
        ))
        .await
        .unwrap()
        .id
}

pub async fn type_id(engine: &Engine, name: &str) -> i32 {
    engine
        .list_expense_types()
        .await
        .unwrap()
        .into_iter()
        .find(|t| t.name == name)
        .map(|t| t.id)
        .unwrap()
}

pub async fn add(
    engine: &Engine,
    user_id: Uuid,
    type_name: &str,
    amount_minor: i64,
    date: &str,
    description: Option<&str>,
) -> engine::Expense {
    let mut input = ExpenseInput::new(type_id(engine, type_name).await, amount_minor, date);
    if let Some(description) = description {
        input = input.description(description);
    }
    engine.create(user_id, input).await.unwrap()
}
