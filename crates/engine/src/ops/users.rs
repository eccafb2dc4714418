use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, NewUser, ResultEngine, User, commands::normalize_email, users,
};

use super::{Engine, with_tx};

impl Engine {
    /// Register a user. Emails are unique, compared case-insensitively.
    pub async fn create_user(&self, new_user: NewUser) -> ResultEngine<User> {
        let (name, email) = new_user.validate()?;
        with_tx!(self, |db_tx| {
            let taken = users::Entity::find()
                .filter(users::Column::Email.eq(email.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if taken {
                return Err(EngineError::ExistingKey(email));
            }

            let model = users::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                name: ActiveValue::Set(name),
                email: ActiveValue::Set(email),
                password: ActiveValue::Set(new_user.password_hash),
                created_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;

            tracing::info!(user_id = %model.id, "user registered");
            Ok(User::from(model))
        })
    }

    /// Look up a user and its stored password hash for a login attempt.
    pub async fn user_credentials_by_email(
        &self,
        email: &str,
    ) -> ResultEngine<Option<(User, String)>> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(normalize_email(email)))
            .one(&self.database)
            .await?;
        Ok(model.map(|model| {
            let password = model.password.clone();
            (User::from(model), password)
        }))
    }

    pub async fn user_by_id(&self, user_id: Uuid) -> ResultEngine<User> {
        users::Entity::find_by_id(user_id)
            .one(&self.database)
            .await?
            .map(User::from)
            .ok_or_else(|| EngineError::NotFound("user".to_string()))
    }
}
