// src/db/postgres/accounts.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{postgres::PgEntity, AccountRepository},
    models::{
        auth::{NewAccount, RegisteredAccount, UserAccount},
        company::{Company, NewCompany},
        profile::{NewProfile, Profile},
    },
};

#[derive(Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, AppError> {
        let user = sqlx::query_as::<_, UserAccount>("SELECT * FROM users WHERE lower(email) = lower($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserAccount>, AppError> {
        let user = sqlx::query_as::<_, UserAccount>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Usuário, empresa e perfil na mesma transação.
    async fn register(&self, account: NewAccount) -> Result<RegisteredAccount, AppError> {
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, UserAccount>(
            r#"
            INSERT INTO users (id, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&account.email)
        .bind(&account.password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            // E-mail duplicado
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::EmailAlreadyExists;
                }
            }
            e.into()
        })?;

        let company = match account.company_name.as_deref() {
            Some(name) => Some(Company::insert(&mut tx, Uuid::new_v4(), None, NewCompany::named(name)).await?),
            None => None,
        };

        let profile = Profile::insert(
            &mut tx,
            user.id,
            company.as_ref().map(|c| c.id),
            NewProfile {
                user_id: user.id,
                username: account.username,
                full_name: account.full_name,
                role: account.role,
            },
        )
        .await?;

        tx.commit().await?;

        Ok(RegisteredAccount { user, profile, company })
    }
}
