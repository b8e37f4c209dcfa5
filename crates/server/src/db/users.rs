//! `PostgreSQL` implementation of [`UserStore`].
//!
//! Queries are built from the column mapping in [`super::columns`], so this
//! file never spells out individual user columns.

use async_trait::async_trait;
use sqlx::PgPool;

use user_directory_core::{User, UserId};

use super::RepositoryError;
use super::columns::{
    ID_COLUMN, SEARCH_USERS, SELECT_USERS, UPSERT_USER, USERS_TABLE, bind_user, user_from_row,
};
use super::store::UserStore;

/// Repository for user database operations.
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn save(&self, user: User) -> Result<User, RepositoryError> {
        let row = bind_user(sqlx::query(&UPSERT_USER), &user)
            .fetch_one(&self.pool)
            .await?;

        user_from_row(&row)
    }

    async fn save_all(&self, users: Vec<User>) -> Result<Vec<User>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        for user in &users {
            bind_user(sqlx::query(&UPSERT_USER), user)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(users)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let sql = format!("{} WHERE {ID_COLUMN} = $1", *SELECT_USERS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let sql = format!(
            "{} WHERE email = $1 ORDER BY {ID_COLUMN} LIMIT 1",
            *SELECT_USERS
        );
        let row = sqlx::query(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_all(&self) -> Result<Vec<User>, RepositoryError> {
        let sql = format!("{} ORDER BY {ID_COLUMN}", *SELECT_USERS);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        rows.iter().map(user_from_row).collect()
    }

    async fn search(&self, query: &str) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query(&SEARCH_USERS)
            .bind(query)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(user_from_row).collect()
    }

    async fn delete(&self, user: &User) -> Result<(), RepositoryError> {
        let sql = format!("DELETE FROM {USERS_TABLE} WHERE {ID_COLUMN} = $1");
        let result = sqlx::query(&sql)
            .bind(user.id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
