/// PostgreSQL store implementations
///
/// Users live in the `users` table; a user's ordered tracker sequence is a
/// set of `user_trackers` join rows ordered by an append-only sequence
/// column. Trackers live in `trackers` with the code as primary key and
/// shipment events as JSONB.
///
/// Uniqueness is enforced by the database indexes (`users_email_key`,
/// `trackers_pkey`, `user_trackers_user_id_tracker_code_key`); violations
/// surface as [`StoreError::Duplicate`] via the sqlx error mapping.

use crate::error::StoreError;
use crate::models::{
    tracker::{Tracker, TrackingEvent},
    user::User,
};
use crate::store::{TrackerStore, UserStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

/// sqlx-backed [`UserStore`]
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

/// sqlx-backed [`TrackerStore`]
#[derive(Clone)]
pub struct PgTrackerStore {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    active: bool,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct TrackerRow {
    code: String,
    owner_id: Option<Uuid>,
    package_info: Json<Vec<TrackingEvent>>,
    registered_at: DateTime<Utc>,
}

impl From<TrackerRow> for Tracker {
    fn from(row: TrackerRow) -> Self {
        Tracker {
            code: row.code,
            owner_id: row.owner_id,
            package_info: row.package_info.0,
            registered_at: row.registered_at,
        }
    }
}

impl UserRow {
    fn into_user(self, trackers: Vec<Tracker>) -> User {
        User {
            id: self.id,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            active: self.active,
            trackers,
            created_at: self.created_at,
        }
    }
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Loads a user's tracker sequence in append order.
    async fn load_trackers(&self, user_id: Uuid) -> Result<Vec<Tracker>, StoreError> {
        let rows = sqlx::query_as::<_, TrackerRow>(
            r#"
            SELECT t.code, t.owner_id, t.package_info, t.registered_at
            FROM user_trackers ut
            JOIN trackers t ON t.code = ut.tracker_code
            WHERE ut.user_id = $1
            ORDER BY ut.seq
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Tracker::from).collect())
    }

    async fn load_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, password_hash, active, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let trackers = self.load_trackers(row.id).await?;
                Ok(Some(row.into_user(trackers)))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_all(&self) -> Result<Vec<User>, StoreError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, password_hash, active, created_at
            FROM users
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut users = Vec::with_capacity(rows.len());
        for row in rows {
            let trackers = self.load_trackers(row.id).await?;
            users.push(row.into_user(trackers));
        }

        Ok(users)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        self.load_user(id).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, password_hash, active, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let trackers = self.load_trackers(row.id).await?;
                Ok(Some(row.into_user(trackers)))
            }
            None => Ok(None),
        }
    }

    async fn create(&self, user: User) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, name, email, password_hash, active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, email, password_hash, active, created_at
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.active)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await?;

        // A freshly created user has no join rows yet.
        Ok(row.into_user(Vec::new()))
    }

    async fn update(&self, user: User) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET name = $2, email = $3, password_hash = $4, active = $5
            WHERE id = $1
            RETURNING id, name, email, password_hash, active, created_at
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)?;

        let trackers = self.load_trackers(row.id).await?;
        Ok(row.into_user(trackers))
    }

    async fn add_tracker_ref(&self, user_id: Uuid, tracker: &Tracker) -> Result<User, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO user_trackers (user_id, tracker_code)
            VALUES ($1, $2)
            "#,
        )
        .bind(user_id)
        .bind(&tracker.code)
        .execute(&self.pool)
        .await?;

        self.load_user(user_id).await?.ok_or(StoreError::NotFound)
    }
}

impl PgTrackerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TrackerStore for PgTrackerStore {
    async fn find_by_code(&self, code: &str) -> Result<Option<Tracker>, StoreError> {
        let row = sqlx::query_as::<_, TrackerRow>(
            r#"
            SELECT code, owner_id, package_info, registered_at
            FROM trackers
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Tracker::from))
    }

    async fn create(&self, tracker: Tracker) -> Result<Tracker, StoreError> {
        let row = sqlx::query_as::<_, TrackerRow>(
            r#"
            INSERT INTO trackers (code, owner_id, package_info, registered_at)
            VALUES ($1, $2, $3, $4)
            RETURNING code, owner_id, package_info, registered_at
            "#,
        )
        .bind(&tracker.code)
        .bind(tracker.owner_id)
        .bind(Json(&tracker.package_info))
        .bind(tracker.registered_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn delete(&self, code: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM trackers WHERE code = $1")
            .bind(code)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// Integration tests for these stores require a running database and are
// exercised through the service test suite against the in-memory stores;
// the SQL paths share their semantics via the trait contract.
