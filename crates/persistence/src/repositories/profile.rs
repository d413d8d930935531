//! Profile repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::ProfileEntity;
use crate::metrics::QueryTimer;

/// Repository for profile-related database operations.
#[derive(Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    /// Creates a new ProfileRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Returns the caller's profile, creating an empty one on first access.
    pub async fn ensure_exists(
        &self,
        id: Uuid,
        email: Option<&str>,
    ) -> Result<ProfileEntity, sqlx::Error> {
        let timer = QueryTimer::new("ensure_profile_exists");

        sqlx::query(
            r#"
            INSERT INTO profiles (id, email)
            VALUES ($1, $2)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(email)
        .execute(&self.pool)
        .await?;

        let result = sqlx::query_as::<_, ProfileEntity>(
            r#"
            SELECT id, email, username, display_name, avatar_url, bio, is_creator, is_premium,
                   stripe_customer_id, soulshield_preset, soulshield_blocked, created_at, updated_at
            FROM profiles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await;

        timer.record();
        result
    }

    /// Find a profile by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ProfileEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_profile_by_id");
        let result = sqlx::query_as::<_, ProfileEntity>(
            r#"
            SELECT id, email, username, display_name, avatar_url, bio, is_creator, is_premium,
                   stripe_customer_id, soulshield_preset, soulshield_blocked, created_at, updated_at
            FROM profiles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update editable profile fields. `None` leaves a field unchanged.
    pub async fn update(
        &self,
        id: Uuid,
        username: Option<&str>,
        display_name: Option<&str>,
        avatar_url: Option<&str>,
        bio: Option<&str>,
    ) -> Result<Option<ProfileEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_profile");
        let result = sqlx::query_as::<_, ProfileEntity>(
            r#"
            UPDATE profiles
            SET username = COALESCE($2, username),
                display_name = COALESCE($3, display_name),
                avatar_url = COALESCE($4, avatar_url),
                bio = COALESCE($5, bio)
            WHERE id = $1
            RETURNING id, email, username, display_name, avatar_url, bio, is_creator, is_premium,
                      stripe_customer_id, soulshield_preset, soulshield_blocked, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(username)
        .bind(display_name)
        .bind(avatar_url)
        .bind(bio)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Store the SoulShield preset and custom blocked categories.
    pub async fn set_soulshield(
        &self,
        id: Uuid,
        preset: &str,
        blocked: &[String],
    ) -> Result<Option<ProfileEntity>, sqlx::Error> {
        let timer = QueryTimer::new("set_profile_soulshield");
        let result = sqlx::query_as::<_, ProfileEntity>(
            r#"
            UPDATE profiles
            SET soulshield_preset = $2, soulshield_blocked = $3
            WHERE id = $1
            RETURNING id, email, username, display_name, avatar_url, bio, is_creator, is_premium,
                      stripe_customer_id, soulshield_preset, soulshield_blocked, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(preset)
        .bind(blocked)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Toggle the premium flag. Returns true if a profile was updated.
    pub async fn set_premium(&self, id: Uuid, is_premium: bool) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("set_profile_premium");
        let result = sqlx::query(
            r#"
            UPDATE profiles SET is_premium = $2 WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(is_premium)
        .execute(&self.pool)
        .await;
        timer.record();
        result.map(|r| r.rows_affected() > 0)
    }

    /// Remember the Stripe customer for later checkouts.
    pub async fn set_stripe_customer(
        &self,
        id: Uuid,
        stripe_customer_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("set_profile_stripe_customer");
        let result = sqlx::query(
            r#"
            UPDATE profiles SET stripe_customer_id = $2 WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(stripe_customer_id)
        .execute(&self.pool)
        .await;
        timer.record();
        result.map(|r| r.rows_affected() > 0)
    }

    /// Mark the profile as a creator once they own a channel.
    pub async fn mark_creator(&self, id: Uuid) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("mark_profile_creator");
        let result = sqlx::query(
            r#"
            UPDATE profiles SET is_creator = true WHERE id = $1 AND is_creator = false
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await;
        timer.record();
        result.map(|_| ())
    }
}
