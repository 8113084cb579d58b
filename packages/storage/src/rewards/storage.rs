// ABOUTME: Reward storage layer using SQLite
// ABOUTME: Catalogue management and transactional green point redemption

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use tracing::{debug, info};

use super::types::{
    RedemptionStatus, Reward, RewardCategory, RewardCreateInput, RewardRef, UserReward,
};
use crate::common::{map_write_err, NamedRef};
use crate::StorageError;

const REWARD_SELECT: &str = "SELECT r.*, r.created_by AS creator_id, u.name AS creator_name \
     FROM rewards r LEFT JOIN users u ON u.id = r.created_by";

const REDEMPTION_SELECT: &str = "SELECT ur.*, r.title AS reward_title, \
     r.points_required AS reward_points_required \
     FROM user_rewards ur LEFT JOIN rewards r ON r.id = ur.reward_id";

pub struct RewardStorage {
    pool: SqlitePool,
}

impl RewardStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_reward(
        &self,
        input: RewardCreateInput,
        created_by: &str,
    ) -> Result<Reward, StorageError> {
        if input.points_required < 0 {
            return Err(StorageError::Invalid(
                "pointsRequired must not be negative".to_string(),
            ));
        }

        let reward_id = airwatch_core::generate_id("reward");
        let now = Utc::now();

        debug!("Creating reward: {} ({})", reward_id, input.title);

        sqlx::query(
            r#"
            INSERT INTO rewards (id, title, points_required, category, description, partner,
                                 valid_until, redeem_instructions, image, available, created_by,
                                 created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&reward_id)
        .bind(&input.title)
        .bind(input.points_required)
        .bind(input.category)
        .bind(&input.description)
        .bind(&input.partner)
        .bind(input.valid_until)
        .bind(&input.redeem_instructions)
        .bind(&input.image)
        .bind(input.available.unwrap_or(true))
        .bind(created_by)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        self.get_reward(&reward_id).await
    }

    pub async fn get_reward(&self, reward_id: &str) -> Result<Reward, StorageError> {
        let row = sqlx::query(&format!("{} WHERE r.id = ?", REWARD_SELECT))
            .bind(reward_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?
            .ok_or(StorageError::NotFound("Reward"))?;

        row_to_reward(&row)
    }

    /// Available rewards, newest first, optionally by category
    pub async fn list_available(
        &self,
        category: Option<RewardCategory>,
    ) -> Result<Vec<Reward>, StorageError> {
        debug!("Fetching available rewards (category: {:?})", category);

        let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new(REWARD_SELECT);
        query_builder.push(" WHERE r.available = 1");
        if let Some(category) = category {
            query_builder.push(" AND r.category = ").push_bind(category);
        }
        query_builder.push(" ORDER BY r.created_at DESC, r.rowid DESC");

        let rows = query_builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_reward).collect()
    }

    /// Spend a user's green points on a reward and issue a voucher.
    /// Balance check, deduction and voucher insert share one transaction.
    pub async fn redeem(&self, reward_id: &str, user_id: &str) -> Result<UserReward, StorageError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        let reward_row = sqlx::query(&format!("{} WHERE r.id = ?", REWARD_SELECT))
            .bind(reward_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?
            .ok_or(StorageError::NotFound("Reward"))?;
        let reward = row_to_reward(&reward_row)?;

        if !reward.is_redeemable_at(now) {
            return Err(StorageError::Invalid("Reward is not available".to_string()));
        }

        let balance: Option<i64> = sqlx::query_scalar("SELECT green_points FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?;
        let balance = balance.ok_or(StorageError::NotFound("User"))?;

        if balance < reward.points_required {
            return Err(StorageError::Invalid(format!(
                "Insufficient green points: {} required, {} available",
                reward.points_required, balance
            )));
        }

        sqlx::query(
            "UPDATE users SET green_points = green_points - ?, updated_at = ? WHERE id = ? AND green_points >= ?",
        )
        .bind(reward.points_required)
        .bind(now)
        .bind(user_id)
        .bind(reward.points_required)
        .execute(&mut *tx)
        .await
        .map_err(StorageError::Sqlx)?;

        let redemption_id = airwatch_core::generate_id("ureward");
        let code = airwatch_core::generate_redemption_code();

        sqlx::query(
            r#"
            INSERT INTO user_rewards (id, user_id, reward_id, redemption_code, redeemed_at, status,
                                      created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&redemption_id)
        .bind(user_id)
        .bind(reward_id)
        .bind(&code)
        .bind(now)
        .bind(RedemptionStatus::Redeemed)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(map_write_err)?;

        tx.commit().await.map_err(StorageError::Sqlx)?;

        info!(
            "User {} redeemed reward {} for {} points",
            user_id, reward_id, reward.points_required
        );

        self.get_redemption(&redemption_id).await
    }

    pub async fn get_redemption(&self, redemption_id: &str) -> Result<UserReward, StorageError> {
        let row = sqlx::query(&format!("{} WHERE ur.id = ?", REDEMPTION_SELECT))
            .bind(redemption_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?
            .ok_or(StorageError::NotFound("Redemption"))?;

        row_to_redemption(&row)
    }

    /// A user's vouchers, newest first
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<UserReward>, StorageError> {
        let rows = sqlx::query(&format!(
            "{} WHERE ur.user_id = ? ORDER BY ur.created_at DESC, ur.rowid DESC",
            REDEMPTION_SELECT
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_redemption).collect()
    }

    pub async fn update_redemption_status(
        &self,
        redemption_id: &str,
        status: RedemptionStatus,
    ) -> Result<UserReward, StorageError> {
        debug!("Setting redemption {} to {:?}", redemption_id, status);

        let result = sqlx::query("UPDATE user_rewards SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status)
            .bind(Utc::now())
            .bind(redemption_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound("Redemption"));
        }

        self.get_redemption(redemption_id).await
    }
}

fn row_to_reward(row: &SqliteRow) -> Result<Reward, StorageError> {
    Ok(Reward {
        id: row.try_get("id").map_err(StorageError::Sqlx)?,
        title: row.try_get("title").map_err(StorageError::Sqlx)?,
        points_required: row.try_get("points_required").map_err(StorageError::Sqlx)?,
        category: row.try_get("category").map_err(StorageError::Sqlx)?,
        description: row.try_get("description").map_err(StorageError::Sqlx)?,
        partner: row.try_get("partner").map_err(StorageError::Sqlx)?,
        valid_until: row.try_get("valid_until").map_err(StorageError::Sqlx)?,
        redeem_instructions: row.try_get("redeem_instructions").map_err(StorageError::Sqlx)?,
        image: row.try_get("image").map_err(StorageError::Sqlx)?,
        available: row.try_get("available").map_err(StorageError::Sqlx)?,
        created_by: NamedRef::from_row(row, "creator")?,
        created_at: row.try_get("created_at").map_err(StorageError::Sqlx)?,
        updated_at: row.try_get("updated_at").map_err(StorageError::Sqlx)?,
    })
}

fn row_to_redemption(row: &SqliteRow) -> Result<UserReward, StorageError> {
    Ok(UserReward {
        id: row.try_get("id").map_err(StorageError::Sqlx)?,
        user: row.try_get("user_id").map_err(StorageError::Sqlx)?,
        reward: RewardRef {
            id: row.try_get("reward_id").map_err(StorageError::Sqlx)?,
            title: row.try_get("reward_title").map_err(StorageError::Sqlx)?,
            points_required: row.try_get("reward_points_required").map_err(StorageError::Sqlx)?,
        },
        redemption_code: row.try_get("redemption_code").map_err(StorageError::Sqlx)?,
        redeemed_at: row.try_get("redeemed_at").map_err(StorageError::Sqlx)?,
        status: row.try_get("status").map_err(StorageError::Sqlx)?,
        created_at: row.try_get("created_at").map_err(StorageError::Sqlx)?,
        updated_at: row.try_get("updated_at").map_err(StorageError::Sqlx)?,
    })
}
