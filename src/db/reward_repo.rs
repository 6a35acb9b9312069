use sqlx::PgPool;

use crate::models::{LpReward, Page};

/// Insert a batch of rewards in a single transaction.
pub async fn insert_rewards(pool: &PgPool, rewards: &[LpReward]) -> anyhow::Result<()> {
    let mut tx = pool.begin().await?;

    for reward in rewards {
        sqlx::query(
            r#"
            INSERT INTO lp_rewards
                (id, protection_event_id, lp_address, encrypted_amount, claimed, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(reward.id)
        .bind(reward.protection_event_id)
        .bind(&reward.lp_address)
        .bind(&reward.encrypted_amount)
        .bind(reward.claimed)
        .bind(reward.created_at)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

pub async fn list_rewards(pool: &PgPool, page: Page) -> anyhow::Result<Vec<LpReward>> {
    let rows = sqlx::query_as::<_, LpReward>(
        "SELECT * FROM lp_rewards ORDER BY created_at DESC LIMIT $1 OFFSET $2",
    )
    .bind(page.limit)
    .bind(page.offset)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// All rewards credited to an LP address (already lower-cased).
pub async fn get_rewards_by_address(
    pool: &PgPool,
    lp_address: &str,
) -> anyhow::Result<Vec<LpReward>> {
    let rows = sqlx::query_as::<_, LpReward>(
        "SELECT * FROM lp_rewards WHERE lp_address = $1 ORDER BY created_at DESC",
    )
    .bind(lp_address)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
