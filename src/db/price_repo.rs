use sqlx::PgPool;

use crate::models::{Page, PriceSample};

/// Insert a new price sample.
pub async fn insert_price(pool: &PgPool, sample: &PriceSample) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO price_samples (id, pool_id, venue, pair, encrypted_price, block_number, timestamp)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(sample.id)
    .bind(&sample.pool_id)
    .bind(&sample.venue)
    .bind(&sample.pair)
    .bind(&sample.encrypted_price)
    .bind(sample.block_number)
    .bind(sample.timestamp)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get the N most recent samples for a trading pair, across all pools.
pub async fn get_recent_for_pair(
    pool: &PgPool,
    pair: &str,
    limit: i64,
) -> anyhow::Result<Vec<PriceSample>> {
    let samples = sqlx::query_as::<_, PriceSample>(
        "SELECT * FROM price_samples WHERE pair = $1 ORDER BY timestamp DESC LIMIT $2",
    )
    .bind(pair)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(samples)
}

/// Paginated listing, optionally restricted to one pool.
pub async fn list_prices(
    pool: &PgPool,
    page: Page,
    pool_id: Option<&str>,
) -> anyhow::Result<Vec<PriceSample>> {
    let samples = sqlx::query_as::<_, PriceSample>(
        r#"
        SELECT * FROM price_samples
        WHERE ($1::TEXT IS NULL OR pool_id = $1)
        ORDER BY timestamp DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(pool_id)
    .bind(page.limit)
    .bind(page.offset)
    .fetch_all(pool)
    .await?;

    Ok(samples)
}

/// Latest sample of every pool that has reported at least once.
pub async fn get_latest_per_pool(pool: &PgPool) -> anyhow::Result<Vec<PriceSample>> {
    let samples = sqlx::query_as::<_, PriceSample>(
        r#"
        SELECT DISTINCT ON (pool_id) *
        FROM price_samples
        ORDER BY pool_id, timestamp DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(samples)
}
