use sqlx::PgPool;

use crate::models::{ArbitrageOpportunity, Page};

pub async fn insert_opportunity(
    pool: &PgPool,
    opportunity: &ArbitrageOpportunity,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO arbitrage_opportunities
            (id, pair, buy_pool_id, sell_pool_id, encrypted_spread, encrypted_threshold,
             protection_triggered, block_number, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(opportunity.id)
    .bind(&opportunity.pair)
    .bind(&opportunity.buy_pool_id)
    .bind(&opportunity.sell_pool_id)
    .bind(&opportunity.encrypted_spread)
    .bind(&opportunity.encrypted_threshold)
    .bind(opportunity.protection_triggered)
    .bind(opportunity.block_number)
    .bind(opportunity.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn list_opportunities(
    pool: &PgPool,
    page: Page,
) -> anyhow::Result<Vec<ArbitrageOpportunity>> {
    let rows = sqlx::query_as::<_, ArbitrageOpportunity>(
        "SELECT * FROM arbitrage_opportunities ORDER BY created_at DESC LIMIT $1 OFFSET $2",
    )
    .bind(page.limit)
    .bind(page.offset)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
