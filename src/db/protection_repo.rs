use sqlx::PgPool;

use crate::models::{Page, ProtectionEvent};

pub async fn insert_event(pool: &PgPool, event: &ProtectionEvent) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO protection_events
            (id, opportunity_id, pair, status, encrypted_fee, encrypted_mev, tx_hash, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(event.id)
    .bind(event.opportunity_id)
    .bind(&event.pair)
    .bind(&event.status)
    .bind(&event.encrypted_fee)
    .bind(&event.encrypted_mev)
    .bind(&event.tx_hash)
    .bind(event.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn list_events(pool: &PgPool, page: Page) -> anyhow::Result<Vec<ProtectionEvent>> {
    let rows = sqlx::query_as::<_, ProtectionEvent>(
        "SELECT * FROM protection_events ORDER BY created_at DESC LIMIT $1 OFFSET $2",
    )
    .bind(page.limit)
    .bind(page.offset)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
