use rust_decimal::Decimal;
use sqlx::PgPool;

use super::ProtectionTotals;

/// Add to the single `protection_totals` row.
pub async fn add_totals(pool: &PgPool, delta: &ProtectionTotals) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        UPDATE protection_totals
        SET captured_mev  = captured_mev + $1,
            protocol_fees = protocol_fees + $2,
            lp_rewards    = lp_rewards + $3,
            updated_at    = NOW()
        WHERE id = 1
        "#,
    )
    .bind(delta.captured_mev)
    .bind(delta.protocol_fees)
    .bind(delta.lp_rewards)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get_totals(pool: &PgPool) -> anyhow::Result<ProtectionTotals> {
    let row: Option<(Decimal, Decimal, Decimal)> = sqlx::query_as(
        "SELECT captured_mev, protocol_fees, lp_rewards FROM protection_totals WHERE id = 1",
    )
    .fetch_optional(pool)
    .await?;

    Ok(row
        .map(|(captured_mev, protocol_fees, lp_rewards)| ProtectionTotals {
            captured_mev,
            protocol_fees,
            lp_rewards,
        })
        .unwrap_or_default())
}
