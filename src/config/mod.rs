use std::env;
use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;

use crate::services::price_monitor::MonitorConfig;

const DEFAULT_FHE_KEY: &str = "fheap-demo-key";
const DEFAULT_MEMORY_MAX_ROWS: usize = crate::db::memory::DEFAULT_MAX_ROWS;
const DEFAULT_POOLS: &str = "pool_uniswap_v4_eth_usdc|uniswap_v4|ETH/USDC,\
                             pool_sushiswap_eth_usdc|sushiswap|ETH/USDC,\
                             pool_curve_eth_usdc|curve|ETH/USDC";

/// A liquidity pool polled by the price monitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    pub pool_id: String,
    pub venue: String,
    pub pair: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Absent → in-memory store.
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub fhe_key: String,
    /// Per-table row cap for the in-memory store.
    pub memory_store_max_rows: usize,

    // Price monitor
    pub monitor_enabled: bool,
    pub monitor_interval_secs: u64,
    pub monitor_error_backoff_secs: u64,
    pub pools: Vec<PoolConfig>,
    pub base_price: Decimal,
    pub price_volatility_bps: Decimal,
    pub start_block: i64,

    // Detection / protection
    pub opportunity_lookback: i64,
    pub min_profit_bps: Decimal,
    pub swap_fee_bps: Decimal,
    pub trade_notional: Decimal,
    pub min_mev_capture: Decimal,
    pub protection_enabled: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let cors_origins = split_list(&env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".into()));
        let pools = parse_pools(&env::var("MONITOR_POOLS").unwrap_or_else(|_| DEFAULT_POOLS.into()))?;

        let config = Self {
            database_url: env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env_or("PORT", 8001)?,
            cors_origins,
            fhe_key: env::var("FHE_KEY").unwrap_or_else(|_| DEFAULT_FHE_KEY.into()),
            memory_store_max_rows: env_or("MEMORY_STORE_MAX_ROWS", DEFAULT_MEMORY_MAX_ROWS)?,

            monitor_enabled: env_or("MONITOR_ENABLED", true)?,
            monitor_interval_secs: env_or("MONITOR_INTERVAL_SECS", 30)?,
            monitor_error_backoff_secs: env_or("MONITOR_ERROR_BACKOFF_SECS", 60)?,
            pools,
            base_price: env_or("BASE_PRICE", Decimal::from(2_500))?,
            price_volatility_bps: env_or("PRICE_VOLATILITY_BPS", Decimal::from(50))?,
            start_block: env_or("START_BLOCK", 18_500_000)?,

            opportunity_lookback: env_or("OPPORTUNITY_LOOKBACK", 10)?,
            min_profit_bps: env_or("MIN_PROFIT_BPS", Decimal::from(10))?,
            swap_fee_bps: env_or("SWAP_FEE_BPS", Decimal::from(5))?,
            trade_notional: env_or("TRADE_NOTIONAL", Decimal::from(100_000))?,
            min_mev_capture: env_or("MIN_MEV_CAPTURE", Decimal::ONE)?,
            protection_enabled: env_or("PROTECTION_ENABLED", true)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject values that parse but would stall or disable the monitor.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.monitor_interval_secs == 0 {
            anyhow::bail!("MONITOR_INTERVAL_SECS must be at least 1");
        }
        if self.monitor_error_backoff_secs == 0 {
            anyhow::bail!("MONITOR_ERROR_BACKOFF_SECS must be at least 1");
        }
        // Detection compares pairs of samples
        if self.opportunity_lookback < 2 {
            anyhow::bail!("OPPORTUNITY_LOOKBACK must be at least 2, got {}", self.opportunity_lookback);
        }
        if self.start_block < 0 {
            anyhow::bail!("START_BLOCK must not be negative");
        }
        if self.memory_store_max_rows == 0 {
            anyhow::bail!("MEMORY_STORE_MAX_ROWS must be at least 1");
        }
        if self.base_price <= Decimal::ZERO {
            anyhow::bail!("BASE_PRICE must be positive");
        }
        if self.trade_notional <= Decimal::ZERO {
            anyhow::bail!("TRADE_NOTIONAL must be positive");
        }

        for (key, value) in [
            ("PRICE_VOLATILITY_BPS", self.price_volatility_bps),
            ("MIN_PROFIT_BPS", self.min_profit_bps),
            ("SWAP_FEE_BPS", self.swap_fee_bps),
            ("MIN_MEV_CAPTURE", self.min_mev_capture),
        ] {
            if value < Decimal::ZERO {
                anyhow::bail!("{key} must not be negative, got {value}");
            }
        }

        Ok(())
    }

    /// Settings handed to the background price monitor.
    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig {
            interval: Duration::from_secs(self.monitor_interval_secs),
            error_backoff: Duration::from_secs(self.monitor_error_backoff_secs),
            pools: self.pools.clone(),
            base_price: self.base_price,
            volatility_bps: self.price_volatility_bps,
            start_block: self.start_block,
            lookback: self.opportunity_lookback,
            min_profit_bps: self.min_profit_bps,
            swap_fee_bps: self.swap_fee_bps,
            trade_notional: self.trade_notional,
            min_mev_capture: self.min_mev_capture,
            protection_enabled: self.protection_enabled,
        }
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}

fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid value for {key}: {e}")),
        _ => Ok(default),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parse `pool_id|venue|pair` entries separated by commas.
pub fn parse_pools(raw: &str) -> anyhow::Result<Vec<PoolConfig>> {
    let pools = split_list(raw)
        .into_iter()
        .map(|entry| {
            let fields: Vec<&str> = entry.split('|').map(str::trim).collect();
            match fields.as_slice() {
                [pool_id, venue, pair] if !pool_id.is_empty() && !pair.is_empty() => {
                    Ok(PoolConfig {
                        pool_id: pool_id.to_string(),
                        venue: venue.to_string(),
                        pair: pair.to_uppercase(),
                    })
                }
                _ => Err(anyhow::anyhow!(
                    "invalid MONITOR_POOLS entry '{entry}' (expected pool_id|venue|pair)"
                )),
            }
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    if pools.is_empty() {
        anyhow::bail!("MONITOR_POOLS must name at least one pool");
    }

    Ok(pools)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pools() {
        let pools = parse_pools(DEFAULT_POOLS).unwrap();
        assert_eq!(pools.len(), 3);
        assert!(pools.iter().all(|p| p.pair == "ETH/USDC"));
        assert_eq!(pools[1].venue, "sushiswap");
    }

    #[test]
    fn test_parse_pools_rejects_bad_entry() {
        assert!(parse_pools("only_two|fields").is_err());
        assert!(parse_pools(" , ").is_err());
    }

    #[test]
    fn test_parse_pools_normalizes_pair() {
        let pools = parse_pools("p1|uni|eth/usdc").unwrap();
        assert_eq!(pools[0].pair, "ETH/USDC");
    }

    fn valid_config() -> AppConfig {
        AppConfig {
            database_url: None,
            host: "127.0.0.1".into(),
            port: 8001,
            cors_origins: vec!["*".into()],
            fhe_key: DEFAULT_FHE_KEY.into(),
            memory_store_max_rows: 100,
            monitor_enabled: true,
            monitor_interval_secs: 30,
            monitor_error_backoff_secs: 60,
            pools: parse_pools(DEFAULT_POOLS).unwrap(),
            base_price: Decimal::from(2_500),
            price_volatility_bps: Decimal::from(50),
            start_block: 18_500_000,
            opportunity_lookback: 10,
            min_profit_bps: Decimal::from(10),
            swap_fee_bps: Decimal::from(5),
            trade_notional: Decimal::from(100_000),
            min_mev_capture: Decimal::ONE,
            protection_enabled: true,
        }
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_short_lookback() {
        for lookback in [-1, 0, 1] {
            let config = AppConfig { opportunity_lookback: lookback, ..valid_config() };
            let err = config.validate().unwrap_err();
            assert!(err.to_string().contains("OPPORTUNITY_LOOKBACK"), "{err}");
        }
        let config = AppConfig { opportunity_lookback: 2, ..valid_config() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_intervals() {
        let config = AppConfig { monitor_interval_secs: 0, ..valid_config() };
        assert!(config.validate().unwrap_err().to_string().contains("MONITOR_INTERVAL_SECS"));

        let config = AppConfig { monitor_error_backoff_secs: 0, ..valid_config() };
        assert!(config.validate().unwrap_err().to_string().contains("MONITOR_ERROR_BACKOFF_SECS"));
    }

    #[test]
    fn test_validate_rejects_negative_bps() {
        let config = AppConfig { min_profit_bps: Decimal::from(-1), ..valid_config() };
        assert!(config.validate().unwrap_err().to_string().contains("MIN_PROFIT_BPS"));

        let config = AppConfig { swap_fee_bps: Decimal::from(-5), ..valid_config() };
        assert!(config.validate().unwrap_err().to_string().contains("SWAP_FEE_BPS"));

        let config = AppConfig { price_volatility_bps: Decimal::from(-50), ..valid_config() };
        assert!(config.validate().unwrap_err().to_string().contains("PRICE_VOLATILITY_BPS"));

        let config = AppConfig { min_mev_capture: Decimal::from(-1), ..valid_config() };
        assert!(config.validate().unwrap_err().to_string().contains("MIN_MEV_CAPTURE"));
    }

    #[test]
    fn test_validate_rejects_non_positive_amounts() {
        let config = AppConfig { trade_notional: Decimal::ZERO, ..valid_config() };
        assert!(config.validate().unwrap_err().to_string().contains("TRADE_NOTIONAL"));

        let config = AppConfig { base_price: Decimal::from(-1), ..valid_config() };
        assert!(config.validate().unwrap_err().to_string().contains("BASE_PRICE"));

        let config = AppConfig { memory_store_max_rows: 0, ..valid_config() };
        assert!(config.validate().unwrap_err().to_string().contains("MEMORY_STORE_MAX_ROWS"));
    }

    #[test]
    fn test_split_list() {
        assert_eq!(
            split_list("http://a.test, http://b.test,,"),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }
}
