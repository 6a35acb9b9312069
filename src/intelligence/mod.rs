pub mod spread;

pub use spread::{decrypt_samples, detect_spreads, display_bps, spread_bps, threshold_bps, PricePoint, SpreadSignal};
