pub mod protection;

pub use protection::{apply_protection, plan_protection, synthetic_tx_hash, ProtectionOutcome, ProtectionParams, ProtectionPlan, LP_ADDRESSES};
