use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;

/// Progress counters written by the price monitor and read by the API.
#[derive(Debug, Default)]
pub struct MonitorStatus {
    running: AtomicBool,
    iterations: AtomicU64,
    errors: AtomicU64,
    current_block: AtomicI64,
    last_tick_at: Mutex<Option<DateTime<Utc>>>,
    last_error: Mutex<Option<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonitorSnapshot {
    pub running: bool,
    pub iterations: u64,
    pub errors: u64,
    pub current_block: i64,
    pub last_tick_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

impl MonitorStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_running(&self) {
        self.running.store(true, Ordering::Relaxed);
    }

    pub fn record_success(&self, block_number: i64) {
        self.iterations.fetch_add(1, Ordering::Relaxed);
        self.current_block.store(block_number, Ordering::Relaxed);
        *self.last_tick_at.lock() = Some(Utc::now());
    }

    pub fn record_error(&self, error: &anyhow::Error) {
        self.errors.fetch_add(1, Ordering::Relaxed);
        *self.last_error.lock() = Some(format!("{error:#}"));
    }

    pub fn snapshot(&self) -> MonitorSnapshot {
        MonitorSnapshot {
            running: self.running.load(Ordering::Relaxed),
            iterations: self.iterations.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            current_block: self.current_block.load(Ordering::Relaxed),
            last_tick_at: *self.last_tick_at.lock(),
            last_error: self.last_error.lock().clone(),
        }
    }
}
