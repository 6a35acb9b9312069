use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::models::ProtectionStatus;

/// Install the Prometheus exporter as the global recorder and pre-register
/// the monitor metrics so they are scraped before the first increment.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("failed to install Prometheus recorder: {e}"))?;

    counter!("price_samples_total").absolute(0);
    counter!("opportunities_detected_total").absolute(0);
    counter!("lp_rewards_total").absolute(0);
    counter!("monitor_errors_total").absolute(0);
    for status in [ProtectionStatus::Protected, ProtectionStatus::Skipped] {
        counter!("protection_events_total", "status" => status.as_str()).absolute(0);
    }

    // Histogram is lazily created on first record; force creation.
    histogram!("monitor_iteration_seconds").record(0.0);

    Ok(handle)
}

/// A handle backed by a recorder that is not installed globally.
/// Rendering it yields an empty payload; used where a process-wide
/// recorder is already taken (tests).
pub fn detached_handle() -> PrometheusHandle {
    PrometheusBuilder::new().build_recorder().handle()
}

#[cfg(test)]
mod tests {
    use super::*;

    // The only test in this crate that installs the global recorder.
    #[test]
    fn test_init_registers_status_labels() {
        let handle = init_metrics().unwrap();
        let rendered = handle.render();

        // Other unit tests may bump these concurrently; only presence is checked.
        assert!(rendered.contains(r#"protection_events_total{status="protected"}"#), "{rendered}");
        assert!(rendered.contains(r#"protection_events_total{status="skipped"}"#), "{rendered}");
        assert!(rendered.contains("price_samples_total"), "{rendered}");
    }
}
