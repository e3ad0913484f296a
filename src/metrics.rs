use axum::{routing::get, Router};
use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Initialize the Prometheus recorder and register the engine's series
    /// so they show up on /metrics before the first batch runs.
    pub fn init() -> anyhow::Result<Self> {
        // Default buckets to avoid API differences across crate versions.
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .map_err(|e| anyhow::anyhow!("prometheus: install recorder: {e}"))?;

        describe_counter!(
            "prioritize_batches_total",
            "Completed ranking batch runs."
        );
        describe_counter!(
            "prioritize_articles_failed_total",
            "Articles excluded from a batch after an unrecoverable scoring error."
        );
        describe_counter!(
            "resolver_fetch_failures_total",
            "Content fetches that failed and fell back to stored text."
        );
        describe_histogram!("prioritize_batch_ms", "Batch ranking time in milliseconds.");

        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
