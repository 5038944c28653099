//! Prometheus metrics for catalog mutations.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::info;

static METRICS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    ProductsCreated,
    ProductsUpdated,
    ProductsDeleted,
    ImagesStored,
    ImageDecodeErrors,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::ProductsCreated => "catalog_products_created_total",
            MetricName::ProductsUpdated => "catalog_products_updated_total",
            MetricName::ProductsDeleted => "catalog_products_deleted_total",
            MetricName::ImagesStored => "catalog_images_stored_total",
            MetricName::ImageDecodeErrors => "catalog_image_decode_errors_total",
        }
    }
}

/// Installs the global Prometheus recorder. Calling it again is a no-op.
pub fn init() -> anyhow::Result<()> {
    if METRICS_HANDLE.get().is_some() {
        return Ok(());
    }
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus recorder: {e}"))?;
    let _ = METRICS_HANDLE.set(handle);
    info!("Metrics system initialized");
    Ok(())
}

/// Prometheus text exposition, or `None` before `init`.
pub fn render() -> Option<String> {
    METRICS_HANDLE.get().map(|h| h.render())
}

fn increment(name: MetricName) {
    ::metrics::counter!(name.as_str()).increment(1);
}

pub fn product_created() {
    increment(MetricName::ProductsCreated);
}

pub fn product_updated() {
    increment(MetricName::ProductsUpdated);
}

pub fn product_deleted() {
    increment(MetricName::ProductsDeleted);
}

pub fn image_stored() {
    increment(MetricName::ImagesStored);
}

pub fn image_decode_error() {
    increment(MetricName::ImageDecodeErrors);
}
