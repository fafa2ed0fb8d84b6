use axum::http::StatusCode;
use once_cell::sync::Lazy;
use prometheus::{
    register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec, TextEncoder,
};

// Prometheus metrics (default registry)
pub static DOCUMENTS_UPLOADED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "docs_manager_documents_uploaded_total",
        "Total documents stored through uploads"
    )
    .expect("register documents_uploaded_total")
});

pub static UPLOAD_BYTES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "docs_manager_upload_bytes_total",
        "Total bytes written to the blob directory"
    )
    .expect("register upload_bytes_total")
});

pub static DOCUMENTS_DELETED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "docs_manager_documents_deleted_total",
        "Total documents deleted"
    )
    .expect("register documents_deleted_total")
});

pub static LINK_MUTATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "docs_manager_links_mutations_total",
        "Successful link registry writes by operation",
        &["op"]
    )
    .expect("register links_mutations_total")
});

pub static STORE_ERRORS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "docs_manager_store_errors_total",
        "Storage or upload failures surfaced as 5xx",
        &["store"]
    )
    .expect("register store_errors_total")
});

/// Touch every metric so `/metrics` lists them before the first write.
pub fn init() {
    Lazy::force(&DOCUMENTS_UPLOADED_TOTAL);
    Lazy::force(&UPLOAD_BYTES_TOTAL);
    Lazy::force(&DOCUMENTS_DELETED_TOTAL);
    Lazy::force(&LINK_MUTATIONS_TOTAL);
    Lazy::force(&STORE_ERRORS_TOTAL);
}

pub fn encode_metrics() -> (StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (StatusCode::OK, String::from_utf8(buffer).unwrap_or_default())
}
