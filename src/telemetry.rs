use metrics::{describe_counter, describe_gauge};
use once_cell::sync::OnceCell;

pub const SCANS_TOTAL: &str = "badges_scans_total";
pub const CARDS_DISPATCHED_TOTAL: &str = "badges_cards_dispatched_total";
pub const FETCH_EMPTY_TOTAL: &str = "badges_fetch_empty_total";
pub const FETCH_ERRORS_TOTAL: &str = "badges_fetch_errors_total";
pub const RENDERED_TOTAL: &str = "badges_rendered_total";
pub const PROCESSED_KEYS: &str = "badges_processed_keys";

/// One-time metrics registration (so series show up once a recorder is installed).
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(SCANS_TOTAL, "Discovery scans run (timer + mutation).");
        describe_counter!(
            CARDS_DISPATCHED_TOTAL,
            "Cards whose identity key was unseen and got a fetch task."
        );
        describe_counter!(
            FETCH_EMPTY_TOTAL,
            "Fetches that produced no rating at all."
        );
        describe_counter!(
            FETCH_ERRORS_TOTAL,
            "Fetches aborted by a transport or decode failure."
        );
        describe_counter!(RENDERED_TOTAL, "Overlays attached to cards.");
        describe_gauge!(PROCESSED_KEYS, "Size of the processed identity set.");
    });
}
