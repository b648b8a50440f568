use metrics::{
    log_counter,
    register_counter,
};

register_counter!(
    INDEX_VALUE_TRUNCATIONS_TOTAL,
    "Number of index value payloads cut at the truncation threshold"
);
pub fn log_index_value_truncated() {
    log_counter(&INDEX_VALUE_TRUNCATIONS_TOTAL, 1);
}
