/// Current UTC timestamp in milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// UTC business date formatted for order/quote reference numbers.
pub fn today_compact() -> String {
    chrono::Utc::now().format("%Y%m%d").to_string()
}
