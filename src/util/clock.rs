//! Wall-clock time in epoch seconds.

/// Current time as fractional seconds since the Unix epoch.
pub fn now_epoch_seconds() -> f64 {
    #[cfg(feature = "csr")]
    {
        js_sys::Date::now() / 1000.0
    }
    #[cfg(not(feature = "csr"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0.0, |d| d.as_secs_f64())
    }
}
