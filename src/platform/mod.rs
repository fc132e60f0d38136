//! Platform abstraction layer
//!
//! Handles browser/native differences for logger setup and run seeding.

/// Install the logger and, on the web, the panic hook
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("Logger already set: {}", e).into());
    }
}

/// Install the logger (RUST_LOG controls the level, default info)
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

/// Seed for a run when the settings do not pin one
#[cfg(target_arch = "wasm32")]
pub fn now_seed() -> u64 {
    js_sys::Date::now() as u64
}

/// Seed for a run when the settings do not pin one
#[cfg(not(target_arch = "wasm32"))]
pub fn now_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_is_idempotent() {
        init_logging();
        init_logging();
        log::info!("logger ready");
    }

    #[test]
    fn test_now_seed_is_nonzero() {
        assert!(now_seed() > 0);
    }
}
