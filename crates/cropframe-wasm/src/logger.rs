//! Browser console logging for the `log` facade.
//!
//! [`init`](crate::init) installs `console_log` once at `Info`; hosts raise or
//! lower the threshold with [`set_log_level`].

use log::{Level, LevelFilter};
use wasm_bindgen::prelude::*;

/// Install the console logger. Later calls are ignored.
pub(crate) fn install() {
    let _ = console_log::init_with_level(Level::Info);
}

/// Parse a level name ("off", "error", "warn", "info", "debug", "trace").
pub(crate) fn parse_level(level: &str) -> Option<LevelFilter> {
    level.trim().parse().ok()
}

/// Set the maximum level forwarded to the console.
///
/// # Errors
/// Returns error if `level` is not a known level name
#[wasm_bindgen]
pub fn set_log_level(level: &str) -> Result<(), JsValue> {
    let filter = parse_level(level)
        .ok_or_else(|| JsValue::from_str(&format!("Unknown log level: {}", level)))?;
    log::set_max_level(filter);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), Some(LevelFilter::Debug));
        assert_eq!(parse_level("WARN"), Some(LevelFilter::Warn));
        assert_eq!(parse_level(" off "), Some(LevelFilter::Off));
        assert_eq!(parse_level("verbose"), None);
    }
}
