//! Query Config - Per-thread settings for queries and debug output.
//!
//! Seeded from the environment the first time a thread touches it:
//! - `DEBUG_PRINT_LIMIT` - maximum length of pretty-printed DOM (default 7000)
//! - `COLORS` - `true`/`1` turns on ANSI highlighting in debug output
//!
//! # Example
//!
//! ```ignore
//! use spark_testing_library::queries::{configure, get_config};
//!
//! configure(|config| config.test_id_attribute = "data-qa".into());
//! assert_eq!(get_config().test_id_attribute, "data-qa");
//! ```

use std::cell::RefCell;
use std::env;

/// Default maximum length of pretty-printed DOM output.
pub const DEFAULT_DEBUG_PRINT_LIMIT: usize = 7000;

/// Settings shared by every query and debug call on this thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Attribute read by the `test_id` queries.
    pub test_id_attribute: String,
    /// Pretty-printed DOM is cut off after this many characters.
    pub debug_print_limit: usize,
    /// Colorize pretty-printed DOM with ANSI escapes.
    pub highlight: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            test_id_attribute: "data-testid".to_string(),
            debug_print_limit: DEFAULT_DEBUG_PRINT_LIMIT,
            highlight: false,
        }
    }
}

impl Config {
    /// Defaults, overridden by `DEBUG_PRINT_LIMIT` and `COLORS`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(limit) = env::var("DEBUG_PRINT_LIMIT").ok().and_then(|v| v.trim().parse().ok()) {
            config.debug_print_limit = limit;
        }
        if let Ok(colors) = env::var("COLORS") {
            config.highlight = matches!(colors.trim(), "true" | "1");
        }
        config
    }
}

thread_local! {
    static CONFIG: RefCell<Config> = RefCell::new(Config::from_env());
}

/// Update the configuration of the current thread.
pub fn configure(update: impl FnOnce(&mut Config)) {
    CONFIG.with(|config| update(&mut config.borrow_mut()));
}

/// Snapshot of the current thread's configuration.
pub fn get_config() -> Config {
    CONFIG.with(|config| config.borrow().clone())
}

/// Restore the environment-derived configuration (for testing).
pub fn reset_config() {
    CONFIG.with(|config| *config.borrow_mut() = Config::from_env());
}
