//! Logging macros gated by a per-module `ENABLE_LOGS` switch.
//!
//! The store, history and session modules each declare the switch so their chatter can be
//! silenced independently without touching `RUST_LOG`:
//!
//! ```ignore
//! const ENABLE_LOGS: bool = true;
//!
//! use crate::{log_debug, log_error};
//!
//! log_debug!("history cursor {} -> {}", from, to);
//! log_error!("failed to persist projects: {err:#}");
//! ```
//!
//! Errors from the write-through path are always worth seeing, so modules normally keep
//! the switch on and filter with `RUST_LOG` instead.

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::debug!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::error!($($arg)*);
        }
    };
}
