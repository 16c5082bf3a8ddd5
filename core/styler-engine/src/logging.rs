//! FILENAME: core/styler-engine/src/logging.rs
// PURPOSE: Category-based logging macros on top of the `log` facade.
// The category becomes the log target, so hosts can filter per subsystem
// (FRAME, CHUNK, STYLE, VALIDATE, SESSION). No logger is installed here.

#[macro_export]
macro_rules! log_debug {
    ($cat:expr, $($arg:tt)*) => {
        ::log::debug!(target: $cat, $($arg)*)
    };
}

#[macro_export]
macro_rules! log_info {
    ($cat:expr, $($arg:tt)*) => {
        ::log::info!(target: $cat, $($arg)*)
    };
}

#[macro_export]
macro_rules! log_warn {
    ($cat:expr, $($arg:tt)*) => {
        ::log::warn!(target: $cat, $($arg)*)
    };
}

// ENTER/EXIT macros for request tracing

#[macro_export]
macro_rules! log_enter {
    ($cat:expr, $func:expr) => {
        ::log::debug!(target: $cat, "ENTER {}", $func)
    };
    ($cat:expr, $func:expr, $($arg:tt)*) => {
        ::log::debug!(target: $cat, "ENTER {} {}", $func, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_exit {
    ($cat:expr, $func:expr) => {
        ::log::debug!(target: $cat, "EXIT {}", $func)
    };
    ($cat:expr, $func:expr, $($arg:tt)*) => {
        ::log::debug!(target: $cat, "EXIT {} {}", $func, format_args!($($arg)*))
    };
}

// Re-export the macros so they can be imported via `use crate::logging::log_debug;`
pub use log_debug;
pub use log_enter;
pub use log_exit;
pub use log_info;
pub use log_warn;
