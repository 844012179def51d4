//! Conditional logging macros that check a module-level `ENABLE_LOGS` flag
//! and tag every record with the module's `LOG_TARGET`.
//!
//! Usage:
//! ```rust,ignore
//! // In your module, define both constants first:
//! const ENABLE_LOGS: bool = true;
//! const LOG_TARGET: &str = "bitvoyager::metrics";
//!
//! // Then use the macros (they're exported at the crate root):
//! use crate::{log_info, log_warn, log_error};
//!
//! log_info!("This will log under bitvoyager::metrics if ENABLE_LOGS is true");
//! ```
//!
//! Targets let `RUST_LOG=bitvoyager::mission=debug` narrow output to a single
//! component while the rest of the tracker stays at `info`.

/// Conditional debug logging.
///
/// Each module that uses this macro must define `ENABLE_LOGS` and `LOG_TARGET`.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::debug!(target: LOG_TARGET, $($arg)*);
        }
    };
}

/// Conditional info logging.
///
/// Each module that uses this macro must define `ENABLE_LOGS` and `LOG_TARGET`.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!(target: LOG_TARGET, $($arg)*);
        }
    };
}

/// Conditional warn logging.
///
/// Each module that uses this macro must define `ENABLE_LOGS` and `LOG_TARGET`.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!(target: LOG_TARGET, $($arg)*);
        }
    };
}

/// Conditional error logging. Invalid operator input lands here, so this one
/// ignores `ENABLE_LOGS` and always reaches the configured logger.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        log::error!(target: LOG_TARGET, $($arg)*);
    }};
}

#[cfg(test)]
mod tests {
    const ENABLE_LOGS: bool = false;
    const LOG_TARGET: &str = "bitvoyager::logging";

    fn describe(result: Result<u32, &str>) -> u32 {
        match result {
            Ok(value) => log_info!("got {value}"),
            Err(err) => log_error!("failed: {err}"),
        }
        match result {
            Ok(value) => value,
            Err(_) => 0,
        }
    }

    #[test]
    fn macros_expand_in_match_arm_position() {
        assert_eq!(describe(Ok(3)), 3);
        assert_eq!(describe(Err("boom")), 0);
        log_warn!("warn with logs disabled");
        log_debug!("debug with logs disabled");
    }
}
