//! Output macros shared by every command.
//!
//! Each macro prints a [`Message`](super::Message) (or anything `Display`) to
//! the terminal. When `MEDAPP_DEBUG` or `RUST_LOG` is set the same text is sent
//! to `tracing` instead, so it interleaves with the store's structured logs.
//!
//! ```text
//! msg_success!(Message::DoctorCreated(6))
//!     normal mode  -> println!("✅ Doctor created with ID 6")
//!     debug mode   -> tracing::info!("✅ Doctor created with ID 6")
//! ```
//!
//! | Macro                | Prefix | Terminal   | Tracing level |
//! |----------------------|--------|------------|---------------|
//! | `msg_print!`         |        | stdout     | info          |
//! | `msg_success!`       | ✅     | stdout     | info          |
//! | `msg_info!`          | ℹ️     | stdout     | info          |
//! | `msg_warning!`       | ⚠️     | stdout     | warn          |
//! | `msg_error!`         | ❌     | stderr     | error         |
//! | `msg_debug!`         | 🔍     | (silent)   | debug         |
//!
//! `msg_error_anyhow!` and `msg_bail_anyhow!` build `anyhow` errors carrying
//! the ❌ prefix for command handlers.

use std::sync::OnceLock;

static DEBUG_MODE: OnceLock<bool> = OnceLock::new();

/// True when `MEDAPP_DEBUG` or `RUST_LOG` is set. Read once per process.
#[doc(hidden)]
pub fn is_debug_mode() -> bool {
    *DEBUG_MODE.get_or_init(|| std::env::var("MEDAPP_DEBUG").is_ok() || std::env::var("RUST_LOG").is_ok())
}

#[doc(hidden)]
#[macro_export]
macro_rules! __msg_emit {
    ($level:ident, $print:ident, $fmt:literal, $msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::$level!($fmt, $msg);
        } else {
            $print!($fmt, $msg);
        }
    };
}

#[macro_export]
macro_rules! msg_print {
    ($msg:expr) => {
        $crate::__msg_emit!(info, println, "{}", $msg)
    };
    ($msg:expr, true) => {
        $crate::__msg_emit!(info, println, "\n{}\n", $msg)
    };
}

#[macro_export]
macro_rules! msg_success {
    ($msg:expr) => {
        $crate::__msg_emit!(info, println, "✅ {}", $msg)
    };
    ($msg:expr, true) => {
        $crate::__msg_emit!(info, println, "\n✅ {}\n", $msg)
    };
}

#[macro_export]
macro_rules! msg_info {
    ($msg:expr) => {
        $crate::__msg_emit!(info, println, "ℹ️ {}", $msg)
    };
    ($msg:expr, true) => {
        $crate::__msg_emit!(info, println, "\nℹ️ {}\n", $msg)
    };
}

#[macro_export]
macro_rules! msg_warning {
    ($msg:expr) => {
        $crate::__msg_emit!(warn, println, "⚠️ {}", $msg)
    };
    ($msg:expr, true) => {
        $crate::__msg_emit!(warn, println, "\n⚠️ {}\n", $msg)
    };
}

#[macro_export]
macro_rules! msg_error {
    ($msg:expr) => {
        $crate::__msg_emit!(error, eprintln, "❌ {}", $msg)
    };
    ($msg:expr, true) => {
        $crate::__msg_emit!(error, eprintln, "\n❌ {}\n", $msg)
    };
}

/// Only visible in debug mode.
#[macro_export]
macro_rules! msg_debug {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::debug!("🔍 {}", $msg);
        }
    };
}

#[macro_export]
macro_rules! msg_error_anyhow {
    ($msg:expr) => {
        anyhow::anyhow!("❌ {}", $msg)
    };
}

#[macro_export]
macro_rules! msg_bail_anyhow {
    ($msg:expr) => {
        anyhow::bail!("❌ {}", $msg)
    };
}
