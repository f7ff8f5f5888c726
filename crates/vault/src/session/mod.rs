//! Master-passphrase session: cache, expiry, and extension.
//!
//! # Lifecycle
//!
//! 1. A host constructs one [`PassphraseSession`] and hands clones of it to
//!    every component that needs the passphrase.
//! 2. When the user supplies a passphrase, [`PassphraseSession::set_passphrase`]
//!    caches it and arms an expiry timer.
//! 3. Each successful use calls [`PassphraseSession::extend_validity`], which
//!    pushes the deadline out and re-arms the timer.
//! 4. The passphrase is dropped when the timer fires, when a read finds it
//!    expired, on [`PassphraseSession::clear_passphrase`], or when the last
//!    handle is dropped.
//!
//! # Security invariants
//!
//! - The passphrase is **never** written to disk, logged, or included in traces.
//! - At most one passphrase is cached; setting a new one replaces the old.

pub mod store;

pub use store::{PassphraseSession, DEFAULT_TTL};

use std::time::Duration;

/// Format a remaining duration as `m:ss`, rounding up to the whole second.
///
/// ```
/// use std::time::Duration;
/// use vault::session::format_remaining;
///
/// assert_eq!(format_remaining(Duration::from_millis(299_001)), "5:00");
/// assert_eq!(format_remaining(Duration::ZERO), "0:00");
/// ```
pub fn format_remaining(remaining: Duration) -> String {
    let millis = remaining.as_millis();
    let secs = millis.div_ceil(1000);
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_remaining(Duration::from_secs(300)), "5:00");
        assert_eq!(format_remaining(Duration::from_secs(65)), "1:05");
        assert_eq!(format_remaining(Duration::from_millis(59_500)), "1:00");
        assert_eq!(format_remaining(Duration::from_millis(1)), "0:01");
        assert_eq!(format_remaining(Duration::ZERO), "0:00");
    }
}
