//! Process-wide configuration from the environment
//!
//! Environment variables are read once, lazily, at first use and memoized;
//! later mutation of the environment is ignored.

use std::time::Duration;

/// Level range callers conventionally use for schedule fuzz testing.
pub const DEFAULT_MEM_DBG_RANGE: (i32, i32) = (0, 10);

/// Maximum coordinator backoff delay.
pub(crate) const BACKOFF_CAP: Duration = Duration::from_millis(10);

/// Process-wide debug level from `DEBUG`.
///
/// Unset, empty, or `"0"` leaves the compile-time default of 0. Anything else
/// must parse as an integer; a parse failure is fatal. The first successful
/// non-default read emits a one-time diagnostic line.
///
/// Convention: `DEBUG=100` means full schedule control. That is the caller's
/// convention, not enforced here.
#[cfg(feature = "debug")]
pub fn dbg_lvl() -> i32 {
    use std::sync::OnceLock;

    static DBG_LVL: OnceLock<i32> = OnceLock::new();
    *DBG_LVL.get_or_init(|| {
        let lvl = parse_dbg_lvl(std::env::var("DEBUG").ok().as_deref());
        if lvl != 0 {
            println!("Responding to env var: DEBUG={lvl}");
        }
        lvl
    })
}

/// With the facility compiled out, the debug level is a compile-time 0.
#[cfg(not(feature = "debug"))]
pub const fn dbg_lvl() -> i32 {
    0
}

/// Whether off-the-record messages are suppressed in the scheduling loop.
/// Their producers are still released immediately.
pub fn silence_otr() -> bool {
    use std::sync::OnceLock;

    static SILENCE: OnceLock<bool> = OnceLock::new();
    *SILENCE.get_or_init(|| parse_silence_otr(std::env::var("SILENCEOTR").ok().as_deref()))
}

fn parse_dbg_lvl(raw: Option<&str>) -> i32 {
    match raw {
        None | Some("") | Some("0") => 0,
        Some(text) => text
            .trim()
            .parse()
            .unwrap_or_else(|err| panic!("bad DEBUG value {text:?}: {err}")),
    }
}

fn parse_silence_otr(raw: Option<&str>) -> bool {
    match raw {
        None => false,
        Some(value) => !matches!(value, "0" | "false" | "False"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dbg_lvl_defaults_to_zero() {
        assert_eq!(parse_dbg_lvl(None), 0);
        assert_eq!(parse_dbg_lvl(Some("")), 0);
        assert_eq!(parse_dbg_lvl(Some("0")), 0);
    }

    #[test]
    fn dbg_lvl_parses_integers() {
        assert_eq!(parse_dbg_lvl(Some("100")), 100);
        assert_eq!(parse_dbg_lvl(Some(" 7 ")), 7);
        assert_eq!(parse_dbg_lvl(Some("-3")), -3);
    }

    #[test]
    #[should_panic(expected = "bad DEBUG value")]
    fn dbg_lvl_rejects_garbage() {
        parse_dbg_lvl(Some("not-a-number"));
    }

    #[test]
    fn silence_otr_recognizes_off_values() {
        assert!(!parse_silence_otr(None));
        assert!(!parse_silence_otr(Some("0")));
        assert!(!parse_silence_otr(Some("false")));
        assert!(!parse_silence_otr(Some("False")));
        assert!(parse_silence_otr(Some("1")));
        assert!(parse_silence_otr(Some("true")));
        assert!(parse_silence_otr(Some("")));
    }
}
