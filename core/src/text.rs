//! Guarded text normalization.
//!
//! Both functions accept anything convertible into a `TextValue`: absent
//! input comes back as `Ok(None)` and non-text input fails with
//! `TextError::Type` before any pattern runs.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::TextError;
use crate::guard::{guard, Guarded, TextValue};

/// Two or more consecutive whitespace characters.
static MULTI_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| compile_regex(r"\s{2,}"));

fn compile_regex(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        // Covered by the `multi_whitespace_pattern_compiles` test.
        Err(err) => panic!("invalid regex pattern `{pattern}`: {err}"),
    }
}

/// Signature of the transformation behind `NORMALIZE_WHITESPACE`.
pub type NormalizeFn = fn(&str, ()) -> Result<String, TextError>;

/// Signature of the transformation behind `STRIP_SPECIAL_CHARACTERS`.
pub type StripFn = fn(&str, &[char]) -> Result<String, TextError>;

/// The guarded whitespace normalizer; `normalize_whitespace` calls through it.
pub const NORMALIZE_WHITESPACE: Guarded<NormalizeFn> = guard(
    "normalize_whitespace",
    "Collapse runs of two or more whitespace characters into one space and trim both ends.",
    collapse_whitespace as NormalizeFn,
);

/// The guarded character filter; `strip_special_characters` calls through it.
pub const STRIP_SPECIAL_CHARACTERS: Guarded<StripFn> = guard(
    "strip_special_characters",
    "Remove everything but ASCII letters, digits, whitespace and explicitly allowed characters.",
    strip_disallowed as StripFn,
);

/// Collapse whitespace runs to a single space, then trim.
///
/// A lone whitespace character between words (a single tab, say) is kept
/// as-is; only runs of two or more are rewritten.
///
/// ```
/// use cleanwire_core::normalize_whitespace;
///
/// let cleaned = normalize_whitespace("  a   b\t\tc  ").unwrap();
/// assert_eq!(cleaned.as_deref(), Some("a b c"));
/// ```
pub fn normalize_whitespace<'a>(
    value: impl Into<TextValue<'a>>,
) -> Result<Option<String>, TextError> {
    NORMALIZE_WHITESPACE.call(value, ())
}

/// Drop everything except ASCII letters, digits, whitespace and `allow`.
///
/// Characters in `allow` are matched literally, including ones that mean
/// something inside a regex character class (`]`, `^`, `-`, `\`).
pub fn strip_special_characters<'a>(
    value: impl Into<TextValue<'a>>,
    allow: &[char],
) -> Result<Option<String>, TextError> {
    STRIP_SPECIAL_CHARACTERS.call(value, allow)
}

fn collapse_whitespace(text: &str, (): ()) -> Result<String, TextError> {
    Ok(MULTI_WHITESPACE.replace_all(text, " ").trim().to_string())
}

fn strip_disallowed(text: &str, allow: &[char]) -> Result<String, TextError> {
    let allowed = regex::escape(&allow.iter().collect::<String>());
    let disallowed = Regex::new(&format!(r"[^a-zA-Z0-9\s{allowed}]"))?;
    Ok(disallowed.replace_all(text, "").into_owned())
}
