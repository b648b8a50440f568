use std::sync::LazyLock;

use lru::LruCache;
use parking_lot::Mutex;
use regex::Regex;
use value::FieldValue;

use super::{
    strict,
    strict_all,
};
use crate::{
    knobs::PIPELINE_REGEX_CACHE_SIZE,
    EvaluateResult,
};

/// Compiled patterns keyed by their source text. A filter evaluates the same
/// pattern once per document.
static REGEX_CACHE: LazyLock<Mutex<LruCache<String, Regex>>> =
    LazyLock::new(|| Mutex::new(LruCache::new(*PIPELINE_REGEX_CACHE_SIZE)));

fn compile(pattern: &str) -> Result<Regex, regex::Error> {
    if let Some(regex) = REGEX_CACHE.lock().get(pattern) {
        return Ok(regex.clone());
    }
    let regex = Regex::new(pattern)?;
    REGEX_CACHE.lock().put(pattern.to_owned(), regex.clone());
    Ok(regex)
}

fn string(value: &FieldValue) -> Result<&str, EvaluateResult> {
    value.as_str().ok_or(EvaluateResult::Error)
}

fn string_result(s: String) -> EvaluateResult {
    EvaluateResult::Value(FieldValue::String(s))
}

fn unary(s: &EvaluateResult, f: impl FnOnce(&str) -> FieldValue) -> EvaluateResult {
    let [s] = match strict([s]) {
        Ok(values) => values,
        Err(outcome) => return outcome,
    };
    match string(s) {
        Ok(s) => EvaluateResult::Value(f(s)),
        Err(outcome) => outcome,
    }
}

fn binary(
    s: &EvaluateResult,
    arg: &EvaluateResult,
    f: impl FnOnce(&str, &str) -> EvaluateResult,
) -> EvaluateResult {
    let [s, arg] = match strict([s, arg]) {
        Ok(values) => values,
        Err(outcome) => return outcome,
    };
    match (string(s), string(arg)) {
        (Ok(s), Ok(arg)) => f(s, arg),
        _ => EvaluateResult::Error,
    }
}

/// Number of Unicode scalar values.
pub fn char_length(s: &EvaluateResult) -> EvaluateResult {
    unary(s, |s| FieldValue::Int64(s.chars().count() as i64))
}

/// UTF-8 length of a string, or the length of a blob.
pub fn byte_length(s: &EvaluateResult) -> EvaluateResult {
    let [value] = match strict([s]) {
        Ok(values) => values,
        Err(outcome) => return outcome,
    };
    match value {
        FieldValue::String(s) => EvaluateResult::Value(FieldValue::Int64(s.len() as i64)),
        FieldValue::Bytes(b) => EvaluateResult::Value(FieldValue::Int64(b.len() as i64)),
        _ => EvaluateResult::Error,
    }
}

pub fn to_lower(s: &EvaluateResult) -> EvaluateResult {
    unary(s, |s| FieldValue::String(s.to_lowercase()))
}

pub fn to_upper(s: &EvaluateResult) -> EvaluateResult {
    unary(s, |s| FieldValue::String(s.to_uppercase()))
}

pub fn trim(s: &EvaluateResult) -> EvaluateResult {
    unary(s, |s| FieldValue::String(s.trim().to_owned()))
}

pub fn string_reverse(s: &EvaluateResult) -> EvaluateResult {
    unary(s, |s| FieldValue::String(s.chars().rev().collect()))
}

pub fn starts_with(s: &EvaluateResult, prefix: &EvaluateResult) -> EvaluateResult {
    binary(s, prefix, |s, prefix| EvaluateResult::boolean(s.starts_with(prefix)))
}

pub fn ends_with(s: &EvaluateResult, suffix: &EvaluateResult) -> EvaluateResult {
    binary(s, suffix, |s, suffix| EvaluateResult::boolean(s.ends_with(suffix)))
}

pub fn string_contains(s: &EvaluateResult, needle: &EvaluateResult) -> EvaluateResult {
    binary(s, needle, |s, needle| EvaluateResult::boolean(s.contains(needle)))
}

pub fn string_concat(operands: &[EvaluateResult]) -> EvaluateResult {
    let values = match strict_all(operands) {
        Ok(values) => values,
        Err(outcome) => return outcome,
    };
    let mut out = String::new();
    for value in values {
        match string(value) {
            Ok(s) => out.push_str(s),
            Err(outcome) => return outcome,
        }
    }
    string_result(out)
}

/// Translates a SQL `LIKE` pattern: `%` matches any run of characters and `_`
/// matches exactly one. Everything else is literal.
fn like_to_regex(pattern: &str) -> String {
    let mut out = String::from("(?s)^");
    let mut buf = [0u8; 4];
    for c in pattern.chars() {
        match c {
            '%' => out.push_str(".*"),
            '_' => out.push('.'),
            c => out.push_str(&regex::escape(c.encode_utf8(&mut buf))),
        }
    }
    out.push('$');
    out
}

fn regex_test(s: &str, pattern: &str, test: impl FnOnce(&Regex, &str) -> bool) -> EvaluateResult {
    match compile(pattern) {
        Ok(regex) => EvaluateResult::boolean(test(&regex, s)),
        Err(e) => {
            tracing::debug!("Invalid regular expression {pattern:?}: {e}");
            EvaluateResult::Error
        },
    }
}

pub fn like(s: &EvaluateResult, pattern: &EvaluateResult) -> EvaluateResult {
    binary(s, pattern, |s, pattern| {
        regex_test(s, &like_to_regex(pattern), |regex, s| regex.is_match(s))
    })
}

/// True if the pattern matches anywhere in the string.
pub fn regex_contains(s: &EvaluateResult, pattern: &EvaluateResult) -> EvaluateResult {
    binary(s, pattern, |s, pattern| {
        regex_test(s, pattern, |regex, s| regex.is_match(s))
    })
}

/// True only if the pattern matches the whole string.
pub fn regex_match(s: &EvaluateResult, pattern: &EvaluateResult) -> EvaluateResult {
    binary(s, pattern, |s, pattern| {
        regex_test(s, &format!("^(?:{pattern})$"), |regex, s| regex.is_match(s))
    })
}
