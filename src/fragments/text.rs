//! String predicates.
//!
//! Every fragment works over any [`Text`] field, so `String`, `str`,
//! `Option<String>` and friends share one vocabulary. An absent string and
//! `""` are both empty; length and format checks fail on them.

use std::borrow::Cow;
use std::sync::LazyLock;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use regex::Regex;

use crate::error::{Error, Result};
use crate::types::Predicate;

static EMAIL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok());

/// A field that may hold a string.
pub trait Text {
    /// The string, or `None` when absent.
    fn text(&self) -> Option<&str>;
}

impl Text for str {
    fn text(&self) -> Option<&str> {
        Some(self)
    }
}

impl Text for String {
    fn text(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl Text for Cow<'_, str> {
    fn text(&self) -> Option<&str> {
        Some(self.as_ref())
    }
}

impl Text for Option<String> {
    fn text(&self) -> Option<&str> {
        self.as_deref()
    }
}

impl Text for Option<&str> {
    fn text(&self) -> Option<&str> {
        *self
    }
}

impl<S: Text + ?Sized> Text for &S {
    fn text(&self) -> Option<&str> {
        (**self).text()
    }
}

fn present<S: Text + ?Sized>(value: &S) -> Option<&str> {
    value.text().filter(|s| !s.is_empty())
}

fn text_test<S, F>(label: impl Into<std::sync::Arc<str>>, check: F) -> Predicate<S>
where
    S: Text + ?Sized + 'static,
    F: Fn(&str) -> bool + Send + Sync + 'static,
{
    Predicate::test(label, move |value: &S| present(value).is_some_and(&check))
}

/// Absent or `""`.
#[must_use]
pub fn empty<S: Text + ?Sized + 'static>() -> Predicate<S> {
    Predicate::test("empty", |value: &S| present(value).is_none())
}

#[must_use]
pub fn not_empty<S: Text + ?Sized + 'static>() -> Predicate<S> {
    text_test("not empty", |_| true)
}

/// At least `min` characters.
#[must_use]
pub fn min_length<S: Text + ?Sized + 'static>(min: usize) -> Predicate<S> {
    text_test(format!("length >= {min}"), move |s| s.chars().count() >= min)
}

/// At most `max` characters. Empty strings fail.
#[must_use]
pub fn max_length<S: Text + ?Sized + 'static>(max: usize) -> Predicate<S> {
    text_test(format!("length <= {max}"), move |s| s.chars().count() <= max)
}

/// Exactly `length` characters. `exact_length(0)` matches `""` but not an
/// absent string.
#[must_use]
pub fn exact_length<S: Text + ?Sized + 'static>(length: usize) -> Predicate<S> {
    Predicate::test(format!("length == {length}"), move |value: &S| {
        value.text().is_some_and(|s| s.chars().count() == length)
    })
}

#[must_use]
pub fn equals_ignore_case<S: Text + ?Sized + 'static>(expected: impl Into<String>) -> Predicate<S> {
    let expected = expected.into();
    let lowered = expected.to_lowercase();
    Predicate::test(format!("equals ignore case \"{expected}\""), move |value: &S| {
        value.text().is_some_and(|s| s.to_lowercase() == lowered)
    })
}

#[must_use]
pub fn starts_with<S: Text + ?Sized + 'static>(prefix: impl Into<String>) -> Predicate<S> {
    let prefix = prefix.into();
    Predicate::test(format!("starts with \"{prefix}\""), move |value: &S| {
        value.text().is_some_and(|s| s.starts_with(prefix.as_str()))
    })
}

#[must_use]
pub fn ends_with<S: Text + ?Sized + 'static>(suffix: impl Into<String>) -> Predicate<S> {
    let suffix = suffix.into();
    Predicate::test(format!("ends with \"{suffix}\""), move |value: &S| {
        value.text().is_some_and(|s| s.ends_with(suffix.as_str()))
    })
}

#[must_use]
pub fn contains<S: Text + ?Sized + 'static>(needle: impl Into<String>) -> Predicate<S> {
    let needle = needle.into();
    Predicate::test(format!("contains \"{needle}\""), move |value: &S| {
        value.text().is_some_and(|s| s.contains(needle.as_str()))
    })
}

/// No leading or trailing whitespace.
#[must_use]
pub fn trimmed<S: Text + ?Sized + 'static>() -> Predicate<S> {
    Predicate::test("trimmed", |value: &S| {
        value.text().is_some_and(|s| s.trim() == s)
    })
}

#[must_use]
pub fn only_digits<S: Text + ?Sized + 'static>() -> Predicate<S> {
    text_test("only digits", |s| s.chars().all(|c| c.is_ascii_digit()))
}

#[must_use]
pub fn only_letters<S: Text + ?Sized + 'static>() -> Predicate<S> {
    text_test("only letters", |s| s.chars().all(char::is_alphabetic))
}

/// At least one letter and at least one digit.
#[must_use]
pub fn letters_and_digits<S: Text + ?Sized + 'static>() -> Predicate<S> {
    text_test("letters and digits", |s| {
        s.chars().any(char::is_alphabetic) && s.chars().any(|c| c.is_ascii_digit())
    })
}

/// At least one character that is neither a letter nor a digit.
#[must_use]
pub fn has_special_characters<S: Text + ?Sized + 'static>() -> Predicate<S> {
    text_test("has special characters", |s| {
        s.chars().any(|c| !c.is_alphanumeric())
    })
}

/// Regex match anywhere in the string.
///
/// # Errors
///
/// Returns [`Error::EmptyPattern`] for `""` and [`Error::InvalidPattern`] if
/// the pattern does not compile.
pub fn matches<S: Text + ?Sized + 'static>(pattern: &str) -> Result<Predicate<S>> {
    if pattern.is_empty() {
        return Err(Error::EmptyPattern);
    }
    let regex = Regex::new(pattern)?;
    Ok(text_test(format!("matches /{pattern}/"), move |s| regex.is_match(s)))
}

#[must_use]
pub fn is_email<S: Text + ?Sized + 'static>() -> Predicate<S> {
    text_test("is email", |s| EMAIL.as_ref().is_some_and(|re| re.is_match(s)))
}

/// Standard, padded base64.
#[must_use]
pub fn is_base64<S: Text + ?Sized + 'static>() -> Predicate<S> {
    text_test("is base64", |s| s.len() % 4 == 0 && STANDARD.decode(s).is_ok())
}

/// Parses as a JSON document.
#[must_use]
pub fn is_json<S: Text + ?Sized + 'static>() -> Predicate<S> {
    text_test("is json", |s| {
        serde_json::from_str::<serde_json::Value>(s.trim()).is_ok()
    })
}

/// No uppercase characters.
#[must_use]
pub fn is_lowercase<S: Text + ?Sized + 'static>() -> Predicate<S> {
    text_test("is lowercase", |s| !s.chars().any(char::is_uppercase))
}

/// No lowercase characters.
#[must_use]
pub fn is_uppercase<S: Text + ?Sized + 'static>() -> Predicate<S> {
    text_test("is uppercase", |s| !s.chars().any(char::is_lowercase))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(p: &Predicate<str>, input: &str) -> bool {
        p.evaluate(input)
    }

    #[test]
    fn emptiness() {
        assert!(check(&empty(), ""));
        assert!(!check(&empty(), "a"));
        assert!(empty::<Option<String>>().evaluate(&None));
        assert!(!not_empty::<Option<String>>().evaluate(&None));
        assert!(not_empty::<String>().evaluate(&"x".to_owned()));
    }

    #[test]
    fn lengths() {
        assert!(check(&min_length(3), "abc"));
        assert!(!check(&min_length(3), "ab"));
        assert!(check(&max_length(3), "abc"));
        assert!(!check(&max_length(3), "abcd"));
        assert!(!check(&max_length(3), ""));
        assert!(check(&exact_length(2), "éa"));
        assert!(check(&exact_length(0), ""));
        assert!(!exact_length::<Option<&str>>(0).evaluate(&None));
    }

    #[test]
    fn case_and_affixes() {
        assert!(check(&equals_ignore_case("HeLLo"), "hello"));
        assert!(!check(&equals_ignore_case("hello"), "help"));
        assert!(check(&starts_with("ab"), "abc"));
        assert!(check(&ends_with("bc"), "abc"));
        assert!(check(&contains("b"), "abc"));
        assert!(!contains::<Option<String>>("b").evaluate(&None));
    }

    #[test]
    fn character_classes() {
        assert!(check(&trimmed(), "abc"));
        assert!(!check(&trimmed(), " abc"));
        assert!(check(&only_digits(), "0123"));
        assert!(!check(&only_digits(), "01a"));
        assert!(!check(&only_digits(), ""));
        assert!(check(&only_letters(), "abcé"));
        assert!(!check(&only_letters(), "ab1"));
        assert!(check(&letters_and_digits(), "a1"));
        assert!(!check(&letters_and_digits(), "aa"));
        assert!(check(&has_special_characters(), "a-b"));
        assert!(!check(&has_special_characters(), "ab1"));
        assert!(check(&is_lowercase(), "abc1"));
        assert!(!check(&is_lowercase(), "aBc"));
        assert!(check(&is_uppercase(), "ABC1"));
        assert!(!check(&is_uppercase(), "ABc"));
    }

    #[test]
    fn regex_matching() {
        let p: Predicate<str> = matches(r"^\d{3}-\d{4}$").unwrap();
        assert!(p.evaluate("555-1234"));
        assert!(!p.evaluate("5551234"));
        assert!(!p.evaluate(""));
    }

    #[test]
    fn regex_rejects_bad_patterns() {
        assert!(matches!(matches::<str>(""), Err(Error::EmptyPattern)));
        assert!(matches!(matches::<str>("(unclosed"), Err(Error::InvalidPattern(_))));
    }

    #[test]
    fn formats() {
        assert!(check(&is_email(), "ada@example.com"));
        assert!(!check(&is_email(), "ada@example"));
        assert!(!check(&is_email(), "ada example@x.com"));
        assert!(check(&is_base64(), "aGVsbG8="));
        assert!(!check(&is_base64(), "aGVsbG8"));
        assert!(!check(&is_base64(), "!!!!"));
        assert!(check(&is_json(), r#"{"a": [1, 2]}"#));
        assert!(check(&is_json(), "42"));
        assert!(!check(&is_json(), "{a:1}"));
        assert!(!check(&is_json(), ""));
    }

    #[test]
    fn reference_fields() {
        let p = starts_with::<&str>("x");
        assert!(p.evaluate(&"xy"));
        let p = not_empty::<Cow<'static, str>>();
        assert!(p.evaluate(&Cow::Borrowed("a")));
    }
}
