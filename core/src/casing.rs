//! Deep key renaming for JSON payloads.
//!
//! # Design
//! The server speaks snake_case while application models are usually
//! camelCase, so payloads are converted on the way in and out. The
//! transform walks a `serde_json::Value` in place: objects have every key
//! passed through the rename function, arrays keep their order and indices,
//! and scalars are left alone.
//!
//! A `Value` owns its children, so the walk always terminates. Renamed keys
//! that collide are last-write-wins.

use serde_json::Value;

/// Rename every object key in `value`, at any depth, with `rename`.
///
/// Children are converted before they are re-inserted under their new key.
/// Returns `value` for chaining.
pub fn transform_keys_deep<F>(value: &mut Value, rename: F) -> &mut Value
where
    F: Fn(&str) -> String,
{
    rename_keys(value, &rename);
    value
}

fn rename_keys(value: &mut Value, rename: &dyn Fn(&str) -> String) {
    match value {
        Value::Object(map) => {
            for (key, mut child) in std::mem::take(map) {
                rename_keys(&mut child, rename);
                map.insert(rename(&key), child);
            }
        }
        Value::Array(items) => {
            for item in items {
                rename_keys(item, rename);
            }
        }
        _ => {}
    }
}

/// `someKeyName` keys become `some_key_name`.
pub fn camel_to_snake(value: &mut Value) -> &mut Value {
    transform_keys_deep(value, to_snake_case)
}

/// `some_key_name` keys become `someKeyName`.
pub fn snake_to_camel(value: &mut Value) -> &mut Value {
    transform_keys_deep(value, to_camel_case)
}

pub fn to_snake_case(s: &str) -> String {
    split_words(s)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

pub fn to_camel_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for (i, word) in split_words(s).iter().enumerate() {
        if i == 0 {
            out.push_str(&word.to_lowercase());
            continue;
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(&chars.as_str().to_lowercase());
        }
    }
    out
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum CharKind {
    Lower,
    Upper,
    Digit,
    Separator,
}

fn kind(c: char) -> CharKind {
    if c.is_ascii_digit() {
        CharKind::Digit
    } else if c.is_uppercase() {
        CharKind::Upper
    } else if c.is_alphanumeric() {
        CharKind::Lower
    } else {
        CharKind::Separator
    }
}

/// Split an identifier into words.
///
/// Boundaries are separators (anything not alphanumeric), a lower-to-upper
/// step (`someKey`), the last capital of an acronym run (`HTTPServer`) and
/// any switch between digits and letters (`key2Name`).
fn split_words(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        let this = kind(c);
        if this == CharKind::Separator {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if !current.is_empty() {
            let prev = kind(chars[i - 1]);
            let next = chars.get(i + 1).map(|&n| kind(n));
            let boundary = (prev == CharKind::Lower && this == CharKind::Upper)
                || ((prev == CharKind::Digit) != (this == CharKind::Digit))
                || (prev == CharKind::Upper
                    && this == CharKind::Upper
                    && next == Some(CharKind::Lower));
            if boundary {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}
