//! Record format: scanning, patching and value encoding.
//!
//! A record is `[key]` followed by whitespace and the rest of the line:
//!
//! ```text
//! [volume]
//! 5
//! ```
//!
//! Records may appear anywhere in the text; everything around them is free
//! prose and is left untouched by patching.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Line terminator written into resources.
pub const LINE_ENDING: &str = "\r\n";

/// Stand-in for a carriage return inside a stored value.
pub const CR_PLACEHOLDER: char = '|';

/// `[key]`, then either same-line whitespace or at most one line break
/// (with surrounding blanks), then the value up to the end of the line.
static RECORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[([A-Za-z0-9_]+)\](?:[^\S\r\n]*(?:\r\n|\r|\n)[^\S\r\n]*|[^\S\r\n]+)([^\r\n]*)")
        .expect("record pattern is valid")
});

/// One `[key]` + value record found in resource text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    pub key: &'a str,
    pub value: &'a str,
}

/// A pattern match whose key or value could not be extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MalformedRecord {
    /// Byte offset of the match in the text.
    pub offset: usize,
}

/// Result of patching one key in resource text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// Text after substitution.
    pub text: String,
    /// Number of records rewritten. Zero means the text is unchanged.
    pub replaced: usize,
}

/// Scan `text` for records in order of appearance.
pub fn records(text: &str) -> impl Iterator<Item = Result<Record<'_>, MalformedRecord>> {
    RECORD.captures_iter(text).map(|caps| {
        match (caps.get(1), caps.get(2)) {
            (Some(key), Some(value)) => Ok(Record {
                key: key.as_str(),
                value: value.as_str(),
            }),
            // Both groups are mandatory in RECORD, so every match has them.
            _ => Err(MalformedRecord {
                offset: caps.get(0).map_or(0, |m| m.start()),
            }),
        }
    })
}

/// Rewrite every record for `key` as `[key]` CRLF `value`.
///
/// Text outside the matched records is preserved byte for byte.
pub fn patch_record(text: &str, key: &str, value: &str) -> Patch {
    let mut replaced = 0;
    let patched = RECORD.replace_all(text, |caps: &Captures| {
        if caps.get(1).map(|m| m.as_str()) == Some(key) {
            replaced += 1;
            format!("[{}]{}{}", key, LINE_ENDING, value)
        } else {
            caps[0].to_string()
        }
    });

    Patch {
        text: patched.into_owned(),
        replaced,
    }
}

/// Render a fresh resource: header lines, then one block per parameter.
pub fn render_default_body<'a, I>(header: &[String], params: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut text = String::new();
    for line in header {
        text.push_str(line);
        text.push_str(LINE_ENDING);
    }
    for (key, value) in params {
        text.push_str(LINE_ENDING);
        text.push_str(&format!("[{}]", key));
        text.push_str(LINE_ENDING);
        text.push_str(value);
        text.push_str(LINE_ENDING);
    }
    text
}

/// Whether `key` survives the record format.
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Fold line breaks into the placeholder so the value stays on one line.
pub fn encode_value(value: &str) -> Cow<'_, str> {
    if !value.contains(['\r', '\n']) {
        return Cow::Borrowed(value);
    }
    let placeholder = CR_PLACEHOLDER.to_string();
    Cow::Owned(
        value
            .replace("\r\n", &placeholder)
            .replace(['\r', '\n'], &placeholder),
    )
}

/// Expand placeholders back into carriage returns.
pub fn decode_value(value: &str) -> Cow<'_, str> {
    if value.contains(CR_PLACEHOLDER) {
        Cow::Owned(value.replace(CR_PLACEHOLDER, "\r"))
    } else {
        Cow::Borrowed(value)
    }
}
