//! Column default expressions across engines
//!
//! Catalogs report a default as the engine's own expression text. Numeric
//! and string literals carry over as they are; boolean values and
//! current-time functions are re-spelled for the target engine by
//! [`Dialect::render_default`](super::Dialect::render_default). Any other
//! expression only means something to the engine that reported it.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::DataType;

static NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?$").unwrap());

static STRING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[nN]?'(?:[^']|'')*'$").unwrap());

/// A trailing PostgreSQL cast, e.g. `'new'::character varying`
static CAST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^(.+?)::[A-Za-z_][\w ]*(?:\([\d, ]*\))?(?:\[\])?$").unwrap()
});

/// Current date/time functions, upper-cased with whitespace removed
const CURRENT_TIME_FUNCTIONS: &[&str] = &[
    "CURRENT_TIMESTAMP",
    "CURRENT_TIMESTAMP()",
    "CURRENT_DATE",
    "CURRENT_TIME",
    "LOCALTIMESTAMP",
    "LOCALTIME",
    "CURRENT_UTCTIMESTAMP",
    "SYSDATE",
    "SYSTIMESTAMP",
    "NOW()",
    "GETDATE()",
    "SYSDATETIME()",
    "SYSDATETIMEOFFSET()",
    "DATETIME('NOW')",
];

/// Engine-neutral reading of a reported default
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue<'a> {
    /// `NULL`, i.e. no default
    Null,
    Boolean(bool),
    /// The current date, time or timestamp
    CurrentTime,
    /// A numeric or quoted string literal
    Literal(&'a str),
    /// Anything else, kept for diagnostics
    Expression(&'a str),
}

/// Classify the default reported for a column of `data_type`
pub fn classify(raw: &str, data_type: DataType) -> DefaultValue<'_> {
    let text = strip_cast(unwrap_parens(raw.trim()));
    let compact: String = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_uppercase();

    if compact == "NULL" {
        return DefaultValue::Null;
    }
    if data_type == DataType::Boolean {
        match compact.trim_matches('\'') {
            "1" | "TRUE" | "T" | "Y" => return DefaultValue::Boolean(true),
            "0" | "FALSE" | "F" | "N" => return DefaultValue::Boolean(false),
            _ => {}
        }
    }
    if CURRENT_TIME_FUNCTIONS.contains(&compact.as_str()) {
        return DefaultValue::CurrentTime;
    }
    if NUMBER.is_match(text) || STRING.is_match(text) {
        return DefaultValue::Literal(text);
    }
    DefaultValue::Expression(raw.trim())
}

/// Drop redundant outer parentheses, as in SQL Server's `((0))`
fn unwrap_parens(mut text: &str) -> &str {
    while text.starts_with('(') && text.ends_with(')') && balanced(&text[1..text.len() - 1]) {
        text = text[1..text.len() - 1].trim();
    }
    text
}

fn balanced(text: &str) -> bool {
    let mut depth = 0i32;
    for c in text.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

fn strip_cast(text: &str) -> &str {
    match CAST.captures(text).and_then(|caps| caps.get(1)) {
        Some(value) => unwrap_parens(value.as_str().trim()),
        None => text,
    }
}
