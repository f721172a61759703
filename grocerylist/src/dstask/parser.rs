//! Parsing of dstask output into grocery items
//!
//! dstask has been seen printing either a JSON array (possibly surrounded by
//! banner or log lines) or one `<id> <status> <description> +tags` line per
//! task. Both are handled here as pure functions over the captured stdout.
//! Malformed output never fails: it degrades to fewer or no items.

use super::item::GroceryItem;
use crate::config::ParseMode;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// `<id> <status> <description...>` followed by optional trailing `+tag` tokens
///
/// Tag names are ASCII word characters and `-`, matching what dstask writes.
static LINE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]+)\s+(\S+)\s+(.+?)((?:\s+\+[A-Za-z0-9_-]+)*)\s*$")
        .expect("line pattern is valid")
});

static TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\+[A-Za-z0-9_-]+").expect("tag pattern is valid"));

/// The shape of a captured output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// A JSON array delimited by a `[` line and a `]` line
    Structured,
    /// One item per text line
    Line,
}

impl OutputFormat {
    /// Structured when any line starts with `[`, line mode otherwise
    pub fn detect(output: &str) -> Self {
        if output.lines().any(|line| line.trim().starts_with('[')) {
            Self::Structured
        } else {
            Self::Line
        }
    }

    /// Resolve a configured mode against an actual output
    pub fn select(mode: ParseMode, output: &str) -> Self {
        match mode {
            ParseMode::Auto => Self::detect(output),
            ParseMode::Json => Self::Structured,
            ParseMode::Text => Self::Line,
        }
    }
}

/// Parse captured dstask output into items
pub fn parse_output(output: &str, mode: ParseMode) -> Vec<GroceryItem> {
    let format = OutputFormat::select(mode, output);
    tracing::debug!("Parsing dstask output as {:?}", format);

    match format {
        OutputFormat::Structured => parse_structured(output),
        OutputFormat::Line => parse_lines(output),
    }
}

/// Extract the JSON array block from noisy output
///
/// Capture starts at the first line whose trimmed content begins with `[`
/// and ends, inclusive, at the first later line whose trimmed content is
/// exactly `]`. A block opened and closed on a single line ends there.
pub fn extract_json_block(output: &str) -> Option<String> {
    let mut lines = output.lines();
    let first = lines.by_ref().find(|line| line.trim().starts_with('['))?;

    let mut block = vec![first];
    if first.trim().ends_with(']') {
        return Some(first.to_string());
    }

    for line in lines {
        block.push(line);
        if line.trim() == "]" {
            break;
        }
    }

    Some(block.join("\n"))
}

/// Parse a JSON array of dstask records out of `output`
pub fn parse_structured(output: &str) -> Vec<GroceryItem> {
    let Some(block) = extract_json_block(output) else {
        tracing::debug!("No JSON array found in dstask output");
        return Vec::new();
    };

    let records = match serde_json::from_str::<Vec<Value>>(&block) {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!("Failed to parse dstask output as JSON: {}", e);
            return Vec::new();
        }
    };

    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value(record) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!("Skipping dstask record {}: {}", index, e);
                None
            }
        })
        .collect()
}

/// Parse every line of `output`, dropping lines that are not items
pub fn parse_lines(output: &str) -> Vec<GroceryItem> {
    output.lines().filter_map(parse_line).collect()
}

/// Parse a single `<id> <status> <description> +tags` line
///
/// The id must start the line; indented lines are not items.
pub fn parse_line(line: &str) -> Option<GroceryItem> {
    let line = line.trim_end();
    if line.is_empty() {
        return None;
    }

    let captures = LINE_PATTERN.captures(line)?;
    let tags = TAG_PATTERN
        .find_iter(line)
        .map(|m| m.as_str().to_string())
        .collect();

    Some(GroceryItem::new(
        &captures[1],
        &captures[2],
        captures[3].trim(),
        tags,
    ))
}
