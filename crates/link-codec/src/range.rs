//! Compressed deposit index notation.
//!
//! The `i` parameter of a multilink is a comma separated list whose entries
//! are either a plain index (`40`) or a run `(start,count)` covering
//! `start..start+count`. Both may be mixed freely: `(28,5),40,(50,2)`.

use std::fmt::Write as _;
use std::sync::LazyLock;

use regex::Regex;

/// Upper bound on the number of slots a single link may expand to.
pub const MAX_EXPANDED_SLOTS: u64 = 100_000;

static COMPRESSED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\(\d+,\d+\)(,\(\d+,\d+\))*$").expect("compressed index pattern is valid")
});

/// One entry of an index list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexSegment {
    Single(u64),
    Range { start: u64, count: u64 },
}

impl IndexSegment {
    pub fn len(&self) -> u64 {
        match self {
            IndexSegment::Single(_) => 1,
            IndexSegment::Range { count, .. } => *count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Returns `true` when `value` consists solely of `(start,count)` groups.
pub fn is_compressed(value: &str) -> bool {
    COMPRESSED.is_match(value)
}

/// Parses an index list into its segments, in order.
///
/// Whitespace around entries is ignored. An empty entry, an unclosed group
/// or a run whose end does not fit in a `u64` is an error; the message is
/// meant to be wrapped into a [`crate::LinkError::MalformedLink`].
pub fn parse_index_list(value: &str) -> Result<Vec<IndexSegment>, String> {
    let mut segments = Vec::new();
    let mut rest = value.trim();

    if rest.is_empty() {
        return Err("empty index list".into());
    }

    loop {
        let (segment, tail) = if let Some(group) = rest.strip_prefix('(') {
            let close = group
                .find(')')
                .ok_or_else(|| format!("unclosed index group in '{value}'"))?;
            let (start, count) = group[..close]
                .split_once(',')
                .ok_or_else(|| format!("index group '({})' needs a start and a count", &group[..close]))?;
            let start = parse_index(start)?;
            let count = parse_index(count)?;
            if start.checked_add(count).is_none() {
                return Err(format!("index group ({start},{count}) overflows"));
            }
            (IndexSegment::Range { start, count }, group[close + 1..].trim_start())
        } else {
            let end = rest.find(',').unwrap_or(rest.len());
            (IndexSegment::Single(parse_index(&rest[..end])?), &rest[end..])
        };
        segments.push(segment);

        if tail.is_empty() {
            break;
        }
        rest = tail
            .strip_prefix(',')
            .ok_or_else(|| format!("unexpected '{tail}' in index list"))?
            .trim_start();
        if rest.is_empty() {
            return Err(format!("trailing comma in index list '{value}'"));
        }
    }

    Ok(segments)
}

fn parse_index(raw: &str) -> Result<u64, String> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("'{raw}' is not a deposit index"));
    }
    raw.parse::<u64>()
        .map_err(|_| format!("deposit index '{raw}' is out of range"))
}

/// Expands segments into the indices they cover, in order.
pub fn expand_segments(segments: &[IndexSegment]) -> Result<Vec<u64>, String> {
    let total = segments
        .iter()
        .try_fold(0u64, |acc, s| acc.checked_add(s.len()))
        .filter(|total| *total <= MAX_EXPANDED_SLOTS)
        .ok_or_else(|| format!("index list expands to more than {MAX_EXPANDED_SLOTS} deposits"))?;

    let mut indices = Vec::with_capacity(total as usize);
    for segment in segments {
        match *segment {
            IndexSegment::Single(index) => indices.push(index),
            IndexSegment::Range { start, count } => indices.extend(start..start + count),
        }
    }
    Ok(indices)
}

/// Parses and expands an index list in one step.
pub fn expand_index_list(value: &str) -> Result<Vec<u64>, String> {
    expand_segments(&parse_index_list(value)?)
}

/// Groups `indices` into maximal runs of consecutive values, preserving the
/// order in which they appear. Singletons become runs of length one.
pub fn compress(indices: &[u64]) -> Vec<(u64, u64)> {
    let mut runs: Vec<(u64, u64)> = Vec::new();
    for &index in indices {
        match runs.last_mut() {
            Some((start, count)) if start.checked_add(*count) == Some(index) => *count += 1,
            _ => runs.push((index, 1)),
        }
    }
    runs
}

/// Renders runs as `(start,count),(start,count),...`.
pub fn format_ranges(runs: &[(u64, u64)]) -> String {
    let mut out = String::new();
    for (n, (start, count)) in runs.iter().enumerate() {
        if n > 0 {
            out.push(',');
        }
        let _ = write!(out, "({start},{count})");
    }
    out
}

/// Renders indices as a plain comma list.
pub fn format_list(indices: &[u64]) -> String {
    indices
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
