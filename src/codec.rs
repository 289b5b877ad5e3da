//! YOLO label text codec.
//!
//! A label document holds one record per line:
//!
//! ```text
//! <class_id> <x_center> <y_center> <width> <height>
//! ```
//!
//! Decoding is lenient about structure and strict about numbers: a line
//! with fewer than five tokens is skipped, while a line with five or more
//! tokens that fail to parse is a hard error.

use std::fmt::Write as _;

use thiserror::Error;

use crate::model::{Annotation, AnnotationSet};

/// Number of tokens in a label record.
const RECORD_TOKENS: usize = 5;

/// A record that looks structurally valid but holds unparsable numbers.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("line {line}: invalid {field} '{token}'; expected {expected}")]
pub struct LabelDecodeError {
    /// 1-based line number.
    pub line: usize,
    pub field: &'static str,
    pub token: String,
    pub expected: &'static str,
}

/// Encodes annotations as label text, one `\n`-terminated line each.
///
/// Floats use Rust's shortest round-trip formatting, so decoding the output
/// reproduces the exact values. An empty set encodes to an empty string.
pub fn encode(set: &AnnotationSet) -> String {
    let mut out = String::with_capacity(set.len() * 48);
    for ann in set {
        // Writing to a String cannot fail.
        let _ = writeln!(
            out,
            "{} {} {} {} {}",
            ann.class_id, ann.x, ann.y, ann.w, ann.h
        );
    }
    out
}

/// Decodes label text into annotations, preserving line order.
///
/// # Errors
/// Returns [`LabelDecodeError`] for the first line with at least five tokens
/// whose class id is not a non-negative integer or whose coordinates are not
/// floating-point numbers.
pub fn decode(text: &str) -> Result<AnnotationSet, LabelDecodeError> {
    let mut set = AnnotationSet::new();
    for (line_idx, line) in text.lines().enumerate() {
        if let Some(ann) = decode_line(line, line_idx + 1)? {
            set.push(ann);
        }
    }
    Ok(set)
}

/// Decodes a single line. `Ok(None)` means the line was skipped.
pub fn decode_line(line: &str, line_num: usize) -> Result<Option<Annotation>, LabelDecodeError> {
    // Extra trailing tokens are ignored, so only the first five are kept.
    let tokens: Vec<&str> = line.split_whitespace().take(RECORD_TOKENS).collect();
    if tokens.len() < RECORD_TOKENS {
        return Ok(None);
    }

    let class_id = tokens[0]
        .parse::<u32>()
        .map_err(|_| LabelDecodeError {
            line: line_num,
            field: "class_id",
            token: tokens[0].to_string(),
            expected: "non-negative integer",
        })?;

    let x = parse_f64_token(tokens[1], "x_center", line_num)?;
    let y = parse_f64_token(tokens[2], "y_center", line_num)?;
    let w = parse_f64_token(tokens[3], "width", line_num)?;
    let h = parse_f64_token(tokens[4], "height", line_num)?;

    Ok(Some(Annotation::new(class_id, x, y, w, h)))
}

fn parse_f64_token(
    raw: &str,
    field: &'static str,
    line_num: usize,
) -> Result<f64, LabelDecodeError> {
    raw.parse::<f64>().map_err(|_| LabelDecodeError {
        line: line_num,
        field,
        token: raw.to_string(),
        expected: "floating-point number",
    })
}
