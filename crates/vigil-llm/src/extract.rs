//! JSON extraction and repair for free-text LLM output.
//!
//! Neither function fails. Text that is still not JSON after repair is
//! returned as-is, and the caller decides that the pipeline failed.

const FENCE: &str = "```";
const JSON_TAG: &str = "json";

/// Recover a JSON object from raw LLM text.
///
/// Preference order: the contents of a fenced code block, otherwise the
/// first balanced `{...}` object. A candidate that does not parse is passed
/// through [`close_json`]. Text without any `{` comes back trimmed.
#[must_use]
pub fn extract_json(raw: &str) -> String {
    let trimmed = raw.trim();

    let candidate = match fenced_block(trimmed) {
        Some(body) => body,
        None => {
            let Some(open) = trimmed.find('{') else {
                return trimmed.to_owned();
            };
            let tail = &trimmed[open..];
            match matching_brace(tail) {
                Some(close) => &tail[..=close],
                None => tail,
            }
        }
    };

    if is_valid_json(candidate) {
        return candidate.to_owned();
    }
    close_json(candidate)
}

/// Repair truncated JSON by dropping a dangling key and closing what is open.
///
/// Valid input is returned unchanged.
#[must_use]
pub fn close_json(text: &str) -> String {
    if is_valid_json(text) {
        return text.to_owned();
    }

    let mut repaired = strip_dangling_key(text.trim()).to_owned();
    strip_trailing_comma(&mut repaired);

    let scan = Scan::run(&repaired);
    if scan.in_string {
        if scan.escaped {
            repaired.pop();
        }
        repaired.push('"');
    }
    for open in scan.stack.iter().rev() {
        repaired.push(if *open == b'{' { '}' } else { ']' });
    }
    repaired
}

fn is_valid_json(text: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(text).is_ok()
}

/// Body of the first fenced block, with an optional language tag removed.
///
/// An unterminated fence (output cut off before the closing backticks)
/// yields everything after the opening fence.
fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find(FENCE)? + FENCE.len();
    let body = strip_language_tag(&text[start..]);
    let body = body.find(FENCE).map_or(body, |end| &body[..end]);
    Some(body.trim())
}

/// Drop the info string after an opening fence.
///
/// A `json` tag (any case) is dropped wherever the body starts, including on
/// the same line. Any other tag is only recognised on a line of its own.
fn strip_language_tag(after: &str) -> &str {
    if let Some(tag) = after.get(..JSON_TAG.len())
        && tag.eq_ignore_ascii_case(JSON_TAG)
        && !after[JSON_TAG.len()..].starts_with(|c: char| c.is_ascii_alphanumeric())
    {
        return &after[JSON_TAG.len()..];
    }

    match after.split_once('\n') {
        Some((tag, rest)) if tag.trim().chars().all(|c| c.is_ascii_alphanumeric()) => rest,
        _ => after,
    }
}

/// Byte offset of the `}` closing the object that starts at offset 0.
fn matching_brace(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, byte) in text.bytes().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Drop a trailing object key that never got a value.
///
/// Covers a key cut off mid-string (`, "partial`), a complete key
/// (`, "key"`) and a key with its colon (`, "key":`).
fn strip_dangling_key(text: &str) -> &str {
    let scan = Scan::run(text);
    let Some(last) = scan.last_string else {
        return text;
    };
    if !last.is_key {
        return text;
    }

    let dangling = if scan.in_string {
        true
    } else {
        let rest = last.end.map_or("", |end| text[end + 1..].trim());
        rest.is_empty() || rest == ":"
    };

    if dangling { &text[..last.start] } else { text }
}

fn strip_trailing_comma(text: &mut String) {
    let len = text.trim_end().len();
    text.truncate(len);
    if text.ends_with(',') {
        text.pop();
    }
}

/// Position of the most recent string literal seen by [`Scan`].
#[derive(Debug, Clone, Copy)]
struct StringSpan {
    /// Offset of the opening quote.
    start: usize,
    /// Offset of the closing quote, if the string was closed.
    end: Option<usize>,
    /// Opened directly after `{` or `,` inside an object.
    is_key: bool,
}

/// String- and escape-aware structural scan.
#[derive(Debug, Default)]
struct Scan {
    stack: Vec<u8>,
    in_string: bool,
    escaped: bool,
    last_string: Option<StringSpan>,
}

impl Scan {
    fn run(text: &str) -> Self {
        let mut scan = Self::default();
        let mut prev_significant: Option<u8> = None;

        for (i, byte) in text.bytes().enumerate() {
            if scan.in_string {
                if scan.escaped {
                    scan.escaped = false;
                } else if byte == b'\\' {
                    scan.escaped = true;
                } else if byte == b'"' {
                    scan.in_string = false;
                    if let Some(span) = scan.last_string.as_mut() {
                        span.end = Some(i);
                    }
                    prev_significant = Some(b'"');
                }
                continue;
            }

            match byte {
                b'"' => {
                    let in_object = scan.stack.last() == Some(&b'{');
                    scan.in_string = true;
                    scan.last_string = Some(StringSpan {
                        start: i,
                        end: None,
                        is_key: in_object && matches!(prev_significant, Some(b'{' | b',')),
                    });
                }
                b'{' | b'[' => scan.stack.push(byte),
                b'}' | b']' => {
                    let expected = if byte == b'}' { b'{' } else { b'[' };
                    if scan.stack.last() == Some(&expected) {
                        scan.stack.pop();
                    }
                }
                _ => {}
            }
            if !byte.is_ascii_whitespace() && byte != b'"' {
                prev_significant = Some(byte);
            }
        }
        scan
    }
}
