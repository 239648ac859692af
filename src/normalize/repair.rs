//! Repairs for JSON that a model emitted almost correctly.
//!
//! Both passes track whether the scanner is inside a string literal, so
//! brackets and control characters inside strings are left alone.

/// Re-escape raw control characters that appear inside string literals.
///
/// Models regularly put literal newlines inside JSON strings. Outside of
/// strings the characters are valid whitespace and are kept as they are.
#[must_use]
pub fn escape_control_chars(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escape_next = false;

    for ch in text.chars() {
        if escape_next {
            escape_next = false;
            out.push(ch);
            continue;
        }
        match ch {
            '\\' if in_string => {
                escape_next = true;
                out.push(ch);
            }
            '"' => {
                in_string = !in_string;
                out.push(ch);
            }
            '\n' if in_string => out.push_str("\\n"),
            '\r' if in_string => out.push_str("\\r"),
            '\t' if in_string => out.push_str("\\t"),
            c if in_string && (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }

    out
}

/// Close a structure that was cut off mid-way.
///
/// Appends a closing quote if the text ends inside a string, then closes every
/// unclosed `{`/`[` in LIFO order. Before each closer a dangling `,` is
/// dropped and a dangling `:` gets a `null` value, so `{"a": [1,2,` becomes
/// `{"a": [1,2]}`.
#[must_use]
pub fn close_truncated(text: &str) -> String {
    let mut stack: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escape_next = false;

    for ch in text.chars() {
        if escape_next {
            escape_next = false;
            continue;
        }
        if in_string {
            match ch {
                '\\' => escape_next = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => stack.push('}'),
            '[' => stack.push(']'),
            '}' | ']' => {
                if stack.last() == Some(&ch) {
                    stack.pop();
                }
            }
            _ => {}
        }
    }

    let mut out = text.to_string();
    if escape_next {
        // A lone trailing backslash would escape the quote we add.
        out.pop();
    }
    if in_string {
        out.push('"');
    }

    while let Some(closer) = stack.pop() {
        trim_dangling(&mut out);
        out.push(closer);
    }

    out
}

/// Drop trailing whitespace and commas; give a dangling key a `null` value.
fn trim_dangling(out: &mut String) {
    loop {
        let trimmed_len = out.trim_end().len();
        out.truncate(trimmed_len);
        if out.ends_with(',') {
            out.pop();
        } else {
            break;
        }
    }
    if out.ends_with(':') {
        out.push_str(" null");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_escape_newline_inside_string() {
        let raw = "{\"text\": \"line one\nline two\"}";
        let escaped = escape_control_chars(raw);
        assert_eq!(escaped, "{\"text\": \"line one\\nline two\"}");
        let value: serde_json::Value = serde_json::from_str(&escaped).unwrap();
        assert_eq!(value["text"], "line one\nline two");
    }

    #[test]
    fn test_escape_keeps_whitespace_outside_strings() {
        let raw = "{\n\t\"a\": 1\r\n}";
        assert_eq!(escape_control_chars(raw), raw);
    }

    #[test]
    fn test_escape_respects_escaped_quotes() {
        let raw = "{\"a\": \"say \\\"hi\\\"\nnow\"}";
        let escaped = escape_control_chars(raw);
        let value: serde_json::Value = serde_json::from_str(&escaped).unwrap();
        assert_eq!(value["a"], "say \"hi\"\nnow");
    }

    #[test]
    fn test_escape_other_control_chars() {
        let raw = "{\"a\": \"bell\u{7}\"}";
        let escaped = escape_control_chars(raw);
        assert!(escaped.contains("\\u0007"));
        assert!(serde_json::from_str::<serde_json::Value>(&escaped).is_ok());
    }

    #[test_case("{\"a\": [1,2,", "{\"a\": [1,2]}" ; "array then object")]
    #[test_case("[{\"x\": 1}, {\"y\": ", "[{\"x\": 1}, {\"y\": null}]" ; "dangling colon")]
    #[test_case("{\"a\": \"trunc", "{\"a\": \"trunc\"}" ; "open string")]
    #[test_case("{\"a\": \"b}\"", "{\"a\": \"b}\"}" ; "brace inside string ignored")]
    #[test_case("{\"a\": 1}", "{\"a\": 1}" ; "complete input unchanged")]
    fn test_close_truncated(input: &str, expected: &str) {
        assert_eq!(close_truncated(input), expected);
    }

    #[test]
    fn test_close_truncated_nested_lifo() {
        let repaired = close_truncated("{\"a\": {\"b\": [[1");
        assert_eq!(repaired, "{\"a\": {\"b\": [[1]]}}");
        assert!(serde_json::from_str::<serde_json::Value>(&repaired).is_ok());
    }

    #[test]
    fn test_close_truncated_trailing_backslash() {
        let repaired = close_truncated("{\"a\": \"path\\");
        assert_eq!(repaired, "{\"a\": \"path\"}");
    }
}
