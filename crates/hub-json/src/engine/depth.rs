//! Nesting-depth guard for incoming JSON text

/// Whether `json` opens more than `limit` nested arrays or objects.
///
/// Only structure is inspected; brackets inside strings are ignored and
/// the scan stops at the first level past the limit. Syntax errors are
/// left for the parser to report.
pub(crate) fn exceeds_depth(json: &str, limit: usize) -> bool {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for byte in json.bytes() {
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
            b'[' | b'{' => {
                depth += 1;
                if depth > limit {
                    return true;
                }
            }
            b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalars_have_no_depth() {
        assert!(!exceeds_depth("42", 0));
        assert!(!exceeds_depth("\"[[[[\"", 0));
    }

    #[test]
    fn test_limit_is_inclusive() {
        assert!(!exceeds_depth("[[1]]", 2));
        assert!(exceeds_depth("[[1]]", 1));
        assert!(exceeds_depth(r#"{"a":{"b":{}}}"#, 2));
    }

    #[test]
    fn test_siblings_do_not_accumulate() {
        assert!(!exceeds_depth("[[1],[2],[3],{\"a\":2}]", 2));
    }

    #[test]
    fn test_escaped_quotes_stay_inside_string() {
        assert!(!exceeds_depth(r#"["\"[[[", "\\"]"#, 1));
        assert!(exceeds_depth(r#"["\\", [[]]]"#, 2));
    }
}
