//! Lexical scanning helpers that tolerate unparseable input.

/// Find the end of the statement starting at byte `start`.
///
/// Tracks `()[]{}` nesting while skipping string literals, template literals (including `${}`
/// holes) and comments. The statement ends on the line where a closer brings the nesting back to
/// zero with nothing but an optional `;` after it. Returns the byte offset just past that line's
/// content (the position of its `\n`, or `src.len()`), or `None` when the nesting never closes.
pub(crate) fn statement_end(src: &str, start: usize) -> Option<usize> {
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Mode {
        Code,
        Template,
    }

    let bytes = src.as_bytes();
    let mut modes = vec![Mode::Code];
    // For each open `{`: true when it was a template `${` hole.
    let mut brace_kinds: Vec<bool> = Vec::new();
    let mut depth: i64 = 0;
    let mut i = start;

    while i < bytes.len() {
        let b = bytes[i];
        let mode = *modes.last().unwrap_or(&Mode::Code);

        if mode == Mode::Template {
            match b {
                b'\\' => i += 2,
                b'`' => {
                    modes.pop();
                    i += 1;
                }
                b'$' if bytes.get(i + 1) == Some(&b'{') => {
                    modes.push(Mode::Code);
                    brace_kinds.push(true);
                    depth += 1;
                    i += 2;
                }
                _ => i += 1,
            }
            continue;
        }

        match b {
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                i = line_end(src, i);
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = src[i + 2..].find("*/").map_or(bytes.len(), |p| i + 2 + p + 2);
            }
            b'\'' | b'"' => {
                i = skip_quoted(bytes, i);
            }
            b'`' => {
                modes.push(Mode::Template);
                i += 1;
            }
            b'(' | b'[' => {
                depth += 1;
                i += 1;
            }
            b'{' => {
                depth += 1;
                brace_kinds.push(false);
                i += 1;
            }
            b'}' | b')' | b']' => {
                if b == b'}' && brace_kinds.pop() == Some(true) {
                    modes.pop();
                }
                depth -= 1;
                i += 1;
                if depth <= 0 && modes.len() == 1 {
                    let end = line_end(src, i);
                    let rest = src[i..end].trim();
                    if rest.is_empty() || rest == ";" {
                        return Some(end);
                    }
                    if depth < 0 {
                        return None;
                    }
                }
            }
            _ => i += 1,
        }
    }

    None
}

/// Byte offset of the `\n` ending the line containing `i`, or `src.len()`.
pub(crate) fn line_end(src: &str, i: usize) -> usize {
    src[i..].find('\n').map_or(src.len(), |p| i + p)
}

fn skip_quoted(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' => return i,
            c if c == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}
