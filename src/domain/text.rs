//! Text helpers shared by the render strategies: multiline collapsing and math fixups.

const BEGIN_PREFIX: &str = "\\begin{";

/// Join nbformat multiline fragments into one string.
///
/// Fragments are concatenated without separators; nbformat fragments already
/// carry their own line feeds. With `trim`, leading and trailing whitespace is
/// stripped except for `\n`.
pub fn concat_multiline_string<S: AsRef<str>>(fragments: &[S], trim: bool) -> String {
    let joined: String = fragments.iter().map(AsRef::as_ref).collect();
    if trim {
        trim_non_linefeed(&joined).to_string()
    } else {
        joined
    }
}

fn trim_non_linefeed(text: &str) -> &str {
    text.trim_matches(|ch| matches!(ch, '\t' | '\u{000B}' | '\u{000C}' | '\r' | ' '))
}

/// Make latex text safe for a `$$`-delimited math renderer.
///
/// Bare `\begin{env}…\end{env}` blocks outside existing math regions are
/// wrapped in `$$`. With `force_wrap`, text that still has no `$` delimiter is
/// wrapped as a whole. Applying the fixup to its own output is a no-op.
pub fn fix_markdown(input: &str, force_wrap: bool) -> String {
    let wrapped = wrap_environments(input);
    if force_wrap {
        let trimmed = wrapped.trim();
        if !trimmed.is_empty() && !trimmed.contains('$') {
            return format!("$${trimmed}$$");
        }
    }
    wrapped
}

fn wrap_environments(input: &str) -> String {
    let mut output = String::with_capacity(input.len() + 8);
    let mut rest = input;
    let mut open: Option<&'static str> = None;

    while let Some(ch) = rest.chars().next() {
        if ch == '\\' && rest[1..].starts_with('$') {
            output.push_str(&rest[..2]);
            rest = &rest[2..];
            continue;
        }

        match open {
            Some(delimiter) => {
                if rest.starts_with(delimiter) {
                    output.push_str(delimiter);
                    rest = &rest[delimiter.len()..];
                    open = None;
                    continue;
                }
            }
            None => {
                if rest.starts_with("$$") {
                    open = Some("$$");
                    output.push_str("$$");
                    rest = &rest[2..];
                    continue;
                }
                if ch == '$' {
                    open = Some("$");
                    output.push('$');
                    rest = &rest[1..];
                    continue;
                }
                if let Some(len) = environment_len(rest) {
                    output.push_str("$$");
                    output.push_str(&rest[..len]);
                    output.push_str("$$");
                    rest = &rest[len..];
                    continue;
                }
            }
        }

        output.push(ch);
        rest = &rest[ch.len_utf8()..];
    }

    output
}

/// Byte length of the environment starting at `text`, including nested blocks of the same name.
fn environment_len(text: &str) -> Option<usize> {
    let after = text.strip_prefix(BEGIN_PREFIX)?;
    let name = &after[..after.find('}')?];
    if name.is_empty() {
        return None;
    }

    let open_tag = format!("\\begin{{{name}}}");
    let close_tag = format!("\\end{{{name}}}");
    let mut depth = 0usize;
    let mut cursor = 0usize;

    loop {
        let next_close = text[cursor..].find(&close_tag)? + cursor;
        match text[cursor..].find(&open_tag).map(|idx| idx + cursor) {
            Some(next_open) if next_open < next_close => {
                depth += 1;
                cursor = next_open + open_tag.len();
            }
            _ => {
                depth = depth.saturating_sub(1);
                cursor = next_close + close_tag.len();
                if depth == 0 {
                    return Some(cursor);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concat_has_no_separators() {
        assert_eq!(concat_multiline_string(&["a", "b", "c"], true), "abc");
    }

    #[test]
    fn concat_keeps_embedded_line_feeds() {
        let fragments = ["first line\n", "second line\n"];
        assert_eq!(
            concat_multiline_string(&fragments, true),
            "first line\nsecond line\n"
        );
    }

    #[test]
    fn trim_only_strips_non_linefeed_whitespace() {
        assert_eq!(concat_multiline_string(&["  \tx^2 \r"], true), "x^2");
        assert_eq!(concat_multiline_string(&["\nx\n"], true), "\nx\n");
        assert_eq!(concat_multiline_string(&["  x  "], false), "  x  ");
    }

    #[test]
    fn force_wrap_adds_display_delimiters() {
        assert_eq!(fix_markdown("x^2", true), "$$x^2$$");
    }

    #[test]
    fn fixup_is_idempotent() {
        for input in [
            "x^2",
            "$x^2$",
            "$$\\frac{a}{b}$$",
            "\\begin{align} a &= b \\end{align}",
            "Text with \\begin{equation}e=mc^2\\end{equation} inline",
        ] {
            let once = fix_markdown(input, true);
            assert_eq!(fix_markdown(&once, true), once, "input: {input}");
        }
    }

    #[test]
    fn already_delimited_text_is_untouched() {
        assert_eq!(fix_markdown("$a + b$", true), "$a + b$");
        assert_eq!(fix_markdown("$$a$$ and $b$", true), "$$a$$ and $b$");
    }

    #[test]
    fn bare_environments_are_wrapped() {
        assert_eq!(
            fix_markdown("\\begin{align}a\\end{align}", false),
            "$$\\begin{align}a\\end{align}$$"
        );
    }

    #[test]
    fn environments_inside_math_are_left_alone() {
        let input = "$$\\begin{matrix}1\\end{matrix}$$";
        assert_eq!(fix_markdown(input, true), input);
    }

    #[test]
    fn nested_environments_wrap_once() {
        let input = "\\begin{a}\\begin{a}x\\end{a}\\end{a} tail";
        assert_eq!(
            fix_markdown(input, false),
            "$$\\begin{a}\\begin{a}x\\end{a}\\end{a}$$ tail"
        );
    }

    #[test]
    fn unterminated_environment_is_kept_verbatim() {
        assert_eq!(fix_markdown("\\begin{align} a", false), "\\begin{align} a");
    }

    #[test]
    fn escaped_dollars_do_not_open_math() {
        assert_eq!(fix_markdown("costs \\$5", true), "costs \\$5");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(fix_markdown("", true), "");
    }
}
