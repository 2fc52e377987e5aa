//! Fixed-substitution escaping used by all renderers (spec.md §4.5.1/.2).

/// HTML-escapes `s` via the fixed substitution table `{& < > " '}`.
/// Applied before any markup transform runs, so markup only ever rewrites
/// already-escaped literals.
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Neutralizes raw ESC (0x1B) bytes in untrusted text so a terminal can
/// never interpret them as an escape sequence (spec.md §4.5.1's "ANSI
/// injection defense").
pub fn ansi_sanitize(s: &str) -> String {
    if !s.contains('\x1b') {
        return s.to_string();
    }
    s.replace('\x1b', "\\x1b")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_escape_covers_all_five_characters() {
        assert_eq!(
            html_escape(r#"<script>&'"'"#),
            "&lt;script&gt;&amp;&#39;&quot;&#39;"
        );
    }

    #[test]
    fn html_escape_is_noop_on_plain_text() {
        assert_eq!(html_escape("hello world"), "hello world");
    }

    #[test]
    fn ansi_sanitize_replaces_esc_with_literal_sequence() {
        let input = "before\x1b[31mafter";
        let out = ansi_sanitize(input);
        assert!(!out.contains('\x1b'));
        assert!(out.contains("\\x1b[31m"));
    }

    #[test]
    fn ansi_sanitize_is_noop_without_esc_bytes() {
        assert_eq!(ansi_sanitize("plain"), "plain");
    }
}
