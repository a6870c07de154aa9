//! HTML escaping for broadcast text.
//!
//! Every display name and message body passes through here exactly once, at
//! the point it enters the publish pipeline. Nothing downstream (bus,
//! handlers, templates) escapes again, so text that already contains entity
//! references is escaped literally rather than double-applied.

/// Escape `&`, `<`, `>`, `"` and `'` for safe inclusion in HTML.
pub fn html_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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
