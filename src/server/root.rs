//! Greeting for any GET path, usable as a liveness check.

use axum::http::Uri;
use percent_encoding::percent_decode_str;

/// Returns `Hello, "<path>"` with the request path percent-decoded, then HTML-escaped.
pub async fn root_handler(uri: Uri) -> String {
    let path = percent_decode_str(uri.path()).decode_utf8_lossy();
    format!("Hello, \"{}\"", escape_html(&path))
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
