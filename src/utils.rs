use std::path::{Path, PathBuf};
use std::process::Command;

/// Directory holding the running executable, with cargo's `target/<profile>`
/// stripped so a development build finds the config at the repo root.
pub fn executable_dir() -> PathBuf {
    let mut path = std::env::current_exe()
        .unwrap_or_default()
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();

    if path.ends_with("target/debug") || path.ends_with("target/release") {
        path.pop();
        path.pop();
    }
    path
}

/// Minimal HTML escaping for text placed inside popup markup.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Opens `url` in the default browser. Failures are logged and ignored.
pub fn open_browser(url: &str) {
    let result = match std::env::consts::OS {
        "macos" => Command::new("open").arg(url).spawn(),
        "windows" => Command::new("cmd").args(["/C", "start", "", url]).spawn(),
        _ => Command::new("xdg-open").arg(url).spawn(),
    };

    if let Err(e) = result {
        tracing::warn!("Could not open browser for {}: {}", url, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html("<b>\"Tom\" & 'Jerry'</b>"),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
        assert_eq!(escape_html("10km NE of Ridgecrest, CA"), "10km NE of Ridgecrest, CA");
    }
}
