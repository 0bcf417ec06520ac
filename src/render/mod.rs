pub mod carbon;
pub mod color;
pub mod deck;
pub mod error;
pub mod heatmap;
pub mod legend;

use std::path::{Path, PathBuf};

use error::Error;

/// Write a rendered page into `dir`, creating the directory if needed.
pub fn write_page(dir: &Path, file_name: &str, html: &str) -> Result<PathBuf, Error> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    std::fs::write(&path, html)?;
    log::info!("Wrote {} ({} bytes)", path.display(), html.len());
    Ok(path)
}

/// Escape text for use inside HTML element content or a quoted attribute.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"A" & 'B'</b>"#),
            "&lt;b&gt;&quot;A&quot; &amp; &#39;B&#39;&lt;/b&gt;"
        );
        assert_eq!(escape_html("Low Density:3"), "Low Density:3");
    }
}
