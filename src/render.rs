//! Document generation
//!
//! Persists normalized design data as JSON (the only on-disk format the
//! pipeline defines) and renders generated scenario text to markdown,
//! HTML and PDF files.

use std::fs;
use std::io::BufWriter;
use std::path::PathBuf;

use chrono::Local;
use clap::ValueEnum;
use printpdf::{BuiltinFont, Mm, PdfDocument};
use pulldown_cmark::{html, Parser};
use serde_json::Value;

use crate::error::FigspecError;
use crate::extract::DesignDocument;

/// A4 portrait layout for the PDF output
const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 15.0;
const FONT_SIZE_PT: f32 = 9.0;
const LINE_HEIGHT_MM: f32 = 4.5;

/// Wrap width for PDF text lines
const MAX_LINE_CHARS: usize = 100;

/// Target document format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Markdown,
    Pdf,
    Html,
    /// Every format
    All,
}

impl OutputFormat {
    pub fn label(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "markdown",
            OutputFormat::Pdf => "pdf",
            OutputFormat::Html => "html",
            OutputFormat::All => "all",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Persist a normalized design document as pretty-printed JSON
pub fn save_design_data(
    document: &DesignDocument,
    stem: &str,
) -> Result<PathBuf, FigspecError> {
    let path = PathBuf::from(format!("{stem}.json"));
    let json = serde_json::to_string_pretty(document)?;
    fs::write(&path, json)?;
    Ok(path)
}

/// Render scenario text in the requested format(s), returning the written
/// paths in render order
pub fn write_scenarios(
    format: OutputFormat,
    scenarios: &str,
    design: &Value,
    stem: &str,
) -> Result<Vec<(OutputFormat, PathBuf)>, FigspecError> {
    let formats: &[OutputFormat] = match format {
        OutputFormat::All => &[OutputFormat::Markdown, OutputFormat::Pdf, OutputFormat::Html],
        OutputFormat::Markdown => &[OutputFormat::Markdown],
        OutputFormat::Pdf => &[OutputFormat::Pdf],
        OutputFormat::Html => &[OutputFormat::Html],
    };

    let mut written = Vec::with_capacity(formats.len());
    for fmt in formats {
        let path = match fmt {
            OutputFormat::Markdown => write_markdown(scenarios, design, stem)?,
            OutputFormat::Pdf => write_pdf(scenarios, design, stem)?,
            OutputFormat::Html => write_html(scenarios, design, stem)?,
            OutputFormat::All => unreachable!("All expands to concrete formats"),
        };
        written.push((*fmt, path));
    }
    Ok(written)
}

fn write_markdown(scenarios: &str, design: &Value, stem: &str) -> Result<PathBuf, FigspecError> {
    let path = PathBuf::from(format!("{stem}.md"));
    fs::write(&path, build_markdown(scenarios, design))?;
    Ok(path)
}

fn write_html(scenarios: &str, design: &Value, stem: &str) -> Result<PathBuf, FigspecError> {
    let markdown = build_markdown(scenarios, design);
    let mut body = String::new();
    html::push_html(&mut body, Parser::new(&markdown));

    let page = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>BDD Scenarios: {title}</title>
<style>
body {{ font-family: -apple-system, "Segoe UI", sans-serif; max-width: 60em; margin: 2em auto; padding: 0 1em; color: #222; }}
h1, h2 {{ border-bottom: 1px solid #ddd; padding-bottom: 0.3em; }}
pre {{ background: #f6f8fa; padding: 1em; overflow-x: auto; }}
code {{ font-family: "SF Mono", Consolas, monospace; }}
</style>
</head>
<body>
{body}</body>
</html>
"#,
        title = escape_html(file_name_of(design)),
    );

    let path = PathBuf::from(format!("{stem}.html"));
    fs::write(&path, page)?;
    Ok(path)
}

fn write_pdf(scenarios: &str, design: &Value, stem: &str) -> Result<PathBuf, FigspecError> {
    let path = PathBuf::from(format!("{stem}.pdf"));
    let title = format!("BDD Scenarios: {}", file_name_of(design));

    let (doc, first_page, first_layer) =
        PdfDocument::new(&title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "content");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| FigspecError::Render(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| FigspecError::Render(e.to_string()))?;

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    let mut y = PAGE_HEIGHT_MM - MARGIN_MM;

    layer.use_text(&title, 14.0, Mm(MARGIN_MM), Mm(y), &bold);
    y -= 2.0 * LINE_HEIGHT_MM;
    layer.use_text(
        format!("Generated {}", Local::now().format("%Y-%m-%d %H:%M")),
        FONT_SIZE_PT,
        Mm(MARGIN_MM),
        Mm(y),
        &font,
    );
    y -= 2.0 * LINE_HEIGHT_MM;

    for raw_line in scenarios.lines() {
        for line in wrap_line(raw_line, MAX_LINE_CHARS) {
            if y < MARGIN_MM {
                let (page, page_layer) =
                    doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "content");
                layer = doc.get_page(page).get_layer(page_layer);
                y = PAGE_HEIGHT_MM - MARGIN_MM;
            }
            layer.use_text(line, FONT_SIZE_PT, Mm(MARGIN_MM), Mm(y), &font);
            y -= LINE_HEIGHT_MM;
        }
    }

    doc.save(&mut BufWriter::new(fs::File::create(&path)?))
        .map_err(|e| FigspecError::Render(e.to_string()))?;
    Ok(path)
}

/// Markdown document shared by the markdown and HTML outputs
fn build_markdown(scenarios: &str, design: &Value) -> String {
    format!(
        "# BDD Scenarios: {}\n\n\
         Generated on {} from {} page(s), {} frame(s).\n\n\
         ---\n\n\
         {}\n",
        file_name_of(design),
        Local::now().format("%Y-%m-%d %H:%M"),
        pages_of(design).len(),
        frame_count(design),
        scenarios.trim_end(),
    )
}

fn file_name_of(design: &Value) -> &str {
    design
        .get("file_name")
        .and_then(Value::as_str)
        .unwrap_or("Unknown")
}

fn pages_of(design: &Value) -> &[Value] {
    design
        .get("pages")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn frame_count(design: &Value) -> usize {
    pages_of(design)
        .iter()
        .map(|page| {
            page.get("frames")
                .and_then(Value::as_array)
                .map(Vec::len)
                .unwrap_or(0)
        })
        .sum()
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Word-wrap a line to `width` characters, preserving its leading indent
/// on continuation lines
fn wrap_line(line: &str, width: usize) -> Vec<String> {
    if line.chars().count() <= width {
        return vec![line.to_string()];
    }

    let indent: String = line.chars().take_while(|c| c.is_whitespace()).collect();
    let mut wrapped = Vec::new();
    let mut current = indent.clone();

    for word in line.split_whitespace() {
        let has_content = current.len() > indent.len();
        let candidate = current.chars().count() + word.chars().count() + usize::from(has_content);
        if has_content && candidate > width {
            wrapped.push(std::mem::replace(&mut current, indent.clone()));
        }
        if current.len() > indent.len() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if current.len() > indent.len() || wrapped.is_empty() {
        wrapped.push(current);
    }
    wrapped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::normalize_document;
    use serde_json::json;
    use tempfile::TempDir;

    fn sample_design() -> Value {
        json!({
            "file_name": "Shop",
            "pages": [
                {"name": "P1", "frames": [{"elements": []}, {"elements": []}]},
                {"name": "P2", "frames": [{"elements": []}]}
            ]
        })
    }

    fn stem_in(dir: &TempDir, name: &str) -> String {
        dir.path().join(name).to_str().unwrap().to_string()
    }

    #[test]
    fn test_build_markdown_header_and_counts() {
        let markdown = build_markdown("Feature: checkout", &sample_design());
        assert!(markdown.starts_with("# BDD Scenarios: Shop"));
        assert!(markdown.contains("2 page(s), 3 frame(s)"));
        assert!(markdown.contains("Feature: checkout"));
    }

    #[test]
    fn test_build_markdown_unknown_file_name() {
        let markdown = build_markdown("x", &json!({}));
        assert!(markdown.contains("Unknown"));
        assert!(markdown.contains("0 page(s), 0 frame(s)"));
    }

    #[test]
    fn test_save_design_data_round_trips() {
        let dir = TempDir::new().unwrap();
        let document = normalize_document(&json!({"name": "App"}));

        let path = save_design_data(&document, &stem_in(&dir, "figma_data")).unwrap();
        assert!(path.to_str().unwrap().ends_with("figma_data.json"));

        let reloaded: Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(reloaded["file_name"], "App");
        assert_eq!(reloaded["pages"], json!([]));
    }

    #[test]
    fn test_write_markdown_creates_file() {
        let dir = TempDir::new().unwrap();
        let path =
            write_markdown("Feature: login", &sample_design(), &stem_in(&dir, "out")).unwrap();
        let contents = fs::read_to_string(path).unwrap();
        assert!(contents.contains("Feature: login"));
    }

    #[test]
    fn test_write_html_wraps_markdown_body() {
        let dir = TempDir::new().unwrap();
        let path =
            write_html("Feature: login", &sample_design(), &stem_in(&dir, "out")).unwrap();
        let contents = fs::read_to_string(path).unwrap();
        assert!(contents.starts_with("<!DOCTYPE html>"));
        assert!(contents.contains("<h1>"));
        assert!(contents.contains("Feature: login"));
        assert!(contents.contains("<title>BDD Scenarios: Shop</title>"));
    }

    #[test]
    fn test_write_pdf_produces_pdf_bytes() {
        let dir = TempDir::new().unwrap();
        let long_text = "Scenario: long\n".repeat(200);
        let path = write_pdf(&long_text, &sample_design(), &stem_in(&dir, "out")).unwrap();
        let bytes = fs::read(path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_write_scenarios_all_formats() {
        let dir = TempDir::new().unwrap();
        let written =
            write_scenarios(OutputFormat::All, "Feature: x", &sample_design(), &stem_in(&dir, "out"))
                .unwrap();
        let labels: Vec<&str> = written.iter().map(|(fmt, _)| fmt.label()).collect();
        assert_eq!(labels, ["markdown", "pdf", "html"]);
        for (_, path) in &written {
            assert!(path.exists());
        }
    }

    #[test]
    fn test_write_scenarios_single_format() {
        let dir = TempDir::new().unwrap();
        let written = write_scenarios(
            OutputFormat::Markdown,
            "Feature: x",
            &sample_design(),
            &stem_in(&dir, "solo"),
        )
        .unwrap();
        assert_eq!(written.len(), 1);
        assert!(written[0].1.to_str().unwrap().ends_with("solo.md"));
    }

    #[test]
    fn test_wrap_line_short_passthrough() {
        assert_eq!(wrap_line("short", 80), vec!["short"]);
        assert_eq!(wrap_line("", 80), vec![""]);
    }

    #[test]
    fn test_wrap_line_wraps_at_width() {
        let line = "word ".repeat(30);
        let wrapped = wrap_line(line.trim_end(), 20);
        assert!(wrapped.len() > 1);
        for piece in &wrapped {
            assert!(piece.chars().count() <= 20);
        }
    }

    #[test]
    fn test_wrap_line_preserves_indent() {
        let line = format!("    {}", "given ".repeat(10).trim_end());
        let wrapped = wrap_line(&line, 24);
        assert!(wrapped.len() > 1);
        for piece in &wrapped {
            assert!(piece.starts_with("    "));
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a<b> & c"), "a&lt;b&gt; &amp; c");
    }
}
