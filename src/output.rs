//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Each rendered image leads with its positional index and the caption it
//! received; file paths follow as indented context lines. The output reads as
//! an inventory of what was captioned, while still tracing every result back
//! to its source file.
//!
//! # Output Format
//!
//! ## Captions (before confirmation)
//!
//! ```text
//! Captions
//! 001 the strongest steel is forged in the hottest fire
//! 002 keep going
//! ```
//!
//! ## Render
//!
//! ```text
//! Rendering 2 images
//! 001 the strongest steel is forged in the hottest fire
//!     Source: images/dawn.jpg
//!     Output: output/batch-001/captioned_dawn.jpg
//!     Layout: 2 lines at 50px (Montserrat-VariableFont_wght.ttf)
//! 002 keep going
//!     ...
//!
//! Rendered 2 images → output/batch-001
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::imaging::LayoutMode;
use crate::render::{RenderEvent, RenderReport, RenderedOutput};
use std::path::{Path, PathBuf};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// `2 lines at 50px (arial.ttf)`, or the unwrapped fallback.
fn layout_summary(output: &RenderedOutput) -> String {
    match output.mode {
        LayoutMode::Normal => format!(
            "{} at {}px ({})",
            plural(output.lines.len(), "line", "lines"),
            output.font_size,
            output.font
        ),
        LayoutMode::Degraded => format!(
            "unwrapped at {}px ({})",
            output.font_size, output.font
        ),
    }
}

// ============================================================================
// Captions
// ============================================================================

/// Format the caption list shown before the confirmation prompt.
pub fn format_captions(captions: &[String]) -> Vec<String> {
    let mut lines = vec!["Captions".to_string()];
    for (i, caption) in captions.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), caption));
    }
    lines
}

pub fn print_captions(captions: &[String]) {
    for line in format_captions(captions) {
        println!("{}", line);
    }
}

// ============================================================================
// Render
// ============================================================================

/// Format a single render progress event as display lines.
pub fn format_render_event(event: &RenderEvent) -> Vec<String> {
    match event {
        RenderEvent::BatchStarted { total } => {
            vec![format!("Rendering {}", plural(*total, "image", "images"))]
        }
        RenderEvent::ImageRendered { index, output, .. } => {
            vec![
                format!("{} {}", format_index(*index), output.caption),
                format!("{}Source: {}", indent(1), output.source.display()),
                format!("{}Output: {}", indent(1), output.output.display()),
                format!("{}Layout: {}", indent(1), layout_summary(output)),
            ]
        }
        RenderEvent::LayoutOverflow(warning) => vec![format!("{}{}", indent(1), warning.message())],
    }
}

/// Format the closing summary after a batch finishes.
pub fn format_render_summary(
    report: &RenderReport,
    output_dir: &Path,
    report_path: Option<&Path>,
) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        format!(
            "Rendered {} \u{2192} {}",
            plural(report.outputs.len(), "image", "images"),
            output_dir.display()
        ),
    ];
    if !report.warnings.is_empty() {
        lines.push(format!(
            "{} may overflow:",
            plural(report.warnings.len(), "caption", "captions")
        ));
        for warning in &report.warnings {
            lines.push(format!("{}{}", indent(1), warning.output.display()));
        }
    }
    if let Some(path) = report_path {
        lines.push(format!("Report: {}", path.display()));
    }
    lines
}

pub fn print_render_summary(report: &RenderReport, output_dir: &Path, report_path: Option<&Path>) {
    for line in format_render_summary(report, output_dir, report_path) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// Format the `check` command output: eligible images and caption count.
pub fn format_check_output(
    images_dir: &Path,
    images: &[PathBuf],
    caption_count: Option<usize>,
) -> Vec<String> {
    let mut lines = vec![format!(
        "Images ({} eligible in {})",
        images.len(),
        images_dir.display()
    )];
    for (i, path) in images.iter().enumerate() {
        let name = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        lines.push(format!("{} {}", format_index(i + 1), name));
    }
    if let Some(count) = caption_count {
        lines.push(String::new());
        lines.push(format!("Captions: {count}"));
        let renderable = count.min(images.len());
        lines.push(format!(
            "Would render {}",
            plural(renderable, "image", "images")
        ));
    }
    lines
}

pub fn print_check_output(images_dir: &Path, images: &[PathBuf], caption_count: Option<usize>) {
    for line in format_check_output(images_dir, images, caption_count) {
        println!("{}", line);
    }
}
