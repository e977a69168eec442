//! Batch rendering.
//!
//! Pairs catalog images with captions by position (image `i` gets caption
//! `i`), stopping when either list runs out, and writes each result to
//! `<output_dir>/captioned_<file name>`.
//!
//! ## Sequential by Design
//!
//! Each pair is decoded, laid out, composited and saved before the next one
//! starts; nothing is shared between iterations.
//!
//! ## Failure Policy
//!
//! - A caption that cannot be wrapped at any size still renders, unwrapped,
//!   and is reported as a [`LayoutWarning`]. The batch continues.
//! - A source that cannot be decoded, or an output that cannot be written,
//!   aborts the batch. Files already written stay on disk, but no later pair
//!   is attempted.
//!
//! ## Progress
//!
//! Callers can pass a channel sender to receive a [`RenderEvent`] per image.
//! The CLI prints them as they arrive; tests collect them.

use crate::catalog::{CatalogError, ImageAsset, build_catalog, decode_image};
use crate::imaging::{FontSource, LayoutMode, RenderParams, caption_image};
use crate::naming::output_file_name;
use rand::Rng;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::{info, warn};

/// Written next to the outputs by [`write_report`].
pub const REPORT_FILE_NAME: &str = "report.json";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("Cannot decode {path}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("Failed to write {path}: {source}")]
    PersistenceFailure {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One written image.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedOutput {
    pub source: PathBuf,
    pub output: PathBuf,
    pub caption: String,
    pub font: String,
    pub font_size: u32,
    pub lines: Vec<String>,
    pub mode: LayoutMode,
    pub bar_height: u32,
    /// Final canvas dimensions.
    pub width: u32,
    pub height: u32,
}

/// A caption that had to be drawn unwrapped and may overflow the canvas.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutWarning {
    pub source: PathBuf,
    pub output: PathBuf,
    pub caption: String,
}

impl LayoutWarning {
    /// Human-readable warning naming the affected output file.
    pub fn message(&self) -> String {
        let file = self
            .output
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.output.display().to_string());
        format!("Warning: could not fit caption on {file}; caption may overflow")
    }
}

/// Everything a batch produced, in render order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RenderReport {
    pub outputs: Vec<RenderedOutput>,
    pub warnings: Vec<LayoutWarning>,
}

impl RenderReport {
    /// Output paths in the order they were written.
    pub fn written_paths(&self) -> Vec<PathBuf> {
        self.outputs.iter().map(|o| o.output.clone()).collect()
    }
}

#[derive(Debug, Clone)]
pub enum RenderEvent {
    BatchStarted {
        total: usize,
    },
    ImageRendered {
        /// 1-based position in the batch.
        index: usize,
        total: usize,
        output: RenderedOutput,
    },
    LayoutOverflow(LayoutWarning),
}

fn emit(events: Option<&Sender<RenderEvent>>, event: RenderEvent) {
    if let Some(tx) = events {
        tx.send(event).ok();
    }
}

/// Render one pair and save it under `output_dir`.
pub fn render_one<S: FontSource>(
    asset: &ImageAsset,
    caption: &str,
    fonts: &S,
    params: &RenderParams,
    output_dir: &Path,
) -> Result<(RenderedOutput, Option<LayoutWarning>), RenderError> {
    let source = decode_image(&asset.path).map_err(|source| RenderError::Decode {
        path: asset.path.clone(),
        source,
    })?;
    let captioned = caption_image(&source, caption, fonts, params);
    drop(source);

    let output_path = output_dir.join(output_file_name(&asset.file_name));
    captioned
        .image
        .save(&output_path)
        .map_err(|source| RenderError::PersistenceFailure {
            path: output_path.clone(),
            source,
        })?;

    let warning = captioned.layout.is_degraded().then(|| LayoutWarning {
        source: asset.path.clone(),
        output: output_path.clone(),
        caption: caption.to_string(),
    });

    let (width, height) = captioned.image.dimensions();
    let output = RenderedOutput {
        source: asset.path.clone(),
        output: output_path,
        caption: caption.to_string(),
        font: captioned.font_name,
        font_size: captioned.layout.font_size,
        mode: captioned.layout.mode,
        lines: captioned.layout.lines,
        bar_height: captioned.geometry.bar_height,
        width,
        height,
    };
    Ok((output, warning))
}

/// Render `assets[i]` with `captions[i]` for every index both lists share.
pub fn render_batch<S: FontSource>(
    assets: &[ImageAsset],
    captions: &[String],
    fonts: &S,
    params: &RenderParams,
    output_dir: &Path,
    events: Option<Sender<RenderEvent>>,
) -> Result<RenderReport, RenderError> {
    let total = assets.len().min(captions.len());
    emit(events.as_ref(), RenderEvent::BatchStarted { total });

    let mut report = RenderReport::default();
    for (i, (asset, caption)) in assets.iter().zip(captions).enumerate() {
        let (output, warning) = render_one(asset, caption, fonts, params, output_dir)?;
        info!(
            source = %asset.path.display(),
            output = %output.output.display(),
            font = %output.font,
            font_size = output.font_size,
            lines = output.lines.len(),
            "rendered caption"
        );

        emit(
            events.as_ref(),
            RenderEvent::ImageRendered {
                index: i + 1,
                total,
                output: output.clone(),
            },
        );
        if let Some(warning) = warning {
            warn!(output = %warning.output.display(), "caption does not fit, drawn unwrapped");
            emit(events.as_ref(), RenderEvent::LayoutOverflow(warning.clone()));
            report.warnings.push(warning);
        }
        report.outputs.push(output);
    }
    Ok(report)
}

/// Catalog `images_dir`, shuffle with `rng`, and render the batch.
pub fn run<S: FontSource, R: Rng + ?Sized>(
    images_dir: &Path,
    captions: &[String],
    fonts: &S,
    params: &RenderParams,
    output_dir: &Path,
    rng: &mut R,
    events: Option<Sender<RenderEvent>>,
) -> Result<RenderReport, RenderError> {
    let assets = build_catalog(images_dir, captions.len(), rng)?;
    render_batch(&assets, captions, fonts, params, output_dir, events)
}

/// Write the report as pretty JSON into `output_dir`.
pub fn write_report(report: &RenderReport, output_dir: &Path) -> Result<PathBuf, RenderError> {
    let path = output_dir.join(REPORT_FILE_NAME);
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(&path, json)?;
    Ok(path)
}
