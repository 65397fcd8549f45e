use std::path::{Path, PathBuf};

use crate::imaging::domain::image_writer::ImageWriter;
use crate::pipeline::swap_error::{sendable, SwapError};
use crate::pipeline::swap_faces_use_case::{SwapRequest, SwapResult};
use crate::shared::constants::DEFAULT_OUTPUT_EXTENSION;
use crate::shared::frame::Frame;
use crate::viewport::viewport_controller::{ViewportController, ViewportResponse};
use crate::viewport::viewport_transform::fit_size;

/// `swap_<target stem>_con_<source stem>.<ext>`.
pub fn output_file_name(target: &Path, source: &Path, extension: &str) -> String {
    let ext = extension.trim_start_matches('.');
    let ext = if ext.is_empty() {
        DEFAULT_OUTPUT_EXTENSION
    } else {
        ext
    };
    format!("swap_{}_con_{}.{ext}", stem(target), stem(source))
}

fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Host-agnostic state of one face-swap window.
///
/// Tracks the selected inputs, gates the swap trigger so at most one run is
/// in flight, and feeds finished results into the viewport. The swap itself
/// runs elsewhere: `start_swap` hands out a [`SwapRequest`] and
/// `finish_swap` takes the outcome back.
pub struct SwapSession {
    target: Option<PathBuf>,
    source: Option<PathBuf>,
    in_flight: bool,
    result: Option<SwapResult>,
    viewport: ViewportController,
    output_dir: PathBuf,
    extension: String,
}

impl SwapSession {
    pub fn new(output_dir: PathBuf, extension: &str, viewport: ViewportController) -> Self {
        Self {
            target: None,
            source: None,
            in_flight: false,
            result: None,
            viewport,
            output_dir,
            extension: extension.to_string(),
        }
    }

    pub fn target(&self) -> Option<&Path> {
        self.target.as_deref()
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn result(&self) -> Option<&SwapResult> {
        self.result.as_ref()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut ViewportController {
        &mut self.viewport
    }

    pub fn select_target(&mut self, path: PathBuf) -> Result<(), SwapError> {
        self.ensure_idle("select a target image")?;
        log::info!("Target image: {}", path.display());
        self.target = Some(path);
        Ok(())
    }

    pub fn select_source(&mut self, path: PathBuf) -> Result<(), SwapError> {
        self.ensure_idle("select a source image")?;
        log::info!("Source image: {}", path.display());
        self.source = Some(path);
        Ok(())
    }

    /// Both inputs chosen and no run in flight.
    pub fn can_swap(&self) -> bool {
        self.target.is_some() && self.source.is_some() && !self.in_flight
    }

    /// Marks a run as in flight and returns what the worker should execute.
    pub fn start_swap(&mut self) -> Result<SwapRequest, SwapError> {
        self.ensure_idle("start a swap")?;
        let (Some(target), Some(source)) = (&self.target, &self.source) else {
            return Err(SwapError::InvalidState(
                "select both a target and a source image before swapping".to_string(),
            ));
        };

        let output_path = self
            .output_dir
            .join(output_file_name(target, source, &self.extension));
        let request = SwapRequest {
            target_path: target.clone(),
            source_path: source.clone(),
            output_path,
        };
        self.in_flight = true;
        Ok(request)
    }

    /// Delivers a run's outcome and re-enables the triggers.
    ///
    /// On success the result, fitted to the canvas, becomes the viewport's
    /// base image. On failure the previous result is kept and the error is
    /// passed back to the host.
    pub fn finish_swap(
        &mut self,
        outcome: Result<SwapResult, SwapError>,
    ) -> Result<&SwapResult, SwapError> {
        if !self.in_flight {
            return Err(SwapError::InvalidState("no swap is in flight".to_string()));
        }
        self.in_flight = false;

        let result = outcome?;
        let fitted = fit_to_canvas(&result.output_image, self.viewport.state().canvas_size)?;
        self.viewport.show_image(fitted);
        log::info!(
            "Swap complete: {} face(s), saved to {}",
            result.faces_swapped,
            result.output_path.display()
        );
        Ok(self.result.insert(result))
    }

    /// Writes the full-resolution result to `path`.
    pub fn save_result(&self, writer: &dyn ImageWriter, path: &Path) -> Result<(), SwapError> {
        self.ensure_idle("save the result")?;
        let result = self
            .result
            .as_ref()
            .ok_or_else(|| SwapError::InvalidState("there is no result to save".to_string()))?;
        writer
            .write(path, &result.output_image)
            .map_err(|e| SwapError::Write {
                path: path.to_path_buf(),
                source: sendable(e),
            })?;
        log::info!("Result saved to {}", path.display());
        Ok(())
    }

    /// Forgets inputs, result and the displayed image. A run already in
    /// flight still completes and can be delivered.
    pub fn clear(&mut self) {
        self.target = None;
        self.source = None;
        self.result = None;
        self.viewport.clear_image();
    }

    pub fn reset_zoom(&mut self) -> ViewportResponse {
        self.viewport.reset()
    }

    fn ensure_idle(&self, action: &str) -> Result<(), SwapError> {
        if self.in_flight {
            Err(SwapError::InvalidState(format!(
                "cannot {action} while a swap is running"
            )))
        } else {
            Ok(())
        }
    }
}

fn fit_to_canvas(image: &Frame, canvas: (u32, u32)) -> Result<Frame, SwapError> {
    let (width, height) = fit_size(image.dimensions(), canvas);
    if width == 0 || height == 0 || (width, height) == image.dimensions() {
        return Ok(image.clone());
    }
    let rgb = image::RgbImage::from_raw(image.width(), image.height(), image.data().to_vec())
        .ok_or_else(|| {
            SwapError::InvalidState(format!(
                "result is not an RGB image ({} channels)",
                image.channels()
            ))
        })?;
    let scaled = image::imageops::resize(&rgb, width, height, image::imageops::FilterType::Triangle);
    Ok(Frame::new(scaled.into_raw(), width, height, 3))
}
