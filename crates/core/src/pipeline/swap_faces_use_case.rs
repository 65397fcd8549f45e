use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::detection::domain::face::Face;
use crate::detection::domain::face_detector::FaceDetector;
use crate::imaging::domain::image_reader::ImageReader;
use crate::imaging::domain::image_writer::ImageWriter;
use crate::pipeline::pipeline_logger::{NullPipelineLogger, PipelineLogger};
use crate::pipeline::swap_error::{sendable, FaceRole, SwapError};
use crate::shared::frame::Frame;
use crate::swapping::domain::face_compositor::FaceCompositor;

/// Input files and destination for one swap run.
#[derive(Clone, Debug, PartialEq)]
pub struct SwapRequest {
    pub target_path: PathBuf,
    pub source_path: PathBuf,
    pub output_path: PathBuf,
}

/// The fully composited image and where it was persisted.
#[derive(Clone, Debug)]
pub struct SwapResult {
    pub output_image: Frame,
    pub output_path: PathBuf,
    pub faces_swapped: usize,
}

/// Face-swap pipeline: read → detect → order → composite each face → write.
///
/// Every target face receives the same source face, the left-most one in the
/// source image. Target faces are composited left to right, each pass working
/// on the previous pass's output. Nothing is written unless all passes succeed.
pub struct SwapFacesUseCase {
    reader: Box<dyn ImageReader>,
    detector: Box<dyn FaceDetector>,
    compositor: Box<dyn FaceCompositor>,
    image_writer: Box<dyn ImageWriter>,
    logger: Box<dyn PipelineLogger>,
}

impl SwapFacesUseCase {
    pub fn new(
        reader: Box<dyn ImageReader>,
        detector: Box<dyn FaceDetector>,
        compositor: Box<dyn FaceCompositor>,
        image_writer: Box<dyn ImageWriter>,
    ) -> Self {
        Self {
            reader,
            detector,
            compositor,
            image_writer,
            logger: Box::new(NullPipelineLogger),
        }
    }

    pub fn with_logger(mut self, logger: Box<dyn PipelineLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Decodes both files and runs the swap, writing to `request.output_path`.
    ///
    /// The target is decoded and searched before the source is touched, so a
    /// faceless target is reported even when the source is unreadable.
    pub fn execute(&mut self, request: &SwapRequest) -> Result<SwapResult, SwapError> {
        let target = self.read(&request.target_path)?;
        let target_faces = self.detect_faces(FaceRole::Target, &target)?;

        let source = self.read(&request.source_path)?;
        let source_faces = self.detect_faces(FaceRole::Source, &source)?;

        self.composite_and_write(&target, &target_faces, &source_faces, &request.output_path)
    }

    /// Runs the swap on already decoded images.
    pub fn swap(
        &mut self,
        target: &Frame,
        source: &Frame,
        output_path: &Path,
    ) -> Result<SwapResult, SwapError> {
        let target_faces = self.detect_faces(FaceRole::Target, target)?;
        let source_faces = self.detect_faces(FaceRole::Source, source)?;
        self.composite_and_write(target, &target_faces, &source_faces, output_path)
    }

    fn read(&self, path: &Path) -> Result<Frame, SwapError> {
        self.reader.read(path).map_err(|e| SwapError::Decode {
            path: path.to_path_buf(),
            source: sendable(e),
        })
    }

    /// Detects and orders faces; an empty result is a terminal error.
    fn detect_faces(&mut self, role: FaceRole, frame: &Frame) -> Result<Vec<Face>, SwapError> {
        let start = Instant::now();
        let faces = self
            .detector
            .detect(frame)
            .map_err(|e| SwapError::Detection {
                which: role,
                source: sendable(e),
            })?;
        self.logger
            .timing(&format!("detect_{role}"), elapsed_ms(start));
        self.logger
            .metric(&format!("{role}_faces"), faces.len() as f64);

        if faces.is_empty() {
            return Err(SwapError::NoFaceDetected { which: role });
        }
        Ok(order_left_to_right(faces))
    }

    fn composite_and_write(
        &mut self,
        target: &Frame,
        target_faces: &[Face],
        source_faces: &[Face],
        output_path: &Path,
    ) -> Result<SwapResult, SwapError> {
        let source_face = source_faces
            .first()
            .ok_or(SwapError::NoFaceDetected {
                which: FaceRole::Source,
            })?;
        let expected = target.dimensions();

        let start = Instant::now();
        let mut working = target.clone();
        for (i, face) in target_faces.iter().enumerate() {
            self.compositor
                .composite(&mut working, face, source_face)
                .map_err(|e| SwapError::Composite(sendable(e)))?;
            if working.dimensions() != expected {
                return Err(SwapError::DimensionMismatch {
                    expected,
                    actual: working.dimensions(),
                });
            }
            log::debug!(
                "Composited face {}/{} at x0={:.1}",
                i + 1,
                target_faces.len(),
                face.bbox.x0
            );
        }
        self.logger.timing("composite", elapsed_ms(start));

        let start = Instant::now();
        self.image_writer
            .write(output_path, &working)
            .map_err(|e| SwapError::Write {
                path: output_path.to_path_buf(),
                source: sendable(e),
            })?;
        self.logger.timing("write", elapsed_ms(start));

        self.logger.info(&format!(
            "Swapped {} face(s) into {}",
            target_faces.len(),
            output_path.display()
        ));
        self.logger.summary();

        Ok(SwapResult {
            output_image: working,
            output_path: output_path.to_path_buf(),
            faces_swapped: target_faces.len(),
        })
    }
}

/// Sorts faces by ascending `x0`; equal `x0` keeps detector order.
pub fn order_left_to_right(mut faces: Vec<Face>) -> Vec<Face> {
    faces.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));
    faces
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
