use std::path::{Path, PathBuf};

use faceswap_core::detection::domain::face::{BoundingBox, Face, FaceDescriptor};
use faceswap_core::detection::domain::face_detector::FaceDetector;
use faceswap_core::detection::domain::face_patch::{crop_face, FacePatch};
use faceswap_core::imaging::domain::image_reader::ImageReader;
use faceswap_core::imaging::infrastructure::image_file_reader::ImageFileReader;
use faceswap_core::imaging::infrastructure::image_file_writer::ImageFileWriter;
use faceswap_core::pipeline::infrastructure::swap_worker::{self, SwapOutcome};
use faceswap_core::pipeline::swap_error::{FaceRole, SwapError};
use faceswap_core::pipeline::swap_faces_use_case::SwapFacesUseCase;
use faceswap_core::pipeline::swap_session::SwapSession;
use faceswap_core::shared::frame::Frame;
use faceswap_core::swapping::infrastructure::patch_compositor::PatchCompositor;
use faceswap_core::viewport::renderer::{CanvasRenderer, Renderer};
use faceswap_core::viewport::viewport_controller::{ViewportController, ViewportLimits};
use faceswap_core::viewport::viewport_transform::Point;

const GRAY: [u8; 3] = [128, 128, 128];
const RED: [u8; 3] = [220, 30, 30];

/// Treats every square of non-white pixels on a 10 px grid as a face.
struct GridDetector;

impl FaceDetector for GridDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Face>, Box<dyn std::error::Error>> {
        let arr = frame.as_ndarray();
        let mut faces = Vec::new();
        let mut x = 0;
        while x < frame.width() as usize {
            let mut y = 0;
            while y < frame.height() as usize {
                let is_face = arr[[y, x, 0]] != 255 && !faces.iter().any(|f: &Face| {
                    f.bbox.x0 as usize <= x
                        && x < f.bbox.x1 as usize
                        && f.bbox.y0 as usize <= y
                        && y < f.bbox.y1 as usize
                });
                if is_face {
                    let bbox = square_at(frame, x, y);
                    let pixels = crop_face(frame, &bbox).ok_or("empty crop")?;
                    faces.push(Face::new(
                        bbox,
                        FaceDescriptor::new(FacePatch {
                            pixels,
                            landmarks: None,
                        }),
                    ));
                }
                y += 10;
            }
            x += 10;
        }
        // Right-to-left, to prove the pipeline orders faces itself.
        faces.reverse();
        Ok(faces)
    }
}

fn square_at(frame: &Frame, x: usize, y: usize) -> BoundingBox {
    let arr = frame.as_ndarray();
    let mut x1 = x;
    while x1 < frame.width() as usize && arr[[y, x1, 0]] != 255 {
        x1 += 1;
    }
    let mut y1 = y;
    while y1 < frame.height() as usize && arr[[y1, x, 0]] != 255 {
        y1 += 1;
    }
    BoundingBox::new(x as f64, y as f64, x1 as f64, y1 as f64)
}

fn write_png(path: &Path, width: u32, height: u32, squares: &[(u32, u32, u32, [u8; 3])]) {
    let mut img = image::RgbImage::from_pixel(width, height, image::Rgb([255, 255, 255]));
    for &(x0, y0, size, color) in squares {
        for y in y0..y0 + size {
            for x in x0..x0 + size {
                img.put_pixel(x, y, image::Rgb(color));
            }
        }
    }
    img.save(path).unwrap();
}

fn use_case() -> SwapFacesUseCase {
    SwapFacesUseCase::new(
        Box::new(ImageFileReader::new()),
        Box::new(GridDetector),
        Box::new(PatchCompositor::default()),
        Box::new(ImageFileWriter::new()),
    )
}

fn session(output_dir: PathBuf) -> SwapSession {
    SwapSession::new(
        output_dir,
        "png",
        ViewportController::new((240, 120), ViewportLimits::default()),
    )
}

fn pixel(frame: &Frame, x: usize, y: usize) -> [u8; 3] {
    let arr = frame.as_ndarray();
    [arr[[y, x, 0]], arr[[y, x, 1]], arr[[y, x, 2]]]
}

fn close_to(got: [u8; 3], want: [u8; 3]) -> bool {
    got.iter().zip(want).all(|(g, w)| g.abs_diff(w) <= 2)
}

#[test]
fn swap_two_faces_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("group.png");
    let source = dir.path().join("portrait.png");
    write_png(&target, 120, 60, &[(10, 10, 40, GRAY), (70, 10, 40, GRAY)]);
    write_png(&source, 40, 40, &[(0, 0, 40, RED)]);

    let out_dir = dir.path().join("generated");
    let mut session = session(out_dir.clone());
    session.select_target(target).unwrap();
    session.select_source(source).unwrap();
    assert!(session.can_swap());

    let request = session.start_swap().unwrap();
    let handle = swap_worker::spawn(use_case(), request);
    let outcome = handle.wait();
    assert!(matches!(outcome, SwapOutcome::Complete(_)));

    let result = session.finish_swap(outcome.into_result()).unwrap();
    assert_eq!(result.faces_swapped, 2);

    let expected_path = out_dir.join("swap_group_con_portrait.png");
    assert_eq!(result.output_path, expected_path);
    assert!(expected_path.exists());

    let written = ImageFileReader::new().read(&expected_path).unwrap();
    assert_eq!(written.dimensions(), (120, 60));
    assert!(close_to(pixel(&written, 30, 30), RED));
    assert!(close_to(pixel(&written, 90, 30), RED));
    assert_eq!(pixel(&written, 60, 5), [255, 255, 255]);

    // 120x60 fits a 240x120 canvas at 2x.
    let base = session.viewport().state().base_image.clone().unwrap();
    assert_eq!(base.dimensions(), (240, 120));
}

#[test]
fn faceless_source_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("group.png");
    let source = dir.path().join("landscape.png");
    write_png(&target, 60, 60, &[(10, 10, 40, GRAY)]);
    write_png(&source, 40, 40, &[]);

    let out_dir = dir.path().join("generated");
    let mut session = session(out_dir.clone());
    session.select_target(target).unwrap();
    session.select_source(source).unwrap();

    let request = session.start_swap().unwrap();
    let outcome = swap_worker::spawn(use_case(), request).wait();
    let err = session.finish_swap(outcome.into_result()).unwrap_err();

    assert!(matches!(
        err,
        SwapError::NoFaceDetected {
            which: FaceRole::Source
        }
    ));
    assert!(!out_dir.join("swap_group_con_landscape.png").exists());
    assert!(session.result().is_none());
    assert!(session.can_swap());
}

#[test]
fn missing_target_is_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("portrait.png");
    write_png(&source, 40, 40, &[(0, 0, 40, RED)]);

    let mut session = session(dir.path().join("generated"));
    session
        .select_target(dir.path().join("missing.png"))
        .unwrap();
    session.select_source(source).unwrap();

    let request = session.start_swap().unwrap();
    let outcome = swap_worker::spawn(use_case(), request).wait();

    match session.finish_swap(outcome.into_result()) {
        Err(SwapError::Decode { path, .. }) => assert!(path.ends_with("missing.png")),
        other => panic!("expected a decode error, got {other:?}"),
    }
}

#[test]
fn save_as_and_zoomed_preview() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("solo.png");
    let source = dir.path().join("portrait.png");
    write_png(&target, 60, 30, &[(20, 0, 20, GRAY)]);
    write_png(&source, 20, 20, &[(0, 0, 20, RED)]);

    let mut session = session(dir.path().join("generated"));
    session.select_target(target).unwrap();
    session.select_source(source).unwrap();
    let request = session.start_swap().unwrap();
    let outcome = swap_worker::spawn(use_case(), request).wait();
    session.finish_swap(outcome.into_result()).unwrap();

    let copy = dir.path().join("exports").join("copy.png");
    session.save_result(&ImageFileWriter::new(), &copy).unwrap();
    let saved = ImageFileReader::new().read(&copy).unwrap();
    assert_eq!(saved.dimensions(), (60, 30));

    // Zoom at the canvas center: the center pixel stays the face.
    let viewport = session.viewport_mut();
    viewport.on_zoom(Point::new(120.0, 60.0), 1.0, true);
    viewport.on_zoom(Point::new(120.0, 60.0), 1.0, true);
    let canvas = CanvasRenderer::default().render(viewport.state());
    assert_eq!(canvas.dimensions(), (240, 120));
    assert!(close_to(pixel(&canvas, 120, 60), RED));
}
