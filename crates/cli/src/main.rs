mod settings;

use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use faceswap_core::detection::domain::face_detector::FaceDetector;
use faceswap_core::detection::infrastructure::onnx_yolo_detector::OnnxYoloDetector;
use faceswap_core::imaging::domain::image_writer::ImageWriter;
use faceswap_core::imaging::infrastructure::image_file_reader::ImageFileReader;
use faceswap_core::imaging::infrastructure::image_file_writer::ImageFileWriter;
use faceswap_core::pipeline::infrastructure::swap_worker;
use faceswap_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use faceswap_core::pipeline::swap_faces_use_case::SwapFacesUseCase;
use faceswap_core::pipeline::swap_session::SwapSession;
use faceswap_core::shared::constants::{IMAGE_EXTENSIONS, YOLO_MODEL_NAME, YOLO_MODEL_URL};
use faceswap_core::shared::model_resolver;
use faceswap_core::swapping::infrastructure::patch_compositor::PatchCompositor;
use faceswap_core::viewport::renderer::{CanvasRenderer, Renderer};
use faceswap_core::viewport::viewport_controller::{
    ViewportController, ViewportLimits, ViewportResponse,
};
use faceswap_core::viewport::viewport_transform::Point;

use settings::Settings;

/// Swap the left-most face of SOURCE into every face of TARGET.
#[derive(Parser)]
#[command(name = "faceswap")]
struct Cli {
    /// Image whose faces are replaced.
    target: PathBuf,

    /// Image supplying the replacement face.
    source: PathBuf,

    /// Directory generated images are written to.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Output image extension (png, jpg, ...).
    #[arg(long)]
    extension: Option<String>,

    /// Face detection confidence threshold (0.0-1.0).
    #[arg(long)]
    confidence: Option<f64>,

    /// Directory searched for a bundled detection model before downloading.
    #[arg(long)]
    model_dir: Option<PathBuf>,

    /// Also save the full-resolution result to this path.
    #[arg(long)]
    save_as: Option<PathBuf>,

    /// Render the result viewport to this PNG.
    #[arg(long)]
    preview: Option<PathBuf>,

    /// Preview canvas size, e.g. 800x500.
    #[arg(long, value_parser = parse_canvas)]
    canvas: Option<(u32, u32)>,

    /// Zoom-in steps applied to the preview.
    #[arg(long, default_value = "0")]
    zoom_in: u32,

    /// Zoom-out steps applied to the preview.
    #[arg(long, default_value = "0")]
    zoom_out: u32,

    /// Zoom anchor on the canvas, e.g. 300,200 (default: canvas center).
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    cursor: Option<Point>,

    /// Drag the zoomed preview by DX,DY canvas pixels.
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    pan: Option<Point>,

    /// Persist output dir, extension, confidence and canvas as new defaults.
    #[arg(long)]
    save_settings: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let settings = merge_settings(Settings::load(), &cli);
    validate(&cli, &settings)?;

    if cli.save_settings {
        let path = settings.save()?;
        log::info!("Settings saved to {}", path.display());
    }

    let detector = build_detector(&cli, settings.confidence)?;
    let use_case = SwapFacesUseCase::new(
        Box::new(ImageFileReader::new()),
        detector,
        Box::new(PatchCompositor::default()),
        Box::new(ImageFileWriter::new()),
    )
    .with_logger(Box::new(StdoutPipelineLogger::new()));

    let mut session = SwapSession::new(
        settings.output_dir.clone(),
        &settings.extension,
        ViewportController::new(settings.canvas_size(), ViewportLimits::default()),
    );
    session.select_target(cli.target.clone())?;
    session.select_source(cli.source.clone())?;

    let request = session.start_swap()?;
    eprintln!("Swapping faces...");
    let outcome = swap_worker::spawn(use_case, request).wait();
    let result = session.finish_swap(outcome.into_result())?;
    println!(
        "Swapped {} face(s): {}",
        result.faces_swapped,
        result.output_path.display()
    );

    let writer = ImageFileWriter::new();
    if let Some(path) = &cli.save_as {
        session.save_result(&writer, path)?;
        println!("Saved copy: {}", path.display());
    }
    if let Some(path) = &cli.preview {
        render_preview(&mut session, &cli, &writer, path)?;
        println!("Preview: {}", path.display());
    }

    Ok(())
}

/// Replays the requested zoom and pan on the result viewport, then renders it.
fn render_preview(
    session: &mut SwapSession,
    cli: &Cli,
    writer: &dyn ImageWriter,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let viewport = session.viewport_mut();
    let (cw, ch) = viewport.state().canvas_size;
    let cursor = cli
        .cursor
        .unwrap_or(Point::new(cw as f64 / 2.0, ch as f64 / 2.0));

    for _ in 0..cli.zoom_in {
        viewport.on_zoom(cursor, 1.0, true);
    }
    for _ in 0..cli.zoom_out {
        viewport.on_zoom(cursor, -1.0, true);
    }

    if let Some(delta) = cli.pan {
        if viewport.on_pan_start(cursor) == ViewportResponse::Ignored {
            log::warn!(
                "Pan ignored: the preview is not zoomed in (zoom {:.2})",
                viewport.zoom()
            );
        } else {
            viewport.on_pan_move(cursor + delta);
            viewport.on_pan_end();
        }
    }

    log::info!(
        "Preview zoom {:.3}, offset ({:.1}, {:.1})",
        viewport.zoom(),
        viewport.offset().x,
        viewport.offset().y
    );
    let canvas = CanvasRenderer::default().render(viewport.state());
    writer.write(path, &canvas)
}

fn build_detector(
    cli: &Cli,
    confidence: f64,
) -> Result<Box<dyn FaceDetector>, Box<dyn std::error::Error>> {
    log::info!("Resolving model: {YOLO_MODEL_NAME}");
    let model_path = model_resolver::resolve(
        YOLO_MODEL_NAME,
        YOLO_MODEL_URL,
        cli.model_dir.as_deref(),
        Some(Box::new(download_progress)),
    )?;
    eprintln!();

    Ok(Box::new(OnnxYoloDetector::new(&model_path, confidence)?))
}

fn merge_settings(mut settings: Settings, cli: &Cli) -> Settings {
    if let Some(dir) = &cli.output_dir {
        settings.output_dir = dir.clone();
    }
    if let Some(ext) = &cli.extension {
        settings.extension = ext.trim_start_matches('.').to_string();
    }
    if let Some(confidence) = cli.confidence {
        settings.confidence = confidence;
    }
    if let Some((w, h)) = cli.canvas {
        settings.canvas_width = w;
        settings.canvas_height = h;
    }
    settings
}

fn validate(cli: &Cli, settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    for (label, path) in [("Target", &cli.target), ("Source", &cli.source)] {
        if !path.exists() {
            return Err(format!("{label} image not found: {}", path.display()).into());
        }
        if !is_image(path) {
            return Err(format!("{label} is not a supported image: {}", path.display()).into());
        }
    }
    if !IMAGE_EXTENSIONS.contains(&settings.extension.to_lowercase().as_str()) {
        return Err(format!(
            "Extension must be one of {}, got '{}'",
            IMAGE_EXTENSIONS.join(", "),
            settings.extension
        )
        .into());
    }
    if !(0.0..=1.0).contains(&settings.confidence) {
        return Err(format!(
            "Confidence must be between 0.0 and 1.0, got {}",
            settings.confidence
        )
        .into());
    }
    if settings.canvas_width == 0 || settings.canvas_height == 0 {
        return Err(format!(
            "Canvas must be non-empty, got {}x{}",
            settings.canvas_width, settings.canvas_height
        )
        .into());
    }
    if cli.preview.is_none()
        && (cli.zoom_in > 0 || cli.zoom_out > 0 || cli.cursor.is_some() || cli.pan.is_some())
    {
        return Err("--zoom-in, --zoom-out, --cursor and --pan require --preview".into());
    }
    Ok(())
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn parse_canvas(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let w = w.trim().parse().map_err(|_| format!("bad width in '{s}'"))?;
    let h = h.trim().parse().map_err(|_| format!("bad height in '{s}'"))?;
    Ok((w, h))
}

fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{s}'"))?;
    let x = x.trim().parse().map_err(|_| format!("bad x in '{s}'"))?;
    let y = y.trim().parse().map_err(|_| format!("bad y in '{s}'"))?;
    Ok(Point::new(x, y))
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading face detection model... {pct}%");
    } else {
        eprint!("\rDownloading face detection model... {downloaded} bytes");
    }
}
