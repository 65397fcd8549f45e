use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use faceswap_core::detection::infrastructure::onnx_yolo_detector::DEFAULT_CONFIDENCE;
use faceswap_core::shared::constants::{
    DEFAULT_CANVAS_SIZE, DEFAULT_OUTPUT_DIR, DEFAULT_OUTPUT_EXTENSION,
};

/// Persisted defaults; command-line flags override each field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub output_dir: PathBuf,
    pub extension: String,
    pub confidence: f64,
    pub canvas_width: u32,
    pub canvas_height: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            extension: DEFAULT_OUTPUT_EXTENSION.to_string(),
            confidence: DEFAULT_CONFIDENCE,
            canvas_width: DEFAULT_CANVAS_SIZE.0,
            canvas_height: DEFAULT_CANVAS_SIZE.1,
        }
    }
}

impl Settings {
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("FaceSwap").join("settings.json"))
    }

    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Missing or unreadable files yield the defaults.
    pub fn load_from(path: &Path) -> Self {
        fs::read_to_string(path)
            .ok()
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }

    pub fn save(&self) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let path = Self::config_path().ok_or("could not determine config directory")?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn canvas_size(&self) -> (u32, u32) {
        (self.canvas_width, self.canvas_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.output_dir, PathBuf::from("images/generated"));
        assert_eq!(s.extension, "png");
        assert_eq!(s.confidence, 0.5);
        assert_eq!(s.canvas_size(), (800, 500));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = Settings {
            output_dir: PathBuf::from("/tmp/swaps"),
            extension: "jpg".to_string(),
            confidence: 0.7,
            canvas_width: 1024,
            canvas_height: 768,
        };

        settings.save_to(&path).unwrap();

        assert_eq!(Settings::load_from(&path), settings);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            Settings::load_from(&dir.path().join("absent.json")),
            Settings::default()
        );
    }

    #[test]
    fn test_corrupt_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn test_partial_file_fills_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "extension": "webp" }"#).unwrap();

        let s = Settings::load_from(&path);

        assert_eq!(s.extension, "webp");
        assert_eq!(s.canvas_size(), (800, 500));
    }
}
