// filepath: src/font.rs
//! System font lookup and text measurement.
//!
//! Families are matched against `.ttf`/`.otf` file names under the usual
//! font directories. A miss falls back to a common sans-serif instead of
//! failing, since programs ask for fonts many machines do not have.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use fontdue::{Font, FontSettings};
use log::{debug, warn};

use crate::error::CanvasError;

/// Handle to a font loaded by the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FontId(pub(crate) usize);

/// Families tried, in order, when the requested one is missing.
const FALLBACK_FAMILIES: &[&str] = &[
    "dejavusans",
    "liberationsans",
    "notosans",
    "freesans",
    "cantarell",
    "ubuntu",
    "arial",
];

/// Loads system fonts on demand and caches them by family.
pub struct FontStore {
    fonts: Vec<Font>,
    by_key: HashMap<String, FontId>,
    /// Scan results, filled the first time a lookup needs them.
    files: Option<Vec<PathBuf>>,
    fallback: Option<FontId>,
}

impl Default for FontStore {
    fn default() -> FontStore {
        FontStore::new()
    }
}

impl FontStore {
    pub fn new() -> FontStore {
        FontStore {
            fonts: Vec::new(),
            by_key: HashMap::new(),
            files: None,
            fallback: None,
        }
    }

    /// Finds a font for `family`, or any usable font when `family` is
    /// `None` or not installed.
    pub(crate) fn resolve(&mut self, family: Option<&str>) -> Result<FontId, CanvasError> {
        if let Some(family) = family {
            let key = normalize(family);
            if let Some(&id) = self.by_key.get(&key) {
                return Ok(id);
            }
            if let Some(id) = self.load_matching(&key) {
                self.by_key.insert(key, id);
                return Ok(id);
            }
            warn!("font `{family}` not found, falling back to a system font");
        }
        self.fallback(family)
    }

    fn fallback(&mut self, requested: Option<&str>) -> Result<FontId, CanvasError> {
        if let Some(id) = self.fallback {
            return Ok(id);
        }
        for key in FALLBACK_FAMILIES {
            if let Some(id) = self.load_matching(key) {
                self.fallback = Some(id);
                return Ok(id);
            }
        }
        // Last resort: the first file that parses at all.
        let files = self.scanned_files().to_vec();
        for path in &files {
            if let Some(id) = self.load_file(path) {
                self.fallback = Some(id);
                return Ok(id);
            }
        }
        Err(CanvasError::FontUnavailable {
            family: requested.unwrap_or("sans-serif").to_string(),
        })
    }

    fn load_matching(&mut self, key: &str) -> Option<FontId> {
        let files = self.scanned_files();
        let path = best_match(files, key)?.to_path_buf();
        self.load_file(&path)
    }

    fn load_file(&mut self, path: &Path) -> Option<FontId> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) => {
                debug!("skipping unreadable font {}: {err}", path.display());
                return None;
            }
        };
        match Font::from_bytes(bytes, FontSettings::default()) {
            Ok(font) => {
                let id = FontId(self.fonts.len());
                debug!("loaded font {}", path.display());
                self.fonts.push(font);
                Some(id)
            }
            Err(err) => {
                debug!("skipping unparseable font {}: {err}", path.display());
                None
            }
        }
    }

    fn scanned_files(&mut self) -> &[PathBuf] {
        if self.files.is_none() {
            let mut files = Vec::new();
            for dir in font_dirs() {
                collect_fonts(&dir, 0, &mut files);
            }
            files.sort();
            debug!("found {} font files", files.len());
            self.files = Some(files);
        }
        self.files.as_deref().unwrap_or(&[])
    }

    pub(crate) fn font(&self, id: FontId) -> &Font {
        &self.fonts[id.0]
    }

    /// Width and height, in pixels, of `text` at the given size.
    pub(crate) fn measure(&self, id: FontId, size: f32, text: &str) -> (f64, f64) {
        let font = self.font(id);
        let width: f32 = text
            .chars()
            .map(|c| font.metrics(c, size).advance_width)
            .sum();
        let height = font
            .horizontal_line_metrics(size)
            .map(|m| m.ascent - m.descent)
            .unwrap_or(size);
        (f64::from(width), f64::from(height))
    }
}

fn font_dirs() -> Vec<PathBuf> {
    let mut roots = vec![
        PathBuf::from("/usr/share/fonts"),
        PathBuf::from("/usr/local/share/fonts"),
    ];
    if let Some(dir) = dirs::font_dir() {
        roots.push(dir);
    }
    if let Some(home) = dirs::home_dir() {
        roots.push(home.join(".fonts"));
    }
    roots
}

fn collect_fonts(dir: &Path, depth: usize, out: &mut Vec<PathBuf>) {
    // Distro font trees nest a couple of levels (truetype/dejavu/...).
    if depth > 4 {
        return;
    }
    let Ok(entries) = fs::read_dir(dir) else { return };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_fonts(&path, depth + 1, out);
        } else if is_font_file(&path) {
            out.push(path);
        }
    }
}

fn is_font_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some(ext) if ext.eq_ignore_ascii_case("ttf") || ext.eq_ignore_ascii_case("otf")
    )
}

/// The file whose name best matches a normalized family name: an exact
/// stem first, then a stem extending the name ("DejaVuSans-Bold"), then
/// any stem containing it.
fn best_match<'a>(files: &'a [PathBuf], key: &str) -> Option<&'a PathBuf> {
    let stem = |p: &PathBuf| {
        p.file_stem()
            .and_then(|s| s.to_str())
            .map(normalize)
            .unwrap_or_default()
    };
    files
        .iter()
        .find(|p| stem(p) == key)
        .or_else(|| files.iter().find(|p| stem(p).starts_with(key)))
        .or_else(|| files.iter().find(|p| stem(p).contains(key)))
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
