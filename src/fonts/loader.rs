use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use anyhow::Context as _;

use crate::fonts::discovery::FontDiscovery;
use crate::foundation::error::{LowerThirdError, LowerThirdResult};

/// Pixel size used when the built-in fallback font has to stand in; it ignores requests.
pub const BUILTIN_FONT_SIZE: u32 = 11;

/// Where a loaded font's outlines come from.
#[derive(Clone, Debug)]
pub enum FontSource {
    /// A font file read from disk.
    File {
        /// Resolved file path.
        path: PathBuf,
        /// Raw font bytes, shared across sizes.
        data: Arc<Vec<u8>>,
        /// Face index inside a collection file.
        index: u32,
        /// OS/2 weight class of the face.
        weight: u16,
        /// Whether the face is italic or oblique.
        italic: bool,
    },
    /// The generic sans-serif face provided by the text engine.
    Builtin,
}

/// A font resolved to concrete outlines at a pixel size.
#[derive(Clone, Debug)]
pub struct LoadedFont {
    source: FontSource,
    size: u32,
}

impl LoadedFont {
    /// The built-in fallback at its fixed size.
    pub fn builtin() -> Self {
        Self {
            source: FontSource::Builtin,
            size: BUILTIN_FONT_SIZE,
        }
    }

    /// Where the outlines come from.
    pub fn source(&self) -> &FontSource {
        &self.source
    }

    /// Pixel size.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Font file path, if loaded from disk.
    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            FontSource::File { path, .. } => Some(path),
            FontSource::Builtin => None,
        }
    }

    /// Whether this is the built-in fallback.
    pub fn is_builtin(&self) -> bool {
        matches!(self.source, FontSource::Builtin)
    }
}

#[derive(Clone, Debug)]
struct FontFile {
    data: Arc<Vec<u8>>,
    weight: u16,
    italic: bool,
}

/// Resolves font specs (empty, `"random"`, a path, or a name) into [`LoadedFont`]s.
///
/// With `fallback_to_default` the chain degrades to the default system font and then to the
/// built-in face, logging a warning at each step. Font bytes are cached per path so repeated
/// rows and sizes only read and parse a file once.
#[derive(Debug)]
pub struct FontLoader {
    discovery: Arc<FontDiscovery>,
    files: RwLock<HashMap<PathBuf, FontFile>>,
}

impl FontLoader {
    /// Loader backed by the given discovery service.
    pub fn new(discovery: Arc<FontDiscovery>) -> Self {
        Self {
            discovery,
            files: RwLock::new(HashMap::new()),
        }
    }

    /// Loader over the process-wide system font discovery.
    pub fn system() -> Self {
        Self::new(FontDiscovery::system())
    }

    /// Discovery service used for name lookups.
    pub fn discovery(&self) -> &Arc<FontDiscovery> {
        &self.discovery
    }

    /// Resolve `spec` at `size` pixels.
    pub fn load_font(
        &self,
        spec: Option<&str>,
        size: u32,
        fallback_to_default: bool,
    ) -> LowerThirdResult<Arc<LoadedFont>> {
        let spec = spec.map(str::trim).filter(|s| !s.is_empty());
        let Some(spec) = spec else {
            tracing::debug!(size, "no font specified, using default");
            return self.load_default(size, fallback_to_default);
        };

        if spec.eq_ignore_ascii_case("random") {
            return self.load_random(size, fallback_to_default);
        }

        let mut attempted = Vec::new();
        let direct = Path::new(spec);
        if direct.is_file() {
            attempted.push(direct.display().to_string());
            match self.load_path(direct, size) {
                Ok(f) => {
                    tracing::info!(path = %direct.display(), size, "loaded font from path");
                    return Ok(f);
                }
                Err(e) => tracing::warn!(path = %direct.display(), error = %e, "cannot load font from path"),
            }
        }

        if let Some(found) = self.discovery.find_font_by_name(spec) {
            attempted.push(found.display().to_string());
            match self.load_path(&found, size) {
                Ok(f) => {
                    tracing::info!(font = spec, path = %found.display(), size, "loaded font");
                    return Ok(f);
                }
                Err(e) => tracing::warn!(path = %found.display(), error = %e, "cannot load font"),
            }
        }

        tracing::warn!(font = spec, "font not found");
        if fallback_to_default {
            return self.load_default(size, true);
        }
        Err(LowerThirdError::font_load(Some(spec), attempted))
    }

    /// Load main and secondary fonts. A missing secondary spec reuses the main spec at the
    /// secondary size.
    pub fn load_font_pair(
        &self,
        main_spec: Option<&str>,
        secondary_spec: Option<&str>,
        main_size: u32,
        secondary_size: u32,
    ) -> LowerThirdResult<(Arc<LoadedFont>, Arc<LoadedFont>)> {
        let main = self.load_font(main_spec, main_size, true)?;
        let secondary_spec = secondary_spec.filter(|s| !s.trim().is_empty()).or(main_spec);
        let secondary = self.load_font(secondary_spec, secondary_size, true)?;
        Ok((main, secondary))
    }

    /// Number of distinct font files held in the byte cache.
    pub fn cached_files(&self) -> usize {
        self.files.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn load_random(&self, size: u32, fallback: bool) -> LowerThirdResult<Arc<LoadedFont>> {
        if let Some(path) = self.discovery.random_font() {
            match self.load_path(&path, size) {
                Ok(f) => return Ok(f),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "cannot load random font"),
            }
        }
        if fallback {
            return self.load_default(size, true);
        }
        Err(LowerThirdError::font_load(Some("random"), Vec::new()))
    }

    fn load_default(&self, size: u32, fallback: bool) -> LowerThirdResult<Arc<LoadedFont>> {
        if let Some(path) = self.discovery.default_font() {
            match self.load_path(&path, size) {
                Ok(f) => {
                    tracing::info!(path = %path.display(), size, "loaded default font");
                    return Ok(f);
                }
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "cannot load default font"),
            }
        }
        if fallback {
            tracing::warn!("using built-in fallback font (size is fixed)");
            return Ok(Arc::new(LoadedFont::builtin()));
        }
        Err(LowerThirdError::font_load(
            None,
            self.discovery
                .default_candidates()
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
        ))
    }

    fn load_path(&self, path: &Path, size: u32) -> LowerThirdResult<Arc<LoadedFont>> {
        let file = self.read_font_file(path)?;
        Ok(Arc::new(LoadedFont {
            source: FontSource::File {
                path: path.to_path_buf(),
                data: file.data,
                index: 0,
                weight: file.weight,
                italic: file.italic,
            },
            size,
        }))
    }

    fn read_font_file(&self, path: &Path) -> LowerThirdResult<FontFile> {
        if let Some(hit) = self
            .files
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(path)
        {
            return Ok(hit.clone());
        }

        let bytes =
            std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
        let face = ttf_parser::Face::parse(&bytes, 0)
            .with_context(|| format!("parse font '{}'", path.display()))?;
        let weight = face.weight().to_number();
        let italic = face.is_italic() || face.is_oblique();

        let file = FontFile {
            data: Arc::new(bytes),
            weight,
            italic,
        };
        self.files
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .entry(path.to_path_buf())
            .or_insert_with(|| file.clone());
        Ok(file)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fonts/loader.rs"]
mod tests;
