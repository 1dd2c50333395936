use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, RwLock};

use rand::seq::SliceRandom;
use walkdir::WalkDir;

/// File extensions treated as font files (compared case-insensitively).
pub const FONT_EXTENSIONS: &[&str] = &["ttf", "otf", "ttc"];

const SYSTEM_FONT_DIRS: &[&str] = &[
    "/usr/share/fonts/",
    "/System/Library/Fonts/",
    r"C:\Windows\Fonts\",
    "~/.fonts/",
    "~/Library/Fonts/",
];

const DEFAULT_FONT_FILES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/System/Library/Fonts/Helvetica.ttc",
    r"C:\Windows\Fonts\arial.ttf",
];

type FontList = Arc<Vec<PathBuf>>;

/// Scans font directories once and answers name, random and default lookups.
///
/// The scan result is shared and read-only after the first call to
/// [`FontDiscovery::discover_fonts`]. Concurrent first callers block on an init lock so the
/// directories are walked at most once per cache generation.
#[derive(Debug)]
pub struct FontDiscovery {
    directories: Vec<PathBuf>,
    default_candidates: Vec<PathBuf>,
    cache: RwLock<Option<FontList>>,
    init: Mutex<()>,
}

impl FontDiscovery {
    /// Discovery over the platform's standard font directories, shared process-wide.
    pub fn system() -> Arc<Self> {
        static SYSTEM: OnceLock<Arc<FontDiscovery>> = OnceLock::new();
        SYSTEM
            .get_or_init(|| {
                Arc::new(Self::with_directories(
                    SYSTEM_FONT_DIRS.iter().map(|d| expand_home(d)).collect(),
                    DEFAULT_FONT_FILES.iter().map(PathBuf::from).collect(),
                ))
            })
            .clone()
    }

    /// Discovery over explicit directories and default-font candidates.
    pub fn with_directories(directories: Vec<PathBuf>, default_candidates: Vec<PathBuf>) -> Self {
        Self {
            directories,
            default_candidates,
            cache: RwLock::new(None),
            init: Mutex::new(()),
        }
    }

    /// Directories this instance scans.
    pub fn directories(&self) -> &[PathBuf] {
        &self.directories
    }

    /// Default-font candidates, in preference order.
    pub fn default_candidates(&self) -> &[PathBuf] {
        &self.default_candidates
    }

    /// All font files found under the configured directories, scanning on first use.
    pub fn discover_fonts(&self) -> FontList {
        if let Some(fonts) = self.cached() {
            return fonts;
        }

        let _guard = self.init.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(fonts) = self.cached() {
            return fonts;
        }

        tracing::info!("discovering system fonts");
        let fonts: FontList = Arc::new(
            self.directories
                .iter()
                .flat_map(|dir| scan_directory(dir))
                .collect(),
        );
        tracing::info!(count = fonts.len(), "discovered fonts");

        *self.cache.write().unwrap_or_else(|e| e.into_inner()) = Some(fonts.clone());
        fonts
    }

    /// Find a font by name: exact case-insensitive file stem first, then substring of the
    /// file name.
    pub fn find_font_by_name(&self, name: &str) -> Option<PathBuf> {
        let fonts = self.discover_fonts();
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }

        let exact = fonts.iter().find(|p| {
            p.file_stem()
                .map(|s| s.to_string_lossy().to_lowercase() == needle)
                .unwrap_or(false)
        });
        if let Some(p) = exact {
            tracing::debug!(font = %p.display(), "exact font match");
            return Some(p.clone());
        }

        let partial = fonts.iter().find(|p| {
            p.file_name()
                .map(|s| s.to_string_lossy().to_lowercase().contains(&needle))
                .unwrap_or(false)
        });
        match partial {
            Some(p) => {
                tracing::debug!(font = %p.display(), "substring font match");
                Some(p.clone())
            }
            None => {
                tracing::debug!(name, "font not found");
                None
            }
        }
    }

    /// A uniformly random discovered font.
    pub fn random_font(&self) -> Option<PathBuf> {
        let fonts = self.discover_fonts();
        let picked = fonts.choose(&mut rand::thread_rng()).cloned();
        match &picked {
            Some(p) => tracing::info!(font = %p.display(), "randomly selected font"),
            None => tracing::warn!("no fonts available for random selection"),
        }
        picked
    }

    /// First existing default-font candidate.
    pub fn default_font(&self) -> Option<PathBuf> {
        let found = self
            .default_candidates
            .iter()
            .find(|p| p.is_file())
            .cloned();
        if found.is_none() {
            tracing::debug!("no default font found");
        }
        found
    }

    /// Drop the scan result so the next lookup rescans.
    pub fn clear_cache(&self) {
        let _guard = self.init.lock().unwrap_or_else(|e| e.into_inner());
        *self.cache.write().unwrap_or_else(|e| e.into_inner()) = None;
        tracing::debug!("font cache cleared");
    }

    fn cached(&self) -> Option<FontList> {
        self.cache
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .cloned()
    }
}

/// Whether `path` has a font file extension.
pub fn is_font_file(path: &Path) -> bool {
    path.extension()
        .map(|e| {
            let e = e.to_string_lossy().to_lowercase();
            FONT_EXTENSIONS.contains(&e.as_str())
        })
        .unwrap_or(false)
}

fn scan_directory(dir: &Path) -> Vec<PathBuf> {
    if !dir.is_dir() {
        return Vec::new();
    }
    tracing::debug!(dir = %dir.display(), "scanning font directory");

    let mut out = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
        match entry {
            Ok(e) if e.file_type().is_file() && is_font_file(e.path()) => {
                out.push(e.into_path());
            }
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(dir = %dir.display(), error = %err, "error scanning font directory");
            }
        }
    }
    out
}

fn expand_home(dir: &str) -> PathBuf {
    if let Some(rest) = dir.strip_prefix("~/") {
        let home = std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE"));
        if let Some(home) = home {
            return PathBuf::from(home).join(rest);
        }
    }
    PathBuf::from(dir)
}

#[cfg(test)]
#[path = "../../tests/unit/fonts/discovery.rs"]
mod tests;
