use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use rayon::prelude::*;

use crate::config::model::Configuration;
use crate::encode::saver::ImageSaver;
use crate::fonts::loader::FontLoader;
use crate::foundation::error::{LowerThirdError, LowerThirdResult};
use crate::render::builder::LowerThirdBuilder;
use crate::scene::row::RowData;
use crate::text::engine::TextEngine;

const MAX_POOLED_ENGINES: usize = 16;

/// Reusable text engines; font registration is the expensive part of a fresh one.
#[derive(Default)]
struct EnginePool {
    engines: Mutex<Vec<TextEngine>>,
}

impl EnginePool {
    fn acquire(&self) -> TextEngine {
        self.engines
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop()
            .unwrap_or_default()
    }

    fn release(&self, engine: TextEngine) {
        let mut engines = self.engines.lock().unwrap_or_else(|e| e.into_inner());
        if engines.len() < MAX_POOLED_ENGINES {
            engines.push(engine);
        }
    }
}

/// Outcome of one batch run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Written files, in row order.
    pub generated: Vec<PathBuf>,
    /// Rows left alone because their output already existed.
    pub skipped: Vec<PathBuf>,
    /// Number of rows that failed.
    pub failed: usize,
    /// `(row index, error message)` per failure.
    pub failures: Vec<(usize, String)>,
}

enum RowOutcome {
    Generated(PathBuf),
    Skipped(PathBuf),
    Failed(String),
}

/// Renders rows under one validated configuration.
///
/// Holds no per-row state and is safe to share across threads.
pub struct LowerThirdGenerator {
    config: Configuration,
    fonts: Arc<FontLoader>,
    engines: EnginePool,
}

impl std::fmt::Debug for LowerThirdGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LowerThirdGenerator")
            .field("width", &self.config.width)
            .field("height", &self.config.height)
            .finish_non_exhaustive()
    }
}

impl LowerThirdGenerator {
    /// Generator using the system font directories.
    pub fn new(config: Configuration) -> Self {
        Self::with_loader(config, Arc::new(FontLoader::system()))
    }

    /// Generator sharing an existing font loader.
    pub fn with_loader(config: Configuration, fonts: Arc<FontLoader>) -> Self {
        Self {
            config,
            fonts,
            engines: EnginePool::default(),
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Font loader in use.
    pub fn fonts(&self) -> &Arc<FontLoader> {
        &self.fonts
    }

    /// Render one row. Any failure is reported as [`LowerThirdError::ImageGeneration`]
    /// naming the row's main text.
    #[tracing::instrument(skip(self, row), fields(main_text = %row.main_text))]
    pub fn generate_from_row(&self, row: &RowData) -> LowerThirdResult<image::RgbaImage> {
        let mut engine = self.engines.acquire();
        let result = LowerThirdBuilder::new(&self.config, row, &self.fonts, &mut engine).run();
        self.engines.release(engine);
        result.map_err(|e| wrap_row_error(row, e))
    }

    /// Same as [`LowerThirdGenerator::generate_from_row`]; kept for preview callers.
    pub fn generate_preview(&self, row: &RowData) -> LowerThirdResult<image::RgbaImage> {
        self.generate_from_row(row)
    }

    /// Render and save `rows` into `dir` in parallel.
    ///
    /// Rows whose output exists are skipped when `skip_existing` is set. When several rows
    /// name the same output file, the first one writes it and the others fail. A failing row
    /// is logged and counted; it never aborts the rest of the batch.
    pub fn generate_batch(&self, rows: &[RowData], saver: &ImageSaver, dir: &Path) -> BatchReport {
        let targets = claim_outputs(rows, saver, dir);
        let outcomes: Vec<RowOutcome> = rows
            .par_iter()
            .zip(targets.par_iter())
            .enumerate()
            .map(|(i, (row, target))| {
                let OutputTarget { stem, path, owner } = target;
                if let Some(owner) = owner {
                    tracing::warn!(row = i, owner, path = %path.display(), "duplicate output name");
                    return RowOutcome::Failed(format!(
                        "output '{}' is already produced by row {owner}",
                        path.display()
                    ));
                }
                if saver.should_skip(path) {
                    tracing::info!(path = %path.display(), "output exists, skipping");
                    return RowOutcome::Skipped(path.clone());
                }
                match self
                    .generate_from_row(row)
                    .and_then(|img| saver.save(&img, dir, stem))
                {
                    Ok(path) => {
                        tracing::info!(row = i, path = %path.display(), "generated");
                        RowOutcome::Generated(path)
                    }
                    Err(e) => {
                        tracing::error!(row = i, error = %e, "row failed");
                        RowOutcome::Failed(e.to_string())
                    }
                }
            })
            .collect();

        let mut report = BatchReport::default();
        for (i, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                RowOutcome::Generated(p) => report.generated.push(p),
                RowOutcome::Skipped(p) => report.skipped.push(p),
                RowOutcome::Failed(msg) => {
                    report.failed += 1;
                    report.failures.push((i, msg));
                }
            }
        }
        tracing::info!(
            generated = report.generated.len(),
            skipped = report.skipped.len(),
            failed = report.failed,
            "batch finished"
        );
        report
    }
}

struct OutputTarget {
    stem: String,
    path: PathBuf,
    /// Earlier row that already claimed `path`.
    owner: Option<usize>,
}

/// Resolve every row's output path in row order so collisions are decided deterministically.
fn claim_outputs(rows: &[RowData], saver: &ImageSaver, dir: &Path) -> Vec<OutputTarget> {
    let mut claimed: HashMap<PathBuf, usize> = HashMap::with_capacity(rows.len());
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let stem = row
                .output_stem()
                .unwrap_or_else(|| format!("lower_third_{}", i + 1));
            let path = saver.output_path(dir, &stem);
            let first = *claimed.entry(path.clone()).or_insert(i);
            OutputTarget {
                stem,
                path,
                owner: (first != i).then_some(first),
            }
        })
        .collect()
}

fn wrap_row_error(row: &RowData, err: LowerThirdError) -> LowerThirdError {
    let stage = match &err {
        LowerThirdError::ImageGeneration { stage, .. } => stage.clone(),
        _ => None,
    };
    LowerThirdError::ImageGeneration {
        message: format!("failed to generate lower third for '{}'", row.main_text),
        stage,
        details: Some(err.to_string()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/generator.rs"]
mod tests;
