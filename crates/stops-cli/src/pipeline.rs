//! Normalization runs: load, normalize, merge, write.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use polars::prelude::DataFrame;
use serde::Serialize;
use tracing::{Level, info, info_span, trace, warn};

use stops_ingest::{
    DEFAULT_CHUNK_SIZE, LoadOptions, ReferenceDataset, StopChunkReader, StopFrameWriter,
};
use stops_model::columns::STATE_OFFICER_ID;
use stops_model::{NormalizationSummary, NormalizeOptions};
use stops_normalize::{StopBatch, StopSource};

use crate::logging::redact_value;

/// Everything one `normalize` run needs.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: PathBuf,
    pub chunk_size: usize,
    /// Read the input in chunks of `chunk_size` rows instead of all at once.
    pub stream: bool,
    pub reference: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub options: NormalizeOptions,
    pub show_progress: bool,
}

impl RunConfig {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            stream: false,
            reference: None,
            output: None,
            options: NormalizeOptions::default(),
            show_progress: false,
        }
    }

    #[must_use]
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    #[must_use]
    pub fn with_stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    #[must_use]
    pub fn with_reference(mut self, path: Option<PathBuf>) -> Self {
        self.reference = path;
        self
    }

    #[must_use]
    pub fn with_output(mut self, path: Option<PathBuf>) -> Self {
        self.output = path;
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: NormalizeOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }
}

/// Outcome of a run, printed as a table or serialized with `--json`.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub chunks: usize,
    pub columns: Vec<String>,
    pub reference_rows: Option<usize>,
    pub summary: NormalizationSummary,
}

/// Normalize `config.input` and optionally write the result as CSV.
pub fn run_normalize(config: &RunConfig) -> Result<RunReport> {
    let span = info_span!("normalize", input = %config.input.display());
    let _guard = span.enter();
    let start = Instant::now();

    let reference = open_reference(config.reference.as_deref())?;
    let reference_rows = reference.as_ref().and_then(reference_height);
    let source = StopSource::new(&config.input)
        .with_chunk_size(config.chunk_size)
        .with_reference(reference);

    let progress = progress_bar(config.show_progress);
    let mut run = RunState {
        output: config
            .output
            .as_deref()
            .map(StopFrameWriter::create)
            .transpose()
            .context("create output file")?,
        ..RunState::default()
    };

    if config.stream {
        let load_options = LoadOptions::default().with_chunk_size(config.chunk_size);
        let reader = StopChunkReader::new(&config.input, &load_options)
            .with_context(|| format!("open {}", config.input.display()))?;
        for chunk in reader {
            let chunk = chunk.with_context(|| format!("read chunk {}", run.chunks + 1))?;
            let mut batch = StopBatch::from_chunk(chunk, source.clone());
            batch
                .load(&config.options)
                .with_context(|| format!("normalize chunk {}", run.chunks + 1))?;
            run.absorb(&batch)?;
            progress.set_message(format!(
                "chunk {} ({} rows kept)",
                run.chunks, run.summary.output_rows
            ));
            info!(
                chunk = run.chunks,
                rows = run.summary.output_rows,
                "normalized chunk"
            );
        }
    } else {
        progress.set_message(format!("loading {}", config.input.display()));
        let mut batch = StopBatch::from_source(source);
        batch
            .load(&config.options)
            .with_context(|| format!("normalize {}", config.input.display()))?;
        run.absorb(&batch)?;
    }
    progress.finish_and_clear();

    if let Some(writer) = run.output.take() {
        let path = writer.path().to_path_buf();
        let rows = writer
            .finish()
            .with_context(|| format!("write {}", path.display()))?;
        info!(path = %path.display(), rows, "wrote normalized stops");
    }

    info!(
        input_rows = run.summary.input_rows,
        output_rows = run.summary.output_rows,
        chunks = run.chunks,
        duration_ms = start.elapsed().as_millis(),
        "normalization complete"
    );

    Ok(RunReport {
        input: config.input.clone(),
        output: config.output.clone(),
        chunks: run.chunks,
        columns: run.columns,
        reference_rows,
        summary: run.summary,
    })
}

/// Running totals. Normalized frames are written out and dropped, never kept.
#[derive(Default)]
struct RunState {
    chunks: usize,
    summary: NormalizationSummary,
    columns: Vec<String>,
    output: Option<StopFrameWriter>,
}

impl RunState {
    fn absorb(&mut self, batch: &StopBatch) -> Result<()> {
        if let Some(summary) = batch.summary() {
            self.summary.merge(summary);
        }
        self.chunks += 1;
        let Some(frame) = batch.frame() else {
            return Ok(());
        };
        if self.chunks == 1 {
            self.columns = frame
                .get_column_names()
                .into_iter()
                .map(|name| name.to_string())
                .collect();
        }
        if tracing::enabled!(Level::TRACE) {
            if let Some(key) = first_officer_key(frame) {
                trace!(chunk = self.chunks, key = redact_value(key), "first officer key");
            }
        }
        if let Some(writer) = &mut self.output {
            writer
                .write(frame)
                .with_context(|| format!("write chunk {}", self.chunks))?;
        }
        Ok(())
    }
}

fn first_officer_key(frame: &DataFrame) -> Option<&str> {
    let keys = frame.column(STATE_OFFICER_ID).ok()?.str().ok()?;
    keys.into_iter().flatten().find(|key| !key.is_empty())
}

fn open_reference(path: Option<&Path>) -> Result<Option<ReferenceDataset>> {
    path.map(|path| {
        ReferenceDataset::open(path)
            .with_context(|| format!("open reference dataset {}", path.display()))
    })
    .transpose()
}

/// Load the reference file once to report its size. A failure is logged, not fatal.
fn reference_height(reference: &ReferenceDataset) -> Option<usize> {
    match reference.load() {
        Ok(frame) => {
            info!(
                path = %reference.path().display(),
                rows = frame.height(),
                columns = frame.width(),
                "reference dataset available"
            );
            Some(frame.height())
        }
        Err(error) => {
            warn!(path = %reference.path().display(), %error, "reference dataset unreadable");
            None
        }
    }
}

fn progress_bar(show: bool) -> ProgressBar {
    if !show {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    bar.set_style(style);
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}
