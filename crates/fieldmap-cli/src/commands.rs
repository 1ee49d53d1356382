use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError};
use std::time::Duration;

use anyhow::{Context, Result};
use comfy_table::Table;
use serde::Deserialize;
use tracing::{info, info_span, trace, warn};

use fieldmap_ingest::read_source_file;
use fieldmap_map::{
    AzureChatRanker, DisposalPolicy, EditOutcome, InMemorySessionStore, MappingSession,
    MatchingEngine, RankerConfig, SessionStore,
};
use fieldmap_model::{MappingEdit, TargetPathRecord};
use fieldmap_report::package_artifacts;
use fieldmap_schema::load_targets;

use crate::cli::{InputArgs, MapArgs, PreviewArgs, TargetsArgs};
use crate::logging::redact_value;
use crate::summary::{apply_table_style, header_cell};

/// Outcome of the `map` command.
#[derive(Debug)]
pub struct MapResult {
    /// Session as it was finalized.
    pub session: MappingSession,
    pub edits: Option<EditOutcome>,
    pub output: PathBuf,
    pub bundle_bytes: usize,
}

pub fn run_targets(args: &TargetsArgs) -> Result<()> {
    let targets = load_schema_targets(&args.xsd)?;
    if args.json {
        let json = serde_json::to_string_pretty(&targets).context("serialize targets")?;
        println!("{json}");
        return Ok(());
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Schema"),
        header_cell("Path"),
        header_cell("Type"),
        header_cell("Min"),
        header_cell("Max"),
    ]);
    apply_table_style(&mut table);
    for target in &targets {
        table.add_row(vec![
            target.schema_name.as_str(),
            target.path.as_str(),
            target.declared_type.as_str(),
            target.min_occurs.as_str(),
            target.max_occurs.as_str(),
        ]);
    }
    println!("{table}");
    println!("{} target paths", targets.len());
    Ok(())
}

pub fn run_preview(args: &PreviewArgs) -> Result<MappingSession> {
    let engine = build_engine(&args.input);
    let session = preview_session(&args.input, &engine)?;
    if let Some(path) = &args.json {
        let json = serde_json::to_string_pretty(&session.preview_payload())
            .context("serialize preview payload")?;
        fs::write(path, json).with_context(|| format!("write preview: {}", path.display()))?;
        info!(path = %path.display(), "wrote preview payload");
    }
    Ok(session)
}

pub fn run_map(args: &MapArgs) -> Result<MapResult> {
    let engine = build_engine(&args.input);
    let store = InMemorySessionStore::new(DisposalPolicy::Explicit);
    let id = store.insert(preview_session(&args.input, &engine)?);
    let span = info_span!("session", id = %id);
    let _guard = span.enter();

    let edits = match &args.edits {
        Some(path) => {
            let outcome = store.apply_edits(id, &read_edits(path)?)?;
            if !outcome.ignored.is_empty() {
                warn!(fields = ?outcome.ignored, "edits for unknown source fields were ignored");
            }
            Some(outcome)
        }
        None => None,
    };

    let artifacts = store.finalize(id)?;
    let notes = match &args.notes {
        Some(path) => Some(
            fs::read_to_string(path)
                .with_context(|| format!("read notes: {}", path.display()))?,
        ),
        None => None,
    };
    let bundle = package_artifacts(&artifacts, notes.as_deref()).context("package reports")?;
    fs::write(&args.output, &bundle)
        .with_context(|| format!("write bundle: {}", args.output.display()))?;
    info!(path = %args.output.display(), bytes = bundle.len(), "wrote bundle");

    let session = store
        .get(id)?
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone();
    store.dispose(id);
    Ok(MapResult {
        session,
        edits,
        output: args.output.clone(),
        bundle_bytes: bundle.len(),
    })
}

/// Reads and flattens every schema; the file name becomes the schema name.
pub fn load_schema_targets(paths: &[PathBuf]) -> Result<Vec<TargetPathRecord>> {
    let mut schemas = Vec::with_capacity(paths.len());
    for path in paths {
        let xml = fs::read_to_string(path)
            .with_context(|| format!("read schema: {}", path.display()))?;
        schemas.push((schema_name(path), xml));
    }
    let targets = load_targets(
        schemas
            .iter()
            .map(|(name, xml)| (name.as_str(), xml.as_str())),
    )
    .context("parse schemas")?;
    if targets.is_empty() {
        warn!(schemas = paths.len(), "schemas declare no leaf elements");
    }
    Ok(targets)
}

fn schema_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Local-only engine unless a ranking service is configured and allowed.
pub fn build_engine(input: &InputArgs) -> MatchingEngine {
    if input.offline {
        info!("offline mode, using local similarity");
        return MatchingEngine::local();
    }
    let Some(mut config) = RankerConfig::from_env() else {
        info!("ranking service not configured, using local similarity");
        return MatchingEngine::local();
    };
    if let Some(secs) = input.ai_timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    match AzureChatRanker::new(config) {
        Ok(ranker) => {
            info!(deployment = %ranker.config().deployment, "ranking service enabled");
            MatchingEngine::with_ranker(Arc::new(ranker))
        }
        Err(error) => {
            warn!(%error, "ranking client unavailable, using local similarity");
            MatchingEngine::local()
        }
    }
}

fn preview_session(input: &InputArgs, engine: &MatchingEngine) -> Result<MappingSession> {
    let targets = load_schema_targets(&input.xsd)?;
    let table = read_source_file(&input.source)
        .with_context(|| format!("read source: {}", input.source.display()))?;
    for column in table.source_columns(fieldmap_model::SAMPLE_LIMIT) {
        let samples: Vec<&str> = column.samples.iter().map(|s| redact_value(s)).collect();
        trace!(column = %column.name, ?samples, "source column");
    }
    Ok(MappingSession::preview(
        input.project.as_deref().unwrap_or_default(),
        &table,
        targets,
        engine,
    ))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EditsFile {
    List(Vec<MappingEdit>),
    Wrapped { edits: Vec<MappingEdit> },
}

/// Reads reviewer edits: a JSON list or an object with an `edits` list.
pub fn read_edits(path: &Path) -> Result<Vec<MappingEdit>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read edits: {}", path.display()))?;
    let file: EditsFile = serde_json::from_str(&text)
        .with_context(|| format!("parse edits: {}", path.display()))?;
    Ok(match file {
        EditsFile::List(edits) | EditsFile::Wrapped { edits } => edits,
    })
}
