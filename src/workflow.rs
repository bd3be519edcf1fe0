//! Workflow for the `discover` and `patch` commands.
//!
//! Each document is read once, threaded through the orchestrator in memory,
//! and written at most once. A failure on one document is recorded in the
//! report and never undoes writes already made for others.
use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

use crate::cli::{DiscoverArgs, PatchArgs};
use crate::config::{load_config, resolve_lm_command, PatchConfig};
use crate::document::{discover, Dialect, DiscoveredFile, Document};
use crate::fields::{load_fields, FieldSet};
use crate::generate::{CommandGenerator, FieldGenerator, GenerationRequest};
use crate::orchestrate::{patch_document, PreparedFields};
use crate::patch::notice::NoticePattern;
use crate::patch::Patcher;
use crate::persist::write_document;
use crate::report::{DocumentReport, RunReport};
use crate::util::display_path;

pub fn run_discover(args: &DiscoverArgs) -> Result<()> {
    let repo = ensure_repo_root(&args.repo)?;
    let files = discover(&repo)?;
    if args.json {
        let listed: Vec<DiscoveredFile> = files
            .into_iter()
            .map(|file| DiscoveredFile {
                path: PathBuf::from(display_path(&file.path, Some(&repo))),
                classification: file.classification,
            })
            .collect();
        let text = serde_json::to_string_pretty(&listed).context("serialize discovery")?;
        println!("{text}");
        return Ok(());
    }
    if files.is_empty() {
        println!("no desktop or metainfo files under {}", repo.display());
    }
    for file in &files {
        let template = if file.classification.is_template {
            " [template]"
        } else {
            ""
        };
        println!(
            "{} ({}){template}",
            display_path(&file.path, Some(&repo)),
            file.classification.dialect.label()
        );
    }
    Ok(())
}

pub fn run_patch(args: &PatchArgs) -> Result<()> {
    let repo = ensure_repo_root(&args.repo)?;
    let mut config = load_config(args.config.as_deref())?;
    if args.skip_templates {
        config.include_templates = false;
    }

    let files = discover(&repo)?;
    if files.is_empty() {
        tracing::warn!(repo = %repo.display(), "no metadata documents found");
    }

    let mut fields = resolve_fields(args, &config, &files)?;
    fields.restrict(&args.only);
    if fields.is_empty() {
        return Err(anyhow!("no fields to apply"));
    }
    tracing::info!(fields = ?fields.requested(), "applying fields");

    let report = patch_files(&repo, &files, &fields, &config, args.dry_run)?;

    if args.json {
        let text = serde_json::to_string_pretty(&report).context("serialize run report")?;
        println!("{text}");
    } else {
        print!("{}", report.render_text());
        match report.change_summary() {
            Some(summary) => print!("\n{summary}"),
            None => println!("\nno changes"),
        }
    }

    if report.has_errors() {
        let failed = report
            .documents
            .iter()
            .filter(|doc| doc.error.is_some())
            .count();
        return Err(anyhow!("{failed} document(s) could not be patched"));
    }
    Ok(())
}

/// Patch every discovered file and collect the run report.
pub fn patch_files(
    repo: &Path,
    files: &[DiscoveredFile],
    fields: &FieldSet,
    config: &PatchConfig,
    dry_run: bool,
) -> Result<RunReport> {
    let notices = NoticePattern::from_config(config)?;
    let patcher = Patcher::new(config, &notices);
    let prepared = PreparedFields::prepare(fields, config.max_keywords, config.max_summary_chars);
    let mut report = RunReport::new(repo.display().to_string(), dry_run);

    for file in files {
        let rel = display_path(&file.path, Some(repo));
        if file.classification.is_template && !config.include_templates {
            tracing::info!(path = %rel, "skipping template");
            report.skipped_templates.push(rel);
            continue;
        }
        let mut doc_report = DocumentReport {
            path: rel.clone(),
            dialect: file.classification.dialect,
            is_template: file.classification.is_template,
            changed: false,
            written: false,
            fields: Vec::new(),
            error: None,
        };

        let document = match Document::load(&file.path) {
            Ok(Some(document)) => document,
            Ok(None) => continue,
            Err(err) => {
                tracing::warn!(path = %rel, error = %err, "failed to read document");
                doc_report.error = Some(format!("{err:#}"));
                report.documents.push(doc_report);
                continue;
            }
        };

        let patch = patch_document(&document, &prepared, &patcher);
        doc_report.changed = patch.changed();
        doc_report.fields = patch.fields;

        if doc_report.changed && !dry_run {
            match write_document(&document.path, &patch.content) {
                Ok(()) => {
                    doc_report.written = true;
                    tracing::info!(path = %rel, "document updated");
                }
                Err(err) => {
                    tracing::warn!(path = %rel, error = %err, "failed to write document");
                    doc_report.error = Some(format!("{err:#}"));
                }
            }
        }
        report.documents.push(doc_report);
    }
    Ok(report)
}

fn resolve_fields(
    args: &PatchArgs,
    config: &PatchConfig,
    files: &[DiscoveredFile],
) -> Result<FieldSet> {
    if let Some(path) = &args.fields {
        return load_fields(path);
    }
    let Some(command) = resolve_lm_command(args.lm.as_deref(), config) else {
        return Err(anyhow!(
            "provide --fields <file> or a generator via --lm, lm_command, or APPMETA_LM_COMMAND"
        ));
    };
    let generator = CommandGenerator::new(&command)?;
    let request = generation_request(files)?;
    tracing::info!(app_id = ?request.app_id, "requesting generated fields");
    generator.generate(&request)
}

/// Describe the application from its primary component document, preferring
/// rendered files over templates.
fn generation_request(files: &[DiscoveredFile]) -> Result<GenerationRequest> {
    let primary = files
        .iter()
        .filter(|file| file.classification.dialect == Dialect::Component)
        .min_by_key(|file| file.classification.is_template);
    let Some(primary) = primary else {
        return Ok(GenerationRequest::default());
    };
    let document = Document::load(&primary.path)?
        .ok_or_else(|| anyhow!("{} is not a metadata document", primary.path.display()))?;
    Ok(GenerationRequest::from_document(&document))
}

fn ensure_repo_root(path: &Path) -> Result<PathBuf> {
    let root = path
        .canonicalize()
        .with_context(|| format!("resolve repository root {}", path.display()))?;
    if !root.is_dir() {
        return Err(anyhow!("{} is not a directory", root.display()));
    }
    Ok(root)
}
