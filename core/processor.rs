use crate::CoreError;
use crate::file_finder::language_for_path;
use crate::guard::GuardError;
use crate::manager::{CommentManager, Granularity};
use rayon::prelude::*;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    Unchanged,
    Changed,
    /// `--check` run: the file would have been rewritten.
    WouldChange,
    /// No language id for this path.
    Skipped,
    Failed,
}

#[derive(Debug)]
pub struct ProcessedFileResult {
    pub path: PathBuf,
    pub outcome: FileOutcome,
    pub error: Option<String>,
}

/// Removes comments from an in-memory buffer, as for `--stdin`.
pub fn process_text(
    manager: &CommentManager,
    text: &str,
    language_id: &str,
    granularity: Granularity,
) -> Result<String, GuardError> {
    manager.process(text, language_id, granularity)
}

fn processing_error(p: &Path, c: &str) -> impl Fn(std::io::Error) -> CoreError {
    let d = p.display().to_string();
    let c = c.to_string();
    move |e| CoreError::Processing {
        path: d.clone(),
        message: format!("{} failed: {}", c, e),
    }
}

fn write_atomically(path: &Path, content: &str) -> Result<(), CoreError> {
    let parent_dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let suffix = path
        .extension()
        .map(|s| format!(".{}", s.to_string_lossy()))
        .unwrap_or_default();
    let mut temp_file = tempfile::Builder::new()
        .prefix(".decomment_")
        .suffix(&suffix)
        .tempfile_in(parent_dir)
        .map_err(processing_error(path, "Create temp file"))?;
    temp_file
        .write_all(content.as_bytes())
        .map_err(processing_error(path, "Write temp file"))?;
    let permissions = fs::metadata(path)
        .map_err(processing_error(path, "Read permissions"))?
        .permissions();
    fs::set_permissions(temp_file.path(), permissions)
        .map_err(processing_error(path, "Copy permissions"))?;
    temp_file
        .persist(path)
        .map_err(|e| processing_error(path, "Replace file")(e.error))?;
    Ok(())
}

fn process_single_file(
    path: &Path,
    manager: &CommentManager,
    granularity: Granularity,
    check: bool,
) -> Result<FileOutcome, CoreError> {
    let lang = match language_for_path(path) {
        Some(l) => l,
        None => return Ok(FileOutcome::Skipped),
    };
    let original_content = fs::read_to_string(path).map_err(processing_error(path, "Read"))?;
    let stripped_content = process_text(manager, &original_content, lang, granularity)?;

    if stripped_content == original_content {
        return Ok(FileOutcome::Unchanged);
    }
    if check {
        return Ok(FileOutcome::WouldChange);
    }
    write_atomically(path, &stripped_content)?;
    tracing::info!(path = %path.display(), lang, "comments removed");
    Ok(FileOutcome::Changed)
}

/// Processes every file in parallel. Files are independent; one failure
/// never stops the others.
pub fn process_files(
    files: Vec<PathBuf>,
    manager: &CommentManager,
    granularity: Granularity,
    check: bool,
) -> Vec<ProcessedFileResult> {
    files
        .par_iter()
        .map(
            |p| match process_single_file(p, manager, granularity, check) {
                Ok(outcome) => ProcessedFileResult {
                    path: p.clone(),
                    outcome,
                    error: None,
                },
                Err(e) => ProcessedFileResult {
                    path: p.clone(),
                    outcome: FileOutcome::Failed,
                    error: Some(e.to_string()),
                },
            },
        )
        .collect()
}
