use anyhow::Result as AnyResult;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub mod decision;
pub mod manifest;
pub mod renamer;
pub mod session;

pub use decision::{Answer, ChangeKind, Decision, DecisionGate, Question};
pub use manifest::{update_description, ProjectManifest};
pub use renamer::NameReplacer;
pub use session::{RenameSession, EXCLUDED_DIR_NAMES};

use session::relative_to;

#[derive(thiserror::Error, Debug)]
pub enum RenameError {
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid manifest {path:?}: {message}")]
    Manifest { path: PathBuf, message: String },
    #[error("Manifest {path:?} has neither a `pythonPackageName` nor a `name` field")]
    MissingName { path: PathBuf },
    #[error("The {field} must not be empty")]
    EmptyInput { field: &'static str },
    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },
    #[error("Name pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

impl RenameError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        RenameError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type Result<T, E = RenameError> = std::result::Result<T, E>;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RenameSummary {
    pub files_visited: usize,
    pub contents_rewritten: usize,
    pub files_renamed: usize,
    pub changes_skipped: usize,
}

/// Walks the session root depth-first, rewriting contents and then the file
/// name of every file outside the excluded directories.
///
/// `prompt` is consulted by the decision gate whenever a flag is still at
/// [`Decision::Ask`]. The first I/O or prompt error aborts the walk; files
/// handled before it keep their changes.
pub fn rename_project<P>(session: &mut RenameSession, mut prompt: P) -> AnyResult<RenameSummary>
where
    P: FnMut(&Question<'_>) -> AnyResult<Option<Answer>>,
{
    let mut summary = RenameSummary::default();

    if session.is_noop() {
        info!("Old and new name are both '{}', nothing to do", session.old_name());
        return Ok(summary);
    }

    info!(
        "Renaming '{}' -> '{}' in {:?}",
        session.old_name(),
        session.new_name(),
        session.root()
    );

    let root = session.root().to_path_buf();
    walk_directory(&root, session, &mut prompt, &mut summary)?;

    info!(
        "Rename complete: {} files visited, {} contents rewritten, {} files renamed, {} changes skipped",
        summary.files_visited, summary.contents_rewritten, summary.files_renamed, summary.changes_skipped
    );

    Ok(summary)
}

fn walk_directory<P>(
    dir: &Path,
    session: &mut RenameSession,
    prompt: &mut P,
    summary: &mut RenameSummary,
) -> AnyResult<()>
where
    P: FnMut(&Question<'_>) -> AnyResult<Option<Answer>>,
{
    debug!("Processing directory: {:?}", dir);

    // Snapshot first so files renamed below are not listed a second time.
    let entries: Vec<_> = fs::read_dir(dir)
        .and_then(|entries| entries.collect::<Result<Vec<_>, _>>())
        .map_err(|source| RenameError::io(dir, source))?;

    for entry in &entries {
        let path = entry.path();
        let file_type = entry.file_type().map_err(|source| RenameError::io(&path, source))?;
        // Symlinked directories may point back up the tree; only real ones are walked.
        if file_type.is_symlink() && path.is_dir() {
            debug!("Skipping symlinked directory: {:?}", path);
        } else if file_type.is_dir() {
            if session.is_excluded(&entry.file_name()) {
                debug!("Skipping excluded directory: {:?}", path);
                continue;
            }
            walk_directory(&path, session, prompt, summary)?;
        } else if path.is_file() {
            process_file(&path, session, prompt, summary)?;
        } else {
            debug!("Skipping special file: {:?}", path);
        }
    }

    Ok(())
}

fn process_file<P>(
    file_path: &Path,
    session: &mut RenameSession,
    prompt: &mut P,
    summary: &mut RenameSummary,
) -> AnyResult<()>
where
    P: FnMut(&Question<'_>) -> AnyResult<Option<Answer>>,
{
    debug!("Processing file: {:?}", file_path);
    summary.files_visited += 1;

    rewrite_contents(file_path, session, prompt, summary)?;
    rename_file(file_path, session, prompt, summary)?;

    Ok(())
}

fn rewrite_contents<P>(
    file_path: &Path,
    session: &mut RenameSession,
    prompt: &mut P,
    summary: &mut RenameSummary,
) -> AnyResult<()>
where
    P: FnMut(&Question<'_>) -> AnyResult<Option<Answer>>,
{
    let content = fs::read(file_path).map_err(|source| RenameError::io(file_path, source))?;

    let Some(new_content) = session.replacer.process_content(&content) else {
        return Ok(());
    };

    let before = String::from_utf8_lossy(&content);
    let after = String::from_utf8_lossy(&new_content);

    let old_name = session.replacer.old_name();
    let new_name = session.replacer.new_name();
    let question = Question::Contents {
        path: relative_to(&session.root, file_path),
        old_name,
        new_name,
        before: &before,
        after: &after,
    };

    if session.gate.resolve(&question, prompt)? {
        fs::write(file_path, &new_content).map_err(|source| RenameError::io(file_path, source))?;
        println!("  - Replaced {} with {} in {}", old_name, new_name, file_path.display());
        summary.contents_rewritten += 1;
    } else {
        println!("  - Skipped replacing {} with {} in {}", old_name, new_name, file_path.display());
        summary.changes_skipped += 1;
    }

    Ok(())
}

fn rename_file<P>(
    file_path: &Path,
    session: &mut RenameSession,
    prompt: &mut P,
    summary: &mut RenameSummary,
) -> AnyResult<()>
where
    P: FnMut(&Question<'_>) -> AnyResult<Option<Answer>>,
{
    let Some(new_path) = session.replacer.process_file_name(file_path) else {
        return Ok(());
    };

    // Existing files are never overwritten; this does not count as a decision.
    if fs::symlink_metadata(&new_path).is_ok() {
        println!("  - {} already exists", new_path.display());
        return Ok(());
    }

    let question = Question::FileName {
        from: relative_to(&session.root, file_path),
        to: relative_to(&session.root, &new_path),
    };

    if session.gate.resolve(&question, prompt)? {
        fs::rename(file_path, &new_path).map_err(|source| RenameError::io(file_path, source))?;
        println!("  - Renamed {} to {}", file_path.display(), new_path.display());
        summary.files_renamed += 1;
    } else {
        println!("  - Skipped renaming {} to {}", file_path.display(), new_path.display());
        summary.changes_skipped += 1;
    }

    Ok(())
}
