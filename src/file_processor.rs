//! Finding Perl files and running them through a formatting session.

use anyhow::{Context, Result};
use ignore::WalkBuilder;
use std::io::Read;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tidybridge_lib::document::PERL_EXTENSIONS;
use tidybridge_lib::sink::ConsoleNotifier;
use tidybridge_lib::{Document, FormatError, FormatSession, IssueCollection, TidyOutcome};

pub type CliSession = FormatSession<IssueCollection, ConsoleNotifier>;

/// Name shown for stdin when no `--stdin-filename` is given.
pub const STDIN_NAME: &str = "<stdin>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Stdin,
    File(PathBuf),
}

impl Input {
    pub fn display_name(&self, stdin_filename: Option<&str>) -> String {
        match self {
            Input::Stdin => stdin_filename.unwrap_or(STDIN_NAME).to_string(),
            Input::File(path) => to_display_path(path),
        }
    }
}

/// Path relative to the working directory when possible.
pub fn to_display_path(path: &Path) -> String {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(&cwd).ok().map(Path::to_path_buf))
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}

/// Expand the command-line paths into inputs.
///
/// `-` means stdin. Files named explicitly are always included; directories are walked
/// for Perl files, honouring `.gitignore`. No paths means the current directory.
pub fn collect_inputs(paths: &[String]) -> Result<Vec<Input>> {
    if paths.iter().any(|p| p == "-") {
        if paths.len() > 1 {
            anyhow::bail!("'-' (stdin) cannot be combined with other paths");
        }
        return Ok(vec![Input::Stdin]);
    }

    let roots: Vec<String> = if paths.is_empty() {
        vec![".".to_string()]
    } else {
        paths.to_vec()
    };

    let mut inputs = Vec::new();
    for root in &roots {
        let path = Path::new(root);
        if path.is_file() {
            inputs.push(Input::File(path.to_path_buf()));
        } else if path.is_dir() {
            inputs.extend(find_perl_files(path)?.into_iter().map(Input::File));
        } else {
            anyhow::bail!("Path not found: {root}");
        }
    }

    inputs.dedup();
    Ok(inputs)
}

/// All Perl files under `dir`, sorted.
pub fn find_perl_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut types_builder = ignore::types::TypesBuilder::new();
    for ext in PERL_EXTENSIONS {
        types_builder.add("perl", &format!("*.{ext}"))?;
    }
    types_builder.select("perl");

    let mut files = Vec::new();
    for entry in WalkBuilder::new(dir).types(types_builder.build()?).build() {
        let entry = entry.with_context(|| format!("Failed to walk {}", dir.display()))?;
        if entry.file_type().is_some_and(|ft| ft.is_file()) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    log::debug!("Found {} Perl file(s) under {}", files.len(), dir.display());
    Ok(files)
}

pub fn read_input(input: &Input, stdin_filename: Option<&str>) -> Result<Document> {
    match input {
        Input::Stdin => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read from stdin")?;
            let name = stdin_filename.unwrap_or(STDIN_NAME);
            Ok(Document::for_path(Path::new(name), text))
        }
        Input::File(path) => {
            let text =
                std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
            Ok(Document::for_path(path, text))
        }
    }
}

/// One input after perltidy has run over it.
#[derive(Debug)]
pub struct Processed {
    pub name: String,
    pub original: String,
    pub document: Document,
    pub outcome: TidyOutcome,
}

impl Processed {
    pub fn changed(&self) -> bool {
        matches!(self.outcome, TidyOutcome::Formatted { changed: true })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error(transparent)]
    Input(#[from] anyhow::Error),

    #[error(transparent)]
    Format(#[from] FormatError),
}

impl ProcessError {
    /// Whether every later input would fail the same way.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ProcessError::Format(FormatError::NotConfigured))
    }
}

pub async fn process_input(
    session: &mut CliSession,
    input: &Input,
    stdin_filename: Option<&str>,
    selection: Option<Range<usize>>,
) -> std::result::Result<Processed, ProcessError> {
    let mut document = read_input(input, stdin_filename)?;
    if let Some(range) = selection {
        document = document.with_selection(range).context("Invalid --selection")?;
    }
    let original = document.text().to_string();

    let outcome = session.tidy(&mut document).await?;

    Ok(Processed {
        name: input.display_name(stdin_filename),
        original,
        document,
        outcome,
    })
}
