use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::env::{self, EnvVar};
use crate::parsers::css::StyleComposer;
use crate::parsers::html::{plan_extraction, substitute_style_block, BlockKind};
use crate::utils::fs::{
    asset_path, document_identity, ensure_asset_dirs, list_html_documents, read_document,
    validate_identity, write_asset, write_document,
};

/// Errors raised while extracting or unifying a single document
///
/// Every variant carries the path it concerns so that a batch report can name
/// the offending document without further context.
#[derive(Debug, Error)]
pub enum ExtricateError {
    #[error("file not found: {}", path.display())]
    MissingInputFile { path: PathBuf },

    #[error("no <{kind}> block found in {}", path.display())]
    MissingExpectedBlock { path: PathBuf, kind: BlockKind },

    #[error("failed to read {}: {source}", path.display())]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid document identity \"{identity}\"")]
    InvalidIdentity { identity: String },

    #[error("configuration error: {0}")]
    Config(String),
}

pub type ExtricateResult<T> = Result<T, ExtricateError>;

/// Kind of external asset lifted out of a document
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Css,
    Js,
}

impl AssetKind {
    /// Both the sibling directory name and the file extension
    pub fn extension(&self) -> &'static str {
        match self {
            AssetKind::Css => "css",
            AssetKind::Js => "js",
        }
    }

    /// Markup referencing the extracted file, e.g. `<link rel="stylesheet" href="/css/page.css">`
    pub fn reference_tag(&self, identity: &str) -> String {
        match self {
            AssetKind::Css => format!(r#"<link rel="stylesheet" href="/css/{identity}.css">"#),
            AssetKind::Js => format!(r#"<script src="/js/{identity}.js"></script>"#),
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Extracted text together with the file it is persisted to
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExternalAsset {
    pub kind: AssetKind,
    pub target_path: PathBuf,
    pub content: String,
}

/// Options shared by both batch pipelines
#[derive(Clone, Debug, Default)]
pub struct ExtricateOptions {
    /// Directory holding the HTML documents; `css/` and `js/` live next to them
    pub web_dir: PathBuf,
    /// Suppress per-document console output
    pub silent: bool,
}

/// Outcome of running the extraction pipeline on one document
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtractionReport {
    pub identity: String,
    pub css_written: Option<PathBuf>,
    pub js_written: Option<PathBuf>,
    pub document_changed: bool,
}

/// A document that could not be processed, with the reason
#[derive(Debug)]
pub struct DocumentFailure {
    pub document: String,
    pub error: ExtricateError,
}

/// Batch-level result: partial success is reported, never escalated
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failures: Vec<DocumentFailure>,
}

impl BatchSummary {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    fn record<T>(&mut self, document: &str, result: ExtricateResult<T>) -> Option<T> {
        self.total += 1;
        match result {
            Ok(value) => {
                self.succeeded += 1;
                Some(value)
            }
            Err(error) => {
                warn!(document, %error, "document failed");
                self.failures.push(DocumentFailure {
                    document: document.to_string(),
                    error,
                });
                None
            }
        }
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{} documents processed", self.succeeded, self.total)
    }
}

/// Runs the extraction pipeline on a single HTML document
///
/// Inline style and script bodies are written to `css/{identity}.css` and
/// `js/{identity}.js` under `web_dir`, then the document is rewritten in place
/// to reference them. Assets are persisted before the document so that a
/// failed asset write leaves the document untouched.
///
/// # Arguments
///
/// * `web_dir` - Directory containing the document
/// * `file_name` - Base file name of the document, e.g. `page1.html`
pub fn extract_document(web_dir: &Path, file_name: &str) -> ExtricateResult<ExtractionReport> {
    let identity = document_identity(file_name)?;
    let html_path = web_dir.join(file_name);
    let content = read_document(&html_path)?;

    let plan = plan_extraction(&content, &identity);
    let mut report = ExtractionReport {
        identity: identity.clone(),
        ..Default::default()
    };

    if let Some(css) = plan.css {
        let asset = ExternalAsset {
            kind: AssetKind::Css,
            target_path: asset_path(web_dir, AssetKind::Css, &identity),
            content: css,
        };
        if write_asset(&asset)? {
            report.css_written = Some(asset.target_path);
        }
    }

    if let Some(js) = plan.js {
        let asset = ExternalAsset {
            kind: AssetKind::Js,
            target_path: asset_path(web_dir, AssetKind::Js, &identity),
            content: js,
        };
        if write_asset(&asset)? {
            report.js_written = Some(asset.target_path);
        }
    }

    if plan.document != content {
        write_document(&html_path, &plan.document)?;
        report.document_changed = true;
        info!(path = %html_path.display(), "document rewritten");
    } else {
        debug!(path = %html_path.display(), "document already externalized");
    }

    Ok(report)
}

/// Replaces the first `<style>` block of `{identity}.html` with the composed bundle
///
/// Returns the path of the rewritten document. A document without any style
/// block is left byte-for-byte unchanged and reported as
/// [`ExtricateError::MissingExpectedBlock`].
pub fn unify_document(
    web_dir: &Path,
    identity: &str,
    composer: &StyleComposer,
) -> ExtricateResult<PathBuf> {
    validate_identity(identity)?;
    let html_path = web_dir.join(format!("{identity}.html"));
    let content = read_document(&html_path)?;

    let bundle = composer.compose(identity);
    let unified = substitute_style_block(&content, &bundle).ok_or_else(|| {
        ExtricateError::MissingExpectedBlock {
            path: html_path.clone(),
            kind: BlockKind::Style,
        }
    })?;

    write_document(&html_path, &unified)?;
    info!(
        path = %html_path.display(),
        page_specific = composer.has_page_style(identity),
        "style block unified"
    );

    Ok(html_path)
}

/// Extraction pipeline over every `*.html` document of `options.web_dir`
///
/// Only a failure to prepare the asset directories or to list the input
/// directory aborts the batch; per-document errors are collected in the
/// returned summary and the remaining documents are still attempted.
pub fn run_extraction(options: &ExtricateOptions) -> ExtricateResult<BatchSummary> {
    let web_dir = options.web_dir.as_path();
    ensure_asset_dirs(web_dir)?;

    let documents = list_html_documents(web_dir)?;
    let mut summary = BatchSummary::default();

    if documents.is_empty() {
        if !options.silent {
            print_info_message(&format!("No HTML documents found in {}", web_dir.display()));
        }
        return Ok(summary);
    }

    if !options.silent {
        print_info_message(&format!("Found {} HTML documents", documents.len()));
    }

    for file_name in &documents {
        debug!(document = %file_name, "extracting");
        let result = extract_document(web_dir, file_name);

        if !options.silent {
            match &result {
                Ok(report) => {
                    if let Some(path) = &report.css_written {
                        print_info_message(&format!("✓ CSS extracted: {}", path.display()));
                    }
                    if let Some(path) = &report.js_written {
                        print_info_message(&format!("✓ JS extracted: {}", path.display()));
                    }
                    if report.document_changed {
                        print_info_message(&format!("✓ Updated: {file_name}"));
                    } else {
                        print_info_message(&format!("- Unchanged: {file_name}"));
                    }
                }
                Err(error) => print_error_message(&format!("✗ {file_name}: {error}")),
            }
        }

        summary.record(file_name, result);
    }

    Ok(summary)
}

/// Unification pipeline over a fixed list of document identities
pub fn run_unification(
    options: &ExtricateOptions,
    targets: &[String],
    composer: &StyleComposer,
) -> BatchSummary {
    let mut summary = BatchSummary::default();

    for identity in targets {
        let result = unify_document(&options.web_dir, identity, composer);

        if !options.silent {
            match &result {
                Ok(path) => print_info_message(&format!("✓ Unified: {}", path.display())),
                Err(error) => print_error_message(&format!("✗ {identity}: {error}")),
            }
        }

        summary.record(identity, result);
    }

    summary
}

const ANSI_COLOR_RED: &str = "\x1b[31m";
const ANSI_COLOR_RESET: &str = "\x1b[0m";

fn use_color() -> bool {
    atty::is(atty::Stream::Stderr) && !env::core::NoColor::get().unwrap_or(false)
}

/// Prints an error message to stderr
pub fn print_error_message(msg: &str) {
    if use_color() {
        eprintln!("{ANSI_COLOR_RED}{msg}{ANSI_COLOR_RESET}");
    } else {
        eprintln!("{msg}");
    }
}

/// Prints an info message to stdout
pub fn print_info_message(msg: &str) {
    println!("{msg}");
}
