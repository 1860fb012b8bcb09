//! 文件系统工具
//!
//! 负责文档的读取、HTML 文件列表、资源目录准备以及资源和文档的写入。
//! 所有写入都先写到同一目录下的临时文件，再原子地替换目标文件，
//! 因此写入失败不会留下半截的资源或文档。

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::core::{AssetKind, ExternalAsset, ExtricateError, ExtricateResult};

/// HTML 文档后缀
pub const HTML_EXTENSION: &str = ".html";

fn identity_pattern() -> &'static Result<Regex, regex::Error> {
    static PATTERN: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-][A-Za-z0-9_.-]*$"))
}

/// 检查文档标识是否只包含安全字符，且不以 `.` 开头
pub fn validate_identity(identity: &str) -> ExtricateResult<()> {
    let pattern = identity_pattern()
        .as_ref()
        .map_err(|e| ExtricateError::Config(format!("identity pattern: {e}")))?;

    if pattern.is_match(identity) {
        Ok(())
    } else {
        Err(ExtricateError::InvalidIdentity {
            identity: identity.to_string(),
        })
    }
}

/// Derives a document identity from its file name (`page1.html` → `page1`)
pub fn document_identity(file_name: &str) -> ExtricateResult<String> {
    let identity = file_name.strip_suffix(HTML_EXTENSION).unwrap_or(file_name);
    validate_identity(identity)?;
    Ok(identity.to_string())
}

/// `{web_dir}/{kind}/{identity}.{kind}`
pub fn asset_path(web_dir: &Path, kind: AssetKind, identity: &str) -> PathBuf {
    web_dir
        .join(kind.extension())
        .join(format!("{identity}.{}", kind.extension()))
}

/// Creates the `css/` and `js/` siblings of the documents
pub fn ensure_asset_dirs(web_dir: &Path) -> ExtricateResult<()> {
    for kind in [AssetKind::Css, AssetKind::Js] {
        let dir = web_dir.join(kind.extension());
        fs::create_dir_all(&dir).map_err(|source| ExtricateError::WriteFailure {
            path: dir.clone(),
            source,
        })?;
    }
    Ok(())
}

/// Sorted names of the `*.html` files directly inside `dir`
pub fn list_html_documents(dir: &Path) -> ExtricateResult<Vec<String>> {
    let read_failure = |source| ExtricateError::ReadFailure {
        path: dir.to_path_buf(),
        source,
    };

    let mut documents = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_failure)? {
        let entry = entry.map_err(read_failure)?;
        if !entry.file_type().map_err(read_failure)?.is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if name.ends_with(HTML_EXTENSION) {
                documents.push(name.to_string());
            }
        }
    }
    documents.sort();

    debug!(dir = %dir.display(), count = documents.len(), "listed HTML documents");
    Ok(documents)
}

/// Reads a whole document, distinguishing a missing file from other I/O faults
pub fn read_document(path: &Path) -> ExtricateResult<String> {
    fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ExtricateError::MissingInputFile {
                path: path.to_path_buf(),
            }
        } else {
            ExtricateError::ReadFailure {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

/// Persists an extracted asset, overwriting any previous content
///
/// Returns `Ok(false)` without touching the filesystem when the content is
/// empty after trimming.
pub fn write_asset(asset: &ExternalAsset) -> ExtricateResult<bool> {
    if asset.content.trim().is_empty() {
        debug!(path = %asset.target_path.display(), "empty {} content, nothing written", asset.kind);
        return Ok(false);
    }

    if let Some(parent) = asset.target_path.parent() {
        fs::create_dir_all(parent).map_err(|source| ExtricateError::WriteFailure {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    write_atomically(&asset.target_path, &asset.content)?;
    info!(path = %asset.target_path.display(), bytes = asset.content.len(), "{} asset written", asset.kind);
    Ok(true)
}

/// Overwrites a document in place
pub fn write_document(path: &Path, content: &str) -> ExtricateResult<()> {
    write_atomically(path, content)
}

fn write_atomically(path: &Path, content: &str) -> ExtricateResult<()> {
    let write_failure = |source| ExtricateError::WriteFailure {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(write_failure)?;
    file.write_all(content.as_bytes()).map_err(write_failure)?;

    // Temp files are created private; keep the target's mode instead
    match fs::metadata(path) {
        Ok(metadata) => fs::set_permissions(file.path(), metadata.permissions())
            .map_err(write_failure)?,
        Err(_) => set_default_permissions(file.path()).map_err(write_failure)?,
    }

    file.persist(path).map_err(|error| write_failure(error.error))?;
    Ok(())
}

#[cfg(unix)]
fn set_default_permissions(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_default_permissions(_path: &Path) -> io::Result<()> {
    Ok(())
}
