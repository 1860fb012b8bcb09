//! # 工具模块
//!
//! 这个模块包含各种工具函数和实用程序：
//!
//! - 文档标识推导和校验
//! - HTML 文件列表
//! - 资源与文档的原子写入
//!
//! # 模块组织
//!
//! - `fs` - 文件系统读写和路径推导

pub mod fs;

// Re-export commonly used items for convenience
pub use fs::{
    asset_path, document_identity, ensure_asset_dirs, list_html_documents, read_document,
    validate_identity, write_asset, write_document, HTML_EXTENSION,
};
