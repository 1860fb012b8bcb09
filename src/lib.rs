//! # Extricate Library
//!
//! 一个构建期工具库，用于把 HTML 页面中的内联 `<style>` 与 `<script>` 块提取为独立的
//! `.css` / `.js` 文件，并把页面改写为外部引用；同时支持用共享样式包统一页面样式。
//!
//! ## 模块组织
//!
//! - `core` - 错误类型、资源类型以及两条批处理流水线
//! - `parsers` - 块扫描、脚本分类、文档改写和样式包组合
//! - `utils` - 文件系统工具函数
//! - `config` - 配置文件加载和验证
//! - `env` - 类型安全的环境变量

pub mod config;
pub mod core;
pub mod env;
pub mod parsers;
pub mod utils;

// Re-export commonly used items for convenience
pub use config::ExtricateConfig;
pub use crate::core::*;
pub use parsers::*;
pub use utils::*;
