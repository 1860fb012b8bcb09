//! HTML 内联块处理模块
//!
//! - `utils`: 基础工具函数和常量
//! - `scanner`: 定位 `<style>` / `<script>` 块的扫描器
//! - `rewriter`: 基于块列表的文档改写

pub mod rewriter;
pub mod scanner;
pub mod utils;

pub use rewriter::{plan_extraction, substitute_style_block, ExtractionPlan, CONTENT_SEPARATOR};
pub use scanner::{scan_blocks, Block, BlockKind, BlockScanner, TagAttribute};
pub use utils::{is_whitespace, WHITESPACES};
