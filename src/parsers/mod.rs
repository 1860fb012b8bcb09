//! # 解析器模块
//!
//! 这个模块包含在原始 HTML 文本上定位、分类和改写内联资源的功能：
//!
//! - HTML 内联块扫描和文档改写
//! - CSS 样式包组合
//! - JavaScript 脚本块分类
//!
//! # 模块组织
//!
//! - `html` - 块扫描器、提取计划、样式块替换
//! - `css` - 共享样式与页面专属样式的组合
//! - `js` - 内联/外部脚本分类

pub mod css;
pub mod html;
pub mod js;

// Re-export commonly used items for convenience
pub use css::{StyleBundleConfig, StyleComposer};
pub use html::{
    plan_extraction, scan_blocks, substitute_style_block, Block, BlockKind, BlockScanner,
    ExtractionPlan,
};
pub use js::{classify_script, classify_script_tag, ScriptClass};
