//! JavaScript 脚本块分类模块
//!
//! 此模块决定一个 `<script>` 块是“外部脚本”还是“内联脚本”：
//!
//! - 外部脚本：开始标签带有 `src` 属性，其内容来自外部文件。外部脚本必须原样保留，
//!   既不会被改写也不会贡献到提取出的 JS 内容中。
//! - 内联脚本：没有 `src` 属性，其内部文本就是真正的代码。
//!
//! 分类直接基于扫描器保留下来的开始标签属性，不需要回溯文档去重新定位标签。

use crate::parsers::html::{Block, BlockKind, BlockScanner};

/// 表示脚本来源的属性名
const JS_SOURCE_ATTRS: &[&str] = &["src"];

/// Classification of a script block
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScriptClass {
    /// Opening tag references a file; preserved verbatim
    External,
    /// Body is real code to be extracted
    Inline,
}

/// 检查属性名是否表示脚本来源（不区分大小写）
///
/// # 示例
/// ```rust
/// use extricate::parsers::js::attr_is_source;
///
/// assert!(attr_is_source("src"));
/// assert!(attr_is_source("SRC"));
/// assert!(!attr_is_source("data-src"));
/// ```
pub fn attr_is_source(attr_name: &str) -> bool {
    JS_SOURCE_ATTRS
        .iter()
        .any(|a| attr_name.eq_ignore_ascii_case(a))
}

/// 根据开始标签的属性对脚本块进行分类
///
/// 只有属性名恰好为 `src` 时才视为外部脚本；`data-src` 等属性不会被误判。
pub fn classify_script(block: &Block) -> ScriptClass {
    if block
        .attributes
        .iter()
        .any(|attribute| attr_is_source(attribute.name))
    {
        ScriptClass::External
    } else {
        ScriptClass::Inline
    }
}

/// 对一段完整的脚本标签文本（开始标签到结束标签）进行分类
///
/// 如果文本中不包含完整的 `<script>` 块，返回 `None`。
pub fn classify_script_tag(tag_text: &str) -> Option<ScriptClass> {
    BlockScanner::new(tag_text)
        .find(|block| block.kind == BlockKind::Script)
        .map(|block| classify_script(&block))
}
