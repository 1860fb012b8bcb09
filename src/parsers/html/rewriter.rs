//! HTML 文档改写模块
//!
//! 所有改写都基于同一份按偏移排序的块列表：每个文档只扫描一次，
//! 在任何替换发生之前计算出全部 `(范围, 替换文本)` 编辑，
//! 然后在原始文本上一次性应用。“第一个”块始终指原始文本中起始偏移最小的块。

use std::ops::Range;

use tracing::debug;

use crate::core::AssetKind;
use crate::parsers::js::{classify_script, ScriptClass};

use super::scanner::{scan_blocks, Block, BlockKind, BlockScanner};

/// 提取出的资源之间的分隔符（一个空行）
pub const CONTENT_SEPARATOR: &str = "\n\n";

/// A pending replacement of `span` in the original text
#[derive(Clone, Debug, PartialEq, Eq)]
struct Edit {
    span: Range<usize>,
    replacement: String,
}

/// Result of planning the extraction pipeline for one document
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractionPlan {
    /// Concatenated style bodies, present only when non-empty after trimming
    pub css: Option<String>,
    /// Concatenated, trimmed inline script bodies, present only when non-empty
    pub js: Option<String>,
    /// Rewritten document text
    pub document: String,
}

impl ExtractionPlan {
    pub fn is_unchanged(&self) -> bool {
        self.css.is_none() && self.js.is_none()
    }
}

/// Plans the CSS and JS extraction for `document`
///
/// CSS: when the style bodies are non-empty, the first style block becomes
/// the stylesheet reference and every other style block is removed.
///
/// JS: only inline scripts take part. When their bodies are non-empty, the
/// first inline script becomes the script reference and the remaining inline
/// scripts are removed. Scripts with a `src` attribute stay exactly where they are.
pub fn plan_extraction(document: &str, identity: &str) -> ExtractionPlan {
    let blocks: Vec<Block> = BlockScanner::new(document).collect();
    let mut edits = Vec::new();

    let styles: Vec<&Block> = blocks
        .iter()
        .filter(|block| block.kind == BlockKind::Style)
        .collect();
    let css = join_inner_texts(&styles);
    let css = if css.trim().is_empty() {
        None
    } else {
        edits.extend(collapse_to_reference(&styles, AssetKind::Css.reference_tag(identity)));
        Some(css)
    };

    let inline_scripts: Vec<&Block> = blocks
        .iter()
        .filter(|block| block.kind == BlockKind::Script)
        .filter(|block| {
            let class = classify_script(block);
            debug!(offset = block.start(), ?class, "script block");
            class == ScriptClass::Inline
        })
        .collect();
    let js = join_inner_texts(&inline_scripts).trim().to_string();
    let js = if js.is_empty() {
        None
    } else {
        edits.extend(collapse_to_reference(
            &inline_scripts,
            AssetKind::Js.reference_tag(identity),
        ));
        Some(js)
    };

    edits.sort_by_key(|edit| edit.span.start);

    ExtractionPlan {
        css,
        js,
        document: apply_edits(document, &edits),
    }
}

/// Replaces the first style block with `<style>` holding `bundle`
///
/// Returns `None` when the document has no style block; script blocks are
/// never touched.
pub fn substitute_style_block(document: &str, bundle: &str) -> Option<String> {
    let block = scan_blocks(document, BlockKind::Style).next()?;
    let edit = Edit {
        span: block.span.clone(),
        replacement: format!("<style>\n{bundle}\n    </style>"),
    };

    Some(apply_edits(document, &[edit]))
}

fn join_inner_texts(blocks: &[&Block]) -> String {
    blocks
        .iter()
        .map(|block| block.inner_text())
        .collect::<Vec<_>>()
        .join(CONTENT_SEPARATOR)
}

/// First block becomes `reference`, the rest disappear
fn collapse_to_reference(blocks: &[&Block], reference: String) -> Vec<Edit> {
    let mut edits = Vec::with_capacity(blocks.len());
    let mut reference = Some(reference);

    for block in blocks {
        edits.push(Edit {
            span: block.span.clone(),
            replacement: reference.take().unwrap_or_default(),
        });
    }

    edits
}

/// Applies non-overlapping edits, sorted by start offset, in one pass
fn apply_edits(document: &str, edits: &[Edit]) -> String {
    let mut result = String::with_capacity(document.len());
    let mut cursor = 0;

    for edit in edits {
        result.push_str(&document[cursor..edit.span.start]);
        result.push_str(&edit.replacement);
        cursor = edit.span.end;
    }
    result.push_str(&document[cursor..]);

    result
}
