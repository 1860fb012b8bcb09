//! HTML 内联块扫描器
//!
//! 本模块在原始文档文本上直接定位 `<style>` 与 `<script>` 块，不构建 DOM。
//! 扫描器按字节偏移工作，为每个块返回结构化记录：
//!
//! - 整个块的范围（开始标签到结束标签）
//! - 内部文本的范围
//! - 开始标签上的属性（名称与可选值）
//!
//! 扫描规则：
//!
//! - 标签名不区分大小写，且其后必须是空白、`/` 或 `>`
//! - 属性值中的引号会被尊重，引号内的 `>` 不会结束开始标签
//! - 内部文本非贪婪地延伸到最近的匹配结束标签，可跨越多行
//! - 没有结束标签的开始标签不会产生任何块，扫描从该开始标签之后继续
//! - 引号未闭合的开始标签在第一个 `>` 处结束
//! - 已匹配块内部的文本不会被再次扫描，HTML 注释会被跳过

use std::fmt;
use std::ops::Range;

use tracing::debug;

use super::utils::is_whitespace;

/// Kind of delimited region the scanner recognises
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Style,
    Script,
}

impl BlockKind {
    pub const ALL: [BlockKind; 2] = [BlockKind::Style, BlockKind::Script];

    pub fn tag_name(&self) -> &'static str {
        match self {
            BlockKind::Style => "style",
            BlockKind::Script => "script",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.tag_name())
    }
}

/// One attribute of an opening tag, borrowed from the document
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TagAttribute<'a> {
    pub name: &'a str,
    pub value: Option<&'a str>,
}

/// A located `<style>` or `<script>` region
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block<'a> {
    pub kind: BlockKind,
    /// Opening `<` through the closing tag's `>` (exclusive end)
    pub span: Range<usize>,
    /// Text between the opening and closing tags
    pub inner: Range<usize>,
    pub attributes: Vec<TagAttribute<'a>>,
    source: &'a str,
}

impl<'a> Block<'a> {
    pub fn start(&self) -> usize {
        self.span.start
    }

    pub fn end(&self) -> usize {
        self.span.end
    }

    pub fn inner_text(&self) -> &'a str {
        &self.source[self.inner.clone()]
    }

    /// Full original markup of the block, opening tag through closing tag
    pub fn outer_text(&self) -> &'a str {
        &self.source[self.span.clone()]
    }

    pub fn opening_tag(&self) -> &'a str {
        &self.source[self.span.start..self.inner.start]
    }

    /// Looks an attribute up by name, ignoring ASCII case
    pub fn attribute(&self, name: &str) -> Option<&TagAttribute<'a>> {
        self.attributes
            .iter()
            .find(|attribute| attribute.name.eq_ignore_ascii_case(name))
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }
}

/// Lazy iterator over every style and script block of a document, in document order
///
/// The scanner is a pure function of the text: creating a new one restarts
/// the sequence from the beginning.
#[derive(Clone, Debug)]
pub struct BlockScanner<'a> {
    document: &'a str,
    position: usize,
}

impl<'a> BlockScanner<'a> {
    pub fn new(document: &'a str) -> Self {
        BlockScanner {
            document,
            position: 0,
        }
    }

    fn finish(&mut self) -> Option<Block<'a>> {
        self.position = self.document.len();
        None
    }
}

impl<'a> Iterator for BlockScanner<'a> {
    type Item = Block<'a>;

    fn next(&mut self) -> Option<Block<'a>> {
        let document = self.document;

        while self.position < document.len() {
            let offset = match document[self.position..].find('<') {
                Some(offset) => self.position + offset,
                None => return self.finish(),
            };

            if document[offset..].starts_with("<!--") {
                match document[offset + 4..].find("-->") {
                    Some(end) => {
                        self.position = offset + 4 + end + 3;
                        continue;
                    }
                    None => return self.finish(),
                }
            }

            let Some(kind) = match_opening_name(document, offset) else {
                self.position = offset + 1;
                continue;
            };

            let attributes_start = offset + 1 + kind.tag_name().len();
            let Some((attributes, inner_start)) = parse_attributes(document, attributes_start)
            else {
                self.position = offset + 1;
                continue;
            };

            // Only this occurrence is dropped; later blocks are still found
            let Some((inner_end, block_end)) = find_closing_tag(document, inner_start, kind) else {
                debug!(offset, %kind, "unterminated block skipped");
                self.position = inner_start;
                continue;
            };

            self.position = block_end;
            return Some(Block {
                kind,
                span: offset..block_end,
                inner: inner_start..inner_end,
                attributes,
                source: document,
            });
        }

        None
    }
}

/// Blocks of one kind only, in document order
pub fn scan_blocks(document: &str, kind: BlockKind) -> impl Iterator<Item = Block<'_>> {
    BlockScanner::new(document).filter(move |block| block.kind == kind)
}

/// Case-insensitive match of `name` at `offset`, followed by a tag-name boundary
fn name_at(document: &str, offset: usize, name: &str) -> bool {
    let bytes = document.as_bytes();
    let end = offset + name.len();

    end < bytes.len()
        && bytes[offset..end].eq_ignore_ascii_case(name.as_bytes())
        && (is_whitespace(bytes[end]) || bytes[end] == b'>' || bytes[end] == b'/')
}

fn match_opening_name(document: &str, offset: usize) -> Option<BlockKind> {
    BlockKind::ALL
        .into_iter()
        .find(|kind| name_at(document, offset + 1, kind.tag_name()))
}

/// Tokenizes the attributes of an opening tag starting at `start`
///
/// Returns the attributes and the offset just past the terminating `>`, or
/// `None` if the tag is never closed. A quoted value whose closing quote never
/// appears does not swallow the rest of the document: the tag then ends at the
/// first `>`.
fn parse_attributes(document: &str, start: usize) -> Option<(Vec<TagAttribute<'_>>, usize)> {
    if let (attributes, Some(tag_end)) = tokenize_attributes(document, start) {
        return Some((attributes, tag_end));
    }

    let gt = start + document[start..].find('>')?;
    let (attributes, _) = tokenize_attributes(&document[..gt], start);
    Some((attributes, gt + 1))
}

/// Attribute tokenizer honouring quotes
///
/// The second value is the offset past the closing `>`, `None` when the text
/// runs out first. An unclosed quoted value runs to the end of `document`.
fn tokenize_attributes(document: &str, start: usize) -> (Vec<TagAttribute<'_>>, Option<usize>) {
    let bytes = document.as_bytes();
    let len = bytes.len();
    let mut attributes = Vec::new();
    let mut i = start;

    loop {
        while i < len && (is_whitespace(bytes[i]) || bytes[i] == b'/') {
            i += 1;
        }
        if i >= len {
            return (attributes, None);
        }
        if bytes[i] == b'>' {
            return (attributes, Some(i + 1));
        }

        let name_start = i;
        while i < len
            && !is_whitespace(bytes[i])
            && bytes[i] != b'='
            && bytes[i] != b'>'
            && bytes[i] != b'/'
        {
            i += 1;
        }
        let name = &document[name_start..i];

        while i < len && is_whitespace(bytes[i]) {
            i += 1;
        }

        let mut value = None;
        if i < len && bytes[i] == b'=' {
            i += 1;
            while i < len && is_whitespace(bytes[i]) {
                i += 1;
            }

            if i < len && (bytes[i] == b'"' || bytes[i] == b'\'') {
                let quote = bytes[i] as char;
                let value_start = i + 1;
                match document[value_start..].find(quote) {
                    Some(found) => {
                        value = Some(&document[value_start..value_start + found]);
                        i = value_start + found + 1;
                    }
                    None => {
                        attributes.push(TagAttribute {
                            name,
                            value: Some(&document[value_start..]),
                        });
                        return (attributes, None);
                    }
                }
            } else if i < len {
                let value_start = i;
                while i < len && !is_whitespace(bytes[i]) && bytes[i] != b'>' {
                    i += 1;
                }
                value = Some(&document[value_start..i]);
            }
        }

        attributes.push(TagAttribute { name, value });
    }
}

/// Finds the nearest `</name\s*>` at or after `from`
///
/// Returns the offset where the closing tag starts and the offset just past it.
fn find_closing_tag(document: &str, from: usize, kind: BlockKind) -> Option<(usize, usize)> {
    let bytes = document.as_bytes();
    let name = kind.tag_name();
    let mut search = from;

    while let Some(found) = document[search..].find("</") {
        let close_start = search + found;
        let name_start = close_start + 2;
        let name_end = name_start + name.len();

        if name_end <= bytes.len() && bytes[name_start..name_end].eq_ignore_ascii_case(name.as_bytes())
        {
            let mut i = name_end;
            while i < bytes.len() && is_whitespace(bytes[i]) {
                i += 1;
            }
            if i < bytes.len() && bytes[i] == b'>' {
                return Some((close_start, i + 1));
            }
        }

        search = close_start + 2;
    }

    None
}
