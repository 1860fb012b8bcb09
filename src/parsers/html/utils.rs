/// ASCII 空白字符
pub const WHITESPACES: &[u8] = b" \t\n\x0c\r";

/// 检查字节是否为 HTML 空白字符
pub fn is_whitespace(byte: u8) -> bool {
    WHITESPACES.contains(&byte)
}
