// 集成测试公共模块
//
// 提供临时 Web 目录和断言辅助工具

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// 示例页面：一个样式块、一个内联脚本和一个外部脚本
pub const PAGE1_HTML: &str = r#"<html><head><style>body{color:red}</style></head><body><script>alert(1)</script><script src="/ext.js"></script></body></html>"#;

/// 临时 Web 目录，包含待处理的 HTML 文档
pub struct TestWebDir {
    dir: TempDir,
}

impl TestWebDir {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("failed to create temp dir"),
        }
    }

    pub fn with_document(self, file_name: &str, html: &str) -> Self {
        self.write(file_name, html);
        self
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, relative: &str, content: &str) {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent dir");
        }
        fs::write(path, content).expect("failed to write test file");
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.dir.path().join(relative))
            .unwrap_or_else(|e| panic!("failed to read {relative}: {e}"))
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.dir.path().join(relative).exists()
    }

    pub fn join(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }
}

/// 断言辅助工具
pub struct AssertionHelper;

impl AssertionHelper {
    pub fn count(haystack: &str, needle: &str) -> usize {
        haystack.matches(needle).count()
    }

    pub fn assert_occurs_once(haystack: &str, needle: &str) {
        assert_eq!(
            Self::count(haystack, needle),
            1,
            "expected exactly one {needle:?} in:\n{haystack}"
        );
    }

    pub fn assert_in_order(haystack: &str, needles: &[&str]) {
        let mut from = 0;
        for needle in needles {
            match haystack[from..].find(needle) {
                Some(offset) => from += offset + needle.len(),
                None => panic!("{needle:?} missing or out of order in:\n{haystack}"),
            }
        }
    }
}
