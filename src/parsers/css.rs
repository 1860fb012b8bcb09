//! CSS 样式统一模块
//!
//! 此模块为样式统一流水线构建样式包（StyleBundle）：一段所有页面共享的样式，
//! 加上按页面标识选择的可选页面专属样式。
//!
//! # 主要功能
//!
//! - **共享样式**: 所有目标页面都使用同一段基础样式
//! - **页面专属样式**: 标识在固定映射中的页面，会在共享样式之后追加自己的样式
//! - **显式配置**: 样式文本通过 [`StyleBundleConfig`] 在构造时传入，而不是全局常量，
//!   测试可以提供合成的样式包
//!
//! # 使用示例
//!
//! ```rust
//! use extricate::parsers::css::{StyleBundleConfig, StyleComposer};
//!
//! let config = StyleBundleConfig::new("body { margin: 0; }")
//!     .with_page("features", "\n.features-list { display: grid; }");
//! let composer = StyleComposer::new(config);
//!
//! assert_eq!(
//!     composer.compose("features"),
//!     "body { margin: 0; }\n.features-list { display: grid; }"
//! );
//! assert_eq!(composer.compose("login"), "body { margin: 0; }");
//! ```

use std::collections::BTreeMap;

/// 内置的共享样式
const BUILTIN_SHARED_STYLE: &str = include_str!("../../styles/shared.css");

/// 内置的页面专属样式，按页面标识索引
const BUILTIN_PAGE_STYLES: &[(&str, &str)] = &[
    (
        "rule_management",
        include_str!("../../styles/pages/rule_management.css"),
    ),
    (
        "proxy_management",
        include_str!("../../styles/pages/proxy_management.css"),
    ),
    ("features", include_str!("../../styles/pages/features.css")),
    (
        "user_settings",
        include_str!("../../styles/pages/user_settings.css"),
    ),
];

/// 样式包配置
///
/// * `shared` - 所有页面共享的样式文本
/// * `pages` - 页面标识到专属样式文本的封闭映射
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StyleBundleConfig {
    pub shared: String,
    pub pages: BTreeMap<String, String>,
}

impl StyleBundleConfig {
    /// 只包含共享样式、没有页面专属样式的配置
    pub fn new(shared: impl Into<String>) -> Self {
        Self {
            shared: shared.into(),
            pages: BTreeMap::new(),
        }
    }

    /// 随程序一起发布的样式包
    pub fn builtin() -> Self {
        BUILTIN_PAGE_STYLES
            .iter()
            .fold(Self::new(BUILTIN_SHARED_STYLE), |config, (identity, text)| {
                config.with_page(*identity, *text)
            })
    }

    /// 添加或替换一个页面的专属样式
    pub fn with_page(mut self, identity: impl Into<String>, text: impl Into<String>) -> Self {
        self.pages.insert(identity.into(), text.into());
        self
    }
}

/// 按页面标识组合样式包，纯函数，无 I/O
#[derive(Clone, Debug)]
pub struct StyleComposer {
    config: StyleBundleConfig,
}

impl StyleComposer {
    pub fn new(config: StyleBundleConfig) -> Self {
        Self { config }
    }

    /// 共享样式，若标识在映射中则再追加其专属样式
    pub fn compose(&self, identity: &str) -> String {
        match self.config.pages.get(identity) {
            Some(page_style) => format!("{}{}", self.config.shared, page_style),
            None => self.config.shared.clone(),
        }
    }

    pub fn has_page_style(&self, identity: &str) -> bool {
        self.config.pages.contains_key(identity)
    }

    pub fn config(&self) -> &StyleBundleConfig {
        &self.config
    }
}

impl Default for StyleComposer {
    fn default() -> Self {
        Self::new(StyleBundleConfig::builtin())
    }
}
