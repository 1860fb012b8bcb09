//! 配置管理
//!
//! 配置来源按优先级从低到高：内置默认值、配置文件、环境变量、命令行参数。

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::{ExtricateError, ExtricateOptions, ExtricateResult};
use crate::env::{paths, EnvVar};
use crate::parsers::css::StyleBundleConfig;
use crate::utils::fs::{read_document, validate_identity};

/// 配置常量
pub mod constants {
    pub const CONFIG_PATHS: &[&str] = &[
        "extricate.toml",
        ".extricate.toml",
        "~/.config/extricate/config.toml",
    ];

    pub const DEFAULT_WEB_DIR: &str = "lua/web";

    /// 样式统一流水线默认处理的页面
    pub const DEFAULT_UNIFY_TARGETS: &[&str] = &[
        "rule_management",
        "proxy_management",
        "features",
        "user_settings",
    ];
}

/// 样式统一配置
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct UnifyConfig {
    /// 需要统一样式的页面标识
    pub targets: Vec<String>,
    /// 替换内置共享样式的文件
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_style: Option<PathBuf>,
    /// 页面标识到专属样式文件，覆盖或补充内置样式
    pub page_styles: BTreeMap<String, PathBuf>,
}

impl Default for UnifyConfig {
    fn default() -> Self {
        Self {
            targets: constants::DEFAULT_UNIFY_TARGETS
                .iter()
                .map(|target| target.to_string())
                .collect(),
            shared_style: None,
            page_styles: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ExtricateConfig {
    pub web_dir: PathBuf,
    pub unify: UnifyConfig,
}

impl Default for ExtricateConfig {
    fn default() -> Self {
        Self {
            web_dir: PathBuf::from(constants::DEFAULT_WEB_DIR),
            unify: UnifyConfig::default(),
        }
    }
}

impl ExtricateConfig {
    /// 加载配置：显式路径 > `EXTRICATE_CONFIG` > 搜索路径 > 默认值，然后应用环境变量覆盖并验证
    pub fn load(explicit_path: Option<&Path>) -> ExtricateResult<Self> {
        let env_path = paths::ConfigPath::lookup().map_err(|e| ExtricateError::Config(e.to_string()))?;

        let mut config = match explicit_path.map(Path::to_path_buf).or(env_path) {
            Some(path) => {
                if !path.exists() {
                    return Err(ExtricateError::Config(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                Self::load_from_file(&path)?
            }
            None => Self::search()?,
        };

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    fn search() -> ExtricateResult<Self> {
        for path in constants::CONFIG_PATHS {
            let expanded_path = shellexpand::tilde(path);
            let candidate = Path::new(expanded_path.as_ref());
            if candidate.exists() {
                return Self::load_from_file(candidate);
            }
        }

        info!("no config file found, using defaults");
        Ok(Self::default())
    }

    /// 从指定文件加载配置
    pub fn load_from_file(path: &Path) -> ExtricateResult<Self> {
        info!(path = %path.display(), "loading config file");
        let content = fs::read_to_string(path).map_err(|e| {
            ExtricateError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;

        toml::from_str(&content).map_err(|e| {
            ExtricateError::Config(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    /// 应用环境变量覆盖
    pub fn apply_env_overrides(&mut self) -> ExtricateResult<()> {
        if let Some(web_dir) =
            paths::WebDir::lookup().map_err(|e| ExtricateError::Config(e.to_string()))?
        {
            info!(web_dir = %web_dir.display(), "web_dir overridden by environment");
            self.web_dir = web_dir;
        }
        Ok(())
    }

    /// 验证配置
    pub fn validate(&self) -> ExtricateResult<()> {
        if self.web_dir.as_os_str().is_empty() {
            return Err(ExtricateError::Config("web_dir must not be empty".to_string()));
        }

        for identity in self.unify.targets.iter().chain(self.unify.page_styles.keys()) {
            validate_identity(identity)
                .map_err(|e| ExtricateError::Config(format!("unify: {e}")))?;
        }

        Ok(())
    }

    /// 构建样式包：以内置样式为基础，再用配置中的文件覆盖
    pub fn style_bundle(&self) -> ExtricateResult<StyleBundleConfig> {
        let mut bundle = StyleBundleConfig::builtin();

        if let Some(path) = &self.unify.shared_style {
            bundle.shared = read_document(path)?;
        }
        for (identity, path) in &self.unify.page_styles {
            bundle = bundle.with_page(identity.clone(), read_document(path)?);
        }

        Ok(bundle)
    }

    pub fn options(&self, silent: bool) -> ExtricateOptions {
        ExtricateOptions {
            web_dir: self.web_dir.clone(),
            silent,
        }
    }

    /// 生成示例配置文件
    pub fn generate_example_config(path: &Path) -> ExtricateResult<()> {
        let content = toml::to_string_pretty(&Self::default())
            .map_err(|e| ExtricateError::Config(format!("failed to serialize config: {}", e)))?;

        fs::write(path, content).map_err(|source| ExtricateError::WriteFailure {
            path: path.to_path_buf(),
            source,
        })
    }
}
