//! 统一的环境变量管理系统
//!
//! 提供类型安全、可验证的环境变量访问，配置文件加载后再用这些变量覆盖

use std::env;
use std::fmt;
use std::path::PathBuf;

use tracing::Level;

/// 环境变量解析错误
#[derive(Debug, Clone)]
pub struct EnvError {
    pub variable: String,
    pub message: String,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Environment variable '{}': {}", self.variable, self.message)
    }
}

impl std::error::Error for EnvError {}

pub type EnvResult<T> = Result<T, EnvError>;

/// 环境变量访问器特性
pub trait EnvVar<T> {
    const NAME: &'static str;
    const DEFAULT: Option<T>;
    const DESCRIPTION: &'static str;

    fn parse(value: &str) -> EnvResult<T>;

    /// 变量未设置时返回 `Ok(None)`，设置了但无效时返回错误
    fn lookup() -> EnvResult<Option<T>> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value).map(Some),
            Err(_) => Ok(None),
        }
    }

    fn get() -> EnvResult<T> {
        match Self::lookup()? {
            Some(value) => Ok(value),
            None => Self::DEFAULT.ok_or_else(|| EnvError {
                variable: Self::NAME.to_string(),
                message: "Required environment variable not set".to_string(),
            }),
        }
    }

    fn get_or_default(default: T) -> T {
        Self::get().unwrap_or(default)
    }
}

/// 核心环境变量定义
pub mod core {
    use super::*;

    /// 日志级别
    pub struct LogLevel;
    impl EnvVar<Level> for LogLevel {
        const NAME: &'static str = "EXTRICATE_LOG_LEVEL";
        const DEFAULT: Option<Level> = Some(Level::WARN);
        const DESCRIPTION: &'static str = "Log level: trace, debug, info, warn, error";

        fn parse(value: &str) -> EnvResult<Level> {
            match value.trim().to_lowercase().as_str() {
                "trace" => Ok(Level::TRACE),
                "debug" => Ok(Level::DEBUG),
                "info" => Ok(Level::INFO),
                "warn" => Ok(Level::WARN),
                "error" => Ok(Level::ERROR),
                _ => Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!(
                        "Invalid log level '{}'. Use: trace, debug, info, warn, error",
                        value
                    ),
                }),
            }
        }
    }

    /// 禁用颜色输出
    pub struct NoColor;
    impl EnvVar<bool> for NoColor {
        const NAME: &'static str = "NO_COLOR";
        const DEFAULT: Option<bool> = Some(false);
        const DESCRIPTION: &'static str = "Disable colored output when set to any value";

        fn parse(value: &str) -> EnvResult<bool> {
            // NO_COLOR 遵循标准：任何值都表示禁用颜色
            Ok(!value.is_empty())
        }
    }
}

/// 路径相关环境变量
pub mod paths {
    use super::*;

    /// HTML 文档目录
    pub struct WebDir;
    impl EnvVar<PathBuf> for WebDir {
        const NAME: &'static str = "EXTRICATE_WEB_DIR";
        const DEFAULT: Option<PathBuf> = None;
        const DESCRIPTION: &'static str = "Directory containing the HTML documents";

        fn parse(value: &str) -> EnvResult<PathBuf> {
            parse_path(value, Self::NAME)
        }
    }

    /// 配置文件路径
    pub struct ConfigPath;
    impl EnvVar<PathBuf> for ConfigPath {
        const NAME: &'static str = "EXTRICATE_CONFIG";
        const DEFAULT: Option<PathBuf> = None;
        const DESCRIPTION: &'static str = "Path of the configuration file";

        fn parse(value: &str) -> EnvResult<PathBuf> {
            parse_path(value, Self::NAME)
        }
    }
}

/// 辅助函数
fn parse_path(value: &str, var_name: &str) -> EnvResult<PathBuf> {
    let value = value.trim();
    if value.is_empty() {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: "Path must not be empty".to_string(),
        });
    }

    shellexpand::full(value)
        .map(|expanded| PathBuf::from(expanded.as_ref()))
        .map_err(|e| EnvError {
            variable: var_name.to_string(),
            message: format!("Failed to expand path: {}", e),
        })
}

fn describe<T, V: EnvVar<T>>(docs: &mut String, default: &str) {
    docs.push_str(&format!(
        "- `{}`: {} (default: {})\n",
        V::NAME,
        V::DESCRIPTION,
        default
    ));
}

/// 环境变量文档生成器
pub fn generate_env_docs() -> String {
    let mut docs = String::new();
    docs.push_str("# Environment Variables Documentation\n\n");

    docs.push_str("## Core Configuration\n\n");
    describe::<Level, core::LogLevel>(&mut docs, "warn");
    describe::<bool, core::NoColor>(&mut docs, "unset");

    docs.push_str("\n## Paths\n\n");
    describe::<PathBuf, paths::WebDir>(&mut docs, "from configuration");
    describe::<PathBuf, paths::ConfigPath>(&mut docs, "search extricate.toml, .extricate.toml, ~/.config/extricate/config.toml");

    docs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(core::LogLevel::parse("debug").unwrap(), Level::DEBUG);
        assert_eq!(core::LogLevel::parse("WARN").unwrap(), Level::WARN);
        assert_eq!(core::LogLevel::parse(" info ").unwrap(), Level::INFO);

        let error = core::LogLevel::parse("loud").unwrap_err();
        assert_eq!(error.variable, "EXTRICATE_LOG_LEVEL");
    }

    #[test]
    fn test_no_color_parsing() {
        assert!(core::NoColor::parse("1").unwrap());
        assert!(!core::NoColor::parse("").unwrap());
    }

    #[test]
    fn test_path_parsing() {
        assert_eq!(
            paths::WebDir::parse("lua/web").unwrap(),
            PathBuf::from("lua/web")
        );
        assert!(paths::WebDir::parse("   ").is_err());
    }

    #[test]
    fn test_env_docs_list_every_variable() {
        let docs = generate_env_docs();

        for name in [
            core::LogLevel::NAME,
            core::NoColor::NAME,
            paths::WebDir::NAME,
            paths::ConfigPath::NAME,
        ] {
            assert!(docs.contains(name), "{name} missing from docs");
        }
    }
}
