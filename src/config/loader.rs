use config::{Config, ConfigError, Environment as ConfigEnvironment, File, Source};
use serde::Deserialize;
use std::env;
use std::path::Path;

/// 選擇環境的環境變數
pub const ENV_VAR: &str = "SALES_ENV";

/// 環境變數覆寫的前綴，例如 `SALES__PIPELINE__PARALLEL=false`
pub const ENV_PREFIX: &str = "SALES";

/// 環境類型枚舉
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// 從環境變數取得當前環境設定
    pub fn from_env() -> Self {
        match env::var(ENV_VAR)
            .unwrap_or_else(|_| "development".into())
            .to_lowercase()
            .as_str()
        {
            "production" => Environment::Production,
            _ => Environment::Development,
        }
    }

    /// 轉換為配置文件名
    pub fn as_filename(&self) -> &'static str {
        match self {
            Environment::Development => "development.toml",
            Environment::Production => "production.toml",
        }
    }
}

/// 配置加載器，負責根據環境加載適當的配置
pub struct ConfigLoader;

impl ConfigLoader {
    /// 載入指定環境的配置
    ///
    /// 配置文件不存在時只套用環境變數，其餘欄位使用預設值。
    pub fn load(env: Environment) -> Result<Config, ConfigError> {
        let config_dir = env::var("CONFIG_DIR").unwrap_or_else(|_| "config".into());
        let config_path = Path::new(&config_dir).join(env.as_filename());
        Self::build(Some(File::from(config_path).required(false)))
    }

    /// 載入指定的配置文件（必須存在）
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        Self::build(Some(File::from(path.as_ref())))
    }

    fn build<S>(file: Option<S>) -> Result<Config, ConfigError>
    where
        S: Source + Send + Sync + 'static,
    {
        let mut config_builder = Config::builder();

        if let Some(file) = file {
            config_builder = config_builder.add_source(file);
        }

        // 從環境變數加載配置（優先級高於文件配置）
        config_builder = config_builder.add_source(
            ConfigEnvironment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        // 構建最終配置
        config_builder.build()
    }
}

/// 配置獲取輔助特性
pub trait ConfigExt {
    /// 從配置中獲取並反序列化指定部分
    fn get_section<'a, T: Deserialize<'a>>(&'a self, section: &str) -> Result<T, ConfigError>;
}

impl ConfigExt for Config {
    fn get_section<'a, T: Deserialize<'a>>(&'a self, section: &str) -> Result<T, ConfigError> {
        self.get(section)
    }
}
