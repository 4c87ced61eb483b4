//! CSV 檔案寫出器

use super::error::CsvResult;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// CSV 寫出器配置
#[derive(Debug, Clone)]
pub struct CsvWriterConfig {
    pub include_header: bool,
    pub separator: u8,
}

impl Default for CsvWriterConfig {
    fn default() -> Self {
        Self {
            include_header: true,
            separator: b',',
        }
    }
}

/// CSV 寫出器
#[derive(Debug, Clone, Default)]
pub struct CsvFileWriter {
    config: CsvWriterConfig,
}

impl CsvFileWriter {
    pub fn new(config: CsvWriterConfig) -> Self {
        Self { config }
    }

    /// 設定分隔符
    pub fn with_separator(mut self, separator: u8) -> Self {
        self.config.separator = separator;
        self
    }

    /// 寫入檔案（覆寫既有檔案）
    pub fn write_file<P: AsRef<Path>>(&self, df: &mut DataFrame, path: P) -> CsvResult<()> {
        let path = path.as_ref();
        let mut file = File::create(path)?;
        CsvWriter::new(&mut file)
            .include_header(self.config.include_header)
            .with_separator(self.config.separator)
            .finish(df)?;

        debug!("已寫出 {}: {} 列", path.display(), df.height());
        Ok(())
    }

    /// 寫成字串
    pub fn write_string(&self, df: &mut DataFrame) -> CsvResult<String> {
        let mut buffer: Vec<u8> = Vec::new();
        CsvWriter::new(&mut buffer)
            .include_header(self.config.include_header)
            .with_separator(self.config.separator)
            .finish(df)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
