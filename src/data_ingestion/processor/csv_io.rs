//! CSV 檔案讀寫模組

pub mod error;
pub mod reader;
pub mod writer;

pub use error::{CsvError, CsvResult};
pub use reader::{CsvReader, CsvReaderConfig};
pub use writer::{CsvFileWriter, CsvWriterConfig};
