pub mod processor;
pub mod validator;

pub use processor::{CsvFileWriter, CsvReader, CsvReaderConfig, LoadedStock, LoadedTransactions, TableLoader};
