pub mod csv_io;
pub mod table_loader;

pub use csv_io::{CsvFileWriter, CsvReader, CsvReaderConfig};
pub use table_loader::{LoadedStock, LoadedTransactions, TableLoader};
