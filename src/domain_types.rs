pub mod frame;
pub mod item;
pub mod metric;
pub mod stock;
pub mod transaction;
pub mod types;

pub use frame::SalesFrameExt;
pub use item::{ItemSeries, ItemSummary};
pub use metric::Metric;
pub use stock::{ClassifiedRecord, InventoryMetrics, StockRecord};
pub use transaction::TransactionRow;
pub use types::{normalize_column_name, ColumnName, Tier};
