// RecordStore - Session-scoped in-memory records with filtering, aggregation and export

pub mod aggregate;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod import;
pub mod models;
pub mod page;
pub mod record;
pub mod seed;
pub mod store;

// Re-export main types for convenience
pub use aggregate::{AgendaSummary, GroupOp, NormalizedRow, Summary, group_aggregate, normalize};
pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use filter::{Filter, FilterOp, FilterSet, TextSearch};
pub use models::{AgendaDraft, AgendaItem, AgendaKind, Meeting, Product, ProductDraft, sequence_start};
pub use page::{Page, paginate, total_pages};
pub use record::{FieldValue, Record};
pub use seed::baseline_catalog;
pub use store::{Direction, Store};
