pub mod coerce;
pub mod columns;
pub mod error;
pub mod export;
pub mod import;

pub use error::{ImporterError, Result};
pub use export::export_csv;
pub use import::{parse_csv, ImportReport};
