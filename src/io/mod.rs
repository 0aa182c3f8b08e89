//! Input/output helpers.
//!
//! - CSV ingest into tables (`ingest`)
//! - CSV header/row-count inspection (`inspect`)
//! - table and sweep exports (`export`)
//! - trajectory JSON read/write (`trajectory`)

pub mod export;
pub mod ingest;
pub mod inspect;
pub mod trajectory;

pub use export::*;
pub use ingest::*;
pub use inspect::*;
pub use trajectory::*;
