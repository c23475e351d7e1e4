//! Mapping of source tables to the output entities.
//!
//! - [`family`] - Project rows to families, with [`budget`] and [`status`] helpers
//! - [`document`] - Document rows to original and translated documents
//! - [`event`] - Milestone dates to lifecycle events
//! - [`collection`] - Always empty for this fund
//! - [`pipeline`] - Runs all of the above over one set of tables

pub mod budget;
pub mod collection;
pub mod document;
pub mod event;
pub mod family;
pub mod pipeline;
pub mod status;

pub use budget::get_budgets;
pub use collection::collection;
pub use document::document;
pub use event::{event, EventOrdinals};
pub use family::family;
pub use pipeline::*;
pub use status::calculate_status;
