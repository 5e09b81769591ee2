//! Read-only views derived from record lists
//!
//! Nothing in here mutates records or caches derived values; every count
//! is recomputed from the slice it is handed.

mod category;
mod filter;
mod group;
mod search;
mod stats;

pub use category::*;
pub use filter::*;
pub use group::*;
pub use search::*;
pub use stats::*;
