//! # Result Projection
//!
//! Flattens [`MatchRow`](crate::search::MatchRow)s into a CSV table whose
//! header is the union of every sample attribute seen in the result.
//!
//! ## Layout
//!
//! | mtab_exp | mtab_mz | mtab_rt | mtab_annotation | match_exp | match_mz | match_rt | match_annotation | sample | intensity | control | *attributes...* |
//!
//! Attribute columns follow the fixed columns in first-seen order over the
//! (already sorted) rows. Cells of attributes a sample does not carry are
//! empty. An attribute whose name collides with an existing column gets a
//! `_1`, `_2`, ... suffix, so a sample attribute called `control` becomes
//! `control_1`.
//!
//! Numbers use Rust's shortest round-trip formatting, which never switches to
//! scientific notation, so output is byte-for-byte reproducible. A search
//! with no matches yields a header-only table.

mod columns;
mod error;
mod schema;
mod table;


pub use columns::*;
pub use error::ProjectionError;
pub use schema::ColumnSchema;
pub use table::ResultTable;
