//! Table reconstruction engine.
//!
//! ```text
//! RawTableDescriptor + Page words
//!     ↓
//! [reconstruct_table] (grid scan, spans, word assignment)
//!     ↓
//! [reconcile_table]   (stream flavor only: heal split cells)
//!     ↓
//! [check_table]       (reject false tables)
//!     ↓
//! Page.attach_table
//!     ↓ (after every pass)
//! [deduplicate_words] (drop consumed words from the flat list)
//! ```

mod dedup;
mod merge;
mod reconstruct;
mod validity;

pub use dedup::{deduplicate_page, deduplicate_words};
pub use merge::{merge_groups, reconcile_table};
pub use reconstruct::{reconstruct_table, ReconstructionOptions, DEFAULT_WORD_OVERLAP_THRESHOLD};
pub use validity::{check_table, is_valid_table, AdjacencyRounding, Rejection};
