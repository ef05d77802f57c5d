//! Document model elements.
//!
//! Every element carries a stable [`ElementId`], the number of the page that
//! owns it and a [`BoundingBox`](crate::geometry::BoundingBox) in page space.
//!
//! ## Ownership
//!
//! Words are owned by their [`Page`](crate::document::Page). The page's flat
//! element list refers to them by id, and table cells refer to them by id as
//! well, so removing a word from the flat list never loses it: it stays
//! reachable through the cell that consumed it.
//!
//! ```text
//! Page
//!  ├── words: id → Word           (owning store)
//!  └── elements: [PageElement]    (flat, insertion ordered)
//!        ├── Word(id) ──────────────┐
//!        └── Table                  │
//!              └── TableRow         │
//!                    ├── TableCell { content: [id] }
//!                    └── SpannedTableCell
//! ```

mod table;
mod word;

pub use table::{RowItem, SpanDirection, SpannedTableCell, Table, TableCell, TableRow};
pub use word::Word;

use crate::geometry::BoundingBox;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique element identifier (UUID-based).
///
/// Stable for the lifetime of a [`Document`](crate::document::Document).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(Uuid);

impl ElementId {
    /// Generate a new unique element ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An element in a page's flat element list.
///
/// Words are stored by id; the word itself lives in the page's word store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PageElement {
    /// Reference to a word owned by the page
    Word {
        /// Id of the referenced word
        id: ElementId,
    },
    /// A reconstructed table
    Table(Table),
}

impl PageElement {
    /// Id of the element.
    pub fn id(&self) -> ElementId {
        match self {
            PageElement::Word { id } => *id,
            PageElement::Table(t) => t.id,
        }
    }

    /// Check if this is a word reference.
    pub fn is_word(&self) -> bool {
        matches!(self, PageElement::Word { .. })
    }

    /// Check if this is a table.
    pub fn is_table(&self) -> bool {
        matches!(self, PageElement::Table(_))
    }

    /// Get the referenced word id if this is a word.
    pub fn as_word_id(&self) -> Option<ElementId> {
        match self {
            PageElement::Word { id } => Some(*id),
            _ => None,
        }
    }

    /// Get as table if this is a table element.
    pub fn as_table(&self) -> Option<&Table> {
        match self {
            PageElement::Table(t) => Some(t),
            _ => None,
        }
    }
}

/// Common element capability: identity, owning page and geometry.
pub trait Element {
    /// Stable unique id.
    fn id(&self) -> ElementId;
    /// 1-based number of the owning page.
    fn page(&self) -> u32;
    /// Bounding box in page space, if the element has geometry.
    fn bbox(&self) -> Option<BoundingBox>;
}
