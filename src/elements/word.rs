//! Word element.

use super::{Element, ElementId};
use crate::geometry::BoundingBox;
use serde::{Deserialize, Serialize};

/// A positioned word produced upstream by text extraction or OCR.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    /// Stable id
    pub id: ElementId,
    /// 1-based number of the owning page
    pub page: u32,
    /// The word text
    pub text: String,
    /// Bounding box of the word
    pub bbox: BoundingBox,
}

impl Word {
    /// Create a word with a fresh id.
    pub fn new(page: u32, text: impl Into<String>, bbox: BoundingBox) -> Self {
        Self {
            id: ElementId::new(),
            page,
            text: text.into(),
            bbox,
        }
    }
}

impl Element for Word {
    fn id(&self) -> ElementId {
        self.id
    }

    fn page(&self) -> u32 {
        self.page
    }

    fn bbox(&self) -> Option<BoundingBox> {
        Some(self.bbox)
    }
}
