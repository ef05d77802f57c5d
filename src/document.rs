//! Document and page containers.
//!
//! A [`Document`] is an ordered list of [`Page`]s. Each page owns its words in
//! an insertion-ordered store and keeps a flat, ordered element list that the
//! rest of the pipeline reads. The order of that list is processing order,
//! not geometric order.

use crate::elements::{ElementId, PageElement, Table, Word};
use crate::error::{Error, Result};
use crate::geometry::BoundingBox;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// A document being processed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Input file the document was extracted from
    pub path: PathBuf,
    /// Pages in document order
    pub pages: Vec<Page>,
}

impl Document {
    /// Create an empty document for the given input file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pages: Vec::new(),
        }
    }

    /// Input file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a page with the given size and return it for population.
    pub fn add_page(&mut self, width: f32, height: f32) -> &mut Page {
        let number = self.pages.len() as u32 + 1;
        self.pages.push(Page::new(number, width, height));
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    /// Get the number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Get a page by its 1-based number.
    pub fn page(&self, number: u32) -> Option<&Page> {
        self.pages.iter().find(|p| p.number == number)
    }

    /// Get a mutable page by its 1-based number.
    pub fn page_mut(&mut self, number: u32) -> Result<&mut Page> {
        self.pages
            .iter_mut()
            .find(|p| p.number == number)
            .ok_or(Error::PageNotFound(number))
    }

    /// Check if any page holds a table.
    pub fn has_table(&self) -> bool {
        self.pages.iter().any(Page::has_table)
    }

    /// Iterate over every table in the document.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.pages.iter().flat_map(Page::tables)
    }
}

/// A single page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// 1-based page number
    pub number: u32,
    /// Page box (origin at the top-left corner)
    pub bbox: BoundingBox,
    /// Every word of the page, by id
    pub words: IndexMap<ElementId, Word>,
    /// Flat element list in processing order
    pub elements: Vec<PageElement>,
}

impl Page {
    /// Create an empty page.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            bbox: BoundingBox::new(0.0, 0.0, width, height),
            words: IndexMap::new(),
            elements: Vec::new(),
        }
    }

    /// Page height, used to flip detector coordinates.
    pub fn height(&self) -> f32 {
        self.bbox.height
    }

    /// Page width.
    pub fn width(&self) -> f32 {
        self.bbox.width
    }

    /// Add a word to the page store and append it to the element list.
    pub fn add_word(&mut self, text: impl Into<String>, bbox: BoundingBox) -> ElementId {
        let word = Word::new(self.number, text, bbox);
        let id = word.id;
        self.words.insert(id, word);
        self.elements.push(PageElement::Word { id });
        id
    }

    /// Look up a word by id, whether or not it is still listed.
    pub fn word(&self, id: ElementId) -> Option<&Word> {
        self.words.get(&id)
    }

    /// Words still present in the flat element list, in list order.
    pub fn listed_words(&self) -> impl Iterator<Item = &Word> {
        self.elements
            .iter()
            .filter_map(PageElement::as_word_id)
            .filter_map(|id| self.words.get(&id))
    }

    /// Iterate over the tables on this page.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.elements.iter().filter_map(PageElement::as_table)
    }

    /// Check if the page holds a table.
    pub fn has_table(&self) -> bool {
        self.elements.iter().any(PageElement::is_table)
    }

    /// Append a table to the element list.
    pub fn attach_table(&mut self, table: Table) {
        self.elements.push(PageElement::Table(table));
    }

    /// Remove word references whose id is in `ids` from the element list.
    ///
    /// Non-word elements are never removed and the words stay in the store.
    /// Returns the number of removed references.
    pub fn remove_listed_words(&mut self, ids: &HashSet<ElementId>) -> usize {
        let before = self.elements.len();
        self.elements.retain(|element| match element.as_word_id() {
            Some(id) => !ids.contains(&id),
            None => true,
        });
        before - self.elements.len()
    }
}
