//! Removal of words already consumed by table cells.

use crate::document::{Document, Page};
use crate::elements::{ElementId, Table};
use std::collections::HashSet;

/// Drop every listed word of `page` that a table cell on the same page
/// references. Returns the number of removed word references.
///
/// The words stay in the page's word store, reachable through their cells.
pub fn deduplicate_page(page: &mut Page) -> usize {
    let consumed: HashSet<ElementId> = page.tables().flat_map(Table::word_ids).collect();
    if consumed.is_empty() {
        return 0;
    }
    page.remove_listed_words(&consumed)
}

/// Run [`deduplicate_page`] over every page of the document.
pub fn deduplicate_words(document: &mut Document) -> usize {
    document.pages.iter_mut().map(deduplicate_page).sum()
}
