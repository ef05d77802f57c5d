//! Configuration for a single detection pass.

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Table detection strategy used by the external detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Flavor {
    /// Ruled-line based detection (default)
    #[default]
    Lattice,
    /// Text-density based detection; geometry is less reliable and the
    /// detector also reports the expected cell text
    Stream,
}

impl Flavor {
    /// Parse a flavor name, falling back to [`Flavor::Lattice`] with a
    /// warning when the value is not recognised.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_tablecraft::extractor::Flavor;
    ///
    /// assert_eq!(Flavor::from_str_lossy("stream"), Flavor::Stream);
    /// assert_eq!(Flavor::from_str_lossy("LATTICE"), Flavor::Lattice);
    /// assert_eq!(Flavor::from_str_lossy("hybrid"), Flavor::Lattice);
    /// ```
    pub fn from_str_lossy(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "lattice" => Flavor::Lattice,
            "stream" => Flavor::Stream,
            other => {
                log::warn!("Unsupported table flavor '{}', falling back to lattice", other);
                Flavor::Lattice
            },
        }
    }

    /// Name passed to the detector.
    pub fn as_str(&self) -> &'static str {
        match self {
            Flavor::Lattice => "lattice",
            Flavor::Stream => "stream",
        }
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Flavor {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Flavor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Flavor::from_str_lossy(&value))
    }
}

/// Which pages a pass asks the detector to process.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "PageSelectionRepr", into = "PageSelectionRepr")]
pub enum PageSelection {
    /// Every page of the document
    #[default]
    All,
    /// Explicit 1-based page numbers
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Select explicit pages. An empty list selects all pages.
    pub fn pages(pages: impl IntoIterator<Item = u32>) -> Self {
        let pages: Vec<u32> = pages.into_iter().collect();
        if pages.is_empty() {
            PageSelection::All
        } else {
            PageSelection::Pages(pages)
        }
    }

    /// Check if a 1-based page number is selected.
    pub fn contains(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Pages(pages) => pages.contains(&page),
        }
    }

    /// Render in the detector's command-line form (`all` or `1,3,4`).
    pub fn to_arg(&self) -> String {
        match self {
            PageSelection::All => "all".to_string(),
            PageSelection::Pages(pages) => pages
                .iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum PageSelectionRepr {
    Keyword(String),
    List(Vec<u32>),
}

impl TryFrom<PageSelectionRepr> for PageSelection {
    type Error = String;

    fn try_from(repr: PageSelectionRepr) -> std::result::Result<Self, Self::Error> {
        match repr {
            PageSelectionRepr::Keyword(k) if k.eq_ignore_ascii_case("all") => Ok(PageSelection::All),
            PageSelectionRepr::Keyword(k) => Err(format!("unknown page selection '{}'", k)),
            PageSelectionRepr::List(pages) if pages.contains(&0) => {
                Err("page numbers are 1-based".to_string())
            },
            PageSelectionRepr::List(pages) => Ok(PageSelection::pages(pages)),
        }
    }
}

impl From<PageSelection> for PageSelectionRepr {
    fn from(selection: PageSelection) -> Self {
        match selection {
            PageSelection::All => PageSelectionRepr::Keyword("all".to_string()),
            PageSelection::Pages(pages) => PageSelectionRepr::List(pages),
        }
    }
}

/// An explicit region to search for tables, in detector space
/// (bottom-left origin): `x1,y1` is the top-left corner, `x2,y2` the
/// bottom-right corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TableArea {
    /// Left edge
    pub x1: f32,
    /// Top edge
    pub y1: f32,
    /// Right edge
    pub x2: f32,
    /// Bottom edge
    pub y2: f32,
}

impl TableArea {
    /// Create a table area.
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Render in the detector's command-line form (`x1,y1,x2,y2`).
    pub fn to_arg(&self) -> String {
        format!("{},{},{},{}", self.x1, self.y1, self.x2, self.y2)
    }
}

/// Configuration of one detection pass.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Pages to process
    pub pages: PageSelection,
    /// Detection flavor
    pub flavor: Flavor,
    /// Optional explicit table regions
    pub table_areas: Option<Vec<TableArea>>,
}

impl ExtractionConfig {
    /// Create a configuration with defaults (all pages, lattice).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pages to process.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }

    /// Set the detection flavor.
    pub fn with_flavor(mut self, flavor: Flavor) -> Self {
        self.flavor = flavor;
        self
    }

    /// Restrict detection to explicit regions.
    pub fn with_table_areas(mut self, areas: Vec<TableArea>) -> Self {
        self.table_areas = Some(areas);
        self
    }

    /// Check the configuration before handing it to a detector.
    pub fn validate(&self) -> Result<()> {
        if let PageSelection::Pages(pages) = &self.pages {
            if pages.contains(&0) {
                return Err(Error::InvalidConfig("page numbers are 1-based".to_string()));
            }
        }
        if let Some(areas) = &self.table_areas {
            if let Some(area) = areas.iter().find(|a| a.x2 <= a.x1 || a.y1 <= a.y2) {
                return Err(Error::InvalidConfig(format!(
                    "table area {} is empty",
                    area.to_arg()
                )));
            }
        }
        Ok(())
    }
}
