//! Geometric primitives for table reconstruction.
//!
//! Page space uses a top-left origin with y growing downward. The external
//! table detector reports coordinates with a bottom-left origin; [`flip_y`]
//! converts between the two and every detector coordinate passes through it
//! before entering the document model.

use serde::{Deserialize, Serialize};

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point {
    /// Create a new point.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_tablecraft::geometry::Point;
    ///
    /// let point = Point::new(10.0, 20.0);
    /// assert_eq!(point.x, 10.0);
    /// assert_eq!(point.y, 20.0);
    /// ```
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in page space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// X coordinate of the left edge
    pub left: f32,
    /// Y coordinate of the top edge
    pub top: f32,
    /// Width of the box
    pub width: f32,
    /// Height of the box
    pub height: f32,
}

impl BoundingBox {
    /// Create a new box from its top-left corner and dimensions.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_tablecraft::geometry::BoundingBox;
    ///
    /// let bbox = BoundingBox::new(0.0, 0.0, 100.0, 50.0);
    /// assert_eq!(bbox.right(), 100.0);
    /// assert_eq!(bbox.bottom(), 50.0);
    /// ```
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Create a box from its left/top and right/bottom edges.
    pub fn from_edges(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            width: right - left,
            height: bottom - top,
        }
    }

    /// Convert a detector rectangle to page space.
    ///
    /// `origin` is the bottom-left corner in detector space (y upward).
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_tablecraft::geometry::{BoundingBox, Point};
    ///
    /// // 100pt tall page, 20pt tall box whose bottom sits 10pt above the page bottom
    /// let bbox = BoundingBox::from_bottom_left(Point::new(5.0, 10.0), 30.0, 20.0, 100.0);
    /// assert_eq!(bbox.top, 70.0);
    /// assert_eq!(bbox.bottom(), 90.0);
    /// ```
    pub fn from_bottom_left(origin: Point, width: f32, height: f32, page_height: f32) -> Self {
        Self {
            left: origin.x,
            top: flip_y(origin.y + height, page_height),
            width,
            height,
        }
    }

    /// Convert a detector column span `[x1, x2]` and row span `[y1, y2]`
    /// into a page-space box.
    pub fn from_detector_spans(cols: [f32; 2], rows: [f32; 2], page_height: f32) -> Self {
        let left = cols[0].min(cols[1]);
        let right = cols[0].max(cols[1]);
        let top = flip_y(rows[0].max(rows[1]), page_height);
        let bottom = flip_y(rows[0].min(rows[1]), page_height);
        Self::from_edges(left, top, right, bottom)
    }

    /// Get the right edge x-coordinate.
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    /// Get the bottom edge y-coordinate.
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Compute the area of the box. Degenerate boxes have zero area.
    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox::from_edges(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    /// Intersection rectangle of two boxes, `None` when they do not overlap.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_tablecraft::geometry::BoundingBox;
    ///
    /// let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
    /// let b = BoundingBox::new(5.0, 5.0, 10.0, 10.0);
    /// let overlap = a.overlap(&b).unwrap();
    /// assert_eq!(overlap, BoundingBox::new(5.0, 5.0, 5.0, 5.0));
    ///
    /// let far = BoundingBox::new(50.0, 50.0, 1.0, 1.0);
    /// assert!(a.overlap(&far).is_none());
    /// ```
    pub fn overlap(&self, other: &BoundingBox) -> Option<BoundingBox> {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= left || bottom <= top {
            return None;
        }
        Some(BoundingBox::from_edges(left, top, right, bottom))
    }

    /// Fraction of this box's area covered by `other`. See [`box1_overlap_proportion`].
    pub fn overlap_proportion(&self, other: &BoundingBox) -> f32 {
        box1_overlap_proportion(self, other)
    }
}

/// Convert a y-coordinate between bottom-left and top-left origin.
///
/// Applying it twice with the same page height returns the original value.
///
/// # Examples
///
/// ```
/// use pdf_tablecraft::geometry::flip_y;
///
/// assert_eq!(flip_y(700.0, 792.0), 92.0);
/// assert_eq!(flip_y(flip_y(700.0, 792.0), 792.0), 700.0);
/// ```
#[inline]
pub fn flip_y(y: f32, page_height: f32) -> f32 {
    page_height - y
}

/// Intersection area of `a` and `b` divided by the area of `a`.
///
/// Asymmetric: the denominator is always the first box. Returns a value in
/// `[0, 1]`; zero when the boxes are disjoint or `a` has no area.
///
/// # Examples
///
/// ```
/// use pdf_tablecraft::geometry::{box1_overlap_proportion, BoundingBox};
///
/// let word = BoundingBox::new(10.0, 10.0, 10.0, 10.0);
/// let cell = BoundingBox::new(0.0, 0.0, 100.0, 100.0);
/// assert_eq!(box1_overlap_proportion(&word, &cell), 1.0);
/// assert_eq!(box1_overlap_proportion(&cell, &word), 0.01);
/// ```
pub fn box1_overlap_proportion(a: &BoundingBox, b: &BoundingBox) -> f32 {
    let area = a.area();
    if area <= 0.0 {
        return 0.0;
    }
    match a.overlap(b) {
        Some(intersection) => (intersection.area() / area).clamp(0.0, 1.0),
        None => 0.0,
    }
}
