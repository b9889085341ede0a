// Cell, rectangle and block types shared by the field, generator and scheduler

use std::fmt;

/// A grid cell addressed by (row, col)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Inclusive rectangle of cells between two opposite corners.
///
/// `top_left.row <= bottom_right.row` and `top_left.col <= bottom_right.col`
/// always hold; every constructor enforces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRect {
    top_left: Cell,
    bottom_right: Cell,
}

impl CellRect {
    /// Build a rectangle from any two opposite corners
    pub fn new(a: Cell, b: Cell) -> Self {
        Self {
            top_left: Cell::new(a.row.min(b.row), a.col.min(b.col)),
            bottom_right: Cell::new(a.row.max(b.row), a.col.max(b.col)),
        }
    }

    /// 1x1 rectangle covering a single cell
    pub fn single(cell: Cell) -> Self {
        Self {
            top_left: cell,
            bottom_right: cell,
        }
    }

    pub fn top_left(&self) -> Cell {
        self.top_left
    }

    pub fn bottom_right(&self) -> Cell {
        self.bottom_right
    }

    pub fn row_span(&self) -> usize {
        self.bottom_right.row - self.top_left.row + 1
    }

    pub fn col_span(&self) -> usize {
        self.bottom_right.col - self.top_left.col + 1
    }

    pub fn area(&self) -> usize {
        self.row_span() * self.col_span()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        (self.top_left.row..=self.bottom_right.row).contains(&cell.row)
            && (self.top_left.col..=self.bottom_right.col).contains(&cell.col)
    }

    pub fn overlaps(&self, other: &CellRect) -> bool {
        self.top_left.row <= other.bottom_right.row
            && other.top_left.row <= self.bottom_right.row
            && self.top_left.col <= other.bottom_right.col
            && other.top_left.col <= self.bottom_right.col
    }

    /// Row-major iterator over every cell in the rectangle
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let (top, bottom) = (self.top_left.row, self.bottom_right.row);
        let (left, right) = (self.top_left.col, self.bottom_right.col);
        (top..=bottom).flat_map(move |row| (left..=right).map(move |col| Cell::new(row, col)))
    }
}

impl fmt::Display for CellRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..{} [{}x{}]",
            self.top_left,
            self.bottom_right,
            self.row_span(),
            self.col_span()
        )
    }
}

/// Pixel rectangle inside the display box (left/top inclusive edges)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl PixelRect {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// True when the interiors intersect; shared edges do not count
    pub fn overlaps(&self, other: &PixelRect) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }
}

impl fmt::Display for PixelRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RECT({:.1}, {:.1}, {:.1}, {:.1})",
            self.left, self.top, self.right, self.bottom
        )
    }
}

/// One placement unit of a tiling: a cell rectangle plus its display state.
///
/// `H` is the renderer's handle type; it is `Some` exactly while the block
/// is visible.
#[derive(Debug, Clone, PartialEq)]
pub struct Block<H> {
    rect: CellRect,
    visible: bool,
    handle: Option<H>,
}

impl<H> Block<H> {
    pub fn new(rect: CellRect) -> Self {
        Self {
            rect,
            visible: false,
            handle: None,
        }
    }

    pub fn rect(&self) -> CellRect {
        self.rect
    }

    pub fn area(&self) -> usize {
        self.rect.area()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn handle(&self) -> Option<&H> {
        self.handle.as_ref()
    }

    /// Mark the block visible with the handle the renderer gave back
    pub fn show(&mut self, handle: H) {
        self.visible = true;
        self.handle = Some(handle);
    }

    /// Mark the block hidden, returning its display handle
    pub fn hide(&mut self) -> Option<H> {
        self.visible = false;
        self.handle.take()
    }
}
