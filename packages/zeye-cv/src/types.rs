/// An axis-aligned box `(x1, y1)`-`(x2, y2)` in frame pixel coordinates.
///
/// `x1 <= x2` and `y1 <= y2` always hold. "Nothing found" is never a zeroed box,
/// callers use `Option<BoundingBox>` for that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl BoundingBox {
    /// Builds a box from two opposite corners, ordering the coordinates.
    pub fn from_corners(a: (i32, i32), b: (i32, i32)) -> Self {
        Self {
            x1: a.0.min(b.0),
            y1: a.1.min(b.1),
            x2: a.0.max(b.0),
            y2: a.1.max(b.1),
        }
    }

    /// A box anchored at its top-left corner.
    pub fn from_xywh(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self::from_corners((x, y), (x + width as i32, y + height as i32))
    }

    pub fn width(&self) -> u32 {
        (self.x2 - self.x1) as u32
    }

    pub fn height(&self) -> u32 {
        (self.y2 - self.y1) as u32
    }

    /// Integer centre, `((x1 + x2) / 2, (y1 + y2) / 2)`.
    pub fn center(&self) -> (i32, i32) {
        ((self.x1 + self.x2) / 2, (self.y1 + self.y2) / 2)
    }
}
