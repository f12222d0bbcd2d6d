use std::fmt;

use crate::foundation::error::{PortaError, PortaResult};

/// Handle to a node inside a [`Graph`](crate::Graph).
///
/// The generation changes when a slot is reused, so handles to removed nodes stay invalid.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct NodeId {
    pub index: u32,
    pub generation: u32,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.index)?;
        if self.generation > 0 {
            write!(f, "v{}", self.generation)?;
        }
        Ok(())
    }
}

/// Integer pixel rectangle. `x`/`y` may be negative; `width`/`height` never are once validated.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> PortaResult<Self> {
        if width < 0 || height < 0 {
            return Err(PortaError::InvalidDimension {
                width: i64::from(width),
                height: i64::from(height),
            });
        }
        Ok(Self {
            x,
            y,
            width,
            height,
        })
    }

    /// Rect anchored at the origin.
    pub fn sized(width: u32, height: u32) -> PortaResult<Self> {
        let w = i32::try_from(width).map_err(|_| PortaError::InvalidDimension {
            width: i64::from(width),
            height: i64::from(height),
        })?;
        let h = i32::try_from(height).map_err(|_| PortaError::InvalidDimension {
            width: i64::from(width),
            height: i64::from(height),
        })?;
        Self::new(0, 0, w, h)
    }

    pub fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    // exclusive
    pub fn right(self) -> i64 {
        i64::from(self.x) + i64::from(self.width)
    }

    // exclusive
    pub fn bottom(self) -> i64 {
        i64::from(self.y) + i64::from(self.height)
    }

    pub fn contains(self, x: i64, y: i64) -> bool {
        i64::from(self.x) <= x && x < self.right() && i64::from(self.y) <= y && y < self.bottom()
    }

    pub fn contains_rect(self, other: Rect) -> bool {
        other.is_empty()
            || (self.x <= other.x
                && self.y <= other.y
                && other.right() <= self.right()
                && other.bottom() <= self.bottom())
    }

    pub fn translate(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            ..self
        }
    }

    pub fn intersect(self, other: Rect) -> Rect {
        let x0 = i64::from(self.x).max(i64::from(other.x));
        let y0 = i64::from(self.y).max(i64::from(other.y));
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        if x1 <= x0 || y1 <= y0 {
            return Rect::default();
        }
        Rect {
            x: x0 as i32,
            y: y0 as i32,
            width: (x1 - x0) as i32,
            height: (y1 - y0) as i32,
        }
    }

    /// Smallest rect covering both; empty rects do not contribute.
    pub fn bounding_box(self, other: Rect) -> Rect {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }
        let x0 = self.x.min(other.x);
        let y0 = self.y.min(other.y);
        let x1 = self.right().max(other.right());
        let y1 = self.bottom().max(other.bottom());
        Rect {
            x: x0,
            y: y0,
            width: (x1 - i64::from(x0)).min(i64::from(i32::MAX)) as i32,
            height: (y1 - i64::from(y0)).min(i64::from(i32::MAX)) as i32,
        }
    }

    pub fn pixel_count(self) -> usize {
        if self.is_empty() {
            0
        } else {
            (self.width as usize).saturating_mul(self.height as usize)
        }
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

/// Spatial extent of a node's output, as reported by
/// [`Operation::defined_region`](crate::Operation::defined_region).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Extent {
    Unbounded,
    Bounded(Rect),
}

impl Extent {
    pub fn union(self, other: Extent) -> Extent {
        match (self, other) {
            (Extent::Bounded(a), Extent::Bounded(b)) => Extent::Bounded(a.bounding_box(b)),
            _ => Extent::Unbounded,
        }
    }

    pub fn rect(self) -> Option<Rect> {
        match self {
            Extent::Unbounded => None,
            Extent::Bounded(r) => Some(r),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
