use crate::math::Vec2;

/// Pixel dimensions.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Size { width, height }
    }
}

/// Screen-space axis-aligned box (`min` is the top-left corner).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb2 {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb2 {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Aabb2 { min, max }
    }

    pub fn from_origin_size(origin: Vec2, size: Size) -> Self {
        Aabb2::new(
            origin,
            Vec2::new(origin.x + size.width, origin.y + size.height),
        )
    }

    /// Tight box around `points`, ignoring non-finite entries.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec2>) -> Option<Self> {
        let mut out: Option<Aabb2> = None;
        for p in points {
            if !p.is_finite() {
                continue;
            }
            out = Some(match out {
                None => Aabb2::new(*p, *p),
                Some(b) => Aabb2::new(
                    Vec2::new(b.min.x.min(p.x), b.min.y.min(p.y)),
                    Vec2::new(b.max.x.max(p.x), b.max.y.max(p.y)),
                ),
            });
        }
        out
    }

    pub fn size(&self) -> Size {
        Size::new(self.max.x - self.min.x, self.max.y - self.min.y)
    }

    /// Closed-interval overlap test: touching edges count as overlapping.
    pub fn intersects(&self, other: &Aabb2) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}
