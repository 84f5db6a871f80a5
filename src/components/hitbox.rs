use raylib::prelude::Vector2;

/// Integer hit-box centered on a body's position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitBox {
    pub width: i32,
    pub height: i32,
}

impl HitBox {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn square(size: i32) -> Self {
        Self::new(size, size)
    }

    /// `(x, y, w, h)` of the box for a body centered at `center`.
    /// Coordinates are truncated toward zero before centering.
    pub fn rect(&self, center: Vector2) -> (i32, i32, i32, i32) {
        (
            center.x as i32 - self.width / 2,
            center.y as i32 - self.height / 2,
            self.width,
            self.height,
        )
    }

    /// Strict overlap test: touching edges do not intersect and empty boxes never do.
    pub fn overlaps(&self, center: Vector2, other: &Self, other_center: Vector2) -> bool {
        let (ax, ay, aw, ah) = self.rect(center);
        let (bx, by, bw, bh) = other.rect(other_center);
        if aw <= 0 || ah <= 0 || bw <= 0 || bh <= 0 {
            return false;
        }
        ax < bx + bw && bx < ax + aw && ay < by + bh && by < ay + ah
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_is_centered_and_truncated() {
        let hb = HitBox::square(12);
        assert_eq!(hb.rect(Vector2::new(24.9, 40.2)), (18, 34, 12, 12));
    }

    #[test]
    fn touching_boxes_do_not_overlap() {
        let hb = HitBox::square(16);
        assert!(!hb.overlaps(Vector2::new(8.0, 8.0), &hb, Vector2::new(24.0, 8.0)));
        assert!(hb.overlaps(Vector2::new(8.0, 8.0), &hb, Vector2::new(23.0, 8.0)));
    }

    #[test]
    fn empty_box_never_overlaps() {
        let empty = HitBox::new(0, 10);
        let hb = HitBox::square(16);
        assert!(!empty.overlaps(Vector2::new(8.0, 8.0), &hb, Vector2::new(8.0, 8.0)));
    }

    #[test]
    fn different_sizes_overlap() {
        let boss = HitBox::square(28);
        let shot = HitBox::square(6);
        assert!(boss.overlaps(Vector2::new(100.0, 100.0), &shot, Vector2::new(115.0, 100.0)));
        assert!(!boss.overlaps(Vector2::new(100.0, 100.0), &shot, Vector2::new(117.0, 100.0)));
    }
}
