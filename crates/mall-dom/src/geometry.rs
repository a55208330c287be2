//! Geometry
//!
//! Layout boxes in document coordinates. The headless runtime has no layout
//! engine, so boxes are assigned explicitly by whoever builds the page.

/// DOMRect - rectangle geometry
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DOMRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DOMRect {
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Same rect moved by (dx, dy)
    pub fn translate(&self, dx: f64, dy: f64) -> DOMRect {
        DOMRect::from_xywh(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Grow each edge outward by the given amounts (negative shrinks)
    pub fn expand(&self, top: f64, right: f64, bottom: f64, left: f64) -> DOMRect {
        DOMRect::from_xywh(
            self.x - left,
            self.y - top,
            (self.width + left + right).max(0.0),
            (self.height + top + bottom).max(0.0),
        )
    }

    /// Edge-inclusive intersection; touching rects yield a zero-area rect
    pub fn intersection(&self, other: &DOMRect) -> Option<DOMRect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right >= x && bottom >= y {
            Some(DOMRect::from_xywh(x, y, right - x, bottom - y))
        } else {
            None
        }
    }
}

/// Element box state
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ElementGeometry {
    pub offset_top: f64,
    pub offset_left: f64,
    pub offset_width: f64,
    pub offset_height: f64,
}

impl ElementGeometry {
    pub fn from_rect(rect: DOMRect) -> Self {
        Self {
            offset_top: rect.y,
            offset_left: rect.x,
            offset_width: rect.width,
            offset_height: rect.height,
        }
    }

    /// Box in document coordinates
    pub fn document_rect(&self) -> DOMRect {
        DOMRect::from_xywh(
            self.offset_left,
            self.offset_top,
            self.offset_width,
            self.offset_height,
        )
    }

    /// Box relative to the viewport for a given scroll offset
    pub fn bounding_client_rect(&self, scroll_x: f64, scroll_y: f64) -> DOMRect {
        self.document_rect().translate(-scroll_x, -scroll_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dom_rect_edges() {
        let rect = DOMRect::from_xywh(10.0, 20.0, 100.0, 50.0);

        assert_eq!(rect.top(), 20.0);
        assert_eq!(rect.right(), 110.0);
        assert_eq!(rect.bottom(), 70.0);
        assert_eq!(rect.left(), 10.0);
        assert_eq!(rect.area(), 5000.0);
    }

    #[test]
    fn test_intersection() {
        let a = DOMRect::from_xywh(0.0, 0.0, 100.0, 100.0);
        let b = DOMRect::from_xywh(50.0, 50.0, 100.0, 100.0);
        let far = DOMRect::from_xywh(200.0, 200.0, 50.0, 50.0);

        assert_eq!(a.intersection(&b), Some(DOMRect::from_xywh(50.0, 50.0, 50.0, 50.0)));
        assert_eq!(a.intersection(&far), None);

        let touching = DOMRect::from_xywh(0.0, 100.0, 100.0, 10.0);
        assert_eq!(a.intersection(&touching).map(|r| r.area()), Some(0.0));
    }

    #[test]
    fn test_expand_with_negative_margin() {
        let viewport = DOMRect::from_xywh(0.0, 0.0, 800.0, 600.0);
        let shrunk = viewport.expand(0.0, 0.0, -50.0, 0.0);
        assert_eq!(shrunk.bottom(), 550.0);

        let grown = viewport.expand(50.0, 0.0, 50.0, 0.0);
        assert_eq!(grown.top(), -50.0);
        assert_eq!(grown.bottom(), 650.0);
    }

    #[test]
    fn test_bounding_client_rect_follows_scroll() {
        let geometry = ElementGeometry::from_rect(DOMRect::from_xywh(0.0, 900.0, 300.0, 200.0));
        let rect = geometry.bounding_client_rect(0.0, 500.0);
        assert_eq!(rect.top(), 400.0);
        assert_eq!(rect.bottom(), 600.0);
    }
}
