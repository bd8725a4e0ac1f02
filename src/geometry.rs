use web_sys::Element;

use crate::query;

/// A pointer position in viewport coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Viewport-relative bounding box, mirroring `DOMRect`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub width: f64,
    pub height: f64,
    pub x: f64,
    pub y: f64,
}

/// Which edges of a target rect have crossed outside a container rect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BoundaryOverflow {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl BoundaryOverflow {
    pub fn any(&self) -> bool {
        self.left || self.right || self.top || self.bottom
    }
}

pub fn bounding_box(element: &Element) -> Rect {
    let rect = element.get_bounding_client_rect();
    Rect {
        left: rect.left(),
        top: rect.top(),
        right: rect.right(),
        bottom: rect.bottom(),
        width: rect.width(),
        height: rect.height(),
        x: rect.x(),
        y: rect.y(),
    }
}

pub fn rects_equal(a: &Rect, b: &Rect) -> bool {
    a.left == b.left
        && a.top == b.top
        && a.right == b.right
        && a.bottom == b.bottom
        && a.width == b.width
        && a.height == b.height
        && a.x == b.x
        && a.y == b.y
}

/// Strict inequality on every edge: a target flush with the container
/// boundary has not overflowed it.
pub fn boundary_overflow(target: &Rect, container: &Rect) -> BoundaryOverflow {
    BoundaryOverflow {
        left: target.left < container.left,
        right: target.right > container.right,
        top: target.top < container.top,
        bottom: target.bottom > container.bottom,
    }
}

/// Index of `element` among its siblings, counting only preceding siblings
/// that match `filter` when one is given. Returns -1 for a parentless element.
pub fn sibling_index(element: &Element, filter: Option<&str>) -> i32 {
    let Some(parent) = element.parent_element() else {
        return -1;
    };
    let children = parent.children();
    let mut index = 0;
    for i in 0..children.length() {
        let Some(child) = children.item(i) else {
            break;
        };
        if &child == element {
            break;
        }
        let counted = match filter {
            Some(selector) => query::selector_matches(&child, selector, Some(&parent)),
            None => true,
        };
        if counted {
            index += 1;
        }
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(left: f64, top: f64, right: f64, bottom: f64) -> Rect {
        Rect {
            left,
            top,
            right,
            bottom,
            width: right - left,
            height: bottom - top,
            x: left,
            y: top,
        }
    }

    #[test]
    fn identical_rects_are_equal() {
        let a = rect(1.0, 2.0, 31.0, 42.0);
        assert!(rects_equal(&a, &a.clone()));
    }

    #[test]
    fn rects_differ_on_any_field() {
        let a = rect(1.0, 2.0, 31.0, 42.0);
        let mut b = a;
        b.top += 0.5;
        b.bottom += 0.5;
        assert!(!rects_equal(&a, &b));
    }

    #[test]
    fn fully_contained_target_reports_no_overflow() {
        let container = rect(0.0, 0.0, 100.0, 100.0);
        let target = rect(10.0, 10.0, 90.0, 90.0);
        assert_eq!(
            boundary_overflow(&target, &container),
            BoundaryOverflow::default()
        );
    }

    #[test]
    fn flush_edges_do_not_overflow() {
        let container = rect(0.0, 0.0, 100.0, 100.0);
        let target = rect(0.0, 0.0, 100.0, 100.0);
        assert!(!boundary_overflow(&target, &container).any());
    }

    #[test]
    fn each_edge_overflows_independently() {
        let container = rect(0.0, 0.0, 100.0, 100.0);

        let overflow = boundary_overflow(&rect(-0.1, 10.0, 50.0, 50.0), &container);
        assert!(overflow.left);
        assert!(!overflow.right && !overflow.top && !overflow.bottom);

        let overflow = boundary_overflow(&rect(10.0, -5.0, 120.0, 50.0), &container);
        assert!(overflow.right && overflow.top);
        assert!(!overflow.left && !overflow.bottom);

        let overflow = boundary_overflow(&rect(10.0, 10.0, 50.0, 100.5), &container);
        assert!(overflow.bottom);
    }
}
