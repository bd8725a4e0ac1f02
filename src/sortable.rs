use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, DragEvent, Element, Event, HtmlElement, MouseEvent};

use crate::animate::AnimationManager;
use crate::direction::{drag_direction, Direction};
use crate::geometry::{self, Point, Rect};
use crate::query;

pub const CONTAINER_CLASS: &str = "naraberu-container";
pub const PREVIEW_CLASS: &str = "naraberu-preview";

const PREVIEW_ORIGIN_X_ATTR: &str = "data-naraberu-x";
const PREVIEW_ORIGIN_Y_ATTR: &str = "data-naraberu-y";
const DEFAULT_DRAG_SELECTOR: &str = ">*";
const AUTO_SCROLL_RATIO: f64 = 1.1;

/// The container a controller attaches to: a selector resolved once at
/// construction, or an element handed over directly.
pub enum ContainerRef {
    Selector(String),
    Element(Element),
}

impl From<&str> for ContainerRef {
    fn from(selector: &str) -> Self {
        ContainerRef::Selector(selector.to_string())
    }
}

impl From<String> for ContainerRef {
    fn from(selector: String) -> Self {
        ContainerRef::Selector(selector)
    }
}

impl From<Element> for ContainerRef {
    fn from(element: Element) -> Self {
        ContainerRef::Element(element)
    }
}

impl From<HtmlElement> for ContainerRef {
    fn from(element: HtmlElement) -> Self {
        ContainerRef::Element(element.into())
    }
}

/// Result of a completed drag, reported through `on_end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortEnd {
    pub old_index: i32,
    pub new_index: i32,
}

pub struct SortableOptions {
    pub container: ContainerRef,
    /// Which children are drag items. A leading `>` restricts the match to
    /// direct children of the container; defaults to every direct child.
    pub drag_selector: Option<String>,
    /// Use the pointer-event family instead of mouse events for press/move/up.
    /// Fixed for the lifetime of the instance.
    pub support_pointer: bool,
    /// Settle duration in milliseconds. Absent disables the sibling reflow
    /// animation, the floating preview and its settle easing.
    pub animation: Option<f64>,
    /// Invoked once per completed drag with the item's old and new index.
    pub on_end: Option<Rc<dyn Fn(SortEnd)>>,
}

impl SortableOptions {
    pub fn new(container: impl Into<ContainerRef>) -> Self {
        Self {
            container: container.into(),
            drag_selector: None,
            support_pointer: false,
            animation: None,
            on_end: None,
        }
    }
}

struct DragSession {
    drag_el: HtmlElement,
    start_index: i32,
    start_point: Point,
    start_rect: Rect,
    last_point: Option<Point>,
    preview: Option<HtmlElement>,
    // Dropping these detaches them, so teardown is take-and-drop.
    listeners: Vec<EventListener>,
}

struct SettleState {
    preview: HtmlElement,
    drag_el: HtmlElement,
    _listener: EventListener,
}

struct Inner {
    container: Element,
    document: Document,
    drag_selector: String,
    support_pointer: bool,
    animation: Option<f64>,
    on_end: Option<Rc<dyn Fn(SortEnd)>>,
    native_drag: bool,
    animator: RefCell<AnimationManager>,
    session: RefCell<Option<DragSession>>,
    settling: RefCell<Option<SettleState>>,
    press: RefCell<Option<EventListener>>,
}

/// Drag-to-reorder controller over one container of sibling items.
///
/// Press a drag item, move over its siblings, and the list reorders live;
/// with `animation` configured a floating preview follows the pointer and
/// settles into the item's final slot on drop. A controller whose container
/// cannot be resolved is inert: every operation is a no-op.
pub struct Sortable {
    inner: Option<Rc<Inner>>,
}

impl Sortable {
    pub fn new(options: SortableOptions) -> Self {
        let Some(document) = web_sys::window().and_then(|window| window.document()) else {
            gloo::console::warn!("naraberu: no document; instance is inert");
            return Self { inner: None };
        };
        let container = match &options.container {
            ContainerRef::Selector(selector) => {
                document.query_selector(selector).ok().flatten()
            }
            ContainerRef::Element(element) => Some(element.clone()),
        };
        let Some(container) = container else {
            gloo::console::warn!("naraberu: container not found; instance is inert");
            return Self { inner: None };
        };
        let _ = container.class_list().add_1(CONTAINER_CLASS);

        let drag_selector = options
            .drag_selector
            .unwrap_or_else(|| DEFAULT_DRAG_SELECTOR.to_string());
        let animator = AnimationManager::new(container.clone(), &drag_selector, options.animation);
        let inner = Rc::new(Inner {
            container,
            document: document.clone(),
            drag_selector,
            support_pointer: options.support_pointer,
            animation: options.animation,
            on_end: options.on_end,
            native_drag: supports_native_drag(&document),
            animator: RefCell::new(animator),
            session: RefCell::new(None),
            settling: RefCell::new(None),
            press: RefCell::new(None),
        });

        let press_type = if inner.support_pointer {
            "pointerdown"
        } else {
            "mousedown"
        };
        let weak = Rc::downgrade(&inner);
        let press = EventListener::new(&inner.container, press_type, move |event| {
            if let Some(inner) = weak.upgrade() {
                handle_start(&inner, event);
            }
        });
        *inner.press.borrow_mut() = Some(press);

        Self { inner: Some(inner) }
    }

    /// True when the container could not be resolved at construction.
    pub fn is_inert(&self) -> bool {
        self.inner.is_none()
    }

    /// True while a drag session is live (between press-start and drop).
    pub fn is_dragging(&self) -> bool {
        self.inner
            .as_ref()
            .map(|inner| inner.session.borrow().is_some())
            .unwrap_or(false)
    }

    /// Tears down any live session or pending settle: detaches the per-session
    /// listeners, removes the preview, and restores the dragged item. Safe to
    /// call at any time, any number of times; the host should call this before
    /// removing the container mid-drag.
    pub fn abort(&self) {
        let Some(inner) = &self.inner else {
            return;
        };
        if let Some(session) = inner.session.borrow_mut().take() {
            if let Some(preview) = &session.preview {
                preview.remove();
            }
            let _ = session.drag_el.style().remove_property("visibility");
            drop(session.listeners);
        }
        if let Some(settle) = inner.settling.borrow_mut().take() {
            settle.preview.remove();
            let _ = settle.drag_el.style().remove_property("visibility");
        }
    }
}

impl Drop for Sortable {
    fn drop(&mut self) {
        self.abort();
    }
}

// 'draggable' on a freshly created element marks native drag-and-drop support.
fn supports_native_drag(document: &Document) -> bool {
    let Ok(probe) = document.create_element("div") else {
        return false;
    };
    let probe: &JsValue = probe.as_ref();
    js_sys::Reflect::has(probe, &JsValue::from_str("draggable")).unwrap_or(false)
}

fn event_point(event: &Event) -> Option<Point> {
    let mouse = event.dyn_ref::<MouseEvent>()?;
    Some(Point {
        x: f64::from(mouse.client_x()),
        y: f64::from(mouse.client_y()),
    })
}

fn handle_start(inner: &Rc<Inner>, event: &Event) {
    if inner.session.borrow().is_some() {
        return;
    }
    let Some(item) =
        query::closest_item(event.target(), &inner.drag_selector, &inner.container)
    else {
        return;
    };
    let Ok(drag_el) = item.dyn_into::<HtmlElement>() else {
        return;
    };
    let Some(start_point) = event_point(event) else {
        return;
    };
    let start_rect = geometry::bounding_box(&drag_el);
    let start_index = geometry::sibling_index(&drag_el, Some(&inner.drag_selector));

    let mut listeners = Vec::new();
    let options = EventListenerOptions {
        passive: false,
        ..EventListenerOptions::default()
    };
    if inner.native_drag {
        let _ = drag_el.set_attribute("draggable", "true");
        for event_type in ["dragenter", "dragover"] {
            let weak = Rc::downgrade(inner);
            listeners.push(EventListener::new_with_options(
                &inner.container,
                event_type,
                options,
                move |event| {
                    if let Some(inner) = weak.upgrade() {
                        handle_move(&inner, event);
                    }
                },
            ));
        }
        let weak = Rc::downgrade(inner);
        listeners.push(EventListener::new(&inner.container, "drop", move |event| {
            if let Some(inner) = weak.upgrade() {
                handle_up(&inner, event);
            }
        }));
        let weak = Rc::downgrade(inner);
        listeners.push(EventListener::new(&drag_el, "dragend", move |event| {
            if let Some(inner) = weak.upgrade() {
                handle_up(&inner, event);
            }
        }));
    }

    // Document-level fallback so environments without native drag-and-drop
    // still deliver move/up.
    let (move_type, up_type) = if inner.support_pointer {
        ("pointermove", "pointerup")
    } else {
        ("mousemove", "mouseup")
    };
    let weak = Rc::downgrade(inner);
    listeners.push(EventListener::new_with_options(
        &inner.document,
        move_type,
        options,
        move |event| {
            if let Some(inner) = weak.upgrade() {
                handle_move(&inner, event);
            }
        },
    ));
    let weak = Rc::downgrade(inner);
    listeners.push(EventListener::new(&inner.document, up_type, move |event| {
        if let Some(inner) = weak.upgrade() {
            handle_up(&inner, event);
        }
    }));

    *inner.session.borrow_mut() = Some(DragSession {
        drag_el,
        start_index,
        start_point,
        start_rect,
        last_point: None,
        preview: None,
        listeners,
    });
}

fn handle_move(inner: &Rc<Inner>, event: &Event) {
    let mut guard = inner.session.borrow_mut();
    let Some(session) = guard.as_mut() else {
        return;
    };

    if let Some(drag_event) = event.dyn_ref::<DragEvent>() {
        if let Some(transfer) = drag_event.data_transfer() {
            transfer.set_drop_effect("move");
        }
    }
    event.prevent_default();
    event.stop_propagation();

    let Some(current) = event_point(event) else {
        return;
    };

    // One preview per session, synthesized on the first move. Without an
    // animation duration the native drag ghost is the only feedback and no
    // transform is ever written.
    if inner.animation.is_some() {
        if session.preview.is_none() {
            session.preview = spawn_preview(inner, &session.drag_el, &session.start_rect);
        }
        if let Some(preview) = &session.preview {
            let dx = current.x - session.start_point.x;
            let dy = current.y - session.start_point.y;
            let _ = preview
                .style()
                .set_property("transform", &format!("translate({dx}px, {dy}px)"));
        }
    }

    if let Some(target) =
        query::closest_item(event.target(), &inner.drag_selector, &inner.container)
    {
        let drag_node: &web_sys::Node = session.drag_el.unchecked_ref();
        let target_node: &web_sys::Node = target.unchecked_ref();
        // contains() is ancestor-or-self, so this also rejects a self-drop.
        if !drag_node.contains(Some(target_node)) && !target_node.contains(Some(drag_node)) {
            let (_, vertical) = drag_direction(session.last_point, current);
            if !inner.native_drag {
                auto_scroll(&inner.container, &target);
            }
            let mut animator = inner.animator.borrow_mut();
            animator.capture_animation_state();
            let down = vertical == Direction::Down;
            match (target.next_element_sibling(), down) {
                (Some(next), true) => {
                    let _ = inner
                        .container
                        .insert_before(drag_node, Some(next.unchecked_ref()));
                }
                (None, true) => {
                    let _ = inner.container.append_child(drag_node);
                }
                (_, false) => {
                    let _ = inner.container.insert_before(drag_node, Some(target_node));
                }
            }
            animator.animate_all();
        }
    }

    session.last_point = Some(current);
}

fn handle_up(inner: &Rc<Inner>, _event: &Event) {
    // take() makes teardown single-shot; a second drop-path event is a no-op.
    let Some(session) = inner.session.borrow_mut().take() else {
        return;
    };
    drop(session.listeners);

    let new_index = geometry::sibling_index(&session.drag_el, Some(&inner.drag_selector));
    gloo::console::log!("naraberu: drag end", session.start_index, new_index);
    if let Some(on_end) = &inner.on_end {
        on_end(SortEnd {
            old_index: session.start_index,
            new_index,
        });
    }

    let Some(preview) = session.preview else {
        return;
    };
    settle_preview(inner, preview, session.drag_el, session.start_rect);
}

// Eases the preview onto the dragged item's post-reorder origin, then removes
// it and restores the item. Cleanup is deferred to transitionend.
fn settle_preview(inner: &Rc<Inner>, preview: HtmlElement, drag_el: HtmlElement, start_rect: Rect) {
    let duration = inner.animation.unwrap_or(0.0);
    let to_rect = geometry::bounding_box(&drag_el);
    let origin_x = preview
        .get_attribute(PREVIEW_ORIGIN_X_ATTR)
        .and_then(|raw| raw.parse::<f64>().ok())
        .unwrap_or(start_rect.left);
    let origin_y = preview
        .get_attribute(PREVIEW_ORIGIN_Y_ATTR)
        .and_then(|raw| raw.parse::<f64>().ok())
        .unwrap_or(start_rect.top);
    let target_transform = format!(
        "translate({}px, {}px)",
        to_rect.left - origin_x,
        to_rect.top - origin_y
    );

    let style = preview.style();
    let already_there = style
        .get_property_value("transform")
        .map(|current| current == target_transform)
        .unwrap_or(false);
    if duration <= 0.0 || already_there {
        // No transition will run, so no transitionend will fire.
        preview.remove();
        let _ = drag_el.style().remove_property("visibility");
        return;
    }

    let _ = style.set_property("transition", &format!("transform {duration}ms ease"));
    let _ = style.set_property("transform", &target_transform);

    // A drop can land while the previous settle is still easing; retire that
    // preview now instead of orphaning it in the body.
    finish_settle(inner);

    let weak = Rc::downgrade(inner);
    let listener = EventListener::once(&preview, "transitionend", move |_event| {
        if let Some(inner) = weak.upgrade() {
            finish_settle(&inner);
        }
    });
    *inner.settling.borrow_mut() = Some(SettleState {
        preview,
        drag_el,
        _listener: listener,
    });
}

fn finish_settle(inner: &Rc<Inner>) {
    let Some(settle) = inner.settling.borrow_mut().take() else {
        return;
    };
    settle.preview.remove();
    let _ = settle.drag_el.style().remove_property("visibility");
}

fn spawn_preview(inner: &Rc<Inner>, drag_el: &HtmlElement, start_rect: &Rect) -> Option<HtmlElement> {
    let preview: HtmlElement = drag_el
        .clone_node_with_deep(true)
        .ok()?
        .dyn_into()
        .ok()?;
    let _ = preview.class_list().add_1(PREVIEW_CLASS);

    let style = preview.style();
    // The clone is out of flow; carry the source's computed size over.
    if let Ok(Some(computed)) = web_sys::window()?.get_computed_style(drag_el) {
        if let Ok(width) = computed.get_property_value("width") {
            let _ = style.set_property("width", &width);
        }
        if let Ok(height) = computed.get_property_value("height") {
            let _ = style.set_property("height", &height);
        }
    }
    let _ = style.set_property("position", "fixed");
    let _ = style.set_property("left", &format!("{}px", start_rect.left));
    let _ = style.set_property("top", &format!("{}px", start_rect.top));
    let _ = style.set_property("margin", "0");
    let _ = style.set_property("pointer-events", "none");
    let _ = preview.set_attribute(PREVIEW_ORIGIN_X_ATTR, &start_rect.left.to_string());
    let _ = preview.set_attribute(PREVIEW_ORIGIN_Y_ATTR, &start_rect.top.to_string());

    let body = inner.document.body()?;
    body.append_child(preview.unchecked_ref()).ok()?;
    let _ = drag_el.style().set_property("visibility", "hidden");
    Some(preview)
}

// Each raised flag contributes one scroll step, negative toward left/top.
// The magnitude comes from the target's height on both axes.
fn scroll_corrections(overflow: geometry::BoundaryOverflow, client_height: i32) -> Vec<(f64, f64)> {
    let magnitude = f64::from(client_height) * AUTO_SCROLL_RATIO;
    let mut steps = Vec::new();
    if overflow.top {
        steps.push((0.0, -magnitude));
    }
    if overflow.bottom {
        steps.push((0.0, magnitude));
    }
    if overflow.left {
        steps.push((-magnitude, 0.0));
    }
    if overflow.right {
        steps.push((magnitude, 0.0));
    }
    steps
}

fn auto_scroll(container: &Element, target: &Element) {
    let overflow = geometry::boundary_overflow(
        &geometry::bounding_box(target),
        &geometry::bounding_box(container),
    );
    for (dx, dy) in scroll_corrections(overflow, target.client_height()) {
        container.scroll_by_with_x_and_y(dx, dy);
    }
}

#[cfg(test)]
mod tests {
    use super::scroll_corrections;
    use crate::geometry::BoundaryOverflow;

    #[test]
    fn no_overflow_yields_no_scroll_steps() {
        assert!(scroll_corrections(BoundaryOverflow::default(), 40).is_empty());
    }

    #[test]
    fn each_flag_scrolls_by_height_ratio_toward_its_edge() {
        let top = BoundaryOverflow {
            top: true,
            ..BoundaryOverflow::default()
        };
        assert_eq!(scroll_corrections(top, 40), vec![(0.0, -44.0)]);

        let bottom = BoundaryOverflow {
            bottom: true,
            ..BoundaryOverflow::default()
        };
        assert_eq!(scroll_corrections(bottom, 40), vec![(0.0, 44.0)]);

        // Horizontal correction takes its magnitude from the height too.
        let left = BoundaryOverflow {
            left: true,
            ..BoundaryOverflow::default()
        };
        assert_eq!(scroll_corrections(left, 40), vec![(-44.0, 0.0)]);

        let right = BoundaryOverflow {
            right: true,
            ..BoundaryOverflow::default()
        };
        assert_eq!(scroll_corrections(right, 40), vec![(44.0, 0.0)]);
    }

    #[test]
    fn simultaneous_flags_are_applied_in_one_pass() {
        let overflow = BoundaryOverflow {
            top: true,
            left: true,
            ..BoundaryOverflow::default()
        };
        assert_eq!(
            scroll_corrections(overflow, 20),
            vec![(0.0, -22.0), (-22.0, 0.0)]
        );
    }
}
