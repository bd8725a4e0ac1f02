use js_sys::{Array, Object, Reflect};
use wasm_bindgen::JsValue;
use web_sys::Element;

use crate::geometry::{self, Rect};
use crate::query;

struct AnimationState {
    target: Element,
    from_rect: Rect,
}

/// FLIP settle for reorders: capture every drag item's rect before the DOM
/// mutation, then ease each moved item from its old position back to (0,0)
/// after it. Fire-and-forget; per-element animations are not coordinated.
pub struct AnimationManager {
    container: Element,
    drag_selector: String,
    animation: Option<f64>,
    states: Vec<AnimationState>,
}

impl AnimationManager {
    pub fn new(container: Element, drag_selector: &str, animation: Option<f64>) -> Self {
        Self {
            container,
            drag_selector: drag_selector.to_string(),
            animation,
            states: Vec::new(),
        }
    }

    /// Records the current rect of every drag item. Must run before the
    /// reorder; the snapshot is consumed by the next `animate_all`.
    pub fn capture_animation_state(&mut self) {
        self.states.clear();
        if self.animation.is_none() {
            return;
        }
        for target in query::query_items(&self.container, &self.drag_selector) {
            let from_rect = geometry::bounding_box(&target);
            self.states.push(AnimationState { target, from_rect });
        }
    }

    /// Plays the settle for every captured item whose rect changed and drops
    /// the snapshot. Items that did not move are skipped.
    pub fn animate_all(&mut self) {
        let Some(duration) = self.animation else {
            self.states.clear();
            return;
        };
        for state in self.states.drain(..) {
            let to_rect = geometry::bounding_box(&state.target);
            if geometry::rects_equal(&to_rect, &state.from_rect) {
                continue;
            }
            play(&state.target, &state.from_rect, &to_rect, duration);
        }
    }
}

// The DOM has already moved the element, so the keyframes run the inverse:
// start back at the old position, ease to the new one.
fn play(target: &Element, from_rect: &Rect, to_rect: &Rect, duration: f64) {
    let translate_x = from_rect.left - to_rect.left;
    let translate_y = from_rect.top - to_rect.top;
    let transforms = Array::of2(
        &JsValue::from_str(&format!("translate({translate_x}px, {translate_y}px)")),
        &JsValue::from_str("translate(0, 0)"),
    );
    let keyframes = Object::new();
    let _ = Reflect::set(
        &keyframes,
        &JsValue::from_str("transform"),
        transforms.as_ref(),
    );
    let _ = target.animate_with_f64(Some(&keyframes), duration);
}
