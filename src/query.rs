use wasm_bindgen::JsCast;
use web_sys::{Element, EventTarget};

/// A drag selector beginning with `>` restricts matching to direct children of
/// the container (`">*"`, `">li"`, ...). Returns the per-element tail.
pub(crate) fn split_child_selector(selector: &str) -> Option<&str> {
    selector.strip_prefix('>').map(str::trim)
}

fn tail_matches(element: &Element, tail: &str) -> bool {
    if tail.is_empty() || tail == "*" {
        return true;
    }
    element.matches(tail).unwrap_or(false)
}

/// Does `element` match `selector`? For child-form selectors the element must
/// be a direct child of `scope` (or of anything, if no scope is given).
pub(crate) fn selector_matches(element: &Element, selector: &str, scope: Option<&Element>) -> bool {
    match split_child_selector(selector) {
        Some(tail) => {
            let parent_ok = match scope {
                Some(scope) => element.parent_element().as_ref() == Some(scope),
                None => element.parent_element().is_some(),
            };
            parent_ok && tail_matches(element, tail)
        }
        None => element.matches(selector).unwrap_or(false),
    }
}

/// Resolves an event target to the nearest matching ancestor-or-self, walking
/// no further than (and never returning) the container itself.
pub(crate) fn closest_item(
    target: Option<EventTarget>,
    selector: &str,
    container: &Element,
) -> Option<Element> {
    let element = target?.dyn_into::<Element>().ok()?;
    if !container.contains(Some(element.unchecked_ref())) {
        return None;
    }
    let mut current = element;
    while &current != container {
        if selector_matches(&current, selector, Some(container)) {
            return Some(current);
        }
        current = current.parent_element()?;
    }
    None
}

/// All current matches of the drag selector under the container. Membership is
/// re-queried on every call; reordering invalidates any cached list.
pub(crate) fn query_items(container: &Element, selector: &str) -> Vec<Element> {
    let scoped = match split_child_selector(selector) {
        Some(tail) if tail.is_empty() || tail == "*" => ":scope > *".to_string(),
        Some(tail) => format!(":scope > {tail}"),
        None => selector.to_string(),
    };
    let Ok(nodes) = container.query_selector_all(&scoped) else {
        return Vec::new();
    };
    let mut items = Vec::with_capacity(nodes.length() as usize);
    for i in 0..nodes.length() {
        if let Some(element) = nodes.item(i).and_then(|node| node.dyn_into::<Element>().ok()) {
            items.push(element);
        }
    }
    items
}

#[cfg(test)]
mod tests {
    use super::split_child_selector;

    #[test]
    fn child_prefix_is_recognized_and_trimmed() {
        assert_eq!(split_child_selector(">*"), Some("*"));
        assert_eq!(split_child_selector("> li"), Some("li"));
        assert_eq!(split_child_selector(">.drag-item"), Some(".drag-item"));
        assert_eq!(split_child_selector(".drag-item"), None);
        assert_eq!(split_child_selector("li"), None);
    }
}
