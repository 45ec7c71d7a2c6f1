//! Scene store: the ordered element list plus the current selection.
//!
//! Creation order is paint order; later elements draw on top. Every operation
//! is tolerant: unknown ids are ignored rather than reported.

use crate::element::ElementPatch;
use crate::geometry::Point;
use crate::{Element, ElementId};

/// Default canvas width in pixels.
pub const DEFAULT_WIDTH: u32 = 1600;

/// Default canvas height in pixels.
pub const DEFAULT_HEIGHT: u32 = 1000;

/// A scene containing all committed paint elements.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// Elements in creation (paint) order.
    elements: Vec<Element>,
    /// Currently selected element, by id.
    selected: Option<ElementId>,
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
}

impl Scene {
    /// Create an empty scene with the given canvas size.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            elements: Vec::new(),
            selected: None,
            width,
            height,
        }
    }

    /// Append an element on top of the scene.
    pub fn append(&mut self, element: Element) -> ElementId {
        let id = element.id;
        tracing::debug!("Append {:?} element {id}", element.kind());
        self.elements.push(element);
        id
    }

    /// Merge a partial update into an element.
    ///
    /// Returns `false` if no element has this id.
    pub fn update_by_id(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        match self.get_mut(id) {
            Some(element) => {
                element.apply(patch);
                true
            }
            None => false,
        }
    }

    /// Remove an element by id. Clears the selection if it pointed at it.
    pub fn delete_by_id(&mut self, id: ElementId) -> Option<Element> {
        let index = self.elements.iter().position(|e| e.id == id)?;
        let removed = self.elements.remove(index);
        self.forget_selection_of(removed.id);
        Some(removed)
    }

    /// Remove the most recently appended element.
    pub fn delete_last(&mut self) -> Option<Element> {
        let removed = self.elements.pop()?;
        self.forget_selection_of(removed.id);
        Some(removed)
    }

    /// Remove every element and the selection.
    pub fn clear_all(&mut self) {
        tracing::debug!("Clear {} elements", self.elements.len());
        self.elements.clear();
        self.selected = None;
    }

    /// Select an element, or clear the selection with `None`.
    ///
    /// Selecting an id that is not in the scene is ignored.
    pub fn select(&mut self, id: Option<ElementId>) {
        match id {
            Some(id) if self.get(id).is_none() => {
                tracing::debug!("Ignoring selection of unknown element {id}");
            }
            _ => self.selected = id,
        }
    }

    /// Id of the selected element.
    #[must_use]
    pub fn selected(&self) -> Option<ElementId> {
        self.selected
    }

    /// The selected element.
    #[must_use]
    pub fn selected_element(&self) -> Option<&Element> {
        self.selected.and_then(|id| self.get(id))
    }

    /// Find the topmost element whose bounds, grown by `margin`, contain `point`.
    #[must_use]
    pub fn element_at(&self, point: Point, margin: f32) -> Option<ElementId> {
        self.elements
            .iter()
            .rev()
            .find(|e| e.bounds().expand(margin).contains(point))
            .map(|e| e.id)
    }

    /// Get an element by ID.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Get a mutable reference to an element by ID.
    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    /// Elements in paint order.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// The most recently appended element.
    #[must_use]
    pub fn last(&self) -> Option<&Element> {
        self.elements.last()
    }

    /// Number of elements in the scene.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the scene is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    fn forget_selection_of(&mut self, id: ElementId) {
        if self.selected == Some(id) {
            self.selected = None;
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Shape, Style};
    use crate::geometry::Vector;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Element {
        Element::new(
            Shape::Rectangle {
                origin: Point::new(x, y),
                extent: Vector::new(w, h),
            },
            Style::default(),
        )
    }

    #[test]
    fn test_scene_append_delete() {
        let mut scene = Scene::default();
        assert!(scene.is_empty());

        let id = scene.append(rect(0.0, 0.0, 10.0, 10.0));
        assert_eq!(scene.len(), 1);
        assert!(scene.get(id).is_some());

        assert!(scene.delete_by_id(id).is_some());
        assert!(scene.is_empty());
    }

    #[test]
    fn test_append_then_delete_last_is_identity() {
        let mut scene = Scene::default();
        scene.append(rect(0.0, 0.0, 10.0, 10.0));
        let before = scene.clone();

        scene.append(rect(5.0, 5.0, 10.0, 10.0));
        scene.delete_last();
        assert_eq!(scene, before);
    }

    #[test]
    fn test_unknown_ids_are_ignored() {
        let mut scene = Scene::default();
        scene.append(rect(0.0, 0.0, 10.0, 10.0));
        let stranger = ElementId::new();

        assert!(!scene.update_by_id(stranger, &ElementPatch::default()));
        assert!(scene.delete_by_id(stranger).is_none());
        scene.select(Some(stranger));
        assert_eq!(scene.selected(), None);
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_delete_clears_selection() {
        let mut scene = Scene::default();
        let a = scene.append(rect(0.0, 0.0, 10.0, 10.0));
        let b = scene.append(rect(50.0, 50.0, 10.0, 10.0));

        scene.select(Some(b));
        scene.delete_by_id(a);
        assert_eq!(scene.selected(), Some(b));

        scene.delete_last();
        assert_eq!(scene.selected(), None);
    }

    #[test]
    fn test_update_by_id_merges_fields() {
        let mut scene = Scene::default();
        let id = scene.append(rect(0.0, 0.0, 10.0, 10.0));
        let patch = ElementPatch {
            use_gradient: Some(true),
            ..ElementPatch::default()
        };
        assert!(scene.update_by_id(id, &patch));
        let element = scene.get(id).expect("element");
        assert!(element.style.use_gradient);
        assert_eq!(element.style.primary, Style::default().primary);
    }

    #[test]
    fn test_element_at_prefers_topmost() {
        let mut scene = Scene::default();
        let bottom = scene.append(rect(0.0, 0.0, 100.0, 100.0));
        let top = scene.append(rect(50.0, 50.0, 100.0, 100.0));

        assert_eq!(scene.element_at(Point::new(75.0, 75.0), 0.0), Some(top));
        assert_eq!(scene.element_at(Point::new(10.0, 10.0), 0.0), Some(bottom));
        assert_eq!(scene.element_at(Point::new(500.0, 500.0), 20.0), None);
    }

    #[test]
    fn test_element_at_uses_margin() {
        let mut scene = Scene::default();
        let id = scene.append(rect(100.0, 100.0, 10.0, 10.0));
        assert_eq!(scene.element_at(Point::new(85.0, 85.0), 20.0), Some(id));
        assert_eq!(scene.element_at(Point::new(85.0, 85.0), 0.0), None);
    }

    #[test]
    fn test_clear_all() {
        let mut scene = Scene::default();
        let id = scene.append(rect(0.0, 0.0, 10.0, 10.0));
        scene.select(Some(id));
        scene.clear_all();
        assert!(scene.is_empty());
        assert_eq!(scene.selected(), None);
    }

    mod proptest_tests {
        use super::*;
        use crate::element::ElementKind;
        use proptest::prelude::*;

        fn arb_element() -> impl Strategy<Value = Element> {
            (-100.0f32..1700.0, -100.0f32..1100.0, -400.0f32..400.0, -400.0f32..400.0, any::<bool>())
                .prop_map(|(x, y, w, h, stroke)| {
                    if stroke {
                        Element::stroke(ElementKind::Freehand, Point::new(x, y), Style::default())
                    } else {
                        rect(x, y, w, h)
                    }
                })
        }

        proptest! {
            #[test]
            fn prop_append_then_delete_last_is_identity(
                elements in prop::collection::vec(arb_element(), 0..20),
                selected in any::<prop::sample::Index>(),
                extra in arb_element()
            ) {
                let mut scene = Scene::default();
                let ids: Vec<_> = elements.into_iter().map(|e| scene.append(e)).collect();
                if !ids.is_empty() {
                    scene.select(Some(ids[selected.index(ids.len())]));
                }
                let before = scene.clone();

                let id = scene.append(extra);
                let removed = scene.delete_last().expect("just appended");
                prop_assert_eq!(removed.id, id);
                prop_assert_eq!(scene, before);
            }
        }
    }
}
