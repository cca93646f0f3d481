use std::collections::BTreeMap;

use super::{Element, ElementKind, ElementType};
use crate::geometry::Point;

/// What `insert_or_toggle` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Created,
    Activated,
    Deactivated,
}

/// Owns every open window of a state, one per tag, plus their z-order.
///
/// The back of `z_order` is the topmost window: hit-testing walks it from
/// the back and drawing walks it from the front. A window stays in the order
/// while hidden and leaves it only when removed.
#[derive(Default)]
pub struct Registry {
    elements: BTreeMap<ElementType, Box<dyn Element>>,
    z_order: Vec<ElementType>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips an existing toggle-capable instance and raises it; otherwise
    /// replaces the slot with a freshly built instance.
    pub fn insert_or_toggle<F>(&mut self, tag: ElementType, factory: F) -> InsertOutcome
    where
        F: FnOnce() -> Box<dyn Element>,
    {
        if let Some(element) = self.elements.get_mut(&tag)
            && element.is_toggleable()
        {
            element.toggle_active();
            let outcome = if element.is_active() {
                InsertOutcome::Activated
            } else {
                InsertOutcome::Deactivated
            };
            self.bring_to_front(tag);
            return outcome;
        }

        self.remove(tag);
        let element = factory();
        debug_assert_eq!(element.element_type(), tag);
        self.elements.insert(tag, element);
        self.z_order.push(tag);
        InsertOutcome::Created
    }

    /// Deactivates and drops the instance for `tag`.
    pub fn remove(&mut self, tag: ElementType) -> bool {
        self.z_order.retain(|t| *t != tag);
        match self.elements.remove(&tag) {
            Some(mut element) => {
                element.set_active(false);
                true
            }
            None => false,
        }
    }

    pub fn bring_to_front(&mut self, tag: ElementType) {
        if let Some(pos) = self.z_order.iter().position(|t| *t == tag) {
            self.z_order.remove(pos);
            self.z_order.push(tag);
        }
    }

    pub fn contains(&self, tag: ElementType) -> bool {
        self.elements.contains_key(&tag)
    }

    pub fn get(&self, tag: ElementType) -> Option<&dyn Element> {
        self.elements.get(&tag).map(|e| e.as_ref())
    }

    pub fn get_mut(&mut self, tag: ElementType) -> Option<&mut (dyn Element + 'static)> {
        self.elements.get_mut(&tag).map(|e| e.as_mut())
    }

    /// The live instance of window type `T`, if open.
    pub fn get_typed<T: ElementKind>(&self) -> Option<&T> {
        self.get(T::TYPE)
            .and_then(|element| element.as_any().downcast_ref::<T>())
    }

    pub fn get_typed_mut<T: ElementKind>(&mut self) -> Option<&mut T> {
        self.get_mut(T::TYPE)
            .and_then(|element| element.as_any_mut().downcast_mut::<T>())
    }

    pub fn is_active(&self, tag: ElementType) -> bool {
        self.get(tag).is_some_and(|e| e.is_active())
    }

    /// Tags from bottom to top.
    pub fn order(&self) -> &[ElementType] {
        &self.z_order
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// The topmost active window containing `pos`.
    pub fn front_at(&self, pos: Point) -> Option<ElementType> {
        self.z_order.iter().rev().copied().find(|tag| {
            self.elements
                .get(tag)
                .is_some_and(|e| e.is_active() && e.is_in_range(pos))
        })
    }

    /// The topmost active window whose tag is one of `candidates`.
    pub fn front_of_types(&self, candidates: &[ElementType]) -> Option<ElementType> {
        self.z_order
            .iter()
            .rev()
            .copied()
            .filter(|tag| candidates.contains(tag))
            .find(|tag| self.is_active(*tag))
    }

    /// The topmost active window anywhere.
    pub fn front(&self) -> Option<ElementType> {
        self.z_order
            .iter()
            .rev()
            .copied()
            .find(|tag| self.is_active(*tag))
    }

    /// Drops every window.
    pub fn clear(&mut self) {
        for tag in self.z_order.clone() {
            self.remove(tag);
        }
    }
}
