//! Outside-click listeners scoped to an open widget.
//!
//! A widget that opens asks the session's [`PointerHub`] for an
//! [`OutsideClickListener`]. The registration lives exactly as long as the
//! guard: closing the widget drops it, and so does tearing the widget down.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use tracing::debug;

pub type WidgetId = &'static str;

/// The part of a widget a pointer landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetPart {
    Trigger,
    List,
}

/// A pointer-down event after hit testing. `target` is `None` when the
/// pointer hit nothing that belongs to a selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub target: Option<(WidgetId, WidgetPart)>,
}

impl PointerEvent {
    pub fn outside() -> Self {
        Self { target: None }
    }

    pub fn on(widget: WidgetId, part: WidgetPart) -> Self {
        Self {
            target: Some((widget, part)),
        }
    }
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    live: BTreeMap<u64, WidgetId>,
}

/// Per-session registry of live outside-click listeners.
#[derive(Clone, Default)]
pub struct PointerHub {
    registry: Rc<RefCell<Registry>>,
}

impl PointerHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listen(&self, widget: WidgetId) -> OutsideClickListener {
        let id = {
            let mut registry = self.registry.borrow_mut();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.live.insert(id, widget);
            id
        };
        debug!(widget, listener = id, "Registered outside-click listener");
        OutsideClickListener {
            id,
            widget,
            registry: Rc::clone(&self.registry),
        }
    }

    pub fn live_listeners(&self) -> usize {
        self.registry.borrow().live.len()
    }

    pub fn is_listening(&self, widget: WidgetId) -> bool {
        self.registry
            .borrow()
            .live
            .values()
            .any(|owner| *owner == widget)
    }
}

/// Registration guard. Dropping it deregisters the listener.
pub struct OutsideClickListener {
    id: u64,
    widget: WidgetId,
    registry: Rc<RefCell<Registry>>,
}

impl OutsideClickListener {
    /// True when `event` landed neither on the trigger nor on the open list
    /// of the widget owning this listener.
    pub fn is_outside(&self, event: &PointerEvent) -> bool {
        match event.target {
            Some((widget, _)) => widget != self.widget,
            None => true,
        }
    }
}

impl Drop for OutsideClickListener {
    fn drop(&mut self) {
        self.registry.borrow_mut().live.remove(&self.id);
        debug!(
            widget = self.widget,
            listener = self.id,
            "Released outside-click listener"
        );
    }
}
