//! Dropdown selector core shared by the model and prompt selectors.
//!
//! A selector is `Closed` or `Open`. While open it holds an outside-click
//! listener; the listener lives inside the `Open` phase itself, so every way
//! out of `Open` (toggle, outside click, selection, affordance, drop) releases
//! it. What the list shows comes from an [`OptionSource`], what selecting does
//! beyond the local callback comes from a [`SelectionEffect`].

use std::error::Error as StdError;
use std::fmt;

use tracing::debug;

use super::pointer::{OutsideClickListener, PointerEvent, PointerHub, WidgetId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorOption<T> {
    pub id: String,
    pub name: String,
    /// Set when the option needs attention before it is usable. The option
    /// stays selectable.
    pub status: Option<String>,
    pub value: T,
}

impl<T> SelectorOption<T> {
    pub fn needs_attention(&self) -> bool {
        self.status.as_deref().is_some_and(|s| !s.is_empty())
    }
}

pub trait OptionSource {
    type Value: Clone;

    /// Options in display order, read fresh on every call.
    fn options(&self) -> Vec<SelectorOption<Self::Value>>;
}

/// Side effects a selector variant adds on top of the shared state machine.
pub trait SelectionEffect<T> {
    fn opened(&mut self) {}

    fn selected(&mut self, _option: &SelectorOption<T>) {}

    /// Returns whether the list closes afterwards. The default leaves it open.
    fn affordance_activated(&mut self) -> bool {
        false
    }
}

/// Selection stays local.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEffect;

impl<T> SelectionEffect<T> for NoEffect {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorState {
    Closed,
    Open,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorRow {
    Option {
        id: String,
        name: String,
        status: Option<String>,
    },
    Divider,
    Affordance {
        label: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorView {
    pub label: String,
    pub open: bool,
    pub rows: Vec<SelectorRow>,
}

impl SelectorView {
    pub fn option_rows(&self) -> impl Iterator<Item = &SelectorRow> {
        self.rows
            .iter()
            .filter(|row| matches!(row, SelectorRow::Option { .. }))
    }
}

impl fmt::Display for SelectorView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chevron = if self.open { "▴" } else { "▾" };
        writeln!(f, "[{} {chevron}]", self.label)?;
        for row in &self.rows {
            match row {
                SelectorRow::Option { id, name, status } => match status {
                    Some(status) => writeln!(f, "  {name} ({status})  <{id}>")?,
                    None => writeln!(f, "  {name}  <{id}>")?,
                },
                SelectorRow::Divider => writeln!(f, "  ──────")?,
                SelectorRow::Affordance { label } => writeln!(f, "  + {label}")?,
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    /// The list is not showing, so nothing in it can be clicked.
    Closed { widget: WidgetId },
    UnknownWidget { widget: String },
    UnknownOption {
        widget: WidgetId,
        id: String,
        available: Vec<String>,
    },
}

impl fmt::Display for SelectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectorError::Closed { widget } => {
                write!(f, "The {widget} selector is closed; open it first")
            }
            SelectorError::UnknownWidget { widget } => {
                write!(f, "No selector named '{widget}'")
            }
            SelectorError::UnknownOption {
                widget,
                id,
                available,
            } => {
                if available.is_empty() {
                    write!(f, "Option '{id}' not found; the {widget} list is empty")
                } else {
                    write!(
                        f,
                        "Option '{id}' not found. Available {widget} options: {}",
                        available.join(", ")
                    )
                }
            }
        }
    }
}

impl StdError for SelectorError {}

enum Phase {
    Closed,
    Open(OutsideClickListener),
}

pub type SelectCallback = Box<dyn FnMut(&str)>;

pub struct Selector<S: OptionSource, E> {
    id: WidgetId,
    label: String,
    phase: Phase,
    source: S,
    effect: E,
    affordance: String,
    hub: PointerHub,
    on_select: SelectCallback,
}

impl<S, E> Selector<S, E>
where
    S: OptionSource,
    E: SelectionEffect<S::Value>,
{
    pub fn new(
        id: WidgetId,
        label: impl Into<String>,
        source: S,
        effect: E,
        affordance: impl Into<String>,
        hub: PointerHub,
        on_select: SelectCallback,
    ) -> Self {
        Self {
            id,
            label: label.into(),
            phase: Phase::Closed,
            source,
            effect,
            affordance: affordance.into(),
            hub,
            on_select,
        }
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn state(&self) -> SelectorState {
        match self.phase {
            Phase::Closed => SelectorState::Closed,
            Phase::Open(_) => SelectorState::Open,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state() == SelectorState::Open
    }

    /// Text on the trigger control.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn options(&self) -> Vec<SelectorOption<S::Value>> {
        self.source.options()
    }

    /// Click on the trigger control.
    pub fn toggle(&mut self) -> SelectorState {
        match self.phase {
            Phase::Closed => self.open(),
            Phase::Open(_) => {
                self.close();
            }
        }
        self.state()
    }

    fn open(&mut self) {
        self.phase = Phase::Open(self.hub.listen(self.id));
        debug!(widget = self.id, "Selector opened");
        self.effect.opened();
    }

    /// Close the list. Closing a closed selector does nothing.
    pub fn close(&mut self) -> bool {
        if matches!(self.phase, Phase::Closed) {
            return false;
        }
        self.phase = Phase::Closed;
        debug!(widget = self.id, "Selector closed");
        true
    }

    /// Pointer-down anywhere in the panel. Closes the list when the pointer
    /// landed outside this selector. Returns whether it closed.
    pub fn pointer_down(&mut self, event: &PointerEvent) -> bool {
        let outside = match &self.phase {
            Phase::Open(listener) => listener.is_outside(event),
            Phase::Closed => false,
        };
        outside && self.close()
    }

    /// Click on the option row with `option_id`.
    pub fn select(&mut self, option_id: &str) -> Result<(), SelectorError> {
        if !self.is_open() {
            return Err(SelectorError::Closed { widget: self.id });
        }
        let options = self.source.options();
        let Some(option) = options.into_iter().find(|option| option.id == option_id) else {
            return Err(SelectorError::UnknownOption {
                widget: self.id,
                id: option_id.to_string(),
                available: self.source.options().into_iter().map(|o| o.id).collect(),
            });
        };

        debug!(
            widget = self.id,
            option = %option.id,
            needs_attention = option.needs_attention(),
            "Selector option chosen"
        );
        (self.on_select)(&option.name);
        self.label = option.name.clone();
        self.effect.selected(&option);
        self.close();
        Ok(())
    }

    /// Click on the trailing affordance row. Selection is unchanged; the
    /// effect decides whether the list closes.
    pub fn activate_affordance(&mut self) -> Result<(), SelectorError> {
        if !self.is_open() {
            return Err(SelectorError::Closed { widget: self.id });
        }
        if self.effect.affordance_activated() {
            self.close();
        }
        Ok(())
    }

    /// Describe what the selector currently shows. Has no side effects.
    pub fn render(&self) -> SelectorView {
        let open = self.is_open();
        let mut rows = Vec::new();
        if open {
            rows.extend(
                self.source
                    .options()
                    .into_iter()
                    .map(|option| SelectorRow::Option {
                        status: option.status.clone().filter(|_| option.needs_attention()),
                        id: option.id,
                        name: option.name,
                    }),
            );
            rows.push(SelectorRow::Divider);
            rows.push(SelectorRow::Affordance {
                label: self.affordance.clone(),
            });
        }
        SelectorView {
            label: self.label.clone(),
            open,
            rows,
        }
    }
}
