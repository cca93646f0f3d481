//! Reusable widgets the windows are built from.

pub mod button;
pub mod draggable;
pub mod icon;
pub mod textfield;
pub mod tooltip;

pub use button::{Button, ButtonSet, ButtonState};
pub use draggable::DragHelper;
pub use icon::{DraggedIcon, IconKind};
pub use textfield::{FieldEvent, FieldState, Textfield};
pub use tooltip::{Tooltip, TooltipSlot};
