use crate::elements::ElementType;
use crate::geometry::{Point, Rectangle};
use crate::settings::Settings;

/// Window dragging by a handle strip, composed into draggable windows.
///
/// The window owns its position through this helper: the initial value
/// comes from settings, moves follow the cursor while the handle is held,
/// and the final position is saved once on release if it changed.
#[derive(Debug, Clone)]
pub struct DragHelper {
    key: ElementType,
    position: Point,
    handle: Rectangle,
    grab: Option<Grab>,
}

#[derive(Debug, Clone, Copy)]
struct Grab {
    offset: Point,
    start: Point,
}

impl DragHelper {
    /// `handle` is relative to the window origin.
    pub fn new(key: ElementType, default: Point, handle: Rectangle, settings: &dyn Settings) -> Self {
        Self {
            key,
            position: settings.load(key).unwrap_or(default),
            handle,
            grab: None,
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn is_dragging(&self) -> bool {
        self.grab.is_some()
    }

    pub fn in_handle(&self, pos: Point) -> bool {
        self.handle.translate(self.position).contains(pos)
    }

    /// Returns true when the event was consumed by a drag.
    pub fn send_cursor(&mut self, clicked: bool, pos: Point, settings: &mut dyn Settings) -> bool {
        match (clicked, self.grab) {
            (true, Some(grab)) => {
                self.position = pos - grab.offset;
                true
            }
            (true, None) if self.in_handle(pos) => {
                self.grab = Some(Grab {
                    offset: pos - self.position,
                    start: self.position,
                });
                true
            }
            (false, Some(_)) => {
                self.release(settings);
                true
            }
            _ => false,
        }
    }

    /// Ends a drag in progress, persisting a changed position.
    pub fn release(&mut self, settings: &mut dyn Settings) {
        if let Some(grab) = self.grab.take()
            && grab.start != self.position
        {
            tracing::debug!(element = ?self.key, position = ?self.position, "saving window position");
            settings.save(self.key, self.position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::MemorySettings;

    fn helper(settings: &MemorySettings) -> DragHelper {
        DragHelper::new(
            ElementType::ItemInventory,
            Point::new(100, 100),
            Rectangle::from_xywh(0, 0, 100, 20),
            settings,
        )
    }

    #[test]
    fn drag_moves_and_saves_once() {
        let mut settings = MemorySettings::new();
        let mut drag = helper(&settings);
        assert!(drag.send_cursor(true, Point::new(110, 105), &mut settings));
        assert!(drag.send_cursor(true, Point::new(135, 105), &mut settings));
        assert!(drag.send_cursor(true, Point::new(160, 105), &mut settings));
        assert_eq!(drag.position(), Point::new(150, 100));
        assert!(settings.saves().is_empty());
        assert!(drag.send_cursor(false, Point::new(160, 105), &mut settings));
        assert_eq!(
            settings.saves(),
            vec![(ElementType::ItemInventory, Point::new(150, 100))]
        );
    }

    #[test]
    fn click_without_motion_is_not_saved() {
        let mut settings = MemorySettings::new();
        let mut drag = helper(&settings);
        drag.send_cursor(true, Point::new(110, 105), &mut settings);
        drag.send_cursor(false, Point::new(110, 105), &mut settings);
        assert!(settings.saves().is_empty());
        assert!(!drag.is_dragging());
    }

    #[test]
    fn press_outside_handle_is_ignored() {
        let mut settings = MemorySettings::new();
        let mut drag = helper(&settings);
        assert!(!drag.send_cursor(true, Point::new(110, 150), &mut settings));
        assert!(!drag.is_dragging());
    }

    #[test]
    fn initial_position_loads_from_settings() {
        let settings =
            MemorySettings::new().with_position(ElementType::ItemInventory, Point::new(5, 6));
        assert_eq!(helper(&settings).position(), Point::new(5, 6));
    }
}
