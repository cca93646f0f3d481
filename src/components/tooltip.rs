use ratatui::style::Color;

use crate::elements::ElementType;
use crate::geometry::{Point, Rectangle};
use crate::model::{EquipSlot, Item, SkillEntry};
use crate::render::Canvas;

/// Tooltip content variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tooltip {
    Equip { slot: EquipSlot, item: Item },
    Item(Item),
    Skill(SkillEntry),
    Text(String),
    Map { name: String, description: String },
}

impl Tooltip {
    /// Whether there is anything to show. Empty tooltips are never stored.
    pub fn has_content(&self) -> bool {
        match self {
            Tooltip::Equip { item, .. } | Tooltip::Item(item) => item.item_id != 0,
            Tooltip::Skill(skill) => skill.skill_id != 0,
            Tooltip::Text(text) => !text.is_empty(),
            Tooltip::Map { name, .. } => !name.is_empty(),
        }
    }

    pub fn lines(&self) -> Vec<String> {
        match self {
            Tooltip::Equip { slot, item } => {
                let mut lines = vec![item.name.clone(), format!("Slot: {slot}")];
                if item.req_level > 0 {
                    lines.push(format!("REQ LEV: {}", item.req_level));
                }
                if item.untradable {
                    lines.push("Untradable".to_string());
                }
                lines
            }
            Tooltip::Item(item) => {
                let mut lines = vec![item.name.clone()];
                if !item.description.is_empty() {
                    lines.push(item.description.clone());
                }
                if item.untradable {
                    lines.push("Untradable".to_string());
                }
                lines
            }
            Tooltip::Skill(skill) => vec![
                skill.name.clone(),
                format!("Level {}/{}", skill.level, skill.master_level),
            ],
            Tooltip::Text(text) => text.lines().map(str::to_string).collect(),
            Tooltip::Map { name, description } => {
                let mut lines = vec![name.clone()];
                if !description.is_empty() {
                    lines.push(description.clone());
                }
                lines
            }
        }
    }

    /// Pixel size of the laid-out tooltip.
    pub fn size(&self) -> Point {
        let lines = self.lines();
        let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as i32;
        Point::new(width * 8 + 16, lines.len() as i32 * 16 + 8)
    }

    pub fn draw(&self, canvas: &mut dyn Canvas, anchor: Point) {
        let size = self.size();
        let origin = place(anchor, size, canvas.viewport());
        let rect = Rectangle::new(origin, size);
        canvas.fill(rect, Color::Black);
        for (row, line) in self.lines().iter().enumerate() {
            let color = if row == 0 { Color::Yellow } else { Color::White };
            canvas.text(origin + Point::new(8, 4 + row as i32 * 16), line, color);
        }
    }
}

/// Moves a box anchored at `anchor` left/up until it fits in `viewport`.
pub fn place(anchor: Point, size: Point, viewport: Point) -> Point {
    let mut origin = anchor;
    let overflow_x = anchor.x + size.x - viewport.x;
    if overflow_x > 0 {
        origin.x -= overflow_x;
    }
    let overflow_y = anchor.y + size.y - viewport.y;
    if overflow_y > 0 {
        origin.y -= overflow_y;
    }
    Point::new(origin.x.max(0), origin.y.max(0))
}

/// The single visible tooltip and the element that asked for it.
#[derive(Debug, Clone, Default)]
pub struct TooltipSlot {
    current: Option<(ElementType, Tooltip)>,
}

impl TooltipSlot {
    /// Shows `content` for `parent`. Empty content clears the slot without
    /// replacing the owner check.
    pub fn show(&mut self, parent: ElementType, content: Tooltip) {
        if content.has_content() {
            self.current = Some((parent, content));
        } else if self.owner() == Some(parent) {
            self.current = None;
        }
    }

    /// Clears the tooltip only when `parent` owns it.
    pub fn clear(&mut self, parent: ElementType) {
        if self.owner() == Some(parent) {
            self.current = None;
        }
    }

    pub fn reset(&mut self) {
        self.current = None;
    }

    pub fn owner(&self) -> Option<ElementType> {
        self.current.as_ref().map(|(parent, _)| *parent)
    }

    pub fn content(&self) -> Option<&Tooltip> {
        self.current.as_ref().map(|(_, content)| content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn place_shifts_left_and_up_on_overflow() {
        let viewport = Point::new(800, 600);
        assert_eq!(
            place(Point::new(100, 100), Point::new(50, 50), viewport),
            Point::new(100, 100)
        );
        assert_eq!(
            place(Point::new(780, 590), Point::new(50, 40), viewport),
            Point::new(750, 560)
        );
    }

    #[test]
    fn clear_respects_owner() {
        let mut slot = TooltipSlot::default();
        slot.show(ElementType::ItemInventory, Tooltip::Text("Potion".into()));
        slot.clear(ElementType::EquipInventory);
        assert_eq!(slot.owner(), Some(ElementType::ItemInventory));
        slot.clear(ElementType::ItemInventory);
        assert_eq!(slot.owner(), None);
    }

    #[test]
    fn empty_content_is_not_shown() {
        let mut slot = TooltipSlot::default();
        slot.show(ElementType::MiniMap, Tooltip::Text(String::new()));
        assert!(slot.content().is_none());
    }
}
