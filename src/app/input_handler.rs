use eframe::egui;

use crate::brush_engine::paint_layer::{PointerButtons, PointerEvent};
use crate::utils::vector::Vec2;

/// Turns raw egui pointer events into editor pointer events: tracks which
/// buttons are held and synthesizes enter/leave as the pointer crosses the
/// canvas rect.
#[derive(Debug, Default)]
pub struct PointerTracker {
    buttons: PointerButtons,
    inside: bool,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buttons(&self) -> PointerButtons {
        self.buttons
    }

    /// Map one egui event. `rect` is where the editor is drawn on screen and
    /// `size` its pixel size; positions are rescaled into editor pixels.
    pub fn translate(
        &mut self,
        event: &egui::Event,
        rect: egui::Rect,
        size: [u32; 2],
    ) -> Option<PointerEvent> {
        match event {
            egui::Event::PointerButton {
                pos,
                button,
                pressed,
                ..
            } => {
                match button {
                    egui::PointerButton::Primary => self.buttons.primary = *pressed,
                    egui::PointerButton::Secondary => self.buttons.secondary = *pressed,
                    _ => return None,
                }
                let editor_pos = screen_to_editor(*pos, rect, size);
                if *pressed {
                    if !rect.contains(*pos) {
                        return None;
                    }
                    self.inside = true;
                    Some(PointerEvent::Down {
                        pos: editor_pos,
                        buttons: self.buttons,
                    })
                } else {
                    Some(PointerEvent::Up { pos: editor_pos })
                }
            }
            egui::Event::PointerMoved(pos) => {
                let editor_pos = screen_to_editor(*pos, rect, size);
                let now_inside = rect.contains(*pos);
                let was_inside = std::mem::replace(&mut self.inside, now_inside);
                match (was_inside, now_inside) {
                    (false, true) => Some(PointerEvent::Enter {
                        pos: editor_pos,
                        buttons: self.buttons,
                    }),
                    (true, false) => Some(PointerEvent::Leave { pos: editor_pos }),
                    (true, true) => Some(PointerEvent::Move {
                        pos: editor_pos,
                        buttons: self.buttons,
                    }),
                    (false, false) => None,
                }
            }
            egui::Event::PointerGone => {
                if std::mem::take(&mut self.inside) {
                    // position is irrelevant once the pointer has left the window
                    Some(PointerEvent::Leave {
                        pos: Vec2::new(-1.0, -1.0),
                    })
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

/// Convert a screen position into editor pixel coordinates for a canvas drawn
/// stretched over `rect`.
pub fn screen_to_editor(pos: egui::Pos2, rect: egui::Rect, size: [u32; 2]) -> Vec2 {
    let w = rect.width().max(f32::EPSILON);
    let h = rect.height().max(f32::EPSILON);
    Vec2::new(
        (pos.x - rect.min.x) / w * size[0] as f32,
        (pos.y - rect.min.y) / h * size[1] as f32,
    )
}
