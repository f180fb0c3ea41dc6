//! Window-system independent input events.

use glam::Vec2;

/// Keys the samples react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    F1,
    Left,
    Right,
    Up,
    Down,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Quit,
    KeyDown(Key),
    MouseDown { button: MouseButton, x: i32, y: i32 },
    MouseUp { button: MouseButton },
    MouseMove { x: i32, y: i32 },
    Resized { width: u32, height: u32 },
}

/// Turns button-held mouse motion into accumulated spin angles.
///
/// The last cursor position follows every motion event, so a drag only ever
/// sees the movement since the previous event.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DragTracker {
    last: Vec2,
    dragging: bool,
}

impl DragTracker {
    pub fn press(&mut self, x: i32, y: i32) {
        self.last = Vec2::new(x as f32, y as f32);
        self.dragging = true;
    }

    pub fn release(&mut self) {
        self.dragging = false;
    }

    /// Records a motion event and applies it to `spin` if a drag is active.
    pub fn motion(&mut self, x: i32, y: i32, spin: &mut Vec2) {
        let current = Vec2::new(x as f32, y as f32);
        if self.dragging {
            *spin -= current - self.last;
        }
        self.last = current;
    }
}
