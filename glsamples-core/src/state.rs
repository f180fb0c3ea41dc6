//! Application state shared by the input and render steps.
//!
//! Every sample owns one [`AppState`]; input events are folded into it with
//! [`AppState::apply`] and the render step reads it back.

use glam::{Vec2, Vec3};

use crate::input::{DragTracker, InputEvent, Key, MouseButton};

/// How far one arrow key press moves the light.
pub const LIGHT_STEP: f32 = 0.01;

/// What the event loop should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    /// Spin angles in degrees driven by a left-button drag.
    pub spin_left: Vec2,
    /// Spin angles in degrees driven by a right-button drag.
    pub spin_right: Vec2,
    pub light_position: Vec3,
    pub use_shaders: bool,
    pub viewport: Viewport,
    left_drag: DragTracker,
    right_drag: DragTracker,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            spin_left: Vec2::ZERO,
            spin_right: Vec2::new(-75.0, 0.0),
            light_position: Vec3::new(0.0, 0.0, -3.5),
            use_shaders: true,
            viewport: Viewport::default(),
            left_drag: DragTracker::default(),
            right_drag: DragTracker::default(),
        }
    }
}

impl AppState {
    pub fn with_viewport(width: u32, height: u32) -> Self {
        Self {
            viewport: Viewport { width, height },
            ..Self::default()
        }
    }

    pub fn apply(&mut self, event: &InputEvent) -> Control {
        match *event {
            InputEvent::Quit | InputEvent::KeyDown(Key::Escape) => return Control::Quit,
            InputEvent::KeyDown(Key::F1) => {
                self.use_shaders = !self.use_shaders;
                log::info!("shaders {}", if self.use_shaders { "on" } else { "off" });
            }
            InputEvent::KeyDown(Key::Left) => self.light_position.x -= LIGHT_STEP,
            InputEvent::KeyDown(Key::Right) => self.light_position.x += LIGHT_STEP,
            InputEvent::KeyDown(Key::Up) => self.light_position.y += LIGHT_STEP,
            InputEvent::KeyDown(Key::Down) => self.light_position.y -= LIGHT_STEP,
            InputEvent::KeyDown(Key::Other) => {}
            InputEvent::MouseDown { button, x, y } => match button {
                MouseButton::Left => self.left_drag.press(x, y),
                MouseButton::Right => self.right_drag.press(x, y),
                MouseButton::Other => {}
            },
            InputEvent::MouseUp { button } => match button {
                MouseButton::Left => self.left_drag.release(),
                MouseButton::Right => self.right_drag.release(),
                MouseButton::Other => {}
            },
            InputEvent::MouseMove { x, y } => {
                self.left_drag.motion(x, y, &mut self.spin_left);
                self.right_drag.motion(x, y, &mut self.spin_right);
            }
            InputEvent::Resized { width, height } => {
                self.viewport = Viewport { width, height };
            }
        }
        Control::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_and_quit_stop_the_loop() {
        let mut state = AppState::default();
        assert_eq!(state.apply(&InputEvent::KeyDown(Key::Escape)), Control::Quit);
        assert_eq!(state.apply(&InputEvent::Quit), Control::Quit);
        assert_eq!(state.apply(&InputEvent::KeyDown(Key::Other)), Control::Continue);
    }

    #[test]
    fn f1_toggles_shader_usage() {
        let mut state = AppState::default();
        assert!(state.use_shaders);
        state.apply(&InputEvent::KeyDown(Key::F1));
        assert!(!state.use_shaders);
        state.apply(&InputEvent::KeyDown(Key::F1));
        assert!(state.use_shaders);
    }

    #[test]
    fn arrow_keys_nudge_the_light() {
        let mut state = AppState::default();
        state.apply(&InputEvent::KeyDown(Key::Right));
        state.apply(&InputEvent::KeyDown(Key::Right));
        state.apply(&InputEvent::KeyDown(Key::Left));
        state.apply(&InputEvent::KeyDown(Key::Up));
        assert!((state.light_position.x - LIGHT_STEP).abs() < 1e-6);
        assert!((state.light_position.y - LIGHT_STEP).abs() < 1e-6);
        assert_eq!(state.light_position.z, -3.5);

        state.apply(&InputEvent::KeyDown(Key::Down));
        assert!(state.light_position.y.abs() < 1e-6);
    }

    #[test]
    fn each_button_drives_its_own_spin() {
        let mut state = AppState::default();
        state.apply(&InputEvent::MouseDown {
            button: MouseButton::Left,
            x: 10,
            y: 10,
        });
        state.apply(&InputEvent::MouseMove { x: 20, y: 5 });
        state.apply(&InputEvent::MouseUp {
            button: MouseButton::Left,
        });
        state.apply(&InputEvent::MouseMove { x: 40, y: 40 });

        assert_eq!(state.spin_left, Vec2::new(-10.0, 5.0));
        assert_eq!(state.spin_right, Vec2::new(-75.0, 0.0));

        state.apply(&InputEvent::MouseDown {
            button: MouseButton::Right,
            x: 40,
            y: 40,
        });
        state.apply(&InputEvent::MouseMove { x: 30, y: 40 });
        assert_eq!(state.spin_right, Vec2::new(-65.0, 0.0));
        assert_eq!(state.spin_left, Vec2::new(-10.0, 5.0));
    }

    #[test]
    fn resize_updates_the_viewport() {
        let mut state = AppState::with_viewport(640, 480);
        state.apply(&InputEvent::Resized {
            width: 1024,
            height: 0,
        });
        assert_eq!(state.viewport.width, 1024);
        assert_eq!(state.viewport.aspect(), 1.0);
    }
}
