use glsamples_core::input::{InputEvent, Key, MouseButton};
use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::Keycode;
use sdl2::messagebox::{MessageBoxFlag, show_simple_message_box};

/// Converts an SDL event into the input the samples react to.
///
/// A size change reports `drawable_size` rather than the window's logical
/// size, which differs from the pixel size on high-DPI displays.
pub fn translate(
    event: &Event,
    drawable_size: impl FnOnce() -> (u32, u32),
) -> Option<InputEvent> {
    match event {
        Event::Quit { .. } => Some(InputEvent::Quit),
        Event::KeyDown {
            keycode: Some(keycode),
            ..
        } => Some(InputEvent::KeyDown(translate_key(*keycode))),
        Event::MouseButtonDown {
            mouse_btn, x, y, ..
        } => Some(InputEvent::MouseDown {
            button: translate_button(*mouse_btn),
            x: *x,
            y: *y,
        }),
        Event::MouseButtonUp { mouse_btn, .. } => Some(InputEvent::MouseUp {
            button: translate_button(*mouse_btn),
        }),
        Event::MouseMotion { x, y, .. } => Some(InputEvent::MouseMove { x: *x, y: *y }),
        Event::Window {
            win_event: WindowEvent::SizeChanged(..),
            ..
        } => {
            let (width, height) = drawable_size();
            Some(InputEvent::Resized { width, height })
        }
        _ => None,
    }
}

fn translate_key(keycode: Keycode) -> Key {
    match keycode {
        Keycode::Escape => Key::Escape,
        Keycode::F1 => Key::F1,
        Keycode::Left => Key::Left,
        Keycode::Right => Key::Right,
        Keycode::Up => Key::Up,
        Keycode::Down => Key::Down,
        _ => Key::Other,
    }
}

fn translate_button(button: sdl2::mouse::MouseButton) -> MouseButton {
    match button {
        sdl2::mouse::MouseButton::Left => MouseButton::Left,
        sdl2::mouse::MouseButton::Right => MouseButton::Right,
        _ => MouseButton::Other,
    }
}

/// Shows failures to the user in a blocking dialog and logs them.
pub struct Reporter<'a> {
    window: Option<&'a sdl2::video::Window>,
}

impl<'a> Reporter<'a> {
    pub fn new(window: Option<&'a sdl2::video::Window>) -> Self {
        Self { window }
    }

    pub fn error(&self, title: &str, message: &str) {
        log::error!("{title}: {message}");
        let shown = show_simple_message_box(MessageBoxFlag::ERROR, title, message, self.window);
        if let Err(e) = shown {
            log::warn!("could not show message box: {e}");
        }
    }
}
