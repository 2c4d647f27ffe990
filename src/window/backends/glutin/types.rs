use glutin_crate as glutin;

use super::super::super::events::{Action, Event, Key, Modifiers, MouseButton};

pub fn from_event(source: glutin::Event, hidpi: f64) -> Option<Event> {
    match source {
        glutin::Event::WindowEvent { event, .. } => from_window_event(&event, hidpi),
        _ => None,
    }
}

fn from_window_event(source: &glutin::WindowEvent, hidpi: f64) -> Option<Event> {
    match *source {
        glutin::WindowEvent::CloseRequested => Some(Event::CloseRequested),

        glutin::WindowEvent::Resized(size) => {
            let size = size.to_physical(hidpi);
            Some(Event::Resized {
                width: size.width as u32,
                height: size.height as u32,
            })
        }

        glutin::WindowEvent::CursorMoved { position, .. } => {
            let position = position.to_physical(hidpi);
            Some(Event::CursorMoved {
                x: position.x,
                y: position.y,
            })
        }

        glutin::WindowEvent::MouseWheel { delta, .. } => match delta {
            glutin::MouseScrollDelta::LineDelta(x, y) => Some(Event::Scroll {
                dx: f64::from(x),
                dy: f64::from(y),
            }),
            glutin::MouseScrollDelta::PixelDelta(pos) => Some(Event::Scroll {
                dx: pos.x,
                dy: pos.y,
            }),
        },

        glutin::WindowEvent::MouseInput {
            state,
            button,
            modifiers,
            ..
        } => Some(Event::MouseButton {
            button: from_mouse_button(button),
            action: from_state(state),
            modifiers: from_modifiers(modifiers),
        }),

        glutin::WindowEvent::KeyboardInput { input, .. } => Some(Event::Key {
            key: input.virtual_keycode.map(from_virtual_key).unwrap_or(Key::Unknown),
            scancode: input.scancode,
            action: from_state(input.state),
            modifiers: from_modifiers(input.modifiers),
        }),

        _ => None,
    }
}

fn from_state(state: glutin::ElementState) -> Action {
    match state {
        glutin::ElementState::Pressed => Action::Press,
        glutin::ElementState::Released => Action::Release,
    }
}

fn from_modifiers(modifiers: glutin::ModifiersState) -> Modifiers {
    Modifiers {
        shift: modifiers.shift,
        ctrl: modifiers.ctrl,
        alt: modifiers.alt,
        logo: modifiers.logo,
    }
}

fn from_mouse_button(button: glutin::MouseButton) -> MouseButton {
    match button {
        glutin::MouseButton::Left => MouseButton::Left,
        glutin::MouseButton::Right => MouseButton::Right,
        glutin::MouseButton::Middle => MouseButton::Middle,
        glutin::MouseButton::Other(v) => MouseButton::Other(v),
    }
}

macro_rules! keys {
    ($source:ident, { $($vk:ident => $key:expr,)* }) => {
        match $source {
            $(glutin::VirtualKeyCode::$vk => $key,)*
            _ => Key::Unknown,
        }
    };
}

fn from_virtual_key(source: glutin::VirtualKeyCode) -> Key {
    keys!(source, {
        Key0 => Key::Digit(0), Key1 => Key::Digit(1), Key2 => Key::Digit(2),
        Key3 => Key::Digit(3), Key4 => Key::Digit(4), Key5 => Key::Digit(5),
        Key6 => Key::Digit(6), Key7 => Key::Digit(7), Key8 => Key::Digit(8),
        Key9 => Key::Digit(9),

        A => Key::Character('a'), B => Key::Character('b'), C => Key::Character('c'),
        D => Key::Character('d'), E => Key::Character('e'), F => Key::Character('f'),
        G => Key::Character('g'), H => Key::Character('h'), I => Key::Character('i'),
        J => Key::Character('j'), K => Key::Character('k'), L => Key::Character('l'),
        M => Key::Character('m'), N => Key::Character('n'), O => Key::Character('o'),
        P => Key::Character('p'), Q => Key::Character('q'), R => Key::Character('r'),
        S => Key::Character('s'), T => Key::Character('t'), U => Key::Character('u'),
        V => Key::Character('v'), W => Key::Character('w'), X => Key::Character('x'),
        Y => Key::Character('y'), Z => Key::Character('z'),

        F1 => Key::Function(1), F2 => Key::Function(2), F3 => Key::Function(3),
        F4 => Key::Function(4), F5 => Key::Function(5), F6 => Key::Function(6),
        F7 => Key::Function(7), F8 => Key::Function(8), F9 => Key::Function(9),
        F10 => Key::Function(10), F11 => Key::Function(11), F12 => Key::Function(12),

        Escape => Key::Escape,
        Return => Key::Enter,
        Space => Key::Space,
        Tab => Key::Tab,
        Back => Key::Backspace,
        Delete => Key::Delete,
        Left => Key::Left,
        Right => Key::Right,
        Up => Key::Up,
        Down => Key::Down,
    })
}
