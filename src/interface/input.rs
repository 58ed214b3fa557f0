use glutin::event::VirtualKeyCode;

use std::collections::HashMap;

lazy_static! {
    /// Number keys, on the main row and the keypad, and the level each one requests.
    static ref LEVEL_KEYS: HashMap<VirtualKeyCode, i32> = {
        use VirtualKeyCode::*;

        let rows = [
            (Key0, Numpad0), (Key1, Numpad1), (Key2, Numpad2), (Key3, Numpad3), (Key4, Numpad4),
            (Key5, Numpad5), (Key6, Numpad6), (Key7, Numpad7), (Key8, Numpad8), (Key9, Numpad9),
        ];

        let mut map = HashMap::new();
        for (level, (main, pad)) in rows.iter().enumerate() {
            map.insert(*main, level as i32);
            map.insert(*pad, level as i32);
        }
        map
    };
}

/// What a key press asks the program to do.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Command {
    /// Redraw at this level. For subdivision that's the recursion depth.
    Level(i32),
    Quit,
}

pub fn handle_keypress(key: VirtualKeyCode) -> Option<Command> {
    match key {
        VirtualKeyCode::Escape | VirtualKeyCode::Q => Some(Command::Quit),
        k => LEVEL_KEYS.get(&k).map(|level| Command::Level(*level)),
    }
}
