use crate::geometry::Point;
use crate::keys::{KeyCode, KeyEvent, KeyModifiers, KeyState};
use eframe::egui;

pub fn translate_key(key: egui::Key) -> KeyCode {
    match key {
        egui::Key::S => KeyCode::S,
        egui::Key::T => KeyCode::T,
        egui::Key::E => KeyCode::E,
        egui::Key::Space => KeyCode::Space,
        egui::Key::Enter => KeyCode::Enter,
        egui::Key::Escape => KeyCode::Escape,
        _ => KeyCode::Other,
    }
}

pub fn translate_modifiers(modifiers: egui::Modifiers) -> KeyModifiers {
    KeyModifiers {
        ctrl: modifiers.ctrl || modifiers.command,
        alt: modifiers.alt,
        shift: modifiers.shift,
    }
}

/// Key presses and releases from this frame, auto-repeat dropped.
pub fn key_events(events: &[egui::Event]) -> Vec<KeyEvent> {
    events
        .iter()
        .filter_map(|event| match event {
            egui::Event::Key {
                key,
                pressed,
                repeat,
                modifiers,
                ..
            } if !*repeat => {
                let code = translate_key(*key);
                if code == KeyCode::Other {
                    return None;
                }
                Some(KeyEvent {
                    key: code,
                    modifiers: translate_modifiers(*modifiers),
                    state: if *pressed {
                        KeyState::Pressed
                    } else {
                        KeyState::Released
                    },
                })
            }
            _ => None,
        })
        .collect()
}

/// Screen position to page coordinates given the page origin on screen.
pub fn to_page(pos: egui::Pos2, origin: egui::Pos2) -> Point {
    Point::new(pos.x - origin.x, pos.y - origin.y)
}

pub fn to_screen(page: Point, origin: egui::Pos2) -> egui::Pos2 {
    egui::pos2(origin.x + page.x, origin.y + page.y)
}
