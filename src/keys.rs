use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    S,
    T,
    E,
    Space,
    Enter,
    Escape,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyModifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Pressed,
    Released,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: KeyCode,
    pub modifiers: KeyModifiers,
    pub state: KeyState,
}

impl KeyEvent {
    pub fn pressed(key: KeyCode, modifiers: KeyModifiers) -> Self {
        Self {
            key,
            modifiers,
            state: KeyState::Pressed,
        }
    }

    pub fn released(key: KeyCode) -> Self {
        Self {
            key,
            modifiers: KeyModifiers::default(),
            state: KeyState::Released,
        }
    }

    pub fn is_pressed(&self) -> bool {
        matches!(self.state, KeyState::Pressed)
    }
}

/// Modifier that has to be held together with `S`/`T` to toggle a mode.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivationModifier {
    #[default]
    Alt,
    Ctrl,
}

impl ActivationModifier {
    pub fn is_held(self, modifiers: KeyModifiers) -> bool {
        match self {
            ActivationModifier::Alt => modifiers.alt,
            ActivationModifier::Ctrl => modifiers.ctrl,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ActivationModifier::Alt => "Alt",
            ActivationModifier::Ctrl => "Ctrl",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeCommand {
    ToggleScribble,
    ToggleTextbox,
    ExitAll,
}

pub fn map_key_event_to_command(
    activation: ActivationModifier,
    event: KeyEvent,
) -> Option<ModeCommand> {
    if !event.is_pressed() {
        return None;
    }

    match event.key {
        KeyCode::Escape => Some(ModeCommand::ExitAll),
        KeyCode::S if activation.is_held(event.modifiers) => Some(ModeCommand::ToggleScribble),
        KeyCode::T if activation.is_held(event.modifiers) => Some(ModeCommand::ToggleTextbox),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alt() -> KeyModifiers {
        KeyModifiers {
            alt: true,
            ..KeyModifiers::default()
        }
    }

    #[test]
    fn chords_require_the_configured_modifier() {
        let activation = ActivationModifier::Alt;
        assert_eq!(
            map_key_event_to_command(activation, KeyEvent::pressed(KeyCode::S, alt())),
            Some(ModeCommand::ToggleScribble)
        );
        assert_eq!(
            map_key_event_to_command(activation, KeyEvent::pressed(KeyCode::T, alt())),
            Some(ModeCommand::ToggleTextbox)
        );
        assert_eq!(
            map_key_event_to_command(
                activation,
                KeyEvent::pressed(KeyCode::S, KeyModifiers::default())
            ),
            None
        );
        assert_eq!(
            map_key_event_to_command(
                ActivationModifier::Ctrl,
                KeyEvent::pressed(KeyCode::S, alt())
            ),
            None
        );
    }

    #[test]
    fn escape_exits_without_modifier_and_releases_are_ignored() {
        assert_eq!(
            map_key_event_to_command(
                ActivationModifier::Alt,
                KeyEvent::pressed(KeyCode::Escape, KeyModifiers::default())
            ),
            Some(ModeCommand::ExitAll)
        );
        assert_eq!(
            map_key_event_to_command(ActivationModifier::Alt, KeyEvent::released(KeyCode::Escape)),
            None
        );
    }
}
