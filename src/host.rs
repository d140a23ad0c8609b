use crate::keys::{map_key_event_to_command, ActivationModifier, KeyEvent, ModeCommand};
use crate::mode::ModeFlag;
use crate::settings::Settings;
use serde::{Deserialize, Serialize};

/// What happens when a chord activates one mode while the other is on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ModePolicy {
    /// Turning one mode on turns the other off.
    #[default]
    Exclusive,
    /// Both flags toggle on their own.
    Independent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModeState {
    pub scribble: bool,
    pub textbox: bool,
}

/// Owner of both mode flags; overlays receive clones.
#[derive(Debug, Clone)]
pub struct AnnotationHost {
    scribble_mode: ModeFlag,
    textbox_mode: ModeFlag,
    policy: ModePolicy,
    activation: ActivationModifier,
}

impl AnnotationHost {
    pub fn new(policy: ModePolicy, activation: ActivationModifier) -> Self {
        Self {
            scribble_mode: ModeFlag::new(false),
            textbox_mode: ModeFlag::new(false),
            policy,
            activation,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.mode_policy, settings.activation_modifier)
    }

    pub fn scribble_mode(&self) -> ModeFlag {
        self.scribble_mode.clone()
    }

    pub fn textbox_mode(&self) -> ModeFlag {
        self.textbox_mode.clone()
    }

    pub fn state(&self) -> ModeState {
        ModeState {
            scribble: self.scribble_mode.get(),
            textbox: self.textbox_mode.get(),
        }
    }

    pub fn handle_key(&self, event: KeyEvent) -> Option<ModeCommand> {
        let command = map_key_event_to_command(self.activation, event)?;
        self.apply(command);
        Some(command)
    }

    pub fn apply(&self, command: ModeCommand) -> ModeState {
        match command {
            ModeCommand::ToggleScribble => {
                let on = self.scribble_mode.toggle();
                if on && self.policy == ModePolicy::Exclusive {
                    self.textbox_mode.set(false);
                }
            }
            ModeCommand::ToggleTextbox => {
                let on = self.textbox_mode.toggle();
                if on && self.policy == ModePolicy::Exclusive {
                    self.scribble_mode.set(false);
                }
            }
            ModeCommand::ExitAll => {
                self.scribble_mode.set(false);
                self.textbox_mode.set(false);
            }
        }
        let state = self.state();
        tracing::debug!(?command, ?state, "mode command applied");
        state
    }
}
