use page_annotate::host::{AnnotationHost, ModePolicy, ModeState};
use page_annotate::keys::{ActivationModifier, KeyCode, KeyEvent, KeyModifiers, ModeCommand};
use page_annotate::scribble::model::Point;
use page_annotate::scribble::{ContainerMetrics, ScribbleOverlay};
use page_annotate::settings::Settings;
use page_annotate::textbox::TextboxOverlay;

fn alt() -> KeyModifiers {
    KeyModifiers {
        alt: true,
        ..KeyModifiers::default()
    }
}

#[test]
fn exclusive_policy_switches_between_modes() {
    let host = AnnotationHost::new(ModePolicy::Exclusive, ActivationModifier::Alt);
    assert_eq!(
        host.handle_key(KeyEvent::pressed(KeyCode::S, alt())),
        Some(ModeCommand::ToggleScribble)
    );
    assert_eq!(
        host.state(),
        ModeState {
            scribble: true,
            textbox: false
        }
    );

    host.handle_key(KeyEvent::pressed(KeyCode::T, alt()));
    assert_eq!(
        host.state(),
        ModeState {
            scribble: false,
            textbox: true
        }
    );

    host.handle_key(KeyEvent::pressed(KeyCode::Escape, KeyModifiers::default()));
    assert_eq!(host.state(), ModeState::default());
}

#[test]
fn ctrl_activation_ignores_alt_chords() {
    let settings = Settings {
        activation_modifier: ActivationModifier::Ctrl,
        ..Settings::default()
    };
    let host = AnnotationHost::from_settings(&settings);
    assert_eq!(host.handle_key(KeyEvent::pressed(KeyCode::S, alt())), None);
    let ctrl = KeyModifiers {
        ctrl: true,
        ..KeyModifiers::default()
    };
    assert_eq!(
        host.handle_key(KeyEvent::pressed(KeyCode::S, ctrl)),
        Some(ModeCommand::ToggleScribble)
    );
}

#[test]
fn overlays_follow_host_flags() {
    let host = AnnotationHost::new(ModePolicy::Exclusive, ActivationModifier::Alt);
    let mut scribble = ScribbleOverlay::new(host.scribble_mode());
    let mut textboxes = TextboxOverlay::new(host.textbox_mode());
    scribble.mount(
        Some(ContainerMetrics {
            width: 100.0,
            scroll_height: 100.0,
            offset_height: 100.0,
            client_height: 100.0,
            viewport_height: 100.0,
        }),
        1.0,
    );

    host.apply(ModeCommand::ToggleScribble);
    assert!(scribble.intercepts_pointer());
    assert!(!textboxes.is_placing());
    scribble.pointer_down(Point::new(5.0, 5.0));
    assert!(scribble.input().is_drawing());

    host.apply(ModeCommand::ToggleTextbox);
    assert!(!scribble.intercepts_pointer());
    assert!(!scribble.input().is_drawing());
    assert!(textboxes.is_placing());

    let id = textboxes.place_at(Point::new(1.0, 2.0)).expect("armed");
    assert!(textboxes.get(id).is_some());
    assert_eq!(host.state(), ModeState::default());
}
