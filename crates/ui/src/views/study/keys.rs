use dioxus::prelude::{Code, Key, Modifiers};

use crate::vm::{StudyIntent, StudyVm};

/// Study shortcut for a key press on the page, if any.
///
/// Presses while the deck selector has focus, or with ctrl/meta/alt held,
/// never map to an intent.
pub(super) fn shortcut_intent(
    vm: &StudyVm,
    key: &Key,
    code: Code,
    modifiers: Modifiers,
    selector_focused: bool,
) -> Option<StudyIntent> {
    if selector_focused || modifiers.intersects(Modifiers::CONTROL | Modifiers::META | Modifiers::ALT)
    {
        return None;
    }
    match key {
        Key::Character(value) => vm.intent_for_key(value),
        _ if code == Code::Space => vm.intent_for_key(" "),
        _ => None,
    }
}
