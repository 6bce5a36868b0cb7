//! Physical key to drill action lookup.
//!
//! Keys are DOM `KeyboardEvent.key` values; two physical keys map to each choice.

use crate::model::Side;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrillAction {
    Choose(Side),
    ReplayCue,
    Acknowledge,
}

const BINDINGS: &[(&str, DrillAction)] = &[
    ("ArrowLeft", DrillAction::Choose(Side::Left)),
    ("a", DrillAction::Choose(Side::Left)),
    ("ArrowRight", DrillAction::Choose(Side::Right)),
    ("d", DrillAction::Choose(Side::Right)),
    (" ", DrillAction::ReplayCue),
    ("Spacebar", DrillAction::ReplayCue),
    ("Enter", DrillAction::Acknowledge),
];

/// Returns the action bound to `key`, if any.
///
/// Letter bindings ignore case so Shift or Caps Lock do not disable them.
#[must_use]
pub fn action_for_key(key: &str) -> Option<DrillAction> {
    BINDINGS.iter().find_map(|(bound, action)| {
        let hit = if bound.chars().count() == 1 && bound.chars().all(char::is_alphabetic) {
            key.eq_ignore_ascii_case(bound)
        } else {
            key == *bound
        };
        hit.then_some(*action)
    })
}

/// Keys bound to `action`, in lookup order.
pub fn keys_for(action: DrillAction) -> impl Iterator<Item = &'static str> {
    BINDINGS
        .iter()
        .filter(move |(_, bound)| *bound == action)
        .map(|(key, _)| *key)
}
