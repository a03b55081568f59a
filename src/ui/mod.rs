/// User interface module
///
/// Pure view functions that render registry and settings state:
/// - Per-image cards (card.rs)
/// - Settings panel, drop zone, and batch actions (controls.rs)

pub mod card;
pub mod controls;
