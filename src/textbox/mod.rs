pub mod model;
pub mod overlay;

pub use model::{Textbox, TextboxId};
pub use overlay::{EditorAction, EditorKey, FocusTarget, TextboxOverlay};
