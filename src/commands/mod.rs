pub mod editor;
pub mod inventory;

pub use editor::{Editor, EditorForm, OrderEmail, SaveOutcome};
pub use inventory::{render_footer, render_row, Inventory};
