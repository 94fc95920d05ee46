//! Chat widget components. These render conversation state and never
//! mutate it.

pub mod composer;
pub mod launcher;
pub mod panel;

pub use composer::{Composer, ComposerResult};
pub use launcher::Launcher;
pub use panel::ChatPanel;
