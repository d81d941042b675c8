//! Diagnostic emitters.

mod terminal;

pub use terminal::{ColorMode, TerminalEmitter};
