//! Vietnamese input method engine for Telex and VNI.
//!
//! The host turns each key press into a key code from [`keys`] and calls
//! [`Engine::process_key`]; the returned [`KeyResult`] says how many
//! characters to delete and what to insert. Every word is kept twice, as
//! composed text and as the raw keys, so any word can be put back exactly as
//! it was typed.
//!
//! ```
//! use vikey::Engine;
//!
//! let mut screen = String::new();
//! let mut engine = Engine::new();
//! for ch in "vieetj ".chars() {
//!     engine.feed(ch).apply_to(&mut screen, Some(ch));
//! }
//! assert_eq!(screen, "việt ");
//! ```

pub mod buffers;
pub mod chars;
pub mod config;
pub mod engine;
pub mod english;
pub mod history;
pub mod keys;
pub mod modes;
pub mod modifier;
pub mod phonology;
pub mod restore;
pub mod shortcut;
pub mod syllable;
pub mod validation;

pub use config::{ConfigError, EngineConfig};
pub use engine::{Action, Engine, KeyResult, MAX_OUTPUT};
pub use modes::InputMethod;
pub use shortcut::{CasePolicy, MethodFilter, Shortcut, ShortcutTable, TriggerCondition};
pub use validation::SyllableState;

#[cfg(test)]
mod tests;
