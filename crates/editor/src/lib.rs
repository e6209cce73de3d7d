//! Session orchestration over the picking, mutation, and history engines.
//! The host embeds one [`EditorSession`] per page, feeds it input events and
//! ticks, and hands it a [`CommandResolver`] for turning natural-language
//! commands into typed mutations.

pub mod config;
pub mod events;
pub mod resolver;
pub mod session;

pub use config::EditorConfig;
pub use events::{KeyMods, Shortcut, shortcut_for};
pub use resolver::{CommandRequest, CommandResolver, ResolveError};
pub use session::{CommandOutcome, EditorSession, Notice, SessionError, Severity};
