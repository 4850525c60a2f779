//! Type a count and a direction (`10j`) into a prompt and have the cursor move
//! there, with relative line numbers and a destination highlight switched on
//! while typing and reliably switched off afterwards.

pub mod config;
pub mod constants;
pub mod dispose;
pub mod environment;
pub mod extension;
pub mod host;
pub mod logger;
pub mod motion;
pub mod session;
pub mod terminal;

#[cfg(test)]
pub(crate) mod testing;

pub use config::Config;
pub use dispose::{Disposable, Disposer};
pub use extension::Extension;
pub use motion::{Direction, Motion, MotionParseError, parse};
pub use session::{MotionSession, SessionOutcome};
