//! Courtroom Simulator
//!
//! Client core for a turn-taking courtroom chat scene: sequences each
//! incoming message through shout, pre-animation, main animation and text
//! reveal, keeps a bounded chat log, and runs the in-scene countdown clocks.
//! Rendering, audio output and networking are collaborators behind traits.

pub mod assets;
pub mod chat_log;
pub mod composer;
pub mod config;
pub mod courtroom;
pub mod error;
pub mod event;
pub mod movie;
pub mod runtime;
pub mod scene;
pub mod script;
pub mod session;
pub mod sound;
pub mod theme;
pub mod timer;
pub mod transcript;

pub use courtroom::{Backend, Courtroom};
pub use error::{Error, Result};
