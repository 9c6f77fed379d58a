//! A Flappy Bird style side-scroller.
//!
//! The simulation runs in a fixed logical field measured in pixels and is
//! advanced by wall-clock milliseconds, so its speed does not depend on the
//! frame rate. The terminal front end scales that field onto half-block
//! pixels.

pub mod audio;
pub mod config;
pub mod driver;
pub mod error;
pub mod font;
pub mod input;
pub mod physics;
pub mod pixels;
pub mod render;
pub mod session;
pub mod spawner;
pub mod sprite;

pub use config::{Config, Params};
pub use driver::LoopDriver;
pub use error::{ConfigError, SpriteError};
pub use physics::{StepEvents, step};
pub use session::{AssetState, Bird, FlapOutcome, Phase, Session};
pub use spawner::{Pipe, Spawner};
pub use sprite::{AssetLoader, AssetOutcome, Sprite, SpriteSource};
