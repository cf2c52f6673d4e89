// App-level errors. Every variant states *where* things went wrong.
// The animation engine itself never fails; these come from the window,
// the command line, and snapshot output.

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("window init error: {0}")]
    WindowInit(String), // creating the window failed
    #[error("window update error: {0}")]
    WindowUpdate(String), // pushing a frame to the window failed
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("snapshot error: {0}")]
    Snapshot(#[from] image::ImageError),
}
