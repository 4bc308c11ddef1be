//! App-level errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HaloError {
    /// Window creation or buffer update failed.
    #[error("window error: {0}")]
    Window(String),
}
