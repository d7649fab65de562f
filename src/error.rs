//! Error types.

use crate::align::Align;
use thiserror::Error;

/// Errors surfaced by the synchronization core.
///
/// There are exactly two kinds of fault the core itself produces—both fatal
/// misconfigurations that should not be masked. Everything else is a native
/// toolkit failure passed through unmodified. Asset-resolution misses are
/// deliberately *not* errors (see [`Backend::set_image`](crate::Backend)).
#[derive(Debug, Error)]
pub enum Error {
    /// An alignment value outside the set the synchronizer recognizes.
    #[error("unrecognized alignment value: {0:?}")]
    UnsupportedAlignment(Align),

    /// A native layout-parameter object of a type the synchronizer cannot
    /// manipulate.
    #[error("unsupported layout parameters: expected {expected}")]
    UnsupportedLayout {
        /// The layout-parameter type the synchronizer knows how to drive.
        expected: &'static str,
    },

    /// A failure reported by the native toolkit.
    #[error("native toolkit error: {0}")]
    Native(String),
}

impl Error {
    /// Wraps a native toolkit failure.
    pub fn native(message: impl ToString) -> Error {
        Error::Native(message.to_string())
    }
}
