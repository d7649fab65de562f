//! Alignment of a view within its parent container.

/// How a view is sized and positioned along one axis of its parent.
///
/// Marked non-exhaustive so out-of-crate synchronizers must carry a fallback
/// arm that raises [`Error::UnsupportedAlignment`](crate::Error) instead of
/// silently ignoring a value they do not recognize.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Align {
    /// Natural (wrap) size, pinned to the leading edge: left for the
    /// horizontal axis, top for the vertical axis.
    Start,
    /// Natural size, centered within the parent.
    Center,
    /// Natural size, pinned to the trailing edge: right for the horizontal
    /// axis, bottom for the vertical axis.
    End,
    /// Expands to fill the parent along this axis.
    Stretch,
}

impl Default for Align {
    fn default() -> Align {
        Align::Center
    }
}

/// The two layout axes. Alignment is manipulated per axis; changing one axis
/// must leave the other axis's native layout rules untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}
