//! Raw events delivered from the native side.

use crate::view::NodeId;

/// An event produced by a native widget, sent over the backend's event sink
/// and dispatched by [`Host::poll`](crate::Host::poll).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawEvent {
    /// A press (tap/click) on the widget registered for this node.
    Press(NodeId),
}
