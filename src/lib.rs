//! A minimal cross-platform mobile UI binding layer.
//!
//! # Conceptual overview
//! finch keeps two trees in sync: a tree of plain cross-platform [`View`]
//! nodes owned by application code, and the native widget tree owned by the
//! platform toolkit. Application code mutates properties and child
//! collections on view nodes; each mutation is delivered to a platform
//! [`Backend`] which mirrors it onto the corresponding native widget.
//!
//! ## Views and realization
//! A [`View`] is a cheap handle around a small record of observable property
//! cells, a child collection, and a *deferred* native binding. The native
//! widget is not constructed when the view is created: it is realized lazily,
//! at most once, on first access—typically when the view is attached to an
//! already-realized parent or when [`View::with_widget`] is called. Until
//! then, property writes are only stored; realization applies the current
//! value of every property, so the native widget always ends up reflecting
//! state set before *or* after it came to exist. This keeps cross-platform
//! code unit-testable without a device or emulator.
//!
//! ## Properties and children
//! Every mutable attribute is a [`Cell`]: a single-value holder that notifies
//! exactly one registered observer when the value actually changes (writes of
//! an equal value are suppressed). Child collections are [`Children`]: every
//! structural mutation synchronously emits one [`ChildDelta`] carrying the
//! removed and added views, and the synchronizer applies deltas in mutation
//! order, so the final native child order always matches the collection.
//!
//! ## Backends
//! Platform toolkits are abstracted behind the [`Backend`] trait: widget
//! factories, layout-parameter translation, property setters, and child
//! attachment. `finch-android` implements it over JNI, `finch-ios` over the
//! Objective-C runtime, and [`headless::Headless`] records everything in
//! memory for tests.
//!
//! ## Events
//! Native input flows the other way: a backend pushes [`RawEvent`]s into a
//! channel and [`Host::poll`] drains it, dispatching each press to the
//! handler currently registered for that node.
//!
//! ## Threading
//! Everything here is single-threaded and UI-thread-affine, matching what
//! the native toolkits themselves require. No operation suspends or blocks;
//! every translation is a synchronous side effect of a write.

pub mod align;
pub mod backend;
pub mod cell;
pub mod children;
pub mod color;
pub mod controls;
pub mod error;
pub mod event;
pub mod headless;
mod host;
mod view;

pub use crate::align::{Align, Axis};
pub use crate::backend::Backend;
pub use crate::cell::Cell;
pub use crate::children::{ChildDelta, Children};
pub use crate::color::Color;
pub use crate::controls::{Button, Image, Label, StackView};
pub use crate::error::Error;
pub use crate::event::RawEvent;
pub use crate::host::Host;
pub use crate::view::{NodeId, View};
