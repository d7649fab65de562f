//! Connects a view tree to a native backend and pumps its events.

use crate::backend::Backend;
use crate::event::RawEvent;
use crate::view::NodeId;
use core::fmt;
use crossbeam::channel::{self, Receiver, TryRecvError};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

type PressHandler = Box<dyn FnMut()>;

struct HostInner<B: Backend> {
    backend: RefCell<B>,
    handlers: RefCell<HashMap<NodeId, PressHandler>>,
    /// The node whose handler is currently running, if any, and whether that
    /// handler removed itself meanwhile. A handler is taken out of the map
    /// while it runs, so a removal during its own invocation is otherwise
    /// invisible to [`Host::dispatch`].
    dispatching: Cell<Option<NodeId>>,
    cleared_mid_dispatch: Cell<bool>,
    events: Receiver<RawEvent>,
}

/// Owns the platform backend, the press-handler registry, and the native
/// event queue.
///
/// Views are constructed against a `Host` handle; clones share the same
/// backend. Like everything else in this crate, a `Host` is bound to the
/// thread that owns the native UI.
pub struct Host<B: Backend> {
    inner: Rc<HostInner<B>>,
}

impl<B: Backend> Clone for Host<B> {
    fn clone(&self) -> Self {
        Host {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<B: Backend> Host<B> {
    /// Creates a host over `backend`, wiring the backend's event sink to this
    /// host's queue.
    pub fn new(mut backend: B) -> Host<B> {
        let (sink, events) = channel::unbounded();
        backend.set_event_sink(sink);
        Host {
            inner: Rc::new(HostInner {
                backend: RefCell::new(backend),
                handlers: RefCell::new(HashMap::new()),
                dispatching: Cell::new(None),
                cleared_mid_dispatch: Cell::new(false),
                events,
            }),
        }
    }

    /// Receives all pending native events and dispatches each to the handler
    /// currently registered for its node.
    pub fn poll(&self) {
        loop {
            match self.inner.events.try_recv() {
                Ok(event) => self.dispatch(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => panic!("event sender has been disconnected"),
            }
        }
    }

    fn dispatch(&self, event: RawEvent) {
        match event {
            RawEvent::Press(id) => {
                // take the handler out so it may re-enter the host (e.g.
                // replace itself)
                let handler = self.inner.handlers.borrow_mut().remove(&id);
                match handler {
                    Some(mut handler) => {
                        self.inner.dispatching.set(Some(id));
                        self.inner.cleared_mid_dispatch.set(false);
                        handler();
                        self.inner.dispatching.set(None);
                        // keep it registered unless it replaced or removed
                        // itself meanwhile
                        if !self.inner.cleared_mid_dispatch.get() {
                            self.inner
                                .handlers
                                .borrow_mut()
                                .entry(id)
                                .or_insert(handler);
                        }
                    }
                    None => tracing::debug!(node = ?id, "press event with no registered handler"),
                }
            }
        }
    }

    /// Runs `f` with exclusive access to the backend.
    ///
    /// This is also how platform-specific surface area (e.g. attaching the
    /// realized root widget to a window or activity) is reached.
    pub fn with_backend<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut B) -> R,
    {
        f(&mut self.inner.backend.borrow_mut())
    }

    /// Registers, replaces, or removes the press handler for a node.
    pub(crate) fn set_press_handler(&self, id: NodeId, handler: Option<PressHandler>) {
        let mut handlers = self.inner.handlers.borrow_mut();
        match handler {
            Some(handler) => {
                handlers.insert(id, handler);
            }
            None => {
                handlers.remove(&id);
                // the handler may be clearing itself from inside dispatch,
                // where it is already out of the map
                if self.inner.dispatching.get() == Some(id) {
                    self.inner.cleared_mid_dispatch.set(true);
                }
            }
        }
    }
}

impl<B: Backend> fmt::Debug for Host<B> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Host")
            .field("handlers", &self.inner.handlers.borrow().len())
            .field("pending_events", &self.inner.events.len())
            .finish()
    }
}
