//! Cross-platform view nodes and their native synchronization.

use crate::align::{Align, Axis};
use crate::backend::Backend;
use crate::cell::Cell;
use crate::children::{ChildDelta, Children};
use crate::color::Color;
use crate::error::Error;
use crate::host::Host;
use core::fmt;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use uuid::Uuid;

/// A unique identifier for a view node.
///
/// (this is just a UUID)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(Uuid);

impl NodeId {
    pub(crate) fn new() -> NodeId {
        NodeId(Uuid::new_v4())
    }

    /// Stable scalar form, for carrying the id across an FFI boundary.
    pub fn as_u128(self) -> u128 {
        self.0.as_u128()
    }

    /// Rebuilds an id from its [`NodeId::as_u128`] form.
    pub fn from_u128(value: u128) -> NodeId {
        NodeId(Uuid::from_u128(value))
    }
}

type Factory<B> = Box<dyn Fn(&mut B) -> Result<<B as Backend>::Widget, Error>>;
type Applier<B> = Box<dyn Fn(&mut B, &mut <B as Backend>::Widget) -> Result<(), Error>>;

/// The realized native binding: the widget and its layout-parameter object,
/// each constructed at most once per node.
struct Realized<B: Backend> {
    widget: B::Widget,
    layout: B::LayoutParams,
}

struct ViewCore<B: Backend> {
    host: Host<B>,
    id: NodeId,
    factory: Factory<B>,
    native: RefCell<Option<Realized<B>>>,
    halign: RefCell<Cell<Align>>,
    valign: RefCell<Cell<Align>>,
    background: RefCell<Cell<Option<Color>>>,
    children: Children<B>,
    /// Control-specific state appliers, run once when the widget is realized.
    appliers: RefCell<Vec<Applier<B>>>,
}

/// The cross-platform representation of one UI element.
///
/// A `View` is a cheap clonable handle; clones refer to the same node. The
/// native widget behind it is constructed lazily—see the crate-level docs—
/// and is exclusively owned by this node.
pub struct View<B: Backend> {
    core: Rc<ViewCore<B>>,
}

impl<B: Backend> Clone for View<B> {
    fn clone(&self) -> Self {
        View {
            core: Rc::clone(&self.core),
        }
    }
}

impl<B: Backend> View<B> {
    /// Creates a plain container view.
    pub fn new(host: &Host<B>) -> View<B> {
        View::with_factory(host, |backend| backend.new_view())
    }

    /// Creates a view over a custom native widget factory.
    ///
    /// The factory is the sole extension point for introducing new control
    /// types on a platform: it is called exactly once, at realization, with
    /// the backend as the native UI context.
    pub fn with_factory<F>(host: &Host<B>, factory: F) -> View<B>
    where
        F: Fn(&mut B) -> Result<B::Widget, Error> + 'static,
    {
        let core = Rc::new(ViewCore {
            host: host.clone(),
            id: NodeId::new(),
            factory: Box::new(factory),
            native: RefCell::new(None),
            halign: RefCell::new(Cell::new(Align::default())),
            valign: RefCell::new(Cell::new(Align::default())),
            background: RefCell::new(Cell::new(None)),
            children: Children::new(),
            appliers: RefCell::new(Vec::new()),
        });

        // wire the synchronizer as the one observer of each cell and of the
        // child collection
        let weak = Rc::downgrade(&core);
        core.halign
            .borrow_mut()
            .subscribe(move |align| sync_alignment(&weak, Axis::Horizontal, *align));
        let weak = Rc::downgrade(&core);
        core.valign
            .borrow_mut()
            .subscribe(move |align| sync_alignment(&weak, Axis::Vertical, *align));
        let weak = Rc::downgrade(&core);
        core.background
            .borrow_mut()
            .subscribe(move |color| sync_background(&weak, *color));
        let weak = Rc::downgrade(&core);
        core.children.subscribe(move |delta| sync_children(&weak, delta));

        View { core }
    }

    pub fn id(&self) -> NodeId {
        self.core.id
    }

    pub fn horizontal_align(&self) -> Align {
        *self.core.halign.borrow().get()
    }

    /// Sets the horizontal alignment, re-deriving the native layout rules for
    /// that axis in place if the widget is already realized.
    pub fn set_horizontal_align(&self, align: Align) -> Result<(), Error> {
        self.core.halign.borrow_mut().set(align)
    }

    pub fn vertical_align(&self) -> Align {
        *self.core.valign.borrow().get()
    }

    /// Sets the vertical alignment. See [`View::set_horizontal_align`].
    pub fn set_vertical_align(&self, align: Align) -> Result<(), Error> {
        self.core.valign.borrow_mut().set(align)
    }

    pub fn background(&self) -> Option<Color> {
        *self.core.background.borrow().get()
    }

    /// Sets or clears the background color. `None` clears any native
    /// background.
    pub fn set_background(&self, color: Option<Color>) -> Result<(), Error> {
        self.core.background.borrow_mut().set(color)
    }

    /// The node's child collection. Mutations are mirrored onto the native
    /// container as described in the crate-level docs.
    pub fn children(&self) -> &Children<B> {
        &self.core.children
    }

    /// Whether the native widget has been constructed yet.
    pub fn is_realized(&self) -> bool {
        self.core.native.borrow().is_some()
    }

    /// Constructs the native widget if it does not exist yet.
    ///
    /// Idempotent: the widget and its layout-parameter object are memoized
    /// and constructed at most once. Realization applies the current value of
    /// every property and attaches all current children in order, realizing
    /// each child as a side effect of attachment.
    pub fn realize(&self) -> Result<(), Error> {
        realize(&self.core)
    }

    /// Runs `f` with the backend and this node's native widget, realizing it
    /// first if necessary.
    ///
    /// This is the explicit accessor to the native handle; how the realized
    /// root widget is placed on screen is a platform-specific concern layered
    /// on top of it.
    pub fn with_widget<R, F>(&self, f: F) -> Result<R, Error>
    where
        F: FnOnce(&mut B, &mut B::Widget) -> Result<R, Error>,
    {
        self.realize()?;
        let mut native = self.core.native.borrow_mut();
        let realized = native.as_mut().expect("realize left no native widget");
        self.core.host.with_backend(|backend| f(backend, &mut realized.widget))
    }

    pub(crate) fn host(&self) -> &Host<B> {
        &self.core.host
    }

    /// Registers a closure run at realization, after layout and background
    /// are applied and before children are attached. Used by leaf controls to
    /// apply state that was set while the node was still unrealized.
    pub(crate) fn on_realize<F>(&self, applier: F)
    where
        F: Fn(&mut B, &mut B::Widget) -> Result<(), Error> + 'static,
    {
        self.core.appliers.borrow_mut().push(Box::new(applier));
    }
}

impl<B: Backend> fmt::Debug for View<B> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("View")
            .field("id", &self.core.id)
            .field("realized", &self.is_realized())
            .field("children", &self.core.children.len())
            .finish()
    }
}

fn realize<B: Backend>(core: &Rc<ViewCore<B>>) -> Result<(), Error> {
    if core.native.borrow().is_some() {
        return Ok(());
    }
    tracing::trace!(node = ?core.id, "realizing native widget");

    let realized = core.host.with_backend(|backend| -> Result<Realized<B>, Error> {
        let mut widget = (core.factory)(backend)?;
        let mut layout = backend.new_layout_params(&widget)?;
        backend.apply_alignment(&mut layout, Axis::Horizontal, *core.halign.borrow().get())?;
        backend.apply_alignment(&mut layout, Axis::Vertical, *core.valign.borrow().get())?;
        backend.set_layout_params(&mut widget, &layout)?;
        if let Some(color) = *core.background.borrow().get() {
            backend.set_background(&mut widget, Some(color))?;
        }
        Ok(Realized { widget, layout })
    })?;
    *core.native.borrow_mut() = Some(realized);

    // control state set before realization
    for applier in core.appliers.borrow().iter() {
        let mut native = core.native.borrow_mut();
        let realized = native.as_mut().expect("native binding vanished during realize");
        core.host
            .with_backend(|backend| applier(backend, &mut realized.widget))?;
    }

    // children added before realization
    for (index, child) in core.children.to_vec().iter().enumerate() {
        attach_child(core, index, child)?;
    }
    Ok(())
}

/// Realizes `child` and inserts its widget into `core`'s native container.
///
/// # Panics
/// Panics if `child` is the node itself (a node cannot contain itself).
fn attach_child<B: Backend>(core: &ViewCore<B>, index: usize, child: &View<B>) -> Result<(), Error> {
    child.realize()?;
    let mut native = core.native.borrow_mut();
    let parent = native.as_mut().expect("attach_child on unrealized parent");
    let mut child_native = child.core.native.borrow_mut();
    let child_realized = child_native
        .as_mut()
        .expect("child realize left no native widget");
    core.host
        .with_backend(|backend| backend.insert_child(&mut parent.widget, index, &child_realized.widget))
}

fn sync_alignment<B: Backend>(
    weak: &Weak<ViewCore<B>>,
    axis: Axis,
    align: Align,
) -> Result<(), Error> {
    let core = match weak.upgrade() {
        Some(core) => core,
        None => return Ok(()),
    };
    let mut native = core.native.borrow_mut();
    let realized = match native.as_mut() {
        // not realized yet; realization applies the stored value
        None => return Ok(()),
        Some(realized) => realized,
    };
    core.host.with_backend(|backend| {
        backend.apply_alignment(&mut realized.layout, axis, align)?;
        backend.set_layout_params(&mut realized.widget, &realized.layout)
    })
}

fn sync_background<B: Backend>(weak: &Weak<ViewCore<B>>, color: Option<Color>) -> Result<(), Error> {
    let core = match weak.upgrade() {
        Some(core) => core,
        None => return Ok(()),
    };
    let mut native = core.native.borrow_mut();
    let realized = match native.as_mut() {
        None => return Ok(()),
        Some(realized) => realized,
    };
    core.host
        .with_backend(|backend| backend.set_background(&mut realized.widget, color))
}

fn sync_children<B: Backend>(weak: &Weak<ViewCore<B>>, delta: &ChildDelta<B>) -> Result<(), Error> {
    let core = match weak.upgrade() {
        Some(core) => core,
        None => return Ok(()),
    };
    if core.native.borrow().is_none() {
        // the full child list is attached at realization
        return Ok(());
    }
    tracing::trace!(
        node = ?core.id,
        index = delta.index,
        removed = delta.removed.len(),
        added = delta.added.len(),
        "applying child delta",
    );

    // removals first, then insertions, preserving the delta's item order
    for child in &delta.removed {
        if !child.is_realized() {
            // never attached in the first place
            continue;
        }
        let mut native = core.native.borrow_mut();
        let parent = native.as_mut().expect("checked above");
        let mut child_native = child.core.native.borrow_mut();
        let child_realized = child_native.as_mut().expect("checked above");
        core.host
            .with_backend(|backend| backend.remove_child(&mut parent.widget, &child_realized.widget))?;
    }
    for (offset, child) in delta.added.iter().enumerate() {
        attach_child(&core, delta.index + offset, child)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::Headless;

    #[test]
    fn construction_is_lazy() {
        let host = Host::new(Headless::new());
        let view = View::new(&host);
        view.set_horizontal_align(Align::Stretch).unwrap();
        view.set_background(Some(Color::rgb(1., 0., 0.))).unwrap();
        assert!(!view.is_realized(), "property writes must not realize");
        assert_eq!(host.with_backend(|b| b.widgets_created()), 0);
    }

    #[test]
    fn realization_is_memoized() {
        let host = Host::new(Headless::new());
        let view = View::new(&host);
        view.realize().unwrap();
        view.realize().unwrap();
        let _ = view.with_widget(|_, _| Ok(()));
        assert_eq!(host.with_backend(|b| b.widgets_created()), 1);
    }

    #[test]
    fn realization_applies_earlier_writes() {
        let host = Host::new(Headless::new());
        let view = View::new(&host);
        let red = Color::rgb(1., 0., 0.);
        view.set_background(Some(red)).unwrap();
        view.set_horizontal_align(Align::End).unwrap();

        let widget = view.with_widget(|_, w| Ok(w.clone())).unwrap();
        let state = widget.state();
        assert_eq!(state.background, Some(red));
        let layout = state.layout.clone().expect("layout params assigned");
        assert_eq!(layout.rule(Axis::Horizontal), Some(Align::End));
    }

    #[test]
    fn nodes_are_freed_once_the_last_handle_drops() {
        let host = Host::new(Headless::new());
        let view = View::new(&host);
        view.set_background(Some(Color::rgb(0., 0., 1.))).unwrap();
        view.realize().unwrap();
        let weak = Rc::downgrade(&view.core);
        drop(view);
        // the synchronizer observers hold only weak references back to the
        // node, so there is no cycle keeping it alive
        assert!(weak.upgrade().is_none());
    }
}
