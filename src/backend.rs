//! The native synchronizer capability.

use crate::align::{Align, Axis};
use crate::color::Color;
use crate::error::Error;
use crate::event::RawEvent;
use crate::view::NodeId;
use crossbeam::channel::Sender;

/// A platform synchronizer: translates view state into native widget tree
/// mutations.
///
/// One implementation exists per platform toolkit (Android, iOS, and the
/// in-memory [`Headless`](crate::headless::Headless) backend for tests). All
/// operations are synchronous, immediate side effects and must be called on
/// the thread that owns the native UI.
///
/// The widget factories below cover the built-in controls; new control types
/// are introduced by handing [`View::with_factory`](crate::View::with_factory)
/// any other widget-producing function.
pub trait Backend: 'static {
    /// A handle to one native widget. Exclusively owned by the view node that
    /// realized it.
    type Widget;

    /// The platform's layout-parameter object. Opaque to the core; only the
    /// per-axis alignment rules below are ever derived from it.
    type LayoutParams;

    // -- widget factories --

    /// Creates a plain native container view.
    fn new_view(&mut self) -> Result<Self::Widget, Error>;

    /// Creates a native text label.
    fn new_label(&mut self) -> Result<Self::Widget, Error>;

    /// Creates a native button.
    fn new_button(&mut self) -> Result<Self::Widget, Error>;

    /// Creates a native image view.
    fn new_image(&mut self) -> Result<Self::Widget, Error>;

    /// Creates a native linear/stack container.
    fn new_stack(&mut self) -> Result<Self::Widget, Error>;

    // -- layout --

    /// Creates a fresh layout-parameter object suitable for `widget`.
    fn new_layout_params(&mut self, widget: &Self::Widget) -> Result<Self::LayoutParams, Error>;

    /// Re-derives the rules for one axis of `layout` in place.
    ///
    /// Must only add or remove rules pertaining to `axis`; the other axis's
    /// rules stay untouched. A layout-parameter object outside the recognized
    /// set is a fatal [`Error::UnsupportedLayout`], and an alignment value
    /// the platform does not recognize is a fatal
    /// [`Error::UnsupportedAlignment`]—never a silent no-op.
    fn apply_alignment(
        &mut self,
        layout: &mut Self::LayoutParams,
        axis: Axis,
        align: Align,
    ) -> Result<(), Error>;

    /// Assigns `layout` to the widget.
    fn set_layout_params(
        &mut self,
        widget: &mut Self::Widget,
        layout: &Self::LayoutParams,
    ) -> Result<(), Error>;

    // -- properties --

    /// Sets or clears the widget's background color.
    fn set_background(&mut self, widget: &mut Self::Widget, color: Option<Color>)
        -> Result<(), Error>;

    /// Sets a text label's text.
    fn set_text(&mut self, widget: &mut Self::Widget, text: &str) -> Result<(), Error>;

    /// Sets or clears a text label's text color.
    fn set_text_color(
        &mut self,
        widget: &mut Self::Widget,
        color: Option<Color>,
    ) -> Result<(), Error>;

    /// Sets a button's title for the normal interaction state.
    fn set_title(&mut self, widget: &mut Self::Widget, title: &str) -> Result<(), Error>;

    /// Sets or clears a button's title color for the normal state.
    fn set_title_color(
        &mut self,
        widget: &mut Self::Widget,
        color: Option<Color>,
    ) -> Result<(), Error>;

    /// Resolves `source` against the platform's bundled-asset mechanism and
    /// assigns it as the widget's image content; `None` clears the image.
    ///
    /// A name that cannot be resolved is *not* an error: the previous image
    /// (or no image) stays in place and the miss is logged.
    fn set_image(&mut self, widget: &mut Self::Widget, source: Option<&str>) -> Result<(), Error>;

    /// Subscribes or unsubscribes the native tap event for this widget.
    ///
    /// While a target is set, the backend delivers [`RawEvent::Press`] with
    /// that node id on every native tap. Setting a new target replaces the
    /// old native subscription; `None` leaves no subscription attached.
    fn set_press_target(
        &mut self,
        widget: &mut Self::Widget,
        target: Option<NodeId>,
    ) -> Result<(), Error>;

    // -- hierarchy --

    /// Inserts `child` into `parent`'s native container at `index`.
    fn insert_child(
        &mut self,
        parent: &mut Self::Widget,
        index: usize,
        child: &Self::Widget,
    ) -> Result<(), Error>;

    /// Detaches `child` from `parent`'s native container.
    fn remove_child(&mut self, parent: &mut Self::Widget, child: &Self::Widget)
        -> Result<(), Error>;

    // -- events --

    /// Where the backend delivers native events. Called once by
    /// [`Host::new`](crate::Host::new).
    fn set_event_sink(&mut self, sink: Sender<RawEvent>);
}
