//! An in-memory backend with no platform dependency.
//!
//! Records every synchronizer operation on plain Rust values, so
//! cross-platform view code can be exercised without a device or emulator.
//! The crate's own test suite runs on it; applications can use it the same
//! way for host-side unit tests.

use crate::align::{Align, Axis};
use crate::backend::Backend;
use crate::color::Color;
use crate::error::Error;
use crate::event::RawEvent;
use crate::view::NodeId;
use core::fmt;
use crossbeam::channel::Sender;
use std::cell::{Ref, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

/// What kind of native widget a headless handle stands in for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetKind {
    View,
    Label,
    Button,
    Image,
    Stack,
    /// A widget from outside this synchronizer's world, carrying layout
    /// parameters it does not recognize.
    Foreign,
}

/// The recorded state of one headless widget.
#[derive(Debug)]
pub struct WidgetState {
    pub kind: WidgetKind,
    /// Attached children, in native order.
    pub children: Vec<HeadlessWidget>,
    pub background: Option<Color>,
    pub text: Option<String>,
    pub text_color: Option<Color>,
    pub title: Option<String>,
    pub title_color: Option<Color>,
    pub image: Option<String>,
    pub press_target: Option<NodeId>,
    /// The last layout-parameter object assigned to the widget.
    pub layout: Option<HeadlessLayout>,
}

/// A cheap handle to one recorded widget; clones refer to the same widget.
#[derive(Clone)]
pub struct HeadlessWidget(Rc<RefCell<WidgetState>>);

impl HeadlessWidget {
    fn new(kind: WidgetKind) -> HeadlessWidget {
        HeadlessWidget(Rc::new(RefCell::new(WidgetState {
            kind,
            children: Vec::new(),
            background: None,
            text: None,
            text_color: None,
            title: None,
            title_color: None,
            image: None,
            press_target: None,
            layout: None,
        })))
    }

    /// Borrows the recorded state for assertions.
    pub fn state(&self) -> Ref<'_, WidgetState> {
        self.0.borrow()
    }

    /// Whether two handles refer to the same widget.
    pub fn same_widget(&self, other: &HeadlessWidget) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for HeadlessWidget {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let state = self.0.borrow();
        f.debug_struct("HeadlessWidget")
            .field("kind", &state.kind)
            .field("children", &state.children.len())
            .finish()
    }
}

/// The headless layout-parameter object: independent per-axis rule slots,
/// mimicking rule-based native layout params.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadlessLayout {
    Rules {
        horizontal: Option<Align>,
        vertical: Option<Align>,
    },
    /// Stands in for a platform layout-parameter type outside the recognized
    /// set; every alignment application on it fails.
    Foreign,
}

impl HeadlessLayout {
    /// The rule currently set for one axis.
    pub fn rule(&self, axis: Axis) -> Option<Align> {
        match self {
            HeadlessLayout::Rules {
                horizontal,
                vertical,
            } => match axis {
                Axis::Horizontal => *horizontal,
                Axis::Vertical => *vertical,
            },
            HeadlessLayout::Foreign => None,
        }
    }
}

/// The in-memory backend.
#[derive(Debug, Default)]
pub struct Headless {
    sink: Option<Sender<RawEvent>>,
    assets: HashSet<String>,
    widgets_created: usize,
    rejected_alignment: Option<Align>,
}

impl Headless {
    pub fn new() -> Headless {
        Headless::default()
    }

    /// Registers a bundled asset name that [`Backend::set_image`] will
    /// resolve.
    pub fn add_asset(&mut self, name: impl Into<String>) {
        self.assets.insert(name.into());
    }

    /// How many widgets the factories have constructed so far.
    pub fn widgets_created(&self) -> usize {
        self.widgets_created
    }

    /// A factory for widgets carrying unrecognized layout parameters, for
    /// exercising the unsupported-configuration fault.
    pub fn foreign_widget(&mut self) -> Result<HeadlessWidget, Error> {
        Ok(self.make(WidgetKind::Foreign))
    }

    /// Makes [`Backend::apply_alignment`] reject `align`, standing in for a
    /// platform that does not recognize the value.
    pub fn reject_alignment(&mut self, align: Align) {
        self.rejected_alignment = Some(align);
    }

    /// Synthesizes a native tap on the widget, delivering a press event to
    /// the registered target, if any.
    pub fn press(&self, widget: &HeadlessWidget) {
        let target = widget.state().press_target;
        match (target, &self.sink) {
            (Some(id), Some(sink)) => {
                let _ = sink.send(RawEvent::Press(id));
            }
            _ => {}
        }
    }

    fn make(&mut self, kind: WidgetKind) -> HeadlessWidget {
        self.widgets_created += 1;
        HeadlessWidget::new(kind)
    }
}

impl Backend for Headless {
    type Widget = HeadlessWidget;
    type LayoutParams = HeadlessLayout;

    fn new_view(&mut self) -> Result<HeadlessWidget, Error> {
        Ok(self.make(WidgetKind::View))
    }

    fn new_label(&mut self) -> Result<HeadlessWidget, Error> {
        Ok(self.make(WidgetKind::Label))
    }

    fn new_button(&mut self) -> Result<HeadlessWidget, Error> {
        Ok(self.make(WidgetKind::Button))
    }

    fn new_image(&mut self) -> Result<HeadlessWidget, Error> {
        Ok(self.make(WidgetKind::Image))
    }

    fn new_stack(&mut self) -> Result<HeadlessWidget, Error> {
        Ok(self.make(WidgetKind::Stack))
    }

    fn new_layout_params(&mut self, widget: &HeadlessWidget) -> Result<HeadlessLayout, Error> {
        Ok(match widget.state().kind {
            WidgetKind::Foreign => HeadlessLayout::Foreign,
            _ => HeadlessLayout::Rules {
                horizontal: None,
                vertical: None,
            },
        })
    }

    fn apply_alignment(
        &mut self,
        layout: &mut HeadlessLayout,
        axis: Axis,
        align: Align,
    ) -> Result<(), Error> {
        if self.rejected_alignment == Some(align) {
            return Err(Error::UnsupportedAlignment(align));
        }
        match layout {
            HeadlessLayout::Rules {
                horizontal,
                vertical,
            } => {
                // only the changed axis's slot is touched
                match axis {
                    Axis::Horizontal => *horizontal = Some(align),
                    Axis::Vertical => *vertical = Some(align),
                }
                Ok(())
            }
            HeadlessLayout::Foreign => Err(Error::UnsupportedLayout {
                expected: "HeadlessLayout::Rules",
            }),
        }
    }

    fn set_layout_params(
        &mut self,
        widget: &mut HeadlessWidget,
        layout: &HeadlessLayout,
    ) -> Result<(), Error> {
        widget.0.borrow_mut().layout = Some(layout.clone());
        Ok(())
    }

    fn set_background(
        &mut self,
        widget: &mut HeadlessWidget,
        color: Option<Color>,
    ) -> Result<(), Error> {
        widget.0.borrow_mut().background = color;
        Ok(())
    }

    fn set_text(&mut self, widget: &mut HeadlessWidget, text: &str) -> Result<(), Error> {
        widget.0.borrow_mut().text = Some(text.to_string());
        Ok(())
    }

    fn set_text_color(
        &mut self,
        widget: &mut HeadlessWidget,
        color: Option<Color>,
    ) -> Result<(), Error> {
        widget.0.borrow_mut().text_color = color;
        Ok(())
    }

    fn set_title(&mut self, widget: &mut HeadlessWidget, title: &str) -> Result<(), Error> {
        widget.0.borrow_mut().title = Some(title.to_string());
        Ok(())
    }

    fn set_title_color(
        &mut self,
        widget: &mut HeadlessWidget,
        color: Option<Color>,
    ) -> Result<(), Error> {
        widget.0.borrow_mut().title_color = color;
        Ok(())
    }

    fn set_image(&mut self, widget: &mut HeadlessWidget, source: Option<&str>) -> Result<(), Error> {
        match source {
            Some(name) if self.assets.contains(name) => {
                widget.0.borrow_mut().image = Some(name.to_string());
            }
            Some(name) => {
                // resolution miss: previous content stays in place
                tracing::debug!(asset = name, "image asset not found");
            }
            None => {
                widget.0.borrow_mut().image = None;
            }
        }
        Ok(())
    }

    fn set_press_target(
        &mut self,
        widget: &mut HeadlessWidget,
        target: Option<NodeId>,
    ) -> Result<(), Error> {
        widget.0.borrow_mut().press_target = target;
        Ok(())
    }

    fn insert_child(
        &mut self,
        parent: &mut HeadlessWidget,
        index: usize,
        child: &HeadlessWidget,
    ) -> Result<(), Error> {
        parent.0.borrow_mut().children.insert(index, child.clone());
        Ok(())
    }

    fn remove_child(
        &mut self,
        parent: &mut HeadlessWidget,
        child: &HeadlessWidget,
    ) -> Result<(), Error> {
        parent
            .0
            .borrow_mut()
            .children
            .retain(|existing| !existing.same_widget(child));
        Ok(())
    }

    fn set_event_sink(&mut self, sink: Sender<RawEvent>) {
        self.sink = Some(sink);
    }
}
