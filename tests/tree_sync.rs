//! Whole-tree synchronization scenarios over the headless backend.

use finch::headless::{Headless, HeadlessWidget, WidgetKind};
use finch::{Align, Axis, Button, Color, Error, Host, Image, Label, StackView, View};
use std::cell::RefCell;
use std::rc::Rc;

fn widget_of(view: &View<Headless>) -> HeadlessWidget {
    view.with_widget(|_, widget| Ok(widget.clone())).unwrap()
}

fn child_order(parent: &HeadlessWidget, children: &[&HeadlessWidget]) -> bool {
    let state = parent.state();
    state.children.len() == children.len()
        && state
            .children
            .iter()
            .zip(children)
            .all(|(a, b)| a.same_widget(b))
}

#[test]
fn native_child_order_tracks_the_collection() {
    let host = Host::new(Headless::new());
    let parent = View::new(&host);
    let a = View::new(&host);
    let b = View::new(&host);

    parent.children().push(a.clone()).unwrap();
    parent.children().push(b.clone()).unwrap();

    let parent_widget = widget_of(&parent);
    let a_widget = widget_of(&a);
    let b_widget = widget_of(&b);
    assert!(child_order(&parent_widget, &[&a_widget, &b_widget]));

    parent.children().remove_at(0).unwrap();
    assert!(child_order(&parent_widget, &[&b_widget]));

    let c = View::new(&host);
    parent.children().insert(0, c.clone()).unwrap();
    let c_widget = widget_of(&c);
    assert!(child_order(&parent_widget, &[&c_widget, &b_widget]));
}

#[test]
fn attachment_forces_realization() {
    let host = Host::new(Headless::new());
    let parent = View::new(&host);
    parent.realize().unwrap();

    let child = View::new(&host);
    assert!(!child.is_realized());
    parent.children().push(child.clone()).unwrap();
    assert!(child.is_realized(), "attachment must realize the child");

    let parent_widget = widget_of(&parent);
    let child_widget = widget_of(&child);
    assert!(child_order(&parent_widget, &[&child_widget]));
}

#[test]
fn whole_tree_is_built_lazily_and_realized_at_once() {
    let host = Host::new(Headless::new());
    let stack = StackView::new(&host);
    let label = Label::new(&host);
    label.set_text("hello").unwrap();
    label.set_text_color(Some(Color::rgb(0., 1., 0.))).unwrap();
    stack.children().push(label.view().clone()).unwrap();
    stack.view().set_background(Some(Color::from_rgb8(0x30, 0x30, 0x30))).unwrap();

    // nothing native exists until the root is accessed
    assert_eq!(host.with_backend(|b| b.widgets_created()), 0);
    assert!(!stack.view().is_realized());
    assert!(!label.view().is_realized());

    let stack_widget = widget_of(stack.view());
    assert_eq!(host.with_backend(|b| b.widgets_created()), 2);
    assert!(label.view().is_realized());

    let label_widget = widget_of(label.view());
    assert!(child_order(&stack_widget, &[&label_widget]));
    assert_eq!(stack_widget.state().kind, WidgetKind::Stack);
    let label_state = label_widget.state();
    assert_eq!(label_state.kind, WidgetKind::Label);
    assert_eq!(label_state.text.as_deref(), Some("hello"));
    assert_eq!(label_state.text_color, Some(Color::rgb(0., 1., 0.)));
}

#[test]
fn alignment_axes_are_independent() {
    let host = Host::new(Headless::new());
    let view = View::new(&host);
    view.realize().unwrap();

    view.set_vertical_align(Align::Stretch).unwrap();
    view.set_horizontal_align(Align::Stretch).unwrap();
    view.set_horizontal_align(Align::Center).unwrap();

    let widget = widget_of(&view);
    let state = widget.state();
    let layout = state.layout.as_ref().unwrap();
    assert_eq!(layout.rule(Axis::Horizontal), Some(Align::Center));
    assert_eq!(
        layout.rule(Axis::Vertical),
        Some(Align::Stretch),
        "changing one axis must leave the other axis's rules untouched"
    );
}

#[test]
fn foreign_layout_params_are_a_fatal_fault() {
    let host = Host::new(Headless::new());
    let view = View::with_factory(&host, |backend| backend.foreign_widget());
    match view.realize() {
        Err(Error::UnsupportedLayout { .. }) => {}
        other => panic!("expected UnsupportedLayout, got {:?}", other),
    }
    assert!(!view.is_realized());
}

#[test]
fn press_handler_replacement_detaches_the_old_handler() {
    let host = Host::new(Headless::new());
    let button = Button::new(&host);
    button.set_title("tap me").unwrap();

    let log: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));

    let sink = Rc::clone(&log);
    button.set_on_press(move || sink.borrow_mut().push("h1")).unwrap();

    let widget = widget_of(button.view());
    assert_eq!(widget.state().title.as_deref(), Some("tap me"));
    assert_eq!(widget.state().press_target, Some(button.view().id()));

    host.with_backend(|b| b.press(&widget));
    host.poll();
    assert_eq!(*log.borrow(), vec!["h1"]);

    let sink = Rc::clone(&log);
    button.set_on_press(move || sink.borrow_mut().push("h2")).unwrap();

    host.with_backend(|b| b.press(&widget));
    host.poll();
    assert_eq!(*log.borrow(), vec!["h1", "h2"], "h2 exactly once, h1 never again");

    button.clear_on_press().unwrap();
    assert_eq!(widget.state().press_target, None, "no subscription left behind");
    host.with_backend(|b| b.press(&widget));
    host.poll();
    assert_eq!(*log.borrow(), vec!["h1", "h2"]);
}

#[test]
fn a_handler_that_clears_itself_stays_cleared() {
    let host = Host::new(Headless::new());
    let button = Button::new(&host);
    let count = Rc::new(RefCell::new(0));

    // one-shot: the handler removes itself during its own invocation
    let sink = Rc::clone(&count);
    let once = button.clone();
    button
        .set_on_press(move || {
            *sink.borrow_mut() += 1;
            once.clear_on_press().unwrap();
        })
        .unwrap();

    let widget = widget_of(button.view());
    host.with_backend(|b| b.press(&widget));
    host.with_backend(|b| b.press(&widget));
    host.poll();
    assert_eq!(*count.borrow(), 1, "a one-shot handler must not fire twice");
    assert_eq!(widget.state().press_target, None);

    host.with_backend(|b| b.press(&widget));
    host.poll();
    assert_eq!(*count.borrow(), 1);
}

#[test]
fn unsupported_alignment_leaves_realized_layout_unchanged() {
    let mut backend = Headless::new();
    backend.reject_alignment(Align::End);
    let host = Host::new(backend);

    let view = View::new(&host);
    view.set_horizontal_align(Align::Start).unwrap();
    view.realize().unwrap();

    match view.set_horizontal_align(Align::End) {
        Err(Error::UnsupportedAlignment(Align::End)) => {}
        other => panic!("expected UnsupportedAlignment, got {:?}", other),
    }

    let widget = widget_of(&view);
    let state = widget.state();
    let layout = state.layout.as_ref().unwrap();
    assert_eq!(
        layout.rule(Axis::Horizontal),
        Some(Align::Start),
        "a rejected alignment must not touch the native layout rules"
    );
    assert_eq!(layout.rule(Axis::Vertical), Some(Align::Center));
}

#[test]
fn press_handler_set_before_realization_still_fires() {
    let host = Host::new(Headless::new());
    let button = Button::new(&host);
    let count = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&count);
    button.set_on_press(move || *sink.borrow_mut() += 1).unwrap();

    let widget = widget_of(button.view());
    host.with_backend(|b| b.press(&widget));
    host.poll();
    assert_eq!(*count.borrow(), 1);
}

#[test]
fn unresolved_image_sources_keep_prior_content() {
    let mut backend = Headless::new();
    backend.add_asset("bot");
    let host = Host::new(backend);

    let image = Image::new(&host);
    let widget = widget_of(image.view());

    image.set_source("missing").unwrap();
    assert_eq!(widget.state().image, None, "miss with no prior image leaves none");

    image.set_source("bot").unwrap();
    assert_eq!(widget.state().image.as_deref(), Some("bot"));

    image.set_source("also-missing").unwrap();
    assert_eq!(
        widget.state().image.as_deref(),
        Some("bot"),
        "miss must leave the previous image in place"
    );

    image.clear_source().unwrap();
    assert_eq!(widget.state().image, None);
}

#[test]
fn clearing_the_background_clears_the_native_background() {
    let host = Host::new(Headless::new());
    let view = View::new(&host);
    view.set_background(Some(Color::rgb(0., 0., 1.))).unwrap();
    let widget = widget_of(&view);
    assert_eq!(widget.state().background, Some(Color::rgb(0., 0., 1.)));

    view.set_background(None).unwrap();
    assert_eq!(widget.state().background, None);
}

#[test]
fn counter_app_end_to_end() {
    let host = Host::new(Headless::new());

    let stack = StackView::new(&host);
    let label = Label::new(&host);
    label.set_text("taps: 0").unwrap();
    let button = Button::new(&host);
    button.set_title("tap").unwrap();

    stack.children().push(label.view().clone()).unwrap();
    stack.children().push(button.view().clone()).unwrap();

    let taps = Rc::new(RefCell::new(0u32));
    {
        let taps = Rc::clone(&taps);
        let label = label.clone();
        button
            .set_on_press(move || {
                *taps.borrow_mut() += 1;
                label.set_text(format!("taps: {}", taps.borrow())).unwrap();
            })
            .unwrap();
    }

    let button_widget = widget_of(button.view());
    let label_widget = widget_of(label.view());

    host.with_backend(|b| b.press(&button_widget));
    host.with_backend(|b| b.press(&button_widget));
    host.poll();

    assert_eq!(*taps.borrow(), 2);
    assert_eq!(label_widget.state().text.as_deref(), Some("taps: 2"));
}
