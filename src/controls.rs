//! Leaf controls: small compositions over [`View`] with a handful of extra
//! observable properties.
//!
//! Each control owns a plain view node built from the matching backend widget
//! factory, plus its own cells; property changes translate directly to native
//! API calls once the widget exists, and realization applies whatever was set
//! beforehand.

use crate::backend::Backend;
use crate::cell::Cell;
use crate::children::Children;
use crate::color::Color;
use crate::error::Error;
use crate::host::Host;
use crate::view::View;
use core::fmt;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// A text label.
///
/// Like [`View`], a cheap clonable handle; clones refer to the same control.
pub struct Label<B: Backend> {
    core: Rc<LabelCore<B>>,
}

impl<B: Backend> Clone for Label<B> {
    fn clone(&self) -> Self {
        Label {
            core: Rc::clone(&self.core),
        }
    }
}

struct LabelCore<B: Backend> {
    view: View<B>,
    text: RefCell<Cell<String>>,
    text_color: RefCell<Cell<Option<Color>>>,
}

impl<B: Backend> Label<B> {
    pub fn new(host: &Host<B>) -> Label<B> {
        let view = View::with_factory(host, |backend| backend.new_label());
        let core = Rc::new(LabelCore {
            view,
            text: RefCell::new(Cell::new(String::new())),
            text_color: RefCell::new(Cell::new(None)),
        });

        let weak = Rc::downgrade(&core);
        core.text.borrow_mut().subscribe(move |text: &String| {
            match weak.upgrade() {
                Some(core) if core.view.is_realized() => {
                    let text = text.clone();
                    core.view
                        .with_widget(|backend, widget| backend.set_text(widget, &text))
                }
                _ => Ok(()),
            }
        });
        let weak = Rc::downgrade(&core);
        core.text_color
            .borrow_mut()
            .subscribe(move |color: &Option<Color>| match weak.upgrade() {
                Some(core) if core.view.is_realized() => {
                    let color = *color;
                    core.view
                        .with_widget(|backend, widget| backend.set_text_color(widget, color))
                }
                _ => Ok(()),
            });

        let weak = Rc::downgrade(&core);
        core.view.on_realize(move |backend, widget| {
            let core = match weak.upgrade() {
                Some(core) => core,
                None => return Ok(()),
            };
            let text = core.text.borrow();
            if !text.get().is_empty() {
                backend.set_text(widget, text.get())?;
            }
            if let Some(color) = *core.text_color.borrow().get() {
                backend.set_text_color(widget, Some(color))?;
            }
            Ok(())
        });

        Label { core }
    }

    pub fn text(&self) -> String {
        self.core.text.borrow().get().clone()
    }

    pub fn set_text(&self, text: impl Into<String>) -> Result<(), Error> {
        self.core.text.borrow_mut().set(text.into())
    }

    pub fn text_color(&self) -> Option<Color> {
        *self.core.text_color.borrow().get()
    }

    pub fn set_text_color(&self, color: Option<Color>) -> Result<(), Error> {
        self.core.text_color.borrow_mut().set(color)
    }

    /// The underlying view node.
    pub fn view(&self) -> &View<B> {
        &self.core.view
    }
}

impl<B: Backend> fmt::Debug for Label<B> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Label")
            .field("view", &self.core.view)
            .field("text", &self.core.text.borrow())
            .finish()
    }
}

/// A native button with a replaceable press handler.
pub struct Button<B: Backend> {
    core: Rc<ButtonCore<B>>,
}

impl<B: Backend> Clone for Button<B> {
    fn clone(&self) -> Self {
        Button {
            core: Rc::clone(&self.core),
        }
    }
}

struct ButtonCore<B: Backend> {
    view: View<B>,
    title: RefCell<Cell<String>>,
    title_color: RefCell<Cell<Option<Color>>>,
    /// Whether a press handler is currently registered with the host, so
    /// realization knows to attach the native tap subscription.
    has_press_handler: RefCell<bool>,
}

impl<B: Backend> Button<B> {
    pub fn new(host: &Host<B>) -> Button<B> {
        let view = View::with_factory(host, |backend| backend.new_button());
        let core = Rc::new(ButtonCore {
            view,
            title: RefCell::new(Cell::new(String::new())),
            title_color: RefCell::new(Cell::new(None)),
            has_press_handler: RefCell::new(false),
        });

        let weak = Rc::downgrade(&core);
        core.title.borrow_mut().subscribe(move |title: &String| {
            match weak.upgrade() {
                Some(core) if core.view.is_realized() => {
                    let title = title.clone();
                    core.view
                        .with_widget(|backend, widget| backend.set_title(widget, &title))
                }
                _ => Ok(()),
            }
        });
        let weak = Rc::downgrade(&core);
        core.title_color
            .borrow_mut()
            .subscribe(move |color: &Option<Color>| match weak.upgrade() {
                Some(core) if core.view.is_realized() => {
                    let color = *color;
                    core.view
                        .with_widget(|backend, widget| backend.set_title_color(widget, color))
                }
                _ => Ok(()),
            });

        let weak = Rc::downgrade(&core);
        core.view.on_realize(move |backend, widget| {
            let core = match weak.upgrade() {
                Some(core) => core,
                None => return Ok(()),
            };
            let title = core.title.borrow();
            if !title.get().is_empty() {
                backend.set_title(widget, title.get())?;
            }
            if let Some(color) = *core.title_color.borrow().get() {
                backend.set_title_color(widget, Some(color))?;
            }
            if *core.has_press_handler.borrow() {
                backend.set_press_target(widget, Some(core.view.id()))?;
            }
            Ok(())
        });

        Button { core }
    }

    pub fn title(&self) -> String {
        self.core.title.borrow().get().clone()
    }

    /// Sets the button title for the normal interaction state.
    pub fn set_title(&self, title: impl Into<String>) -> Result<(), Error> {
        self.core.title.borrow_mut().set(title.into())
    }

    pub fn title_color(&self) -> Option<Color> {
        *self.core.title_color.borrow().get()
    }

    /// Sets or clears the title color for the normal interaction state.
    pub fn set_title_color(&self, color: Option<Color>) -> Result<(), Error> {
        self.core.title_color.borrow_mut().set(color)
    }

    /// Sets the press handler, replacing any previous one.
    ///
    /// The old registration is removed before the new one is added: after
    /// this call only `handler` can be invoked by a native tap.
    pub fn set_on_press<F>(&self, handler: F) -> Result<(), Error>
    where
        F: FnMut() + 'static,
    {
        let id = self.core.view.id();
        self.core
            .view
            .host()
            .set_press_handler(id, Some(Box::new(handler)));
        *self.core.has_press_handler.borrow_mut() = true;
        if self.core.view.is_realized() {
            self.core
                .view
                .with_widget(|backend, widget| backend.set_press_target(widget, Some(id)))?;
        }
        Ok(())
    }

    /// Removes the press handler, leaving no native subscription attached.
    pub fn clear_on_press(&self) -> Result<(), Error> {
        let id = self.core.view.id();
        self.core.view.host().set_press_handler(id, None);
        *self.core.has_press_handler.borrow_mut() = false;
        if self.core.view.is_realized() {
            self.core
                .view
                .with_widget(|backend, widget| backend.set_press_target(widget, None))?;
        }
        Ok(())
    }

    /// The underlying view node.
    pub fn view(&self) -> &View<B> {
        &self.core.view
    }
}

impl<B: Backend> fmt::Debug for Button<B> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Button")
            .field("view", &self.core.view)
            .field("title", &self.core.title.borrow())
            .field("has_press_handler", &*self.core.has_press_handler.borrow())
            .finish()
    }
}

/// An image view displaying a bundled asset by logical name.
pub struct Image<B: Backend> {
    core: Rc<ImageCore<B>>,
}

impl<B: Backend> Clone for Image<B> {
    fn clone(&self) -> Self {
        Image {
            core: Rc::clone(&self.core),
        }
    }
}

struct ImageCore<B: Backend> {
    view: View<B>,
    source: RefCell<Cell<Option<String>>>,
}

impl<B: Backend> Image<B> {
    pub fn new(host: &Host<B>) -> Image<B> {
        let view = View::with_factory(host, |backend| backend.new_image());
        let core = Rc::new(ImageCore {
            view,
            source: RefCell::new(Cell::new(None)),
        });

        let weak = Rc::downgrade(&core);
        core.source
            .borrow_mut()
            .subscribe(move |source: &Option<String>| match weak.upgrade() {
                Some(core) if core.view.is_realized() => {
                    let source = source.clone();
                    core.view.with_widget(|backend, widget| {
                        backend.set_image(widget, source.as_deref())
                    })
                }
                _ => Ok(()),
            });

        let weak = Rc::downgrade(&core);
        core.view.on_realize(move |backend, widget| {
            let core = match weak.upgrade() {
                Some(core) => core,
                None => return Ok(()),
            };
            let source = core.source.borrow();
            match source.get() {
                Some(name) => backend.set_image(widget, Some(name)),
                None => Ok(()),
            }
        });

        Image { core }
    }

    pub fn source(&self) -> Option<String> {
        self.core.source.borrow().get().clone()
    }

    /// Points the image at a logical asset name.
    ///
    /// A name the platform cannot resolve is not an error: the previous image
    /// content stays in place.
    pub fn set_source(&self, source: impl Into<String>) -> Result<(), Error> {
        self.core.source.borrow_mut().set(Some(source.into()))
    }

    /// Clears the image content.
    pub fn clear_source(&self) -> Result<(), Error> {
        self.core.source.borrow_mut().set(None)
    }

    /// The underlying view node.
    pub fn view(&self) -> &View<B> {
        &self.core.view
    }
}

impl<B: Backend> fmt::Debug for Image<B> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Image")
            .field("view", &self.core.view)
            .field("source", &self.core.source.borrow())
            .finish()
    }
}

/// A linear/stack container. Pure composition: no properties of its own, the
/// child collection does all the work.
pub struct StackView<B: Backend> {
    view: View<B>,
}

impl<B: Backend> StackView<B> {
    pub fn new(host: &Host<B>) -> StackView<B> {
        StackView {
            view: View::with_factory(host, |backend| backend.new_stack()),
        }
    }

    pub fn children(&self) -> &Children<B> {
        self.view.children()
    }

    /// The underlying view node.
    pub fn view(&self) -> &View<B> {
        &self.view
    }
}

impl<B: Backend> fmt::Debug for StackView<B> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("StackView").field("view", &self.view).finish()
    }
}
