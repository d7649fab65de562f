use crossbeam::channel::Sender;
use finch::{Align, Axis, Backend, Color, Error, NodeId, RawEvent};
use objc::declare::ClassDecl;
use objc::runtime::{Class, Object, Sel, BOOL, NO};
use objc::{class, msg_send, sel, sel_impl, Encode, Encoding};
use objc_id::Id;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;
use std::sync::Once;

// UIViewAutoresizing bits; 0..=2 are the horizontal axis, 3..=5 the vertical
const FLEXIBLE_LEFT_MARGIN: usize = 1 << 0;
const FLEXIBLE_WIDTH: usize = 1 << 1;
const FLEXIBLE_RIGHT_MARGIN: usize = 1 << 2;
const FLEXIBLE_TOP_MARGIN: usize = 1 << 3;
const FLEXIBLE_HEIGHT: usize = 1 << 4;
const FLEXIBLE_BOTTOM_MARGIN: usize = 1 << 5;

// UIControl constants
const CONTROL_STATE_NORMAL: usize = 0;
const CONTROL_EVENT_TOUCH_UP_INSIDE: usize = 1 << 6;

// UIButtonTypeSystem / UILayoutConstraintAxisVertical
const BUTTON_TYPE_SYSTEM: isize = 1;
const STACK_AXIS_VERTICAL: isize = 1;

#[repr(C)]
#[derive(Debug, Clone, Copy)]
struct CGRect {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

unsafe impl Encode for CGRect {
    fn encode() -> Encoding {
        Encoding::from_str("{CGRect={CGPoint=dd}{CGSize=dd}}")
    }
}

/// Where press events are sent from the target-action callback. The callback
/// has no backend reference, so the sink lives in a global slot.
static SINK: Mutex<Option<Sender<RawEvent>>> = Mutex::new(None);

/// A handle to one UIKit widget. Must only be used on the main thread.
pub struct IosWidget(Id<Object>);

/// Autoresizing-mask layout parameters; mutated in place, one axis at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IosLayoutParams {
    mask: usize,
}

/// [`Backend`] over UIKit. Must only be used on the main thread.
pub struct IosBackend {
    /// Retained target-action objects per widget; `addTarget:` does not
    /// retain its target.
    press_targets: HashMap<usize, Id<Object>>,
}

impl IosBackend {
    pub fn new() -> IosBackend {
        IosBackend {
            press_targets: HashMap::new(),
        }
    }

    /// Places a realized root widget into a container view, stretched to its
    /// bounds.
    pub fn attach_root(&mut self, container: &IosWidget, widget: &IosWidget) -> Result<(), Error> {
        unsafe {
            let bounds: CGRect = msg_send![&*container.0, bounds];
            let _: () = msg_send![&*widget.0, setFrame: bounds];
            let _: () = msg_send![&*container.0, addSubview: &*widget.0];
        }
        Ok(())
    }

    fn new_widget(&mut self, class: &Class) -> Result<IosWidget, Error> {
        unsafe {
            let obj: *mut Object = msg_send![class, new];
            if obj.is_null() {
                return Err(Error::native("widget allocation returned nil"));
            }
            Ok(IosWidget(Id::from_retained_ptr(obj)))
        }
    }
}

impl Backend for IosBackend {
    type Widget = IosWidget;
    type LayoutParams = IosLayoutParams;

    fn new_view(&mut self) -> Result<IosWidget, Error> {
        self.new_widget(class!(UIView))
    }

    fn new_label(&mut self) -> Result<IosWidget, Error> {
        self.new_widget(class!(UILabel))
    }

    fn new_button(&mut self) -> Result<IosWidget, Error> {
        unsafe {
            let obj: *mut Object = msg_send![class!(UIButton), buttonWithType: BUTTON_TYPE_SYSTEM];
            if obj.is_null() {
                return Err(Error::native("UIButton allocation returned nil"));
            }
            // autoreleased; retain it
            Ok(IosWidget(Id::from_ptr(obj)))
        }
    }

    fn new_image(&mut self) -> Result<IosWidget, Error> {
        self.new_widget(class!(UIImageView))
    }

    fn new_stack(&mut self) -> Result<IosWidget, Error> {
        let stack = self.new_widget(class!(UIStackView))?;
        unsafe {
            let _: () = msg_send![&*stack.0, setAxis: STACK_AXIS_VERTICAL];
        }
        Ok(stack)
    }

    fn new_layout_params(&mut self, _widget: &IosWidget) -> Result<IosLayoutParams, Error> {
        Ok(IosLayoutParams { mask: 0 })
    }

    fn apply_alignment(
        &mut self,
        layout: &mut IosLayoutParams,
        axis: Axis,
        align: Align,
    ) -> Result<(), Error> {
        let (leading, size, trailing) = match axis {
            Axis::Horizontal => (FLEXIBLE_LEFT_MARGIN, FLEXIBLE_WIDTH, FLEXIBLE_RIGHT_MARGIN),
            Axis::Vertical => (FLEXIBLE_TOP_MARGIN, FLEXIBLE_HEIGHT, FLEXIBLE_BOTTOM_MARGIN),
        };
        // clear only this axis's bits
        layout.mask &= !(leading | size | trailing);
        layout.mask |= match align {
            // natural size, pinned to the leading edge: only the far margin gives
            Align::Start => trailing,
            Align::Center => leading | trailing,
            Align::End => leading,
            Align::Stretch => size,
            other => return Err(Error::UnsupportedAlignment(other)),
        };
        Ok(())
    }

    fn set_layout_params(&mut self, widget: &mut IosWidget, layout: &IosLayoutParams) -> Result<(), Error> {
        unsafe {
            let _: () = msg_send![&*widget.0, setAutoresizingMask: layout.mask];
        }
        Ok(())
    }

    fn set_background(&mut self, widget: &mut IosWidget, color: Option<Color>) -> Result<(), Error> {
        unsafe {
            match color {
                Some(color) => {
                    let ui_color = ui_color(color);
                    let _: () = msg_send![&*widget.0, setBackgroundColor: &*ui_color];
                }
                None => {
                    let nil: *mut Object = ptr::null_mut();
                    let _: () = msg_send![&*widget.0, setBackgroundColor: nil];
                }
            }
        }
        Ok(())
    }

    fn set_text(&mut self, widget: &mut IosWidget, text: &str) -> Result<(), Error> {
        unsafe {
            let text = ns_string(text)?;
            let _: () = msg_send![&*widget.0, setText: &*text];
        }
        Ok(())
    }

    fn set_text_color(&mut self, widget: &mut IosWidget, color: Option<Color>) -> Result<(), Error> {
        unsafe {
            match color {
                Some(color) => {
                    let ui_color = ui_color(color);
                    let _: () = msg_send![&*widget.0, setTextColor: &*ui_color];
                }
                None => {
                    // nil resets UILabel to its default text color
                    let nil: *mut Object = ptr::null_mut();
                    let _: () = msg_send![&*widget.0, setTextColor: nil];
                }
            }
        }
        Ok(())
    }

    fn set_title(&mut self, widget: &mut IosWidget, title: &str) -> Result<(), Error> {
        unsafe {
            let title = ns_string(title)?;
            let _: () =
                msg_send![&*widget.0, setTitle: &*title forState: CONTROL_STATE_NORMAL];
        }
        Ok(())
    }

    fn set_title_color(&mut self, widget: &mut IosWidget, color: Option<Color>) -> Result<(), Error> {
        unsafe {
            match color {
                Some(color) => {
                    let ui_color = ui_color(color);
                    let _: () = msg_send![&*widget.0, setTitleColor: &*ui_color
                                                      forState: CONTROL_STATE_NORMAL];
                }
                None => {
                    let nil: *mut Object = ptr::null_mut();
                    let _: () =
                        msg_send![&*widget.0, setTitleColor: nil forState: CONTROL_STATE_NORMAL];
                }
            }
        }
        Ok(())
    }

    fn set_image(&mut self, widget: &mut IosWidget, source: Option<&str>) -> Result<(), Error> {
        unsafe {
            match source {
                Some(name) => {
                    let ns_name = ns_string(name)?;
                    let image: *mut Object = msg_send![class!(UIImage), imageNamed: &*ns_name];
                    if image.is_null() {
                        // resolution miss: leave the previous image in place
                        tracing::debug!(asset = name, "bundled image not found");
                        return Ok(());
                    }
                    let _: () = msg_send![&*widget.0, setImage: image];
                }
                None => {
                    let nil: *mut Object = ptr::null_mut();
                    let _: () = msg_send![&*widget.0, setImage: nil];
                }
            }
        }
        Ok(())
    }

    fn set_press_target(
        &mut self,
        widget: &mut IosWidget,
        target: Option<NodeId>,
    ) -> Result<(), Error> {
        let key = &*widget.0 as *const Object as usize;
        unsafe {
            // remove the old registration before adding a new one
            if let Some(old) = self.press_targets.remove(&key) {
                let _: () = msg_send![&*widget.0, removeTarget: &*old
                                                  action: sel!(pressed:)
                                                  forControlEvents: CONTROL_EVENT_TOUCH_UP_INSIDE];
            }
            if let Some(id) = target {
                let press_target = new_press_target(id)?;
                let _: () = msg_send![&*widget.0, addTarget: &*press_target
                                                  action: sel!(pressed:)
                                                  forControlEvents: CONTROL_EVENT_TOUCH_UP_INSIDE];
                self.press_targets.insert(key, press_target);
            }
        }
        Ok(())
    }

    fn insert_child(
        &mut self,
        parent: &mut IosWidget,
        index: usize,
        child: &IosWidget,
    ) -> Result<(), Error> {
        unsafe {
            // stack views lay out their arranged subviews, not plain subviews
            let is_stack: BOOL = msg_send![&*parent.0, isKindOfClass: class!(UIStackView)];
            if is_stack != NO {
                let _: () =
                    msg_send![&*parent.0, insertArrangedSubview: &*child.0 atIndex: index];
            } else {
                let _: () = msg_send![&*parent.0, insertSubview: &*child.0 atIndex: index as isize];
            }
        }
        Ok(())
    }

    fn remove_child(&mut self, _parent: &mut IosWidget, child: &IosWidget) -> Result<(), Error> {
        unsafe {
            let _: () = msg_send![&*child.0, removeFromSuperview];
        }
        Ok(())
    }

    fn set_event_sink(&mut self, sink: Sender<RawEvent>) {
        *SINK.lock() = Some(sink);
    }
}

fn ns_string(s: &str) -> Result<Id<Object>, Error> {
    let c = CString::new(s).map_err(Error::native)?;
    unsafe {
        let obj: *mut Object =
            msg_send![class!(NSString), stringWithUTF8String: c.as_ptr() as *const c_char];
        if obj.is_null() {
            return Err(Error::native("NSString allocation returned nil"));
        }
        Ok(Id::from_ptr(obj))
    }
}

fn ui_color(color: Color) -> Id<Object> {
    unsafe {
        let obj: *mut Object = msg_send![class!(UIColor), colorWithRed: color.r
                                                          green: color.g
                                                          blue: color.b
                                                          alpha: color.a];
        Id::from_ptr(obj)
    }
}

/// Registers (once) and instantiates the target-action class that forwards
/// presses into the event sink. The node id is stored in two u64 ivars.
fn new_press_target(id: NodeId) -> Result<Id<Object>, Error> {
    static REGISTER: Once = Once::new();
    REGISTER.call_once(|| {
        let superclass = class!(NSObject);
        let mut decl =
            ClassDecl::new("FinchPressTarget", superclass).expect("class already registered");
        decl.add_ivar::<u64>("node_hi");
        decl.add_ivar::<u64>("node_lo");
        extern "C" fn pressed(this: &Object, _: Sel, _sender: *mut Object) {
            let raw = unsafe {
                let hi: u64 = *this.get_ivar("node_hi");
                let lo: u64 = *this.get_ivar("node_lo");
                ((hi as u128) << 64) | lo as u128
            };
            if let Some(sink) = SINK.lock().as_ref() {
                let _ = sink.send(RawEvent::Press(NodeId::from_u128(raw)));
            }
        }
        unsafe {
            decl.add_method(
                sel!(pressed:),
                pressed as extern "C" fn(&Object, Sel, *mut Object),
            );
        }
        decl.register();
    });

    let raw = id.as_u128();
    unsafe {
        let class = Class::get("FinchPressTarget")
            .ok_or_else(|| Error::native("FinchPressTarget not registered"))?;
        let obj: *mut Object = msg_send![class, new];
        if obj.is_null() {
            return Err(Error::native("press target allocation returned nil"));
        }
        (*obj).set_ivar::<u64>("node_hi", (raw >> 64) as u64);
        (*obj).set_ivar::<u64>("node_lo", raw as u64);
        Ok(Id::from_retained_ptr(obj))
    }
}
