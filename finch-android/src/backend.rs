use crossbeam::channel::Sender;
use finch::{Align, Axis, Backend, Color, Error, NodeId, RawEvent};
use jni::objects::{GlobalRef, JClass, JObject, JValue};
use jni::sys::jlong;
use jni::{AttachGuard, JNIEnv, JavaVM};
use parking_lot::Mutex;

// android.widget.RelativeLayout rule constants
const ALIGN_PARENT_LEFT: i32 = 9;
const ALIGN_PARENT_TOP: i32 = 10;
const ALIGN_PARENT_RIGHT: i32 = 11;
const ALIGN_PARENT_BOTTOM: i32 = 12;
const CENTER_HORIZONTAL: i32 = 14;
const CENTER_VERTICAL: i32 = 15;

// android.view.ViewGroup.LayoutParams size constants
const MATCH_PARENT: i32 = -1;
const WRAP_CONTENT: i32 = -2;

// android.widget.LinearLayout orientation
const VERTICAL: i32 = 1;

const LAYOUT_PARAMS_CLASS: &str = "android/widget/RelativeLayout$LayoutParams";

/// Where press events are sent from the JNI click callback. The callback has
/// no backend reference, so the sink lives in a global slot.
static SINK: Mutex<Option<Sender<RawEvent>>> = Mutex::new(None);

/// Called by `dev.finch.PressListener.onClick` with the node id split into
/// two longs.
#[no_mangle]
pub extern "system" fn Java_dev_finch_PressListener_nativeOnClick(
    _env: JNIEnv,
    _class: JClass,
    hi: jlong,
    lo: jlong,
) {
    let id = NodeId::from_u128(((hi as u64 as u128) << 64) | (lo as u64 as u128));
    if let Some(sink) = SINK.lock().as_ref() {
        let _ = sink.send(RawEvent::Press(id));
    }
}

/// [`Backend`] over the Android view toolkit.
///
/// Must only be used on the Android UI thread.
pub struct AndroidBackend {
    vm: JavaVM,
    /// The `android.content.Context` widgets are constructed against.
    context: GlobalRef,
}

impl AndroidBackend {
    pub fn new(vm: JavaVM, context: GlobalRef) -> AndroidBackend {
        AndroidBackend { vm, context }
    }

    /// Places a realized root widget on screen:
    /// `activity.setContentView(widget)`.
    pub fn set_content_view(
        &mut self,
        activity: &GlobalRef,
        widget: &GlobalRef,
    ) -> Result<(), Error> {
        let mut env = self.env()?;
        env.call_method(
            activity.as_obj(),
            "setContentView",
            "(Landroid/view/View;)V",
            &[JValue::Object(widget.as_obj())],
        )
        .map_err(jerr)?;
        Ok(())
    }

    fn env(&self) -> Result<AttachGuard<'_>, Error> {
        self.vm.attach_current_thread().map_err(jerr)
    }

    fn new_widget(&mut self, class: &str) -> Result<GlobalRef, Error> {
        let mut env = self.env()?;
        let widget = env
            .new_object(
                class,
                "(Landroid/content/Context;)V",
                &[JValue::Object(self.context.as_obj())],
            )
            .map_err(jerr)?;
        env.new_global_ref(widget).map_err(jerr)
    }

    /// `context.getResources().getIdentifier(name, "drawable", pkg)`;
    /// zero means the asset does not exist.
    fn resolve_drawable(&self, env: &mut JNIEnv, name: &str) -> Result<i32, Error> {
        let resources = env
            .call_method(
                self.context.as_obj(),
                "getResources",
                "()Landroid/content/res/Resources;",
                &[],
            )
            .and_then(|v| v.l())
            .map_err(jerr)?;
        let package = env
            .call_method(
                self.context.as_obj(),
                "getPackageName",
                "()Ljava/lang/String;",
                &[],
            )
            .and_then(|v| v.l())
            .map_err(jerr)?;
        let name: JObject = env.new_string(name).map_err(jerr)?.into();
        let def_type: JObject = env.new_string("drawable").map_err(jerr)?.into();
        env.call_method(
            &resources,
            "getIdentifier",
            "(Ljava/lang/String;Ljava/lang/String;Ljava/lang/String;)I",
            &[
                JValue::Object(&name),
                JValue::Object(&def_type),
                JValue::Object(&package),
            ],
        )
        .and_then(|v| v.i())
        .map_err(jerr)
    }
}

impl Backend for AndroidBackend {
    type Widget = GlobalRef;
    type LayoutParams = GlobalRef;

    fn new_view(&mut self) -> Result<GlobalRef, Error> {
        self.new_widget("android/view/View")
    }

    fn new_label(&mut self) -> Result<GlobalRef, Error> {
        self.new_widget("android/widget/TextView")
    }

    fn new_button(&mut self) -> Result<GlobalRef, Error> {
        self.new_widget("android/widget/Button")
    }

    fn new_image(&mut self) -> Result<GlobalRef, Error> {
        self.new_widget("android/widget/ImageView")
    }

    fn new_stack(&mut self) -> Result<GlobalRef, Error> {
        let stack = self.new_widget("android/widget/LinearLayout")?;
        let mut env = self.env()?;
        env.call_method(stack.as_obj(), "setOrientation", "(I)V", &[JValue::Int(VERTICAL)])
            .map_err(jerr)?;
        Ok(stack)
    }

    fn new_layout_params(&mut self, _widget: &GlobalRef) -> Result<GlobalRef, Error> {
        let mut env = self.env()?;
        let params = env
            .new_object(
                LAYOUT_PARAMS_CLASS,
                "(II)V",
                &[JValue::Int(WRAP_CONTENT), JValue::Int(WRAP_CONTENT)],
            )
            .map_err(jerr)?;
        env.new_global_ref(params).map_err(jerr)
    }

    fn apply_alignment(
        &mut self,
        layout: &mut GlobalRef,
        axis: Axis,
        align: Align,
    ) -> Result<(), Error> {
        let mut env = self.env()?;
        if !env
            .is_instance_of(layout.as_obj(), LAYOUT_PARAMS_CLASS)
            .map_err(jerr)?
        {
            return Err(Error::UnsupportedLayout {
                expected: "RelativeLayout.LayoutParams",
            });
        }

        let (size_field, start_rule, center_rule, end_rule) = match axis {
            Axis::Horizontal => ("width", ALIGN_PARENT_LEFT, CENTER_HORIZONTAL, ALIGN_PARENT_RIGHT),
            Axis::Vertical => ("height", ALIGN_PARENT_TOP, CENTER_VERTICAL, ALIGN_PARENT_BOTTOM),
        };

        // drop this axis's previous rules; the other axis's rules stay put
        for rule in [start_rule, center_rule, end_rule].iter().copied() {
            env.call_method(layout.as_obj(), "removeRule", "(I)V", &[JValue::Int(rule)])
                .map_err(jerr)?;
        }
        env.set_field(layout.as_obj(), size_field, "I", JValue::Int(WRAP_CONTENT))
            .map_err(jerr)?;

        let rule = match align {
            Align::Start => Some(start_rule),
            Align::Center => Some(center_rule),
            Align::End => Some(end_rule),
            Align::Stretch => {
                env.set_field(layout.as_obj(), size_field, "I", JValue::Int(MATCH_PARENT))
                    .map_err(jerr)?;
                None
            }
            other => return Err(Error::UnsupportedAlignment(other)),
        };
        if let Some(rule) = rule {
            env.call_method(layout.as_obj(), "addRule", "(I)V", &[JValue::Int(rule)])
                .map_err(jerr)?;
        }
        Ok(())
    }

    fn set_layout_params(&mut self, widget: &mut GlobalRef, layout: &GlobalRef) -> Result<(), Error> {
        let mut env = self.env()?;
        env.call_method(
            widget.as_obj(),
            "setLayoutParams",
            "(Landroid/view/ViewGroup$LayoutParams;)V",
            &[JValue::Object(layout.as_obj())],
        )
        .map_err(jerr)?;
        Ok(())
    }

    fn set_background(&mut self, widget: &mut GlobalRef, color: Option<Color>) -> Result<(), Error> {
        let mut env = self.env()?;
        match color {
            Some(color) => {
                env.call_method(
                    widget.as_obj(),
                    "setBackgroundColor",
                    "(I)V",
                    &[JValue::Int(color.to_argb8() as i32)],
                )
                .map_err(jerr)?;
            }
            None => {
                env.call_method(
                    widget.as_obj(),
                    "setBackground",
                    "(Landroid/graphics/drawable/Drawable;)V",
                    &[JValue::Object(&JObject::null())],
                )
                .map_err(jerr)?;
            }
        }
        Ok(())
    }

    fn set_text(&mut self, widget: &mut GlobalRef, text: &str) -> Result<(), Error> {
        let mut env = self.env()?;
        let text: JObject = env.new_string(text).map_err(jerr)?.into();
        env.call_method(
            widget.as_obj(),
            "setText",
            "(Ljava/lang/CharSequence;)V",
            &[JValue::Object(&text)],
        )
        .map_err(jerr)?;
        Ok(())
    }

    fn set_text_color(&mut self, widget: &mut GlobalRef, color: Option<Color>) -> Result<(), Error> {
        let mut env = self.env()?;
        // there is no per-widget default to restore; opaque black matches the
        // platform default text appearance
        let argb = color.unwrap_or(Color::rgb(0., 0., 0.)).to_argb8();
        env.call_method(
            widget.as_obj(),
            "setTextColor",
            "(I)V",
            &[JValue::Int(argb as i32)],
        )
        .map_err(jerr)?;
        Ok(())
    }

    fn set_title(&mut self, widget: &mut GlobalRef, title: &str) -> Result<(), Error> {
        // android buttons are TextViews; the normal-state title is the text
        self.set_text(widget, title)
    }

    fn set_title_color(&mut self, widget: &mut GlobalRef, color: Option<Color>) -> Result<(), Error> {
        self.set_text_color(widget, color)
    }

    fn set_image(&mut self, widget: &mut GlobalRef, source: Option<&str>) -> Result<(), Error> {
        let mut env = self.env()?;
        match source {
            Some(name) => {
                let id = self.resolve_drawable(&mut env, name)?;
                if id == 0 {
                    // resolution miss: leave the previous image in place
                    tracing::debug!(asset = name, "drawable not found");
                    return Ok(());
                }
                env.call_method(widget.as_obj(), "setImageResource", "(I)V", &[JValue::Int(id)])
                    .map_err(jerr)?;
            }
            None => {
                env.call_method(
                    widget.as_obj(),
                    "setImageDrawable",
                    "(Landroid/graphics/drawable/Drawable;)V",
                    &[JValue::Object(&JObject::null())],
                )
                .map_err(jerr)?;
            }
        }
        Ok(())
    }

    fn set_press_target(
        &mut self,
        widget: &mut GlobalRef,
        target: Option<NodeId>,
    ) -> Result<(), Error> {
        let mut env = self.env()?;
        match target {
            Some(id) => {
                let raw = id.as_u128();
                let hi = (raw >> 64) as u64 as jlong;
                let lo = raw as u64 as jlong;
                let listener = env
                    .new_object(
                        "dev/finch/PressListener",
                        "(JJ)V",
                        &[JValue::Long(hi), JValue::Long(lo)],
                    )
                    .map_err(jerr)?;
                env.call_method(
                    widget.as_obj(),
                    "setOnClickListener",
                    "(Landroid/view/View$OnClickListener;)V",
                    &[JValue::Object(&listener)],
                )
                .map_err(jerr)?;
            }
            None => {
                env.call_method(
                    widget.as_obj(),
                    "setOnClickListener",
                    "(Landroid/view/View$OnClickListener;)V",
                    &[JValue::Object(&JObject::null())],
                )
                .map_err(jerr)?;
            }
        }
        Ok(())
    }

    fn insert_child(
        &mut self,
        parent: &mut GlobalRef,
        index: usize,
        child: &GlobalRef,
    ) -> Result<(), Error> {
        let mut env = self.env()?;
        env.call_method(
            parent.as_obj(),
            "addView",
            "(Landroid/view/View;I)V",
            &[JValue::Object(child.as_obj()), JValue::Int(index as i32)],
        )
        .map_err(jerr)?;
        Ok(())
    }

    fn remove_child(&mut self, parent: &mut GlobalRef, child: &GlobalRef) -> Result<(), Error> {
        let mut env = self.env()?;
        env.call_method(
            parent.as_obj(),
            "removeView",
            "(Landroid/view/View;)V",
            &[JValue::Object(child.as_obj())],
        )
        .map_err(jerr)?;
        Ok(())
    }

    fn set_event_sink(&mut self, sink: Sender<RawEvent>) {
        *SINK.lock() = Some(sink);
    }
}

fn jerr(err: jni::errors::Error) -> Error {
    Error::native(err)
}
