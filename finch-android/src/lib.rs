//! Android synchronizer for finch.
//!
//! Implements [`finch::Backend`] over JNI: plain views become
//! `android.view.View`, labels `TextView`, buttons `Button`, images
//! `ImageView`, and stacks a vertical `LinearLayout`. Alignment is translated
//! to `RelativeLayout.LayoutParams` rules, one axis at a time.
//!
//! Press events reach Rust through a small Java shim shipped under `java/`
//! in this crate: `dev.finch.PressListener`, an
//! `android.view.View.OnClickListener` constructed with the two halves of a
//! node id and calling the exported `nativeOnClick` function below. Add it to
//! the application's source set. Everything else is plain JNI calls.
//!
//! Only compiled on Android; on other targets this crate is empty.

#[cfg(target_os = "android")]
mod backend;

#[cfg(target_os = "android")]
pub use crate::backend::AndroidBackend;
