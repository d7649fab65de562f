//! iOS synchronizer for finch.
//!
//! Implements [`finch::Backend`] over the Objective-C runtime: plain views
//! become `UIView`, labels `UILabel`, buttons `UIButton`, images
//! `UIImageView`, and stacks a vertical `UIStackView`. Alignment is
//! translated to springs-and-struts autoresizing masks, whose horizontal and
//! vertical bits are independent.
//!
//! Press events travel through a runtime-registered `FinchPressTarget` class
//! whose action method forwards the node id into the event sink.
//!
//! Only compiled on iOS; on other targets this crate is empty.

#[cfg(target_os = "ios")]
mod backend;

#[cfg(target_os = "ios")]
pub use crate::backend::{IosBackend, IosLayoutParams, IosWidget};
