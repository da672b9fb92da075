//! # Output
//!
//! stdout carries only rendered pages ([`render`]); stderr carries log lines
//! and the final error message. [`detect`] decides how stderr is rendered.

pub mod detect;
pub mod render;

pub use render::{RenderOptions, render_page};
