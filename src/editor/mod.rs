//! Editor module
//!
//! The host document editor is reached through the [`Editor`] trait.
//! [`TextBuffer`] is a plain-text implementation rendering links as Markdown
//! or HTML.

mod buffer;
mod traits;

pub use buffer::{LinkFormat, TextBuffer};
pub use traits::Editor;
