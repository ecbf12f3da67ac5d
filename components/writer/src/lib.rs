pub mod escape;
pub mod write;

pub use crate::escape::{sanitize, Escape, LabelEscaper};
pub use crate::write::{UnicodeWrite, Utf8Writer};
