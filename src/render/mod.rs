//! Markup rendering
//!
//! Annotation payloads are recorded per volume into a [`RenderBuffer`] and
//! spliced into the base text in one pass. Payloads are emitted verbatim;
//! escaping is the business of whoever builds them.

mod buffer;
mod serializer;

pub use buffer::{Insertions, RenderBuffer};
pub use serializer::PechaSerializer;
