//! Output renderers
//!
//! Both renderers consume the identical `Document`; neither holds layout
//! logic of its own, which is what keeps the printed receipt and the
//! browser preview in lockstep.

pub mod escpos;
pub mod html;

pub use escpos::PrinterRenderer;
pub use html::{HtmlRenderer, escape_html};
