//! Renderer-agnostic document model
//!
//! A `Document` is an ordered sequence of primitive render operations,
//! built once per request from a bill or summary plus the display config.
//! Both output renderers (ESC/POS and HTML) consume the same document, so
//! the printed receipt and the browser preview cannot drift apart.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use tracing::warn;

/// Text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Text emphasis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Normal,
    Bold,
}

/// Text size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Size {
    Normal,
    DoubleHeight,
    DoubleWidth,
    Double,
}

/// One cell of a table row
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub text: String,
    pub align: Align,
    pub width_ratio: f64,
}

impl Cell {
    pub fn new(text: impl Into<String>, align: Align, width_ratio: f64) -> Self {
        Self {
            text: text.into(),
            align,
            width_ratio,
        }
    }
}

/// A primitive render operation
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOp {
    SetAlign(Align),
    SetStyle(Style),
    SetSize(Size),
    Text(String),
    /// Two-column line: left-aligned and right-aligned halves.
    /// `width_ratio` is the share of the line given to the left half.
    Row {
        left: String,
        right: String,
        width_ratio: f64,
    },
    TableRow {
        cells: Vec<Cell>,
    },
    Rule,
    Image {
        bytes: Vec<u8>,
        mime: String,
    },
    Feed(u8),
    Cut,
}

/// Immutable, renderer-agnostic receipt document
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    ops: Vec<RenderOp>,
}

impl Document {
    pub fn ops(&self) -> &[RenderOp] {
        &self.ops
    }

    /// Count ops matching a predicate (test/diagnostic helper)
    pub fn count_ops(&self, predicate: impl Fn(&RenderOp) -> bool) -> usize {
        self.ops.iter().filter(|op| predicate(op)).count()
    }
}

/// Fluent document emitter
///
/// Tracks the current alignment/style/size and skips redundant state ops
/// so conditional rows add exactly one op to the sequence.
pub struct DocumentBuilder {
    ops: Vec<RenderOp>,
    align: Align,
    style: Style,
    size: Size,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self {
            ops: Vec::with_capacity(64),
            align: Align::Left,
            style: Style::Normal,
            size: Size::Normal,
        }
    }

    pub fn align(&mut self, align: Align) -> &mut Self {
        if self.align != align {
            self.ops.push(RenderOp::SetAlign(align));
            self.align = align;
        }
        self
    }

    pub fn style(&mut self, style: Style) -> &mut Self {
        if self.style != style {
            self.ops.push(RenderOp::SetStyle(style));
            self.style = style;
        }
        self
    }

    pub fn size(&mut self, size: Size) -> &mut Self {
        if self.size != size {
            self.ops.push(RenderOp::SetSize(size));
            self.size = size;
        }
        self
    }

    pub fn text(&mut self, text: impl Into<String>) -> &mut Self {
        self.ops.push(RenderOp::Text(text.into()));
        self
    }

    /// Two-column row with the default 60/40 split
    pub fn row(&mut self, left: impl Into<String>, right: impl Into<String>) -> &mut Self {
        self.row_ratio(left, right, 0.6)
    }

    pub fn row_ratio(
        &mut self,
        left: impl Into<String>,
        right: impl Into<String>,
        width_ratio: f64,
    ) -> &mut Self {
        self.ops.push(RenderOp::Row {
            left: left.into(),
            right: right.into(),
            width_ratio,
        });
        self
    }

    pub fn table_row(&mut self, cells: Vec<Cell>) -> &mut Self {
        self.ops.push(RenderOp::TableRow { cells });
        self
    }

    pub fn rule(&mut self) -> &mut Self {
        self.ops.push(RenderOp::Rule);
        self
    }

    pub fn image(&mut self, bytes: Vec<u8>, mime: impl Into<String>) -> &mut Self {
        self.ops.push(RenderOp::Image {
            bytes,
            mime: mime.into(),
        });
        self
    }

    pub fn feed(&mut self, lines: u32) -> &mut Self {
        if lines > 0 {
            self.ops.push(RenderOp::Feed(lines.min(u8::MAX as u32) as u8));
        }
        self
    }

    pub fn cut(&mut self) -> &mut Self {
        self.ops.push(RenderOp::Cut);
        self
    }

    pub fn build(self) -> Document {
        Document { ops: self.ops }
    }
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode a logo option (raw base64 or data URI) into image bytes
///
/// Returns None on decode failure or an empty buffer; the logo op is then
/// simply not emitted, and a bad logo never fails the whole document.
pub fn decode_logo(logo: &str) -> Option<(Vec<u8>, String)> {
    let (mime, payload) = match logo.strip_prefix("data:") {
        Some(rest) => {
            let (header, data) = rest.split_once(',')?;
            let mime = header
                .split(';')
                .next()
                .filter(|m| !m.is_empty())
                .unwrap_or("image/png");
            (mime.to_string(), data)
        }
        None => ("image/png".to_string(), logo),
    };

    match BASE64.decode(payload.trim()) {
        Ok(bytes) if !bytes.is_empty() => Some((bytes, mime)),
        Ok(_) => {
            warn!("logo decoded to an empty buffer, skipping");
            None
        }
        Err(e) => {
            warn!(error = %e, "logo base64 decode failed, skipping");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_skips_redundant_state_ops() {
        let mut b = DocumentBuilder::new();
        b.align(Align::Left) // already left
            .style(Style::Bold)
            .style(Style::Bold) // redundant
            .text("Total");
        let doc = b.build();

        assert_eq!(
            doc.ops(),
            &[
                RenderOp::SetStyle(Style::Bold),
                RenderOp::Text("Total".to_string())
            ]
        );
    }

    #[test]
    fn test_feed_zero_is_elided() {
        let mut b = DocumentBuilder::new();
        b.feed(0).feed(3);
        let doc = b.build();
        assert_eq!(doc.ops(), &[RenderOp::Feed(3)]);
    }

    #[test]
    fn test_decode_logo_data_uri() {
        // "posr" base64-encoded inside a data URI
        let (bytes, mime) = decode_logo("data:image/jpeg;base64,cG9zcg==").unwrap();
        assert_eq!(bytes, b"posr");
        assert_eq!(mime, "image/jpeg");
    }

    #[test]
    fn test_decode_logo_raw_base64() {
        let (bytes, mime) = decode_logo("cG9zcg==").unwrap();
        assert_eq!(bytes, b"posr");
        assert_eq!(mime, "image/png");
    }

    #[test]
    fn test_decode_logo_failures_are_none() {
        assert!(decode_logo("!!! not base64 !!!").is_none());
        assert!(decode_logo("").is_none());
        assert!(decode_logo("data:image/png;base64,").is_none());
    }
}
