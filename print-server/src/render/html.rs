//! HTML renderer
//!
//! Pure, side-effect-free translation of a `Document` into one
//! self-contained HTML page. The fixed inline styling mirrors the
//! physical receipt's line structure so the browser preview matches what
//! the printer produces. All text content is escaped.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use shared::ReceiptConfig;

use crate::receipt::{Align, Document, RenderOp, Size, Style};

const PAGE_CSS: &str = "\
body{margin:0;padding:24px;background:#e5e5e5;display:flex;justify-content:center;\
font-family:'Courier New',Courier,monospace}\
.receipt{background:#fff;width:384px;box-shadow:0 1px 4px rgba(0,0,0,.25);\
font-size:13px;line-height:1.35;color:#111;padding:16px 12px}\
.line{white-space:pre-wrap;word-break:break-word;min-height:1.35em}\
.center{text-align:center}.right{text-align:right}\
.bold{font-weight:700}\
.size-2h{font-size:1.6em}.size-2w{letter-spacing:.6em}.size-2x{font-size:1.6em;letter-spacing:.3em}\
.row{display:flex}.row .l{overflow:hidden}.row .r{flex:1;text-align:right;white-space:nowrap}\
.cells{display:flex}.cells span{overflow:hidden;white-space:nowrap}\
.rule{border-top:1px dashed #111;margin:4px 0}\
.cut{border-top:2px dashed #999;margin:12px -12px 0}\
.feed{min-height:1.35em}\
img{max-width:100%}";

/// Escape text for safe embedding in HTML
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Renders documents into a standalone HTML preview page
pub struct HtmlRenderer<'a> {
    config: &'a ReceiptConfig,
}

impl<'a> HtmlRenderer<'a> {
    pub fn new(config: &'a ReceiptConfig) -> Self {
        Self { config }
    }

    fn line_classes(align: Align, style: Style, size: Size) -> String {
        let mut classes = String::from("line");
        match align {
            Align::Center => classes.push_str(" center"),
            Align::Right => classes.push_str(" right"),
            Align::Left => {}
        }
        if style == Style::Bold {
            classes.push_str(" bold");
        }
        match size {
            Size::DoubleHeight => classes.push_str(" size-2h"),
            Size::DoubleWidth => classes.push_str(" size-2w"),
            Size::Double => classes.push_str(" size-2x"),
            Size::Normal => {}
        }
        classes
    }

    /// Render a document to a complete HTML page
    pub fn render(&self, doc: &Document) -> String {
        let mut body = String::with_capacity(4096);
        let mut align = Align::Left;
        let mut style = Style::Normal;
        let mut size = Size::Normal;

        for op in doc.ops() {
            match op {
                RenderOp::SetAlign(a) => align = *a,
                RenderOp::SetStyle(s) => style = *s,
                RenderOp::SetSize(s) => size = *s,
                RenderOp::Text(text) => {
                    body.push_str(&format!(
                        "<div class=\"{}\">{}</div>",
                        Self::line_classes(align, style, size),
                        escape_html(text)
                    ));
                }
                RenderOp::Row {
                    left,
                    right,
                    width_ratio,
                } => {
                    let left_pct = (width_ratio.clamp(0.0, 1.0) * 100.0).round() as u32;
                    body.push_str(&format!(
                        "<div class=\"{} row\"><span class=\"l\" style=\"width:{}%\">{}</span>\
                         <span class=\"r\">{}</span></div>",
                        Self::line_classes(align, style, size),
                        left_pct,
                        escape_html(left),
                        escape_html(right)
                    ));
                }
                RenderOp::TableRow { cells } => {
                    body.push_str(&format!(
                        "<div class=\"{} cells\">",
                        Self::line_classes(align, style, size)
                    ));
                    for cell in cells {
                        let pct = (cell.width_ratio.clamp(0.0, 1.0) * 100.0).round() as u32;
                        let cell_align = match cell.align {
                            Align::Left => "left",
                            Align::Center => "center",
                            Align::Right => "right",
                        };
                        body.push_str(&format!(
                            "<span style=\"width:{}%;text-align:{}\">{}</span>",
                            pct,
                            cell_align,
                            escape_html(&cell.text)
                        ));
                    }
                    body.push_str("</div>");
                }
                RenderOp::Rule => body.push_str("<div class=\"rule\"></div>"),
                RenderOp::Image { bytes, mime } => {
                    body.push_str(&format!(
                        "<div class=\"line center\"><img src=\"data:{};base64,{}\" alt=\"logo\"></div>",
                        escape_html(mime),
                        BASE64.encode(bytes)
                    ));
                }
                RenderOp::Feed(lines) => {
                    for _ in 0..*lines {
                        body.push_str("<div class=\"feed\">&#160;</div>");
                    }
                }
                RenderOp::Cut => body.push_str("<div class=\"cut\"></div>"),
            }
        }

        // Left/right margins are applied by the printer renderer as column
        // offsets; here they become extra page padding.
        let receipt_style = format!(
            "padding-left:calc(12px + {}ch);padding-right:calc(12px + {}ch)",
            self.config.left_margin, self.config.right_margin
        );

        format!(
            "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
             <title>Receipt Preview</title><style>{}</style></head>\
             <body><div class=\"receipt\" style=\"{}\">{}</div></body></html>",
            PAGE_CSS, receipt_style, body
        )
    }
}
