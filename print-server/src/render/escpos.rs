//! ESC/POS renderer
//!
//! Walks a `Document` and translates each op into the printer's native
//! command surface via `EscPosBuilder`. The same document drives the HTML
//! preview, so this renderer holds no layout decisions of its own, only
//! the op-to-command translation.

use posr_printer::{EscPosBuilder, EscposOptions, center_width, compose_lr, pad_width};
use shared::ReceiptConfig;
use tracing::warn;

use crate::receipt::{Align, Cell, Document, RenderOp, Size, Style};

/// Renders documents into ESC/POS byte streams for one printer
pub struct PrinterRenderer {
    width: usize,
    left_margin: usize,
    right_margin: usize,
    cash_drawer: bool,
    partial_cut: bool,
}

impl PrinterRenderer {
    pub fn new(config: &ReceiptConfig, opts: &EscposOptions, default_width: usize) -> Self {
        Self {
            width: opts.width.unwrap_or(default_width).max(16),
            left_margin: config.left_margin as usize,
            right_margin: config.right_margin as usize,
            cash_drawer: opts.cash_drawer,
            partial_cut: opts.partial_cut,
        }
    }

    fn effective_width(&self) -> usize {
        self.width
            .saturating_sub(self.left_margin + self.right_margin)
            .max(8)
    }

    fn indent(&self, align: Align) -> String {
        // The printer centers/right-aligns by itself; the left margin only
        // applies to left-aligned content.
        if align == Align::Left && self.left_margin > 0 {
            " ".repeat(self.left_margin)
        } else {
            String::new()
        }
    }

    fn table_line(&self, cells: &[Cell]) -> String {
        let width = self.effective_width();
        let mut line = String::new();
        let mut used = 0;

        for (idx, cell) in cells.iter().enumerate() {
            let cell_width = if idx + 1 == cells.len() {
                width.saturating_sub(used)
            } else {
                ((cell.width_ratio * width as f64) as usize).min(width.saturating_sub(used))
            };
            used += cell_width;

            let padded = match cell.align {
                Align::Left => pad_width(&cell.text, cell_width, false),
                Align::Right => pad_width(&cell.text, cell_width, true),
                Align::Center => pad_width(&center_width(&cell.text, cell_width), cell_width, false),
            };
            line.push_str(&padded);
        }
        line
    }

    /// Render a document to the final ESC/POS byte stream
    pub fn render(&self, doc: &Document) -> Vec<u8> {
        let mut b = EscPosBuilder::new(self.width);
        let mut align = Align::Left;
        let width = self.effective_width();

        let ops = doc.ops();
        let mut i = 0;
        while i < ops.len() {
            match &ops[i] {
                RenderOp::SetAlign(a) => {
                    align = *a;
                    match a {
                        Align::Left => b.left(),
                        Align::Center => b.center(),
                        Align::Right => b.right(),
                    };
                }
                RenderOp::SetStyle(style) => {
                    match style {
                        Style::Bold => b.bold(),
                        Style::Normal => b.bold_off(),
                    };
                }
                RenderOp::SetSize(size) => {
                    match size {
                        Size::Normal => b.reset_size(),
                        Size::DoubleHeight => b.double_height(),
                        Size::DoubleWidth => b.double_width(),
                        Size::Double => b.double_size(),
                    };
                }
                RenderOp::Text(text) => {
                    b.line(&format!("{}{}", self.indent(align), text));
                }
                RenderOp::Row { left, right, .. } => {
                    // The printer pads to the full line; the width ratio only
                    // matters to proportional renderers.
                    let composed = compose_lr(left, right, width);
                    b.line(&format!("{}{}", self.indent(Align::Left), composed));
                }
                RenderOp::TableRow { cells } => {
                    let line = self.table_line(cells);
                    b.line(&format!("{}{}", self.indent(Align::Left), line));
                }
                RenderOp::Rule => {
                    b.line(&format!("{}{}", self.indent(Align::Left), "-".repeat(width)));
                }
                RenderOp::Image { bytes, .. } => match posr_printer::raster_image(bytes) {
                    Some(raster) => {
                        b.raw(&raster);
                    }
                    None => {
                        warn!("image op skipped: bytes did not decode");
                    }
                },
                RenderOp::Feed(lines) => {
                    // Fold a trailing feed into the cut command so the
                    // printer manages cutter-to-head distance itself.
                    if matches!(ops.get(i + 1), Some(RenderOp::Cut)) && !self.partial_cut {
                        if self.cash_drawer {
                            b.open_drawer();
                        }
                        b.cut_feed(*lines);
                        i += 2;
                        continue;
                    }
                    b.feed(*lines);
                }
                RenderOp::Cut => {
                    if self.cash_drawer {
                        b.open_drawer();
                    }
                    if self.partial_cut {
                        b.cut_partial();
                    } else {
                        b.cut();
                    }
                }
            }
            i += 1;
        }

        b.build()
    }
}
