//! ESC/POS command builder
//!
//! Provides a fluent API for building ESC/POS print data.

use serde::Deserialize;

use crate::encoding::{compose_lr, convert_to_cp1252};

/// Per-printer ESC/POS rendering options (from the request JSON)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EscposOptions {
    /// Paper width in characters; 58mm paper is 32, 80mm is 48
    pub width: Option<usize>,
    /// Kick the cash drawer after printing
    pub cash_drawer: bool,
    /// Partial cut instead of full cut
    pub partial_cut: bool,
}

/// ESC/POS command builder
///
/// Builds ESC/POS byte sequences for thermal printers. All text is
/// converted to CP1252 in [`build`](EscPosBuilder::build).
pub struct EscPosBuilder {
    buf: Vec<u8>,
    width: usize,
}

impl EscPosBuilder {
    /// Create a new builder with the specified paper width in characters
    ///
    /// Common widths:
    /// - 58mm paper: 32 characters
    /// - 80mm paper: 48 characters
    pub fn new(width: usize) -> Self {
        let mut buf = Vec::with_capacity(4096);
        // Initialize printer (ESC @)
        buf.extend_from_slice(&[0x1B, 0x40]);
        Self { buf, width }
    }

    /// Get the configured paper width
    pub fn width(&self) -> usize {
        self.width
    }

    // === Text Output ===

    /// Write raw text
    pub fn text(&mut self, s: &str) -> &mut Self {
        self.buf.extend_from_slice(s.as_bytes());
        self
    }

    /// Write text followed by newline
    pub fn line(&mut self, s: &str) -> &mut Self {
        self.text(s);
        self.buf.push(b'\n');
        self
    }

    /// Write empty line
    pub fn newline(&mut self) -> &mut Self {
        self.buf.push(b'\n');
        self
    }

    /// Print and feed n lines
    pub fn feed(&mut self, lines: u8) -> &mut Self {
        // ESC d n
        self.buf.extend_from_slice(&[0x1B, 0x64, lines]);
        self
    }

    // === Alignment ===

    /// Align text to center
    pub fn center(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x61, 0x01]);
        self
    }

    /// Align text to left (default)
    pub fn left(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x61, 0x00]);
        self
    }

    /// Align text to right
    pub fn right(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x61, 0x02]);
        self
    }

    // === Text Style ===

    /// Enable bold text
    pub fn bold(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x45, 0x01]);
        self
    }

    /// Disable bold text
    pub fn bold_off(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x45, 0x00]);
        self
    }

    /// Double width and height
    pub fn double_size(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1D, 0x21, 0x11]);
        self
    }

    /// Double height only
    pub fn double_height(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1D, 0x21, 0x01]);
        self
    }

    /// Double width only
    pub fn double_width(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1D, 0x21, 0x10]);
        self
    }

    /// Reset to normal size
    pub fn reset_size(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1D, 0x21, 0x00]);
        self
    }

    // === Separators ===

    /// Print a line of '=' characters
    pub fn sep_double(&mut self) -> &mut Self {
        self.line(&"=".repeat(self.width))
    }

    /// Print a line of '-' characters
    pub fn sep_single(&mut self) -> &mut Self {
        self.line(&"-".repeat(self.width))
    }

    // === Layout Helpers ===

    /// Print left and right text on the same line
    ///
    /// Left text is left-aligned, right text is right-aligned, with
    /// spaces filling the gap.
    pub fn line_lr(&mut self, left: &str, right: &str) -> &mut Self {
        let composed = compose_lr(left, right, self.width);
        self.line(&composed)
    }

    // === Paper Control ===

    /// Cut paper (full cut)
    pub fn cut(&mut self) -> &mut Self {
        // GS V 0 - Full cut
        self.buf.extend_from_slice(&[0x1D, 0x56, 0x00]);
        self
    }

    /// Full cut with feed — feeds n lines then cuts.
    /// Uses GS V 66 n, which lets the printer manage cutter-to-head
    /// distance and wastes less top margin on the next ticket than
    /// separate feed() + cut() calls.
    pub fn cut_feed(&mut self, lines: u8) -> &mut Self {
        // GS V 66 n
        self.buf.extend_from_slice(&[0x1D, 0x56, 0x42, lines]);
        self
    }

    /// Partial cut (leave a small connection)
    pub fn cut_partial(&mut self) -> &mut Self {
        // GS V 1
        self.buf.extend_from_slice(&[0x1D, 0x56, 0x01]);
        self
    }

    // === Cash Drawer ===

    /// Open cash drawer (pin 2)
    pub fn open_drawer(&mut self) -> &mut Self {
        // ESC p m t1 t2 - Generate pulse on pin m
        self.buf.extend_from_slice(&[0x1B, 0x70, 0x00, 25, 250]);
        self
    }

    // === Raw Commands ===

    /// Write raw bytes directly
    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    // === Build ===

    /// Build the final byte buffer with CP1252 encoding
    ///
    /// Converts all UTF-8 text to CP1252 while preserving ESC/POS
    /// commands.
    pub fn build(self) -> Vec<u8> {
        convert_to_cp1252(&self.buf)
    }

    /// Build without codepage conversion (for debugging or ASCII-only
    /// content)
    pub fn build_raw(self) -> Vec<u8> {
        self.buf
    }
}

impl Default for EscPosBuilder {
    fn default() -> Self {
        Self::new(48)
    }
}

// ============================================================================
// Image Processing
// ============================================================================

/// Convert image bytes (logo) to ESC/POS raster data
///
/// The image will be:
/// - Resized to fit max width (384 dots)
/// - Converted to 1-bit monochrome with alpha handling
/// - Encoded as GS v 0 raster graphics, center aligned
///
/// Returns None when the bytes do not decode as an image.
#[cfg(feature = "image")]
pub fn raster_image(bytes: &[u8]) -> Option<Vec<u8>> {
    use image::GenericImageView;
    use tracing::{info, warn};

    let img = match image::load_from_memory(bytes) {
        Ok(i) => {
            info!(dimensions = ?i.dimensions(), "logo image decoded");
            i
        }
        Err(e) => {
            warn!(error = %e, "logo decode failed");
            return None;
        }
    };

    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return None;
    }

    // Resize if too wide (max 384 dots for 58mm/80mm)
    let max_width = 384;
    let (new_w, new_h) = if w > max_width {
        let ratio = max_width as f64 / w as f64;
        (max_width, (h as f64 * ratio) as u32)
    } else {
        (w, h)
    };
    if new_h == 0 {
        return None;
    }

    let resized = img.resize(new_w, new_h, image::imageops::FilterType::Nearest);

    // Raster bit image command GS v 0
    let x_bytes = new_w.div_ceil(8);

    let mut data = Vec::new();

    // Center align for image
    data.extend_from_slice(&[0x1B, 0x61, 0x01]);

    // GS v 0 m xL xH yL yH
    data.extend_from_slice(&[0x1D, 0x76, 0x30, 0x00]);
    data.push(x_bytes as u8);
    data.push((x_bytes >> 8) as u8);
    data.push(new_h as u8);
    data.push((new_h >> 8) as u8);

    // Convert to RGBA for transparency handling
    let rgba = resized.to_rgba8();

    for y in 0..new_h {
        for x_byte in 0..x_bytes {
            let mut byte = 0u8;
            for bit in 0..8 {
                let x = x_byte * 8 + bit;
                if x < new_w {
                    let pixel = rgba.get_pixel(x, y);

                    let alpha = pixel[3];
                    if alpha >= 128 {
                        // Opaque - check luminance
                        let luma = (0.299 * pixel[0] as f32
                            + 0.587 * pixel[1] as f32
                            + 0.114 * pixel[2] as f32) as u8;

                        // Dark enough = print black (1)
                        if luma < 128 {
                            byte |= 1 << (7 - bit);
                        }
                    }
                    // Transparent = white (0)
                }
            }
            data.push(byte);
        }
    }

    // Newline after image, back to left alignment
    data.push(0x0A);
    data.extend_from_slice(&[0x1B, 0x61, 0x00]);

    Some(data)
}
