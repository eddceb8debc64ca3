//! Codepage utilities for western thermal printers
//!
//! Receipt printers in this deployment run codepage WPC1252 (ESC t 16).
//! This module provides:
//! - Column width / pad / truncate helpers for fixed-width layout
//! - Two-column line composition
//! - UTF-8 to CP1252 conversion that preserves ESC/POS command bytes

/// Display width of a string in printer columns
///
/// After CP1252 conversion every printable character occupies one column,
/// so this is the char count.
pub fn display_width(s: &str) -> usize {
    s.chars().count()
}

/// Truncate a string to fit within a column width
pub fn truncate_width(s: &str, max_width: usize) -> String {
    s.chars().take(max_width).collect()
}

/// Pad a string to a specific column width
///
/// If the string is longer than the width, it will be truncated.
pub fn pad_width(s: &str, width: usize, align_right: bool) -> String {
    let current = display_width(s);
    if current >= width {
        return truncate_width(s, width);
    }
    let spaces = width - current;
    if align_right {
        format!("{}{}", " ".repeat(spaces), s)
    } else {
        format!("{}{}", s, " ".repeat(spaces))
    }
}

/// Center a string within a column width (no-op when it does not fit)
pub fn center_width(s: &str, width: usize) -> String {
    let current = display_width(s);
    if current >= width {
        return s.to_string();
    }
    let left = (width - current) / 2;
    format!("{}{}", " ".repeat(left), s)
}

/// Compose a line with left-aligned and right-aligned halves
///
/// Spaces fill the gap; when the halves do not fit on one line they are
/// joined with a single space instead.
pub fn compose_lr(left: &str, right: &str, width: usize) -> String {
    let lw = display_width(left);
    let rw = display_width(right);
    if lw + rw >= width {
        format!("{} {}", left, right)
    } else {
        format!("{}{}{}", left, " ".repeat(width - lw - rw), right)
    }
}

// ESC t 16 - select character code table WPC1252
const SELECT_CP1252: [u8; 3] = [0x1B, 0x74, 16];

/// Convert mixed UTF-8 content (with ESC/POS commands) to CP1252
///
/// ASCII bytes (0x00-0x7F) pass through exactly as is, which protects
/// ESC/POS commands from being corrupted. Bytes >= 0x80 are treated as
/// UTF-8 sequences and re-encoded to CP1252 (the euro sign maps to 0x80
/// on codepage WPC1252). Unmappable characters degrade to `?`.
///
/// The codepage selection is re-emitted after any INIT command (ESC @)
/// since INIT resets the printer to its default code table.
pub fn convert_to_cp1252(bytes: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(bytes.len() + 8);
    result.extend_from_slice(&SELECT_CP1252);

    let mut buffer = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];

        // INIT (ESC @ = 0x1B 0x40) resets the code table; re-select after it
        if b == 0x1B && i + 1 < bytes.len() && bytes[i + 1] == 0x40 {
            flush_buffer(&mut buffer, &mut result);
            result.extend_from_slice(&[0x1B, 0x40]);
            result.extend_from_slice(&SELECT_CP1252);
            i += 2;
            continue;
        }

        if b < 128 {
            // ASCII byte (command or ASCII text)
            flush_buffer(&mut buffer, &mut result);
            result.push(b);
        } else {
            // Part of a UTF-8 sequence
            buffer.push(b);
        }
        i += 1;
    }

    flush_buffer(&mut buffer, &mut result);
    result
}

/// Flush the non-ASCII buffer, converting UTF-8 to CP1252 char by char
fn flush_buffer(buffer: &mut Vec<u8>, result: &mut Vec<u8>) {
    if buffer.is_empty() {
        return;
    }

    let s = String::from_utf8_lossy(buffer);
    for c in s.chars() {
        let mut char_buf = [0u8; 4];
        let encoded = c.encode_utf8(&mut char_buf);
        let (cow, _, had_errors) = encoding_rs::WINDOWS_1252.encode(encoded);
        if had_errors {
            result.push(b'?');
        } else {
            result.extend_from_slice(&cow);
        }
    }
    buffer.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_width() {
        assert_eq!(display_width("hello"), 5);
        assert_eq!(display_width("café"), 4);
        assert_eq!(display_width(""), 0);
    }

    #[test]
    fn test_truncate_width() {
        assert_eq!(truncate_width("hello world", 5), "hello");
        assert_eq!(truncate_width("ok", 5), "ok");
    }

    #[test]
    fn test_pad_width() {
        assert_eq!(pad_width("hi", 5, false), "hi   ");
        assert_eq!(pad_width("hi", 5, true), "   hi");
        assert_eq!(pad_width("hello world", 5, false), "hello");
    }

    #[test]
    fn test_compose_lr() {
        assert_eq!(compose_lr("Total", "9.99", 16), "Total       9.99");
        // Too long for the width: single-space join
        assert_eq!(compose_lr("Long left side", "9.99", 10), "Long left side 9.99");
    }

    #[test]
    fn test_convert_preserves_commands() {
        // bold-on, text with accent, bold-off
        let mut input = vec![0x1B, 0x45, 0x01];
        input.extend_from_slice("café".as_bytes());
        input.extend_from_slice(&[0x1B, 0x45, 0x00]);

        let out = convert_to_cp1252(&input);
        // starts with codepage selection
        assert_eq!(&out[..3], &[0x1B, 0x74, 16]);
        // commands intact
        assert!(out.windows(3).any(|w| w == [0x1B, 0x45, 0x01]));
        assert!(out.windows(3).any(|w| w == [0x1B, 0x45, 0x00]));
        // é is a single CP1252 byte
        assert!(out.contains(&0xE9));
    }

    #[test]
    fn test_convert_euro_and_unmappable() {
        let out = convert_to_cp1252("€5".as_bytes());
        // euro is 0x80 on WPC1252
        assert!(out.contains(&0x80));

        let out = convert_to_cp1252("漢".as_bytes());
        assert!(out.contains(&b'?'));
    }

    #[test]
    fn test_convert_reselects_codepage_after_init() {
        let input = [0x41, 0x1B, 0x40, 0x42]; // A, INIT, B
        let out = convert_to_cp1252(&input);
        let init_pos = out
            .windows(2)
            .position(|w| w == [0x1B, 0x40])
            .expect("INIT preserved");
        assert_eq!(&out[init_pos + 2..init_pos + 5], &[0x1B, 0x74, 16]);
    }
}
