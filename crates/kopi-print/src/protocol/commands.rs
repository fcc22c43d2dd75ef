//! # ESC/POS Protocol Commands
//!
//! This module implements the subset of the ESC/POS command protocol used
//! by generic BLE thermal receipt printers (InnerPrinter, MPT-II and
//! compatible 58mm units).
//!
//! ## Protocol Overview
//!
//! ESC/POS commands are byte sequences starting with escape characters:
//!
//! - Single byte: `LF`
//! - Two bytes: `ESC @`
//! - Multi-byte with parameters: `ESC a n`, `ESC E n`, `GS V m`
//!
//! Text between commands is printed verbatim in the selected codepage;
//! a trailing `LF` flushes the line buffer onto paper.
//!
//! ## Reference
//!
//! Based on "ESC/POS Application Programming Guide" (Epson) as implemented
//! by the common 58mm clone firmware.

// ============================================================================
// ESCAPE SEQUENCE CONSTANTS
// ============================================================================

/// ESC (Escape) - Command prefix byte
///
/// Most ESC/POS commands begin with ESC (0x1B). This byte signals the start
/// of a control sequence rather than printable text.
pub const ESC: u8 = 0x1B;

/// GS (Group Separator) - Extended command prefix
///
/// Used for extended commands such as paper cut (`GS V m`).
/// Hex: 0x1D, Decimal: 29
pub const GS: u8 = 0x1D;

/// LF (Line Feed) - Print and advance one line
///
/// Prints any data in the line buffer and advances paper by the current
/// line spacing amount.
pub const LF: u8 = 0x0A;

// ============================================================================
// INITIALIZATION COMMANDS
// ============================================================================

/// # Initialize Printer (ESC @)
///
/// Resets the printer to its power-on default state. Sent at the start of
/// every receipt so a job never inherits formatting from the previous one.
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC @ |
/// | Hex     | 1B 40 |
/// | Decimal | 27 64 |
///
/// ## Example
///
/// ```
/// use kopi_print::protocol::commands;
///
/// let init = commands::init();
/// assert_eq!(init, vec![0x1B, 0x40]);
/// ```
#[inline]
pub fn init() -> Vec<u8> {
    vec![ESC, b'@']
}

/// # Select Character Code Table (ESC t n)
///
/// Selects the codepage used to render bytes 0x80-0xFF.
///
/// ## Protocol Details
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | ESC t n  |
/// | Hex     | 1B 74 n  |
///
/// ## Common Values
///
/// - `n=0`: CP437 (USA)
/// - `n=2`: CP850 (Multilingual Latin)
#[inline]
pub fn codepage(n: u8) -> Vec<u8> {
    vec![ESC, b't', n]
}

/// Selects CP850, the codepage [`crate::protocol::cp850`] encodes for.
#[inline]
pub fn codepage_cp850() -> Vec<u8> {
    codepage(2)
}

// ============================================================================
// FORMATTING COMMANDS
// ============================================================================

/// Text alignment values for [`align`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Alignment {
    Left = 0,
    Center = 1,
    Right = 2,
}

/// # Select Justification (ESC a n)
///
/// Applies to all lines printed until the next alignment change.
///
/// ## Protocol Details
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | ESC a n  |
/// | Hex     | 1B 61 n  |
///
/// ## Parameters
///
/// - `n=0`: left, `n=1`: center, `n=2`: right
#[inline]
pub fn align(alignment: Alignment) -> Vec<u8> {
    vec![ESC, b'a', alignment as u8]
}

/// # Turn Emphasized Mode On/Off (ESC E n)
///
/// Bold text. `n=1` enables, `n=0` disables.
///
/// ## Protocol Details
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | ESC E n  |
/// | Hex     | 1B 45 n  |
#[inline]
pub fn bold(on: bool) -> Vec<u8> {
    vec![ESC, b'E', on as u8]
}

// ============================================================================
// TEXT AND PAPER COMMANDS
// ============================================================================

/// Encodes a text line: CP850 bytes followed by a line feed.
#[inline]
pub fn text_line(text: &str) -> Vec<u8> {
    let mut out = super::cp850::encode(text);
    out.push(LF);
    out
}

/// Emits `n` blank lines.
#[inline]
pub fn feed_lines(n: u8) -> Vec<u8> {
    vec![LF; n as usize]
}

/// # Full Cut (GS V 0)
///
/// Cuts the paper completely. The clone firmware feeds to the cutter
/// position before cutting.
///
/// ## Protocol Details
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | GS V 0   |
/// | Hex     | 1D 56 00 |
#[inline]
pub fn cut() -> Vec<u8> {
    vec![GS, b'V', 0]
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init() {
        assert_eq!(init(), vec![0x1B, 0x40]);
    }

    #[test]
    fn test_codepage() {
        assert_eq!(codepage(0), vec![0x1B, 0x74, 0x00]);
        assert_eq!(codepage_cp850(), vec![0x1B, 0x74, 0x02]);
    }

    #[test]
    fn test_align() {
        assert_eq!(align(Alignment::Left), vec![0x1B, 0x61, 0x00]);
        assert_eq!(align(Alignment::Center), vec![0x1B, 0x61, 0x01]);
        assert_eq!(align(Alignment::Right), vec![0x1B, 0x61, 0x02]);
    }

    #[test]
    fn test_bold() {
        assert_eq!(bold(true), vec![0x1B, 0x45, 0x01]);
        assert_eq!(bold(false), vec![0x1B, 0x45, 0x00]);
    }

    #[test]
    fn test_text_line_appends_lf() {
        assert_eq!(text_line("ABC"), vec![b'A', b'B', b'C', 0x0A]);
    }

    #[test]
    fn test_feed_lines() {
        assert_eq!(feed_lines(3), vec![0x0A, 0x0A, 0x0A]);
        assert!(feed_lines(0).is_empty());
    }

    #[test]
    fn test_cut() {
        assert_eq!(cut(), vec![0x1D, 0x56, 0x00]);
    }
}
