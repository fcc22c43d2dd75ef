//! # Code Page 850 Encoding
//!
//! Converts Unicode strings to CP850 single-byte encoding for ESC/POS
//! printers.
//!
//! The printer must be set to Code Page 850 (`ESC t 2`) for these bytes
//! to render correctly. ASCII (U+0000–U+007F) passes through unchanged.
//! Characters not in CP850 are replaced with `?`.

use tracing::warn;

/// Encode a Unicode string as CP850 bytes.
///
/// - ASCII (U+0000–U+007F): passed through as-is
/// - CP850 upper half (128 mapped Unicode code points): single CP850 byte
/// - Unmapped characters: replaced with `?`, warning logged
pub fn encode(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len());
    for ch in s.chars() {
        if (ch as u32) < 0x80 {
            out.push(ch as u8);
        } else if let Some(byte) = unicode_to_cp850(ch) {
            out.push(byte);
        } else {
            warn!(
                character = %ch,
                code_point = format!("U+{:04X}", ch as u32),
                "cp850: unmapped character, replacing with '?'"
            );
            out.push(b'?');
        }
    }
    out
}

/// Map a Unicode code point to its CP850 byte value (0x80–0xFF).
///
/// Returns `None` if the character has no CP850 representation.
/// Reference: IBM Code Page 850 character set.
fn unicode_to_cp850(ch: char) -> Option<u8> {
    // CP850 upper half: 128 entries mapping Unicode → byte 0x80–0xFF
    let byte = match ch {
        // 0x80–0x8F: Accented uppercase/lowercase
        'Ç' => 0x80, // U+00C7
        'ü' => 0x81, // U+00FC
        'é' => 0x82, // U+00E9
        'â' => 0x83, // U+00E2
        'ä' => 0x84, // U+00E4
        'à' => 0x85, // U+00E0
        'å' => 0x86, // U+00E5
        'ç' => 0x87, // U+00E7
        'ê' => 0x88, // U+00EA
        'ë' => 0x89, // U+00EB
        'è' => 0x8A, // U+00E8
        'ï' => 0x8B, // U+00EF
        'î' => 0x8C, // U+00EE
        'ì' => 0x8D, // U+00EC
        'Ä' => 0x8E, // U+00C4
        'Å' => 0x8F, // U+00C5

        // 0x90–0x9F: More accented, currency
        'É' => 0x90, // U+00C9
        'æ' => 0x91, // U+00E6
        'Æ' => 0x92, // U+00C6
        'ô' => 0x93, // U+00F4
        'ö' => 0x94, // U+00F6
        'ò' => 0x95, // U+00F2
        'û' => 0x96, // U+00FB
        'ù' => 0x97, // U+00F9
        'ÿ' => 0x98, // U+00FF
        'Ö' => 0x99, // U+00D6
        'Ü' => 0x9A, // U+00DC
        'ø' => 0x9B, // U+00F8
        '£' => 0x9C, // U+00A3
        'Ø' => 0x9D, // U+00D8
        '×' => 0x9E, // U+00D7
        'ƒ' => 0x9F, // U+0192

        // 0xA0–0xAF: Spanish, fractions, punctuation
        'á' => 0xA0, // U+00E1
        'í' => 0xA1, // U+00ED
        'ó' => 0xA2, // U+00F3
        'ú' => 0xA3, // U+00FA
        'ñ' => 0xA4, // U+00F1
        'Ñ' => 0xA5, // U+00D1
        'ª' => 0xA6, // U+00AA
        'º' => 0xA7, // U+00BA
        '¿' => 0xA8, // U+00BF
        '®' => 0xA9, // U+00AE
        '¬' => 0xAA, // U+00AC
        '½' => 0xAB, // U+00BD
        '¼' => 0xAC, // U+00BC
        '¡' => 0xAD, // U+00A1
        '«' => 0xAE, // U+00AB
        '»' => 0xAF, // U+00BB

        // 0xB0–0xBF: Shade blocks, box drawing, more accents
        '░' => 0xB0, // U+2591
        '▒' => 0xB1, // U+2592
        '▓' => 0xB2, // U+2593
        '│' => 0xB3, // U+2502
        '┤' => 0xB4, // U+2524
        'Á' => 0xB5, // U+00C1
        'Â' => 0xB6, // U+00C2
        'À' => 0xB7, // U+00C0
        '©' => 0xB8, // U+00A9
        '╣' => 0xB9, // U+2563
        '║' => 0xBA, // U+2551
        '╗' => 0xBB, // U+2557
        '╝' => 0xBC, // U+255D
        '¢' => 0xBD, // U+00A2
        '¥' => 0xBE, // U+00A5
        '┐' => 0xBF, // U+2510

        // 0xC0–0xCF: Box drawing, ã/Ã, currency sign
        '└' => 0xC0, // U+2514
        '┴' => 0xC1, // U+2534
        '┬' => 0xC2, // U+252C
        '├' => 0xC3, // U+251C
        '─' => 0xC4, // U+2500
        '┼' => 0xC5, // U+253C
        'ã' => 0xC6, // U+00E3
        'Ã' => 0xC7, // U+00C3
        '╚' => 0xC8, // U+255A
        '╔' => 0xC9, // U+2554
        '╩' => 0xCA, // U+2569
        '╦' => 0xCB, // U+2566
        '╠' => 0xCC, // U+2560
        '═' => 0xCD, // U+2550
        '╬' => 0xCE, // U+256C
        '¤' => 0xCF, // U+00A4

        // 0xD0–0xDF: Icelandic, more accents, blocks
        'ð' => 0xD0, // U+00F0
        'Ð' => 0xD1, // U+00D0
        'Ê' => 0xD2, // U+00CA
        'Ë' => 0xD3, // U+00CB
        'È' => 0xD4, // U+00C8
        'ı' => 0xD5, // U+0131
        'Í' => 0xD6, // U+00CD
        'Î' => 0xD7, // U+00CE
        'Ï' => 0xD8, // U+00CF
        '┘' => 0xD9, // U+2518
        '┌' => 0xDA, // U+250C
        '█' => 0xDB, // U+2588
        '▄' => 0xDC, // U+2584
        '¦' => 0xDD, // U+00A6
        'Ì' => 0xDE, // U+00CC
        '▀' => 0xDF, // U+2580

        // 0xE0–0xEF: More accents, Greek-derived letters
        'Ó' => 0xE0, // U+00D3
        'ß' => 0xE1, // U+00DF
        'Ô' => 0xE2, // U+00D4
        'Ò' => 0xE3, // U+00D2
        'õ' => 0xE4, // U+00F5
        'Õ' => 0xE5, // U+00D5
        'µ' => 0xE6, // U+00B5
        'þ' => 0xE7, // U+00FE
        'Þ' => 0xE8, // U+00DE
        'Ú' => 0xE9, // U+00DA
        'Û' => 0xEA, // U+00DB
        'Ù' => 0xEB, // U+00D9
        'ý' => 0xEC, // U+00FD
        'Ý' => 0xED, // U+00DD
        '¯' => 0xEE, // U+00AF
        '´' => 0xEF, // U+00B4

        // 0xF0–0xFF: Signs, superscripts
        '\u{00AD}' => 0xF0, // soft hyphen
        '±' => 0xF1,        // U+00B1
        '‗' => 0xF2,        // U+2017
        '¾' => 0xF3,        // U+00BE
        '¶' => 0xF4,        // U+00B6
        '§' => 0xF5,        // U+00A7
        '÷' => 0xF6,        // U+00F7
        '¸' => 0xF7,        // U+00B8
        '°' => 0xF8,        // U+00B0
        '¨' => 0xF9,        // U+00A8
        '·' => 0xFA,        // U+00B7
        '¹' => 0xFB,        // U+00B9
        '³' => 0xFC,        // U+00B3
        '²' => 0xFD,        // U+00B2
        '■' => 0xFE,        // U+25A0
        '\u{00A0}' => 0xFF, // no-break space

        _ => return None,
    };
    Some(byte)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_passthrough() {
        assert_eq!(encode("TOTAL: Rp 20.000"), b"TOTAL: Rp 20.000".to_vec());
    }

    #[test]
    fn test_mapped_characters() {
        assert_eq!(encode("é"), vec![0x82]);
        assert_eq!(encode("ñ"), vec![0xA4]);
        assert_eq!(encode("°"), vec![0xF8]);
        // Café: C-a-f ASCII, é mapped
        assert_eq!(encode("Café"), vec![b'C', b'a', b'f', 0x82]);
    }

    #[test]
    fn test_unmapped_becomes_question_mark() {
        assert_eq!(encode("→"), vec![b'?']);
        assert_eq!(encode("☕"), vec![b'?']);
    }
}
