//! Accumulates the four hexadecimal digits of a `\uXXXX` escape.
//!
//! JSON encodes characters outside the Basic Multilingual Plane as a pair of
//! UTF-16 surrogate escapes, so the buffer yields raw UTF-16 code units and
//! leaves pairing to the lexer.
use super::SyntaxError;

#[derive(Debug, Default)]
pub(crate) struct UnicodeEscapeBuffer {
    code: u16,
    len: u8,
}

impl UnicodeEscapeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.code = 0;
        self.len = 0;
    }

    /// Feeds one hexadecimal digit. Returns the code unit once four digits
    /// have been seen, resetting for the next escape.
    pub fn feed(&mut self, c: char) -> Result<Option<u16>, SyntaxError> {
        let digit = c
            .to_digit(16)
            .ok_or(SyntaxError::InvalidUnicodeEscapeChar(c))?;

        // `digit < 16`, so the truncation is lossless.
        #[allow(clippy::cast_possible_truncation)]
        let digit = digit as u16;
        self.code = (self.code << 4) | digit;
        self.len += 1;

        if self.len == 4 {
            let code = self.code;
            self.reset();
            Ok(Some(code))
        } else {
            Ok(None)
        }
    }
}

/// Combines a high and a low surrogate into a scalar value.
pub(crate) fn combine_surrogates(high: u16, low: u16) -> Option<char> {
    if !(0xD800..0xDC00).contains(&high) || !(0xDC00..0xE000).contains(&low) {
        return None;
    }
    let code = 0x10000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
    char::from_u32(code)
}
