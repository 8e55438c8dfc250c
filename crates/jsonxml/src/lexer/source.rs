//! Character input for the lexer.
//!
//! [`StrSource`] reads from an in-memory string. With the `std` feature,
//! [`ReadSource`] decodes UTF-8 incrementally from any [`std::io::BufRead`],
//! so a document is never read into memory as a whole.
use alloc::string::String;

use super::error::ErrorSource;

/// A peekable stream of characters.
pub trait CharSource {
    /// Look at the next character without consuming it. `None` at end of
    /// input.
    ///
    /// # Errors
    ///
    /// Fails if the underlying input cannot be read or is not valid UTF-8.
    fn peek(&mut self) -> Result<Option<char>, ErrorSource>;

    /// Consume the next character.
    ///
    /// # Errors
    ///
    /// Fails if the underlying input cannot be read or is not valid UTF-8.
    fn bump(&mut self) -> Result<Option<char>, ErrorSource>;

    /// Append characters to `buffer` while `pred` holds, returning how many
    /// were copied.
    ///
    /// # Errors
    ///
    /// Fails if the underlying input cannot be read or is not valid UTF-8.
    fn copy_while(
        &mut self,
        buffer: &mut String,
        pred: impl Fn(char) -> bool,
    ) -> Result<usize, ErrorSource> {
        let mut copied = 0;
        while let Some(ch) = self.peek()? {
            if !pred(ch) {
                break;
            }
            self.bump()?;
            buffer.push(ch);
            copied += 1;
        }
        Ok(copied)
    }
}

/// Characters of a borrowed string.
#[derive(Debug, Clone)]
pub struct StrSource<'src> {
    rest: &'src str,
}

impl<'src> StrSource<'src> {
    #[must_use]
    pub fn new(text: &'src str) -> Self {
        Self { rest: text }
    }
}

impl CharSource for StrSource<'_> {
    #[inline]
    fn peek(&mut self) -> Result<Option<char>, ErrorSource> {
        Ok(self.rest.chars().next())
    }

    #[inline]
    fn bump(&mut self) -> Result<Option<char>, ErrorSource> {
        let mut chars = self.rest.chars();
        let ch = chars.next();
        self.rest = chars.as_str();
        Ok(ch)
    }

    fn copy_while(
        &mut self,
        buffer: &mut String,
        pred: impl Fn(char) -> bool,
    ) -> Result<usize, ErrorSource> {
        let mut copied = 0;
        let end = self
            .rest
            .char_indices()
            .find(|&(_, ch)| {
                if pred(ch) {
                    copied += 1;
                    false
                } else {
                    true
                }
            })
            .map_or(self.rest.len(), |(idx, _)| idx);
        buffer.push_str(&self.rest[..end]);
        self.rest = &self.rest[end..];
        Ok(copied)
    }
}

#[cfg(feature = "std")]
pub use read::ReadSource;

#[cfg(feature = "std")]
mod read {
    use std::io::{BufRead, ErrorKind};

    use super::{CharSource, ErrorSource};
    use crate::lexer::SyntaxError;

    /// Characters decoded from a buffered reader.
    ///
    /// Multi-byte characters may straddle buffer refills. Invalid UTF-8 is
    /// reported as [`SyntaxError::InvalidUtf8`] rather than replaced.
    #[derive(Debug)]
    pub struct ReadSource<R> {
        reader: R,
        peeked: Option<char>,
    }

    impl<R: BufRead> ReadSource<R> {
        pub fn new(reader: R) -> Self {
            Self {
                reader,
                peeked: None,
            }
        }

        pub fn into_inner(self) -> R {
            self.reader
        }

        fn fill(&mut self) -> Result<&[u8], ErrorSource> {
            loop {
                match self.reader.fill_buf() {
                    Ok(_) => break,
                    Err(err) if err.kind() == ErrorKind::Interrupted => {}
                    Err(err) => return Err(err.into()),
                }
            }
            Ok(self.reader.fill_buf()?)
        }

        fn decode(&mut self) -> Result<Option<char>, ErrorSource> {
            let mut pending = [0u8; 4];
            let mut len = 0;
            loop {
                let buf = self.fill()?;
                if buf.is_empty() {
                    return if len == 0 {
                        Ok(None)
                    } else {
                        Err(SyntaxError::InvalidUtf8.into())
                    };
                }

                if len == 0 {
                    let available = buf.len();
                    let (ch, size) = bstr::decode_utf8(buf);
                    if let Some(ch) = ch {
                        self.reader.consume(size);
                        return Ok(Some(ch));
                    }
                    // A valid prefix running into the end of the buffer is a
                    // character split across refills.
                    if size == available && size < 4 {
                        pending[..size].copy_from_slice(&buf[..size]);
                        len = size;
                        self.reader.consume(size);
                        continue;
                    }
                    return Err(SyntaxError::InvalidUtf8.into());
                }

                pending[len] = buf[0];
                len += 1;
                self.reader.consume(1);
                let (ch, size) = bstr::decode_utf8(&pending[..len]);
                if let Some(ch) = ch {
                    return Ok(Some(ch));
                }
                if size < len || len == 4 {
                    return Err(SyntaxError::InvalidUtf8.into());
                }
            }
        }
    }

    impl<R: BufRead> CharSource for ReadSource<R> {
        fn peek(&mut self) -> Result<Option<char>, ErrorSource> {
            if self.peeked.is_none() {
                self.peeked = self.decode()?;
            }
            Ok(self.peeked)
        }

        fn bump(&mut self) -> Result<Option<char>, ErrorSource> {
            match self.peeked.take() {
                Some(ch) => Ok(Some(ch)),
                None => self.decode(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::*;

    #[test]
    fn str_source_copy_while_stops_at_predicate() {
        let mut source = StrSource::new("héllo\"rest");
        let mut buffer = String::new();
        let copied = source.copy_while(&mut buffer, |ch| ch != '"').unwrap();
        assert_eq!(copied, 5);
        assert_eq!(buffer, "héllo");
        assert_eq!(source.peek().unwrap(), Some('"'));
    }

    #[test]
    fn str_source_copy_while_to_end() {
        let mut source = StrSource::new("abc");
        let mut buffer = String::new();
        assert_eq!(source.copy_while(&mut buffer, |_| true).unwrap(), 3);
        assert_eq!(source.bump().unwrap(), None);
    }

    #[cfg(feature = "std")]
    mod read {
        use std::io::{BufReader, Cursor};

        use super::super::{CharSource, ReadSource};
        use crate::lexer::{ErrorSource, SyntaxError};

        fn drain<S: CharSource>(source: &mut S) -> Result<alloc::string::String, ErrorSource> {
            let mut out = alloc::string::String::new();
            while let Some(ch) = source.bump()? {
                out.push(ch);
            }
            Ok(out)
        }

        #[test]
        fn decodes_characters_split_across_refills() {
            let text = "aé€😀z";
            // A one-byte buffer forces every multi-byte character to straddle
            // refills.
            let reader = BufReader::with_capacity(1, Cursor::new(text.as_bytes()));
            let mut source = ReadSource::new(reader);
            assert_eq!(source.peek().unwrap(), Some('a'));
            assert_eq!(drain(&mut source).unwrap(), text);
        }

        #[test]
        fn rejects_invalid_utf8() {
            let reader = Cursor::new(&b"a\xffb"[..]);
            let mut source = ReadSource::new(reader);
            assert_eq!(source.bump().unwrap(), Some('a'));
            let err = source.bump().unwrap_err();
            assert!(matches!(err, ErrorSource::Syntax(SyntaxError::InvalidUtf8)));
        }

        #[test]
        fn rejects_truncated_utf8() {
            let reader = BufReader::with_capacity(1, Cursor::new(&b"\xe2\x82"[..]));
            let mut source = ReadSource::new(reader);
            let err = source.bump().unwrap_err();
            assert!(matches!(err, ErrorSource::Syntax(SyntaxError::InvalidUtf8)));
        }
    }
}
