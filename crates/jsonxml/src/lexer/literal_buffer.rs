use crate::token::ScalarKind;

/// What happened after feeding one more character into the literal matcher?
pub(crate) enum Step {
    /// Character matched, but the literal is not finished yet.
    NeedMore,
    /// Character matched *and* it was the last byte of the literal.
    Done(ScalarKind),
    /// Character did **not** match the expected byte.
    Reject,
}

/// Matches the remaining bytes of `null`, `true` or `false` after their first
/// character has been seen.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct ExpectedLiteralBuffer {
    rest: &'static [u8],
    kind: ScalarKind,
}

impl ExpectedLiteralBuffer {
    /// Start matching after the *first* character (`n`, `t`, or `f`).
    pub fn new(first: char) -> Option<Self> {
        let (rest, kind): (&'static [u8], _) = match first {
            'n' => (b"ull", ScalarKind::Null),
            't' => (b"rue", ScalarKind::True),
            'f' => (b"alse", ScalarKind::False),
            _ => return None,
        };
        Some(Self { rest, kind })
    }

    pub fn step(&mut self, c: char) -> Step {
        match self.rest.split_first() {
            Some((expected, rest)) if *expected as char == c => {
                self.rest = rest;
                if rest.is_empty() {
                    Step::Done(self.kind)
                } else {
                    Step::NeedMore
                }
            }
            _ => Step::Reject,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(first: char, rest: &str) -> Option<ScalarKind> {
        let mut buffer = ExpectedLiteralBuffer::new(first)?;
        for c in rest.chars() {
            match buffer.step(c) {
                Step::NeedMore => {}
                Step::Done(kind) => return Some(kind),
                Step::Reject => return None,
            }
        }
        None
    }

    #[test]
    fn matches_literals() {
        assert_eq!(run('n', "ull"), Some(ScalarKind::Null));
        assert_eq!(run('t', "rue"), Some(ScalarKind::True));
        assert_eq!(run('f', "alse"), Some(ScalarKind::False));
    }

    #[test]
    fn rejects_mismatch_and_unknown_start() {
        assert_eq!(run('t', "ru"), None);
        assert_eq!(run('f', "alsy"), None);
        assert!(ExpectedLiteralBuffer::new('x').is_none());
    }
}
