//! # Cycle notation
//!
//! Text format for permutations given by their disjoint cycles:
//! `"(0,1,2)(3,4)"`. Whitespace is ignored, `()` segments denote fixed points
//! and are dropped.
//!
//! Negative labels are written with a `~` prefix denoting the bitwise
//! complement, `~k == -k - 1`. A bare `-` is never accepted, so the comma stays
//! the only separator.
//!
//! Half-edge labels can also be printed *edge-like*: half-edge `2e` prints as
//! `e` and half-edge `2e + 1` as `~e`. [`hedge_from_edge_label`] reads a parsed
//! label back in that convention.
//!
//! ```
//! use cellmap::parser::{format_cycles, parse_cycles};
//!
//! let cycles = parse_cycles("()(0,1)(~0,3)").unwrap();
//! assert_eq!(cycles, vec![vec![0, 1], vec![-1, 3]]);
//! assert_eq!(format_cycles(&cycles, false), "(0,1)(~0,3)");
//! ```

use std::{iter::Peekable, str::CharIndices};

use itertools::Itertools;

pub mod error;

pub use error::CycleParseError;

/// Anything that can be written as a cycle element.
pub trait Label: Copy {
    fn label(self) -> i64;
}

impl Label for i64 {
    fn label(self) -> i64 {
        self
    }
}

impl Label for i32 {
    fn label(self) -> i64 {
        self.into()
    }
}

impl Label for usize {
    fn label(self) -> i64 {
        self as i64
    }
}

impl Label for u32 {
    fn label(self) -> i64 {
        self.into()
    }
}

/// Parses a list of disjoint cycles.
///
/// # Errors
///
/// Fails on any character outside of `( ) , ~`, digits and whitespace, on
/// unterminated cycles, on empty slots such as `(0,,1)` and on labels that do
/// not fit in an `i64`.
pub fn parse_cycles(text: &str) -> Result<Vec<Vec<i64>>, CycleParseError> {
    let mut cursor = Cursor::new(text);
    let mut cycles = Vec::new();

    loop {
        cursor.skip_whitespace();
        match cursor.peek() {
            None => break,
            Some((open, '(')) => {
                cursor.bump();
                let cycle = cursor.cycle(open)?;
                if !cycle.is_empty() {
                    cycles.push(cycle);
                }
            }
            Some((pos, found)) => {
                return Err(CycleParseError::UnexpectedChar {
                    pos,
                    found,
                    expected: "'('",
                })
            }
        }
    }

    Ok(cycles)
}

/// Writes cycles back in cycle notation.
///
/// With `edge_like` unset this is the inverse of [`parse_cycles`] for cycle
/// lists without empty cycles. With `edge_like` set, non-negative labels are
/// read as half-edges and printed as `e` / `~e`.
pub fn format_cycles<C, T>(cycles: &[C], edge_like: bool) -> String
where
    C: AsRef<[T]>,
    T: Label,
{
    cycles
        .iter()
        .map(|cycle| {
            let inner = cycle
                .as_ref()
                .iter()
                .map(|&x| format_label(x.label(), edge_like))
                .join(",");
            format!("({inner})")
        })
        .collect()
}

fn format_label(x: i64, edge_like: bool) -> String {
    match (x < 0, edge_like) {
        (true, _) => format!("~{}", !x),
        (false, false) => x.to_string(),
        (false, true) if x % 2 == 0 => (x / 2).to_string(),
        (false, true) => format!("~{}", x / 2),
    }
}

/// Half-edge denoted by a parsed edge-like label: `e` is `2e`, `~e` is `2e + 1`.
///
/// `None` if the half-edge does not fit in a `usize`.
pub fn hedge_from_edge_label(label: i64) -> Option<usize> {
    let (edge, side) = if label < 0 { (!label, 1) } else { (label, 0) };
    usize::try_from(edge).ok()?.checked_mul(2)?.checked_add(side)
}

struct Cursor<'a> {
    text: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Cursor {
            text,
            chars: text.char_indices().peekable(),
        }
    }

    fn peek(&mut self) -> Option<(usize, char)> {
        self.chars.peek().copied()
    }

    fn bump(&mut self) -> Option<(usize, char)> {
        self.chars.next()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some((_, c)) if c.is_whitespace()) {
            self.bump();
        }
    }

    /// Body of a cycle, the opening parenthesis at `open` already consumed.
    fn cycle(&mut self, open: usize) -> Result<Vec<i64>, CycleParseError> {
        let mut cycle = Vec::new();

        self.skip_whitespace();
        if let Some((_, ')')) = self.peek() {
            self.bump();
            return Ok(cycle);
        }

        loop {
            cycle.push(self.label(open)?);
            self.skip_whitespace();
            match self.bump() {
                Some((_, ',')) => continue,
                Some((_, ')')) => return Ok(cycle),
                Some((pos, found)) => {
                    return Err(CycleParseError::UnexpectedChar {
                        pos,
                        found,
                        expected: "',' or ')'",
                    })
                }
                None => return Err(CycleParseError::UnterminatedCycle { open }),
            }
        }
    }

    fn label(&mut self, open: usize) -> Result<i64, CycleParseError> {
        self.skip_whitespace();

        let complement = matches!(self.peek(), Some((_, '~')));
        if complement {
            self.bump();
        }

        let start = match self.peek() {
            Some((pos, c)) if c.is_ascii_digit() => pos,
            Some((pos, ',')) | Some((pos, ')')) => {
                return Err(CycleParseError::MissingLabel { pos })
            }
            Some((pos, found)) => {
                return Err(CycleParseError::UnexpectedChar {
                    pos,
                    found,
                    expected: "a label",
                })
            }
            None => return Err(CycleParseError::UnterminatedCycle { open }),
        };

        let mut end = start;
        while let Some((pos, c)) = self.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            end = pos + c.len_utf8();
            self.bump();
        }

        let digits = &self.text[start..end];
        let value: i64 = digits
            .parse()
            .map_err(|_| CycleParseError::LabelOutOfRange {
                pos: start,
                text: digits.to_owned(),
            })?;

        Ok(if complement { !value } else { value })
    }
}
