use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CycleParseError {
    #[error("Unexpected character {found:?} at byte {pos}, expected {expected}")]
    UnexpectedChar {
        pos: usize,
        found: char,
        expected: &'static str,
    },
    #[error("Cycle opened at byte {open} is never closed")]
    UnterminatedCycle { open: usize },
    #[error("Missing label at byte {pos}")]
    MissingLabel { pos: usize },
    #[error("Label {text:?} at byte {pos} does not fit in 64 bits")]
    LabelOutOfRange { pos: usize, text: String },
}
