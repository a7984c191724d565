use digit_layout::DigitLayout;

/// 张量原语的错误。
#[derive(Clone, Debug, thiserror::Error)]
pub enum VmError {
    #[error("shapes {a:?} and {b:?} cannot be broadcast together")]
    ShapeMismatch { a: Vec<usize>, b: Vec<usize> },
    #[error("data type mismatch: {a:?} vs {b:?}")]
    DataTypeMismatch { a: DigitLayout, b: DigitLayout },
    #[error("data type {0:?} is not supported here")]
    DataType(DigitLayout),
    #[error("integer division by zero")]
    DivideByZero,
    #[error("expected {expected} slice arguments, found {found}")]
    RankMismatch { expected: usize, found: usize },
    #[error("slice {start}+{len}*{step} out of range on axis {axis} of size {dim}")]
    OutOfRange {
        axis: usize,
        start: usize,
        len: usize,
        step: isize,
        dim: usize,
    },
    #[error("blob holds {found} bytes, layout needs {expected}")]
    SizeMismatch { expected: usize, found: usize },
}
