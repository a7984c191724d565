use vm::VmError;

#[derive(Clone, Debug, thiserror::Error)]
pub enum OpError {
    #[error("no handler registered for operator `{0}`")]
    UnsupportedOperator(String),
    #[error("operator `{0}` is already registered")]
    DuplicateOperator(String),
    #[error("`{op}` has no version for opset {opset}, the earliest is {since}")]
    UnsupportedVersion {
        op: String,
        opset: usize,
        since: usize,
    },
    #[error("handler `{expected}` cannot prepare a `{found}` node")]
    OperatorMismatch { expected: String, found: String },
    #[error("`{op}` requires attribute `{name}`")]
    MissingAttribute { op: String, name: String },
    #[error("`{op}` requires input #{index}")]
    MissingInput { op: String, index: usize },
    #[error("`{op}`: {reason}")]
    MalformedAttributes { op: String, reason: String },
    #[error("`{op}` takes {expected} inputs, found {found}")]
    InputArity {
        op: String,
        expected: usize,
        found: usize,
    },
    #[error(transparent)]
    Vm(#[from] VmError),
}
