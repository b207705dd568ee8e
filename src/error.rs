use thiserror::Error;

/// Every way a run can fail, tagged with the fixed process exit code the
/// external interface contract requires.
#[derive(Error, Debug)]
pub enum Error {
    #[error("no --source or --input given")]
    MissingArguments,

    #[error("could not open {path}: {source}")]
    InvalidFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed XML: {0}")]
    InvalidXmlFormat(String),

    #[error("invalid program structure: {0}")]
    InvalidXmlStructure(String),

    #[error("semantic error: {0}")]
    InvalidSemantics(String),

    #[error("operand type mismatch: {0}")]
    InvalidOperands(String),

    #[error("access to undefined variable {0}")]
    InvalidVariable(String),

    #[error("access to missing or uninitialized frame: {0}")]
    InvalidFrame(String),

    #[error("missing value: {0}")]
    MissingValue(String),

    #[error("invalid operand value: {0}")]
    InvalidOperandValue(String),

    #[error("invalid string operation: {0}")]
    InvalidStringOperation(String),

    /// Not a failure: the program executed `EXIT` with an in-range code.
    #[error("exit({0})")]
    Exit(u8),
}

impl Error {
    /// The process exit code this error maps to, per the external interface contract.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::MissingArguments => 10,
            Error::InvalidFile { .. } => 11,
            Error::InvalidXmlFormat(_) => 31,
            Error::InvalidXmlStructure(_) => 32,
            Error::InvalidSemantics(_) => 52,
            Error::InvalidOperands(_) => 53,
            Error::InvalidVariable(_) => 54,
            Error::InvalidFrame(_) => 55,
            Error::MissingValue(_) => 56,
            Error::InvalidOperandValue(_) => 57,
            Error::InvalidStringOperation(_) => 58,
            Error::Exit(code) => i32::from(*code),
        }
    }
}
