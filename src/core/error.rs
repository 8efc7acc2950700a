use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while compiling a scene description. Lexical and syntax
/// errors carry the position of the currently active lexer at the point of
/// detection; the lexer stack may change files under the parser, so the
/// position is captured when the error is built, not when it is printed.
#[derive(Error, Debug)]
pub enum PbrtError {
    #[error("Lexical error (file: {file}, line {line}, column {column}): {msg}")]
    Lexical {
        file: String,
        line: usize,
        column: usize,
        msg: String,
    },

    #[error("Syntax error (file: {file}, line {line}, column {column}): {msg}")]
    Syntax {
        file: String,
        line: usize,
        column: usize,
        msg: String,
    },

    /// Normal end-of-stream signal. Internal: the parser converts it into a
    /// syntax error if the input ends inside a construct.
    #[error("input has ended")]
    InputEnded,

    #[error("I/O error on \"{}\": {source}", file.display())]
    Io {
        file: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, PbrtError>;
