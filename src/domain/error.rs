//! Domain error types.

/// A syntax error with position information for DSL parsing.
#[derive(Debug, Clone, thiserror::Error)]
#[error("syntax error at position {position}: {message}")]
pub struct ParseError {
    pub message: String,
    pub position: usize,
}

impl ParseError {
    /// Format the error as the offending line with a caret under the error
    /// column. `position` is an offset into the full input, which may span
    /// several lines.
    pub fn display_with_context(&self, input: &str) -> String {
        let position = self.position.min(input.len());
        let line_start = input[..position].rfind('\n').map(|i| i + 1).unwrap_or(0);
        let line_end = input[line_start..]
            .find('\n')
            .map(|i| line_start + i)
            .unwrap_or(input.len());
        let caret = " ".repeat(position - line_start) + "^";
        format!(
            "{line}\n{caret}\n{err}",
            line = &input[line_start..line_end],
            caret = caret,
            err = self
        )
    }
}

/// Top-level error type for stratlang.
#[derive(Debug, thiserror::Error)]
pub enum StratlangError {
    #[error(transparent)]
    Syntax(#[from] ParseError),

    #[error("unknown column: {name}")]
    UnknownColumn { name: String },

    #[error("unknown indicator: {name}")]
    UnknownIndicator { name: String },

    #[error("unknown operator: {name}")]
    UnknownOperator { name: String },

    #[error("{function} requires {expected}, got {got} argument(s)")]
    Arity {
        function: String,
        expected: String,
        got: usize,
    },

    #[error("invalid literal: {value}")]
    InvalidLiteral { value: String },

    #[error("config error: {reason}")]
    Config { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&StratlangError> for std::process::ExitCode {
    fn from(err: &StratlangError) -> Self {
        let code: u8 = match err {
            StratlangError::Io(_) => 1,
            StratlangError::Config { .. }
            | StratlangError::ConfigParse { .. }
            | StratlangError::ConfigMissing { .. } => 2,
            StratlangError::Data { .. } => 3,
            StratlangError::Syntax(_) => 4,
            StratlangError::UnknownColumn { .. }
            | StratlangError::UnknownIndicator { .. }
            | StratlangError::UnknownOperator { .. }
            | StratlangError::Arity { .. }
            | StratlangError::InvalidLiteral { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
