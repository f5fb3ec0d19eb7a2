/// Errors from typing a macro attribute's arguments.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ArgumentError {
    #[error("unknown naming strategy '{strategy}', expected 'default' or 'snake_case'")]
    UnknownStrategy { strategy: String },

    #[error("'@{attribute}' requires a '{label}:' argument")]
    MissingArgument { attribute: String, label: String },

    #[error("'{label}:' argument of '@{attribute}' must be a string literal")]
    ExpectedStringLiteral { attribute: String, label: String },

    #[error("unexpected argument '{label}' for '@{attribute}'")]
    UnexpectedArgument { attribute: String, label: String },
}

/// Errors from the declaration source reader.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("syntax error at {line}:{column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("unterminated string literal starting at {line}:{column}")]
    UnterminatedString { line: usize, column: usize },

    #[error("unterminated block comment starting at {line}:{column}")]
    UnterminatedComment { line: usize, column: usize },

    #[error("invalid macro argument at {line}:{column}: {source}")]
    Argument {
        line: usize,
        column: usize,
        source: ArgumentError,
    },
}
