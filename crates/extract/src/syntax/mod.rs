//! In-process parser for Python model declarations.
//!
//! [`parse_module`] turns source text into an [`ast::Module`] or fails with
//! the position of the first syntax error.

pub mod ast;
pub mod lexer;
pub mod parser;

use modelsql_core::ParseError;
use std::path::Path;
use thiserror::Error;

pub use ast::{Assign, Call, ClassDef, Expr, Keyword, Module, Stmt};

/// A syntax error at a 1-based source position
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}, column {column}: {message}")]
pub struct SyntaxError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl SyntaxError {
    pub fn new(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            message: message.into(),
        }
    }

    /// Attach the file the error came from
    pub fn into_parse_error(self, path: impl AsRef<Path>) -> ParseError {
        ParseError::new(path.as_ref(), self.line, self.column, self.message)
    }
}

/// Parse a complete source file
pub fn parse_module(src: &str) -> Result<Module, SyntaxError> {
    let tokens = lexer::tokenize(src)?;
    parser::Parser::new(tokens).parse_module()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_to_parse_error() {
        let err = parse_module("class A(Model)\n    pass\n").unwrap_err();
        let parse_error = err.into_parse_error("app/models.py");
        assert_eq!(parse_error.line, 1);
        assert_eq!(parse_error.to_string(), "app/models.py:1:15: expected ':'");
    }
}
