//! Tokenizer for the Python subset understood by the model extractor.
//!
//! Produces a flat token stream with explicit `Newline`, `Indent` and
//! `Dedent` tokens, the way the reference tokenizer does. Lexical problems
//! (unterminated strings, unbalanced brackets, inconsistent dedents, stray
//! characters) are reported as [`SyntaxError`]s.
//!
//! Individual lexemes are recognized with `nom`; line structure,
//! indentation and bracket nesting are tracked by [`Lexer`].

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while, take_while1},
    character::complete::{char, digit1, one_of},
    combinator::{opt, recognize},
    sequence::{pair, tuple},
};

use super::SyntaxError;

// ============================================================================
// Tokens
// ============================================================================

/// Kind of a lexical token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier or keyword
    Name(String),
    /// Numeric literal, kept as written
    Number(String),
    /// String literal body (prefix and quotes removed, escapes untouched)
    Str(String),
    /// Operator or delimiter
    Op(&'static str),
    /// End of a logical line
    Newline,
    /// Indentation increased
    Indent,
    /// Indentation decreased
    Dedent,
    /// End of input
    EndMarker,
}

/// A token with its 1-based source position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
}

impl Token {
    /// Check if this token is the given operator
    pub fn is_op(&self, op: &str) -> bool {
        matches!(self.kind, TokenKind::Op(o) if o == op)
    }

    /// Check if this token is the given name or keyword
    pub fn is_name(&self, name: &str) -> bool {
        matches!(&self.kind, TokenKind::Name(n) if n == name)
    }

    /// The identifier, if this is a name token
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Name(n) => Some(n),
            _ => None,
        }
    }

    /// Check if this token opens a bracket
    pub fn opens(&self) -> bool {
        self.is_op("(") || self.is_op("[") || self.is_op("{")
    }

    /// Check if this token closes a bracket
    pub fn closes(&self) -> bool {
        self.is_op(")") || self.is_op("]") || self.is_op("}")
    }
}

// ============================================================================
// Lexeme recognizers
// ============================================================================

const OPERATORS: &[&str] = &[
    "**=", "//=", ">>=", "<<=", "...", "->", "**", "//", "==", "!=", "<=", ">=", ":=", "+=",
    "-=", "*=", "/=", "%=", "&=", "|=", "^=", "@=", "<<", ">>", "+", "-", "*", "/", "%", "@",
    "&", "|", "^", "~", "<", ">", "(", ")", "[", "]", "{", "}", ",", ":", ";", ".", "=",
];

fn is_name_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_name_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

/// Identifier or keyword
fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(take_while1(is_name_start), take_while(is_name_continue)))(input)
}

/// Run of digits, letters and underscores following a numeric start
fn alnum_run(input: &str) -> IResult<&str, &str> {
    take_while(|c: char| c.is_ascii_alphanumeric() || c == '_')(input)
}

/// Sign and digits completing an exponent such as `1e-5`
fn exponent_sign(input: &str) -> IResult<&str, &str> {
    recognize(pair(one_of("+-"), digit1))(input)
}

/// Numeric literal: decimal, float, exponent, hex/octal/binary, imaginary
fn number(input: &str) -> IResult<&str, &str> {
    let (rest, mantissa) = alt((
        recognize(tuple((digit1, alnum_run, opt(pair(char('.'), alnum_run))))),
        recognize(tuple((char('.'), digit1, alnum_run))),
    ))(input)?;

    let is_hex = mantissa.starts_with("0x") || mantissa.starts_with("0X");
    if !is_hex && mantissa.ends_with(['e', 'E']) {
        if let Ok((rest, sign)) = exponent_sign(rest) {
            return Ok((rest, &input[..mantissa.len() + sign.len()]));
        }
    }

    Ok((rest, mantissa))
}

/// String prefix plus opening quote, e.g. `rb'''`
fn string_open(input: &str) -> IResult<&str, (&str, &str)> {
    pair(
        alt((
            tag_no_case("rb"),
            tag_no_case("br"),
            tag_no_case("fr"),
            tag_no_case("rf"),
            tag_no_case("r"),
            tag_no_case("b"),
            tag_no_case("u"),
            tag_no_case("f"),
            tag(""),
        )),
        alt((tag("\"\"\""), tag("'''"), tag("\""), tag("'"))),
    )(input)
}

/// Longest matching operator
fn operator(input: &str) -> Option<&'static str> {
    OPERATORS.iter().copied().find(|op| input.starts_with(op))
}

// ============================================================================
// Lexer
// ============================================================================

/// Stateful tokenizer over one source text
pub struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
    column: usize,
    indents: Vec<usize>,
    /// Open brackets with their positions
    brackets: Vec<(char, usize, usize)>,
    at_line_start: bool,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    /// Create a lexer over `src`
    pub fn new(src: &'a str) -> Self {
        let src = src.strip_prefix('\u{feff}').unwrap_or(src);
        Self {
            src,
            pos: 0,
            line: 1,
            column: 1,
            indents: vec![0],
            brackets: Vec::new(),
            at_line_start: true,
            tokens: Vec::new(),
        }
    }

    /// Tokenize the whole input
    pub fn tokenize(mut self) -> Result<Vec<Token>, SyntaxError> {
        while self.pos < self.src.len() {
            if self.at_line_start && self.brackets.is_empty() {
                self.indentation()?;
                continue;
            }
            self.next_token()?;
        }

        if let Some(&(open, line, column)) = self.brackets.last() {
            return Err(SyntaxError::new(
                line,
                column,
                format!("'{}' was never closed", open),
            ));
        }

        if self
            .tokens
            .last()
            .is_some_and(|t| !matches!(t.kind, TokenKind::Newline | TokenKind::Dedent))
        {
            self.push(TokenKind::Newline);
        }
        while self.indents.len() > 1 {
            self.indents.pop();
            self.push(TokenKind::Dedent);
        }
        self.push(TokenKind::EndMarker);

        Ok(self.tokens)
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn push(&mut self, kind: TokenKind) {
        self.tokens.push(Token {
            kind,
            line: self.line,
            column: self.column,
        });
    }

    fn push_at(&mut self, kind: TokenKind, line: usize, column: usize) {
        self.tokens.push(Token { kind, line, column });
    }

    /// Advance over `len` bytes that contain no line breaks
    fn advance(&mut self, len: usize) {
        self.column += self.src[self.pos..self.pos + len].chars().count();
        self.pos += len;
    }

    /// Advance over one line break (`\n`, `\r\n` or `\r`)
    fn advance_newline(&mut self) {
        if self.rest().starts_with("\r\n") {
            self.pos += 2;
        } else {
            self.pos += 1;
        }
        self.line += 1;
        self.column = 1;
    }

    fn error(&self, message: impl Into<String>) -> SyntaxError {
        SyntaxError::new(self.line, self.column, message)
    }

    /// Measure the indentation of a new line and emit Indent/Dedent tokens.
    /// Blank and comment-only lines are consumed without tokens.
    fn indentation(&mut self) -> Result<(), SyntaxError> {
        let mut width = 0;
        let mut len = 0;
        for c in self.rest().chars() {
            match c {
                ' ' => width += 1,
                '\t' => width = (width / 8 + 1) * 8,
                '\x0c' => width = 0,
                _ => break,
            }
            len += 1;
        }
        self.advance(len);

        match self.rest().chars().next() {
            None => return Ok(()),
            Some('#') => {
                self.skip_comment();
                if !self.rest().is_empty() {
                    self.advance_newline();
                }
                return Ok(());
            }
            Some('\n' | '\r') => {
                self.advance_newline();
                return Ok(());
            }
            _ => {}
        }

        self.at_line_start = false;
        let current = self.indents.last().copied().unwrap_or(0);

        if width > current {
            self.indents.push(width);
            self.push(TokenKind::Indent);
        } else if width < current {
            while self.indents.last().is_some_and(|&w| w > width) {
                self.indents.pop();
                self.push(TokenKind::Dedent);
            }
            if self.indents.last().copied().unwrap_or(0) != width {
                return Err(self.error("unindent does not match any outer indentation level"));
            }
        }

        Ok(())
    }

    fn line_continues(&self) -> bool {
        let rest = self.rest();
        rest.starts_with("\\\n") || rest.starts_with("\\\r")
    }

    fn skip_comment(&mut self) {
        let len = self.rest().find(['\n', '\r']).unwrap_or(self.rest().len());
        self.advance(len);
    }

    fn next_token(&mut self) -> Result<(), SyntaxError> {
        let rest = self.rest();
        let Some(c) = rest.chars().next() else {
            return Ok(());
        };

        match c {
            ' ' | '\t' | '\x0c' => {
                self.advance(c.len_utf8());
                Ok(())
            }
            '#' => {
                self.skip_comment();
                Ok(())
            }
            '\n' | '\r' => {
                if self.brackets.is_empty() {
                    self.push(TokenKind::Newline);
                    self.at_line_start = true;
                }
                self.advance_newline();
                Ok(())
            }
            '\\' => {
                if self.line_continues() {
                    self.advance(1);
                    self.advance_newline();
                    if self.rest().is_empty() {
                        return Err(self.error("unexpected end of file after line continuation"));
                    }
                    Ok(())
                } else {
                    Err(self.error("unexpected character after line continuation character"))
                }
            }
            _ => {
                if let Ok((_, (prefix, quote))) = string_open(rest) {
                    return self.string(prefix.len(), quote);
                }
                if let Ok((_, text)) = number(rest) {
                    let len = text.len();
                    self.push(TokenKind::Number(text.to_string()));
                    self.advance(len);
                    return Ok(());
                }
                if let Ok((_, text)) = identifier(rest) {
                    let len = text.len();
                    self.push(TokenKind::Name(text.to_string()));
                    self.advance(len);
                    return Ok(());
                }
                if let Some(op) = operator(rest) {
                    return self.operator(op);
                }
                Err(self.error(format!("invalid character '{}'", c)))
            }
        }
    }

    fn operator(&mut self, op: &'static str) -> Result<(), SyntaxError> {
        match op {
            "(" | "[" | "{" => {
                let open = op.chars().next().unwrap_or('(');
                self.brackets.push((open, self.line, self.column));
            }
            ")" | "]" | "}" => {
                let close = op.chars().next().unwrap_or(')');
                let expected = match close {
                    ')' => '(',
                    ']' => '[',
                    _ => '{',
                };
                match self.brackets.pop() {
                    Some((open, _, _)) if open == expected => {}
                    Some((open, _, _)) => {
                        return Err(self.error(format!(
                            "closing parenthesis '{}' does not match opening parenthesis '{}'",
                            close, open
                        )));
                    }
                    None => return Err(self.error(format!("unmatched '{}'", close))),
                }
            }
            _ => {}
        }
        self.push(TokenKind::Op(op));
        self.advance(op.len());
        Ok(())
    }

    /// Scan a string literal whose prefix is `prefix_len` bytes long
    fn string(&mut self, prefix_len: usize, quote: &str) -> Result<(), SyntaxError> {
        let (line, column) = (self.line, self.column);
        self.advance(prefix_len + quote.len());

        let triple = quote.len() == 3;
        let mut body = String::new();

        loop {
            let rest = self.rest();
            if rest.starts_with(quote) {
                self.advance(quote.len());
                break;
            }
            let Some(c) = rest.chars().next() else {
                let message = if triple {
                    "unterminated triple-quoted string literal"
                } else {
                    "unterminated string literal"
                };
                return Err(SyntaxError::new(line, column, message));
            };
            match c {
                '\\' => {
                    body.push('\\');
                    self.advance(1);
                    match self.rest().chars().next() {
                        Some('\n' | '\r') => {
                            body.push('\n');
                            self.advance_newline();
                        }
                        Some(next) => {
                            body.push(next);
                            self.advance(next.len_utf8());
                        }
                        None => {}
                    }
                }
                '\n' | '\r' if !triple => {
                    return Err(SyntaxError::new(line, column, "unterminated string literal"));
                }
                '\n' | '\r' => {
                    body.push('\n');
                    self.advance_newline();
                }
                _ => {
                    body.push(c);
                    self.advance(c.len_utf8());
                }
            }
        }

        self.push_at(TokenKind::Str(body), line, column);
        Ok(())
    }
}

/// Tokenize a complete source text
pub fn tokenize(src: &str) -> Result<Vec<Token>, SyntaxError> {
    Lexer::new(src).tokenize()
}

// ============================================================================
// Tests
// ============================================================================
