//! Recursive-descent parser over the token stream.
//!
//! Statement structure (blocks, colons, indentation) is checked strictly so
//! that files Python itself would reject are reported as syntax errors.
//! Expressions are parsed only as far as names, attributes, calls and
//! literals; anything richer becomes [`Expr::Opaque`]. Operators between
//! operands are still checked, so `a b` or a trailing `1 +` is an error.
//! Bracket contents other than call arguments are not inspected.

use super::SyntaxError;
use super::ast::{Assign, Call, ClassDef, Expr, Keyword, Module, Stmt};
use super::lexer::{Token, TokenKind};

/// Keywords that introduce a block statement
const BLOCK_KEYWORDS: &[&str] = &[
    "if", "elif", "else", "while", "for", "try", "except", "finally", "with", "def", "async",
];

/// Soft keywords that only introduce a block when the line ends with `:`
const SOFT_BLOCK_KEYWORDS: &[&str] = &["match", "case"];

/// Keywords that begin a simple statement that is never an assignment
const SIMPLE_KEYWORDS: &[&str] = &[
    "pass", "return", "import", "from", "raise", "del", "global", "nonlocal", "assert", "break",
    "continue",
];

/// Operators accepted between two operands
const BINARY_OPERATORS: &[&str] = &[
    "+", "-", "*", "/", "//", "%", "**", "@", "&", "|", "^", "<<", ">>", "<", ">", "==", "!=",
    "<=", ">=", ":=", ",",
];

/// Keywords accepted between two operands (`not in` and `async for` are
/// recognised as pairs)
const KEYWORD_OPERATORS: &[&str] = &["and", "or", "in", "is", "if", "else", "for"];

/// Parser state over one token stream
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// Create a parser. The stream must end with `EndMarker`.
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Parse the whole stream as a module
    pub fn parse_module(mut self) -> Result<Module, SyntaxError> {
        let body = self.statements(false)?;
        Ok(Module { body })
    }

    fn peek(&self) -> &Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.pos.min(last)]
    }

    fn bump(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn error_at(token: &Token, message: impl Into<String>) -> SyntaxError {
        SyntaxError::new(token.line, token.column, message)
    }

    /// Index of the `Newline` ending the logical line that starts at `pos`
    fn line_end(&self) -> usize {
        self.tokens[self.pos..]
            .iter()
            .position(|t| matches!(t.kind, TokenKind::Newline | TokenKind::EndMarker))
            .map(|offset| self.pos + offset)
            .unwrap_or(self.tokens.len())
    }

    // ========================================================================
    // Statements
    // ========================================================================

    /// Parse statements until the end of the current block
    fn statements(&mut self, in_block: bool) -> Result<Vec<Stmt>, SyntaxError> {
        let mut body = Vec::new();

        loop {
            let token = self.peek().clone();
            match &token.kind {
                TokenKind::EndMarker => break,
                TokenKind::Dedent if in_block => {
                    self.bump();
                    break;
                }
                TokenKind::Dedent => return Err(Self::error_at(&token, "unexpected unindent")),
                TokenKind::Indent => return Err(Self::error_at(&token, "unexpected indent")),
                TokenKind::Newline => {
                    self.bump();
                }
                TokenKind::Op("@") => {
                    // Decorators carry nothing the extractor uses
                    self.pos = self.line_end();
                    self.bump();
                }
                TokenKind::Name(name) if name == "class" => {
                    body.push(self.class_def()?);
                }
                TokenKind::Name(name) if self.starts_block(name) => {
                    body.push(self.compound()?);
                }
                _ => body.extend(self.simple_line()?),
            }
        }

        Ok(body)
    }

    fn starts_block(&self, name: &str) -> bool {
        if BLOCK_KEYWORDS.contains(&name) {
            return true;
        }
        if SOFT_BLOCK_KEYWORDS.contains(&name) {
            let end = self.line_end();
            return end > self.pos + 1 && self.tokens[end - 1].is_op(":");
        }
        false
    }

    /// `class Name[(bases)]: suite`
    fn class_def(&mut self) -> Result<Stmt, SyntaxError> {
        let keyword = self.bump();
        let name_token = self.bump();
        let Some(name) = name_token.name().map(str::to_string) else {
            return Err(Self::error_at(&name_token, "invalid syntax"));
        };

        let (mut bases, mut keywords) = (Vec::new(), Vec::new());
        if self.peek().is_op("(") {
            let open = self.pos;
            let close = self.matching_close(open);
            let call = Self::call_args(&self.tokens[open + 1..close], &self.tokens[open])?;
            bases = call.0;
            keywords = call.1;
            self.pos = close + 1;
        }

        let colon = self.bump();
        if !colon.is_op(":") {
            return Err(Self::error_at(&colon, "expected ':'"));
        }

        let body = self.suite()?;
        Ok(Stmt::ClassDef(ClassDef {
            name,
            bases,
            keywords,
            body,
            line: keyword.line,
        }))
    }

    /// Any other block statement: header up to the first top-level `:`
    fn compound(&mut self) -> Result<Stmt, SyntaxError> {
        let keyword = self.bump();
        let keyword_name = keyword.name().unwrap_or_default().to_string();
        let end = self.line_end();

        let mut depth = 0usize;
        let mut lambdas = 0usize;
        let mut colon = None;
        for i in self.pos..end {
            let token = &self.tokens[i];
            if token.opens() {
                depth += 1;
            } else if token.closes() {
                depth = depth.saturating_sub(1);
            } else if depth == 0 && token.is_name("lambda") {
                lambdas += 1;
            } else if depth == 0 && token.is_op(":") {
                if lambdas > 0 {
                    lambdas -= 1;
                } else {
                    colon = Some(i);
                    break;
                }
            }
        }

        let Some(colon) = colon else {
            let at = &self.tokens[end.min(self.tokens.len() - 1)];
            return Err(Self::error_at(at, "expected ':'"));
        };

        // `self.pos` is just past the keyword
        let header = &self.tokens[self.pos..colon];
        let name = match keyword_name.as_str() {
            "def" => header.first(),
            "async" => header.iter().skip_while(|t| !t.is_name("def")).nth(1),
            _ => None,
        }
        .and_then(Token::name)
        .map(str::to_string);

        self.pos = colon + 1;
        let body = self.suite()?;
        Ok(Stmt::Compound {
            keyword: keyword_name,
            name,
            body,
            line: keyword.line,
        })
    }

    /// Block body after a header colon: an indented block or inline
    /// statements on the same line
    fn suite(&mut self) -> Result<Vec<Stmt>, SyntaxError> {
        if matches!(self.peek().kind, TokenKind::Newline) {
            self.bump();
            let indent = self.bump();
            if !matches!(indent.kind, TokenKind::Indent) {
                return Err(Self::error_at(&indent, "expected an indented block"));
            }
            return self.statements(true);
        }

        if matches!(self.peek().kind, TokenKind::EndMarker) {
            let token = self.peek().clone();
            return Err(Self::error_at(&token, "expected an indented block"));
        }

        self.simple_line()
    }

    /// One logical line of `;`-separated simple statements
    fn simple_line(&mut self) -> Result<Vec<Stmt>, SyntaxError> {
        let end = self.line_end();
        let line: Vec<Token> = self.tokens[self.pos..end].to_vec();
        self.pos = end;
        self.bump();

        let segments = split_top_level(&line, ";");
        let count = segments.len();
        let mut stmts = Vec::with_capacity(count);

        for (i, segment) in segments.into_iter().enumerate() {
            if segment.is_empty() {
                // `a = 1;` is fine, `a = 1;; b = 2` is not
                if i + 1 == count && count > 1 {
                    continue;
                }
                let at = line.first().unwrap_or_else(|| self.peek());
                return Err(Self::error_at(at, "invalid syntax"));
            }
            stmts.push(Self::simple_statement(segment)?);
        }

        Ok(stmts)
    }

    fn simple_statement(tokens: &[Token]) -> Result<Stmt, SyntaxError> {
        let first = &tokens[0];
        let line = first.line;

        if first
            .name()
            .is_some_and(|name| SIMPLE_KEYWORDS.contains(&name))
        {
            return Ok(Stmt::Other { line });
        }

        // `type Alias = ...`
        if first.is_name("type") && tokens.get(1).and_then(Token::name).is_some() {
            return Ok(Stmt::Other { line });
        }

        let parts = split_assignment(tokens);
        if parts.len() > 1 {
            let mut exprs = Vec::with_capacity(parts.len());
            for part in &parts {
                exprs.push(Self::expression(part, first)?);
            }
            let value = exprs.pop().unwrap_or(Expr::Opaque);
            return Ok(Stmt::Assign(Assign {
                targets: exprs,
                value,
                line,
            }));
        }

        let annotated = top_level(tokens).any(|t| t.is_op(":"));
        let augmented = top_level(tokens).any(|t| {
            matches!(t.kind, TokenKind::Op(op) if op.len() >= 2 && op.ends_with('=') && !matches!(op, "==" | "!=" | "<=" | ">="))
        });
        if annotated || augmented {
            return Ok(Stmt::Other { line });
        }

        Ok(Stmt::Expr {
            value: Self::expression(tokens, first)?,
            line,
        })
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    /// Parse a complete expression. `anchor` locates errors for empty input.
    ///
    /// A lone operand keeps its shape; operands joined by operators become
    /// [`Expr::Opaque`].
    fn expression(tokens: &[Token], anchor: &Token) -> Result<Expr, SyntaxError> {
        let (first, mut i) = Self::operand(tokens, anchor)?;
        if i == tokens.len() {
            return Ok(first);
        }

        while i < tokens.len() {
            let op = &tokens[i];
            let width = binary_operator(&tokens[i..]).ok_or_else(|| Self::error_at(op, "invalid syntax"))?;
            i += width;
            if i == tokens.len() {
                // `x = 1,` is a one-element tuple
                if op.is_op(",") {
                    break;
                }
                return Err(Self::error_at(op, "invalid syntax"));
            }
            let (_, used) = Self::operand(&tokens[i..], op)?;
            i += used;
        }

        Ok(Expr::Opaque)
    }

    /// One operand with any prefix operators; returns how many tokens were used
    fn operand(tokens: &[Token], anchor: &Token) -> Result<(Expr, usize), SyntaxError> {
        let Some(token) = tokens.first() else {
            return Err(Self::error_at(anchor, "invalid syntax"));
        };

        let prefix = match &token.kind {
            TokenKind::Op("-" | "+" | "~" | "*" | "**") => true,
            TokenKind::Name(name) => matches!(name.as_str(), "not" | "await"),
            _ => false,
        };
        if prefix {
            let (_, used) = Self::operand(&tokens[1..], token)?;
            return Ok((Expr::Opaque, used + 1));
        }

        // Everything after these belongs to them
        if token.is_name("lambda") || token.is_name("yield") {
            return Ok((Expr::Opaque, tokens.len()));
        }

        Self::postfix(tokens)
    }

    /// Primary expression plus trailers; returns how many tokens were used
    fn postfix(tokens: &[Token]) -> Result<(Expr, usize), SyntaxError> {
        let (mut expr, mut i) = Self::primary(tokens)?;

        while i < tokens.len() {
            let token = &tokens[i];
            if token.is_op(".") {
                match tokens.get(i + 1).and_then(Token::name) {
                    Some(attr) => {
                        expr = Expr::Attribute {
                            value: Box::new(expr),
                            attr: attr.to_string(),
                        };
                        i += 2;
                    }
                    None => return Err(Self::error_at(token, "invalid syntax")),
                }
            } else if token.is_op("(") {
                let close = matching_close(tokens, i);
                let (args, keywords) = Self::call_args(&tokens[i + 1..close], token)?;
                expr = Expr::Call(Call {
                    func: Box::new(expr),
                    args,
                    keywords,
                });
                i = close + 1;
            } else if token.is_op("[") {
                expr = Expr::Opaque;
                i = matching_close(tokens, i) + 1;
            } else {
                break;
            }
        }

        Ok((expr, i))
    }

    fn primary(tokens: &[Token]) -> Result<(Expr, usize), SyntaxError> {
        let token = &tokens[0];
        match &token.kind {
            TokenKind::Name(name) => {
                let expr = match name.as_str() {
                    "True" => Expr::Bool(true),
                    "False" => Expr::Bool(false),
                    "None" => Expr::NoneLit,
                    n if KEYWORD_OPERATORS.contains(&n) => {
                        return Err(Self::error_at(token, "invalid syntax"));
                    }
                    _ => Expr::Name(name.clone()),
                };
                Ok((expr, 1))
            }
            TokenKind::Number(n) => Ok((Expr::Number(n.clone()), 1)),
            TokenKind::Str(_) => {
                // Adjacent literals concatenate
                let mut body = String::new();
                let mut i = 0;
                while let Some(TokenKind::Str(s)) = tokens.get(i).map(|t| &t.kind) {
                    body.push_str(s);
                    i += 1;
                }
                Ok((Expr::Str(body), i))
            }
            TokenKind::Op("(") => {
                let close = matching_close(tokens, 0);
                let inner = &tokens[1..close];
                let expr = if inner.is_empty() {
                    Expr::Opaque
                } else {
                    Self::expression(inner, token)?
                };
                Ok((expr, close + 1))
            }
            TokenKind::Op("[") | TokenKind::Op("{") => Ok((Expr::Opaque, matching_close(tokens, 0) + 1)),
            TokenKind::Op("...") => Ok((Expr::Opaque, 1)),
            _ => Err(Self::error_at(token, "invalid syntax")),
        }
    }

    /// Split the inside of a call's parentheses into positional and keyword
    /// arguments
    fn call_args(tokens: &[Token], open: &Token) -> Result<(Vec<Expr>, Vec<Keyword>), SyntaxError> {
        let mut args = Vec::new();
        let mut keywords = Vec::new();
        if tokens.is_empty() {
            return Ok((args, keywords));
        }

        let segments = split_top_level(tokens, ",");
        let count = segments.len();
        for (i, segment) in segments.into_iter().enumerate() {
            if segment.is_empty() {
                if i + 1 == count && count > 1 {
                    continue;
                }
                return Err(Self::error_at(open, "invalid syntax"));
            }

            let is_keyword = segment.len() > 1 && segment[0].name().is_some() && segment[1].is_op("=");
            if is_keyword {
                keywords.push(Keyword {
                    arg: segment[0].name().map(str::to_string),
                    value: Self::expression(&segment[2..], &segment[1])?,
                });
            } else if segment[0].is_op("**") {
                keywords.push(Keyword {
                    arg: None,
                    value: Self::expression(&segment[1..], &segment[0])?,
                });
            } else if segment[0].is_op("*") {
                args.push(Expr::Opaque);
            } else {
                args.push(Self::expression(segment, open)?);
            }
        }

        Ok((args, keywords))
    }

    fn matching_close(&self, open: usize) -> usize {
        matching_close(&self.tokens, open)
    }
}

// ============================================================================
// Token slice helpers
// ============================================================================

/// Index of the bracket closing the one at `open`. The lexer guarantees
/// balance within a logical line; a missing close maps to the slice end.
fn matching_close(tokens: &[Token], open: usize) -> usize {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(open) {
        if token.opens() {
            depth += 1;
        } else if token.closes() {
            depth -= 1;
            if depth == 0 {
                return i;
            }
        }
    }
    tokens.len().saturating_sub(1)
}

/// Width of the operator starting `tokens`, if it is one
fn binary_operator(tokens: &[Token]) -> Option<usize> {
    let token = tokens.first()?;
    let next_is = |name: &str| tokens.get(1).is_some_and(|t| t.is_name(name));
    match &token.kind {
        TokenKind::Op(op) if BINARY_OPERATORS.contains(op) => Some(1),
        TokenKind::Name(name) => match name.as_str() {
            "not" if next_is("in") => Some(2),
            "async" if next_is("for") => Some(2),
            n if KEYWORD_OPERATORS.contains(&n) => Some(1),
            _ => None,
        },
        _ => None,
    }
}

/// Tokens at bracket depth zero
fn top_level(tokens: &[Token]) -> impl Iterator<Item = &Token> {
    let mut depth = 0usize;
    tokens.iter().filter(move |token| {
        if token.opens() {
            depth += 1;
            false
        } else if token.closes() {
            depth = depth.saturating_sub(1);
            false
        } else {
            depth == 0
        }
    })
}

/// Split on a separator operator at bracket depth zero
fn split_top_level<'t>(tokens: &'t [Token], separator: &str) -> Vec<&'t [Token]> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, token) in tokens.iter().enumerate() {
        if token.opens() {
            depth += 1;
        } else if token.closes() {
            depth = depth.saturating_sub(1);
        } else if depth == 0 && token.is_op(separator) {
            parts.push(&tokens[start..i]);
            start = i + 1;
        }
    }
    parts.push(&tokens[start..]);
    parts
}

/// Split `a = b = value` into its parts. A top-level `lambda` ends the
/// search so its default arguments are not mistaken for assignments.
fn split_assignment(tokens: &[Token]) -> Vec<&[Token]> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, token) in tokens.iter().enumerate() {
        if token.opens() {
            depth += 1;
        } else if token.closes() {
            depth = depth.saturating_sub(1);
        } else if depth == 0 && token.is_name("lambda") {
            break;
        } else if depth == 0 && token.is_op(":") && parts.is_empty() {
            // Annotated assignment
            return vec![tokens];
        } else if depth == 0 && token.is_op("=") {
            parts.push(&tokens[start..i]);
            start = i + 1;
        }
    }
    parts.push(&tokens[start..]);
    parts
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::super::parse_module;
    use super::*;

    fn parse(src: &str) -> Module {
        parse_module(src).unwrap()
    }

    fn parse_err(src: &str) -> SyntaxError {
        parse_module(src).unwrap_err()
    }

    fn name(n: &str) -> Expr {
        Expr::Name(n.to_string())
    }

    #[test]
    fn test_class_with_fields() {
        let module = parse(
            "from django.db import models\n\n\
             class Book(models.Model):\n    \
                 \"\"\"A book.\"\"\"\n    \
                 title = models.CharField(max_length=200, null=True)\n    \
                 author = models.ForeignKey(Author, on_delete=models.CASCADE)\n\n    \
                 def __str__(self):\n        \
                     return self.title\n",
        );

        assert_eq!(module.body.len(), 2);
        let Stmt::ClassDef(class) = &module.body[1] else {
            panic!("expected class");
        };
        assert_eq!(class.name, "Book");
        assert_eq!(class.line, 3);
        assert_eq!(class.bases[0].dotted().as_deref(), Some("models.Model"));
        assert_eq!(class.body.len(), 4);

        assert!(matches!(class.body[0], Stmt::Expr { value: Expr::Str(_), .. }));

        let Stmt::Assign(assign) = &class.body[1] else {
            panic!("expected assignment");
        };
        assert_eq!(assign.targets, vec![name("title")]);
        assert_eq!(assign.line, 5);
        let call = assign.value.as_call().unwrap();
        assert_eq!(call.func.last_segment(), Some("CharField"));
        assert_eq!(call.keyword("null"), Some(&Expr::Bool(true)));
        assert_eq!(call.keyword("max_length"), Some(&Expr::Number("200".into())));

        let Stmt::Assign(assign) = &class.body[2] else {
            panic!("expected assignment");
        };
        let call = assign.value.as_call().unwrap();
        assert_eq!(call.args, vec![name("Author")]);
        assert_eq!(
            call.keyword("on_delete").and_then(Expr::dotted).as_deref(),
            Some("models.CASCADE")
        );

        assert!(matches!(
            &class.body[3],
            Stmt::Compound { keyword, name: Some(n), .. } if keyword == "def" && n == "__str__"
        ));
    }

    #[test]
    fn test_class_without_bases() {
        let module = parse("class Meta:\n    ordering = ['name']\n");
        let Stmt::ClassDef(class) = &module.body[0] else {
            panic!("expected class");
        };
        assert!(class.bases.is_empty());
        assert!(matches!(&class.body[0], Stmt::Assign(a) if a.value == Expr::Opaque));
    }

    #[test]
    fn test_inline_suite_and_semicolons() {
        let module = parse("class Tag(Model): name = CharField(); slug = SlugField();\n");
        let Stmt::ClassDef(class) = &module.body[0] else {
            panic!("expected class");
        };
        assert_eq!(class.body.len(), 2);
    }

    #[test]
    fn test_chained_and_other_assignments() {
        let module = parse("a = b = f()\nx: int = 1\ny += 2\nz == 3\n(p, q) = 1, 2\n");
        let Stmt::Assign(assign) = &module.body[0] else {
            panic!("expected assignment");
        };
        assert_eq!(assign.targets, vec![name("a"), name("b")]);
        assert!(matches!(module.body[1], Stmt::Other { .. }));
        assert!(matches!(module.body[2], Stmt::Other { .. }));
        assert!(matches!(module.body[3], Stmt::Expr { value: Expr::Opaque, .. }));
        assert!(matches!(&module.body[4], Stmt::Assign(a) if a.targets == vec![Expr::Opaque]));
    }

    #[test]
    fn test_lambda_defaults_are_not_assignments() {
        let module = parse("f = lambda x=1: x\n");
        let Stmt::Assign(assign) = &module.body[0] else {
            panic!("expected assignment");
        };
        assert_eq!(assign.targets, vec![name("f")]);
        assert_eq!(assign.value, Expr::Opaque);
    }

    #[test]
    fn test_call_arguments() {
        let module = parse("x = f(\"Author\", *rest, to=Tag, **extra,)\n");
        let Stmt::Assign(assign) = &module.body[0] else {
            panic!("expected assignment");
        };
        let call = assign.value.as_call().unwrap();
        assert_eq!(call.args, vec![Expr::Str("Author".into()), Expr::Opaque]);
        assert_eq!(call.keywords.len(), 2);
        assert_eq!(call.keyword("to"), Some(&name("Tag")));
        assert_eq!(call.keywords[1].arg, None);
    }

    #[test]
    fn test_blocks_and_decorators() {
        let module = parse(
            "@decorator(1)\n\
             class A(Model):\n    \
                 if DEBUG:\n        \
                     x = 1\n    \
                 else:\n        \
                     x = 2\n    \
                 for i in range(3): pass\n    \
                 d = {'a': 1}[key]\n",
        );
        let Stmt::ClassDef(class) = &module.body[0] else {
            panic!("expected class");
        };
        assert_eq!(class.line, 2);
        assert_eq!(class.body.len(), 4);
        assert_eq!(class.body[0].children().len(), 1);
        assert!(matches!(&class.body[3], Stmt::Assign(a) if a.value == Expr::Opaque));
    }

    #[test]
    fn test_soft_keywords() {
        let module = parse("match = 1\nmatch command:\n    case 'go':\n        pass\n");
        assert!(matches!(module.body[0], Stmt::Assign(_)));
        assert!(matches!(&module.body[1], Stmt::Compound { keyword, .. } if keyword == "match"));
    }

    #[test]
    fn test_missing_colon() {
        let err = parse_err("class Book(Model)\n    title = CharField()\n");
        assert_eq!(err.line, 1);
        assert_eq!(err.message, "expected ':'");

        let err = parse_err("def f()\n    pass\n");
        assert_eq!(err.message, "expected ':'");
    }

    #[test]
    fn test_missing_block() {
        let err = parse_err("class Book(Model):\nx = 1\n");
        assert_eq!(err.line, 2);
        assert_eq!(err.message, "expected an indented block");

        let err = parse_err("class Book(Model):\n");
        assert_eq!(err.message, "expected an indented block");
    }

    #[test]
    fn test_unexpected_indent() {
        let err = parse_err("x = 1\n    y = 2\n");
        assert_eq!(err.line, 2);
        assert_eq!(err.message, "unexpected indent");
    }

    #[test]
    fn test_invalid_syntax() {
        assert_eq!(parse_err("x = \n").message, "invalid syntax");
        assert_eq!(parse_err("x = f(a,,b)\n").message, "invalid syntax");
        assert_eq!(parse_err("class (Model):\n    pass\n").message, "invalid syntax");
        assert_eq!(parse_err("x = a.\n").message, "invalid syntax");
    }

    #[test]
    fn test_def_names() {
        let module = parse("def plain(x):\n    pass\nasync def fetch():\n    pass\nif x:\n    pass\n");
        let names: Vec<Option<&str>> = module
            .body
            .iter()
            .map(|stmt| match stmt {
                Stmt::Compound { name, .. } => name.as_deref(),
                _ => panic!("expected compound statement"),
            })
            .collect();
        assert_eq!(names, vec![Some("plain"), Some("fetch"), None]);
    }

    #[test]
    fn test_operator_expressions() {
        let module = parse(
            "a = -1 if x is not None else +2\n\
             b = x not in y and not z\n\
             c = (n := 3) ** 2, 4,\n\
             d = sum(i for i in xs if i)\n\
             *e, f = g\n\
             h = yield from gen()\n\
             k = await fetch() @ m\n\
             type Alias = int\n\
             ...\n",
        );
        assert_eq!(module.body.len(), 9);
        for stmt in &module.body[..7] {
            assert!(matches!(stmt, Stmt::Assign(_)), "{:?}", stmt);
        }
        assert!(matches!(&module.body[0], Stmt::Assign(a) if a.value == Expr::Opaque));
        assert!(matches!(&module.body[3], Stmt::Assign(a) if a.value.as_call().is_some()));
        assert!(matches!(module.body[7], Stmt::Other { .. }));
        assert!(matches!(module.body[8], Stmt::Expr { value: Expr::Opaque, .. }));
    }

    #[test]
    fn test_adjacent_operands_are_rejected() {
        let err = parse_err("class A(Model):\n    title = CharField() junk\n");
        assert_eq!((err.line, err.column), (2, 25));
        assert_eq!(err.message, "invalid syntax");

        assert_eq!(parse_err("x = a b\n").message, "invalid syntax");
        assert_eq!(parse_err("x = 'a' 1\n").message, "invalid syntax");
        assert_eq!(parse_err("f(a b)\n").message, "invalid syntax");
        assert_eq!(parse_err("x = (a b)\n").message, "invalid syntax");
    }

    #[test]
    fn test_dangling_operator_is_rejected() {
        let err = parse_err("n = 1 +\n");
        assert_eq!((err.line, err.column), (1, 7));
        assert_eq!(parse_err("n = a and\n").message, "invalid syntax");
        assert_eq!(parse_err("n = not\n").message, "invalid syntax");
        assert_eq!(parse_err("n = a if\n").message, "invalid syntax");
        assert_eq!(parse_err("n = a == == b\n").message, "invalid syntax");
    }

    #[test]
    fn test_empty_module() {
        assert!(parse("").body.is_empty());
        assert!(parse("# only a comment\n\n").body.is_empty());
    }
}
