//! Syntax tree for the Python subset the extractor inspects.
//!
//! Only the shapes that matter for model discovery are represented
//! precisely: class definitions, assignments and call expressions. Every
//! other statement keeps its nested bodies (so classes declared inside
//! blocks are still found) and every other expression collapses to
//! [`Expr::Opaque`].

/// A parsed source file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Module {
    pub body: Vec<Stmt>,
}

/// A statement
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `class Name(bases): ...`
    ClassDef(ClassDef),
    /// `target = value`, including chained `a = b = value`
    Assign(Assign),
    /// A bare expression such as a docstring or a call
    Expr { value: Expr, line: usize },
    /// A block statement (`def`, `if`, `for`, `try`, ...) and its body
    Compound {
        keyword: String,
        name: Option<String>,
        body: Vec<Stmt>,
        line: usize,
    },
    /// Any other simple statement (`pass`, `import`, annotated or augmented
    /// assignment, ...)
    Other { line: usize },
}

impl Stmt {
    /// 1-based line the statement starts on
    pub fn line(&self) -> usize {
        match self {
            Stmt::ClassDef(class) => class.line,
            Stmt::Assign(assign) => assign.line,
            Stmt::Expr { line, .. } | Stmt::Compound { line, .. } | Stmt::Other { line } => *line,
        }
    }

    /// Statements nested directly inside this one
    pub fn children(&self) -> &[Stmt] {
        match self {
            Stmt::ClassDef(class) => &class.body,
            Stmt::Compound { body, .. } => body,
            _ => &[],
        }
    }
}

/// A class definition
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDef {
    pub name: String,
    pub bases: Vec<Expr>,
    pub keywords: Vec<Keyword>,
    pub body: Vec<Stmt>,
    pub line: usize,
}

/// An assignment statement
#[derive(Debug, Clone, PartialEq)]
pub struct Assign {
    pub targets: Vec<Expr>,
    pub value: Expr,
    pub line: usize,
}

/// An expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Name(String),
    Attribute { value: Box<Expr>, attr: String },
    Call(Call),
    Str(String),
    Number(String),
    Bool(bool),
    NoneLit,
    /// Anything the extractor does not need to look into
    Opaque,
}

impl Expr {
    /// Dotted path of a name or attribute chain, e.g. `models.ForeignKey`
    pub fn dotted(&self) -> Option<String> {
        match self {
            Expr::Name(name) => Some(name.clone()),
            Expr::Attribute { value, attr } => value.dotted().map(|base| format!("{}.{}", base, attr)),
            _ => None,
        }
    }

    /// Final segment of a name or attribute chain
    pub fn last_segment(&self) -> Option<&str> {
        match self {
            Expr::Name(name) => Some(name),
            Expr::Attribute { attr, .. } => Some(attr),
            _ => None,
        }
    }

    /// Plain identifier, if this is a bare name
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Expr::Name(name) => Some(name),
            _ => None,
        }
    }

    /// String literal body, if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Expr::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Call expression, if this is one
    pub fn as_call(&self) -> Option<&Call> {
        match self {
            Expr::Call(call) => Some(call),
            _ => None,
        }
    }
}

/// A call expression
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub func: Box<Expr>,
    pub args: Vec<Expr>,
    pub keywords: Vec<Keyword>,
}

impl Call {
    /// Value of the named keyword argument (last occurrence wins)
    pub fn keyword(&self, name: &str) -> Option<&Expr> {
        self.keywords
            .iter()
            .rev()
            .find(|k| k.arg.as_deref() == Some(name))
            .map(|k| &k.value)
    }
}

/// A keyword argument; `arg` is `None` for `**mapping`
#[derive(Debug, Clone, PartialEq)]
pub struct Keyword {
    pub arg: Option<String>,
    pub value: Expr,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attr(value: Expr, attr: &str) -> Expr {
        Expr::Attribute {
            value: Box::new(value),
            attr: attr.to_string(),
        }
    }

    #[test]
    fn test_dotted_and_last_segment() {
        let expr = attr(attr(Expr::Name("django".into()), "db"), "Model");
        assert_eq!(expr.dotted().as_deref(), Some("django.db.Model"));
        assert_eq!(expr.last_segment(), Some("Model"));
        assert_eq!(Expr::Opaque.dotted(), None);
        assert_eq!(Expr::Str("x".into()).last_segment(), None);
    }

    #[test]
    fn test_keyword_last_wins() {
        let call = Call {
            func: Box::new(Expr::Name("f".into())),
            args: vec![],
            keywords: vec![
                Keyword {
                    arg: Some("null".into()),
                    value: Expr::Bool(false),
                },
                Keyword {
                    arg: None,
                    value: Expr::Opaque,
                },
                Keyword {
                    arg: Some("null".into()),
                    value: Expr::Bool(true),
                },
            ],
        };
        assert_eq!(call.keyword("null"), Some(&Expr::Bool(true)));
        assert_eq!(call.keyword("unique"), None);
    }
}
