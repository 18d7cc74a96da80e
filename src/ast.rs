//! Syntax tree produced by the parser.
//!
//! Every node keeps the token it started with, so its literal text and its
//! location are fixed when the node is built. `Display` renders a fully
//! parenthesised source form that parses back to the same tree.

use std::fmt;
use std::fmt::Formatter;
use crate::token::{Location, Token};

#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Program(&'a Program),
    Statement(&'a Statement),
    Expression(&'a Expression),
}

impl Node<'_> {
    pub fn token_literal(&self) -> &str {
        match self {
            Node::Program(program) => program.token_literal(),
            Node::Statement(stmt) => stmt.token_literal(),
            Node::Expression(exp) => exp.token_literal(),
        }
    }

    pub fn location(&self) -> Location {
        match self {
            Node::Program(program) => program.location(),
            Node::Statement(stmt) => stmt.location(),
            Node::Expression(exp) => exp.location(),
        }
    }
}

impl fmt::Display for Node<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Node::Program(program) => write!(f, "{}", program),
            Node::Statement(stmt) => write!(f, "{}", stmt),
            Node::Expression(exp) => write!(f, "{}", exp),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn token_literal(&self) -> &str {
        self.statements.first().map_or("", |stmt| stmt.token_literal())
    }

    pub fn location(&self) -> Location {
        self.statements.first().map_or(Location { line: 1, column: 1 }, |stmt| stmt.location())
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let stmts: Vec<_> = self.statements.iter().map(|stmt| stmt.to_string()).collect();
        write!(f, "{}", stmts.join(" "))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub token: Token,
    pub value: String,
}

impl Identifier {
    pub fn new(token: Token) -> Self {
        let value = token.literal.clone();
        Identifier { token, value }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Brace-delimited statements; the body of functions and if/else branches.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockStatement {
    pub token: Token,
    pub statements: Vec<Statement>,
}

impl fmt::Display for BlockStatement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.statements.is_empty() {
            return write!(f, "{{ }}");
        }
        let stmts: Vec<_> = self.statements.iter().map(|stmt| stmt.to_string()).collect();
        write!(f, "{{ {} }}", stmts.join(" "))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Let {
        token: Token,
        name: Identifier,
        value: Expression,
    },
    Return {
        token: Token,
        value: Option<Expression>,
    },
    Expression {
        token: Token,
        expression: Expression,
    },
}

impl Statement {
    pub fn token(&self) -> &Token {
        match self {
            Statement::Let { token, .. }
            | Statement::Return { token, .. }
            | Statement::Expression { token, .. } => token,
        }
    }

    pub fn token_literal(&self) -> &str {
        &self.token().literal
    }

    pub fn location(&self) -> Location {
        self.token().location
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Let { name, value, .. } => write!(f, "let {} = {};", name, value),
            Statement::Return { value: Some(value), .. } => write!(f, "return {};", value),
            Statement::Return { value: None, .. } => write!(f, "return;"),
            Statement::Expression { expression, .. } => write!(f, "{};", expression),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(Identifier),
    Boolean {
        token: Token,
        value: bool,
    },
    Integer {
        token: Token,
        value: i64,
    },
    Float {
        token: Token,
        value: f64,
    },
    String {
        token: Token,
        value: String,
    },
    Array {
        token: Token,
        elements: Vec<Expression>,
    },
    // Pairs stay in source order; duplicate keys are resolved when evaluated.
    Hash {
        token: Token,
        pairs: Vec<(Expression, Expression)>,
    },
    Prefix {
        token: Token,
        operator: String,
        right: Box<Expression>,
    },
    Infix {
        token: Token,
        operator: String,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    If {
        token: Token,
        condition: Box<Expression>,
        consequence: BlockStatement,
        alternative: Option<BlockStatement>,
    },
    Function {
        token: Token,
        parameters: Vec<Identifier>,
        body: BlockStatement,
    },
    Call {
        token: Token,
        function: Box<Expression>,
        arguments: Vec<Expression>,
    },
    Index {
        token: Token,
        left: Box<Expression>,
        index: Box<Expression>,
    },
}

impl Expression {
    pub fn token(&self) -> &Token {
        match self {
            Expression::Identifier(ident) => &ident.token,
            Expression::Boolean { token, .. }
            | Expression::Integer { token, .. }
            | Expression::Float { token, .. }
            | Expression::String { token, .. }
            | Expression::Array { token, .. }
            | Expression::Hash { token, .. }
            | Expression::Prefix { token, .. }
            | Expression::Infix { token, .. }
            | Expression::If { token, .. }
            | Expression::Function { token, .. }
            | Expression::Call { token, .. }
            | Expression::Index { token, .. } => token,
        }
    }

    pub fn token_literal(&self) -> &str {
        &self.token().literal
    }

    pub fn location(&self) -> Location {
        self.token().location
    }
}

fn join<T: fmt::Display>(items: &[T]) -> String {
    items.iter().map(|item| item.to_string()).collect::<Vec<_>>().join(", ")
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Identifier(ident) => write!(f, "{}", ident),
            Expression::Boolean { value, .. } => write!(f, "{}", value),
            Expression::Integer { token, .. } | Expression::Float { token, .. } => {
                write!(f, "{}", token.literal)
            }
            Expression::String { value, .. } => write!(f, "\"{}\"", value),
            Expression::Array { elements, .. } => write!(f, "[{}]", join(elements)),
            Expression::Hash { pairs, .. } => {
                write!(f, "{{{}}}", pairs.iter()
                    .map(|(key, value)| format!("{}: {}", key, value))
                    .collect::<Vec<_>>().join(", "))
            }
            Expression::Prefix { operator, right, .. } => write!(f, "({}{})", operator, right),
            Expression::Infix { operator, left, right, .. } => {
                write!(f, "({} {} {})", left, operator, right)
            }
            Expression::If { condition, consequence, alternative, .. } => {
                write!(f, "if ({}) {}", condition, consequence)?;
                if let Some(alt) = alternative {
                    write!(f, " else {}", alt)?;
                }
                Ok(())
            }
            Expression::Function { parameters, body, .. } => {
                write!(f, "fn({}) {}", join(parameters), body)
            }
            Expression::Call { function, arguments, .. } => {
                write!(f, "{}({})", function, join(arguments))
            }
            Expression::Index { left, index, .. } => write!(f, "({}[{}])", left, index),
        }
    }
}
