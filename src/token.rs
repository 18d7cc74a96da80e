use std::fmt;
use std::fmt::Formatter;

#[derive(Debug, Eq, PartialEq, Clone, Copy, Hash)]
pub enum TokenType {
    Illegal,
    Eof,

    Ident,
    Int,
    Float,
    String,

    Assign,
    Plus,
    Minus,
    Bang, // !
    Asterisk,
    Slash,

    Lt,
    Gt,
    Eq,
    NotEq,

    Comma,
    Semicolon,
    Colon,

    LParen, // (
    RParen, // )
    LBrace, // {
    RBrace, // }
    LBracket, // [
    RBracket, // ]

    // keywords
    Function, // fn
    Let, // let
    True, // true
    False, // false
    If, // if
    Else, // else
    Return, // return
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}",
            match &self {
                TokenType::Illegal => "ILLEGAL",
                TokenType::Eof => "EOF",
                TokenType::Ident => "IDENT",
                TokenType::Int => "INT",
                TokenType::Float => "FLOAT",
                TokenType::String => "STRING",
                TokenType::Assign => "ASSIGN",
                TokenType::Plus => "PLUS",
                TokenType::Minus => "MINUS",
                TokenType::Bang => "BANG",
                TokenType::Asterisk => "ASTERISK",
                TokenType::Slash => "SLASH",
                TokenType::Lt => "LT",
                TokenType::Gt => "GT",
                TokenType::Eq => "EQ",
                TokenType::NotEq => "NOT_EQ",
                TokenType::Comma => "COMMA",
                TokenType::Semicolon => "SEMICOLON",
                TokenType::Colon => "COLON",
                TokenType::LParen => "LPAREN",
                TokenType::RParen => "RPAREN",
                TokenType::LBrace => "LBRACE",
                TokenType::RBrace => "RBRACE",
                TokenType::LBracket => "LBRACKET",
                TokenType::RBracket => "RBRACKET",
                TokenType::Function => "FUNCTION",
                TokenType::Let => "LET",
                TokenType::True => "TRUE",
                TokenType::False => "FALSE",
                TokenType::If => "IF",
                TokenType::Else => "ELSE",
                TokenType::Return => "RETURN",
            }
        )
    }
}

/// Position of the first character of a token. Lines start at 1; the column
/// counter starts at 0 and is bumped as each character is read, so the first
/// character on a line sits at column 1.
#[derive(Debug, Default, Eq, PartialEq, Clone, Copy, Hash)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Eq, PartialEq, Clone)]
pub struct Token {
    pub token_type: TokenType,
    pub literal: String,
    pub location: Location,
}

impl Token {
    pub fn new(token_type: TokenType, literal: impl Into<String>, location: Location) -> Self {
        Token {
            token_type,
            literal: literal.into(),
            location,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}: {}}}", self.token_type, self.literal)
    }
}

pub fn look_up_ident(ident: &str) -> TokenType {
    match ident {
        "fn" => TokenType::Function,
        "let" => TokenType::Let,
        "true" => TokenType::True,
        "false" => TokenType::False,
        "if" => TokenType::If,
        "else" => TokenType::Else,
        "return" => TokenType::Return,
        _ => TokenType::Ident,
    }
}
