use super::token::{look_up_ident, Location, Token, TokenType};

/// Turns source text into tokens one at a time. A lexer cannot be rewound;
/// build a new one over the same text to start again.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    read_position: usize,
    ch: Option<char>,

    line: usize,
    column: usize,
    finished: bool,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        let mut l = Lexer {
            input: input.chars().collect(),
            position: 0,
            read_position: 0,
            ch: None,
            line: 0,
            column: 0,
            finished: false,
        };
        l.read_char();
        l
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_white_space();

        let location = self.location();
        let ch = match self.ch {
            None => return Token::new(TokenType::Eof, "", location),
            Some(ch) => ch,
        };

        let tok = match ch {
            '=' => if self.peek_char() == Some('=') {
                    self.read_char();
                    Token::new(TokenType::Eq, "==", location)
                } else {
                    new_token(TokenType::Assign, ch, location)
                },
            '+' => new_token(TokenType::Plus, ch, location),
            '-' => new_token(TokenType::Minus, ch, location),
            '*' => new_token(TokenType::Asterisk, ch, location),
            '/' => new_token(TokenType::Slash, ch, location),
            '!' => if self.peek_char() == Some('=') {
                    self.read_char();
                    Token::new(TokenType::NotEq, "!=", location)
                } else {
                    new_token(TokenType::Bang, ch, location)
                },
            '<' => new_token(TokenType::Lt, ch, location),
            '>' => new_token(TokenType::Gt, ch, location),
            ';' => new_token(TokenType::Semicolon, ch, location),
            ':' => new_token(TokenType::Colon, ch, location),
            ',' => new_token(TokenType::Comma, ch, location),
            '{' => new_token(TokenType::LBrace, ch, location),
            '}' => new_token(TokenType::RBrace, ch, location),
            '(' => new_token(TokenType::LParen, ch, location),
            ')' => new_token(TokenType::RParen, ch, location),
            '[' => new_token(TokenType::LBracket, ch, location),
            ']' => new_token(TokenType::RBracket, ch, location),
            '"' => self.read_string(location),
            _ => if is_letter(ch) {
                let literal = self.read_identifier();
                return Token::new(look_up_ident(&literal), literal, location);
            } else if is_digit(ch) {
                return self.read_number(location);
            } else {
                new_token(TokenType::Illegal, ch, location)
            },
        };
        self.read_char();

        tok
    }

    fn location(&self) -> Location {
        Location {
            line: self.line + 1,
            column: self.column,
        }
    }

    fn skip_white_space(&mut self) {
        while matches!(self.ch, Some(' ' | '\t' | '\n' | '\r')) {
            self.read_char();
        }
    }

    fn read_char(&mut self) {
        self.ch = self.input.get(self.read_position).copied();
        self.position = self.read_position;
        self.read_position += 1;

        self.column += 1;
        if self.ch == Some('\n') {
            self.column = 0;
            self.line += 1;
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input.get(self.read_position).copied()
    }

    fn slice(&self, from: usize) -> String {
        self.input[from..self.position].iter().collect()
    }

    fn read_identifier(&mut self) -> String {
        let position = self.position;
        while self.ch.is_some_and(is_letter) {
            self.read_char();
        }
        self.slice(position)
    }

    fn read_digits(&mut self) {
        while self.ch.is_some_and(is_digit) {
            self.read_char();
        }
    }

    fn read_number(&mut self, location: Location) -> Token {
        let position = self.position;
        self.read_digits();

        if self.ch == Some('.') && self.peek_char().is_some_and(is_digit) {
            self.read_char();
            self.read_digits();
            return Token::new(TokenType::Float, self.slice(position), location);
        }
        Token::new(TokenType::Int, self.slice(position), location)
    }

    // Leaves the lexer on the closing quote. Without one, the whole tail of
    // the input comes back as an illegal token.
    fn read_string(&mut self, location: Location) -> Token {
        let position = self.position + 1;
        loop {
            self.read_char();
            match self.ch {
                Some('"') => return Token::new(TokenType::String, self.slice(position), location),
                None => {
                    let literal = format!("\"{}", self.slice(position));
                    return Token::new(TokenType::Illegal, literal, location);
                }
                Some(_) => {}
            }
        }
    }
}

impl Iterator for Lexer {
    type Item = Token;

    /// Yields every token up to and including the final EOF token.
    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let tok = self.next_token();
        if tok.token_type == TokenType::Eof {
            self.finished = true;
        }
        Some(tok)
    }
}

fn is_letter(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

fn new_token(token_type: TokenType, ch: char, location: Location) -> Token {
    Token::new(token_type, ch.to_string(), location)
}
