use tracing::debug;
use crate::ast::{BlockStatement, Expression, Identifier, Program, Statement};
use crate::lexer::Lexer;
use crate::stack::ensure_sufficient_stack;
use crate::token::{Token, TokenType};

#[derive(Debug, Ord, PartialOrd, Eq, PartialEq, Copy, Clone)]
enum Precedence {
    Lowest,
    Equals, // ==
    LessGreater, // > <
    Sum, // +, -
    Product, // *, /
    Prefix, // -X, !X
    Call,
    Index
}

fn get_precedence(token: TokenType) -> Option<Precedence> {
    match token {
        TokenType::Eq | TokenType::NotEq => Some(Precedence::Equals),
        TokenType::Lt | TokenType::Gt => Some(Precedence::LessGreater),
        TokenType::Plus | TokenType::Minus => Some(Precedence::Sum),
        TokenType::Asterisk | TokenType::Slash => Some(Precedence::Product),
        TokenType::LParen => Some(Precedence::Call),
        TokenType::LBracket => Some(Precedence::Index),
        _ => None
    }
}

/// Pratt parser over a [`Lexer`].
///
/// Parsing never stops at the first problem: each malformed statement adds a
/// diagnostic to [`Parser::errors`] and the parser skips ahead to the next
/// statement. A program that comes with diagnostics must not be evaluated.
pub struct Parser {
    l: Lexer,
    errors: Vec<String>,

    cur_token: Token,
    peek_token: Token,

    // number of blocks currently open
    depth: usize,
}

impl Parser {

    pub fn new(mut l: Lexer) -> Self {
        let cur_token = l.next_token();
        let peek_token = l.next_token();
        Parser {
            l,
            errors: Vec::new(),
            cur_token,
            peek_token,
            depth: 0,
        }
    }

    fn next_token(&mut self) {
        let next = self.l.next_token();
        self.cur_token = std::mem::replace(&mut self.peek_token, next);
    }

    fn cur_token_is(&self, t: TokenType) -> bool {
        self.cur_token.token_type == t
    }

    fn peek_token_is(&self, t: TokenType) -> bool {
        self.peek_token.token_type == t
    }

    fn expect_peek(&mut self, t: TokenType) -> bool {
        if self.peek_token_is(t) {
            self.next_token();
            true
        } else {
            self.peek_error(t);
            false
        }
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }

    fn unexpected_token_error(&mut self, expected: TokenType, got: Token) {
        self.errors.push(format!("{}: expected next token to be {}, got {} (\"{}\") instead",
            got.location, expected, got.token_type, got.literal))
    }

    fn peek_error(&mut self, t: TokenType) {
        self.unexpected_token_error(t, self.peek_token.clone())
    }

    fn no_prefix_fn_error(&mut self) {
        let tok = &self.cur_token;
        let msg = if tok.token_type == TokenType::Illegal {
            format!("{}: illegal token (\"{}\")", tok.location, tok.literal)
        } else {
            format!("{}: no prefix parse function for {} (\"{}\") found",
                tok.location, tok.token_type, tok.literal)
        };
        self.errors.push(msg)
    }

    pub fn parse_program(&mut self) -> Program {
        let mut p = Program::default();

        while !self.cur_token_is(TokenType::Eof) {
            match self.parse_statement() {
                Some(s) => {
                    p.statements.push(s);
                    self.next_token();
                },
                None => self.synchronize(),
            }
        }

        if !self.errors.is_empty() {
            debug!(errors = self.errors.len(), "parse finished with diagnostics");
        }
        p
    }

    // Skips the rest of a malformed statement. Stops past a `;`, or before a
    // `let`/`return`, the `}` closing the current block, or the end of input.
    fn synchronize(&mut self) {
        let mut moved = false;
        loop {
            match self.cur_token.token_type {
                TokenType::Eof => return,
                TokenType::RBrace if self.depth > 0 => return,
                TokenType::Let | TokenType::Return if moved => return,
                TokenType::Semicolon => {
                    self.next_token();
                    return;
                },
                _ => {},
            }
            self.next_token();
            moved = true;
        }
    }

    fn parse_statement(&mut self) -> Option<Statement> {
        match self.cur_token.token_type {
            TokenType::Let => self.parse_let_statement(),
            TokenType::Return => self.parse_return_statement(),
            _ => self.parse_expression_statement()
        }
    }

    // `;` may be left out right before a `}` or the end of input.
    fn expect_terminator(&mut self) -> bool {
        if self.peek_token_is(TokenType::Semicolon) {
            self.next_token();
            return true;
        }
        if self.peek_token_is(TokenType::RBrace) || self.peek_token_is(TokenType::Eof) {
            return true;
        }
        self.peek_error(TokenType::Semicolon);
        false
    }

    fn parse_let_statement(&mut self) -> Option<Statement> {
        let token = self.cur_token.clone();
        if !self.expect_peek(TokenType::Ident) {
            return None;
        }

        let name = Identifier::new(self.cur_token.clone());

        if !self.expect_peek(TokenType::Assign) {
            return None;
        }
        self.next_token();

        let value = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_terminator() {
            return None;
        }

        Some(Statement::Let { token, name, value })
    }

    fn parse_return_statement(&mut self) -> Option<Statement> {
        let token = self.cur_token.clone();
        if self.peek_token_is(TokenType::Semicolon)
            || self.peek_token_is(TokenType::RBrace)
            || self.peek_token_is(TokenType::Eof) {
            self.expect_terminator();
            return Some(Statement::Return { token, value: None });
        }

        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_terminator() {
            return None;
        }
        Some(Statement::Return { token, value: Some(value) })
    }

    fn parse_expression_statement(&mut self) -> Option<Statement> {
        let token = self.cur_token.clone();
        let expression = self.parse_expression(Precedence::Lowest)?;

        if self.peek_token_is(TokenType::Semicolon) {
            self.next_token();
        }
        Some(Statement::Expression { token, expression })
    }

    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expression> {
        ensure_sufficient_stack(|| self.parse_expression_inner(precedence))
    }

    fn parse_expression_inner(&mut self, precedence: Precedence) -> Option<Expression> {
        let mut left_exp = match self.cur_token.token_type {
            TokenType::Ident => Some(self.parse_identifier()),
            TokenType::Int => self.parse_integer_literal(),
            TokenType::Float => self.parse_float_literal(),
            TokenType::String => Some(self.parse_string_literal()),
            TokenType::Minus | TokenType::Bang => self.parse_prefix_expression(),
            TokenType::LBracket => self.parse_array_literal(),
            TokenType::LParen => self.parse_grouped_expression(),
            TokenType::LBrace => self.parse_hash_literal(),
            TokenType::True | TokenType::False => Some(self.parse_boolean()),
            TokenType::If => self.parse_if_expression(),
            TokenType::Function => self.parse_function_literal(),
            _ => {
                self.no_prefix_fn_error();
                None
            },
        }?;

        while !self.peek_token_is(TokenType::Semicolon) && precedence < self.peek_precedence() {
            self.next_token();
            left_exp = match self.cur_token.token_type {
                TokenType::LParen => self.parse_call_expression(left_exp)?,
                TokenType::LBracket => self.parse_index_expression(left_exp)?,
                _ => self.parse_infix_expression(left_exp)?,
            };
        }
        Some(left_exp)
    }

    fn peek_precedence(&self) -> Precedence {
        get_precedence(self.peek_token.token_type).unwrap_or(Precedence::Lowest)
    }

    fn cur_precedence(&self) -> Precedence {
        get_precedence(self.cur_token.token_type).unwrap_or(Precedence::Lowest)
    }

    fn parse_identifier(&self) -> Expression {
        Expression::Identifier(Identifier::new(self.cur_token.clone()))
    }

    fn parse_integer_literal(&mut self) -> Option<Expression> {
        let token = self.cur_token.clone();
        match token.literal.parse::<i64>() {
            Ok(value) => Some(Expression::Integer { token, value }),
            Err(_) => {
                self.errors.push(format!("{}: could not parse \"{}\" as integer",
                    token.location, token.literal));
                None
            }
        }
    }

    fn parse_float_literal(&mut self) -> Option<Expression> {
        let token = self.cur_token.clone();
        match token.literal.parse::<f64>() {
            Ok(value) => Some(Expression::Float { token, value }),
            Err(_) => {
                self.errors.push(format!("{}: could not parse \"{}\" as float",
                    token.location, token.literal));
                None
            }
        }
    }

    fn parse_string_literal(&self) -> Expression {
        let token = self.cur_token.clone();
        let value = token.literal.clone();
        Expression::String { token, value }
    }

    fn parse_boolean(&self) -> Expression {
        Expression::Boolean {
            token: self.cur_token.clone(),
            value: self.cur_token_is(TokenType::True),
        }
    }

    fn parse_prefix_expression(&mut self) -> Option<Expression> {
        let token = self.cur_token.clone();
        let operator = token.literal.clone();
        self.next_token();
        let right = self.parse_expression(Precedence::Prefix)?;
        Some(Expression::Prefix {
            token,
            operator,
            right: Box::new(right)
        })
    }

    fn parse_infix_expression(&mut self, left: Expression) -> Option<Expression> {
        let token = self.cur_token.clone();
        let operator = token.literal.clone();

        let precedence = self.cur_precedence();
        self.next_token();
        let right = self.parse_expression(precedence)?;
        Some(Expression::Infix {
            token,
            operator,
            left: Box::new(left),
            right: Box::new(right)
        })
    }

    fn parse_grouped_expression(&mut self) -> Option<Expression> {
        self.next_token();
        let exp = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenType::RParen) {
            return None;
        }
        Some(exp)
    }

    fn parse_if_expression(&mut self) -> Option<Expression> {
        let token = self.cur_token.clone();
        if !self.expect_peek(TokenType::LParen) {
            return None;
        }

        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenType::RParen) {
            return None;
        }
        if !self.expect_peek(TokenType::LBrace) {
            return None;
        }

        let consequence = self.parse_block_statement()?;

        let alternative = if self.peek_token_is(TokenType::Else) {
            self.next_token();
            if !self.expect_peek(TokenType::LBrace) {
                return None;
            }
            Some(self.parse_block_statement()?)
        } else {
            None
        };

        Some(Expression::If {
            token,
            condition: Box::new(condition),
            consequence,
            alternative,
        })
    }

    // Entered on `{`, leaves the parser on the matching `}`.
    fn parse_block_statement(&mut self) -> Option<BlockStatement> {
        let token = self.cur_token.clone();
        let mut statements = Vec::<Statement>::new();

        self.depth += 1;
        self.next_token();
        while !self.cur_token_is(TokenType::RBrace) && !self.cur_token_is(TokenType::Eof) {
            match self.parse_statement() {
                Some(st) => {
                    statements.push(st);
                    self.next_token();
                },
                None => self.synchronize(),
            }
        }
        self.depth -= 1;

        if self.cur_token_is(TokenType::Eof) {
            self.unexpected_token_error(TokenType::RBrace, self.cur_token.clone());
            return None;
        }
        Some(BlockStatement { token, statements })
    }

    fn parse_function_literal(&mut self) -> Option<Expression> {
        let token = self.cur_token.clone();
        if !self.expect_peek(TokenType::LParen) {
            return None;
        }
        let parameters = self.parse_function_parameters()?;

        if !self.expect_peek(TokenType::LBrace) {
            return None;
        }

        let body = self.parse_block_statement()?;

        Some(Expression::Function { token, parameters, body })
    }

    fn parse_function_parameters(&mut self) -> Option<Vec<Identifier>> {
        let mut params = Vec::new();
        if self.peek_token_is(TokenType::RParen) {
            self.next_token();
            return Some(params);
        }

        if !self.expect_peek(TokenType::Ident) {
            return None;
        }
        params.push(Identifier::new(self.cur_token.clone()));

        while self.peek_token_is(TokenType::Comma) {
            self.next_token();
            if !self.expect_peek(TokenType::Ident) {
                return None;
            }
            params.push(Identifier::new(self.cur_token.clone()));
        }

        if !self.expect_peek(TokenType::RParen) {
            return None;
        }
        Some(params)
    }

    fn parse_call_expression(&mut self, function: Expression) -> Option<Expression> {
        let token = self.cur_token.clone();
        let arguments = self.parse_expression_list(TokenType::RParen)?;
        Some(Expression::Call { token, function: Box::new(function), arguments })
    }

    fn parse_expression_list(&mut self, end: TokenType) -> Option<Vec<Expression>> {
        let mut list = Vec::new();
        if self.peek_token_is(end) {
            self.next_token();
            return Some(list)
        }
        self.next_token();
        list.push(self.parse_expression(Precedence::Lowest)?);

        while self.peek_token_is(TokenType::Comma) {
            self.next_token();
            self.next_token();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }
        if !self.expect_peek(end) {
            return None;
        }
        Some(list)
    }

    fn parse_array_literal(&mut self) -> Option<Expression> {
        let token = self.cur_token.clone();
        let elements = self.parse_expression_list(TokenType::RBracket)?;
        Some(Expression::Array { token, elements })
    }

    fn parse_index_expression(&mut self, left: Expression) -> Option<Expression> {
        let token = self.cur_token.clone();
        self.next_token();
        let index = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenType::RBracket) {
            return None;
        }

        Some(Expression::Index { token, left: Box::new(left), index: Box::new(index) })
    }

    fn parse_hash_literal(&mut self) -> Option<Expression> {
        let token = self.cur_token.clone();
        let mut pairs = Vec::new();

        while !self.peek_token_is(TokenType::RBrace) {
            self.next_token();
            let key = self.parse_expression(Precedence::Lowest)?;
            if !self.expect_peek(TokenType::Colon) {
                return None;
            }

            self.next_token();

            let value = self.parse_expression(Precedence::Lowest)?;
            if !self.peek_token_is(TokenType::RBrace) && !self.expect_peek(TokenType::Comma) {
                return None;
            }

            pairs.push((key, value));
        }

        if !self.expect_peek(TokenType::RBrace) {
            return None;
        }
        Some(Expression::Hash { token, pairs })
    }
}

/// Parses a whole buffer, returning the program and its diagnostics.
pub fn parse(input: &str) -> (Program, Vec<String>) {
    let mut p = Parser::new(Lexer::new(input));
    let program = p.parse_program();
    (program, p.into_errors())
}


#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use crate::ast::{Expression, Program, Statement};
    use crate::parser::parse;
    use crate::token::Location;

    fn parse_ok(input: &str) -> Program {
        let (program, errors) = parse(input);
        assert!(errors.is_empty(), "unexpected parser errors for {:?}: {:?}", input, errors);
        program
    }

    fn single_expression(input: &str) -> Expression {
        let program = parse_ok(input);
        assert_eq!(program.statements.len(), 1);
        match &program.statements[0] {
            Statement::Expression { expression, .. } => expression.clone(),
            other => panic!("not expression statement, got {}", other),
        }
    }

    #[test]
    fn test_let_statement() {
        struct Test<'a> {
            input: &'a str,
            exp_identifier: &'a str,
            exp_value: &'a str,
        }
        let tests = vec![
            Test {input: "let x = 5;", exp_identifier: "x", exp_value: "5"},
            Test {input: "let y = true;", exp_identifier: "y", exp_value: "true"},
            Test {input: "let foobar = y;", exp_identifier: "foobar", exp_value: "y"},
            Test {input: "let last = 1", exp_identifier: "last", exp_value: "1"},
        ];

        for test in tests {
            let program = parse_ok(test.input);

            assert_eq!(program.statements.len(), 1);

            match &program.statements[0] {
                Statement::Let { token, name, value } => {
                    assert_eq!(token.literal, "let");
                    assert_eq!(name.value, test.exp_identifier);
                    assert_eq!(value.to_string(), test.exp_value);
                },
                _ => {
                    panic!("not let statement")
                }
            }
        }
    }

    #[test]
    fn test_return_statement() {
        struct Test<'a> {
            input: &'a str,
            exp_value: Option<&'a str>,
        }
        let tests = vec![
            Test {input: "return true;", exp_value: Some("true")},
            Test {input: "return 5;", exp_value: Some("5")},
            Test {input: "return foobar;", exp_value: Some("foobar")},
            Test {input: "return;", exp_value: None},
            Test {input: "return", exp_value: None},
        ];

        for test in tests {
            let program = parse_ok(test.input);

            assert_eq!(program.statements.len(), 1);

            match &program.statements[0] {
                Statement::Return { value, .. } => {
                    assert_eq!(value.as_ref().map(|v| v.to_string()), test.exp_value.map(String::from));
                },
                _ => {
                    panic!("not return statement")
                }
            }
        }
    }

    #[test]
    fn test_parsing_prefix_expressions() {
        struct Test<'a> {
            input: &'a str,
            exp_operator: &'a str,
            exp_value: &'a str,
        }
        let tests = vec![
            Test {input: "!5;", exp_operator: "!", exp_value: "5"},
            Test {input: "-15;", exp_operator: "-", exp_value: "15"},
            Test {input: "-1.5;", exp_operator: "-", exp_value: "1.5"},
            Test {input: "!true;", exp_operator: "!", exp_value: "true"},
        ];

        for test in tests {
            match single_expression(test.input) {
                Expression::Prefix { operator, right, .. } => {
                    assert_eq!(operator, test.exp_operator);
                    assert_eq!(right.to_string(), test.exp_value);
                },
                _ => {
                    panic!("not prefix expression")
                }
            }
        }
    }

    #[test]
    fn test_parsing_infix_expressions() {
        struct Test<'a> {
            input: &'a str,
            exp_left: &'a str,
            exp_operator: &'a str,
            exp_right: &'a str,
        }
        let tests = vec![
            Test {input: "5+3;", exp_left: "5", exp_operator: "+", exp_right: "3"},
            Test {input: "5-3;", exp_left: "5", exp_operator: "-", exp_right: "3"},
            Test {input: "5*3;", exp_left: "5", exp_operator: "*", exp_right: "3"},
            Test {input: "5/3;", exp_left: "5", exp_operator: "/", exp_right: "3"},
            Test {input: "5<3;", exp_left: "5", exp_operator: "<", exp_right: "3"},
            Test {input: "5>3;", exp_left: "5", exp_operator: ">", exp_right: "3"},
            Test {input: "5==3;", exp_left: "5", exp_operator: "==", exp_right: "3"},
            Test {input: "5!=3;", exp_left: "5", exp_operator: "!=", exp_right: "3"},
            Test {input: "foo!=bar", exp_left: "foo", exp_operator: "!=", exp_right: "bar"},
            Test {input: "true==bar", exp_left: "true", exp_operator: "==", exp_right: "bar"},
            Test {input: "2.5*x", exp_left: "2.5", exp_operator: "*", exp_right: "x"},
        ];

        for test in tests {
            match single_expression(test.input) {
                Expression::Infix { operator, left, right, .. } => {
                    assert_eq!(operator, test.exp_operator);
                    assert_eq!(left.to_string(), test.exp_left);
                    assert_eq!(right.to_string(), test.exp_right);
                },
                _ => {
                    panic!("not infix expression")
                }
            }
        }
    }

    #[test]
    fn test_operator_precedence() {
        struct Test<'a> {
            input: &'a str,
            expected: &'a str,
        }
        let tests = vec![
            Test {input: "-a*b", expected: "((-a) * b);"},
            Test {input: "!-a", expected: "(!(-a));"},
            Test {input: "a+b+c", expected: "((a + b) + c);"},
            Test {input: "a+b-c", expected: "((a + b) - c);"},
            Test {input: "a*b/c", expected: "((a * b) / c);"},
            Test {input: "a-b*c", expected: "(a - (b * c));"},
            Test {input: "a + b * c + d / e - f", expected: "(((a + (b * c)) + (d / e)) - f);"},
            Test {input: "0 + 4; -5 / 9", expected: "(0 + 4); ((-5) / 9);"},
            Test {input: "5 > 4 == 3<4", expected: "((5 > 4) == (3 < 4));"},
            Test {input: "3 + 4 * 5 == 3 * 1 + 4 * 5", expected: "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)));"},
            Test {input: "(5 + 5) * 2", expected: "((5 + 5) * 2);"},
            Test {input: "2 / (5 + 5)", expected: "(2 / (5 + 5));"},
            Test {input: "(5 + 5) * 2 * (5 + 5)", expected: "(((5 + 5) * 2) * (5 + 5));"},
            Test {input: "-(5 + 5)", expected: "(-(5 + 5));"},
            Test {input: "!(true == true)", expected: "(!(true == true));"},
            Test {input: "a + add(b * c) + d", expected: "((a + add((b * c))) + d);"},
            Test {input: "add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8))", expected: "add(a, b, 1, (2 * 3), (4 + 5), add(6, (7 * 8)));"},
            Test {input: "add(a * b[2], b[1], 2 * [1, 2][1])", expected: "add((a * (b[2])), (b[1]), (2 * ([1, 2][1])));"},
            Test {input: "-f(x)[0]", expected: "(-(f(x)[0]));"},
        ];

        for test in tests {
            let program = parse_ok(test.input);
            assert_eq!(program.to_string(), test.expected);
        }
    }

    #[test]
    fn test_if_expression() {
        struct Test<'a> {
            input: &'a str,
            exp_condition: &'a str,
            exp_consequence: &'a str,
            exp_alternative: Option<&'a str>,
        }
        let tests = vec![
            Test {input: "if (x <y) {x}", exp_condition: "(x < y)", exp_consequence: "{ x; }", exp_alternative: None},
            Test {input: "if (x <y) {x} else {y}", exp_condition: "(x < y)", exp_consequence: "{ x; }", exp_alternative: Some("{ y; }")},
            Test {input: "if (x) { let a = 1; a } else { }", exp_condition: "x", exp_consequence: "{ let a = 1; a; }", exp_alternative: Some("{ }")},
        ];

        for test in tests {
            match single_expression(test.input) {
                Expression::If { condition, consequence, alternative, .. } => {
                    assert_eq!(condition.to_string(), test.exp_condition);
                    assert_eq!(consequence.to_string(), test.exp_consequence);
                    assert_eq!(alternative.map(|alt| alt.to_string()), test.exp_alternative.map(String::from));
                },
                _ => panic!("not if expression"),
            }
        }
    }

    #[test]
    fn test_function_literal() {
        struct Test<'a> {
            input: &'a str,
            exp_params: Vec<&'a str>,
            exp_body: &'a str,
        }
        let tests = vec![
            Test {input: "fn(x, y) {x+y;}", exp_params: vec!["x", "y"], exp_body: "{ (x + y); }"},
            Test {input: "fn() {}", exp_params: vec![], exp_body: "{ }"},
            Test {input: "fn(x) { return x }", exp_params: vec!["x"], exp_body: "{ return x; }"},
        ];

        for test in tests {
            match single_expression(test.input) {
                Expression::Function { parameters, body, .. } => {
                    let params: Vec<_> = parameters.iter().map(|p| p.value.as_str()).collect();
                    assert_eq!(params, test.exp_params);
                    assert_eq!(body.to_string(), test.exp_body);
                },
                _ => panic!("not function literal"),
            }
        }
    }

    #[test]
    fn test_call_expression() {
        match single_expression("add(1, 2*3, 4+a)") {
            Expression::Call { token, function, arguments } => {
                assert_eq!(token.literal, "(");
                assert_eq!(function.to_string(), "add");
                let args: Vec<_> = arguments.iter().map(|a| a.to_string()).collect();
                assert_eq!(args, vec!["1", "(2 * 3)", "(4 + a)"]);
            },
            _ => panic!("not call expression"),
        }
    }

    #[test]
    fn test_string_literal() {
        match single_expression("\"hello world\"") {
            Expression::String { value, .. } => assert_eq!(value, "hello world"),
            _ => panic!("expression is not string literal")
        }
    }

    #[test]
    fn test_float_literal() {
        match single_expression("3.25") {
            Expression::Float { value, .. } => assert_eq!(value, 3.25),
            _ => panic!("expression is not float literal")
        }
    }

    #[test]
    fn test_array_literal() {
        match single_expression("[1, a+2]") {
            Expression::Array { elements, .. } => {
                let got: Vec<_> = elements.iter().map(|e| e.to_string()).collect();
                assert_eq!(got, vec!["1", "(a + 2)"]);
            },
            _ => panic!("expression is not array literal")
        }
    }

    #[test]
    fn test_index_expression() {
        match single_expression("myArray[a+2]") {
            Expression::Index { left, index, .. } => {
                assert_eq!(left.to_string(), "myArray");
                assert_eq!(index.to_string(), "(a + 2)");
            },
            _ => panic!("expression is not index expression")
        }
    }

    #[test]
    fn test_hash_literal() {
        struct Test<'a> {
            input: &'a str,
            expected: Vec<(&'a str, &'a str)>,
        }
        let tests = vec![
            Test {input: r#"{"one": 1, "two": 2}"#, expected: vec![("\"one\"", "1"), ("\"two\"", "2")]},
            Test {input: "{}", expected: vec![]},
            Test {input: r#"{"a": 0 + 1, "a": 10 - 8}"#, expected: vec![("\"a\"", "(0 + 1)"), ("\"a\"", "(10 - 8)")]},
            Test {input: "{true: 1, 2: x}", expected: vec![("true", "1"), ("2", "x")]},
        ];

        for test in tests {
            match single_expression(test.input) {
                Expression::Hash { pairs, .. } => {
                    let got: Vec<_> = pairs.iter()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect();
                    let expected: Vec<_> = test.expected.iter()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect();
                    assert_eq!(got, expected);
                },
                _ => panic!("expression is not hash literal")
            }
        }
    }

    #[test]
    fn test_node_locations() {
        let program = parse_ok("let x = 1;\nx + 2;");
        assert_eq!(program.statements[0].location(), Location { line: 1, column: 1 });
        match &program.statements[1] {
            Statement::Expression { expression, .. } => {
                assert_eq!(expression.location(), Location { line: 2, column: 3 });
                assert_eq!(expression.token_literal(), "+");
            },
            _ => panic!("not expression statement"),
        }
    }

    #[test]
    fn test_parser_errors() {
        struct Test<'a> {
            input: &'a str,
            expected: Vec<&'a str>,
        }
        let tests = vec![
            Test {
                input: "let a = (1 + 2; let b = 3 let c = 4;",
                expected: vec![
                    r#"1:15: expected next token to be RPAREN, got SEMICOLON (";") instead"#,
                    r#"1:27: expected next token to be SEMICOLON, got LET ("let") instead"#,
                ],
            },
            Test {
                input: "let = 5;",
                expected: vec![r#"1:5: expected next token to be IDENT, got ASSIGN ("=") instead"#],
            },
            Test {
                input: "let x 5;",
                expected: vec![r#"1:7: expected next token to be ASSIGN, got INT ("5") instead"#],
            },
            Test {
                input: "1 + ;",
                expected: vec![r#"1:5: no prefix parse function for SEMICOLON (";") found"#],
            },
            Test {
                input: "@",
                expected: vec![r#"1:1: illegal token ("@")"#],
            },
            Test {
                input: "\"open",
                expected: vec![r#"1:1: illegal token (""open")"#],
            },
            Test {
                input: "99999999999999999999",
                expected: vec![r#"1:1: could not parse "99999999999999999999" as integer"#],
            },
            Test {
                input: "fn(x) { x",
                expected: vec![r#"1:10: expected next token to be RBRACE, got EOF ("") instead"#],
            },
            Test {
                input: "fn(1) { }",
                expected: vec![r#"1:4: expected next token to be IDENT, got INT ("1") instead"#],
            },
        ];

        for test in tests {
            let (_, errors) = parse(test.input);
            assert_eq!(errors, test.expected, "input: {}", test.input);
        }
    }

    #[test]
    fn test_recovery_keeps_later_statements() {
        let (program, errors) = parse("let = 1; let y = 2; y;");
        assert_eq!(errors.len(), 1);
        assert_eq!(program.to_string(), "let y = 2; y;");
    }

    #[test]
    fn test_recovery_inside_block() {
        let (program, errors) = parse("let f = fn(x) { x + }; f(1);");
        assert_eq!(errors, vec![r#"1:21: no prefix parse function for RBRACE ("}") found"#]);
        assert_eq!(program.to_string(), "let f = fn(x) { }; f(1);");
    }

    #[test]
    fn test_stray_closing_brace_makes_progress() {
        let (program, errors) = parse("} let x = 1; x");
        assert_eq!(errors, vec![r#"1:1: no prefix parse function for RBRACE ("}") found"#]);
        assert_eq!(program.to_string(), "let x = 1; x;");
    }

    #[test]
    fn test_deep_nesting() {
        let input = format!("{}1{}", "(".repeat(5_000), ")".repeat(5_000));
        let (program, errors) = parse(&input);
        assert!(errors.is_empty(), "{:?}", errors);
        assert_eq!(program.to_string(), "1;");

        let input = format!("let f = {}1{};", "fn() { ".repeat(1_000), " }".repeat(1_000));
        let (program, errors) = parse(&input);
        assert!(errors.is_empty(), "{:?}", errors);
        assert_eq!(program.statements.len(), 1);

        let (_, errors) = parse(&"(".repeat(5_000));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_brace_at_statement_start_is_hash() {
        let (program, errors) = parse("{1: 2}; {}");
        assert!(errors.is_empty(), "{:?}", errors);
        assert_eq!(program.statements.len(), 2);
        for stmt in &program.statements {
            match stmt {
                Statement::Expression { expression: Expression::Hash { .. }, .. } => {},
                other => panic!("expected a hash literal statement, got {}", other),
            }
        }
        assert_eq!(program.to_string(), "{1: 2}; {};");
    }
}
