//! The main parser implementation: statements and program structure.

use crate::ast::*;
use crate::lexer::{Scanner, Token, TokenKind};
use crate::Error;

/// A recursive descent parser for the script subset.
#[derive(Clone)]
pub struct Parser<'a> {
    scanner: Scanner<'a>,
    pub(super) current: Token,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given source code.
    pub fn new(source: &'a str) -> Self {
        let mut scanner = Scanner::new(source);
        let current = scanner.next_token();
        Self { scanner, current }
    }

    /// Parses the source code into a Program AST node.
    pub fn parse_program(&mut self) -> Result<Program, Error> {
        let mut body = Vec::new();

        while !self.is_at_end() {
            body.push(self.parse_statement()?);
        }

        Ok(Program { body })
    }

    /// Parses a single statement.
    pub fn parse_statement(&mut self) -> Result<Statement, Error> {
        match &self.current.kind {
            TokenKind::Var | TokenKind::Let | TokenKind::Const => {
                let declaration = self.parse_variable_declaration()?;
                self.consume_semicolon()?;
                Ok(Statement::VariableDeclaration(declaration))
            }
            TokenKind::Function => self.parse_function_declaration(),
            TokenKind::If => self.parse_if_statement(),
            TokenKind::While => self.parse_while_statement(),
            TokenKind::For => self.parse_for_statement(),
            TokenKind::Return => self.parse_return_statement(),
            TokenKind::Break => {
                self.advance();
                self.consume_semicolon()?;
                Ok(Statement::Break)
            }
            TokenKind::Continue => {
                self.advance();
                self.consume_semicolon()?;
                Ok(Statement::Continue)
            }
            TokenKind::Throw => self.parse_throw_statement(),
            TokenKind::LeftBrace => self.parse_block_statement(),
            TokenKind::Semicolon => {
                self.advance();
                Ok(Statement::Empty)
            }
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_variable_declaration(&mut self) -> Result<VariableDeclaration, Error> {
        let kind = match &self.current.kind {
            TokenKind::Var => VariableKind::Var,
            TokenKind::Let => VariableKind::Let,
            TokenKind::Const => VariableKind::Const,
            _ => return Err(Error::Syntax("Expected variable keyword".into())),
        };
        self.advance();

        let mut declarations = Vec::new();

        loop {
            let id = self.expect_identifier()?;
            let init = if self.check(&TokenKind::Equal) {
                self.advance();
                Some(self.parse_expression()?)
            } else {
                None
            };

            declarations.push(VariableDeclarator { id, init });

            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }

        Ok(VariableDeclaration { kind, declarations })
    }

    fn parse_function_declaration(&mut self) -> Result<Statement, Error> {
        self.advance(); // consume 'function'

        let id = self.expect_identifier()?;
        let params = self.parse_parameter_list()?;
        let body = self.parse_function_body()?;

        Ok(Statement::FunctionDeclaration(FunctionDeclaration {
            id,
            params,
            body,
        }))
    }

    /// Parses `(a, b, c)`.
    pub(super) fn parse_parameter_list(&mut self) -> Result<Vec<Identifier>, Error> {
        self.expect(&TokenKind::LeftParen)?;

        let mut params = Vec::new();
        if !self.check(&TokenKind::RightParen) {
            loop {
                params.push(self.expect_identifier()?);
                if !self.check(&TokenKind::Comma) {
                    break;
                }
                self.advance();
            }
        }

        self.expect(&TokenKind::RightParen)?;
        Ok(params)
    }

    /// Parses `{ ...statements }` as a function body.
    pub(super) fn parse_function_body(&mut self) -> Result<Vec<Statement>, Error> {
        self.expect(&TokenKind::LeftBrace)?;

        let mut body = Vec::new();
        while !self.check(&TokenKind::RightBrace) && !self.is_at_end() {
            body.push(self.parse_statement()?);
        }

        self.expect(&TokenKind::RightBrace)?;
        Ok(body)
    }

    fn parse_if_statement(&mut self) -> Result<Statement, Error> {
        self.advance(); // consume 'if'
        self.expect(&TokenKind::LeftParen)?;
        let test = self.parse_expression()?;
        self.expect(&TokenKind::RightParen)?;

        let consequent = Box::new(self.parse_statement()?);
        let alternate = if self.check(&TokenKind::Else) {
            self.advance();
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };

        Ok(Statement::If(IfStatement {
            test,
            consequent,
            alternate,
        }))
    }

    fn parse_while_statement(&mut self) -> Result<Statement, Error> {
        self.advance(); // consume 'while'
        self.expect(&TokenKind::LeftParen)?;
        let test = self.parse_expression()?;
        self.expect(&TokenKind::RightParen)?;
        let body = Box::new(self.parse_statement()?);

        Ok(Statement::While(WhileStatement { test, body }))
    }

    fn parse_for_statement(&mut self) -> Result<Statement, Error> {
        self.advance(); // consume 'for'
        self.expect(&TokenKind::LeftParen)?;

        let init = if self.check(&TokenKind::Semicolon) {
            None
        } else if matches!(
            self.current.kind,
            TokenKind::Var | TokenKind::Let | TokenKind::Const
        ) {
            let declaration = self.parse_variable_declaration()?;
            Some(ForInit::Declaration(Box::new(declaration)))
        } else {
            Some(ForInit::Expression(self.parse_expression()?))
        };
        self.expect(&TokenKind::Semicolon)?;

        let test = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(&TokenKind::Semicolon)?;

        let update = if self.check(&TokenKind::RightParen) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(&TokenKind::RightParen)?;

        let body = Box::new(self.parse_statement()?);

        Ok(Statement::For(ForStatement {
            init,
            test,
            update,
            body,
        }))
    }

    fn parse_return_statement(&mut self) -> Result<Statement, Error> {
        self.advance(); // consume 'return'

        let argument = if self.check(&TokenKind::Semicolon)
            || self.check(&TokenKind::RightBrace)
            || self.is_at_end()
        {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.consume_semicolon()?;

        Ok(Statement::Return(ReturnStatement { argument }))
    }

    fn parse_throw_statement(&mut self) -> Result<Statement, Error> {
        self.advance(); // consume 'throw'
        let argument = self.parse_expression()?;
        self.consume_semicolon()?;

        Ok(Statement::Throw(ThrowStatement { argument }))
    }

    fn parse_block_statement(&mut self) -> Result<Statement, Error> {
        let body = self.parse_function_body()?;
        Ok(Statement::Block(BlockStatement { body }))
    }

    fn parse_expression_statement(&mut self) -> Result<Statement, Error> {
        let expression = self.parse_expression()?;
        self.consume_semicolon()?;
        Ok(Statement::Expression(ExpressionStatement { expression }))
    }

    // ---- token helpers ----

    pub(super) fn advance(&mut self) -> Token {
        let next = self.scanner.next_token();
        std::mem::replace(&mut self.current, next)
    }

    pub(super) fn check(&self, kind: &TokenKind) -> bool {
        &self.current.kind == kind
    }

    pub(super) fn is_at_end(&self) -> bool {
        self.current.kind == TokenKind::Eof
    }

    pub(super) fn expect(&mut self, kind: &TokenKind) -> Result<Token, Error> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(Error::Syntax(format!(
                "Expected {:?}, found {:?}",
                kind, self.current.kind
            )))
        }
    }

    pub(super) fn expect_identifier(&mut self) -> Result<Identifier, Error> {
        if let TokenKind::Identifier(name) = &self.current.kind {
            let name = name.clone();
            self.advance();
            Ok(Identifier { name })
        } else {
            Err(Error::Syntax(format!(
                "Expected identifier, found {:?}",
                self.current.kind
            )))
        }
    }

    /// Consumes a statement-terminating semicolon when present. Closing
    /// braces, end of input, and plain statement boundaries also
    /// terminate a statement; a full ASI implementation is not attempted.
    pub(super) fn consume_semicolon(&mut self) -> Result<(), Error> {
        if self.check(&TokenKind::Semicolon) {
            self.advance();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Program {
        Parser::new(source).parse_program().unwrap()
    }

    #[test]
    fn parses_variable_declarations() {
        let program = parse("var a = 1, b; let c = 'x'; const d = true;");
        assert_eq!(program.body.len(), 3);
        match &program.body[0] {
            Statement::VariableDeclaration(decl) => {
                assert_eq!(decl.kind, VariableKind::Var);
                assert_eq!(decl.declarations.len(), 2);
                assert_eq!(decl.declarations[0].id.name, "a");
                assert!(decl.declarations[1].init.is_none());
            }
            other => panic!("expected variable declaration, got {:?}", other),
        }
    }

    #[test]
    fn parses_function_declaration() {
        let program = parse("function add(a, b) { return a + b; }");
        match &program.body[0] {
            Statement::FunctionDeclaration(func) => {
                assert_eq!(func.id.name, "add");
                assert_eq!(func.params.len(), 2);
                assert_eq!(func.body.len(), 1);
            }
            other => panic!("expected function declaration, got {:?}", other),
        }
    }

    #[test]
    fn parses_control_flow() {
        let program = parse("if (x) { y = 1; } else y = 2; while (x) x--; for (var i = 0; i < 3; i++) { }");
        assert_eq!(program.body.len(), 3);
        assert!(matches!(program.body[0], Statement::If(_)));
        assert!(matches!(program.body[1], Statement::While(_)));
        assert!(matches!(program.body[2], Statement::For(_)));
    }

    #[test]
    fn tolerates_missing_semicolons() {
        let program = parse("var a = 1\nvar b = 2");
        assert_eq!(program.body.len(), 2);
    }

    #[test]
    fn rejects_new_expressions() {
        let result = Parser::new("var x = new Foo();").parse_program();
        assert!(result.is_err());
    }
}
