//! Expression parsing with precedence climbing.

use crate::ast::*;
use crate::lexer::TokenKind;
use crate::Error;

use super::Parser;

impl<'a> Parser<'a> {
    /// Parses a full expression.
    pub fn parse_expression(&mut self) -> Result<Expression, Error> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> Result<Expression, Error> {
        let left = self.parse_conditional()?;

        // Single-parameter arrow function: `x => body`
        if self.check(&TokenKind::Arrow) {
            if let Expression::Identifier(param) = left {
                self.advance();
                let body = self.parse_arrow_body()?;
                return Ok(Expression::Arrow(ArrowFunctionExpression {
                    params: vec![param],
                    body,
                }));
            }
            return Err(Error::Syntax("Unexpected '=>'".into()));
        }

        let operator = match &self.current.kind {
            TokenKind::Equal => AssignmentOperator::Assign,
            TokenKind::PlusEqual => AssignmentOperator::AddAssign,
            TokenKind::MinusEqual => AssignmentOperator::SubtractAssign,
            TokenKind::StarEqual => AssignmentOperator::MultiplyAssign,
            TokenKind::SlashEqual => AssignmentOperator::DivideAssign,
            TokenKind::PercentEqual => AssignmentOperator::ModuloAssign,
            _ => return Ok(left),
        };

        if !matches!(left, Expression::Identifier(_) | Expression::Member(_)) {
            return Err(Error::Syntax("Invalid assignment target".into()));
        }

        self.advance();
        let right = self.parse_assignment()?; // right associative

        Ok(Expression::Assignment(AssignmentExpression {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }))
    }

    fn parse_conditional(&mut self) -> Result<Expression, Error> {
        let test = self.parse_logical_or()?;

        if self.check(&TokenKind::Question) {
            self.advance();
            let consequent = self.parse_assignment()?;
            self.expect(&TokenKind::Colon)?;
            let alternate = self.parse_assignment()?;
            return Ok(Expression::Conditional(ConditionalExpression {
                test: Box::new(test),
                consequent: Box::new(consequent),
                alternate: Box::new(alternate),
            }));
        }

        Ok(test)
    }

    fn parse_logical_or(&mut self) -> Result<Expression, Error> {
        let mut left = self.parse_logical_and()?;

        while self.check(&TokenKind::PipePipe) {
            self.advance();
            let right = self.parse_logical_and()?;
            left = Expression::Logical(LogicalExpression {
                operator: LogicalOperator::Or,
                left: Box::new(left),
                right: Box::new(right),
            });
        }

        Ok(left)
    }

    fn parse_logical_and(&mut self) -> Result<Expression, Error> {
        let mut left = self.parse_equality()?;

        while self.check(&TokenKind::AmpAmp) {
            self.advance();
            let right = self.parse_equality()?;
            left = Expression::Logical(LogicalExpression {
                operator: LogicalOperator::And,
                left: Box::new(left),
                right: Box::new(right),
            });
        }

        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<Expression, Error> {
        let mut left = self.parse_relational()?;

        loop {
            let operator = match &self.current.kind {
                TokenKind::EqualEqual => BinaryOperator::Equal,
                TokenKind::BangEqual => BinaryOperator::NotEqual,
                TokenKind::EqualEqualEqual => BinaryOperator::StrictEqual,
                TokenKind::BangEqualEqual => BinaryOperator::StrictNotEqual,
                _ => break,
            };
            self.advance();
            let right = self.parse_relational()?;
            left = Expression::Binary(BinaryExpression {
                operator,
                left: Box::new(left),
                right: Box::new(right),
            });
        }

        Ok(left)
    }

    fn parse_relational(&mut self) -> Result<Expression, Error> {
        let mut left = self.parse_additive()?;

        loop {
            let operator = match &self.current.kind {
                TokenKind::Less => BinaryOperator::LessThan,
                TokenKind::LessEqual => BinaryOperator::LessThanEqual,
                TokenKind::Greater => BinaryOperator::GreaterThan,
                TokenKind::GreaterEqual => BinaryOperator::GreaterThanEqual,
                _ => break,
            };
            self.advance();
            let right = self.parse_additive()?;
            left = Expression::Binary(BinaryExpression {
                operator,
                left: Box::new(left),
                right: Box::new(right),
            });
        }

        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expression, Error> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let operator = match &self.current.kind {
                TokenKind::Plus => BinaryOperator::Add,
                TokenKind::Minus => BinaryOperator::Subtract,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = Expression::Binary(BinaryExpression {
                operator,
                left: Box::new(left),
                right: Box::new(right),
            });
        }

        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expression, Error> {
        let mut left = self.parse_unary()?;

        loop {
            let operator = match &self.current.kind {
                TokenKind::Star => BinaryOperator::Multiply,
                TokenKind::Slash => BinaryOperator::Divide,
                TokenKind::Percent => BinaryOperator::Modulo,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = Expression::Binary(BinaryExpression {
                operator,
                left: Box::new(left),
                right: Box::new(right),
            });
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expression, Error> {
        let operator = match &self.current.kind {
            TokenKind::Minus => Some(UnaryOperator::Minus),
            TokenKind::Plus => Some(UnaryOperator::Plus),
            TokenKind::Bang => Some(UnaryOperator::LogicalNot),
            TokenKind::Typeof => Some(UnaryOperator::Typeof),
            TokenKind::PlusPlus | TokenKind::MinusMinus => {
                let operator = if self.check(&TokenKind::PlusPlus) {
                    UpdateOperator::Increment
                } else {
                    UpdateOperator::Decrement
                };
                self.advance();
                let argument = self.parse_unary()?;
                return Ok(Expression::Update(UpdateExpression {
                    operator,
                    argument: Box::new(argument),
                    prefix: true,
                }));
            }
            _ => None,
        };

        if let Some(operator) = operator {
            self.advance();
            let argument = self.parse_unary()?;
            return Ok(Expression::Unary(UnaryExpression {
                operator,
                argument: Box::new(argument),
            }));
        }

        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<Expression, Error> {
        let expression = self.parse_call_member()?;

        if matches!(
            self.current.kind,
            TokenKind::PlusPlus | TokenKind::MinusMinus
        ) {
            let operator = if self.check(&TokenKind::PlusPlus) {
                UpdateOperator::Increment
            } else {
                UpdateOperator::Decrement
            };
            self.advance();
            return Ok(Expression::Update(UpdateExpression {
                operator,
                argument: Box::new(expression),
                prefix: false,
            }));
        }

        Ok(expression)
    }

    fn parse_call_member(&mut self) -> Result<Expression, Error> {
        let mut expression = self.parse_primary()?;

        loop {
            match &self.current.kind {
                TokenKind::Dot => {
                    self.advance();
                    let property = self.expect_property_name()?;
                    expression = Expression::Member(MemberExpression {
                        object: Box::new(expression),
                        property: MemberProperty::Identifier(property),
                    });
                }
                TokenKind::LeftBracket => {
                    self.advance();
                    let property = self.parse_expression()?;
                    self.expect(&TokenKind::RightBracket)?;
                    expression = Expression::Member(MemberExpression {
                        object: Box::new(expression),
                        property: MemberProperty::Expression(Box::new(property)),
                    });
                }
                TokenKind::LeftParen => {
                    let arguments = self.parse_arguments()?;
                    expression = Expression::Call(CallExpression {
                        callee: Box::new(expression),
                        arguments,
                    });
                }
                _ => break,
            }
        }

        Ok(expression)
    }

    fn parse_arguments(&mut self) -> Result<Vec<Expression>, Error> {
        self.expect(&TokenKind::LeftParen)?;

        let mut arguments = Vec::new();
        if !self.check(&TokenKind::RightParen) {
            loop {
                arguments.push(self.parse_assignment()?);
                if !self.check(&TokenKind::Comma) {
                    break;
                }
                self.advance();
            }
        }

        self.expect(&TokenKind::RightParen)?;
        Ok(arguments)
    }

    fn parse_primary(&mut self) -> Result<Expression, Error> {
        match &self.current.kind {
            TokenKind::Number(n) => {
                let n = *n;
                self.advance();
                Ok(Expression::Literal(Literal::Number(n)))
            }
            TokenKind::String(s) => {
                let s = s.clone();
                self.advance();
                Ok(Expression::Literal(Literal::String(s)))
            }
            TokenKind::Template(raw) => {
                let raw = raw.clone();
                self.advance();
                let parts = parse_template_parts(&raw)?;
                Ok(Expression::Template(TemplateLiteral { parts }))
            }
            TokenKind::True => {
                self.advance();
                Ok(Expression::Literal(Literal::Boolean(true)))
            }
            TokenKind::False => {
                self.advance();
                Ok(Expression::Literal(Literal::Boolean(false)))
            }
            TokenKind::Null => {
                self.advance();
                Ok(Expression::Literal(Literal::Null))
            }
            TokenKind::Undefined => {
                self.advance();
                Ok(Expression::Literal(Literal::Undefined))
            }
            TokenKind::This => {
                self.advance();
                Ok(Expression::This)
            }
            TokenKind::Identifier(name) => {
                let name = name.clone();
                self.advance();
                Ok(Expression::Identifier(Identifier { name }))
            }
            TokenKind::Function => self.parse_function_expression(),
            TokenKind::LeftParen => self.parse_paren_or_arrow(),
            TokenKind::LeftBracket => self.parse_array_literal(),
            TokenKind::LeftBrace => self.parse_object_literal(),
            TokenKind::New => Err(Error::Syntax(
                "new expressions are not supported in sandboxed modules".into(),
            )),
            other => Err(Error::Syntax(format!("Unexpected token {:?}", other))),
        }
    }

    fn parse_function_expression(&mut self) -> Result<Expression, Error> {
        self.advance(); // consume 'function'

        let id = if matches!(self.current.kind, TokenKind::Identifier(_)) {
            Some(self.expect_identifier()?)
        } else {
            None
        };
        let params = self.parse_parameter_list()?;
        let body = self.parse_function_body()?;

        Ok(Expression::Function(FunctionExpression { id, params, body }))
    }

    /// Disambiguates `(a, b) => ...` from a parenthesized expression by
    /// attempting the arrow parameter list first and backtracking.
    fn parse_paren_or_arrow(&mut self) -> Result<Expression, Error> {
        let snapshot = self.clone();

        if let Ok(params) = self.parse_parameter_list() {
            if self.check(&TokenKind::Arrow) {
                self.advance();
                let body = self.parse_arrow_body()?;
                return Ok(Expression::Arrow(ArrowFunctionExpression { params, body }));
            }
        }

        *self = snapshot;
        self.expect(&TokenKind::LeftParen)?;
        let expression = self.parse_expression()?;
        self.expect(&TokenKind::RightParen)?;
        Ok(expression)
    }

    fn parse_arrow_body(&mut self) -> Result<ArrowBody, Error> {
        if self.check(&TokenKind::LeftBrace) {
            Ok(ArrowBody::Block(self.parse_function_body()?))
        } else {
            Ok(ArrowBody::Expression(Box::new(self.parse_assignment()?)))
        }
    }

    fn parse_array_literal(&mut self) -> Result<Expression, Error> {
        self.advance(); // consume '['

        let mut elements = Vec::new();
        while !self.check(&TokenKind::RightBracket) && !self.is_at_end() {
            elements.push(self.parse_assignment()?);
            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }

        self.expect(&TokenKind::RightBracket)?;
        Ok(Expression::Array(ArrayExpression { elements }))
    }

    fn parse_object_literal(&mut self) -> Result<Expression, Error> {
        self.advance(); // consume '{'

        let mut properties = Vec::new();
        while !self.check(&TokenKind::RightBrace) && !self.is_at_end() {
            let key = self.expect_property_key()?;

            let value = if self.check(&TokenKind::Colon) {
                self.advance();
                self.parse_assignment()?
            } else {
                // Shorthand property: { name }
                Expression::Identifier(Identifier { name: key.clone() })
            };

            properties.push(ObjectProperty { key, value });

            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }

        self.expect(&TokenKind::RightBrace)?;
        Ok(Expression::Object(ObjectExpression { properties }))
    }

    /// Property name after a dot; keywords are valid property names.
    fn expect_property_name(&mut self) -> Result<Identifier, Error> {
        if let Some(name) = self.keyword_as_name() {
            self.advance();
            return Ok(Identifier { name });
        }
        self.expect_identifier()
    }

    /// Object literal key: identifier, keyword, string, or number.
    fn expect_property_key(&mut self) -> Result<String, Error> {
        if let Some(name) = self.keyword_as_name() {
            self.advance();
            return Ok(name);
        }
        match &self.current.kind {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            TokenKind::String(s) => {
                let s = s.clone();
                self.advance();
                Ok(s)
            }
            TokenKind::Number(n) => {
                let n = *n;
                self.advance();
                Ok(crate::runtime::number_to_string(n))
            }
            other => Err(Error::Syntax(format!(
                "Expected property key, found {:?}",
                other
            ))),
        }
    }

    fn keyword_as_name(&self) -> Option<String> {
        let name = match &self.current.kind {
            TokenKind::Var => "var",
            TokenKind::Let => "let",
            TokenKind::Const => "const",
            TokenKind::Function => "function",
            TokenKind::Return => "return",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::While => "while",
            TokenKind::For => "for",
            TokenKind::Break => "break",
            TokenKind::Continue => "continue",
            TokenKind::Throw => "throw",
            TokenKind::Typeof => "typeof",
            TokenKind::This => "this",
            TokenKind::New => "new",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Null => "null",
            TokenKind::Undefined => "undefined",
            _ => return None,
        };
        Some(name.to_string())
    }
}

/// Splits raw template literal content into text and `${...}` parts,
/// sub-parsing each interpolated expression.
fn parse_template_parts(raw: &str) -> Result<Vec<TemplatePart>, Error> {
    let mut parts = Vec::new();
    let mut text = String::new();
    let mut chars = raw.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some('n') => text.push('\n'),
                Some('t') => text.push('\t'),
                Some('r') => text.push('\r'),
                Some(escaped) => text.push(escaped),
                None => text.push('\\'),
            }
            continue;
        }

        if ch == '$' && chars.peek() == Some(&'{') {
            chars.next(); // consume '{'

            let mut depth = 1usize;
            let mut source = String::new();
            for inner in chars.by_ref() {
                match inner {
                    '{' => depth += 1,
                    '}' => {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                    }
                    _ => {}
                }
                source.push(inner);
            }
            if depth != 0 {
                return Err(Error::Syntax("Unterminated template substitution".into()));
            }

            if !text.is_empty() {
                parts.push(TemplatePart::Text(std::mem::take(&mut text)));
            }

            let mut parser = Parser::new(&source);
            let expression = parser.parse_expression()?;
            if !parser.is_at_end() {
                return Err(Error::Syntax(
                    "Unexpected trailing tokens in template substitution".into(),
                ));
            }
            parts.push(TemplatePart::Expression(expression));
            continue;
        }

        text.push(ch);
    }

    if !text.is_empty() {
        parts.push(TemplatePart::Text(text));
    }

    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_expr(source: &str) -> Expression {
        Parser::new(source).parse_expression().unwrap()
    }

    #[test]
    fn precedence_binds_multiplication_tighter() {
        match parse_expr("1 + 2 * 3") {
            Expression::Binary(add) => {
                assert_eq!(add.operator, BinaryOperator::Add);
                assert!(matches!(
                    *add.right,
                    Expression::Binary(BinaryExpression {
                        operator: BinaryOperator::Multiply,
                        ..
                    })
                ));
            }
            other => panic!("expected binary expression, got {:?}", other),
        }
    }

    #[test]
    fn parses_member_chains_and_calls() {
        match parse_expr("a.b['c'](1, 2)") {
            Expression::Call(call) => {
                assert_eq!(call.arguments.len(), 2);
                assert!(matches!(*call.callee, Expression::Member(_)));
            }
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn parses_arrow_functions() {
        assert!(matches!(parse_expr("x => x + 1"), Expression::Arrow(_)));
        assert!(matches!(
            parse_expr("(a, b) => { return a; }"),
            Expression::Arrow(_)
        ));
        // Parenthesized expression still works
        assert!(matches!(parse_expr("(1 + 2)"), Expression::Binary(_)));
    }

    #[test]
    fn parses_object_literals_with_shorthand() {
        match parse_expr("{ a: 1, 'b c': 2, d }") {
            Expression::Object(object) => {
                assert_eq!(object.properties.len(), 3);
                assert_eq!(object.properties[1].key, "b c");
                assert!(matches!(
                    object.properties[2].value,
                    Expression::Identifier(_)
                ));
            }
            other => panic!("expected object literal, got {:?}", other),
        }
    }

    #[test]
    fn parses_template_literals() {
        match parse_expr("`a ${1 + 2} b`") {
            Expression::Template(template) => {
                assert_eq!(template.parts.len(), 3);
                assert!(matches!(template.parts[0], TemplatePart::Text(_)));
                assert!(matches!(template.parts[1], TemplatePart::Expression(_)));
            }
            other => panic!("expected template literal, got {:?}", other),
        }
    }
}
