//! The tree-walking interpreter.

use std::rc::Rc;

use crate::ast::*;
use crate::runtime::{Callable, EnvRef, Environment, ScriptFunction, Value};
use crate::Error;

use super::{methods, operators};

/// Maximum script call depth. Each script frame costs several native
/// frames, so this stays well below the thread stack limit.
const MAX_CALL_DEPTH: usize = 256;

/// The result of executing a statement.
enum Completion {
    /// Execution continues; carries the statement's value (used by the
    /// REPL and by `eval` to report the last expression).
    Normal(Value),
    /// A return statement was hit
    Return(Value),
    /// A break statement was hit
    Break,
    /// A continue statement was hit
    Continue,
}

/// A tree-walking interpreter for the script subset.
pub struct Interpreter {
    depth: usize,
}

impl Interpreter {
    /// Creates a new interpreter.
    pub fn new() -> Self {
        Self { depth: 0 }
    }

    /// Runs a program in the given environment, returning the value of
    /// the last expression statement.
    pub fn run(&mut self, program: &Program, env: &EnvRef) -> Result<Value, Error> {
        self.hoist_functions(&program.body, env);

        let mut last = Value::Undefined;
        for statement in &program.body {
            match self.exec_statement(statement, env)? {
                Completion::Normal(value) => last = value,
                Completion::Return(value) => return Ok(value),
                Completion::Break | Completion::Continue => {
                    return Err(Error::Syntax(
                        "Illegal break or continue outside of a loop".into(),
                    ));
                }
            }
        }
        Ok(last)
    }

    /// Calls a callable value with an explicit `this` and arguments.
    pub fn call_value(
        &mut self,
        callee: &Value,
        this: Value,
        args: &[Value],
    ) -> Result<Value, Error> {
        let Value::Function(callable) = callee else {
            return Err(Error::Type(format!("{} is not a function", callee)));
        };

        match callable.as_ref() {
            Callable::Native { func, .. } => func(args),
            Callable::Script(function) => {
                if self.depth >= MAX_CALL_DEPTH {
                    return Err(Error::Range("Maximum call stack size exceeded".into()));
                }

                let env = Environment::with_outer(Rc::clone(&function.closure));
                {
                    let mut scope = env.borrow_mut();
                    if !function.is_arrow {
                        scope.declare("this".into(), this, false);
                    }
                    for (i, param) in function.params.iter().enumerate() {
                        let value = args.get(i).cloned().unwrap_or(Value::Undefined);
                        scope.declare(param.clone(), value, true);
                    }
                }
                self.hoist_functions(&function.body, &env);

                self.depth += 1;
                let result = self.exec_block_body(&function.body, &env);
                self.depth -= 1;

                match result? {
                    Completion::Return(value) => Ok(value),
                    _ => Ok(Value::Undefined),
                }
            }
        }
    }

    // ---- statements ----

    /// Pre-binds function declarations so they can be called before their
    /// definition site, matching the usual hoisting expectation.
    fn hoist_functions(&mut self, statements: &[Statement], env: &EnvRef) {
        for statement in statements {
            if let Statement::FunctionDeclaration(decl) = statement {
                let function = self.make_function(
                    Some(decl.id.name.clone()),
                    &decl.params,
                    &decl.body,
                    env,
                    false,
                );
                env.borrow_mut().declare(decl.id.name.clone(), function, true);
            }
        }
    }

    fn exec_statement(&mut self, statement: &Statement, env: &EnvRef) -> Result<Completion, Error> {
        match statement {
            Statement::VariableDeclaration(decl) => {
                let mutable = decl.kind != VariableKind::Const;
                for declarator in &decl.declarations {
                    let value = match &declarator.init {
                        Some(init) => self.eval(init, env)?,
                        None => Value::Undefined,
                    };
                    env.borrow_mut()
                        .declare(declarator.id.name.clone(), value, mutable);
                }
                Ok(Completion::Normal(Value::Undefined))
            }
            Statement::FunctionDeclaration(_) => {
                // Already bound during hoisting
                Ok(Completion::Normal(Value::Undefined))
            }
            Statement::Expression(stmt) => {
                let value = self.eval(&stmt.expression, env)?;
                Ok(Completion::Normal(value))
            }
            Statement::Block(block) => {
                let scope = Environment::with_outer(Rc::clone(env));
                self.hoist_functions(&block.body, &scope);
                self.exec_block_body(&block.body, &scope)
            }
            Statement::If(stmt) => {
                if self.eval(&stmt.test, env)?.to_boolean() {
                    self.exec_statement(&stmt.consequent, env)
                } else if let Some(alternate) = &stmt.alternate {
                    self.exec_statement(alternate, env)
                } else {
                    Ok(Completion::Normal(Value::Undefined))
                }
            }
            Statement::While(stmt) => {
                while self.eval(&stmt.test, env)?.to_boolean() {
                    match self.exec_statement(&stmt.body, env)? {
                        Completion::Break => break,
                        Completion::Return(value) => return Ok(Completion::Return(value)),
                        Completion::Normal(_) | Completion::Continue => {}
                    }
                }
                Ok(Completion::Normal(Value::Undefined))
            }
            Statement::For(stmt) => self.exec_for(stmt, env),
            Statement::Return(stmt) => {
                let value = match &stmt.argument {
                    Some(argument) => self.eval(argument, env)?,
                    None => Value::Undefined,
                };
                Ok(Completion::Return(value))
            }
            Statement::Break => Ok(Completion::Break),
            Statement::Continue => Ok(Completion::Continue),
            Statement::Throw(stmt) => {
                let value = self.eval(&stmt.argument, env)?;
                // Error objects surface their message; other values their
                // string form.
                let message = value
                    .get_property("message")
                    .map(|m| m.to_display_string())
                    .unwrap_or_else(|| value.to_display_string());
                Err(Error::Thrown(message))
            }
            Statement::Empty => Ok(Completion::Normal(Value::Undefined)),
        }
    }

    fn exec_block_body(
        &mut self,
        statements: &[Statement],
        env: &EnvRef,
    ) -> Result<Completion, Error> {
        for statement in statements {
            match self.exec_statement(statement, env)? {
                Completion::Normal(_) => {}
                other => return Ok(other),
            }
        }
        Ok(Completion::Normal(Value::Undefined))
    }

    fn exec_for(&mut self, stmt: &ForStatement, env: &EnvRef) -> Result<Completion, Error> {
        let scope = Environment::with_outer(Rc::clone(env));

        match &stmt.init {
            Some(ForInit::Declaration(decl)) => {
                self.exec_statement(&Statement::VariableDeclaration((**decl).clone()), &scope)?;
            }
            Some(ForInit::Expression(expression)) => {
                self.eval(expression, &scope)?;
            }
            None => {}
        }

        loop {
            if let Some(test) = &stmt.test {
                if !self.eval(test, &scope)?.to_boolean() {
                    break;
                }
            }

            match self.exec_statement(&stmt.body, &scope)? {
                Completion::Break => break,
                Completion::Return(value) => return Ok(Completion::Return(value)),
                Completion::Normal(_) | Completion::Continue => {}
            }

            if let Some(update) = &stmt.update {
                self.eval(update, &scope)?;
            }
        }

        Ok(Completion::Normal(Value::Undefined))
    }

    // ---- expressions ----

    fn eval(&mut self, expression: &Expression, env: &EnvRef) -> Result<Value, Error> {
        match expression {
            Expression::Literal(literal) => Ok(eval_literal(literal)),
            Expression::Identifier(id) => env
                .borrow()
                .get(&id.name)
                .ok_or_else(|| Error::Reference(format!("{} is not defined", id.name))),
            Expression::This => Ok(env.borrow().get("this").unwrap_or(Value::Undefined)),
            Expression::Template(template) => self.eval_template(template, env),
            Expression::Array(array) => {
                let mut elements = Vec::with_capacity(array.elements.len());
                for element in &array.elements {
                    elements.push(self.eval(element, env)?);
                }
                Ok(Value::array(elements))
            }
            Expression::Object(object) => {
                let value = Value::object();
                for property in &object.properties {
                    let evaluated = self.eval(&property.value, env)?;
                    value.set_property(property.key.clone(), evaluated);
                }
                Ok(value)
            }
            Expression::Binary(binary) => {
                let left = self.eval(&binary.left, env)?;
                let right = self.eval(&binary.right, env)?;
                operators::binary(binary.operator, &left, &right)
            }
            Expression::Logical(logical) => {
                let left = self.eval(&logical.left, env)?;
                match logical.operator {
                    LogicalOperator::And => {
                        if left.to_boolean() {
                            self.eval(&logical.right, env)
                        } else {
                            Ok(left)
                        }
                    }
                    LogicalOperator::Or => {
                        if left.to_boolean() {
                            Ok(left)
                        } else {
                            self.eval(&logical.right, env)
                        }
                    }
                }
            }
            Expression::Unary(unary) => {
                // typeof on an unbound name yields "undefined", not an error
                if unary.operator == UnaryOperator::Typeof {
                    if let Expression::Identifier(id) = unary.argument.as_ref() {
                        if !env.borrow().has(&id.name) {
                            return Ok(Value::String("undefined".into()));
                        }
                    }
                }
                let operand = self.eval(&unary.argument, env)?;
                Ok(operators::unary(unary.operator, &operand))
            }
            Expression::Assignment(assignment) => self.eval_assignment(assignment, env),
            Expression::Update(update) => self.eval_update(update, env),
            Expression::Conditional(conditional) => {
                if self.eval(&conditional.test, env)?.to_boolean() {
                    self.eval(&conditional.consequent, env)
                } else {
                    self.eval(&conditional.alternate, env)
                }
            }
            Expression::Member(member) => {
                let object = self.eval(&member.object, env)?;
                let key = self.member_key(&member.property, env)?;
                self.get_member(&object, &key)
            }
            Expression::Call(call) => self.eval_call(call, env),
            Expression::Function(function) => Ok(self.make_function(
                function.id.as_ref().map(|id| id.name.clone()),
                &function.params,
                &function.body,
                env,
                false,
            )),
            Expression::Arrow(arrow) => {
                let body = match &arrow.body {
                    ArrowBody::Block(statements) => statements.clone(),
                    ArrowBody::Expression(expression) => {
                        vec![Statement::Return(ReturnStatement {
                            argument: Some((**expression).clone()),
                        })]
                    }
                };
                Ok(self.make_arrow(&arrow.params, body, env))
            }
        }
    }

    fn eval_template(
        &mut self,
        template: &TemplateLiteral,
        env: &EnvRef,
    ) -> Result<Value, Error> {
        let mut out = String::new();
        for part in &template.parts {
            match part {
                TemplatePart::Text(text) => out.push_str(text),
                TemplatePart::Expression(expression) => {
                    let value = self.eval(expression, env)?;
                    out.push_str(&value.to_display_string());
                }
            }
        }
        Ok(Value::String(out))
    }

    fn eval_assignment(
        &mut self,
        assignment: &AssignmentExpression,
        env: &EnvRef,
    ) -> Result<Value, Error> {
        let value = if assignment.operator == AssignmentOperator::Assign {
            self.eval(&assignment.right, env)?
        } else {
            let operator = match assignment.operator {
                AssignmentOperator::AddAssign => BinaryOperator::Add,
                AssignmentOperator::SubtractAssign => BinaryOperator::Subtract,
                AssignmentOperator::MultiplyAssign => BinaryOperator::Multiply,
                AssignmentOperator::DivideAssign => BinaryOperator::Divide,
                AssignmentOperator::ModuloAssign => BinaryOperator::Modulo,
                AssignmentOperator::Assign => unreachable!(),
            };
            let current = self.eval(&assignment.left, env)?;
            let right = self.eval(&assignment.right, env)?;
            operators::binary(operator, &current, &right)?
        };

        self.store(&assignment.left, value.clone(), env)?;
        Ok(value)
    }

    fn eval_update(&mut self, update: &UpdateExpression, env: &EnvRef) -> Result<Value, Error> {
        let old = self.eval(&update.argument, env)?.to_number();
        let new = match update.operator {
            UpdateOperator::Increment => old + 1.0,
            UpdateOperator::Decrement => old - 1.0,
        };
        self.store(&update.argument, Value::Number(new), env)?;
        Ok(Value::Number(if update.prefix { new } else { old }))
    }

    /// Stores a value through an assignable expression (identifier or
    /// member access).
    fn store(&mut self, target: &Expression, value: Value, env: &EnvRef) -> Result<(), Error> {
        match target {
            Expression::Identifier(id) => {
                if env.borrow_mut().assign(&id.name, value) {
                    Ok(())
                } else if env.borrow().has(&id.name) {
                    Err(Error::Type(format!(
                        "Assignment to constant variable '{}'",
                        id.name
                    )))
                } else {
                    Err(Error::Reference(format!("{} is not defined", id.name)))
                }
            }
            Expression::Member(member) => {
                let object = self.eval(&member.object, env)?;
                let key = self.member_key(&member.property, env)?;
                self.set_member(&object, &key, value)
            }
            _ => Err(Error::Syntax("Invalid assignment target".into())),
        }
    }

    fn member_key(&mut self, property: &MemberProperty, env: &EnvRef) -> Result<String, Error> {
        match property {
            MemberProperty::Identifier(id) => Ok(id.name.clone()),
            MemberProperty::Expression(expression) => {
                Ok(self.eval(expression, env)?.to_display_string())
            }
        }
    }

    fn get_member(&mut self, object: &Value, key: &str) -> Result<Value, Error> {
        match object {
            Value::Object(inner) => Ok(inner.borrow().get(key).cloned().unwrap_or(Value::Undefined)),
            Value::Array(elements) => {
                if key == "length" {
                    return Ok(Value::Number(elements.borrow().len() as f64));
                }
                if let Ok(index) = key.parse::<usize>() {
                    return Ok(elements
                        .borrow()
                        .get(index)
                        .cloned()
                        .unwrap_or(Value::Undefined));
                }
                Ok(Value::Undefined)
            }
            Value::String(s) => {
                if key == "length" {
                    return Ok(Value::Number(s.chars().count() as f64));
                }
                if let Ok(index) = key.parse::<usize>() {
                    return Ok(s
                        .chars()
                        .nth(index)
                        .map(|c| Value::String(c.to_string()))
                        .unwrap_or(Value::Undefined));
                }
                Ok(Value::Undefined)
            }
            Value::Undefined | Value::Null => Err(Error::Type(format!(
                "Cannot read properties of {} (reading '{}')",
                object.type_of_nullish(),
                key
            ))),
            _ => Ok(Value::Undefined),
        }
    }

    fn set_member(&mut self, object: &Value, key: &str, value: Value) -> Result<(), Error> {
        match object {
            Value::Object(inner) => {
                inner.borrow_mut().set(key.to_string(), value);
                Ok(())
            }
            Value::Array(elements) => {
                if let Ok(index) = key.parse::<usize>() {
                    let mut elements = elements.borrow_mut();
                    if index >= elements.len() {
                        elements.resize(index + 1, Value::Undefined);
                    }
                    elements[index] = value;
                    Ok(())
                } else {
                    Ok(()) // Non-index properties on arrays are dropped
                }
            }
            Value::Undefined | Value::Null => Err(Error::Type(format!(
                "Cannot set properties of {} (setting '{}')",
                object.type_of_nullish(),
                key
            ))),
            _ => Ok(()),
        }
    }

    fn eval_call(&mut self, call: &CallExpression, env: &EnvRef) -> Result<Value, Error> {
        let mut args = Vec::with_capacity(call.arguments.len());

        // Method call: resolve the receiver first so `this` binds to it
        if let Expression::Member(member) = call.callee.as_ref() {
            let receiver = self.eval(&member.object, env)?;
            let key = self.member_key(&member.property, env)?;

            for argument in &call.arguments {
                args.push(self.eval(argument, env)?);
            }

            // A function-valued property wins over intrinsic methods
            if let Value::Object(inner) = &receiver {
                let property = inner.borrow().get(&key).cloned();
                if let Some(function @ Value::Function(_)) = property {
                    return self.call_value(&function, receiver.clone(), &args);
                }
            }

            return methods::call_intrinsic(self, &receiver, &key, &args);
        }

        let callee = self.eval(&call.callee, env)?;
        for argument in &call.arguments {
            args.push(self.eval(argument, env)?);
        }
        self.call_value(&callee, Value::Undefined, &args)
    }

    fn make_function(
        &mut self,
        name: Option<String>,
        params: &[Identifier],
        body: &[Statement],
        env: &EnvRef,
        is_arrow: bool,
    ) -> Value {
        Value::Function(Rc::new(Callable::Script(ScriptFunction {
            name,
            params: params.iter().map(|p| p.name.clone()).collect(),
            body: Rc::new(body.to_vec()),
            closure: Rc::clone(env),
            is_arrow,
        })))
    }

    fn make_arrow(&mut self, params: &[Identifier], body: Vec<Statement>, env: &EnvRef) -> Value {
        Value::Function(Rc::new(Callable::Script(ScriptFunction {
            name: None,
            params: params.iter().map(|p| p.name.clone()).collect(),
            body: Rc::new(body),
            closure: Rc::clone(env),
            is_arrow: true,
        })))
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

fn eval_literal(literal: &Literal) -> Value {
    match literal {
        Literal::Number(n) => Value::Number(*n),
        Literal::String(s) => Value::String(s.clone()),
        Literal::Boolean(b) => Value::Boolean(*b),
        Literal::Null => Value::Null,
        Literal::Undefined => Value::Undefined,
    }
}

impl Value {
    /// "undefined" or "null" for error messages; only meaningful for
    /// nullish values.
    fn type_of_nullish(&self) -> &'static str {
        match self {
            Value::Null => "null",
            _ => "undefined",
        }
    }
}
