//! Abstract Syntax Tree (AST) definitions for the script subset.
//!
//! These structures are designed to be ESTree-compatible where possible.

/// A complete program.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// The statements in the program
    pub body: Vec<Statement>,
}

/// An identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    /// The name of the identifier
    pub name: String,
}

/// A statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Variable declaration (var, let, const)
    VariableDeclaration(VariableDeclaration),
    /// Function declaration
    FunctionDeclaration(FunctionDeclaration),
    /// Expression statement
    Expression(ExpressionStatement),
    /// Block statement { ... }
    Block(BlockStatement),
    /// If statement
    If(IfStatement),
    /// While statement
    While(WhileStatement),
    /// For statement
    For(ForStatement),
    /// Return statement
    Return(ReturnStatement),
    /// Break statement
    Break,
    /// Continue statement
    Continue,
    /// Throw statement
    Throw(ThrowStatement),
    /// Empty statement (;)
    Empty,
}

/// Variable declaration kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    /// var declaration
    Var,
    /// let declaration
    Let,
    /// const declaration
    Const,
}

/// A variable declaration statement.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaration {
    /// The kind of declaration
    pub kind: VariableKind,
    /// The declarators
    pub declarations: Vec<VariableDeclarator>,
}

/// A single variable declarator.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclarator {
    /// The identifier being declared
    pub id: Identifier,
    /// Optional initializer expression
    pub init: Option<Expression>,
}

/// A function declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDeclaration {
    /// The function name
    pub id: Identifier,
    /// The parameters
    pub params: Vec<Identifier>,
    /// The function body
    pub body: Vec<Statement>,
}

/// An expression statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatement {
    /// The expression
    pub expression: Expression,
}

/// A block statement.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockStatement {
    /// The statements in the block
    pub body: Vec<Statement>,
}

/// An if statement.
#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    /// The condition
    pub test: Expression,
    /// The then branch
    pub consequent: Box<Statement>,
    /// The optional else branch
    pub alternate: Option<Box<Statement>>,
}

/// A while statement.
#[derive(Debug, Clone, PartialEq)]
pub struct WhileStatement {
    /// The condition
    pub test: Expression,
    /// The loop body
    pub body: Box<Statement>,
}

/// A for statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ForStatement {
    /// The initializer
    pub init: Option<ForInit>,
    /// The condition
    pub test: Option<Expression>,
    /// The update expression
    pub update: Option<Expression>,
    /// The loop body
    pub body: Box<Statement>,
}

/// For loop initializer.
#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    /// Variable declaration
    Declaration(Box<VariableDeclaration>),
    /// Expression
    Expression(Expression),
}

/// A return statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    /// The return value
    pub argument: Option<Expression>,
}

/// A throw statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ThrowStatement {
    /// The thrown expression
    pub argument: Expression,
}

/// An expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Literal value
    Literal(Literal),
    /// Identifier reference
    Identifier(Identifier),
    /// this keyword
    This,
    /// Template literal with interpolated parts
    Template(TemplateLiteral),
    /// Array literal
    Array(ArrayExpression),
    /// Object literal
    Object(ObjectExpression),
    /// Binary expression
    Binary(BinaryExpression),
    /// Logical expression (short-circuiting)
    Logical(LogicalExpression),
    /// Unary expression
    Unary(UnaryExpression),
    /// Assignment expression
    Assignment(AssignmentExpression),
    /// Call expression
    Call(CallExpression),
    /// Member access expression
    Member(MemberExpression),
    /// Conditional (ternary) expression
    Conditional(ConditionalExpression),
    /// Function expression
    Function(FunctionExpression),
    /// Arrow function expression
    Arrow(ArrowFunctionExpression),
    /// Update expression (++/--)
    Update(UpdateExpression),
}

/// A literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Numeric literal
    Number(f64),
    /// String literal
    String(String),
    /// Boolean literal
    Boolean(bool),
    /// null literal
    Null,
    /// undefined literal
    Undefined,
}

/// A template literal split into literal and interpolated parts.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateLiteral {
    /// The parts in source order
    pub parts: Vec<TemplatePart>,
}

/// One part of a template literal.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplatePart {
    /// Literal text
    Text(String),
    /// An interpolated `${...}` expression
    Expression(Expression),
}

/// An array expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayExpression {
    /// The elements
    pub elements: Vec<Expression>,
}

/// An object expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectExpression {
    /// The properties
    pub properties: Vec<ObjectProperty>,
}

/// An object literal property.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectProperty {
    /// The property key
    pub key: String,
    /// The property value
    pub value: Expression,
}

/// A binary expression.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpression {
    /// The operator
    pub operator: BinaryOperator,
    /// The left operand
    pub left: Box<Expression>,
    /// The right operand
    pub right: Box<Expression>,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Equal,
    NotEqual,
    StrictEqual,
    StrictNotEqual,
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,
}

/// A logical expression.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalExpression {
    /// The operator
    pub operator: LogicalOperator,
    /// The left operand
    pub left: Box<Expression>,
    /// The right operand
    pub right: Box<Expression>,
}

/// Logical operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    /// &&
    And,
    /// ||
    Or,
}

/// A unary expression.
#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpression {
    /// The operator
    pub operator: UnaryOperator,
    /// The operand
    pub argument: Box<Expression>,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    /// -
    Minus,
    /// +
    Plus,
    /// !
    LogicalNot,
    /// typeof
    Typeof,
}

/// An assignment expression.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentExpression {
    /// The operator
    pub operator: AssignmentOperator,
    /// The left-hand side
    pub left: Box<Expression>,
    /// The right-hand side
    pub right: Box<Expression>,
}

/// Assignment operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentOperator {
    Assign,
    AddAssign,
    SubtractAssign,
    MultiplyAssign,
    DivideAssign,
    ModuloAssign,
}

/// A function call expression.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
    /// The function being called
    pub callee: Box<Expression>,
    /// The arguments
    pub arguments: Vec<Expression>,
}

/// A member access expression.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberExpression {
    /// The object
    pub object: Box<Expression>,
    /// The property
    pub property: MemberProperty,
}

/// Member property.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberProperty {
    /// Identifier property (dot notation)
    Identifier(Identifier),
    /// Computed property expression (bracket notation)
    Expression(Box<Expression>),
}

/// A conditional (ternary) expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalExpression {
    /// The condition
    pub test: Box<Expression>,
    /// The consequent (if true)
    pub consequent: Box<Expression>,
    /// The alternate (if false)
    pub alternate: Box<Expression>,
}

/// A function expression.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionExpression {
    /// Optional name
    pub id: Option<Identifier>,
    /// Parameters
    pub params: Vec<Identifier>,
    /// Body
    pub body: Vec<Statement>,
}

/// An arrow function expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowFunctionExpression {
    /// Parameters
    pub params: Vec<Identifier>,
    /// Body (expression or block)
    pub body: ArrowBody,
}

/// Arrow function body.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrowBody {
    /// Expression body
    Expression(Box<Expression>),
    /// Block body
    Block(Vec<Statement>),
}

/// An update expression (++/--)
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateExpression {
    /// The operator
    pub operator: UpdateOperator,
    /// The operand
    pub argument: Box<Expression>,
    /// Whether prefix (++x) or postfix (x++)
    pub prefix: bool,
}

/// Update operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOperator {
    /// ++
    Increment,
    /// --
    Decrement,
}
