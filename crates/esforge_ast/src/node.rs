//! AST node definitions.
//!
//! Every node owns its children (`Box`/`Vec`), carries a [`NodeData`] with its
//! kind and source range, and is serializable so that a tree produced by
//! `parse` can be handed back to `print` or `transform` unchanged.

use crate::syntax_kind::SyntaxKind;
use crate::types::*;
use esforge_core::text::TextRange;
use serde::{Deserialize, Serialize};

// ============================================================================
// Core Node Wrapper
// ============================================================================

/// Common data shared by all AST nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    pub kind: SyntaxKind,
    pub range: TextRange,
    #[serde(default, skip_serializing_if = "NodeFlags::is_empty")]
    pub flags: NodeFlags,
    #[serde(default, skip_serializing_if = "ModifierFlags::is_empty")]
    pub modifier_flags: ModifierFlags,
}

impl NodeData {
    pub fn new(kind: SyntaxKind, pos: u32, end: u32) -> Self {
        Self {
            kind,
            range: TextRange::new(pos, end),
            flags: NodeFlags::NONE,
            modifier_flags: ModifierFlags::NONE,
        }
    }

    /// Data for a node created by a transform.
    pub fn synthesized(kind: SyntaxKind) -> Self {
        Self {
            kind,
            range: TextRange::DUMMY,
            flags: NodeFlags::SYNTHESIZED,
            modifier_flags: ModifierFlags::NONE,
        }
    }

    pub fn with_modifiers(mut self, modifiers: ModifierFlags) -> Self {
        self.modifier_flags = modifiers;
        self
    }

    pub fn with_flags(mut self, flags: NodeFlags) -> Self {
        self.flags |= flags;
        self
    }

    #[inline]
    pub fn has_modifier(&self, modifier: ModifierFlags) -> bool {
        self.modifier_flags.intersects(modifier)
    }
}

// ============================================================================
// Program
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub data: NodeData,
    pub source_type: SourceType,
    pub statements: Vec<Statement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shebang: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub kind: CommentKind,
    /// Raw comment text including its delimiters.
    pub text: String,
    pub range: TextRange,
    pub has_preceding_line_break: bool,
}

// ============================================================================
// Names and literals
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identifier {
    pub data: NodeData,
    #[serde(default)]
    pub id: NodeId,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StringLiteral {
    pub data: NodeData,
    /// Cooked value.
    pub value: String,
    /// Source text including quotes, when the literal came from source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericLiteral {
    pub data: NodeData,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BigIntLiteral {
    pub data: NodeData,
    /// Digits including the trailing `n`.
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegularExpressionLiteral {
    pub data: NodeData,
    pub pattern: String,
    pub flags: String,
}

/// One literal chunk of a template (`head`, `middle`, `tail` or the whole
/// no-substitution template).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateElement {
    pub data: NodeData,
    pub raw: String,
    /// `None` when the raw text contains an invalid escape (allowed in tagged templates).
    pub cooked: Option<String>,
}

/// `` `a${b}c` ``: `quasis.len() == expressions.len() + 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateLiteral {
    pub data: NodeData,
    pub quasis: Vec<TemplateElement>,
    pub expressions: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputedPropertyName {
    pub data: NodeData,
    pub expression: Box<Expression>,
}

/// Name of a property, method, enum member or object literal entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyName {
    Identifier(Identifier),
    PrivateIdentifier(Identifier),
    StringLiteral(StringLiteral),
    NumericLiteral(NumericLiteral),
    BigIntLiteral(BigIntLiteral),
    Computed(ComputedPropertyName),
}

/// Name in an import/export specifier: an identifier or an arbitrary string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ModuleExportName {
    Identifier(Identifier),
    StringLiteral(StringLiteral),
}

impl ModuleExportName {
    pub fn text(&self) -> &str {
        match self {
            ModuleExportName::Identifier(id) => &id.text,
            ModuleExportName::StringLiteral(s) => &s.value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualifiedName {
    pub data: NodeData,
    pub left: EntityName,
    pub right: Identifier,
}

/// `A` or `A.B.C` in type positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityName {
    Identifier(Identifier),
    Qualified(Box<QualifiedName>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decorator {
    pub data: NodeData,
    pub expression: Expression,
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    Identifier(Identifier),
    /// `#x` in `#x in obj`.
    PrivateIdentifier(Identifier),
    This(NodeData),
    Super(NodeData),
    Null(NodeData),
    Boolean(BooleanLiteral),
    StringLiteral(StringLiteral),
    NumericLiteral(NumericLiteral),
    BigIntLiteral(BigIntLiteral),
    RegularExpressionLiteral(RegularExpressionLiteral),
    Template(TemplateLiteral),
    TaggedTemplate(TaggedTemplateExpression),
    ArrayLiteral(ArrayLiteralExpression),
    ObjectLiteral(ObjectLiteralExpression),
    Function(Box<Function>),
    Arrow(Box<ArrowFunction>),
    Class(Box<Class>),
    PropertyAccess(PropertyAccessExpression),
    ElementAccess(ElementAccessExpression),
    Call(CallExpression),
    New(NewExpression),
    /// The `import` callee of a dynamic `import(...)` call.
    Import(NodeData),
    MetaProperty(MetaProperty),
    Parenthesized(ParenthesizedExpression),
    PrefixUnary(PrefixUnaryExpression),
    PostfixUnary(PostfixUnaryExpression),
    Await(AwaitExpression),
    Yield(YieldExpression),
    Binary(BinaryExpression),
    Conditional(ConditionalExpression),
    Spread(SpreadElement),
    /// Hole in an array literal.
    Omitted(NodeData),
    As(AsExpression),
    Satisfies(SatisfiesExpression),
    TypeAssertion(TypeAssertion),
    NonNull(NonNullExpression),
    JsxElement(Box<JsxElement>),
    JsxFragment(Box<JsxFragment>),
    /// Error placeholder emitted by the parser.
    Missing(NodeData),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BooleanLiteral {
    pub data: NodeData,
    pub value: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaggedTemplateExpression {
    pub data: NodeData,
    pub tag: Box<Expression>,
    pub type_arguments: Option<Vec<TypeNode>>,
    pub template: TemplateLiteral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayLiteralExpression {
    pub data: NodeData,
    pub elements: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectLiteralExpression {
    pub data: NodeData,
    pub properties: Vec<ObjectLiteralElement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObjectLiteralElement {
    Property(PropertyAssignment),
    Shorthand(ShorthandPropertyAssignment),
    Spread(SpreadAssignment),
    Method(MethodDeclaration),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyAssignment {
    pub data: NodeData,
    pub name: PropertyName,
    pub initializer: Expression,
}

/// `{ a }` or, in destructuring assignment targets, `{ a = 1 }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShorthandPropertyAssignment {
    pub data: NodeData,
    pub name: Identifier,
    pub object_assignment_initializer: Option<Box<Expression>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadAssignment {
    pub data: NodeData,
    pub expression: Expression,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyAccessExpression {
    pub data: NodeData,
    pub expression: Box<Expression>,
    pub question_dot: bool,
    /// Identifier or private identifier (`#x`).
    pub name: Identifier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementAccessExpression {
    pub data: NodeData,
    pub expression: Box<Expression>,
    pub question_dot: bool,
    pub argument: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallExpression {
    pub data: NodeData,
    pub expression: Box<Expression>,
    pub question_dot: bool,
    pub type_arguments: Option<Vec<TypeNode>>,
    pub arguments: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpression {
    pub data: NodeData,
    pub expression: Box<Expression>,
    pub type_arguments: Option<Vec<TypeNode>>,
    /// `None` for `new Foo` without parentheses.
    pub arguments: Option<Vec<Expression>>,
}

/// `new.target` or `import.meta`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaProperty {
    pub data: NodeData,
    pub keyword: SyntaxKind,
    pub name: Identifier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParenthesizedExpression {
    pub data: NodeData,
    pub expression: Box<Expression>,
}

/// Prefix operators, including `typeof`, `void` and `delete`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrefixUnaryExpression {
    pub data: NodeData,
    pub operator: SyntaxKind,
    pub operand: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostfixUnaryExpression {
    pub data: NodeData,
    pub operand: Box<Expression>,
    pub operator: SyntaxKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AwaitExpression {
    pub data: NodeData,
    pub expression: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldExpression {
    pub data: NodeData,
    pub delegate: bool,
    pub expression: Option<Box<Expression>>,
}

/// Binary operators, assignments and the comma operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryExpression {
    pub data: NodeData,
    pub left: Box<Expression>,
    pub operator: SyntaxKind,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalExpression {
    pub data: NodeData,
    pub condition: Box<Expression>,
    pub when_true: Box<Expression>,
    pub when_false: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadElement {
    pub data: NodeData,
    pub expression: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AsExpression {
    pub data: NodeData,
    pub expression: Box<Expression>,
    pub type_node: Box<TypeNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SatisfiesExpression {
    pub data: NodeData,
    pub expression: Box<Expression>,
    pub type_node: Box<TypeNode>,
}

/// `<T>expr`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeAssertion {
    pub data: NodeData,
    pub type_node: Box<TypeNode>,
    pub expression: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NonNullExpression {
    pub data: NodeData,
    pub expression: Box<Expression>,
}

// ============================================================================
// Functions and classes
// ============================================================================

/// Shared shape of function declarations, function expressions, methods and
/// constructors. `body` is `None` for overload signatures and ambient
/// declarations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Function {
    pub data: NodeData,
    pub name: Option<Identifier>,
    pub is_async: bool,
    pub is_generator: bool,
    pub type_parameters: Option<Vec<TypeParameter>>,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<TypeNode>,
    pub body: Option<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrowFunction {
    pub data: NodeData,
    pub is_async: bool,
    pub type_parameters: Option<Vec<TypeParameter>>,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<TypeNode>,
    pub body: ArrowBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArrowBody {
    Block(Block),
    Expression(Box<Expression>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    /// Accessibility/readonly modifiers make this a parameter property.
    pub data: NodeData,
    pub decorators: Vec<Decorator>,
    pub dot_dot_dot: bool,
    pub name: BindingName,
    pub question: bool,
    pub type_annotation: Option<TypeNode>,
    pub initializer: Option<Expression>,
}

/// Target of a declaration: a plain name or a destructuring pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BindingName {
    Identifier(Identifier),
    Object(ObjectBindingPattern),
    Array(ArrayBindingPattern),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectBindingPattern {
    pub data: NodeData,
    pub elements: Vec<BindingElement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayBindingPattern {
    pub data: NodeData,
    /// `None` for elisions.
    pub elements: Vec<Option<BindingElement>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingElement {
    pub data: NodeData,
    pub dot_dot_dot: bool,
    pub property_name: Option<PropertyName>,
    pub name: BindingName,
    pub initializer: Option<Expression>,
}

/// Class declaration or expression. Modifiers (`export`, `default`,
/// `abstract`, `declare`) live in `data.modifier_flags`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub data: NodeData,
    pub decorators: Vec<Decorator>,
    pub name: Option<Identifier>,
    pub type_parameters: Option<Vec<TypeParameter>>,
    pub extends: Option<Box<Expression>>,
    pub super_type_arguments: Option<Vec<TypeNode>>,
    pub implements: Vec<ExpressionWithTypeArguments>,
    pub members: Vec<ClassElement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpressionWithTypeArguments {
    pub data: NodeData,
    pub expression: Expression,
    pub type_arguments: Option<Vec<TypeNode>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClassElement {
    Property(PropertyDeclaration),
    Method(MethodDeclaration),
    Constructor(ConstructorDeclaration),
    IndexSignature(IndexSignature),
    StaticBlock(ClassStaticBlock),
    Semicolon(NodeData),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDeclaration {
    pub data: NodeData,
    pub decorators: Vec<Decorator>,
    pub name: PropertyName,
    pub question: bool,
    pub exclamation: bool,
    pub type_annotation: Option<TypeNode>,
    pub initializer: Option<Expression>,
}

/// Method, getter or setter, in a class body or an object literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDeclaration {
    pub data: NodeData,
    pub decorators: Vec<Decorator>,
    pub kind: MethodKind,
    pub name: PropertyName,
    pub question: bool,
    pub function: Function,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructorDeclaration {
    pub data: NodeData,
    pub function: Function,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexSignature {
    pub data: NodeData,
    pub parameters: Vec<Parameter>,
    pub type_annotation: Option<TypeNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassStaticBlock {
    pub data: NodeData,
    pub body: Block,
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    Block(Block),
    Empty(NodeData),
    Variable(VariableStatement),
    Expression(ExpressionStatement),
    If(IfStatement),
    Do(DoStatement),
    While(WhileStatement),
    For(ForStatement),
    ForIn(ForInStatement),
    ForOf(ForOfStatement),
    Continue(JumpStatement),
    Break(JumpStatement),
    Return(ReturnStatement),
    With(WithStatement),
    Switch(SwitchStatement),
    Labeled(LabeledStatement),
    Throw(ThrowStatement),
    Try(TryStatement),
    Debugger(NodeData),
    Function(Box<Function>),
    Class(Box<Class>),
    Interface(Box<InterfaceDeclaration>),
    TypeAlias(Box<TypeAliasDeclaration>),
    Enum(Box<EnumDeclaration>),
    Module(Box<ModuleDeclaration>),
    Import(ImportDeclaration),
    ImportEquals(ImportEqualsDeclaration),
    Export(ExportDeclaration),
    ExportAssignment(ExportAssignment),
    NamespaceExport(NamespaceExportDeclaration),
    /// Error placeholder covering tokens skipped during recovery.
    Missing(NodeData),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub data: NodeData,
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableStatement {
    pub data: NodeData,
    pub declaration_list: VariableDeclarationList,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDeclarationList {
    pub data: NodeData,
    pub kind: VariableKind,
    pub declarations: Vec<VariableDeclaration>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableDeclaration {
    pub data: NodeData,
    pub name: BindingName,
    pub exclamation: bool,
    pub type_annotation: Option<TypeNode>,
    pub initializer: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionStatement {
    pub data: NodeData,
    pub expression: Expression,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IfStatement {
    pub data: NodeData,
    pub condition: Expression,
    pub then_statement: Box<Statement>,
    pub else_statement: Option<Box<Statement>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoStatement {
    pub data: NodeData,
    pub statement: Box<Statement>,
    pub condition: Expression,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhileStatement {
    pub data: NodeData,
    pub condition: Expression,
    pub statement: Box<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ForInitializer {
    Variable(VariableDeclarationList),
    Expression(Expression),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForStatement {
    pub data: NodeData,
    pub initializer: Option<ForInitializer>,
    pub condition: Option<Expression>,
    pub incrementor: Option<Expression>,
    pub statement: Box<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForInStatement {
    pub data: NodeData,
    pub initializer: ForInitializer,
    pub expression: Expression,
    pub statement: Box<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForOfStatement {
    pub data: NodeData,
    pub is_await: bool,
    pub initializer: ForInitializer,
    pub expression: Expression,
    pub statement: Box<Statement>,
}

/// `break` or `continue`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JumpStatement {
    pub data: NodeData,
    pub label: Option<Identifier>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnStatement {
    pub data: NodeData,
    pub expression: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithStatement {
    pub data: NodeData,
    pub expression: Expression,
    pub statement: Box<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchStatement {
    pub data: NodeData,
    pub expression: Expression,
    pub clauses: Vec<CaseClause>,
}

/// `case expr:` or, when `expression` is `None`, `default:`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseClause {
    pub data: NodeData,
    pub expression: Option<Expression>,
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledStatement {
    pub data: NodeData,
    pub label: Identifier,
    pub statement: Box<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThrowStatement {
    pub data: NodeData,
    pub expression: Expression,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TryStatement {
    pub data: NodeData,
    pub try_block: Block,
    pub catch_clause: Option<CatchClause>,
    pub finally_block: Option<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatchClause {
    pub data: NodeData,
    /// `None` for an optional catch binding (`catch { }`).
    pub variable_declaration: Option<VariableDeclaration>,
    pub block: Block,
}

// ============================================================================
// TypeScript declarations
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceDeclaration {
    pub data: NodeData,
    pub name: Identifier,
    pub type_parameters: Option<Vec<TypeParameter>>,
    pub extends: Vec<ExpressionWithTypeArguments>,
    pub members: Vec<TypeElement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeAliasDeclaration {
    pub data: NodeData,
    pub name: Identifier,
    pub type_parameters: Option<Vec<TypeParameter>>,
    pub type_node: TypeNode,
}

/// `enum` / `const enum`; `const` lives in the modifier flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumDeclaration {
    pub data: NodeData,
    pub name: Identifier,
    pub members: Vec<EnumMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumMember {
    pub data: NodeData,
    pub name: PropertyName,
    pub initializer: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ModuleName {
    Identifier(Identifier),
    StringLiteral(StringLiteral),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ModuleBody {
    Block(ModuleBlock),
    /// Inner declaration of `namespace A.B { }`.
    Namespace(Box<ModuleDeclaration>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleBlock {
    pub data: NodeData,
    pub statements: Vec<Statement>,
}

/// `namespace N { }`, `module "m" { }`, `declare global { }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleDeclaration {
    pub data: NodeData,
    pub name: ModuleName,
    pub body: Option<ModuleBody>,
}

// ============================================================================
// Modules
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportDeclaration {
    pub data: NodeData,
    /// `None` for a side-effect import (`import "x"`).
    pub import_clause: Option<ImportClause>,
    pub module_specifier: StringLiteral,
    pub attributes: Option<ImportAttributes>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportClause {
    pub data: NodeData,
    pub is_type_only: bool,
    /// Default import binding.
    pub name: Option<Identifier>,
    pub named_bindings: Option<NamedImportBindings>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NamedImportBindings {
    /// `* as ns`
    Namespace(Identifier),
    /// `{ a, b as c }`
    Named(Vec<ImportSpecifier>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSpecifier {
    pub data: NodeData,
    pub is_type_only: bool,
    /// Imported name when it differs from the local name.
    pub property_name: Option<ModuleExportName>,
    pub name: Identifier,
}

impl ImportSpecifier {
    /// The name as exported by the source module.
    pub fn imported_name(&self) -> &str {
        match &self.property_name {
            Some(name) => name.text(),
            None => &self.name.text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportAttributes {
    pub data: NodeData,
    /// `with` or `assert`.
    pub keyword: SyntaxKind,
    pub elements: Vec<ImportAttribute>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportAttribute {
    pub data: NodeData,
    pub name: ModuleExportName,
    pub value: StringLiteral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ModuleReference {
    /// `require("x")`
    External(StringLiteral),
    Entity(EntityName),
}

/// `import x = require("y")` or `import x = A.B`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportEqualsDeclaration {
    pub data: NodeData,
    pub is_type_only: bool,
    pub name: Identifier,
    pub module_reference: ModuleReference,
}

/// `export { a }`, `export * from "x"`, `export * as ns from "x"`,
/// `export { a } from "x"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDeclaration {
    pub data: NodeData,
    pub is_type_only: bool,
    /// `None` for `export *`.
    pub export_clause: Option<ExportClause>,
    pub module_specifier: Option<StringLiteral>,
    pub attributes: Option<ImportAttributes>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExportClause {
    Namespace(ModuleExportName),
    Named(Vec<ExportSpecifier>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSpecifier {
    pub data: NodeData,
    pub is_type_only: bool,
    /// Local (or re-exported) name when it differs from the exported name.
    pub property_name: Option<ModuleExportName>,
    pub name: ModuleExportName,
}

impl ExportSpecifier {
    /// The local name (or source module's export name for re-exports).
    pub fn local_name(&self) -> &str {
        match &self.property_name {
            Some(name) => name.text(),
            None => self.name.text(),
        }
    }
}

/// `export default expr` or `export = expr`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportAssignment {
    pub data: NodeData,
    pub is_export_equals: bool,
    pub expression: Expression,
}

/// `export as namespace X;`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamespaceExportDeclaration {
    pub data: NodeData,
    pub name: Identifier,
}

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeNode {
    /// `number`, `string`, `any`, ... (`data.kind` is the keyword kind).
    Keyword(NodeData),
    Reference(TypeReference),
    Function(Box<FunctionType>),
    Query(TypeQuery),
    Literal(TypeLiteral),
    Array(ArrayType),
    Tuple(TupleType),
    NamedTupleMember(NamedTupleMember),
    Optional(WrappedType),
    Rest(WrappedType),
    Union(UnionOrIntersectionType),
    Intersection(UnionOrIntersectionType),
    Conditional(Box<ConditionalType>),
    Infer(Box<InferType>),
    Parenthesized(WrappedType),
    This(NodeData),
    Operator(TypeOperator),
    IndexedAccess(IndexedAccessType),
    Mapped(Box<MappedType>),
    LiteralType(LiteralType),
    TemplateLiteral(TemplateLiteralType),
    Import(Box<ImportType>),
    Predicate(TypePredicate),
    Missing(NodeData),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeReference {
    pub data: NodeData,
    pub type_name: EntityName,
    pub type_arguments: Option<Vec<TypeNode>>,
}

/// Function type or, with `is_constructor`, constructor type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionType {
    pub data: NodeData,
    pub is_constructor: bool,
    pub type_parameters: Option<Vec<TypeParameter>>,
    pub parameters: Vec<Parameter>,
    pub return_type: TypeNode,
}

/// `typeof x`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeQuery {
    pub data: NodeData,
    pub expr_name: EntityName,
    pub type_arguments: Option<Vec<TypeNode>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeLiteral {
    pub data: NodeData,
    pub members: Vec<TypeElement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrayType {
    pub data: NodeData,
    pub element_type: Box<TypeNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TupleType {
    pub data: NodeData,
    pub elements: Vec<TypeNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedTupleMember {
    pub data: NodeData,
    pub dot_dot_dot: bool,
    pub name: Identifier,
    pub question: bool,
    pub type_node: Box<TypeNode>,
}

/// Single wrapped type: optional (`T?`), rest (`...T`) or parenthesized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrappedType {
    pub data: NodeData,
    pub type_node: Box<TypeNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnionOrIntersectionType {
    pub data: NodeData,
    pub types: Vec<TypeNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalType {
    pub data: NodeData,
    pub check_type: TypeNode,
    pub extends_type: TypeNode,
    pub true_type: TypeNode,
    pub false_type: TypeNode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InferType {
    pub data: NodeData,
    pub type_parameter: TypeParameter,
}

/// `keyof T`, `unique symbol`, `readonly T[]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeOperator {
    pub data: NodeData,
    pub operator: SyntaxKind,
    pub type_node: Box<TypeNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexedAccessType {
    pub data: NodeData,
    pub object_type: Box<TypeNode>,
    pub index_type: Box<TypeNode>,
}

/// `{ readonly [K in T as N]?: V }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappedType {
    pub data: NodeData,
    /// `ReadonlyKeyword`, `PlusToken` or `MinusToken` (the latter two imply readonly).
    pub readonly_token: Option<SyntaxKind>,
    pub type_parameter: TypeParameter,
    pub name_type: Option<TypeNode>,
    /// `QuestionToken`, `PlusToken` or `MinusToken`.
    pub question_token: Option<SyntaxKind>,
    pub type_node: Option<TypeNode>,
}

/// String, numeric, bigint, boolean or `null` literal in type position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteralType {
    pub data: NodeData,
    pub literal: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateLiteralType {
    pub data: NodeData,
    pub quasis: Vec<TemplateElement>,
    pub types: Vec<TypeNode>,
}

/// `import("x").A<T>` / `typeof import("x")`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportType {
    pub data: NodeData,
    pub is_type_of: bool,
    pub argument: StringLiteral,
    pub qualifier: Option<EntityName>,
    pub type_arguments: Option<Vec<TypeNode>>,
}

/// `x is T`, `asserts x`, `asserts x is T`; `this` is stored as an identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypePredicate {
    pub data: NodeData,
    pub asserts: bool,
    pub parameter_name: Identifier,
    pub type_node: Option<Box<TypeNode>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeParameter {
    /// `in`/`out`/`const` live in the modifier flags.
    pub data: NodeData,
    pub name: Identifier,
    pub constraint: Option<Box<TypeNode>>,
    pub default: Option<Box<TypeNode>>,
}

/// Member of an interface or type literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeElement {
    Property(PropertySignature),
    Method(MethodSignature),
    Call(CallSignature),
    Index(IndexSignature),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySignature {
    pub data: NodeData,
    pub name: PropertyName,
    pub question: bool,
    pub type_annotation: Option<TypeNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodSignature {
    pub data: NodeData,
    pub kind: MethodKind,
    pub name: PropertyName,
    pub question: bool,
    pub type_parameters: Option<Vec<TypeParameter>>,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<TypeNode>,
}

/// Call signature or, with `is_construct`, construct signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallSignature {
    pub data: NodeData,
    pub is_construct: bool,
    pub type_parameters: Option<Vec<TypeParameter>>,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<TypeNode>,
}

// ============================================================================
// JSX
// ============================================================================

/// An element; self-closing when `closing` is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsxElement {
    pub data: NodeData,
    pub opening: JsxOpeningElement,
    pub children: Vec<JsxChild>,
    pub closing: Option<JsxClosingElement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsxOpeningElement {
    pub data: NodeData,
    pub tag_name: JsxTagName,
    pub type_arguments: Option<Vec<TypeNode>>,
    pub attributes: Vec<JsxAttributeLike>,
    pub self_closing: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsxClosingElement {
    pub data: NodeData,
    pub tag_name: JsxTagName,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsxFragment {
    pub data: NodeData,
    pub children: Vec<JsxChild>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JsxTagName {
    /// Plain name, including `this`.
    Identifier(Identifier),
    Namespaced(JsxNamespacedName),
    Member(JsxMemberExpression),
}

impl JsxTagName {
    /// Source-like text of the tag (`a.b.c`, `ns:tag`).
    pub fn text(&self) -> String {
        match self {
            JsxTagName::Identifier(id) => id.text.clone(),
            JsxTagName::Namespaced(ns) => format!("{}:{}", ns.namespace.text, ns.name.text),
            JsxTagName::Member(member) => format!("{}.{}", member.object.text(), member.property.text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsxNamespacedName {
    pub data: NodeData,
    pub namespace: Identifier,
    pub name: Identifier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsxMemberExpression {
    pub data: NodeData,
    pub object: Box<JsxTagName>,
    pub property: Identifier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JsxAttributeLike {
    Attribute(JsxAttribute),
    Spread(JsxSpreadAttribute),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JsxAttributeName {
    Identifier(Identifier),
    Namespaced(JsxNamespacedName),
}

impl JsxAttributeName {
    pub fn text(&self) -> String {
        match self {
            JsxAttributeName::Identifier(id) => id.text.clone(),
            JsxAttributeName::Namespaced(ns) => format!("{}:{}", ns.namespace.text, ns.name.text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsxAttribute {
    pub data: NodeData,
    pub name: JsxAttributeName,
    pub value: Option<JsxAttributeValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JsxAttributeValue {
    StringLiteral(StringLiteral),
    Expression(JsxExpressionContainer),
    Element(Box<JsxElement>),
    Fragment(Box<JsxFragment>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsxSpreadAttribute {
    pub data: NodeData,
    pub expression: Expression,
}

/// `{expr}`, `{...expr}` or the empty `{}` / `{/* comment */}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsxExpressionContainer {
    pub data: NodeData,
    pub dot_dot_dot: bool,
    pub expression: Option<Box<Expression>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsxText {
    pub data: NodeData,
    /// Raw text between tags.
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JsxChild {
    Text(JsxText),
    Expression(JsxExpressionContainer),
    Element(Box<JsxElement>),
    Fragment(Box<JsxFragment>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory;

    #[test]
    fn test_node_data_serializes_camel_case_without_empty_flags() {
        let data = NodeData::new(SyntaxKind::Identifier, 3, 5);
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["kind"], "Identifier");
        assert!(json.get("flags").is_none());
        assert!(json.get("modifierFlags").is_none());
    }

    #[test]
    fn test_statement_survives_json() {
        let stmt = factory::declare(
            VariableKind::Let,
            "total",
            Some(factory::binary(factory::number(1.5), SyntaxKind::PlusToken, factory::string("x"))),
        );
        let json = serde_json::to_string(&stmt).unwrap();
        let back: Statement = serde_json::from_str(&json).unwrap();
        assert_eq!(stmt, back);
    }

    #[test]
    fn test_specifier_names() {
        let specifier = ImportSpecifier {
            data: NodeData::synthesized(SyntaxKind::ImportSpecifier),
            is_type_only: false,
            property_name: Some(ModuleExportName::StringLiteral(factory::string_literal("a-b"))),
            name: factory::identifier("ab"),
        };
        assert_eq!(specifier.imported_name(), "a-b");
    }
}
