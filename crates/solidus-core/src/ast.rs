// Copyright 2026 The Solidus Authors
// SPDX-License-Identifier: Apache-2.0

//! Abstract Syntax Tree (AST) definitions for Solidity.
//!
//! The AST represents the structure of a source unit after parsing. Every
//! node carries a process-unique [`NodeId`] and a [`Span`] for error
//! reporting and tooling.
//!
//! # Design Philosophy
//!
//! - **All nodes have spans and ids** — stamped by the parser's node
//!   factory; ids are unique within one parse and spans always lie within
//!   the parsed source
//! - **Trees, not DAGs** — every node is owned by exactly one parent and
//!   released with the source unit; no child-to-parent references
//! - **Best-effort structure** — several diagnostics still produce nodes
//!   (e.g. an enum with no members, a duplicate modifier) so later passes
//!   can keep working
//!
//! Operators are carried as the [`TokenKind`] that appeared in the source;
//! the parser's output contract is the token, not an interpreted operator
//! algebra.

use ecow::EcoString;

use crate::source_analysis::{ElementaryTypeToken, Span, TokenKind};

/// A process-unique id stamped on every AST node.
///
/// Ids are drawn from a parser-local monotonically increasing counter and
/// are unique only within one parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// The kind of a contract-like definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractKind {
    /// `contract`
    Contract,
    /// `interface`
    Interface,
    /// `library`
    Library,
}

/// Declaration visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    /// No visibility was written.
    #[default]
    Default,
    /// `private`
    Private,
    /// `internal`
    Internal,
    /// `public`
    Public,
    /// `external`
    External,
}

impl Visibility {
    /// The source spelling, used in duplicate-specifier diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Private => "private",
            Self::Internal => "internal",
            Self::Public => "public",
            Self::External => "external",
        }
    }
}

/// State mutability of a function or of an `address` type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StateMutability {
    /// No mutability was written.
    #[default]
    NonPayable,
    /// `payable`
    Payable,
    /// `view`
    View,
    /// `pure`
    Pure,
}

impl StateMutability {
    /// The source spelling, used in duplicate-specifier diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NonPayable => "nonpayable",
            Self::Payable => "payable",
            Self::View => "view",
            Self::Pure => "pure",
        }
    }
}

/// Mutability of a variable declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mutability {
    /// An ordinary variable.
    #[default]
    Mutable,
    /// `constant`
    Constant,
    /// `immutable`
    Immutable,
}

/// Data location of a variable declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DataLocation {
    /// No location was written.
    #[default]
    Unspecified,
    /// `storage`
    Storage,
    /// `memory`
    Memory,
    /// `calldata`
    CallData,
}

/// How a function definition was introduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    /// `function name(…)` — the only kind with a non-empty name.
    Function,
    /// `constructor(…)`
    Constructor,
    /// `fallback(…)`
    Fallback,
    /// `receive(…)`
    Receive,
}

/// The unit suffix of a number literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubDenomination {
    /// `wei`
    Wei,
    /// `gwei`
    Gwei,
    /// `ether`
    Ether,
    /// `seconds`
    Second,
    /// `minutes`
    Minute,
    /// `hours`
    Hour,
    /// `days`
    Day,
    /// `weeks`
    Week,
}

/// The kind of a literal expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    /// `true` / `false`
    Bool,
    /// A number literal, possibly with a sub-denomination.
    Number,
    /// A string literal.
    Str,
    /// A `unicode"…"` literal.
    UnicodeStr,
    /// A `hex"…"` literal.
    HexStr,
}

// ============================================================================
// Source unit and directives
// ============================================================================

/// Top-level container for a parsed source file.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceUnit {
    pub id: NodeId,
    pub span: Span,
    /// The SPDX license identifier found in the unparsed regions of the
    /// file, if exactly one was present.
    pub license: Option<EcoString>,
    /// Top-level declarations in source order.
    pub nodes: Vec<SourceUnitPart>,
}

/// A top-level declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceUnitPart {
    Pragma(PragmaDirective),
    Import(ImportDirective),
    Contract(ContractDefinition),
    Struct(StructDefinition),
    Enum(EnumDefinition),
    Function(FunctionDefinition),
}

impl SourceUnitPart {
    /// The node's source location.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Pragma(n) => n.span,
            Self::Import(n) => n.span,
            Self::Contract(n) => n.span,
            Self::Struct(n) => n.span,
            Self::Enum(n) => n.span,
            Self::Function(n) => n.span,
        }
    }
}

/// A `pragma …;` directive: the token kinds and literal spellings between
/// `pragma` and `;`, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct PragmaDirective {
    pub id: NodeId,
    pub span: Span,
    pub tokens: Vec<TokenKind>,
    pub literals: Vec<EcoString>,
}

/// One `symbol as alias` entry of an import alias list.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolAlias {
    pub symbol: Identifier,
    pub alias: Option<EcoString>,
    /// Location of the alias (or of the symbol when no alias was written).
    pub alias_span: Span,
}

/// An `import …;` directive in any of its three surface forms.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportDirective {
    pub id: NodeId,
    pub span: Span,
    pub path: EcoString,
    /// The unit alias of `import "p" as x;` / `import * as x from "p";`,
    /// empty when none was written.
    pub unit_alias: EcoString,
    /// The `{a as b, c}` list of the selective form.
    pub symbol_aliases: Vec<SymbolAlias>,
}

// ============================================================================
// Contract-level definitions
// ============================================================================

/// A contract, interface, or library definition.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractDefinition {
    pub id: NodeId,
    pub span: Span,
    pub name: EcoString,
    pub kind: ContractKind,
    pub is_abstract: bool,
    pub documentation: Option<StructuredDocumentation>,
    pub base_contracts: Vec<InheritanceSpecifier>,
    pub nodes: Vec<ContractPart>,
}

/// A declaration inside a contract body.
#[derive(Debug, Clone, PartialEq)]
pub enum ContractPart {
    Function(FunctionDefinition),
    Variable(VariableDeclaration),
    Struct(StructDefinition),
    Enum(EnumDefinition),
    Modifier(ModifierDefinition),
    Event(EventDefinition),
    Using(UsingForDirective),
}

/// One base of a contract's `is` list, with optional constructor arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct InheritanceSpecifier {
    pub id: NodeId,
    pub span: Span,
    pub name: UserDefinedTypeName,
    pub arguments: Option<Vec<Expression>>,
}

/// A `struct` definition.
#[derive(Debug, Clone, PartialEq)]
pub struct StructDefinition {
    pub id: NodeId,
    pub span: Span,
    pub name: EcoString,
    pub members: Vec<VariableDeclaration>,
}

/// An `enum` definition.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDefinition {
    pub id: NodeId,
    pub span: Span,
    pub name: EcoString,
    pub members: Vec<EnumValue>,
}

/// One member of an enum.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumValue {
    pub id: NodeId,
    pub span: Span,
    pub name: EcoString,
}

/// A function, constructor, fallback, or receive definition.
///
/// The name is non-empty exactly when the definition was introduced by the
/// `function` keyword with an identifier; constructor/fallback/receive carry
/// the empty string.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDefinition {
    pub id: NodeId,
    pub span: Span,
    pub name: EcoString,
    pub kind: FunctionKind,
    /// Set when the definition appears at source-unit level.
    pub is_free_function: bool,
    pub visibility: Visibility,
    pub state_mutability: StateMutability,
    pub is_virtual: bool,
    pub overrides: Option<OverrideSpecifier>,
    pub documentation: Option<StructuredDocumentation>,
    pub parameters: ParameterList,
    pub modifiers: Vec<ModifierInvocation>,
    pub return_parameters: ParameterList,
    /// `None` for bodyless declarations (`;`).
    pub body: Option<Block>,
}

/// A parenthesized list of variable declarations.
///
/// Synthesized empty lists (a function without `returns`) carry an empty
/// span.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterList {
    pub id: NodeId,
    pub span: Span,
    pub parameters: Vec<VariableDeclaration>,
}

/// A variable declaration: state variable, parameter, local, struct member,
/// or quantifier variable.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaration {
    pub id: NodeId,
    pub span: Span,
    pub type_name: TypeName,
    /// Possibly empty (unnamed parameters).
    pub name: EcoString,
    pub value: Option<Expression>,
    pub visibility: Visibility,
    pub documentation: Option<StructuredDocumentation>,
    pub is_state_variable: bool,
    pub is_indexed: bool,
    pub mutability: Mutability,
    pub overrides: Option<OverrideSpecifier>,
    pub location: DataLocation,
}

/// An `override` / `override(Base1, Base2)` specifier.
#[derive(Debug, Clone, PartialEq)]
pub struct OverrideSpecifier {
    pub id: NodeId,
    pub span: Span,
    pub overrides: Vec<UserDefinedTypeName>,
}

/// A `modifier` definition.
#[derive(Debug, Clone, PartialEq)]
pub struct ModifierDefinition {
    pub id: NodeId,
    pub span: Span,
    pub name: EcoString,
    pub documentation: Option<StructuredDocumentation>,
    pub parameters: ParameterList,
    pub is_virtual: bool,
    pub overrides: Option<OverrideSpecifier>,
    /// `None` for bodyless declarations (`;`).
    pub body: Option<Block>,
}

/// A modifier invocation (or base-constructor call) in a function header.
#[derive(Debug, Clone, PartialEq)]
pub struct ModifierInvocation {
    pub id: NodeId,
    pub span: Span,
    pub name: Identifier,
    /// `None` when no parenthesized argument list was written.
    pub arguments: Option<Vec<Expression>>,
}

/// An `event` definition.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDefinition {
    pub id: NodeId,
    pub span: Span,
    pub name: EcoString,
    pub documentation: Option<StructuredDocumentation>,
    pub parameters: ParameterList,
    pub is_anonymous: bool,
}

/// A `using L for T;` directive.
///
/// `type_name` is `None` for the wildcard form `using L for *;` — downstream
/// passes rely on this distinction, so the wildcard is never encoded as an
/// empty type name.
#[derive(Debug, Clone, PartialEq)]
pub struct UsingForDirective {
    pub id: NodeId,
    pub span: Span,
    pub library: UserDefinedTypeName,
    pub type_name: Option<TypeName>,
}

/// A `///` or `/** */` doc comment attached to a declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredDocumentation {
    pub id: NodeId,
    pub span: Span,
    pub text: EcoString,
}

// ============================================================================
// Type names
// ============================================================================

/// A type name.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeName {
    Elementary(ElementaryTypeName),
    UserDefined(UserDefinedTypeName),
    Function(Box<FunctionTypeName>),
    Mapping(Box<Mapping>),
    Array(Box<ArrayTypeName>),
}

impl TypeName {
    /// The node's source location.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Elementary(n) => n.span,
            Self::UserDefined(n) => n.span,
            Self::Function(n) => n.span,
            Self::Mapping(n) => n.span,
            Self::Array(n) => n.span,
        }
    }
}

/// An elementary type name, with optional state mutability on `address`.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementaryTypeName {
    pub id: NodeId,
    pub span: Span,
    pub name: ElementaryTypeToken,
    /// Only ever set for `address` (`address payable`).
    pub state_mutability: Option<StateMutability>,
}

/// A dotted path naming a user-defined type: `x.y.z`.
#[derive(Debug, Clone, PartialEq)]
pub struct UserDefinedTypeName {
    pub id: NodeId,
    pub span: Span,
    /// Non-empty by construction.
    pub path: Vec<EcoString>,
}

/// A function type: `function (…) <specifiers> returns (…)`.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionTypeName {
    pub id: NodeId,
    pub span: Span,
    pub parameters: ParameterList,
    pub return_parameters: ParameterList,
    pub visibility: Visibility,
    pub state_mutability: StateMutability,
}

/// A mapping type: `mapping(K => V)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Mapping {
    pub id: NodeId,
    pub span: Span,
    pub key_type: TypeName,
    pub value_type: TypeName,
}

/// An array type: `T[]` or `T[len]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayTypeName {
    pub id: NodeId,
    pub span: Span,
    pub base_type: TypeName,
    /// `None` denotes a dynamic array.
    pub length: Option<Expression>,
}

// ============================================================================
// Statements
// ============================================================================

/// A statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Block(Block),
    If(Box<IfStatement>),
    While(Box<WhileStatement>),
    For(Box<ForStatement>),
    Continue(TerminalStatement),
    Break(TerminalStatement),
    Return(Box<ReturnStatement>),
    Throw(TerminalStatement),
    Try(Box<TryStatement>),
    Emit(Box<EmitStatement>),
    InlineAssembly(InlineAssembly),
    /// The `_` placeholder; only valid inside a modifier body.
    Placeholder(TerminalStatement),
    VariableDeclaration(Box<VariableDeclarationStatement>),
    Expression(Box<ExpressionStatement>),
}

impl Statement {
    /// The node's source location.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Block(n) => n.span,
            Self::If(n) => n.span,
            Self::While(n) => n.span,
            Self::For(n) => n.span,
            Self::Continue(n) | Self::Break(n) | Self::Throw(n) | Self::Placeholder(n) => n.span,
            Self::Return(n) => n.span,
            Self::Try(n) => n.span,
            Self::Emit(n) => n.span,
            Self::InlineAssembly(n) => n.span,
            Self::VariableDeclaration(n) => n.span,
            Self::Expression(n) => n.span,
        }
    }
}

/// A `{ … }` block.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub id: NodeId,
    pub span: Span,
    pub documentation: Option<EcoString>,
    pub statements: Vec<Statement>,
}

/// A statement with no children: `continue;`, `break;`, `throw;`, `_;`.
#[derive(Debug, Clone, PartialEq)]
pub struct TerminalStatement {
    pub id: NodeId,
    pub span: Span,
    pub documentation: Option<EcoString>,
}

/// An `if` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    pub id: NodeId,
    pub span: Span,
    pub documentation: Option<EcoString>,
    pub condition: Expression,
    pub true_body: Statement,
    pub false_body: Option<Statement>,
}

/// A `while` or `do … while` loop.
#[derive(Debug, Clone, PartialEq)]
pub struct WhileStatement {
    pub id: NodeId,
    pub span: Span,
    pub documentation: Option<EcoString>,
    pub condition: Expression,
    pub body: Statement,
    pub is_do_while: bool,
}

/// A `for` loop. Each header slot may be omitted.
#[derive(Debug, Clone, PartialEq)]
pub struct ForStatement {
    pub id: NodeId,
    pub span: Span,
    pub documentation: Option<EcoString>,
    pub init: Option<Statement>,
    pub condition: Option<Expression>,
    pub loop_expression: Option<ExpressionStatement>,
    pub body: Statement,
}

/// A `return` statement with optional value.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    pub id: NodeId,
    pub span: Span,
    pub documentation: Option<EcoString>,
    pub expression: Option<Expression>,
}

/// A `try` statement: the external call, the success clause, and one or
/// more catch clauses.
#[derive(Debug, Clone, PartialEq)]
pub struct TryStatement {
    pub id: NodeId,
    pub span: Span,
    pub documentation: Option<EcoString>,
    pub external_call: Expression,
    /// The success clause first (empty error name), then the catch clauses.
    pub clauses: Vec<TryCatchClause>,
}

/// One clause of a `try` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct TryCatchClause {
    pub id: NodeId,
    pub span: Span,
    /// `Error`, `Panic`, or empty for the success clause and the plain
    /// `catch`.
    pub error_name: EcoString,
    pub parameters: Option<ParameterList>,
    pub block: Block,
}

/// An `emit EventName(args);` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct EmitStatement {
    pub id: NodeId,
    pub span: Span,
    pub documentation: Option<EcoString>,
    pub event_call: FunctionCall,
}

/// An `assembly { … }` statement wrapping the dialect block opaquely.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineAssembly {
    pub id: NodeId,
    pub span: Span,
    pub documentation: Option<EcoString>,
    /// The assembly dialect; currently always `evmasm`.
    pub dialect: EcoString,
    pub block: AsmBlock,
}

/// The opaque body of an inline assembly statement.
///
/// The assembly grammar belongs to the external sub-parser; the parser only
/// records the block's extent and raw text.
#[derive(Debug, Clone, PartialEq)]
pub struct AsmBlock {
    pub span: Span,
    pub raw: EcoString,
}

/// A variable declaration statement, possibly a tuple form with holes:
/// `(uint a, , uint c) = f();`.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclarationStatement {
    pub id: NodeId,
    pub span: Span,
    pub documentation: Option<EcoString>,
    /// `None` entries are the holes of the tuple form.
    pub declarations: Vec<Option<VariableDeclaration>>,
    pub initial_value: Option<Expression>,
}

/// An expression in statement position.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatement {
    pub id: NodeId,
    pub span: Span,
    pub documentation: Option<EcoString>,
    pub expression: Expression,
}

// ============================================================================
// Expressions
// ============================================================================

/// An expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(Literal),
    Identifier(Identifier),
    Tuple(TupleExpression),
    Unary(Box<UnaryOperation>),
    Binary(Box<BinaryOperation>),
    Assignment(Box<Assignment>),
    Conditional(Box<ConditionalExpression>),
    MemberAccess(Box<MemberAccess>),
    IndexAccess(Box<IndexAccess>),
    IndexRangeAccess(Box<IndexRangeAccess>),
    FunctionCall(Box<FunctionCall>),
    FunctionCallOptions(Box<FunctionCallOptions>),
    New(Box<NewExpression>),
    ElementaryTypeNameExpression(ElementaryTypeNameExpression),
}

impl Expression {
    /// The node's source location.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Literal(n) => n.span,
            Self::Identifier(n) => n.span,
            Self::Tuple(n) => n.span,
            Self::Unary(n) => n.span,
            Self::Binary(n) => n.span,
            Self::Assignment(n) => n.span,
            Self::Conditional(n) => n.span,
            Self::MemberAccess(n) => n.span,
            Self::IndexAccess(n) => n.span,
            Self::IndexRangeAccess(n) => n.span,
            Self::FunctionCall(n) => n.span,
            Self::FunctionCallOptions(n) => n.span,
            Self::New(n) => n.span,
            Self::ElementaryTypeNameExpression(n) => n.span,
        }
    }
}

/// A literal constant: boolean, number (with optional unit suffix), or one
/// of the string flavors.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub id: NodeId,
    pub span: Span,
    pub kind: LiteralKind,
    /// The literal text (unescaped for strings; `true`/`false` for bools).
    pub value: EcoString,
    /// The unit suffix of a number literal, if any.
    pub sub_denomination: Option<SubDenomination>,
}

/// A name referring to a declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub id: NodeId,
    pub span: Span,
    pub name: EcoString,
}

/// A parenthesized tuple `(a, , c)` or inline array `[1, 2]`.
///
/// Components may be `None` only when `is_array` is false.
#[derive(Debug, Clone, PartialEq)]
pub struct TupleExpression {
    pub id: NodeId,
    pub span: Span,
    pub components: Vec<Option<Expression>>,
    pub is_array: bool,
}

/// A prefix or postfix unary operation.
#[derive(Debug, Clone, PartialEq)]
pub struct UnaryOperation {
    pub id: NodeId,
    pub span: Span,
    pub operator: TokenKind,
    pub sub_expression: Expression,
    pub is_prefix: bool,
}

/// A binary operation.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOperation {
    pub id: NodeId,
    pub span: Span,
    pub left: Expression,
    pub operator: TokenKind,
    pub right: Expression,
}

/// An assignment, with the assignment operator that appeared (`=`, `+=`, …).
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub id: NodeId,
    pub span: Span,
    pub left: Expression,
    pub operator: TokenKind,
    pub right: Expression,
}

/// A conditional expression `c ? t : f`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalExpression {
    pub id: NodeId,
    pub span: Span,
    pub condition: Expression,
    pub true_expression: Expression,
    pub false_expression: Expression,
}

/// A member access `expr.member`.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberAccess {
    pub id: NodeId,
    pub span: Span,
    pub expression: Expression,
    /// `address` is permitted as a member name and is stored with exactly
    /// that spelling.
    pub member_name: EcoString,
}

/// An index access `base[index]`; the index may be omitted (`new uint[]`).
#[derive(Debug, Clone, PartialEq)]
pub struct IndexAccess {
    pub id: NodeId,
    pub span: Span,
    pub base: Expression,
    pub index: Option<Expression>,
}

/// An index range access `base[start:end]`; both bounds may be omitted.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexRangeAccess {
    pub id: NodeId,
    pub span: Span,
    pub base: Expression,
    pub start: Option<Expression>,
    pub end: Option<Expression>,
}

/// A function call with positional or named arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub id: NodeId,
    pub span: Span,
    pub expression: Expression,
    pub arguments: Vec<Expression>,
    /// Argument names for the `f({a: 1, b: 2})` form; empty for positional
    /// calls.
    pub names: Vec<EcoString>,
}

/// Call options `f{value: 1, gas: 2}`.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCallOptions {
    pub id: NodeId,
    pub span: Span,
    pub expression: Expression,
    pub options: Vec<Expression>,
    pub names: Vec<EcoString>,
}

/// A `new T` expression.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpression {
    pub id: NodeId,
    pub span: Span,
    pub type_name: TypeName,
}

/// An elementary type name in expression position (casts, `type(uint)`).
#[derive(Debug, Clone, PartialEq)]
pub struct ElementaryTypeNameExpression {
    pub id: NodeId,
    pub span: Span,
    pub type_name: ElementaryTypeName,
}

// ============================================================================
// Specification expressions
// ============================================================================

/// Quantifier information collected while parsing a specification
/// expression.
///
/// `is_forall` and `quantifiers` run in parallel: one entry per leading
/// quantifier group, in source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecificationExpressionInfo {
    /// The array identifier of the `property(arr)` form.
    pub array_id: Option<Identifier>,
    /// `true` for `forall` groups, `false` for `exists` groups.
    pub is_forall: Vec<bool>,
    /// The quantified variable lists.
    pub quantifiers: Vec<ParameterList>,
}

/// One `case P : Q;` entry of a specification case list.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecificationCase {
    pub precondition: Expression,
    pub precondition_info: SpecificationExpressionInfo,
    pub postcondition: Expression,
    pub postcondition_info: SpecificationExpressionInfo,
}

// ============================================================================
// Node traversal
// ============================================================================

/// Calls `f` with the id and span of every node in the unit, in pre-order.
///
/// Used by tests to check the structural invariants (unique ids, spans
/// within the source).
pub fn visit_unit_nodes(unit: &SourceUnit, f: &mut dyn FnMut(NodeId, Span)) {
    f(unit.id, unit.span);
    for part in &unit.nodes {
        match part {
            SourceUnitPart::Pragma(n) => f(n.id, n.span),
            SourceUnitPart::Import(n) => {
                f(n.id, n.span);
                for alias in &n.symbol_aliases {
                    f(alias.symbol.id, alias.symbol.span);
                }
            }
            SourceUnitPart::Contract(n) => visit_contract(n, f),
            SourceUnitPart::Struct(n) => visit_struct(n, f),
            SourceUnitPart::Enum(n) => visit_enum(n, f),
            SourceUnitPart::Function(n) => visit_function(n, f),
        }
    }
}

fn visit_contract(contract: &ContractDefinition, f: &mut dyn FnMut(NodeId, Span)) {
    f(contract.id, contract.span);
    if let Some(doc) = &contract.documentation {
        f(doc.id, doc.span);
    }
    for base in &contract.base_contracts {
        f(base.id, base.span);
        f(base.name.id, base.name.span);
        if let Some(args) = &base.arguments {
            for arg in args {
                visit_expression(arg, f);
            }
        }
    }
    for part in &contract.nodes {
        match part {
            ContractPart::Function(n) => visit_function(n, f),
            ContractPart::Variable(n) => visit_variable(n, f),
            ContractPart::Struct(n) => visit_struct(n, f),
            ContractPart::Enum(n) => visit_enum(n, f),
            ContractPart::Modifier(n) => visit_modifier(n, f),
            ContractPart::Event(n) => visit_event(n, f),
            ContractPart::Using(n) => visit_using(n, f),
        }
    }
}

fn visit_struct(node: &StructDefinition, f: &mut dyn FnMut(NodeId, Span)) {
    f(node.id, node.span);
    for member in &node.members {
        visit_variable(member, f);
    }
}

fn visit_enum(node: &EnumDefinition, f: &mut dyn FnMut(NodeId, Span)) {
    f(node.id, node.span);
    for member in &node.members {
        f(member.id, member.span);
    }
}

fn visit_function(node: &FunctionDefinition, f: &mut dyn FnMut(NodeId, Span)) {
    f(node.id, node.span);
    if let Some(doc) = &node.documentation {
        f(doc.id, doc.span);
    }
    visit_parameter_list(&node.parameters, f);
    for invocation in &node.modifiers {
        f(invocation.id, invocation.span);
        f(invocation.name.id, invocation.name.span);
        if let Some(args) = &invocation.arguments {
            for arg in args {
                visit_expression(arg, f);
            }
        }
    }
    if let Some(overrides) = &node.overrides {
        visit_overrides(overrides, f);
    }
    visit_parameter_list(&node.return_parameters, f);
    if let Some(body) = &node.body {
        visit_block(body, f);
    }
}

fn visit_modifier(node: &ModifierDefinition, f: &mut dyn FnMut(NodeId, Span)) {
    f(node.id, node.span);
    if let Some(doc) = &node.documentation {
        f(doc.id, doc.span);
    }
    visit_parameter_list(&node.parameters, f);
    if let Some(overrides) = &node.overrides {
        visit_overrides(overrides, f);
    }
    if let Some(body) = &node.body {
        visit_block(body, f);
    }
}

fn visit_event(node: &EventDefinition, f: &mut dyn FnMut(NodeId, Span)) {
    f(node.id, node.span);
    if let Some(doc) = &node.documentation {
        f(doc.id, doc.span);
    }
    visit_parameter_list(&node.parameters, f);
}

fn visit_using(node: &UsingForDirective, f: &mut dyn FnMut(NodeId, Span)) {
    f(node.id, node.span);
    f(node.library.id, node.library.span);
    if let Some(type_name) = &node.type_name {
        visit_type(type_name, f);
    }
}

fn visit_overrides(node: &OverrideSpecifier, f: &mut dyn FnMut(NodeId, Span)) {
    f(node.id, node.span);
    for name in &node.overrides {
        f(name.id, name.span);
    }
}

fn visit_parameter_list(node: &ParameterList, f: &mut dyn FnMut(NodeId, Span)) {
    f(node.id, node.span);
    for parameter in &node.parameters {
        visit_variable(parameter, f);
    }
}

fn visit_variable(node: &VariableDeclaration, f: &mut dyn FnMut(NodeId, Span)) {
    f(node.id, node.span);
    if let Some(doc) = &node.documentation {
        f(doc.id, doc.span);
    }
    visit_type(&node.type_name, f);
    if let Some(overrides) = &node.overrides {
        visit_overrides(overrides, f);
    }
    if let Some(value) = &node.value {
        visit_expression(value, f);
    }
}

fn visit_type(node: &TypeName, f: &mut dyn FnMut(NodeId, Span)) {
    match node {
        TypeName::Elementary(n) => f(n.id, n.span),
        TypeName::UserDefined(n) => f(n.id, n.span),
        TypeName::Function(n) => {
            f(n.id, n.span);
            visit_parameter_list(&n.parameters, f);
            visit_parameter_list(&n.return_parameters, f);
        }
        TypeName::Mapping(n) => {
            f(n.id, n.span);
            visit_type(&n.key_type, f);
            visit_type(&n.value_type, f);
        }
        TypeName::Array(n) => {
            f(n.id, n.span);
            visit_type(&n.base_type, f);
            if let Some(length) = &n.length {
                visit_expression(length, f);
            }
        }
    }
}

fn visit_block(node: &Block, f: &mut dyn FnMut(NodeId, Span)) {
    f(node.id, node.span);
    for statement in &node.statements {
        visit_statement(statement, f);
    }
}

fn visit_statement(node: &Statement, f: &mut dyn FnMut(NodeId, Span)) {
    match node {
        Statement::Block(n) => visit_block(n, f),
        Statement::If(n) => {
            f(n.id, n.span);
            visit_expression(&n.condition, f);
            visit_statement(&n.true_body, f);
            if let Some(false_body) = &n.false_body {
                visit_statement(false_body, f);
            }
        }
        Statement::While(n) => {
            f(n.id, n.span);
            visit_expression(&n.condition, f);
            visit_statement(&n.body, f);
        }
        Statement::For(n) => {
            f(n.id, n.span);
            if let Some(init) = &n.init {
                visit_statement(init, f);
            }
            if let Some(condition) = &n.condition {
                visit_expression(condition, f);
            }
            if let Some(loop_expression) = &n.loop_expression {
                f(loop_expression.id, loop_expression.span);
                visit_expression(&loop_expression.expression, f);
            }
            visit_statement(&n.body, f);
        }
        Statement::Continue(n)
        | Statement::Break(n)
        | Statement::Throw(n)
        | Statement::Placeholder(n) => f(n.id, n.span),
        Statement::Return(n) => {
            f(n.id, n.span);
            if let Some(expression) = &n.expression {
                visit_expression(expression, f);
            }
        }
        Statement::Try(n) => {
            f(n.id, n.span);
            visit_expression(&n.external_call, f);
            for clause in &n.clauses {
                f(clause.id, clause.span);
                if let Some(parameters) = &clause.parameters {
                    visit_parameter_list(parameters, f);
                }
                visit_block(&clause.block, f);
            }
        }
        Statement::Emit(n) => {
            f(n.id, n.span);
            f(n.event_call.id, n.event_call.span);
            visit_expression(&n.event_call.expression, f);
            for argument in &n.event_call.arguments {
                visit_expression(argument, f);
            }
        }
        Statement::InlineAssembly(n) => f(n.id, n.span),
        Statement::VariableDeclaration(n) => {
            f(n.id, n.span);
            for declaration in n.declarations.iter().flatten() {
                visit_variable(declaration, f);
            }
            if let Some(value) = &n.initial_value {
                visit_expression(value, f);
            }
        }
        Statement::Expression(n) => {
            f(n.id, n.span);
            visit_expression(&n.expression, f);
        }
    }
}

fn visit_expression(node: &Expression, f: &mut dyn FnMut(NodeId, Span)) {
    match node {
        Expression::Literal(n) => f(n.id, n.span),
        Expression::Identifier(n) => f(n.id, n.span),
        Expression::Tuple(n) => {
            f(n.id, n.span);
            for component in n.components.iter().flatten() {
                visit_expression(component, f);
            }
        }
        Expression::Unary(n) => {
            f(n.id, n.span);
            visit_expression(&n.sub_expression, f);
        }
        Expression::Binary(n) => {
            f(n.id, n.span);
            visit_expression(&n.left, f);
            visit_expression(&n.right, f);
        }
        Expression::Assignment(n) => {
            f(n.id, n.span);
            visit_expression(&n.left, f);
            visit_expression(&n.right, f);
        }
        Expression::Conditional(n) => {
            f(n.id, n.span);
            visit_expression(&n.condition, f);
            visit_expression(&n.true_expression, f);
            visit_expression(&n.false_expression, f);
        }
        Expression::MemberAccess(n) => {
            f(n.id, n.span);
            visit_expression(&n.expression, f);
        }
        Expression::IndexAccess(n) => {
            f(n.id, n.span);
            visit_expression(&n.base, f);
            if let Some(index) = &n.index {
                visit_expression(index, f);
            }
        }
        Expression::IndexRangeAccess(n) => {
            f(n.id, n.span);
            visit_expression(&n.base, f);
            if let Some(start) = &n.start {
                visit_expression(start, f);
            }
            if let Some(end) = &n.end {
                visit_expression(end, f);
            }
        }
        Expression::FunctionCall(n) => {
            f(n.id, n.span);
            visit_expression(&n.expression, f);
            for argument in &n.arguments {
                visit_expression(argument, f);
            }
        }
        Expression::FunctionCallOptions(n) => {
            f(n.id, n.span);
            visit_expression(&n.expression, f);
            for option in &n.options {
                visit_expression(option, f);
            }
        }
        Expression::New(n) => {
            f(n.id, n.span);
            visit_type(&n.type_name, f);
        }
        Expression::ElementaryTypeNameExpression(n) => {
            f(n.id, n.span);
            f(n.type_name.id, n.type_name.span);
        }
    }
}
