//! Raw AST nodes - the tree handed over by an external ASP parser
//!
//! The node taxonomy mirrors clingo's AST: statements, literals, atoms,
//! aggregate elements and terms. Nodes arrive as JSON tagged by `"type"`;
//! any tag outside this closed set deserializes to [`RawNode::Unknown`]
//! and is rejected by the tree builder.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in a source file (1-indexed line and column).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// File the position belongs to. Absent for in-memory programs.
    #[serde(default)]
    pub filename: Option<String>,
    pub line: u32,
    pub column: u32,
}

/// Source range of a node. The end column is exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub begin: Position,
    pub end: Position,
}

impl Location {
    /// Create a location without file information
    pub fn new(line: u32, column: u32, end_line: u32, end_column: u32) -> Self {
        Self {
            begin: Position { filename: None, line, column },
            end: Position { filename: None, line: end_line, column: end_column },
        }
    }

    /// Attach a filename to both ends of the location
    pub fn in_file(mut self, filename: impl Into<String>) -> Self {
        let filename = filename.into();
        self.begin.filename = Some(filename.clone());
        self.end.filename = Some(filename);
        self
    }

    pub fn filename(&self) -> Option<&str> {
        self.begin.filename.as_deref()
    }
}

/// Default negation sign of a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sign {
    #[default]
    NoSign,
    Negation,
    DoubleNegation,
}

impl Sign {
    pub fn is_positive(&self) -> bool {
        matches!(self, Sign::NoSign)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sign::NoSign => "",
            Sign::Negation => "not",
            Sign::DoubleNegation => "not not",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOperator {
    GreaterThan,
    LessThan,
    LessEqual,
    GreaterEqual,
    NotEqual,
    Equal,
}

impl ComparisonOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOperator::GreaterThan => ">",
            ComparisonOperator::LessThan => "<",
            ComparisonOperator::LessEqual => "<=",
            ComparisonOperator::GreaterEqual => ">=",
            ComparisonOperator::NotEqual => "!=",
            ComparisonOperator::Equal => "=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOperator {
    Minus,
    Negation,
    Absolute,
}

impl UnaryOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOperator::Minus => "-",
            UnaryOperator::Negation => "~",
            UnaryOperator::Absolute => "||",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOperator {
    Plus,
    Minus,
    Multiplication,
    Division,
    Modulo,
    Power,
    And,
    Or,
    Xor,
}

impl BinaryOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOperator::Plus => "+",
            BinaryOperator::Minus => "-",
            BinaryOperator::Multiplication => "*",
            BinaryOperator::Division => "/",
            BinaryOperator::Modulo => "\\",
            BinaryOperator::Power => "**",
            BinaryOperator::And => "&",
            BinaryOperator::Or => "?",
            BinaryOperator::Xor => "^",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateFunction {
    Count,
    Sum,
    SumPlus,
    Min,
    Max,
}

impl AggregateFunction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateFunction::Count => "#count",
            AggregateFunction::Sum => "#sum",
            AggregateFunction::SumPlus => "#sum+",
            AggregateFunction::Min => "#min",
            AggregateFunction::Max => "#max",
        }
    }
}

/// Bound of an aggregate, e.g. the `2 <=` in `2 <= #count { ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guard {
    pub comparison: ComparisonOperator,
    pub term: Box<RawNode>,
}

/// Structural role of a node kind. Fields of a node only accept
/// children of specific classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeClass {
    Statement,
    /// Composite heads: disjunctions, choices, head aggregates
    Head,
    /// Literals and conditional literals
    Literal,
    Atom,
    /// Aggregate elements
    Element,
    Term,
    Unknown,
}

/// Fieldless tag of a [`RawNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Rule,
    Definition,
    ShowSignature,
    ShowTerm,
    Minimize,
    External,
    Defined,
    Program,
    Literal,
    ConditionalLiteral,
    SymbolicAtom,
    BooleanConstant,
    Comparison,
    Disjunction,
    Aggregate,
    BodyAggregate,
    HeadAggregate,
    AggregateElement,
    HeadAggregateElement,
    Variable,
    SymbolicTerm,
    Function,
    UnaryOperation,
    BinaryOperation,
    Interval,
    Pool,
    Unknown,
}

impl NodeKind {
    pub fn class(&self) -> NodeClass {
        use NodeKind::*;
        match self {
            Rule | Definition | ShowSignature | ShowTerm | Minimize | External | Defined
            | Program => NodeClass::Statement,
            Disjunction | Aggregate | HeadAggregate => NodeClass::Head,
            Literal | ConditionalLiteral => NodeClass::Literal,
            SymbolicAtom | BooleanConstant | Comparison | BodyAggregate => NodeClass::Atom,
            AggregateElement | HeadAggregateElement => NodeClass::Element,
            Variable | SymbolicTerm | Function | UnaryOperation | BinaryOperation | Interval
            | Pool => NodeClass::Term,
            Unknown => NodeClass::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        use NodeKind::*;
        match self {
            Rule => "Rule",
            Definition => "Definition",
            ShowSignature => "ShowSignature",
            ShowTerm => "ShowTerm",
            Minimize => "Minimize",
            External => "External",
            Defined => "Defined",
            Program => "Program",
            Literal => "Literal",
            ConditionalLiteral => "ConditionalLiteral",
            SymbolicAtom => "SymbolicAtom",
            BooleanConstant => "BooleanConstant",
            Comparison => "Comparison",
            Disjunction => "Disjunction",
            Aggregate => "Aggregate",
            BodyAggregate => "BodyAggregate",
            HeadAggregate => "HeadAggregate",
            AggregateElement => "AggregateElement",
            HeadAggregateElement => "HeadAggregateElement",
            Variable => "Variable",
            SymbolicTerm => "SymbolicTerm",
            Function => "Function",
            UnaryOperation => "UnaryOperation",
            BinaryOperation => "BinaryOperation",
            Interval => "Interval",
            Pool => "Pool",
            Unknown => "Unknown",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

const LITERALS: &[NodeClass] = &[NodeClass::Literal];
const HEADS: &[NodeClass] = &[NodeClass::Literal, NodeClass::Head];
const ATOMS: &[NodeClass] = &[NodeClass::Atom];
const ELEMENTS: &[NodeClass] = &[NodeClass::Element];
const TERMS: &[NodeClass] = &[NodeClass::Term];

/// One child of a raw node together with the field it sits in.
#[derive(Debug, Clone, Copy)]
pub struct Field<'a> {
    pub name: &'static str,
    pub accepts: &'static [NodeClass],
    pub node: &'a RawNode,
}

impl Field<'_> {
    /// Whether the child's kind is allowed in this field
    pub fn is_valid(&self) -> bool {
        self.accepts.contains(&self.node.kind().class())
    }
}

/// A node of the external parser's AST.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RawNode {
    Rule {
        location: Option<Location>,
        head: Box<RawNode>,
        #[serde(default)]
        body: Vec<RawNode>,
    },
    /// `#const name = value.`
    Definition {
        location: Option<Location>,
        name: String,
        value: Box<RawNode>,
        #[serde(default)]
        is_default: bool,
    },
    /// `#show name/arity.`
    ShowSignature {
        location: Option<Location>,
        name: String,
        arity: u32,
        #[serde(default = "default_true")]
        positive: bool,
    },
    /// `#show term : body.`
    ShowTerm {
        location: Option<Location>,
        term: Box<RawNode>,
        #[serde(default)]
        body: Vec<RawNode>,
    },
    /// Weak constraint or one element of `#minimize`/`#maximize`.
    Minimize {
        location: Option<Location>,
        weight: Box<RawNode>,
        priority: Box<RawNode>,
        #[serde(default)]
        terms: Vec<RawNode>,
        #[serde(default)]
        body: Vec<RawNode>,
    },
    /// `#external atom : body. [type]`
    External {
        location: Option<Location>,
        atom: Box<RawNode>,
        #[serde(default)]
        body: Vec<RawNode>,
        external_type: Box<RawNode>,
    },
    /// `#defined name/arity.`
    Defined {
        location: Option<Location>,
        name: String,
        arity: u32,
        #[serde(default = "default_true")]
        positive: bool,
    },
    /// `#program name(parameters).`
    Program {
        location: Option<Location>,
        name: String,
        #[serde(default)]
        parameters: Vec<String>,
    },
    Literal {
        location: Option<Location>,
        #[serde(default)]
        sign: Sign,
        atom: Box<RawNode>,
    },
    /// `literal : condition`
    ConditionalLiteral {
        location: Option<Location>,
        literal: Box<RawNode>,
        #[serde(default)]
        condition: Vec<RawNode>,
    },
    SymbolicAtom {
        location: Option<Location>,
        symbol: Box<RawNode>,
    },
    BooleanConstant {
        location: Option<Location>,
        value: bool,
    },
    Comparison {
        location: Option<Location>,
        left: Box<RawNode>,
        comparison: ComparisonOperator,
        right: Box<RawNode>,
    },
    Disjunction {
        location: Option<Location>,
        elements: Vec<RawNode>,
    },
    /// Choice / set aggregate: `l { elements } u`
    Aggregate {
        location: Option<Location>,
        left_guard: Option<Guard>,
        elements: Vec<RawNode>,
        right_guard: Option<Guard>,
    },
    BodyAggregate {
        location: Option<Location>,
        function: AggregateFunction,
        left_guard: Option<Guard>,
        elements: Vec<RawNode>,
        right_guard: Option<Guard>,
    },
    HeadAggregate {
        location: Option<Location>,
        function: AggregateFunction,
        left_guard: Option<Guard>,
        elements: Vec<RawNode>,
        right_guard: Option<Guard>,
    },
    /// `terms : condition` inside a body aggregate
    AggregateElement {
        location: Option<Location>,
        terms: Vec<RawNode>,
        #[serde(default)]
        condition: Vec<RawNode>,
    },
    /// `terms : literal : condition` inside a head aggregate
    HeadAggregateElement {
        location: Option<Location>,
        terms: Vec<RawNode>,
        literal: Box<RawNode>,
    },
    Variable {
        location: Option<Location>,
        name: String,
    },
    /// Numbers, strings, `#inf`/`#sup` and other constant symbols.
    SymbolicTerm {
        location: Option<Location>,
        symbol: String,
    },
    Function {
        location: Option<Location>,
        name: String,
        #[serde(default)]
        arguments: Vec<RawNode>,
        #[serde(default)]
        external: bool,
    },
    UnaryOperation {
        location: Option<Location>,
        operator: UnaryOperator,
        argument: Box<RawNode>,
    },
    BinaryOperation {
        location: Option<Location>,
        operator: BinaryOperator,
        left: Box<RawNode>,
        right: Box<RawNode>,
    },
    Interval {
        location: Option<Location>,
        left: Box<RawNode>,
        right: Box<RawNode>,
    },
    Pool {
        location: Option<Location>,
        arguments: Vec<RawNode>,
    },
    #[serde(other)]
    Unknown,
}

fn default_true() -> bool {
    true
}

impl RawNode {
    pub fn kind(&self) -> NodeKind {
        match self {
            RawNode::Rule { .. } => NodeKind::Rule,
            RawNode::Definition { .. } => NodeKind::Definition,
            RawNode::ShowSignature { .. } => NodeKind::ShowSignature,
            RawNode::ShowTerm { .. } => NodeKind::ShowTerm,
            RawNode::Minimize { .. } => NodeKind::Minimize,
            RawNode::External { .. } => NodeKind::External,
            RawNode::Defined { .. } => NodeKind::Defined,
            RawNode::Program { .. } => NodeKind::Program,
            RawNode::Literal { .. } => NodeKind::Literal,
            RawNode::ConditionalLiteral { .. } => NodeKind::ConditionalLiteral,
            RawNode::SymbolicAtom { .. } => NodeKind::SymbolicAtom,
            RawNode::BooleanConstant { .. } => NodeKind::BooleanConstant,
            RawNode::Comparison { .. } => NodeKind::Comparison,
            RawNode::Disjunction { .. } => NodeKind::Disjunction,
            RawNode::Aggregate { .. } => NodeKind::Aggregate,
            RawNode::BodyAggregate { .. } => NodeKind::BodyAggregate,
            RawNode::HeadAggregate { .. } => NodeKind::HeadAggregate,
            RawNode::AggregateElement { .. } => NodeKind::AggregateElement,
            RawNode::HeadAggregateElement { .. } => NodeKind::HeadAggregateElement,
            RawNode::Variable { .. } => NodeKind::Variable,
            RawNode::SymbolicTerm { .. } => NodeKind::SymbolicTerm,
            RawNode::Function { .. } => NodeKind::Function,
            RawNode::UnaryOperation { .. } => NodeKind::UnaryOperation,
            RawNode::BinaryOperation { .. } => NodeKind::BinaryOperation,
            RawNode::Interval { .. } => NodeKind::Interval,
            RawNode::Pool { .. } => NodeKind::Pool,
            RawNode::Unknown => NodeKind::Unknown,
        }
    }

    pub fn location(&self) -> Option<&Location> {
        match self {
            RawNode::Rule { location, .. }
            | RawNode::Definition { location, .. }
            | RawNode::ShowSignature { location, .. }
            | RawNode::ShowTerm { location, .. }
            | RawNode::Minimize { location, .. }
            | RawNode::External { location, .. }
            | RawNode::Defined { location, .. }
            | RawNode::Program { location, .. }
            | RawNode::Literal { location, .. }
            | RawNode::ConditionalLiteral { location, .. }
            | RawNode::SymbolicAtom { location, .. }
            | RawNode::BooleanConstant { location, .. }
            | RawNode::Comparison { location, .. }
            | RawNode::Disjunction { location, .. }
            | RawNode::Aggregate { location, .. }
            | RawNode::BodyAggregate { location, .. }
            | RawNode::HeadAggregate { location, .. }
            | RawNode::AggregateElement { location, .. }
            | RawNode::HeadAggregateElement { location, .. }
            | RawNode::Variable { location, .. }
            | RawNode::SymbolicTerm { location, .. }
            | RawNode::Function { location, .. }
            | RawNode::UnaryOperation { location, .. }
            | RawNode::BinaryOperation { location, .. }
            | RawNode::Interval { location, .. }
            | RawNode::Pool { location, .. } => location.as_ref(),
            RawNode::Unknown => None,
        }
    }

    /// Display label of the node: identifiers for names, operator symbols
    /// for operations, aggregate functions for aggregates.
    pub fn label(&self) -> Option<String> {
        match self {
            RawNode::Definition { name, .. }
            | RawNode::ShowSignature { name, .. }
            | RawNode::Defined { name, .. }
            | RawNode::Program { name, .. }
            | RawNode::Variable { name, .. }
            | RawNode::Function { name, .. } => Some(name.clone()),
            RawNode::SymbolicTerm { symbol, .. } => Some(symbol.clone()),
            RawNode::BooleanConstant { value, .. } => {
                Some(if *value { "#true" } else { "#false" }.to_string())
            }
            RawNode::Comparison { comparison, .. } => Some(comparison.as_str().to_string()),
            RawNode::BodyAggregate { function, .. } | RawNode::HeadAggregate { function, .. } => {
                Some(function.as_str().to_string())
            }
            RawNode::UnaryOperation { operator, .. } => Some(operator.as_str().to_string()),
            RawNode::BinaryOperation { operator, .. } => Some(operator.as_str().to_string()),
            RawNode::Interval { .. } => Some("..".to_string()),
            _ => None,
        }
    }

    /// Arity carried by signature directives (`#show p/1.`, `#defined p/1.`)
    pub fn arity(&self) -> Option<u32> {
        match self {
            RawNode::ShowSignature { arity, .. } | RawNode::Defined { arity, .. } => Some(*arity),
            _ => None,
        }
    }

    pub fn sign(&self) -> Option<Sign> {
        match self {
            RawNode::Literal { sign, .. } => Some(*sign),
            _ => None,
        }
    }

    /// Children in declaration order, each tagged with its field.
    pub fn fields(&self) -> Vec<Field<'_>> {
        fn one<'a>(name: &'static str, accepts: &'static [NodeClass], node: &'a RawNode) -> Field<'a> {
            Field { name, accepts, node }
        }
        fn many<'a>(
            name: &'static str,
            accepts: &'static [NodeClass],
            nodes: &'a [RawNode],
        ) -> impl Iterator<Item = Field<'a>> {
            nodes.iter().map(move |node| Field { name, accepts, node })
        }
        fn guard<'a>(name: &'static str, guard: &'a Option<Guard>) -> Option<Field<'a>> {
            guard.as_ref().map(|g| Field { name, accepts: TERMS, node: g.term.as_ref() })
        }

        let mut fields = Vec::new();
        match self {
            RawNode::Rule { head, body, .. } => {
                fields.push(one("head", HEADS, head));
                fields.extend(many("body", LITERALS, body));
            }
            RawNode::Definition { value, .. } => fields.push(one("value", TERMS, value)),
            RawNode::ShowTerm { term, body, .. } => {
                fields.push(one("term", TERMS, term));
                fields.extend(many("body", LITERALS, body));
            }
            RawNode::Minimize { weight, priority, terms, body, .. } => {
                fields.push(one("weight", TERMS, weight));
                fields.push(one("priority", TERMS, priority));
                fields.extend(many("terms", TERMS, terms));
                fields.extend(many("body", LITERALS, body));
            }
            RawNode::External { atom, body, external_type, .. } => {
                fields.push(one("atom", ATOMS, atom));
                fields.extend(many("body", LITERALS, body));
                fields.push(one("external_type", TERMS, external_type));
            }
            RawNode::Literal { atom, .. } => fields.push(one("atom", ATOMS, atom)),
            RawNode::ConditionalLiteral { literal, condition, .. } => {
                fields.push(one("literal", LITERALS, literal));
                fields.extend(many("condition", LITERALS, condition));
            }
            RawNode::SymbolicAtom { symbol, .. } => fields.push(one("symbol", TERMS, symbol)),
            RawNode::Comparison { left, right, .. } => {
                fields.push(one("left", TERMS, left));
                fields.push(one("right", TERMS, right));
            }
            RawNode::Disjunction { elements, .. } => {
                fields.extend(many("elements", LITERALS, elements));
            }
            RawNode::Aggregate { left_guard, elements, right_guard, .. } => {
                fields.extend(guard("left_guard", left_guard));
                fields.extend(many("elements", LITERALS, elements));
                fields.extend(guard("right_guard", right_guard));
            }
            RawNode::BodyAggregate { left_guard, elements, right_guard, .. }
            | RawNode::HeadAggregate { left_guard, elements, right_guard, .. } => {
                fields.extend(guard("left_guard", left_guard));
                fields.extend(many("elements", ELEMENTS, elements));
                fields.extend(guard("right_guard", right_guard));
            }
            RawNode::AggregateElement { terms, condition, .. } => {
                fields.extend(many("terms", TERMS, terms));
                fields.extend(many("condition", LITERALS, condition));
            }
            RawNode::HeadAggregateElement { terms, literal, .. } => {
                fields.extend(many("terms", TERMS, terms));
                fields.push(one("literal", LITERALS, literal));
            }
            RawNode::Function { arguments, .. } | RawNode::Pool { arguments, .. } => {
                fields.extend(many("arguments", TERMS, arguments));
            }
            RawNode::UnaryOperation { argument, .. } => {
                fields.push(one("argument", TERMS, argument));
            }
            RawNode::BinaryOperation { left, right, .. } | RawNode::Interval { left, right, .. } => {
                fields.push(one("left", TERMS, left));
                fields.push(one("right", TERMS, right));
            }
            RawNode::ShowSignature { .. }
            | RawNode::Defined { .. }
            | RawNode::Program { .. }
            | RawNode::BooleanConstant { .. }
            | RawNode::Variable { .. }
            | RawNode::SymbolicTerm { .. }
            | RawNode::Unknown => {}
        }
        fields
    }

    // Builders for hand-assembled programs.

    pub fn variable(name: impl Into<String>) -> Self {
        RawNode::Variable { location: None, name: name.into() }
    }

    pub fn constant(symbol: impl Into<String>) -> Self {
        RawNode::SymbolicTerm { location: None, symbol: symbol.into() }
    }

    pub fn function(name: impl Into<String>, arguments: Vec<RawNode>) -> Self {
        RawNode::Function { location: None, name: name.into(), arguments, external: false }
    }

    /// Symbolic atom `name(arguments)` wrapped in a literal with `sign`
    pub fn atom(sign: Sign, name: impl Into<String>, arguments: Vec<RawNode>) -> Self {
        Self::literal(
            sign,
            RawNode::SymbolicAtom {
                location: None,
                symbol: Box::new(Self::function(name, arguments)),
            },
        )
    }

    pub fn literal(sign: Sign, atom: RawNode) -> Self {
        RawNode::Literal { location: None, sign, atom: Box::new(atom) }
    }

    pub fn comparison(left: RawNode, comparison: ComparisonOperator, right: RawNode) -> Self {
        Self::literal(
            Sign::NoSign,
            RawNode::Comparison {
                location: None,
                left: Box::new(left),
                comparison,
                right: Box::new(right),
            },
        )
    }

    pub fn rule(head: RawNode, body: Vec<RawNode>) -> Self {
        RawNode::Rule { location: None, head: Box::new(head), body }
    }

    /// Integrity constraint `:- body.`
    pub fn constraint(body: Vec<RawNode>) -> Self {
        Self::rule(
            Self::literal(Sign::NoSign, RawNode::BooleanConstant { location: None, value: false }),
            body,
        )
    }

    /// Set the location of this node
    pub fn at(mut self, at: Location) -> Self {
        match &mut self {
            RawNode::Rule { location, .. }
            | RawNode::Definition { location, .. }
            | RawNode::ShowSignature { location, .. }
            | RawNode::ShowTerm { location, .. }
            | RawNode::Minimize { location, .. }
            | RawNode::External { location, .. }
            | RawNode::Defined { location, .. }
            | RawNode::Program { location, .. }
            | RawNode::Literal { location, .. }
            | RawNode::ConditionalLiteral { location, .. }
            | RawNode::SymbolicAtom { location, .. }
            | RawNode::BooleanConstant { location, .. }
            | RawNode::Comparison { location, .. }
            | RawNode::Disjunction { location, .. }
            | RawNode::Aggregate { location, .. }
            | RawNode::BodyAggregate { location, .. }
            | RawNode::HeadAggregate { location, .. }
            | RawNode::AggregateElement { location, .. }
            | RawNode::HeadAggregateElement { location, .. }
            | RawNode::Variable { location, .. }
            | RawNode::SymbolicTerm { location, .. }
            | RawNode::Function { location, .. }
            | RawNode::UnaryOperation { location, .. }
            | RawNode::BinaryOperation { location, .. }
            | RawNode::Interval { location, .. }
            | RawNode::Pool { location, .. } => *location = Some(at),
            RawNode::Unknown => {}
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_follow_declaration_order() {
        let rule = RawNode::rule(
            RawNode::atom(Sign::NoSign, "p", vec![RawNode::variable("X")]),
            vec![
                RawNode::atom(Sign::NoSign, "q", vec![RawNode::variable("X")]),
                RawNode::atom(Sign::Negation, "r", vec![RawNode::variable("X")]),
            ],
        );

        let names: Vec<_> = rule.fields().iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["head", "body", "body"]);
        assert!(rule.fields().iter().all(|f| f.is_valid()));
    }

    #[test]
    fn test_deserialize_tagged_json() {
        let json = serde_json::json!({
            "type": "Rule",
            "location": {
                "begin": { "filename": "a.lp", "line": 1, "column": 1 },
                "end": { "filename": "a.lp", "line": 1, "column": 6 }
            },
            "head": {
                "type": "Literal",
                "atom": {
                    "type": "SymbolicAtom",
                    "symbol": { "type": "Function", "name": "a" }
                }
            }
        });

        let node: RawNode = serde_json::from_value(json).unwrap();
        assert_eq!(node.kind(), NodeKind::Rule);
        assert_eq!(node.location().and_then(|l| l.filename()), Some("a.lp"));
        assert_eq!(node.fields().len(), 1);
    }

    #[test]
    fn test_unknown_tag_is_unknown() {
        let json = serde_json::json!({ "type": "TheoryAtom" });
        let node: RawNode = serde_json::from_value(json).unwrap();
        assert_eq!(node.kind(), NodeKind::Unknown);
        assert_eq!(node.kind().class(), NodeClass::Unknown);
    }

    #[test]
    fn test_field_rejects_wrong_class() {
        let literal = RawNode::Literal {
            location: None,
            sign: Sign::NoSign,
            atom: Box::new(RawNode::variable("X")),
        };
        let fields = literal.fields();
        assert_eq!(fields.len(), 1);
        assert!(!fields[0].is_valid());
    }

    #[test]
    fn test_labels() {
        assert_eq!(RawNode::variable("X").label().as_deref(), Some("X"));
        assert_eq!(RawNode::constant("42").label().as_deref(), Some("42"));
        let cmp = RawNode::comparison(
            RawNode::variable("X"),
            ComparisonOperator::LessThan,
            RawNode::constant("3"),
        );
        assert_eq!(cmp.label(), None);
        assert_eq!(cmp.fields()[0].node.label().as_deref(), Some("<"));
    }
}
