//! Dependency Graph - predicates and the statements that define or use them
//!
//! Built once from a scope-resolved tree. Cycle queries are derived from
//! the stored edges on first request and memoized.

use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;
use crate::edge::{Edge, EdgeKind};
use crate::node::NodeId;
use crate::raw::NodeKind;
use crate::signature::Signature;
use crate::tree::Tree;

/// Predicate dependency graph of a program.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    statements: usize,
    /// All predicates, ordered by signature
    predicates: BTreeSet<Signature>,
    /// Edges per statement
    edges_from: HashMap<usize, Vec<Edge>>,
    /// Edges per predicate
    edges_to: HashMap<Signature, Vec<Edge>>,
    acyclic: OnceLock<bool>,
    stratified: OnceLock<bool>,
}

impl DependencyGraph {
    /// Create an empty graph over `statements` statements
    pub fn new(statements: usize) -> Self {
        Self { statements, ..Self::default() }
    }

    /// Index every statement of `tree`
    pub fn build(tree: &Tree) -> Self {
        let mut graph = Self::new(tree.len());
        for (statement, root) in tree.roots().iter().enumerate() {
            let node = tree.node(*root);
            match node.kind {
                NodeKind::Defined | NodeKind::ShowSignature => {
                    if let (Some(name), Some(arity)) = (node.name(), node.arity) {
                        let signature = Signature::new(name, arity);
                        if node.kind == NodeKind::Defined {
                            graph.add_edge(Edge::defines(statement, signature));
                        } else {
                            graph.add_edge(Edge::shows(statement, signature));
                        }
                    }
                }
                _ => {
                    for id in tree.preorder(*root) {
                        if tree.node(id).kind != NodeKind::SymbolicAtom {
                            continue;
                        }
                        if let Some(edge) = atom_edge(tree, statement, id) {
                            graph.add_edge(edge);
                        }
                    }
                }
            }
        }
        tracing::debug!(
            predicates = graph.predicates.len(),
            edges = graph.edge_count(),
            "built dependency graph"
        );
        graph
    }

    /// Add an edge; duplicates are ignored
    pub fn add_edge(&mut self, edge: Edge) {
        let outgoing = self.edges_from.entry(edge.statement).or_default();
        if outgoing.contains(&edge) {
            return;
        }
        outgoing.push(edge.clone());
        self.statements = self.statements.max(edge.statement + 1);
        self.predicates.insert(edge.predicate.clone());
        self.edges_to.entry(edge.predicate.clone()).or_default().push(edge);
        self.acyclic.take();
        self.stratified.take();
    }

    /// All edges of a statement
    pub fn edges_of(&self, statement: usize) -> &[Edge] {
        self.edges_from.get(&statement).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// All edges touching a predicate
    pub fn edges_to(&self, predicate: &Signature) -> &[Edge] {
        self.edges_to.get(predicate).map(|v| v.as_slice()).unwrap_or(&[])
    }

    fn predicates_of(&self, statement: usize, kinds: &[EdgeKind]) -> Vec<&Signature> {
        let mut seen = Vec::new();
        for edge in self.edges_of(statement) {
            if kinds.contains(&edge.kind) && !seen.contains(&&edge.predicate) {
                seen.push(&edge.predicate);
            }
        }
        seen
    }

    fn statements_of(&self, predicate: &Signature, kinds: &[EdgeKind]) -> Vec<usize> {
        let mut seen = Vec::new();
        for edge in self.edges_to(predicate) {
            if kinds.contains(&edge.kind) && !seen.contains(&edge.statement) {
                seen.push(edge.statement);
            }
        }
        seen.sort_unstable();
        seen
    }

    /// Predicates whose atoms a statement derives
    pub fn defined_by(&self, statement: usize) -> Vec<&Signature> {
        self.predicates_of(statement, &[EdgeKind::Defines])
    }

    /// Predicates consulted in a statement's body
    pub fn used_by(&self, statement: usize) -> Vec<&Signature> {
        self.predicates_of(statement, &[EdgeKind::Uses])
    }

    /// Predicates a statement depends on: body plus head conditions
    pub fn dependencies_of(&self, statement: usize) -> Vec<&Signature> {
        self.predicates_of(statement, &[EdgeKind::Uses, EdgeKind::Conditions])
    }

    /// Statements defining a predicate
    pub fn definers_of(&self, predicate: &Signature) -> Vec<usize> {
        self.statements_of(predicate, &[EdgeKind::Defines])
    }

    /// Statements consulting a predicate in their body
    pub fn users_of(&self, predicate: &Signature) -> Vec<usize> {
        self.statements_of(predicate, &[EdgeKind::Uses])
    }

    /// `#show p/n` statements naming a predicate
    pub fn shown_by(&self, predicate: &Signature) -> Vec<usize> {
        self.statements_of(predicate, &[EdgeKind::Shows])
    }

    /// Predicates named by a `#show p/n` directive
    pub fn shown(&self) -> Vec<&Signature> {
        self.predicates
            .iter()
            .filter(|p| !self.shown_by(p).is_empty())
            .collect()
    }

    pub fn predicates(&self) -> impl Iterator<Item = &Signature> {
        self.predicates.iter()
    }

    pub fn contains(&self, predicate: &Signature) -> bool {
        self.predicates.contains(predicate)
    }

    /// Predicates consulted somewhere but never defined
    pub fn undefined(&self) -> Vec<&Signature> {
        self.predicates
            .iter()
            .filter(|p| self.definers_of(p).is_empty())
            .collect()
    }

    /// Predicates defined somewhere but never consulted nor shown
    pub fn unused(&self) -> Vec<&Signature> {
        self.predicates
            .iter()
            .filter(|p| {
                self.edges_to(p)
                    .iter()
                    .all(|e| !e.kind.is_dependency() && e.kind != EdgeKind::Shows)
            })
            .collect()
    }

    /// All edges, grouped by statement
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        (0..self.statements).flat_map(|s| self.edges_of(s).iter())
    }

    pub fn edge_count(&self) -> usize {
        self.edges_from.values().map(|v| v.len()).sum()
    }

    /// Whether the predicate dependency graph has no cycle, negation ignored
    pub fn is_acyclic(&self) -> bool {
        *self.acyclic.get_or_init(|| {
            let (adjacency, components) = self.components();
            let self_loop = adjacency
                .iter()
                .enumerate()
                .any(|(from, targets)| targets.iter().any(|(to, _)| *to == from));
            !self_loop && components.iter().all(|c| c.len() == 1)
        })
    }

    /// Whether no predicate depends on itself through negation
    pub fn is_stratified(&self) -> bool {
        *self.stratified.get_or_init(|| {
            let (adjacency, components) = self.components();
            let mut component_of = vec![0; adjacency.len()];
            for (index, component) in components.iter().enumerate() {
                for predicate in component {
                    component_of[*predicate] = index;
                }
            }
            adjacency.iter().enumerate().all(|(from, targets)| {
                targets
                    .iter()
                    .all(|(to, negative)| !negative || component_of[from] != component_of[*to])
            })
        })
    }

    /// Predicate → predicate adjacency (dependency to dependent) and its
    /// strongly connected components.
    fn components(&self) -> (Vec<Vec<(usize, bool)>>, Vec<Vec<usize>>) {
        let index: HashMap<&Signature, usize> =
            self.predicates.iter().enumerate().map(|(i, p)| (p, i)).collect();
        let mut adjacency = vec![Vec::new(); self.predicates.len()];
        for statement in self.edges_from.keys() {
            let heads = self.defined_by(*statement);
            for edge in self.edges_of(*statement).iter().filter(|e| e.kind.is_dependency()) {
                for head in &heads {
                    adjacency[index[&edge.predicate]].push((index[*head], edge.negative));
                }
            }
        }
        let components = Tarjan::run(&adjacency);
        (adjacency, components)
    }

    pub fn stats(&self) -> GraphStats {
        let count = |kind: EdgeKind| {
            self.edges_from.values().flatten().filter(|e| e.kind == kind).count()
        };
        GraphStats {
            predicates: self.predicates.len(),
            defines: count(EdgeKind::Defines),
            uses: count(EdgeKind::Uses),
            conditions: count(EdgeKind::Conditions),
            shows: count(EdgeKind::Shows),
            negative: self.edges_from.values().flatten().filter(|e| e.negative).count(),
            acyclic: self.is_acyclic(),
            stratified: self.is_stratified(),
        }
    }
}

/// Edge contributed by one symbolic atom, decided by where it sits in its
/// statement.
fn atom_edge(tree: &Tree, statement: usize, atom: NodeId) -> Option<Edge> {
    let signature = tree.signature_of(atom)?;
    let node = tree.node(atom);
    let mut region = node.field;
    let mut in_condition = node.field == "condition";
    let mut negative = false;

    for ancestor in tree.ancestors(atom) {
        if ancestor.is_root() {
            break;
        }
        // Any `not` on the way up negates, including one on an
        // enclosing aggregate literal
        if ancestor.kind == NodeKind::Literal {
            negative |= !ancestor.is_positive();
        }
        in_condition |= ancestor.field == "condition";
        region = ancestor.field;
    }

    match region {
        "head" if in_condition => Some(Edge::conditions(statement, signature, negative)),
        "head" | "atom" => Some(Edge::defines(statement, signature)),
        "body" => Some(Edge::uses(statement, signature, negative)),
        _ => None,
    }
}

/// Tarjan's strongly connected components
struct Tarjan<'a> {
    adjacency: &'a [Vec<(usize, bool)>],
    index: Vec<Option<usize>>,
    lowlink: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<usize>,
    next: usize,
    components: Vec<Vec<usize>>,
}

impl<'a> Tarjan<'a> {
    fn run(adjacency: &'a [Vec<(usize, bool)>]) -> Vec<Vec<usize>> {
        let n = adjacency.len();
        let mut tarjan = Self {
            adjacency,
            index: vec![None; n],
            lowlink: vec![0; n],
            on_stack: vec![false; n],
            stack: Vec::new(),
            next: 0,
            components: Vec::new(),
        };
        for v in 0..n {
            if tarjan.index[v].is_none() {
                tarjan.connect(v);
            }
        }
        tarjan.components
    }

    fn connect(&mut self, v: usize) {
        self.index[v] = Some(self.next);
        self.lowlink[v] = self.next;
        self.next += 1;
        self.stack.push(v);
        self.on_stack[v] = true;

        let adjacency = self.adjacency;
        for &(w, _) in &adjacency[v] {
            match self.index[w] {
                None => {
                    self.connect(w);
                    self.lowlink[v] = self.lowlink[v].min(self.lowlink[w]);
                }
                Some(index) if self.on_stack[w] => {
                    self.lowlink[v] = self.lowlink[v].min(index);
                }
                Some(_) => {}
            }
        }

        if Some(self.lowlink[v]) == self.index[v] {
            let mut component = Vec::new();
            while let Some(w) = self.stack.pop() {
                self.on_stack[w] = false;
                component.push(w);
                if w == v {
                    break;
                }
            }
            self.components.push(component);
        }
    }
}

/// Statistics about a dependency graph
#[derive(Debug, Clone, serde::Serialize)]
pub struct GraphStats {
    pub predicates: usize,
    pub defines: usize,
    pub uses: usize,
    pub conditions: usize,
    pub shows: usize,
    pub negative: usize,
    pub acyclic: bool,
    pub stratified: bool,
}

impl std::fmt::Display for GraphStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Dependency Graph Statistics:")?;
        writeln!(f, "  Predicates: {}", self.predicates)?;
        writeln!(f, "  Edges: {} defines, {} uses, {} conditions, {} shows ({} negative)",
            self.defines, self.uses, self.conditions, self.shows, self.negative)?;
        writeln!(f, "  Acyclic: {}", self.acyclic)?;
        writeln!(f, "  Stratified: {}", self.stratified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::{AggregateFunction, ComparisonOperator, Guard, RawNode, Sign};

    fn sig(name: &str, arity: u32) -> Signature {
        Signature::new(name, arity)
    }

    fn x() -> RawNode {
        RawNode::variable("X")
    }

    fn pos(name: &str) -> RawNode {
        RawNode::atom(Sign::NoSign, name, vec![x()])
    }

    fn neg(name: &str) -> RawNode {
        RawNode::atom(Sign::Negation, name, vec![x()])
    }

    fn graph_of(statements: Vec<RawNode>) -> DependencyGraph {
        DependencyGraph::build(&Tree::build(&statements).unwrap())
    }

    #[test]
    fn test_defines_and_uses() {
        // p(X) :- q(X), not r(X).
        let graph = graph_of(vec![RawNode::rule(pos("p"), vec![pos("q"), neg("r")])]);

        assert_eq!(graph.defined_by(0), vec![&sig("p", 1)]);
        assert_eq!(graph.used_by(0), vec![&sig("q", 1), &sig("r", 1)]);
        assert_eq!(graph.definers_of(&sig("p", 1)), vec![0]);
        assert_eq!(graph.users_of(&sig("r", 1)), vec![0]);
        assert!(graph.edges_of(0).iter().any(|e| e.predicate == sig("r", 1) && e.negative));
    }

    #[test]
    fn test_isolated_predicates() {
        // p(X) :- q(X).
        let graph = graph_of(vec![RawNode::rule(pos("p"), vec![pos("q")])]);
        assert_eq!(graph.undefined(), vec![&sig("q", 1)]);
        assert_eq!(graph.unused(), vec![&sig("p", 1)]);
        assert!(graph.users_of(&sig("p", 1)).is_empty());
    }

    #[test]
    fn test_head_condition_is_not_a_body_use() {
        // { p(X) : q(X) }.
        let choice = RawNode::Aggregate {
            location: None,
            left_guard: None,
            elements: vec![RawNode::ConditionalLiteral {
                location: None,
                literal: Box::new(pos("p")),
                condition: vec![pos("q")],
            }],
            right_guard: None,
        };
        let graph = graph_of(vec![RawNode::rule(choice, vec![])]);

        assert_eq!(graph.defined_by(0), vec![&sig("p", 1)]);
        assert!(graph.used_by(0).is_empty());
        assert_eq!(graph.dependencies_of(0), vec![&sig("q", 1)]);
    }

    #[test]
    fn test_directives() {
        let defined = RawNode::Defined { location: None, name: "edge".into(), arity: 2, positive: true };
        let show = RawNode::ShowSignature { location: None, name: "path".into(), arity: 2, positive: true };
        let graph = graph_of(vec![defined, show]);

        assert_eq!(graph.defined_by(0), vec![&sig("edge", 2)]);
        assert!(graph.used_by(1).is_empty());
        assert!(graph.users_of(&sig("path", 2)).is_empty());
        assert_eq!(graph.shown_by(&sig("path", 2)), vec![1]);
        assert_eq!(graph.shown(), vec![&sig("path", 2)]);
        assert_eq!(graph.stats().shows, 1);
    }

    #[test]
    fn test_acyclic_and_stratified() {
        // p(X) :- q(X).  r(X) :- p(X), not s(X).
        let graph = graph_of(vec![
            RawNode::rule(pos("p"), vec![pos("q")]),
            RawNode::rule(pos("r"), vec![pos("p"), neg("s")]),
        ]);
        assert!(graph.is_acyclic());
        assert!(graph.is_stratified());
    }

    #[test]
    fn test_positive_recursion_is_stratified() {
        // path(X) :- edge(X).  path(X) :- path(X).
        let graph = graph_of(vec![
            RawNode::rule(pos("path"), vec![pos("edge")]),
            RawNode::rule(pos("path"), vec![pos("path")]),
        ]);
        assert!(!graph.is_acyclic());
        assert!(graph.is_stratified());
    }

    #[test]
    fn test_negative_cycle_is_not_stratified() {
        // a(X) :- d(X), not b(X).  b(X) :- d(X), not a(X).
        let graph = graph_of(vec![
            RawNode::rule(pos("a"), vec![pos("d"), neg("b")]),
            RawNode::rule(pos("b"), vec![pos("d"), neg("a")]),
        ]);
        assert!(!graph.is_acyclic());
        assert!(!graph.is_stratified());
        let stats = graph.stats();
        assert_eq!(stats.predicates, 3);
        assert_eq!(stats.negative, 2);
    }

    #[test]
    fn test_negated_aggregate_is_a_negative_dependency() {
        // a :- not #count { 1 : b } > 0.  b :- a.
        let element = RawNode::AggregateElement {
            location: None,
            terms: vec![RawNode::constant("1")],
            condition: vec![RawNode::atom(Sign::NoSign, "b", vec![])],
        };
        let count = RawNode::BodyAggregate {
            location: None,
            function: AggregateFunction::Count,
            left_guard: None,
            elements: vec![element],
            right_guard: Some(Guard {
                comparison: ComparisonOperator::GreaterThan,
                term: Box::new(RawNode::constant("0")),
            }),
        };
        let graph = graph_of(vec![
            RawNode::rule(
                RawNode::atom(Sign::NoSign, "a", vec![]),
                vec![RawNode::literal(Sign::Negation, count)],
            ),
            RawNode::rule(
                RawNode::atom(Sign::NoSign, "b", vec![]),
                vec![RawNode::atom(Sign::NoSign, "a", vec![])],
            ),
        ]);

        let to_b = graph.edges_of(0).iter().find(|e| e.predicate == sig("b", 0)).unwrap();
        assert_eq!(to_b.kind, EdgeKind::Uses);
        assert!(to_b.negative);
        assert!(!graph.is_acyclic());
        assert!(!graph.is_stratified());
    }

    #[test]
    fn test_empty_graph() {
        let graph = graph_of(vec![]);
        assert!(graph.is_acyclic());
        assert!(graph.is_stratified());
        assert_eq!(graph.edges().count(), 0);
    }
}
