//! Graph collaborator: neighbor edges and the interface the engine needs
//! from an RDF graph.

use oxrdf::{Graph, NamedNode, SubjectRef, Term};
use rustc_hash::FxHashSet;
use std::fmt;

/// A predicate with an orientation, forward or inverse.
///
/// Used as the matching key between a triple constraint and a candidate
/// edge: two directed properties are equal iff predicate and direction
/// match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TcProperty {
    iri: NamedNode,
    forward: bool,
}

impl TcProperty {
    /// Creates a forward property.
    pub fn forward(iri: NamedNode) -> Self {
        Self { iri, forward: true }
    }

    /// Creates an inverse property.
    pub fn inverse(iri: NamedNode) -> Self {
        Self {
            iri,
            forward: false,
        }
    }

    /// The encapsulated predicate.
    pub fn iri(&self) -> &NamedNode {
        &self.iri
    }

    /// Tests whether the property is forward.
    pub fn is_forward(&self) -> bool {
        self.forward
    }
}

impl fmt::Display for TcProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.forward {
            write!(f, "^")?;
        }
        write!(f, "<{}>", self.iri.as_str())
    }
}

/// A triple re-expressed relative to a focus node.
///
/// `opposite` is the node on the far end of the edge regardless of its
/// direction: the object of an outgoing triple, the subject of an incoming
/// one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NeighborTriple {
    focus: Term,
    property: TcProperty,
    opposite: Term,
}

impl NeighborTriple {
    /// Creates a neighbor triple.
    pub fn new(focus: Term, property: TcProperty, opposite: Term) -> Self {
        Self {
            focus,
            property,
            opposite,
        }
    }

    /// The focus node.
    pub fn focus(&self) -> &Term {
        &self.focus
    }

    /// The directed property carried by the edge.
    pub fn property(&self) -> &TcProperty {
        &self.property
    }

    /// The node on the far end of the edge.
    pub fn opposite(&self) -> &Term {
        &self.opposite
    }
}

impl fmt::Display for NeighborTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.focus, self.property, self.opposite)
    }
}

/// The neighbor-enumeration capability the validation engine consumes.
///
/// Methods return owned vectors so the same node can be queried repeatedly
/// and independently across recursive calls.
pub trait NeighborsGraph {
    /// All edges with the given node as subject.
    fn out_neighbours(&self, focus: &Term) -> Vec<NeighborTriple>;

    /// Edges with the given node as subject and a predicate in the set.
    fn out_neighbours_with_predicate(
        &self,
        focus: &Term,
        predicates: &FxHashSet<NamedNode>,
    ) -> Vec<NeighborTriple>;

    /// Edges with the given node as object and a predicate in the set.
    fn in_neighbours_with_predicate(
        &self,
        focus: &Term,
        predicates: &FxHashSet<NamedNode>,
    ) -> Vec<NeighborTriple>;

    /// All subject and object nodes of the graph.
    fn all_nodes(&self) -> Vec<Term>;
}

fn as_subject(focus: &Term) -> Option<SubjectRef<'_>> {
    match focus {
        Term::NamedNode(n) => Some(SubjectRef::NamedNode(n.as_ref())),
        Term::BlankNode(b) => Some(SubjectRef::BlankNode(b.as_ref())),
        _ => None,
    }
}

impl NeighborsGraph for Graph {
    fn out_neighbours(&self, focus: &Term) -> Vec<NeighborTriple> {
        let Some(subject) = as_subject(focus) else {
            return Vec::new();
        };
        self.triples_for_subject(subject)
            .map(|t| {
                NeighborTriple::new(
                    focus.clone(),
                    TcProperty::forward(t.predicate.into_owned()),
                    t.object.into_owned(),
                )
            })
            .collect()
    }

    fn out_neighbours_with_predicate(
        &self,
        focus: &Term,
        predicates: &FxHashSet<NamedNode>,
    ) -> Vec<NeighborTriple> {
        let Some(subject) = as_subject(focus) else {
            return Vec::new();
        };
        let mut result = Vec::new();
        for predicate in predicates {
            for object in self.objects_for_subject_predicate(subject, predicate) {
                result.push(NeighborTriple::new(
                    focus.clone(),
                    TcProperty::forward(predicate.clone()),
                    object.into_owned(),
                ));
            }
        }
        result
    }

    fn in_neighbours_with_predicate(
        &self,
        focus: &Term,
        predicates: &FxHashSet<NamedNode>,
    ) -> Vec<NeighborTriple> {
        let mut result = Vec::new();
        for predicate in predicates {
            for subject in self.subjects_for_predicate_object(predicate, focus) {
                result.push(NeighborTriple::new(
                    focus.clone(),
                    TcProperty::inverse(predicate.clone()),
                    Term::from(subject.into_owned()),
                ));
            }
        }
        result
    }

    fn all_nodes(&self) -> Vec<Term> {
        let mut nodes = FxHashSet::default();
        for triple in self.iter() {
            nodes.insert(Term::from(triple.subject.into_owned()));
            nodes.insert(triple.object.into_owned());
        }
        nodes.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::{Literal, NamedNode, Triple};

    fn nn(iri: &str) -> NamedNode {
        NamedNode::new_unchecked(iri)
    }

    fn graph() -> Graph {
        let mut graph = Graph::new();
        graph.insert(&Triple::new(
            nn("http://example.org/a"),
            nn("http://example.org/p"),
            nn("http://example.org/b"),
        ));
        graph.insert(&Triple::new(
            nn("http://example.org/a"),
            nn("http://example.org/q"),
            Literal::new_simple_literal("x"),
        ));
        graph.insert(&Triple::new(
            nn("http://example.org/b"),
            nn("http://example.org/p"),
            nn("http://example.org/a"),
        ));
        graph
    }

    #[test]
    fn out_neighbours_enumerates_subject_edges() {
        let graph = graph();
        let focus = Term::from(nn("http://example.org/a"));
        let edges = graph.out_neighbours(&focus);
        assert_eq!(edges.len(), 2);
        assert!(edges.iter().all(|e| e.focus() == &focus));
        assert!(edges.iter().all(|e| e.property().is_forward()));
    }

    #[test]
    fn out_neighbours_of_literal_is_empty() {
        let graph = graph();
        let focus = Term::from(Literal::new_simple_literal("x"));
        assert!(graph.out_neighbours(&focus).is_empty());
    }

    #[test]
    fn in_neighbours_reports_opposite_subject() {
        let graph = graph();
        let focus = Term::from(nn("http://example.org/a"));
        let predicates = [nn("http://example.org/p")].into_iter().collect();
        let edges = graph.in_neighbours_with_predicate(&focus, &predicates);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].opposite(), &Term::from(nn("http://example.org/b")));
        assert!(!edges[0].property().is_forward());
    }

    #[test]
    fn all_nodes_covers_subjects_and_objects() {
        let graph = graph();
        let nodes = graph.all_nodes();
        assert_eq!(nodes.len(), 3);
        assert!(nodes.contains(&Term::from(Literal::new_simple_literal("x"))));
    }

    #[test]
    fn tc_property_display_and_equality() {
        let fwd = TcProperty::forward(nn("http://example.org/p"));
        let inv = TcProperty::inverse(nn("http://example.org/p"));
        assert_ne!(fwd, inv);
        assert_eq!(fwd.to_string(), "<http://example.org/p>");
        assert_eq!(inv.to_string(), "^<http://example.org/p>");
    }
}
