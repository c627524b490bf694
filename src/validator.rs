//! The two validation algorithms.
//!
//! [`RecursiveValidation`] proves a single node against a single label,
//! exploring the graph on demand and assuming recursive hypotheses hold
//! until disproved. It is fast on sparse graphs but can accept a node
//! that a sound algorithm rejects when recursion crosses a negation.
//!
//! [`RefineValidation`] computes the greatest fixpoint over the whole
//! graph, one stratum at a time: every node is first assumed to satisfy
//! every label of the stratum, then invalid associations are repeatedly
//! removed until none fails. Lower strata are finalized before higher
//! ones, which makes the result sound and complete for stratified
//! schemas.

use crate::bag::BagIterator;
use crate::error::ShexValidationError;
use crate::graph::{NeighborTriple, NeighborsGraph};
use crate::matcher::{collect_matching_tc, PredicateAndValueMatcher, PredicateOnlyMatcher};
use crate::model::{Label, Shape, ShapeExpr};
use crate::schema::ShexSchema;
use crate::sorbe::Sorbe;
use crate::typing::{RecursiveTyping, RefinementTyping, Typing};
use oxrdf::{NamedNode, Term};
use rustc_hash::FxHashSet;

/// A validation algorithm over a fixed schema and graph.
pub trait ValidationAlgorithm {
    /// Decides whether the node satisfies the shape bound to the label,
    /// falling back to the schema's start shape when no label is given.
    ///
    /// The typing is reset at each call.
    fn validate(&mut self, node: &Term, label: Option<&Label>)
        -> Result<bool, ShexValidationError>;

    /// The typing produced by the last [`validate`](Self::validate) call.
    fn typing(&self) -> &dyn Typing;
}

fn resolve_label(
    schema: &ShexSchema,
    label: Option<&Label>,
) -> Result<Label, ShexValidationError> {
    let label = label
        .or_else(|| schema.start())
        .ok_or_else(|| ShexValidationError::unknown_label("no label and no start shape"))?;
    if schema.shape_expr(label).is_none() {
        return Err(ShexValidationError::unknown_label(label.clone()));
    }
    Ok(label.clone())
}

/// Incident triples a shape has to account for: the inverse neighbours
/// named by its constraints, plus either every outgoing triple for a
/// closed shape or only the constrained ones for an open shape.
fn neighbourhood<G: NeighborsGraph>(
    graph: &G,
    node: &Term,
    shape: &Shape,
    sorbe: &Sorbe,
) -> Vec<NeighborTriple> {
    let mut forward: FxHashSet<NamedNode> = FxHashSet::default();
    let mut inverse: FxHashSet<NamedNode> = FxHashSet::default();
    for tc in sorbe.constraints() {
        if tc.property().is_forward() {
            forward.insert(tc.property().iri().clone());
        } else {
            inverse.insert(tc.property().iri().clone());
        }
    }
    let mut triples = graph.in_neighbours_with_predicate(node, &inverse);
    if shape.is_closed() {
        triples.extend(graph.out_neighbours(node));
    } else {
        triples.extend(graph.out_neighbours_with_predicate(node, &forward));
    }
    triples
}

/// Matches a neighbourhood against a shape under a fixed typing.
///
/// Triples with no candidate constraint must be covered by the shape's
/// extra properties and are left out of the bags; the rest must be
/// committed so that some bag satisfies the normal form.
fn matches_neighbourhood(
    shape: &Shape,
    sorbe: &Sorbe,
    triples: &[NeighborTriple],
    typing: &dyn Typing,
) -> bool {
    let matcher = PredicateAndValueMatcher::new(typing);
    let matching = collect_matching_tc(triples, sorbe.constraints(), &matcher);
    let mut committed = Vec::with_capacity(matching.len());
    for (triple, candidates) in triples.iter().zip(matching) {
        if candidates.is_empty() {
            if !shape.extra_properties().contains(triple.property()) {
                return false;
            }
        } else {
            committed.push(candidates);
        }
    }
    BagIterator::new(&committed, sorbe.constraints().len()).any(|bag| sorbe.accepts(&bag))
}

/// The recursive, goal-directed algorithm.
pub struct RecursiveValidation<'a, G> {
    schema: &'a ShexSchema,
    graph: &'a G,
    typing: RecursiveTyping,
}

impl<'a, G: NeighborsGraph> RecursiveValidation<'a, G> {
    /// Creates a validator for the given schema and graph.
    pub fn new(schema: &'a ShexSchema, graph: &'a G) -> Self {
        Self {
            schema,
            graph,
            typing: RecursiveTyping::new(),
        }
    }

    /// Decides whether the node satisfies the label, under the hypotheses
    /// currently in the typing. The hypothesis for this very pair is
    /// pushed for the duration of the descent, so a recursive reference
    /// back to it is assumed to hold.
    fn satisfies(&mut self, node: &Term, label: &Label) -> Result<bool, ShexValidationError> {
        let schema = self.schema;
        let expr = schema
            .shape_expr(label)
            .ok_or_else(|| ShexValidationError::unknown_label(label.clone()))?;
        self.typing.add(node.clone(), label.clone());
        let result = self.satisfies_expr(node, expr);
        self.typing.remove(node, label);
        result
    }

    fn satisfies_expr(
        &mut self,
        node: &Term,
        expr: &ShapeExpr,
    ) -> Result<bool, ShexValidationError> {
        match expr {
            ShapeExpr::ShapeAnd(exprs) => {
                for e in exprs {
                    if !self.satisfies_expr(node, e)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            ShapeExpr::ShapeOr(exprs) => {
                for e in exprs {
                    if self.satisfies_expr(node, e)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            ShapeExpr::ShapeNot(e) => Ok(!self.satisfies_expr(node, e)?),
            ShapeExpr::NodeConstraint(nc) => Ok(nc.matches(node)),
            ShapeExpr::ShapeRef(label) => {
                if self.typing.contains(node, label) {
                    Ok(true)
                } else {
                    self.satisfies(node, label)
                }
            }
            ShapeExpr::Shape(shape) => self.shape_locally_valid(node, shape),
            ShapeExpr::ShapeExternal => Err(ShexValidationError::ExternalShape),
        }
    }

    fn shape_locally_valid(
        &mut self,
        node: &Term,
        shape: &Shape,
    ) -> Result<bool, ShexValidationError> {
        let schema = self.schema;
        let slot = shape
            .sorbe_slot()
            .ok_or_else(|| ShexValidationError::internal("shape without a normal form"))?;
        let sorbe = schema.sorbe(slot);
        if sorbe.constraints().is_empty() {
            return Ok(!shape.is_closed() || self.graph.out_neighbours(node).is_empty());
        }
        let triples = neighbourhood(self.graph, node, shape, sorbe);

        // First pass on predicates alone: triples no constraint can ever
        // account for must be extra, and every (opposite, value) pair a
        // candidate needs is proved now, recursively.
        let pre_matching = collect_matching_tc(&triples, sorbe.constraints(), &PredicateOnlyMatcher);
        let mut proven: Vec<(Term, Label)> = Vec::new();
        for (triple, candidates) in triples.iter().zip(&pre_matching) {
            if candidates.is_empty() {
                if !shape.extra_properties().contains(triple.property()) {
                    return Ok(false);
                }
                continue;
            }
            for &index in candidates {
                let value = sorbe.constraints()[index].value();
                let opposite = triple.opposite();
                if !self.typing.contains(opposite, value) && self.satisfies(opposite, value)? {
                    proven.push((opposite.clone(), value.clone()));
                }
            }
        }

        // Second pass with the proved associations visible to the matcher.
        self.typing.add_all(&proven);
        let result = matches_neighbourhood(shape, sorbe, &triples, &self.typing);
        self.typing.remove_all(&proven);
        Ok(result)
    }
}

impl<G: NeighborsGraph> ValidationAlgorithm for RecursiveValidation<'_, G> {
    fn validate(
        &mut self,
        node: &Term,
        label: Option<&Label>,
    ) -> Result<bool, ShexValidationError> {
        let label = resolve_label(self.schema, label)?;
        self.typing.clear();
        let result = self.satisfies(node, &label)?;
        if result {
            self.typing.add(node.clone(), label);
        }
        Ok(result)
    }

    fn typing(&self) -> &dyn Typing {
        &self.typing
    }
}

/// The stratified whole-graph algorithm.
pub struct RefineValidation<'a, G> {
    schema: &'a ShexSchema,
    graph: &'a G,
    typing: RefinementTyping<'a>,
}

impl<'a, G: NeighborsGraph> RefineValidation<'a, G> {
    /// Creates a validator for the given schema and graph.
    pub fn new(schema: &'a ShexSchema, graph: &'a G) -> Self {
        Self {
            schema,
            graph,
            typing: RefinementTyping::new(schema),
        }
    }

    /// Local satisfaction under the current typing: references are looked
    /// up, never descended into. Associations of lower strata are already
    /// final and those of the current stratum are still optimistic.
    fn locally_satisfies(
        &self,
        node: &Term,
        expr: &ShapeExpr,
    ) -> Result<bool, ShexValidationError> {
        match expr {
            ShapeExpr::ShapeAnd(exprs) => {
                for e in exprs {
                    if !self.locally_satisfies(node, e)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            ShapeExpr::ShapeOr(exprs) => {
                for e in exprs {
                    if self.locally_satisfies(node, e)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            ShapeExpr::ShapeNot(e) => Ok(!self.locally_satisfies(node, e)?),
            ShapeExpr::NodeConstraint(nc) => Ok(nc.matches(node)),
            ShapeExpr::ShapeRef(label) => Ok(self.typing.contains(node, label)),
            ShapeExpr::Shape(shape) => {
                let slot = shape
                    .sorbe_slot()
                    .ok_or_else(|| ShexValidationError::internal("shape without a normal form"))?;
                let sorbe = self.schema.sorbe(slot);
                if sorbe.constraints().is_empty() {
                    return Ok(!shape.is_closed() || self.graph.out_neighbours(node).is_empty());
                }
                let triples = neighbourhood(self.graph, node, shape, sorbe);
                Ok(matches_neighbourhood(shape, sorbe, &triples, &self.typing))
            }
            ShapeExpr::ShapeExternal => Err(ShexValidationError::ExternalShape),
        }
    }
}

impl<G: NeighborsGraph> ValidationAlgorithm for RefineValidation<'_, G> {
    fn validate(
        &mut self,
        node: &Term,
        label: Option<&Label>,
    ) -> Result<bool, ShexValidationError> {
        let label = resolve_label(self.schema, label)?;
        self.typing = RefinementTyping::new(self.schema);

        let mut nodes = self.graph.all_nodes();
        if !nodes.contains(node) {
            nodes.push(node.clone());
        }

        for stratum in 0..self.schema.stratum_count() {
            // Seed only the labels some reference can reach, plus the
            // requested one. Other labels never influence the fixpoint and
            // must not clutter the resulting typing.
            for l in self.schema.stratum(stratum) {
                if !self.schema.is_selected(l) && *l != label {
                    continue;
                }
                for n in &nodes {
                    self.typing.add(n.clone(), l.clone());
                }
            }
            loop {
                let pairs = self.typing.stratum_pairs(stratum);
                let mut failing = Vec::new();
                for (n, l) in &pairs {
                    let expr = self
                        .schema
                        .shape_expr(l)
                        .ok_or_else(|| ShexValidationError::internal("label without definition"))?;
                    if !self.locally_satisfies(n, expr)? {
                        failing.push((n.clone(), l.clone()));
                    }
                }
                if failing.is_empty() {
                    break;
                }
                self.typing.remove_all(stratum, &failing);
            }
        }
        Ok(self.typing.contains(node, &label))
    }

    fn typing(&self) -> &dyn Typing {
        &self.typing
    }
}
