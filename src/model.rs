//! ShEx abstract model types.
//!
//! This module defines the abstract syntax validated by the engine:
//! - [`Label`] - Identifier for shape and triple expression definitions
//! - [`ShapeExpr`] - Shape expression combinators (AND/OR/NOT, constraints, shapes, references)
//! - [`TripleExpr`] - Triple expression combinators over a node's incident edges
//! - [`Interval`] - Cardinality bounds with interval arithmetic
//!
//! Expressions are immutable once a schema is built; references are labels
//! resolved through the owning [`ShexSchema`](crate::ShexSchema).

use crate::constraint::NodeConstraint;
use crate::graph::TcProperty;
use oxrdf::{BlankNode, NamedNode, Term};
use rustc_hash::FxHashSet;
use std::fmt;

/// Unique identifier of a shape or triple expression definition.
///
/// Generated labels are assigned by schema construction to anonymous value
/// expressions; they are never externally referenceable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Label {
    /// Named definition (IRI).
    Iri(NamedNode),
    /// Anonymous definition (blank node).
    BNode(BlankNode),
    /// Internally generated label.
    Generated(usize),
}

impl Label {
    /// Returns the label as a named node if it is one.
    pub fn as_iri(&self) -> Option<&NamedNode> {
        match self {
            Self::Iri(n) => Some(n),
            Self::BNode(_) | Self::Generated(_) => None,
        }
    }

    /// Returns the label as a blank node if it is one.
    pub fn as_bnode(&self) -> Option<&BlankNode> {
        match self {
            Self::BNode(b) => Some(b),
            Self::Iri(_) | Self::Generated(_) => None,
        }
    }

    /// Returns true for internally generated labels.
    pub fn is_generated(&self) -> bool {
        matches!(self, Self::Generated(_))
    }
}

impl From<NamedNode> for Label {
    fn from(n: NamedNode) -> Self {
        Self::Iri(n)
    }
}

impl From<BlankNode> for Label {
    fn from(b: BlankNode) -> Self {
        Self::BNode(b)
    }
}

impl From<Label> for String {
    fn from(label: Label) -> Self {
        label.to_string()
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iri(n) => write!(f, "<{}>", n.as_str()),
            Self::BNode(b) => write!(f, "_:{}", b.as_str()),
            Self::Generated(n) => write!(f, "_gen:{n}"),
        }
    }
}

/// Shape expression combinators.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeExpr {
    /// Conjunction: the node must satisfy every sub-expression.
    ShapeAnd(Vec<ShapeExpr>),

    /// Disjunction: the node must satisfy at least one sub-expression.
    ShapeOr(Vec<ShapeExpr>),

    /// Negation of a shape expression.
    ShapeNot(Box<ShapeExpr>),

    /// Value-only check on the focus node, no edge traversal.
    NodeConstraint(NodeConstraint),

    /// Triple-expression shape over the node's incident edges.
    Shape(Shape),

    /// Reference to a labelled definition. Cyclic references are legal.
    ShapeRef(Label),

    /// External shape. Validating it is an error.
    ShapeExternal,
}

impl ShapeExpr {
    /// Returns true if this is a shape reference.
    pub fn is_ref(&self) -> bool {
        matches!(self, Self::ShapeRef(_))
    }

    /// Returns the referenced label if this is a reference.
    pub fn as_ref_label(&self) -> Option<&Label> {
        match self {
            Self::ShapeRef(label) => Some(label),
            _ => None,
        }
    }
}

/// A shape: a triple expression with extra properties and a closedness flag.
#[derive(Debug, Clone)]
pub struct Shape {
    triple_expr: TripleExpr,
    extra: FxHashSet<TcProperty>,
    closed: bool,
    /// Index into the owning schema's normal form table, assigned during
    /// schema construction.
    sorbe_slot: Option<usize>,
}

impl Shape {
    /// Creates an open shape with no extra properties.
    pub fn new(triple_expr: TripleExpr) -> Self {
        Self {
            triple_expr,
            extra: FxHashSet::default(),
            closed: false,
            sorbe_slot: None,
        }
    }

    /// Sets whether this shape is closed.
    pub fn closed(mut self, closed: bool) -> Self {
        self.closed = closed;
        self
    }

    /// Adds extra properties allowed on the node without matching any
    /// triple constraint.
    pub fn with_extra(mut self, extra: impl IntoIterator<Item = TcProperty>) -> Self {
        self.extra.extend(extra);
        self
    }

    /// The shape's triple expression.
    pub fn triple_expr(&self) -> &TripleExpr {
        &self.triple_expr
    }

    /// Whether the shape is closed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Predicates permitted on the node without being matched.
    pub fn extra_properties(&self) -> &FxHashSet<TcProperty> {
        &self.extra
    }

    pub(crate) fn triple_expr_mut(&mut self) -> &mut TripleExpr {
        &mut self.triple_expr
    }

    pub(crate) fn sorbe_slot(&self) -> Option<usize> {
        self.sorbe_slot
    }

    pub(crate) fn set_sorbe_slot(&mut self, slot: usize) {
        self.sorbe_slot = Some(slot);
    }
}

/// Equality ignores the slot, which only records where the owning schema
/// stored the normal form: the same shape compares equal before and after
/// compilation.
impl PartialEq for Shape {
    fn eq(&self, other: &Self) -> bool {
        self.triple_expr == other.triple_expr
            && self.extra == other.extra
            && self.closed == other.closed
    }
}

/// Triple expression combinators.
#[derive(Debug, Clone, PartialEq)]
pub enum TripleExpr {
    /// Group that must be satisfied by every sub-expression.
    EachOf {
        /// Sub-expressions.
        exprs: Vec<TripleExpr>,
        /// Annotations carried, not interpreted.
        annotations: Vec<Annotation>,
    },

    /// Group satisfied by exactly one sub-expression.
    OneOf {
        /// Sub-expressions.
        exprs: Vec<TripleExpr>,
        /// Annotations carried, not interpreted.
        annotations: Vec<Annotation>,
    },

    /// Atomic constraint on edges with a given directed property.
    TripleConstraint(TripleConstraint),

    /// Cardinality wrapper around any triple expression.
    Repeated(Box<TripleExpr>, Interval),

    /// Reference to a labelled triple expression definition.
    TripleExprRef(Label),

    /// Matches a node with no relevant incident edges.
    Empty,
}

impl TripleExpr {
    /// Creates an `EachOf` group without annotations.
    pub fn each_of(exprs: Vec<TripleExpr>) -> Self {
        Self::EachOf {
            exprs,
            annotations: Vec::new(),
        }
    }

    /// Creates a `OneOf` group without annotations.
    pub fn one_of(exprs: Vec<TripleExpr>) -> Self {
        Self::OneOf {
            exprs,
            annotations: Vec::new(),
        }
    }

    /// Wraps an expression in a cardinality interval.
    pub fn repeated(expr: TripleExpr, card: Interval) -> Self {
        Self::Repeated(Box::new(expr), card)
    }
}

/// Constraint on edges carrying a directed property, whose far-end node must
/// satisfy a value shape expression.
///
/// After schema construction the value expression is always a
/// [`ShapeExpr::ShapeRef`]: anonymous values are lifted into the schema
/// under generated labels.
#[derive(Debug, Clone, PartialEq)]
pub struct TripleConstraint {
    property: TcProperty,
    value_expr: Box<ShapeExpr>,
    annotations: Vec<Annotation>,
}

impl TripleConstraint {
    /// Creates a triple constraint.
    pub fn new(property: TcProperty, value_expr: ShapeExpr) -> Self {
        Self {
            property,
            value_expr: Box::new(value_expr),
            annotations: Vec::new(),
        }
    }

    /// Adds annotations to this constraint.
    pub fn with_annotations(mut self, annotations: Vec<Annotation>) -> Self {
        self.annotations = annotations;
        self
    }

    /// The directed property edges must carry to instantiate this constraint.
    pub fn property(&self) -> &TcProperty {
        &self.property
    }

    /// The value shape expression.
    pub fn value_expr(&self) -> &ShapeExpr {
        &self.value_expr
    }

    /// The value label, if the value expression is a reference.
    pub fn value_label(&self) -> Option<&Label> {
        self.value_expr.as_ref_label()
    }

    /// Annotations on this constraint.
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub(crate) fn value_expr_mut(&mut self) -> &mut ShapeExpr {
        &mut self.value_expr
    }
}

/// Annotation on a triple expression (carried, not interpreted).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// Annotation predicate.
    pub predicate: NamedNode,
    /// Annotation value.
    pub object: Term,
}

impl Annotation {
    /// Creates a new annotation.
    pub fn new(predicate: NamedNode, object: Term) -> Self {
        Self { predicate, object }
    }
}

/// Cardinality interval `[min, max]` with `max` possibly unbounded.
///
/// Also the result type of the interval evaluator, so an unsatisfiable
/// interval is representable: any value with `max < min` is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    /// Lower bound.
    pub min: u64,
    /// Upper bound, `None` meaning unbounded.
    pub max: Option<u64>,
}

impl Interval {
    /// `[0, 0]`.
    pub const ZERO: Self = Self {
        min: 0,
        max: Some(0),
    };
    /// `[1, 1]`, the default cardinality.
    pub const ONE: Self = Self {
        min: 1,
        max: Some(1),
    };
    /// `[0, 1]` (`?`).
    pub const OPT: Self = Self {
        min: 0,
        max: Some(1),
    };
    /// `[0, ∞]` (`*`).
    pub const STAR: Self = Self { min: 0, max: None };
    /// `[1, ∞]` (`+`).
    pub const PLUS: Self = Self { min: 1, max: None };
    /// The canonical empty interval.
    pub const EMPTY: Self = Self {
        min: 1,
        max: Some(0),
    };

    /// Creates an interval, rejecting `max < min`.
    pub fn new(min: u64, max: Option<u64>) -> Result<Self, crate::ShexSchemaError> {
        if let Some(max) = max {
            if max < min {
                return Err(crate::ShexSchemaError::InvalidCardinality { min, max });
            }
        }
        Ok(Self { min, max })
    }

    /// `[n, n]`.
    pub fn exactly(n: u64) -> Self {
        Self {
            min: n,
            max: Some(n),
        }
    }

    /// Returns true if the interval contains no value.
    pub fn is_empty(self) -> bool {
        self.max.is_some_and(|max| max < self.min)
    }

    /// Returns true if `n` belongs to the interval.
    pub fn contains(self, n: u64) -> bool {
        n >= self.min && self.max.map_or(true, |max| n <= max)
    }

    /// Intersection of two intervals.
    pub fn intersection(self, other: Self) -> Self {
        Self {
            min: self.min.max(other.min),
            max: match (self.max, other.max) {
                (Some(a), Some(b)) => Some(a.min(b)),
                (Some(a), None) | (None, Some(a)) => Some(a),
                (None, None) => None,
            },
        }
    }

    /// Pointwise sum of two intervals. Empty absorbs.
    pub fn sum(self, other: Self) -> Self {
        if self.is_empty() || other.is_empty() {
            return Self::EMPTY;
        }
        Self {
            min: self.min + other.min,
            max: self.max.zip(other.max).map(|(a, b)| a + b),
        }
    }

    /// Division by a repetition interval.
    ///
    /// `self.div(card)` is the set of `k` such that a block repeated with
    /// cardinality `card` can be matched exactly `k` times when the block
    /// itself can be matched any number of times in `self`. Exact whenever
    /// `card.min <= 1` or `card.max` is unbounded, which the SORBE normal
    /// form guarantees.
    pub fn div(self, card: Self) -> Self {
        if self.is_empty() || card.is_empty() {
            return Self::EMPTY;
        }
        if card.max == Some(0) {
            // A block repeated zero times matches any count iff nothing of
            // the block is present.
            return if self.min == 0 { Self::STAR } else { Self::EMPTY };
        }
        let min = if self.min == 0 {
            0
        } else {
            match card.max {
                None => 1,
                Some(n) => 1.max((self.min + n - 1) / n),
            }
        };
        let max = if card.min == 0 {
            None
        } else {
            self.max.map(|h| h / card.min)
        };
        if max.is_some_and(|max| max < min) {
            Self::EMPTY
        } else {
            Self { min, max }
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (0, None) => write!(f, "*"),
            (1, None) => write!(f, "+"),
            (0, Some(1)) => write!(f, "?"),
            (min, None) => write!(f, "{{{min},}}"),
            (min, Some(max)) if min == max => write!(f, "{{{min}}}"),
            (min, Some(max)) => write!(f, "{{{min},{max}}}"),
        }
    }
}
