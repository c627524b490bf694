//! Implementation of [ShEx](https://shex.io/shex-semantics/) validation for [oxrdf] graphs.
//!
//! A schema is a set of labelled [shape expressions](ShapeExpr) built with
//! [`ShexSchemaBuilder`]. Construction checks the definitions (references,
//! cardinalities, recursion through negation) and compiles every shape to
//! its normal form, so validation itself never fails on the schema.
//!
//! Two algorithms are provided. [`RecursiveValidation`] proves one node
//! against one shape, exploring the graph on demand. [`RefineValidation`]
//! types the whole graph stratum by stratum and is sound in the presence
//! of recursion combined with negation.
//!
//! Usage example:
//!
//! ```
//! use oxrdf::{Graph, Literal, NamedNode, Term, Triple};
//! use oxshex::{
//!     Label, NodeConstraint, RecursiveValidation, Shape, ShapeExpr, ShexSchemaBuilder,
//!     TcProperty, TripleConstraint, TripleExpr, ValidationAlgorithm,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let person = Label::from(NamedNode::new("http://example.org/Person")?);
//! let name = NamedNode::new("http://example.org/name")?;
//!
//! // <Person> { <name> xsd:string }
//! let mut builder = ShexSchemaBuilder::new();
//! builder.add_shape(
//!     person.clone(),
//!     ShapeExpr::Shape(Shape::new(TripleExpr::TripleConstraint(
//!         TripleConstraint::new(
//!             TcProperty::forward(name.clone()),
//!             ShapeExpr::NodeConstraint(
//!                 NodeConstraint::new().datatype(oxrdf::vocab::xsd::STRING.into_owned()),
//!             ),
//!         ),
//!     ))),
//! )?;
//! let schema = builder.build()?;
//!
//! let mut graph = Graph::new();
//! let alice = NamedNode::new("http://example.org/alice")?;
//! graph.insert(&Triple::new(
//!     alice.clone(),
//!     name,
//!     Literal::new_simple_literal("Alice"),
//! ));
//!
//! let mut validator = RecursiveValidation::new(&schema, &graph);
//! assert!(validator.validate(&Term::from(alice), Some(&person))?);
//! # Ok(())
//! # }
//! ```

mod bag;
mod constraint;
mod error;
mod graph;
mod matcher;
mod model;
mod schema;
mod sorbe;
mod typing;
mod validator;


pub use crate::bag::{expr_interval, Bag, BagIterator};
pub use crate::constraint::{
    is_lexically_valid, NodeConstraint, NodeKind, NumericFacet, Pattern, StringFacet,
    ValueSetValue,
};
pub use crate::error::{ShexError, ShexSchemaError, ShexValidationError};
pub use crate::graph::{NeighborTriple, NeighborsGraph, TcProperty};
pub use crate::matcher::{
    collect_matching_tc, Matcher, PredicateAndValueMatcher, PredicateOnlyMatcher,
};
pub use crate::model::{
    Annotation, Interval, Label, Shape, ShapeExpr, TripleConstraint, TripleExpr,
};
pub use crate::schema::{ShexSchema, ShexSchemaBuilder};
pub use crate::sorbe::{Sorbe, SorbeExpr, SorbeTc};
pub use crate::typing::{RecursiveTyping, RefinementTyping, Typing};
pub use crate::validator::{RecursiveValidation, RefineValidation, ValidationAlgorithm};
