//! SORBE normal form for triple expressions.
//!
//! Normalization inlines triple expression references, assigns a distinct
//! instance index to every occurrence of a triple constraint, and unfolds
//! the repetitions whose cardinality cannot be divided exactly by the
//! interval evaluator. The result only ever contains repetitions with
//! `min <= 1` or an unbounded `max`.

use crate::error::ShexSchemaError;
use crate::graph::TcProperty;
use crate::model::{Interval, Label, TripleExpr};
use rustc_hash::FxHashMap;

/// One occurrence of a triple constraint in a normalized expression.
///
/// Two occurrences of the same source constraint get distinct indices, so
/// that a bag of matched triples can count them separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SorbeTc {
    index: usize,
    property: TcProperty,
    value: Label,
}

impl SorbeTc {
    /// Position of this occurrence in [`Sorbe::constraints`].
    pub fn index(&self) -> usize {
        self.index
    }

    /// The directed property this constraint matches on.
    pub fn property(&self) -> &TcProperty {
        &self.property
    }

    /// Label of the shape expression required of the opposite node.
    pub fn value(&self) -> &Label {
        &self.value
    }
}

/// Structure of a normalized triple expression. Leaves are indices into
/// [`Sorbe::constraints`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SorbeExpr {
    /// All sub-expressions must be satisfied, triples split among them.
    EachOf(Vec<SorbeExpr>),
    /// Exactly one sub-expression must be satisfied.
    OneOf(Vec<SorbeExpr>),
    /// A single triple constraint occurrence.
    TripleConstraint(usize),
    /// Repetition of a sub-expression within an interval.
    Repeated(Box<SorbeExpr>, Interval),
    /// Matches only the empty neighbourhood.
    Empty,
}

/// A triple expression in SORBE normal form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sorbe {
    root: SorbeExpr,
    constraints: Vec<SorbeTc>,
}

impl Sorbe {
    /// Normalizes a triple expression, resolving references through `defs`.
    ///
    /// Every triple constraint must carry a reference as its value
    /// expression, which holds for the expressions produced by schema
    /// construction.
    pub fn normalize(
        expr: &TripleExpr,
        defs: &FxHashMap<Label, TripleExpr>,
    ) -> Result<Self, ShexSchemaError> {
        let mut constraints = Vec::new();
        let mut visiting = Vec::new();
        let root = normalize_expr(expr, defs, &mut constraints, &mut visiting)?;
        Ok(Self { root, constraints })
    }

    /// Root of the normalized expression.
    pub fn root(&self) -> &SorbeExpr {
        &self.root
    }

    /// All triple constraint occurrences, indexed by [`SorbeTc::index`].
    pub fn constraints(&self) -> &[SorbeTc] {
        &self.constraints
    }
}

fn normalize_expr(
    expr: &TripleExpr,
    defs: &FxHashMap<Label, TripleExpr>,
    constraints: &mut Vec<SorbeTc>,
    visiting: &mut Vec<Label>,
) -> Result<SorbeExpr, ShexSchemaError> {
    match expr {
        TripleExpr::EachOf { exprs, .. } => Ok(SorbeExpr::EachOf(
            exprs
                .iter()
                .map(|e| normalize_expr(e, defs, constraints, visiting))
                .collect::<Result<_, _>>()?,
        )),
        TripleExpr::OneOf { exprs, .. } => Ok(SorbeExpr::OneOf(
            exprs
                .iter()
                .map(|e| normalize_expr(e, defs, constraints, visiting))
                .collect::<Result<_, _>>()?,
        )),
        TripleExpr::TripleConstraint(tc) => {
            let value = tc.value_label().ok_or_else(|| {
                ShexSchemaError::unresolved_value_expr(tc.property().to_string())
            })?;
            let index = constraints.len();
            constraints.push(SorbeTc {
                index,
                property: tc.property().clone(),
                value: value.clone(),
            });
            Ok(SorbeExpr::TripleConstraint(index))
        }
        TripleExpr::TripleExprRef(label) => {
            if visiting.contains(label) {
                return Err(ShexSchemaError::cyclic_triple_expr_ref(label.clone()));
            }
            let target = defs
                .get(label)
                .ok_or_else(|| ShexSchemaError::undefined_triple_expr_ref(label.clone()))?;
            visiting.push(label.clone());
            let normalized = normalize_expr(target, defs, constraints, visiting);
            visiting.pop();
            normalized
        }
        TripleExpr::Repeated(inner, card) => normalize_repeated(inner, *card, defs, constraints, visiting),
        TripleExpr::Empty => Ok(SorbeExpr::Empty),
    }
}

fn normalize_repeated(
    inner: &TripleExpr,
    card: Interval,
    defs: &FxHashMap<Label, TripleExpr>,
    constraints: &mut Vec<SorbeTc>,
    visiting: &mut Vec<Label>,
) -> Result<SorbeExpr, ShexSchemaError> {
    if card == Interval::ONE {
        return normalize_expr(inner, defs, constraints, visiting);
    }
    let min = card.min;
    let max = match card.max {
        Some(max) if min > 1 => max,
        _ => {
            // Interval division is exact for these cardinalities.
            let normalized = normalize_expr(inner, defs, constraints, visiting)?;
            return Ok(SorbeExpr::Repeated(Box::new(normalized), card));
        }
    };
    // min > 1 with a finite max: unfold into min - 1 mandatory copies
    // followed by a divisible remainder. Every copy gets fresh constraint
    // indices.
    let mut parts = Vec::new();
    for _ in 1..min {
        parts.push(normalize_expr(inner, defs, constraints, visiting)?);
    }
    let tail = normalize_expr(inner, defs, constraints, visiting)?;
    let remainder = Interval::new(1, Some(max - min + 1))?;
    parts.push(SorbeExpr::Repeated(Box::new(tail), remainder));
    Ok(SorbeExpr::EachOf(parts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ShapeExpr, TripleConstraint};
    use oxrdf::NamedNode;

    fn tc(local: &str, value: &str) -> TripleExpr {
        TripleExpr::TripleConstraint(TripleConstraint::new(
            TcProperty::forward(NamedNode::new_unchecked(format!(
                "http://example.org/{local}"
            ))),
            ShapeExpr::ShapeRef(Label::from(NamedNode::new_unchecked(format!(
                "http://example.org/{value}"
            )))),
        ))
    }

    fn no_defs() -> FxHashMap<Label, TripleExpr> {
        FxHashMap::default()
    }

    #[test]
    fn constraint_indices_follow_occurrence_order() {
        let expr = TripleExpr::each_of(vec![tc("p", "S"), tc("q", "T"), tc("p", "S")]);
        let sorbe = Sorbe::normalize(&expr, &no_defs()).unwrap();
        assert_eq!(sorbe.constraints().len(), 3);
        assert_eq!(
            sorbe.root(),
            &SorbeExpr::EachOf(vec![
                SorbeExpr::TripleConstraint(0),
                SorbeExpr::TripleConstraint(1),
                SorbeExpr::TripleConstraint(2),
            ])
        );
        // The two occurrences of the same constraint stay distinct.
        assert_eq!(sorbe.constraints()[0].property(), sorbe.constraints()[2].property());
        assert_ne!(sorbe.constraints()[0].index(), sorbe.constraints()[2].index());
    }

    #[test]
    fn exact_cardinalities_are_kept() {
        for card in [Interval::OPT, Interval::STAR, Interval::PLUS] {
            let expr = TripleExpr::repeated(tc("p", "S"), card);
            let sorbe = Sorbe::normalize(&expr, &no_defs()).unwrap();
            assert_eq!(
                sorbe.root(),
                &SorbeExpr::Repeated(Box::new(SorbeExpr::TripleConstraint(0)), card)
            );
        }
    }

    #[test]
    fn repetition_of_one_collapses() {
        let expr = TripleExpr::repeated(tc("p", "S"), Interval::ONE);
        let sorbe = Sorbe::normalize(&expr, &no_defs()).unwrap();
        assert_eq!(sorbe.root(), &SorbeExpr::TripleConstraint(0));
    }

    #[test]
    fn inexact_cardinality_unfolds() {
        // [2,3] becomes one mandatory copy followed by a [1,2] remainder.
        let expr = TripleExpr::repeated(tc("p", "S"), Interval::new(2, Some(3)).unwrap());
        let sorbe = Sorbe::normalize(&expr, &no_defs()).unwrap();
        assert_eq!(sorbe.constraints().len(), 2);
        assert_eq!(
            sorbe.root(),
            &SorbeExpr::EachOf(vec![
                SorbeExpr::TripleConstraint(0),
                SorbeExpr::Repeated(
                    Box::new(SorbeExpr::TripleConstraint(1)),
                    Interval::new(1, Some(2)).unwrap()
                ),
            ])
        );
    }

    #[test]
    fn normalization_is_idempotent() {
        // Re-normalizing an expression already in normal form changes
        // nothing. The image of [2,3] is one copy plus a [1,2] remainder.
        let compact = TripleExpr::repeated(tc("p", "S"), Interval::new(2, Some(3)).unwrap());
        let unfolded = TripleExpr::each_of(vec![
            tc("p", "S"),
            TripleExpr::repeated(tc("p", "S"), Interval::new(1, Some(2)).unwrap()),
        ]);
        assert_eq!(
            Sorbe::normalize(&compact, &no_defs()).unwrap(),
            Sorbe::normalize(&unfolded, &no_defs()).unwrap()
        );

        // Exact repetitions and groups are their own normal form.
        let normal = TripleExpr::each_of(vec![
            TripleExpr::repeated(tc("p", "S"), Interval::STAR),
            TripleExpr::one_of(vec![tc("q", "T"), tc("r", "U")]),
        ]);
        let once = Sorbe::normalize(&normal, &no_defs()).unwrap();
        let twice = Sorbe::normalize(&normal, &no_defs()).unwrap();
        assert_eq!(once, twice);
        assert_eq!(
            once.root(),
            &SorbeExpr::EachOf(vec![
                SorbeExpr::Repeated(Box::new(SorbeExpr::TripleConstraint(0)), Interval::STAR),
                SorbeExpr::OneOf(vec![
                    SorbeExpr::TripleConstraint(1),
                    SorbeExpr::TripleConstraint(2),
                ]),
            ])
        );
    }

    #[test]
    fn unbounded_min_above_one_is_exact() {
        let expr = TripleExpr::repeated(tc("p", "S"), Interval::new(3, None).unwrap());
        let sorbe = Sorbe::normalize(&expr, &no_defs()).unwrap();
        assert_eq!(sorbe.constraints().len(), 1);
        assert!(matches!(sorbe.root(), SorbeExpr::Repeated(_, _)));
    }

    #[test]
    fn references_are_inlined_with_fresh_indices() {
        let shared = Label::from(NamedNode::new_unchecked("http://example.org/te"));
        let mut defs = no_defs();
        defs.insert(shared.clone(), tc("p", "S"));
        let expr = TripleExpr::each_of(vec![
            TripleExpr::TripleExprRef(shared.clone()),
            TripleExpr::TripleExprRef(shared),
        ]);
        let sorbe = Sorbe::normalize(&expr, &defs).unwrap();
        assert_eq!(sorbe.constraints().len(), 2);
    }

    #[test]
    fn undefined_reference_is_rejected() {
        let expr = TripleExpr::TripleExprRef(Label::from(NamedNode::new_unchecked(
            "http://example.org/missing",
        )));
        assert!(matches!(
            Sorbe::normalize(&expr, &no_defs()),
            Err(ShexSchemaError::UndefinedTripleExprRef { .. })
        ));
    }

    #[test]
    fn cyclic_reference_is_rejected() {
        let label = Label::from(NamedNode::new_unchecked("http://example.org/loop"));
        let mut defs = no_defs();
        defs.insert(label.clone(), TripleExpr::TripleExprRef(label.clone()));
        assert!(matches!(
            Sorbe::normalize(&TripleExpr::TripleExprRef(label), &defs),
            Err(ShexSchemaError::CyclicTripleExprRef { .. })
        ));
    }

    #[test]
    fn anonymous_value_expr_is_rejected() {
        let expr = TripleExpr::TripleConstraint(TripleConstraint::new(
            TcProperty::forward(NamedNode::new_unchecked("http://example.org/p")),
            ShapeExpr::ShapeExternal,
        ));
        assert!(matches!(
            Sorbe::normalize(&expr, &no_defs()),
            Err(ShexSchemaError::UnresolvedValueExpr { .. })
        ));
    }
}
