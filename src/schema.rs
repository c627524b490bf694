//! Schema construction and well-formedness checks.
//!
//! [`ShexSchemaBuilder::build`] turns labelled definitions into a
//! [`ShexSchema`] ready for validation: anonymous triple constraint value
//! expressions are lifted under generated labels, references are checked,
//! labels are stratified by dependency with negation, and the SORBE
//! normal form of every shape is computed once.

use crate::error::ShexSchemaError;
use crate::model::{Label, ShapeExpr, TripleExpr};
use crate::sorbe::Sorbe;
use rustc_hash::{FxHashMap, FxHashSet};

/// Collects labelled definitions before they are checked and compiled.
#[derive(Debug, Clone, Default)]
pub struct ShexSchemaBuilder {
    shapes: FxHashMap<Label, ShapeExpr>,
    triple_exprs: FxHashMap<Label, TripleExpr>,
    start: Option<Label>,
}

impl ShexSchemaBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a shape expression definition. Each label binds exactly one
    /// definition, and generated labels are reserved for construction.
    pub fn add_shape(
        &mut self,
        label: Label,
        expr: ShapeExpr,
    ) -> Result<&mut Self, ShexSchemaError> {
        if label.is_generated() {
            return Err(ShexSchemaError::reserved_label(label));
        }
        if self.shapes.contains_key(&label) {
            return Err(ShexSchemaError::duplicate_label(label));
        }
        self.shapes.insert(label, expr);
        Ok(self)
    }

    /// Adds a reusable triple expression definition.
    pub fn add_triple_expr(
        &mut self,
        label: Label,
        expr: TripleExpr,
    ) -> Result<&mut Self, ShexSchemaError> {
        if label.is_generated() {
            return Err(ShexSchemaError::reserved_label(label));
        }
        if self.triple_exprs.contains_key(&label) {
            return Err(ShexSchemaError::duplicate_label(label));
        }
        self.triple_exprs.insert(label, expr);
        Ok(self)
    }

    /// Sets the start shape used when validation is requested without an
    /// explicit label.
    pub fn start(&mut self, label: Label) -> &mut Self {
        self.start = Some(label);
        self
    }

    /// Checks and compiles the definitions.
    pub fn build(self) -> Result<ShexSchema, ShexSchemaError> {
        let Self {
            shapes,
            mut triple_exprs,
            start,
        } = self;

        // Lift anonymous triple constraint values under generated labels,
        // so that every constraint's value is a reference into the schema.
        let mut counter = 0;
        let mut arena: FxHashMap<Label, ShapeExpr> = FxHashMap::default();
        let mut queue: Vec<(Label, ShapeExpr)> = shapes.into_iter().collect();
        for expr in triple_exprs.values_mut() {
            lift_triple_expr(expr, &mut queue, &mut counter);
        }
        while let Some((label, mut expr)) = queue.pop() {
            lift_shape_expr(&mut expr, &mut queue, &mut counter);
            arena.insert(label, expr);
        }

        check_triple_expr_defs(&triple_exprs)?;
        for expr in arena.values() {
            check_shape_refs(expr, &arena, &triple_exprs)?;
        }
        if let Some(start) = &start {
            if !arena.contains_key(start) {
                return Err(ShexSchemaError::undefined_shape_ref(start.clone()));
            }
        }

        let (strata, stratum_of) = stratify(&arena, &triple_exprs)?;

        // Labels some reference points at. After lifting, triple constraint
        // values are references too, so walking the references covers them.
        let mut selected = FxHashSet::default();
        for expr in arena.values() {
            collect_selected(expr, &triple_exprs, &mut selected);
        }
        if let Some(start) = &start {
            selected.insert(start.clone());
        }

        let mut sorbes = Vec::new();
        for expr in arena.values_mut() {
            assign_sorbe_slots(expr, &triple_exprs, &mut sorbes)?;
        }

        Ok(ShexSchema {
            shapes: arena,
            start,
            strata,
            stratum_of,
            selected,
            sorbes,
        })
    }
}

/// A checked, compiled schema.
#[derive(Debug, Clone)]
pub struct ShexSchema {
    shapes: FxHashMap<Label, ShapeExpr>,
    start: Option<Label>,
    strata: Vec<Vec<Label>>,
    stratum_of: FxHashMap<Label, usize>,
    selected: FxHashSet<Label>,
    sorbes: Vec<Sorbe>,
}

impl ShexSchema {
    /// The definition bound to a label, if any. Generated labels resolve
    /// to the lifted value expressions.
    pub fn shape_expr(&self, label: &Label) -> Option<&ShapeExpr> {
        self.shapes.get(label)
    }

    /// All labels of the schema, including generated ones.
    pub fn labels(&self) -> impl Iterator<Item = &Label> {
        self.shapes.keys()
    }

    /// The start shape, if one was declared.
    pub fn start(&self) -> Option<&Label> {
        self.start.as_ref()
    }

    /// Number of strata. Always at least one for a non-empty schema.
    pub fn stratum_count(&self) -> usize {
        self.strata.len()
    }

    /// Labels of one stratum. Strata are ordered dependencies first: the
    /// labels of a stratum only depend on their own stratum and lower
    /// ones.
    pub fn stratum(&self, stratum: usize) -> &[Label] {
        &self.strata[stratum]
    }

    /// The stratum a label belongs to.
    pub fn stratum_of(&self, label: &Label) -> Option<usize> {
        self.stratum_of.get(label).copied()
    }

    /// Whether a label is the target of some reference in the schema, or
    /// the declared start. Only these labels take part in the refinement
    /// fixpoint beyond the requested focus label.
    pub fn is_selected(&self, label: &Label) -> bool {
        self.selected.contains(label)
    }

    pub(crate) fn sorbe(&self, slot: usize) -> &Sorbe {
        &self.sorbes[slot]
    }
}

fn fresh_label(counter: &mut usize) -> Label {
    let label = Label::Generated(*counter);
    *counter += 1;
    label
}

fn lift_shape_expr(
    expr: &mut ShapeExpr,
    lifted: &mut Vec<(Label, ShapeExpr)>,
    counter: &mut usize,
) {
    match expr {
        ShapeExpr::ShapeAnd(exprs) | ShapeExpr::ShapeOr(exprs) => {
            for e in exprs {
                lift_shape_expr(e, lifted, counter);
            }
        }
        ShapeExpr::ShapeNot(e) => lift_shape_expr(e, lifted, counter),
        ShapeExpr::Shape(shape) => lift_triple_expr(shape.triple_expr_mut(), lifted, counter),
        ShapeExpr::NodeConstraint(_) | ShapeExpr::ShapeRef(_) | ShapeExpr::ShapeExternal => {}
    }
}

fn lift_triple_expr(
    expr: &mut TripleExpr,
    lifted: &mut Vec<(Label, ShapeExpr)>,
    counter: &mut usize,
) {
    match expr {
        TripleExpr::EachOf { exprs, .. } | TripleExpr::OneOf { exprs, .. } => {
            for e in exprs {
                lift_triple_expr(e, lifted, counter);
            }
        }
        TripleExpr::Repeated(inner, _) => lift_triple_expr(inner, lifted, counter),
        TripleExpr::TripleConstraint(tc) => {
            if !tc.value_expr().is_ref() {
                let label = fresh_label(counter);
                let value = std::mem::replace(
                    tc.value_expr_mut(),
                    ShapeExpr::ShapeRef(label.clone()),
                );
                lifted.push((label, value));
            }
        }
        TripleExpr::TripleExprRef(_) | TripleExpr::Empty => {}
    }
}

/// Rejects dangling and cyclic references among triple expression
/// definitions.
fn check_triple_expr_defs(defs: &FxHashMap<Label, TripleExpr>) -> Result<(), ShexSchemaError> {
    for expr in defs.values() {
        let mut visiting = Vec::new();
        check_triple_refs(expr, defs, &mut visiting)?;
    }
    Ok(())
}

fn check_triple_refs(
    expr: &TripleExpr,
    defs: &FxHashMap<Label, TripleExpr>,
    visiting: &mut Vec<Label>,
) -> Result<(), ShexSchemaError> {
    match expr {
        TripleExpr::EachOf { exprs, .. } | TripleExpr::OneOf { exprs, .. } => {
            for e in exprs {
                check_triple_refs(e, defs, visiting)?;
            }
            Ok(())
        }
        TripleExpr::Repeated(inner, _) => check_triple_refs(inner, defs, visiting),
        TripleExpr::TripleExprRef(label) => {
            if visiting.contains(label) {
                return Err(ShexSchemaError::cyclic_triple_expr_ref(label.clone()));
            }
            let target = defs
                .get(label)
                .ok_or_else(|| ShexSchemaError::undefined_triple_expr_ref(label.clone()))?;
            visiting.push(label.clone());
            check_triple_refs(target, defs, visiting)?;
            visiting.pop();
            Ok(())
        }
        TripleExpr::TripleConstraint(_) | TripleExpr::Empty => Ok(()),
    }
}

/// Rejects shape references to undefined labels, including the references
/// lifted into triple constraint values.
fn check_shape_refs(
    expr: &ShapeExpr,
    shapes: &FxHashMap<Label, ShapeExpr>,
    defs: &FxHashMap<Label, TripleExpr>,
) -> Result<(), ShexSchemaError> {
    match expr {
        ShapeExpr::ShapeAnd(exprs) | ShapeExpr::ShapeOr(exprs) => {
            for e in exprs {
                check_shape_refs(e, shapes, defs)?;
            }
            Ok(())
        }
        ShapeExpr::ShapeNot(e) => check_shape_refs(e, shapes, defs),
        ShapeExpr::ShapeRef(label) => {
            if shapes.contains_key(label) {
                Ok(())
            } else {
                Err(ShexSchemaError::undefined_shape_ref(label.clone()))
            }
        }
        ShapeExpr::Shape(shape) => check_shape_refs_in_triple(shape.triple_expr(), shapes, defs),
        ShapeExpr::NodeConstraint(_) | ShapeExpr::ShapeExternal => Ok(()),
    }
}

fn check_shape_refs_in_triple(
    expr: &TripleExpr,
    shapes: &FxHashMap<Label, ShapeExpr>,
    defs: &FxHashMap<Label, TripleExpr>,
) -> Result<(), ShexSchemaError> {
    match expr {
        TripleExpr::EachOf { exprs, .. } | TripleExpr::OneOf { exprs, .. } => {
            for e in exprs {
                check_shape_refs_in_triple(e, shapes, defs)?;
            }
            Ok(())
        }
        TripleExpr::Repeated(inner, _) => check_shape_refs_in_triple(inner, shapes, defs),
        TripleExpr::TripleConstraint(tc) => check_shape_refs(tc.value_expr(), shapes, defs),
        TripleExpr::TripleExprRef(label) => match defs.get(label) {
            // The definition itself is checked through its own lifting, but
            // a reference from a shape still needs the target to exist.
            Some(_) => Ok(()),
            None => Err(ShexSchemaError::undefined_triple_expr_ref(label.clone())),
        },
        TripleExpr::Empty => Ok(()),
    }
}

fn collect_selected(
    expr: &ShapeExpr,
    defs: &FxHashMap<Label, TripleExpr>,
    selected: &mut FxHashSet<Label>,
) {
    match expr {
        ShapeExpr::ShapeAnd(exprs) | ShapeExpr::ShapeOr(exprs) => {
            for e in exprs {
                collect_selected(e, defs, selected);
            }
        }
        ShapeExpr::ShapeNot(e) => collect_selected(e, defs, selected),
        ShapeExpr::ShapeRef(label) => {
            selected.insert(label.clone());
        }
        ShapeExpr::Shape(shape) => {
            collect_selected_in_triple(shape.triple_expr(), defs, selected);
        }
        ShapeExpr::NodeConstraint(_) | ShapeExpr::ShapeExternal => {}
    }
}

fn collect_selected_in_triple(
    expr: &TripleExpr,
    defs: &FxHashMap<Label, TripleExpr>,
    selected: &mut FxHashSet<Label>,
) {
    match expr {
        TripleExpr::EachOf { exprs, .. } | TripleExpr::OneOf { exprs, .. } => {
            for e in exprs {
                collect_selected_in_triple(e, defs, selected);
            }
        }
        TripleExpr::Repeated(inner, _) => collect_selected_in_triple(inner, defs, selected),
        TripleExpr::TripleConstraint(tc) => collect_selected(tc.value_expr(), defs, selected),
        TripleExpr::TripleExprRef(label) => {
            if let Some(target) = defs.get(label) {
                collect_selected_in_triple(target, defs, selected);
            }
        }
        TripleExpr::Empty => {}
    }
}

/// Dependency edge from one label to another, negative when it crosses an
/// odd number of negations.
type Edge = (usize, usize, bool);

fn stratify(
    shapes: &FxHashMap<Label, ShapeExpr>,
    defs: &FxHashMap<Label, TripleExpr>,
) -> Result<(Vec<Vec<Label>>, FxHashMap<Label, usize>), ShexSchemaError> {
    let labels: Vec<&Label> = shapes.keys().collect();
    let index_of: FxHashMap<&Label, usize> =
        labels.iter().enumerate().map(|(i, l)| (*l, i)).collect();

    let mut edges: Vec<Edge> = Vec::new();
    for (label, expr) in shapes {
        let from = index_of[label];
        collect_dependencies(expr, defs, from, true, &index_of, &mut edges);
    }
    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); labels.len()];
    for &(from, to, _) in &edges {
        successors[from].push(to);
    }

    let scc_of = tarjan_scc(&successors);
    let scc_count = scc_of.iter().copied().max().map_or(0, |max| max + 1);

    for &(from, to, positive) in &edges {
        if !positive && scc_of[from] == scc_of[to] {
            return Err(ShexSchemaError::negated_cycle(labels[from].clone()));
        }
    }

    // Tarjan emits components dependencies first, so the component index
    // is directly usable as a stratum.
    let mut strata = vec![Vec::new(); scc_count];
    let mut stratum_of = FxHashMap::default();
    for (i, label) in labels.iter().enumerate() {
        strata[scc_of[i]].push((*label).clone());
        stratum_of.insert((*label).clone(), scc_of[i]);
    }
    Ok((strata, stratum_of))
}

fn collect_dependencies(
    expr: &ShapeExpr,
    defs: &FxHashMap<Label, TripleExpr>,
    from: usize,
    positive: bool,
    index_of: &FxHashMap<&Label, usize>,
    edges: &mut Vec<Edge>,
) {
    match expr {
        ShapeExpr::ShapeAnd(exprs) | ShapeExpr::ShapeOr(exprs) => {
            for e in exprs {
                collect_dependencies(e, defs, from, positive, index_of, edges);
            }
        }
        ShapeExpr::ShapeNot(e) => {
            collect_dependencies(e, defs, from, !positive, index_of, edges);
        }
        ShapeExpr::ShapeRef(label) => {
            if let Some(&to) = index_of.get(label) {
                edges.push((from, to, positive));
            }
        }
        ShapeExpr::Shape(shape) => {
            collect_triple_dependencies(shape.triple_expr(), defs, from, positive, index_of, edges);
        }
        ShapeExpr::NodeConstraint(_) | ShapeExpr::ShapeExternal => {}
    }
}

fn collect_triple_dependencies(
    expr: &TripleExpr,
    defs: &FxHashMap<Label, TripleExpr>,
    from: usize,
    positive: bool,
    index_of: &FxHashMap<&Label, usize>,
    edges: &mut Vec<Edge>,
) {
    match expr {
        TripleExpr::EachOf { exprs, .. } | TripleExpr::OneOf { exprs, .. } => {
            for e in exprs {
                collect_triple_dependencies(e, defs, from, positive, index_of, edges);
            }
        }
        TripleExpr::Repeated(inner, _) => {
            collect_triple_dependencies(inner, defs, from, positive, index_of, edges);
        }
        TripleExpr::TripleConstraint(tc) => {
            collect_dependencies(tc.value_expr(), defs, from, positive, index_of, edges);
        }
        TripleExpr::TripleExprRef(label) => {
            // Definitions are acyclic at this point, so the expansion
            // terminates.
            if let Some(target) = defs.get(label) {
                collect_triple_dependencies(target, defs, from, positive, index_of, edges);
            }
        }
        TripleExpr::Empty => {}
    }
}

/// Component index per vertex, components numbered in emission order,
/// which for Tarjan's algorithm is reverse topological: a component only
/// has edges into lower-numbered ones.
fn tarjan_scc(successors: &[Vec<usize>]) -> Vec<usize> {
    struct State<'a> {
        successors: &'a [Vec<usize>],
        index: usize,
        indices: Vec<Option<usize>>,
        lowlink: Vec<usize>,
        on_stack: Vec<bool>,
        stack: Vec<usize>,
        scc_of: Vec<usize>,
        scc_count: usize,
    }

    fn connect(state: &mut State<'_>, v: usize) {
        state.indices[v] = Some(state.index);
        state.lowlink[v] = state.index;
        state.index += 1;
        state.stack.push(v);
        state.on_stack[v] = true;
        for i in 0..state.successors[v].len() {
            let w = state.successors[v][i];
            if state.indices[w].is_none() {
                connect(state, w);
                state.lowlink[v] = state.lowlink[v].min(state.lowlink[w]);
            } else if state.on_stack[w] {
                state.lowlink[v] = state.lowlink[v].min(state.lowlink[w]);
            }
        }
        if Some(state.lowlink[v]) == state.indices[v] {
            loop {
                let w = match state.stack.pop() {
                    Some(w) => w,
                    None => break,
                };
                state.on_stack[w] = false;
                state.scc_of[w] = state.scc_count;
                if w == v {
                    break;
                }
            }
            state.scc_count += 1;
        }
    }

    let n = successors.len();
    let mut state = State {
        successors,
        index: 0,
        indices: vec![None; n],
        lowlink: vec![0; n],
        on_stack: vec![false; n],
        stack: Vec::new(),
        scc_of: vec![0; n],
        scc_count: 0,
    };
    for v in 0..n {
        if state.indices[v].is_none() {
            connect(&mut state, v);
        }
    }
    state.scc_of
}

fn assign_sorbe_slots(
    expr: &mut ShapeExpr,
    defs: &FxHashMap<Label, TripleExpr>,
    sorbes: &mut Vec<Sorbe>,
) -> Result<(), ShexSchemaError> {
    match expr {
        ShapeExpr::ShapeAnd(exprs) | ShapeExpr::ShapeOr(exprs) => {
            for e in exprs {
                assign_sorbe_slots(e, defs, sorbes)?;
            }
            Ok(())
        }
        ShapeExpr::ShapeNot(e) => assign_sorbe_slots(e, defs, sorbes),
        ShapeExpr::Shape(shape) => {
            let sorbe = Sorbe::normalize(shape.triple_expr(), defs)?;
            shape.set_sorbe_slot(sorbes.len());
            sorbes.push(sorbe);
            Ok(())
        }
        ShapeExpr::NodeConstraint(_) | ShapeExpr::ShapeRef(_) | ShapeExpr::ShapeExternal => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::NodeConstraint;
    use crate::graph::TcProperty;
    use crate::model::{Shape, TripleConstraint};
    use oxrdf::NamedNode;

    fn label(local: &str) -> Label {
        Label::from(NamedNode::new_unchecked(format!("http://example.org/{local}")))
    }

    fn tc_ref(p: &str, value: Label) -> TripleExpr {
        TripleExpr::TripleConstraint(TripleConstraint::new(
            TcProperty::forward(NamedNode::new_unchecked(format!("http://example.org/{p}"))),
            ShapeExpr::ShapeRef(value),
        ))
    }

    fn tc_anon(p: &str, value: ShapeExpr) -> TripleExpr {
        TripleExpr::TripleConstraint(TripleConstraint::new(
            TcProperty::forward(NamedNode::new_unchecked(format!("http://example.org/{p}"))),
            value,
        ))
    }

    #[test]
    fn duplicate_labels_are_rejected() {
        let mut builder = ShexSchemaBuilder::new();
        builder
            .add_shape(label("S"), ShapeExpr::ShapeExternal)
            .unwrap();
        assert!(matches!(
            builder.add_shape(label("S"), ShapeExpr::ShapeExternal),
            Err(ShexSchemaError::DuplicateLabel { .. })
        ));
    }

    #[test]
    fn generated_labels_are_reserved() {
        let mut builder = ShexSchemaBuilder::new();
        assert!(matches!(
            builder.add_shape(Label::Generated(0), ShapeExpr::ShapeExternal),
            Err(ShexSchemaError::ReservedLabel { .. })
        ));
    }

    #[test]
    fn anonymous_values_are_lifted_under_generated_labels() {
        let mut builder = ShexSchemaBuilder::new();
        builder
            .add_shape(
                label("S"),
                ShapeExpr::Shape(Shape::new(tc_anon(
                    "p",
                    ShapeExpr::NodeConstraint(NodeConstraint::new()),
                ))),
            )
            .unwrap();
        let schema = builder.build().unwrap();
        let generated: Vec<_> = schema.labels().filter(|l| l.is_generated()).collect();
        assert_eq!(generated.len(), 1);
        assert!(matches!(
            schema.shape_expr(generated[0]),
            Some(ShapeExpr::NodeConstraint(_))
        ));
    }

    #[test]
    fn dangling_shape_ref_is_rejected() {
        let mut builder = ShexSchemaBuilder::new();
        builder
            .add_shape(
                label("S"),
                ShapeExpr::Shape(Shape::new(tc_ref("p", label("missing")))),
            )
            .unwrap();
        assert!(matches!(
            builder.build(),
            Err(ShexSchemaError::UndefinedShapeRef { .. })
        ));
    }

    #[test]
    fn cyclic_triple_expr_refs_are_rejected() {
        let mut builder = ShexSchemaBuilder::new();
        builder
            .add_triple_expr(label("te"), TripleExpr::TripleExprRef(label("te")))
            .unwrap();
        assert!(matches!(
            builder.build(),
            Err(ShexSchemaError::CyclicTripleExprRef { .. })
        ));
    }

    #[test]
    fn undefined_start_is_rejected() {
        let mut builder = ShexSchemaBuilder::new();
        builder.start(label("S"));
        assert!(matches!(
            builder.build(),
            Err(ShexSchemaError::UndefinedShapeRef { .. })
        ));
    }

    #[test]
    fn mutual_recursion_shares_a_stratum() {
        let mut builder = ShexSchemaBuilder::new();
        builder
            .add_shape(
                label("S"),
                ShapeExpr::Shape(Shape::new(tc_ref("p", label("T")))),
            )
            .unwrap();
        builder
            .add_shape(
                label("T"),
                ShapeExpr::Shape(Shape::new(tc_ref("q", label("S")))),
            )
            .unwrap();
        let schema = builder.build().unwrap();
        assert_eq!(schema.stratum_of(&label("S")), schema.stratum_of(&label("T")));
    }

    #[test]
    fn dependencies_come_in_lower_strata() {
        let mut builder = ShexSchemaBuilder::new();
        builder
            .add_shape(
                label("S"),
                ShapeExpr::Shape(Shape::new(tc_ref("p", label("T")))),
            )
            .unwrap();
        builder
            .add_shape(
                label("T"),
                ShapeExpr::NodeConstraint(NodeConstraint::new()),
            )
            .unwrap();
        let schema = builder.build().unwrap();
        let s = schema.stratum_of(&label("S")).unwrap();
        let t = schema.stratum_of(&label("T")).unwrap();
        assert!(t < s);
    }

    #[test]
    fn negation_through_a_cycle_is_rejected() {
        let mut builder = ShexSchemaBuilder::new();
        builder
            .add_shape(
                label("S"),
                ShapeExpr::Shape(Shape::new(tc_anon(
                    "p",
                    ShapeExpr::ShapeNot(Box::new(ShapeExpr::ShapeRef(label("S")))),
                ))),
            )
            .unwrap();
        assert!(matches!(
            builder.build(),
            Err(ShexSchemaError::NegatedCycle { .. })
        ));
    }

    #[test]
    fn negation_outside_a_cycle_is_allowed() {
        let mut builder = ShexSchemaBuilder::new();
        builder
            .add_shape(
                label("S"),
                ShapeExpr::ShapeNot(Box::new(ShapeExpr::ShapeRef(label("T")))),
            )
            .unwrap();
        builder
            .add_shape(
                label("T"),
                ShapeExpr::NodeConstraint(NodeConstraint::new()),
            )
            .unwrap();
        assert!(builder.build().is_ok());
    }

    #[test]
    fn triple_expr_refs_are_expanded_for_dependencies() {
        let mut builder = ShexSchemaBuilder::new();
        builder
            .add_triple_expr(label("te"), tc_ref("p", label("T")))
            .unwrap();
        builder
            .add_shape(
                label("S"),
                ShapeExpr::Shape(Shape::new(TripleExpr::TripleExprRef(label("te")))),
            )
            .unwrap();
        builder
            .add_shape(
                label("T"),
                ShapeExpr::NodeConstraint(NodeConstraint::new()),
            )
            .unwrap();
        let schema = builder.build().unwrap();
        let s = schema.stratum_of(&label("S")).unwrap();
        let t = schema.stratum_of(&label("T")).unwrap();
        assert!(t < s);
    }
}
