//! Typings: which (node, shape label) associations are currently assumed
//! or proven.

use crate::model::Label;
use crate::schema::ShexSchema;
use oxrdf::Term;
use rustc_hash::{FxHashMap, FxHashSet};

/// A set of node-label associations built during validation.
pub trait Typing {
    /// Returns true if the node is currently typed with the label.
    fn contains(&self, node: &Term, label: &Label) -> bool;

    /// Snapshot of all associations as a set of pairs.
    fn to_set(&self) -> FxHashSet<(Term, Label)>;
}

/// Typing used by the recursive algorithm.
///
/// Associations are counted, not merely present: the same hypothesis can
/// be pushed several times along different recursion paths, and each push
/// is matched by exactly one pop. An association is visible as long as its
/// count is positive.
#[derive(Debug, Clone, Default)]
pub struct RecursiveTyping {
    counts: FxHashMap<(Term, Label), usize>,
}

impl RecursiveTyping {
    /// Creates an empty typing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes every association.
    pub fn clear(&mut self) {
        self.counts.clear();
    }

    /// Pushes one association.
    pub fn add(&mut self, node: Term, label: Label) {
        *self.counts.entry((node, label)).or_insert(0) += 1;
    }

    /// Pops one association. A no-op if it is not present, so an add
    /// followed by a remove always restores the previous state.
    pub fn remove(&mut self, node: &Term, label: &Label) {
        if let Some(count) = self.counts.get_mut(&(node.clone(), label.clone())) {
            if *count > 1 {
                *count -= 1;
            } else {
                self.counts.remove(&(node.clone(), label.clone()));
            }
        }
    }

    /// Pushes a batch of associations.
    pub fn add_all(&mut self, pairs: &[(Term, Label)]) {
        for (node, label) in pairs {
            self.add(node.clone(), label.clone());
        }
    }

    /// Pops a batch of associations.
    pub fn remove_all(&mut self, pairs: &[(Term, Label)]) {
        for (node, label) in pairs {
            self.remove(node, label);
        }
    }
}

impl Typing for RecursiveTyping {
    fn contains(&self, node: &Term, label: &Label) -> bool {
        self.counts.contains_key(&(node.clone(), label.clone()))
    }

    fn to_set(&self) -> FxHashSet<(Term, Label)> {
        self.counts.keys().cloned().collect()
    }
}

/// Typing used by the refinement algorithm, partitioned by stratum.
///
/// Each stratum holds the associations whose label belongs to it. Lower
/// strata are finalized before a higher stratum starts, so lookups into
/// them are stable.
#[derive(Debug, Clone)]
pub struct RefinementTyping<'a> {
    schema: &'a ShexSchema,
    strata: Vec<FxHashSet<(Term, Label)>>,
}

impl<'a> RefinementTyping<'a> {
    /// Creates an empty typing with one partition per stratum of the
    /// schema.
    pub fn new(schema: &'a ShexSchema) -> Self {
        Self {
            schema,
            strata: vec![FxHashSet::default(); schema.stratum_count()],
        }
    }

    /// Adds an association. Labels not in the schema are ignored.
    pub fn add(&mut self, node: Term, label: Label) {
        if let Some(stratum) = self.schema.stratum_of(&label) {
            self.strata[stratum].insert((node, label));
        }
    }

    /// Snapshot of the associations of one stratum.
    pub fn stratum_pairs(&self, stratum: usize) -> Vec<(Term, Label)> {
        self.strata[stratum].iter().cloned().collect()
    }

    /// Removes a batch of associations from one stratum.
    pub fn remove_all(&mut self, stratum: usize, pairs: &[(Term, Label)]) {
        for pair in pairs {
            self.strata[stratum].remove(pair);
        }
    }
}

impl Typing for RefinementTyping<'_> {
    fn contains(&self, node: &Term, label: &Label) -> bool {
        self.schema.stratum_of(label).is_some_and(|stratum| {
            self.strata[stratum].contains(&(node.clone(), label.clone()))
        })
    }

    fn to_set(&self) -> FxHashSet<(Term, Label)> {
        self.strata.iter().flatten().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::NamedNode;

    fn node(local: &str) -> Term {
        Term::from(NamedNode::new_unchecked(format!("http://example.org/{local}")))
    }

    fn label(local: &str) -> Label {
        Label::from(NamedNode::new_unchecked(format!("http://example.org/{local}")))
    }

    #[test]
    fn add_and_remove_are_symmetric() {
        let mut typing = RecursiveTyping::new();
        typing.add(node("n"), label("S"));
        typing.add(node("n"), label("S"));
        typing.remove(&node("n"), &label("S"));
        // One of the two pushes is still in effect.
        assert!(typing.contains(&node("n"), &label("S")));
        typing.remove(&node("n"), &label("S"));
        assert!(!typing.contains(&node("n"), &label("S")));
    }

    #[test]
    fn removing_an_absent_pair_is_a_no_op() {
        let mut typing = RecursiveTyping::new();
        typing.remove(&node("n"), &label("S"));
        typing.add(node("n"), label("S"));
        assert!(typing.contains(&node("n"), &label("S")));
    }

    #[test]
    fn batch_operations_restore_state() {
        let mut typing = RecursiveTyping::new();
        typing.add(node("a"), label("S"));
        let batch = vec![(node("a"), label("S")), (node("b"), label("T"))];
        typing.add_all(&batch);
        typing.remove_all(&batch);
        assert!(typing.contains(&node("a"), &label("S")));
        assert!(!typing.contains(&node("b"), &label("T")));
        assert_eq!(typing.to_set().len(), 1);
    }
}
