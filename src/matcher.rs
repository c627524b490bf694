//! Matching of neighbourhood triples against triple constraint
//! occurrences.

use crate::graph::NeighborTriple;
use crate::sorbe::SorbeTc;
use crate::typing::Typing;

/// Decides whether a neighbourhood triple may be committed to a
/// constraint occurrence.
pub trait Matcher {
    /// Returns true if the triple is a candidate for the occurrence.
    fn matches(&self, triple: &NeighborTriple, tc: &SorbeTc) -> bool;
}

/// Matches on the directed property alone, ignoring the value shape.
///
/// Used for the first matching pass, where the typing does not yet hold
/// the associations of the opposite nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct PredicateOnlyMatcher;

impl Matcher for PredicateOnlyMatcher {
    fn matches(&self, triple: &NeighborTriple, tc: &SorbeTc) -> bool {
        triple.property() == tc.property()
    }
}

/// Matches on the directed property and requires the opposite node to be
/// typed with the occurrence's value label.
#[derive(Debug, Clone, Copy)]
pub struct PredicateAndValueMatcher<'a, T: ?Sized> {
    typing: &'a T,
}

impl<'a, T: Typing + ?Sized> PredicateAndValueMatcher<'a, T> {
    /// Creates a matcher consulting the given typing.
    pub fn new(typing: &'a T) -> Self {
        Self { typing }
    }
}

impl<T: Typing + ?Sized> Matcher for PredicateAndValueMatcher<'_, T> {
    fn matches(&self, triple: &NeighborTriple, tc: &SorbeTc) -> bool {
        triple.property() == tc.property() && self.typing.contains(triple.opposite(), tc.value())
    }
}

/// For each triple of the neighbourhood, in order, the indices of the
/// occurrences it may be committed to.
pub fn collect_matching_tc(
    neighbourhood: &[NeighborTriple],
    constraints: &[SorbeTc],
    matcher: &impl Matcher,
) -> Vec<Vec<usize>> {
    neighbourhood
        .iter()
        .map(|triple| {
            constraints
                .iter()
                .filter(|tc| matcher.matches(triple, tc))
                .map(SorbeTc::index)
                .collect()
        })
        .collect()
}
