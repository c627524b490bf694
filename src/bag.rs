//! Bags of matched triple constraints and their enumeration.
//!
//! Given, for each triple of a neighbourhood, the list of constraint
//! occurrences it may match, [`BagIterator`] lazily enumerates every way
//! of committing each triple to one of its candidates. Each assignment is
//! summarized as a [`Bag`] counting how many triples went to each
//! occurrence, and the interval evaluator decides whether a bag satisfies
//! the normalized expression.

use crate::model::Interval;
use crate::sorbe::{Sorbe, SorbeExpr};

/// Multiset of triple constraint occurrences, as a count per
/// [`SorbeTc::index`](crate::sorbe::SorbeTc::index).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bag {
    counts: Vec<usize>,
}

impl Bag {
    /// Creates an empty bag over `len` constraint occurrences.
    pub fn new(len: usize) -> Self {
        Self {
            counts: vec![0; len],
        }
    }

    /// Number of triples committed to the given occurrence.
    pub fn count(&self, index: usize) -> usize {
        self.counts.get(index).copied().unwrap_or(0)
    }

    /// Total number of triples in the bag.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    fn increment(&mut self, index: usize) {
        self.counts[index] += 1;
    }
}

/// Lazy enumeration of all bags reachable from per-triple candidate lists.
///
/// The candidate list at position `i` holds the occurrence indices triple
/// `i` may be committed to. The product is enumerated with the last triple
/// varying fastest. With no triples at all there is exactly one bag, the
/// empty one; if any triple has no candidate there is none.
pub struct BagIterator<'a> {
    candidates: &'a [Vec<usize>],
    len: usize,
    positions: Vec<usize>,
    exhausted: bool,
}

impl<'a> BagIterator<'a> {
    /// Creates an iterator over bags of `len` constraint occurrences.
    pub fn new(candidates: &'a [Vec<usize>], len: usize) -> Self {
        Self {
            candidates,
            len,
            positions: vec![0; candidates.len()],
            exhausted: candidates.iter().any(Vec::is_empty),
        }
    }

    fn current(&self) -> Bag {
        let mut bag = Bag::new(self.len);
        for (triple, &position) in self.positions.iter().enumerate() {
            bag.increment(self.candidates[triple][position]);
        }
        bag
    }

    fn advance(&mut self) {
        for triple in (0..self.positions.len()).rev() {
            self.positions[triple] += 1;
            if self.positions[triple] < self.candidates[triple].len() {
                return;
            }
            self.positions[triple] = 0;
        }
        self.exhausted = true;
    }
}

impl Iterator for BagIterator<'_> {
    type Item = Bag;

    fn next(&mut self) -> Option<Bag> {
        if self.exhausted {
            return None;
        }
        let bag = self.current();
        self.advance();
        Some(bag)
    }
}

impl Sorbe {
    /// Returns true if the bag is a valid way of matching this expression,
    /// i.e. the root interval contains one.
    pub fn accepts(&self, bag: &Bag) -> bool {
        expr_interval(self.root(), bag).contains(1)
    }
}

/// Interval of repetition counts under which the expression matches the
/// bag exactly.
pub fn expr_interval(expr: &SorbeExpr, bag: &Bag) -> Interval {
    match expr {
        SorbeExpr::TripleConstraint(index) => Interval::exactly(bag.count(*index) as u64),
        SorbeExpr::EachOf(exprs) => exprs
            .iter()
            .map(|e| expr_interval(e, bag))
            .fold(Interval::STAR, Interval::intersection),
        SorbeExpr::OneOf(exprs) => exprs
            .iter()
            .map(|e| expr_interval(e, bag))
            .fold(Interval::ZERO, Interval::sum),
        SorbeExpr::Repeated(inner, card) => expr_interval(inner, bag).div(*card),
        SorbeExpr::Empty => Interval::STAR,
    }
}
