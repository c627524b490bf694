//! Node constraints: value-only checks on a focus node.
//!
//! A [`NodeConstraint`] is a conjunction of facets. Its [`matches`](NodeConstraint::matches)
//! check is pure and never fatal: a malformed lexical form simply fails to
//! match, it does not abort validation.

use crate::error::ShexSchemaError;
use oxrdf::vocab::xsd;
use oxrdf::{NamedNode, NamedNodeRef, Term};
use oxsdatatypes::{Boolean, Date, DateTime, Decimal, Double, Float, Integer, Time};
use regex::Regex;
use std::cmp::Ordering;
use std::str::FromStr;

/// Node kind constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// IRI node.
    Iri,
    /// Blank node.
    BNode,
    /// Literal value.
    Literal,
    /// IRI or blank node.
    NonLiteral,
}

impl NodeKind {
    /// Returns true if the given term matches this node kind.
    pub fn matches(self, term: &Term) -> bool {
        match self {
            Self::Iri => matches!(term, Term::NamedNode(_)),
            Self::BNode => matches!(term, Term::BlankNode(_)),
            Self::Literal => matches!(term, Term::Literal(_)),
            Self::NonLiteral => matches!(term, Term::NamedNode(_) | Term::BlankNode(_)),
        }
    }
}

/// A compiled regular expression facet with its original pattern and flags.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    flags: Option<String>,
    regex: Regex,
}

impl Pattern {
    /// Compiles a pattern with optional `i`/`m`/`s` flags.
    pub fn new(pattern: impl Into<String>, flags: Option<String>) -> Result<Self, ShexSchemaError> {
        let source = pattern.into();
        let mut full = String::new();
        if let Some(flags) = &flags {
            if flags.contains('i') {
                full.push_str("(?i)");
            }
            if flags.contains('m') {
                full.push_str("(?m)");
            }
            if flags.contains('s') {
                full.push_str("(?s)");
            }
        }
        full.push_str(&source);
        let regex = Regex::new(&full)
            .map_err(|e| ShexSchemaError::invalid_regex(source.clone(), e.to_string()))?;
        Ok(Self {
            source,
            flags,
            regex,
        })
    }

    /// The original pattern text.
    pub fn source(&self) -> &str {
        &self.source
    }

    fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.flags == other.flags
    }
}

/// String facet constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum StringFacet {
    /// Exact string length in characters.
    Length(usize),
    /// Minimum string length.
    MinLength(usize),
    /// Maximum string length.
    MaxLength(usize),
    /// Regular expression the string value must match.
    Pattern(Pattern),
}

/// Numeric facet constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericFacet {
    /// Minimum inclusive value.
    MinInclusive(Decimal),
    /// Minimum exclusive value.
    MinExclusive(Decimal),
    /// Maximum inclusive value.
    MaxInclusive(Decimal),
    /// Maximum exclusive value.
    MaxExclusive(Decimal),
    /// Maximum number of significant digits.
    TotalDigits(u32),
    /// Maximum number of fractional digits.
    FractionDigits(u32),
}

/// Member of an explicit value set.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueSetValue {
    /// Exact RDF term.
    Term(Term),
    /// Literal with the given language tag.
    Language(String),
    /// IRI prefix match.
    IriStem(String),
    /// IRI prefix match with exclusions.
    IriStemRange {
        /// Base stem to match.
        stem: String,
        /// Values excluded from the stem.
        exclusions: Vec<ValueSetValue>,
    },
    /// Literal lexical-form prefix match.
    LiteralStem(String),
    /// Literal prefix match with exclusions.
    LiteralStemRange {
        /// Base stem to match.
        stem: String,
        /// Values excluded from the stem.
        exclusions: Vec<ValueSetValue>,
    },
    /// Language tag prefix match, on subtag boundaries.
    LanguageStem(String),
    /// Language prefix match with exclusions.
    LanguageStemRange {
        /// Base stem to match.
        stem: String,
        /// Values excluded from the stem.
        exclusions: Vec<ValueSetValue>,
    },
}

impl ValueSetValue {
    /// Returns true if the term belongs to this value set member.
    pub fn matches(&self, term: &Term) -> bool {
        match self {
            Self::Term(value) => term == value,
            Self::Language(tag) => term_language(term)
                .is_some_and(|lang| lang.eq_ignore_ascii_case(tag)),
            Self::IriStem(stem) => match term {
                Term::NamedNode(n) => n.as_str().starts_with(stem),
                _ => false,
            },
            Self::IriStemRange { stem, exclusions } => {
                Self::IriStem(stem.clone()).matches(term)
                    && !exclusions.iter().any(|ex| ex.matches(term))
            }
            Self::LiteralStem(stem) => match term {
                Term::Literal(l) => l.value().starts_with(stem),
                _ => false,
            },
            Self::LiteralStemRange { stem, exclusions } => {
                Self::LiteralStem(stem.clone()).matches(term)
                    && !exclusions.iter().any(|ex| ex.matches(term))
            }
            Self::LanguageStem(stem) => {
                term_language(term).is_some_and(|lang| language_stem_matches(lang, stem))
            }
            Self::LanguageStemRange { stem, exclusions } => {
                Self::LanguageStem(stem.clone()).matches(term)
                    && !exclusions.iter().any(|ex| ex.matches(term))
            }
        }
    }
}

/// Conjunction of value-only constraints on a node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeConstraint {
    node_kind: Option<NodeKind>,
    datatype: Option<NamedNode>,
    string_facets: Vec<StringFacet>,
    numeric_facets: Vec<NumericFacet>,
    values: Vec<ValueSetValue>,
}

impl NodeConstraint {
    /// Creates an empty constraint, satisfied by every node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires the given node kind.
    pub fn node_kind(mut self, node_kind: NodeKind) -> Self {
        self.node_kind = Some(node_kind);
        self
    }

    /// Requires a literal with the given datatype and a valid lexical form.
    pub fn datatype(mut self, datatype: NamedNode) -> Self {
        self.datatype = Some(datatype);
        self
    }

    /// Adds a string facet.
    pub fn string_facet(mut self, facet: StringFacet) -> Self {
        self.string_facets.push(facet);
        self
    }

    /// Adds a numeric facet.
    pub fn numeric_facet(mut self, facet: NumericFacet) -> Self {
        self.numeric_facets.push(facet);
        self
    }

    /// Adds a value set member. A non-empty value set requires the node to
    /// match at least one member.
    pub fn value(mut self, value: ValueSetValue) -> Self {
        self.values.push(value);
        self
    }

    /// Returns true if this constraint has no facets.
    pub fn is_empty(&self) -> bool {
        self.node_kind.is_none()
            && self.datatype.is_none()
            && self.string_facets.is_empty()
            && self.numeric_facets.is_empty()
            && self.values.is_empty()
    }

    /// Returns true if the node satisfies every facet of this constraint.
    pub fn matches(&self, node: &Term) -> bool {
        if let Some(kind) = self.node_kind {
            if !kind.matches(node) {
                return false;
            }
        }
        if let Some(datatype) = &self.datatype {
            let Term::Literal(literal) = node else {
                return false;
            };
            if literal.datatype() != datatype.as_ref() {
                return false;
            }
            if !is_lexically_valid(literal.value(), datatype.as_ref()) {
                return false;
            }
        }
        for facet in &self.string_facets {
            let value = string_value(node);
            let matched = match facet {
                StringFacet::Length(n) => value.chars().count() == *n,
                StringFacet::MinLength(n) => value.chars().count() >= *n,
                StringFacet::MaxLength(n) => value.chars().count() <= *n,
                StringFacet::Pattern(pattern) => pattern.is_match(&value),
            };
            if !matched {
                return false;
            }
        }
        for facet in &self.numeric_facets {
            let matched = match facet {
                NumericFacet::MinInclusive(bound) => {
                    compare_numeric(node, bound).is_some_and(|o| o != Ordering::Less)
                }
                NumericFacet::MinExclusive(bound) => {
                    compare_numeric(node, bound) == Some(Ordering::Greater)
                }
                NumericFacet::MaxInclusive(bound) => {
                    compare_numeric(node, bound).is_some_and(|o| o != Ordering::Greater)
                }
                NumericFacet::MaxExclusive(bound) => {
                    compare_numeric(node, bound) == Some(Ordering::Less)
                }
                NumericFacet::TotalDigits(n) => {
                    decimal_digits(node).is_some_and(|(total, _)| total <= *n)
                }
                NumericFacet::FractionDigits(n) => {
                    decimal_digits(node).is_some_and(|(_, fraction)| fraction <= *n)
                }
            };
            if !matched {
                return false;
            }
        }
        if !self.values.is_empty() && !self.values.iter().any(|v| v.matches(node)) {
            return false;
        }
        true
    }
}

/// Checks that a lexical form is valid for one of the recognized XSD
/// datatypes. Unrecognized datatypes are accepted on an equality-only
/// basis, so this returns true for them.
pub fn is_lexically_valid(lexical: &str, datatype: NamedNodeRef<'_>) -> bool {
    if datatype == xsd::STRING {
        true
    } else if datatype == xsd::INTEGER {
        Integer::from_str(lexical).is_ok()
    } else if datatype == xsd::DECIMAL {
        Decimal::from_str(lexical).is_ok()
    } else if datatype == xsd::FLOAT {
        Float::from_str(lexical).is_ok()
    } else if datatype == xsd::DOUBLE {
        Double::from_str(lexical).is_ok()
    } else if datatype == xsd::BOOLEAN {
        Boolean::from_str(lexical).is_ok()
    } else if datatype == xsd::DATE_TIME {
        DateTime::from_str(lexical).is_ok()
    } else if datatype == xsd::DATE {
        Date::from_str(lexical).is_ok()
    } else if datatype == xsd::TIME {
        Time::from_str(lexical).is_ok()
    } else if datatype == xsd::LONG {
        integer_in_range(lexical, i64::MIN, i64::MAX)
    } else if datatype == xsd::INT {
        integer_in_range(lexical, i32::MIN.into(), i32::MAX.into())
    } else if datatype == xsd::SHORT {
        integer_in_range(lexical, i16::MIN.into(), i16::MAX.into())
    } else if datatype == xsd::BYTE {
        integer_in_range(lexical, i8::MIN.into(), i8::MAX.into())
    } else if datatype == xsd::NON_NEGATIVE_INTEGER {
        integer_in_range(lexical, 0, i64::MAX)
    } else if datatype == xsd::POSITIVE_INTEGER {
        integer_in_range(lexical, 1, i64::MAX)
    } else if datatype == xsd::NON_POSITIVE_INTEGER {
        integer_in_range(lexical, i64::MIN, 0)
    } else if datatype == xsd::NEGATIVE_INTEGER {
        integer_in_range(lexical, i64::MIN, -1)
    } else if datatype == xsd::UNSIGNED_LONG {
        u64::from_str(lexical.trim_start_matches('+')).is_ok()
    } else if datatype == xsd::UNSIGNED_INT {
        integer_in_range(lexical, 0, u32::MAX.into())
    } else if datatype == xsd::UNSIGNED_SHORT {
        integer_in_range(lexical, 0, u16::MAX.into())
    } else if datatype == xsd::UNSIGNED_BYTE {
        integer_in_range(lexical, 0, u8::MAX.into())
    } else {
        true
    }
}

fn integer_in_range(lexical: &str, min: i64, max: i64) -> bool {
    Integer::from_str(lexical)
        .map(i64::from)
        .is_ok_and(|v| v >= min && v <= max)
}

fn term_language(term: &Term) -> Option<&str> {
    match term {
        Term::Literal(l) => l.language(),
        _ => None,
    }
}

/// Language stem matching happens on subtag boundaries: `fr` matches
/// `fr` and `fr-BE` but not `frm`.
fn language_stem_matches(lang: &str, stem: &str) -> bool {
    if stem.is_empty() {
        return true;
    }
    let lang = lang.to_ascii_lowercase();
    let stem = stem.to_ascii_lowercase();
    lang == stem || lang.strip_prefix(&stem).is_some_and(|rest| rest.starts_with('-'))
}

fn string_value(term: &Term) -> String {
    match term {
        Term::NamedNode(n) => n.as_str().to_owned(),
        Term::BlankNode(b) => b.as_str().to_owned(),
        Term::Literal(l) => l.value().to_owned(),
        _ => String::new(),
    }
}

fn compare_numeric(node: &Term, bound: &Decimal) -> Option<Ordering> {
    let Term::Literal(literal) = node else {
        return None;
    };
    if let Ok(value) = Decimal::from_str(literal.value()) {
        return value.partial_cmp(bound);
    }
    if let Ok(value) = Double::from_str(literal.value()) {
        return value.partial_cmp(&Double::from(*bound));
    }
    None
}

/// Significant and fractional digit counts of a decimal lexical form,
/// computed on the canonical representation.
fn decimal_digits(node: &Term) -> Option<(u32, u32)> {
    let Term::Literal(literal) = node else {
        return None;
    };
    let decimal = Decimal::from_str(literal.value()).ok()?;
    let canonical = decimal.to_string();
    let unsigned = canonical.trim_start_matches('-');
    let (integral, fraction) = match unsigned.split_once('.') {
        Some((i, f)) => (i, f),
        None => (unsigned, ""),
    };
    let integral_digits = if integral == "0" { 0 } else { integral.len() };
    let fraction_digits = fraction.len();
    let total = (integral_digits + fraction_digits).max(1);
    Some((u32::try_from(total).ok()?, u32::try_from(fraction_digits).ok()?))
}
