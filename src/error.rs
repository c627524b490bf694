//! Error types for ShEx schema construction and validation.

/// Main error type for ShEx operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ShexError {
    /// Error while building a schema.
    #[error(transparent)]
    Schema(#[from] ShexSchemaError),

    /// Error during validation.
    #[error(transparent)]
    Validation(#[from] ShexValidationError),
}

/// Error type for schema construction.
///
/// All of these are fatal: a schema that triggers one of them is rejected
/// before any validation can run.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ShexSchemaError {
    /// The same label is defined twice. Definitions bind at most once.
    #[error("Label {label} is already bound to a definition")]
    DuplicateLabel { label: String },

    /// Generated labels are reserved for anonymous expressions.
    #[error("Label {label} is reserved for internal use")]
    ReservedLabel { label: String },

    /// A shape expression reference has no definition.
    #[error("Undefined shape expression reference: {label}")]
    UndefinedShapeRef { label: String },

    /// A triple expression reference has no definition.
    #[error("Undefined triple expression reference: {label}")]
    UndefinedTripleExprRef { label: String },

    /// Triple expression references form a cycle, so the expression cannot
    /// be normalized to a finite tree.
    #[error("Cyclic triple expression reference through {label}")]
    CyclicTripleExprRef { label: String },

    /// A shape label depends on itself through negation, which has no
    /// stratification.
    #[error("Shape {label} references itself through negation")]
    NegatedCycle { label: String },

    /// Invalid cardinality bounds.
    #[error("Invalid cardinality: min={min}, max={max}")]
    InvalidCardinality { min: u64, max: u64 },

    /// Invalid regular expression in a string facet.
    #[error("Invalid regex pattern '{pattern}': {message}")]
    InvalidRegex { pattern: String, message: String },

    /// A triple constraint value expression was not lifted to a label.
    #[error("Triple constraint on {property} has an unresolved value expression")]
    UnresolvedValueExpr { property: String },
}

/// Error type for validation operations.
///
/// A node failing a shape is a normal negative outcome (`Ok(false)`), never
/// an error; these variants are reserved for fatal conditions.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ShexValidationError {
    /// The requested label is not defined in the schema.
    #[error("Unknown label: {label}")]
    UnknownLabel { label: String },

    /// External shapes cannot be validated.
    #[error("Validation of external shapes is not supported")]
    ExternalShape,

    /// Internal invariant violation.
    #[error("Internal validation error: {message}")]
    Internal { message: String },
}

impl ShexSchemaError {
    /// Creates a duplicate label error.
    pub fn duplicate_label(label: impl Into<String>) -> Self {
        Self::DuplicateLabel {
            label: label.into(),
        }
    }

    /// Creates a reserved label error.
    pub fn reserved_label(label: impl Into<String>) -> Self {
        Self::ReservedLabel {
            label: label.into(),
        }
    }

    /// Creates an undefined shape reference error.
    pub fn undefined_shape_ref(label: impl Into<String>) -> Self {
        Self::UndefinedShapeRef {
            label: label.into(),
        }
    }

    /// Creates an undefined triple expression reference error.
    pub fn undefined_triple_expr_ref(label: impl Into<String>) -> Self {
        Self::UndefinedTripleExprRef {
            label: label.into(),
        }
    }

    /// Creates a cyclic triple expression reference error.
    pub fn cyclic_triple_expr_ref(label: impl Into<String>) -> Self {
        Self::CyclicTripleExprRef {
            label: label.into(),
        }
    }

    /// Creates a negated cycle error.
    pub fn negated_cycle(label: impl Into<String>) -> Self {
        Self::NegatedCycle {
            label: label.into(),
        }
    }

    /// Creates an invalid regex error.
    pub fn invalid_regex(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRegex {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Creates an unresolved value expression error.
    pub fn unresolved_value_expr(property: impl Into<String>) -> Self {
        Self::UnresolvedValueExpr {
            property: property.into(),
        }
    }
}

impl ShexValidationError {
    /// Creates an unknown label error.
    pub fn unknown_label(label: impl Into<String>) -> Self {
        Self::UnknownLabel {
            label: label.into(),
        }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
