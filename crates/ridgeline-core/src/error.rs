//! Error handling for Ridgeline
//!
//! Provides the error taxonomy shared by every layer of the annotation engine:
//! - Geometry errors (degenerate shapes, coordinates outside the image)
//! - Integrity errors (label collisions, missing or in-use marking types)
//! - Import errors (malformed or inconsistent marking documents)
//!
//! External tool failures live next to the process runner in `ridgeline-tools`.
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Geometry error type
///
/// Raised while a shape is being built interactively or imported. The
/// interactive path recovers locally by discarding the in-progress shape.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// The shape collapsed below the minimum size it needs to be meaningful
    #[error("Degenerate {shape}: {reason}")]
    Degenerate {
        /// Shape kind, e.g. "line_segment".
        shape: String,
        /// What made it degenerate.
        reason: String,
    },

    /// A coordinate lies outside the image bounds
    #[error("Point ({x:.2}, {y:.2}) lies outside the {width}x{height} image")]
    OutOfImage {
        /// X coordinate in image pixels.
        x: f64,
        /// Y coordinate in image pixels.
        y: f64,
        /// Image width in pixels.
        width: u32,
        /// Image height in pixels.
        height: u32,
    },

    /// A coordinate or angle is NaN or infinite
    #[error("Non-finite value in {field}")]
    NonFinite {
        /// Name of the offending field.
        field: String,
    },
}

/// Integrity error type
///
/// Violations of the store invariants. These are reported as diagnostics or
/// refused operations and never abort an interaction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IntegrityError {
    /// Two committed markings on one canvas share a label
    #[error("Duplicate label {label} on {canvas} canvas")]
    DuplicateLabel {
        /// The colliding label.
        label: u32,
        /// Canvas name.
        canvas: String,
    },

    /// No marking carries the requested label
    #[error("No marking with label {label}")]
    UnknownLabel {
        /// The label that was looked up.
        label: u32,
    },

    /// A marking references a type that is not registered
    #[error("Marking type {type_id} not found")]
    MissingType {
        /// The missing type id.
        type_id: String,
    },

    /// A marking type cannot be removed while markings still use it
    #[error("Marking type {type_id} is used by {count} marking(s)")]
    TypeInUse {
        /// The type id.
        type_id: String,
        /// How many markings reference it.
        count: usize,
    },

    /// A marking type id is already registered
    #[error("Marking type {type_id} already exists")]
    DuplicateType {
        /// The conflicting type id.
        type_id: String,
    },
}

/// Import error type
///
/// Raised while validating a marking document. Validation always completes
/// before any store is touched.
#[derive(Error, Debug)]
pub enum ImportError {
    /// The document is not valid JSON or does not match the expected layout
    #[error("Malformed marking document: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A marking record lacks a field its class requires
    #[error("Marking {index} ({class}) is missing '{field}'")]
    MissingField {
        /// Position of the record in `data.markings`.
        index: usize,
        /// Marking class of the record.
        class: String,
        /// Field that is required for the class.
        field: String,
    },

    /// A marking record references a type unknown to the registry
    #[error("Marking {index} references unknown type {type_id}")]
    UnknownType {
        /// Position of the record in `data.markings`.
        index: usize,
        /// The unknown type id.
        type_id: String,
    },

    /// The document was produced for another working mode
    #[error("Working mode mismatch: document is {found}, session is {expected}")]
    WorkingModeMismatch {
        /// Working mode of the session.
        expected: String,
        /// Working mode stored in the document.
        found: String,
    },

    /// The document was written by another program
    #[error("Document was written by '{name}', not ridgeline")]
    ForeignSoftware {
        /// Software name stored in the document.
        name: String,
    },

    /// A record carries an invalid coordinate
    #[error("Marking {index}: {source}")]
    Geometry {
        /// Position of the record in `data.markings`.
        index: usize,
        /// The geometry problem.
        #[source]
        source: GeometryError,
    },
}

/// Main error type for Ridgeline
///
/// A unified error type that can represent any error from the engine.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Geometry error
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Integrity error
    #[error(transparent)]
    Integrity(#[from] IntegrityError),

    /// Import error
    #[error(transparent)]
    Import(#[from] ImportError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a geometry error
    pub fn is_geometry_error(&self) -> bool {
        matches!(self, Error::Geometry(_))
    }

    /// Check if this is an integrity error
    pub fn is_integrity_error(&self) -> bool {
        matches!(self, Error::Integrity(_))
    }

    /// Check if this is an import error
    pub fn is_import_error(&self) -> bool {
        matches!(self, Error::Import(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
