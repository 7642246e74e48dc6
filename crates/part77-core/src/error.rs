//! Error types for surface construction.

use thiserror::Error;

/// Reasons a runway set cannot be turned into imaginary surfaces.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SurfaceError {
    /// Runway record without a name.
    #[error("Runway name must not be empty")]
    EmptyRunwayName,

    /// Endpoint coordinates are NaN or infinite.
    #[error("Runway {runway} has a non-finite endpoint coordinate")]
    NonFiniteCoordinate { runway: String },

    /// Both ends of the runway are at the same place.
    #[error("Runway {runway} has coincident endpoints")]
    ZeroLengthRunway { runway: String },

    /// A construction step produced no solution for this runway.
    #[error("Runway {runway}: degenerate {what}")]
    DegenerateGeometry { runway: String, what: &'static str },

    /// The horizontal-surface walk could not close its outline.
    #[error("Horizontal surface outline has no valid tangent from circle {circle}")]
    DegenerateOutline { circle: usize },
}
