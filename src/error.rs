//! Error types for geometry construction.
//!
//! Only construction can fail. A ray that misses a surface is a normal
//! `None` result, never an error.

use thiserror::Error;

use crate::mesh::MeshIndex;

/// Errors raised while building a [`Ray`](crate::Ray).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RayError {
    /// Direction vector has (near) zero length and cannot be normalized.
    #[error("Ray direction has near-zero length ({norm})")]
    DegenerateDirection {
        /// Length of the rejected vector.
        norm: f64,
    },
}

/// Errors raised while building analytic surfaces.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Sphere radius must be strictly positive and finite.
    #[error("Sphere radius must be positive, got {0}")]
    NonPositiveRadius(f64),
}

/// Errors raised while adding faces to a [`Mesh`](crate::Mesh).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// Two of the three face indices are equal.
    #[error("Face needs three distinct vertices, got {indices:?}")]
    DegenerateFace {
        /// Indices as passed by the caller.
        indices: [MeshIndex; 3],
    },

    /// A face references a vertex that does not exist yet.
    #[error("Vertex index {index} out of range (mesh has {len} vertices)")]
    VertexOutOfRange {
        /// Offending index.
        index: MeshIndex,
        /// Number of vertices in the mesh.
        len: usize,
    },
}

/// Errors raised by [`Material`](crate::Material) and
/// [`MaterialLibrary`](crate::MaterialLibrary).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MaterialError {
    /// A color channel lies outside `[0, 1]`.
    #[error("{slot} color channel out of bounds: {value}")]
    ChannelOutOfRange {
        /// Which color ("ambient", "specular" or "diffuse").
        slot: &'static str,
        /// Rejected channel value.
        value: f64,
    },

    /// Shininess must be finite and non-negative.
    #[error("Invalid shininess exponent: {0}")]
    InvalidShininess(f64),

    /// Lookup of an unknown material name.
    #[error("Material not found: {0}")]
    NotFound(String),
}
