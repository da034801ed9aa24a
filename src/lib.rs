//! Geometric core of a minimal ray tracer.
//!
//! Answers one question for a ray: which surface does it hit first, how far
//! away, and with what normal and material. Camera, shading and image output
//! live elsewhere and only consume [`Hit`]s.
//!
//! - [`Ray`] - origin and unit direction, with mirror reflection
//! - [`Hit`] / [`Intersection`] - outcome of one intersection test
//! - [`Surface`] - anything a ray can be tested against
//! - [`Sphere`] - analytic quadratic test
//! - [`Mesh`] - triangle mesh with Möller–Trumbore tests and smoothed normals
//! - [`Object`] - closed set of surfaces, including lists reporting the
//!   nearest hit
//!
//! ```
//! use nalgebra::{point, vector};
//! use tracer_core::{Color, Material, Mesh, Ray, Surface};
//!
//! let material = Material::new(Color::BLACK, Color::WHITE, Color::WHITE, 10.0).unwrap();
//! let mut mesh = Mesh::new(false, &material);
//! let a = mesh.add_vertex(point![0.0, 0.0, 0.0]);
//! let b = mesh.add_vertex(point![1.0, 0.0, 0.0]);
//! let c = mesh.add_vertex(point![0.0, 1.0, 0.0]);
//! mesh.add_face(a, b, c).unwrap();
//! mesh.calculate_normals();
//!
//! let ray = Ray::new(point![0.25, 0.25, -1.0], vector![0.0, 0.0, 1.0]);
//! let hit = mesh.intersect(&ray).unwrap();
//! assert!((hit.distance() - 1.0).abs() < 1e-9);
//! ```

mod error;
mod material;
mod math;
mod mesh;
mod object;
mod ray;
mod sphere;

pub use error::{GeometryError, MaterialError, MeshError, RayError};
pub use material::{Color, Material, MaterialLibrary};
pub use math::{Dir3, Point, Vec3, EPSILON, MIN_DIRECTION_NORM, NORMALIZED_TOLERANCE};
pub use mesh::{FaceRef, Mesh, MeshIndex, MeshVertex, NormalWeighting};
pub use object::{Object, Surface};
pub use ray::{nearest, Hit, Intersection, Ray};
pub use sphere::Sphere;
