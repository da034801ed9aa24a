//! Triangle meshes.
//!
//! A [`Mesh`] owns its vertices and faces in two contiguous arrays. Faces
//! refer to vertices by index and vertices list the faces around them, so
//! nothing points back into the mesh; [`FaceRef`] borrows the mesh to
//! resolve those indices at query time.
//!
//! Build the mesh with [`Mesh::add_vertex`] and [`Mesh::add_face`], call
//! [`Mesh::calculate_normals`] once, then query it read-only.
//!
//! Faces are wound counter-clockwise when viewed from outside in a
//! left-handed frame (x right, y up, z into the view), which makes the
//! outward flat normal `E2 × E1`.

use std::collections::BTreeSet;

use log::{debug, trace, warn};

use crate::error::MeshError;
use crate::material::Material;
use crate::math::{is_normalized, Dir3, Point, Vec3, EPSILON, MIN_DIRECTION_NORM};
use crate::object::Surface;
use crate::ray::{nearest, Hit, Intersection, Ray};

pub type MeshIndex = usize;

/// How face normals are combined into a vertex normal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NormalWeighting {
    /// Each adjacent face contributes its unit normal scaled by its area.
    #[default]
    AreaWeighted,
    /// Each adjacent face contributes its unit normal.
    Uniform,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MeshVertex {
    pub point: Point,
    /// Unit length once computed, zero before.
    pub normal: Vec3,
    pub adjacent_faces: BTreeSet<MeshIndex>,
}

impl MeshVertex {
    fn new(point: Point, normal: Vec3) -> Self {
        MeshVertex {
            point,
            normal,
            adjacent_faces: BTreeSet::new(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct MeshFace<'m> {
    vertices: [MeshIndex; 3],
    material: &'m Material,
}

#[derive(Clone, Debug)]
pub struct Mesh<'m> {
    interpolate_normals: bool,
    normal_weighting: NormalWeighting,
    material: &'m Material,
    vertices: Vec<MeshVertex>,
    faces: Vec<MeshFace<'m>>,
    normals_ready: bool,
}

impl<'m> Mesh<'m> {
    /// Creates an empty mesh. Faces added without an explicit material use
    /// `material`.
    pub fn new(interpolate_normals: bool, material: &'m Material) -> Self {
        Mesh {
            interpolate_normals,
            normal_weighting: NormalWeighting::default(),
            material,
            vertices: Vec::new(),
            faces: Vec::new(),
            normals_ready: false,
        }
    }

    pub fn with_normal_weighting(mut self, weighting: NormalWeighting) -> Self {
        self.normal_weighting = weighting;
        self
    }

    pub fn interpolate_normals(&self) -> bool {
        self.interpolate_normals
    }

    pub fn normal_weighting(&self) -> NormalWeighting {
        self.normal_weighting
    }

    pub fn material(&self) -> &'m Material {
        self.material
    }

    pub fn vertices(&self) -> &[MeshVertex] {
        &self.vertices
    }

    pub fn vertex(&self, index: MeshIndex) -> Option<&MeshVertex> {
        self.vertices.get(index)
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    pub fn face(&self, index: MeshIndex) -> Option<FaceRef<'_, 'm>> {
        self.faces.get(index).map(|face| FaceRef { mesh: self, face, index })
    }

    pub fn faces(&self) -> impl ExactSizeIterator<Item=FaceRef<'_, 'm>> + '_ {
        self.faces
            .iter()
            .enumerate()
            .map(move |(index, face)| FaceRef { mesh: self, face, index })
    }

    pub fn add_vertex(&mut self, point: Point) -> MeshIndex {
        self.add_vertex_with_normal(point, Vec3::zeros())
    }

    /// Appends a vertex with a preset normal, stored normalized. A zero
    /// normal counts as none.
    pub fn add_vertex_with_normal(&mut self, point: Point, normal: Vec3) -> MeshIndex {
        let normal = normal.try_normalize(MIN_DIRECTION_NORM).unwrap_or_else(Vec3::zeros);
        self.vertices.push(MeshVertex::new(point, normal));
        self.vertices.len() - 1
    }

    pub fn add_face(&mut self, i1: MeshIndex, i2: MeshIndex, i3: MeshIndex) -> Result<MeshIndex, MeshError> {
        self.add_face_with_material(i1, i2, i3, self.material)
    }

    /// Appends a triangle and registers it with its three vertices.
    pub fn add_face_with_material(
        &mut self,
        i1: MeshIndex,
        i2: MeshIndex,
        i3: MeshIndex,
        material: &'m Material,
    ) -> Result<MeshIndex, MeshError> {
        let indices = [i1, i2, i3];
        self.check_face(indices)?;
        Ok(self.push_face(indices, material))
    }

    pub fn add_quad_face(
        &mut self,
        i1: MeshIndex,
        i2: MeshIndex,
        i3: MeshIndex,
        i4: MeshIndex,
    ) -> Result<(MeshIndex, MeshIndex), MeshError> {
        self.add_quad_face_with_material(i1, i2, i3, i4, self.material)
    }

    /// Splits the counter-clockwise quad `i1 i2 i3 i4` into the triangles
    /// `(i1, i2, i3)` and `(i1, i3, i4)`. Nothing is added if either is invalid.
    pub fn add_quad_face_with_material(
        &mut self,
        i1: MeshIndex,
        i2: MeshIndex,
        i3: MeshIndex,
        i4: MeshIndex,
        material: &'m Material,
    ) -> Result<(MeshIndex, MeshIndex), MeshError> {
        let first = [i1, i2, i3];
        let second = [i1, i3, i4];
        self.check_face(first)?;
        self.check_face(second)?;
        Ok((self.push_face(first, material), self.push_face(second, material)))
    }

    fn check_face(&self, indices: [MeshIndex; 3]) -> Result<(), MeshError> {
        let [a, b, c] = indices;
        if a == b || a == c || b == c {
            return Err(MeshError::DegenerateFace { indices });
        }
        match indices.into_iter().find(|&index| index >= self.vertices.len()) {
            Some(index) => Err(MeshError::VertexOutOfRange { index, len: self.vertices.len() }),
            None => Ok(()),
        }
    }

    fn push_face(&mut self, vertices: [MeshIndex; 3], material: &'m Material) -> MeshIndex {
        let index = self.faces.len();
        self.faces.push(MeshFace { vertices, material });
        for vertex in vertices {
            self.vertices[vertex].adjacent_faces.insert(index);
        }
        self.normals_ready = false;
        index
    }

    /// Derives every vertex normal from the faces around it.
    ///
    /// Vertices without adjacent faces keep their current normal (zero unless
    /// one was given to [`Mesh::add_vertex_with_normal`]). Vertices whose face
    /// normals cancel out, as on a double-sided sheet, get a zero normal and
    /// their faces shade flat.
    pub fn calculate_normals(&mut self) {
        let weighting = self.normal_weighting;
        let contributions: Vec<Option<Vec3>> = self.faces()
            .map(|face| face.normal_contribution(weighting))
            .collect();

        let mut isolated = 0;
        let mut cancelled = 0;
        for vertex in &mut self.vertices {
            if vertex.adjacent_faces.is_empty() {
                isolated += 1;
                continue;
            }
            let sum: Vec3 = vertex.adjacent_faces
                .iter()
                .filter_map(|&face| contributions[face])
                .sum();
            vertex.normal = match sum.try_normalize(MIN_DIRECTION_NORM) {
                Some(normal) => normal,
                None => {
                    cancelled += 1;
                    Vec3::zeros()
                }
            };
        }

        if isolated > 0 {
            warn!(target: "tracer", "{} of {} vertices have no adjacent faces", isolated, self.vertices.len());
        }
        if cancelled > 0 {
            warn!(
                target: "tracer",
                "{} of {} vertices have face normals summing to zero, falling back to flat normals",
                cancelled,
                self.vertices.len()
            );
        }
        debug!(
            target: "tracer",
            "Calculated {:?} normals for {} vertices, {} faces",
            weighting,
            self.vertices.len(),
            self.faces.len()
        );
        self.normals_ready = true;
    }
}

impl<'m> Surface<'m> for Mesh<'m> {
    /// Linear scan over all faces, keeping the closest hit.
    fn intersect(&self, ray: &Ray) -> Intersection<'m> {
        let hit = nearest(self.faces().map(|face| face.intersect(ray)));
        trace!(target: "tracer", "Mesh with {} faces: hit = {}", self.faces.len(), hit.is_some());
        hit
    }
}

/// A face together with the mesh that resolves its vertex indices.
#[derive(Clone, Copy, Debug)]
pub struct FaceRef<'a, 'm> {
    mesh: &'a Mesh<'m>,
    face: &'a MeshFace<'m>,
    index: MeshIndex,
}

impl<'a, 'm> FaceRef<'a, 'm> {
    pub fn index(&self) -> MeshIndex {
        self.index
    }

    pub fn indices(&self) -> [MeshIndex; 3] {
        self.face.vertices
    }

    pub fn material(&self) -> &'m Material {
        self.face.material
    }

    /// One of the three corners, `None` unless `corner` is in `0..3`.
    pub fn vertex(&self, corner: usize) -> Option<&'a MeshVertex> {
        let mesh = self.mesh;
        self.face.vertices.get(corner).map(|&index| &mesh.vertices[index])
    }

    fn corners(&self) -> [&'a MeshVertex; 3] {
        let mesh = self.mesh;
        self.face.vertices.map(|index| &mesh.vertices[index])
    }

    fn points(&self) -> [Point; 3] {
        self.corners().map(|vertex| vertex.point)
    }

    fn cross(&self) -> Vec3 {
        let [v0, v1, v2] = self.points();
        (v2 - v0).cross(&(v1 - v0))
    }

    /// Normal of the triangle's plane.
    pub fn flat_normal(&self) -> Dir3 {
        Dir3::new_normalize(self.cross())
    }

    /// Barycentric blend of the vertex normals at `(u, v)`.
    ///
    /// Falls back to [`FaceRef::flat_normal`] where the blend vanishes, which
    /// covers zero vertex normals.
    pub fn interpolated_normal(&self, u: f64, v: f64) -> Dir3 {
        debug_assert!(self.mesh.normals_ready, "calculate_normals must run before interpolating");
        let [n0, n1, n2] = self.corners().map(|vertex| vertex.normal);
        let blend = (1.0 - u - v) * n0 + u * n1 + v * n2;
        Dir3::try_new(blend, MIN_DIRECTION_NORM).unwrap_or_else(|| self.flat_normal())
    }

    /// Surface normal at barycentric `(u, v)`, smooth or flat depending on the
    /// mesh.
    pub fn normal_at(&self, u: f64, v: f64) -> Dir3 {
        if self.mesh.interpolate_normals {
            self.interpolated_normal(u, v)
        } else {
            self.flat_normal()
        }
    }

    /// Area of the triangle (Heron's formula).
    pub fn square(&self) -> f64 {
        let [v0, v1, v2] = self.points();
        let a = (v1 - v0).norm();
        let b = (v2 - v1).norm();
        let c = (v0 - v2).norm();
        let s = (a + b + c) / 2.0;
        (s * (s - a) * (s - b) * (s - c)).max(0.0).sqrt()
    }

    fn normal_contribution(&self, weighting: NormalWeighting) -> Option<Vec3> {
        let normal = self.cross().try_normalize(MIN_DIRECTION_NORM);
        if normal.is_none() {
            warn!(target: "tracer", "Face {} is collinear, skipped in normal averaging", self.index);
        }
        match weighting {
            NormalWeighting::AreaWeighted => normal.map(|n| n * self.square()),
            NormalWeighting::Uniform => normal,
        }
    }

    /// Möller–Trumbore ray-triangle test.
    pub fn intersect(&self, ray: &Ray) -> Intersection<'m> {
        let direction: &Vec3 = ray.direction();
        debug_assert!(is_normalized(direction), "Ray's direction must be normalized");

        let [v0, v1, v2] = self.points();
        let e1 = v1 - v0;
        let e2 = v2 - v0;

        let p = direction.cross(&e2);
        let det = e1.dot(&p);
        // parallel to the plane, front or back
        if det.abs() < EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;

        let t = *ray.origin() - v0;
        let u = t.dot(&p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = t.cross(&e1);
        let v = direction.dot(&q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let distance = e2.dot(&q) * inv_det;
        if distance < EPSILON {
            return None;
        }

        Some(Hit::new(*ray, distance, self.normal_at(u, v), self.face.material))
    }
}
