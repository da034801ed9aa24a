use log::trace;

use crate::mesh::Mesh;
use crate::ray::{nearest, Intersection, Ray};
use crate::sphere::Sphere;

/// Anything a ray can be tested against.
///
/// `'m` is the lifetime of the materials the surface refers to; hits borrow
/// the material for as long as the material store lives, not the surface.
pub trait Surface<'m> {
    fn intersect(&self, ray: &Ray) -> Intersection<'m>;
}

/// Closed set of scene surfaces.
#[derive(Clone, Debug)]
pub enum Object<'m> {
    Sphere(Sphere<'m>),
    Mesh(Mesh<'m>),
    List(Vec<Object<'m>>),
}

impl<'m> Surface<'m> for Object<'m> {
    fn intersect(&self, ray: &Ray) -> Intersection<'m> {
        match self {
            Object::Sphere(sphere) => sphere.intersect(ray),
            Object::Mesh(mesh) => mesh.intersect(ray),
            Object::List(list) => {
                trace!(target: "tracer", "Testing ray against {} objects", list.len());
                nearest(list.iter().map(|obj| obj.intersect(ray)))
            }
        }
    }
}

impl<'m> From<Sphere<'m>> for Object<'m> {
    fn from(sphere: Sphere<'m>) -> Self {
        Object::Sphere(sphere)
    }
}

impl<'m> From<Mesh<'m>> for Object<'m> {
    fn from(mesh: Mesh<'m>) -> Self {
        Object::Mesh(mesh)
    }
}

impl<'m> FromIterator<Object<'m>> for Object<'m> {
    fn from_iter<I: IntoIterator<Item=Object<'m>>>(iter: I) -> Self {
        Object::List(iter.into_iter().collect())
    }
}
