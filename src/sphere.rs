use crate::error::GeometryError;
use crate::material::Material;
use crate::math::{is_normalized, Dir3, Point, Vec3, EPSILON};
use crate::object::Surface;
use crate::ray::{Hit, Intersection, Ray};

#[derive(Clone, Debug)]
pub struct Sphere<'m> {
    center: Point,
    radius: f64,
    material: &'m Material,
}

impl<'m> Sphere<'m> {
    pub fn new(center: Point, radius: f64, material: &'m Material) -> Self {
        debug_assert!(radius > 0.0, "Sphere radius must be positive: {}", radius);
        Sphere { center, radius, material }
    }

    pub fn try_new(center: Point, radius: f64, material: &'m Material) -> Result<Self, GeometryError> {
        if !(radius > 0.0 && radius.is_finite()) {
            return Err(GeometryError::NonPositiveRadius(radius));
        }
        Ok(Sphere { center, radius, material })
    }

    pub fn center(&self) -> &Point {
        &self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn material(&self) -> &'m Material {
        self.material
    }
}

impl<'m> Surface<'m> for Sphere<'m> {
    fn intersect(&self, ray: &Ray) -> Intersection<'m> {
        debug_assert!(is_normalized(ray.direction()), "Ray's direction must be normalized");

        let direction: &Vec3 = ray.direction();
        let m = *ray.origin() - self.center;
        let b = m.dot(direction);
        let c = m.magnitude_squared() - self.radius * self.radius;

        // origin outside and pointing away
        if c > 0.0 && b > 0.0 {
            return None;
        }

        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }
        let sqrtd = discriminant.sqrt();

        // first forward crossing; the far root covers origins inside the sphere
        let mut distance = -b - sqrtd;
        if distance < EPSILON {
            distance = -b + sqrtd;
            if distance < EPSILON {
                return None;
            }
        }

        let point = ray.at(distance);
        let normal = Dir3::new_normalize(point - self.center);
        Some(Hit::new(*ray, distance, normal, self.material))
    }
}
