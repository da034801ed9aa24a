use std::cmp::Ordering;

use float_ord::FloatOrd;
use log::trace;

use crate::error::RayError;
use crate::material::Material;
use crate::math::{is_normalized, Dir3, Point, Vec3, EPSILON, MIN_DIRECTION_NORM};

/// A half-line with a unit-length direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    origin: Point,
    direction: Dir3,
}

impl Ray {
    /// Creates a ray, normalizing `direction`.
    ///
    /// A zero-length direction is a caller bug; use [`Ray::try_new`] when the
    /// direction comes from untrusted input.
    pub fn new(origin: Point, direction: Vec3) -> Self {
        debug_assert!(
            direction.norm() > MIN_DIRECTION_NORM,
            "Ray direction must not be zero: {:?}",
            direction
        );
        Self {
            origin,
            direction: Dir3::new_normalize(direction),
        }
    }

    pub fn try_new(origin: Point, direction: Vec3) -> Result<Self, RayError> {
        let direction = normalize_direction(direction)?;
        Ok(Self { origin, direction })
    }

    pub fn origin(&self) -> &Point {
        &self.origin
    }

    pub fn direction(&self) -> &Dir3 {
        &self.direction
    }

    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    /// Replaces the direction, normalizing it.
    pub fn set_direction(&mut self, direction: Vec3) {
        debug_assert!(
            direction.norm() > MIN_DIRECTION_NORM,
            "Ray direction must not be zero: {:?}",
            direction
        );
        self.direction = Dir3::new_normalize(direction);
    }

    pub fn try_set_direction(&mut self, direction: Vec3) -> Result<(), RayError> {
        self.direction = normalize_direction(direction)?;
        Ok(())
    }

    pub fn at(&self, t: f64) -> Point {
        self.origin + self.direction.into_inner() * t
    }

    /// Mirrors this ray about `normal`, whose origin is the point of
    /// reflection and whose direction points away from the surface.
    ///
    /// The incident ray must approach the surface: `dot(self, normal) < 0`.
    pub fn reflect(&self, normal: &Ray) -> Ray {
        let i: &Vec3 = &self.direction;
        let n: &Vec3 = &normal.direction;
        debug_assert!(is_normalized(i), "Incident direction must be normalized");
        debug_assert!(is_normalized(n), "Normal direction must be normalized");
        let i_dot_n = i.dot(n);
        debug_assert!(
            i_dot_n < 0.0,
            "Wrong normal direction for reflection: {:?} . {:?} = {}",
            i,
            n,
            i_dot_n
        );
        Ray::new(normal.origin, i - 2.0 * i_dot_n * n)
    }
}

fn normalize_direction(direction: Vec3) -> Result<Dir3, RayError> {
    Dir3::try_new(direction, MIN_DIRECTION_NORM).ok_or(RayError::DegenerateDirection {
        norm: direction.norm(),
    })
}

/// A ray-surface intersection.
///
/// "No intersection" is the `None` of [`Intersection`], so a `Hit` always
/// carries a valid distance of at least [`EPSILON`].
#[derive(Clone, Copy, Debug)]
pub struct Hit<'m> {
    ray: Ray,
    distance: f64,
    normal: Dir3,
    material: &'m Material,
}

/// Outcome of a single intersection test.
pub type Intersection<'m> = Option<Hit<'m>>;

impl<'m> Hit<'m> {
    pub fn new(ray: Ray, distance: f64, normal: Dir3, material: &'m Material) -> Self {
        debug_assert!(distance >= EPSILON, "Hit distance below EPSILON: {}", distance);
        Self {
            ray,
            distance,
            normal,
            material,
        }
    }

    /// Distance from the ray origin to the hit point.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// The query ray that produced this hit.
    pub fn ray(&self) -> &Ray {
        &self.ray
    }

    pub fn normal(&self) -> &Dir3 {
        &self.normal
    }

    pub fn material(&self) -> &'m Material {
        self.material
    }

    /// World-space point of intersection.
    pub fn point(&self) -> Point {
        self.ray.at(self.distance)
    }

    /// Ray anchored at the hit point along the surface normal, ready to be
    /// passed to [`Ray::reflect`].
    pub fn normal_ray(&self) -> Ray {
        Ray {
            origin: self.point(),
            direction: self.normal,
        }
    }
}

impl PartialEq for Hit<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.distance == other.distance
    }
}

impl PartialOrd for Hit<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.distance.partial_cmp(&other.distance)
    }
}

/// Picks the closest hit out of a set of intersection results.
pub fn nearest<'m, I>(results: I) -> Intersection<'m>
    where I: IntoIterator<Item=Intersection<'m>> {
    let hit = results.into_iter()
        .flatten()
        .min_by_key(|hit| FloatOrd(hit.distance));
    if let Some(hit) = &hit {
        trace!(target: "tracer", "Nearest hit at distance {}", hit.distance);
    }
    hit
}

#[cfg(test)]
mod tests {
    use nalgebra::{point, vector};

    use super::*;
    use crate::material::Color;
    use crate::math::testing::{assert_vec_near, EPS_STRONG, EPS_WEAK};

    fn material() -> Material {
        Material::new(Color::WHITE, Color::WHITE, Color::WHITE, 1.0).unwrap()
    }

    #[test]
    fn test_ray_normalizes_direction() {
        let ray = Ray::new(Point::origin(), vector![10.0, 0.0, 0.0]);
        assert!((ray.direction().norm() - 1.0).abs() < EPS_STRONG);
        assert_vec_near(ray.direction(), &vector![1.0, 0.0, 0.0], EPS_STRONG);
    }

    #[test]
    fn test_ray_random_directions_are_unit() {
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..1000 {
            let direction = vector![
                rng.f64() * 200.0 - 100.0,
                rng.f64() * 200.0 - 100.0,
                rng.f64() * 200.0 - 100.0
            ];
            if direction.norm() < 1.0e-3 {
                continue;
            }
            let ray = Ray::new(point![rng.f64(), rng.f64(), rng.f64()], direction);
            assert!((ray.direction().norm() - 1.0).abs() < EPS_STRONG);
        }
    }

    #[test]
    fn test_ray_set_direction_renormalizes() {
        let mut ray = Ray::new(Point::origin(), vector![1.0, 0.0, 0.0]);
        ray.set_direction(vector![0.0, -3.0, 4.0]);
        assert_vec_near(ray.direction(), &vector![0.0, -0.6, 0.8], EPS_STRONG);
    }

    #[test]
    fn test_ray_try_new_rejects_zero_direction() {
        let result = Ray::try_new(Point::origin(), Vec3::zeros());
        assert!(matches!(result, Err(RayError::DegenerateDirection { .. })));

        let mut ray = Ray::new(Point::origin(), vector![1.0, 0.0, 0.0]);
        assert!(ray.try_set_direction(Vec3::zeros()).is_err());
        assert_vec_near(ray.direction(), &vector![1.0, 0.0, 0.0], EPS_STRONG);
    }

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(point![1.0, 2.0, 3.0], vector![0.0, 0.0, 2.0]);
        let p = ray.at(5.0);
        assert_vec_near(&p.coords, &vector![1.0, 2.0, 8.0], EPS_STRONG);
    }

    #[test]
    fn test_ray_reflect() {
        let ray = Ray::new(Point::origin(), vector![1.0, 0.0, 0.0]);
        let normal = Ray::new(point![5.0, 0.0, 0.0], vector![-1.0, 1.0, 0.0]);
        let reflected = ray.reflect(&normal);
        assert_vec_near(&reflected.origin().coords, &normal.origin().coords, EPS_STRONG);
        assert_vec_near(reflected.direction(), &vector![0.0, 1.0, 0.0], EPS_WEAK);
    }

    #[test]
    fn test_ray_reflect_backwards() {
        let ray = Ray::new(Point::origin(), vector![1.0, 0.0, 0.0]);
        let normal = Ray::new(point![10.0, 0.0, 0.0], vector![-1.0, 0.0, 0.0]);
        let reflected = ray.reflect(&normal);
        assert_vec_near(&reflected.origin().coords, &normal.origin().coords, EPS_STRONG);
        assert_vec_near(reflected.direction(), &-ray.direction().into_inner(), EPS_STRONG);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "Wrong normal direction")]
    fn test_ray_reflect_rejects_leaving_ray() {
        let ray = Ray::new(Point::origin(), vector![1.0, 0.0, 0.0]);
        let normal = Ray::new(point![5.0, 0.0, 0.0], vector![1.0, 0.0, 0.0]);
        ray.reflect(&normal);
    }

    #[test]
    fn test_hit_point_and_normal_ray() {
        let material = material();
        let ray = Ray::new(point![10.0, 0.0, 0.0], vector![-1.0, 0.0, 0.0]);
        let hit = Hit::new(ray, 5.0, Vec3::x_axis(), &material);
        assert_vec_near(&hit.point().coords, &vector![5.0, 0.0, 0.0], EPS_STRONG);

        let normal_ray = hit.normal_ray();
        assert_vec_near(&normal_ray.origin().coords, &vector![5.0, 0.0, 0.0], EPS_STRONG);
        assert_vec_near(normal_ray.direction(), &vector![1.0, 0.0, 0.0], EPS_STRONG);

        let reflected = ray.reflect(&normal_ray);
        assert_vec_near(reflected.direction(), &vector![1.0, 0.0, 0.0], EPS_STRONG);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "Hit distance below EPSILON")]
    fn test_hit_rejects_distance_below_epsilon() {
        let material = material();
        let ray = Ray::new(Point::origin(), vector![0.0, 0.0, 1.0]);
        Hit::new(ray, EPSILON / 2.0, Vec3::z_axis(), &material);
    }

    #[test]
    fn test_hit_ordering_and_nearest() {
        let material = material();
        let ray = Ray::new(Point::origin(), vector![0.0, 0.0, 1.0]);
        let near = Hit::new(ray, 1.0, Vec3::z_axis(), &material);
        let far = Hit::new(ray, 3.0, Vec3::z_axis(), &material);
        assert!(near < far);

        let picked = nearest([None, Some(far), Some(near), None]).unwrap();
        assert!((picked.distance() - 1.0).abs() < EPS_STRONG);
        let misses: [Intersection; 2] = [None, None];
        assert!(nearest(misses).is_none());
    }
}
