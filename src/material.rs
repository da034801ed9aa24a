use std::collections::HashMap;

use log::debug;

use crate::error::MaterialError;

/// Linear RGB color, each channel nominally in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    fn channels(&self) -> [f64; 3] {
        [self.r, self.g, self.b]
    }
}

/// Phong surface description referenced by every hit.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    ambient: Color,
    specular: Color,
    diffuse: Color,
    shininess: f64,
}

impl Material {
    pub fn new(ambient: Color, specular: Color, diffuse: Color, shininess: f64) -> Result<Self, MaterialError> {
        check_bounds("ambient", &ambient)?;
        check_bounds("specular", &specular)?;
        check_bounds("diffuse", &diffuse)?;
        if !shininess.is_finite() || shininess < 0.0 {
            return Err(MaterialError::InvalidShininess(shininess));
        }
        Ok(Material {
            ambient,
            specular,
            diffuse,
            shininess,
        })
    }

    pub fn ambient(&self) -> Color {
        self.ambient
    }

    pub fn specular(&self) -> Color {
        self.specular
    }

    pub fn diffuse(&self) -> Color {
        self.diffuse
    }

    pub fn shininess(&self) -> f64 {
        self.shininess
    }
}

fn check_bounds(slot: &'static str, color: &Color) -> Result<(), MaterialError> {
    match color.channels().into_iter().find(|value| !(0.0..=1.0).contains(value)) {
        Some(value) => Err(MaterialError::ChannelOutOfRange { slot, value }),
        None => Ok(()),
    }
}

/// Named material store owned by the scene description.
///
/// Surfaces borrow materials from the library, so it must outlive them.
#[derive(Debug, Default)]
pub struct MaterialLibrary {
    materials: HashMap<String, Material>,
}

impl MaterialLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a material.
    pub fn insert(&mut self, name: impl Into<String>, material: Material) {
        let name = name.into();
        debug!(target: "tracer", "Registering material '{}'", name);
        self.materials.insert(name, material);
    }

    pub fn get(&self, name: &str) -> Result<&Material, MaterialError> {
        self.materials
            .get(name)
            .ok_or_else(|| MaterialError::NotFound(name.to_owned()))
    }

    pub fn names(&self) -> impl Iterator<Item=&str> {
        self.materials.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}
