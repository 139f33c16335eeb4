//! Named shapes handed to the exporter.
//!
//! A [`Shape`] carries a solid together with the material (or decorative)
//! name the exporter tags it with. Monoblock materials, the cooling tube,
//! the coolant itself and opaque decorative solids supplied by collaborators
//! (the plasma, divertor caps) all travel through the same type.

use nalgebra::Vector3;

use crate::float_types::Real;
use crate::kernel::Solid;

/// A solid with an exporter-facing name. Transform helpers return a new
/// shape, matching the value semantics of [`Solid`].
#[derive(Debug, Clone)]
pub struct Shape {
    name: String,
    solid: Solid,
}

impl Shape {
    pub fn new(name: impl Into<String>, solid: Solid) -> Self {
        Self {
            name: name.into(),
            solid,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn solid(&self) -> &Solid {
        &self.solid
    }

    /// Replaces the carried solid, keeping the name.
    pub fn with_solid(self, solid: Solid) -> Self {
        Self { solid, ..self }
    }

    /// Rotates the carried solid by degrees about the global axes.
    pub fn rotate(self, x_deg: Real, y_deg: Real, z_deg: Real) -> Self {
        let solid = self.solid.rotate(x_deg, y_deg, z_deg);
        Self { solid, ..self }
    }

    pub fn translate(self, x: Real, y: Real, z: Real) -> Self {
        let solid = self.solid.translate(x, y, z);
        Self { solid, ..self }
    }

    pub fn translate_vector(self, v: Vector3<Real>) -> Self {
        let solid = self.solid.translate_vector(v);
        Self { solid, ..self }
    }

    /// Unions another solid into this shape (used to merge the dome and
    /// outer-target contributions of one material).
    pub fn union_with(self, other: &Solid) -> Self {
        let solid = self.solid.union(other);
        Self { solid, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn transforms_chain_and_keep_the_name() {
        let shape = Shape::new("tungsten", Solid::cuboid(2.0, 2.0, 2.0))
            .rotate(0.0, 0.0, 90.0)
            .translate(5.0, 0.0, 0.0);
        assert_eq!(shape.name(), "tungsten");
        assert!(shape.solid().contains(&Point3::new(5.0, 0.0, 0.0)));
        assert!(!shape.solid().contains(&Point3::new(0.0, 0.0, 0.0)));
    }

    #[test]
    fn union_with_merges_another_contribution() {
        let merged = Shape::new("copper", Solid::cuboid(1.0, 1.0, 1.0))
            .union_with(&Solid::cuboid(1.0, 1.0, 1.0).translate(3.0, 0.0, 0.0));
        assert_eq!(merged.name(), "copper");
        assert!(merged.solid().contains(&Point3::new(3.0, 0.0, 0.0)));
        assert!(merged.solid().contains(&Point3::new(0.0, 0.0, 0.0)));
    }
}
