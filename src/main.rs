// Builds the reference divertor scene: the outer vertical target, the dome,
// and a decorative plasma wedge, then exports a combined STL plus a tagged
// per-material layout.

use std::error::Error;

use nalgebra::Vector3;
use tracing::info;
use tracing_subscriber::EnvFilter;

use divertor_cad::io::{write_combined_stl, write_tagged_stl};
use divertor_cad::{Dome, DomeSpec, Shape, Solid, Target, TargetSpec};

const MESH_RESOLUTION: (usize, usize, usize) = (192, 192, 192);

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("building outer vertical target");
    let outer_spec = TargetSpec::default();
    let outer = Target::build(&outer_spec)?;
    let outer_offset = Vector3::new(
        561.0,
        0.0,
        -367.0 - outer_spec.pfu.straight_length,
    );
    let place_outer = |name: &str, solid: &Solid| {
        Shape::new(name, solid.clone())
            .rotate(90.0, 0.0, 0.0)
            .translate_vector(outer_offset)
    };
    let mut shapes = vec![
        place_outer("tungsten", &outer.tungsten),
        place_outer("copper", &outer.copper),
        place_outer("cucrzr", &outer.tube),
        place_outer("water", &outer.water),
    ];

    info!("building dome");
    let dome = Dome::build(&DomeSpec::default())?;
    shapes.extend(dome.placed_shapes(85.0, Vector3::new(480.0, 0.0, -358.0)));

    // Decorative context only, excluded from the tagged export.
    shapes.push(Shape::new(
        "plasma",
        Solid::torus_segment(620.0, 200.0, 3.0_f64.to_radians()),
    ));

    write_combined_stl("reactor.stl", &shapes, MESH_RESOLUTION)?;
    write_tagged_stl("tagged", &shapes, MESH_RESOLUTION, &["plasma"])?;
    info!("done");
    Ok(())
}
