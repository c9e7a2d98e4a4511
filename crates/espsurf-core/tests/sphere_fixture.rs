use espsurf::core::models::atom::AtomSet;
use espsurf::core::models::mesh::Mesh;
use espsurf::core::surface::smooth::{MeshSmoother, roughness};
use espsurf::engine::config::{SurfaceConfig, SurfaceConfigBuilder};
use espsurf::engine::progress::ProgressReporter;
use espsurf::workflows::surface::{SurfaceResult, run};
use nalgebra::Point3;

const TOLERANCE: f64 = 1e-9;

fn unit_sphere() -> AtomSet {
    AtomSet::from_xyzr(&[[0.0, 0.0, 0.0, 1.0]])
}

fn water() -> AtomSet {
    AtomSet::from_xyzr(&[
        [0.0, 0.0, 0.117, 1.52],
        [0.0, 0.757, -0.467, 1.2],
        [0.0, -0.757, -0.467, 1.2],
    ])
}

fn unit_sphere_config(iterations: usize) -> SurfaceConfig {
    SurfaceConfigBuilder::new()
        .spacing(0.25)
        .radius_scale(1.0)
        .margin_scale(2.0)
        .smoothing_iterations(iterations)
        .build()
        .unwrap()
}

fn build(atoms: &AtomSet, config: &SurfaceConfig) -> SurfaceResult {
    run(atoms, config, &ProgressReporter::new()).unwrap()
}

/// Roughness after each of `iterations` single smoothing steps, starting with the input mesh.
fn roughness_history(mesh: &Mesh, iterations: usize, factor: f64) -> Vec<f64> {
    let step = MeshSmoother::new(1, factor).unwrap();
    let mut current = mesh.clone();
    let mut history = vec![roughness(&current)];
    for _ in 0..iterations {
        current = step.smooth(current);
        history.push(roughness(&current));
    }
    history
}

#[test]
fn unit_sphere_produces_the_reference_lattice_and_mesh() {
    let result = build(&unit_sphere(), &unit_sphere_config(0));

    assert_eq!(result.grid.dims().as_array(), [17, 17, 17]);
    assert_eq!(result.grid.origin(), Point3::new(-2.0, -2.0, -2.0));
    assert_eq!(result.grid.spacing(), 0.25);
    assert_eq!(result.occupied_points, 251);
    assert_eq!(result.mesh.vertex_count(), 270);
    assert_eq!(result.mesh.triangle_count(), 536);
}

#[test]
fn unit_sphere_mesh_is_closed_with_sphere_topology() {
    let mesh = build(&unit_sphere(), &unit_sphere_config(0)).mesh;

    assert!(mesh.is_closed());
    assert_eq!(mesh.euler_characteristic(), 2);
    assert_eq!(mesh.flat_vertices().len(), 3 * 270);
    assert_eq!(mesh.flat_indices().len(), 3 * 536);
}

#[test]
fn unit_sphere_area_is_close_to_the_analytic_sphere() {
    let mesh = build(&unit_sphere(), &unit_sphere_config(0)).mesh;
    let analytic = 4.0 * std::f64::consts::PI;
    let area = mesh.surface_area();
    assert!(area > 0.8 * analytic && area < 1.2 * analytic, "area = {area}");
}

#[test]
fn unit_sphere_faces_point_outward() {
    let mesh = build(&unit_sphere(), &unit_sphere_config(0)).mesh;
    let vertices = mesh.vertices();
    for &[a, b, c] in mesh.triangles() {
        let (a, b, c) = (vertices[a as usize], vertices[b as usize], vertices[c as usize]);
        let normal = (b - a).cross(&(c - a));
        let face_center = (a.coords + b.coords + c.coords) / 3.0;
        assert!(normal.dot(&face_center) > 0.0);
    }
}

#[test]
fn smoothing_preserves_counts_and_closure() {
    let raw = build(&unit_sphere(), &unit_sphere_config(0)).mesh;
    let smoothed = build(&unit_sphere(), &unit_sphere_config(10)).mesh;

    assert_eq!(smoothed.vertex_count(), raw.vertex_count());
    assert_eq!(smoothed.triangles(), raw.triangles());
    assert!(smoothed.is_closed());
    assert!(roughness(&smoothed) < roughness(&raw));
}

#[test]
fn smoothing_roughness_never_increases_on_the_sphere() {
    let raw = build(&unit_sphere(), &unit_sphere_config(0)).mesh;
    for factor in [0.1, 0.3, 0.5, 1.0] {
        let history = roughness_history(&raw, 10, factor);
        for pair in history.windows(2) {
            assert!(pair[1] <= pair[0] + TOLERANCE, "factor {factor}: {history:?}");
        }
    }
}

#[test]
fn water_with_default_scales_yields_a_closed_surface() {
    let config = SurfaceConfigBuilder::new()
        .spacing(0.2)
        .smoothing_iterations(0)
        .build()
        .unwrap();
    let result = build(&water(), &config);

    assert_eq!(result.grid.dims().as_array(), [45, 45, 49]);
    assert!(result.occupied_points > 0);
    assert!(result.mesh.is_closed());
    assert_eq!(result.mesh.euler_characteristic(), 2);

    for factor in [0.1, 0.3, 0.5, 1.0] {
        let history = roughness_history(&result.mesh, 10, factor);
        for pair in history.windows(2) {
            assert!(pair[1] <= pair[0] + TOLERANCE, "factor {factor}");
        }
    }
}

#[test]
fn rebuilding_is_deterministic() {
    let config = SurfaceConfig::default();
    let first = build(&water(), &config);
    let second = build(&water(), &config);
    assert_eq!(first, second);
}
