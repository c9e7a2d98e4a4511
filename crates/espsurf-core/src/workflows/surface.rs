use crate::core::grid::{Grid, GridBuilder, OccupancyField};
use crate::core::models::atom::AtomSet;
use crate::core::models::mesh::Mesh;
use crate::core::surface::march::{ISO_LEVEL, IsosurfaceExtractor};
use crate::core::surface::smooth::MeshSmoother;
use crate::engine::config::SurfaceConfig;
use crate::engine::error::SurfaceError;
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceResult {
    /// The lattice the surface was extracted from.
    pub grid: Grid,
    /// Number of lattice points inside at least one atom shell.
    pub occupied_points: usize,
    /// The smoothed surface, in the same frame and units as the input atoms.
    pub mesh: Mesh,
}

/// Computes the lattice a build would use, without rasterizing anything.
///
/// # Errors
///
/// Returns [`SurfaceError`] for an invalid configuration or atom set.
pub fn plan_grid(atoms: &AtomSet, config: &SurfaceConfig) -> Result<Grid, SurfaceError> {
    config.validate()?;
    Ok(GridBuilder::new(config.grid.spacing, config.margin_scale()).build(atoms)?)
}

/// Builds the smoothed iso-surface around `atoms`.
///
/// Every input is validated before the lattice is allocated. An occupancy field without any
/// inside/outside crossing is not an error: it produces an empty mesh and a warning.
///
/// # Errors
///
/// Returns [`SurfaceError`] when the configuration or any atom is invalid, when the lattice
/// would be too large, or when the surface has more vertices than a `u32` index can address.
#[instrument(skip_all, name = "surface_workflow", fields(atoms = atoms.len()))]
pub fn run(
    atoms: &AtomSet,
    config: &SurfaceConfig,
    reporter: &ProgressReporter,
) -> Result<SurfaceResult, SurfaceError> {
    config.validate()?;
    let smoother = MeshSmoother::new(config.smoothing.iterations, config.smoothing.factor)?;
    info!("Starting surface build for {} atom(s).", atoms.len());

    // === Phase 1: Lattice ===
    reporter.report(Progress::PhaseStart {
        name: "Building Grid",
    });
    let grid = GridBuilder::new(config.grid.spacing, config.margin_scale()).build(atoms)?;
    info!(
        dims = %grid.dims(),
        points = grid.len(),
        spacing = grid.spacing(),
        "Grid built."
    );
    reporter.report(Progress::PhaseFinish);

    // === Phase 2: Occupancy ===
    reporter.report(Progress::PhaseStart {
        name: "Rasterizing Occupancy",
    });
    reporter.report(Progress::TaskStart {
        total_steps: grid.dims().nx as u64,
    });
    let field =
        OccupancyField::rasterize_with(&grid, atoms, config.shell.radius_scale, |_| {
            reporter.report(Progress::TaskIncrement)
        })?;
    reporter.report(Progress::TaskFinish);

    let occupied_points = field.occupied_count();
    if field.touches_boundary() {
        let message =
            "Occupied points reach the outer lattice layer; the surface will be open there.";
        warn!("{message}");
        reporter.report(Progress::Message(message.to_string()));
    }
    reporter.report(Progress::PhaseFinish);

    // === Phase 3: Marching cubes ===
    reporter.report(Progress::PhaseStart {
        name: "Extracting Isosurface",
    });
    let mesh = IsosurfaceExtractor::new(ISO_LEVEL).extract(&field)?;
    drop(field);
    if mesh.is_empty() {
        warn!(
            occupied_points,
            "Occupancy field has no inside/outside crossing; returning an empty mesh."
        );
        reporter.report(Progress::Message(format!(
            "No surface crosses the lattice ({occupied_points} occupied points); the mesh is empty."
        )));
    }
    reporter.report(Progress::PhaseFinish);

    // === Phase 4: Smoothing ===
    let mesh = if smoother.iterations() > 0 && !mesh.is_empty() {
        reporter.report(Progress::PhaseStart {
            name: "Smoothing Mesh",
        });
        reporter.report(Progress::TaskStart {
            total_steps: smoother.iterations() as u64,
        });
        let smoothed = smoother.smooth_with(mesh, |_| reporter.report(Progress::TaskIncrement));
        reporter.report(Progress::TaskFinish);
        reporter.report(Progress::PhaseFinish);
        smoothed
    } else {
        mesh
    };

    let mesh = mesh.map_vertices(|p| grid.lattice_to_world(p));

    info!(
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "Surface build complete."
    );
    Ok(SurfaceResult {
        grid,
        occupied_points,
        mesh,
    })
}

/// [`run`] without progress reporting, returning only the mesh.
pub fn build_surface(atoms: &AtomSet, config: &SurfaceConfig) -> Result<Mesh, SurfaceError> {
    run(atoms, config, &ProgressReporter::new()).map(|result| result.mesh)
}
