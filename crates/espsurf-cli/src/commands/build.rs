use crate::cli::BuildArgs;
use crate::config::build_config;
use crate::error::{CliError, Result};
use crate::io::json::{SurfaceRecord, write_surface};
use crate::io::xyzr::read_xyzr;
use crate::utils::progress::CliProgressHandler;
use espsurf::engine::progress::ProgressReporter;
use espsurf::workflows;
use tracing::{info, warn};

pub fn run(args: BuildArgs, show_progress: bool) -> Result<()> {
    let config = build_config(&args.surface)?;
    info!(
        spacing = config.grid.spacing,
        radius_scale = config.shell.radius_scale,
        margin_scale = config.margin_scale(),
        iterations = config.smoothing.iterations,
        factor = config.smoothing.factor,
        "Surface configuration resolved."
    );

    info!("Loading atoms from {:?}", &args.surface.input);
    let atoms = read_xyzr(&args.surface.input)?;

    if let Some(limit) = args.max_grid_points {
        if limit == 0 {
            return Err(CliError::Argument(
                "--max-grid-points must be at least 1".to_string(),
            ));
        }
        let grid = workflows::surface::plan_grid(&atoms, &config)?;
        if grid.len() > limit {
            return Err(CliError::Limit {
                dims: grid.dims().to_string(),
                points: grid.len(),
                limit,
            });
        }
    }

    let progress_handler = CliProgressHandler::new(show_progress);
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Invoking the core surface workflow for {} atom(s)...", atoms.len());
    let result = workflows::surface::run(&atoms, &config, &reporter)?;
    let mesh = &result.mesh;

    let notices = progress_handler.notices();
    if !notices.is_empty() {
        warn!(
            notices = notices.len(),
            "Surface built with notices; it may be empty or open at the lattice boundary."
        );
    }
    if let Some((lower, upper)) = mesh.bounds() {
        info!(
            occupied_points = result.occupied_points,
            area = mesh.surface_area(),
            "Surface spans [{:.3}, {:.3}, {:.3}] to [{:.3}, {:.3}, {:.3}]",
            lower.x,
            lower.y,
            lower.z,
            upper.x,
            upper.y,
            upper.z
        );
    }

    write_surface(&args.output, &SurfaceRecord::from(mesh), args.pretty)?;
    info!(
        "Wrote {} vertices and {} triangles to {:?}",
        mesh.vertex_count(),
        mesh.triangle_count(),
        &args.output
    );
    Ok(())
}
