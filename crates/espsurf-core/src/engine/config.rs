use thiserror::Error;

pub const DEFAULT_SPACING: f64 = 0.2;
pub const DEFAULT_RADIUS_SCALE: f64 = 1.4;
pub const DEFAULT_SMOOTHING_ITERATIONS: usize = 10;
pub const DEFAULT_SMOOTHING_FACTOR: f64 = 0.5;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Invalid value {value} for parameter '{name}': {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridConfig {
    /// Distance between neighboring lattice points, in the atoms' length unit.
    pub spacing: f64,
    /// Radius multiplier used to size the lattice. `None` means twice the shell radius scale.
    pub margin_scale: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShellConfig {
    /// Radius multiplier for the occupied shell around each atom.
    pub radius_scale: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothingConfig {
    pub iterations: usize,
    pub factor: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceConfig {
    pub grid: GridConfig,
    pub shell: ShellConfig,
    pub smoothing: SmoothingConfig,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig {
                spacing: DEFAULT_SPACING,
                margin_scale: None,
            },
            shell: ShellConfig {
                radius_scale: DEFAULT_RADIUS_SCALE,
            },
            smoothing: SmoothingConfig {
                iterations: DEFAULT_SMOOTHING_ITERATIONS,
                factor: DEFAULT_SMOOTHING_FACTOR,
            },
        }
    }
}

impl SurfaceConfig {
    /// The lattice margin scale, defaulting to `2 × radius_scale`.
    pub fn margin_scale(&self) -> f64 {
        self.grid
            .margin_scale
            .unwrap_or(2.0 * self.shell.radius_scale)
    }

    /// Checks every parameter.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidParameter`] for the first parameter out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("spacing", self.grid.spacing)?;
        require_positive("radius_scale", self.shell.radius_scale)?;
        if let Some(margin_scale) = self.grid.margin_scale {
            require_positive("margin_scale", margin_scale)?;
        }
        if !(0.0..=1.0).contains(&self.smoothing.factor) {
            return Err(ConfigError::InvalidParameter {
                name: "smoothing_factor",
                value: self.smoothing.factor,
                reason: "must lie in [0, 1]",
            });
        }
        Ok(())
    }
}

fn require_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            value,
            reason: "must be positive and finite",
        })
    }
}

#[derive(Default)]
pub struct SurfaceConfigBuilder {
    spacing: Option<f64>,
    margin_scale: Option<f64>,
    radius_scale: Option<f64>,
    smoothing_iterations: Option<usize>,
    smoothing_factor: Option<f64>,
}

impl SurfaceConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spacing(mut self, spacing: f64) -> Self {
        self.spacing = Some(spacing);
        self
    }
    pub fn margin_scale(mut self, scale: f64) -> Self {
        self.margin_scale = Some(scale);
        self
    }
    pub fn radius_scale(mut self, scale: f64) -> Self {
        self.radius_scale = Some(scale);
        self
    }
    pub fn smoothing_iterations(mut self, iterations: usize) -> Self {
        self.smoothing_iterations = Some(iterations);
        self
    }
    pub fn smoothing_factor(mut self, factor: f64) -> Self {
        self.smoothing_factor = Some(factor);
        self
    }

    /// Fills unset parameters with their defaults and validates the result.
    pub fn build(self) -> Result<SurfaceConfig, ConfigError> {
        let config = SurfaceConfig {
            grid: GridConfig {
                spacing: self.spacing.unwrap_or(DEFAULT_SPACING),
                margin_scale: self.margin_scale,
            },
            shell: ShellConfig {
                radius_scale: self.radius_scale.unwrap_or(DEFAULT_RADIUS_SCALE),
            },
            smoothing: SmoothingConfig {
                iterations: self
                    .smoothing_iterations
                    .unwrap_or(DEFAULT_SMOOTHING_ITERATIONS),
                factor: self.smoothing_factor.unwrap_or(DEFAULT_SMOOTHING_FACTOR),
            },
        };
        config.validate()?;
        Ok(config)
    }
}
