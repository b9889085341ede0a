use crate::config::GridConfig;
use crate::errors::{MosaicError, MosaicResult};
use crate::render::EasingType;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::time::Duration;

/// Upper bound on growth attempts per seed block
pub const MAX_GROWTH_ITERATIONS: u32 = 1024;

/// Complete configuration for one image cloud instance.
///
/// Every value is static for the lifetime of the instance; the cloud never
/// re-reads its configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudConfig {
    pub grid: GridConfig,
    pub display: BoxConfig,
    pub timing: TimingConfig,
    pub layout: LayoutConfig,
    pub images: ImageConfig,
}

/// Pixel geometry of the display box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxConfig {
    /// Pixel width of the display box
    pub width: f64,
    /// Pixel height of the display box
    pub height: f64,
    /// Pixel spacing between images (and around the border)
    pub spacing: f64,
}

impl Default for BoxConfig {
    fn default() -> Self {
        Self {
            width: 300.0,
            height: 300.0,
            spacing: 5.0,
        }
    }
}

/// Pacing of the add/remove cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Delay before every add or remove action (ms)
    pub image_delay_ms: u64,
    /// Fade in/out duration, passed through to the renderer (ms)
    pub fade_duration_ms: u64,
    /// Easing curve of the fades
    pub fade_easing: EasingType,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            image_delay_ms: 500,
            fade_duration_ms: 1000,
            fade_easing: EasingType::Swing,
        }
    }
}

/// How the scheduler picks the next incoming block to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementStrategy {
    /// Largest addable block first, ties broken by sequence order
    #[default]
    Largest,
    /// First addable block in sequence order
    First,
}

/// Block layout generation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Fewest growth attempts per seed block
    pub min_growth_iterations: u32,
    /// Most growth attempts per seed block
    pub max_growth_iterations: u32,
    pub placement: PlacementStrategy,
    /// Fixed RNG seed for reproducible layouts
    pub seed: Option<u64>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_growth_iterations: 3,
            max_growth_iterations: 8,
            placement: PlacementStrategy::Largest,
            seed: None,
        }
    }
}

/// Where the candidate image list comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Path of the JSON image list
    pub list_path: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            list_path: "imglist.json".to_string(),
        }
    }
}

impl CloudConfig {
    /// Load configuration from file
    pub fn load_from_file(path: &str) -> MosaicResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: CloudConfig = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save_to_file(&self, path: &str) -> MosaicResult<()> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Override fields from `IMAGE_CLOUD_*` environment variables.
    /// Unparseable values are ignored.
    pub fn apply_env(&mut self) {
        fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
            std::env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
        }

        // Grid configuration
        if let Some(rows) = parsed("IMAGE_CLOUD_ROWS") {
            self.grid.rows = rows;
        }
        if let Some(cols) = parsed("IMAGE_CLOUD_COLS") {
            self.grid.cols = cols;
        }

        // Display box
        if let Some(width) = parsed("IMAGE_CLOUD_WIDTH") {
            self.display.width = width;
        }
        if let Some(height) = parsed("IMAGE_CLOUD_HEIGHT") {
            self.display.height = height;
        }
        if let Some(spacing) = parsed("IMAGE_CLOUD_SPACING") {
            self.display.spacing = spacing;
        }

        // Timing
        if let Some(delay) = parsed("IMAGE_CLOUD_IMAGE_DELAY_MS") {
            self.timing.image_delay_ms = delay;
        }
        if let Some(fade) = parsed("IMAGE_CLOUD_FADE_MS") {
            self.timing.fade_duration_ms = fade;
        }

        // Layout
        if let Some(seed) = parsed("IMAGE_CLOUD_SEED") {
            self.layout.seed = Some(seed);
        }
        if let Ok(placement) = std::env::var("IMAGE_CLOUD_PLACEMENT") {
            match placement.to_lowercase().as_str() {
                "largest" => self.layout.placement = PlacementStrategy::Largest,
                "first" => self.layout.placement = PlacementStrategy::First,
                _ => {}
            }
        }

        if let Ok(path) = std::env::var("IMAGE_CLOUD_IMAGES") {
            self.images.list_path = path;
        }
    }

    /// Delay before each queued add/remove action
    pub fn image_delay(&self) -> Duration {
        Duration::from_millis(self.timing.image_delay_ms)
    }

    /// Fade duration handed to the renderer
    pub fn fade_duration(&self) -> Duration {
        Duration::from_millis(self.timing.fade_duration_ms)
    }

    pub fn growth_iterations(&self) -> RangeInclusive<u32> {
        self.layout.min_growth_iterations..=self.layout.max_growth_iterations
    }

    /// Validate configuration values
    pub fn validate(&self) -> MosaicResult<()> {
        if self.grid.rows == 0 || self.grid.cols == 0 {
            return Err(MosaicError::ConfigError(
                "Grid dimensions must be positive".into(),
            ));
        }

        let BoxConfig {
            width,
            height,
            spacing,
        } = self.display;
        for (name, value) in [("width", width), ("height", height), ("spacing", spacing)] {
            if !value.is_finite() {
                return Err(MosaicError::ConfigError(format!(
                    "Box {} must be finite, got {}",
                    name, value
                )));
            }
        }
        if spacing < 0.0 {
            return Err(MosaicError::ConfigError(
                "Spacing must not be negative".into(),
            ));
        }
        if width - (self.grid.cols as f64 + 1.0) * spacing <= 0.0 {
            return Err(MosaicError::ConfigError(format!(
                "Box width {} leaves no room for {} columns with spacing {}",
                width, self.grid.cols, spacing
            )));
        }
        if height - (self.grid.rows as f64 + 1.0) * spacing <= 0.0 {
            return Err(MosaicError::ConfigError(format!(
                "Box height {} leaves no room for {} rows with spacing {}",
                height, self.grid.rows, spacing
            )));
        }

        if self.layout.min_growth_iterations > self.layout.max_growth_iterations {
            return Err(MosaicError::ConfigError(
                "Growth iteration range is empty".into(),
            ));
        }
        if self.layout.max_growth_iterations > MAX_GROWTH_ITERATIONS {
            return Err(MosaicError::ConfigError(format!(
                "At most {} growth iterations are allowed, got {}",
                MAX_GROWTH_ITERATIONS, self.layout.max_growth_iterations
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = CloudConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.grid, GridConfig::new(7, 7));
        assert_eq!(config.image_delay(), Duration::from_millis(500));
        assert_eq!(config.fade_duration(), Duration::from_millis(1000));
        assert_eq!(config.growth_iterations(), 3..=8);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = CloudConfig::default();
        config.grid.rows = 0;
        assert!(config.validate().is_err());

        let mut config = CloudConfig::default();
        config.display.width = 40.0; // 8 gaps of 5px leave nothing
        assert!(config.validate().is_err());

        let mut config = CloudConfig::default();
        config.layout.min_growth_iterations = 9;
        assert!(config.validate().is_err());

        let mut config = CloudConfig::default();
        config.display.spacing = -1.0;
        assert!(config.validate().is_err());

        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let mut config = CloudConfig::default();
            config.display.width = bad;
            assert!(matches!(config.validate(), Err(MosaicError::ConfigError(_))));

            let mut config = CloudConfig::default();
            config.display.height = bad;
            assert!(matches!(config.validate(), Err(MosaicError::ConfigError(_))));

            let mut config = CloudConfig::default();
            config.display.spacing = bad;
            assert!(matches!(config.validate(), Err(MosaicError::ConfigError(_))));
        }

        let mut config = CloudConfig::default();
        config.layout.max_growth_iterations = u32::MAX;
        assert!(config.validate().is_err());

        let mut config = CloudConfig::default();
        config.layout.max_growth_iterations = MAX_GROWTH_ITERATIONS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_non_finite_width_from_env_is_rejected() {
        std::env::set_var("IMAGE_CLOUD_WIDTH", "NaN");
        let config = CloudConfig::from_env();
        std::env::remove_var("IMAGE_CLOUD_WIDTH");

        assert!(config.display.width.is_nan());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: CloudConfig =
            serde_json::from_str(r#"{ "grid": { "rows": 3, "cols": 4 }, "layout": { "placement": "first" } }"#)
                .unwrap();
        assert_eq!(config.grid, GridConfig::new(3, 4));
        assert_eq!(config.layout.placement, PlacementStrategy::First);
        assert_eq!(config.layout.max_growth_iterations, 8);
        assert_eq!(config.display, BoxConfig::default());
    }
}
