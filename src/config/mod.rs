// Configuration module
pub mod cloud_config;
pub mod grid_config;

pub use cloud_config::{
    BoxConfig, CloudConfig, ImageConfig, LayoutConfig, PlacementStrategy, TimingConfig,
};
pub use grid_config::GridConfig;
