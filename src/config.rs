use std::time::Duration;

// ============================================================================
// Grid dimensions
// ============================================================================

pub const DEFAULT_GRID_WIDTH: usize = 10;
pub const DEFAULT_GRID_HEIGHT: usize = 20;

pub const MIN_GRID_WIDTH: usize = 4;
pub const MAX_GRID_WIDTH: usize = 30;
pub const MIN_GRID_HEIGHT: usize = 4;
pub const MAX_GRID_HEIGHT: usize = 40;

/// Playing field dimensions.
///
/// Out-of-range values are clamped, never rejected.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct GridConfig {
    pub width: usize,
    pub height: usize,
}

impl GridConfig {
    pub fn clamped(width: usize, height: usize) -> Self {
        Self {
            width: clamp_width(width),
            height: clamp_height(height),
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_GRID_WIDTH,
            height: DEFAULT_GRID_HEIGHT,
        }
    }
}

pub fn clamp_width(width: usize) -> usize {
    width.clamp(MIN_GRID_WIDTH, MAX_GRID_WIDTH)
}

pub fn clamp_height(height: usize) -> usize {
    height.clamp(MIN_GRID_HEIGHT, MAX_GRID_HEIGHT)
}

// ============================================================================
// Session timing
// ============================================================================

pub const DEFAULT_TICK_MS: u64 = 500;

/// Settings for the loop that drives a [`Game`](crate::Game).
///
/// The gravity period is fixed and does not change with level.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SessionConfig {
    pub tick_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(DEFAULT_TICK_MS),
        }
    }
}
