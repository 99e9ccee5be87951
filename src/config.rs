use ggez::graphics::Color;
use log::warn;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CELL_SIZE: i16 = 24;
pub const GRID_COLS: i16 = 25;
pub const GRID_ROWS: i16 = 25;

/// Height of the HUD and touch control strip under the board, in pixels.
pub const PANEL_HEIGHT: f32 = 96.0;

pub const BASE_INTERVAL_MS: u64 = 140;
pub const MIN_INTERVAL_MS: u64 = 40;

pub const FOOD_REWARD: u32 = 10;
pub const SPEED_STEP: f64 = 0.05;
pub const SPEED_CAP: f64 = 3.0;
pub const SPEED_FLOOR: f64 = 0.5;
pub const MANUAL_SPEED_STEP: f64 = 0.1;

pub const BEST_SCORE_KEY: &str = "snake_best";
pub const SCORES_FILE: &str = "snake_scores.json";
pub const SETTINGS_FILE: &str = "snake_settings.json";
pub const SETTINGS_ENV: &str = "SNAKE_SETTINGS";

// Colors
pub const BACKGROUND_COLOR: Color = Color::new(0.06, 0.09, 0.16, 1.0);
pub const GRID_LINE_COLOR: Color = Color::new(1.0, 1.0, 1.0, 0.03);
pub const FOOD_FILL: Color = Color::new(56.0 / 255.0, 189.0 / 255.0, 248.0 / 255.0, 0.25);
pub const FOOD_STROKE: Color = Color::new(56.0 / 255.0, 189.0 / 255.0, 248.0 / 255.0, 0.5);
pub const SNAKE_RGB: (f32, f32, f32) = (34.0 / 255.0, 197.0 / 255.0, 94.0 / 255.0);
pub const SNAKE_STROKE: Color = Color::new(SNAKE_RGB.0, SNAKE_RGB.1, SNAKE_RGB.2, 0.7);
pub const GAME_OVER_SHADE: Color = Color::new(0.0, 0.0, 0.0, 0.55);
pub const PAUSE_SHADE: Color = Color::new(0.0, 0.0, 0.0, 0.35);
pub const TITLE_COLOR: Color = Color::WHITE;
pub const SUBTITLE_COLOR: Color = Color::new(203.0 / 255.0, 213.0 / 255.0, 225.0 / 255.0, 1.0);
pub const PAUSE_TEXT_COLOR: Color = Color::new(229.0 / 255.0, 231.0 / 255.0, 235.0 / 255.0, 1.0);
pub const PANEL_COLOR: Color = Color::new(0.1, 0.13, 0.2, 1.0);
pub const BUTTON_COLOR: Color = Color::new(1.0, 1.0, 1.0, 0.08);
pub const BUTTON_STROKE: Color = Color::new(1.0, 1.0, 1.0, 0.25);

/// Runtime settings, read from an optional JSON file.
///
/// Every field falls back to the compiled-in default, so a settings file only
/// needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub cols: i16,
    pub rows: i16,
    pub cell_size: i16,
    pub base_interval_ms: u64,
    pub min_interval_ms: u64,
    pub scores_path: PathBuf,
    pub resource_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            cols: GRID_COLS,
            rows: GRID_ROWS,
            cell_size: CELL_SIZE,
            base_interval_ms: BASE_INTERVAL_MS,
            min_interval_ms: MIN_INTERVAL_MS,
            scores_path: PathBuf::from(SCORES_FILE),
            resource_dir: PathBuf::from("./resources"),
        }
    }
}

impl Settings {
    /// Loads settings from `$SNAKE_SETTINGS` or the default settings file.
    pub fn load() -> Self {
        let path = std::env::var_os(SETTINGS_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE));
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Self {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Settings::default(),
            Err(e) => {
                warn!("Failed to read settings from {}: {}", path.display(), e);
                return Settings::default();
            }
        };
        match serde_json::from_str::<Settings>(&contents) {
            Ok(settings) => settings.validated(),
            Err(e) => {
                warn!("Ignoring malformed settings in {}: {}", path.display(), e);
                Settings::default()
            }
        }
    }

    fn validated(self) -> Self {
        if self.cols < 4 || self.rows < 1 || self.cell_size < 4 {
            warn!(
                "Grid {}x{} with cell size {} is too small, using defaults",
                self.cols, self.rows, self.cell_size
            );
            return Settings::default();
        }
        let fits = |cells: i16| cells.checked_mul(self.cell_size).is_some();
        if !fits(self.cols) || !fits(self.rows) {
            warn!(
                "Grid {}x{} with cell size {} does not fit a window, using defaults",
                self.cols, self.rows, self.cell_size
            );
            return Settings::default();
        }
        if self.base_interval_ms == 0 || self.min_interval_ms == 0 {
            warn!("Tick intervals must be positive, using defaults");
            return Settings::default();
        }
        self
    }

    pub fn board_width(&self) -> f32 {
        self.cols as f32 * self.cell_size as f32
    }

    pub fn board_height(&self) -> f32 {
        self.rows as f32 * self.cell_size as f32
    }

    pub fn window_size(&self) -> (f32, f32) {
        (self.board_width(), self.board_height() + PANEL_HEIGHT)
    }

    /// Tick interval for a speed multiplier: `max(floor, base / multiplier)`.
    pub fn tick_interval(&self, speed_multiplier: f64) -> Duration {
        let ms = (self.base_interval_ms as f64 / speed_multiplier).max(self.min_interval_ms as f64);
        Duration::from_secs_f64(ms / 1000.0)
    }
}
