//! Screen Configuration
//!
//! Everything the overlays need that is not code: asset paths, font sizes,
//! on-screen texts, achievement rules and the per-level win-screen variants.
//! Files are JSON; every section falls back to its defaults when omitted.

use crate::game_state::{AchievementKey, LevelId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Bundled config shipped next to the assets
pub const DEFAULT_CONFIG_PATH: &str = "assets/config/screens.json";

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const GREEN: Rgb = Rgb(0, 128, 0);
    pub const GREY: Rgb = Rgb(128, 128, 128);
    pub const BROWN: Rgb = Rgb(139, 69, 19);
}

/// Size of the owning window after returning to the menu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            width: 1300,
            height: 730,
            title: "Sky Battle".into(),
        }
    }
}

/// Logical asset paths, relative to `root`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub root: PathBuf,
    pub pixel_font: String,
    pub menu_title_size: u16,
    pub title_size: u16,
    pub body_size: u16,
    pub menu_background: String,
    pub overlay_background: String,
    pub play_button: String,
    pub menu_button: String,
    pub overlay_button: String,
    pub close_button: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        AssetConfig {
            root: PathBuf::from("assets"),
            pixel_font: "fonts/pixelFont.ttf".into(),
            menu_title_size: 48,
            title_size: 40,
            body_size: 20,
            menu_background: "images/nature.jpg".into(),
            overlay_background: "images/pause.png".into(),
            play_button: "images/play_button.png".into(),
            menu_button: "images/wood_button.png".into(),
            overlay_button: "images/grass_button.png".into(),
            close_button: "images/x_button.png".into(),
        }
    }
}

/// Fixed on-screen texts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    pub game_title: String,
    pub instructions: Vec<String>,
    pub win_title: String,
    pub end_title: String,
    pub no_achievement: String,
    pub shop_title: String,
}

impl Default for TextConfig {
    fn default() -> Self {
        TextConfig {
            game_title: "Sky Battle".into(),
            instructions: vec![
                "In Sky Battle, your mission is to defend yourself from incoming bullets.".into(),
                "- Use arrow keys to navigate your aircraft.".into(),
                "- Press spacebar to fire your weapons.".into(),
                "Survive and defeat the boss to win. Good luck!".into(),
            ],
            win_title: "You Win!".into(),
            end_title: "Game Over".into(),
            no_achievement: "No achievement earned".into(),
            shop_title: "Shop".into(),
        }
    }
}

/// One achievement indicator: shown when `key` is unlocked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementRule {
    pub key: AchievementKey,
    pub label: String,
    #[serde(default = "default_achievement_color")]
    pub color: Rgb,
}

fn default_achievement_color() -> Rgb {
    Rgb::GREEN
}

impl AchievementRule {
    pub fn new(key: impl Into<AchievementKey>, label: impl Into<String>) -> Self {
        AchievementRule {
            key: key.into(),
            label: label.into(),
            color: default_achievement_color(),
        }
    }
}

/// Whether the win screen's shop button opens the shop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShopAccess {
    Open,
    Restricted { message: String },
}

/// Per-level win-screen variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelScreenConfig {
    pub level: LevelId,
    #[serde(default = "default_shop_access")]
    pub shop: ShopAccess,
    /// Last level: no next-level or shop buttons
    #[serde(default)]
    pub terminal: bool,
    #[serde(default)]
    pub bonus_achievements: Vec<AchievementRule>,
}

fn default_shop_access() -> ShopAccess {
    ShopAccess::Open
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopConfig {
    /// Score points per extra heart
    pub heart_price: u32,
}

impl Default for ShopConfig {
    fn default() -> Self {
        ShopConfig { heart_price: 50 }
    }
}

/// Root configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub window: WindowConfig,
    pub assets: AssetConfig,
    pub texts: TextConfig,
    pub achievements: Vec<AchievementRule>,
    pub levels: Vec<LevelScreenConfig>,
    pub shop: ShopConfig,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        ScreenConfig {
            window: WindowConfig::default(),
            assets: AssetConfig::default(),
            texts: TextConfig::default(),
            achievements: vec![AchievementRule::new(
                "All Enemies Defeated in Level One",
                "Achievement: All Enemies Defeated",
            )],
            levels: vec![
                LevelScreenConfig {
                    level: LevelId::TWO,
                    shop: ShopAccess::Restricted {
                        message: "Sorry, you can't purchase extra hearts for this level".into(),
                    },
                    terminal: false,
                    bonus_achievements: Vec::new(),
                },
                LevelScreenConfig {
                    level: LevelId::THREE,
                    shop: ShopAccess::Open,
                    terminal: true,
                    bonus_achievements: vec![AchievementRule::new(
                        "Achievement: Bomb Dodger in Level Three",
                        "Achievement: Bomb Dodger",
                    )],
                },
            ],
            shop: ShopConfig::default(),
        }
    }
}

/// Error types for config loading
#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: serde_json::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "Failed to read {}: {}", path.display(), source)
            }
            ConfigError::Parse { path, source } => {
                write!(f, "Failed to parse {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
        }
    }
}

impl ScreenConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = read_config(path)?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads each existing file in order, later files overriding earlier ones key by key.
    ///
    /// Returns the merged config, the files that were applied, and the errors
    /// of files that existed but could not be read or parsed.
    pub fn load_layered<P: AsRef<Path>>(
        paths: impl IntoIterator<Item = P>,
    ) -> (Self, Vec<PathBuf>, Vec<ConfigError>) {
        let mut merged = match serde_json::to_value(ScreenConfig::default()) {
            Ok(value) => value,
            Err(_) => Value::Object(Default::default()),
        };
        let mut used = Vec::new();
        let mut errors = Vec::new();

        for path in paths {
            let path = path.as_ref();
            if !path.exists() {
                continue;
            }
            let layer = read_config(path).and_then(|content| {
                serde_json::from_str::<Value>(&content).map_err(|source| ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                })
            });
            match layer {
                Ok(layer) => {
                    merge_json(&mut merged, layer);
                    used.push(path.to_path_buf());
                }
                Err(e) => errors.push(e),
            }
        }

        match serde_json::from_value(merged) {
            Ok(config) => (config, used, errors),
            Err(source) => {
                errors.push(ConfigError::Parse {
                    path: used.last().cloned().unwrap_or_default(),
                    source,
                });
                (ScreenConfig::default(), Vec::new(), errors)
            }
        }
    }

    /// Search order: bundled config, then the user's config directory
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(DEFAULT_CONFIG_PATH)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("sky-battle").join("screens.json"));
        }
        paths
    }

    /// Layered load over [`ScreenConfig::search_paths`]; problems are logged, never fatal
    pub fn load_or_default(log: &slog::Logger) -> Self {
        let (config, used, errors) = Self::load_layered(Self::search_paths());
        for error in &errors {
            slog::warn!(log, "Ignoring config file"; "error" => %error);
        }
        if used.is_empty() {
            slog::info!(log, "No config file found, using defaults");
        } else {
            slog::info!(log, "Loaded config"; "files" => ?used);
        }
        for warning in config.validate() {
            slog::warn!(log, "Config warning"; "warning" => warning);
        }
        config
    }

    /// Human-readable problems that do not prevent running
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.window.width == 0 || self.window.height == 0 {
            warnings.push(format!(
                "window size {}x{} has a zero dimension",
                self.window.width, self.window.height
            ));
        }
        for (name, size) in [
            ("menu_title_size", self.assets.menu_title_size),
            ("title_size", self.assets.title_size),
            ("body_size", self.assets.body_size),
        ] {
            if size == 0 {
                warnings.push(format!("assets.{} is zero", name));
            }
        }
        let mut seen = HashSet::new();
        for level in &self.levels {
            if !seen.insert(level.level) {
                warnings.push(format!("{} is configured more than once", level.level));
            }
        }
        let rules = self
            .achievements
            .iter()
            .chain(self.levels.iter().flat_map(|l| l.bonus_achievements.iter()));
        for rule in rules {
            if rule.label.trim().is_empty() {
                warnings.push(format!("achievement '{}' has an empty label", rule.key));
            }
        }
        warnings
    }

    pub fn level(&self, level: LevelId) -> Option<&LevelScreenConfig> {
        self.levels.iter().find(|l| l.level == level)
    }
}

fn read_config(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Objects merge recursively; any other value replaces the base
fn merge_json(base: &mut Value, layer: Value) {
    match (base, layer) {
        (Value::Object(base), Value::Object(layer)) => {
            for (key, value) in layer {
                match base.get_mut(&key) {
                    Some(existing) => merge_json(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, layer) => *base = layer,
    }
}
