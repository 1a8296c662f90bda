//! Overlay Content
//!
//! A [`ContentSpec`] is the declarative description of one overlay: title,
//! text lines, buttons and the action taken when the overlay is closed
//! without pressing a button. Specs are built fresh for every presentation
//! from the config and the current session, and never stored.

use crate::achievements;
use crate::config::{AchievementRule, Rgb, ScreenConfig, ShopAccess};
use crate::game_state::{GameState, LevelId, SessionResult};

/// The modal overlays this layer can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    MainMenu,
    Instructions,
    WinScreen,
    EndScreen,
    Shop,
    ShopNotice,
}

impl OverlayKind {
    pub const ALL: [OverlayKind; 6] = [
        OverlayKind::MainMenu,
        OverlayKind::Instructions,
        OverlayKind::WinScreen,
        OverlayKind::EndScreen,
        OverlayKind::Shop,
        OverlayKind::ShopNotice,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            OverlayKind::MainMenu => "main_menu",
            OverlayKind::Instructions => "instructions",
            OverlayKind::WinScreen => "win_screen",
            OverlayKind::EndScreen => "end_screen",
            OverlayKind::Shop => "shop",
            OverlayKind::ShopNotice => "shop_notice",
        }
    }
}

/// What a button (or the close affordance) asks the flow to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    StartGame,
    ShowInstructions,
    Quit,
    CloseInstructions,
    NextLevel,
    OpenShop,
    ReturnToMenu,
    BuyHeart,
    CloseShop,
    Acknowledge,
}

/// Font face and sizes used by one overlay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontSpec {
    pub path: String,
    pub title_size: u16,
    pub body_size: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLine {
    pub text: String,
    pub color: Rgb,
}

impl TextLine {
    pub fn new(text: impl Into<String>, color: Rgb) -> Self {
        TextLine {
            text: text.into(),
            color,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonSpec {
    pub label: String,
    pub text_color: Rgb,
    /// Background image path, skipped if it fails to load
    pub image: Option<String>,
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentSpec {
    /// Empty means no title row
    pub title: String,
    pub title_color: Rgb,
    pub font: FontSpec,
    pub lines: Vec<TextLine>,
    pub buttons: Vec<ButtonSpec>,
    pub background: Option<String>,
    /// Image for an explicit close button; `None` means no close button is drawn
    pub close_button: Option<String>,
    /// Taken when the overlay is closed without pressing a button
    pub close_action: Action,
    pub width: u32,
    pub height: u32,
}

impl ContentSpec {
    pub fn line_texts(&self) -> Vec<&str> {
        self.lines.iter().map(|l| l.text.as_str()).collect()
    }

    pub fn button_labels(&self) -> Vec<&str> {
        self.buttons.iter().map(|b| b.label.as_str()).collect()
    }

    pub fn action_of(&self, index: usize) -> Option<Action> {
        self.buttons.get(index).map(|b| b.action)
    }
}

/// Per-level parameters of the win screen
#[derive(Debug, Clone, PartialEq)]
pub struct WinVariant {
    pub level: LevelId,
    pub shop: ShopAccess,
    pub terminal: bool,
    /// Base rules followed by the level's bonus rules
    pub rules: Vec<AchievementRule>,
}

impl WinVariant {
    /// Levels without an entry get an open shop and the base rules only
    pub fn for_level(config: &ScreenConfig, level: LevelId) -> Self {
        let mut rules = config.achievements.clone();
        match config.level(level) {
            Some(entry) => {
                rules.extend(entry.bonus_achievements.iter().cloned());
                WinVariant {
                    level,
                    shop: entry.shop.clone(),
                    terminal: entry.terminal,
                    rules,
                }
            }
            None => WinVariant {
                level,
                shop: ShopAccess::Open,
                terminal: false,
                rules,
            },
        }
    }
}

fn font_spec(config: &ScreenConfig, title_size: u16) -> FontSpec {
    FontSpec {
        path: config.assets.pixel_font.clone(),
        title_size,
        body_size: config.assets.body_size,
    }
}

fn overlay_button(config: &ScreenConfig, label: &str, action: Action) -> ButtonSpec {
    ButtonSpec {
        label: label.to_string(),
        text_color: Rgb::BLACK,
        image: Some(config.assets.overlay_button.clone()),
        action,
    }
}

fn score_line(score: u32) -> TextLine {
    TextLine::new(format!("Your Score: {}", score), Rgb::BLACK)
}

pub fn main_menu(config: &ScreenConfig) -> ContentSpec {
    let assets = &config.assets;
    let menu_button = |label: &str, image: &str, action| ButtonSpec {
        label: label.to_string(),
        text_color: Rgb::BROWN,
        image: Some(image.to_string()),
        action,
    };
    ContentSpec {
        title: config.texts.game_title.clone(),
        title_color: Rgb::BLACK,
        font: font_spec(config, assets.menu_title_size),
        lines: Vec::new(),
        buttons: vec![
            menu_button("Play", assets.play_button.as_str(), Action::StartGame),
            menu_button("Instructions", assets.menu_button.as_str(), Action::ShowInstructions),
            menu_button("Quit Game", assets.menu_button.as_str(), Action::Quit),
        ],
        background: Some(assets.menu_background.clone()),
        close_button: None,
        close_action: Action::Quit,
        width: config.window.width,
        height: config.window.height,
    }
}

pub fn instructions(config: &ScreenConfig) -> ContentSpec {
    ContentSpec {
        title: String::new(),
        title_color: Rgb::BLACK,
        font: FontSpec {
            body_size: 14,
            ..font_spec(config, config.assets.title_size)
        },
        lines: config
            .texts
            .instructions
            .iter()
            .map(|text| TextLine::new(text.as_str(), Rgb::BLACK))
            .collect(),
        buttons: Vec::new(),
        background: Some(config.assets.overlay_background.clone()),
        close_button: Some(config.assets.close_button.clone()),
        close_action: Action::CloseInstructions,
        width: 640,
        height: 300,
    }
}

/// Win screen for the level in `result`; achievement lines come from `state`.
/// "Go to Next Level" only appears while a next level can still be started.
pub fn win_screen(
    config: &ScreenConfig,
    state: &GameState,
    result: &SessionResult,
    has_next_level: bool,
) -> ContentSpec {
    let variant = WinVariant::for_level(config, result.completed_level);
    let lines = achievements::decorate(vec![score_line(result.score)], state, &variant.rules);

    let mut buttons = Vec::new();
    if !variant.terminal {
        if has_next_level {
            buttons.push(overlay_button(config, "Go to Next Level", Action::NextLevel));
        }
        buttons.push(overlay_button(config, "Shop", Action::OpenShop));
    }
    buttons.push(overlay_button(config, "Return to Menu", Action::ReturnToMenu));

    ContentSpec {
        title: config.texts.win_title.clone(),
        title_color: Rgb::BLACK,
        font: font_spec(config, config.assets.title_size),
        lines,
        buttons,
        background: Some(config.assets.overlay_background.clone()),
        close_button: None,
        close_action: Action::ReturnToMenu,
        width: 500,
        height: 500,
    }
}

/// End screen. Always shows the negative achievement message.
pub fn end_screen(config: &ScreenConfig, result: &SessionResult) -> ContentSpec {
    ContentSpec {
        title: config.texts.end_title.clone(),
        title_color: Rgb::BLACK,
        font: font_spec(config, config.assets.title_size),
        lines: vec![
            score_line(result.score),
            TextLine::new(config.texts.no_achievement.as_str(), Rgb::GREY),
        ],
        buttons: vec![overlay_button(config, "Return to Menu", Action::ReturnToMenu)],
        background: Some(config.assets.overlay_background.clone()),
        close_button: None,
        close_action: Action::ReturnToMenu,
        width: 500,
        height: 500,
    }
}

/// Shop overlay; `status` is the outcome of the last purchase attempt
pub fn shop(config: &ScreenConfig, state: &GameState, status: Option<&str>) -> ContentSpec {
    let mut lines = vec![
        TextLine::new(format!("Extra Hearts: {}", state.extra_hearts()), Rgb::BLACK),
        TextLine::new(format!("Points: {}", state.score()), Rgb::BLACK),
        TextLine::new(
            format!("Extra Heart costs {} points", config.shop.heart_price),
            Rgb::BLACK,
        ),
    ];
    if let Some(status) = status {
        lines.push(TextLine::new(status, Rgb::GREY));
    }

    ContentSpec {
        title: config.texts.shop_title.clone(),
        title_color: Rgb::BLACK,
        font: font_spec(config, config.assets.title_size),
        lines,
        buttons: vec![
            overlay_button(config, "Buy Extra Heart", Action::BuyHeart),
            overlay_button(config, "Back", Action::CloseShop),
        ],
        background: Some(config.assets.overlay_background.clone()),
        close_button: None,
        close_action: Action::CloseShop,
        width: 500,
        height: 500,
    }
}

/// Blocking popup shown instead of the shop on restricted levels
pub fn shop_notice(config: &ScreenConfig, message: &str) -> ContentSpec {
    ContentSpec {
        title: config.texts.shop_title.clone(),
        title_color: Rgb::BLACK,
        font: font_spec(config, config.assets.title_size),
        lines: vec![TextLine::new(message, Rgb::BLACK)],
        buttons: vec![overlay_button(config, "OK", Action::Acknowledge)],
        background: Some(config.assets.overlay_background.clone()),
        close_button: None,
        close_action: Action::Acknowledge,
        width: 560,
        height: 240,
    }
}
