//! Demo levels
//!
//! Keyboard-driven stand-ins for real gameplay, so the screen flow can be
//! exercised end to end from the binary:
//!
//! | Key    | Effect                                   |
//! |--------|------------------------------------------|
//! | Space  | +10 score                                |
//! | A      | unlock this level's achievements         |
//! | W      | win the level                            |
//! | L / Esc| lose the level                           |
//!
//! Closing the window abandons the level.

use super::textures;
use super::{Display, SharedDisplay};
use crate::assets::Font;
use crate::config::{Rgb, ScreenConfig};
use crate::flow::{LaunchError, LevelController, LevelLauncher, LevelOutcome, NextLevel};
use crate::game_state::{AchievementKey, GameState, LevelId, SessionResult};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::Color;
use sdl2::rect::Rect;
use slog::{Logger, debug, info, o, warn};
use std::rc::Rc;
use std::thread;
use std::time::Duration;

const POINTS_PER_PRESS: u32 = 10;
const FRAME_DELAY: Duration = Duration::from_millis(16);
const SKY_COLOR: Color = Color::RGB(110, 170, 230);

/// Which levels exist and what each one can unlock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoPlan {
    levels: Vec<DemoLevelPlan>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct DemoLevelPlan {
    id: LevelId,
    achievements: Vec<AchievementKey>,
}

impl DemoPlan {
    /// Levels run from one up to the first terminal level (three if none is
    /// marked). Level one can earn the base achievements; every level can
    /// earn its own bonus achievements.
    pub fn from_config(config: &ScreenConfig) -> Self {
        let last = config
            .levels
            .iter()
            .filter(|l| l.terminal)
            .map(|l| l.level)
            .min()
            .unwrap_or(LevelId::THREE);

        let levels = (LevelId::ONE.0..=last.0.max(1))
            .map(LevelId)
            .map(|id| {
                let mut achievements = Vec::new();
                if id == LevelId::ONE {
                    achievements.extend(config.achievements.iter().map(|r| r.key.clone()));
                }
                if let Some(entry) = config.level(id) {
                    achievements.extend(entry.bonus_achievements.iter().map(|r| r.key.clone()));
                }
                DemoLevelPlan { id, achievements }
            })
            .collect();

        DemoPlan { levels }
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    fn get(&self, id: LevelId) -> Option<&DemoLevelPlan> {
        self.levels.iter().find(|l| l.id == id)
    }

    pub fn achievements_for(&self, id: LevelId) -> &[AchievementKey] {
        self.get(id).map_or(&[], |l| l.achievements.as_slice())
    }

    pub fn is_last(&self, id: LevelId) -> bool {
        self.levels.last().is_none_or(|l| l.id == id)
    }
}

/// Starts every new game at level one
pub struct DemoLauncher {
    display: SharedDisplay,
    plan: Rc<DemoPlan>,
    log: Logger,
}

impl DemoLauncher {
    pub fn new(display: SharedDisplay, plan: DemoPlan, parent_log: &Logger) -> Self {
        DemoLauncher {
            display,
            plan: Rc::new(plan),
            log: parent_log.new(o!("system" => "demo_levels")),
        }
    }
}

impl LevelLauncher for DemoLauncher {
    fn launch_game(&mut self) -> Result<Box<dyn LevelController>, LaunchError> {
        DemoLevel::boxed(LevelId::ONE, self.display.clone(), self.plan.clone(), self.log.clone())
    }
}

struct DemoLevel {
    id: LevelId,
    display: SharedDisplay,
    plan: Rc<DemoPlan>,
    font: Font,
    log: Logger,
}

impl DemoLevel {
    fn boxed(
        id: LevelId,
        display: SharedDisplay,
        plan: Rc<DemoPlan>,
        log: Logger,
    ) -> Result<Box<dyn LevelController>, LaunchError> {
        if plan.get(id).is_none() {
            return Err(LaunchError::MissingLevel(id));
        }
        Ok(Box::new(DemoLevel {
            id,
            display,
            plan,
            font: Font::system_default(21),
            log,
        }))
    }

    fn next_level(&self) -> Option<NextLevel> {
        if self.plan.is_last(self.id) {
            return None;
        }
        let next = self.id.next();
        let display = self.display.clone();
        let plan = self.plan.clone();
        let log = self.log.clone();
        Some(Box::new(move || DemoLevel::boxed(next, display, plan, log)))
    }

    fn draw(&self, display: &mut Display, state: &GameState) -> Result<(), String> {
        let Display {
            canvas,
            texture_creator,
            ..
        } = display;
        canvas.set_draw_color(SKY_COLOR);
        canvas.clear();

        let mut y = 60;
        for line in &hud_lines(self.id, state) {
            let bitmap = self.font.rasterize(line);
            let text = textures::text_texture(texture_creator, &bitmap, Rgb::BLACK)?;
            canvas.copy(&text.texture, None, Rect::new(60, y, text.width, text.height))?;
            y += text.height as i32 + 24;
        }
        canvas.present();
        Ok(())
    }
}

fn hud_lines(id: LevelId, state: &GameState) -> Vec<String> {
    vec![
        id.to_string(),
        format!("Score: {}", state.score()),
        format!("Achievements: {}", state.achievements().len()),
        format!("Levels cleared: {}", state.levels_cleared()),
        "Space: score   A: achievement".to_string(),
        "W: win   L: lose".to_string(),
    ]
}

impl LevelController for DemoLevel {
    fn level_id(&self) -> LevelId {
        self.id
    }

    fn play(&mut self, state: &mut GameState) -> LevelOutcome {
        info!(self.log, "Level started"; "level" => %self.id);
        let display = self.display.clone();
        let mut display = display.borrow_mut();

        loop {
            let events: Vec<Event> = display.event_pump.poll_iter().collect();
            for event in events {
                match event {
                    Event::Quit { .. } => {
                        display.quit_requested = true;
                        return LevelOutcome::Abandoned;
                    }
                    Event::KeyDown {
                        keycode: Some(Keycode::Space),
                        ..
                    } => state.add_score(POINTS_PER_PRESS),
                    Event::KeyDown {
                        keycode: Some(Keycode::A),
                        ..
                    } => {
                        for key in self.plan.achievements_for(self.id) {
                            if state.unlock(key.clone()) {
                                debug!(self.log, "Achievement unlocked"; "key" => %key);
                            }
                        }
                    }
                    Event::KeyDown {
                        keycode: Some(Keycode::W),
                        ..
                    } => {
                        state.record_level_cleared();
                        return LevelOutcome::Won {
                            result: SessionResult::from_state(self.id, state),
                            next_level: self.next_level(),
                        };
                    }
                    Event::KeyDown {
                        keycode: Some(Keycode::L | Keycode::Escape),
                        ..
                    } => return LevelOutcome::Lost(SessionResult::from_state(self.id, state)),
                    _ => {}
                }
            }

            if let Err(e) = self.draw(&mut display, state) {
                warn!(self.log, "Failed to draw level"; "error" => %e);
            }
            thread::sleep(FRAME_DELAY);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AchievementRule, LevelScreenConfig, ShopAccess};

    #[test]
    fn test_default_plan_has_three_levels() {
        let plan = DemoPlan::from_config(&ScreenConfig::default());
        assert_eq!(plan.level_count(), 3);
        assert!(plan.is_last(LevelId::THREE));
        assert!(!plan.is_last(LevelId::ONE));
    }

    #[test]
    fn test_plan_achievements_per_level() {
        let plan = DemoPlan::from_config(&ScreenConfig::default());
        assert_eq!(
            plan.achievements_for(LevelId::ONE),
            &[AchievementKey::new("All Enemies Defeated in Level One")]
        );
        assert!(plan.achievements_for(LevelId::TWO).is_empty());
        assert_eq!(
            plan.achievements_for(LevelId::THREE),
            &[AchievementKey::new("Achievement: Bomb Dodger in Level Three")]
        );
        assert!(plan.achievements_for(LevelId(7)).is_empty());
    }

    #[test]
    fn test_hud_tracks_session() {
        let mut state = GameState::new();
        state.add_score(30);
        state.unlock("A1");
        state.record_level_cleared();

        let lines = hud_lines(LevelId::TWO, &state);
        assert_eq!(
            &lines[..4],
            &["level 2", "Score: 30", "Achievements: 1", "Levels cleared: 1"]
        );
    }

    #[test]
    fn test_plan_stops_at_first_terminal_level() {
        let mut config = ScreenConfig::default();
        config.levels.push(LevelScreenConfig {
            level: LevelId::TWO,
            shop: ShopAccess::Open,
            terminal: true,
            bonus_achievements: vec![AchievementRule::new("B", "Bonus")],
        });
        let plan = DemoPlan::from_config(&config);
        assert_eq!(plan.level_count(), 2);
        assert!(plan.is_last(LevelId::TWO));
    }
}
