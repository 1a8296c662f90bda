//! Screen Flow Controller
//!
//! The state machine deciding which overlay is up, threading level results
//! into the results screens and resetting the session when a win screen
//! returns to the menu.
//!
//! ```text
//! Menu --start-game--> InGame --level-won--> WinScreen --next-level--> InGame
//!  |  <--close-- Instructions      \--level-lost--> EndScreen
//!  |--show-instructions--^          WinScreen --open-shop--> Shop | ShopNotice --> WinScreen
//!  ^--------------------- return-to-menu (WinScreen resets GameState, EndScreen does not)
//! ```
//!
//! Everything runs on one thread: [`ScreenFlowController::step`] either plays
//! the current level to its end or presents the current overlay until the
//! player dismisses it, then applies the resulting event.

use super::error::FlowError;
use super::level::{LevelController, LevelLauncher, LevelOutcome, NextLevel};
use crate::config::{ScreenConfig, ShopAccess};
use crate::game_state::{GameState, SessionResult};
use crate::gui::content::{self, Action, ContentSpec, OverlayKind, WinVariant};
use crate::gui::{Frontend, OverlayPresenter, PresentOutcome};
use slog::{Logger, debug, error, info, o, warn};
use std::fmt;
use std::mem;

/// Times an overlay may fail in a row before the flow stops asking for it
pub const OVERLAY_ATTEMPTS: u32 = 3;

/// A won level's result plus the way on to the next level
pub struct WinContext {
    pub result: SessionResult,
    next_level: Option<NextLevel>,
}

impl WinContext {
    pub fn new(result: SessionResult, next_level: Option<NextLevel>) -> Self {
        WinContext { result, next_level }
    }

    pub fn has_next_level(&self) -> bool {
        self.next_level.is_some()
    }
}

impl fmt::Debug for WinContext {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("WinContext")
            .field("result", &self.result)
            .field("has_next_level", &self.has_next_level())
            .finish()
    }
}

pub enum Screen {
    Menu,
    Instructions,
    InGame(Box<dyn LevelController>),
    WinScreen(WinContext),
    EndScreen(SessionResult),
    Shop { win: WinContext, status: Option<String> },
    ShopNotice { win: WinContext, message: String },
    Exited,
}

/// Data-free name of a [`Screen`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenName {
    Menu,
    Instructions,
    InGame,
    WinScreen,
    EndScreen,
    Shop,
    ShopNotice,
    Exited,
}

impl Screen {
    pub fn name(&self) -> ScreenName {
        match self {
            Screen::Menu => ScreenName::Menu,
            Screen::Instructions => ScreenName::Instructions,
            Screen::InGame(_) => ScreenName::InGame,
            Screen::WinScreen(_) => ScreenName::WinScreen,
            Screen::EndScreen(_) => ScreenName::EndScreen,
            Screen::Shop { .. } => ScreenName::Shop,
            Screen::ShopNotice { .. } => ScreenName::ShopNotice,
            Screen::Exited => ScreenName::Exited,
        }
    }
}

/// Anything that can move the flow: an overlay action or a level ending
pub enum FlowEvent {
    Action(Action),
    LevelWon {
        result: SessionResult,
        next_level: Option<NextLevel>,
    },
    LevelLost(SessionResult),
    LevelAbandoned,
}

impl FlowEvent {
    pub fn name(&self) -> &'static str {
        match self {
            FlowEvent::Action(action) => match action {
                Action::StartGame => "start_game",
                Action::ShowInstructions => "show_instructions",
                Action::Quit => "quit",
                Action::CloseInstructions => "close_instructions",
                Action::NextLevel => "next_level",
                Action::OpenShop => "open_shop",
                Action::ReturnToMenu => "return_to_menu",
                Action::BuyHeart => "buy_heart",
                Action::CloseShop => "close_shop",
                Action::Acknowledge => "acknowledge",
            },
            FlowEvent::LevelWon { .. } => "level_won",
            FlowEvent::LevelLost(_) => "level_lost",
            FlowEvent::LevelAbandoned => "level_abandoned",
        }
    }
}

impl From<Action> for FlowEvent {
    fn from(action: Action) -> Self {
        FlowEvent::Action(action)
    }
}

impl From<LevelOutcome> for FlowEvent {
    fn from(outcome: LevelOutcome) -> Self {
        match outcome {
            LevelOutcome::Won { result, next_level } => FlowEvent::LevelWon { result, next_level },
            LevelOutcome::Lost(result) => FlowEvent::LevelLost(result),
            LevelOutcome::Abandoned => FlowEvent::LevelAbandoned,
        }
    }
}

pub struct ScreenFlowController {
    screen: Screen,
    state: GameState,
    config: ScreenConfig,
    presenter: OverlayPresenter,
    launcher: Box<dyn LevelLauncher>,
    overlay_failures: u32,
    log: Logger,
}

impl ScreenFlowController {
    /// Starts at the main menu with a fresh session
    pub fn new(
        config: ScreenConfig,
        presenter: OverlayPresenter,
        launcher: Box<dyn LevelLauncher>,
        parent_log: &Logger,
    ) -> Self {
        ScreenFlowController {
            screen: Screen::Menu,
            state: GameState::new(),
            config,
            presenter,
            launcher,
            overlay_failures: 0,
            log: parent_log.new(o!("system" => "screen_flow")),
        }
    }

    pub fn screen(&self) -> ScreenName {
        self.screen.name()
    }

    pub fn game_state(&self) -> &GameState {
        &self.state
    }

    pub fn game_state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn presenter(&self) -> &OverlayPresenter {
        &self.presenter
    }

    pub fn config(&self) -> &ScreenConfig {
        &self.config
    }

    /// Result shown by the current results screen, if any
    pub fn session_result(&self) -> Option<&SessionResult> {
        match &self.screen {
            Screen::WinScreen(win)
            | Screen::Shop { win, .. }
            | Screen::ShopNotice { win, .. } => Some(&win.result),
            Screen::EndScreen(result) => Some(result),
            _ => None,
        }
    }

    /// Overlay for the current screen, built from the current session
    pub fn current_overlay(&self) -> Option<(OverlayKind, ContentSpec)> {
        let config = &self.config;
        match &self.screen {
            Screen::Menu => Some((OverlayKind::MainMenu, content::main_menu(config))),
            Screen::Instructions => Some((OverlayKind::Instructions, content::instructions(config))),
            Screen::WinScreen(win) => Some((
                OverlayKind::WinScreen,
                content::win_screen(config, &self.state, &win.result, win.has_next_level()),
            )),
            Screen::EndScreen(result) => {
                Some((OverlayKind::EndScreen, content::end_screen(config, result)))
            }
            Screen::Shop { status, .. } => Some((
                OverlayKind::Shop,
                content::shop(config, &self.state, status.as_deref()),
            )),
            Screen::ShopNotice { message, .. } => {
                Some((OverlayKind::ShopNotice, content::shop_notice(config, message)))
            }
            Screen::InGame(_) | Screen::Exited => None,
        }
    }

    /// Applies one event. On error the screen is left as it was.
    pub fn handle(&mut self, event: FlowEvent, frontend: &mut dyn Frontend) -> Result<(), FlowError> {
        let from = self.screen.name();
        let event_name = event.name();
        let screen = mem::replace(&mut self.screen, Screen::Exited);
        let (next, result) = self.transition(screen, event, frontend);
        self.screen = next;

        if result.is_ok() {
            self.overlay_failures = 0;
            debug!(self.log, "Transition";
                "from" => ?from, "event" => event_name, "to" => ?self.screen.name());
        }
        result
    }

    fn transition(
        &mut self,
        screen: Screen,
        event: FlowEvent,
        frontend: &mut dyn Frontend,
    ) -> (Screen, Result<(), FlowError>) {
        match (screen, event) {
            (Screen::Menu, FlowEvent::Action(Action::StartGame)) => {
                match self.launcher.launch_game() {
                    Ok(level) => {
                        info!(self.log, "Starting game"; "level" => %level.level_id());
                        (Screen::InGame(level), Ok(()))
                    }
                    Err(e) => (Screen::Menu, Err(FlowError::Launch(e))),
                }
            }
            (Screen::Menu, FlowEvent::Action(Action::ShowInstructions)) => {
                (Screen::Instructions, Ok(()))
            }
            (Screen::Menu, FlowEvent::Action(Action::Quit)) => (Screen::Exited, Ok(())),
            (Screen::Instructions, FlowEvent::Action(Action::CloseInstructions)) => {
                (Screen::Menu, Ok(()))
            }

            (Screen::InGame(_), FlowEvent::LevelWon { result, next_level }) => {
                (Screen::WinScreen(WinContext::new(result, next_level)), Ok(()))
            }
            (Screen::InGame(_), FlowEvent::LevelLost(result)) => (Screen::EndScreen(result), Ok(())),
            (Screen::InGame(_), FlowEvent::LevelAbandoned) => (Screen::Exited, Ok(())),

            (Screen::WinScreen(mut win), FlowEvent::Action(Action::NextLevel)) => {
                match win.next_level.take() {
                    Some(next_level) => match next_level() {
                        Ok(level) => {
                            info!(self.log, "Next level"; "level" => %level.level_id(),
                                "score" => self.state.score());
                            (Screen::InGame(level), Ok(()))
                        }
                        Err(e) => (Screen::WinScreen(win), Err(FlowError::Launch(e))),
                    },
                    None => (Screen::WinScreen(win), Err(FlowError::NoNextLevel)),
                }
            }
            (Screen::WinScreen(win), FlowEvent::Action(Action::OpenShop)) => {
                let variant = WinVariant::for_level(&self.config, win.result.completed_level);
                if variant.terminal {
                    let error = FlowError::InvalidTransition {
                        from: ScreenName::WinScreen,
                        event: "open_shop",
                    };
                    return (Screen::WinScreen(win), Err(error));
                }
                match variant.shop {
                    ShopAccess::Open => (Screen::Shop { win, status: None }, Ok(())),
                    ShopAccess::Restricted { message } => {
                        (Screen::ShopNotice { win, message }, Ok(()))
                    }
                }
            }
            (Screen::WinScreen(_), FlowEvent::Action(Action::ReturnToMenu)) => {
                self.state.reset_all();
                info!(self.log, "Session reset");
                (self.return_to_menu(frontend), Ok(()))
            }
            (Screen::EndScreen(_), FlowEvent::Action(Action::ReturnToMenu)) => {
                (self.return_to_menu(frontend), Ok(()))
            }

            (Screen::Shop { mut win, .. }, FlowEvent::Action(Action::BuyHeart)) => {
                let price = self.config.shop.heart_price;
                let status = if self.state.spend_score(price) {
                    self.state.add_extra_heart();
                    win.result.score = self.state.score();
                    info!(self.log, "Bought extra heart";
                        "hearts" => self.state.extra_hearts(), "score" => self.state.score());
                    "Bought an extra heart"
                } else {
                    "Not enough points"
                };
                let status = Some(status.to_string());
                (Screen::Shop { win, status }, Ok(()))
            }
            (Screen::Shop { win, .. }, FlowEvent::Action(Action::CloseShop)) => {
                (Screen::WinScreen(win), Ok(()))
            }
            (Screen::ShopNotice { win, .. }, FlowEvent::Action(Action::Acknowledge)) => {
                (Screen::WinScreen(win), Ok(()))
            }

            (screen, event) => {
                let error = FlowError::InvalidTransition {
                    from: screen.name(),
                    event: event.name(),
                };
                (screen, Err(error))
            }
        }
    }

    fn return_to_menu(&mut self, frontend: &mut dyn Frontend) -> Screen {
        frontend.resize_owner(self.config.window.width, self.config.window.height);
        Screen::Menu
    }

    /// Plays the current level or presents the current overlay, then applies
    /// what happened. Returns false once the flow has exited.
    pub fn step(&mut self, frontend: &mut dyn Frontend) -> Result<bool, FlowError> {
        if let Screen::Exited = self.screen {
            return Ok(false);
        }

        let event = if let Screen::InGame(level) = &mut self.screen {
            let outcome = level.play(&mut self.state);
            info!(self.log, "Level finished"; "level" => %level.level_id(), "outcome" => ?outcome);
            FlowEvent::from(outcome)
        } else {
            match self.present_current(frontend)? {
                Some(event) => event,
                None => return Ok(true),
            }
        };

        self.handle(event, frontend)?;
        Ok(!matches!(self.screen, Screen::Exited))
    }

    fn present_current(&mut self, frontend: &mut dyn Frontend) -> Result<Option<FlowEvent>, FlowError> {
        let Some((kind, spec)) = self.current_overlay() else {
            return Ok(None);
        };

        match self.presenter.present(kind, &spec, frontend) {
            PresentOutcome::Chosen(action) => {
                self.overlay_failures = 0;
                Ok(Some(FlowEvent::Action(action)))
            }
            PresentOutcome::Suppressed => {
                warn!(self.log, "Overlay suppressed"; "overlay" => kind.name());
                Ok(None)
            }
            PresentOutcome::Failed(e) => {
                self.overlay_failures += 1;
                if self.overlay_failures < OVERLAY_ATTEMPTS {
                    warn!(self.log, "Overlay failed, retrying";
                        "overlay" => kind.name(), "attempt" => self.overlay_failures, "error" => %e);
                    return Ok(None);
                }
                self.overlay_failures = 0;
                if kind == OverlayKind::MainMenu {
                    return Err(FlowError::MenuUnavailable(e));
                }
                self.give_up_overlay(frontend);
                warn!(self.log, "Gave up on overlay";
                    "overlay" => kind.name(), "error" => %e, "to" => ?self.screen.name());
                Ok(None)
            }
        }
    }

    /// Leaves a screen whose overlay keeps failing. Never touches the session.
    fn give_up_overlay(&mut self, frontend: &mut dyn Frontend) {
        self.screen = match mem::replace(&mut self.screen, Screen::Exited) {
            Screen::Shop { win, .. } | Screen::ShopNotice { win, .. } => Screen::WinScreen(win),
            Screen::Instructions | Screen::WinScreen(_) | Screen::EndScreen(_) => {
                self.return_to_menu(frontend)
            }
            screen => screen,
        };
    }

    /// Runs until the player quits. Only a main menu that keeps failing stops it early.
    pub fn run(&mut self, frontend: &mut dyn Frontend) -> Result<(), FlowError> {
        info!(self.log, "Screen flow started");
        loop {
            match self.step(frontend) {
                Ok(true) => {}
                Ok(false) => break,
                Err(FlowError::MenuUnavailable(e)) => {
                    error!(self.log, "Main menu unavailable, stopping"; "error" => %e);
                    return Err(FlowError::MenuUnavailable(e));
                }
                Err(e) => {
                    error!(self.log, "Transition failed";
                        "screen" => ?self.screen.name(), "error" => %e, "detail" => ?e);
                }
            }
        }
        info!(self.log, "Screen flow stopped"; "score" => self.state.score());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ResourceLoader;
    use crate::config::AchievementRule;
    use crate::flow::level::LaunchError;
    use crate::game_state::{AchievementKey, LevelId};
    use crate::gui::{Dismissal, OverlayError, OverlayView};
    use crate::logging;
    use std::cell::Cell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    #[derive(Debug, Clone)]
    struct Shown {
        kind: OverlayKind,
        lines: Vec<String>,
        buttons: Vec<String>,
    }

    /// Replays scripted dismissals; closes anything past the end of the script
    #[derive(Default)]
    struct ScriptedFrontend {
        script: VecDeque<Result<Dismissal, OverlayError>>,
        shown: Vec<Shown>,
        resizes: Vec<(u32, u32)>,
    }

    impl ScriptedFrontend {
        fn new(script: Vec<Result<Dismissal, OverlayError>>) -> Self {
            ScriptedFrontend {
                script: script.into(),
                ..Default::default()
            }
        }

        fn pressing(buttons: &[usize]) -> Self {
            Self::new(buttons.iter().map(|&i| Ok(Dismissal::Pressed(i))).collect())
        }
    }

    impl Frontend for ScriptedFrontend {
        fn run_modal(&mut self, view: &OverlayView) -> Result<Dismissal, OverlayError> {
            self.shown.push(Shown {
                kind: view.kind,
                lines: view.lines.iter().map(|l| l.text.clone()).collect(),
                buttons: view.buttons.iter().map(|b| b.label.text.clone()).collect(),
            });
            self.script.pop_front().unwrap_or(Ok(Dismissal::Closed))
        }

        fn resize_owner(&mut self, width: u32, height: u32) {
            self.resizes.push((width, height));
        }
    }

    struct ScriptedLevel {
        id: LevelId,
        on_play: Box<dyn FnMut(&mut GameState) -> LevelOutcome>,
    }

    impl LevelController for ScriptedLevel {
        fn level_id(&self) -> LevelId {
            self.id
        }

        fn play(&mut self, state: &mut GameState) -> LevelOutcome {
            (self.on_play)(state)
        }
    }

    fn level(
        id: LevelId,
        on_play: impl FnMut(&mut GameState) -> LevelOutcome + 'static,
    ) -> Box<dyn LevelController> {
        Box::new(ScriptedLevel {
            id,
            on_play: Box::new(on_play),
        })
    }

    fn continue_with(
        next: impl FnOnce() -> Result<Box<dyn LevelController>, LaunchError> + 'static,
    ) -> Option<NextLevel> {
        Some(Box::new(next))
    }

    /// Hands out prepared levels in order, then fails
    struct QueueLauncher {
        levels: VecDeque<Result<Box<dyn LevelController>, LaunchError>>,
    }

    impl LevelLauncher for QueueLauncher {
        fn launch_game(&mut self) -> Result<Box<dyn LevelController>, LaunchError> {
            self.levels
                .pop_front()
                .unwrap_or(Err(LaunchError::MissingLevel(LevelId::ONE)))
        }
    }

    fn controller_with(
        config: ScreenConfig,
        levels: Vec<Result<Box<dyn LevelController>, LaunchError>>,
    ) -> ScreenFlowController {
        let log = logging::discard();
        let loader = ResourceLoader::new("does-not-exist", &log);
        let presenter = OverlayPresenter::new(loader, &log);
        let launcher = Box::new(QueueLauncher {
            levels: levels.into(),
        });
        ScreenFlowController::new(config, presenter, launcher, &log)
    }

    fn controller(levels: Vec<Result<Box<dyn LevelController>, LaunchError>>) -> ScreenFlowController {
        controller_with(ScreenConfig::default(), levels)
    }

    fn winning_level(id: LevelId, points: u32) -> Box<dyn LevelController> {
        level(id, move |state| {
            state.add_score(points);
            LevelOutcome::Won {
                result: SessionResult::from_state(id, state),
                next_level: continue_with(move || {
                    Ok(level(id.next(), |_| LevelOutcome::Abandoned))
                }),
            }
        })
    }

    fn losing_level(id: LevelId, points: u32) -> Box<dyn LevelController> {
        level(id, move |state| {
            state.add_score(points);
            LevelOutcome::Lost(SessionResult::from_state(id, state))
        })
    }

    /// Drives the flow from the menu onto a results screen
    fn reach_results(flow: &mut ScreenFlowController) {
        let mut fe = ScriptedFrontend::pressing(&[0]);
        assert!(flow.step(&mut fe).unwrap());
        assert_eq!(flow.screen(), ScreenName::InGame);
        assert!(flow.step(&mut fe).unwrap());
    }

    #[test]
    fn test_starts_at_menu() {
        let flow = controller(Vec::new());
        assert_eq!(flow.screen(), ScreenName::Menu);
        assert_eq!(flow.game_state(), &GameState::new());
        let (kind, _) = flow.current_overlay().expect("menu overlay");
        assert_eq!(kind, OverlayKind::MainMenu);
    }

    #[test]
    fn test_win_then_next_level_keeps_session() {
        let mut config = ScreenConfig::default();
        config.achievements = vec![AchievementRule::new("A1", "Achievement: A1")];

        let seen_by_next = Rc::new(Cell::new(None));
        let seen = seen_by_next.clone();
        let first = level(LevelId::ONE, move |state| {
            state.add_score(150);
            state.unlock("A1");
            let seen = seen.clone();
            LevelOutcome::Won {
                result: SessionResult::from_state(LevelId::ONE, state),
                next_level: continue_with(move || {
                    Ok(level(LevelId::TWO, move |state| {
                        seen.set(Some(state.score()));
                        LevelOutcome::Abandoned
                    }))
                }),
            }
        });
        let mut flow = controller_with(config, vec![Ok(first)]);
        // menu: Play; win screen: Go to Next Level
        let mut fe = ScriptedFrontend::pressing(&[0, 0]);

        flow.step(&mut fe).unwrap();
        assert_eq!(flow.screen(), ScreenName::InGame);
        flow.step(&mut fe).unwrap();
        assert_eq!(flow.screen(), ScreenName::WinScreen);
        assert_eq!(flow.session_result().map(|r| r.score), Some(150));

        flow.step(&mut fe).unwrap();
        let win = &fe.shown[1];
        assert_eq!(win.kind, OverlayKind::WinScreen);
        assert_eq!(win.lines, vec!["Your Score: 150", "Achievement: A1"]);
        assert_eq!(flow.screen(), ScreenName::InGame);
        assert_eq!(flow.game_state().score(), 150);

        assert!(!flow.step(&mut fe).unwrap());
        assert_eq!(seen_by_next.get(), Some(150));
    }

    #[test]
    fn test_instructions_are_reentrant() {
        let mut flow = controller(Vec::new());
        // menu: Instructions; instructions: closed; menu: Instructions; closed again
        let mut fe = ScriptedFrontend::new(vec![
            Ok(Dismissal::Pressed(1)),
            Ok(Dismissal::Closed),
            Ok(Dismissal::Pressed(1)),
            Ok(Dismissal::Closed),
        ]);

        for expected in [
            ScreenName::Instructions,
            ScreenName::Menu,
            ScreenName::Instructions,
            ScreenName::Menu,
        ] {
            assert!(flow.step(&mut fe).unwrap());
            assert_eq!(flow.screen(), expected);
            assert!(!flow.presenter().guard().any_visible());
        }
        let kinds: Vec<_> = fe.shown.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                OverlayKind::MainMenu,
                OverlayKind::Instructions,
                OverlayKind::MainMenu,
                OverlayKind::Instructions,
            ]
        );
    }

    #[test]
    fn test_win_return_to_menu_resets_session() {
        let mut flow = controller(vec![Ok(winning_level(LevelId::ONE, 150))]);
        reach_results(&mut flow);
        flow.game_state_mut().unlock("A1");

        let mut fe = ScriptedFrontend::default();
        flow.handle(Action::ReturnToMenu.into(), &mut fe).unwrap();

        assert_eq!(flow.screen(), ScreenName::Menu);
        assert_eq!(flow.game_state().score(), 0);
        assert!(flow.game_state().achievements().is_empty());
        assert_eq!(fe.resizes, vec![(1300, 730)]);
    }

    #[test]
    fn test_end_return_to_menu_keeps_session() {
        let mut flow = controller(vec![Ok(losing_level(LevelId::ONE, 70))]);
        reach_results(&mut flow);
        assert_eq!(flow.screen(), ScreenName::EndScreen);
        flow.game_state_mut().unlock("A1");

        let mut fe = ScriptedFrontend::default();
        flow.handle(Action::ReturnToMenu.into(), &mut fe).unwrap();

        assert_eq!(flow.screen(), ScreenName::Menu);
        assert_eq!(flow.game_state().score(), 70);
        assert_eq!(flow.game_state().achievements().len(), 1);
        assert_eq!(fe.resizes, vec![(1300, 730)]);
    }

    #[test]
    fn test_end_screen_content() {
        let mut flow = controller(vec![Ok(losing_level(LevelId::ONE, 70))]);
        reach_results(&mut flow);
        let mut fe = ScriptedFrontend::pressing(&[0]);
        flow.step(&mut fe).unwrap();

        assert_eq!(fe.shown[0].kind, OverlayKind::EndScreen);
        assert_eq!(fe.shown[0].lines, vec!["Your Score: 70", "No achievement earned"]);
        assert_eq!(flow.screen(), ScreenName::Menu);
    }

    #[test]
    fn test_launch_failure_keeps_menu() {
        let failing = Err(LaunchError::Construction("missing sprites".into()));
        let mut flow = controller(vec![failing]);
        let mut fe = ScriptedFrontend::pressing(&[0]);

        let err = flow.step(&mut fe).unwrap_err();
        assert_eq!(
            err,
            FlowError::Launch(LaunchError::Construction("missing sprites".into()))
        );
        assert_eq!(flow.screen(), ScreenName::Menu);
        assert!(!flow.presenter().guard().any_visible());
    }

    #[test]
    fn test_run_survives_launch_failure_and_quits() {
        let failing = Err(LaunchError::Construction("boom".into()));
        let mut flow = controller(vec![failing]);
        // Play (fails), then Quit Game
        let mut fe = ScriptedFrontend::pressing(&[0, 2]);

        flow.run(&mut fe).unwrap();
        assert_eq!(flow.screen(), ScreenName::Exited);
        assert_eq!(fe.shown.len(), 2);
    }

    #[test]
    fn test_full_run_through_win_and_back() {
        let mut flow = controller(vec![Ok(winning_level(LevelId::ONE, 150))]);
        // Play, win screen: Return to Menu, then the menu is closed
        let mut fe = ScriptedFrontend::pressing(&[0, 2]);

        flow.run(&mut fe).unwrap();
        let kinds: Vec<_> = fe.shown.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![OverlayKind::MainMenu, OverlayKind::WinScreen, OverlayKind::MainMenu]
        );
        assert_eq!(flow.game_state().score(), 0);
        assert_eq!(flow.screen(), ScreenName::Exited);
    }

    #[test]
    fn test_level_two_shop_shows_notice() {
        let mut flow = controller(vec![Ok(winning_level(LevelId::TWO, 10))]);
        reach_results(&mut flow);
        // win screen: Shop; notice: OK
        let mut fe = ScriptedFrontend::pressing(&[1, 0]);

        flow.step(&mut fe).unwrap();
        assert_eq!(flow.screen(), ScreenName::ShopNotice);
        flow.step(&mut fe).unwrap();
        assert_eq!(flow.screen(), ScreenName::WinScreen);

        assert_eq!(fe.shown[1].kind, OverlayKind::ShopNotice);
        assert_eq!(
            fe.shown[1].lines,
            vec!["Sorry, you can't purchase extra hearts for this level"]
        );
        assert_eq!(flow.game_state().extra_hearts(), 0);
    }

    #[test]
    fn test_level_one_shop_purchase() {
        let mut flow = controller(vec![Ok(winning_level(LevelId::ONE, 60))]);
        reach_results(&mut flow);
        let mut fe = ScriptedFrontend::default();

        flow.handle(Action::OpenShop.into(), &mut fe).unwrap();
        assert_eq!(flow.screen(), ScreenName::Shop);

        flow.handle(Action::BuyHeart.into(), &mut fe).unwrap();
        assert_eq!(flow.game_state().extra_hearts(), 1);
        assert_eq!(flow.game_state().score(), 10);

        flow.handle(Action::BuyHeart.into(), &mut fe).unwrap();
        assert_eq!(flow.game_state().extra_hearts(), 1);
        let (_, spec) = flow.current_overlay().unwrap();
        assert_eq!(spec.lines.last().unwrap().text, "Not enough points");

        flow.handle(Action::CloseShop.into(), &mut fe).unwrap();
        assert_eq!(flow.screen(), ScreenName::WinScreen);
        assert_eq!(flow.session_result().map(|r| r.score), Some(10));
        let (_, spec) = flow.current_overlay().unwrap();
        assert_eq!(spec.line_texts()[0], "Your Score: 10");
    }

    #[test]
    fn test_terminal_level_has_no_next_level_or_shop() {
        let last = level(LevelId::THREE, |state| {
            state.unlock("Achievement: Bomb Dodger in Level Three");
            LevelOutcome::Won {
                result: SessionResult::from_state(LevelId::THREE, state),
                next_level: None,
            }
        });
        let mut flow = controller(vec![Ok(last)]);
        reach_results(&mut flow);

        let (_, spec) = flow.current_overlay().unwrap();
        assert_eq!(spec.button_labels(), vec!["Return to Menu"]);
        assert_eq!(spec.line_texts(), vec!["Your Score: 0", "Achievement: Bomb Dodger"]);

        let mut fe = ScriptedFrontend::default();
        assert_eq!(
            flow.handle(Action::NextLevel.into(), &mut fe),
            Err(FlowError::NoNextLevel)
        );
        assert!(matches!(
            flow.handle(Action::OpenShop.into(), &mut fe),
            Err(FlowError::InvalidTransition { .. })
        ));
        assert_eq!(flow.screen(), ScreenName::WinScreen);
    }

    #[test]
    fn test_next_level_continuation_runs_once() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let first = level(LevelId::ONE, move |state| {
            let counter = counter.clone();
            LevelOutcome::Won {
                result: SessionResult::from_state(LevelId::ONE, state),
                next_level: continue_with(move || {
                    counter.set(counter.get() + 1);
                    Err(LaunchError::MissingLevel(LevelId::TWO))
                }),
            }
        });
        let mut flow = controller(vec![Ok(first)]);
        reach_results(&mut flow);
        let mut fe = ScriptedFrontend::default();

        assert!(matches!(
            flow.handle(Action::NextLevel.into(), &mut fe),
            Err(FlowError::Launch(_))
        ));
        assert_eq!(
            flow.handle(Action::NextLevel.into(), &mut fe),
            Err(FlowError::NoNextLevel)
        );
        assert_eq!(calls.get(), 1);
        assert_eq!(flow.screen(), ScreenName::WinScreen);
    }

    #[test]
    fn test_invalid_events_leave_screen_unchanged() {
        let mut flow = controller(Vec::new());
        let mut fe = ScriptedFrontend::default();

        for action in [Action::NextLevel, Action::ReturnToMenu, Action::BuyHeart, Action::CloseShop] {
            let err = flow.handle(action.into(), &mut fe).unwrap_err();
            assert!(matches!(
                err,
                FlowError::InvalidTransition { from: ScreenName::Menu, .. }
            ));
            assert_eq!(flow.screen(), ScreenName::Menu);
        }
        let lost = FlowEvent::LevelLost(SessionResult::new(LevelId::ONE, 1));
        assert!(flow.handle(lost, &mut fe).is_err());
        assert_eq!(flow.screen(), ScreenName::Menu);
        assert!(fe.resizes.is_empty());
    }

    fn render_errors(count: u32) -> Vec<Result<Dismissal, OverlayError>> {
        (0..count)
            .map(|_| Err(OverlayError::Render("gpu lost".into())))
            .collect()
    }

    #[test]
    fn test_failed_win_screen_keeps_session() {
        let mut config = ScreenConfig::default();
        config.achievements = vec![AchievementRule::new("A1", "Achievement: A1")];
        let mut flow = controller_with(config, vec![Ok(winning_level(LevelId::ONE, 150))]);
        reach_results(&mut flow);
        flow.game_state_mut().unlock("A1");
        flow.game_state_mut().add_extra_heart();
        let mut script = render_errors(1);
        script.push(Ok(Dismissal::Pressed(1)));
        let mut fe = ScriptedFrontend::new(script);

        assert!(flow.step(&mut fe).unwrap());
        assert_eq!(flow.screen(), ScreenName::WinScreen);
        assert_eq!(flow.game_state().score(), 150);
        assert!(flow.game_state().has_achievement(&AchievementKey::new("A1")));
        assert!(!flow.presenter().guard().any_visible());

        // the retry shows the same screen with the continuation intact
        flow.step(&mut fe).unwrap();
        assert_eq!(fe.shown[1].kind, OverlayKind::WinScreen);
        assert_eq!(fe.shown[1].buttons[0], "Go to Next Level");
        assert_eq!(flow.screen(), ScreenName::Shop);
        assert_eq!(flow.game_state().score(), 150);
        assert_eq!(flow.game_state().extra_hearts(), 1);
    }

    #[test]
    fn test_win_screen_that_keeps_failing_returns_to_menu_without_reset() {
        let mut flow = controller(vec![Ok(winning_level(LevelId::ONE, 150))]);
        reach_results(&mut flow);
        flow.game_state_mut().unlock("A1");
        let mut fe = ScriptedFrontend::new(render_errors(OVERLAY_ATTEMPTS));

        for _ in 1..OVERLAY_ATTEMPTS {
            assert!(flow.step(&mut fe).unwrap());
            assert_eq!(flow.screen(), ScreenName::WinScreen);
        }
        assert!(flow.step(&mut fe).unwrap());
        assert_eq!(flow.screen(), ScreenName::Menu);
        assert_eq!(flow.game_state().score(), 150);
        assert_eq!(flow.game_state().achievements().len(), 1);
        assert_eq!(fe.resizes, vec![(1300, 730)]);
    }

    #[test]
    fn test_failing_shop_falls_back_to_win_screen() {
        let mut flow = controller(vec![Ok(winning_level(LevelId::ONE, 60))]);
        reach_results(&mut flow);
        let mut fe = ScriptedFrontend::default();
        flow.handle(Action::OpenShop.into(), &mut fe).unwrap();

        let mut fe = ScriptedFrontend::new(render_errors(OVERLAY_ATTEMPTS));
        for _ in 0..OVERLAY_ATTEMPTS {
            flow.step(&mut fe).unwrap();
        }
        assert_eq!(flow.screen(), ScreenName::WinScreen);
        assert_eq!(flow.game_state().score(), 60);
        assert_eq!(flow.game_state().extra_hearts(), 0);
    }

    #[test]
    fn test_failed_results_overlay_is_retried() {
        let mut flow = controller(vec![Ok(losing_level(LevelId::ONE, 5))]);
        reach_results(&mut flow);
        let mut fe = ScriptedFrontend::new(vec![
            Err(OverlayError::Panicked("bad glyph".into())),
            Ok(Dismissal::Pressed(0)),
        ]);

        assert!(flow.step(&mut fe).unwrap());
        assert_eq!(flow.screen(), ScreenName::EndScreen);
        assert!(flow.step(&mut fe).unwrap());
        assert_eq!(flow.screen(), ScreenName::Menu);
        assert!(!flow.presenter().guard().any_visible());
        assert_eq!(flow.game_state().score(), 5);
    }

    #[test]
    fn test_menu_recovers_after_a_failure() {
        let mut flow = controller(Vec::new());
        let mut script = render_errors(OVERLAY_ATTEMPTS - 1);
        script.push(Ok(Dismissal::Pressed(2)));
        let mut fe = ScriptedFrontend::new(script);

        flow.run(&mut fe).unwrap();
        assert_eq!(flow.screen(), ScreenName::Exited);
        assert_eq!(fe.shown.len(), OVERLAY_ATTEMPTS as usize);
    }

    #[test]
    fn test_menu_that_keeps_failing_stops_run() {
        let mut flow = controller(Vec::new());
        let mut fe = ScriptedFrontend::new(render_errors(OVERLAY_ATTEMPTS));

        let err = flow.run(&mut fe).unwrap_err();
        assert!(matches!(err, FlowError::MenuUnavailable(_)));
        assert_eq!(fe.shown.len(), OVERLAY_ATTEMPTS as usize);
        assert_eq!(flow.screen(), ScreenName::Menu);
        assert!(!flow.presenter().guard().any_visible());
    }

    #[test]
    fn test_spent_continuation_hides_next_level_button() {
        let first = level(LevelId::ONE, |state| LevelOutcome::Won {
            result: SessionResult::from_state(LevelId::ONE, state),
            next_level: continue_with(|| Err(LaunchError::MissingLevel(LevelId::TWO))),
        });
        let mut flow = controller(vec![Ok(first)]);
        reach_results(&mut flow);

        let (_, spec) = flow.current_overlay().unwrap();
        assert_eq!(spec.button_labels(), vec!["Go to Next Level", "Shop", "Return to Menu"]);

        let mut fe = ScriptedFrontend::default();
        assert!(flow.handle(Action::NextLevel.into(), &mut fe).is_err());
        let (_, spec) = flow.current_overlay().unwrap();
        assert_eq!(spec.button_labels(), vec!["Shop", "Return to Menu"]);
    }

    #[test]
    fn test_abandoned_level_exits() {
        let mut flow = controller(vec![Ok(level(LevelId::ONE, |_| LevelOutcome::Abandoned))]);
        let mut fe = ScriptedFrontend::pressing(&[0]);

        assert!(flow.step(&mut fe).unwrap());
        assert!(!flow.step(&mut fe).unwrap());
        assert_eq!(flow.screen(), ScreenName::Exited);
        assert!(!flow.step(&mut fe).unwrap());
    }
}
