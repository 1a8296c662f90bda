use sky_battle::assets::ResourceLoader;
use sky_battle::config::ScreenConfig;
use sky_battle::flow::ScreenFlowController;
use sky_battle::gui::OverlayPresenter;
use sky_battle::logging;
use sky_battle::sdl::{DemoLauncher, DemoPlan, Display, SdlFrontend};
use slog::{error, info};

fn main() -> Result<(), String> {
    let log = logging::root_logger(logging::level_from_env());
    info!(log, "Starting Sky Battle");

    let config = ScreenConfig::load_or_default(&log);

    let sdl_context = sdl2::init()?;
    let display = Display::open(&sdl_context, &config.window)
        .map_err(|e| {
            error!(log, "Failed to open window"; "error" => %e);
            e
        })?
        .shared();

    let loader = ResourceLoader::new(config.assets.root.clone(), &log);
    let presenter = OverlayPresenter::new(loader, &log);
    let launcher = DemoLauncher::new(display.clone(), DemoPlan::from_config(&config), &log);
    let mut frontend = SdlFrontend::new(display, &log);

    let mut flow = ScreenFlowController::new(config, presenter, Box::new(launcher), &log);
    flow.run(&mut frontend).map_err(|e| e.to_string())?;

    info!(log, "Goodbye"; "final_score" => flow.game_state().score());
    Ok(())
}
