use ggez::event;
use log::info;

mod app;
mod audio;
mod canvas;
mod config;
mod engine;
mod error;
mod input;
mod render;
mod store;
mod timer;

use app::App;
use config::Settings;

fn main() -> ggez::GameResult {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::load();
    let (width, height) = settings.window_size();
    info!(
        "Starting {}x{} board ({}x{} px window)",
        settings.cols, settings.rows, width, height
    );

    let window_setup = ggez::conf::WindowSetup::default()
        .title("Snake")
        .vsync(true);
    let window_mode = ggez::conf::WindowMode::default()
        .dimensions(width, height)
        .resizable(false);

    let (mut ctx, event_loop) = ggez::ContextBuilder::new("grid_snake", "grid_snake")
        .add_resource_path(settings.resource_dir.clone())
        .window_setup(window_setup)
        .window_mode(window_mode)
        .build()?;

    let app = App::new(&mut ctx, settings)?;
    event::run(ctx, event_loop, app)
}
