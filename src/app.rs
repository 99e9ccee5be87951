use crate::audio::{Sfx, Sounds};
use crate::canvas;
use crate::config::Settings;
use crate::engine::GameEngine;
use crate::input::{self, Command, TouchPanel};
use crate::render;
use crate::store::JsonFileStore;
use ggez::event::{EventHandler, MouseButton};
use ggez::input::keyboard::KeyInput;
use ggez::{Context, GameResult};
use rand::rngs::ThreadRng;

pub struct App {
    engine: GameEngine<ThreadRng, JsonFileStore>,
    touch: TouchPanel,
    sounds: Sounds,
}

impl App {
    pub fn new(ctx: &mut Context, settings: Settings) -> GameResult<Self> {
        let store = JsonFileStore::open(settings.scores_path.clone());
        let touch = TouchPanel::new(&settings);
        Ok(App {
            engine: GameEngine::new(settings, rand::thread_rng(), store),
            touch,
            sounds: Sounds::load(ctx),
        })
    }

    fn dispatch(&mut self, command: Command) {
        input::apply(&mut self.engine, command);
    }
}

impl EventHandler for App {
    fn update(&mut self, ctx: &mut Context) -> GameResult {
        let dt = ctx.time.delta();
        if let Some(sfx) = self.engine.update(dt).and_then(Sfx::for_outcome) {
            self.sounds.play(ctx, sfx);
        }
        Ok(())
    }

    fn draw(&mut self, ctx: &mut Context) -> GameResult {
        let mut commands = self.engine.render();
        commands.extend(render::panel(
            self.engine.state(),
            self.engine.settings(),
            &self.touch,
        ));
        canvas::paint(ctx, &commands)
    }

    fn key_down_event(&mut self, _ctx: &mut Context, key: KeyInput, _repeat: bool) -> GameResult {
        if let Some(command) = key.keycode.and_then(input::key_command) {
            self.dispatch(command);
        }
        Ok(())
    }

    fn text_input_event(&mut self, _ctx: &mut Context, character: char) -> GameResult {
        if let Some(command) = input::char_command(character) {
            self.dispatch(command);
        }
        Ok(())
    }

    // ggez forwards touch starts here as left clicks.
    fn mouse_button_down_event(
        &mut self,
        _ctx: &mut Context,
        button: MouseButton,
        x: f32,
        y: f32,
    ) -> GameResult {
        if button == MouseButton::Left {
            if let Some(command) = self.touch.hit(x, y) {
                self.dispatch(command);
            }
        }
        Ok(())
    }
}
