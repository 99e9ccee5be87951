use crate::config::{Settings, MANUAL_SPEED_STEP, PANEL_HEIGHT};
use crate::engine::{Direction, GameEngine};
use crate::store::ScoreStore;
use ggez::graphics::Rect;
use ggez::input::keyboard::KeyCode;
use ggez::mint::Point2;
use rand::Rng;

const BUTTON_MARGIN: f32 = 8.0;
const HUD_ROW_HEIGHT: f32 = 32.0;

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Command {
    Turn(Direction),
    TogglePause,
    Faster,
    Slower,
    Restart,
}

pub fn key_command(keycode: KeyCode) -> Option<Command> {
    match keycode {
        KeyCode::Up | KeyCode::W => Some(Command::Turn(Direction::Up)),
        KeyCode::Down | KeyCode::S => Some(Command::Turn(Direction::Down)),
        KeyCode::Left | KeyCode::A => Some(Command::Turn(Direction::Left)),
        KeyCode::Right | KeyCode::D => Some(Command::Turn(Direction::Right)),
        KeyCode::Space => Some(Command::TogglePause),
        KeyCode::R => Some(Command::Restart),
        _ => None,
    }
}

// '+' and '-' come in as text so every keyboard layout reaches them.
pub fn char_command(character: char) -> Option<Command> {
    match character {
        '+' => Some(Command::Faster),
        '-' => Some(Command::Slower),
        _ => None,
    }
}

pub fn apply<R: Rng, S: ScoreStore>(engine: &mut GameEngine<R, S>, command: Command) {
    match command {
        Command::Turn(direction) => engine.set_direction(direction),
        Command::TogglePause => engine.toggle_pause(),
        Command::Faster => engine.adjust_speed(MANUAL_SPEED_STEP),
        Command::Slower => engine.adjust_speed(-MANUAL_SPEED_STEP),
        Command::Restart => engine.reset(),
    }
}

pub struct TouchButton {
    pub rect: Rect,
    pub label: &'static str,
    pub command: Command,
}

/// On-screen tap targets laid out in a row under the board.
pub struct TouchPanel {
    buttons: Vec<TouchButton>,
}

impl TouchPanel {
    pub fn new(settings: &Settings) -> Self {
        let layout = [
            ("LEFT", Command::Turn(Direction::Left)),
            ("UP", Command::Turn(Direction::Up)),
            ("PAUSE", Command::TogglePause),
            ("DOWN", Command::Turn(Direction::Down)),
            ("RIGHT", Command::Turn(Direction::Right)),
        ];
        let count = layout.len() as f32;
        let width = (settings.board_width() - BUTTON_MARGIN * (count + 1.0)) / count;
        let height = PANEL_HEIGHT - HUD_ROW_HEIGHT - BUTTON_MARGIN;
        let top = settings.board_height() + HUD_ROW_HEIGHT;

        let buttons = layout
            .iter()
            .enumerate()
            .map(|(i, &(label, command))| TouchButton {
                rect: Rect::new(
                    BUTTON_MARGIN + i as f32 * (width + BUTTON_MARGIN),
                    top,
                    width,
                    height,
                ),
                label,
                command,
            })
            .collect();
        TouchPanel { buttons }
    }

    pub fn buttons(&self) -> &[TouchButton] {
        &self.buttons
    }

    pub fn hit(&self, x: f32, y: f32) -> Option<Command> {
        self.buttons
            .iter()
            .find(|button| button.rect.contains(Point2 { x, y }))
            .map(|button| button.command)
    }
}
