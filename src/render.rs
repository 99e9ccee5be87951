//! Turns game state into a flat list of draw commands.
//!
//! Nothing here touches the graphics context, so frames can be inspected in
//! tests and replayed by any backend. Cell `(x, y)` maps to pixel
//! `(x * cell_size, y * cell_size)`.

use crate::config::{
    Settings, BACKGROUND_COLOR, BUTTON_COLOR, BUTTON_STROKE, FOOD_FILL, FOOD_STROKE,
    GAME_OVER_SHADE, GRID_LINE_COLOR, PANEL_COLOR, PANEL_HEIGHT, PAUSE_SHADE, PAUSE_TEXT_COLOR,
    SNAKE_RGB, SNAKE_STROKE, SUBTITLE_COLOR, TITLE_COLOR,
};
use crate::engine::{Cell, GameState};
use crate::input::TouchPanel;
use ggez::graphics::{Color, Rect};
use ggez::mint::Point2;

const SEGMENT_FADE: f32 = 0.03;
const MIN_SEGMENT_ALPHA: f32 = 0.25;
const HUD_TEXT_SIZE: f32 = 18.0;
const BUTTON_TEXT_SIZE: f32 = 16.0;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    FillRect { rect: Rect, color: Color },
    StrokeRect { rect: Rect, color: Color },
    /// Text centered on `center`.
    FillText {
        text: String,
        center: Point2<f32>,
        size: f32,
        color: Color,
    },
}

/// Opacity of the snake segment at `index` (0 = head).
pub fn segment_alpha(index: usize) -> f32 {
    (1.0 - index as f32 * SEGMENT_FADE).max(MIN_SEGMENT_ALPHA)
}

fn cell(out: &mut Vec<DrawCommand>, at: Cell, size: f32, fill: Color, stroke: Color) {
    let px = at.x as f32 * size;
    let py = at.y as f32 * size;
    out.push(DrawCommand::FillRect {
        rect: Rect::new(px + 1.0, py + 1.0, size - 2.0, size - 2.0),
        color: fill,
    });
    out.push(DrawCommand::StrokeRect {
        rect: Rect::new(px + 0.5, py + 0.5, size - 1.0, size - 1.0),
        color: stroke,
    });
}

fn text(out: &mut Vec<DrawCommand>, text: &str, x: f32, y: f32, size: f32, color: Color) {
    out.push(DrawCommand::FillText {
        text: text.to_string(),
        center: Point2 { x, y },
        size,
        color,
    });
}

/// The board: grid, food, snake, and the pause or game-over overlay.
pub fn frame(state: &GameState, settings: &Settings) -> Vec<DrawCommand> {
    let size = settings.cell_size as f32;
    let (width, height) = (settings.board_width(), settings.board_height());
    let mut out = vec![DrawCommand::Clear(BACKGROUND_COLOR)];

    for x in 0..settings.cols {
        for y in 0..settings.rows {
            out.push(DrawCommand::StrokeRect {
                rect: Rect::new(x as f32 * size + 0.5, y as f32 * size + 0.5, size - 1.0, size - 1.0),
                color: GRID_LINE_COLOR,
            });
        }
    }

    if let Some(food) = state.food {
        cell(&mut out, food, size, FOOD_FILL, FOOD_STROKE);
    }

    let (r, g, b) = SNAKE_RGB;
    for (i, segment) in state.snake.iter().enumerate() {
        cell(&mut out, *segment, size, Color::new(r, g, b, segment_alpha(i)), SNAKE_STROKE);
    }

    let board = Rect::new(0.0, 0.0, width, height);
    if state.game_over {
        out.push(DrawCommand::FillRect { rect: board, color: GAME_OVER_SHADE });
        text(&mut out, "Game Over", width / 2.0, height / 2.0 - 8.0, 28.0, TITLE_COLOR);
        text(&mut out, "Press R to restart", width / 2.0, height / 2.0 + 18.0, 14.0, SUBTITLE_COLOR);
    } else if state.paused {
        out.push(DrawCommand::FillRect { rect: board, color: PAUSE_SHADE });
        text(&mut out, "Paused", width / 2.0, height / 2.0, 22.0, PAUSE_TEXT_COLOR);
    }

    out
}

/// Score line and touch buttons under the board.
pub fn panel(state: &GameState, settings: &Settings, touch: &TouchPanel) -> Vec<DrawCommand> {
    let top = settings.board_height();
    let width = settings.board_width();
    let mut out = vec![DrawCommand::FillRect {
        rect: Rect::new(0.0, top, width, PANEL_HEIGHT),
        color: PANEL_COLOR,
    }];

    let hud = format!(
        "Score: {} | Best: {} | Speed: {:.1}x",
        state.score, state.best_score, state.speed_multiplier
    );
    text(&mut out, &hud, width / 2.0, top + 16.0, HUD_TEXT_SIZE, Color::WHITE);

    for button in touch.buttons() {
        out.push(DrawCommand::FillRect { rect: button.rect, color: BUTTON_COLOR });
        out.push(DrawCommand::StrokeRect { rect: button.rect, color: BUTTON_STROKE });
        let (cx, cy) = (button.rect.x + button.rect.w / 2.0, button.rect.y + button.rect.h / 2.0);
        text(&mut out, button.label, cx, cy, BUTTON_TEXT_SIZE, Color::WHITE);
    }

    out
}
