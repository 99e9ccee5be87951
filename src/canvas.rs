use crate::config::BACKGROUND_COLOR;
use crate::render::DrawCommand;
use ggez::graphics::{self, DrawMode, DrawParam, Mesh, Text, TextLayout};
use ggez::{Context, GameResult};

/// Replays a frame's draw commands onto the window.
pub fn paint(ctx: &mut Context, commands: &[DrawCommand]) -> GameResult {
    let clear = match commands.first() {
        Some(DrawCommand::Clear(color)) => *color,
        _ => BACKGROUND_COLOR,
    };
    let mut canvas = graphics::Canvas::from_frame(ctx, clear);

    for command in commands {
        match command {
            DrawCommand::Clear(_) => {}
            DrawCommand::FillRect { rect, color } => {
                canvas.draw(
                    &Mesh::new_rectangle(ctx, DrawMode::fill(), *rect, *color)?,
                    DrawParam::default(),
                );
            }
            DrawCommand::StrokeRect { rect, color } => {
                canvas.draw(
                    &Mesh::new_rectangle(ctx, DrawMode::stroke(1.0), *rect, *color)?,
                    DrawParam::default(),
                );
            }
            DrawCommand::FillText { text, center, size, color } => {
                let mut text = Text::new(text.as_str());
                text.set_scale(*size).set_layout(TextLayout::center());
                canvas.draw(&text, DrawParam::default().dest(*center).color(*color));
            }
        }
    }

    canvas.finish(ctx)?;
    Ok(())
}
