use crate::engine::TickOutcome;
use ggez::audio::{self, SoundSource};
use ggez::Context;
use log::warn;

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Sfx {
    Eat,
    Crash,
}

impl Sfx {
    pub fn for_outcome(outcome: TickOutcome) -> Option<Sfx> {
        match outcome {
            TickOutcome::Ate => Some(Sfx::Eat),
            TickOutcome::Crashed(_) => Some(Sfx::Crash),
            TickOutcome::Moved | TickOutcome::Skipped => None,
        }
    }
}

/// Sound effects. Missing assets leave the game silent, not broken.
pub struct Sounds {
    eat: Option<audio::Source>,
    crash: Option<audio::Source>,
}

impl Sounds {
    pub fn load(ctx: &mut Context) -> Self {
        Sounds {
            eat: Self::load_one(ctx, "/eat.wav"),
            crash: Self::load_one(ctx, "/crash.wav"),
        }
    }

    fn load_one(ctx: &mut Context, path: &str) -> Option<audio::Source> {
        match audio::Source::new(ctx, path) {
            Ok(source) => Some(source),
            Err(e) => {
                warn!("Sound {} unavailable: {}", path, e);
                None
            }
        }
    }

    pub fn play(&mut self, ctx: &mut Context, sfx: Sfx) {
        let source = match sfx {
            Sfx::Eat => self.eat.as_mut(),
            Sfx::Crash => self.crash.as_mut(),
        };
        if let Some(source) = source {
            source
                .play_detached(ctx)
                .unwrap_or_else(|e| warn!("Failed to play {:?}: {}", sfx, e));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Collision;

    #[test]
    fn test_outcome_sounds() {
        assert_eq!(Sfx::for_outcome(TickOutcome::Ate), Some(Sfx::Eat));
        assert_eq!(Sfx::for_outcome(TickOutcome::Crashed(Collision::Wall)), Some(Sfx::Crash));
        assert_eq!(Sfx::for_outcome(TickOutcome::Moved), None);
        assert_eq!(Sfx::for_outcome(TickOutcome::Skipped), None);
    }
}
