//! Reference evaluator for sprite trees.
//!
//! The model only describes sprites; [`SpriteSampler`] answers what a tree
//! looks like a given time after it appeared:
//!
//! * `Sequence` plays its children in order, each to completion, and holds
//!   the last child once every child finished.
//! * `Movement` interpolates linearly from `from` to `to` over the sampler's
//!   movement duration.
//! * `Animation` plays once and holds its last frame; `AnimationCycle` loops.
//! * `ColourBlend` multiplies its tint into everything beneath it.
//! * `ParticleSystem` draws its inner sprite once per point around `origin`.

use std::time::Duration;

use glam::Vec2;
use tactics_core::{Point, Rectangle, Sprite, SpriteBase, TextureKey};

use crate::Color;

/// Single textured quad produced by sampling a sprite tree.
#[derive(Clone, Debug, PartialEq)]
pub struct SpriteDraw {
    /// Texture to sample from.
    pub texture: TextureKey,
    /// Region of the texture.
    pub source: Rectangle<i32>,
    /// Top-left corner of the quad in pixels.
    pub position: Vec2,
    /// Accumulated tint.
    pub tint: Color,
}

/// Evaluates sprite trees at a point in time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpriteSampler {
    movement_duration: Duration,
}

impl Default for SpriteSampler {
    fn default() -> Self {
        Self::new(Duration::from_millis(250))
    }
}

impl SpriteSampler {
    /// Creates a sampler that completes every movement within `movement_duration`.
    #[must_use]
    pub const fn new(movement_duration: Duration) -> Self {
        Self { movement_duration }
    }

    /// Time the sprite takes to finish, `None` when it never does.
    #[must_use]
    pub fn duration(&self, sprite: &Sprite) -> Option<Duration> {
        match sprite {
            Sprite::Base(SpriteBase::Static { .. }) => Some(Duration::ZERO),
            Sprite::Base(SpriteBase::Animation {
                frames,
                frame_duration,
                ..
            }) => Some(play_time(frames, *frame_duration)),
            Sprite::Base(SpriteBase::AnimationCycle { .. }) => None,
            Sprite::Position { inner, .. }
            | Sprite::ColourBlend { inner, .. }
            | Sprite::ParticleSystem { inner, .. } => self.duration(inner),
            Sprite::Movement { inner, .. } => self
                .duration(inner)
                .map(|inner| inner.max(self.movement_duration)),
            Sprite::Sequence(children) => children
                .iter()
                .map(|child| self.duration(child))
                .try_fold(Duration::ZERO, |total, child| {
                    child.map(|child| total.saturating_add(child))
                }),
        }
    }

    /// Time after which the sprite only repeats itself: every movement has
    /// arrived and every one-shot animation shows its last frame.
    ///
    /// Loops count as settled from the start, so unlike [`Self::duration`]
    /// this is finite for every tree.
    #[must_use]
    pub fn settle_time(&self, sprite: &Sprite) -> Duration {
        match sprite {
            Sprite::Base(SpriteBase::Animation {
                frames,
                frame_duration,
                ..
            }) => play_time(frames, *frame_duration),
            Sprite::Base(SpriteBase::Static { .. } | SpriteBase::AnimationCycle { .. }) => {
                Duration::ZERO
            }
            Sprite::Position { inner, .. }
            | Sprite::ColourBlend { inner, .. }
            | Sprite::ParticleSystem { inner, .. } => self.settle_time(inner),
            Sprite::Movement { inner, .. } => self.settle_time(inner).max(self.movement_duration),
            Sprite::Sequence(children) => {
                let mut total = Duration::ZERO;
                for child in children {
                    total = total.saturating_add(self.settle_time(child));
                    if self.duration(child).is_none() {
                        break;
                    }
                }
                total
            }
        }
    }

    /// Quads making up the sprite `elapsed` after it appeared, positioned
    /// relative to `origin`.
    #[must_use]
    pub fn sample(&self, sprite: &Sprite, elapsed: Duration, origin: Vec2) -> Vec<SpriteDraw> {
        let mut draws = Vec::new();
        self.sample_into(sprite, elapsed, origin, Color::WHITE, &mut draws);
        draws
    }

    fn sample_into(
        &self,
        sprite: &Sprite,
        elapsed: Duration,
        offset: Vec2,
        tint: Color,
        draws: &mut Vec<SpriteDraw>,
    ) {
        match sprite {
            Sprite::Base(base) => {
                if let Some((texture, source)) = frame_at(base, elapsed) {
                    draws.push(SpriteDraw {
                        texture: texture.clone(),
                        source,
                        position: offset,
                        tint,
                    });
                }
            }
            Sprite::Position {
                offset: shift,
                inner,
            } => self.sample_into(inner, elapsed, offset + to_vec(*shift), tint, draws),
            Sprite::Movement { from, to, inner } => {
                let progress = progress(elapsed, self.movement_duration);
                let position = to_vec(*from).lerp(to_vec(*to), progress);
                self.sample_into(inner, elapsed, offset + position, tint, draws);
            }
            Sprite::ColourBlend { tint: blend, inner } => {
                let tint = tint.multiply(Color::from(*blend));
                self.sample_into(inner, elapsed, offset, tint, draws);
            }
            Sprite::ParticleSystem {
                origin,
                points,
                inner,
            } => {
                let origin = offset + to_vec(*origin);
                for point in points {
                    self.sample_into(inner, elapsed, origin + to_vec(*point), tint, draws);
                }
            }
            Sprite::Sequence(children) => {
                let mut remaining = elapsed;
                for (index, child) in children.iter().enumerate() {
                    let is_last = index + 1 == children.len();
                    match self.duration(child) {
                        Some(duration) if remaining >= duration && !is_last => {
                            remaining -= duration;
                        }
                        _ => {
                            self.sample_into(child, remaining, offset, tint, draws);
                            return;
                        }
                    }
                }
            }
        }
    }
}

fn frame_at(base: &SpriteBase, elapsed: Duration) -> Option<(&TextureKey, Rectangle<i32>)> {
    match base {
        SpriteBase::Static { texture, source } => Some((texture, *source)),
        SpriteBase::Animation {
            texture,
            frames,
            frame_duration,
        } => {
            let index = frame_index(elapsed, *frame_duration).min(frames.len().checked_sub(1)?);
            frames.get(index).map(|frame| (texture, *frame))
        }
        SpriteBase::AnimationCycle {
            texture,
            frames,
            frame_duration,
        } => {
            if frames.is_empty() {
                return None;
            }
            let index = frame_index(elapsed, *frame_duration) % frames.len();
            frames.get(index).map(|frame| (texture, *frame))
        }
    }
}

fn play_time(frames: &[Rectangle<i32>], frame_duration: Duration) -> Duration {
    frame_duration.saturating_mul(u32::try_from(frames.len()).unwrap_or(u32::MAX))
}

fn frame_index(elapsed: Duration, frame_duration: Duration) -> usize {
    if frame_duration.is_zero() {
        return 0;
    }
    usize::try_from(elapsed.as_nanos() / frame_duration.as_nanos()).unwrap_or(usize::MAX)
}

fn progress(elapsed: Duration, duration: Duration) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f32() / duration.as_secs_f32()).clamp(0.0, 1.0)
}

fn to_vec(point: Point<i32>) -> Vec2 {
    Vec2::new(point.x as f32, point.y as f32)
}

#[cfg(test)]
mod tests {
    use tactics_core::Colour;

    use super::*;

    const FRAME: Duration = Duration::from_millis(100);

    fn frames(count: i32) -> Vec<Rectangle<i32>> {
        (0..count).map(|index| Rectangle::new(index * 16, 0, 16, 16)).collect()
    }

    fn sources(draws: &[SpriteDraw]) -> Vec<i32> {
        draws.iter().map(|draw| draw.source.x).collect()
    }

    fn texture() -> TextureKey {
        TextureKey::new("units/mage")
    }

    #[test]
    fn animation_holds_its_last_frame() {
        let sprite = Sprite::once(texture(), frames(3), FRAME);
        let sampler = SpriteSampler::default();

        assert_eq!(sources(&sampler.sample(&sprite, Duration::from_millis(150), Vec2::ZERO)), vec![16]);
        assert_eq!(sources(&sampler.sample(&sprite, Duration::from_secs(5), Vec2::ZERO)), vec![32]);
        assert_eq!(sampler.duration(&sprite), Some(Duration::from_millis(300)));
    }

    #[test]
    fn animation_cycle_loops_forever() {
        let sprite = Sprite::cycle(texture(), frames(3), FRAME);
        let sampler = SpriteSampler::default();

        assert_eq!(sources(&sampler.sample(&sprite, Duration::from_millis(350), Vec2::ZERO)), vec![0]);
        assert_eq!(sampler.duration(&sprite), None);
    }

    #[test]
    fn movement_interpolates_linearly() {
        let sprite = Sprite::still(texture(), Rectangle::new(0, 0, 16, 16))
            .moving(Point::new(0, 0), Point::new(32, 16));
        let sampler = SpriteSampler::new(Duration::from_millis(200));

        let halfway = sampler.sample(&sprite, Duration::from_millis(100), Vec2::new(1.0, 1.0));
        assert_eq!(halfway[0].position, Vec2::new(17.0, 9.0));

        let done = sampler.sample(&sprite, Duration::from_secs(1), Vec2::ZERO);
        assert_eq!(done[0].position, Vec2::new(32.0, 16.0));
        assert_eq!(sampler.duration(&sprite), Some(Duration::from_millis(200)));
    }

    #[test]
    fn looping_movement_settles_when_it_arrives() {
        let sprite = Sprite::cycle(texture(), frames(2), FRAME).moving(Point::new(0, 0), Point::new(0, 32));
        let sampler = SpriteSampler::new(Duration::from_millis(200));

        assert_eq!(sampler.duration(&sprite), None);
        assert_eq!(sampler.settle_time(&sprite), Duration::from_millis(200));
        let settled = sampler.sample(&sprite, sampler.settle_time(&sprite), Vec2::ZERO);
        assert_eq!(settled[0].position, Vec2::new(0.0, 32.0));
    }

    #[test]
    fn settle_time_stops_at_the_first_endless_child() {
        let sequence = Sprite::Sequence(vec![
            Sprite::once(texture(), frames(2), FRAME),
            Sprite::cycle(texture(), frames(3), FRAME),
            Sprite::once(texture(), frames(5), FRAME),
        ]);
        assert_eq!(
            SpriteSampler::default().settle_time(&sequence),
            Duration::from_millis(200)
        );
    }

    #[test]
    fn sequence_plays_children_in_order() {
        let first = Sprite::once(texture(), frames(2), FRAME);
        let second = Sprite::once(TextureKey::new("fx/spark"), frames(1), FRAME);
        let sequence = Sprite::Sequence(vec![first, second]);
        let sampler = SpriteSampler::default();

        let early = sampler.sample(&sequence, Duration::from_millis(50), Vec2::ZERO);
        assert_eq!(early[0].texture, texture());

        let late = sampler.sample(&sequence, Duration::from_millis(250), Vec2::ZERO);
        assert_eq!(late[0].texture, TextureKey::new("fx/spark"));

        let after = sampler.sample(&sequence, Duration::from_secs(10), Vec2::ZERO);
        assert_eq!(after[0].texture, TextureKey::new("fx/spark"));
        assert_eq!(sampler.duration(&sequence), Some(Duration::from_millis(300)));
    }

    #[test]
    fn colour_blend_tints_without_moving() {
        let base = Sprite::still(texture(), Rectangle::new(0, 0, 16, 16)).at(Point::new(4, 4));
        let tinted = base.clone().tinted(Colour::from_rgb(255, 0, 0));
        let sampler = SpriteSampler::default();

        let plain = sampler.sample(&base, Duration::ZERO, Vec2::ZERO);
        let red = sampler.sample(&tinted, Duration::ZERO, Vec2::ZERO);
        assert_eq!(plain[0].position, red[0].position);
        assert_eq!(red[0].tint, Color::new(1.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn particle_system_draws_once_per_point() {
        let sprite = Sprite::still(texture(), Rectangle::new(0, 0, 4, 4))
            .emitted(Point::new(10, 10), vec![Point::new(-2, 0), Point::new(2, 0)]);
        let draws = SpriteSampler::default().sample(&sprite, Duration::ZERO, Vec2::ZERO);

        let positions: Vec<_> = draws.iter().map(|draw| draw.position).collect();
        assert_eq!(positions, vec![Vec2::new(8.0, 10.0), Vec2::new(12.0, 10.0)]);
    }
}
