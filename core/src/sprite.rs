//! Declarative description of how game objects are drawn.
//!
//! Sprites never own renderer resources: textures are named by
//! [`TextureKey`] and resolved by whichever adapter draws the tree. The
//! model builds and replaces these trees but never asks how far an animation
//! has progressed.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    geometry::{Point, Rectangle},
    Colour,
};

/// Name of a texture loaded by the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextureKey(String);

impl TextureKey {
    /// Creates a texture key from its name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Name of the texture.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Leaf of a sprite tree: pixels sourced from a texture.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteBase {
    /// A single region of a texture.
    Static {
        /// Texture containing the image.
        texture: TextureKey,
        /// Region of the texture to draw.
        source: Rectangle<i32>,
    },
    /// Frames shown once, in order, then held on the last frame.
    Animation {
        /// Texture containing every frame.
        texture: TextureKey,
        /// Regions of the texture, one per frame.
        frames: Vec<Rectangle<i32>>,
        /// Time each frame stays visible.
        frame_duration: Duration,
    },
    /// Frames shown in order and repeated until the sprite is replaced.
    AnimationCycle {
        /// Texture containing every frame.
        texture: TextureKey,
        /// Regions of the texture, one per frame.
        frames: Vec<Rectangle<i32>>,
        /// Time each frame stays visible.
        frame_duration: Duration,
    },
}

/// Composable visual effect wrapping a base or another effect.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sprite {
    /// Draws a leaf unchanged.
    Base(SpriteBase),
    /// Shifts the inner sprite by a fixed offset.
    Position {
        /// Offset applied to the inner sprite.
        offset: Point<i32>,
        /// Sprite being shifted.
        inner: Box<Sprite>,
    },
    /// Slides the inner sprite from `from` to `to` over a renderer-supplied duration.
    Movement {
        /// Offset at the start of the movement.
        from: Point<i32>,
        /// Offset at the end of the movement.
        to: Point<i32>,
        /// Sprite being moved.
        inner: Box<Sprite>,
    },
    /// Tints the inner sprite without changing its geometry.
    ColourBlend {
        /// Colour multiplied into the inner sprite.
        tint: Colour,
        /// Sprite being tinted.
        inner: Box<Sprite>,
    },
    /// Draws the inner sprite once per emitted point around an origin.
    ParticleSystem {
        /// Anchor of the emitter.
        origin: Point<i32>,
        /// Emitted particle positions relative to `origin`.
        points: Vec<Point<i32>>,
        /// Sprite drawn for every particle.
        inner: Box<Sprite>,
    },
    /// Plays each child to completion before starting the next.
    Sequence(Vec<Sprite>),
}

impl Sprite {
    /// Single still image.
    #[must_use]
    pub fn still(texture: TextureKey, source: Rectangle<i32>) -> Self {
        Self::Base(SpriteBase::Static { texture, source })
    }

    /// Looping animation.
    #[must_use]
    pub fn cycle(
        texture: TextureKey,
        frames: Vec<Rectangle<i32>>,
        frame_duration: Duration,
    ) -> Self {
        Self::Base(SpriteBase::AnimationCycle {
            texture,
            frames,
            frame_duration,
        })
    }

    /// Animation played once.
    #[must_use]
    pub fn once(texture: TextureKey, frames: Vec<Rectangle<i32>>, frame_duration: Duration) -> Self {
        Self::Base(SpriteBase::Animation {
            texture,
            frames,
            frame_duration,
        })
    }

    /// Wraps the sprite in a fixed offset.
    #[must_use]
    pub fn at(self, offset: Point<i32>) -> Self {
        Self::Position {
            offset,
            inner: Box::new(self),
        }
    }

    /// Wraps the sprite in a movement between two offsets.
    #[must_use]
    pub fn moving(self, from: Point<i32>, to: Point<i32>) -> Self {
        Self::Movement {
            from,
            to,
            inner: Box::new(self),
        }
    }

    /// Wraps the sprite in a colour tint.
    #[must_use]
    pub fn tinted(self, tint: Colour) -> Self {
        Self::ColourBlend {
            tint,
            inner: Box::new(self),
        }
    }

    /// Emits the sprite at every point around `origin`.
    #[must_use]
    pub fn emitted(self, origin: Point<i32>, points: Vec<Point<i32>>) -> Self {
        Self::ParticleSystem {
            origin,
            points,
            inner: Box::new(self),
        }
    }

    /// Number of nested effect layers, counting the leaf as one.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Base(_) => 1,
            Self::Position { inner, .. }
            | Self::Movement { inner, .. }
            | Self::ColourBlend { inner, .. }
            | Self::ParticleSystem { inner, .. } => inner.depth() + 1,
            Self::Sequence(children) => {
                children.iter().map(Sprite::depth).max().unwrap_or(0) + 1
            }
        }
    }
}
