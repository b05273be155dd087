//! Menu layout over renderer-provided font and compositing capabilities.

use anyhow::Result as AnyResult;
use glam::IVec2;

use crate::{Color, MenuPresentation};

/// Font requested from the backend.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Font {
    /// Name of the font face.
    pub name: String,
    /// Size in pixels.
    pub size: u32,
}

impl Font {
    /// Creates a font descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, size: u32) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }
}

/// Pixel extent of a rendered line of text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextExtent {
    /// Width of the text.
    pub width: u32,
    /// Height of one line.
    pub line_height: u32,
}

/// Measures text before it is drawn.
pub trait FontMetrics {
    /// Extent of `text` drawn with `font`.
    fn measure(&self, text: &str, font: &Font) -> TextExtent;
}

/// Turns text into a drawable surface.
pub trait TextRasterizer {
    /// Surface produced by the rasterizer.
    type Surface;

    /// Draws `text` with `font` in `color`.
    fn rasterize(&mut self, text: &str, font: &Font, color: Color) -> AnyResult<Self::Surface>;
}

/// Combines surfaces.
pub trait Compositor<S> {
    /// Surface of the given size filled with `color`.
    fn blank(&mut self, width: u32, height: u32, color: Color) -> S;

    /// Draws `source` onto `target` with its top-left corner at `offset`.
    fn blit(&mut self, target: S, source: &S, offset: IVec2) -> S;
}

/// Spacing and colors of a laid out menu.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MenuStyle {
    /// Empty border around the menu.
    pub padding: u32,
    /// Horizontal shift applied per nesting level.
    pub indent: u32,
    /// Extra space between lines.
    pub line_spacing: u32,
    /// Fill behind the labels.
    pub background: Color,
    /// Color of labels that are not selected.
    pub normal: Color,
    /// Color of the selection in menus that lost focus to a submenu.
    pub selected: Color,
    /// Color of the selection in the menu receiving input.
    pub active: Color,
}

impl Default for MenuStyle {
    fn default() -> Self {
        Self {
            padding: 8,
            indent: 16,
            line_spacing: 4,
            background: Color::from_rgb_u8(0x10, 0x10, 0x18),
            normal: Color::from_rgb_u8(0xb0, 0xb0, 0xb0),
            selected: Color::from_rgb_u8(0xe0, 0xd0, 0x90),
            active: Color::from_rgb_u8(0xff, 0xff, 0xff),
        }
    }
}

/// Highlight state of a placed label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LabelState {
    /// The menu title.
    Title,
    /// Not selected.
    Normal,
    /// Selected in a menu that has an open submenu.
    Selected,
    /// Selected in the menu receiving input.
    Active,
}

/// Label positioned inside a menu surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelPlacement {
    /// Text of the label.
    pub text: String,
    /// Top-left corner relative to the menu surface.
    pub offset: IVec2,
    /// Nesting level the label belongs to, the root menu being zero.
    pub level: usize,
    /// Highlight state.
    pub state: LabelState,
}

/// Result of [`layout_menu`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuLayout {
    /// Width of the menu surface.
    pub width: u32,
    /// Height of the menu surface.
    pub height: u32,
    /// Labels in drawing order.
    pub labels: Vec<LabelPlacement>,
}

/// Places the title and every label of every open level, one per line.
///
/// Each level is drawn below its parent and indented by one step.
#[must_use]
pub fn layout_menu<M>(menu: &MenuPresentation, font: &Font, metrics: &M, style: &MenuStyle) -> MenuLayout
where
    M: FontMetrics + ?Sized,
{
    let active_level = menu.levels.len().saturating_sub(1);
    let lines = std::iter::once((menu.title.as_str(), 0, LabelState::Title)).chain(
        menu.levels.iter().enumerate().flat_map(|(level, entries)| {
            entries.labels.iter().enumerate().map(move |(index, label)| {
                let state = match (index == entries.selection, level == active_level) {
                    (false, _) => LabelState::Normal,
                    (true, true) => LabelState::Active,
                    (true, false) => LabelState::Selected,
                };
                (label.as_str(), level, state)
            })
        }),
    );

    let mut labels = Vec::new();
    let mut cursor_y = style.padding;
    let mut content_width = 0;
    for (text, level, state) in lines {
        let extent = metrics.measure(text, font);
        let indent = if state == LabelState::Title {
            0
        } else {
            style.indent.saturating_mul(u32::try_from(level).unwrap_or(u32::MAX))
        };
        content_width = content_width.max(indent.saturating_add(extent.width));
        labels.push(LabelPlacement {
            text: text.to_owned(),
            offset: IVec2::new(to_i32(style.padding.saturating_add(indent)), to_i32(cursor_y)),
            level,
            state,
        });
        cursor_y = cursor_y
            .saturating_add(extent.line_height)
            .saturating_add(style.line_spacing);
    }

    let height = cursor_y
        .saturating_sub(style.line_spacing)
        .saturating_add(style.padding);
    MenuLayout {
        width: content_width.saturating_add(style.padding.saturating_mul(2)),
        height,
        labels,
    }
}

/// Rasterizes and composites a laid out menu onto one surface.
pub fn compose_menu<R, C>(
    layout: &MenuLayout,
    font: &Font,
    style: &MenuStyle,
    rasterizer: &mut R,
    compositor: &mut C,
) -> AnyResult<R::Surface>
where
    R: TextRasterizer + ?Sized,
    C: Compositor<R::Surface> + ?Sized,
{
    let mut canvas = compositor.blank(layout.width, layout.height, style.background);
    for label in &layout.labels {
        let color = match label.state {
            LabelState::Title | LabelState::Active => style.active,
            LabelState::Selected => style.selected,
            LabelState::Normal => style.normal,
        };
        let surface = rasterizer.rasterize(&label.text, font, color)?;
        canvas = compositor.blit(canvas, &surface, label.offset);
    }
    Ok(canvas)
}

fn to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
