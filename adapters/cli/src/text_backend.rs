//! Terminal backend drawing frames as plain text.

use std::io::Write;

use anyhow::{Context, Result as AnyResult};
use glam::{IVec2, Vec2};
use tactics_core::{BoardPos, Grid};
use tactics_rendering::{
    text::{
        compose_menu, layout_menu, Compositor, Font, FontMetrics, LabelState, MenuStyle,
        TextExtent, TextRasterizer,
    },
    visuals::SpriteSampler,
    BoardPresentation, Color, MenuPresentation, Presentation, RenderingBackend, Scene,
};

/// Writes every presented frame to `out`, one character per text cell.
#[derive(Debug)]
pub(crate) struct TextBackend<W> {
    out: W,
    sampler: SpriteSampler,
    style: MenuStyle,
    font: Font,
}

impl<W: Write> TextBackend<W> {
    pub(crate) fn new(out: W) -> Self {
        Self {
            out,
            sampler: SpriteSampler::default(),
            style: MenuStyle {
                padding: 1,
                indent: 2,
                line_spacing: 0,
                ..MenuStyle::default()
            },
            font: Font::new("terminal", 1),
        }
    }

    fn scene_lines(&self, scene: &Scene) -> AnyResult<Vec<String>> {
        match scene {
            Scene::Menu(menu) => self.menu_lines(menu),
            Scene::Paused { menu, beneath } => {
                let mut lines = self.scene_lines(beneath)?;
                lines.push(String::new());
                lines.extend(self.menu_lines(menu)?);
                Ok(lines)
            }
            Scene::Battlefield(board) => Ok(self.board_lines(board)),
        }
    }

    fn menu_lines(&self, menu: &MenuPresentation) -> AnyResult<Vec<String>> {
        let layout = layout_menu(menu, &self.font, &Glyphs, &self.style);
        let mut canvas = compose_menu(&layout, &self.font, &self.style, &mut Glyphs, &mut Glyphs)
            .context("failed to compose menu")?;

        for label in &layout.labels {
            let marker = match label.state {
                LabelState::Active => '>',
                LabelState::Selected => '*',
                LabelState::Title | LabelState::Normal => continue,
            };
            let x = u32::try_from(label.offset.x.saturating_sub(1));
            let y = u32::try_from(label.offset.y);
            let (Ok(x), Ok(y)) = (x, y) else {
                continue;
            };
            if let Ok(cell) = canvas.get_mut(x, y) {
                *cell = marker;
            }
        }
        Ok(rows(&canvas))
    }

    fn board_lines(&self, board: &BoardPresentation) -> Vec<String> {
        let mut lines = vec![board.status.clone()];
        for y in 0..board.rows {
            let mut line = String::new();
            for x in 0..board.columns {
                line.push_str(&cell(board, BoardPos::new(x, y)));
            }
            lines.push(line.trim_end().to_owned());
        }

        for effect in &board.effects {
            let settled = self.sampler.settle_time(effect);
            for draw in self.sampler.sample(effect, settled, Vec2::ZERO) {
                let tile = (draw.position / board.tile_length).floor();
                lines.push(format!(
                    "* {} settles at tile ({}, {})",
                    draw.texture.as_str(),
                    tile.x,
                    tile.y
                ));
            }
        }
        lines
    }
}

impl<W: Write> RenderingBackend for TextBackend<W> {
    fn present(&mut self, presentation: &Presentation) -> AnyResult<()> {
        let lines = self.scene_lines(&presentation.scene)?;
        writeln!(self.out, "== {} ==", presentation.window_title)?;
        for line in lines {
            writeln!(self.out, "{line}")?;
        }
        writeln!(self.out)?;
        self.out.flush().context("failed to flush frame")
    }
}

/// Three characters per tile: `[x]` under the cursor, `<x>` for the selected
/// unit, `x.` for exhausted units.
fn cell(board: &BoardPresentation, pos: BoardPos) -> String {
    let unit = board.unit_at(pos);
    let glyph = unit
        .map(|unit| unit.glyph)
        .or_else(|| board.terrain_at(pos).map(char::from))
        .unwrap_or(' ');

    if board.cursor == pos {
        format!("[{glyph}]")
    } else if unit.is_some_and(|unit| unit.selected) {
        format!("<{glyph}>")
    } else if unit.is_some_and(|unit| unit.exhausted) {
        format!(" {glyph}.")
    } else {
        format!(" {glyph} ")
    }
}

fn rows(canvas: &Grid<char>) -> Vec<String> {
    let mut lines = vec![String::new(); canvas.height() as usize];
    for (pos, glyph) in canvas.iter() {
        if let Some(line) = lines.get_mut(pos.y as usize) {
            line.push(*glyph);
        }
    }
    lines.iter().map(|line| line.trim_end().to_owned()).collect()
}

/// Monospace character cells: every glyph is one cell wide and one line high.
struct Glyphs;

impl FontMetrics for Glyphs {
    fn measure(&self, text: &str, _font: &Font) -> TextExtent {
        TextExtent {
            width: u32::try_from(text.chars().count()).unwrap_or(u32::MAX),
            line_height: 1,
        }
    }
}

impl TextRasterizer for Glyphs {
    type Surface = Grid<char>;

    fn rasterize(&mut self, text: &str, _font: &Font, _color: Color) -> AnyResult<Grid<char>> {
        let cells: Vec<char> = text.chars().collect();
        let width = u32::try_from(cells.len()).context("label too long")?;
        Ok(Grid::from_cells(width, 1, cells)?)
    }
}

impl Compositor<Grid<char>> for Glyphs {
    fn blank(&mut self, width: u32, height: u32, _color: Color) -> Grid<char> {
        Grid::new(width, height, ' ')
    }

    fn blit(&mut self, mut target: Grid<char>, source: &Grid<char>, offset: IVec2) -> Grid<char> {
        for (pos, glyph) in source.iter() {
            let x = i64::from(offset.x) + i64::from(pos.x);
            let y = i64::from(offset.y) + i64::from(pos.y);
            let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
                continue;
            };
            if let Ok(cell) = target.get_mut(x, y) {
                *cell = *glyph;
            }
        }
        target
    }
}
