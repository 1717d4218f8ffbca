use chess::{Game, Move, Square};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Color,
    widgets::Widget,
};

use crate::assets::{AssetTable, Sprite};
use crate::geometry::{grid_to_square, BoardGeometry, DIMENSION};

/// Upper half block: foreground paints the top pixel, background the bottom.
const HALF_BLOCK: &str = "\u{2580}";

#[derive(Clone, Copy, PartialEq, Eq)]
enum SquareHighlight {
    Selected,
    LastMove,
    None,
}

impl SquareHighlight {
    fn bg_color(self, is_light_square: bool) -> Color {
        let (light, dark) = match self {
            Self::Selected => (Color::Rgb(246, 246, 130), Color::Rgb(200, 200, 70)),
            Self::LastMove => (Color::Rgb(205, 225, 160), Color::Rgb(150, 170, 90)),
            Self::None => (Color::Rgb(255, 255, 255), Color::Rgb(128, 128, 128)),
        };
        if is_light_square {
            light
        } else {
            dark
        }
    }
}

/// Draws the board at the cells described by its geometry.
pub struct BoardWidget<'a> {
    pub game: &'a Game,
    pub assets: &'a AssetTable,
    pub geometry: BoardGeometry,
    pub selected: Option<Square>,
    pub last_move: Option<Move>,
}

impl BoardWidget<'_> {
    fn highlight(&self, square: Square) -> SquareHighlight {
        if self.selected == Some(square) {
            SquareHighlight::Selected
        } else if self
            .last_move
            .is_some_and(|mv| mv.from == square || mv.to == square)
        {
            SquareHighlight::LastMove
        } else {
            SquareHighlight::None
        }
    }

    fn render_square(&self, square: Square, light: bool, buf: &mut Buffer) {
        let bg = self.highlight(square).bg_color(light);
        let rect = self.geometry.square_rect(square);
        let sprite = self
            .game
            .piece_at(square)
            .and_then(|(kind, color)| self.assets.sprite(color, kind));

        for dy in 0..rect.height {
            for dx in 0..rect.width {
                let Some(cell) = buf.cell_mut((rect.x + dx, rect.y + dy)) else {
                    continue;
                };
                match sprite {
                    Some(sprite) => {
                        let (top, bottom) = sprite_cell(sprite, dx, dy, bg);
                        cell.set_symbol(HALF_BLOCK).set_fg(top).set_bg(bottom);
                    }
                    None => {
                        cell.set_symbol(" ").set_bg(bg);
                    }
                }
            }
        }
    }
}

/// Top and bottom colours of the cell at (`dx`, `dy`) inside a square.
fn sprite_cell(sprite: &Sprite, dx: u16, dy: u16, bg: Color) -> (Color, Color) {
    let x = u32::from(dx);
    let y = u32::from(dy) * 2;
    let pick = |px: Option<(u8, u8, u8)>| px.map_or(bg, |(r, g, b)| Color::Rgb(r, g, b));
    (pick(sprite.pixel(x, y)), pick(sprite.pixel(x, y + 1)))
}

impl Widget for BoardWidget<'_> {
    fn render(self, _area: Rect, buf: &mut Buffer) {
        for row in 0..DIMENSION {
            for col in 0..DIMENSION {
                let Some(square) = grid_to_square(col, row) else {
                    continue;
                };
                // a8 (col 0, row 0) is light.
                let light = (col + row) % 2 == 0;
                self.render_square(square, light, buf);
            }
        }
    }
}
