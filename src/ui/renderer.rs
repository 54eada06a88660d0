/// Presentation layer: retained canvas with diff-based terminal flush.
///
/// How it works:
///   1. `RenderSurface` calls paint straight into the `front` canvas, which
///      persists between frames (the core only sends changes)
///   2. `present()` compares each glyph with `back` (what the terminal shows)
///   3. Only emits terminal commands for glyphs that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Copies front into back
///
/// The canvas is a fixed size and is centred in the terminal. Grid cells
/// become terminal columns/rows only in this file.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::device::{RenderSurface, Selection, SensorError};
use crate::domain::difficulty::Difficulty;
use crate::domain::grid::{Cell, Grid, COLS, ROWS};
use crate::domain::tile::{Direction, TileKind};

// ── Glyph: the unit of the canvas ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Glyph {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Glyph {
    /// Explicit dark background for all "empty" terminal cells, so the
    /// inter-row gap colour matches on VTE terminals.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Glyph = Glyph { ch: ' ', fg: Color::White, bg: Glyph::BASE_BG };

    /// Sentinel used to invalidate the back buffer.
    /// Different from any real glyph, so every position will be diff'd.
    const INVALID: Glyph = Glyph { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color) -> Self {
        Glyph { ch, fg, bg: Glyph::BASE_BG }
    }
}

// ── FrameBuffer: a 2D grid of Glyphs ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Glyph>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Glyph::BLANK; w * h] }
    }

    fn clear(&mut self) {
        self.cells.fill(Glyph::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, g: Glyph) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = g;
        }
    }

    fn get(&self, x: usize, y: usize) -> Glyph {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Glyph::BLANK
        }
    }

    /// Write a string at (x, y). Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color) {
        for (i, ch) in s.chars().enumerate() {
            self.set(x + i, y, Glyph::new(ch, fg));
        }
    }

    fn put_centered(&mut self, y: usize, s: &str, fg: Color) {
        let x = self.width.saturating_sub(s.chars().count()) / 2;
        self.put_str(x, y, s, fg);
    }

    fn clear_row(&mut self, y: usize) {
        for x in 0..self.width {
            self.set(x, y, Glyph::BLANK);
        }
    }
}

// ── Geometry ──

/// Interior of one maze tile, in terminal cells.
const TILE_W: usize = 6;
const TILE_H: usize = 2;

/// Canvas offsets.
const TITLE_ROW: usize = 0;
const MAZE_TOP: usize = 2;
const MAZE_LEFT: usize = 1;
const HUD_ROW: usize = MAZE_TOP + ROWS * (TILE_H + 1) + 2;
const HELP_ROW: usize = HUD_ROW + 1;
const NOTICE_ROW: usize = HUD_ROW - 1;

const CANVAS_W: usize = MAZE_LEFT * 2 + COLS * (TILE_W + 1) + 1;
const CANVAS_H: usize = HELP_ROW + 1;

/// Top-left pillar of a tile.
fn tile_origin(cell: Cell) -> (usize, usize) {
    (MAZE_LEFT + cell.col * (TILE_W + 1), MAZE_TOP + cell.row * (TILE_H + 1))
}

/// m:ss, whole seconds.
pub fn format_elapsed(ms: u64) -> String {
    let secs = ms / 1000;
    format!("{}:{:02}", secs / 60, secs % 60)
}

// ── Palette ──

const WALL: Color = Color::Rgb { r: 120, g: 130, b: 170 };
const TITLE: Color = Color::Rgb { r: 255, g: 200, b: 50 };
const HI: Color = Color::Rgb { r: 80, g: 255, b: 80 };
const DIM: Color = Color::DarkGrey;
const BUD: Color = Color::Rgb { r: 120, g: 200, b: 90 };
const BLOOM: Color = Color::Rgb { r: 255, g: 120, b: 200 };
const ICE: Color = Color::Rgb { r: 140, g: 220, b: 255 };
const TOKEN: Color = Color::Rgb { r: 255, g: 220, b: 60 };

// ── TerminalDisplay ──

pub struct TerminalDisplay {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
}

impl TerminalDisplay {
    pub fn new() -> Self {
        TerminalDisplay {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(CANVAS_W, CANVAS_H),
            back: FrameBuffer::new(CANVAS_W, CANVAS_H),
            term_w: 0,
            term_h: 0,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Glyph::BASE_BG),
            Clear(ClearType::All)
        )?;
        // Force full repaint on first frame: back ≠ front for every glyph.
        self.back.cells.fill(Glyph::INVALID);
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    /// Push the canvas to the terminal.
    pub fn present(&mut self) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            // Force full repaint after resize.
            self.back.cells.fill(Glyph::INVALID);
            queue!(self.writer, SetBackgroundColor(Glyph::BASE_BG), Clear(ClearType::All))?;
        }

        self.flush_diff()?;
        self.back.cells.copy_from_slice(&self.front.cells);
        Ok(())
    }

    // ── Diff flush: only write changed glyphs ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let off_x = self.term_w.saturating_sub(CANVAS_W) / 2;
        let off_y = self.term_h.saturating_sub(CANVAS_H) / 2;
        let mut last_fg = Color::White;
        let mut last_bg = Glyph::BASE_BG;
        let mut cursor_at: Option<(usize, usize)> = None;

        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Glyph::BASE_BG),
        )?;

        for y in 0..self.front.height {
            if off_y + y >= self.term_h { break; }
            for x in 0..self.front.width {
                if off_x + x >= self.term_w { break; }
                let g = self.front.get(x, y);
                if g == self.back.get(x, y) {
                    continue;
                }

                if cursor_at != Some((x, y)) {
                    queue!(self.writer, MoveTo((off_x + x) as u16, (off_y + y) as u16))?;
                }
                if g.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(g.fg))?;
                    last_fg = g.fg;
                }
                if g.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(g.bg))?;
                    last_bg = g.bg;
                }
                queue!(self.writer, Print(g.ch))?;
                cursor_at = Some((x + 1, y));
            }
        }

        self.writer.flush()
    }

    // ── Host-only screens and overlays ──

    /// One-line sensor readout under the maze.
    pub fn draw_hud(&mut self, line: &str) {
        self.front.clear_row(HUD_ROW);
        self.front.put_str(MAZE_LEFT, HUD_ROW, line, Color::White);
    }

    /// Latest round notice, just above the HUD.
    pub fn draw_notice(&mut self, text: &str) {
        self.front.clear_row(NOTICE_ROW);
        self.front.put_centered(NOTICE_ROW, text, HI);
    }

    pub fn show_sensor_missing(&mut self, err: &SensorError) {
        self.front.clear();
        self.front.put_centered(6, "uh-oh...", TITLE);
        self.front.put_centered(8, "seems like you're missing a sensor or two", Color::White);
        self.front.put_centered(10, &err.to_string(), Color::Red);
        self.front.put_centered(CANVAS_H - 2, "Ctrl-C  power off", DIM);
    }

    fn draw_title(&mut self, text: &str) {
        self.front.clear_row(TITLE_ROW);
        self.front.put_centered(TITLE_ROW, text, TITLE);
    }

    fn draw_help(&mut self, text: &str) {
        self.front.clear_row(HELP_ROW);
        self.front.put_centered(HELP_ROW, text, DIM);
    }

    /// Interior row `dy` of a tile, padded/truncated to the tile width.
    fn put_interior(&mut self, cell: Cell, dy: usize, text: &str, fg: Color) {
        let (x0, y0) = tile_origin(cell);
        for (i, ch) in format!("{:^w$}", text, w = TILE_W).chars().take(TILE_W).enumerate() {
            self.front.set(x0 + 1 + i, y0 + 1 + dy, Glyph::new(ch, fg));
        }
    }

    fn draw_walls(&mut self, grid: &Grid, cell: Cell) {
        let (x0, y0) = tile_origin(cell);
        let tile = grid.tile(cell);
        let pillar = Glyph::new('+', WALL);
        let horiz = Glyph::new('-', WALL);
        let vert = Glyph::new('|', WALL);

        for (dx, dy) in [(0, 0), (TILE_W + 1, 0), (0, TILE_H + 1), (TILE_W + 1, TILE_H + 1)] {
            self.front.set(x0 + dx, y0 + dy, pillar);
        }
        for dir in Direction::ALL {
            if tile.is_open(dir) {
                continue;
            }
            match dir {
                Direction::North => (1..=TILE_W).for_each(|dx| self.front.set(x0 + dx, y0, horiz)),
                Direction::South => (1..=TILE_W).for_each(|dx| self.front.set(x0 + dx, y0 + TILE_H + 1, horiz)),
                Direction::West => (1..=TILE_H).for_each(|dy| self.front.set(x0, y0 + dy, vert)),
                Direction::East => (1..=TILE_H).for_each(|dy| self.front.set(x0 + TILE_W + 1, y0 + dy, vert)),
            }
        }
    }

    fn draw_selection_rows(&mut self, selection: Selection) {
        for (row, label, chosen) in [(13, "map  ", selection.level), (14, "speed", selection.speed)] {
            self.front.clear_row(row);
            let mut x = 8;
            self.front.put_str(x, row, label, DIM);
            x += 7;
            for d in Difficulty::ALL {
                let text = if d == chosen { format!("[{}]", d.name()) } else { format!(" {} ", d.name()) };
                let fg = if d == chosen { HI } else { Color::White };
                self.front.put_str(x, row, &text, fg);
                x += text.len() + 1;
            }
        }
    }
}

impl RenderSurface for TerminalDisplay {
    fn draw_tile_cover(&mut self, cell: Cell) {
        for dy in 0..TILE_H {
            self.put_interior(cell, dy, "", Color::White);
        }
    }

    fn draw_token(&mut self, cell: Cell) {
        self.put_interior(cell, 1, "(@@)", TOKEN);
    }

    fn draw_tile(&mut self, cell: Cell, kind: TileKind) {
        match kind {
            TileKind::Walkable => {}
            TileKind::StartTile => self.put_interior(cell, 0, "start", DIM),
            TileKind::Flower => self.put_interior(cell, 0, "(::)", BUD),
            TileKind::Bloomed => self.put_interior(cell, 0, "\\(**)/", BLOOM),
            TileKind::Ice => {
                self.put_interior(cell, 0, "[####]", ICE);
                self.put_interior(cell, 1, "[####]", ICE);
            }
        }
    }

    fn draw_end_marker(&mut self, cell: Cell) {
        self.put_interior(cell, 0, "*END*", TITLE);
        self.draw_help("all flowers bloomed - head for the end!");
    }

    fn clear_and_draw_layout(&mut self, grid: &Grid) {
        self.front.clear();
        self.draw_title("Maze Time!");
        for cell in Grid::cells() {
            self.draw_walls(grid, cell);
            self.draw_tile(cell, grid.kind(cell));
        }
        self.draw_help("arrows/WASD tilt   L torch   T warm   Ctrl-C quit");
    }

    fn show_summary(&mut self, elapsed_ms: u64, level: Difficulty, speed: Difficulty) {
        self.front.clear();
        self.front.put_centered(4, "\\(**)/   \\(**)/   \\(**)/", BLOOM);
        self.front.put_centered(7, "You did it!", TITLE);
        self.front.put_centered(10, &format!("Time taken:  {}", format_elapsed(elapsed_ms)), Color::White);
        self.front.put_centered(12, &format!("Level:  {level}"), Color::White);
        self.front.put_centered(13, &format!("Speed:  {speed}"), Color::White);
        self.front.put_centered(17, "[ X ]  Exit", HI);
    }

    fn show_start(&mut self, selection: Selection) {
        self.front.clear();
        let title = [
            r" __  __                 _____ _                 _ ",
            r"|  \/  | __ _ ___ ___  |_   _(_)_ __ ___   ___ | |",
            r"| |\/| |/ _` |_  / _ \   | | | | '_ ` _ \ / _ \| |",
            r"| |  | | (_| |/ /  __/   | | | | | | | | |  __/|_|",
            r"|_|  |_|\__,_/___\___|   |_| |_|_| |_| |_|\___|(_)",
        ];
        for (i, line) in title.iter().enumerate() {
            self.front.put_centered(1 + i, line, TITLE);
        }
        self.front.put_centered(7, "(::)      \\(**)/      (::)", BUD);

        self.front.put_str(8, 10, "1 Easy   2 Medium   3 Hard   4 Extreme", Color::White);
        self.front.put_str(8, 11, "(sets map and speed together)", DIM);
        self.draw_selection_rows(selection);

        self.front.put_str(8, 17, "ENTER  start!", HI);
        self.front.put_str(8, 18, "  ?    how to play", Color::White);
        self.draw_help("M next map   V next speed   Ctrl-C quit");
    }

    fn draw_selection(&mut self, selection: Selection) {
        self.draw_selection_rows(selection);
    }

    fn show_instructions(&mut self) {
        self.front.clear();
        self.draw_title("How to play");
        let lines = [
            "Tilt the device to roll the ball through the maze.",
            "",
            "Flower buds block the way. Shine a light on each",
            "bud to make it bloom.",
            "",
            "Ice blocks freeze the ball. Warm the sensor up by",
            "two degrees to melt them and keep moving.",
            "",
            "Bloom every flower, then reach the end.",
        ];
        for (i, line) in lines.iter().enumerate() {
            self.front.put_str(5, 3 + i, line, Color::White);
        }
        self.front.put_str(5, 14, "(::) bud   \\(**)/ bloom   [####] ice", DIM);
        self.front.put_str(5, 17, "B B  back to start (double-tap)", HI);
        self.draw_help("on this host: arrows tilt, L torch, T warm");
    }
}
