use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use image::{ImageFormat, Rgb, RgbImage};

use crate::colormap::{score_color, BLACK, WHITE};
use crate::error::RenderError;
use crate::glyphs::{lit_pixels, GLYPH_HEIGHT, GLYPH_WIDTH};
use crate::grid::ScoreGrid;

pub const BASE_WIDTH: u32 = 500;
pub const BASE_HEIGHT: u32 = 400;

const LABELS: [[char; 2]; 2] = [['F', 'A'], ['I', 'R']];
const COLORBAR_LABEL: &str = "Score";

#[derive(Debug, Clone, Copy)]
pub struct HeatmapOptions {
    /// Canvas size as a percentage of the 500x400 base.
    pub scale: u32,
}

impl Default for HeatmapOptions {
    fn default() -> Self {
        Self { scale: 100 }
    }
}

impl HeatmapOptions {
    fn factor(self) -> f64 {
        f64::from(self.scale.clamp(10, 1000)) / 100.0
    }

    fn px(self, base: u32) -> u32 {
        ((f64::from(base) * self.factor()).round() as u32).max(1)
    }
}

/// `output-YYYYMMDD.png`
pub fn output_path_for(date: NaiveDate) -> PathBuf {
    PathBuf::from(format!("output-{}.png", date.format("%Y%m%d")))
}

pub fn default_output_path() -> PathBuf {
    output_path_for(chrono::Local::now().date_naive())
}

struct Layout {
    margin: u32,
    cell: u32,
    bar_x: u32,
    bar_width: u32,
    bar_top: u32,
    bar_height: u32,
    tick_len: u32,
    tick_px: u32,
    label_x: u32,
}

impl Layout {
    fn new(options: HeatmapOptions) -> Self {
        let margin = options.px(20);
        let side = options.px(BASE_HEIGHT) - 2 * margin;
        let cell = side / 2;
        let bar_x = margin + 2 * cell + options.px(30);
        let bar_width = options.px(18);
        let tick_len = options.px(5);
        let tick_px = options.px(2);
        // Widest tick label is "0.5".
        let tick_text = 3 * (GLYPH_WIDTH + 1) * tick_px;
        Self {
            margin,
            cell,
            bar_x,
            bar_width,
            bar_top: margin,
            bar_height: 2 * cell,
            tick_len,
            tick_px,
            label_x: bar_x + bar_width + tick_len + tick_px + tick_text + options.px(4),
        }
    }
}

/// Draws the heatmap: 2x2 colored cells labelled F, A, I, R, and a vertical
/// colorbar with ticks at 0, 0.5 and 1.
pub fn draw_heatmap(grid: &ScoreGrid, options: HeatmapOptions) -> RgbImage {
    let width = options.px(BASE_WIDTH);
    let height = options.px(BASE_HEIGHT);
    let layout = Layout::new(options);
    let mut img = RgbImage::from_pixel(width, height, WHITE);

    let letter_px = (layout.cell * 2 / 5 / GLYPH_HEIGHT).max(1);
    for (row, labels) in (0_u32..).zip(LABELS) {
        for (col, label) in (0_u32..).zip(labels) {
            let x = layout.margin + col * layout.cell;
            let y = layout.margin + row * layout.cell;
            let color = score_color(grid.value(row as usize, col as usize));
            fill_rect(&mut img, x, y, layout.cell, layout.cell, color);

            let text_x = x + (layout.cell - GLYPH_WIDTH * letter_px) / 2;
            let text_y = y + (layout.cell - GLYPH_HEIGHT * letter_px) / 2;
            draw_text(&mut img, &label.to_string(), text_x, text_y, letter_px, BLACK);
        }
    }

    draw_colorbar(&mut img, &layout);
    img
}

fn draw_colorbar(img: &mut RgbImage, layout: &Layout) {
    let span = layout.bar_height.saturating_sub(1).max(1);
    for dy in 0..layout.bar_height {
        let value = 1.0 - f64::from(dy) / f64::from(span);
        let color = score_color(Some(value));
        fill_rect(img, layout.bar_x, layout.bar_top + dy, layout.bar_width, 1, color);
    }
    stroke_rect(
        img,
        layout.bar_x,
        layout.bar_top,
        layout.bar_width,
        layout.bar_height,
        BLACK,
    );

    let (tick_len, tick_px) = (layout.tick_len, layout.tick_px);
    let right = layout.bar_x + layout.bar_width;
    for (label, fraction) in [("1", 0.0), ("0.5", 0.5), ("0", 1.0)] {
        let y = layout.bar_top + (f64::from(span) * fraction).round() as u32;
        fill_rect(img, right, y, tick_len, 1, BLACK);
        let text_y = y.saturating_sub(GLYPH_HEIGHT * tick_px / 2);
        draw_text(img, label, right + tick_len + tick_px, text_y, tick_px, BLACK);
    }

    // Axis title runs bottom to top, centered on the bar.
    let label_len = text_len(COLORBAR_LABEL) * (GLYPH_WIDTH + 1) * tick_px;
    let bottom = layout.bar_top + layout.bar_height / 2 + label_len / 2;
    draw_text_upward(img, COLORBAR_LABEL, layout.label_x, bottom, tick_px, BLACK);
}

fn text_len(text: &str) -> u32 {
    u32::try_from(text.chars().count()).unwrap_or(u32::MAX)
}

fn fill_rect(img: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, color: Rgb<u8>) {
    let x_end = x.saturating_add(w).min(img.width());
    let y_end = y.saturating_add(h).min(img.height());
    for py in y..y_end {
        for px in x..x_end {
            img.put_pixel(px, py, color);
        }
    }
}

fn stroke_rect(img: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, color: Rgb<u8>) {
    fill_rect(img, x, y, w, 1, color);
    fill_rect(img, x, y + h.saturating_sub(1), w, 1, color);
    fill_rect(img, x, y, 1, h, color);
    fill_rect(img, x + w.saturating_sub(1), y, 1, h, color);
}

fn draw_text(img: &mut RgbImage, text: &str, x: u32, y: u32, px: u32, color: Rgb<u8>) {
    let advance = (GLYPH_WIDTH + 1) * px;
    for (i, c) in (0_u32..).zip(text.chars()) {
        let origin = x + i * advance;
        for (col, row) in lit_pixels(c) {
            fill_rect(img, origin + col * px, y + row * px, px, px, color);
        }
    }
}

/// Text rotated a quarter turn counter-clockwise; `bottom` is where the
/// first character starts.
fn draw_text_upward(img: &mut RgbImage, text: &str, x: u32, bottom: u32, px: u32, color: Rgb<u8>) {
    let advance = (GLYPH_WIDTH + 1) * px;
    for (i, c) in (0_u32..).zip(text.chars()) {
        let Some(top) = bottom.checked_sub(i * advance + GLYPH_WIDTH * px) else {
            return;
        };
        for (col, row) in lit_pixels(c) {
            let y = top + (GLYPH_WIDTH - 1 - col) * px;
            fill_rect(img, x + row * px, y, px, px, color);
        }
    }
}

/// Validated grid in, PNG out. Writes to `output` when given, otherwise to
/// `output-YYYYMMDD.png` in the working directory.
pub fn render_heatmap(
    grid: &ScoreGrid,
    output: Option<&Path>,
    options: HeatmapOptions,
) -> Result<PathBuf, RenderError> {
    let path = output.map_or_else(default_output_path, Path::to_path_buf);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let img = draw_heatmap(grid, options);
    img.save_with_format(&path, ImageFormat::Png)?;
    tracing::info!(path = %path.display(), "heatmap saved");
    Ok(path)
}

/// Checks raw rows against the 2x2 / at-most-one contract, then renders.
pub fn render_rows<R: AsRef<[f64]>>(
    rows: &[R],
    output: Option<&Path>,
    options: HeatmapOptions,
) -> Result<PathBuf, RenderError> {
    let grid = ScoreGrid::from_rows(rows).map_err(|err| {
        tracing::error!(error = %err, "rejected heatmap input");
        err
    })?;
    render_heatmap(&grid, output, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colormap::{BLUE, RED};

    fn grid(values: [f64; 4]) -> ScoreGrid {
        ScoreGrid::from_flat(&values).expect("valid grid")
    }

    #[test]
    fn canvas_follows_scale() {
        let img = draw_heatmap(&grid([0.0; 4]), HeatmapOptions::default());
        assert_eq!(img.dimensions(), (500, 400));

        let img = draw_heatmap(&grid([0.0; 4]), HeatmapOptions { scale: 50 });
        assert_eq!(img.dimensions(), (250, 200));
    }

    #[test]
    fn cells_are_colored_by_score() {
        let img = draw_heatmap(&grid([0.0, 1.0, -1.0, 0.5]), HeatmapOptions::default());
        let layout = Layout::new(HeatmapOptions::default());
        // Sample near each cell's top-left corner, away from the letter.
        let at = |row: u32, col: u32| {
            *img.get_pixel(
                layout.margin + col * layout.cell + 3,
                layout.margin + row * layout.cell + 3,
            )
        };
        assert_eq!(at(0, 0), BLUE);
        assert_eq!(at(0, 1), RED);
        assert_eq!(at(1, 0), WHITE);
        assert_eq!(at(1, 1), WHITE);
    }

    #[test]
    fn letters_are_drawn_in_black() {
        let img = draw_heatmap(&grid([1.0; 4]), HeatmapOptions::default());
        let layout = Layout::new(HeatmapOptions::default());
        let cell = (layout.margin, layout.margin, layout.cell);
        let black = (cell.0..cell.0 + cell.2)
            .flat_map(|x| (cell.1..cell.1 + cell.2).map(move |y| (x, y)))
            .filter(|&(x, y)| *img.get_pixel(x, y) == BLACK)
            .count();
        assert!(black > 0);
    }

    #[test]
    fn colorbar_runs_red_to_blue() {
        let layout = Layout::new(HeatmapOptions::default());
        let img = draw_heatmap(&grid([0.0; 4]), HeatmapOptions::default());
        let x = layout.bar_x + layout.bar_width / 2;
        assert_eq!(*img.get_pixel(x, layout.bar_top + 1), Rgb([255, 1, 1]));
        assert_eq!(
            *img.get_pixel(x, layout.bar_top + layout.bar_height - 2),
            Rgb([1, 1, 255])
        );
    }

    #[test]
    fn colorbar_has_vertical_title() {
        let options = HeatmapOptions::default();
        let layout = Layout::new(options);
        let img = draw_heatmap(&grid([0.0; 4]), options);
        assert!(layout.label_x + GLYPH_HEIGHT * layout.tick_px <= img.width());

        let title: Vec<(u32, u32)> = (layout.label_x..img.width())
            .flat_map(|x| (0..img.height()).map(move |y| (x, y)))
            .filter(|&(x, y)| *img.get_pixel(x, y) == BLACK)
            .collect();
        assert!(!title.is_empty());

        // Rotated text is taller than wide.
        let span = |pick: fn(&(u32, u32)) -> u32| {
            let lo = title.iter().map(pick).min().unwrap_or(0);
            let hi = title.iter().map(pick).max().unwrap_or(0);
            hi - lo
        };
        assert!(span(|p| p.1) > span(|p| p.0));
    }

    #[test]
    fn default_path_uses_date() {
        let date = NaiveDate::from_ymd_opt(2025, 7, 4).expect("valid date");
        assert_eq!(output_path_for(date), PathBuf::from("output-20250704.png"));
    }

    #[test]
    fn renders_png_to_requested_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let target = dir.path().join("plots").join("fair.png");

        let path = render_heatmap(&grid([0.8, 1.0, 1.0, 0.4]), Some(&target), HeatmapOptions::default())
            .expect("render");
        assert_eq!(path, target);

        let bytes = fs::read(&path).expect("read png");
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn invalid_rows_never_touch_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let target = dir.path().join("bad.png");

        let err = render_rows(&[[0.5, 1.5], [0.1, 0.2]], Some(&target), HeatmapOptions::default())
            .expect_err("value above one");
        assert!(matches!(err, RenderError::OutOfRange { row: 0, col: 1, .. }));
        assert!(!target.exists());

        let rows: Vec<Vec<f64>> = vec![vec![0.1, 0.2, 0.3, 0.4]];
        assert!(matches!(
            render_rows(&rows, Some(&target), HeatmapOptions::default()),
            Err(RenderError::Shape(_))
        ));
    }
}
