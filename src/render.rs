use std::fs;
use std::path::Path;

use lintrans::library::*;
use lintrans::{PointSet, Transform2D, TransformMatrix, VectorSpaceKind};
use sdl2::gfx::primitives::DrawRenderer;
use sdl2::pixels::{Color, PixelFormatEnum};
use sdl2::render::{Canvas, RenderTarget};
use sdl2::surface::Surface;

/// Side length of one plot panel in pixels
const PANEL: u32 = 600;
/// Height of the caption strip above the panels
const HEADER: u32 = 120;
const MARGIN: i32 = 20;
/// Headroom left around the furthest point
const PADDING: f64 = 1.15;
const ARROW_HEAD: f64 = 14.0;
/// Glyph size of the SDL_gfx built-in font
const GLYPH: i32 = 8;

const BACKGROUND: Color = Color::RGB(255, 255, 255);
const GRID: Color = Color::RGB(225, 225, 225);
const AXES: Color = Color::RGB(120, 120, 120);
const TEXT: Color = Color::RGB(20, 20, 20);
const SOURCE: Color = Color::RGB(30, 60, 200);
const IMAGE: Color = Color::RGB(200, 30, 30);
const I_HAT: Color = Color::RGB(0, 150, 0);
const J_HAT: Color = Color::RGB(240, 150, 0);

fn to_abgr(color: Color) -> Color {
    Color::RGBA(color.a, color.b, color.g, color.r)
}

/// A square region of the canvas mapped onto `[-extent, extent]` in both axes.
struct Panel {
    left: i32,
    top: i32,
    size: i32,
    extent: f64,
}

impl Panel {
    fn to_screen(&self, point: Vector2) -> [i16; 2] {
        let half = self.size as f64 / 2.0;
        let scale = half / self.extent;
        let x = self.left as f64 + half + point[0] * scale;
        let y = self.top as f64 + half - point[1] * scale;
        [x.round() as i16, y.round() as i16]
    }

    fn draw_frame<T: RenderTarget>(&self, canvas: &mut Canvas<T>, title: &str) -> Result<(), String> {
        let step = grid_step(self.extent);
        let lines = (self.extent / step).floor() as i32;
        for k in -lines..=lines {
            let v = k as f64 * step;
            let [x, y0] = self.to_screen([v, self.extent]);
            let [_, y1] = self.to_screen([v, -self.extent]);
            canvas.line(x, y0, x, y1, to_abgr(GRID))?;
            let [x0, y] = self.to_screen([-self.extent, v]);
            let [x1, _] = self.to_screen([self.extent, v]);
            canvas.line(x0, y, x1, y, to_abgr(GRID))?;
        }
        let [x0, y0] = self.to_screen([-self.extent, 0.0]);
        let [x1, _] = self.to_screen([self.extent, 0.0]);
        canvas.line(x0, y0, x1, y0, to_abgr(AXES))?;
        let [xa, ya] = self.to_screen([0.0, self.extent]);
        let [_, yb] = self.to_screen([0.0, -self.extent]);
        canvas.line(xa, ya, xa, yb, to_abgr(AXES))?;
        canvas.rectangle(
            self.left as i16,
            self.top as i16,
            (self.left + self.size) as i16,
            (self.top + self.size) as i16,
            to_abgr(AXES),
        )?;
        canvas.string(
            (self.left + GLYPH) as i16,
            (self.top + GLYPH) as i16,
            title,
            to_abgr(TEXT),
        )
    }

    fn draw_points<T: RenderTarget>(
        &self,
        canvas: &mut Canvas<T>,
        points: &PointSet,
        space: VectorSpaceKind,
        color: Color,
    ) -> Result<(), String> {
        let screen: Vec<[i16; 2]> = points.iter().map(|p| self.to_screen(p)).collect();
        match space {
            VectorSpaceKind::Rectangular => {
                for [x, y] in screen {
                    canvas.filled_circle(x, y, 3, to_abgr(color))?;
                }
            }
            VectorSpaceKind::Circular => {
                for pair in screen.windows(2) {
                    let ([x1, y1], [x2, y2]) = (pair[0], pair[1]);
                    canvas.thick_line(x1, y1, x2, y2, 2, to_abgr(color))?;
                }
                for [x, y] in screen {
                    canvas.filled_circle(x, y, 2, to_abgr(color))?;
                }
            }
        }
        Ok(())
    }

    fn draw_arrow<T: RenderTarget>(&self, canvas: &mut Canvas<T>, tip: Vector2, color: Color) -> Result<(), String> {
        let [ox, oy] = self.to_screen([0.0, 0.0]);
        let [tx, ty] = self.to_screen(tip);
        canvas.thick_line(ox, oy, tx, ty, 3, to_abgr(color))?;

        let start = [ox as f64, oy as f64];
        let end = [tx as f64, ty as f64];
        let vec = find_vector(start, end);
        if get_magnitude(vec) < ARROW_HEAD {
            return Ok(());
        }
        let dir = normalize(vec);
        let side = find_normal(start, end);
        let base = [end[0] - dir[0] * ARROW_HEAD, end[1] - dir[1] * ARROW_HEAD];
        let half = ARROW_HEAD / 2.5;
        let left = [base[0] + side[0] * half, base[1] + side[1] * half];
        let right = [base[0] - side[0] * half, base[1] - side[1] * half];
        canvas.filled_trigon(
            tx,
            ty,
            left[0] as i16,
            left[1] as i16,
            right[0] as i16,
            right[1] as i16,
            to_abgr(color),
        )
    }
}

/// Spacing for grid lines: 0.25, 0.5, 1, 2, 5, ... so a panel shows 4 to 10 of them per side.
fn grid_step(extent: f64) -> f64 {
    let raw = extent / 4.0;
    let magnitude = 10f64.powf(raw.log10().floor());
    [1.0, 2.0, 2.5, 5.0, 10.0]
        .into_iter()
        .map(|m| m * magnitude)
        .find(|step| *step >= raw)
        .unwrap_or(10.0 * magnitude)
}

fn caption(transform: &Transform2D) -> Vec<String> {
    let [[a, b], [c, d]] = transform.matrix().rows();
    vec![
        format!("{} Transformation", transform.kind().title()),
        "Transformation Matrix A:".to_string(),
        format!("[ {a:8.3}  {b:8.3} ]"),
        format!("[ {c:8.3}  {d:8.3} ]"),
        format!("det(A) = {:.3}", transform.determinant()),
    ]
}

fn view_extent(transform: &Transform2D) -> f64 {
    let basis = transform
        .matrix()
        .basis_images()
        .into_iter()
        .map(get_magnitude)
        .fold(1.0, f64::max);
    transform
        .source()
        .extent()
        .max(transform.image().extent())
        .max(basis)
        * PADDING
}

fn draw_basis<T: RenderTarget>(canvas: &mut Canvas<T>, panel: &Panel, matrix: &TransformMatrix) -> Result<(), String> {
    let [i_hat, j_hat] = matrix.basis_images();
    panel.draw_arrow(canvas, i_hat, I_HAT)?;
    panel.draw_arrow(canvas, j_hat, J_HAT)
}

/// Draws the original and transformed vector spaces side by side.
pub fn draw_transform<T: RenderTarget>(canvas: &mut Canvas<T>, transform: &Transform2D) -> Result<(), String> {
    canvas.set_draw_color(BACKGROUND);
    canvas.clear();

    let width = (PANEL * 2) as i32 + MARGIN * 3;
    for (row, line) in caption(transform).iter().enumerate() {
        let x = (width - line.len() as i32 * GLYPH) / 2;
        let y = MARGIN + row as i32 * (GLYPH + 8);
        canvas.string(x as i16, y as i16, line, to_abgr(TEXT))?;
    }

    // both panels share a scale so the picture shows how far points moved
    let extent = view_extent(transform);
    let original = Panel {
        left: MARGIN,
        top: HEADER as i32,
        size: PANEL as i32,
        extent,
    };
    let transformed = Panel {
        left: MARGIN * 2 + PANEL as i32,
        ..original
    };
    let space = transform.vector_space();

    original.draw_frame(canvas, "Original Vector Space")?;
    original.draw_points(canvas, transform.source(), space, SOURCE)?;
    draw_basis(canvas, &original, &TransformMatrix::identity())?;

    transformed.draw_frame(canvas, "Transformed Vector Space")?;
    transformed.draw_points(canvas, transform.image(), space, IMAGE)?;
    draw_basis(canvas, &transformed, transform.matrix())
}

pub fn canvas_size() -> (u32, u32) {
    (PANEL * 2 + MARGIN as u32 * 3, HEADER + PANEL + MARGIN as u32)
}

/// Renders `transform` into an off-screen surface and saves it as a BMP at `path`.
pub fn render_to_file(transform: &Transform2D, path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| e.to_string())?;
    }
    let (width, height) = canvas_size();
    let surface = Surface::new(width, height, PixelFormatEnum::RGB888)?;
    let mut canvas = surface.into_canvas()?;
    draw_transform(&mut canvas, transform)?;
    canvas.present();
    canvas.into_surface().save_bmp(path)
}
