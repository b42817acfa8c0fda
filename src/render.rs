//! Rasterize a phase grid.
//!
//! Temperature runs left to right. Pressure runs bottom to top, so grid row 0
//! (lowest pressure) is the bottom block row of the image. Each grid cell is a
//! uniform `cell_size x cell_size` block; nothing is interpolated.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::{ImageBuffer, ImageFormat, Rgb, RgbImage};
use tracing::debug;

use crate::error::{PhaseDiagramError, Result};
use crate::font::{self, GLYPH_HEIGHT};
use crate::palette::PhaseColorMap;
use crate::phase_grid::PhaseGrid;

/// Largest accepted `cell_size`
pub const MAX_CELL_SIZE: u32 = 256;
/// Upper bound on plot pixels (about 800 MB as RGB)
pub const MAX_PLOT_PIXELS: u64 = 1 << 28;

const MARGIN: u32 = 8;
const SWATCH: u32 = 9;
const LEGEND_ROW: u32 = 12;
const LINE_GAP: u32 = 4;

const BACKGROUND: Rgb<u8> = Rgb([30, 30, 35]);
const FRAME: Rgb<u8> = Rgb([90, 90, 90]);
const TEXT: Rgb<u8> = Rgb([220, 220, 220]);

/// Rendering configuration
#[derive(Clone, Copy, Debug)]
pub struct RenderOptions {
    /// Pixels per grid cell along each side; 0 is treated as 1
    pub cell_size: u32,
    /// Add title, axis ranges and a legend panel around the plot
    pub annotate: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            cell_size: 1,
            annotate: false,
        }
    }
}

impl RenderOptions {
    fn cell(&self) -> u32 {
        self.cell_size.max(1)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cell_size > MAX_CELL_SIZE {
            return Err(PhaseDiagramError::InvalidConfig(format!(
                "cell size must be at most {MAX_CELL_SIZE}, got {}",
                self.cell_size
            )));
        }
        Ok(())
    }
}

/// Plot size in pixels, refusing anything over `MAX_PLOT_PIXELS`.
pub fn plot_dimensions(grid: &PhaseGrid, cell_size: u32) -> Result<(u32, u32)> {
    let cell = u64::from(cell_size.max(1));
    let too_large = || {
        PhaseDiagramError::InvalidConfig(format!(
            "{}x{} grid at cell size {cell} needs more than {MAX_PLOT_PIXELS} pixels",
            grid.columns(),
            grid.rows()
        ))
    };

    let width = (grid.columns() as u64).checked_mul(cell).ok_or_else(too_large)?;
    let height = (grid.rows() as u64).checked_mul(cell).ok_or_else(too_large)?;
    match width.checked_mul(height) {
        Some(pixels) if pixels <= MAX_PLOT_PIXELS => {
            let width = u32::try_from(width).map_err(|_| too_large())?;
            let height = u32::try_from(height).map_err(|_| too_large())?;
            Ok((width, height))
        }
        _ => Err(too_large()),
    }
}

/// Render according to `options`.
pub fn render(grid: &PhaseGrid, colors: &PhaseColorMap, options: &RenderOptions) -> Result<RgbImage> {
    options.validate()?;
    plot_dimensions(grid, options.cell())?;

    Ok(if options.annotate {
        render_annotated(grid, colors, options.cell())
    } else {
        render_phase_map(grid, colors, options.cell())
    })
}

/// Bare plot: one block per grid cell, nothing else. Sizes are checked by `render`.
fn render_phase_map(grid: &PhaseGrid, colors: &PhaseColorMap, cell_size: u32) -> RgbImage {
    let cells = grid
        .phase_map()
        .map(|&id| colors.color(id))
        .upscale_blocks(cell_size.max(1) as usize);
    let mut img: RgbImage = ImageBuffer::new(cells.width as u32, cells.height as u32);

    for (x, y, &color) in cells.iter() {
        // Flip so pressure increases upward
        let img_y = cells.height - 1 - y;
        img.put_pixel(x as u32, img_y as u32, color);
    }

    img
}

/// Where things go in an annotated image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct AnnotatedLayout {
    pub width: u32,
    pub height: u32,
    /// Top-left corner of the plot
    pub plot_x: u32,
    pub plot_y: u32,
    pub plot_width: u32,
    pub plot_height: u32,
    /// Top-left corner of the legend panel
    pub legend_x: u32,
    pub legend_y: u32,
}

fn axis_label(name: &str, values: &[f64]) -> String {
    match (values.first(), values.last()) {
        (Some(lo), Some(hi)) => format!("{name} {lo} - {hi}"),
        _ => name.to_string(),
    }
}

fn temperature_label(grid: &PhaseGrid) -> String {
    axis_label("T(K)", grid.temperatures())
}

fn pressure_label(grid: &PhaseGrid) -> String {
    axis_label("P(GPa)", grid.pressures())
}

const TITLE: &str = "PHASE DIAGRAM";

fn annotated_layout(grid: &PhaseGrid, colors: &PhaseColorMap, cell_size: u32) -> AnnotatedLayout {
    let cell = cell_size.max(1);
    let plot_width = grid.columns() as u32 * cell;
    let plot_height = grid.rows() as u32 * cell;

    let plot_x = MARGIN;
    let plot_y = MARGIN + GLYPH_HEIGHT + MARGIN;

    let legend_text = colors.iter().map(|(name, _)| font::text_width(name)).max().unwrap_or(0);
    let legend_width = SWATCH + LINE_GAP + legend_text;
    let legend_height = colors.len() as u32 * LEGEND_ROW;
    let legend_x = plot_x + plot_width + MARGIN * 2;
    let legend_y = plot_y;

    let labels_width = [
        font::text_width(TITLE),
        font::text_width(&temperature_label(grid)),
        font::text_width(&pressure_label(grid)),
    ]
    .into_iter()
    .max()
    .unwrap_or(0);

    let width = (legend_x + legend_width + MARGIN).max(plot_x + labels_width + MARGIN);
    let body = plot_height.max(legend_height);
    let footer = MARGIN + 2 * (GLYPH_HEIGHT + LINE_GAP);
    let height = plot_y + body + footer;

    AnnotatedLayout {
        width,
        height,
        plot_x,
        plot_y,
        plot_width,
        plot_height,
        legend_x,
        legend_y,
    }
}

/// Plot framed by a title, axis ranges and a legend of every phase.
fn render_annotated(grid: &PhaseGrid, colors: &PhaseColorMap, cell_size: u32) -> RgbImage {
    let layout = annotated_layout(grid, colors, cell_size);
    let plot = render_phase_map(grid, colors, cell_size);
    let mut img: RgbImage = ImageBuffer::from_pixel(layout.width, layout.height, BACKGROUND);

    font::draw_text(&mut img, TITLE, layout.plot_x, MARGIN, TEXT);

    // Frame just outside the plot
    let (x0, y0) = (layout.plot_x - 1, layout.plot_y - 1);
    let (x1, y1) = (layout.plot_x + layout.plot_width, layout.plot_y + layout.plot_height);
    for x in x0..=x1 {
        img.put_pixel(x, y0, FRAME);
        img.put_pixel(x, y1, FRAME);
    }
    for y in y0..=y1 {
        img.put_pixel(x0, y, FRAME);
        img.put_pixel(x1, y, FRAME);
    }

    for (x, y, pixel) in plot.enumerate_pixels() {
        img.put_pixel(layout.plot_x + x, layout.plot_y + y, *pixel);
    }

    let body = layout.plot_height.max(colors.len() as u32 * LEGEND_ROW);
    let label_y = layout.plot_y + body + MARGIN;
    font::draw_text(&mut img, &temperature_label(grid), layout.plot_x, label_y, TEXT);
    font::draw_text(
        &mut img,
        &pressure_label(grid),
        layout.plot_x,
        label_y + GLYPH_HEIGHT + LINE_GAP,
        TEXT,
    );

    for (i, (name, color)) in colors.iter().enumerate() {
        let y = layout.legend_y + i as u32 * LEGEND_ROW;
        for dy in 0..SWATCH {
            for dx in 0..SWATCH {
                let edge = dx == 0 || dy == 0 || dx == SWATCH - 1 || dy == SWATCH - 1;
                img.put_pixel(layout.legend_x + dx, y + dy, if edge { TEXT } else { color });
            }
        }
        font::draw_text(&mut img, name, layout.legend_x + SWATCH + LINE_GAP, y + 1, TEXT);
    }

    img
}

/// Encode an image in memory.
pub fn encode_image(img: &RgbImage, format: ImageFormat) -> std::result::Result<Vec<u8>, image::ImageError> {
    let mut bytes: Vec<u8> = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), format)?;
    Ok(bytes)
}

/// Write an image, picking the format from the file extension.
///
/// Encoding happens in memory first, so a failed encode never leaves a
/// partial file behind.
pub fn write_image(img: &RgbImage, path: &Path) -> Result<()> {
    let format = ImageFormat::from_path(path).map_err(|_| PhaseDiagramError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    let bytes = encode_image(img, format).map_err(|source| PhaseDiagramError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, &bytes).map_err(|source| PhaseDiagramError::OutputWrite {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Wrote {} bytes ({:?}) to {}", bytes.len(), format, path.display());
    Ok(())
}
