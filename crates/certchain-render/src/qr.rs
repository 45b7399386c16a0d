use qrcode::{Color, QrCode};

use crate::error::RenderError;
use crate::pdf::Canvas;

/// Quiet-zone width in modules around the symbol.
const BORDER: usize = 2;

/// A QR symbol as a square grid of dark/light modules.
#[derive(Clone, Debug)]
pub struct QrMatrix {
    width: usize,
    dark: Vec<bool>,
}

impl QrMatrix {
    /// Encode `data` at the smallest version that fits.
    pub fn encode(data: &str) -> Result<Self, RenderError> {
        let code = QrCode::new(data.as_bytes()).map_err(|e| RenderError::Qr(e.to_string()))?;
        let width = code.width();
        let dark = code
            .to_colors()
            .into_iter()
            .map(|c| c == Color::Dark)
            .collect();
        Ok(Self { width, dark })
    }

    /// Modules per side, excluding the quiet zone.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        self.dark.get(y * self.width + x).copied().unwrap_or(false)
    }

    /// Draw the symbol (with quiet zone) into a `size` × `size` box whose
    /// bottom-left corner is at (`x`, `y`).
    pub fn draw(&self, canvas: &mut Canvas, x: f32, y: f32, size: f32) {
        let total = (self.width + 2 * BORDER) as f32;
        let module = size / total;
        let top = y + size;

        let rects = (0..self.width).flat_map(|row| {
            (0..self.width).filter_map(move |col| {
                self.is_dark(col, row).then(|| {
                    let mx = x + (col + BORDER) as f32 * module;
                    let my = top - (row + BORDER + 1) as f32 * module;
                    (mx, my, module, module)
                })
            })
        });
        canvas.fill_rects(rects);
    }
}
