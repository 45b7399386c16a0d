//! Minimal single-purpose PDF object writer.
//!
//! Produces PDF 1.4 files using the standard Type1 Helvetica faces (no font
//! embedding), uncompressed content streams and raw RGB image XObjects.

use std::fmt::Write as _;

/// Standard fonts available to a [`Canvas`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Font {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
}

impl Font {
    const ALL: [Font; 3] = [Font::Helvetica, Font::HelveticaBold, Font::HelveticaOblique];

    fn resource_name(&self) -> &'static str {
        match self {
            Self::Helvetica => "F1",
            Self::HelveticaBold => "F2",
            Self::HelveticaOblique => "F3",
        }
    }

    fn base_font(&self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
            Self::HelveticaOblique => "Helvetica-Oblique",
        }
    }

    /// Approximate advance width of `text` in points.
    ///
    /// Uses the Helvetica metrics for every face, which is close enough to
    /// center a line of text.
    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        let units: u32 = text.chars().map(glyph_width).sum();
        let scale = if *self == Self::HelveticaBold { 1.05 } else { 1.0 };
        units as f32 * size * scale / 1000.0
    }
}

/// Helvetica advance widths (1/1000 em) for printable ASCII.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

fn glyph_width(c: char) -> u32 {
    let code = c as u32;
    if (32..127).contains(&code) {
        HELVETICA_WIDTHS[(code - 32) as usize] as u32
    } else {
        556
    }
}

/// Escape a string for a PDF literal string in WinAnsi encoding.
fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '(' | ')' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            c if (c as u32) >= 0xA0 && (c as u32) <= 0xFF => {
                let _ = write!(out, "\\{:03o}", c as u32);
            }
            c => match win_ansi_high(c) {
                Some(code) => {
                    let _ = write!(out, "\\{code:03o}");
                }
                None => out.push('?'),
            },
        }
    }
    out
}

/// WinAnsiEncoding codes 0x80..=0x9F, which differ from Latin-1.
fn win_ansi_high(c: char) -> Option<u8> {
    let code = match c {
        '\u{20AC}' => 0x80,
        '\u{201A}' => 0x82,
        '\u{0192}' => 0x83,
        '\u{201E}' => 0x84,
        '\u{2026}' => 0x85,
        '\u{2020}' => 0x86,
        '\u{2021}' => 0x87,
        '\u{02C6}' => 0x88,
        '\u{2030}' => 0x89,
        '\u{0160}' => 0x8A,
        '\u{2039}' => 0x8B,
        '\u{0152}' => 0x8C,
        '\u{017D}' => 0x8E,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{02DC}' => 0x98,
        '\u{2122}' => 0x99,
        '\u{0161}' => 0x9A,
        '\u{203A}' => 0x9B,
        '\u{0153}' => 0x9C,
        '\u{017E}' => 0x9E,
        '\u{0178}' => 0x9F,
        _ => return None,
    };
    Some(code)
}

/// A decoded raster image ready to embed as an RGB XObject.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    /// Row-major RGB triples, `width * height * 3` bytes.
    pub rgb: Vec<u8>,
}

/// Page drawing surface. Coordinates are points from the bottom-left corner.
pub struct Canvas {
    width: f32,
    height: f32,
    ops: String,
    images: Vec<RasterImage>,
}

impl Canvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ops: String::new(),
            images: Vec::new(),
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn set_line_width(&mut self, width: f32) {
        let _ = writeln!(self.ops, "{width:.2} w");
    }

    pub fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let _ = writeln!(self.ops, "{x:.2} {y:.2} {w:.2} {h:.2} re S");
    }

    /// Fill several rectangles in black with one paint operation.
    pub fn fill_rects(&mut self, rects: impl IntoIterator<Item = (f32, f32, f32, f32)>) {
        self.ops.push_str("0 g\n");
        let mut any = false;
        for (x, y, w, h) in rects {
            let _ = writeln!(self.ops, "{x:.3} {y:.3} {w:.3} {h:.3} re");
            any = true;
        }
        if any {
            self.ops.push_str("f\n");
        }
    }

    pub fn draw_string(&mut self, font: Font, size: f32, x: f32, y: f32, text: &str) {
        let _ = writeln!(
            self.ops,
            "BT /{} {size:.1} Tf {x:.2} {y:.2} Td ({}) Tj ET",
            font.resource_name(),
            escape_text(text)
        );
    }

    /// Draw `text` horizontally centered on `center_x`.
    pub fn draw_centred_string(&mut self, font: Font, size: f32, center_x: f32, y: f32, text: &str) {
        let x = center_x - font.text_width(text, size) / 2.0;
        self.draw_string(font, size, x, y, text);
    }

    /// Place `image` scaled into the box at (`x`, `y`) of size `w` × `h`.
    pub fn draw_image(&mut self, image: &RasterImage, x: f32, y: f32, w: f32, h: f32) {
        let name = format!("Im{}", self.images.len() + 1);
        self.images.push(image.clone());
        let _ = writeln!(self.ops, "q {w:.2} 0 0 {h:.2} {x:.2} {y:.2} cm /{name} Do Q");
    }

    /// Draw `image` inside the box keeping its aspect ratio, anchored bottom-left.
    pub fn draw_image_fit(&mut self, image: &RasterImage, x: f32, y: f32, w: f32, h: f32) {
        if image.width == 0 || image.height == 0 {
            return;
        }
        let scale = (w / image.width as f32).min(h / image.height as f32);
        self.draw_image(
            image,
            x,
            y,
            image.width as f32 * scale,
            image.height as f32 * scale,
        );
    }

    /// Serialize a one-page document containing this canvas.
    pub fn finish(self) -> Vec<u8> {
        let mut doc = ObjectWriter::default();

        // Object numbers are assigned in insertion order starting at 1:
        // catalog, pages, page, then fonts, images and content.
        let catalog = doc.reserve();
        let pages = doc.reserve();
        let page = doc.reserve();

        let mut font_refs = String::new();
        for font in Font::ALL {
            let id = doc.add(format!(
                "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                font.base_font()
            ));
            let _ = write!(font_refs, "/{} {id} 0 R ", font.resource_name());
        }

        let mut image_refs = String::new();
        for (i, image) in self.images.iter().enumerate() {
            let id = doc.add_stream(
                &format!(
                    "/Type /XObject /Subtype /Image /Width {} /Height {} /ColorSpace /DeviceRGB /BitsPerComponent 8",
                    image.width, image.height
                ),
                &image.rgb,
            );
            let _ = write!(image_refs, "/Im{} {id} 0 R ", i + 1);
        }

        let content = doc.add_stream("", self.ops.as_bytes());

        doc.set(catalog, format!("<< /Type /Catalog /Pages {pages} 0 R >>"));
        doc.set(pages, format!("<< /Type /Pages /Kids [{page} 0 R] /Count 1 >>"));
        doc.set(
            page,
            format!(
                "<< /Type /Page /Parent {pages} 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Resources << /Font << {font_refs}>> /XObject << {image_refs}>> >> \
                 /Contents {content} 0 R >>",
                self.width, self.height
            ),
        );

        doc.finish(catalog)
    }
}

#[derive(Default)]
struct ObjectWriter {
    objects: Vec<Vec<u8>>,
}

impl ObjectWriter {
    fn reserve(&mut self) -> usize {
        self.objects.push(Vec::new());
        self.objects.len()
    }

    fn set(&mut self, id: usize, body: String) {
        self.objects[id - 1] = body.into_bytes();
    }

    fn add(&mut self, body: String) -> usize {
        self.objects.push(body.into_bytes());
        self.objects.len()
    }

    fn add_stream(&mut self, dict: &str, data: &[u8]) -> usize {
        let mut body = format!("<< /Length {} {dict}>>\nstream\n", data.len()).into_bytes();
        body.extend_from_slice(data);
        body.extend_from_slice(b"\nendstream");
        self.objects.push(body);
        self.objects.len()
    }

    fn finish(self, root: usize) -> Vec<u8> {
        let mut out: Vec<u8> = b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n".to_vec();
        let mut offsets = Vec::with_capacity(self.objects.len());

        for (i, body) in self.objects.iter().enumerate() {
            offsets.push(out.len());
            out.extend_from_slice(format!("{} 0 obj\n", i + 1).as_bytes());
            out.extend_from_slice(body);
            out.extend_from_slice(b"\nendobj\n");
        }

        let xref_offset = out.len();
        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", self.objects.len() + 1);
        for offset in offsets {
            let _ = write!(xref, "{offset:010} 00000 n \n");
        }
        let _ = write!(
            xref,
            "trailer\n<< /Size {} /Root {root} 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
            self.objects.len() + 1
        );
        out.extend_from_slice(xref.as_bytes());
        out
    }
}
