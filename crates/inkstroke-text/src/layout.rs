//! Glyph layout for bitmap/MSDF fonts.
//!
//! Lays a string out with a [`FontDescriptor`] into per-glyph quads in font
//! pixel units. The coordinate system follows the BMFont convention: `+x`
//! right, `+y` down, with the last line's baseline at `y = 0`.

use inkstroke_core::math::{Aabb, Vec2, Vec3};

use crate::font::{FontDescriptor, Glyph};

const SPACE: u32 = ' ' as u32;
const TAB: u32 = '\t' as u32;
const FALLBACK: u32 = '?' as u32;
const TAB_SIZE: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Layout options.
#[derive(Debug, Clone)]
pub struct TextLayout {
    pub text: String,
    /// Extra advance after every glyph.
    pub letter_spacing: f32,
    /// Defaults to the descriptor's line height.
    pub line_height: Option<f32>,
    pub align: Align,
    /// Greedy word-wrap width. `None` only breaks on `\n`.
    pub width: Option<f32>,
}

impl TextLayout {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            letter_spacing: 0.0,
            line_height: None,
            align: Align::Left,
            width: None,
        }
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn letter_spacing(mut self, spacing: f32) -> Self {
        self.letter_spacing = spacing;
        self
    }

    pub fn line_height(mut self, line_height: f32) -> Self {
        self.line_height = Some(line_height);
        self
    }

    /// Lay out the text into geometry.
    pub fn build(&self, font: &FontDescriptor) -> TextGeometry {
        LayoutBuilder::new(self, font).build()
    }
}

/// One vertex of a glyph quad.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TextVertex {
    pub position: [f32; 2],
    /// Atlas coordinates, `v` down.
    pub uv: [f32; 2],
    /// Position normalized to the layout bounds.
    pub layout_uv: [f32; 2],
    /// Center of the glyph quad.
    pub center: [f32; 2],
    pub letter_index: f32,
    pub line_index: f32,
    pub word_index: f32,
    pub line_letter_index: f32,
}

/// Laid-out text: glyph quads and layout metrics.
#[derive(Debug, Clone)]
pub struct TextGeometry {
    pub vertices: Vec<TextVertex>,
    pub indices: Vec<u32>,
    /// Widest line, in font pixels.
    pub width: f32,
    pub height: f32,
    pub line_count: usize,
    /// Number of glyph quads.
    pub letter_count: usize,
    /// Bounds of every quad, with `z = 0`.
    pub bounds: Aabb,
}

impl TextGeometry {
    pub fn is_empty(&self) -> bool {
        self.letter_count == 0
    }
}

struct PlacedGlyph<'a> {
    glyph: &'a Glyph,
    /// Pen position (left edge at baseline-relative line top).
    pen: Vec2,
    line: usize,
    word: usize,
    line_letter: usize,
}

struct Line<'a> {
    chars: &'a [char],
    width: f32,
}

struct LayoutBuilder<'a> {
    options: &'a TextLayout,
    font: &'a FontDescriptor,
    chars: Vec<char>,
}

impl<'a> LayoutBuilder<'a> {
    fn new(options: &'a TextLayout, font: &'a FontDescriptor) -> Self {
        Self {
            options,
            font,
            chars: options.text.chars().collect(),
        }
    }

    /// Resolve the glyph drawn for `c`: missing glyphs fall back to `?`,
    /// missing whitespace to a synthetic blank.
    fn glyph_for(&self, c: char) -> Option<&'a Glyph> {
        let id = c as u32;
        if let Some(glyph) = self.font.glyph(id) {
            return Some(glyph);
        }
        if c.is_whitespace() {
            return None;
        }
        match self.font.glyph(FALLBACK) {
            Some(glyph) => {
                tracing::debug!("Glyph {:?} missing, using fallback", c);
                Some(glyph)
            }
            None => {
                tracing::warn!("Glyph {:?} missing from font and no fallback, skipping", c);
                None
            }
        }
    }

    fn space_advance(&self) -> f32 {
        self.font
            .glyph(SPACE)
            .map(|g| g.xadvance)
            .unwrap_or(self.font.info.size / 4.0)
    }

    /// Advance of a glyph-less whitespace character.
    fn blank_advance(&self, c: char) -> f32 {
        if c as u32 == TAB {
            self.space_advance() * TAB_SIZE
        } else {
            self.space_advance()
        }
    }

    /// Width of `chars` on one line, from the first pen position to the end
    /// of the last glyph advance (without trailing letter spacing).
    fn measure(&self, chars: &[char]) -> f32 {
        let mut x = 0.0;
        let mut last: Option<u32> = None;
        for &c in chars {
            match self.glyph_for(c) {
                Some(glyph) => {
                    if let Some(prev) = last {
                        x += self.font.kerning(prev, glyph.id);
                    }
                    x += glyph.xadvance + self.options.letter_spacing;
                    last = Some(glyph.id);
                }
                None if c.is_whitespace() => {
                    x += self.blank_advance(c) + self.options.letter_spacing;
                    last = None;
                }
                None => {}
            }
        }
        if !chars.is_empty() {
            x -= self.options.letter_spacing;
        }
        x.max(0.0)
    }

    fn lines(&self) -> Vec<Line<'_>> {
        let mut lines = Vec::new();
        for paragraph in self.chars.split(|&c| c == '\n') {
            match self.options.width {
                Some(max_width) => self.wrap(paragraph, max_width, &mut lines),
                None => lines.push(Line {
                    chars: paragraph,
                    width: self.measure(paragraph),
                }),
            }
        }
        lines
    }

    /// Greedy wrap at whitespace. A single word wider than `max_width`
    /// stays on its own line.
    fn wrap<'c>(&self, paragraph: &'c [char], max_width: f32, lines: &mut Vec<Line<'c>>) {
        let mut start = 0;
        while start < paragraph.len() {
            let mut end = start;
            let mut best_end = None;
            while end < paragraph.len() {
                // Next word boundary
                let mut next = end;
                while next < paragraph.len() && paragraph[next].is_whitespace() {
                    next += 1;
                }
                while next < paragraph.len() && !paragraph[next].is_whitespace() {
                    next += 1;
                }
                if self.measure(&paragraph[start..next]) > max_width && best_end.is_some() {
                    break;
                }
                best_end = Some(next);
                end = next;
            }

            let line_end = best_end.unwrap_or(paragraph.len());
            let trimmed = trim_end(&paragraph[start..line_end]);
            lines.push(Line {
                chars: trimmed,
                width: self.measure(trimmed),
            });

            start = line_end;
            while start < paragraph.len() && paragraph[start].is_whitespace() {
                start += 1;
            }
        }
        if paragraph.is_empty() {
            lines.push(Line {
                chars: paragraph,
                width: 0.0,
            });
        }
    }

    fn build(&self) -> TextGeometry {
        let lines = self.lines();
        let line_height = self
            .options
            .line_height
            .unwrap_or(self.font.common.line_height);
        let descender = line_height - self.font.common.base;
        let max_width = lines.iter().map(|l| l.width).fold(0.0f32, f32::max);
        let height = line_height * lines.len() as f32 - descender;

        let mut placed = Vec::new();
        let mut y = -height;
        let mut word = 0usize;
        let mut in_word = false;

        for (line_index, line) in lines.iter().enumerate() {
            let offset = match self.options.align {
                Align::Left => 0.0,
                Align::Center => (max_width - line.width) / 2.0,
                Align::Right => max_width - line.width,
            };

            let mut x = 0.0;
            let mut last: Option<u32> = None;
            let mut line_letter = 0;

            for &c in line.chars {
                if c.is_whitespace() {
                    if in_word {
                        word += 1;
                        in_word = false;
                    }
                } else {
                    in_word = true;
                }

                let Some(glyph) = self.glyph_for(c) else {
                    if c.is_whitespace() {
                        x += self.blank_advance(c) + self.options.letter_spacing;
                        last = None;
                    }
                    continue;
                };

                if let Some(prev) = last {
                    x += self.font.kerning(prev, glyph.id);
                }

                if glyph.width > 0.0 && glyph.height > 0.0 {
                    placed.push(PlacedGlyph {
                        glyph,
                        pen: Vec2::new(x + offset, y),
                        line: line_index,
                        word,
                        line_letter,
                    });
                    line_letter += 1;
                }

                x += glyph.xadvance + self.options.letter_spacing;
                last = Some(glyph.id);
            }

            // Line breaks end words too
            if in_word {
                word += 1;
                in_word = false;
            }
            y += line_height;
        }

        self.emit(placed, max_width, height, lines.len())
    }

    fn emit(
        &self,
        placed: Vec<PlacedGlyph<'_>>,
        width: f32,
        height: f32,
        line_count: usize,
    ) -> TextGeometry {
        let (atlas_w, atlas_h) = self.font.atlas_size();
        let (atlas_w, atlas_h) = (atlas_w as f32, atlas_h as f32);

        let quads: Vec<[Vec2; 4]> = placed
            .iter()
            .map(|p| {
                let x = p.pen.x + p.glyph.xoffset;
                let y = p.pen.y + p.glyph.yoffset;
                let (w, h) = (p.glyph.width, p.glyph.height);
                // BL, TL, TR, BR in BMFont space (y down, so "bottom" is y)
                [
                    Vec2::new(x, y),
                    Vec2::new(x, y + h),
                    Vec2::new(x + w, y + h),
                    Vec2::new(x + w, y),
                ]
            })
            .collect();

        let bounds = Aabb::from_points(quads.iter().flatten().map(|p| Vec3::new(p.x, p.y, 0.0)));
        let extent = bounds.size().truncate();
        let layout_uv = |p: Vec2| {
            let rel = p - bounds.min.truncate();
            [
                if extent.x > 0.0 { rel.x / extent.x } else { 0.0 },
                if extent.y > 0.0 { rel.y / extent.y } else { 0.0 },
            ]
        };

        let mut vertices = Vec::with_capacity(placed.len() * 4);
        let mut indices = Vec::with_capacity(placed.len() * 6);

        for (letter_index, (p, quad)) in placed.iter().zip(&quads).enumerate() {
            let u0 = p.glyph.x / atlas_w;
            let u1 = (p.glyph.x + p.glyph.width) / atlas_w;
            let v0 = p.glyph.y / atlas_h;
            let v1 = (p.glyph.y + p.glyph.height) / atlas_h;
            let uvs = [[u0, v0], [u0, v1], [u1, v1], [u1, v0]];
            let center = ((quad[0] + quad[2]) / 2.0).to_array();

            let base = vertices.len() as u32;
            for (corner, uv) in quad.iter().zip(uvs) {
                vertices.push(TextVertex {
                    position: corner.to_array(),
                    uv,
                    layout_uv: layout_uv(*corner),
                    center,
                    letter_index: letter_index as f32,
                    line_index: p.line as f32,
                    word_index: p.word as f32,
                    line_letter_index: p.line_letter as f32,
                });
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        tracing::debug!(
            "Laid out {} glyphs on {} lines ({}x{})",
            placed.len(),
            line_count,
            width,
            height
        );

        TextGeometry {
            vertices,
            indices,
            width,
            height,
            line_count,
            letter_count: placed.len(),
            bounds,
        }
    }
}

fn trim_end(chars: &[char]) -> &[char] {
    let end = chars
        .iter()
        .rposition(|c| !c.is_whitespace())
        .map_or(0, |i| i + 1);
    &chars[..end]
}
