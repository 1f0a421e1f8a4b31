//! Serializes a composed `Worksheet` into a standalone PDF.
//!
//! Wide-glyph fonts are embedded as a Type0 font over a CIDFontType2 descendant with
//! `Identity-H` encoding, so each glyph is shown by its 2-byte glyph id. Only the glyphs
//! actually drawn get `/W` widths and `ToUnicode` entries. The Latin fallback is the
//! standard-14 Helvetica and is referenced, not embedded.

use std::collections::BTreeMap;
use std::io::Write;

use chrono::{DateTime, Datelike, Timelike, Utc};
use miniz_oxide::deflate::compress_to_vec_zlib;
use pdf_writer::types::{CidFontType, FontFlags, SystemInfo, UnicodeCmap};
use pdf_writer::{Content, Date, Filter, Finish, Name, Pdf, Rect, Ref, Str, TextStr};
use thiserror::Error;

use crate::worksheet::canvas::{DrawOp, PageCanvas, GUIDE_DASH, STROKE_WIDTH};
use crate::worksheet::composer::Worksheet;
use crate::worksheet::font_resolver::{EmbeddedFont, FontFace, FontHandle};
use crate::worksheet::layout::LayoutConfig;

const FONT_RESOURCE: &[u8] = b"F1";
const DOCUMENT_TITLE: &str = "Vocabulary Worksheet";
const COMPRESSION_LEVEL: u8 = 6;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to write document: {0}")]
    Io(#[from] std::io::Error),
}

/// Turns cell text into content-stream string bytes for the active font.
enum TextEncoder<'a> {
    /// 2-byte glyph ids; remembers every glyph used (char, advance) for `/W` and ToUnicode.
    Identity {
        font: &'a EmbeddedFont,
        used: BTreeMap<u16, (char, f32)>,
    },
    /// Single-byte WinAnsi; text is already printable ASCII.
    WinAnsi { base_font: &'static str },
}

impl<'a> TextEncoder<'a> {
    fn for_font(font: &'a FontHandle) -> Self {
        match &font.face {
            FontFace::Embedded(font) => TextEncoder::Identity {
                font,
                used: BTreeMap::new(),
            },
            FontFace::Builtin(metrics) => TextEncoder::WinAnsi {
                base_font: metrics.name,
            },
        }
    }

    fn encode(&mut self, text: &str) -> Vec<u8> {
        match self {
            TextEncoder::Identity { font, used } => {
                let glyphs = font.glyphs(text);
                let mut out = Vec::with_capacity(glyphs.len() * 2);
                for g in glyphs {
                    used.entry(g.gid).or_insert((g.ch, g.advance));
                    out.extend_from_slice(&g.gid.to_be_bytes());
                }
                out
            }
            TextEncoder::WinAnsi { .. } => text
                .chars()
                .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
                .collect(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Page content
// ────────────────────────────────────────────────────────────────────────────

/// Content stream operators for one page.
fn page_content(page: &PageCanvas, encoder: &mut TextEncoder<'_>) -> Vec<u8> {
    let mut content = Content::new();
    content.set_line_width(STROKE_WIDTH);

    for op in page.ops() {
        match op {
            DrawOp::Rect {
                x,
                y,
                width,
                height,
            } => {
                content.rect(*x, *y, *width, *height);
                content.stroke();
            }
            DrawOp::Line {
                x1,
                y1,
                x2,
                y2,
                dashed,
            } => {
                if *dashed {
                    content.set_dash_pattern(GUIDE_DASH, 0.0);
                }
                content.move_to(*x1, *y1);
                content.line_to(*x2, *y2);
                content.stroke();
                if *dashed {
                    content.set_dash_pattern(std::iter::empty::<f32>(), 0.0);
                }
            }
            DrawOp::Text { x, y, size, text } => {
                let bytes = encoder.encode(text);
                content
                    .begin_text()
                    .set_font(Name(FONT_RESOURCE), *size)
                    .next_line(*x, *y)
                    .show(Str(&bytes))
                    .end_text();
            }
        }
    }

    content.finish()
}

// ────────────────────────────────────────────────────────────────────────────
// Document assembly
// ────────────────────────────────────────────────────────────────────────────

/// Writes the worksheet as PDF into `out`.
pub fn write_pdf<W: Write>(
    sheet: &Worksheet,
    font: &FontHandle,
    config: &LayoutConfig,
    created: DateTime<Utc>,
    out: &mut W,
) -> Result<(), RenderError> {
    let mut alloc = Ref::new(1);
    let catalog_id = alloc.bump();
    let page_tree_id = alloc.bump();
    let info_id = alloc.bump();
    let font_id = alloc.bump();

    let mut pdf = Pdf::new();
    let mut encoder = TextEncoder::for_font(font);

    let mut page_ids = Vec::with_capacity(sheet.page_count());
    for page in &sheet.pages {
        let page_id = alloc.bump();
        let content_id = alloc.bump();
        page_ids.push(page_id);

        let raw = page_content(page, &mut encoder);
        let compressed = compress_to_vec_zlib(&raw, COMPRESSION_LEVEL);
        pdf.stream(content_id, &compressed)
            .filter(Filter::FlateDecode);

        let mut pdf_page = pdf.page(page_id);
        pdf_page
            .media_box(Rect::new(0.0, 0.0, config.page_width, config.page_height))
            .parent(page_tree_id)
            .contents(content_id);
        pdf_page.resources().fonts().pair(Name(FONT_RESOURCE), font_id);
        pdf_page.finish();
    }

    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id)
        .kids(page_ids.iter().copied())
        .count(page_ids.len() as i32);

    match encoder {
        TextEncoder::Identity { font, used } => {
            write_cid_font(&mut pdf, &mut alloc, font_id, font, &used);
        }
        TextEncoder::WinAnsi { base_font } => {
            pdf.type1_font(font_id)
                .base_font(Name(base_font.as_bytes()))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
        }
    }

    pdf.document_info(info_id)
        .title(TextStr(DOCUMENT_TITLE))
        .producer(TextStr(concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"))))
        .creation_date(pdf_date(created));

    out.write_all(&pdf.finish())?;
    Ok(())
}

/// Convenience wrapper returning the document bytes.
pub fn render_pdf(
    sheet: &Worksheet,
    font: &FontHandle,
    config: &LayoutConfig,
    created: DateTime<Utc>,
) -> Result<Vec<u8>, RenderError> {
    let mut out = Vec::new();
    write_pdf(sheet, font, config, created, &mut out)?;
    Ok(out)
}

// ────────────────────────────────────────────────────────────────────────────
// CID font embedding
// ────────────────────────────────────────────────────────────────────────────

fn identity_system_info() -> SystemInfo<'static> {
    SystemInfo {
        registry: Str(b"Adobe"),
        ordering: Str(b"Identity"),
        supplement: 0,
    }
}

fn write_cid_font(
    pdf: &mut Pdf,
    alloc: &mut Ref,
    type0_id: Ref,
    font: &EmbeddedFont,
    used: &BTreeMap<u16, (char, f32)>,
) {
    let cid_id = alloc.bump();
    let descriptor_id = alloc.bump();
    let program_id = alloc.bump();
    let cmap_id = alloc.bump();
    let base_font = Name(font.postscript_name.as_bytes());

    pdf.type0_font(type0_id)
        .base_font(base_font)
        .encoding_predefined(Name(b"Identity-H"))
        .descendant_font(cid_id)
        .to_unicode(cmap_id);

    let mut cid = pdf.cid_font(cid_id);
    cid.subtype(CidFontType::Type2)
        .base_font(base_font)
        .system_info(identity_system_info())
        .font_descriptor(descriptor_id)
        .default_width(1000.0)
        .cid_to_gid_map_predefined(Name(b"Identity"));
    {
        let mut widths = cid.widths();
        for (gid, (_, advance)) in used {
            widths.consecutive(*gid, [*advance]);
        }
    }
    cid.finish();

    let [x_min, y_min, x_max, y_max] = font.bbox.map(|v| font.to_pdf_units(v));
    pdf.font_descriptor(descriptor_id)
        .name(base_font)
        .flags(FontFlags::SYMBOLIC)
        .bbox(Rect::new(x_min, y_min, x_max, y_max))
        .italic_angle(0.0)
        .ascent(font.to_pdf_units(font.ascender))
        .descent(font.to_pdf_units(font.descender))
        .cap_height(font.to_pdf_units(font.cap_height))
        .stem_v(80.0)
        .font_file2(program_id);

    pdf.stream(program_id, font.compressed_program())
        .filter(Filter::FlateDecode)
        .pair(Name(b"Length1"), font.program.len() as i32);

    let mut cmap = UnicodeCmap::new(Name(b"Custom"), identity_system_info());
    for (gid, (ch, _)) in used {
        cmap.pair(*gid, *ch);
    }
    pdf.cmap(cmap_id, &cmap.finish());
}

fn pdf_date(t: DateTime<Utc>) -> Date {
    Date::new(t.year().clamp(0, 9999) as u16)
        .month(t.month() as u8)
        .day(t.day() as u8)
        .hour(t.hour() as u8)
        .minute(t.minute() as u8)
        .second(t.second() as u8)
        .utc_offset_hour(0)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
