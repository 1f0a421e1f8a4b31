//! Tiny TrueType fonts built in memory for tests.
//!
//! Each font has `glyf`/`loca` (empty outlines), `head`, `hhea`, `maxp`, `hmtx` and a
//! format 4 `cmap`. Character `chars[i]` maps to glyph id `i + 1`; glyph `n` advances
//! `500 + 100 * n` units on a 1000-unit em.

use std::path::Path;

use crate::worksheet::font_resolver::{embeddable_font, FontFace, FontHandle, FontSource};

pub const UNITS_PER_EM: u16 = 1000;

fn put_u16(buf: &mut Vec<u8>, v: u16) {
    buf.extend_from_slice(&v.to_be_bytes());
}

fn put_u32(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_be_bytes());
}

pub fn advance_of(gid: u16) -> u16 {
    500 + 100 * gid
}

fn head_table() -> Vec<u8> {
    let mut head = Vec::with_capacity(54);
    put_u32(&mut head, 0x0001_0000); // version
    put_u32(&mut head, 0x0001_0000); // fontRevision
    put_u32(&mut head, 0); // checksumAdjustment
    put_u32(&mut head, 0x5F0F_3CF5); // magic
    put_u16(&mut head, 0); // flags
    put_u16(&mut head, UNITS_PER_EM);
    head.extend_from_slice(&[0u8; 16]); // created, modified
    for v in [0i16, -120, 1000, 880] {
        head.extend_from_slice(&v.to_be_bytes());
    }
    put_u16(&mut head, 0); // macStyle
    put_u16(&mut head, 8); // lowestRecPPEM
    put_u16(&mut head, 2); // fontDirectionHint
    put_u16(&mut head, 1); // indexToLocFormat: long
    put_u16(&mut head, 0); // glyphDataFormat
    head
}

fn hhea_table(num_glyphs: u16) -> Vec<u8> {
    let mut hhea = Vec::with_capacity(36);
    put_u32(&mut hhea, 0x0001_0000);
    hhea.extend_from_slice(&880i16.to_be_bytes());
    hhea.extend_from_slice(&(-120i16).to_be_bytes());
    hhea.extend_from_slice(&[0u8; 26]); // lineGap .. metricDataFormat
    put_u16(&mut hhea, num_glyphs); // numberOfHMetrics
    hhea
}

fn cmap_table(chars: &[char]) -> Vec<u8> {
    let mut segments: Vec<(u16, u16)> = chars
        .iter()
        .enumerate()
        .map(|(i, &c)| (c as u32 as u16, i as u16 + 1))
        .collect();
    segments.sort();
    let seg_count = segments.len() as u16 + 1;

    let mut cmap = Vec::new();
    put_u16(&mut cmap, 0); // version
    put_u16(&mut cmap, 1); // numTables
    put_u16(&mut cmap, 3); // Windows
    put_u16(&mut cmap, 1); // Unicode BMP
    put_u32(&mut cmap, 12);

    put_u16(&mut cmap, 4);
    put_u16(&mut cmap, 16 + 8 * seg_count);
    put_u16(&mut cmap, 0); // language
    put_u16(&mut cmap, seg_count * 2);
    cmap.extend_from_slice(&[0u8; 6]); // searchRange, entrySelector, rangeShift
    for (code, _) in &segments {
        put_u16(&mut cmap, *code);
    }
    put_u16(&mut cmap, 0xFFFF);
    put_u16(&mut cmap, 0); // reservedPad
    for (code, _) in &segments {
        put_u16(&mut cmap, *code);
    }
    put_u16(&mut cmap, 0xFFFF);
    for (code, gid) in &segments {
        put_u16(&mut cmap, gid.wrapping_sub(*code));
    }
    put_u16(&mut cmap, 1);
    for _ in 0..seg_count {
        put_u16(&mut cmap, 0); // idRangeOffset
    }
    cmap
}

/// sfnt bytes whose table offsets are relative to a file starting `base` bytes earlier.
fn sfnt(chars: &[char], base: usize) -> Vec<u8> {
    let num_glyphs = chars.len() as u16 + 1;

    let mut maxp = Vec::new();
    put_u32(&mut maxp, 0x0000_5000);
    put_u16(&mut maxp, num_glyphs);

    let mut hmtx = Vec::new();
    for gid in 0..num_glyphs {
        put_u16(&mut hmtx, advance_of(gid));
        put_u16(&mut hmtx, 0);
    }

    let loca = vec![0u8; 4 * (num_glyphs as usize + 1)];

    // sorted by tag
    let tables: [(&[u8; 4], Vec<u8>); 7] = [
        (b"cmap", cmap_table(chars)),
        (b"glyf", vec![0u8; 4]),
        (b"head", head_table()),
        (b"hhea", hhea_table(num_glyphs)),
        (b"hmtx", hmtx),
        (b"loca", loca),
        (b"maxp", maxp),
    ];

    let mut out = Vec::new();
    put_u32(&mut out, 0x0001_0000);
    put_u16(&mut out, tables.len() as u16);
    out.extend_from_slice(&[0u8; 6]);

    let mut offset = base + 12 + 16 * tables.len();
    for (tag, body) in &tables {
        out.extend_from_slice(*tag);
        put_u32(&mut out, 0); // checksum
        put_u32(&mut out, offset as u32);
        put_u32(&mut out, body.len() as u32);
        offset += (body.len() + 3) & !3;
    }
    for (_, body) in &tables {
        out.extend_from_slice(body);
        out.resize((out.len() + 3) & !3, 0);
    }
    out
}

/// Standalone `.ttf` bytes covering `chars` (BMP only).
pub fn glyf_font(chars: &[char]) -> Vec<u8> {
    sfnt(chars, 0)
}

/// Single-member `.ttc` bytes wrapping `glyf_font(chars)`.
pub fn glyf_collection(chars: &[char]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"ttcf");
    put_u32(&mut out, 0x0001_0000);
    put_u32(&mut out, 1);
    put_u32(&mut out, 16);
    out.extend(sfnt(chars, 16));
    out
}

/// Wide-glyph handle over `glyf_font(chars)`. `chars` must include '中'.
pub fn embedded_handle(chars: &[char]) -> FontHandle {
    let path = Path::new("fixture.ttf");
    let (font, _) = embeddable_font(glyf_font(chars), path).unwrap();
    FontHandle {
        face: FontFace::Embedded(font),
        source: FontSource::Bundled(path.to_path_buf()),
    }
}
