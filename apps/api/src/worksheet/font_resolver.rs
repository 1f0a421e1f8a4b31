//! Font resolution — finds a font that can render mixed Latin/CJK prompts.
//!
//! Candidates are tried in a fixed order and the first success wins:
//! 1. bundled resources under `FONT_DIR`, streamed from disk
//! 2. the same resource copied to a scoped temp file and loaded from the copy
//! 3. well-known system font paths (Windows, common Linux CJK packages)
//! 4. the built-in Helvetica, which cannot render wide glyphs
//!
//! Only fonts carrying TrueType outlines (`glyf`) are accepted, so the embedded program is
//! always a valid `FontFile2`. For `.ttc` collections the first member with `glyf` is
//! extracted into a standalone font. Resolution never fails outward.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use miniz_oxide::deflate::compress_to_vec_zlib;
use thiserror::Error;
use tracing::{debug, info, warn};
use ttf_parser::{name_id, Face, GlyphId};

use crate::worksheet::font_metrics::{BuiltinMetrics, HELVETICA_METRICS};

/// Bundled resource names, regular weight before the language-specific subset.
pub const BUNDLED_FONT_NAMES: &[&str] = &[
    "NotoSansCJK-Regular.ttf",
    "NotoSansCJKsc-Regular.ttf",
    "NotoSansCJK-Regular.ttc",
    "NotoSansCJK-Regular.otf",
    "NotoSansCJKsc-Regular.otf",
];

pub const SYSTEM_FONT_PATHS: &[&str] = &[
    "C:/Windows/Fonts/msyh.ttf",
    "C:/Windows/Fonts/msyh.ttc",
    "C:/Windows/Fonts/msyhl.ttc",
    "C:/Windows/Fonts/msyhbd.ttc",
    "C:/Windows/Fonts/simsun.ttc",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Bold.ttc",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.otf",
    "/usr/share/fonts/opentype/noto/NotoSansCJKsc-Regular.otf",
    "/usr/share/fonts/truetype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/truetype/noto/NotoSansCJKsc-Regular.ttc",
    "/usr/share/fonts/truetype/noto/NotoSansCJK-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSansCJKsc-Regular.ttf",
    "/usr/share/fonts/chinese/NotoSansCJK-Regular.otf",
    "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
    "/usr/share/fonts/truetype/wqy/wqy-microhei.ttf",
    "/usr/share/fonts/truetype/arphic/uming.ttc",
    "/usr/share/fonts/truetype/arphic/ukai.ttc",
];

/// Probe character: a font that cannot map it is useless for Chinese prompts.
const CJK_PROBE: char = '中';

#[derive(Debug, Error)]
pub enum FontLoadError {
    #[error("{0} does not exist")]
    NotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("{0} has no TrueType outlines (glyf)")]
    NoOutlines(PathBuf),

    #[error("{0} has no glyph for CJK text")]
    NoCjkCoverage(PathBuf),
}

/// Where the resolved font came from. Informational only.
#[derive(Debug, Clone, PartialEq)]
pub enum FontSource {
    Bundled(PathBuf),
    BundledTempCopy(PathBuf),
    System { path: PathBuf, face_index: u32 },
    Builtin,
}

/// A TrueType program ready to embed, plus the metrics the PDF descriptor needs.
#[derive(Debug)]
pub struct EmbeddedFont {
    pub postscript_name: String,
    /// Standalone sfnt bytes (collection members are already extracted).
    pub program: Vec<u8>,
    pub units_per_em: u16,
    pub ascender: i16,
    pub descender: i16,
    pub cap_height: i16,
    pub bbox: [i16; 4],
    /// Flate-compressed `program`, built on first use and reused by every document.
    compressed: OnceLock<Vec<u8>>,
}

/// One character mapped to a glyph of the embedded font.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    pub gid: u16,
    pub ch: char,
    /// Advance in 1/1000 em.
    pub advance: f32,
}

impl EmbeddedFont {
    fn face(&self) -> Option<Face<'_>> {
        Face::parse(&self.program, 0).ok()
    }

    pub fn compressed_program(&self) -> &[u8] {
        self.compressed
            .get_or_init(|| compress_to_vec_zlib(&self.program, 6))
    }

    fn scale(&self) -> f32 {
        1000.0 / self.units_per_em.max(1) as f32
    }

    /// Converts a font-unit value to 1/1000 em.
    pub fn to_pdf_units(&self, v: i16) -> f32 {
        v as f32 * self.scale()
    }

    /// Maps `text` to glyphs. Unmapped characters become `.notdef` (gid 0).
    pub fn glyphs(&self, text: &str) -> Vec<Glyph> {
        let scale = self.scale();
        let Some(face) = self.face() else {
            return text
                .chars()
                .map(|ch| Glyph {
                    gid: 0,
                    ch,
                    advance: 1000.0,
                })
                .collect();
        };

        text.chars()
            .map(|ch| {
                let gid = face.glyph_index(ch).unwrap_or(GlyphId(0));
                let advance = face.glyph_hor_advance(gid).unwrap_or(0) as f32 * scale;
                Glyph {
                    gid: gid.0,
                    ch,
                    advance,
                }
            })
            .collect()
    }
}

#[derive(Debug)]
pub enum FontFace {
    Embedded(EmbeddedFont),
    Builtin(&'static BuiltinMetrics),
}

/// The font used for every prompt in a worksheet.
///
/// Immutable once resolved; share it behind an `Arc`.
#[derive(Debug)]
pub struct FontHandle {
    pub face: FontFace,
    pub source: FontSource,
}

impl FontHandle {
    pub fn latin_fallback() -> Self {
        Self {
            face: FontFace::Builtin(&HELVETICA_METRICS),
            source: FontSource::Builtin,
        }
    }

    /// Whether non-Latin (e.g. CJK) code points can be drawn.
    pub fn supports_wide_glyphs(&self) -> bool {
        matches!(self.face, FontFace::Embedded(_))
    }

    /// Width of `text` in 1/1000 em; multiply by `size / 1000` for points.
    pub fn measure_units(&self, text: &str) -> f32 {
        match &self.face {
            FontFace::Embedded(font) => font.glyphs(text).iter().map(|g| g.advance).sum(),
            FontFace::Builtin(metrics) => metrics.measure_units(text),
        }
    }
}

/// Ordered fallback chain over font candidates.
pub struct FontResolver {
    font_dir: PathBuf,
    bundled_names: Vec<String>,
    system_paths: Vec<PathBuf>,
    temp_dir: PathBuf,
}

type Loader<'a> = Box<dyn Fn() -> Result<FontHandle, FontLoadError> + 'a>;

impl FontResolver {
    pub fn new(font_dir: impl Into<PathBuf>) -> Self {
        Self {
            font_dir: font_dir.into(),
            bundled_names: BUNDLED_FONT_NAMES.iter().map(|s| s.to_string()).collect(),
            system_paths: SYSTEM_FONT_PATHS.iter().map(PathBuf::from).collect(),
            temp_dir: std::env::temp_dir(),
        }
    }

    #[cfg(test)]
    pub fn with_system_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.system_paths = paths;
        self
    }

    #[cfg(test)]
    pub fn with_bundled_names(mut self, names: Vec<String>) -> Self {
        self.bundled_names = names;
        self
    }

    /// Directory for tier-2 temp copies.
    #[cfg(test)]
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = dir.into();
        self
    }

    fn candidates(&self) -> Vec<(String, Loader<'_>)> {
        let mut out: Vec<(String, Loader<'_>)> = Vec::new();

        for name in &self.bundled_names {
            let path = self.font_dir.join(name);
            let p1 = path.clone();
            out.push((
                format!("bundled {}", path.display()),
                Box::new(move || load_streamed(&p1)),
            ));
            let p2 = path.clone();
            out.push((
                format!("bundled temp copy of {}", path.display()),
                Box::new(move || load_via_temp_copy(&p2, &self.temp_dir)),
            ));
        }

        for path in &self.system_paths {
            out.push((
                format!("system {}", path.display()),
                Box::new(move || load_system(path)),
            ));
        }

        out
    }

    /// Walks the chain and returns the first font that loads. Never fails.
    pub fn resolve(&self) -> FontHandle {
        for (label, load) in self.candidates() {
            match load() {
                Ok(handle) => {
                    info!("Loaded worksheet font from {label}: {:?}", handle.source);
                    return handle;
                }
                Err(FontLoadError::NotFound(path)) => {
                    debug!("Font candidate {} not present", path.display());
                }
                Err(e) => warn!("Font candidate {label} rejected: {e}"),
            }
        }

        warn!(
            "No CJK font found, falling back to {} (non-ASCII renders as '?'). \
             Put NotoSansCJK-Regular.ttf into {}",
            HELVETICA_METRICS.name,
            self.font_dir.display()
        );
        FontHandle::latin_fallback()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Candidate loaders
// ────────────────────────────────────────────────────────────────────────────

fn load_streamed(path: &Path) -> Result<FontHandle, FontLoadError> {
    let file = open(path)?;
    let mut data = Vec::new();
    BufReader::new(file)
        .read_to_end(&mut data)
        .map_err(|source| FontLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let (font, _) = embeddable_font(data, path)?;
    Ok(FontHandle {
        face: FontFace::Embedded(font),
        source: FontSource::Bundled(path.to_path_buf()),
    })
}

/// Copies the resource into a temp file and loads the copy.
/// The temp file is removed when `tmp` drops, whatever the outcome.
fn load_via_temp_copy(path: &Path, temp_dir: &Path) -> Result<FontHandle, FontLoadError> {
    let mut src = open(path)?;
    let io_err = |source| FontLoadError::Io {
        path: path.to_path_buf(),
        source,
    };

    let suffix = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let mut tmp = tempfile::Builder::new()
        .prefix("worksheet-font-")
        .suffix(&suffix)
        .tempfile_in(temp_dir)
        .map_err(io_err)?;
    io::copy(&mut src, tmp.as_file_mut()).map_err(io_err)?;

    let data = std::fs::read(tmp.path()).map_err(io_err)?;
    let (font, _) = embeddable_font(data, path)?;
    Ok(FontHandle {
        face: FontFace::Embedded(font),
        source: FontSource::BundledTempCopy(path.to_path_buf()),
    })
}

fn load_system(path: &Path) -> Result<FontHandle, FontLoadError> {
    if !path.exists() {
        return Err(FontLoadError::NotFound(path.to_path_buf()));
    }
    let data = std::fs::read(path).map_err(|source| FontLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let (font, face_index) = embeddable_font(data, path)?;
    Ok(FontHandle {
        face: FontFace::Embedded(font),
        source: FontSource::System {
            path: path.to_path_buf(),
            face_index,
        },
    })
}

fn open(path: &Path) -> Result<File, FontLoadError> {
    File::open(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => FontLoadError::NotFound(path.to_path_buf()),
        _ => FontLoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Font program validation
// ────────────────────────────────────────────────────────────────────────────

/// Validates `data` and returns the embeddable program with its collection index.
pub(crate) fn embeddable_font(data: Vec<u8>, path: &Path) -> Result<(EmbeddedFont, u32), FontLoadError> {
    let parse_err = |reason: String| FontLoadError::Parse {
        path: path.to_path_buf(),
        reason,
    };

    let (program, face_index) = match ttf_parser::fonts_in_collection(&data) {
        Some(count) => {
            let index = (0..count)
                .find(|&i| {
                    Face::parse(&data, i)
                        .map(|f| f.tables().glyf.is_some())
                        .unwrap_or(false)
                })
                .ok_or_else(|| FontLoadError::NoOutlines(path.to_path_buf()))?;
            let program = extract_collection_member(&data, index).map_err(parse_err)?;
            (program, index)
        }
        None => (data, 0),
    };

    let face = Face::parse(&program, 0).map_err(|e| parse_err(e.to_string()))?;
    if face.tables().glyf.is_none() {
        return Err(FontLoadError::NoOutlines(path.to_path_buf()));
    }
    if face.glyph_index(CJK_PROBE).is_none() {
        return Err(FontLoadError::NoCjkCoverage(path.to_path_buf()));
    }

    let bbox = face.global_bounding_box();
    let postscript_name = face
        .names()
        .into_iter()
        .find(|n| n.name_id == name_id::POST_SCRIPT_NAME && n.is_unicode())
        .and_then(|n| n.to_string())
        .map(|n| pdf_safe_name(&n))
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| {
            pdf_safe_name(
                &path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            )
        });

    let font = EmbeddedFont {
        postscript_name,
        units_per_em: face.units_per_em(),
        ascender: face.ascender(),
        descender: face.descender(),
        cap_height: face.capital_height().unwrap_or_else(|| face.ascender()),
        bbox: [bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max],
        program: Vec::new(),
        compressed: OnceLock::new(),
    };
    drop(face);

    Ok((EmbeddedFont { program, ..font }, face_index))
}

/// Keeps only characters legal in a PDF name token.
fn pdf_safe_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+'))
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Collection extraction
// ────────────────────────────────────────────────────────────────────────────

/// Largest table count whose sfnt search fields fit in 16 bits.
const MAX_SFNT_TABLES: u16 = 4095;

fn read_u16(data: &[u8], offset: usize) -> Option<u16> {
    data.get(offset..offset + 2)
        .map(|b| u16::from_be_bytes([b[0], b[1]]))
}

fn read_u32(data: &[u8], offset: usize) -> Option<u32> {
    data.get(offset..offset + 4)
        .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
}

/// Rebuilds member `index` of a TrueType collection as a standalone sfnt file.
///
/// Collection layout: `ttcf` tag, version, font count, then one offset per member pointing
/// at an ordinary sfnt table directory whose table offsets are relative to the whole file.
pub fn extract_collection_member(data: &[u8], index: u32) -> Result<Vec<u8>, String> {
    if data.get(0..4) != Some(b"ttcf".as_slice()) {
        return Err("not a font collection".to_string());
    }
    let count = read_u32(data, 8).ok_or("truncated collection header")?;
    if index >= count {
        return Err(format!("collection has {count} fonts, asked for #{index}"));
    }
    let dir = read_u32(data, 12 + 4 * index as usize).ok_or("truncated offset table")? as usize;

    let sfnt_version = read_u32(data, dir).ok_or("truncated table directory")?;
    let num_tables = read_u16(data, dir + 4).ok_or("truncated table directory")?;
    if num_tables > MAX_SFNT_TABLES {
        return Err(format!("member #{index} declares {num_tables} tables"));
    }

    let mut records = Vec::with_capacity(num_tables as usize);
    for i in 0..num_tables as usize {
        let rec = dir + 12 + 16 * i;
        let tag = data.get(rec..rec + 4).ok_or("truncated table record")?;
        let checksum = read_u32(data, rec + 4).ok_or("truncated table record")?;
        let offset = read_u32(data, rec + 8).ok_or("truncated table record")? as usize;
        let length = read_u32(data, rec + 12).ok_or("truncated table record")? as usize;
        let body = data
            .get(offset..offset + length)
            .ok_or_else(|| format!("table {} out of bounds", String::from_utf8_lossy(tag)))?;
        records.push((tag, checksum, body));
    }

    let n = u32::from(num_tables);
    let entry_selector = if n == 0 { 0 } else { 31 - n.leading_zeros() };
    let search_range = (1u32 << entry_selector) * 16;
    let range_shift = (n * 16).saturating_sub(search_range);

    let mut out = Vec::new();
    out.extend_from_slice(&sfnt_version.to_be_bytes());
    out.extend_from_slice(&num_tables.to_be_bytes());
    out.extend_from_slice(&(search_range as u16).to_be_bytes());
    out.extend_from_slice(&(entry_selector as u16).to_be_bytes());
    out.extend_from_slice(&(range_shift as u16).to_be_bytes());

    let mut offset = 12 + 16 * records.len();
    for (tag, checksum, body) in &records {
        out.extend_from_slice(tag);
        out.extend_from_slice(&checksum.to_be_bytes());
        out.extend_from_slice(&(offset as u32).to_be_bytes());
        out.extend_from_slice(&(body.len() as u32).to_be_bytes());
        offset += (body.len() + 3) & !3;
    }
    for (_, _, body) in &records {
        out.extend_from_slice(body);
        out.resize((out.len() + 3) & !3, 0);
    }

    Ok(out)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
