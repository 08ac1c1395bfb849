use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use usvg::fontdb;

use crate::foundation::error::{OverlayError, OverlayResult};

/// Environment variable naming the font resource directory.
pub const FONTS_DIR_ENV: &str = "TEXTOVERLAY_FONTS_DIR";

const FONT_EXTENSIONS: [&str; 3] = ["ttf", "otf", "ttc"];

#[derive(Clone, Debug, PartialEq, Eq)]
/// Where a [`ResolvedFont`] came from.
pub enum FontSource {
    /// Exact file name match inside the font resource directory.
    Directory(PathBuf),
    /// Found by passing the identity to the system font lookup.
    System(String),
    /// Backend default font (requested font unavailable or not specified).
    Fallback(String),
}

#[derive(Clone)]
/// Font bytes ready for shaping and rasterization.
pub struct ResolvedFont {
    /// Identity the caller asked for.
    pub requested: String,
    /// Raw font file bytes.
    pub bytes: Arc<Vec<u8>>,
    /// Face index inside `bytes` (non-zero only for collections).
    pub index: u32,
    /// Primary family name of the face.
    pub family: String,
    /// Resolution outcome.
    pub source: FontSource,
}

impl std::fmt::Debug for ResolvedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedFont")
            .field("requested", &self.requested)
            .field("bytes_len", &self.bytes.len())
            .field("index", &self.index)
            .field("family", &self.family)
            .field("source", &self.source)
            .finish()
    }
}

/// Resolves font identities through the font directory, then the system, then a default face.
///
/// Resolved fonts are memoized per identity, so a fallback is reported once per identity.
pub struct FontResolver {
    fonts_dir: Option<PathBuf>,
    system: Option<fontdb::Database>,
    resolved: HashMap<String, ResolvedFont>,
}

impl Default for FontResolver {
    fn default() -> Self {
        Self::from_env()
    }
}

impl FontResolver {
    /// Resolver that looks for exact file names in `fonts_dir` before asking the system.
    pub fn new(fonts_dir: Option<PathBuf>) -> Self {
        Self {
            fonts_dir,
            system: None,
            resolved: HashMap::new(),
        }
    }

    /// Resolver whose font directory is `$TEXTOVERLAY_FONTS_DIR`, else `./fonts` when present.
    pub fn from_env() -> Self {
        let dir = std::env::var_os(FONTS_DIR_ENV)
            .map(PathBuf::from)
            .or_else(|| {
                let local = PathBuf::from("fonts");
                local.is_dir().then_some(local)
            });
        Self::new(dir)
    }

    /// Configured font resource directory.
    pub fn fonts_dir(&self) -> Option<&Path> {
        self.fonts_dir.as_deref()
    }

    /// Font files offered by the font directory (see [`list_fonts`]).
    pub fn available_fonts(&self) -> Vec<String> {
        self.fonts_dir
            .as_deref()
            .map(list_fonts)
            .unwrap_or_default()
    }

    /// Resolve `identity` to font bytes.
    ///
    /// Lookup order: exact file name in the font directory, then the identity as a path or a
    /// system face (by file name, then by family name), then the default face. Failing to find or
    /// load the requested font is not an error; it logs a warning and returns the default face.
    /// An empty identity selects the default face directly. Errors only when the host has no
    /// usable font at all.
    pub fn resolve(&mut self, identity: &str) -> OverlayResult<ResolvedFont> {
        if let Some(font) = self.resolved.get(identity) {
            return Ok(font.clone());
        }

        let font = self.resolve_uncached(identity)?;
        tracing::debug!(
            requested = identity,
            family = %font.family,
            source = ?font.source,
            "resolved font"
        );
        self.resolved.insert(identity.to_owned(), font.clone());
        Ok(font)
    }

    fn resolve_uncached(&mut self, identity: &str) -> OverlayResult<ResolvedFont> {
        let identity_trimmed = identity.trim();
        if identity_trimmed.is_empty() {
            return self.default_font(identity);
        }

        match self.from_directory(identity_trimmed) {
            Ok(Some(font)) => return Ok(font),
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(
                    font = identity,
                    error = %err,
                    "failed to load font from font directory"
                );
            }
        }

        match self.from_system(identity_trimmed) {
            Ok(Some(font)) => return Ok(font),
            Ok(None) => {
                tracing::warn!(font = identity, "font not found; using default font");
            }
            Err(err) => {
                tracing::warn!(
                    font = identity,
                    error = %err,
                    "failed to load font; using default font"
                );
            }
        }

        self.default_font(identity)
    }

    fn from_directory(&self, identity: &str) -> OverlayResult<Option<ResolvedFont>> {
        let Some(dir) = self.fonts_dir.as_deref() else {
            return Ok(None);
        };
        // Identities are plain file names here; anything path-like is left to the system step.
        if Path::new(identity).components().count() != 1 {
            return Ok(None);
        }
        let path = dir.join(identity);
        if !path.is_file() {
            return Ok(None);
        }

        let bytes = read_font_bytes(&path)?;
        let (index, family) = first_face_info(&bytes)?;
        Ok(Some(ResolvedFont {
            requested: identity.to_owned(),
            bytes: Arc::new(bytes),
            index,
            family,
            source: FontSource::Directory(path),
        }))
    }

    fn from_system(&mut self, identity: &str) -> OverlayResult<Option<ResolvedFont>> {
        let path = Path::new(identity);
        if path.is_file() {
            let bytes = read_font_bytes(path)?;
            let (index, family) = first_face_info(&bytes)?;
            return Ok(Some(ResolvedFont {
                requested: identity.to_owned(),
                bytes: Arc::new(bytes),
                index,
                family,
                source: FontSource::System(path.display().to_string()),
            }));
        }

        let db = self.system_db();
        let Some(id) = find_system_face(db, identity) else {
            return Ok(None);
        };
        let font = load_face(db, id, identity, FontSource::System)?;
        Ok(Some(font))
    }

    fn default_font(&mut self, identity: &str) -> OverlayResult<ResolvedFont> {
        let db = self.system_db();
        let families = [
            fontdb::Family::SansSerif,
            fontdb::Family::Name("DejaVu Sans"),
            fontdb::Family::Name("Liberation Sans"),
            fontdb::Family::Name("Noto Sans"),
            fontdb::Family::Name("Arial"),
        ];
        let query = fontdb::Query {
            families: &families,
            ..fontdb::Query::default()
        };
        let id = db
            .query(&query)
            .or_else(|| db.faces().next().map(|f| f.id))
            .ok_or_else(|| OverlayError::font("no fonts available on this system"))?;
        load_face(db, id, identity, FontSource::Fallback)
    }

    fn system_db(&mut self) -> &fontdb::Database {
        self.system.get_or_insert_with(|| {
            let mut db = fontdb::Database::new();
            db.load_system_fonts();
            tracing::debug!(faces = db.len(), "loaded system font database");
            db
        })
    }
}

/// Font file names (not paths) directly inside `dir`, sorted.
///
/// Recognized extensions are `ttf`, `otf` and `ttc`, case-insensitive. A missing or unreadable
/// directory yields an empty list.
pub fn list_fonts(dir: &Path) -> Vec<String> {
    let Ok(rd) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        if !FONT_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|s| s.to_str()) {
            out.push(name.to_owned());
        }
    }
    out.sort();
    out
}

fn read_font_bytes(path: &Path) -> OverlayResult<Vec<u8>> {
    std::fs::read(path)
        .with_context(|| format!("read font bytes from '{}'", path.display()))
        .map_err(OverlayError::from)
}

/// Parse `bytes` far enough to confirm a face exists and learn its family name.
fn first_face_info(bytes: &[u8]) -> OverlayResult<(u32, String)> {
    let mut db = fontdb::Database::new();
    db.load_font_data(bytes.to_vec());
    let face = db
        .faces()
        .next()
        .ok_or_else(|| OverlayError::font("font data contains no parsable faces"))?;
    let family = face
        .families
        .first()
        .map(|(name, _)| name.clone())
        .unwrap_or_else(|| "unknown".to_string());
    Ok((face.index, family))
}

fn find_system_face(db: &fontdb::Database, identity: &str) -> Option<fontdb::ID> {
    let by_file_name = db.faces().find(|face| {
        let path = match &face.source {
            fontdb::Source::File(p) => p,
            fontdb::Source::SharedFile(p, _) => p,
            _ => return false,
        };
        path.file_name()
            .and_then(|s| s.to_str())
            .is_some_and(|name| name.eq_ignore_ascii_case(identity))
    });
    if let Some(face) = by_file_name {
        return Some(face.id);
    }

    let stem = Path::new(identity)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(identity);
    let family_name = db.faces().find_map(|face| {
        face.families
            .iter()
            .find(|(name, _)| {
                name.eq_ignore_ascii_case(stem) || name.eq_ignore_ascii_case(identity)
            })
            .map(|(name, _)| name.clone())
    })?;
    let families = [fontdb::Family::Name(&family_name)];
    db.query(&fontdb::Query {
        families: &families,
        ..fontdb::Query::default()
    })
}

fn load_face(
    db: &fontdb::Database,
    id: fontdb::ID,
    identity: &str,
    source: fn(String) -> FontSource,
) -> OverlayResult<ResolvedFont> {
    let face = db
        .face(id)
        .ok_or_else(|| OverlayError::font("font face disappeared from database"))?;
    let family = face
        .families
        .first()
        .map(|(name, _)| name.clone())
        .unwrap_or_else(|| "unknown".to_string());
    let description = match &face.source {
        fontdb::Source::File(p) | fontdb::Source::SharedFile(p, _) => p.display().to_string(),
        _ => family.clone(),
    };
    let (bytes, index) = db
        .with_face_data(id, |data, index| (data.to_vec(), index))
        .ok_or_else(|| OverlayError::font(format!("failed to read font data for '{family}'")))?;

    Ok(ResolvedFont {
        requested: identity.to_owned(),
        bytes: Arc::new(bytes),
        index,
        family,
        source: source(description),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/text/font.rs"]
mod tests;
