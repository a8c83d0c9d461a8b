//! Gallery items and where they come from.
//!
//! Items are immutable once built.  The raster behind an item is decoded
//! separately (see [`decode_thumbnail`]) so a slow or broken image never
//! holds up the scroll path; a failed decode simply leaves the card without
//! an image.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use thiserror::Error;

/// Opaque item identifier, stable for the lifetime of the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub usize);

#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    /// Source of the card's raster, if any.
    pub image: Option<PathBuf>,
}

impl Item {
    pub fn new(id: usize, title: impl Into<String>, image: Option<PathBuf>) -> Self {
        Self {
            id: ItemId(id),
            title: title.into(),
            image,
        }
    }

    /// Caption shown under the card.
    pub fn caption(&self) -> String {
        format!("By: {}", self.title)
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("photo directory {0} does not exist or is not a directory")]
    NotADirectory(PathBuf),
    #[error("walking {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: ignore::Error,
    },
    #[error("decoding {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

const SAMPLE_AUTHORS: &[&str] = &[
    "Aleksandra Kowalska",
    "Bruno Ferreira",
    "Chiara Russo",
    "Daniel Okafor",
    "Elena Petrova",
    "Felix Wagner",
    "Grace Kim",
    "Hugo Martin",
    "Isabel Santos",
    "Jonas Berg",
    "Keiko Tanaka",
    "Liam O'Connor",
];

/// Built-in list used when no photo directory is given.  Sample items carry
/// no image.
pub fn sample_items() -> Vec<Item> {
    SAMPLE_AUTHORS
        .iter()
        .enumerate()
        .map(|(i, name)| Item::new(i, *name, None))
        .collect()
}

/// Collect every image under `root` (hidden entries skipped), ordered by
/// path.  The title is the file stem.
pub fn scan_photo_dir(root: &Path) -> Result<Vec<Item>, SourceError> {
    if !root.is_dir() {
        return Err(SourceError::NotADirectory(root.to_path_buf()));
    }

    let walker = WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut paths = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|source| SourceError::Walk {
            path: root.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        if is_image(entry.path()) {
            paths.push(entry.into_path());
        }
    }

    tracing::debug!(count = paths.len(), root = %root.display(), "scanned photo directory");

    Ok(paths
        .into_iter()
        .enumerate()
        .map(|(i, path)| {
            let title = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            Item::new(i, title, Some(path))
        })
        .collect())
}

/// Content-based check (shared-mime-info magic).  Falls back to the file
/// extension when the mime database has no answer.
fn is_image(path: &Path) -> bool {
    match tree_magic_mini::from_filepath(path) {
        Some(mime) if mime.starts_with("image/") => true,
        Some(mime) if mime != "application/octet-stream" => false,
        _ => image::ImageFormat::from_path(path).is_ok(),
    }
}

/// Decode `path` and shrink it so neither side exceeds `max_side` pixels.
pub fn decode_thumbnail(path: &Path, max_side: u32) -> Result<image::RgbaImage, SourceError> {
    let img = image::open(path).map_err(|source| SourceError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let img = if img.width() > max_side || img.height() > max_side {
        img.thumbnail(max_side, max_side)
    } else {
        img
    };
    Ok(img.to_rgba8())
}
