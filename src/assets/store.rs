use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;

use crate::assets::decode::{PreparedImage, decode_image, looks_like_svg, parse_svg, rasterize_svg};
use crate::capture::snapshot::display_name_for;
use crate::foundation::core::Canvas;
use crate::foundation::error::{TryOnError, TryOnResult};

/// One entry of a category listing, before any bytes are fetched.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AssetListing {
    /// Stable identifier within the category.
    pub id: String,
    /// Original file name, extension included.
    pub name: String,
    /// Where the bytes live, as understood by the owning source.
    pub source_uri: String,
}

/// Where jewelry images come from.
pub trait AssetSource {
    /// Listing for `category` in display order.
    fn list(&self, category: &str) -> TryOnResult<Vec<AssetListing>>;

    /// Raw bytes of one listed asset.
    fn fetch(&self, listing: &AssetListing) -> TryOnResult<Vec<u8>>;
}

/// A decoded jewelry image ready for placement.
#[derive(Clone, Debug, PartialEq)]
pub struct JewelryAsset {
    /// Listing id.
    pub id: String,
    /// Listing source URI.
    pub source_uri: String,
    /// File name as listed; snapshot names derive from it.
    pub file_name: String,
    /// Human-readable name used in captions.
    pub display_name: String,
    /// Intrinsic width before placement scaling.
    pub natural_width: u32,
    /// Intrinsic height before placement scaling.
    pub natural_height: u32,
    /// Decoded pixels.
    pub image: PreparedImage,
}

impl JewelryAsset {
    /// Decode a raster image or SVG document into an asset.
    pub fn decode(
        listing: &AssetListing,
        bytes: &[u8],
        fontdb: Arc<usvg::fontdb::Database>,
    ) -> TryOnResult<Self> {
        let image = if looks_like_svg(bytes) {
            let tree = parse_svg(bytes, fontdb)?;
            let size = tree.size();
            let canvas = Canvas::new(
                size.width().ceil().max(1.0) as u32,
                size.height().ceil().max(1.0) as u32,
            )?;
            rasterize_svg(&tree, canvas)?
        } else {
            decode_image(bytes)?
        };
        Ok(Self::from_image(listing, image))
    }

    /// Wrap an already decoded image.
    pub fn from_image(listing: &AssetListing, image: PreparedImage) -> Self {
        Self {
            id: listing.id.clone(),
            source_uri: listing.source_uri.clone(),
            file_name: listing.name.clone(),
            display_name: display_name_for(&listing.name),
            natural_width: image.width,
            natural_height: image.height,
            image,
        }
    }

    /// Height over width, or `None` when a natural dimension is zero.
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.natural_width == 0 || self.natural_height == 0 {
            return None;
        }
        Some(f64::from(self.natural_height) / f64::from(self.natural_width))
    }
}

#[derive(Debug)]
struct LoadedCategory {
    listings: Vec<AssetListing>,
    /// Parallel to `listings`; entries that failed to load stay `None`.
    assets: Vec<Option<JewelryAsset>>,
}

/// Per-session cache of categories. Each category is listed and decoded once, on first use.
pub struct AssetCatalog {
    source: Box<dyn AssetSource + Send>,
    fontdb: Arc<usvg::fontdb::Database>,
    loaded: HashMap<String, LoadedCategory>,
}

impl std::fmt::Debug for AssetCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetCatalog")
            .field("categories", &self.loaded.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl AssetCatalog {
    /// Empty catalog over `source`. Nothing is fetched until [`AssetCatalog::preload`].
    pub fn new(source: Box<dyn AssetSource + Send>, fontdb: Arc<usvg::fontdb::Database>) -> Self {
        Self {
            source,
            fontdb,
            loaded: HashMap::new(),
        }
    }

    /// List and decode every asset of `category`, memoized.
    ///
    /// A listing failure is an error and nothing is cached, so a later call retries. Individual
    /// fetch or decode failures are logged and leave a `None` entry at that index.
    #[tracing::instrument(skip(self))]
    pub fn preload(&mut self, category: &str) -> TryOnResult<&[Option<JewelryAsset>]> {
        if !self.loaded.contains_key(category) {
            let listings = self.source.list(category).map_err(|e| {
                TryOnError::asset(format!("list category '{category}': {e}"))
            })?;
            let assets = listings
                .iter()
                .map(|listing| self.load_one(listing))
                .collect::<Vec<_>>();
            let ok = assets.iter().filter(|a| a.is_some()).count();
            tracing::debug!(category, listed = listings.len(), loaded = ok, "category preloaded");
            self.loaded
                .insert(category.to_string(), LoadedCategory { listings, assets });
        }
        Ok(self.assets(category).unwrap_or(&[]))
    }

    fn load_one(&self, listing: &AssetListing) -> Option<JewelryAsset> {
        let result = self
            .source
            .fetch(listing)
            .and_then(|bytes| JewelryAsset::decode(listing, &bytes, self.fontdb.clone()));
        match result {
            Ok(asset) => Some(asset),
            Err(e) => {
                tracing::warn!(uri = %listing.source_uri, error = %e, "asset failed to load");
                None
            }
        }
    }

    /// Whether `category` was preloaded successfully.
    pub fn is_loaded(&self, category: &str) -> bool {
        self.loaded.contains_key(category)
    }

    /// Loaded entries of a category, `None` if it was never preloaded.
    pub fn assets(&self, category: &str) -> Option<&[Option<JewelryAsset>]> {
        self.loaded.get(category).map(|c| c.assets.as_slice())
    }

    /// Listing of a loaded category.
    pub fn listings(&self, category: &str) -> Option<&[AssetListing]> {
        self.loaded.get(category).map(|c| c.listings.as_slice())
    }

    /// Number of listed entries, failed ones included.
    pub fn len(&self, category: &str) -> usize {
        self.loaded.get(category).map_or(0, |c| c.listings.len())
    }

    /// Decoded asset at `index`, or `None` if it is missing or failed to decode.
    pub fn get(&self, category: &str, index: usize) -> Option<&JewelryAsset> {
        self.loaded.get(category)?.assets.get(index)?.as_ref()
    }

    /// Position of `asset_id` in a loaded category.
    pub fn index_of(&self, category: &str, asset_id: &str) -> Option<usize> {
        self.loaded
            .get(category)?
            .listings
            .iter()
            .position(|l| l.id == asset_id)
    }

    /// Fonts used for SVG text.
    pub fn fontdb(&self) -> &Arc<usvg::fontdb::Database> {
        &self.fontdb
    }
}

const IMAGE_EXTENSIONS: [&str; 8] = ["png", "jpg", "jpeg", "webp", "gif", "bmp", "tif", "svg"];

/// Categories as sub-directories of `root`, assets as image files inside them.
///
/// Files are ordered by [`natural_cmp`] so `necklace_2.png` sorts before `necklace_10.png`.
#[derive(Clone, Debug)]
pub struct DirectoryAssetSource {
    root: PathBuf,
}

impl DirectoryAssetSource {
    /// Source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetSource for DirectoryAssetSource {
    fn list(&self, category: &str) -> TryOnResult<Vec<AssetListing>> {
        let rel = normalize_rel_path(category)?;
        let dir = self.root.join(&rel);
        let rd = std::fs::read_dir(&dir)
            .with_context(|| format!("read category dir '{}'", dir.display()))?;

        let mut names = Vec::new();
        for entry in rd {
            let entry = entry.with_context(|| format!("read entry in '{}'", dir.display()))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let is_image = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));
            if !is_image {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                names.push(name.to_string());
            }
        }
        names.sort_by(|a, b| natural_cmp(a, b));

        Ok(names
            .into_iter()
            .map(|name| AssetListing {
                id: name.clone(),
                source_uri: format!("{rel}/{name}"),
                name,
            })
            .collect())
    }

    fn fetch(&self, listing: &AssetListing) -> TryOnResult<Vec<u8>> {
        let rel = normalize_rel_path(&listing.source_uri)?;
        let path = self.root.join(Path::new(&rel));
        let bytes = std::fs::read(&path)
            .with_context(|| format!("read asset bytes from '{}'", path.display()))?;
        Ok(bytes)
    }
}

/// Normalize and validate a source-relative path.
///
/// The result uses `/` separators, drops `.` segments, and rejects absolute paths or `..`.
pub fn normalize_rel_path(source: &str) -> TryOnResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(TryOnError::validation("asset paths must be relative"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(TryOnError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(TryOnError::validation("asset path must be non-empty"));
    }
    Ok(out.join("/"))
}

/// File name order that compares digit runs by value and everything else case-insensitively.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut ai = a.chars().peekable();
    let mut bi = b.chars().peekable();
    loop {
        match (ai.peek().copied(), bi.peek().copied()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(ca), Some(cb)) if ca.is_ascii_digit() && cb.is_ascii_digit() => {
                let na = take_digits(&mut ai);
                let nb = take_digits(&mut bi);
                let ta = na.trim_start_matches('0');
                let tb = nb.trim_start_matches('0');
                let ord = ta.len().cmp(&tb.len()).then_with(|| ta.cmp(tb));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(ca), Some(cb)) => {
                let ord = ca.to_lowercase().cmp(cb.to_lowercase());
                if ord != Ordering::Equal {
                    return ord;
                }
                ai.next();
                bi.next();
            }
        }
    }
}

fn take_digits(it: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut s = String::new();
    while let Some(c) = it.next_if(|c| c.is_ascii_digit()) {
        s.push(c);
    }
    s
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
