//! 附件缓存
//!
//! 附件以内容摘要命名，物化到临时缓存目录；同一附件第二次访问直接命中
//! 磁盘文件。失败一律返回 None，由上层决定是否提示。

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::core::Service;

use super::image::{hex_digest, parse_data_url};
use super::ports::{AttachmentStore, UrlFetcher};

const IMAGE_MIME_EXTENSIONS: &[(&str, &str)] = &[
    ("image/bmp", ".bmp"),
    ("image/gif", ".gif"),
    ("image/vnd.microsoft.icon", ".ico"),
    ("image/jpeg", ".jpg"),
    ("image/png", ".png"),
    ("image/svg+xml", ".svg"),
    ("image/tiff", ".tiff"),
    ("image/webp", ".webp"),
];

fn extension_for_mime(mime: &str) -> Option<&'static str> {
    IMAGE_MIME_EXTENSIONS
        .iter()
        .find(|(known, _)| *known == mime)
        .map(|(_, ext)| *ext)
}

pub struct AttachmentService {
    cache_dir: PathBuf,
    /// attachment id → file extension, resolved from store metadata once
    ext_cache: FxHashMap<String, Option<String>>,
    store: Box<dyn AttachmentStore>,
    fetcher: Box<dyn UrlFetcher>,
}

impl AttachmentService {
    pub fn new(
        cache_dir: PathBuf,
        store: Box<dyn AttachmentStore>,
        fetcher: Box<dyn UrlFetcher>,
    ) -> Self {
        Self {
            cache_dir,
            ext_cache: FxHashMap::default(),
            store,
            fetcher,
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Materialize the attachment with this id into the cache directory and
    /// return its path. Hits the existing file when already materialized.
    pub fn temp_path(&mut self, id: &str) -> Option<PathBuf> {
        let ext = match self.ext_cache.get(id) {
            Some(cached) => cached.clone(),
            None => {
                let ext = self
                    .store
                    .content_type(id)
                    .map(|ct| ct.replace("image/", "."));
                self.ext_cache.insert(id.to_string(), ext.clone());
                ext
            }
        };
        let file = self
            .cache_dir
            .join(format!("{}{}", id, ext.as_deref().unwrap_or("")));
        if file.exists() {
            return Some(file);
        }
        let data = self.store.attachment(id)?;
        if std::fs::create_dir_all(&self.cache_dir).is_err() {
            return None;
        }
        std::fs::write(&file, data).ok()?;
        debug!(id, path = %file.display(), "attachment materialized");
        Some(file)
    }

    /// Save an image referenced by a data URL or an http(s) source into the
    /// cache, addressed by its content digest.
    pub fn save_image_by_src(&self, src: &str) -> Option<PathBuf> {
        let (ext, data) = if let Some((mime, payload)) = parse_data_url(src) {
            let ext = extension_for_mime(&mime)?;
            (ext, BASE64.decode(payload).ok()?)
        } else {
            let lowered = src.to_ascii_lowercase();
            if !lowered.starts_with("http://") && !lowered.starts_with("https://") {
                return None;
            }
            let (mime, bytes) = self.fetcher.fetch(src)?;
            let ext = extension_for_mime(&mime.to_ascii_lowercase())?;
            (ext, bytes)
        };
        let dest = self
            .cache_dir
            .join(format!("{}{}", hex_digest(&data), ext));
        if dest.exists() {
            return Some(dest);
        }
        std::fs::create_dir_all(&self.cache_dir).ok()?;
        std::fs::write(&dest, data).ok()?;
        Some(dest)
    }
}

impl Service for AttachmentService {
    fn name(&self) -> &'static str {
        "AttachmentService"
    }
}
