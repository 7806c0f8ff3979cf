//! 图片数据提取
//!
//! 粘贴/拖入的图片统一走这里：校验类型与大小，算出内容摘要。

use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use sha2::{Digest, Sha256};

use crate::core::Service;

/// Payload ceiling for ingested images.
pub const IMAGE_SIZE_LIMIT: usize = 10 * 1024 * 1024;

const APPROVED_EXTENSIONS: &[&str] = &[
    "png", "jpe", "jpg", "jpeg", "bmp", "gif", "svg", "ico", "webp",
];

const DATA_URL_MIMES: &[&str] = &["image/png", "image/jpg", "image/jpeg"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    /// Lowercase hex content digest; used for cache-addressed naming.
    pub digest: String,
    pub name: String,
    pub data: Vec<u8>,
    pub content_type: String,
}

#[derive(Debug)]
pub enum ImageError {
    NotFound,
    NotAnImage,
    TooLarge,
    MultipleFiles,
    BadEncoding,
    Read(String),
}

impl std::fmt::Display for ImageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageError::NotFound => write!(f, "图片文件不存在"),
            ImageError::NotAnImage => write!(f, "非图片格式文件"),
            ImageError::TooLarge => write!(f, "图片大小超过 10 M"),
            ImageError::MultipleFiles => {
                write!(f, "存在多个文件，请复制粘贴一个图片文件")
            }
            ImageError::BadEncoding => write!(f, "图片数据解码失败"),
            ImageError::Read(e) => write!(f, "读取图片失败: {}", e),
        }
    }
}

impl std::error::Error for ImageError {}

pub(crate) fn hex_digest(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}

/// Split a `data:<mime>;base64,<payload>` URL. Returns the lowercased mime
/// and the raw base64 payload.
pub(crate) fn parse_data_url(input: &str) -> Option<(String, &str)> {
    let prefix = input.get(..5)?;
    if !prefix.eq_ignore_ascii_case("data:") {
        return None;
    }
    let (mime, payload) = input[5..].split_once(";base64,")?;
    Some((mime.to_ascii_lowercase(), payload))
}

pub struct ImageService;

impl ImageService {
    pub fn new() -> Self {
        Self
    }

    /// Ingest a data URL or an image file path.
    pub fn image_data(&self, input: &str) -> Result<ImageData, ImageError> {
        if let Some((mime, payload)) = parse_data_url(input) {
            if !DATA_URL_MIMES.contains(&mime.as_str()) {
                return Err(ImageError::NotAnImage);
            }
            let data = BASE64.decode(payload).map_err(|_| ImageError::BadEncoding)?;
            if data.len() > IMAGE_SIZE_LIMIT {
                return Err(ImageError::TooLarge);
            }
            return Ok(ImageData {
                digest: hex_digest(&data),
                name: "screen-capture".to_string(),
                content_type: mime,
                data,
            });
        }

        let path = Path::new(input);
        if !path.exists() {
            return Err(ImageError::NotFound);
        }
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        if !APPROVED_EXTENSIONS.contains(&ext.as_str()) {
            return Err(ImageError::NotAnImage);
        }
        let metadata = std::fs::metadata(path).map_err(|e| ImageError::Read(e.to_string()))?;
        if metadata.len() > IMAGE_SIZE_LIMIT as u64 {
            return Err(ImageError::TooLarge);
        }
        let data = std::fs::read(path).map_err(|e| ImageError::Read(e.to_string()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Ok(ImageData {
            digest: hex_digest(&data),
            name,
            content_type: format!("image/{}", ext),
            data,
        })
    }
}

impl Default for ImageService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service for ImageService {
    fn name(&self) -> &'static str {
        "ImageService"
    }
}
