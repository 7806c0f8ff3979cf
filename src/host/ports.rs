//! 宿主能力端口
//!
//! 服务层依赖的外部能力，全部以 trait 抽象，便于替换与测试。

use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct FileFilter {
    pub name: String,
    pub extensions: Vec<String>,
}

/// Window/dialog surface of the hosting application.
pub trait DialogHost: Send + Sync {
    /// Returns the chosen path, `None` when the user cancelled.
    fn save_dialog(&self, default_path: &Path, filter: Option<&FileFilter>) -> Option<PathBuf>;
    fn reveal_in_folder(&self, path: &Path);
    fn open_path(&self, path: &Path);
    fn notify(&self, message: &str);
    fn hide_main_window(&self);
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClipboardData {
    pub text: String,
    pub html: String,
}

/// Raw clipboard access. Writes are fire-and-forget.
pub trait ClipboardPort {
    fn read_text(&mut self) -> Option<String>;
    fn read_html(&mut self) -> Option<String>;
    fn write_text(&mut self, text: &str);
    fn write_html(&mut self, html: &str);
    /// Bitmap on the clipboard, re-encoded as PNG.
    fn read_image_png(&mut self) -> Option<Vec<u8>>;
    /// Files placed on the clipboard by a copy operation.
    fn copied_files(&mut self) -> Vec<PathBuf>;
}

#[derive(Debug)]
pub struct RenderError(pub String);

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for RenderError {}

/// One offscreen render pass. Contexts are independent; concurrent exports
/// never share one.
pub trait RenderContext {
    fn insert_css(&mut self, css: &str) -> Result<(), RenderError>;
    fn set_body_html(&mut self, html: &str) -> Result<(), RenderError>;
    fn wait_images_loaded(&mut self) -> Result<(), RenderError>;
    fn content_height(&mut self) -> Result<u32, RenderError>;
    fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError>;
    fn capture_png(&mut self) -> Result<Vec<u8>, RenderError>;
    fn print_pdf(&mut self) -> Result<Vec<u8>, RenderError>;
    fn destroy(&mut self);
}

pub trait OffscreenRenderer: Send + Sync {
    fn create_context(
        &self,
        width: u32,
        height: u32,
    ) -> Result<Box<dyn RenderContext>, RenderError>;
}

/// Attachment database of the hosting application.
pub trait AttachmentStore {
    fn content_type(&self, id: &str) -> Option<String>;
    fn attachment(&self, id: &str) -> Option<Vec<u8>>;
}

pub trait UrlFetcher: Send + Sync {
    /// GET the url; returns (mime type, body) or `None` on any failure.
    fn fetch(&self, url: &str) -> Option<(String, Vec<u8>)>;
}

/// Blocking HTTP adapter for remote image sources.
pub struct HttpFetcher;

impl UrlFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Option<(String, Vec<u8>)> {
        let mut response = ureq::get(url).call().ok()?;
        let mime = response
            .body()
            .mime_type()
            .unwrap_or_default()
            .to_string();
        let bytes = response.body_mut().read_to_vec().ok()?;
        Some((mime, bytes))
    }
}
