//! 宿主服务层
//!
//! 主进程侧的能力面：文件写出、剪贴板、图片提取、附件缓存、离屏导出。
//! 各服务相互独立，统一注册进 [`ServiceRegistry`] 供应用层取用。

pub mod attachment;
pub mod clipboard;
pub mod export;
pub mod file;
pub mod image;
pub mod ports;

use std::path::PathBuf;
use std::sync::Arc;

use crate::core::service::Result as ServiceResult;
use crate::core::ServiceRegistry;

pub use attachment::AttachmentService;
pub use clipboard::{ClipboardService, SystemClipboard};
pub use export::{ExportError, ExportKind, ExportService};
pub use file::{NoteFileError, NoteFileService};
pub use image::{ImageData, ImageError, ImageService, IMAGE_SIZE_LIMIT};
pub use ports::{
    AttachmentStore, ClipboardData, ClipboardPort, DialogHost, FileFilter, HttpFetcher,
    OffscreenRenderer, RenderContext, RenderError, UrlFetcher,
};

/// Everything the host services need from the surrounding application.
pub struct HostPorts {
    pub dialogs: Arc<dyn DialogHost>,
    pub clipboard: Box<dyn ClipboardPort>,
    pub renderer: Arc<dyn OffscreenRenderer>,
    pub attachments: Box<dyn AttachmentStore>,
    pub fetcher: Box<dyn UrlFetcher>,
    pub downloads_dir: PathBuf,
    pub temp_dir: PathBuf,
    pub assets_dir: Option<PathBuf>,
}

/// Register the full service surface into one registry.
pub fn register_services(registry: &mut ServiceRegistry, ports: HostPorts) -> ServiceResult<()> {
    let cache_dir = ports.temp_dir.join("blockedit.notes");
    registry.register(NoteFileService::new(
        Arc::clone(&ports.dialogs),
        ports.downloads_dir.clone(),
        ports.assets_dir,
    ))?;
    registry.register(ClipboardService::new(ports.clipboard))?;
    registry.register(ImageService::new())?;
    registry.register(AttachmentService::new(
        cache_dir,
        ports.attachments,
        ports.fetcher,
    ))?;
    registry.register(ExportService::new(
        ports.renderer,
        ports.dialogs,
        ports.temp_dir,
        ports.downloads_dir,
    ))?;
    Ok(())
}
