//! 导出服务
//!
//! 笔记渲染结果经离屏渲染上下文导出为图片或 PDF。渲染跑在阻塞线程上，
//! 各次导出使用独立上下文与独立临时文件，互不干扰。

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{info, warn};

use crate::core::Service;

use super::file::{sanitize_file_name, timestamp_millis};
use super::ports::{DialogHost, FileFilter, OffscreenRenderer, RenderError};

const EXPORT_PAGE_WIDTH: u32 = 980;
const EXPORT_PAGE_HEIGHT: u32 = 600;
const EXPORT_BOTTOM_MARGIN: u32 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Image,
    Pdf,
}

impl ExportKind {
    pub fn extension(self) -> &'static str {
        match self {
            ExportKind::Image => ".png",
            ExportKind::Pdf => ".pdf",
        }
    }

    fn filter(self) -> FileFilter {
        match self {
            ExportKind::Image => FileFilter {
                name: "Image".to_string(),
                extensions: vec!["png".to_string()],
            },
            ExportKind::Pdf => FileFilter {
                name: "Pdf".to_string(),
                extensions: vec!["pdf".to_string()],
            },
        }
    }
}

#[derive(Debug)]
pub enum ExportError {
    Render(String),
    WriteTemp { path: PathBuf, message: String },
    Save { path: PathBuf, message: String },
    TaskFailed(String),
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Render(e) => write!(f, "导出渲染失败: {}", e),
            ExportError::WriteTemp { path, message } => {
                write!(f, "导出文件写入失败 \"{}\" — {}", path.display(), message)
            }
            ExportError::Save { path, message } => {
                write!(f, "导出文件保存失败 \"{}\" — {}", path.display(), message)
            }
            ExportError::TaskFailed(e) => write!(f, "导出任务中断: {}", e),
        }
    }
}

impl std::error::Error for ExportError {}

pub struct ExportService {
    renderer: Arc<dyn OffscreenRenderer>,
    dialogs: Arc<dyn DialogHost>,
    temp_dir: PathBuf,
    downloads_dir: PathBuf,
    sequence: AtomicU64,
}

impl ExportService {
    pub fn new(
        renderer: Arc<dyn OffscreenRenderer>,
        dialogs: Arc<dyn DialogHost>,
        temp_dir: PathBuf,
        downloads_dir: PathBuf,
    ) -> Self {
        Self {
            renderer,
            dialogs,
            temp_dir,
            downloads_dir,
            sequence: AtomicU64::new(0),
        }
    }

    /// Render the note body offscreen and write the artifact to a distinct
    /// temp file. Concurrent exports do not coordinate.
    pub async fn export(
        &self,
        kind: ExportKind,
        content: String,
        css: String,
    ) -> Result<PathBuf, ExportError> {
        let renderer = Arc::clone(&self.renderer);
        let data =
            tokio::task::spawn_blocking(move || render_export(renderer.as_ref(), kind, &content, &css))
                .await
                .map_err(|e| ExportError::TaskFailed(e.to_string()))?
                .map_err(|e| ExportError::Render(e.to_string()))?;

        let path = self.temp_dir.join(format!(
            "notes_export_{}_{}{}",
            timestamp_millis(),
            self.sequence.fetch_add(1, Ordering::Relaxed),
            kind.extension()
        ));
        tokio::fs::write(&path, &data)
            .await
            .map_err(|e| ExportError::WriteTemp {
                path: path.clone(),
                message: e.to_string(),
            })?;
        info!(path = %path.display(), bytes = data.len(), "export rendered");
        Ok(path)
    }

    /// Move the rendered artifact to a user-chosen location. Rename first;
    /// cross-device renames fall back to copy-then-delete.
    pub fn save_export_file(
        &self,
        tmp: &Path,
        title: &str,
        kind: ExportKind,
    ) -> Result<Option<PathBuf>, ExportError> {
        let title = sanitize_file_name(title);
        let default = self
            .downloads_dir
            .join(format!("{}{}", title, kind.extension()));
        let Some(save_path) = self.dialogs.save_dialog(&default, Some(&kind.filter())) else {
            return Ok(None);
        };

        if let Err(rename_err) = std::fs::rename(tmp, &save_path) {
            warn!(error = %rename_err, "rename failed, falling back to copy");
            std::fs::copy(tmp, &save_path).map_err(|e| ExportError::Save {
                path: save_path.clone(),
                message: e.to_string(),
            })?;
            let _ = std::fs::remove_file(tmp);
        }
        self.dialogs.hide_main_window();
        self.dialogs.reveal_in_folder(&save_path);
        Ok(Some(save_path))
    }
}

impl Service for ExportService {
    fn name(&self) -> &'static str {
        "ExportService"
    }
}

/// One full render pass on its own context. The context is destroyed on
/// every exit path before the result propagates.
fn render_export(
    renderer: &dyn OffscreenRenderer,
    kind: ExportKind,
    content: &str,
    css: &str,
) -> Result<Vec<u8>, RenderError> {
    let mut ctx = renderer.create_context(EXPORT_PAGE_WIDTH, EXPORT_PAGE_HEIGHT)?;
    let result = (|| {
        if !css.is_empty() {
            ctx.insert_css(css)?;
        }
        ctx.set_body_html(content)?;
        ctx.wait_images_loaded()?;
        match kind {
            ExportKind::Image => {
                let height = ctx.content_height()?;
                ctx.resize(EXPORT_PAGE_WIDTH, height + EXPORT_BOTTOM_MARGIN)?;
                ctx.capture_png()
            }
            ExportKind::Pdf => ctx.print_pdf(),
        }
    })();
    ctx.destroy();
    result
}
