//! 笔记文件服务
//!
//! 导出笔记到磁盘：Markdown 直写，HTML 组装成独立页面；目标路径来自
//! 调用方或保存对话框，附带的资源文件一并复制。

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::info;

use crate::core::Service;

use super::ports::{DialogHost, FileFilter};

#[derive(Debug)]
pub enum NoteFileError {
    CreateFolder { path: PathBuf, message: String },
    WriteFile { path: PathBuf, message: String },
}

impl std::fmt::Display for NoteFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoteFileError::CreateFolder { path, message } => {
                write!(f, "无法创建文件夹 \"{}\" — {}", path.display(), message)
            }
            NoteFileError::WriteFile { path, message } => {
                write!(f, "内容无法写入文件 \"{}\" — {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for NoteFileError {}

/// Strip path separators; a name that ends up blank falls back to a
/// millisecond timestamp.
pub(crate) fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name.chars().filter(|c| *c != '/' && *c != '\\').collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        timestamp_millis().to_string()
    } else {
        cleaned.to_string()
    }
}

pub(crate) fn timestamp_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

pub struct NoteFileService {
    dialogs: Arc<dyn DialogHost>,
    downloads_dir: PathBuf,
    /// Bundled stylesheet/font assets for standalone HTML export.
    assets_dir: Option<PathBuf>,
}

impl NoteFileService {
    pub fn new(
        dialogs: Arc<dyn DialogHost>,
        downloads_dir: PathBuf,
        assets_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            dialogs,
            downloads_dir,
            assets_dir,
        }
    }

    /// Write a markdown note. `folder == None` asks the user where to save
    /// and reveals the result. Returns `None` when the dialog is cancelled.
    pub fn write_markdown_file(
        &self,
        folder: Option<&Path>,
        title: &str,
        content: &str,
        extras: &[PathBuf],
    ) -> Result<Option<PathBuf>, NoteFileError> {
        self.write_note_file(folder, title, content, extras, "md", false)
    }

    /// Assemble a standalone HTML page around the rendered note body and
    /// write it where the user chooses.
    pub fn write_html_file(
        &self,
        title: &str,
        html: &str,
        style: &str,
        extras: &[PathBuf],
        with_katex: bool,
    ) -> Result<Option<PathBuf>, NoteFileError> {
        let mut extras = extras.to_vec();
        if with_katex {
            if let Some(assets) = &self.assets_dir {
                extras.push(assets.join("katex.min.css"));
            }
        }
        let page = self.html_page(title, html, style, with_katex);
        self.write_note_file(None, title, &page, &extras, "html", with_katex)
    }

    fn html_page(&self, title: &str, body: &str, style: &str, with_katex: bool) -> String {
        let markdown_css = self
            .assets_dir
            .as_ref()
            .map(|dir| self.file_content(&dir.join("github-markdown.css")))
            .unwrap_or_default();
        let katex_link = if with_katex {
            "<link rel=\"stylesheet\" href=\"./katex.min.css\">"
        } else {
            ""
        };
        format!(
            r#"<!doctype html>
<html>
<head>
  <meta charset="utf-8"/>
  <title>{title}</title>
  {katex_link}
  <style>
    html, body {{ margin: 0; padding: 0; background-color: #ffffff; }}
    .markdown-body {{ box-sizing: border-box; min-width: 200px; max-width: 980px; margin: 0 auto; padding: 45px; }}
    @media (max-width: 767px) {{ .markdown-body {{ padding: 15px; }} }}
    {markdown_css}
    {style}
  </style>
</head>
<body>
  <article class="markdown-body">
    {body}
  </article>
</body>
</html>"#
        )
    }

    fn write_note_file(
        &self,
        folder: Option<&Path>,
        name: &str,
        content: &str,
        extras: &[PathBuf],
        ext: &str,
        with_fonts: bool,
    ) -> Result<Option<PathBuf>, NoteFileError> {
        let is_temp = folder.is_none();
        let name = sanitize_file_name(name);

        let save_path = if !extras.is_empty() {
            // resources travel with the note, so the target is a folder
            let folder = match folder {
                Some(folder) => folder.to_path_buf(),
                None => {
                    let default = self.downloads_dir.join(&name);
                    match self.dialogs.save_dialog(&default, None) {
                        Some(chosen) => chosen,
                        None => return Ok(None),
                    }
                }
            };
            if !folder.is_dir() {
                std::fs::create_dir_all(&folder).map_err(|e| NoteFileError::CreateFolder {
                    path: folder.clone(),
                    message: e.to_string(),
                })?;
            }
            for src in extras {
                if let Some(base) = src.file_name() {
                    let _ = std::fs::copy(src, folder.join(base));
                }
            }
            if ext == "html" && with_fonts {
                self.copy_fonts(&folder);
            }
            folder.join(format!("{}.{}", name, ext))
        } else if let Some(folder) = folder {
            folder.join(format!("{}.{}", name, ext))
        } else {
            let default = self.downloads_dir.join(format!("{}.{}", name, ext));
            let filter = FileFilter {
                name: if ext == "md" {
                    "Markdown".to_string()
                } else {
                    ext.to_string()
                },
                extensions: vec![ext.to_string()],
            };
            match self.dialogs.save_dialog(&default, Some(&filter)) {
                Some(chosen) => chosen,
                None => return Ok(None),
            }
        };

        std::fs::write(&save_path, content).map_err(|e| NoteFileError::WriteFile {
            path: save_path.clone(),
            message: e.to_string(),
        })?;
        info!(path = %save_path.display(), "note file written");
        if is_temp {
            self.dialogs.hide_main_window();
            self.dialogs.reveal_in_folder(&save_path);
        }
        Ok(Some(save_path))
    }

    fn copy_fonts(&self, folder: &Path) {
        let Some(assets) = &self.assets_dir else {
            return;
        };
        let Ok(entries) = std::fs::read_dir(assets.join("fonts")) else {
            return;
        };
        let dest = folder.join("fonts");
        if !dest.exists() && std::fs::create_dir(&dest).is_err() {
            return;
        }
        for entry in entries.flatten() {
            let _ = std::fs::copy(entry.path(), dest.join(entry.file_name()));
        }
    }

    pub fn make_folder(&self, dir: &Path, name: &str) -> Result<PathBuf, NoteFileError> {
        let dest = dir.join(name);
        if !dest.exists() {
            std::fs::create_dir_all(&dest).map_err(|e| NoteFileError::CreateFolder {
                path: dest.clone(),
                message: e.to_string(),
            })?;
        }
        Ok(dest)
    }

    /// Best-effort read; unreadable files come back empty.
    pub fn file_content(&self, path: &Path) -> String {
        std::fs::read_to_string(path).unwrap_or_default()
    }

    pub fn file_base_name(&self, path: &Path) -> String {
        path.file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    pub fn file_url_to_path(&self, value: &str) -> Option<PathBuf> {
        url::Url::parse(value).ok()?.to_file_path().ok()
    }

    /// Resolve an image reference relative to the markdown file it sits in.
    pub fn resolve_relative_image(&self, md_file: &Path, url_path: &str) -> Option<PathBuf> {
        let resolved = md_file.parent()?.join(url_path);
        resolved.exists().then_some(resolved)
    }

    pub fn open_path(&self, path: &Path) {
        if !path.exists() {
            self.dialogs
                .notify(&format!("\"{}\" 路径不存在!", path.display()));
            return;
        }
        self.dialogs.open_path(path);
    }
}

impl Service for NoteFileService {
    fn name(&self) -> &'static str {
        "NoteFileService"
    }
}
