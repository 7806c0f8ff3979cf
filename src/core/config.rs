//! 帧配置：行高、内边距等渲染常量

use super::event::Platform;

#[derive(Clone, Debug)]
pub struct FrameConfig {
    /// Rendered height of one screen line, px-equivalent.
    pub line_height: u32,
    /// Fixed vertical chrome added to every height report.
    pub height_padding: u32,
    pub platform: Platform,
    pub dark_theme: bool,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            // 14px font at 1.42 line height
            line_height: 20,
            height_padding: 16,
            platform: Platform::detect(),
            dark_theme: false,
        }
    }
}

impl FrameConfig {
    pub fn frame_height(&self, lines: usize) -> u32 {
        lines as u32 * self.line_height + self.height_padding
    }
}
