//! blockedit - 笔记块编辑器桥接库
//!
//! 模块结构：
//! - core: 核心框架（Service, 按键事件, 帧配置）
//! - frame: 帧消息核心（Bridge, KeyRouter, FrameController）
//! - host: 宿主服务层（文件/剪贴板/图片/附件/导出）

pub mod core;
pub mod frame;
pub mod host;
pub mod logging;
