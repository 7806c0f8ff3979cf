pub mod config;
pub mod event;
pub mod service;

pub use config::FrameConfig;
pub use event::{ForwardTarget, KeyCode, KeyInput, Modifiers, Platform};
pub use service::{Service, ServiceError, ServiceRegistry};
