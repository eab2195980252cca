use wasm_bindgen::JsValue;

use crate::mapbox::js_message;

// Re-export shared types from poem_types
pub use poem_types::{Dynasty, DynastyConfig, LoadError, LocationGroup, PoemCursor};

/// Map errors with this text are transient and never shown.
pub const STYLE_NOT_DONE: &str = "Style is not done loading";

/// Errors surfaced to the reader through the error banner.
///
/// `Display` is the banner text; the detail goes to the console.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PageError {
    #[error("加载诗歌数据失败")]
    Load(String),
    #[error("地图初始化失败：{0}")]
    MapInit(String),
    #[error("添加标记点失败")]
    Markers(String),
    #[error("设置自定义样式失败")]
    SetStyle(String),
    #[error("样式加载失败，使用默认样式")]
    StyleLoad(String),
    #[error("地图错误：{0}")]
    Map(String),
    /// The page was left before set-up finished.
    #[error("页面已关闭")]
    Closed(String),
}

impl PageError {
    pub fn map_init(value: JsValue) -> Self {
        Self::MapInit(js_message(&value))
    }

    pub fn markers(value: JsValue) -> Self {
        Self::Markers(js_message(&value))
    }

    pub fn set_style(value: JsValue) -> Self {
        Self::SetStyle(js_message(&value))
    }

    pub fn detail(&self) -> &str {
        match self {
            Self::Load(d)
            | Self::MapInit(d)
            | Self::Markers(d)
            | Self::SetStyle(d)
            | Self::StyleLoad(d)
            | Self::Map(d)
            | Self::Closed(d) => d,
        }
    }
}

impl From<LoadError> for PageError {
    fn from(e: LoadError) -> Self {
        Self::Load(e.to_string())
    }
}
