use crate::config::ConfigError;
use crate::engine::assets::AssetError;
use crate::engine::renderer::RendererError;

#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("renderer initialisation failed: {0}")]
    Renderer(#[from] RendererError),

    #[error("surface out of memory")]
    OutOfMemory,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Asset(#[from] AssetError),
}
