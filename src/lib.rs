pub mod assets;
pub mod draw;
pub mod gauge;
pub mod history;
pub mod instrument;
pub mod mode;
pub mod settings;
pub mod speed_filter;
pub mod trail;

pub use assets::{ResolvedTexture, TextureCache};
pub use draw::Primitive;
pub use instrument::{ConfigField, FrameContext, Instrument, InstrumentConfig, Visualization, VisualizationKind};
pub use mode::{Mode, ModeMachine};
pub use speed_filter::{Position, VelocityFilter};
