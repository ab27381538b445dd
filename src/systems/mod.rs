//! The ECS side of the simulation: components, resources and the systems that drive a tick.

pub mod audio;
pub mod bonus;
pub mod components;
pub mod input;
pub mod level;
pub mod player;
pub mod pursuer;
pub mod render;
pub mod score;
pub mod state;

pub use self::audio::*;
pub use self::bonus::*;
pub use self::components::*;
pub use self::input::*;
pub use self::level::*;
pub use self::player::*;
pub use self::pursuer::*;
pub use self::render::*;
pub use self::score::*;
pub use self::state::*;
