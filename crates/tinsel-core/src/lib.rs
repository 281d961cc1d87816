pub mod constants;
pub mod decorations;
pub mod gesture;
pub mod particles;
pub mod photos;
pub mod sprites;
pub mod state;

pub static SPRITES_WGSL: &str = include_str!("../shaders/sprites.wgsl");
pub static QUAD_WGSL: &str = include_str!("../shaders/quad.wgsl");

pub use constants::*;
pub use decorations::*;
pub use gesture::*;
pub use particles::*;
pub use photos::*;
pub use state::*;
