pub mod assets;
pub mod pipeline;
pub mod predict;
pub mod reporter;
pub mod search;
pub mod transcript;

pub use pipeline::*;
pub use predict::*;
pub use reporter::*;
pub use search::*;
pub use transcript::*;
