mod chat;
mod chunk;
mod common;
mod document;
mod intent;
mod reservation;

pub use chat::*;
pub use chunk::*;
pub use common::*;
pub use document::*;
pub use intent::*;
pub use reservation::*;
