mod client;
mod models;
mod reference;

pub use client::*;
pub use models::*;
pub use reference::*;
