pub mod analysis;
pub mod board;
pub mod error;
pub mod history;
pub mod selection;
