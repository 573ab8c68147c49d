//! Board-state error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("Invalid FEN: {0}")]
    InvalidFen(String),

    #[error("Invalid square: {0}")]
    InvalidSquare(String),

    #[error("Invalid promotion piece: {0}")]
    InvalidPromotion(String),
}
