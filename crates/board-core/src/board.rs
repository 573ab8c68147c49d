//! Board-state authority: a single mutable position backed by shakmaty.
//!
//! All rules knowledge (legality, check, SAN) is delegated to shakmaty. This
//! type only adapts it to square-to-square interaction and FEN text.

use shakmaty::{
    fen::Fen, san::SanPlus, uci::UciMove, CastlingMode, Chess, Color, EnPassantMode, Piece,
    Position, Role, Square,
};

use crate::error::BoardError;
use crate::history::MoveRecord;

pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Result of trying to play a move on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The move was played; the record describes it.
    Legal(MoveRecord),
    /// The move is not legal in the current position. Nothing changed.
    Illegal,
}

impl MoveOutcome {
    pub fn is_legal(&self) -> bool {
        matches!(self, MoveOutcome::Legal(_))
    }

    pub fn record(&self) -> Option<&MoveRecord> {
        match self {
            MoveOutcome::Legal(record) => Some(record),
            MoveOutcome::Illegal => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BoardState {
    pos: Chess,
}

impl BoardState {
    pub fn from_fen(fen: &str) -> Result<Self, BoardError> {
        Ok(Self {
            pos: parse_fen(fen)?,
        })
    }

    /// Replace the current position with `fen`.
    /// On error the previous position is left untouched.
    pub fn load(&mut self, fen: &str) -> Result<(), BoardError> {
        self.pos = parse_fen(fen)?;
        Ok(())
    }

    /// Export the current position. En passant squares are only written when
    /// a capture is actually possible.
    pub fn fen(&self) -> String {
        Fen::from_position(&self.pos, EnPassantMode::Legal).to_string()
    }

    pub fn turn(&self) -> Color {
        self.pos.turn()
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.pos.board().piece_at(square)
    }

    /// Every occupied square, a1 first.
    pub fn pieces(&self) -> Vec<(Square, Piece)> {
        (0..64u32)
            .map(Square::new)
            .filter_map(|sq| self.piece_at(sq).map(|piece| (sq, piece)))
            .collect()
    }

    /// True if `square` holds a piece of the side to move.
    pub fn is_own_piece(&self, square: Square) -> bool {
        self.piece_at(square)
            .is_some_and(|piece| piece.color == self.pos.turn())
    }

    /// Squares reachable by one legal move of the piece on `square`.
    /// Castling is reported as the king's destination (g1/c1), and the four
    /// promotion choices collapse into one square.
    pub fn legal_destinations(&self, square: Square) -> Vec<Square> {
        let mut destinations: Vec<Square> = self
            .pos
            .legal_moves()
            .iter()
            .filter(|m| m.from() == Some(square))
            .filter_map(|m| match m.to_uci(CastlingMode::Standard) {
                UciMove::Normal { to, .. } => Some(to),
                _ => None,
            })
            .collect();
        destinations.sort();
        destinations.dedup();
        destinations
    }

    /// Play `from -> to` if legal. `promotion` is only consulted when the move
    /// is a pawn reaching the last rank.
    pub fn apply_move(&mut self, from: Square, to: Square, promotion: Role) -> MoveOutcome {
        let mover = self.pos.turn();

        let candidate = self.pos.legal_moves().into_iter().find(|m| {
            match m.to_uci(CastlingMode::Standard) {
                UciMove::Normal {
                    from: f,
                    to: t,
                    promotion: p,
                } => f == from && t == to && p.map_or(true, |role| role == promotion),
                _ => false,
            }
        });

        let Some(mv) = candidate else {
            return MoveOutcome::Illegal;
        };

        let san = SanPlus::from_move_and_play_unchecked(&mut self.pos, mv);

        MoveOutcome::Legal(MoveRecord {
            san: san.to_string(),
            color: mover,
            fen: self.fen(),
        })
    }

    pub fn is_check(&self) -> bool {
        self.pos.is_check()
    }

    /// Square of the king that is currently in check, if any.
    pub fn checked_king_square(&self) -> Option<Square> {
        if !self.is_check() {
            return None;
        }
        let turn = self.turn();
        self.pieces()
            .into_iter()
            .find(|(_, piece)| piece.role == Role::King && piece.color == turn)
            .map(|(sq, _)| sq)
    }
}

fn parse_fen(fen: &str) -> Result<Chess, BoardError> {
    let parsed: Fen = fen
        .trim()
        .parse()
        .map_err(|e: shakmaty::fen::ParseFenError| BoardError::InvalidFen(e.to_string()))?;
    parsed
        .into_position(CastlingMode::Standard)
        .map_err(|e| BoardError::InvalidFen(e.to_string()))
}

/// Parse an algebraic square name such as `e4`.
pub fn parse_square(name: &str) -> Result<Square, BoardError> {
    name.trim()
        .to_ascii_lowercase()
        .parse()
        .map_err(|_| BoardError::InvalidSquare(name.to_string()))
}

/// Parse a promotion piece letter (`q`, `r`, `b`, `n`).
pub fn parse_promotion(letter: &str) -> Result<Role, BoardError> {
    let mut chars = letter.trim().chars();
    let role = match (chars.next(), chars.next()) {
        (Some(c), None) => Role::from_char(c.to_ascii_lowercase()),
        _ => None,
    };
    match role {
        Some(role @ (Role::Queen | Role::Rook | Role::Bishop | Role::Knight)) => Ok(role),
        _ => Err(BoardError::InvalidPromotion(letter.to_string())),
    }
}
