//! A Monopoly-style game engine: board model, rules, turns, cards,
//! property transactions and endgame scoring.

pub mod game;

pub use game::*;
