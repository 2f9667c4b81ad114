mod details;
pub use details::*;

use lazy_static::lazy_static;

use super::board::Board;
use super::data::{BoardData, RawCard};

/// The number of squares on the classic board.
pub const BOARD_SIZE: usize = 40;

/// Cash each player starts with.
pub const STARTING_CASH: i64 = 1500;

/// Cash credited for passing 'Go'.
pub const GO_SALARY: i64 = 200;

/// Cost of buying your way out of jail.
pub const JAIL_FINE: i64 = 50;

/// Rolls a jailed player gets before the fine is taken automatically.
pub const MAX_JAIL_ATTEMPTS: u8 = 3;

/// Houses a property can carry before it's ready for a hotel.
pub const MAX_HOUSES: u8 = 4;

pub const HOUSE_COST: i64 = 100;
pub const HOTEL_COST: i64 = 250;

/// Net worth contributed by a house.
pub const HOUSE_VALUE: i64 = 100;

/// Net worth contributed by a hotel.
pub const HOTEL_VALUE: i64 = 200;

/// Interest on top of the mortgage value, in percent.
pub const UNMORTGAGE_PREMIUM_PERCENT: i64 = 10;

/// Consecutive doubles that send a player straight to jail.
pub const DOUBLES_TO_JAIL: u8 = 3;

/// The number of players playing the game. This should be
/// between 2 and 8 inclusive, according to the rules.
pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 8;

/// Railroad rents when the data doesn't carry a schedule.
pub const RAILROAD_RENT: [i64; 4] = [25, 50, 100, 200];

/// Utility dice multipliers when the data doesn't carry them.
pub const UTILITY_MULTIPLIERS: [i64; 2] = [4, 10];

lazy_static! {
    /// The classic board layout, as the backend would serve it.
    pub static ref CLASSIC_BOARD_DATA: BoardData = classic_board_data();

    /// The classic board, validated once.
    pub static ref CLASSIC_BOARD: Board =
        Board::from_data(&CLASSIC_BOARD_DATA).expect("the built-in board is well-formed");

    /// Chance cards used when the backend deck can't be loaded.
    pub static ref FALLBACK_CHANCE: Vec<RawCard> = fallback_chance();

    /// Community chest cards used when the backend deck can't be loaded.
    pub static ref FALLBACK_COMMUNITY_CHEST: Vec<RawCard> = fallback_community_chest();
}
