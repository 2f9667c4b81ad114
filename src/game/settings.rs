use serde::{Deserialize, Serialize};

use super::board::Building;
use super::error::DataError;
use super::globals::*;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// House rules for one game. Every field falls back to the classic value
/// when missing from a settings file.
pub struct Settings {
    /// Cash each player starts with.
    pub starting_cash: i64,
    /// Credited when a forward move wraps past 'Go'.
    pub go_salary: i64,
    /// Cost of leaving jail by paying.
    pub jail_fine: i64,
    /// Failed rolls after which the fine is taken automatically.
    pub max_jail_attempts: u8,
    pub house_cost: i64,
    pub hotel_cost: i64,
    /// What a house adds to a player's net worth.
    pub house_value: i64,
    /// What a hotel adds to a player's net worth.
    pub hotel_value: i64,
    /// Interest charged on top of the mortgage value when unmortgaging.
    pub unmortgage_premium_percent: i64,
    /// Whether rolling doubles three times in a row sends the player to jail.
    pub three_doubles_to_jail: bool,
    pub min_players: usize,
    pub max_players: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            starting_cash: STARTING_CASH,
            go_salary: GO_SALARY,
            jail_fine: JAIL_FINE,
            max_jail_attempts: MAX_JAIL_ATTEMPTS,
            house_cost: HOUSE_COST,
            hotel_cost: HOTEL_COST,
            house_value: HOUSE_VALUE,
            hotel_value: HOTEL_VALUE,
            unmortgage_premium_percent: UNMORTGAGE_PREMIUM_PERCENT,
            three_doubles_to_jail: true,
            min_players: MIN_PLAYERS,
            max_players: MAX_PLAYERS,
        }
    }
}

impl Settings {
    /// Parse settings from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Settings, DataError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Cash needed to lift a mortgage of `mortgage_value`, rounded up.
    pub fn unmortgage_cost(&self, mortgage_value: i64) -> i64 {
        let scaled = mortgage_value * (100 + self.unmortgage_premium_percent);
        (scaled + 99).div_euclid(100)
    }

    /// Price of putting up one building of the given kind.
    pub fn build_cost(&self, kind: Building) -> i64 {
        match kind {
            Building::House => self.house_cost,
            Building::Hotel => self.hotel_cost,
        }
    }
}
