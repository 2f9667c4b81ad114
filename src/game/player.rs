use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

use super::data::Country;
use super::error::SetupError;
use super::globals::MIN_PLAYERS;
use super::settings::Settings;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// What the lobby form provides for one seat.
pub struct PlayerSetup {
    pub nickname: String,
    /// The token (or color) the player moves around the board.
    pub token: String,
    pub country_code: String,
}

impl PlayerSetup {
    pub fn new(nickname: &str, token: &str, country_code: &str) -> PlayerSetup {
        PlayerSetup {
            nickname: nickname.to_owned(),
            token: token.to_owned(),
            country_code: country_code.to_owned(),
        }
    }

    /// Create `amount` deterministic seats, for tests and simulations.
    pub fn fixtures(amount: usize) -> Vec<PlayerSetup> {
        const TOKENS: [&str; 8] = [
            "red", "blue", "green", "yellow", "purple", "orange", "cyan", "pink",
        ];

        (0..amount)
            .map(|i| PlayerSetup {
                nickname: format!("Player {}", i + 1),
                token: TOKENS[i % TOKENS.len()].to_owned(),
                country_code: "ES".to_owned(),
            })
            .collect()
    }
}

/// Check a lobby before a game is created from it. The country
/// check is skipped when no country list could be loaded. Settings
/// can raise the player minimum but never take it below two.
pub fn validate_setups(
    setups: &[PlayerSetup],
    settings: &Settings,
    countries: &[Country],
) -> Result<(), SetupError> {
    let min = settings.min_players.max(MIN_PLAYERS);

    if setups.len() < min {
        return Err(SetupError::TooFewPlayers {
            min,
            got: setups.len(),
        });
    }

    if setups.len() > settings.max_players {
        return Err(SetupError::TooManyPlayers {
            max: settings.max_players,
            got: setups.len(),
        });
    }

    let mut nicknames = HashSet::new();

    for (i, setup) in setups.iter().enumerate() {
        let nickname = setup.nickname.trim();

        if nickname.is_empty() {
            return Err(SetupError::EmptyNickname(i));
        }

        if !nicknames.insert(nickname.to_lowercase()) {
            return Err(SetupError::DuplicateNickname(nickname.to_owned()));
        }

        if !countries.is_empty() && !countries.iter().any(|c| c.code == setup.country_code) {
            return Err(SetupError::UnknownCountry(setup.country_code.clone()));
        }
    }

    Ok(())
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct JailStatus {
    /// Whether the player is currently in jail.
    pub in_jail: bool,
    /// Failed attempts at rolling doubles during this stay.
    pub attempts: u8,
}

#[derive(Clone, Debug)]
/// A player playing the game.
pub struct Player {
    /// The player's seat, which is also their index in the player list.
    pub id: usize,
    pub nickname: String,
    pub token: String,
    pub country_code: String,
    /// The amount of money the player has.
    pub cash: i64,
    /// The player's position around the board. 'Go' is at 0.
    pub position: usize,
    pub jail: JailStatus,
    /// The number of consecutive doubles the player has rolled.
    pub doubles_rolled: u8,
    /// Positions of the squares this player owns. The squares
    /// themselves hold everything else about the ownership.
    pub owned: BTreeSet<usize>,
    /// A bankrupt player is out of the rotation for good.
    pub bankrupt: bool,
}

impl Player {
    /// Create a player sitting on 'Go'.
    pub fn new(id: usize, setup: &PlayerSetup, cash: i64) -> Player {
        Player {
            id,
            nickname: setup.nickname.trim().to_owned(),
            token: setup.token.clone(),
            country_code: setup.country_code.clone(),
            cash,
            position: 0,
            jail: JailStatus::default(),
            doubles_rolled: 0,
            owned: BTreeSet::new(),
            bankrupt: false,
        }
    }

    /// Create a vector of players from a lobby.
    pub fn multiple_new(setups: &[PlayerSetup], cash: i64) -> Vec<Player> {
        setups
            .iter()
            .enumerate()
            .map(|(id, setup)| Player::new(id, setup, cash))
            .collect()
    }

    /// Put the player back on 'Go' with `cash` and nothing else.
    pub fn reset(&mut self, cash: i64) {
        self.cash = cash;
        self.position = 0;
        self.jail = JailStatus::default();
        self.doubles_rolled = 0;
        self.owned.clear();
        self.bankrupt = false;
    }

    pub fn in_jail(&self) -> bool {
        self.jail.in_jail
    }

    pub fn owns(&self, position: usize) -> bool {
        self.owned.contains(&position)
    }

    pub fn can_afford(&self, amount: i64) -> bool {
        self.cash >= amount
    }

    pub fn is_active(&self) -> bool {
        !self.bankrupt
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pos_color = if self.in_jail() { "\x1b[31m" } else { "\x1b[36m" };

        if self.bankrupt {
            return write!(f, "[\x1b[31mXX\x1b[0m] {} is bankrupt", self.nickname);
        }

        write!(
            f,
            "[{}{:02}\x1b[0m] \x1b[33m{}\x1b[0mdbls \x1b[32m${}\x1b[0m {} ({} owned)",
            pos_color,
            self.position,
            self.doubles_rolled,
            self.cash,
            self.nickname,
            self.owned.len()
        )
    }
}
