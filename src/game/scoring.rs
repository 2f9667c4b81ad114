//! Endgame scoring and handing the ranking over to the ranking service.

use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::board::Board;
use super::error::{StoreError, SubmitError};
use super::player::Player;
use super::settings::Settings;
use super::state::State;

/// Cash plus the value of everything the player owns. Mortgaged squares
/// count against the player by their mortgage value.
pub fn net_worth(board: &Board, player: &Player, settings: &Settings) -> i64 {
    player
        .owned
        .iter()
        .filter_map(|&position| board.square(position))
        .fold(player.cash, |worth, square| {
            let holding = square.holding;

            if holding.mortgaged {
                return worth - square.mortgage_value().unwrap_or(0);
            }

            let buildings = i64::from(holding.houses) * settings.house_value
                + if holding.hotel { settings.hotel_value } else { 0 };

            worth + square.price().unwrap_or(0) + buildings
        })
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// One row of the ranking, as the ranking service expects it.
pub struct RankingEntry {
    pub nick_name: String,
    pub score: i64,
    pub country_code: String,
    pub token: String,
}

/// Every player sorted by net worth, richest first. Ties keep seat order.
pub fn ranking(state: &State, settings: &Settings) -> Vec<RankingEntry> {
    let mut entries: Vec<RankingEntry> = state
        .players
        .iter()
        .map(|player| RankingEntry {
            nick_name: player.nickname.clone(),
            score: net_worth(&state.board, player, settings),
            country_code: player.country_code.clone(),
            token: player.token.clone(),
        })
        .collect();

    entries.sort_by_key(|entry| Reverse(entry.score));
    entries
}

/// The richest player still in the game. Ties go to the lower seat.
pub fn winner<'a>(state: &'a State, settings: &Settings) -> Option<&'a Player> {
    state
        .active_players()
        .min_by_key(|player| (Reverse(net_worth(&state.board, player, settings)), player.id))
}

/*********        SUBMISSION        *********/

/// The remote ranking service.
pub trait RankingClient {
    fn submit_batch(&mut self, entries: &[RankingEntry]) -> Result<(), SubmitError>;
    fn submit_one(&mut self, entry: &RankingEntry) -> Result<(), SubmitError>;
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
/// The ranking of the last game, kept around when it couldn't be submitted.
pub struct LastGame {
    pub entries: Vec<RankingEntry>,
}

/// Somewhere to keep the last game between sessions.
pub trait SnapshotStore {
    fn save(&mut self, snapshot: &LastGame) -> Result<(), StoreError>;
    fn load(&self) -> Result<Option<LastGame>, StoreError>;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Where a ranking ended up.
pub enum Submission {
    /// Accepted in one request.
    Batch,
    /// Accepted entry by entry after the batch request failed.
    OneByOne,
    /// The service didn't take everything, so the snapshot was stored locally.
    Stored,
    /// Neither the service nor the store took it.
    Lost,
}

/// Submit a ranking, trying the batch endpoint first and single entries
/// second. If any entry doesn't make it, the whole ranking is stored.
pub fn submit_ranking<C, S>(client: &mut C, store: &mut S, entries: &[RankingEntry]) -> Submission
where
    C: RankingClient + ?Sized,
    S: SnapshotStore + ?Sized,
{
    match client.submit_batch(entries) {
        Ok(()) => return Submission::Batch,
        Err(e) => log::warn!("batch submission failed, retrying one by one: {}", e),
    }

    let mut failed = 0;
    for entry in entries {
        if let Err(e) = client.submit_one(entry) {
            log::warn!("couldn't submit {}: {}", entry.nick_name, e);
            failed += 1;
        }
    }

    if failed == 0 {
        return Submission::OneByOne;
    }

    let snapshot = LastGame {
        entries: entries.to_vec(),
    };

    match store.save(&snapshot) {
        Ok(()) => {
            log::info!("stored the ranking of the last game locally");
            Submission::Stored
        }
        Err(e) => {
            log::error!("ranking lost: {}", e);
            Submission::Lost
        }
    }
}

#[derive(Clone, Debug)]
/// Keeps the last game as a JSON file.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> FileStore {
        FileStore {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for FileStore {
    fn save(&mut self, snapshot: &LastGame) -> Result<(), StoreError> {
        fs::write(&self.path, serde_json::to_string_pretty(snapshot)?)?;
        Ok(())
    }

    fn load(&self) -> Result<Option<LastGame>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
