//! Fetching the board, the decks and the country list, with retries
//! and the fallbacks the game can start without.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use super::board::Board;
use super::cards::{Deck, DeckKind, Decks};
use super::data::{parse_board, parse_cards, parse_countries, Country};
use super::error::{LoadError, SourceError};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// A resource served by the board backend.
pub enum Resource {
    Board,
    Chance,
    CommunityChest,
    Countries,
}

impl Resource {
    /// Name of the file holding the resource in a data directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            Resource::Board => "board.json",
            Resource::Chance => "chance.json",
            Resource::CommunityChest => "community_chest.json",
            Resource::Countries => "countries.json",
        }
    }
}

/// Somewhere the raw JSON of each resource can be fetched from.
pub trait DataSource {
    fn fetch(&self, resource: Resource) -> Result<String, SourceError>;
}

#[derive(Clone, Debug)]
/// Reads resources from JSON files in a directory.
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new<P: AsRef<Path>>(root: P) -> DirSource {
        DirSource {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl DataSource for DirSource {
    fn fetch(&self, resource: Resource) -> Result<String, SourceError> {
        let path = self.root.join(resource.file_name());

        fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
                SourceError::Unavailable(format!("{}: {}", path.display(), e))
            }
            _ => SourceError::Transient(format!("{}: {}", path.display(), e)),
        })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// How often, and how patiently, transient failures are retried.
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub attempts: u32,
    /// Wait before the first retry. Doubles after every retry.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            attempts: 3,
            backoff: Duration::from_millis(200),
        }
    }
}

impl RetryPolicy {
    /// Try once and give up.
    pub fn none() -> RetryPolicy {
        RetryPolicy {
            attempts: 1,
            backoff: Duration::ZERO,
        }
    }
}

/// Fetch a resource, retrying transient failures as the policy allows.
pub fn fetch_with_retry<S: DataSource + ?Sized>(
    source: &S,
    resource: Resource,
    policy: RetryPolicy,
) -> Result<String, SourceError> {
    let mut backoff = policy.backoff;
    let mut attempt = 1;

    loop {
        match source.fetch(resource) {
            Err(SourceError::Transient(reason)) if attempt < policy.attempts => {
                log::warn!(
                    "fetching {:?} failed (attempt {}/{}): {}",
                    resource,
                    attempt,
                    policy.attempts,
                    reason
                );

                if !backoff.is_zero() {
                    thread::sleep(backoff);
                }
                backoff *= 2;
                attempt += 1;
            }
            result => return result,
        }
    }
}

#[derive(Clone, Debug)]
/// Everything a game is set up from.
pub struct Catalog {
    pub board: Board,
    pub decks: Decks,
    /// Empty when the country list couldn't be loaded.
    pub countries: Vec<Country>,
}

impl Catalog {
    /// Load everything from `source`. Only the board is essential:
    /// decks fall back to the built-in ones and countries to none.
    pub fn load<S: DataSource + ?Sized>(source: &S, policy: RetryPolicy) -> Result<Catalog, LoadError> {
        let json = fetch_with_retry(source, Resource::Board, policy)?;
        let board = Board::from_data(&parse_board(&json)?)?;
        log::info!("loaded a board of {} squares", board.len());

        let decks = Decks {
            chance: load_deck(source, DeckKind::Chance, policy),
            community_chest: load_deck(source, DeckKind::CommunityChest, policy),
        };

        let countries = match load_countries(source, policy) {
            Ok(countries) => countries,
            Err(e) => {
                log::warn!("no country list, skipping country checks: {}", e);
                vec![]
            }
        };

        Ok(Catalog {
            board,
            decks,
            countries,
        })
    }

    /// The built-in board and decks, with no country list.
    pub fn classic() -> Catalog {
        Catalog {
            board: Board::classic(),
            decks: Decks::fallback(),
            countries: vec![],
        }
    }
}

fn load_deck<S: DataSource + ?Sized>(source: &S, kind: DeckKind, policy: RetryPolicy) -> Deck {
    let resource = match kind {
        DeckKind::Chance => Resource::Chance,
        DeckKind::CommunityChest => Resource::CommunityChest,
    };

    let deck = fetch_with_retry(source, resource, policy)
        .map_err(LoadError::from)
        .and_then(|json| {
            let cards = parse_cards(&json)?;
            Ok(Deck::from_raw(kind, &cards)?)
        });

    match deck {
        Ok(deck) => deck,
        Err(e) => {
            log::warn!("using the built-in {:?} deck: {}", kind, e);
            Deck::fallback(kind)
        }
    }
}

fn load_countries<S: DataSource + ?Sized>(
    source: &S,
    policy: RetryPolicy,
) -> Result<Vec<Country>, LoadError> {
    let json = fetch_with_retry(source, Resource::Countries, policy)?;
    Ok(parse_countries(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::error::DataError;
    use crate::game::globals::CLASSIC_BOARD_DATA;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Serves canned responses, failing each resource a set number of times first.
    #[derive(Default)]
    struct FlakySource {
        responses: HashMap<&'static str, String>,
        failures: RefCell<HashMap<&'static str, u32>>,
        calls: RefCell<u32>,
    }

    impl FlakySource {
        fn serve(mut self, resource: Resource, json: &str) -> Self {
            self.responses.insert(resource.file_name(), json.to_owned());
            self
        }

        fn fail(self, resource: Resource, times: u32) -> Self {
            self.failures.borrow_mut().insert(resource.file_name(), times);
            self
        }
    }

    impl DataSource for FlakySource {
        fn fetch(&self, resource: Resource) -> Result<String, SourceError> {
            *self.calls.borrow_mut() += 1;

            let mut failures = self.failures.borrow_mut();
            if let Some(left) = failures.get_mut(resource.file_name()) {
                if *left > 0 {
                    *left -= 1;
                    return Err(SourceError::Transient("connection reset".into()));
                }
            }

            self.responses
                .get(resource.file_name())
                .cloned()
                .ok_or_else(|| SourceError::Unavailable("404".into()))
        }
    }

    fn quick(attempts: u32) -> RetryPolicy {
        RetryPolicy {
            attempts,
            backoff: Duration::ZERO,
        }
    }

    fn board_json() -> String {
        serde_json::to_string(&*CLASSIC_BOARD_DATA).unwrap()
    }

    #[test]
    fn transient_failures_are_retried_up_to_the_limit() {
        let source = FlakySource::default()
            .serve(Resource::Board, "{}")
            .fail(Resource::Board, 2);
        assert_eq!(fetch_with_retry(&source, Resource::Board, quick(3)).unwrap(), "{}");
        assert_eq!(*source.calls.borrow(), 3);

        let source = FlakySource::default()
            .serve(Resource::Board, "{}")
            .fail(Resource::Board, 3);
        assert!(matches!(
            fetch_with_retry(&source, Resource::Board, quick(3)),
            Err(SourceError::Transient(_))
        ));
    }

    #[test]
    fn unavailable_resources_are_not_retried() {
        let source = FlakySource::default();

        assert!(matches!(
            fetch_with_retry(&source, Resource::Countries, quick(5)),
            Err(SourceError::Unavailable(_))
        ));
        assert_eq!(*source.calls.borrow(), 1);
    }

    #[test]
    fn missing_board_aborts_loading() {
        let source = FlakySource::default();
        assert!(matches!(
            Catalog::load(&source, quick(2)),
            Err(LoadError::Source(SourceError::Unavailable(_)))
        ));

        let source = FlakySource::default().serve(Resource::Board, r#"{"bottom": []}"#);
        assert!(matches!(
            Catalog::load(&source, quick(2)),
            Err(LoadError::Data(DataError::Json(_)))
        ));
    }

    #[test]
    fn decks_and_countries_fall_back() {
        let source = FlakySource::default()
            .serve(Resource::Board, &board_json())
            .serve(Resource::Chance, "[]")
            .serve(Resource::CommunityChest, "garbage");

        let catalog = Catalog::load(&source, quick(2)).unwrap();
        assert_eq!(catalog.board.len(), 40);
        assert_eq!(catalog.decks.chance.len(), Deck::fallback(DeckKind::Chance).len());
        assert_eq!(
            catalog.decks.community_chest.len(),
            Deck::fallback(DeckKind::CommunityChest).len()
        );
        assert!(catalog.countries.is_empty());
    }

    #[test]
    fn decks_with_malformed_cards_fall_back() {
        let source = FlakySource::default()
            .serve(Resource::Board, &board_json())
            .serve(
                Resource::Chance,
                r#"[{"id": 1, "description": "Collect", "type": "chance", "action": {"money": 10}},
                    {"id": 2, "description": "Nowhere", "type": "chance", "action": {"moveTo": -1}}]"#,
            );

        let catalog = Catalog::load(&source, quick(1)).unwrap();
        assert_eq!(
            catalog.decks.chance.cards(),
            Deck::fallback(DeckKind::Chance).cards()
        );
    }

    #[test]
    fn served_decks_and_countries_are_used() {
        let source = FlakySource::default()
            .serve(Resource::Board, &board_json())
            .serve(
                Resource::Chance,
                r#"[{"id": 9, "description": "Collect", "type": "chance", "action": {"money": 150}}]"#,
            )
            .serve(Resource::Countries, r#"[{"ES": "Spain"}, {"PT": "Portugal"}]"#)
            .fail(Resource::Chance, 1);

        let catalog = Catalog::load(&source, quick(2)).unwrap();
        assert_eq!(catalog.decks.chance.len(), 1);
        assert_eq!(catalog.decks.chance.cards()[0].id, 9);
        assert_eq!(catalog.countries.len(), 2);
    }

    #[test]
    fn dir_source_reads_named_files() {
        let dir = std::env::temp_dir().join(format!("monopoly-data-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("board.json"), board_json()).unwrap();

        let source = DirSource::new(&dir);
        assert!(source.fetch(Resource::Board).is_ok());
        assert!(matches!(
            source.fetch(Resource::Chance),
            Err(SourceError::Unavailable(_))
        ));

        let catalog = Catalog::load(&source, RetryPolicy::none()).unwrap();
        assert_eq!(catalog.board.jail(), 10);

        fs::remove_dir_all(&dir).unwrap();
    }
}
