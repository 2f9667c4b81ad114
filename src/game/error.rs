use thiserror::Error;

#[derive(Debug, Error)]
/// Board, card or country data that can't be used as served.
pub enum DataError {
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("board side `{0}` has no squares")]
    EmptySide(&'static str),
    #[error("square {id} ({name}) is missing `{field}`")]
    MissingField {
        id: u32,
        name: String,
        field: &'static str,
    },
    #[error("square {id} has unknown type `{kind}`")]
    UnknownType { id: u32, kind: String },
    #[error("square id {0} appears more than once")]
    DuplicateId(u32),
    #[error("square {0} has a rent schedule of the wrong shape")]
    BadRent(u32),
    #[error("board has no jail square")]
    NoJail,
    #[error("deck has no cards")]
    EmptyDeck,
    #[error("card moves to negative position {0}")]
    NegativeDestination(i64),
    #[error("country entry {0} must map exactly one code to a name")]
    MalformedCountry(usize),
}

#[derive(Debug, Error)]
/// Failure to fetch a resource from the board backend.
pub enum SourceError {
    /// Worth retrying, e.g. a timeout or an interrupted read.
    #[error("transient failure: {0}")]
    Transient(String),
    #[error("unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
/// Initialisation was aborted because the board couldn't be loaded.
pub enum LoadError {
    #[error("could not fetch the board: {0}")]
    Source(#[from] SourceError),
    #[error("board data rejected: {0}")]
    Data(#[from] DataError),
}

#[derive(Debug, Error, PartialEq, Eq)]
/// A lobby that can't start a game.
pub enum SetupError {
    #[error("at least {min} players are needed, got {got}")]
    TooFewPlayers { min: usize, got: usize },
    #[error("at most {max} players can play, got {got}")]
    TooManyPlayers { max: usize, got: usize },
    #[error("player {0} has no nickname")]
    EmptyNickname(usize),
    #[error("nickname `{0}` is taken")]
    DuplicateNickname(String),
    #[error("unknown country code `{0}`")]
    UnknownCountry(String),
}

#[derive(Debug, Error)]
/// The ranking service didn't accept a submission.
pub enum SubmitError {
    #[error("ranking service rejected the submission: {0}")]
    Rejected(String),
    #[error("ranking service unreachable: {0}")]
    Unreachable(String),
}

#[derive(Debug, Error)]
/// The local snapshot store couldn't be read or written.
pub enum StoreError {
    #[error("snapshot io: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot json: {0}")]
    Json(#[from] serde_json::Error),
}
