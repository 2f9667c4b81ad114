mod agent;
mod board;
mod cards;
mod data;
mod error;
mod events;
mod globals;
mod loader;
mod player;
mod rules;
mod scoring;
mod settings;
mod state;
mod transactions;
mod turn;


pub use agent::Agent;
pub use board::{Board, Building, Color, Holding, PropertyRent, Special, Square, SquareKind};
pub use cards::{Card, CardAction, Deck, DeckKind, Decks};
pub use data::{
    parse_board, parse_cards, parse_countries, BoardData, Country, RawAction, RawCard, RawRent,
    RawSquare,
};
pub use error::{DataError, LoadError, SetupError, SourceError, StoreError, SubmitError};
pub use events::{EventBus, GameEvent, JailExit, Listener};
pub use globals::*;
pub use loader::{fetch_with_retry, Catalog, DataSource, DirSource, Resource, RetryPolicy};
pub use player::{validate_setups, JailStatus, Player, PlayerSetup};
pub use rules::{
    can_act, can_build, can_leave_jail, can_mortgage, can_purchase, can_unmortgage,
    has_monopoly, Reason, Verdict,
};
pub use scoring::{
    net_worth, ranking, submit_ranking, FileStore, LastGame, RankingClient, RankingEntry,
    SnapshotStore, Submission,
};
pub use settings::Settings;
pub use state::{Movement, Phase, State};
pub use transactions::{compute_rent, Ledger, Settlement};
pub use turn::Roll;

use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
/// Something the current player can choose to do.
pub enum Action {
    /// Buy the square on offer.
    Purchase(usize),
    Build(usize, Building),
    Mortgage(usize),
    Unmortgage(usize),
    /// Pay the fine to leave jail before rolling.
    PayJailFine,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// An action that has been checked but not carried out yet. Pass it to
/// [`Game::confirm`] to carry it out or [`Game::cancel`] to drop it.
pub struct PendingAction {
    pub player: usize,
    pub action: Action,
    /// The cash that changes hands if the action goes through.
    pub amount: i64,
}

#[derive(Debug)]
/// A game of Monopoly being played.
pub struct Game {
    state: State,
    decks: Decks,
    settings: Settings,
    rng: StdRng,
    /// The purchase offer made by the last landing, if it's still open.
    offer: Option<PendingAction>,
    /// Whether the current player rolls again once the offer is answered.
    extra_roll_owed: bool,
    events: EventBus,
}

impl Game {
    /*********        INITIALISATION INTERFACES        *********/

    /// Start a game with dice seeded from the OS.
    pub fn new(
        board: Board,
        decks: Decks,
        setups: &[PlayerSetup],
        settings: Settings,
    ) -> Result<Game, SetupError> {
        Game::build(board, decks, setups, settings, &[], StdRng::from_os_rng())
    }

    /// Start a game whose dice and card draws are reproducible.
    pub fn with_seed(
        board: Board,
        decks: Decks,
        setups: &[PlayerSetup],
        settings: Settings,
        seed: u64,
    ) -> Result<Game, SetupError> {
        Game::build(board, decks, setups, settings, &[], StdRng::seed_from_u64(seed))
    }

    /// Start a game on the built-in board with the built-in decks.
    pub fn classic(setups: &[PlayerSetup]) -> Result<Game, SetupError> {
        Game::new(Board::classic(), Decks::fallback(), setups, Settings::default())
    }

    /// Start a game from loaded data. Country codes are checked
    /// against the loaded country list.
    pub fn from_catalog(
        catalog: Catalog,
        setups: &[PlayerSetup],
        settings: Settings,
        seed: Option<u64>,
    ) -> Result<Game, SetupError> {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Game::build(
            catalog.board,
            catalog.decks,
            setups,
            settings,
            &catalog.countries,
            rng,
        )
    }

    fn build(
        board: Board,
        decks: Decks,
        setups: &[PlayerSetup],
        settings: Settings,
        countries: &[Country],
        rng: StdRng,
    ) -> Result<Game, SetupError> {
        validate_setups(setups, &settings, countries)?;

        let players = Player::multiple_new(setups, settings.starting_cash);
        let mut game = Game {
            state: State::new(board, players),
            decks,
            settings,
            rng,
            offer: None,
            extra_roll_owed: false,
            events: EventBus::default(),
        };

        game.events.emit(GameEvent::GameStarted {
            players: setups.len(),
        });

        Ok(game)
    }

    /// Start a new game on the same board with the same players.
    pub fn reset(&mut self) {
        let cash = self.settings.starting_cash;
        for player in &mut self.state.players {
            player.reset(cash);
        }

        let state = &mut self.state;
        state.board.reset();
        state.current_player_index = 0;
        state.phase = Phase::AwaitingRoll;
        state.started = false;
        state.card_drawn = false;
        state.last_roll = None;

        self.offer = None;
        self.extra_roll_owed = false;

        self.events.clear();
        self.events.emit(GameEvent::GameStarted {
            players: self.state.players.len(),
        });
    }

    /*********        GETTERS        *********/

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn board(&self) -> &Board {
        &self.state.board
    }

    pub fn players(&self) -> &[Player] {
        &self.state.players
    }

    pub fn player(&self, id: usize) -> Option<&Player> {
        self.state.players.get(id)
    }

    pub fn current_player(&self) -> &Player {
        self.state.current_player()
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn is_over(&self) -> bool {
        self.state.phase == Phase::GameOver
    }

    /// Whether anyone has rolled yet.
    pub fn has_started(&self) -> bool {
        self.state.started
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn decks(&self) -> &Decks {
        &self.decks
    }

    /// The purchase offer waiting for an answer, if any.
    pub fn offer(&self) -> Option<PendingAction> {
        self.offer
    }

    /*********        EVENTS        *********/

    pub fn subscribe<L: Listener + 'static>(&mut self, listener: L) {
        self.events.subscribe(Box::new(listener));
    }

    /// Take every event emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    /*********        ACTIONS        *********/

    /// Whether the current player may take `action` right now.
    pub fn verdict(&self, action: Action) -> Verdict {
        self.check(action).map(|_| ()).into()
    }

    /// Check `action` for the current player without changing anything.
    pub fn propose(&self, action: Action) -> Result<PendingAction, Reason> {
        let pending = self.check(action);

        if let Err(reason) = pending {
            log::debug!("{:?} refused: {}", action, reason);
        }

        pending
    }

    /// Carry out a proposed action. It's checked again first, so an
    /// action that went stale since it was proposed is refused.
    pub fn confirm(&mut self, pending: PendingAction) -> Result<(), Reason> {
        if self.propose(pending.action)? != pending {
            return Err(Reason::StaleAction);
        }

        let player = pending.player;
        match pending.action {
            Action::Purchase(position) => {
                self.ledger().purchase(player, position);
                self.close_offer();
            }
            Action::Build(position, building) => {
                self.ledger().build(player, position, building);
            }
            Action::Mortgage(position) => {
                self.ledger().mortgage(player, position);
            }
            Action::Unmortgage(position) => {
                self.ledger().unmortgage(player, position);
            }
            Action::PayJailFine => {
                let fine = self.settings.jail_fine;
                self.ledger().charge(player, fine, None);
                self.release(player, JailExit::Paid);
            }
        }

        Ok(())
    }

    /// Drop a proposed action. Dropping the open purchase offer declines it.
    pub fn cancel(&mut self, pending: PendingAction) -> Result<(), Reason> {
        if let Action::Purchase(_) = pending.action {
            if self.offer != Some(pending) {
                return Err(Reason::StaleAction);
            }

            log::debug!("player {} declined {:?}", pending.player, pending.action);
            self.close_offer();
        }

        Ok(())
    }

    /// Decline the open purchase offer.
    pub fn decline(&mut self) -> Result<(), Reason> {
        match self.offer {
            Some(offer) => self.cancel(offer),
            None => Err(Reason::WrongPhase),
        }
    }

    fn check(&self, action: Action) -> Result<PendingAction, Reason> {
        let player = self.state.current_player_index;
        can_act(&self.state, player).into_result()?;

        let board = &self.state.board;
        let p = &self.state.players[player];

        let amount = match action {
            Action::Purchase(position) => {
                match self.offer {
                    Some(offer) if offer.action == action => (),
                    Some(_) => return Err(Reason::StaleAction),
                    None => return Err(Reason::WrongPhase),
                }

                can_purchase(board, p, position).into_result()?;
                board.square(position).and_then(Square::price).unwrap_or(0)
            }
            Action::Build(position, building) => {
                can_build(board, p, position, building, &self.settings).into_result()?;
                self.settings.build_cost(building)
            }
            Action::Mortgage(position) => {
                can_mortgage(board, p, position).into_result()?;
                board.square(position).and_then(Square::mortgage_value).unwrap_or(0)
            }
            Action::Unmortgage(position) => {
                can_unmortgage(board, p, position, &self.settings).into_result()?;
                let value = board.square(position).and_then(Square::mortgage_value).unwrap_or(0);
                self.settings.unmortgage_cost(value)
            }
            Action::PayJailFine => {
                if self.state.phase != Phase::AwaitingRoll {
                    return Err(Reason::WrongPhase);
                }

                can_leave_jail(p, false, &self.settings).into_result()?;
                self.settings.jail_fine
            }
        };

        Ok(PendingAction {
            player,
            action,
            amount,
        })
    }

    /// Close the purchase offer and carry on with the turn.
    fn close_offer(&mut self) {
        self.offer = None;

        if self.state.phase == Phase::AwaitingDecision {
            self.state.phase = if self.extra_roll_owed {
                Phase::ExtraRoll
            } else {
                Phase::TurnOver
            };
            self.extra_roll_owed = false;
        }
    }

    /*********        SCORING        *********/

    /// Players sorted by net worth, richest first.
    pub fn ranking(&self) -> Vec<RankingEntry> {
        ranking(&self.state, &self.settings)
    }

    pub fn net_worth(&self, player: usize) -> Option<i64> {
        self.state
            .players
            .get(player)
            .map(|p| net_worth(&self.state.board, p, &self.settings))
    }

    /// The player with the highest net worth among those still in the game.
    pub fn winner(&self) -> Option<&Player> {
        scoring::winner(&self.state, &self.settings)
    }

    /*********        HELPERS        *********/

    fn ledger(&mut self) -> Ledger<'_> {
        Ledger::new(&mut self.state, &self.settings, &mut self.events)
    }
}
