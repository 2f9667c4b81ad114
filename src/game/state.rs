use std::fmt;

use super::board::Board;
use super::player::Player;
use super::turn::Roll;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Where the current player is within their turn.
pub enum Phase {
    /// Waiting for the current player to roll.
    AwaitingRoll,
    /// The token is moving. Only seen from inside a roll.
    Moving,
    /// The landing square's effect is being applied. Only seen from inside a roll.
    ResolvingSquare,
    /// The player landed on an unowned square and has to accept or decline the offer.
    AwaitingDecision,
    /// The player rolled doubles and rolls again.
    ExtraRoll,
    /// Nothing left to do but hand over to the next player.
    TurnOver,
    GameOver,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// The result of moving a token.
pub struct Movement {
    pub from: usize,
    pub to: usize,
    pub passed_go: bool,
}

#[derive(Clone, Debug)]
/// Everything about a game that changes while it's played.
pub struct State {
    /// The board, which also holds who owns and built what.
    pub board: Board,
    /// The players playing the game, indexed by seat.
    pub players: Vec<Player>,
    /// The index of the player (from `players`) whose turn it currently is.
    pub current_player_index: usize,
    pub phase: Phase,
    /// Set once the first roll of the game has been played.
    pub started: bool,
    /// Set once a card has been drawn for the current landing.
    pub card_drawn: bool,
    /// The last roll of the current turn, used for utility rents.
    pub last_roll: Option<Roll>,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut metadata = match self.last_roll {
            Some(roll) => format!("Last roll: \x1b[33m{}+{}\x1b[0m", roll.first, roll.second),
            None if self.started => String::from("No roll yet this turn"),
            None => String::from("Waiting for the first roll"),
        };

        if self.phase == Phase::GameOver {
            metadata += "\nGame over";
        }

        let mut players_str = "".to_owned();
        for i in 0..self.players.len() {
            players_str += &format!("{}", self.players[i]);

            if self.current_player_index == i {
                players_str += &format!(" < next: \x1b[36m{:?}\x1b[0m", self.phase)
            }

            players_str += "\n";
        }

        write!(f, "{}\n{}", metadata, players_str)
    }
}

impl State {
    /*********        INITIALISATION INTERFACES        *********/

    /// Create a new game state on `board` with the given players.
    pub fn new(board: Board, players: Vec<Player>) -> State {
        State {
            board,
            players,
            current_player_index: 0,
            phase: Phase::AwaitingRoll,
            started: false,
            card_drawn: false,
            last_roll: None,
        }
    }

    /*********        ALIASES (FOR CONVENIENCE)        *********/

    /// The player whose turn it currently is.
    pub fn current_player(&self) -> &Player {
        &self.players[self.current_player_index]
    }

    /// Players still in the game.
    pub fn active_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.is_active())
    }

    /*********        HELPER FUNCTIONS        *********/

    /// Move a player by `steps` squares, which may be negative. A forward
    /// move that wraps around the board pays `go_salary`.
    pub fn move_by(&mut self, player: usize, steps: i64, go_salary: i64) -> Movement {
        let from = self.players[player].position;
        let to = self.board.wrap(from, steps);

        // Give the player their salary if they pass 'Go'
        let passed_go = steps > 0 && from > to;
        if passed_go {
            self.players[player].cash += go_salary;
        }

        // Update the position
        self.players[player].position = to;

        Movement {
            from,
            to,
            passed_go,
        }
    }

    /// Hand the turn to the next player still in the game and return their index.
    pub fn setup_next_player(&mut self) -> usize {
        let count = self.players.len();

        for offset in 1..=count {
            let candidate = (self.current_player_index + offset) % count;

            if self.players[candidate].is_active() {
                self.current_player_index = candidate;
                break;
            }
        }

        // The player whose turn it is next rolls the dice
        self.phase = Phase::AwaitingRoll;
        self.card_drawn = false;
        self.last_roll = None;

        self.current_player_index
    }

    /// Send a player to jail.
    pub fn send_to_jail(&mut self, player: usize) {
        let jail = self.board.jail();
        let player = &mut self.players[player];

        // Set the player's position to jail
        player.position = jail;
        player.jail.in_jail = true;
        player.jail.attempts = 0;

        // Reset the doubles counter
        player.doubles_rolled = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::player::PlayerSetup;

    fn state(players: usize) -> State {
        State::new(
            Board::classic(),
            Player::multiple_new(&PlayerSetup::fixtures(players), 1500),
        )
    }

    #[test]
    fn wrapping_forward_pays_salary_once() {
        let mut state = state(2);
        state.players[0].position = 35;

        let movement = state.move_by(0, 8, 200);
        assert_eq!(
            movement,
            Movement {
                from: 35,
                to: 3,
                passed_go: true
            }
        );
        assert_eq!(state.players[0].cash, 1700);

        let movement = state.move_by(0, 6, 200);
        assert!(!movement.passed_go);
        assert_eq!(state.players[0].cash, 1700);
    }

    #[test]
    fn landing_exactly_on_go_pays_salary() {
        let mut state = state(2);
        state.players[0].position = 33;

        let movement = state.move_by(0, 7, 200);
        assert_eq!(movement.to, 0);
        assert!(movement.passed_go);
        assert_eq!(state.players[0].cash, 1700);
    }

    #[test]
    fn backward_moves_never_pay() {
        let mut state = state(2);
        state.players[0].position = 2;

        let movement = state.move_by(0, -3, 200);
        assert_eq!(movement.to, 39);
        assert!(!movement.passed_go);
        assert_eq!(state.players[0].cash, 1500);

        let movement = state.move_by(0, 0, 200);
        assert_eq!(movement.to, 39);
        assert!(!movement.passed_go);
    }

    #[test]
    fn rotation_skips_bankrupt_players() {
        let mut state = state(4);
        state.players[1].bankrupt = true;

        assert_eq!(state.setup_next_player(), 2);
        assert_eq!(state.setup_next_player(), 3);
        assert_eq!(state.setup_next_player(), 0);
        assert_eq!(state.setup_next_player(), 2);
        assert_eq!(state.phase, Phase::AwaitingRoll);
        assert_eq!(state.active_players().count(), 3);
    }

    #[test]
    fn jail_resets_counters() {
        let mut state = state(2);
        state.players[0].doubles_rolled = 2;
        state.players[0].jail.attempts = 2;
        state.players[0].position = 30;

        state.send_to_jail(state.current_player_index);

        let player = state.current_player();
        assert_eq!(player.position, 10);
        assert!(player.in_jail());
        assert_eq!(player.jail.attempts, 0);
        assert_eq!(player.doubles_rolled, 0);
    }

    #[test]
    fn display_tells_whether_the_game_has_started() {
        let mut state = state(2);
        assert!(!state.started);
        assert!(state.to_string().starts_with("Waiting for the first roll"));

        state.started = true;
        assert!(state.to_string().starts_with("No roll yet this turn"));

        state.last_roll = Some(Roll::new(2, 5));
        assert!(state.to_string().contains("2+5"));
    }
}
