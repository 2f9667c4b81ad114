use super::board::Building;
use super::rules::Reason;
use super::state::Phase;
use super::{Action, Game, PendingAction};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// An agent playing the game, or the "brains" of a player.
pub enum Agent {
    /// A bot that buys, builds and unmortgages as long as it keeps
    /// `reserve` in hand, and mortgages when it runs short.
    Bot {
        /// Cash the bot won't spend below.
        reserve: i64,
    },
    /// A player that only rolls the dice and declines every offer.
    Passive,
}

impl Agent {
    /*********        PUBLIC INTERFACES        *********/

    /// Return a new bot agent.
    pub fn new_bot(reserve: i64) -> Agent {
        Agent::Bot { reserve }
    }

    /// Return a new passive agent.
    pub fn new_passive() -> Agent {
        Agent::Passive
    }

    /// Play the current player's turn until it's handed over or the game ends.
    pub fn play_turn(&self, game: &mut Game) -> Result<(), Reason> {
        loop {
            match game.phase() {
                Phase::AwaitingRoll | Phase::ExtraRoll => {
                    self.manage(game);
                    game.roll_dice()?;
                }
                Phase::AwaitingDecision => self.answer_offer(game)?,
                Phase::TurnOver => {
                    self.manage(game);
                    game.end_turn()?;
                    return Ok(());
                }
                Phase::GameOver => return Ok(()),
                Phase::Moving | Phase::ResolvingSquare => return Err(Reason::WrongPhase),
            }
        }
    }

    /// Whether the agent takes up a purchase offer.
    pub fn accepts(&self, game: &Game, offer: &PendingAction) -> bool {
        match self {
            Agent::Bot { reserve } => game.current_player().cash - offer.amount >= *reserve,
            Agent::Passive => false,
        }
    }

    /// The actions the agent would take right now, best first.
    pub fn plan(&self, game: &Game) -> Vec<Action> {
        match self {
            Agent::Bot { reserve } => Agent::bot_plan(game, *reserve),
            Agent::Passive => vec![],
        }
    }

    /*********        FOR BOTS        *********/

    fn bot_plan(game: &Game, reserve: i64) -> Vec<Action> {
        let player = game.current_player();
        let cash = player.cash;

        // Keep whatever's legal and leaves the reserve untouched
        let affordable = |action: Action| match game.check(action) {
            Ok(pending) => cash - pending.amount >= reserve,
            Err(_) => false,
        };

        let mut actions = vec![];

        if player.in_jail() && affordable(Action::PayJailFine) {
            actions.push(Action::PayJailFine);
        }

        // Running short: raise cash from the first bare square
        if cash < reserve / 2 {
            if let Some(&position) = player
                .owned
                .iter()
                .find(|&&p| game.check(Action::Mortgage(p)).is_ok())
            {
                actions.push(Action::Mortgage(position));
            }

            return actions;
        }

        for &position in &player.owned {
            if affordable(Action::Unmortgage(position)) {
                actions.push(Action::Unmortgage(position));
            }
        }

        for &position in &player.owned {
            for building in [Building::Hotel, Building::House] {
                if affordable(Action::Build(position, building)) {
                    actions.push(Action::Build(position, building));
                    break;
                }
            }
        }

        actions
    }

    /*********        HELPERS        *********/

    /// Carry out planned actions until there's nothing left worth doing.
    fn manage(&self, game: &mut Game) {
        while let Some(&action) = self.plan(game).first() {
            let pending = match game.propose(action) {
                Ok(pending) => pending,
                Err(_) => break,
            };

            if game.confirm(pending).is_err() {
                break;
            }
        }
    }

    fn answer_offer(&self, game: &mut Game) -> Result<(), Reason> {
        let offer = game.offer().ok_or(Reason::WrongPhase)?;

        if self.accepts(game, &offer) {
            if let Ok(pending) = game.propose(offer.action) {
                return game.confirm(pending);
            }
        }

        game.decline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::player::PlayerSetup;
    use crate::game::{Board, Decks, Settings};

    fn game(players: usize, seed: u64) -> Game {
        Game::with_seed(
            Board::classic(),
            Decks::fallback(),
            &PlayerSetup::fixtures(players),
            Settings::default(),
            seed,
        )
        .unwrap()
    }

    #[test]
    fn bots_buy_what_they_can_spare() {
        let mut game = game(2, 1);
        game.roll_with(1, 2).unwrap();
        let offer = game.offer().unwrap();

        assert!(Agent::new_bot(200).accepts(&game, &offer));
        assert!(!Agent::new_bot(1450).accepts(&game, &offer));
        assert!(!Agent::new_passive().accepts(&game, &offer));
    }

    #[test]
    fn declined_offers_end_the_turn() {
        let mut game = game(2, 1);
        game.roll_with(1, 2).unwrap();

        Agent::new_passive().play_turn(&mut game).unwrap();
        assert_eq!(game.state.current_player_index, 1);
        assert!(game.state.players[0].owned.is_empty());
    }

    #[test]
    fn bots_build_on_monopolies() {
        let mut game = game(2, 1);
        for position in [1, 3] {
            if let Some(square) = game.state.board.square_mut(position) {
                square.holding.owner = Some(0);
            }
            game.state.players[0].owned.insert(position);
        }

        let plan = Agent::new_bot(200).plan(&game);
        assert_eq!(
            plan,
            vec![
                Action::Build(1, Building::House),
                Action::Build(3, Building::House)
            ]
        );

        // Eight houses then two hotels, stopping right at the reserve
        Agent::new_bot(200).manage(&mut game);
        for position in [1, 3] {
            let holding = game.state.board.square(position).unwrap().holding;
            assert!(holding.hotel);
            assert_eq!(holding.houses, 0);
        }
        assert_eq!(game.state.players[0].cash, 200);
        assert!(Agent::new_bot(200).plan(&game).is_empty());
    }

    #[test]
    fn bots_mortgage_when_short() {
        let mut game = game(2, 1);
        if let Some(square) = game.state.board.square_mut(5) {
            square.holding.owner = Some(0);
        }
        game.state.players[0].owned.insert(5);
        game.state.players[0].cash = 50;

        assert_eq!(Agent::new_bot(200).plan(&game), vec![Action::Mortgage(5)]);
    }

    #[test]
    fn bot_games_run_to_completion() {
        let agents = [Agent::new_bot(150), Agent::new_bot(300), Agent::new_passive()];
        let mut game = game(agents.len(), 2024);

        for _ in 0..3000 {
            if game.is_over() {
                break;
            }

            let agent = agents[game.current_player().id];
            agent.play_turn(&mut game).unwrap();
        }

        // Ownership stays consistent from both sides the whole way through
        for square in game.board().squares() {
            if let Some(owner) = square.owner() {
                assert!(game.players()[owner].owns(square.position));
                assert!(!game.players()[owner].bankrupt);
            }
        }
        for player in game.players() {
            assert!(player.cash >= 0);
        }
    }
}
