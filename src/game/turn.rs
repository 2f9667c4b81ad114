use rand::Rng;

use super::board::{Special, SquareKind};
use super::cards::DeckKind;
use super::events::{GameEvent, JailExit};
use super::globals::DOUBLES_TO_JAIL;
use super::rules::{can_act, can_leave_jail, Reason};
use super::state::{Movement, Phase};
use super::transactions::Settlement;
use super::{Action, Game, PendingAction};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// A roll of two dice.
pub struct Roll {
    pub first: i64,
    pub second: i64,
}

impl Roll {
    /// A roll with the given faces. Nothing checks that they're in 1..=6.
    pub fn new(first: i64, second: i64) -> Roll {
        Roll { first, second }
    }

    /// Roll two fair dice.
    pub fn random<R: Rng>(rng: &mut R) -> Roll {
        Roll {
            first: rng.random_range(1..=6),
            second: rng.random_range(1..=6),
        }
    }

    /// The sum of both dice, saturating for absurd manual rolls.
    pub fn total(&self) -> i64 {
        self.first.saturating_add(self.second)
    }

    /// The move this roll makes on a board of `size` squares: the same
    /// direction and landing square as the exact sum, kept within one lap.
    pub fn steps_on(&self, size: usize) -> i64 {
        let total = i128::from(self.first) + i128::from(self.second);
        let size = size.max(1) as i128;
        let reduced = total.rem_euclid(size);

        if total < 0 && reduced != 0 {
            (reduced - size) as i64
        } else {
            reduced as i64
        }
    }

    pub fn is_double(&self) -> bool {
        self.first == self.second
    }
}

impl Game {
    /*********        DICE        *********/

    /// Roll the dice for the current player and play the roll out.
    pub fn roll_dice(&mut self) -> Result<Roll, Reason> {
        self.check_can_roll()?;

        let roll = Roll::random(&mut self.rng);
        self.play_roll(roll);

        Ok(roll)
    }

    /// Play a roll with dice chosen by the caller.
    pub fn roll_with(&mut self, first: i64, second: i64) -> Result<Roll, Reason> {
        self.check_can_roll()?;

        let roll = Roll::new(first, second);
        self.play_roll(roll);

        Ok(roll)
    }

    fn check_can_roll(&self) -> Result<(), Reason> {
        can_act(&self.state, self.state.current_player_index).into_result()?;

        match self.state.phase {
            Phase::AwaitingRoll | Phase::ExtraRoll => Ok(()),
            Phase::AwaitingDecision => Err(Reason::DecisionPending),
            Phase::GameOver => Err(Reason::GameOver),
            _ => Err(Reason::WrongPhase),
        }
    }

    fn play_roll(&mut self, roll: Roll) {
        let player = self.state.current_player_index;

        self.state.started = true;
        self.state.last_roll = Some(roll);
        self.state.card_drawn = false;
        self.extra_roll_owed = false;

        self.events.emit(GameEvent::DiceRolled {
            player,
            first: roll.first,
            second: roll.second,
        });

        let extra_roll = if self.state.players[player].in_jail() {
            if !self.play_jail_roll(player, roll) {
                self.state.phase = Phase::TurnOver;
                return;
            }

            // Leaving jail never earns another roll
            false
        } else if roll.is_double() {
            let p = &mut self.state.players[player];
            p.doubles_rolled += 1;

            if self.settings.three_doubles_to_jail && p.doubles_rolled >= DOUBLES_TO_JAIL {
                log::debug!("player {} rolled {} doubles in a row", player, DOUBLES_TO_JAIL);
                self.enter_jail(player);
                self.state.phase = Phase::TurnOver;
                return;
            }

            true
        } else {
            self.state.players[player].doubles_rolled = 0;
            false
        };

        self.state.phase = Phase::Moving;
        let steps = roll.steps_on(self.state.board.len());
        self.advance(player, steps);

        self.state.phase = Phase::ResolvingSquare;
        self.resolve_square(player);

        self.settle_roll(player, extra_roll);
    }

    /// Work out where the turn stands once the landing has been resolved.
    fn settle_roll(&mut self, player: usize, extra_roll: bool) {
        if self.state.phase == Phase::GameOver {
            self.offer = None;
            return;
        }

        let p = &self.state.players[player];
        let extra_roll = extra_roll && p.is_active() && !p.in_jail();

        if self.offer.is_some() {
            self.state.phase = Phase::AwaitingDecision;
            self.extra_roll_owed = extra_roll;
        } else if extra_roll {
            self.state.phase = Phase::ExtraRoll;
        } else {
            self.state.phase = Phase::TurnOver;
        }
    }

    /*********        JAIL        *********/

    /// Roll for a jailed player. Returns whether they got out and should move.
    fn play_jail_roll(&mut self, player: usize, roll: Roll) -> bool {
        if roll.is_double() {
            self.release(player, JailExit::Doubles);
            return true;
        }

        let max_attempts = self.settings.max_jail_attempts;
        let jail = &mut self.state.players[player].jail;
        jail.attempts = (jail.attempts + 1).min(max_attempts);

        if jail.attempts < max_attempts {
            return false;
        }

        // Out of attempts: the fine is taken if it can be paid
        if !can_leave_jail(&self.state.players[player], false, &self.settings).is_legal() {
            log::debug!("player {} can't pay their way out of jail", player);
            return false;
        }

        let fine = self.settings.jail_fine;
        self.ledger().charge(player, fine, None);
        self.release(player, JailExit::Forced);

        true
    }

    /// Pay the fine to leave jail before rolling.
    pub fn pay_jail_fine(&mut self) -> Result<(), Reason> {
        let pending = self.propose(Action::PayJailFine)?;
        self.confirm(pending)
    }

    pub(super) fn release(&mut self, player: usize, via: JailExit) {
        self.state.players[player].jail = Default::default();
        self.events.emit(GameEvent::JailExited { player, via });
    }

    pub(super) fn enter_jail(&mut self, player: usize) {
        self.state.send_to_jail(player);
        self.events.emit(GameEvent::JailEntered { player });
    }

    /*********        MOVEMENT        *********/

    /// Move a player and report it.
    pub(super) fn advance(&mut self, player: usize, steps: i64) -> Movement {
        let movement = self.state.move_by(player, steps, self.settings.go_salary);

        self.events.emit(GameEvent::PlayerMoved {
            player,
            from: movement.from,
            to: movement.to,
            passed_go: movement.passed_go,
        });

        if movement.passed_go {
            let cash = self.state.players[player].cash;
            self.events.emit(GameEvent::StatsChanged { player, cash });
        }

        movement
    }

    /// Apply the effect of the square the player stands on.
    pub(super) fn resolve_square(&mut self, player: usize) {
        let position = self.state.players[player].position;
        let square = match self.state.board.square(position) {
            Some(square) => square,
            None => return,
        };
        let owner = square.owner();
        let price = square.price();
        let kind = square.kind.clone();

        match kind {
            SquareKind::Chance => self.draw_card(player, DeckKind::Chance),
            SquareKind::CommunityChest => self.draw_card(player, DeckKind::CommunityChest),
            SquareKind::Tax { amount } => {
                if let Settlement::Paid(amount) = self.ledger().charge(player, amount, None) {
                    self.events.emit(GameEvent::TaxPaid {
                        player,
                        square: position,
                        amount,
                    });
                }
            }
            SquareKind::Special(Special::GoToJail) => self.enter_jail(player),
            SquareKind::Special(_) => (),
            SquareKind::Property { .. } | SquareKind::Railroad { .. } | SquareKind::Utility { .. } => {
                match owner {
                    None => {
                        self.offer = Some(PendingAction {
                            player,
                            action: Action::Purchase(position),
                            amount: price.unwrap_or(0),
                        });
                        self.events.emit(GameEvent::PurchaseOffered {
                            player,
                            square: position,
                        });
                    }
                    Some(owner) if owner == player => (),
                    Some(_) => {
                        self.ledger().pay_rent(player, position);
                    }
                }
            }
        }
    }

    /*********        TURN ROTATION        *********/

    /// Hand the turn to the next player still in the game and return their seat.
    pub fn end_turn(&mut self) -> Result<usize, Reason> {
        match self.state.phase {
            Phase::TurnOver => (),
            Phase::AwaitingDecision => return Err(Reason::DecisionPending),
            Phase::ExtraRoll => return Err(Reason::ExtraRollOwed),
            Phase::GameOver => return Err(Reason::GameOver),
            _ => return Err(Reason::WrongPhase),
        }

        let player = self.state.current_player_index;
        self.state.players[player].doubles_rolled = 0;
        self.extra_roll_owed = false;

        let next = self.state.setup_next_player();
        self.events.emit(GameEvent::TurnEnded { player, next });

        Ok(next)
    }
}
