//! Money and ownership changes. Callers check legality with
//! [`rules`](super::rules) first: nothing here re-validates.

use super::board::{Board, Building, Holding, Square, SquareKind};
use super::events::{EventBus, GameEvent};
use super::rules::has_monopoly;
use super::settings::Settings;
use super::state::{Phase, State};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// How a debt ended.
pub enum Settlement {
    /// The full amount changed hands.
    Paid(i64),
    /// The debtor couldn't cover it and is out of the game.
    Bankrupt,
}

/// Rent owed for landing on the square at `position`. `dice_total` is
/// only used for utilities. Unowned and mortgaged squares cost nothing.
pub fn compute_rent(board: &Board, position: usize, dice_total: i64) -> i64 {
    let square = match board.square(position) {
        Some(square) => square,
        None => return 0,
    };
    let holding = square.holding;
    let owner = match holding.owner {
        Some(owner) if !holding.mortgaged => owner,
        _ => return 0,
    };

    match &square.kind {
        SquareKind::Railroad { rent, .. } => {
            let owned = board.count_owned(board.railroads(), owner).clamp(1, rent.len());
            rent[owned - 1]
        }
        SquareKind::Utility { multipliers, .. } => {
            let owned = board.count_owned(board.utilities(), owner);
            let multiplier = if owned >= 2 { multipliers[1] } else { multipliers[0] };
            dice_total.saturating_mul(multiplier)
        }
        SquareKind::Property { color, rent, .. } => {
            if holding.hotel {
                rent.with_hotel
            } else if holding.houses > 0 {
                rent.with_house[usize::from(holding.houses.min(4)) - 1]
            } else if has_monopoly(board, owner, color) {
                rent.base * 2
            } else {
                rent.base
            }
        }
        _ => 0,
    }
}

/// Applies transactions to a game state and reports them as events.
pub struct Ledger<'a> {
    state: &'a mut State,
    settings: &'a Settings,
    events: &'a mut EventBus,
}

impl<'a> Ledger<'a> {
    pub fn new(state: &'a mut State, settings: &'a Settings, events: &'a mut EventBus) -> Self {
        Ledger {
            state,
            settings,
            events,
        }
    }

    /*********        CASH        *********/

    fn adjust(&mut self, player: usize, delta: i64) {
        let p = &mut self.state.players[player];
        p.cash += delta;

        let cash = p.cash;
        self.events.emit(GameEvent::StatsChanged { player, cash });
    }

    /// Pay `amount` from the bank to `player`.
    pub fn credit(&mut self, player: usize, amount: i64) {
        if amount != 0 {
            self.adjust(player, amount);
        }
    }

    /// Take `amount` from `debtor` and give it to `creditor`, or to the
    /// bank when there's no creditor. A debtor who can't cover the full
    /// amount goes bankrupt instead.
    pub fn charge(&mut self, debtor: usize, amount: i64, creditor: Option<usize>) -> Settlement {
        if amount <= 0 {
            return Settlement::Paid(0);
        }

        if !self.state.players[debtor].can_afford(amount) {
            self.declare_bankruptcy(debtor, creditor);
            return Settlement::Bankrupt;
        }

        self.adjust(debtor, -amount);
        if let Some(creditor) = creditor {
            self.adjust(creditor, amount);
        }

        Settlement::Paid(amount)
    }

    /*********        PROPERTY        *********/

    /// Transfer an unowned square to `player` for its price.
    pub fn purchase(&mut self, player: usize, position: usize) -> i64 {
        let price = self
            .state
            .board
            .square(position)
            .and_then(Square::price)
            .unwrap_or(0);

        self.adjust(player, -price);

        if let Some(square) = self.state.board.square_mut(position) {
            square.holding = Holding {
                owner: Some(player),
                ..Holding::default()
            };
        }
        self.state.players[player].owned.insert(position);

        self.events.emit(GameEvent::PropertyPurchased {
            player,
            square: position,
            price,
        });

        price
    }

    /// Make `payer` pay whatever rent the square at `position` is worth to its owner.
    pub fn pay_rent(&mut self, payer: usize, position: usize) -> Settlement {
        let owner = match self.state.board.square(position).and_then(Square::owner) {
            Some(owner) if owner != payer => owner,
            _ => return Settlement::Paid(0),
        };

        let dice_total = self.state.last_roll.map(|roll| roll.total()).unwrap_or(0);
        let rent = compute_rent(&self.state.board, position, dice_total);

        let settlement = self.charge(payer, rent, Some(owner));
        if let Settlement::Paid(amount) = settlement {
            if amount > 0 {
                self.events.emit(GameEvent::RentPaid {
                    payer,
                    owner,
                    square: position,
                    amount,
                });
            }
        }

        settlement
    }

    /// Put up one building. A hotel replaces the four houses under it.
    pub fn build(&mut self, player: usize, position: usize, building: Building) -> i64 {
        let cost = self.settings.build_cost(building);
        self.adjust(player, -cost);

        if let Some(square) = self.state.board.square_mut(position) {
            match building {
                Building::House => square.holding.houses += 1,
                Building::Hotel => {
                    square.holding.houses = 0;
                    square.holding.hotel = true;
                }
            }
        }

        self.events.emit(GameEvent::Built {
            player,
            square: position,
            building,
        });

        cost
    }

    /// Mortgage a square and credit its mortgage value.
    pub fn mortgage(&mut self, player: usize, position: usize) -> i64 {
        let value = match self.state.board.square_mut(position) {
            Some(square) => {
                square.holding.mortgaged = true;
                square.mortgage_value().unwrap_or(0)
            }
            None => 0,
        };

        self.adjust(player, value);
        self.events.emit(GameEvent::PropertyMortgaged {
            player,
            square: position,
            amount: value,
        });

        value
    }

    /// Lift a mortgage, paying the mortgage value plus interest.
    pub fn unmortgage(&mut self, player: usize, position: usize) -> i64 {
        let value = match self.state.board.square_mut(position) {
            Some(square) => {
                square.holding.mortgaged = false;
                square.mortgage_value().unwrap_or(0)
            }
            None => 0,
        };

        let cost = self.settings.unmortgage_cost(value);
        self.adjust(player, -cost);
        self.events.emit(GameEvent::PropertyUnmortgaged {
            player,
            square: position,
            cost,
        });

        cost
    }

    /*********        BANKRUPTCY        *********/

    /// Put `debtor` out of the game. Their remaining cash and squares go to
    /// `creditor`, or back to the bank when there's no creditor. Buildings
    /// always go back to the bank. Ends the game when one player is left.
    pub fn declare_bankruptcy(&mut self, debtor: usize, creditor: Option<usize>) {
        let remaining = self.state.players[debtor].cash;
        if remaining > 0 {
            self.adjust(debtor, -remaining);
            if let Some(creditor) = creditor {
                self.adjust(creditor, remaining);
            }
        }

        let owned = std::mem::take(&mut self.state.players[debtor].owned);
        for position in owned {
            if let Some(square) = self.state.board.square_mut(position) {
                match creditor {
                    Some(creditor) => {
                        square.holding.owner = Some(creditor);
                        square.holding.houses = 0;
                        square.holding.hotel = false;
                    }
                    None => square.holding = Holding::default(),
                }
            }

            if let Some(creditor) = creditor {
                self.state.players[creditor].owned.insert(position);
            }
        }

        let player = &mut self.state.players[debtor];
        player.bankrupt = true;
        player.jail = Default::default();
        player.doubles_rolled = 0;

        self.events.emit(GameEvent::PlayerBankrupt {
            player: debtor,
            creditor,
        });

        let solvent: Vec<usize> = self.state.active_players().map(|p| p.id).collect();
        if solvent.len() <= 1 {
            self.state.phase = Phase::GameOver;
            self.events.emit(GameEvent::GameOver {
                winner: solvent.first().copied(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::player::{Player, PlayerSetup};
    use crate::game::turn::Roll;

    struct Fixture {
        state: State,
        settings: Settings,
        events: EventBus,
    }

    impl Fixture {
        fn new(players: usize) -> Fixture {
            let settings = Settings::default();
            let players = Player::multiple_new(&PlayerSetup::fixtures(players), settings.starting_cash);

            Fixture {
                state: State::new(Board::classic(), players),
                settings,
                events: EventBus::default(),
            }
        }

        fn ledger(&mut self) -> Ledger<'_> {
            Ledger::new(&mut self.state, &self.settings, &mut self.events)
        }

        fn holding(&self, position: usize) -> Holding {
            self.state.board.square(position).map(|s| s.holding).unwrap_or_default()
        }

        fn holding_mut(&mut self, position: usize) -> &mut Holding {
            &mut self.state.board.square_mut(position).unwrap().holding
        }
    }

    #[test]
    fn purchase_links_both_sides() {
        let mut fx = Fixture::new(2);

        assert_eq!(fx.ledger().purchase(0, 1), 60);
        assert_eq!(fx.state.players[0].cash, 1440);
        assert!(fx.state.players[0].owns(1));
        assert_eq!(
            fx.holding(1),
            Holding {
                owner: Some(0),
                houses: 0,
                hotel: false,
                mortgaged: false
            }
        );
        assert!(fx.events.drain().contains(&GameEvent::PropertyPurchased {
            player: 0,
            square: 1,
            price: 60
        }));
    }

    #[test]
    fn property_rent_follows_buildings_and_monopoly() {
        let mut fx = Fixture::new(2);
        fx.ledger().purchase(0, 1);

        assert_eq!(compute_rent(&fx.state.board, 1, 7), 2);
        assert_eq!(compute_rent(&fx.state.board, 3, 7), 0);

        fx.ledger().purchase(0, 3);
        assert_eq!(compute_rent(&fx.state.board, 1, 7), 4);

        fx.holding_mut(1).houses = 3;
        assert_eq!(compute_rent(&fx.state.board, 1, 7), 90);

        fx.holding_mut(1).houses = 0;
        fx.holding_mut(1).hotel = true;
        assert_eq!(compute_rent(&fx.state.board, 1, 7), 250);
    }

    #[test]
    fn mortgaged_squares_charge_nothing() {
        let mut fx = Fixture::new(2);
        for position in [1, 3, 5, 12] {
            fx.ledger().purchase(0, position);
        }

        fx.holding_mut(1).hotel = true;
        for position in [1, 3, 5, 12] {
            fx.holding_mut(position).mortgaged = true;
            assert_eq!(compute_rent(&fx.state.board, position, 12), 0);
        }
    }

    #[test]
    fn railroad_rent_counts_railroads_owned() {
        let mut fx = Fixture::new(2);

        for (owned, (position, expected)) in [(5, 25), (15, 50), (25, 100), (35, 200)]
            .into_iter()
            .enumerate()
        {
            fx.ledger().purchase(0, position);
            assert_eq!(compute_rent(&fx.state.board, 5, 0), expected, "{} owned", owned + 1);
        }

        fx.holding_mut(35).mortgaged = true;
        assert_eq!(compute_rent(&fx.state.board, 5, 0), 200);
        assert_eq!(compute_rent(&fx.state.board, 35, 0), 0);
    }

    #[test]
    fn utility_rent_multiplies_the_dice() {
        let mut fx = Fixture::new(2);

        fx.ledger().purchase(0, 12);
        assert_eq!(compute_rent(&fx.state.board, 12, 7), 28);

        fx.ledger().purchase(0, 28);
        assert_eq!(compute_rent(&fx.state.board, 12, 7), 70);
    }

    #[test]
    fn rent_moves_cash_between_players() {
        let mut fx = Fixture::new(2);
        fx.ledger().purchase(0, 12);
        fx.state.last_roll = Some(Roll::new(3, 5));

        assert_eq!(fx.ledger().pay_rent(1, 12), Settlement::Paid(32));
        assert_eq!(fx.state.players[1].cash, 1468);
        assert_eq!(fx.state.players[0].cash, 1500 - 150 + 32);

        // Owners don't pay themselves
        assert_eq!(fx.ledger().pay_rent(0, 12), Settlement::Paid(0));
    }

    #[test]
    fn building_and_mortgaging() {
        let mut fx = Fixture::new(2);
        fx.ledger().purchase(0, 1);
        let cash = fx.state.players[0].cash;

        assert_eq!(fx.ledger().build(0, 1, Building::House), 100);
        assert_eq!(fx.holding(1).houses, 1);

        fx.holding_mut(1).houses = 4;
        assert_eq!(fx.ledger().build(0, 1, Building::Hotel), 250);
        assert_eq!(fx.holding(1).houses, 0);
        assert!(fx.holding(1).hotel);
        assert_eq!(fx.state.players[0].cash, cash - 350);

        fx.ledger().purchase(0, 3);
        let cash = fx.state.players[0].cash;
        assert_eq!(fx.ledger().mortgage(0, 3), 30);
        assert!(fx.holding(3).mortgaged);
        assert_eq!(fx.ledger().unmortgage(0, 3), 33);
        assert!(!fx.holding(3).mortgaged);
        assert_eq!(fx.state.players[0].cash, cash - 3);
    }

    #[test]
    fn unpayable_rent_hands_everything_to_the_owner() {
        let mut fx = Fixture::new(3);
        fx.ledger().purchase(0, 39);
        fx.holding_mut(39).hotel = true;

        fx.ledger().purchase(1, 1);
        fx.ledger().purchase(1, 3);
        fx.holding_mut(3).houses = 2;
        fx.holding_mut(1).mortgaged = true;
        fx.state.players[1].cash = 300;
        let owner_cash = fx.state.players[0].cash;

        assert_eq!(fx.ledger().pay_rent(1, 39), Settlement::Bankrupt);

        let debtor = &fx.state.players[1];
        assert!(debtor.bankrupt);
        assert_eq!(debtor.cash, 0);
        assert!(debtor.owned.is_empty());

        assert_eq!(fx.state.players[0].cash, owner_cash + 300);
        assert!(fx.state.players[0].owns(1) && fx.state.players[0].owns(3));
        assert_eq!(fx.holding(3).houses, 0);
        assert_eq!(fx.holding(3).owner, Some(0));
        assert!(fx.holding(1).mortgaged);

        // Two players are still solvent
        assert_ne!(fx.state.phase, Phase::GameOver);
    }

    #[test]
    fn debts_to_the_bank_return_squares_to_the_bank() {
        let mut fx = Fixture::new(2);
        fx.ledger().purchase(1, 6);
        fx.holding_mut(6).mortgaged = true;
        fx.state.players[1].cash = 10;

        assert_eq!(fx.ledger().charge(1, 200, None), Settlement::Bankrupt);
        assert_eq!(fx.holding(6), Holding::default());
        assert_eq!(fx.state.players[0].cash, 1500);
        assert_eq!(fx.state.phase, Phase::GameOver);

        let events = fx.events.drain();
        assert!(events.contains(&GameEvent::PlayerBankrupt {
            player: 1,
            creditor: None
        }));
        assert_eq!(events.last(), Some(&GameEvent::GameOver { winner: Some(0) }));
    }
}
