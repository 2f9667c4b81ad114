//! Pure legality checks. Nothing here mutates state: every predicate
//! answers whether an action is allowed right now and, if not, why.

use thiserror::Error;

use super::board::{Board, Building, Color, SquareKind};
use super::globals::MAX_HOUSES;
use super::player::Player;
use super::settings::Settings;
use super::state::{Phase, State};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
/// Why an action was refused. The messages are shown to players as-is.
pub enum Reason {
    #[error("insufficient funds")]
    InsufficientFunds,
    #[error("already owned")]
    AlreadyOwned,
    #[error("in jail")]
    InJail,
    #[error("square cannot be purchased")]
    NotPurchasable,
    #[error("you don't own this square")]
    NotOwner,
    #[error("property is mortgaged")]
    Mortgaged,
    #[error("already mortgaged")]
    AlreadyMortgaged,
    #[error("not mortgaged")]
    NotMortgaged,
    #[error("sell the buildings first")]
    HasBuildings,
    #[error("nothing can be built here")]
    NotBuildable,
    #[error("you need every property of the color group")]
    NoMonopoly,
    #[error("no room for more houses")]
    MaxHouses,
    #[error("there is already a hotel")]
    HotelPresent,
    #[error("a hotel needs four houses")]
    NeedsFourHouses,
    #[error("build where fewer houses exist")]
    Unbalanced,
    #[error("every property of the group needs four houses first")]
    GroupNotReady,
    #[error("not in jail")]
    NotInJail,
    #[error("wrong turn")]
    WrongTurn,
    #[error("not allowed right now")]
    WrongPhase,
    #[error("roll again first")]
    ExtraRollOwed,
    #[error("answer the pending offer first")]
    DecisionPending,
    #[error("that action is no longer pending")]
    StaleAction,
    #[error("player is bankrupt")]
    Bankrupt,
    #[error("game is over")]
    GameOver,
    #[error("no such square")]
    UnknownSquare,
    #[error("no such player")]
    UnknownPlayer,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// The answer to "can this player do that right now".
pub enum Verdict {
    Legal,
    Illegal(Reason),
}

impl Verdict {
    pub fn is_legal(&self) -> bool {
        matches!(self, Verdict::Legal)
    }

    pub fn reason(&self) -> Option<Reason> {
        match self {
            Verdict::Legal => None,
            Verdict::Illegal(reason) => Some(*reason),
        }
    }

    pub fn into_result(self) -> Result<(), Reason> {
        match self {
            Verdict::Legal => Ok(()),
            Verdict::Illegal(reason) => Err(reason),
        }
    }
}

impl From<Result<(), Reason>> for Verdict {
    fn from(result: Result<(), Reason>) -> Verdict {
        match result {
            Ok(()) => Verdict::Legal,
            Err(reason) => Verdict::Illegal(reason),
        }
    }
}

fn ensure(condition: bool, reason: Reason) -> Result<(), Reason> {
    if condition {
        Ok(())
    } else {
        Err(reason)
    }
}

/// Whether `player` owns every square of a non-empty color group.
pub fn has_monopoly(board: &Board, player: usize, color: &Color) -> bool {
    let group = board.group(color);
    !group.is_empty() && board.count_owned(group, player) == group.len()
}

/// Whether `player` may take turn actions at all.
pub fn can_act(state: &State, player: usize) -> Verdict {
    let check = || -> Result<(), Reason> {
        ensure(state.phase != Phase::GameOver, Reason::GameOver)?;
        let p = state.players.get(player).ok_or(Reason::UnknownPlayer)?;
        ensure(!p.bankrupt, Reason::Bankrupt)?;
        ensure(state.current_player_index == player, Reason::WrongTurn)
    };

    check().into()
}

pub fn can_purchase(board: &Board, player: &Player, position: usize) -> Verdict {
    let check = || -> Result<(), Reason> {
        let square = board.square(position).ok_or(Reason::UnknownSquare)?;
        let price = square.price().ok_or(Reason::NotPurchasable)?;
        ensure(square.owner().is_none(), Reason::AlreadyOwned)?;
        ensure(!player.in_jail(), Reason::InJail)?;
        ensure(player.can_afford(price), Reason::InsufficientFunds)
    };

    check().into()
}

/// Whether `player` may put up a `kind` on the property at `position`.
/// Houses go up evenly across a group: a property can't get another
/// house while a sibling without a hotel has fewer.
pub fn can_build(
    board: &Board,
    player: &Player,
    position: usize,
    kind: Building,
    settings: &Settings,
) -> Verdict {
    let check = || -> Result<(), Reason> {
        let square = board.square(position).ok_or(Reason::UnknownSquare)?;
        let color = match &square.kind {
            SquareKind::Property { color, .. } => color,
            _ => return Err(Reason::NotBuildable),
        };
        let holding = square.holding;

        ensure(holding.owner == Some(player.id), Reason::NotOwner)?;
        ensure(!holding.mortgaged, Reason::Mortgaged)?;
        ensure(has_monopoly(board, player.id, color), Reason::NoMonopoly)?;
        ensure(!holding.hotel, Reason::HotelPresent)?;

        let siblings = board
            .group(color)
            .iter()
            .filter_map(|&p| board.square(p))
            .map(|s| s.holding);

        match kind {
            Building::House => {
                ensure(holding.houses < MAX_HOUSES, Reason::MaxHouses)?;

                let fewest = siblings
                    .filter(|h| !h.hotel)
                    .map(|h| h.houses)
                    .min()
                    .unwrap_or(holding.houses);
                ensure(holding.houses <= fewest, Reason::Unbalanced)?;
            }
            Building::Hotel => {
                ensure(holding.houses == MAX_HOUSES, Reason::NeedsFourHouses)?;
                ensure(
                    siblings.into_iter().all(|h| h.hotel || h.houses == MAX_HOUSES),
                    Reason::GroupNotReady,
                )?;
            }
        }

        ensure(
            player.can_afford(settings.build_cost(kind)),
            Reason::InsufficientFunds,
        )
    };

    check().into()
}

pub fn can_mortgage(board: &Board, player: &Player, position: usize) -> Verdict {
    let check = || -> Result<(), Reason> {
        let square = board.square(position).ok_or(Reason::UnknownSquare)?;
        ensure(square.is_ownable(), Reason::NotPurchasable)?;

        let holding = square.holding;
        ensure(holding.owner == Some(player.id), Reason::NotOwner)?;
        ensure(!holding.mortgaged, Reason::AlreadyMortgaged)?;
        ensure(holding.houses == 0 && !holding.hotel, Reason::HasBuildings)
    };

    check().into()
}

pub fn can_unmortgage(
    board: &Board,
    player: &Player,
    position: usize,
    settings: &Settings,
) -> Verdict {
    let check = || -> Result<(), Reason> {
        let square = board.square(position).ok_or(Reason::UnknownSquare)?;
        let value = square.mortgage_value().ok_or(Reason::NotPurchasable)?;

        let holding = square.holding;
        ensure(holding.owner == Some(player.id), Reason::NotOwner)?;
        ensure(holding.mortgaged, Reason::NotMortgaged)?;
        ensure(
            player.can_afford(settings.unmortgage_cost(value)),
            Reason::InsufficientFunds,
        )
    };

    check().into()
}

/// Whether a jailed player gets out, either by paying the fine (by
/// choice, or forced after the last attempt) or because the roll the
/// caller just made was a double.
pub fn can_leave_jail(player: &Player, rolled_doubles: bool, settings: &Settings) -> Verdict {
    let check = || -> Result<(), Reason> {
        ensure(player.in_jail(), Reason::NotInJail)?;

        if rolled_doubles {
            return Ok(());
        }

        ensure(
            player.can_afford(settings.jail_fine),
            Reason::InsufficientFunds,
        )
    };

    check().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::player::PlayerSetup;

    fn setup() -> (Board, Vec<Player>, Settings) {
        let settings = Settings::default();
        let players = Player::multiple_new(&PlayerSetup::fixtures(2), settings.starting_cash);
        (Board::classic(), players, settings)
    }

    /// Hand `positions` to `player` on both sides of the ownership relation.
    fn give(board: &mut Board, player: &mut Player, positions: &[usize]) {
        for &position in positions {
            if let Some(square) = board.square_mut(position) {
                square.holding.owner = Some(player.id);
            }
            player.owned.insert(position);
        }
    }

    fn set_houses(board: &mut Board, position: usize, houses: u8, hotel: bool) {
        if let Some(square) = board.square_mut(position) {
            square.holding.houses = houses;
            square.holding.hotel = hotel;
        }
    }

    #[test]
    fn purchase_reasons() {
        let (mut board, mut players, _) = setup();

        assert_eq!(can_purchase(&board, &players[0], 1), Verdict::Legal);
        assert_eq!(can_purchase(&board, &players[0], 12), Verdict::Legal);
        assert_eq!(
            can_purchase(&board, &players[0], 2),
            Verdict::Illegal(Reason::NotPurchasable)
        );
        assert_eq!(
            can_purchase(&board, &players[0], 40),
            Verdict::Illegal(Reason::UnknownSquare)
        );

        players[0].cash = 59;
        assert_eq!(
            can_purchase(&board, &players[0], 1),
            Verdict::Illegal(Reason::InsufficientFunds)
        );

        players[0].cash = 1500;
        players[0].jail.in_jail = true;
        assert_eq!(can_purchase(&board, &players[0], 1), Verdict::Illegal(Reason::InJail));

        let (first, rest) = players.split_at_mut(1);
        give(&mut board, &mut rest[0], &[1]);
        assert_eq!(
            can_purchase(&board, &first[0], 1),
            Verdict::Illegal(Reason::AlreadyOwned)
        );
    }

    #[test]
    fn monopoly_needs_the_whole_group() {
        let (mut board, mut players, _) = setup();
        let purple = Color::new("purple");

        give(&mut board, &mut players[0], &[11, 13]);
        assert!(!has_monopoly(&board, 0, &purple));

        give(&mut board, &mut players[0], &[14]);
        assert!(has_monopoly(&board, 0, &purple));
        assert!(!has_monopoly(&board, 1, &purple));
        assert!(!has_monopoly(&board, 0, &Color::new("mauve")));
    }

    #[test]
    fn houses_need_a_monopoly_and_an_unmortgaged_square() {
        let (mut board, mut players, settings) = setup();

        give(&mut board, &mut players[0], &[11, 13]);
        assert_eq!(
            can_build(&board, &players[0], 11, Building::House, &settings),
            Verdict::Illegal(Reason::NoMonopoly)
        );
        assert_eq!(
            can_build(&board, &players[0], 14, Building::House, &settings),
            Verdict::Illegal(Reason::NotOwner)
        );
        assert_eq!(
            can_build(&board, &players[0], 5, Building::House, &settings),
            Verdict::Illegal(Reason::NotBuildable)
        );

        give(&mut board, &mut players[0], &[14]);
        assert_eq!(
            can_build(&board, &players[0], 11, Building::House, &settings),
            Verdict::Legal
        );

        if let Some(square) = board.square_mut(11) {
            square.holding.mortgaged = true;
        }
        assert_eq!(
            can_build(&board, &players[0], 11, Building::House, &settings),
            Verdict::Illegal(Reason::Mortgaged)
        );

        players[0].cash = 99;
        assert_eq!(
            can_build(&board, &players[0], 13, Building::House, &settings),
            Verdict::Illegal(Reason::InsufficientFunds)
        );
    }

    #[test]
    fn houses_go_up_evenly() {
        let (mut board, mut players, settings) = setup();
        give(&mut board, &mut players[0], &[11, 13, 14]);

        set_houses(&mut board, 11, 1, false);
        set_houses(&mut board, 13, 1, false);
        assert_eq!(
            can_build(&board, &players[0], 11, Building::House, &settings),
            Verdict::Illegal(Reason::Unbalanced)
        );
        assert_eq!(
            can_build(&board, &players[0], 14, Building::House, &settings),
            Verdict::Legal
        );

        set_houses(&mut board, 14, 1, false);
        assert_eq!(
            can_build(&board, &players[0], 11, Building::House, &settings),
            Verdict::Legal
        );
    }

    #[test]
    fn hotels_ignore_siblings_for_the_house_minimum() {
        let (mut board, mut players, settings) = setup();
        give(&mut board, &mut players[0], &[11, 13, 14]);

        set_houses(&mut board, 11, 0, true);
        set_houses(&mut board, 13, 3, false);
        set_houses(&mut board, 14, 3, false);
        assert_eq!(
            can_build(&board, &players[0], 13, Building::House, &settings),
            Verdict::Legal
        );
        assert_eq!(
            can_build(&board, &players[0], 11, Building::House, &settings),
            Verdict::Illegal(Reason::HotelPresent)
        );
    }

    #[test]
    fn four_houses_block_a_fifth() {
        let (mut board, mut players, settings) = setup();
        give(&mut board, &mut players[0], &[37, 39]);

        for houses in [0, 4] {
            set_houses(&mut board, 37, 4, false);
            set_houses(&mut board, 39, houses, false);

            assert_eq!(
                can_build(&board, &players[0], 37, Building::House, &settings),
                Verdict::Illegal(Reason::MaxHouses)
            );
        }
    }

    #[test]
    fn hotels_need_four_houses_across_the_group() {
        let (mut board, mut players, settings) = setup();
        give(&mut board, &mut players[0], &[11, 13, 14]);

        set_houses(&mut board, 11, 3, false);
        assert_eq!(
            can_build(&board, &players[0], 11, Building::Hotel, &settings),
            Verdict::Illegal(Reason::NeedsFourHouses)
        );

        set_houses(&mut board, 11, 4, false);
        set_houses(&mut board, 13, 4, false);
        set_houses(&mut board, 14, 3, false);
        assert_eq!(
            can_build(&board, &players[0], 11, Building::Hotel, &settings),
            Verdict::Illegal(Reason::GroupNotReady)
        );

        set_houses(&mut board, 14, 0, true);
        assert_eq!(
            can_build(&board, &players[0], 11, Building::Hotel, &settings),
            Verdict::Legal
        );

        set_houses(&mut board, 14, 4, false);
        assert_eq!(
            can_build(&board, &players[0], 11, Building::Hotel, &settings),
            Verdict::Legal
        );

        players[0].cash = 249;
        assert_eq!(
            can_build(&board, &players[0], 11, Building::Hotel, &settings),
            Verdict::Illegal(Reason::InsufficientFunds)
        );
    }

    #[test]
    fn mortgage_reasons() {
        let (mut board, mut players, settings) = setup();
        give(&mut board, &mut players[0], &[1, 3]);

        assert_eq!(can_mortgage(&board, &players[0], 1), Verdict::Legal);
        assert_eq!(
            can_mortgage(&board, &players[1], 1),
            Verdict::Illegal(Reason::NotOwner)
        );
        assert_eq!(
            can_mortgage(&board, &players[0], 0),
            Verdict::Illegal(Reason::NotPurchasable)
        );

        set_houses(&mut board, 3, 1, false);
        assert_eq!(
            can_mortgage(&board, &players[0], 3),
            Verdict::Illegal(Reason::HasBuildings)
        );

        assert_eq!(
            can_unmortgage(&board, &players[0], 1, &settings),
            Verdict::Illegal(Reason::NotMortgaged)
        );

        if let Some(square) = board.square_mut(1) {
            square.holding.mortgaged = true;
        }
        assert_eq!(
            can_mortgage(&board, &players[0], 1),
            Verdict::Illegal(Reason::AlreadyMortgaged)
        );

        players[0].cash = 32;
        assert_eq!(
            can_unmortgage(&board, &players[0], 1, &settings),
            Verdict::Illegal(Reason::InsufficientFunds)
        );
        players[0].cash = 33;
        assert_eq!(can_unmortgage(&board, &players[0], 1, &settings), Verdict::Legal);
    }

    #[test]
    fn leaving_jail() {
        let (_, mut players, settings) = setup();
        let player = &mut players[0];

        assert_eq!(
            can_leave_jail(player, true, &settings),
            Verdict::Illegal(Reason::NotInJail)
        );

        player.jail.in_jail = true;
        assert!(can_leave_jail(player, false, &settings).is_legal());

        player.cash = 49;
        assert_eq!(
            can_leave_jail(player, false, &settings).reason(),
            Some(Reason::InsufficientFunds)
        );
        assert!(can_leave_jail(player, true, &settings).is_legal());
    }

    #[test]
    fn reasons_read_as_messages() {
        assert_eq!(Reason::AlreadyOwned.to_string(), "already owned");
        assert_eq!(Reason::Unbalanced.to_string(), "build where fewer houses exist");
        assert_eq!(Reason::AlreadyMortgaged.to_string(), "already mortgaged");
        assert_eq!(
            Verdict::Illegal(Reason::InJail).into_result(),
            Err(Reason::InJail)
        );
    }
}
