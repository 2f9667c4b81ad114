use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use super::data::{BoardData, RawRent, RawSquare};
use super::error::DataError;
use super::globals::*;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
/// The color set that a property belongs to, named as the board data names it.
pub struct Color(pub String);

impl Color {
    pub fn new(name: &str) -> Color {
        Color(name.to_owned())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Something that can be built on a property.
pub enum Building {
    House,
    Hotel,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Rents of a colored property, depending on what's built on it.
pub struct PropertyRent {
    pub base: i64,
    /// `with_house[0]` is the rent with one house, `with_house[3]` with four.
    pub with_house: [i64; 4],
    pub with_hotel: i64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Squares that are neither ownable, taxed nor card squares.
pub enum Special {
    Go,
    Jail,
    FreeParking,
    GoToJail,
    Other,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// What a square is and what landing on it means.
pub enum SquareKind {
    Property {
        color: Color,
        price: i64,
        mortgage: i64,
        rent: PropertyRent,
    },
    Railroad {
        price: i64,
        mortgage: i64,
        /// Rent when the owner holds 1, 2, 3 or 4 railroads.
        rent: [i64; 4],
    },
    Utility {
        price: i64,
        mortgage: i64,
        /// Dice multiplier when the owner holds one or both utilities.
        multipliers: [i64; 2],
    },
    Tax {
        amount: i64,
    },
    Chance,
    CommunityChest,
    Special(Special),
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
/// The part of an ownable square that changes during a game.
pub struct Holding {
    /// Seat index of the owner.
    pub owner: Option<usize>,
    /// Between 0 and 4. Reset to 0 when a hotel goes up.
    pub houses: u8,
    pub hotel: bool,
    pub mortgaged: bool,
}

#[derive(Clone, Debug)]
/// One position on the board loop.
pub struct Square {
    pub id: u32,
    pub name: String,
    pub position: usize,
    pub kind: SquareKind,
    pub holding: Holding,
}

impl Square {
    /// The purchase price, or `None` if the square can't be owned.
    pub fn price(&self) -> Option<i64> {
        match self.kind {
            SquareKind::Property { price, .. }
            | SquareKind::Railroad { price, .. }
            | SquareKind::Utility { price, .. } => Some(price),
            _ => None,
        }
    }

    /// What the bank lends against this square.
    pub fn mortgage_value(&self) -> Option<i64> {
        match self.kind {
            SquareKind::Property { mortgage, .. }
            | SquareKind::Railroad { mortgage, .. }
            | SquareKind::Utility { mortgage, .. } => Some(mortgage),
            _ => None,
        }
    }

    pub fn color(&self) -> Option<&Color> {
        match &self.kind {
            SquareKind::Property { color, .. } => Some(color),
            _ => None,
        }
    }

    pub fn is_ownable(&self) -> bool {
        self.price().is_some()
    }

    pub fn owner(&self) -> Option<usize> {
        self.holding.owner
    }

    pub fn is_card_square(&self) -> bool {
        matches!(self.kind, SquareKind::Chance | SquareKind::CommunityChest)
    }
}

#[derive(Clone, Debug)]
/// The board: squares in walking order plus lookups derived from them.
pub struct Board {
    squares: Vec<Square>,
    by_color: BTreeMap<Color, Vec<usize>>,
    railroads: Vec<usize>,
    utilities: Vec<usize>,
    taxes: Vec<usize>,
    card_squares: Vec<usize>,
    jail: usize,
}

impl Board {
    /*********        INITIALISATION INTERFACES        *********/

    /// Validate the backend's layout and build a board from it.
    pub fn from_data(data: &BoardData) -> Result<Board, DataError> {
        for (side, squares) in data.sides() {
            if squares.is_empty() {
                return Err(DataError::EmptySide(side));
            }
        }

        let mut seen_ids = HashSet::new();
        let mut squares = vec![];

        for (position, raw) in data.squares().enumerate() {
            if !seen_ids.insert(raw.id) {
                return Err(DataError::DuplicateId(raw.id));
            }

            squares.push(Square {
                id: raw.id,
                name: raw.name.clone(),
                position,
                kind: kind_of(raw, position)?,
                holding: Holding::default(),
            });
        }

        Board::index(squares)
    }

    /// The built-in classic 40 square board.
    pub fn classic() -> Board {
        CLASSIC_BOARD.clone()
    }

    fn index(squares: Vec<Square>) -> Result<Board, DataError> {
        let mut by_color: BTreeMap<Color, Vec<usize>> = BTreeMap::new();
        let mut railroads = vec![];
        let mut utilities = vec![];
        let mut taxes = vec![];
        let mut card_squares = vec![];
        let mut jail = None;

        for square in &squares {
            let position = square.position;

            match &square.kind {
                SquareKind::Property { color, .. } => {
                    by_color.entry(color.clone()).or_default().push(position)
                }
                SquareKind::Railroad { .. } => railroads.push(position),
                SquareKind::Utility { .. } => utilities.push(position),
                SquareKind::Tax { .. } => taxes.push(position),
                SquareKind::Chance | SquareKind::CommunityChest => card_squares.push(position),
                // The first jail square wins if the data has several
                SquareKind::Special(Special::Jail) if jail.is_none() => jail = Some(position),
                SquareKind::Special(_) => (),
            }
        }

        Ok(Board {
            squares,
            by_color,
            railroads,
            utilities,
            taxes,
            card_squares,
            jail: jail.ok_or(DataError::NoJail)?,
        })
    }

    /*********        GETTERS        *********/

    pub fn len(&self) -> usize {
        self.squares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.squares.is_empty()
    }

    pub fn squares(&self) -> &[Square] {
        &self.squares
    }

    pub fn square(&self, position: usize) -> Option<&Square> {
        self.squares.get(position)
    }

    pub fn square_mut(&mut self, position: usize) -> Option<&mut Square> {
        self.squares.get_mut(position)
    }

    /// The position of the square with backend id `id`.
    pub fn position_of(&self, id: u32) -> Option<usize> {
        self.squares.iter().position(|s| s.id == id)
    }

    /// Positions of the properties in a color set. Empty for unknown colors.
    pub fn group(&self, color: &Color) -> &[usize] {
        self.by_color.get(color).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn colors(&self) -> impl Iterator<Item = &Color> {
        self.by_color.keys()
    }

    pub fn railroads(&self) -> &[usize] {
        &self.railroads
    }

    pub fn utilities(&self) -> &[usize] {
        &self.utilities
    }

    pub fn taxes(&self) -> &[usize] {
        &self.taxes
    }

    pub fn card_squares(&self) -> &[usize] {
        &self.card_squares
    }

    /// Where jailed players sit.
    pub fn jail(&self) -> usize {
        self.jail
    }

    /// Number of squares in `positions` owned by `player`.
    pub fn count_owned(&self, positions: &[usize], player: usize) -> usize {
        positions
            .iter()
            .filter(|&&p| self.squares[p].owner() == Some(player))
            .count()
    }

    /*********        HELPERS        *********/

    /// The position `steps` squares away from `position`, wrapping both ways.
    /// Any `steps` is accepted, however large.
    pub fn wrap(&self, position: usize, steps: i64) -> usize {
        let size = self.squares.len() as i64;
        let from = (position as i64).rem_euclid(size);
        ((from + steps.rem_euclid(size)) % size) as usize
    }

    /// Forget every owner, building and mortgage.
    pub fn reset(&mut self) {
        for square in &mut self.squares {
            square.holding = Holding::default();
        }
    }
}

/// Turn a raw square record into a typed square kind.
fn kind_of(raw: &RawSquare, position: usize) -> Result<SquareKind, DataError> {
    let missing = |field| DataError::MissingField {
        id: raw.id,
        name: raw.name.clone(),
        field,
    };

    match raw.kind.as_str() {
        "property" => {
            let price = raw.price.ok_or_else(|| missing("price"))?;
            let color = raw.color.as_deref().ok_or_else(|| missing("color"))?;
            let rent = match &raw.rent {
                Some(RawRent::Buildings {
                    base,
                    with_house,
                    with_hotel,
                }) => PropertyRent {
                    base: *base,
                    with_house: with_house
                        .as_slice()
                        .try_into()
                        .map_err(|_| DataError::BadRent(raw.id))?,
                    with_hotel: *with_hotel,
                },
                Some(RawRent::Schedule(_)) => return Err(DataError::BadRent(raw.id)),
                None => return Err(missing("rent")),
            };

            Ok(SquareKind::Property {
                color: Color::new(color),
                price,
                mortgage: raw.mortgage.unwrap_or(price / 2),
                rent,
            })
        }
        "railroad" => {
            let price = raw.price.ok_or_else(|| missing("price"))?;
            let rent = match &raw.rent {
                Some(RawRent::Schedule(schedule)) => schedule
                    .as_slice()
                    .try_into()
                    .map_err(|_| DataError::BadRent(raw.id))?,
                Some(RawRent::Buildings { .. }) => return Err(DataError::BadRent(raw.id)),
                None => RAILROAD_RENT,
            };

            Ok(SquareKind::Railroad {
                price,
                mortgage: raw.mortgage.unwrap_or(price / 2),
                rent,
            })
        }
        "utility" => {
            let price = raw.price.ok_or_else(|| missing("price"))?;
            let multipliers = match &raw.rent {
                Some(RawRent::Schedule(schedule)) => schedule
                    .as_slice()
                    .try_into()
                    .map_err(|_| DataError::BadRent(raw.id))?,
                Some(RawRent::Buildings { .. }) => return Err(DataError::BadRent(raw.id)),
                None => UTILITY_MULTIPLIERS,
            };

            Ok(SquareKind::Utility {
                price,
                mortgage: raw.mortgage.unwrap_or(price / 2),
                multipliers,
            })
        }
        "tax" => {
            let amount = raw
                .action
                .as_ref()
                .and_then(|action| action.money)
                .ok_or_else(|| missing("action.money"))?;

            Ok(SquareKind::Tax {
                amount: amount.abs(),
            })
        }
        "chance" => Ok(SquareKind::Chance),
        "community_chest" => Ok(SquareKind::CommunityChest),
        "go" | "jail" | "free_parking" | "go_to_jail" | "special" => {
            Ok(SquareKind::Special(special_of(raw, position)))
        }
        other => Err(DataError::UnknownType {
            id: raw.id,
            kind: other.to_owned(),
        }),
    }
}

/// Work out which corner (or other special square) a record describes.
fn special_of(raw: &RawSquare, position: usize) -> Special {
    let sends_to_jail = raw
        .action
        .as_ref()
        .and_then(|action| action.go_to.as_deref())
        == Some("jail");
    let name = raw.name.to_lowercase();

    match raw.kind.as_str() {
        "go_to_jail" => Special::GoToJail,
        _ if sends_to_jail || name.contains("go to jail") => Special::GoToJail,
        "go" => Special::Go,
        "jail" => Special::Jail,
        "free_parking" => Special::FreeParking,
        _ if name.contains("jail") => Special::Jail,
        _ if position == 0 || name == "go" => Special::Go,
        _ if name.contains("parking") => Special::FreeParking,
        _ => Special::Other,
    }
}
