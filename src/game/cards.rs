use rand::Rng;
use serde::{Deserialize, Serialize};

use super::data::{RawAction, RawCard};
use super::error::DataError;
use super::events::GameEvent;
use super::globals::{FALLBACK_CHANCE, FALLBACK_COMMUNITY_CHEST};
use super::Game;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeckKind {
    Chance,
    CommunityChest,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// What a card does to the player who draws it.
pub enum CardAction {
    /// Pay the bank.
    Pay(i64),
    /// Collect from the bank.
    Collect(i64),
    /// Walk forward to a board position, collecting `bonus` on arrival.
    MoveAbsolute { destination: usize, bonus: i64 },
    /// Walk by a number of squares. Negative values walk backwards.
    MoveRelative(i64),
    GoToJail,
    Nothing,
}

impl TryFrom<&RawAction> for CardAction {
    type Error = DataError;

    fn try_from(raw: &RawAction) -> Result<CardAction, DataError> {
        if raw.go_to.as_deref() == Some("jail") {
            return Ok(CardAction::GoToJail);
        }

        if let Some(destination) = raw.move_to {
            let destination =
                usize::try_from(destination).map_err(|_| DataError::NegativeDestination(destination))?;

            return Ok(CardAction::MoveAbsolute {
                destination,
                bonus: raw.reward.unwrap_or(0),
            });
        }

        if let Some(steps) = raw.steps {
            return Ok(CardAction::MoveRelative(steps));
        }

        Ok(match raw.money {
            Some(amount) if amount < 0 => CardAction::Pay(amount.saturating_neg()),
            Some(amount) if amount > 0 => CardAction::Collect(amount),
            _ => CardAction::Nothing,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Card {
    pub id: u32,
    pub description: String,
    pub action: CardAction,
}

impl TryFrom<&RawCard> for Card {
    type Error = DataError;

    fn try_from(raw: &RawCard) -> Result<Card, DataError> {
        Ok(Card {
            id: raw.id,
            description: raw.description.clone(),
            action: CardAction::try_from(&raw.action)?,
        })
    }
}

#[derive(Clone, Debug)]
/// A deck of cards. Cards are never used up: every draw picks
/// uniformly from the whole deck.
pub struct Deck {
    kind: DeckKind,
    cards: Vec<Card>,
}

impl Deck {
    pub fn new(kind: DeckKind, cards: Vec<Card>) -> Result<Deck, DataError> {
        if cards.is_empty() {
            return Err(DataError::EmptyDeck);
        }

        Ok(Deck { kind, cards })
    }

    /// Build a deck from backend records. One malformed card rejects the deck.
    pub fn from_raw(kind: DeckKind, raw: &[RawCard]) -> Result<Deck, DataError> {
        let cards = raw.iter().map(Card::try_from).collect::<Result<Vec<_>, _>>()?;
        Deck::new(kind, cards)
    }

    /// The built-in deck of the given kind.
    pub fn fallback(kind: DeckKind) -> Deck {
        let raw = match kind {
            DeckKind::Chance => &*FALLBACK_CHANCE,
            DeckKind::CommunityChest => &*FALLBACK_COMMUNITY_CHEST,
        };

        Deck::from_raw(kind, raw).expect("the built-in decks are well-formed")
    }

    pub fn kind(&self) -> DeckKind {
        self.kind
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn draw<R: Rng>(&self, rng: &mut R) -> &Card {
        &self.cards[rng.random_range(0..self.cards.len())]
    }
}

#[derive(Clone, Debug)]
pub struct Decks {
    pub chance: Deck,
    pub community_chest: Deck,
}

impl Decks {
    pub fn fallback() -> Decks {
        Decks {
            chance: Deck::fallback(DeckKind::Chance),
            community_chest: Deck::fallback(DeckKind::CommunityChest),
        }
    }

    pub fn get(&self, kind: DeckKind) -> &Deck {
        match kind {
            DeckKind::Chance => &self.chance,
            DeckKind::CommunityChest => &self.community_chest,
        }
    }
}

impl Game {
    /*********        CARD RESOLUTION        *********/

    /// Draw a card for `player` and apply it. Only one card is drawn per
    /// landing, even if the card moves the player onto another card square.
    pub(super) fn draw_card(&mut self, player: usize, kind: DeckKind) {
        if self.state.card_drawn {
            return;
        }
        self.state.card_drawn = true;

        let card = self.decks.get(kind).draw(&mut self.rng).clone();
        log::debug!("{}: {}", card.id, card.description);

        self.events.emit(GameEvent::CardDrawn {
            player,
            deck: kind,
            card: card.id,
        });

        self.apply_card(player, card.action);
    }

    pub(super) fn apply_card(&mut self, player: usize, action: CardAction) {
        match action {
            CardAction::Pay(amount) => {
                self.ledger().charge(player, amount, None);
            }
            CardAction::Collect(amount) => self.ledger().credit(player, amount),
            CardAction::MoveAbsolute { destination, bonus } => {
                let size = self.state.board.len() as i64;
                let position = self.state.players[player].position as i64;
                let steps = (destination as i64 - position).rem_euclid(size);

                self.advance(player, steps);
                self.ledger().credit(player, bonus);
                self.resolve_square(player);
            }
            CardAction::MoveRelative(steps) => {
                self.advance(player, steps);
                self.resolve_square(player);
            }
            CardAction::GoToJail => self.enter_jail(player),
            CardAction::Nothing => (),
        }
    }
}
