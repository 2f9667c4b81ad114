//! Domain events for the rendering layer to react to.

use std::fmt;

use super::board::Building;
use super::cards::DeckKind;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// How a player got out of jail.
pub enum JailExit {
    /// Paid the fine before rolling.
    Paid,
    Doubles,
    /// The fine was taken after the last failed attempt.
    Forced,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Something that happened in the game. Players and squares are
/// referred to by seat index and board position.
pub enum GameEvent {
    GameStarted { players: usize },
    DiceRolled { player: usize, first: i64, second: i64 },
    PlayerMoved { player: usize, from: usize, to: usize, passed_go: bool },
    PurchaseOffered { player: usize, square: usize },
    PropertyPurchased { player: usize, square: usize, price: i64 },
    RentPaid { payer: usize, owner: usize, square: usize, amount: i64 },
    TaxPaid { player: usize, square: usize, amount: i64 },
    CardDrawn { player: usize, deck: DeckKind, card: u32 },
    Built { player: usize, square: usize, building: Building },
    PropertyMortgaged { player: usize, square: usize, amount: i64 },
    PropertyUnmortgaged { player: usize, square: usize, cost: i64 },
    JailEntered { player: usize },
    JailExited { player: usize, via: JailExit },
    /// A player's cash changed.
    StatsChanged { player: usize, cash: i64 },
    /// `creditor` is `None` when the debt was owed to the bank.
    PlayerBankrupt { player: usize, creditor: Option<usize> },
    TurnEnded { player: usize, next: usize },
    GameOver { winner: Option<usize> },
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameEvent::GameStarted { players } => write!(f, "game started with {} players", players),
            GameEvent::DiceRolled { player, first, second } => {
                write!(f, "player {} rolled {}+{}", player, first, second)
            }
            GameEvent::PlayerMoved { player, from, to, passed_go } => write!(
                f,
                "player {} moved {:02} -> {:02}{}",
                player,
                from,
                to,
                if *passed_go { " passing go" } else { "" }
            ),
            GameEvent::PurchaseOffered { player, square } => {
                write!(f, "player {} may buy square {}", player, square)
            }
            GameEvent::PropertyPurchased { player, square, price } => {
                write!(f, "player {} bought square {} for ${}", player, square, price)
            }
            GameEvent::RentPaid { payer, owner, square, amount } => write!(
                f,
                "player {} paid ${} rent to player {} for square {}",
                payer, amount, owner, square
            ),
            GameEvent::TaxPaid { player, square, amount } => {
                write!(f, "player {} paid ${} tax on square {}", player, amount, square)
            }
            GameEvent::CardDrawn { player, deck, card } => {
                write!(f, "player {} drew {:?} card {}", player, deck, card)
            }
            GameEvent::Built { player, square, building } => {
                write!(f, "player {} built a {:?} on square {}", player, building, square)
            }
            GameEvent::PropertyMortgaged { player, square, amount } => {
                write!(f, "player {} mortgaged square {} for ${}", player, square, amount)
            }
            GameEvent::PropertyUnmortgaged { player, square, cost } => {
                write!(f, "player {} unmortgaged square {} for ${}", player, square, cost)
            }
            GameEvent::JailEntered { player } => write!(f, "player {} went to jail", player),
            GameEvent::JailExited { player, via } => {
                write!(f, "player {} left jail ({:?})", player, via)
            }
            GameEvent::StatsChanged { player, cash } => {
                write!(f, "player {} now has ${}", player, cash)
            }
            GameEvent::PlayerBankrupt { player, creditor } => match creditor {
                Some(c) => write!(f, "player {} is bankrupt, assets go to player {}", player, c),
                None => write!(f, "player {} is bankrupt, assets go to the bank", player),
            },
            GameEvent::TurnEnded { player, next } => {
                write!(f, "player {} ended their turn, player {} is next", player, next)
            }
            GameEvent::GameOver { winner } => match winner {
                Some(w) => write!(f, "game over, player {} wins", w),
                None => write!(f, "game over"),
            },
        }
    }
}

/// Something that wants to hear about game events as they happen.
pub trait Listener {
    fn notify(&mut self, event: &GameEvent);
}

impl<F: FnMut(&GameEvent)> Listener for F {
    fn notify(&mut self, event: &GameEvent) {
        self(event)
    }
}

#[derive(Default)]
/// Fans events out to listeners and keeps them queued until drained.
pub struct EventBus {
    queue: Vec<GameEvent>,
    listeners: Vec<Box<dyn Listener>>,
}

impl EventBus {
    pub fn subscribe(&mut self, listener: Box<dyn Listener>) {
        self.listeners.push(listener);
    }

    pub fn emit(&mut self, event: GameEvent) {
        log::info!("{}", event);

        for listener in &mut self.listeners {
            listener.notify(&event);
        }

        self.queue.push(event);
    }

    /// Take every event emitted since the last drain.
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.queue)
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("queued", &self.queue.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
