//! Auction state, actions and reducer.

use compact_str::CompactString;
use rustc_hash::FxHashSet;

use crate::store::Store;

/// Lot identifier
pub type LotId = u32;

/// A lot offered in the auction
#[derive(Debug, Clone, PartialEq)]
pub struct Lot {
    pub id: LotId,
    pub name: CompactString,
    pub description: CompactString,
    pub price: u32,
    pub favorite: bool,
}

impl Lot {
    /// Create a lot; the description defaults to "`<name>` description"
    pub fn new(id: LotId, name: impl Into<CompactString>, price: u32) -> Self {
        let name = name.into();
        let description = compact_str::format_compact!("{name} description");
        Self {
            id,
            name,
            description,
            price,
            favorite: false,
        }
    }

    /// Set the favorite flag (builder)
    pub fn with_favorite(mut self, favorite: bool) -> Self {
        self.favorite = favorite;
        self
    }

    /// Set the description (builder)
    pub fn with_description(mut self, description: impl Into<CompactString>) -> Self {
        self.description = description.into();
        self
    }
}

/// State of the auction page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuctionState {
    pub lots: Vec<Lot>,
    pub loading: bool,
    pub loaded: bool,
    pub error: Option<String>,
    /// Lots with a favorite/unfavorite request in flight; their buttons are disabled
    pub pending: FxHashSet<LotId>,
}

impl AuctionState {
    /// Look up a lot by id
    pub fn lot(&self, id: LotId) -> Option<&Lot> {
        self.lots.iter().find(|lot| lot.id == id)
    }

    /// Whether a mutation for `id` is in flight
    pub fn is_pending(&self, id: LotId) -> bool {
        self.pending.contains(&id)
    }
}

/// Actions understood by [`auction_reducer`]
#[derive(Debug, Clone, PartialEq)]
pub enum AuctionAction {
    LotsLoadingPending,
    LotsLoadingSuccess(Vec<Lot>),
    LotsLoadingError(String),
    ChangeLotPrice { id: LotId, price: u32 },
    FavoriteLot(LotId),
    UnfavoriteLot(LotId),
    MutationStarted(LotId),
    MutationFinished(LotId),
}

/// Store holding the auction state
pub type AuctionStore = Store<AuctionState, AuctionAction>;

/// Create an auction store in its initial state
pub fn auction_store() -> AuctionStore {
    Store::new(AuctionState::default(), auction_reducer)
}

/// Compute the next auction state.
pub fn auction_reducer(state: &AuctionState, action: AuctionAction) -> AuctionState {
    match action {
        AuctionAction::LotsLoadingPending => AuctionState {
            lots: Vec::new(),
            loading: true,
            loaded: false,
            error: None,
            pending: state.pending.clone(),
        },
        AuctionAction::LotsLoadingSuccess(lots) => AuctionState {
            lots,
            loading: false,
            loaded: true,
            error: None,
            pending: state.pending.clone(),
        },
        AuctionAction::LotsLoadingError(error) => AuctionState {
            lots: Vec::new(),
            loading: false,
            loaded: false,
            error: Some(error),
            pending: state.pending.clone(),
        },
        AuctionAction::ChangeLotPrice { id, price } => update_lot(state, id, |lot| lot.price = price),
        AuctionAction::FavoriteLot(id) => update_lot(state, id, |lot| lot.favorite = true),
        AuctionAction::UnfavoriteLot(id) => update_lot(state, id, |lot| lot.favorite = false),
        AuctionAction::MutationStarted(id) => {
            let mut next = state.clone();
            next.pending.insert(id);
            next
        }
        AuctionAction::MutationFinished(id) => {
            let mut next = state.clone();
            next.pending.remove(&id);
            next
        }
    }
}

fn update_lot(state: &AuctionState, id: LotId, f: impl Fn(&mut Lot)) -> AuctionState {
    let mut next = state.clone();
    for lot in next.lots.iter_mut().filter(|lot| lot.id == id) {
        f(lot);
    }
    next
}
