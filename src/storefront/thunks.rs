//! Async action helpers.
//!
//! Each helper receives the store and the collaborator it needs, performs the
//! side effect and dispatches the resulting actions.

use std::sync::Arc;

use super::api::{self, Api, Mutation};
use super::error::{ApiError, StreamError};
use super::state::{AuctionAction, AuctionStore, LotId};
use super::stream::{self, PriceStream, PriceSubscription};

/// Fetch all lots: dispatches `LotsLoadingPending`, then success or error.
///
/// The error message shown to the user is the error's `Display` text.
pub async fn load_lots(store: &AuctionStore, api: &dyn Api) {
    store.dispatch(AuctionAction::LotsLoadingPending);
    match api::fetch_lots(api).await {
        Ok(lots) => {
            log::debug!("loaded {} lots", lots.len());
            store.dispatch(AuctionAction::LotsLoadingSuccess(lots));
        }
        Err(e) => {
            log::warn!("loading lots failed: {e}");
            store.dispatch(AuctionAction::LotsLoadingError(e.to_string()));
        }
    }
}

/// Follow the price feed of one lot, dispatching `ChangeLotPrice` per tick.
pub fn subscribe_to_lot_price(
    store: Arc<AuctionStore>,
    prices: &PriceStream,
    id: LotId,
) -> Result<PriceSubscription, StreamError> {
    prices.subscribe(&stream::channel(id), move |update| {
        store.dispatch(AuctionAction::ChangeLotPrice {
            id: update.id,
            price: update.price,
        });
    })
}

/// Mark a lot as favorite on the server, then in the store.
pub async fn favorite_lot(store: Arc<AuctionStore>, api: Arc<dyn Api>, id: LotId) -> Result<(), ApiError> {
    mutate(store, api, id, Mutation::Favorite).await
}

/// Remove a lot from favorites on the server, then in the store.
pub async fn unfavorite_lot(store: Arc<AuctionStore>, api: Arc<dyn Api>, id: LotId) -> Result<(), ApiError> {
    mutate(store, api, id, Mutation::Unfavorite).await
}

/// Run a mutation with the lot marked pending for its duration.
///
/// On failure the lot is released without any other state change.
async fn mutate(store: Arc<AuctionStore>, api: Arc<dyn Api>, id: LotId, mutation: Mutation) -> Result<(), ApiError> {
    store.dispatch(AuctionAction::MutationStarted(id));
    let result = api.post(&mutation.path(id)).await;
    match &result {
        Ok(()) => store.dispatch(match mutation {
            Mutation::Favorite => AuctionAction::FavoriteLot(id),
            Mutation::Unfavorite => AuctionAction::UnfavoriteLot(id),
        }),
        Err(e) => log::warn!("{} lot {id} failed: {e}", mutation.as_str()),
    }
    store.dispatch(AuctionAction::MutationFinished(id));
    result
}
