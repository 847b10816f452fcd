//! Auction storefront built on the reconciler
//!
//! A small application showing lots for sale with live prices and a
//! favorite toggle. The data sources are mocks: [`MockApi`] answers after a
//! delay and sometimes fails, [`PriceStream`] ticks new prices.
//!
//! ## Modules
//! - `state`: lots, auction state, actions and reducer
//! - `api`: lots API trait and mock
//! - `stream`: price feed
//! - `thunks`: async actions combining the above with the store
//! - `components`: the page as components
//! - `app`: the runtime that renders and reacts
//!
//! ```ignore
//! let mut storefront = Storefront::new(
//!     Arc::new(auction_store()),
//!     Arc::new(MockApi::default()),
//!     PriceStream::default(),
//!     StorefrontConfig::default(),
//! );
//! storefront.render()?;
//! storefront.run_for(Duration::from_secs(10)).await?;
//! println!("{}", storefront.html());
//! ```

pub mod api;
pub mod app;
pub mod components;
pub mod error;
pub mod state;
pub mod stream;
pub mod thunks;

pub use api::{Api, ApiConfig, MockApi, Mutation};
pub use app::{Storefront, StorefrontConfig};
pub use components::{Command, Commands, TimeOfDay};
pub use error::{ApiError, AppError, AppResult, StreamError};
pub use state::{AuctionAction, AuctionState, AuctionStore, Lot, LotId, auction_reducer, auction_store};
pub use stream::{PriceStream, PriceSubscription, PriceUpdate, StreamConfig};
