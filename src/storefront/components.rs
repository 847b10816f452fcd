//! Storefront components.
//!
//! Leaf components read everything from their props. Container components
//! are closures over a state snapshot, which is how they get at data that
//! does not fit in a prop (the lot list, the loading flags).
//!
//! Event handlers never touch the store: they push a [`Command`] onto the
//! runtime's channel. Handlers are cached per command so that re-rendering
//! yields the same [`Callback`] and the `onclick` prop stays unchanged.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use compact_str::format_compact;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tokio::sync::mpsc::UnboundedSender;

use crate::attr::{Callback, Props, PropsExt};
use crate::node::{Component, ComponentRef, VElement, VNode};

use super::state::{AuctionState, Lot, LotId};

// =============================================================================
// Commands
// =============================================================================

/// User intent emitted by an event handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Favorite(LotId),
    Unfavorite(LotId),
}

/// Sender side of the command channel, with a handler cache.
#[derive(Debug, Clone)]
pub struct Commands {
    tx: UnboundedSender<Command>,
    handlers: Arc<Mutex<FxHashMap<Command, Callback>>>,
}

impl Commands {
    pub fn new(tx: UnboundedSender<Command>) -> Self {
        Self {
            tx,
            handlers: Arc::default(),
        }
    }

    /// Callback that emits `command`; the same command always yields the same callback.
    pub fn handler(&self, command: Command) -> Callback {
        self.handlers
            .lock()
            .entry(command)
            .or_insert_with(|| {
                let tx = self.tx.clone();
                Callback::new(move || {
                    if tx.send(command).is_err() {
                        log::debug!("dropped {command:?}: runtime is gone");
                    }
                })
            })
            .clone()
    }
}

// =============================================================================
// TimeOfDay
// =============================================================================

/// Wall-clock time shown by the clock, in seconds since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct TimeOfDay {
    secs: u32,
}

impl TimeOfDay {
    const DAY: u32 = 24 * 60 * 60;

    /// Out-of-range fields wrap around the day
    pub fn new(hour: u32, minute: u32, second: u32) -> Self {
        let secs = u64::from(hour) * 3600 + u64::from(minute) * 60 + u64::from(second);
        Self::wrap(secs)
    }

    pub fn from_secs(secs: u32) -> Self {
        Self { secs: secs % Self::DAY }
    }

    /// Current UTC time of day
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self::wrap(secs)
    }

    pub fn hour(self) -> u32 {
        self.secs / 3600
    }

    pub fn minute(self) -> u32 {
        self.secs / 60 % 60
    }

    pub fn second(self) -> u32 {
        self.secs % 60
    }

    /// Wraps past midnight
    pub fn advance(self, secs: u64) -> Self {
        Self::wrap(u64::from(self.secs) + secs % u64::from(Self::DAY))
    }

    fn wrap(secs: u64) -> Self {
        Self {
            secs: (secs % u64::from(Self::DAY)) as u32,
        }
    }

    /// Hours 7 through 21 inclusive count as day
    pub fn is_day(self) -> bool {
        (7..=21).contains(&self.hour())
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour(), self.minute(), self.second())
    }
}

// =============================================================================
// Leaf components
// =============================================================================

pub fn logo() -> Component {
    Component::new("Logo", |_| {
        VElement::new("img")
            .with_class("logo")
            .prop("src", "logo.jpg")
            .prop("alt", "")
            .into()
    })
}

pub fn header() -> Component {
    Component::new("Header", |_| VElement::new("header").with_class("header").child(logo().el()).into())
}

/// Props: `time` (formatted), `day` (flag)
pub fn clock() -> Component {
    Component::new("Clock", |props| {
        let icon = if props.get_flag("day") { "icon day" } else { "icon night" };
        VElement::new("div")
            .with_class("clock")
            .child(VElement::new("span").with_class("value").text(props.get_str("time").unwrap_or_default()))
            .child(VElement::new("span").with_class(icon))
            .into()
    })
}

pub fn loading() -> Component {
    Component::new("Loading", |_| VElement::new("div").with_class("loading").text("Loading...").into())
}

/// Props: `message`
pub fn alert_error() -> Component {
    Component::new("AlertError", |props| {
        VElement::new("div")
            .with_class("error")
            .text(props.get_str("message").unwrap_or_default())
            .into()
    })
}

/// Props: `id`, `active`, `enabled`.
///
/// An active lot shows an "Unfavorite" button, an inactive one "Favorite".
pub fn favorite(commands: Commands) -> Component {
    Component::new("Favorite", move |props| {
        let id = lot_id(props);
        let enabled = props.get_flag("enabled");
        let (class, icon, label, command) = if props.get_flag("active") {
            ("unfavorite", "heart-sharp", "Unfavorite", Command::Unfavorite(id))
        } else {
            ("favorite", "heart-outline", "Favorite", Command::Favorite(id))
        };

        VElement::new("button")
            .prop("type", "button")
            .with_class(class)
            .prop("disabled", !enabled)
            .prop("onclick", commands.handler(command))
            .child(VElement::new("ion-icon").prop("name", icon))
            .text(label)
            .into()
    })
}

/// Props: `id`, `name`, `description`, `price`, `favorite`, `pending`
pub fn lot(commands: Commands) -> Component {
    let favorite = favorite(commands);
    Component::new("Lot", move |props| {
        let active = props.get_flag("favorite");
        let class = if active { "lot favorite" } else { "lot" };

        VElement::new("article")
            .with_class(class)
            .child(VElement::new("div").with_class("price").text(props.get_num("price").unwrap_or_default()))
            .child(VElement::new("h1").text(props.get_str("name").unwrap_or_default()))
            .child(VElement::new("p").text(props.get_str("description").unwrap_or_default()))
            .child(
                favorite
                    .el()
                    .prop("id", lot_id(props))
                    .prop("active", active)
                    .prop("enabled", !props.get_flag("pending")),
            )
            .into()
    })
}

/// Reference to [`lot`] for one lot of `state`, keyed by lot id.
pub fn lot_ref(lot_component: &Component, lot: &Lot, state: &AuctionState) -> ComponentRef {
    lot_component
        .el()
        .prop("id", lot.id)
        .prop("name", lot.name.clone())
        .prop("description", lot.description.clone())
        .prop("price", lot.price)
        .prop("favorite", lot.favorite)
        .prop("pending", state.is_pending(lot.id))
        .with_key(format_compact!("{}", lot.id))
}

fn lot_id(props: &Props) -> LotId {
    props.get_num("id").unwrap_or_default() as LotId
}

// =============================================================================
// Containers
// =============================================================================

pub fn lots(state: Arc<AuctionState>, commands: Commands) -> Component {
    let lot = lot(commands);
    Component::new("Lots", move |_| {
        VElement::new("div")
            .with_class("lots")
            .children(state.lots.iter().map(|l| lot_ref(&lot, l, &state)))
            .into()
    })
}

/// Error, then loading, then the lot list. Renders an empty text node
/// before the first load starts.
pub fn lots_container(state: Arc<AuctionState>, commands: Commands) -> Component {
    Component::new("LotsContainer", move |_| {
        if let Some(message) = &state.error {
            return alert_error().el().prop("message", message.as_str()).into();
        }
        if state.loading {
            return loading().el().into();
        }
        if !state.loaded {
            return VNode::from("");
        }
        lots(Arc::clone(&state), commands.clone()).el().into()
    })
}

/// Root component: header, clock and lots.
pub fn app(state: Arc<AuctionState>, time: TimeOfDay, commands: Commands) -> Component {
    Component::new("App", move |_| {
        VElement::new("div")
            .with_class("app container")
            .child(header().el())
            .child(
                clock()
                    .el()
                    .prop("time", time.to_string())
                    .prop("day", time.is_day()),
            )
            .child(lots_container(Arc::clone(&state), commands.clone()).el())
            .into()
    })
}
