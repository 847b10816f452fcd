//! Storefront runtime.
//!
//! Owns the rendered tree and drives the loop: every store change or clock
//! tick evaluates the [`app`] component against a fresh state snapshot and
//! syncs it into the mount node. Clicks arrive as [`Command`]s on a channel
//! and are turned into mutation tasks.
//!
//! After each render the runtime performs the side effects the page needs:
//! starting the initial load and keeping one price feed per displayed lot.

use std::sync::Arc;
use std::time::Duration;

use rustc_hash::{FxHashMap, FxHashSet};
use tokio::sync::Notify;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::dom::RenderedNode;
use crate::eval::EvalConfig;
use crate::node::VNode;
use crate::reconcile::{self, ReconcileConfig, SyncStats};
use crate::render;
use crate::store::SubscriptionId;

use super::api::Api;
use super::components::{Command, Commands, TimeOfDay, app};
use super::error::{AppError, AppResult};
use super::state::{AuctionState, AuctionStore, LotId};
use super::stream::{PriceStream, PriceSubscription};
use super::thunks;

// =============================================================================
// StorefrontConfig
// =============================================================================

/// Configuration for [`Storefront`].
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Start loading lots on the first render. Default: true
    pub auto_load: bool,
    /// Keep a price feed open for every displayed lot. Default: true
    pub subscribe_prices: bool,
    /// Clock refresh period, must be non-zero. Default: 1s
    pub clock_interval: Duration,
    /// Tag of the mount node. Default: "div"
    pub mount_tag: String,
    /// `id` of the mount node. Default: "root"
    pub mount_id: String,
    pub eval: EvalConfig,
    pub reconcile: ReconcileConfig,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            auto_load: true,
            subscribe_prices: true,
            clock_interval: Duration::from_secs(1),
            mount_tag: "div".to_string(),
            mount_id: "root".to_string(),
            eval: EvalConfig::default(),
            reconcile: ReconcileConfig::default(),
        }
    }
}

impl StorefrontConfig {
    /// Without price feeds; prices only change through explicit dispatches.
    pub fn static_prices() -> Self {
        Self {
            subscribe_prices: false,
            ..Self::default()
        }
    }

    /// Set the clock refresh period (builder).
    pub fn with_clock_interval(mut self, interval: Duration) -> AppResult<Self> {
        if interval.is_zero() {
            return Err(AppError::InvalidConfig(ZERO_CLOCK_INTERVAL));
        }
        self.clock_interval = interval;
        Ok(self)
    }
}

const ZERO_CLOCK_INTERVAL: &str = "clock interval must be non-zero";

// =============================================================================
// Storefront
// =============================================================================

/// The storefront application bound to one mount node.
///
/// Must be used inside a tokio runtime: loads, mutations and price feeds run
/// as spawned tasks.
pub struct Storefront {
    config: StorefrontConfig,
    store: Arc<AuctionStore>,
    api: Arc<dyn Api>,
    prices: PriceStream,
    mount: RenderedNode,
    commands: Commands,
    command_rx: UnboundedReceiver<Command>,
    changed: Arc<Notify>,
    store_listener: SubscriptionId,
    feeds: FxHashMap<LotId, PriceSubscription>,
    loading: Option<JoinHandle<()>>,
    in_flight: Vec<JoinHandle<()>>,
    rendered_version: Option<u64>,
    time: TimeOfDay,
    /// Elapsed time not yet shown on the clock
    clock_carry: Duration,
}

impl Storefront {
    pub fn new(store: Arc<AuctionStore>, api: Arc<dyn Api>, prices: PriceStream, config: StorefrontConfig) -> Self {
        let (tx, command_rx) = mpsc::unbounded_channel();
        let changed = Arc::new(Notify::new());
        let notify = Arc::clone(&changed);
        let store_listener = store.subscribe(move |_| notify.notify_one());
        let mount = RenderedNode::mount_point(config.mount_tag.as_str(), config.mount_id.as_str());

        Self {
            config,
            store,
            api,
            prices,
            mount,
            commands: Commands::new(tx),
            command_rx,
            changed,
            store_listener,
            feeds: FxHashMap::default(),
            loading: None,
            in_flight: Vec::new(),
            rendered_version: None,
            time: TimeOfDay::now(),
            clock_carry: Duration::ZERO,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn store(&self) -> &Arc<AuctionStore> {
        &self.store
    }

    /// The live tree
    pub fn mount(&self) -> &RenderedNode {
        &self.mount
    }

    /// The live tree as HTML
    pub fn html(&self) -> String {
        render::to_html(&self.mount)
    }

    pub fn time(&self) -> TimeOfDay {
        self.time
    }

    /// Set the clock; takes effect on the next render
    pub fn set_time(&mut self, time: TimeOfDay) {
        self.time = time;
        self.clock_carry = Duration::ZERO;
    }

    /// Lots with an open price feed
    pub fn feed_ids(&self) -> Vec<LotId> {
        let mut ids: Vec<LotId> = self.feeds.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────────────────

    /// Evaluate the app against the current state and sync the mount node.
    pub fn render(&mut self) -> AppResult<SyncStats> {
        let version = self.store.version();
        let state = Arc::new(self.store.state());

        let view: VNode = app(Arc::clone(&state), self.time, self.commands.clone()).el().into();
        let stats =
            reconcile::render_into_with_config(&view, &mut self.mount, &self.config.eval, &self.config.reconcile)?;
        self.rendered_version = Some(version);

        self.run_effects(&state)?;
        Ok(stats)
    }

    /// Render only if the store changed since the last render.
    pub fn render_if_changed(&mut self) -> AppResult<Option<SyncStats>> {
        if self.rendered_version == Some(self.store.version()) {
            return Ok(None);
        }
        self.render().map(Some)
    }

    /// Bring the tree up to date with price ticks (and any other store
    /// change) received since the last render.
    pub fn pump_prices(&mut self) -> AppResult<Option<SyncStats>> {
        self.render_if_changed()
    }

    fn run_effects(&mut self, state: &AuctionState) -> AppResult<()> {
        if self.config.auto_load && !state.loaded && !state.loading && state.error.is_none() {
            self.load();
        }
        if self.config.subscribe_prices {
            self.sync_feeds(state)?;
        }
        Ok(())
    }

    /// Open feeds for newly displayed lots and close feeds for removed ones.
    fn sync_feeds(&mut self, state: &AuctionState) -> AppResult<()> {
        let shown: FxHashSet<LotId> = state.lots.iter().map(|lot| lot.id).collect();
        self.feeds.retain(|id, _| shown.contains(id));

        for lot in &state.lots {
            if !self.feeds.contains_key(&lot.id) {
                let feed = thunks::subscribe_to_lot_price(Arc::clone(&self.store), &self.prices, lot.id)?;
                self.feeds.insert(lot.id, feed);
            }
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Actions
    // ─────────────────────────────────────────────────────────────────────────

    /// Start loading lots unless a load is already running.
    pub fn load(&mut self) {
        if self.loading.as_ref().is_some_and(|task| !task.is_finished()) {
            return;
        }
        let store = Arc::clone(&self.store);
        let api = Arc::clone(&self.api);
        self.loading = Some(tokio::spawn(async move {
            thunks::load_lots(&store, api.as_ref()).await;
        }));
    }

    /// Start a task for every queued command. Returns how many were started.
    pub fn handle_commands(&mut self) -> usize {
        let mut started = 0;
        while let Ok(command) = self.command_rx.try_recv() {
            self.spawn_command(command);
            started += 1;
        }
        started
    }

    fn spawn_command(&mut self, command: Command) {
        log::debug!("command {command:?}");
        let store = Arc::clone(&self.store);
        let api = Arc::clone(&self.api);
        let task = tokio::spawn(async move {
            // Failures are logged by the thunk and leave the lot unchanged
            let _ = match command {
                Command::Favorite(id) => thunks::favorite_lot(store, api, id).await,
                Command::Unfavorite(id) => thunks::unfavorite_lot(store, api, id).await,
            };
        });
        self.in_flight.retain(|task| !task.is_finished());
        self.in_flight.push(task);
    }

    /// Wait for the running load and mutations, then render the result.
    pub async fn settle(&mut self) -> AppResult<Option<SyncStats>> {
        if let Some(task) = self.loading.take()
            && let Err(e) = task.await
        {
            log::error!("load task failed: {e}");
        }
        for task in std::mem::take(&mut self.in_flight) {
            if let Err(e) = task.await {
                log::error!("mutation task failed: {e}");
            }
        }
        self.render_if_changed()
    }

    /// Run the event loop for `duration`: re-render on store changes and
    /// clock ticks, start tasks for commands.
    ///
    /// The clock advances by the time actually elapsed between ticks, so
    /// any refresh period keeps it in step with real time.
    pub async fn run_for(&mut self, duration: Duration) -> AppResult<()> {
        enum Event {
            Changed,
            Tick,
            Command(Command),
        }

        let period = self.config.clock_interval;
        if period.is_zero() {
            return Err(AppError::InvalidConfig(ZERO_CLOCK_INTERVAL));
        }
        let start = Instant::now();
        let deadline = start + duration;
        let mut last_tick = start;
        let mut clock = time::interval_at(start + period, period);
        clock.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let changed = Arc::clone(&self.changed);

        self.render_if_changed()?;
        loop {
            let event = tokio::select! {
                _ = time::sleep_until(deadline) => break,
                _ = changed.notified() => Event::Changed,
                _ = clock.tick() => Event::Tick,
                Some(command) = self.command_rx.recv() => Event::Command(command),
            };

            match event {
                Event::Changed => {
                    self.render_if_changed()?;
                }
                Event::Tick => {
                    let now = Instant::now();
                    self.advance_clock(now - last_tick);
                    last_tick = now;
                    self.render()?;
                }
                Event::Command(command) => self.spawn_command(command),
            }
        }
        Ok(())
    }

    /// Move the clock forward by `elapsed`, keeping sub-second remainders.
    fn advance_clock(&mut self, elapsed: Duration) {
        let total = self.clock_carry + elapsed;
        let whole = total.as_secs();
        self.clock_carry = total - Duration::from_secs(whole);
        self.time = self.time.advance(whole);
    }
}

impl Drop for Storefront {
    fn drop(&mut self) {
        self.store.unsubscribe(self.store_listener);
        if let Some(task) = self.loading.take() {
            task.abort();
        }
        for task in self.in_flight.drain(..) {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::NodeId;
    use crate::storefront::api::{ApiConfig, MockApi};
    use crate::storefront::state::{AuctionAction, Lot, auction_store};
    use crate::storefront::stream::StreamConfig;

    fn sample_lots() -> Vec<Lot> {
        vec![
            Lot::new(1, "apple", 15).with_favorite(true),
            Lot::new(2, "orange", 33),
            Lot::new(3, "mango", 22),
        ]
    }

    fn storefront(api: ApiConfig, config: StorefrontConfig) -> Storefront {
        let mut sf = Storefront::new(
            Arc::new(auction_store()),
            Arc::new(MockApi::new(api)),
            PriceStream::new(StreamConfig::default()),
            config,
        );
        sf.set_time(TimeOfDay::new(12, 0, 0));
        sf
    }

    fn reliable() -> ApiConfig {
        ApiConfig::reliable(Duration::from_millis(1000)).with_lots(sample_lots())
    }

    fn article_classes(sf: &Storefront) -> Vec<String> {
        sf.mount()
            .find_by_tag("article")
            .iter()
            .map(|a| a.class().unwrap_or_default().to_string())
            .collect()
    }

    fn button_of(sf: &Storefront, index: usize) -> &RenderedNode {
        sf.mount().find_by_tag("article")[index]
            .find(|n| n.tag() == "button")
            .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_render_starts_loading() {
        let mut sf = storefront(reliable(), StorefrontConfig::static_prices());
        sf.render().unwrap();

        let root = sf.mount();
        assert_eq!(root.dom_id(), Some("root"));
        let app = root.child(0).unwrap();
        assert_eq!(app.class(), Some("app container"));
        assert_eq!(app.child_count(), 3);
        assert!(app.child(2).unwrap().is_text());
        assert!(sf.html().contains("12:00:00"));

        tokio::task::yield_now().await;
        sf.render_if_changed().unwrap();
        assert!(sf.html().contains(r#"<div class="loading">Loading...</div>"#));
    }

    #[tokio::test(start_paused = true)]
    async fn test_lots_rendered_in_order() {
        let mut sf = storefront(reliable(), StorefrontConfig::static_prices());
        sf.render().unwrap();
        sf.settle().await.unwrap();

        assert_eq!(article_classes(&sf), ["lot favorite", "lot", "lot"]);
        let names: Vec<String> = sf.mount().find_by_tag("h1").iter().map(|n| n.text_content()).collect();
        assert_eq!(names, ["apple", "orange", "mango"]);
        assert_eq!(sf.mount().find_by_tag("article")[2].key(), Some("3"));

        let articles = sf.mount().find_by_tag("article");
        let column = |index: usize| -> Vec<String> {
            articles
                .iter()
                .map(|a| a.child(index).map(|n| n.text_content()).unwrap_or_default())
                .collect()
        };
        assert_eq!(column(0), ["15", "33", "22"]);
        assert_eq!(column(2), ["apple description", "orange description", "mango description"]);
        for article in &articles {
            assert_eq!(article.child(0).unwrap().class(), Some("price"));
            assert_eq!(article.child(2).unwrap().tag(), "p");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_toggle_favorite_updates_in_place() {
        let mut sf = storefront(reliable(), StorefrontConfig::static_prices());
        sf.render().unwrap();
        sf.settle().await.unwrap();

        let articles = sf.mount().find_by_tag("article");
        let first_id = articles[0].id();
        let sibling_ids: Vec<Vec<NodeId>> = articles[1..].iter().map(|a| a.node_ids()).collect();

        assert!(button_of(&sf, 0).dispatch("click"));
        assert_eq!(sf.handle_commands(), 1);

        // Button is disabled while the request is in flight
        tokio::task::yield_now().await;
        sf.render_if_changed().unwrap();
        assert!(button_of(&sf, 0).get_prop("disabled").and_then(|v| v.as_bool()).unwrap_or(false));
        assert!(!button_of(&sf, 0).dispatch("click"));

        sf.settle().await.unwrap();
        assert_eq!(article_classes(&sf), ["lot", "lot", "lot"]);

        let button = button_of(&sf, 0);
        assert_eq!(button.class(), Some("favorite"));
        assert_eq!(button.text_content(), "Favorite");
        assert_eq!(button.child(0).unwrap().get_prop("name").and_then(|v| v.as_str()), Some("heart-outline"));

        let articles = sf.mount().find_by_tag("article");
        assert_eq!(articles[0].id(), first_id);
        let after: Vec<Vec<NodeId>> = articles[1..].iter().map(|a| a.node_ids()).collect();
        assert_eq!(after, sibling_ids);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rerender_without_changes_is_noop() {
        let mut sf = storefront(reliable(), StorefrontConfig::static_prices());
        sf.render().unwrap();
        sf.settle().await.unwrap();

        let stats = sf.render().unwrap();
        assert!(!stats.has_mutations());
        assert_eq!(sf.render_if_changed().unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_error_displayed() {
        let api = reliable().with_failure_rate(1.0);
        let mut sf = storefront(api, StorefrontConfig::static_prices());
        sf.render().unwrap();
        sf.settle().await.unwrap();

        assert!(sf.html().contains(r#"<div class="error">Connection error</div>"#));
        assert!(sf.mount().find_by_tag("article").is_empty());

        // No retry once an error is shown
        sf.render().unwrap();
        assert_eq!(sf.settle().await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_mutation_reenables_button() {
        let api = reliable().with_mutation_failure_rate(1.0);
        let mut sf = storefront(api, StorefrontConfig::static_prices());
        sf.render().unwrap();
        sf.settle().await.unwrap();
        let before = sf.html();

        assert!(button_of(&sf, 1).dispatch("click"));
        sf.handle_commands();
        sf.settle().await.unwrap();

        assert_eq!(sf.html(), before);
        assert!(button_of(&sf, 1).dispatch("click"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_price_change_touches_one_text() {
        let mut sf = storefront(reliable(), StorefrontConfig::static_prices());
        sf.render().unwrap();
        sf.settle().await.unwrap();

        sf.store().dispatch(AuctionAction::ChangeLotPrice { id: 2, price: 37 });
        let stats = sf.pump_prices().unwrap().unwrap();
        assert_eq!(stats.texts_set, 1);
        assert_eq!(stats.mutation_count(), 1);
        assert_eq!(sf.mount().find_by_tag("article")[1].child(0).unwrap().text_content(), "37");
    }

    #[tokio::test(start_paused = true)]
    async fn test_price_feeds_follow_lots() {
        let mut sf = storefront(reliable(), StorefrontConfig::default());
        sf.render().unwrap();
        assert!(sf.feed_ids().is_empty());

        sf.settle().await.unwrap();
        assert_eq!(sf.feed_ids(), [1, 2, 3]);

        sf.run_for(Duration::from_millis(1000)).await.unwrap();
        let state = sf.store().state();
        for article in sf.mount().find_by_tag("article") {
            let price: u32 = article.child(0).unwrap().text_content().parse().unwrap();
            assert!((30..=40).contains(&price));
        }
        assert!(state.lots.iter().all(|lot| (30..=40).contains(&lot.price)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_for_handles_clicks_and_clock() {
        let mut sf = storefront(reliable(), StorefrontConfig::static_prices());
        sf.set_time(TimeOfDay::new(21, 59, 58));
        sf.render().unwrap();
        sf.settle().await.unwrap();
        assert!(sf.html().contains("icon day"));

        assert!(button_of(&sf, 2).dispatch("click"));
        sf.run_for(Duration::from_millis(2500)).await.unwrap();

        assert_eq!(article_classes(&sf), ["lot favorite", "lot", "lot favorite"]);
        assert_eq!(sf.time(), TimeOfDay::new(22, 0, 0));
        assert!(sf.html().contains("icon night"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_clock_interval_rejected() {
        let err = StorefrontConfig::static_prices().with_clock_interval(Duration::ZERO).unwrap_err();
        assert!(matches!(err, AppError::InvalidConfig(_)));

        let config = StorefrontConfig {
            clock_interval: Duration::ZERO,
            ..StorefrontConfig::static_prices()
        };
        let mut sf = storefront(reliable(), config);
        let err = sf.run_for(Duration::from_millis(500)).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidConfig(_)));
        assert_eq!(sf.time(), TimeOfDay::new(12, 0, 0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_subsecond_clock_follows_elapsed_time() {
        let config = StorefrontConfig::static_prices()
            .with_clock_interval(Duration::from_millis(250))
            .unwrap();
        let mut sf = storefront(reliable(), config);

        // Eight ticks, two seconds
        sf.run_for(Duration::from_millis(2100)).await.unwrap();
        assert_eq!(sf.time(), TimeOfDay::new(12, 0, 2));

        // Half a second each; the remainder carries over between runs
        sf.run_for(Duration::from_millis(600)).await.unwrap();
        assert_eq!(sf.time(), TimeOfDay::new(12, 0, 2));
        sf.run_for(Duration::from_millis(600)).await.unwrap();
        assert_eq!(sf.time(), TimeOfDay::new(12, 0, 3));
        assert!(sf.html().contains("12:00:03"));
    }
}
