// ── Explorer facade ──
//
// Owns the mutable engine state (FilterState, selection, playback) over
// the immutable DatasetStore, recomputes the full set of derived
// view-models on every transition, and publishes them as immutable
// snapshots through a watch channel. Consumers (CLI, TUI) either read
// the current snapshot or subscribe for changes.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::filter::{self, FilterState};
use crate::model::{CountryCode, IdentityRecord};
use crate::playback::{Playback, PlaybackStatus};
use crate::selection::SelectionController;
use crate::store::DatasetStore;
use crate::view::{
    self, CountryStyle, DetailView, RegionGroup,
};

/// Default step interval for the year time-lapse.
pub const DEFAULT_PLAYBACK_INTERVAL: Duration = Duration::from_millis(500);

/// Who initiated a year-cutoff change. A manual change is a user override
/// that stops playback; the playback tick's own change must not be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOrigin {
    User,
    Playback,
}

/// Explorer construction options.
#[derive(Debug, Clone)]
pub struct ExplorerOptions {
    pub playback_interval: Duration,
}

impl Default for ExplorerOptions {
    fn default() -> Self {
        Self {
            playback_interval: DEFAULT_PLAYBACK_INTERVAL,
        }
    }
}

/// The complete derived state at one instant. Immutable; a new filter or
/// selection event publishes a fresh snapshot that fully supersedes this
/// one; there is no partial or stale merge.
#[derive(Debug, Clone, Serialize)]
pub struct ViewSnapshot {
    /// The criteria this snapshot was derived from.
    pub filter: FilterState,
    /// Records matching all active dimensions, in dataset order.
    pub filtered: Vec<Arc<IdentityRecord>>,
    /// Count of (record, country) support pairs.
    pub counter: usize,
    /// Countries eligible for "active" map styling.
    pub active: BTreeSet<CountryCode>,
    /// Region-grouped aggregation for the list panel.
    pub regions: Vec<RegionGroup>,
    /// Detail panel view-model.
    pub detail: DetailView,
    /// Playback status for a play/pause control.
    pub playback: PlaybackStatus,
}

impl ViewSnapshot {
    /// Tri-state style for a country code; `Selected` beats `Active`.
    pub fn style(&self, code: &CountryCode) -> CountryStyle {
        view::country_style(&self.active, self.filter.selected.as_ref(), code)
    }
}

struct EngineState {
    // `filter.selected` mirrors `selection`; both are only touched via
    // `select_country` and `invalidate_selection`.
    filter: FilterState,
    selection: SelectionController,
    playback: Playback,
}

struct TimerHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

struct ExplorerInner {
    store: DatasetStore,
    playback_interval: Duration,
    state: Mutex<EngineState>,
    snapshot: watch::Sender<Arc<ViewSnapshot>>,
    /// At most one armed playback timer; enforced by cancelling before
    /// every start.
    timer: Mutex<Option<TimerHandle>>,
}

/// Entry point for consumers. Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct Explorer {
    inner: Arc<ExplorerInner>,
}

impl Explorer {
    pub fn new(store: DatasetStore, options: ExplorerOptions) -> Self {
        let playback = Playback::new(store.known_years());
        let state = EngineState {
            filter: FilterState::default(),
            selection: SelectionController::new(),
            playback,
        };
        let initial = Arc::new(build_snapshot(&store, &state));
        let (snapshot, _) = watch::channel(initial);

        Self {
            inner: Arc::new(ExplorerInner {
                store,
                playback_interval: options.playback_interval,
                state: Mutex::new(state),
                snapshot,
                timer: Mutex::new(None),
            }),
        }
    }

    pub fn store(&self) -> &DatasetStore {
        &self.inner.store
    }

    /// Current snapshot (cheap `Arc` clone).
    pub fn snapshot(&self) -> Arc<ViewSnapshot> {
        self.inner.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<Arc<ViewSnapshot>> {
        self.inner.snapshot.subscribe()
    }

    // ── Filter dimension events ──────────────────────────────────────

    pub fn set_levels(&self, levels: BTreeSet<u8>) {
        let mut state = self.lock_state();
        if state.filter.levels == levels {
            return;
        }
        state.filter.levels = levels;
        invalidate_selection(&mut state);
        self.publish(&state);
    }

    pub fn set_type_codes(&self, type_codes: BTreeSet<u32>) {
        let mut state = self.lock_state();
        if state.filter.type_codes == type_codes {
            return;
        }
        state.filter.type_codes = type_codes;
        invalidate_selection(&mut state);
        self.publish(&state);
    }

    pub fn set_regions(&self, regions: BTreeSet<String>) {
        let mut state = self.lock_state();
        if state.filter.regions == regions {
            return;
        }
        state.filter.regions = regions;
        invalidate_selection(&mut state);
        self.publish(&state);
    }

    /// Change the year cutoff.
    ///
    /// Ignored (with a warning) while the year dimension is disabled. A
    /// `User`-originated change stops playback first; it is an override
    /// of the time-lapse; the tick's own `Playback`-originated change
    /// must not stop the timer it came from.
    pub fn set_year_cutoff(&self, cutoff: Option<u16>, origin: ChangeOrigin) {
        if !self.inner.store.years_enabled() {
            warn!("year index unavailable; ignoring year cutoff change");
            return;
        }
        if origin == ChangeOrigin::User {
            self.cancel_timer();
        }
        let mut state = self.lock_state();
        let stopped = origin == ChangeOrigin::User && state.playback.is_playing();
        if stopped {
            state.playback.stop();
        }
        let changed = state.filter.year_cutoff != cutoff;
        if changed {
            state.filter.year_cutoff = cutoff;
            invalidate_selection(&mut state);
        }
        if changed || stopped {
            self.publish(&state);
        }
    }

    // ── Selection events ─────────────────────────────────────────────

    /// Country-clicked event. Re-selecting the already selected country
    /// re-enters the state idempotently (a fresh snapshot is still
    /// published so the view re-renders).
    pub fn select_country(&self, code: CountryCode) {
        let mut state = self.lock_state();
        state.selection.select(code);
        state.filter.selected = state.selection.selected().cloned();
        self.publish(&state);
    }

    /// Selection-cleared event (detail panel closed). No-op when nothing
    /// is selected.
    pub fn clear_selection(&self) {
        let mut state = self.lock_state();
        if state.selection.invalidate() {
            state.filter.selected = None;
            self.publish(&state);
        }
    }

    // ── Playback ─────────────────────────────────────────────────────

    /// Start (or restart) the time-lapse. Any armed timer is cancelled
    /// first, so two starts in a row leave exactly one timer running and
    /// the cutoff at the first known year. Returns `false` when there
    /// are no known years to step through.
    ///
    /// Must be called within a tokio runtime.
    pub fn start_playback(&self) -> bool {
        self.cancel_timer();

        {
            let mut state = self.lock_state();
            let Some(first) = state.playback.start() else {
                warn!("no known years; playback unavailable");
                return false;
            };
            state.filter.year_cutoff = Some(first);
            invalidate_selection(&mut state);
            self.publish(&state);
        }

        let cancel = CancellationToken::new();
        let task = tokio::spawn(tick_loop(
            self.clone(),
            cancel.clone(),
            self.inner.playback_interval,
        ));
        *self.lock_timer() = Some(TimerHandle { cancel, task });
        debug!(interval = ?self.inner.playback_interval, "playback started");
        true
    }

    /// Stop the time-lapse. Synchronous and idempotent.
    pub fn stop_playback(&self) {
        self.cancel_timer();
        let mut state = self.lock_state();
        if state.playback.is_playing() {
            state.playback.stop();
            self.publish(&state);
            debug!("playback stopped");
        }
    }

    /// Playback-toggle-requested event. Returns `true` when playback is
    /// running afterwards.
    pub fn toggle_playback(&self) -> bool {
        let playing = self.lock_state().playback.is_playing();
        if playing {
            self.stop_playback();
            false
        } else {
            self.start_playback()
        }
    }

    pub fn playback_status(&self) -> PlaybackStatus {
        self.lock_state().playback.status()
    }

    /// One timer tick: advance the sequence and apply the next year.
    /// Returns `false` when the sequence is exhausted and the loop
    /// should terminate.
    fn advance_playback(&self) -> bool {
        let mut state = self.lock_state();
        match state.playback.tick() {
            Some(year) => {
                state.filter.year_cutoff = Some(year);
                invalidate_selection(&mut state);
                self.publish(&state);
                true
            }
            None => {
                // Exhausted; the sequencer already returned to Stopped.
                self.publish(&state);
                false
            }
        }
    }

    // ── Internals ────────────────────────────────────────────────────

    fn lock_state(&self) -> MutexGuard<'_, EngineState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_timer(&self) -> MutexGuard<'_, Option<TimerHandle>> {
        self.inner
            .timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn cancel_timer(&self) {
        if let Some(handle) = self.lock_timer().take() {
            handle.cancel.cancel();
            handle.task.abort();
        }
    }

    fn publish(&self, state: &EngineState) {
        let snapshot = Arc::new(build_snapshot(&self.inner.store, state));
        self.inner.snapshot.send_replace(snapshot);
    }
}

/// Drop the selection after a filter-dimension change.
fn invalidate_selection(state: &mut EngineState) {
    if state.selection.invalidate() {
        state.filter.selected = None;
    }
}

fn build_snapshot(store: &DatasetStore, state: &EngineState) -> ViewSnapshot {
    let filtered = filter::apply(store, &state.filter);
    let active = view::active_countries(store, &filtered, &state.filter.regions);
    let regions = view::aggregate_by_region(store, &filtered, &state.filter.regions);
    let counter = view::counter(&filtered);
    let detail = view::detail_view(store, &filtered, state.selection.selected());

    ViewSnapshot {
        filter: state.filter.clone(),
        filtered,
        counter,
        active,
        regions,
        detail,
        playback: state.playback.status(),
    }
}

/// The playback timer task. Fires on a fixed interval until cancelled or
/// the year sequence is exhausted; it never preempts an in-progress
/// recompute (each step runs to completion under the state lock).
async fn tick_loop(explorer: Explorer, cancel: CancellationToken, period: Duration) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick of a fresh interval completes immediately; the
    // starting year was already applied by `start_playback`.
    interval.tick().await;

    loop {
        tokio::select! {
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                if !explorer.advance_playback() {
                    break;
                }
            }
        }
    }
    debug!("playback timer finished");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::testutil::{sample_store, sample_store_no_years};

    fn explorer() -> Explorer {
        Explorer::new(sample_store(), ExplorerOptions::default())
    }

    #[test]
    fn initial_snapshot_is_unrestricted() {
        let explorer = Explorer::new(sample_store(), ExplorerOptions::default());
        let snap = explorer.snapshot();
        assert_eq!(snap.filtered.len(), 3);
        assert_eq!(snap.counter, 3);
        assert_eq!(snap.playback, PlaybackStatus::Stopped);
        assert_eq!(snap.detail, DetailView::NoSelection);
    }

    #[test]
    fn filter_change_invalidates_selection() {
        let explorer = Explorer::new(sample_store(), ExplorerOptions::default());
        explorer.select_country(CountryCode::new("fr"));
        assert!(matches!(
            explorer.snapshot().detail,
            DetailView::Schemes { .. }
        ));

        explorer.set_levels(BTreeSet::from([1]));
        let snap = explorer.snapshot();
        // No stale detail for fr: the selection is gone entirely.
        assert_eq!(snap.detail, DetailView::NoSelection);
        assert_eq!(snap.filter.selected, None);
    }

    #[test]
    fn clear_selection_returns_detail_to_no_selection() {
        let explorer = Explorer::new(sample_store(), ExplorerOptions::default());
        explorer.select_country(CountryCode::new("fr"));
        explorer.clear_selection();
        let snap = explorer.snapshot();
        assert_eq!(snap.detail, DetailView::NoSelection);
        assert_eq!(snap.filter.selected, None);
    }

    #[test]
    fn reselecting_same_country_republishes_idempotently() {
        let explorer = Explorer::new(sample_store(), ExplorerOptions::default());
        explorer.select_country(CountryCode::new("fr"));
        let first = explorer.snapshot();
        explorer.select_country(CountryCode::new("FR"));
        let second = explorer.snapshot();
        assert_eq!(first.detail, second.detail);
        assert_eq!(second.filter.selected, Some(CountryCode::new("fr")));
    }

    #[test]
    fn style_reflects_selection_precedence() {
        let explorer = Explorer::new(sample_store(), ExplorerOptions::default());
        explorer.select_country(CountryCode::new("us"));
        let snap = explorer.snapshot();
        assert_eq!(snap.style(&CountryCode::new("us")), CountryStyle::Selected);
        assert_eq!(snap.style(&CountryCode::new("fr")), CountryStyle::Active);
        assert_eq!(snap.style(&CountryCode::new("de")), CountryStyle::Inactive);
    }

    #[test]
    fn year_cutoff_ignored_when_dimension_disabled() {
        let explorer = Explorer::new(sample_store_no_years(), ExplorerOptions::default());
        explorer.set_year_cutoff(Some(2012), ChangeOrigin::User);
        let snap = explorer.snapshot();
        assert_eq!(snap.filter.year_cutoff, None);
        assert_eq!(snap.filtered.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn playback_unavailable_without_year_index() {
        let explorer = Explorer::new(sample_store_no_years(), ExplorerOptions::default());
        assert!(!explorer.start_playback());
        assert_eq!(explorer.playback_status(), PlaybackStatus::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn double_start_leaves_one_timer_at_first_year() {
        let explorer = explorer();
        assert!(explorer.start_playback());
        assert!(explorer.start_playback());

        // No time has passed: still on the first known year, playing.
        let snap = explorer.snapshot();
        assert_eq!(snap.playback, PlaybackStatus::Playing { year: 2010 });
        assert_eq!(snap.filter.year_cutoff, Some(2010));

        // One interval later exactly one step has been taken. A second
        // surviving timer would have advanced twice (or stopped).
        tokio::time::sleep(Duration::from_millis(510)).await;
        let snap = explorer.snapshot();
        assert_eq!(snap.playback, PlaybackStatus::Playing { year: 2015 });
        assert_eq!(snap.filter.year_cutoff, Some(2015));

        explorer.stop_playback();
    }

    #[tokio::test(start_paused = true)]
    async fn playback_walks_years_then_stops() {
        let explorer = explorer();
        explorer.start_playback();
        assert_eq!(
            explorer.snapshot().playback,
            PlaybackStatus::Playing { year: 2010 }
        );

        tokio::time::sleep(Duration::from_millis(510)).await;
        assert_eq!(
            explorer.snapshot().playback,
            PlaybackStatus::Playing { year: 2015 }
        );

        tokio::time::sleep(Duration::from_millis(510)).await;
        let snap = explorer.snapshot();
        assert_eq!(snap.playback, PlaybackStatus::Stopped);
        // The last applied cutoff survives the stop.
        assert_eq!(snap.filter.year_cutoff, Some(2015));
    }

    #[tokio::test(start_paused = true)]
    async fn manual_year_change_stops_playback() {
        let explorer = explorer();
        explorer.start_playback();
        explorer.set_year_cutoff(Some(2012), ChangeOrigin::User);

        let snap = explorer.snapshot();
        assert_eq!(snap.playback, PlaybackStatus::Stopped);
        assert_eq!(snap.filter.year_cutoff, Some(2012));

        // And it stays stopped: no timer left to fire.
        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(explorer.snapshot().filter.year_cutoff, Some(2012));
    }

    #[tokio::test(start_paused = true)]
    async fn tick_origin_does_not_stop_its_own_timer() {
        let explorer = explorer();
        explorer.start_playback();

        // The tick at +500ms routes through ChangeOrigin::Playback and
        // must leave the timer armed.
        tokio::time::sleep(Duration::from_millis(510)).await;
        assert!(explorer.lock_state().playback.is_playing());

        explorer.stop_playback();
        assert_eq!(explorer.playback_status(), PlaybackStatus::Stopped);
        // Idempotent.
        explorer.stop_playback();
    }

    #[tokio::test(start_paused = true)]
    async fn playback_tick_invalidates_selection() {
        let explorer = explorer();
        explorer.select_country(CountryCode::new("fr"));
        explorer.start_playback();
        // Applying the first year is a filter change like any other.
        assert_eq!(explorer.snapshot().detail, DetailView::NoSelection);
        explorer.stop_playback();
    }
}
