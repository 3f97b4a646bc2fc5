//! Board controller.
//!
//! Owns the current station id and the published load state, and is the
//! only thing that fetches through the repository.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::api::{DepartureRepository, RepositoryError};
use crate::domain::BoardSnapshot;
use crate::state::LoadState;

use super::config::{BoardConfig, ResultOrdering};

/// Load state published by the controller.
///
/// Payload and cause are reference counted so observers can clone the
/// state cheaply.
pub type BoardState = LoadState<Arc<BoardSnapshot>, Arc<RepositoryError>>;

/// What happened to a fetch's result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The result was published.
    Applied,
    /// A later fetch had already been published, so the result was dropped.
    Superseded,
}

/// Drives fetches for one board and publishes their state.
///
/// Operations take `&self`, so a `refresh` and a `set_station` may be in
/// flight at the same time. Neither cancels the other; which result ends up
/// published is decided by the configured [`ResultOrdering`]. Every fetch
/// is tagged with a sequence number taken when it starts.
pub struct BoardController<R> {
    repository: R,
    ordering: ResultOrdering,
    station: watch::Sender<String>,
    state: watch::Sender<BoardState>,
    /// Sequence number of the most recently started fetch.
    latest_seq: AtomicU64,
    /// Highest sequence number whose result has been published.
    applied_seq: AtomicU64,
}

impl<R: DepartureRepository> BoardController<R> {
    /// Create a controller. Nothing is fetched until `refresh` is called.
    pub fn new(repository: R, config: &BoardConfig) -> Self {
        let (station, _) = watch::channel(config.default_station.clone());
        let (state, _) = watch::channel(BoardState::initial());

        Self {
            repository,
            ordering: config.ordering,
            station,
            state,
            latest_seq: AtomicU64::new(0),
            applied_seq: AtomicU64::new(0),
        }
    }

    /// Fetch the current station's departures.
    ///
    /// Publishes `Loading` (keeping the previous snapshot) before awaiting
    /// the repository, then `Success` or `Error` unless superseded.
    pub async fn refresh(&self) -> RefreshOutcome {
        let station_id = self.station.borrow().clone();
        self.load(station_id).await
    }

    /// Switch to another station and fetch its departures.
    ///
    /// The previous station's snapshot stays visible, marked stale by
    /// `Loading`, until the new fetch resolves.
    pub async fn set_station(&self, station_id: impl Into<String>) -> RefreshOutcome {
        let station_id = station_id.into();
        info!(station = %station_id, "Switching station");
        self.station.send_replace(station_id.clone());
        self.load(station_id).await
    }

    /// Snapshot of the current load state.
    pub fn state(&self) -> BoardState {
        self.state.borrow().clone()
    }

    /// Watch the load state. The receiver sees every published transition's
    /// latest value.
    pub fn subscribe(&self) -> watch::Receiver<BoardState> {
        self.state.subscribe()
    }

    /// The station id the next `refresh` will fetch.
    pub fn station_id(&self) -> String {
        self.station.borrow().clone()
    }

    /// Watch the current station id.
    pub fn subscribe_station(&self) -> watch::Receiver<String> {
        self.station.subscribe()
    }

    pub fn ordering(&self) -> ResultOrdering {
        self.ordering
    }

    async fn load(&self, station_id: String) -> RefreshOutcome {
        let seq = self.latest_seq.fetch_add(1, Ordering::SeqCst) + 1;

        self.state
            .send_modify(|state| *state = std::mem::take(state).start_loading());
        debug!(station = %station_id, seq, "Fetching departures");

        let result = self.repository.fetch(&station_id).await;
        let result = result.map(Arc::new).map_err(Arc::new);
        let failure = result.as_ref().err().cloned();
        let ordering = self.ordering;
        let applied_seq = &self.applied_seq;

        // Runs under the channel's lock, so the check and the publish are atomic
        let applied = self.state.send_if_modified(|state| {
            if ordering == ResultOrdering::LatestRequest
                && applied_seq.fetch_max(seq, Ordering::SeqCst) > seq
            {
                return false;
            }
            *state = std::mem::take(state).resolve(result);
            true
        });

        if !applied {
            debug!(
                station = %station_id,
                seq,
                applied = self.applied_seq.load(Ordering::SeqCst),
                failed = failure.is_some(),
                "Discarding superseded result"
            );
            return RefreshOutcome::Superseded;
        }

        if let Some(e) = failure {
            warn!(station = %station_id, seq, error = %e, "Failed to fetch departures");
        }
        RefreshOutcome::Applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ErrorKind;
    use crate::domain::{Departure, RideMode, Station, TimeOfDay};
    use std::collections::{HashMap, VecDeque};
    use std::future::Future;
    use std::sync::Mutex;
    use tokio::sync::oneshot;

    type FetchResult = Result<BoardSnapshot, RepositoryError>;

    /// Repository whose fetches wait until the test releases them.
    #[derive(Default)]
    struct GatedRepository {
        gates: Mutex<HashMap<String, VecDeque<oneshot::Receiver<FetchResult>>>>,
        calls: Mutex<Vec<String>>,
    }

    impl GatedRepository {
        /// Queue a gate for the next fetch of `station_id`.
        fn gate(&self, station_id: &str) -> oneshot::Sender<FetchResult> {
            let (tx, rx) = oneshot::channel();
            self.gates
                .lock()
                .unwrap()
                .entry(station_id.to_string())
                .or_default()
                .push_back(rx);
            tx
        }

        /// Queue an immediately available result.
        fn respond(&self, station_id: &str, result: FetchResult) {
            self.gate(station_id).send(result).unwrap();
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl DepartureRepository for GatedRepository {
        fn fetch(&self, station_id: &str) -> impl Future<Output = FetchResult> + Send {
            self.calls.lock().unwrap().push(station_id.to_string());
            let gate = self
                .gates
                .lock()
                .unwrap()
                .get_mut(station_id)
                .and_then(VecDeque::pop_front);

            async move {
                match gate {
                    Some(rx) => rx.await.unwrap_or_else(|_| {
                        Err(RepositoryError::Fixture("gate dropped".into()))
                    }),
                    None => Err(RepositoryError::Status {
                        status: 404,
                        message: "no gate".into(),
                    }),
                }
            }
        }
    }

    fn board(label: &str) -> BoardSnapshot {
        BoardSnapshot::new(vec![Departure::new(
            label,
            "#FFD700",
            "#000000",
            Station::new("HAKODATEBUS_050019", "赤川", ""),
            RideMode::Bus,
            TimeOfDay::parse_hhmm("11:02").unwrap(),
        )])
    }

    fn network_error() -> RepositoryError {
        RepositoryError::Status {
            status: 503,
            message: "unavailable".into(),
        }
    }

    fn label(state: &BoardState) -> Option<String> {
        state
            .value()
            .and_then(|s| s.next_departure())
            .map(|d| d.ride_label().to_string())
    }

    async fn wait_for_label<R: DepartureRepository>(controller: &BoardController<R>, want: &str) {
        while label(&controller.state()).as_deref() != Some(want) {
            tokio::task::yield_now().await;
        }
    }

    fn controller(
        repo: &Arc<GatedRepository>,
        config: BoardConfig,
    ) -> BoardController<Arc<GatedRepository>> {
        BoardController::new(Arc::clone(repo), &config)
    }

    #[test]
    fn starts_loading_on_default_station() {
        let repo = Arc::new(GatedRepository::default());
        let controller = controller(&repo, BoardConfig::new("Y"));

        assert_eq!(controller.station_id(), "Y");
        assert!(matches!(
            controller.state(),
            LoadState::Loading { previous: None }
        ));
        assert!(repo.calls().is_empty());
    }

    #[tokio::test]
    async fn refresh_publishes_success() {
        let repo = Arc::new(GatedRepository::default());
        repo.respond("Y", Ok(board("55G")));
        let controller = controller(&repo, BoardConfig::new("Y"));

        assert_eq!(controller.refresh().await, RefreshOutcome::Applied);

        let state = controller.state();
        assert!(state.is_success());
        assert_eq!(state.value().map(|s| s.as_ref()), Some(&board("55G")));
        assert_eq!(repo.calls(), vec!["Y"]);
    }

    #[tokio::test]
    async fn loading_retains_previous_snapshot() {
        let repo = Arc::new(GatedRepository::default());
        repo.respond("Y", Ok(board("55G")));
        let controller = controller(&repo, BoardConfig::new("Y"));
        controller.refresh().await;

        let tx = repo.gate("Y");
        let (outcome, ()) = futures::join!(controller.refresh(), async {
            let state = controller.state();
            assert!(state.is_loading());
            assert!(state.is_stale());
            assert_eq!(label(&state).as_deref(), Some("55G"));
            tx.send(Ok(board("7F"))).unwrap();
        });

        assert_eq!(outcome, RefreshOutcome::Applied);
        assert_eq!(label(&controller.state()).as_deref(), Some("7F"));
    }

    #[tokio::test]
    async fn network_error_keeps_last_good_snapshot() {
        let repo = Arc::new(GatedRepository::default());
        repo.respond("Y", Ok(board("55G")));
        let controller = controller(&repo, BoardConfig::new("Y"));
        controller.refresh().await;
        let last_good = controller.state().into_value().unwrap();

        let tx = repo.gate("Y");
        futures::join!(controller.refresh(), async {
            assert!(controller.state().is_loading());
            tx.send(Err(network_error())).unwrap();
        });

        let state = controller.state();
        assert!(state.is_error());
        assert_eq!(state.error().unwrap().kind(), ErrorKind::Network);
        assert_eq!(state.value(), Some(&last_good));
    }

    #[tokio::test]
    async fn decode_error_before_any_success_has_no_value() {
        let repo = Arc::new(GatedRepository::default());
        repo.respond(
            "Y",
            Err(RepositoryError::Json {
                message: "expected value".into(),
                body: None,
            }),
        );
        let controller = controller(&repo, BoardConfig::new("Y"));
        controller.refresh().await;

        let state = controller.state();
        assert_eq!(state.error().unwrap().kind(), ErrorKind::Decode);
        assert_eq!(state.value(), None);
    }

    #[tokio::test]
    async fn recovers_after_error() {
        let repo = Arc::new(GatedRepository::default());
        repo.respond("Y", Err(network_error()));
        repo.respond("Y", Ok(board("55G")));
        let controller = controller(&repo, BoardConfig::new("Y"));

        controller.refresh().await;
        assert!(controller.state().is_error());

        controller.refresh().await;
        assert!(controller.state().is_success());
        assert_eq!(repo.calls(), vec!["Y", "Y"]);
    }

    #[tokio::test]
    async fn set_station_shows_old_board_until_new_one_arrives() {
        let repo = Arc::new(GatedRepository::default());
        repo.respond("Y", Ok(board("Y-bus")));
        let controller = controller(&repo, BoardConfig::new("Y"));
        controller.refresh().await;

        let tx = repo.gate("X");
        let (outcome, ()) = futures::join!(controller.set_station("X"), async {
            assert_eq!(controller.station_id(), "X");
            let state = controller.state();
            assert!(state.is_loading());
            assert_eq!(label(&state).as_deref(), Some("Y-bus"));
            tx.send(Ok(board("X-bus"))).unwrap();
        });

        assert_eq!(outcome, RefreshOutcome::Applied);
        assert_eq!(label(&controller.state()).as_deref(), Some("X-bus"));
        assert_eq!(repo.calls(), vec!["Y", "X"]);
    }

    #[tokio::test]
    async fn latest_response_lets_slow_old_station_win() {
        // Y's fetch resolves after X's. With LatestResponse the board ends up
        // showing Y's departures even though the current station is X.
        let repo = Arc::new(GatedRepository::default());
        let y = repo.gate("Y");
        let x = repo.gate("X");
        let config = BoardConfig::new("Y").with_ordering(ResultOrdering::LatestResponse);
        let controller = controller(&repo, config);

        let (y_outcome, x_outcome, ()) = futures::join!(
            controller.refresh(),
            controller.set_station("X"),
            async {
                x.send(Ok(board("X-bus"))).unwrap();
                wait_for_label(&controller, "X-bus").await;
                y.send(Ok(board("Y-bus"))).unwrap();
            }
        );

        assert_eq!(x_outcome, RefreshOutcome::Applied);
        assert_eq!(y_outcome, RefreshOutcome::Applied);
        assert_eq!(controller.station_id(), "X");
        assert_eq!(label(&controller.state()).as_deref(), Some("Y-bus"));
    }

    #[tokio::test]
    async fn latest_request_discards_slow_old_station() {
        let repo = Arc::new(GatedRepository::default());
        let y = repo.gate("Y");
        let x = repo.gate("X");
        let controller = controller(&repo, BoardConfig::new("Y"));
        assert_eq!(controller.ordering(), ResultOrdering::LatestRequest);

        let (y_outcome, x_outcome, ()) = futures::join!(
            controller.refresh(),
            controller.set_station("X"),
            async {
                x.send(Ok(board("X-bus"))).unwrap();
                wait_for_label(&controller, "X-bus").await;
                y.send(Ok(board("Y-bus"))).unwrap();
            }
        );

        assert_eq!(x_outcome, RefreshOutcome::Applied);
        assert_eq!(y_outcome, RefreshOutcome::Superseded);
        assert_eq!(controller.station_id(), "X");
        let state = controller.state();
        assert!(state.is_success());
        assert_eq!(label(&state).as_deref(), Some("X-bus"));
    }

    #[tokio::test]
    async fn latest_request_publishes_older_fetch_resolving_first() {
        // Nothing newer has been published yet, so the older result shows
        // until the newer fetch lands.
        let repo = Arc::new(GatedRepository::default());
        let first = repo.gate("Y");
        let second = repo.gate("Y");
        let controller = controller(&repo, BoardConfig::new("Y"));

        let (first_outcome, second_outcome, ()) = futures::join!(
            controller.refresh(),
            controller.refresh(),
            async {
                first.send(Ok(board("old"))).unwrap();
                wait_for_label(&controller, "old").await;
                assert!(controller.state().is_success());
                second.send(Ok(board("new"))).unwrap();
            }
        );

        assert_eq!(first_outcome, RefreshOutcome::Applied);
        assert_eq!(second_outcome, RefreshOutcome::Applied);
        assert_eq!(label(&controller.state()).as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn continuously_overlapping_refreshes_keep_publishing() {
        // Each fetch resolves while a newer one is still pending. Every
        // result must still reach the board in order.
        let repo = Arc::new(GatedRepository::default());
        let first = repo.gate("Y");
        let second = repo.gate("Y");
        let third = repo.gate("Y");
        let controller = controller(&repo, BoardConfig::new("Y"));

        let (a, b, c, ()) = futures::join!(
            controller.refresh(),
            controller.refresh(),
            controller.refresh(),
            async {
                first.send(Ok(board("1"))).unwrap();
                wait_for_label(&controller, "1").await;
                second.send(Ok(board("2"))).unwrap();
                wait_for_label(&controller, "2").await;
                assert!(controller.state().is_success());
                third.send(Ok(board("3"))).unwrap();
            }
        );

        assert_eq!(
            [a, b, c],
            [RefreshOutcome::Applied, RefreshOutcome::Applied, RefreshOutcome::Applied]
        );
        assert_eq!(label(&controller.state()).as_deref(), Some("3"));
        assert_eq!(repo.calls(), vec!["Y", "Y", "Y"]);
    }

    #[tokio::test]
    async fn late_arrival_after_newer_publish_is_discarded() {
        let repo = Arc::new(GatedRepository::default());
        let first = repo.gate("Y");
        let second = repo.gate("Y");
        let third = repo.gate("Y");
        let controller = controller(&repo, BoardConfig::new("Y"));

        let (a, b, c, ()) = futures::join!(
            controller.refresh(),
            controller.refresh(),
            controller.refresh(),
            async {
                second.send(Ok(board("2"))).unwrap();
                wait_for_label(&controller, "2").await;
                first.send(Ok(board("1"))).unwrap();
                third.send(Ok(board("3"))).unwrap();
            }
        );

        assert_eq!(a, RefreshOutcome::Superseded);
        assert_eq!(b, RefreshOutcome::Applied);
        assert_eq!(c, RefreshOutcome::Applied);
        assert_eq!(label(&controller.state()).as_deref(), Some("3"));
    }

    #[tokio::test]
    async fn superseded_error_is_not_published() {
        let repo = Arc::new(GatedRepository::default());
        let y = repo.gate("Y");
        let x = repo.gate("X");
        let controller = controller(&repo, BoardConfig::new("Y"));

        futures::join!(controller.refresh(), controller.set_station("X"), async {
            x.send(Ok(board("X-bus"))).unwrap();
            wait_for_label(&controller, "X-bus").await;
            y.send(Err(network_error())).unwrap();
        });

        assert!(controller.state().is_success());
    }

    #[tokio::test]
    async fn subscribers_observe_transitions() {
        let repo = Arc::new(GatedRepository::default());
        repo.respond("Y", Ok(board("55G")));
        let controller = controller(&repo, BoardConfig::new("Y"));
        let mut rx = controller.subscribe();
        let mut station_rx = controller.subscribe_station();

        controller.refresh().await;
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_success());

        repo.respond("X", Ok(board("7F")));
        controller.set_station("X").await;
        assert!(station_rx.has_changed().unwrap());
        assert_eq!(*station_rx.borrow_and_update(), "X");
        assert_eq!(label(&rx.borrow_and_update()).as_deref(), Some("7F"));
    }
}
