use std::sync::Arc;

use chrono::Utc;
use hike_tracker_lib::{
    planned_route::PlannedRoute, sample::Sample, track_record::TrackRecord,
    track_stats::TrackStats,
};
use tokio::{sync::Mutex, task::JoinHandle};

use crate::{
    aggregator::TrackAggregator,
    config::TrackerConfig,
    error::SessionError,
    location::{LocationProvider, PermissionStatus},
    route_matcher::{DeviationState, RouteMatcher},
    sample_filter::SampleFilter,
    store::TrackSink,
};

/// Lifecycle of a recording session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Active,
    Paused,
    Finalized,
}

impl SessionState {
    fn name(self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Active => "active",
            SessionState::Paused => "paused",
            SessionState::Finalized => "finalized",
        }
    }
}

/// Everything that exists only while a session is running. Lives inside
/// the Active/Paused phases so state and data cannot drift apart.
struct Recording {
    aggregator: TrackAggregator,
    route: Option<PlannedRoute>,
    deviation: Option<DeviationState>,
    rejected_samples: u64,
}

enum Phase {
    Idle,
    Active(Recording),
    Paused(Recording),
    Finalized,
}

impl Phase {
    fn state(&self) -> SessionState {
        match self {
            Phase::Idle => SessionState::Idle,
            Phase::Active(_) => SessionState::Active,
            Phase::Paused(_) => SessionState::Paused,
            Phase::Finalized => SessionState::Finalized,
        }
    }

    fn recording(&self) -> Option<&Recording> {
        match self {
            Phase::Active(recording) | Phase::Paused(recording) => Some(recording),
            _ => None,
        }
    }
}

struct Inner {
    phase: Phase,
    tick_task: Option<JoinHandle<()>>,
}

/// Orchestrates one recording session at a time.
///
/// Drives start/pause/resume/stop/reset, feeds accepted samples into the
/// aggregator and the route matcher, runs the periodic statistics tick,
/// and finalizes an immutable [`TrackRecord`] on stop.
///
/// All mutation funnels through one `Mutex`, so the sample callback, the
/// tick task, and display reads serialize; `snapshot()` always observes a
/// consistent point-in-time copy.
pub struct SessionController<L, S> {
    location: L,
    sink: S,
    config: TrackerConfig,
    filter: SampleFilter,
    matcher: RouteMatcher,
    inner: Arc<Mutex<Inner>>,
}

impl<L: LocationProvider, S: TrackSink> SessionController<L, S> {
    pub fn new(location: L, sink: S, config: TrackerConfig) -> Self {
        let filter = SampleFilter::new(&config);
        let matcher = RouteMatcher::new(&config);
        Self {
            location,
            sink,
            config,
            filter,
            matcher,
            inner: Arc::new(Mutex::new(Inner {
                phase: Phase::Idle,
                tick_task: None,
            })),
        }
    }

    /// Begins a new session, optionally tracking deviation from `route`.
    ///
    /// Requires location permission and an idle controller.
    pub async fn start(&self, route: Option<PlannedRoute>) -> Result<(), SessionError> {
        let status = self.location.authorization();
        if status != PermissionStatus::Granted {
            return Err(SessionError::PermissionDenied(status));
        }

        let mut inner = self.inner.lock().await;
        if inner.phase.state() != SessionState::Idle {
            return Err(SessionError::InvalidStateTransition {
                state: inner.phase.state().name(),
                operation: "start",
            });
        }

        inner.phase = Phase::Active(Recording {
            aggregator: TrackAggregator::new(Utc::now()),
            route,
            deviation: None,
            rejected_samples: 0,
        });
        inner.tick_task = Some(self.spawn_tick_task());

        self.location.start_updates();
        tracing::info!("session started");
        Ok(())
    }

    /// Pauses sample intake; elapsed wall time keeps counting.
    pub async fn pause(&self) -> Result<(), SessionError> {
        let mut inner = self.inner.lock().await;
        match std::mem::replace(&mut inner.phase, Phase::Idle) {
            Phase::Active(recording) => {
                inner.phase = Phase::Paused(recording);
                self.location.stop_updates();
                tracing::info!("session paused");
                Ok(())
            }
            other => {
                let state = other.state();
                inner.phase = other;
                Err(SessionError::InvalidStateTransition {
                    state: state.name(),
                    operation: "pause",
                })
            }
        }
    }

    pub async fn resume(&self) -> Result<(), SessionError> {
        let mut inner = self.inner.lock().await;
        match std::mem::replace(&mut inner.phase, Phase::Idle) {
            Phase::Paused(recording) => {
                inner.phase = Phase::Active(recording);
                self.location.start_updates();
                tracing::info!("session resumed");
                Ok(())
            }
            other => {
                let state = other.state();
                inner.phase = other;
                Err(SessionError::InvalidStateTransition {
                    state: state.name(),
                    operation: "resume",
                })
            }
        }
    }

    /// Ends the session, finalizes the record, and stores it through the
    /// sink.
    ///
    /// The session reaches Finalized even when the save fails, so a failed
    /// save can never leave a half-live session behind; the error is
    /// reported and retrying is the caller's decision.
    pub async fn stop(&self) -> Result<TrackRecord, SessionError> {
        let mut inner = self.inner.lock().await;

        let recording = match std::mem::replace(&mut inner.phase, Phase::Finalized) {
            Phase::Active(recording) | Phase::Paused(recording) => recording,
            other => {
                let state = other.state();
                inner.phase = other;
                return Err(SessionError::InvalidStateTransition {
                    state: state.name(),
                    operation: "stop",
                });
            }
        };

        self.location.stop_updates();
        if let Some(task) = inner.tick_task.take() {
            task.abort();
        }

        let end_time = Utc::now();
        let mut aggregator = recording.aggregator;
        aggregator.refresh(end_time);

        let stats = aggregator.snapshot();
        let (route_id, route_name) = match &recording.route {
            Some(route) => (route.route_id, route.name.clone()),
            None => (None, None),
        };

        let mut record = TrackRecord::new(
            TrackRecord::UNSAVED_ID,
            route_id,
            route_name,
            stats.start_time,
            end_time,
            stats,
            aggregator.into_points(),
        );

        tracing::info!(
            points = record.points.len(),
            rejected = recording.rejected_samples,
            "session finalized"
        );

        // Release before the save so sample callbacks never wait on storage
        drop(inner);

        match self.sink.save(&record).await {
            Ok(record_id) => {
                record.record_id = record_id;
                tracing::info!(record_id, "track record stored");
                Ok(record)
            }
            Err(err) => {
                tracing::error!("failed to store track record: {err}");
                Err(SessionError::Persistence(err.to_string()))
            }
        }
    }

    /// Discards any in-progress or finalized session and re-arms the
    /// controller.
    pub async fn reset(&self) -> Result<(), SessionError> {
        let mut inner = self.inner.lock().await;
        match inner.phase.state() {
            SessionState::Idle => {
                return Err(SessionError::InvalidStateTransition {
                    state: SessionState::Idle.name(),
                    operation: "reset",
                });
            }
            SessionState::Active | SessionState::Paused => self.location.stop_updates(),
            SessionState::Finalized => {}
        }

        if let Some(task) = inner.tick_task.take() {
            task.abort();
        }
        inner.phase = Phase::Idle;
        tracing::info!("session reset");
        Ok(())
    }

    /// Intake for the location collaborator. Ignored unless Active.
    pub async fn handle_sample(&self, sample: Sample) {
        let mut inner = self.inner.lock().await;
        let Phase::Active(recording) = &mut inner.phase else {
            return;
        };

        if !self.filter.accept(&sample, recording.aggregator.last_sample()) {
            recording.rejected_samples += 1;
            tracing::debug!(
                rejected = recording.rejected_samples,
                "sample dropped by filter"
            );
            return;
        }

        if let Some(route) = &recording.route {
            recording.deviation = self.matcher.evaluate(&sample.coordinate, route);
        }
        recording.aggregator.accept(sample);
    }

    /// Timer-driven refresh: updates elapsed-derived statistics and
    /// re-evaluates deviation against the last known position. Also runs
    /// on the internal tick task.
    pub async fn tick(&self) {
        let mut inner = self.inner.lock().await;
        if let Phase::Active(recording) = &mut inner.phase {
            tick_once(recording, &self.matcher);
        }
    }

    pub async fn state(&self) -> SessionState {
        self.inner.lock().await.phase.state()
    }

    /// Point-in-time statistics copy; `None` outside a session.
    pub async fn snapshot(&self) -> Option<TrackStats> {
        self.inner
            .lock()
            .await
            .phase
            .recording()
            .map(|recording| recording.aggregator.snapshot())
    }

    pub async fn deviation(&self) -> Option<DeviationState> {
        self.inner
            .lock()
            .await
            .phase
            .recording()
            .and_then(|recording| recording.deviation)
    }

    /// Samples dropped by the filter during the current session.
    pub async fn rejected_samples(&self) -> u64 {
        self.inner
            .lock()
            .await
            .phase
            .recording()
            .map_or(0, |recording| recording.rejected_samples)
    }

    fn spawn_tick_task(&self) -> JoinHandle<()> {
        let inner = Arc::clone(&self.inner);
        let matcher = self.matcher.clone();
        let period = self.config.tick_interval;

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                let mut inner = inner.lock().await;
                match &mut inner.phase {
                    Phase::Active(recording) => tick_once(recording, &matcher),
                    Phase::Paused(_) => {}
                    Phase::Idle | Phase::Finalized => break,
                }
            }
        })
    }
}

fn tick_once(recording: &mut Recording, matcher: &RouteMatcher) {
    recording.aggregator.refresh(Utc::now());

    let position = recording.aggregator.last_position().copied();
    if let (Some(position), Some(route)) = (position, recording.route.as_ref()) {
        recording.deviation = matcher.evaluate(&position, route);
    }
}
