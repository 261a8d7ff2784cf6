// Copyright 2024 Foundry QC developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Periodic submission reminders.
//!
//! Once a component is selected the [`ReminderEngine`] is armed: after one interval it fetches
//! the latest stored record of the component and emits a [`ReminderEvent`] offering that record
//! as prefill. It re-arms right away, the next deadline being the previous deadline plus one
//! interval, whatever the operator answers. Deadlines missed while the runtime was stalled are
//! skipped, not delivered in a burst. Selecting a component again cancels the outstanding timer
//! and starts over.

use crate::store::{PrefillSource, RecordStore};
use foundry_qc::domain::{Component, QcRecord};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderPhase {
    Idle,
    Armed,
    /// The deadline passed and the prefill is being fetched.
    Fired,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReminderState {
    pub phase: ReminderPhase,
    pub active_component: Option<Component>,
    pub next_fire_time: Option<Instant>,
}

impl ReminderState {
    fn idle() -> Self {
        ReminderState {
            phase: ReminderPhase::Idle,
            active_component: None,
            next_fire_time: None,
        }
    }
}

/// Emitted every time a reminder fires.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderEvent {
    pub component: Component,
    /// Latest stored record of the component, if there is one and it could be fetched.
    pub prefill: Option<QcRecord>,
    generation: u64,
    source_epoch: u64,
}

struct Shared {
    state: ReminderState,
    source: Option<PrefillSource>,
    /// Bumped on every arm and disarm. A task only writes while its generation is current.
    generation: u64,
    /// Bumped on every source change. Queued events fetched from an older source are dropped.
    source_epoch: u64,
}

impl Shared {
    fn is_current(&self, event: &ReminderEvent) -> bool {
        event.generation == self.generation && event.source_epoch == self.source_epoch
    }
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Owns the timer task. Dropping it cancels the task.
struct ReminderHandle {
    shutdown_tx: Option<oneshot::Sender<()>>,
    task_handle: JoinHandle<()>,
}

impl Drop for ReminderHandle {
    fn drop(&mut self) {
        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            let _ = shutdown_tx.send(());
        }
        self.task_handle.abort();
    }
}

pub struct ReminderEngine<S> {
    store: Arc<S>,
    interval: Duration,
    shared: Arc<Mutex<Shared>>,
    events_tx: mpsc::UnboundedSender<ReminderEvent>,
    events_rx: mpsc::UnboundedReceiver<ReminderEvent>,
    handle: Option<ReminderHandle>,
}

impl<S: RecordStore + 'static> ReminderEngine<S> {
    pub fn new(store: Arc<S>, interval: Duration) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        ReminderEngine {
            store,
            interval,
            shared: Arc::new(Mutex::new(Shared {
                state: ReminderState::idle(),
                source: Some(PrefillSource::QcReadings),
                generation: 0,
                source_epoch: 0,
            })),
            events_tx,
            events_rx,
            handle: None,
        }
    }

    /// Starts a fresh cycle for `component`, the first reminder one interval from now. An
    /// outstanding timer is cancelled, its remaining time is lost.
    #[tracing::instrument(name = "Arming submission reminder", skip(self, component), fields(code = %component.code))]
    pub fn arm(&mut self, component: Component) {
        self.handle = None;
        let deadline = Instant::now() + self.interval;

        let generation = {
            let mut shared = lock(&self.shared);
            shared.generation += 1;
            shared.state = ReminderState {
                phase: ReminderPhase::Armed,
                active_component: Some(component.clone()),
                next_fire_time: Some(deadline),
            };
            shared.generation
        };

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task_handle = tokio::spawn(run_reminders(
            self.store.clone(),
            self.shared.clone(),
            self.events_tx.clone(),
            ReminderCycle {
                component,
                generation,
                deadline,
                interval: self.interval,
            },
            shutdown_rx,
        ));
        self.handle = Some(ReminderHandle {
            shutdown_tx: Some(shutdown_tx),
            task_handle,
        });
    }

    /// Cancels the outstanding timer, if any, and returns to idle.
    pub fn disarm(&mut self) {
        self.handle = None;
        let mut shared = lock(&self.shared);
        shared.generation += 1;
        shared.state = ReminderState::idle();
    }

    pub fn state(&self) -> ReminderState {
        lock(&self.shared).state.clone()
    }

    /// Sets where the next reminders take their prefill from. `None` fires without prefill.
    /// Reminders already queued with a prefill from the old source are dropped, the timer keeps
    /// its deadline.
    pub fn set_source(&self, source: Option<PrefillSource>) {
        let mut shared = lock(&self.shared);
        shared.source = source;
        shared.source_epoch += 1;
    }

    /// Waits for the next reminder of the current cycle. Reminders of cancelled cycles or of a
    /// replaced source that were already queued are skipped.
    pub async fn next_event(&mut self) -> Option<ReminderEvent> {
        loop {
            let event = self.events_rx.recv().await?;
            if lock(&self.shared).is_current(&event) {
                return Some(event);
            }
        }
    }

    /// Like [`ReminderEngine::next_event`], without waiting.
    pub fn try_next_event(&mut self) -> Option<ReminderEvent> {
        while let Ok(event) = self.events_rx.try_recv() {
            if lock(&self.shared).is_current(&event) {
                return Some(event);
            }
        }
        None
    }
}

struct ReminderCycle {
    component: Component,
    generation: u64,
    deadline: Instant,
    interval: Duration,
}

async fn run_reminders<S: RecordStore>(
    store: Arc<S>,
    shared: Arc<Mutex<Shared>>,
    events_tx: mpsc::UnboundedSender<ReminderEvent>,
    mut cycle: ReminderCycle,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    loop {
        tokio::select! {
            _ = tokio::time::sleep_until(cycle.deadline) => {},
            _ = &mut shutdown_rx => break,
        }

        let (source, source_epoch) = {
            let mut shared = lock(&shared);
            if shared.generation != cycle.generation {
                break;
            }
            shared.state.phase = ReminderPhase::Fired;
            (shared.source, shared.source_epoch)
        };

        let prefill = match source {
            Some(source) => fetch_prefill(store.as_ref(), &source, &cycle.component).await,
            None => None,
        };

        cycle.deadline = next_deadline(cycle.deadline, cycle.interval, Instant::now());
        {
            let mut shared = lock(&shared);
            if shared.generation != cycle.generation {
                break;
            }
            shared.state.phase = ReminderPhase::Armed;
            shared.state.next_fire_time = Some(cycle.deadline);
        }

        tracing::info!(code = %cycle.component.code, has_prefill = prefill.is_some(), "Submission reminder");
        let event = ReminderEvent {
            component: cycle.component.clone(),
            prefill,
            generation: cycle.generation,
            source_epoch,
        };
        if events_tx.send(event).is_err() {
            break;
        }
    }
}

/// The first deadline after `previous` on the same cadence that still lies ahead of `now`.
fn next_deadline(previous: Instant, interval: Duration, now: Instant) -> Instant {
    let mut next = previous + interval;
    if interval.is_zero() {
        return next;
    }
    while next <= now {
        next += interval;
    }
    if next > previous + interval {
        tracing::debug!(late_by = ?(now - previous), "Skipping missed reminder deadlines");
    }
    next
}

#[tracing::instrument(name = "Fetching prefill for reminder", skip(store, component), fields(code = %component.code))]
async fn fetch_prefill<S: RecordStore>(
    store: &S,
    source: &PrefillSource,
    component: &Component,
) -> Option<QcRecord> {
    match store.latest(source, &component.code).await {
        Ok(record) => record,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch the latest record, reminding without prefill");
            None
        }
    }
}
