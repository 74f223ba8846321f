//! Frontier queues
//!
//! One bounded FIFO per record kind holding identifiers that were discovered
//! but not yet resolved. A popped key is handed out as a `FrontierEntry`
//! claim that stays in flight until dropped. A worker drops its claim only
//! after queueing the neighbors it found.
//!
//! Queued and in-flight counts live in one `Tally` behind a mutex: a key is
//! counted as queued from just before it is sent until it is claimed, and
//! as in flight from the claim until the entry drops. A snapshot of the
//! tally is therefore never lower than the real remaining work.

use crate::db::RecordStore;
use crate::error::{CollectError, FrontierError};
use crate::models::RecordKind;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, MutexGuard};
use std::time::Duration;
use tokio::sync::{mpsc, Mutex, Notify};
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Debug, Default)]
struct Tally {
    queued: [usize; 2],
    in_flight: usize,
}

type SharedTally = Arc<std::sync::Mutex<Tally>>;

fn lock(tally: &SharedTally) -> MutexGuard<'_, Tally> {
    // Counters stay meaningful even if a holder panicked
    tally.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn slot(kind: RecordKind) -> usize {
    match kind {
        RecordKind::Summoner => 0,
        RecordKind::Match => 1,
    }
}

/// A popped key, counted as in flight until dropped
#[derive(Debug)]
pub struct FrontierEntry {
    key: String,
    tally: SharedTally,
}

impl FrontierEntry {
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for FrontierEntry {
    fn drop(&mut self) {
        lock(&self.tally).in_flight -= 1;
    }
}

/// Bounded FIFO of keys of one kind
pub struct FrontierQueue {
    kind: RecordKind,
    sender: mpsc::Sender<String>,
    receiver: Mutex<mpsc::Receiver<String>>,
    tally: SharedTally,
    attended: AtomicBool,
    released: Notify,
    cancel: CancellationToken,
}

impl FrontierQueue {
    fn new(
        kind: RecordKind,
        capacity: usize,
        tally: SharedTally,
        cancel: CancellationToken,
    ) -> Self {
        let (sender, receiver) = mpsc::channel(capacity);
        Self {
            kind,
            sender,
            receiver: Mutex::new(receiver),
            tally,
            attended: AtomicBool::new(true),
            released: Notify::new(),
            cancel,
        }
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    /// Append `key`, waiting while the queue is full
    ///
    /// Fails once the run is cancelled, or when the queue is full and its
    /// pool has finished, since nothing would ever make room.
    pub async fn push(&self, key: String) -> Result<(), FrontierError> {
        if self.cancel.is_cancelled() {
            return Err(FrontierError::Closed);
        }

        lock(&self.tally).queued[slot(self.kind)] += 1;

        let sent = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(FrontierError::Closed),
            result = self.sender.send(key) => result.map_err(|_| FrontierError::Closed),
            _ = self.unattended() => Err(FrontierError::Full {
                kind: self.kind,
                capacity: self.capacity(),
            }),
        };

        if sent.is_err() {
            lock(&self.tally).queued[slot(self.kind)] -= 1;
        }
        sent
    }

    /// Append `key` only if there is room right now
    pub fn try_push(&self, key: String) -> Result<(), FrontierError> {
        if self.cancel.is_cancelled() {
            return Err(FrontierError::Closed);
        }

        lock(&self.tally).queued[slot(self.kind)] += 1;

        let sent = self.sender.try_send(key).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => FrontierError::Full {
                kind: self.kind,
                capacity: self.capacity(),
            },
            mpsc::error::TrySendError::Closed(_) => FrontierError::Closed,
        });

        if sent.is_err() {
            lock(&self.tally).queued[slot(self.kind)] -= 1;
        }
        sent
    }

    /// Resolves once no pool consumes this queue
    async fn unattended(&self) {
        loop {
            let released = self.released.notified();
            if !self.is_attended() {
                return;
            }
            released.await;
        }
    }

    /// Wait for the next key; `None` once the run is cancelled
    pub async fn pop(&self) -> Option<FrontierEntry> {
        let mut receiver = tokio::select! {
            _ = self.cancel.cancelled() => return None,
            receiver = self.receiver.lock() => receiver,
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            key = receiver.recv() => key.map(|key| self.claim(key)),
        }
    }

    /// Next key if one is queued right now
    pub fn try_pop(&self) -> Option<FrontierEntry> {
        let mut receiver = self.receiver.try_lock().ok()?;
        receiver.try_recv().ok().map(|key| self.claim(key))
    }

    /// Wait up to `timeout` for a key
    async fn pop_within(&self, timeout: Duration) -> Option<FrontierEntry> {
        let mut receiver = tokio::select! {
            _ = self.cancel.cancelled() => return None,
            _ = tokio::time::sleep(timeout) => return None,
            receiver = self.receiver.lock() => receiver,
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            key = receiver.recv() => key.map(|key| self.claim(key)),
            _ = tokio::time::sleep(timeout) => None,
        }
    }

    fn claim(&self, key: String) -> FrontierEntry {
        {
            let mut tally = lock(&self.tally);
            tally.queued[slot(self.kind)] -= 1;
            tally.in_flight += 1;
        }
        FrontierEntry {
            key,
            tally: Arc::clone(&self.tally),
        }
    }

    /// Queued keys, including pushes still waiting for room
    pub fn len(&self) -> usize {
        lock(&self.tally).queued[slot(self.kind)]
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.sender.max_capacity()
    }

    /// Record that no pool consumes this queue any more
    pub fn mark_unattended(&self) {
        self.attended.store(false, Ordering::SeqCst);
        self.released.notify_waiters();
    }

    pub fn is_attended(&self) -> bool {
        self.attended.load(Ordering::SeqCst)
    }
}

/// The two frontier queues of a run
pub struct Frontier {
    summoners: FrontierQueue,
    matches: FrontierQueue,
    tally: SharedTally,
    cancel: CancellationToken,
}

impl Frontier {
    pub fn new(capacity: usize, cancel: CancellationToken) -> Self {
        let tally = SharedTally::default();
        Self {
            summoners: FrontierQueue::new(
                RecordKind::Summoner,
                capacity,
                Arc::clone(&tally),
                cancel.clone(),
            ),
            matches: FrontierQueue::new(
                RecordKind::Match,
                capacity,
                Arc::clone(&tally),
                cancel.clone(),
            ),
            tally,
            cancel,
        }
    }

    pub fn queue(&self, kind: RecordKind) -> &FrontierQueue {
        match kind {
            RecordKind::Summoner => &self.summoners,
            RecordKind::Match => &self.matches,
        }
    }

    /// Claims currently held across both queues
    pub fn in_flight(&self) -> usize {
        lock(&self.tally).in_flight
    }

    /// Both queues empty
    pub fn is_empty(&self) -> bool {
        lock(&self.tally).queued.iter().all(|&queued| queued == 0)
    }

    /// True when the `kind` queue can receive no more work
    ///
    /// That is the case when it is empty, no claim is held anywhere, and the
    /// other queue is either empty or no longer consumed by a pool.
    pub fn is_exhausted(&self, kind: RecordKind) -> bool {
        let other = kind.neighbor();
        let other_attended = self.queue(other).is_attended();
        let tally = lock(&self.tally);

        tally.queued[slot(kind)] == 0
            && tally.in_flight == 0
            && (tally.queued[slot(other)] == 0 || !other_attended)
    }

    /// Wait for the next `kind` key until the frontier is exhausted for it
    ///
    /// Returns `None` when the run is cancelled or `is_exhausted(kind)` holds.
    /// Exhaustion is rechecked every `idle_poll`.
    pub async fn pop_or_exhausted(
        &self,
        kind: RecordKind,
        idle_poll: Duration,
    ) -> Option<FrontierEntry> {
        let queue = self.queue(kind);
        loop {
            if self.cancel.is_cancelled() || self.is_exhausted(kind) {
                return None;
            }
            if let Some(entry) = queue.pop_within(idle_poll).await {
                return Some(entry);
            }
        }
    }

    /// Push `key` onto the `kind` queue unless it is already stored
    ///
    /// Returns whether the key was queued. A push abandoned because the run
    /// was cancelled counts as not queued; a full queue nobody consumes is
    /// an error.
    pub async fn enqueue_if_unseen(
        &self,
        store: &RecordStore,
        kind: RecordKind,
        key: String,
    ) -> Result<bool, CollectError> {
        if store.exists(kind, &key).await? {
            debug!(kind = %kind, key = %key, "Already scanned, not queueing");
            return Ok(false);
        }

        match self.queue(kind).push(key).await {
            Ok(()) => Ok(true),
            Err(FrontierError::Closed) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
