#![allow(dead_code)]

use access_flow::domain::{
    AccessBackend, CommitOutcome, FlowListener, GroupStatus, InlongGroup, MiddlewareType,
    Notice, RouteTable, StepCommit,
};
use access_flow::adapters::memory_history::MemoryHistory;
use access_flow::error::{BackendError, CommitError};
use access_flow::flow::{FlowController, FlowPorts};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Commit that answers from a script, then succeeds with no outcome.
#[derive(Default)]
pub struct ScriptedCommit {
    script: Mutex<VecDeque<Result<CommitOutcome, CommitError>>>,
    calls: AtomicUsize,
}

impl ScriptedCommit {
    pub fn new(results: Vec<Result<CommitOutcome, CommitError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(results.into()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn ok() -> Arc<Self> {
        Self::new(vec![])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait(?Send)]
impl StepCommit for ScriptedCommit {
    async fn commit(&self) -> Result<CommitOutcome, CommitError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(CommitOutcome::default()))
    }
}

/// Commit that waits for the test to open the gate.
pub struct GatedCommit {
    pub gate: Arc<Notify>,
    outcome: CommitOutcome,
}

impl GatedCommit {
    pub fn new(outcome: CommitOutcome) -> Arc<Self> {
        Arc::new(Self {
            gate: Arc::new(Notify::new()),
            outcome,
        })
    }
}

#[async_trait(?Send)]
impl StepCommit for GatedCommit {
    async fn commit(&self) -> Result<CommitOutcome, CommitError> {
        self.gate.notified().await;
        Ok(self.outcome.clone())
    }
}

/// Commit that never resolves.
pub struct StalledCommit;

#[async_trait(?Send)]
impl StepCommit for StalledCommit {
    async fn commit(&self) -> Result<CommitOutcome, CommitError> {
        std::future::pending::<()>().await;
        Ok(CommitOutcome::default())
    }
}

#[derive(Default)]
pub struct FakeBackend {
    fetch_script: Mutex<VecDeque<Result<InlongGroup, BackendError>>>,
    start_script: Mutex<VecDeque<Result<(), BackendError>>>,
    pub fetch_calls: AtomicUsize,
    pub start_calls: AtomicUsize,
    /// When set, every call waits for the test to open it
    pub gate: Option<Arc<Notify>>,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_group(status: i32, middleware_type: Option<MiddlewareType>) -> Arc<Self> {
        let backend = Self::default();
        backend.push_fetch(Ok(group("g1", status, middleware_type)));
        Arc::new(backend)
    }

    /// Backend whose calls hold until `gate` is notified.
    pub fn gated() -> Arc<Self> {
        Arc::new(Self {
            gate: Some(Arc::new(Notify::new())),
            ..Self::default()
        })
    }

    pub fn open_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    async fn wait_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
    }

    pub fn push_fetch(&self, result: Result<InlongGroup, BackendError>) {
        self.fetch_script.lock().unwrap().push_back(result);
    }

    pub fn push_start(&self, result: Result<(), BackendError>) {
        self.start_script.lock().unwrap().push_back(result);
    }

    pub fn fetches(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn starts(&self) -> usize {
        self.start_calls.load(Ordering::SeqCst)
    }
}

#[async_trait(?Send)]
impl AccessBackend for FakeBackend {
    async fn fetch_group(&self, group_id: &str) -> Result<InlongGroup, BackendError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_gate().await;
        self.fetch_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(group(group_id, 130, Some(MiddlewareType::Pulsar))))
    }

    async fn start_process(&self, _group_id: &str) -> Result<(), BackendError> {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_gate().await;
        self.start_script.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }
}

pub fn group(id: &str, status: i32, middleware_type: Option<MiddlewareType>) -> InlongGroup {
    InlongGroup {
        inlong_group_id: id.to_string(),
        name: None,
        status: GroupStatus(status),
        middleware_type,
    }
}

#[derive(Default)]
pub struct RecordingListener {
    notices: Mutex<Vec<Notice>>,
    changes: AtomicUsize,
}

impl RecordingListener {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn changes(&self) -> usize {
        self.changes.load(Ordering::SeqCst)
    }
}

impl FlowListener for RecordingListener {
    fn notice(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }

    fn changed(&self) {
        self.changes.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct Harness {
    pub flow: FlowController,
    pub history: Arc<MemoryHistory>,
    pub backend: Arc<FakeBackend>,
    pub listener: Arc<RecordingListener>,
}

impl Harness {
    pub fn at(href: &str) -> Self {
        Self::with_backend(href, FakeBackend::new())
    }

    pub fn with_backend(href: &str, backend: Arc<FakeBackend>) -> Self {
        let history = Arc::new(MemoryHistory::new(href));
        let listener = Arc::new(RecordingListener::default());
        let ports = FlowPorts {
            navigator: history.clone(),
            backend: backend.clone(),
            listener: listener.clone(),
        };
        Self {
            flow: FlowController::new(RouteTable::default(), ports),
            history,
            backend,
            listener,
        }
    }
}
