//! ⚠️  MOCK host runtime for tests
//!
//! # WARNING: This is NOT a real process manager!
//!
//! An in-memory stand-in for the host's child-process and filesystem
//! capabilities. Programs are scripted with [`Program`]; nothing is executed.
//!
//! ## What it models
//!
//! - Synchronous `spawn` returning a `{pid, error?}` object
//! - Asynchronous `wait` completed through registered callbacks, either on a
//!   delivery thread ([`Delivery::Deferred`], the default) or before `invoke`
//!   returns ([`Delivery::Inline`])
//! - Callback registration accounting, so tests can prove nothing leaks
//! - `getwd` / `environ` / `fs_call("flock", ..)`
//!
//! Reaping is one-shot: a second `wait` on the same pid completes with
//! `ECHILD`, as would a wait on a pid the host never issued.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Instant;

use crossbeam::channel::{unbounded, Sender};
use host_platform::{
    AsyncHost, CallbackId, ChildProcessHost, Completion, FsHost, HostError, HostValue,
};
use serde_json::json;

mod delivery;
mod program;

use delivery::{Action, Job};
pub use program::{CompletionMode, Program};

/// First pid handed out by a fresh mock host
pub const FIRST_PID: i64 = 42;

/// When asynchronous completions run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// On the mock's delivery thread, after `invoke` has returned
    Deferred,
    /// On the invoking thread, before `invoke` returns
    Inline,
}

/// A recorded `spawn` request
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnRecord {
    pub name: String,
    pub args: Vec<HostValue>,
    pub options: HostValue,
    pub pid: i64,
}

/// A recorded asynchronous invocation
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub operation: String,
    pub args: Vec<HostValue>,
    pub callback: CallbackId,
}

#[derive(Debug)]
struct MockProcess {
    program: Program,
    reaped: bool,
}

struct State {
    next_pid: i64,
    programs: HashMap<String, Program>,
    processes: BTreeMap<i64, MockProcess>,
    spawns: Vec<SpawnRecord>,
    invocations: Vec<Invocation>,
    fs_calls: Vec<(String, Vec<HostValue>)>,
    cwd: Result<String, HostError>,
    getwd_calls: usize,
    environ: Vec<String>,
    delivery: Delivery,
}

pub(crate) struct Shared {
    state: Mutex<State>,
    callbacks: Mutex<HashMap<CallbackId, Arc<Completion>>>,
    next_callback: AtomicU64,
    registered_total: AtomicU64,
}

impl Shared {
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn callbacks(&self) -> MutexGuard<'_, HashMap<CallbackId, Arc<Completion>>> {
        self.callbacks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply a delivery action to a registration
    ///
    /// Callbacks run without any lock held so they may re-enter the host.
    pub(crate) fn run(&self, id: CallbackId, action: Action) {
        match action {
            Action::Fire { args, times } => {
                let completion = self.callbacks().get(&id).cloned();
                let Some(completion) = completion else {
                    log::trace!("callback {} released before delivery", id.raw());
                    return;
                };
                for _ in 0..times {
                    (*completion)(args.clone());
                }
            }
            Action::Drop => {
                let dropped = self.callbacks().remove(&id);
                log::trace!("host dropped callback {} (known: {})", id.raw(), dropped.is_some());
            }
        }
    }
}

/// In-memory host runtime
pub struct MockHost {
    shared: Arc<Shared>,
    scheduler: Option<Sender<Job>>,
    seq: AtomicU64,
}

impl MockHost {
    /// Create a mock host with deferred delivery, cwd `/` and an empty
    /// environment
    pub fn new() -> Self {
        let shared = Arc::new(Shared {
            state: Mutex::new(State {
                next_pid: FIRST_PID,
                programs: HashMap::new(),
                processes: BTreeMap::new(),
                spawns: Vec::new(),
                invocations: Vec::new(),
                fs_calls: Vec::new(),
                cwd: Ok("/".to_string()),
                getwd_calls: 0,
                environ: Vec::new(),
                delivery: Delivery::Deferred,
            }),
            callbacks: Mutex::new(HashMap::new()),
            next_callback: AtomicU64::new(1),
            registered_total: AtomicU64::new(0),
        });

        let (tx, rx) = unbounded();
        let worker_shared = Arc::clone(&shared);
        let scheduler = match thread::Builder::new()
            .name("hostproc-mock-delivery".to_string())
            .spawn(move || delivery::delivery_loop(worker_shared, rx))
        {
            Ok(_) => Some(tx),
            Err(err) => {
                log::warn!("mock delivery thread unavailable ({err}), delivering inline");
                shared.state().delivery = Delivery::Inline;
                None
            }
        };

        Self {
            shared,
            scheduler,
            seq: AtomicU64::new(0),
        }
    }

    /// Script the behaviour of a program name
    pub fn install(&self, name: &str, program: Program) {
        self.shared.state().programs.insert(name.to_string(), program);
    }

    pub fn set_delivery(&self, delivery: Delivery) {
        if delivery == Delivery::Deferred && self.scheduler.is_none() {
            log::warn!("deferred delivery requested without a delivery thread");
            return;
        }
        self.shared.state().delivery = delivery;
    }

    pub fn set_cwd(&self, cwd: &str) {
        self.shared.state().cwd = Ok(cwd.to_string());
    }

    /// Make every subsequent `getwd` fail
    pub fn fail_getwd(&self, error: HostError) {
        self.shared.state().cwd = Err(error);
    }

    pub fn set_environ<I, S>(&self, environ: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.shared.state().environ = environ.into_iter().map(Into::into).collect();
    }

    pub fn spawns(&self) -> Vec<SpawnRecord> {
        self.shared.state().spawns.clone()
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.shared.state().invocations.clone()
    }

    pub fn fs_calls(&self) -> Vec<(String, Vec<HostValue>)> {
        self.shared.state().fs_calls.clone()
    }

    pub fn getwd_calls(&self) -> usize {
        self.shared.state().getwd_calls
    }

    /// Number of host calls of any kind made so far
    pub fn host_calls(&self) -> usize {
        let state = self.shared.state();
        state.spawns.len() + state.invocations.len() + state.fs_calls.len()
    }

    /// Callbacks currently registered
    pub fn live_callbacks(&self) -> usize {
        self.shared.callbacks().len()
    }

    /// Callbacks ever registered
    pub fn registered_callbacks(&self) -> u64 {
        self.shared.registered_total.load(Ordering::SeqCst)
    }

    fn schedule(&self, program: &Program, callback: CallbackId, args: Vec<HostValue>) {
        let action = match program.completion {
            CompletionMode::Once => Action::Fire { args, times: 1 },
            CompletionMode::Twice => Action::Fire { args, times: 2 },
            CompletionMode::Drop => Action::Drop,
            CompletionMode::Never => return,
        };

        let delivery = self.shared.state().delivery;
        match (&self.scheduler, delivery) {
            (Some(tx), Delivery::Deferred) => {
                let job = Job {
                    due: Instant::now() + program.delay,
                    seq: self.seq.fetch_add(1, Ordering::SeqCst),
                    callback,
                    action,
                };
                if let Err(err) = tx.send(job) {
                    log::warn!("mock delivery thread gone, running inline");
                    let job = err.into_inner();
                    self.shared.run(job.callback, job.action);
                }
            }
            _ => self.shared.run(callback, action),
        }
    }

    fn wait(&self, args: &[HostValue], callback: CallbackId) {
        let Some(pid) = args.first().and_then(HostValue::as_i64) else {
            let error = HostError::new("pid must be a number").with_code("EINVAL");
            self.schedule(&Program::exits(0), callback, vec![error.to_value()]);
            return;
        };

        let program = {
            let mut state = self.shared.state();
            match state.processes.get_mut(&pid) {
                Some(process) if !process.reaped => {
                    process.reaped = true;
                    Some(process.program.clone())
                }
                _ => None,
            }
        };

        let Some(program) = program else {
            let error = HostError::new(format!("no child process {pid}"))
                .with_code("ECHILD")
                .with_errno(-10);
            self.schedule(&Program::exits(0), callback, vec![error.to_value()]);
            return;
        };

        let reported = program.reported_pid.unwrap_or(pid);
        let args = match &program.wait_error {
            Some(error) if program.reported_pid.is_some() => {
                vec![error.to_value(), json!({ "pid": reported })]
            }
            Some(error) => vec![error.to_value()],
            None => {
                let mut result = json!({ "pid": reported });
                if let Some(code) = program.exit_code {
                    result["exitCode"] = json!(code);
                }
                vec![HostValue::Null, result]
            }
        };
        self.schedule(&program, callback, args);
    }
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new()
    }
}

impl AsyncHost for MockHost {
    fn register_callback(&self, completion: Completion) -> CallbackId {
        let id = CallbackId::new(self.shared.next_callback.fetch_add(1, Ordering::SeqCst));
        self.shared.callbacks().insert(id, Arc::new(completion));
        self.shared.registered_total.fetch_add(1, Ordering::SeqCst);
        id
    }

    fn release_callback(&self, id: CallbackId) {
        self.shared.callbacks().remove(&id);
    }

    fn invoke(
        &self,
        operation: &str,
        args: Vec<HostValue>,
        callback: CallbackId,
    ) -> host_platform::Result<()> {
        self.shared.state().invocations.push(Invocation {
            operation: operation.to_string(),
            args: args.clone(),
            callback,
        });

        match operation {
            "wait" => {
                self.wait(&args, callback);
                Ok(())
            }
            other => Err(HostError::new(format!("unsupported operation: {other}")).with_code("ENOSYS")),
        }
    }
}

impl ChildProcessHost for MockHost {
    fn spawn(&self, name: &str, args: Vec<HostValue>, options: HostValue) -> HostValue {
        let mut state = self.shared.state();

        let program = state.programs.get(name).cloned();
        let (pid, reply) = match program {
            Some(program) => match &program.spawn_error {
                Some(error) => (0, json!({ "pid": 0, "error": error.to_value() })),
                None => {
                    let pid = state.next_pid;
                    state.next_pid += 1;
                    state.processes.insert(pid, MockProcess { program, reaped: false });
                    (pid, json!({ "pid": pid }))
                }
            },
            None => {
                let error = HostError::new(format!("spawn {name} ENOENT")).with_code("ENOENT");
                (0, json!({ "pid": 0, "error": error.to_value() }))
            }
        };

        state.spawns.push(SpawnRecord {
            name: name.to_string(),
            args,
            options,
            pid,
        });
        reply
    }
}

impl FsHost for MockHost {
    fn getwd(&self) -> host_platform::Result<String> {
        let mut state = self.shared.state();
        state.getwd_calls += 1;
        state.cwd.clone()
    }

    fn environ(&self) -> Vec<String> {
        self.shared.state().environ.clone()
    }

    fn fs_call(&self, operation: &str, args: Vec<HostValue>) -> host_platform::Result<HostValue> {
        self.shared
            .state()
            .fs_calls
            .push((operation.to_string(), args.clone()));

        match operation {
            "flock" => match args.first().and_then(HostValue::as_i64) {
                Some(fd) if fd >= 0 => Ok(HostValue::Null),
                _ => Err(HostError::new("bad file descriptor").with_code("EBADF")),
            },
            other => Err(HostError::new(format!("unsupported fs operation: {other}")).with_code("ENOSYS")),
        }
    }
}
