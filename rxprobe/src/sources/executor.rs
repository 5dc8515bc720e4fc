use std::thread;

use tokio::runtime::Handle;

/// Where a fixture publisher runs its emission loop.
///
/// Passed explicitly to each publisher so a test decides whether signals
/// arrive synchronously or from another thread, without touching any
/// process-wide scheduler state.
///
/// | Executor | Emission happens |
/// |----------|------------------|
/// | [`Immediate`](Self::Immediate) | inside `subscribe`, on the calling thread |
/// | [`Thread`](Self::Thread) | on a freshly spawned OS thread |
/// | [`Runtime`](Self::Runtime) | on the runtime's blocking pool |
#[derive(Debug, Clone, Default)]
pub enum Executor {
    #[default]
    Immediate,
    Thread,
    Runtime(Handle),
}

impl Executor {
    /// The runtime the caller is running on, if any.
    pub fn current() -> Option<Self> {
        Handle::try_current().ok().map(Executor::Runtime)
    }

    pub(crate) fn execute<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        match self {
            Executor::Immediate => job(),
            Executor::Thread => {
                thread::spawn(job);
            }
            Executor::Runtime(handle) => {
                handle.spawn_blocking(job);
            }
        }
    }

    /// Returns true if jobs run before `execute` returns.
    pub fn is_synchronous(&self) -> bool {
        matches!(self, Executor::Immediate)
    }
}
