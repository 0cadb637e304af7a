/// An event emitted by a long-running workflow.
#[derive(Debug, Clone)]
pub enum Progress {
    PhaseStart { name: &'static str },
    PhaseFinish,

    TaskStart { total_steps: u64 },
    TaskIncrement,
    TaskFinish,

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

/// Forwards progress events to an optional callback.
#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }

    /// Reports a task of `total_steps` steps, running `step` once per step.
    ///
    /// Stops at the first failing step; the task is finished either way.
    pub fn task<T, E>(
        &self,
        total_steps: u64,
        mut step: impl FnMut(u64) -> Result<T, E>,
    ) -> Result<Vec<T>, E> {
        self.report(Progress::TaskStart { total_steps });
        let result = (0..total_steps)
            .map(|i| -> Result<T, E> {
                let value = step(i)?;
                self.report(Progress::TaskIncrement);
                Ok(value)
            })
            .collect();
        self.report(Progress::TaskFinish);
        result
    }
}
