//! Scripted Completion Service double for unit tests.

use crate::domain::{CompletionConfig, CompletionError};
use crate::ports::CompletionPort;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

pub(crate) enum Step {
    Reply(String),
    Fail(CompletionError),
    /// Never resolves; records when the pending call is dropped.
    Hang,
}

#[derive(Default)]
pub(crate) struct ScriptedCompletion {
    steps: Mutex<VecDeque<Step>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
    dropped: Arc<AtomicBool>,
}

impl ScriptedCompletion {
    pub(crate) fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into_iter().collect()),
            ..Self::default()
        }
    }

    pub(crate) fn replying(text: &str) -> Self {
        Self::new([Step::Reply(text.to_string())])
    }

    pub(crate) fn failing(err: CompletionError) -> Self {
        Self::new([Step::Fail(err)])
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }

    /// True once a `Hang` call has been abandoned by its caller.
    pub(crate) fn in_flight_dropped(&self) -> bool {
        self.dropped.load(Ordering::SeqCst)
    }
}

struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl CompletionPort for ScriptedCompletion {
    async fn complete(
        &self,
        prompt: &str,
        _config: &CompletionConfig,
    ) -> Result<String, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        let step = self.steps.lock().unwrap().pop_front();
        match step {
            Some(Step::Reply(text)) => Ok(text),
            Some(Step::Fail(err)) => Err(err),
            Some(Step::Hang) => {
                let _flag = DropFlag(Arc::clone(&self.dropped));
                std::future::pending::<()>().await;
                unreachable!()
            }
            None => Err(CompletionError::ServiceUnavailable(
                "script exhausted".to_string(),
            )),
        }
    }
}
