//! Scripted backend for tests: replays a fixed sequence of upstream
//! responses and records every call it receives.

use crate::client::GenerationBackend;
use crate::error::UpstreamError;
use std::collections::VecDeque;
use std::sync::Mutex;

/// One recorded backend call
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub model: String,
    pub api_key: String,
    pub prompt: String,
}

/// A [`GenerationBackend`] that replays a script
pub struct ScriptedBackend {
    script: Mutex<VecDeque<Result<String, UpstreamError>>>,
    /// Error replayed once the script runs out
    fallback: Option<UpstreamError>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedBackend {
    /// Replay `script` in order; panics if called after it runs out
    pub fn new(script: Vec<Result<String, UpstreamError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Fail every call with a clone of `err`
    pub fn always(err: UpstreamError) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Some(err),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Calls received so far, in order
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl GenerationBackend for ScriptedBackend {
    async fn generate(
        &self,
        model: &str,
        api_key: &str,
        prompt: &str,
    ) -> Result<String, UpstreamError> {
        self.calls.lock().unwrap().push(RecordedCall {
            model: model.to_string(),
            api_key: api_key.to_string(),
            prompt: prompt.to_string(),
        });

        if let Some(next) = self.script.lock().unwrap().pop_front() {
            return next;
        }
        match &self.fallback {
            Some(err) => Err(err.clone()),
            None => panic!("scripted backend called after its script ran out"),
        }
    }
}
