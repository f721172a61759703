//! Test utilities for exercising grocery operations without a real dstask
//!
//! [`MockRunner`] stands in for the subprocess runner: it answers each dstask
//! verb from a scripted queue and records every invocation it receives.
//!
//! ```
//! use grocerylist::dstask::DstaskVerb;
//! use grocerylist::test_utils::{test_list, MockRunner};
//! use std::sync::Arc;
//!
//! let runner = Arc::new(MockRunner::new().respond(DstaskVerb::Next, "3 pending milk +grocery"));
//! let list = test_list(runner.clone());
//!
//! assert_eq!(list.list_pending().unwrap().len(), 1);
//! assert_eq!(runner.calls(), vec![vec!["next", "+grocery"]]);
//! ```

use crate::config::Config;
use crate::dstask::{CommandRunner, DstaskVerb, Invocation, ToolLauncher};
use crate::grocery::GroceryList;
use crate::{GroceryError, Result};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// A scripted [`CommandRunner`]
///
/// Responses are queued per verb and consumed in order. A verb with nothing
/// queued succeeds with empty output. The verb is read from the first
/// argument, so the runner expects a direct launcher.
#[derive(Debug, Default)]
pub struct MockRunner {
    responses: Mutex<HashMap<String, VecDeque<Result<String>>>>,
    invocations: Mutex<Vec<Invocation>>,
}

impl MockRunner {
    /// Create a runner with no scripted responses
    pub fn new() -> Self {
        Self::default()
    }

    fn push(self, verb: DstaskVerb, response: Result<String>) -> Self {
        if let Ok(mut responses) = self.responses.lock() {
            responses
                .entry(verb.as_str().to_string())
                .or_default()
                .push_back(response);
        }
        self
    }

    /// Queue a successful output for `verb`
    pub fn respond(self, verb: DstaskVerb, output: &str) -> Self {
        self.push(verb, Ok(output.to_string()))
    }

    /// Queue a tool failure for `verb`
    pub fn fail(self, verb: DstaskVerb, message: &str) -> Self {
        let command = format!("dstask {verb}");
        self.push(verb, Err(GroceryError::external_tool(command, message)))
    }

    /// Every invocation received so far
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations
            .lock()
            .map(|invocations| invocations.clone())
            .unwrap_or_default()
    }

    /// The argument vectors received so far
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.invocations()
            .into_iter()
            .map(|invocation| invocation.args)
            .collect()
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, invocation: &Invocation) -> Result<String> {
        if let Ok(mut invocations) = self.invocations.lock() {
            invocations.push(invocation.clone());
        }

        let verb = invocation.args.first().cloned().unwrap_or_default();
        self.responses
            .lock()
            .ok()
            .and_then(|mut responses| responses.get_mut(&verb).and_then(VecDeque::pop_front))
            .unwrap_or_else(|| Ok(String::new()))
    }
}

/// Configuration for tests: default tag, no version manager
pub fn test_config() -> Config {
    Config {
        use_version_manager: false,
        ..Config::default()
    }
}

/// A grocery list wired to `runner` through a direct launcher
pub fn test_list(runner: Arc<MockRunner>) -> GroceryList {
    let config = test_config();
    let launcher = ToolLauncher::direct(&config);
    GroceryList::with_runner(config, launcher, runner)
}
