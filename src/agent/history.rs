//! Run history - the record of a completed agent run
//!
//! Callers read the outcome through the `RunHistory` trait rather than
//! probing fields, so the extraction policy can be tested against scripted
//! histories.

/// Read access to a completed run's outcome
pub trait RunHistory {
    /// The agent's final answer, if it produced one
    fn final_result(&self) -> Option<&str>;

    /// Content recorded by extraction steps, in order
    fn extracted_content(&self) -> &[String];

    /// Whether the agent considers the task finished
    fn is_done(&self) -> bool;
}

/// History accumulated by the agent loop
#[derive(Debug, Default)]
pub struct AgentHistory {
    final_result: Option<String>,
    extracted: Vec<String>,
    done: bool,
    steps: usize,
}

impl AgentHistory {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one completed step
    pub fn record_step(&mut self) {
        self.steps += 1;
    }

    /// Record content produced by an extraction action
    pub fn record_extracted(&mut self, content: impl Into<String>) {
        self.extracted.push(content.into());
    }

    /// Mark the run finished, optionally with a final answer
    pub fn finish(&mut self, result: Option<String>) {
        self.done = true;
        if let Some(r) = result {
            if !r.trim().is_empty() {
                self.final_result = Some(r);
            }
        }
    }

    /// Number of steps the run took
    pub fn steps(&self) -> usize {
        self.steps
    }
}

impl RunHistory for AgentHistory {
    fn final_result(&self) -> Option<&str> {
        self.final_result.as_deref()
    }

    fn extracted_content(&self) -> &[String] {
        &self.extracted
    }

    fn is_done(&self) -> bool {
        self.done
    }
}
