//! Application-level configuration.

/// Parameters controlling a chat session.
#[derive(Debug, Clone)]
pub struct ChatParams {
    /// History messages sent with each request, front-truncated beyond this.
    pub max_history_turns: usize,
}

impl Default for ChatParams {
    fn default() -> Self {
        Self {
            max_history_turns: 20,
        }
    }
}

impl ChatParams {
    pub fn with_max_history_turns(mut self, turns: usize) -> Self {
        self.max_history_turns = turns;
        self
    }
}
