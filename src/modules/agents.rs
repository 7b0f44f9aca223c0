use std::sync::atomic::{AtomicUsize, Ordering};

/// Agent sent when the configured pool is empty.
pub const DEFAULT_AGENT: &str = "Mozilla/5.0 (compatible; webstack/0.1)";

/// Rotating pool of user-agent strings.
///
/// Requests cycle through the configured agents so consecutive crawls do not
/// present the same identity.
#[derive(Debug, Default)]
pub struct AgentPool {
    agents: Vec<String>,
    cursor: AtomicUsize,
}

impl AgentPool {
    pub fn new(agents: Vec<String>) -> Self {
        Self {
            agents,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Next agent in rotation, or [`DEFAULT_AGENT`] for an empty pool.
    pub fn pick(&self) -> &str {
        if self.agents.is_empty() {
            return DEFAULT_AGENT;
        }
        let idx = self.cursor.fetch_add(1, Ordering::Relaxed) % self.agents.len();
        &self.agents[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_cycles_through_the_pool() {
        let pool = AgentPool::new(vec!["one".to_string(), "two".to_string()]);
        assert_eq!(pool.pick(), "one");
        assert_eq!(pool.pick(), "two");
        assert_eq!(pool.pick(), "one");
    }

    #[test]
    fn empty_pool_falls_back_to_default() {
        let pool = AgentPool::new(Vec::new());
        assert_eq!(pool.pick(), DEFAULT_AGENT);
        assert_eq!(pool.pick(), DEFAULT_AGENT);
    }
}
