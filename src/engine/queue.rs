// src/engine/queue.rs

use std::collections::VecDeque;

use tracing::debug;

use super::TaskName;

/// Tasks triggered while another task is running.
///
/// Semantics:
/// - FIFO: tasks run in the order they were first triggered.
/// - A task already waiting is not queued twice. Its pending run reads the
///   sources from disk when it starts, so it picks up every change made
///   before then.
#[derive(Debug, Default)]
pub struct TriggerQueue {
    pending: VecDeque<TaskName>,
}

impl TriggerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there are no queued triggers.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn contains(&self, task: &str) -> bool {
        self.pending.iter().any(|t| t == task)
    }

    /// Record a trigger. Returns false if the task was already waiting.
    pub fn record_trigger(&mut self, task: &str) -> bool {
        if self.contains(task) {
            debug!(task = %task, "task already queued; coalescing trigger");
            return false;
        }
        self.pending.push_back(task.to_string());
        debug!(task = %task, queued = self.pending.len(), "queued trigger");
        true
    }

    /// Next task to run, if any.
    pub fn pop_next(&mut self) -> Option<TaskName> {
        self.pending.pop_front()
    }

    /// Empty the queue, returning what was waiting in order.
    pub fn drain_pending(&mut self) -> Vec<TaskName> {
        let tasks: Vec<TaskName> = self.pending.drain(..).collect();
        debug!(drained = tasks.len(), "drained queued triggers");
        tasks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn fifo_with_coalescing() {
        let mut q = TriggerQueue::new();
        assert!(q.record_trigger("styles"));
        assert!(q.record_trigger("scripts"));
        assert!(!q.record_trigger("styles"));
        assert_eq!(q.pop_next().as_deref(), Some("styles"));
        assert_eq!(q.drain_pending(), vec!["scripts".to_string()]);
        assert!(q.is_empty());
    }

    proptest! {
        #[test]
        fn queue_holds_each_task_once_in_first_seen_order(
            triggers in proptest::collection::vec(0usize..4, 0..40)
        ) {
            let names = ["styles", "scripts", "templates", "images"];
            let mut q = TriggerQueue::new();
            let mut expected: Vec<String> = Vec::new();
            for i in &triggers {
                q.record_trigger(names[*i]);
                if !expected.iter().any(|e| e == names[*i]) {
                    expected.push(names[*i].to_string());
                }
            }
            prop_assert_eq!(q.drain_pending(), expected);
        }
    }
}
