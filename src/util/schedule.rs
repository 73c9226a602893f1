// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Frame-polled timers.
//!
//! egui runs the UI as a sequence of frames rather than callbacks, so
//! timers are deadlines checked once per frame. Times are seconds as
//! reported by `egui::InputState::time`.

/// A repeating task that fires every `interval` seconds after it is started.
///
/// Owners keep it in an `Option` and reset it to `None` to cancel.
#[derive(Debug, Clone, PartialEq)]
pub struct RepeatingTask {
    interval: f64,
    next_due: f64,
}

impl RepeatingTask {
    /// Start the task; the first firing is one interval after `now`.
    pub fn start(now: f64, interval: f64) -> Self {
        Self {
            interval,
            next_due: now + interval,
        }
    }

    /// Returns true at most once per call when the deadline has passed, and re-arms.
    ///
    /// Missed firings are coalesced: a long gap between frames fires once.
    pub fn poll(&mut self, now: f64) -> bool {
        if now < self.next_due {
            return false;
        }
        self.next_due = now + self.interval;
        true
    }

    pub fn next_deadline(&self) -> f64 {
        self.next_due
    }
}

/// The scripted analysis sequence: each tool is shown for a fixed dwell time.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    tools: &'static [&'static str],
    dwell: f64,
    started_at: f64,
}

impl Pipeline {
    pub fn start(now: f64, tools: &'static [&'static str], dwell: f64) -> Self {
        Self {
            tools,
            dwell,
            started_at: now,
        }
    }

    /// The tool active at `now`, or `None` once the sequence has run out.
    pub fn current_tool(&self, now: f64) -> Option<&'static str> {
        let elapsed = (now - self.started_at).max(0.0);
        let step = (elapsed / self.dwell).floor() as usize;
        self.tools.get(step).copied()
    }

    pub fn is_finished(&self, now: f64) -> bool {
        now >= self.finishes_at()
    }

    pub fn finishes_at(&self) -> f64 {
        self.started_at + self.dwell * self.tools.len() as f64
    }

    /// When the displayed tool next changes (or the sequence ends).
    pub fn next_deadline(&self, now: f64) -> f64 {
        let elapsed = (now - self.started_at).max(0.0);
        let step = (elapsed / self.dwell).floor() + 1.0;
        (self.started_at + step * self.dwell).min(self.finishes_at())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOOLS: &[&str] = &["scanner", "lens", "staff"];

    #[test]
    fn test_repeating_task_fires_each_interval() {
        let mut task = RepeatingTask::start(10.0, 5.0);
        assert!(!task.poll(10.0));
        assert!(!task.poll(14.9));
        assert!(task.poll(15.0));
        assert!(!task.poll(15.1));
        assert_eq!(task.next_deadline(), 20.0);
        assert!(task.poll(20.5));
    }

    #[test]
    fn test_repeating_task_coalesces_missed_firings() {
        let mut task = RepeatingTask::start(0.0, 1.0);
        assert!(task.poll(7.5));
        assert!(!task.poll(7.75));
        assert_eq!(task.next_deadline(), 8.5);
    }

    #[test]
    fn test_pipeline_steps_through_tools() {
        let pipeline = Pipeline::start(100.0, TOOLS, 1.5);

        assert_eq!(pipeline.current_tool(100.0), Some("scanner"));
        assert_eq!(pipeline.current_tool(101.4), Some("scanner"));
        assert_eq!(pipeline.current_tool(101.5), Some("lens"));
        assert_eq!(pipeline.current_tool(103.2), Some("staff"));
        assert!(!pipeline.is_finished(104.4));
        assert!(pipeline.is_finished(104.5));
        assert_eq!(pipeline.current_tool(104.5), None);
    }

    #[test]
    fn test_pipeline_next_deadline() {
        let pipeline = Pipeline::start(0.0, TOOLS, 1.5);
        assert_eq!(pipeline.next_deadline(0.2), 1.5);
        assert_eq!(pipeline.next_deadline(1.6), 3.0);
        assert_eq!(pipeline.next_deadline(4.0), 4.5);
        assert_eq!(pipeline.next_deadline(9.0), 4.5);
    }
}
