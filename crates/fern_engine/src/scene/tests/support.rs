//! Shared test components

use crate::scene::{Component, ComponentContext, HookError, HookResult};
use std::cell::RefCell;
use std::rc::Rc;

pub type CallLog = Rc<RefCell<Vec<String>>>;

pub fn new_log() -> CallLog {
    Rc::new(RefCell::new(Vec::new()))
}

pub fn entries(log: &CallLog, prefix: &str) -> Vec<String> {
    log.borrow().iter().filter(|entry| entry.starts_with(prefix)).cloned().collect()
}

pub fn count(log: &CallLog, entry: &str) -> usize {
    log.borrow().iter().filter(|e| e.as_str() == entry).count()
}

/// Records every hook as `"<hook> <label>"`
pub struct Recorder {
    pub label: String,
    pub log: CallLog,
    pub fail_on: Option<&'static str>,
}

impl Recorder {
    pub fn new(label: &str, log: &CallLog) -> Self {
        Self {
            label: label.to_string(),
            log: Rc::clone(log),
            fail_on: None,
        }
    }

    pub fn failing(label: &str, log: &CallLog, hook: &'static str) -> Self {
        Self {
            fail_on: Some(hook),
            ..Self::new(label, log)
        }
    }

    fn record(&self, hook: &'static str) -> HookResult {
        self.log.borrow_mut().push(format!("{hook} {}", self.label));
        if self.fail_on == Some(hook) {
            return Err(HookError::msg(format!("{} refused to {hook}", self.label)));
        }
        Ok(())
    }
}

impl Component for Recorder {
    fn on_added(&mut self, _ctx: &mut ComponentContext<'_>) {
        let _ = self.record("added");
    }

    fn start(&mut self, _ctx: &mut ComponentContext<'_>) -> HookResult {
        self.record("start")
    }

    fn update(&mut self, _ctx: &mut ComponentContext<'_>, _dt: f32) -> HookResult {
        self.record("update")
    }

    fn render(&mut self, _ctx: &mut ComponentContext<'_>) -> HookResult {
        self.record("render")
    }

    fn on_removed(&mut self, _ctx: &mut ComponentContext<'_>) {
        let _ = self.record("removed");
    }
}

/// Single-instance stand-in for a camera-like component
#[derive(Default)]
pub struct Unique;

impl Component for Unique {
    fn is_single_instance(&self) -> bool {
        true
    }
}
