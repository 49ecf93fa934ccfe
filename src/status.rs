//! User-facing status messages

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// Receives short messages meant for the person editing the book
pub trait StatusSink {
    fn report(&mut self, level: StatusLevel, message: &str);
}

/// Forwards status messages to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogStatusSink;

impl StatusSink for LogStatusSink {
    fn report(&mut self, level: StatusLevel, message: &str) {
        match level {
            StatusLevel::Success | StatusLevel::Info => log::info!("{}", message),
            StatusLevel::Warning => log::warn!("{}", message),
            StatusLevel::Error => log::error!("{}", message),
        }
    }
}

/// Keeps every message. Clones share the same buffer, so one clone can be
/// handed to the editor while another is inspected.
#[derive(Debug, Default, Clone)]
pub struct RecordingStatusSink {
    messages: Rc<RefCell<Vec<(StatusLevel, String)>>>,
}

impl RecordingStatusSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<(StatusLevel, String)> {
        self.messages.borrow().clone()
    }

    pub fn last(&self) -> Option<(StatusLevel, String)> {
        self.messages.borrow().last().cloned()
    }

    pub fn clear(&self) {
        self.messages.borrow_mut().clear();
    }
}

impl StatusSink for RecordingStatusSink {
    fn report(&mut self, level: StatusLevel, message: &str) {
        self.messages.borrow_mut().push((level, message.to_string()));
    }
}
