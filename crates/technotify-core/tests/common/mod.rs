//! Test doubles and common utilities for notifier contract tests
//!
//! Every double appends to a shared [`CallLog`], so tests can assert both how
//! often something happened and in which order relative to other doubles.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use technotify_core::error::{Error, Result};
use technotify_core::{
    Notifier, NotifierConfig, Observer, ProfileSink, PropertyValue, Service, Signal,
    TechnologyKind, Transport,
};

/// A recorded interaction with one of the doubles
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// Transport accepted a broadcast
    Broadcast { property: String, value: PropertyValue },
    /// Transport refused a broadcast
    BroadcastFailed { property: String },
    /// Profile sink was notified
    ProfileChanged { delayed: bool },
    /// Observer enablement callback
    Enabled { observer: String, kind: TechnologyKind, enabled: bool },
    /// Observer default-service callback
    Default { observer: String, service: Option<String> },
    /// Observer offline-mode callback
    Offline { observer: String, enabled: bool },
}

/// Shared, ordered log of calls
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, call: Call) {
        self.0.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }

    /// Successful broadcasts, in order
    pub fn broadcasts(&self) -> Vec<(String, PropertyValue)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Broadcast { property, value } => Some((property, value)),
                _ => None,
            })
            .collect()
    }

    /// Attempted broadcasts (sent or refused)
    pub fn broadcast_attempts(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::Broadcast { .. } | Call::BroadcastFailed { .. }))
            .count()
    }

    /// Observer callbacks of any type, in order
    pub fn fan_outs(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| {
                matches!(
                    call,
                    Call::Enabled { .. } | Call::Default { .. } | Call::Offline { .. }
                )
            })
            .collect()
    }
}

/// A transport that records every signal and can be told to fail
pub struct RecordingTransport {
    log: CallLog,
    failing: AtomicBool,
    close_count: Mutex<usize>,
}

impl RecordingTransport {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            failing: AtomicBool::new(false),
            close_count: Mutex::new(0),
        }
    }

    /// Make every following emit fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn close_count(&self) -> usize {
        *self.close_count.lock().unwrap()
    }
}

impl Transport for RecordingTransport {
    fn emit(&self, signal: Signal) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            self.log.push(Call::BroadcastFailed {
                property: signal.property,
            });
            return Err(Error::transport("out of memory"));
        }

        self.log.push(Call::Broadcast {
            property: signal.property,
            value: signal.value,
        });
        Ok(())
    }

    fn close(&self) {
        *self.close_count.lock().unwrap() += 1;
    }

    fn transport_name(&self) -> &'static str {
        "recording"
    }
}

/// A profile sink that records every notification
pub struct RecordingProfileSink {
    log: CallLog,
}

impl RecordingProfileSink {
    pub fn new(log: CallLog) -> Self {
        Self { log }
    }
}

impl ProfileSink for RecordingProfileSink {
    fn profile_changed(&self, delayed: bool) {
        self.log.push(Call::ProfileChanged { delayed });
    }
}

/// Which callbacks a [`RecordingObserver`] overrides
#[derive(Debug, Clone, Copy)]
pub struct Hooks {
    pub enabled: bool,
    pub default: bool,
    pub offline: bool,
}

impl Hooks {
    pub const ALL: Hooks = Hooks {
        enabled: true,
        default: true,
        offline: true,
    };

    pub const NONE: Hooks = Hooks {
        enabled: false,
        default: false,
        offline: false,
    };
}

/// An observer that records the callbacks it chose to handle
pub struct RecordingObserver {
    name: String,
    priority: i32,
    hooks: Hooks,
    log: CallLog,
}

impl RecordingObserver {
    pub fn new(name: &str, priority: i32, hooks: Hooks, log: CallLog) -> Arc<dyn Observer> {
        Arc::new(Self {
            name: name.to_string(),
            priority,
            hooks,
            log,
        })
    }
}

impl Observer for RecordingObserver {
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn enabled_changed(&self, kind: TechnologyKind, enabled: bool) {
        if self.hooks.enabled {
            self.log.push(Call::Enabled {
                observer: self.name.clone(),
                kind,
                enabled,
            });
        }
    }

    fn default_changed(&self, service: Option<&dyn Service>) {
        if self.hooks.default {
            self.log.push(Call::Default {
                observer: self.name.clone(),
                service: service.map(|service| service.identifier().to_string()),
            });
        }
    }

    fn offline_mode_changed(&self, enabled: bool) {
        if self.hooks.offline {
            self.log.push(Call::Offline {
                observer: self.name.clone(),
                enabled,
            });
        }
    }
}

/// A fixed service for default-technology tests
pub struct TestService {
    pub identifier: String,
    pub kind: TechnologyKind,
}

impl TestService {
    pub fn new(identifier: &str, kind: TechnologyKind) -> Self {
        Self {
            identifier: identifier.to_string(),
            kind,
        }
    }
}

impl Service for TestService {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn kind(&self) -> TechnologyKind {
        self.kind
    }
}

/// A notifier wired to recording doubles sharing one log
pub struct Harness {
    pub notifier: Notifier,
    pub transport: Arc<RecordingTransport>,
    pub log: CallLog,
}

impl Harness {
    pub fn new() -> Self {
        let log = CallLog::new();
        let transport = Arc::new(RecordingTransport::new(log.clone()));
        let profile = Arc::new(RecordingProfileSink::new(log.clone()));

        let notifier = Notifier::init(transport.clone(), profile, NotifierConfig::default())
            .expect("default config is valid");

        Self {
            notifier,
            transport,
            log,
        }
    }

    /// Register a recording observer on the harness log
    pub fn observer(&self, name: &str, priority: i32, hooks: Hooks) -> Arc<dyn Observer> {
        let observer = RecordingObserver::new(name, priority, hooks, self.log.clone());
        self.notifier.register_observer(observer.clone());
        observer
    }
}

/// Shorthand for a technology list value
pub fn names(list: &[&str]) -> PropertyValue {
    PropertyValue::StringArray(list.iter().map(|s| s.to_string()).collect())
}
