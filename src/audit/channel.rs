use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, warn};

use super::AuditEvent;

/// Receives every event published after it subscribed. Implementations should
/// not block for long: delivery is synchronous with the publishing operation.
pub trait AuditSubscriber: Send + Sync {
    /// Short label used when logging a delivery failure.
    fn name(&self) -> &str { "subscriber" }

    fn on_event(&self, event: &AuditEvent) -> anyhow::Result<()>;
}

#[derive(Default)]
pub struct AuditChannel {
    subscribers: RwLock<Vec<Arc<dyn AuditSubscriber>>>,
}

impl AuditChannel {
    pub fn new() -> Self { Self::default() }

    /// Append a subscriber; the same instance may be registered more than once.
    pub fn subscribe(&self, subscriber: Arc<dyn AuditSubscriber>) {
        self.subscribers.write().push(subscriber);
    }

    /// Remove the first registration of this subscriber instance.
    /// Returns false if it was not registered.
    pub fn unsubscribe<S: AuditSubscriber + ?Sized>(&self, subscriber: &Arc<S>) -> bool {
        let mut subs = self.subscribers.write();
        let target = Arc::as_ptr(subscriber);
        match subs.iter().position(|s| std::ptr::addr_eq(Arc::as_ptr(s), target)) {
            Some(i) => {
                subs.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn subscriber_count(&self) -> usize { self.subscribers.read().len() }

    /// Deliver `event` to every current subscriber in subscription order.
    /// Returns how many subscribers accepted it. Failures and panics are
    /// logged here and never propagate to the publisher.
    pub fn publish(&self, event: impl Into<AuditEvent>) -> usize {
        let event = event.into();
        // Snapshot so subscribers may (un)subscribe from inside on_event.
        let snapshot: Vec<Arc<dyn AuditSubscriber>> = self.subscribers.read().clone();
        let mut delivered = 0usize;
        for sub in snapshot.iter() {
            match panic::catch_unwind(AssertUnwindSafe(|| sub.on_event(&event))) {
                Ok(Ok(())) => delivered += 1,
                Ok(Err(e)) => {
                    warn!(target: "rolegate::audit", "audit subscriber '{}' failed: {:#}", sub.name(), e);
                }
                Err(_) => {
                    warn!(target: "rolegate::audit", "audit subscriber '{}' panicked; event='{}'", sub.name(), event.message);
                }
            }
        }
        debug!(target: "rolegate::audit", "publish: delivered={}/{} event='{}'", delivered, snapshot.len(), event.message);
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::MemorySink;
    use parking_lot::Mutex;

    struct Failing;
    impl AuditSubscriber for Failing {
        fn name(&self) -> &str { "failing" }
        fn on_event(&self, _event: &AuditEvent) -> anyhow::Result<()> {
            anyhow::bail!("sink offline")
        }
    }

    struct Panicking;
    impl AuditSubscriber for Panicking {
        fn on_event(&self, _event: &AuditEvent) -> anyhow::Result<()> {
            panic!("boom")
        }
    }

    struct Tagged {
        tag: &'static str,
        out: Arc<Mutex<Vec<String>>>,
    }
    impl AuditSubscriber for Tagged {
        fn on_event(&self, event: &AuditEvent) -> anyhow::Result<()> {
            self.out.lock().push(format!("{}:{}", self.tag, event.message));
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> { Ok(()) }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for Captured {
        type Writer = Captured;
        fn make_writer(&'a self) -> Self::Writer { self.clone() }
    }

    fn publish_with_filter(filter: &str) -> String {
        let buf = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
            .with_writer(buf.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            AuditChannel::new().publish("traced event");
        });
        let bytes = buf.0.lock().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn publish_trace_follows_log_filter() {
        let shown = publish_with_filter("rolegate::audit=debug");
        assert!(shown.contains("rolegate::audit"), "{}", shown);
        assert!(shown.contains("traced event"), "{}", shown);
        assert!(publish_with_filter("warn").is_empty());
    }

    #[test]
    fn zero_subscribers_is_fine() {
        let ch = AuditChannel::new();
        assert_eq!(ch.publish("nobody listens"), 0);
    }

    #[test]
    fn delivers_in_subscription_order() {
        let ch = AuditChannel::new();
        let out = Arc::new(Mutex::new(Vec::new()));
        ch.subscribe(Arc::new(Tagged { tag: "first", out: out.clone() }));
        ch.subscribe(Arc::new(Tagged { tag: "second", out: out.clone() }));
        ch.publish("e1");
        ch.publish("e2");
        assert_eq!(*out.lock(), vec!["first:e1", "second:e1", "first:e2", "second:e2"]);
    }

    #[test]
    fn failing_and_panicking_subscribers_are_isolated() {
        let ch = AuditChannel::new();
        let sink = Arc::new(MemorySink::new());
        ch.subscribe(Arc::new(Failing));
        ch.subscribe(Arc::new(Panicking));
        ch.subscribe(sink.clone());
        assert_eq!(ch.publish("still delivered"), 1);
        assert_eq!(sink.messages(), vec!["still delivered"]);
    }

    #[test]
    fn unsubscribe_removes_first_registration_only() {
        let ch = AuditChannel::new();
        let sink = Arc::new(MemorySink::new());
        ch.subscribe(sink.clone());
        ch.subscribe(sink.clone());
        assert!(ch.unsubscribe(&sink));
        assert_eq!(ch.subscriber_count(), 1);
        ch.publish("once");
        assert_eq!(sink.messages(), vec!["once"]);
        assert!(ch.unsubscribe(&sink));
        assert!(!ch.unsubscribe(&sink));
        ch.publish("nobody");
        assert_eq!(sink.messages().len(), 1);
    }
}
