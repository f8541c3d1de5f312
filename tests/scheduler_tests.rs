//! Tests for pending-operation accounting, the startup barrier, and
//! timer lifecycle.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use mockd::runtime_config::RuntimeConfig;
use mockd::{Response, Runtime, Scheduler};

mod tracing_util;
use tracing_util::TestTracing;

fn init() -> TestTracing {
    may::config().set_stack_size(0x10000);
    TestTracing::init()
}

#[test]
fn empty_set_is_not_idle_before_seal() {
    let _tracing = init();
    let scheduler = Scheduler::new(RuntimeConfig::default());
    // Zero pending ops, but the registration phase is still open.
    assert_eq!(scheduler.live_ops(), 0);
    assert!(!scheduler.is_idle());
    scheduler.seal();
    assert!(scheduler.is_idle());
}

#[test]
fn top_level_timer_defers_idle() {
    let _tracing = init();
    let fired = Arc::new(AtomicBool::new(false));

    let builder = Runtime::builder();
    let scheduler = builder.scheduler();
    let flag = Arc::clone(&fired);
    scheduler.set_timeout(Duration::from_millis(50), move || {
        flag.store(true, Ordering::SeqCst);
    });

    // The timer was registered before build(), so the freshly started
    // runtime must not report idle even with no request in flight.
    let rt = builder.build();
    assert!(!rt.scheduler().is_idle());

    rt.wait_idle();
    assert!(fired.load(Ordering::SeqCst));
    assert!(rt.scheduler().is_idle());
}

#[test]
fn wait_idle_waits_for_every_timer() {
    let _tracing = init();
    let count = Arc::new(AtomicUsize::new(0));

    let builder = Runtime::builder();
    let scheduler = builder.scheduler();
    for delay in [20u64, 50, 80] {
        let count = Arc::clone(&count);
        scheduler.set_timeout(Duration::from_millis(delay), move || {
            count.fetch_add(1, Ordering::SeqCst);
        });
    }
    let rt = builder.build();

    let start = Instant::now();
    rt.wait_idle();
    assert_eq!(count.load(Ordering::SeqCst), 3);
    assert!(start.elapsed() >= Duration::from_millis(80));
}

#[test]
fn cancelled_timer_releases_immediately_and_never_fires() {
    let _tracing = init();
    let fired = Arc::new(AtomicBool::new(false));

    let scheduler = Scheduler::new(RuntimeConfig::default());
    let flag = Arc::clone(&fired);
    let handle = scheduler.set_timeout(Duration::from_secs(30), move || {
        flag.store(true, Ordering::SeqCst);
    });
    scheduler.seal();
    assert!(!scheduler.is_idle());

    handle.cancel();
    assert!(handle.is_cancelled());

    // Cancellation releases the pending op without waiting out the delay.
    let start = Instant::now();
    scheduler.wait_idle();
    assert!(start.elapsed() < Duration::from_secs(5));
    assert!(!fired.load(Ordering::SeqCst));

    // Cancelling again is a no-op.
    handle.cancel();
}

#[test]
fn deferred_op_registered_at_suspension() {
    let _tracing = init();
    let mut builder = Runtime::builder();
    let scheduler = builder.scheduler();
    builder
        .get("/slow", move |_| {
            let (reply, resolver) = mockd::Reply::deferred(&scheduler);
            scheduler.set_timeout(Duration::from_millis(30), move || {
                resolver.resolve(Response::text("done"));
            });
            reply
        })
        .expect("register");
    let rt = builder.build();
    assert!(rt.scheduler().is_idle());

    let resp = rt.handle(mockd::RawRequest {
        method: "GET".to_string(),
        url: "/slow".to_string(),
        headers: vec![],
        body: vec![],
    });
    assert_eq!(resp.status, 200);

    // Both the deferred completion and its timer have settled by the
    // time the response is out.
    rt.wait_idle();
    assert_eq!(rt.scheduler().live_ops(), 0);
}

#[test]
fn timer_callback_panic_does_not_wedge_shutdown() {
    let _tracing = init();
    let scheduler = Scheduler::new(RuntimeConfig::default());
    scheduler.set_timeout(Duration::from_millis(20), || {
        panic!("timer detonated");
    });
    scheduler.seal();
    scheduler.wait_idle();
    assert!(scheduler.is_idle());
}
