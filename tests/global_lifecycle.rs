//! Integration tests for the process-wide profiler
//!
//! All tests share one global context, so they run serially and compare
//! against the report before and after their own work.

use callprof::{global, CallSite, Handle, ProfilerError};
use serial_test::serial;
use std::collections::HashMap;
use std::thread;
use std::time::Duration;

fn ensure_initialized() {
    match global::initialize() {
        Ok(()) | Err(ProfilerError::AlreadyInitialized) => {}
        Err(e) => panic!("initialize failed: {e}"),
    }
}

fn hits_by_site() -> HashMap<CallSite, (u64, f64)> {
    global::report()
        .unwrap()
        .entries()
        .iter()
        .map(|e| (e.site, (e.hits, e.micros)))
        .collect()
}

#[inline(never)]
fn timed_sleep(ms: u64) -> callprof::Result<Handle> {
    let handle = global::enter()?;
    thread::sleep(Duration::from_millis(ms));
    global::exit(handle)?;
    Ok(handle)
}

#[test]
#[serial]
fn test_second_initialize_rejected() {
    ensure_initialized();
    assert!(global::is_initialized());
    assert!(matches!(
        global::initialize(),
        Err(ProfilerError::AlreadyInitialized)
    ));
}

#[test]
#[serial]
fn test_three_sleeps_one_line() {
    ensure_initialized();
    let before = hits_by_site();

    let mut handle = None;
    for _ in 0..3 {
        handle = Some(timed_sleep(10).unwrap());
    }
    let site = global::site(handle.unwrap()).unwrap().unwrap();
    let after = hits_by_site();

    let (hits_before, micros_before) = before.get(&site).copied().unwrap_or((0, 0.0));
    let (hits, micros) = after[&site];
    let hits = hits - hits_before;
    let micros = micros - micros_before;

    assert_eq!(hits, 3);
    assert!(micros >= 30_000.0, "total {} micros", micros);
    assert!(micros / hits as f64 >= 10_000.0);
    // Generous bound for scheduler jitter
    assert!(micros < 3_000_000.0);
    // No other call site gained hits
    let changed = after.iter().filter(|(s, v)| before.get(*s) != Some(*v)).count();
    assert_eq!(changed, 1);
}

#[test]
#[serial]
fn test_unbalanced_exit_reported() {
    ensure_initialized();

    let handle = global::enter().unwrap();
    global::exit(handle).unwrap();
    assert!(matches!(
        global::exit(handle),
        Err(ProfilerError::UnbalancedExit { .. })
    ));
}

#[test]
#[serial]
fn test_span_closes_on_drop() {
    ensure_initialized();

    let handle = {
        let span = global::span().unwrap();
        thread::sleep(Duration::from_millis(2));
        span.handle().unwrap()
    };

    // Region already closed by the guard
    assert!(matches!(
        global::exit(handle),
        Err(ProfilerError::UnbalancedExit { .. })
    ));
}

#[test]
#[serial]
fn test_span_finish_returns_duration() {
    ensure_initialized();

    let span = global::span().unwrap();
    thread::sleep(Duration::from_millis(2));
    let elapsed = span.finish().unwrap();
    assert!(elapsed >= Duration::from_millis(2));
}

#[inline(never)]
fn scoped(depth: u32) -> callprof::Result<u32> {
    callprof::profile_scope!();
    if depth == 0 {
        return Ok(0);
    }
    Ok(1 + scoped(depth - 1)?)
}

#[test]
#[serial]
fn test_profile_scope_recursion() {
    ensure_initialized();
    let before = hits_by_site();

    assert_eq!(scoped(4).unwrap(), 4);
    let after = hits_by_site();

    // One call site, entered once per level
    let gained: Vec<u64> = after
        .iter()
        .map(|(site, (hits, _))| hits - before.get(site).map_or(0, |v| v.0))
        .filter(|delta| *delta > 0)
        .collect();
    assert_eq!(gained, vec![5]);
}

#[test]
#[serial]
fn test_finalize_keeps_state() {
    ensure_initialized();

    let _ = timed_sleep(0).unwrap();
    let before = global::report().unwrap().len();
    global::finalize().unwrap();
    assert_eq!(global::report().unwrap().len(), before);
}

#[test]
#[serial]
fn test_enter_from_other_threads() {
    ensure_initialized();
    let before = hits_by_site();

    let workers: Vec<_> = (0..4)
        .map(|_| {
            thread::spawn(|| {
                for _ in 0..10 {
                    let handle = global::enter().unwrap();
                    global::exit(handle).unwrap();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    // All threads share the literal call site and its stack of open
    // regions, so exits pair across threads: only hit counts and balanced
    // exits are meaningful here, not per-thread durations
    let after = hits_by_site();
    let gained: Vec<u64> = after
        .iter()
        .map(|(site, (hits, _))| hits - before.get(site).map_or(0, |v| v.0))
        .filter(|delta| *delta > 0)
        .collect();
    assert_eq!(gained, vec![40]);
}
