/// Tests for HotReloadCoordinator debounce windows and the reload gate.

use super::*;
use crate::hot_reload::FileChangeKind;

fn coordinator() -> HotReloadCoordinator {
    HotReloadCoordinator::new(&HotReloadConfig::default())
}

fn changed(path: &str) -> FileChangeEvent {
    FileChangeEvent::new(FileChangeKind::Changed, path)
}

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

#[test]
fn test_two_quick_changes_accept_once_and_temporary_file_never() {
    let mut c = coordinator();
    let t0 = Instant::now();

    assert_eq!(c.on_file_event(&changed("shaders/grid.vfx"), t0), ReloadDecision::Accepted);
    assert_eq!(
        c.on_file_event(&changed("shaders/grid.vfx"), t0 + ms(200)),
        ReloadDecision::Rejected(RejectReason::ChangeCooldown),
    );

    let guard = c.try_begin(t0 + ms(250)).unwrap();
    c.finish(t0 + ms(300));
    drop(guard);

    assert_eq!(
        c.on_file_event(&changed("shaders/grid.vfx.TMP"), t0 + ms(1400)),
        ReloadDecision::Rejected(RejectReason::TemporaryFile),
    );
}

#[test]
fn test_temporary_files_do_not_touch_timers() {
    let mut c = coordinator();
    let t0 = Instant::now();

    assert_eq!(
        c.on_file_event(&changed("shaders/grid.vfx.tmp"), t0),
        ReloadDecision::Rejected(RejectReason::TemporaryFile),
    );
    assert_eq!(c.on_file_event(&changed("shaders/grid.vfx"), t0 + ms(10)), ReloadDecision::Accepted);
}

#[test]
fn test_reload_cooldown_rejects_duplicate_save() {
    let mut c = coordinator();
    let t0 = Instant::now();
    assert_eq!(c.on_file_event(&changed("a.vfx"), t0), ReloadDecision::Accepted);
    let guard = c.try_begin(t0).unwrap();
    c.finish(t0 + ms(1200));
    drop(guard);

    assert_eq!(
        c.on_file_event(&changed("a.vfx"), t0 + ms(1300)),
        ReloadDecision::Rejected(RejectReason::ReloadCooldown),
    );
    assert_eq!(c.on_file_event(&changed("a.vfx"), t0 + ms(1800)), ReloadDecision::Accepted);
}

#[test]
fn test_event_during_reload_is_dropped() {
    let mut c = coordinator();
    let t0 = Instant::now();
    let _guard = c.try_begin(t0).unwrap();

    assert_eq!(
        c.on_file_event(&changed("a.vfx"), t0 + ms(5000)),
        ReloadDecision::Rejected(RejectReason::Reloading),
    );
}

#[test]
fn test_gate_has_capacity_one() {
    let mut c = coordinator();
    let t0 = Instant::now();

    let guard = c.try_begin(t0).unwrap();
    assert!(c.is_reloading());
    assert!(c.try_begin(t0).is_none());

    drop(guard);
    assert!(!c.is_reloading());
    assert!(c.try_begin(t0).is_some());
}

#[test]
fn test_finish_reports_elapsed_time() {
    let mut c = coordinator();
    let t0 = Instant::now();
    let _guard = c.try_begin(t0).unwrap();

    assert_eq!(c.finish(t0 + ms(75)), ms(75));
}
