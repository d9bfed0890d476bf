//! Health registry integration tests

use opskit::health::{self, Health, HealthCheck, ProbeContext, ProbeError, Registry, Status};
use std::time::Duration;

struct Mysql;

impl HealthCheck for Mysql {
    fn ping(&self, ctx: &ProbeContext) -> Result<(), ProbeError> {
        ctx.check()?;
        Err("mysql connect timeout".into())
    }
}

struct Redis;

impl HealthCheck for Redis {
    fn ping(&self, ctx: &ProbeContext) -> Result<(), ProbeError> {
        ctx.check()?;
        Err("redis connect timeout".into())
    }
}

#[test]
fn test_dependency_report_wire_shape() {
    let registry = Registry::new();
    registry.register("mysql", Mysql);
    registry.register("redis", Redis);

    let ctx = ProbeContext::with_timeout(Duration::from_secs(5));
    let report = registry.ping(&ctx);

    let json = serde_json::to_string(&report).expect("serialize report");
    assert_eq!(
        json,
        r#"{"status":"down","details":[{"name":"mysql","status":"down","error":"mysql connect timeout"},{"name":"redis","status":"down","error":"redis connect timeout"}]}"#
    );
}

#[test]
fn test_mixed_report() {
    let registry = Registry::new();
    registry.register("disk", |ctx: &ProbeContext| ctx.check());
    registry.register("mysql", Mysql);

    let report = registry.ping(&ProbeContext::background());
    assert_eq!(report.status, Status::Down);
    assert_eq!(report.details.len(), 2);

    let disk = &report.details[0];
    assert_eq!(disk.name, "disk");
    assert_eq!(disk.status, Status::Up);
    assert!(disk.error.is_none());

    let mysql = &report.details[1];
    assert_eq!(mysql.status, Status::Down);
    assert_eq!(mysql.error.as_deref(), Some("mysql connect timeout"));
}

/// The single test using the process-wide registry.
#[test]
fn test_process_wide_registry() {
    health::register("cache", |ctx: &ProbeContext| ctx.check());

    let report = health::ping(&ProbeContext::with_timeout(Duration::from_secs(5)));
    assert_eq!(report.status, Status::Up);
    assert!(report.details.iter().any(|d| d.name == "cache"));
    assert_eq!(health::default_registry().len(), 1);
}

#[test]
fn test_report_round_trips_through_json() {
    let json = r#"{"status":"down","details":[{"name":"mysql","status":"down","error":"gone"},{"name":"redis","status":"up"}]}"#;
    let report: Health = serde_json::from_str(json).expect("deserialize report");

    assert_eq!(report.status, Status::Down);
    assert_eq!(report.details[1].error, None);
    assert_eq!(serde_json::to_string(&report).unwrap(), json);
}

#[test]
fn test_expired_deadline_observed_by_probers() {
    let registry = Registry::new();
    registry.register("a", |ctx: &ProbeContext| ctx.check());
    registry.register("b", |ctx: &ProbeContext| ctx.check());

    let ctx = ProbeContext::with_timeout(Duration::from_millis(0));
    std::thread::sleep(Duration::from_millis(5));
    let report = registry.ping(&ctx);

    // probing is not cut short: every entry still reports, each down
    assert_eq!(report.details.len(), 2);
    assert_eq!(report.status, Status::Down);
    assert!(report
        .details
        .iter()
        .all(|d| d.error.as_deref() == Some("probe deadline exceeded")));
}
