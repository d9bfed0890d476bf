//! Integration tests for the logging subsystem
//!
//! These tests verify:
//! - Bootstrap from a flat configuration and the package-level functions
//! - Caller attribution through convenience wrappers
//! - Sink exclusivity of the `*_to_file` / `*_to_console` variants
//! - The full typed field table on emitted records
//! - Level filtering down to zero output bytes

use opskit::{Config, FieldValue, Level, Logger};
use std::net::IpAddr;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

fn read_json_lines(path: &Path) -> Vec<serde_json::Value> {
    if !path.exists() {
        return Vec::new();
    }
    std::fs::read_to_string(path)
        .expect("read log file")
        .lines()
        .map(|line| serde_json::from_str(line).expect("valid JSON record"))
        .collect()
}

fn file_only_config(dir: &TempDir, level: &str) -> Config {
    Config {
        level: level.to_string(),
        file_path: dir.path().join("app.log").to_str().unwrap().to_string(),
        enable_file: true,
        enable_console: false,
        utc_time: true,
        ..Config::default()
    }
}

/// The single test that touches the process-wide instances; everything else
/// builds loggers directly so tests can run in parallel.
#[test]
fn test_global_bootstrap_and_package_functions() {
    let dir = TempDir::new().expect("temp dir");
    let app_path = dir.path().join("app.log");
    let access_path = dir.path().join("access.log");

    let config = Config {
        level: "debug".to_string(),
        file_path: app_path.to_str().unwrap().to_string(),
        access_file_path: access_path.to_str().unwrap().to_string(),
        enable_file: true,
        enable_console: false,
        enable_access_file: true,
        enable_access_console: false,
        utc_time: true,
        ..Config::default()
    };
    config.init().expect("logger init");

    opskit::info("package info");
    opskit::info_to_file("file only");
    opskit::info_to_console("console only");

    let line = line!() + 1;
    opskit::with("request", 1).with_caller().info("located");

    opskit::access_logger().info_to_file("access line");

    opskit::default_logger().flush().expect("flush app");
    opskit::access_logger().flush().expect("flush access");

    let app_lines = read_json_lines(&app_path);
    let messages: Vec<&str> = app_lines
        .iter()
        .filter_map(|l| l["message"].as_str())
        .collect();
    assert_eq!(messages, ["package info", "file only", "located"]);

    let located = &app_lines[2];
    assert_eq!(located["request"], 1);
    let caller = located["caller"].as_str().expect("caller attached");
    assert!(
        caller.ends_with(&format!("integration_tests.rs:{}", line)),
        "caller was {}",
        caller
    );

    let access_lines = read_json_lines(&access_path);
    assert_eq!(access_lines.len(), 1);
    assert_eq!(access_lines[0]["message"], "access line");
    assert!(!messages.contains(&"access line"));

    // the accessor's one-shot adjustment and the -1 wrapper compensation
    assert_eq!(opskit::default_logger().skip_frames(), 1);
    assert_eq!(opskit::with_skip_frame_count(-1).skip_frames(), 0);

    // re-initialization swaps both instances atomically
    let second_path = dir.path().join("app2.log");
    let mut second = config.clone();
    second.file_path = second_path.to_str().unwrap().to_string();
    second.init().expect("re-init");

    opskit::info("after reinit");
    opskit::default_logger().flush().expect("flush second");

    let second_lines = read_json_lines(&second_path);
    assert_eq!(second_lines.len(), 1);
    assert_eq!(second_lines[0]["message"], "after reinit");
    // the old file did not receive the new record
    assert_eq!(read_json_lines(&app_path).len(), 3);
}

#[test]
fn test_invalid_config_rejected() {
    let config = Config {
        enable_file: true,
        file_path: "..".to_string(),
        ..Config::default()
    };
    assert!(config.init().is_err());

    let config = Config {
        enable_access_file: true,
        access_file_path: String::new(),
        ..Config::default()
    };
    assert!(config.init().is_err());
}

#[test]
fn test_directory_created_and_levels_filtered() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("nested/logs/app.log");

    let config = Config {
        level: "warn".to_string(),
        file_path: path.to_str().unwrap().to_string(),
        enable_file: true,
        enable_console: false,
        utc_time: true,
        ..Config::default()
    };
    let logger = Logger::new(&config).expect("build logger");
    assert!(path.parent().unwrap().is_dir());

    logger.debug("suppressed");
    logger.info("suppressed");
    logger.flush().expect("flush");
    assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);

    logger.warn("kept");
    logger.error("kept too");
    logger.flush().expect("flush");

    let lines = read_json_lines(&path);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["level"], "warn");
    assert_eq!(lines[1]["level"], "error");
}

#[test]
fn test_to_console_never_reaches_file() {
    let dir = TempDir::new().expect("temp dir");
    let config = file_only_config(&dir, "debug");
    let logger = Logger::new(&config).expect("build logger");
    let path = dir.path().join("app.log");

    logger.debug_to_console("console bound");
    logger.warn_to_console("console bound");
    logger.flush().expect("flush");
    assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);

    logger.info_to_file("file bound");
    logger.flush().expect("flush");
    assert_eq!(read_json_lines(&path).len(), 1);
}

#[test]
fn test_typed_field_table_on_emitted_record() {
    let dir = TempDir::new().expect("temp dir");
    let logger = Logger::new(&file_only_config(&dir, "debug")).expect("build logger");

    let ip: IpAddr = "192.168.56.101".parse().unwrap();
    let net: ipnet::IpNet = "10.0.0.0/8".parse().unwrap();
    let mac = macaddr::MacAddr6::new(0x00, 0x1b, 0x44, 0x11, 0x3a, 0xb7);
    let err = std::io::Error::new(std::io::ErrorKind::Other, "upstream timeout");

    #[derive(serde::Serialize)]
    struct User {
        name: String,
    }

    logger
        .with("str", "text")
        .with("strs", vec!["a", "b"])
        .with("flag", true)
        .with("flags", vec![true, false])
        .with("int", -42i32)
        .with("ints", vec![1i64, 2, 3])
        .with("uint", 7u64)
        .with("uints", vec![9u32, 8])
        .with("float", 2.5f64)
        .with("floats", vec![1.0f32, 0.5])
        .with("payload", vec![0xdeu8, 0xad])
        .with("elapsed", Duration::from_millis(1500))
        .with("timeouts", vec![Duration::from_secs(1), Duration::from_secs(2)])
        .with("ip", ip)
        .with("cidr", net)
        .with("mac", mac)
        .with("cause", FieldValue::error(&err))
        .with_display("peer", &ip)
        .with_any("user", &User {
            name: "cody".to_string(),
        })
        .info_to_file("all types");
    logger.flush().expect("flush");

    let lines = read_json_lines(&dir.path().join("app.log"));
    assert_eq!(lines.len(), 1);
    let record = &lines[0];

    assert_eq!(record["str"], "text");
    assert_eq!(record["strs"], serde_json::json!(["a", "b"]));
    assert_eq!(record["flag"], true);
    assert_eq!(record["flags"], serde_json::json!([true, false]));
    assert_eq!(record["int"], -42);
    assert_eq!(record["ints"], serde_json::json!([1, 2, 3]));
    assert_eq!(record["uint"], 7);
    assert_eq!(record["uints"], serde_json::json!([9, 8]));
    assert_eq!(record["float"], 2.5);
    assert_eq!(record["floats"], serde_json::json!([1.0, 0.5]));
    assert_eq!(record["payload"], "dead");
    assert_eq!(record["elapsed"], "1s 500ms");
    assert_eq!(record["timeouts"], serde_json::json!(["1s", "2s"]));
    assert_eq!(record["ip"], "192.168.56.101");
    assert_eq!(record["cidr"], "10.0.0.0/8");
    assert_eq!(record["mac"], mac.to_string().as_str());
    assert_eq!(record["cause"], "upstream timeout");
    assert_eq!(record["peer"], "192.168.56.101");
    assert_eq!(record["user"], serde_json::json!({"name": "cody"}));

    // record shape basics
    assert_eq!(record["level"], "info");
    assert_eq!(record["message"], "all types");
    assert!(record["time"].is_string());
}

#[test]
fn test_fields_emitted_in_chain_order() {
    let dir = TempDir::new().expect("temp dir");
    let logger = Logger::new(&file_only_config(&dir, "debug")).expect("build logger");

    logger
        .with("zulu", 1)
        .with("alpha", 2)
        .with("mike", 3)
        .info_to_file("ordered");
    logger.flush().expect("flush");

    let raw = std::fs::read_to_string(dir.path().join("app.log")).unwrap();
    let zulu = raw.find("\"zulu\"").unwrap();
    let alpha = raw.find("\"alpha\"").unwrap();
    let mike = raw.find("\"mike\"").unwrap();
    assert!(zulu < alpha && alpha < mike);
}

#[test]
fn test_hooks_and_context_sugar() {
    let dir = TempDir::new().expect("temp dir");
    let logger = Logger::new(&file_only_config(&dir, "debug")).expect("build logger");

    struct User {
        name: String,
    }

    impl opskit::Hook for User {
        fn run(&self, event: &mut opskit::Record, _level: Level, _message: &str) {
            event.push("name", self.name.clone());
        }
    }

    let hook_err = std::io::Error::new(std::io::ErrorKind::Other, "hook error");
    logger
        .with_sender("example")
        .with_request_id("cb12e64d-86af-4447-b66c-40c26a2e14f2")
        .with_hook(User {
            name: "cody".to_string(),
        })
        .with_hook_fn(move |event: &mut opskit::Record, _level: Level, _message: &str| {
            event.push_error(&hook_err);
        })
        .info_to_file("");
    logger.flush().expect("flush");

    let lines = read_json_lines(&dir.path().join("app.log"));
    let record = &lines[0];
    assert_eq!(record["sender"], "example");
    assert_eq!(record["request_id"], "cb12e64d-86af-4447-b66c-40c26a2e14f2");
    assert_eq!(record["name"], "cody");
    assert_eq!(record["error"], "hook error");
    // empty message is omitted entirely
    assert!(record.get("message").is_none());
}

#[test]
fn test_formatting_macros() {
    let dir = TempDir::new().expect("temp dir");
    let logger = Logger::new(&file_only_config(&dir, "debug")).expect("build logger");

    opskit::info!(logger, "listening on port {}", 8080);
    opskit::error!(logger, "failed after {} retries", 3);
    logger.flush().expect("flush");

    let lines = read_json_lines(&dir.path().join("app.log"));
    assert_eq!(lines[0]["message"], "listening on port 8080");
    assert_eq!(lines[1]["message"], "failed after 3 retries");
    assert_eq!(lines[1]["level"], "error");
}

#[test]
fn test_instance_caller_attribution() {
    let dir = TempDir::new().expect("temp dir");
    let logger = Logger::new(&file_only_config(&dir, "debug")).expect("build logger");

    let line = line!() + 1;
    logger.with_caller().warn("direct call");
    logger.flush().expect("flush");

    let lines = read_json_lines(&dir.path().join("app.log"));
    let caller = lines[0]["caller"].as_str().unwrap();
    assert!(
        caller.ends_with(&format!("integration_tests.rs:{}", line)),
        "caller was {}",
        caller
    );
}

#[test]
fn test_custom_time_format_applied() {
    let dir = TempDir::new().expect("temp dir");
    let mut config = file_only_config(&dir, "debug");
    config.time_format = "%Y/%m/%d".to_string();
    let logger = Logger::new(&config).expect("build logger");

    logger.info_to_file("dated");
    logger.flush().expect("flush");

    let lines = read_json_lines(&dir.path().join("app.log"));
    let time = lines[0]["time"].as_str().unwrap();
    assert_eq!(time.len(), 10);
    assert_eq!(time.matches('/').count(), 2);
}
