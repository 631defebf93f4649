use proxy_runner::config::{ServerConfig, StartOptions};
use proxy_runner::error::Error;
use proxy_runner::server::{ProxyServer, RemoteServer, ServerStatus};
use std::net::TcpListener;
use std::path::Path;
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Reserve a port that is free right now.
fn free_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

#[cfg(unix)]
fn write_stub(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[cfg(unix)]
fn server_for_stub(stub: &Path, port: u16) -> ProxyServer {
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port,
        ..ServerConfig::new(stub.display().to_string())
    };
    ProxyServer::new(config).unwrap()
}

fn fast_options(dir: &Path, retry_interval_ms: u64, max_retries: u32) -> StartOptions {
    StartOptions {
        log_directory: dir.to_path_buf(),
        retry_interval_ms,
        max_retries,
        ..StartOptions::default()
    }
}

#[tokio::test]
async fn test_unresolvable_command_fails_at_construction() {
    let config = ServerConfig::new("definitely-not-an-installed-proxy");
    let err = ProxyServer::new(config).unwrap_err();
    assert!(matches!(err, Error::BinaryNotFound(_)));
}

#[tokio::test]
async fn test_invalid_port_fails_at_construction() {
    let config = ServerConfig {
        port: 0,
        ..ServerConfig::new("browserup-proxy")
    };
    let err = ProxyServer::new(config).unwrap_err();
    assert!(matches!(err, Error::ConfigInvalid(_)));
}

#[tokio::test]
async fn test_is_listening_reflects_listener_state() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let remote = RemoteServer::new("127.0.0.1", port);

    assert!(remote.is_listening().await);

    drop(listener);
    assert!(!remote.is_listening().await);
}

#[cfg(unix)]
#[tokio::test]
async fn test_stop_before_start_is_a_noop() {
    let dir = TempDir::new().unwrap();
    let stub = write_stub(dir.path(), "proxy-stub", "#!/bin/sh\nsleep 30\n");
    let mut server = server_for_stub(&stub, free_port());

    assert_eq!(server.status(), ServerStatus::Stopped);
    server.stop().await.unwrap();
    assert_eq!(server.status(), ServerStatus::Stopped);
}

#[cfg(unix)]
#[tokio::test]
async fn test_immediate_exit_is_a_fast_startup_failure() {
    let dir = TempDir::new().unwrap();
    let stub = write_stub(dir.path(), "proxy-stub", "#!/bin/sh\necho boom >&2\nexit 1\n");
    let mut server = server_for_stub(&stub, free_port());

    // generous budget: the failure must be detected long before it runs out
    let started = Instant::now();
    let err = server
        .start(fast_options(dir.path(), 50, 100))
        .await
        .unwrap_err();

    assert!(matches!(
        &err,
        Error::StartupFailure { log_file } if log_file.contains("server.log")
    ));
    assert!(started.elapsed() < Duration::from_secs(3));
    assert_eq!(server.status(), ServerStatus::Failed);

    // stderr was redirected into the log file
    let log = std::fs::read_to_string(dir.path().join("server.log")).unwrap();
    assert!(log.contains("boom"));

    // nothing is owned afterwards, so stop stays a no-op
    server.stop().await.unwrap();
}

#[cfg(unix)]
#[tokio::test]
async fn test_startup_timeout_kills_the_half_started_process() {
    let dir = TempDir::new().unwrap();
    let pidfile = dir.path().join("stub.pid");
    let stub = write_stub(
        dir.path(),
        "proxy-stub",
        &format!("#!/bin/sh\necho $$ > {}\nsleep 30\n", pidfile.display()),
    );
    let mut server = server_for_stub(&stub, free_port());

    let err = server
        .start(fast_options(dir.path(), 20, 5))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::StartupTimeout { attempts: 5, .. }));
    assert_eq!(server.status(), ServerStatus::Failed);

    // the stub ran long enough to record its pid before the budget ran out
    let pid = std::fs::read_to_string(&pidfile).unwrap();
    let alive = std::process::Command::new("sh")
        .arg("-c")
        .arg(format!("kill -0 {}", pid.trim()))
        .status()
        .unwrap()
        .success();
    assert!(!alive, "stub process survived the automatic stop");

    // the handle was released by the automatic stop
    server.stop().await.unwrap();
}

#[cfg(unix)]
#[tokio::test]
async fn test_start_waits_for_delayed_listener() {
    init_tracing();

    let dir = TempDir::new().unwrap();
    let stub = write_stub(dir.path(), "proxy-stub", "#!/bin/sh\nsleep 30\n");
    let port = free_port();
    let mut server = server_for_stub(&stub, port);

    // External listener standing in for the proxy opening its port a little
    // after launch.
    let (tx, rx) = std::sync::mpsc::channel::<()>();
    let listener_thread = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(20));
        let listener = TcpListener::bind(("127.0.0.1", port)).unwrap();
        let _ = rx.recv();
        drop(listener);
    });

    let started = Instant::now();
    server.start(fast_options(dir.path(), 10, 50)).await.unwrap();

    // the port opened ~20ms in, so at least one retry round happened
    assert!(started.elapsed() >= Duration::from_millis(20));
    assert!(started.elapsed() < Duration::from_secs(1));
    assert_eq!(server.status(), ServerStatus::Running);
    assert!(server.pid().is_some());
    assert!(server.is_listening().await);

    // a second start on a running server is refused
    let err = server
        .start(fast_options(dir.path(), 10, 5))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::AlreadyRunning));
    assert_eq!(server.status(), ServerStatus::Running);

    server.stop().await.unwrap();
    assert_eq!(server.status(), ServerStatus::Stopped);
    assert!(server.pid().is_none());

    // stopping twice produces no second kill attempt and no error
    server.stop().await.unwrap();
    assert_eq!(server.status(), ServerStatus::Stopped);

    tx.send(()).unwrap();
    listener_thread.join().unwrap();
}
