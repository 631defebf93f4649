use proxy_runner::RemoteServer;
use std::collections::HashMap;

#[test]
fn test_session_carries_host_port_and_params() {
    let remote = RemoteServer::new("localhost", 8080);

    let mut params = HashMap::new();
    params.insert("httpProxy".to_string(), "upstream:3128".to_string());
    params.insert("trustAllServers".to_string(), "true".to_string());

    let session = remote.create_session(params.clone());

    assert_eq!(session.host_port(), "localhost:8080");
    assert_eq!(session.params(), &params);
}

#[test]
fn test_sessions_have_distinct_ids() {
    let remote = RemoteServer::new("localhost", 8080);

    let first = remote.create_session(HashMap::new());
    let second = remote.create_session(HashMap::new());

    assert_ne!(first.id(), second.id());
}

#[test]
fn test_address_formatting() {
    let remote = RemoteServer::new("proxy.internal", 9090);

    assert_eq!(remote.host(), "proxy.internal");
    assert_eq!(remote.port(), 9090);
    assert_eq!(remote.host_port(), "proxy.internal:9090");
    assert_eq!(remote.url(), "http://proxy.internal:9090");
}
