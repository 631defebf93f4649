/*!
 # Proxy Runner

 A Rust library for launching and supervising a local proxy server process.

 ## Overview

 Proxy Runner provides functionality to:
 - Locate an externally-installed proxy server binary
 - Launch it with its output captured to a log file
 - Wait until it accepts TCP connections, with bounded retries
 - Create logical proxy sessions against a running server
 - Tear the process down reliably, including descendants it spawned

 ## Basic Usage

 ```no_run
 use proxy_runner::{ProxyServer, Result};
 use proxy_runner::config::{ServerConfig, StartOptions};
 use std::collections::HashMap;

 #[tokio::main]
 async fn main() -> Result<()> {
     // Describe the server to launch
     let config = ServerConfig::new("browserup-proxy");

     // Resolve the binary; fails fast when it isn't installed
     let mut server = ProxyServer::new(config)?;

     // Launch and wait until the port accepts connections
     server.start(StartOptions::default()).await?;

     // Create a session for the out-of-scope session client
     let mut params = HashMap::new();
     params.insert("trustAllServers".to_string(), "true".to_string());
     let session = server.create_session(params);
     println!("Session {} at {}", session.id(), session.host_port());

     // Kill the process and clean up anything it left behind
     server.stop().await?;

     Ok(())
 }
 ```

 Connecting to a server some other process manages:

 ```no_run
 use proxy_runner::RemoteServer;

 #[tokio::main]
 async fn main() {
     let remote = RemoteServer::new("localhost", 8080);
     if remote.is_listening().await {
         let session = remote.create_session(Default::default());
         println!("Attached session at {}", session.host_port());
     }
 }
 ```

 ## Features

 - **Binary Location**: Search-path resolution with platform suffix handling
 - **Process Supervision**: Log-file redirection, process-group launch
 - **Readiness Polling**: TCP probing instead of sleep-and-hope startup delays
 - **Reliable Teardown**: Group signaling, with a listener sweep on platforms
   that cannot signal a whole process tree
 - **Error Handling**: Comprehensive error handling
 - **Async Support**: Full async/await support

 ## License

 This project is licensed under the terms of the MIT license.
*/

pub mod config;
pub mod error;
pub mod locate;
pub mod server;
pub mod session;

pub use config::{Config, ServerConfig, StartOptions};
pub use error::{Error, Result};
pub use locate::BinaryLocator;
pub use server::{ProxyServer, RemoteServer, ServerStatus};
pub use session::{ProxySession, SessionId};
