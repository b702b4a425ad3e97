//! Shared utilities for integration testing.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use identity_hello::identity::RequestIdentifier;
use identity_hello::{HttpServer, ServiceConfig, Shutdown};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio_rustls::rustls::pki_types::{PrivateKeyDer, PrivatePkcs8KeyDer};
use tokio_rustls::rustls::{self, ServerConfig};
use tokio_rustls::TlsAcceptor;

/// Identifier every test server reports.
pub const TEST_ID: RequestIdentifier = RequestIdentifier::from_raw(8_675_309);

/// Zowe status document carrying `username`.
pub fn status_body(username: &str) -> String {
    format!(
        r#"{{"categories":{{"zss":{{"success":true,"plugins":{{"org.zowe.zlux.auth.zss":{{"success":true,"username":"{username}","expms":36000000}}}}}}}},"success":true}}"#
    )
}

/// A mock upstream and the raw request heads it has received.
pub struct MockUpstream {
    pub addr: SocketAddr,
    scheme: &'static str,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockUpstream {
    pub fn base_url(&self) -> String {
        format!("{}://{}", self.scheme, self.addr)
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Start a mock upstream that returns a fixed status and body.
pub async fn start_mock_upstream(status: u16, body: impl Into<String>) -> MockUpstream {
    let body = body.into();
    start_programmable_upstream(move || {
        let body = body.clone();
        async move { (status, body) }
    })
    .await
}

/// Start a programmable mock upstream with async support.
pub async fn start_programmable_upstream<F, Fut>(f: F) -> MockUpstream
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    spawn_upstream(None, f).await
}

/// Start an HTTPS mock upstream whose self-signed certificate names
/// `wrong.example`, so it fails both chain and hostname verification.
pub async fn start_untrusted_tls_upstream(status: u16, body: impl Into<String>) -> MockUpstream {
    let body = body.into();
    spawn_upstream(Some(self_signed_acceptor("wrong.example")), move || {
        let body = body.clone();
        async move { (status, body) }
    })
    .await
}

fn self_signed_acceptor(host: &str) -> TlsAcceptor {
    let certified = rcgen::generate_simple_self_signed(vec![host.to_string()]).unwrap();
    let key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(certified.key_pair.serialize_der()));

    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let config = ServerConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .unwrap()
        .with_no_client_auth()
        .with_single_cert(vec![certified.cert.der().clone()], key)
        .unwrap();
    TlsAcceptor::from(Arc::new(config))
}

async fn spawn_upstream<F, Fut>(tls: Option<TlsAcceptor>, f: F) -> MockUpstream
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let scheme = if tls.is_some() { "https" } else { "http" };
    let f = Arc::new(f);

    let seen = requests.clone();
    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            let f = f.clone();
            let seen = seen.clone();
            let tls = tls.clone();
            tokio::spawn(async move {
                match tls {
                    Some(acceptor) => {
                        // A client that rejects the certificate aborts here.
                        if let Ok(stream) = acceptor.accept(socket).await {
                            answer(stream, f, seen).await;
                        }
                    }
                    None => answer(socket, f, seen).await,
                }
            });
        }
    });

    MockUpstream {
        addr,
        scheme,
        requests,
    }
}

async fn answer<S, F, Fut>(mut stream: S, f: Arc<F>, seen: Arc<Mutex<Vec<String>>>)
where
    S: AsyncRead + AsyncWrite + Unpin,
    F: Fn() -> Fut,
    Fut: Future<Output = (u16, String)>,
{
    let head = read_request_head(&mut stream).await;
    seen.lock().unwrap().push(head);

    let (status, body) = f().await;
    let status_text = match status {
        200 => "200 OK",
        401 => "401 Unauthorized",
        404 => "404 Not Found",
        500 => "500 Internal Server Error",
        503 => "503 Service Unavailable",
        _ => "200 OK",
    };

    let response_str = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_text,
        body.len(),
        body
    );
    let _ = stream.write_all(response_str.as_bytes()).await;
    let _ = stream.shutdown().await;
}

async fn read_request_head<S: AsyncRead + Unpin>(stream: &mut S) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                buf.extend_from_slice(&chunk[..n]);
                if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// An address nothing listens on.
pub fn closed_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Config pointing at `base_url` with a short upstream deadline.
pub fn config_for(base_url: &str) -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.upstream.base_url = base_url.to_string();
    config.upstream.timeout_secs = 2;
    config.upstream.connect_timeout_secs = 1;
    config
}

/// A running service bound to a random local port.
pub struct TestService {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl TestService {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestService {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub async fn start_service(config: ServiceConfig) -> TestService {
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::with_identifier(config, TEST_ID).unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    TestService { addr, shutdown }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
