//! Minimal memcached client speaking the text protocol `set` command.
//!
//! Connections are pooled per backend; a connection is returned to the
//! pool only after a clean `STORED` reply, so a timed-out or broken
//! connection is never reused.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufStream};
use tokio::net::TcpStream;
use tracing::{debug, warn};

use super::error::StorageError;
use super::traits::KvBackend;

/// Per-write timeout covering connect, send and reply
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Idle connections kept per backend
pub const DEFAULT_MAX_IDLE_CONNS: usize = 10;

const MAX_KEY_LEN: usize = 250;

type Connection = BufStream<TcpStream>;

/// Pooled memcached connection handle for one backend address
pub struct MemcacheClient {
    addr: String,
    idle: Mutex<Vec<Connection>>,
    max_idle: usize,
    timeout: Duration,
}

impl MemcacheClient {
    /// Create a client; no connection is made until the first write
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            idle: Mutex::new(Vec::new()),
            max_idle: DEFAULT_MAX_IDLE_CONNS,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_idle(mut self, max_idle: usize) -> Self {
        self.max_idle = max_idle;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Number of pooled idle connections
    pub fn idle_connections(&self) -> usize {
        self.idle_pool().len()
    }

    /// Lock the idle pool, recovering it if a holder panicked
    ///
    /// The pool is a plain list of connections, so a poisoned lock still
    /// guards a consistent value.
    fn idle_pool(&self) -> MutexGuard<'_, Vec<Connection>> {
        self.idle.lock().unwrap_or_else(|poisoned| {
            warn!(addr = %self.addr, "Idle connection pool lock poisoned, recovering");
            self.idle.clear_poison();
            poisoned.into_inner()
        })
    }

    fn checkout(&self) -> Option<Connection> {
        self.idle_pool().pop()
    }

    fn checkin(&self, conn: Connection) {
        let mut idle = self.idle_pool();
        if idle.len() < self.max_idle {
            idle.push(conn);
        }
    }

    async fn connect(&self) -> std::io::Result<Connection> {
        debug!(addr = %self.addr, "Opening memcached connection");
        let stream = TcpStream::connect(&self.addr).await?;
        stream.set_nodelay(true)?;
        Ok(BufStream::new(stream))
    }

    async fn set(&self, key: &str, value: &[u8]) -> std::io::Result<()> {
        let mut conn = match self.checkout() {
            Some(conn) => conn,
            None => self.connect().await?,
        };

        let header = format!("set {} 0 0 {}\r\n", key, value.len());
        conn.write_all(header.as_bytes()).await?;
        conn.write_all(value).await?;
        conn.write_all(b"\r\n").await?;
        conn.flush().await?;

        let mut reply = String::new();
        if conn.read_line(&mut reply).await? == 0 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "connection closed by server",
            ));
        }

        match reply.trim_end() {
            "STORED" => {
                self.checkin(conn);
                Ok(())
            }
            other => Err(std::io::Error::other(format!("unexpected reply: {other}"))),
        }
    }
}

fn validate_key(key: &str) -> Result<(), &'static str> {
    if key.is_empty() || key.len() > MAX_KEY_LEN {
        return Err("key length out of range");
    }
    if key.bytes().any(|b| b.is_ascii_whitespace() || b.is_ascii_control()) {
        return Err("key contains whitespace or control characters");
    }
    Ok(())
}

#[async_trait]
impl KvBackend for MemcacheClient {
    fn addr(&self) -> &str {
        &self.addr
    }

    async fn put(&self, key: &str, value: Bytes) -> Result<(), StorageError> {
        validate_key(key).map_err(|reason| StorageError::backend_write(&self.addr, reason))?;

        match tokio::time::timeout(self.timeout, self.set(key, &value)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(StorageError::backend_write(&self.addr, e)),
            Err(_) => Err(StorageError::backend_write(
                &self.addr,
                format!("timed out after {:?}", self.timeout),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    /// Accept one connection and answer every `set` with `reply`
    async fn fake_server(reply: &'static str) -> (String, tokio::task::JoinHandle<Vec<u8>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                received.extend_from_slice(&buf[..n]);
                let line_ends = received.windows(2).filter(|w| *w == b"\r\n").count();
                if line_ends >= 2 {
                    socket.write_all(reply.as_bytes()).await.unwrap();
                    break;
                }
            }
            received
        });

        (addr, handle)
    }

    #[tokio::test]
    async fn stores_with_set_command() {
        let (addr, server) = fake_server("STORED\r\n").await;
        let client = MemcacheClient::new(addr);

        client.put("idfa:abc", Bytes::from_static(b"xyz")).await.unwrap();

        let received = server.await.unwrap();
        assert_eq!(received, b"set idfa:abc 0 0 3\r\nxyz\r\n");
        assert_eq!(client.idle_connections(), 1);
    }

    #[tokio::test]
    async fn poisoned_pool_still_reuses_connections() {
        let (addr, server) = fake_server("STORED\r\n").await;
        let client = MemcacheClient::new(addr);

        std::thread::scope(|s| {
            let holder = s.spawn(|| {
                let _idle = client.idle.lock().unwrap();
                panic!("pool holder failed");
            });
            assert!(holder.join().is_err());
        });
        assert!(client.idle.is_poisoned());

        client.put("gaid:1", Bytes::from_static(b"v")).await.unwrap();

        server.await.unwrap();
        assert_eq!(client.idle_connections(), 1);
        assert!(!client.idle.is_poisoned());
    }

    #[tokio::test]
    async fn unexpected_reply_is_write_error() {
        let (addr, _server) = fake_server("SERVER_ERROR out of memory\r\n").await;
        let client = MemcacheClient::new(addr.clone());

        let err = client.put("k", Bytes::from_static(b"v")).await.unwrap_err();
        match err {
            StorageError::BackendWrite { addr: failed, reason } => {
                assert_eq!(failed, addr);
                assert!(reason.contains("SERVER_ERROR"));
            }
            other => panic!("Expected BackendWrite, got {other:?}"),
        }
        assert_eq!(client.idle_connections(), 0);
    }

    #[tokio::test]
    async fn silent_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let _server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
            drop(socket);
        });

        let client = MemcacheClient::new(addr).with_timeout(Duration::from_millis(50));
        let err = client.put("k", Bytes::from_static(b"v")).await.unwrap_err();

        assert!(err.to_string().contains("timed out"));
    }

    #[tokio::test]
    async fn refused_connection_is_write_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        drop(listener);

        let client = MemcacheClient::new(addr);
        let result = client.put("k", Bytes::from_static(b"v")).await;
        assert!(matches!(result, Err(StorageError::BackendWrite { .. })));
    }

    #[test]
    fn rejects_invalid_keys() {
        assert!(validate_key("idfa:abc").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("has space").is_err());
        assert!(validate_key(&"k".repeat(MAX_KEY_LEN + 1)).is_err());
    }
}
