//! Shared utilities for integration testing.

use async_trait::async_trait;
use serde_json::{json, Value};
use solana_instruction::Instruction;
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use gasless_transfer::transfer::{SignAndSubmit, SubmitError, TransactionOptions};

/// Answer for one JSON-RPC call: `Ok(result)` or `Err((code, message))`.
pub type RpcReply = Result<Value, (i64, String)>;

/// Start a mock JSON-RPC node on an ephemeral port.
///
/// `handler` receives the method name and params of each request.
#[allow(dead_code)]
pub async fn start_mock_rpc<F>(handler: F) -> SocketAddr
where
    F: Fn(&str, &Value) -> RpcReply + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handler = Arc::new(handler);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let handler = handler.clone();
                    tokio::spawn(async move {
                        let _ = serve_one(socket, handler.as_ref()).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start a server that accepts connections and never answers.
#[allow(dead_code)]
pub async fn start_silent_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    addr
}

async fn serve_one<F>(mut socket: TcpStream, handler: &F) -> std::io::Result<()>
where
    F: Fn(&str, &Value) -> RpcReply + ?Sized,
{
    let body = read_request_body(&mut socket).await?;
    let request: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let method = request["method"].as_str().unwrap_or_default();
    let id = request["id"].clone();

    let response = match handler(method, &request["params"]) {
        Ok(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
        Err((code, message)) => json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": { "code": code, "message": message },
        }),
    };
    let payload = response.to_string();

    let response_str = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        payload.len(),
        payload
    );
    socket.write_all(response_str.as_bytes()).await?;
    socket.shutdown().await?;
    tokio::time::sleep(Duration::from_millis(10)).await;
    Ok(())
}

async fn read_request_body(socket: &mut TcpStream) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            return Ok(Vec::new());
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let headers = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
    let content_length = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    Ok(buf[header_end..].to_vec())
}

/// Signer that replays scripted results and records every call.
#[allow(dead_code)]
pub struct ScriptedSigner {
    script: Mutex<VecDeque<Result<String, SubmitError>>>,
    calls: Mutex<Vec<(Vec<Instruction>, TransactionOptions)>>,
    delay: Duration,
}

#[allow(dead_code)]
impl ScriptedSigner {
    pub fn new(script: Vec<Result<String, SubmitError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: Mutex::new(Vec::new()),
            delay: Duration::ZERO,
        }
    }

    /// Each call takes `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<(Vec<Instruction>, TransactionOptions)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SignAndSubmit for ScriptedSigner {
    async fn sign_and_submit(
        &self,
        instructions: Vec<Instruction>,
        options: &TransactionOptions,
    ) -> Result<String, SubmitError> {
        self.calls
            .lock()
            .unwrap()
            .push((instructions, options.clone()));
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(SubmitError::unclassified("script exhausted")))
    }
}
