//! Upload client for the pastexen server.
//!
//! One upload walks `Idle → Connecting → SendingHeader → SendingPayload →
//! AwaitingResponse` and ends in `Completed`, `Failed` or `Cancelled`.
//! Nothing is retried here; retry policy belongs to the caller.

use crate::{
    ProtocolError, UploadError, UploadRequest, UploadResult, encode_header, parse_response,
    upload::{MAX_RESPONSE_BYTES, response_complete},
};

use std::{future::Future, io, net::SocketAddr, panic::Location, time::Duration};

use error_location::ErrorLocation;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
    sync::{oneshot, watch},
};
use tracing::{debug, info, instrument, warn};

const DEFAULT_HOST: &str = "pastexen.com";
const DEFAULT_PORT: u16 = 9876;

// Payload is written in slices so the write limit bounds stalls, not total transfer time.
const WRITE_CHUNK_BYTES: usize = 64 * 1024;

/// Server address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Host name, resolved on every upload.
    pub host: String,
    /// TCP port.
    pub port: u16,
}

impl Default for Endpoint {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Time limits for one upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadTimeouts {
    /// Name resolution plus TCP connect.
    pub connect: Duration,
    /// Longest the server may stall a single write of the request.
    pub write: Duration,
    /// From the last payload byte written to the full response.
    pub response: Duration,
}

impl Default for UploadTimeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(10),
            write: Duration::from_secs(30),
            response: Duration::from_secs(30),
        }
    }
}

/// Progress of one upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadState {
    /// Not started.
    Idle,
    /// Resolving and connecting.
    Connecting,
    /// Writing the header block.
    SendingHeader,
    /// Writing the payload.
    SendingPayload,
    /// Waiting for the server's reply.
    AwaitingResponse,
    /// Finished with this link.
    Completed(String),
    /// Finished with this error message.
    Failed(String),
    /// Cancelled by the caller.
    Cancelled,
}

impl UploadState {
    /// Whether the upload has finished.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            UploadState::Completed(_) | UploadState::Failed(_) | UploadState::Cancelled
        )
    }
}

/// Handle on an upload started with [`UploadClient::spawn_upload`].
///
/// Dropping the handle does not cancel the upload.
pub struct UploadHandle {
    state_rx: watch::Receiver<UploadState>,
    result_rx: oneshot::Receiver<UploadResult>,
    cancel_tx: Option<oneshot::Sender<()>>,
}

impl UploadHandle {
    /// Latest state.
    pub fn state(&self) -> UploadState {
        self.state_rx.borrow().clone()
    }

    /// Receiver for state changes.
    pub fn subscribe(&self) -> watch::Receiver<UploadState> {
        self.state_rx.clone()
    }

    /// Close the connection and finish with [`UploadError::Cancelled`].
    ///
    /// No effect if the upload already finished or was cancelled.
    pub fn cancel(&mut self) {
        if let Some(cancel_tx) = self.cancel_tx.take() {
            let _ = cancel_tx.send(());
        }
    }

    /// Wait for the outcome.
    pub async fn result(self) -> UploadResult {
        match self.result_rx.await {
            Ok(result) => result,
            // Task dropped without reporting, e.g. runtime shutting down.
            Err(_) => Err(UploadError::Cancelled {
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

/// Client for one fixed endpoint.
#[derive(Debug, Clone)]
pub struct UploadClient {
    endpoint: Endpoint,
    timeouts: UploadTimeouts,
}

impl UploadClient {
    /// Create a client.
    pub fn new(endpoint: Endpoint, timeouts: UploadTimeouts) -> Self {
        Self { endpoint, timeouts }
    }

    /// Target endpoint.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Upload and wait for the link.
    pub async fn upload(&self, request: UploadRequest) -> UploadResult {
        let (state_tx, _state_rx) = watch::channel(UploadState::Idle);
        self.perform(request, &state_tx).await
    }

    /// Start an upload in the background and return immediately.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn_upload(&self, request: UploadRequest) -> UploadHandle {
        let (state_tx, state_rx) = watch::channel(UploadState::Idle);
        let (result_tx, result_rx) = oneshot::channel();
        let (cancel_tx, cancel_rx) = oneshot::channel::<()>();
        let client = self.clone();

        tokio::spawn(async move {
            let result = tokio::select! {
                result = client.perform(request, &state_tx) => result,
                // A dropped sender disables this branch instead of cancelling.
                Ok(()) = cancel_rx => {
                    info!("Upload cancelled");
                    state_tx.send_replace(UploadState::Cancelled);
                    Err(UploadError::Cancelled {
                        location: ErrorLocation::from(Location::caller()),
                    })
                }
            };

            let _ = result_tx.send(result);
        });

        UploadHandle {
            state_rx,
            result_rx,
            cancel_tx: Some(cancel_tx),
        }
    }

    #[instrument(
        skip(self, request, state_tx),
        fields(
            host = %self.endpoint.host,
            port = self.endpoint.port,
            kind = %request.kind(),
            size = request.declared_size()
        )
    )]
    async fn perform(
        &self,
        request: UploadRequest,
        state_tx: &watch::Sender<UploadState>,
    ) -> UploadResult {
        let result = self.exchange(&request, state_tx).await;

        match &result {
            Ok(url) => {
                info!(url = %url, "Upload complete");
                state_tx.send_replace(UploadState::Completed(url.clone()));
            }
            Err(e) => {
                warn!(error = %e, "Upload failed");
                state_tx.send_replace(UploadState::Failed(e.to_string()));
            }
        }

        result
    }

    async fn exchange(
        &self,
        request: &UploadRequest,
        state_tx: &watch::Sender<UploadState>,
    ) -> UploadResult {
        state_tx.send_replace(UploadState::Connecting);
        let mut stream = self.connect().await?;

        state_tx.send_replace(UploadState::SendingHeader);
        let header = encode_header(request.kind(), request.declared_size());
        within(self.timeouts.write, "write header", stream.write_all(&header)).await?;
        debug!(header_len = header.len(), "Header sent");

        state_tx.send_replace(UploadState::SendingPayload);
        for chunk in request.payload().chunks(WRITE_CHUNK_BYTES) {
            within(self.timeouts.write, "write payload", stream.write_all(chunk)).await?;
        }
        within(self.timeouts.write, "flush", stream.flush()).await?;
        debug!(payload_len = request.payload().len(), "Payload sent");

        state_tx.send_replace(UploadState::AwaitingResponse);
        let mut response = Vec::new();
        match tokio::time::timeout(
            self.timeouts.response,
            read_response(&mut stream, &mut response),
        )
        .await
        {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(network_error("response", e)),
            Err(_) if response.is_empty() => {
                return Err(network_error(
                    "response",
                    io::Error::new(io::ErrorKind::TimedOut, "response timed out"),
                ));
            }
            // The server may leave the connection open after its last line.
            Err(_) => debug!(
                response_len = response.len(),
                "Response timed out, parsing what arrived"
            ),
        }
        debug!(response_len = response.len(), "Response received");

        if response.len() >= MAX_RESPONSE_BYTES && !response_complete(&response) {
            return Err(ProtocolError::MalformedResponse {
                reason: format!(
                    "response exceeds {} bytes without terminator",
                    MAX_RESPONSE_BYTES
                ),
                location: ErrorLocation::from(Location::caller()),
            }
            .into());
        }

        parse_response(&response).map_err(UploadError::from)
    }

    async fn connect(&self) -> Result<TcpStream, UploadError> {
        let target = (self.endpoint.host.as_str(), self.endpoint.port);

        let addrs: Vec<SocketAddr> = within(self.timeouts.connect, "resolve", async {
            tokio::net::lookup_host(target)
                .await
                .map(|found| found.collect::<Vec<_>>())
        })
        .await?;

        let mut last_error =
            io::Error::new(io::ErrorKind::NotFound, "host resolved to no addresses");

        for addr in addrs {
            match tokio::time::timeout(self.timeouts.connect, TcpStream::connect(addr)).await {
                Ok(Ok(stream)) => {
                    debug!(addr = %addr, "Connected");
                    return Ok(stream);
                }
                Ok(Err(e)) => {
                    debug!(addr = %addr, error = %e, "Connect attempt failed");
                    last_error = e;
                }
                Err(_) => {
                    debug!(addr = %addr, "Connect attempt timed out");
                    last_error = io::Error::new(io::ErrorKind::TimedOut, "connect timed out");
                }
            }
        }

        Err(network_error("connect", last_error))
    }
}

/// Append to `response` until the server closes, sends a blank line, or the size cap is hit.
///
/// Bytes already read stay in `response` if the future is dropped.
async fn read_response(stream: &mut TcpStream, response: &mut Vec<u8>) -> io::Result<()> {
    let mut chunk = [0u8; 4096];

    loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        response.extend_from_slice(&chunk[..n]);

        if response_complete(response) || response.len() >= MAX_RESPONSE_BYTES {
            return Ok(());
        }
    }
}

async fn within<T, F>(limit: Duration, step: &str, fut: F) -> Result<T, UploadError>
where
    F: Future<Output = io::Result<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(network_error(step, e)),
        Err(_) => Err(network_error(
            step,
            io::Error::new(io::ErrorKind::TimedOut, format!("{} timed out", step)),
        )),
    }
}

#[track_caller]
fn network_error(step: &str, source: io::Error) -> UploadError {
    UploadError::Network {
        reason: format!("{} failed", step),
        source,
        location: ErrorLocation::from(Location::caller()),
    }
}
