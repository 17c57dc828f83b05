use crate::{
    ContentKind, Endpoint, ImageType, ProtocolError, SourceType, UploadClient, UploadError,
    UploadRequest, UploadState, UploadTimeouts,
};

use std::time::{Duration, Instant};

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    sync::oneshot,
};

/// What the fake server saw.
struct Received {
    header: String,
    payload: Vec<u8>,
}

/// Read one pastexen request off `stream`: header block, then `size` bytes.
async fn read_request(stream: &mut TcpStream) -> std::io::Result<Received> {
    let mut buf = Vec::new();
    let mut byte = [0u8; 1];
    while !buf.ends_with(b"\n\n") {
        stream.read_exact(&mut byte).await?;
        buf.push(byte[0]);
    }

    let header = String::from_utf8_lossy(&buf).to_string();
    let size = header
        .lines()
        .find_map(|l| l.strip_prefix("size="))
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(0);

    let mut payload = vec![0u8; size];
    stream.read_exact(&mut payload).await?;

    Ok(Received { header, payload })
}

/// Spawn a one-shot server that answers with `response`.
async fn fake_server(
    response: &'static [u8],
) -> std::io::Result<(Endpoint, oneshot::Receiver<Received>)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    let (seen_tx, seen_rx) = oneshot::channel();

    tokio::spawn(async move {
        if let Ok((mut stream, _)) = listener.accept().await {
            if let Ok(received) = read_request(&mut stream).await {
                let _ = stream.write_all(response).await;
                let _ = seen_tx.send(received);
            }
        }
    });

    Ok((
        Endpoint {
            host: "127.0.0.1".to_string(),
            port,
        },
        seen_rx,
    ))
}

/// Spawn a server that reads the request, answers with `response`, then holds
/// the connection open without closing it.
async fn lingering_server(response: Vec<u8>) -> std::io::Result<Endpoint> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();

    tokio::spawn(async move {
        if let Ok((mut stream, _)) = listener.accept().await {
            if read_request(&mut stream).await.is_ok() {
                let _ = stream.write_all(&response).await;
                tokio::time::sleep(Duration::from_secs(5)).await;
            }
        }
    });

    Ok(Endpoint {
        host: "127.0.0.1".to_string(),
        port,
    })
}

fn quick_timeouts() -> UploadTimeouts {
    UploadTimeouts {
        connect: Duration::from_secs(2),
        write: Duration::from_millis(300),
        response: Duration::from_millis(300),
    }
}

/// WHAT: Successful upload returns the server's link
/// WHY: Header and payload must arrive intact and the url must be parsed
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_server_replying_url_when_uploading_then_link_and_exact_bytes() {
    // Given: A server that replies with a url
    let (endpoint, seen_rx) = fake_server(b"url=http://example.com/x\n\n").await.unwrap();
    let client = UploadClient::new(endpoint, quick_timeouts());
    let payload = vec![0xABu8; 5000];

    // When: Uploading a PNG payload
    let result = client
        .upload(UploadRequest::new(
            payload.clone(),
            ContentKind::Image(ImageType::Png),
        ))
        .await;

    // Then: Link returned; server saw the header and every payload byte
    assert_eq!(result.unwrap(), "http://example.com/x");
    let seen = seen_rx.await.unwrap();
    assert_eq!(
        seen.header,
        "proto=pastexen\nversion=1.0\ntype=png\nsize=5000\n\n"
    );
    assert_eq!(seen.payload, payload);
}

/// WHAT: Background upload reports through its handle
/// WHY: Callers fire and forget, then observe the result later
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_spawned_upload_when_awaiting_handle_then_completed_state() {
    let (endpoint, _seen_rx) = fake_server(b"url=http://example.com/code\n\n").await.unwrap();
    let client = UploadClient::new(endpoint, quick_timeouts());

    let handle = client.spawn_upload(UploadRequest::new(
        b"program p; begin end.".to_vec(),
        ContentKind::Text(SourceType::Pas),
    ));
    let mut states = handle.subscribe();
    let result = handle.result().await;

    assert_eq!(result.unwrap(), "http://example.com/code");
    assert_eq!(
        *states.borrow_and_update(),
        UploadState::Completed("http://example.com/code".to_string())
    );
}

/// WHAT: A reply without url fails with MalformedResponse
/// WHY: A partial link must not be delivered as success
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_server_replying_without_url_when_uploading_then_malformed_response() {
    let (endpoint, _seen_rx) = fake_server(b"error=too large\n\n").await.unwrap();
    let client = UploadClient::new(endpoint, quick_timeouts());

    let result = client
        .upload(UploadRequest::new(
            vec![1, 2, 3],
            ContentKind::Image(ImageType::Jpg),
        ))
        .await;

    assert!(matches!(
        result,
        Err(UploadError::Protocol {
            source: ProtocolError::MalformedResponse { .. },
            ..
        })
    ));
}

/// WHAT: Server closing without a reply is a malformed response
/// WHY: An empty reply carries no link
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_server_closing_silently_when_uploading_then_malformed_response() {
    let (endpoint, _seen_rx) = fake_server(b"").await.unwrap();
    let client = UploadClient::new(endpoint, quick_timeouts());

    let result = client
        .upload(UploadRequest::new(
            b"x".to_vec(),
            ContentKind::Text(SourceType::Txt),
        ))
        .await;

    assert!(result.as_ref().is_err_and(UploadError::is_protocol));
}

/// WHAT: Refused connection yields a network error quickly
/// WHY: An unreachable server must not crash or hang the caller
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_closed_port_when_uploading_then_network_error_within_bound() {
    // Given: A port with nothing listening
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    let client = UploadClient::new(
        Endpoint {
            host: "127.0.0.1".to_string(),
            port,
        },
        quick_timeouts(),
    );

    // When: Uploading
    let start = Instant::now();
    let result = client
        .upload(UploadRequest::new(
            vec![0; 10],
            ContentKind::Image(ImageType::Png),
        ))
        .await;

    // Then: Network error, well within the connect timeout
    assert!(matches!(result, Err(UploadError::Network { .. })));
    assert!(start.elapsed() < Duration::from_secs(3));
}

/// WHAT: A server that never answers hits the response timeout
/// WHY: The wait for the link must be bounded
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_silent_server_when_uploading_then_response_timeout() {
    // Given: A server that accepts and reads but never replies
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        if let Ok((mut stream, _)) = listener.accept().await {
            let _ = read_request(&mut stream).await;
            tokio::time::sleep(Duration::from_secs(5)).await;
        }
    });
    let client = UploadClient::new(
        Endpoint {
            host: "127.0.0.1".to_string(),
            port,
        },
        quick_timeouts(),
    );

    // When: Uploading
    let result = client
        .upload(UploadRequest::new(
            vec![9; 64],
            ContentKind::Image(ImageType::Png),
        ))
        .await;

    // Then: Timed-out network error
    assert!(
        matches!(
            &result,
            Err(UploadError::Network { source, .. })
                if source.kind() == std::io::ErrorKind::TimedOut
        ),
        "expected timeout, got {:?}",
        result
    );
}

/// WHAT: Cancelling closes the connection and reports Cancelled
/// WHY: A cancelled upload must not leak its socket
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_upload_awaiting_response_when_cancelled_then_socket_closed() {
    // Given: A server that reads the request, then waits for the client to hang up
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let (closed_tx, closed_rx) = oneshot::channel();
    tokio::spawn(async move {
        if let Ok((mut stream, _)) = listener.accept().await {
            let _ = read_request(&mut stream).await;
            let mut rest = [0u8; 16];
            let n = stream.read(&mut rest).await.unwrap_or(0);
            let _ = closed_tx.send(n);
        }
    });
    let client = UploadClient::new(
        Endpoint {
            host: "127.0.0.1".to_string(),
            port,
        },
        UploadTimeouts {
            connect: Duration::from_secs(2),
            write: Duration::from_secs(2),
            response: Duration::from_secs(30),
        },
    );

    let mut handle = client.spawn_upload(UploadRequest::new(
        vec![5; 128],
        ContentKind::Image(ImageType::Png),
    ));
    let mut states = handle.subscribe();
    tokio::time::timeout(
        Duration::from_secs(2),
        states.wait_for(|s| *s == UploadState::AwaitingResponse),
    )
    .await
    .unwrap()
    .unwrap();

    // When: Cancelling
    handle.cancel();
    let result = handle.result().await;

    // Then: Cancelled, and the server sees EOF
    assert!(matches!(result, Err(UploadError::Cancelled { .. })));
    let n = tokio::time::timeout(Duration::from_secs(2), closed_rx)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(n, 0);
}

/// WHAT: An unroutable address fails within the connect timeout
/// WHY: Connect must be bounded even when packets are silently dropped
#[tokio::test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
async fn given_unroutable_host_when_uploading_then_network_error_within_timeout() {
    let client = UploadClient::new(
        Endpoint {
            host: "10.255.255.1".to_string(),
            port: 9876,
        },
        UploadTimeouts {
            connect: Duration::from_millis(300),
            write: Duration::from_millis(300),
            response: Duration::from_millis(300),
        },
    );

    let start = Instant::now();
    let result = client
        .upload(UploadRequest::new(
            vec![1],
            ContentKind::Text(SourceType::Txt),
        ))
        .await;

    assert!(matches!(result, Err(UploadError::Network { .. })));
    assert!(start.elapsed() < Duration::from_secs(2));
}

/// WHAT: A server that never reads the request fails the upload within the write limit
/// WHY: A stalled peer must not hang the upload forever once the socket buffers fill
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_server_never_reading_when_uploading_large_payload_then_write_timeout() {
    // Given: A server that accepts and then ignores the connection
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        if let Ok((stream, _)) = listener.accept().await {
            tokio::time::sleep(Duration::from_secs(10)).await;
            drop(stream);
        }
    });
    let client = UploadClient::new(
        Endpoint {
            host: "127.0.0.1".to_string(),
            port,
        },
        quick_timeouts(),
    );

    // When: Uploading far more than the socket buffers hold
    let result = tokio::time::timeout(
        Duration::from_secs(8),
        client.upload(UploadRequest::new(
            vec![0x5A; 64 * 1024 * 1024],
            ContentKind::Image(ImageType::Png),
        )),
    )
    .await
    .unwrap();

    // Then: Timed-out network error instead of a hang
    assert!(
        matches!(
            &result,
            Err(UploadError::Network { source, .. })
                if source.kind() == std::io::ErrorKind::TimedOut
        ),
        "expected write timeout, got {:?}",
        result
    );
}

/// WHAT: A url line left open without a blank line is still delivered
/// WHY: The server may keep the socket open after its reply; the link already arrived
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_url_without_terminator_and_open_socket_when_uploading_then_link() {
    // Given: A server that sends one url line and keeps the connection open
    let endpoint = lingering_server(b"url=http://example.com/x\n".to_vec())
        .await
        .unwrap();
    let client = UploadClient::new(endpoint, quick_timeouts());

    // When: Uploading
    let result = client
        .upload(UploadRequest::new(
            vec![3; 32],
            ContentKind::Image(ImageType::Png),
        ))
        .await;

    // Then: The link is parsed from what arrived before the response timeout
    assert_eq!(result.unwrap(), "http://example.com/x");
}

/// WHAT: A reply exceeding the size cap without a terminator is malformed
/// WHY: A truncated reply could yield a cut-off link
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_oversized_unterminated_reply_when_uploading_then_malformed_response() {
    // Given: A server replying with a url line longer than the response cap
    let mut reply = b"url=http://example.com/".to_vec();
    reply.extend(std::iter::repeat_n(b'a', 70 * 1024));
    let endpoint = lingering_server(reply).await.unwrap();
    let client = UploadClient::new(endpoint, quick_timeouts());

    // When: Uploading
    let result = client
        .upload(UploadRequest::new(
            vec![4; 16],
            ContentKind::Text(SourceType::Txt),
        ))
        .await;

    // Then: Rejected as malformed rather than parsed
    assert!(
        matches!(
            &result,
            Err(UploadError::Protocol {
                source: ProtocolError::MalformedResponse { .. },
                ..
            })
        ),
        "expected malformed response, got {:?}",
        result
    );
}
