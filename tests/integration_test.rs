use std::net::SocketAddr;

use anyhow::Result;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use sensordash::{Config, DashError, TelemetryClient, TimeRange};

// ---

/// Spawn a one-shot HTTP server on an ephemeral port that answers every
/// request with the given status line and JSON body. Hermetic stand-in for
/// the real channel API.
async fn spawn_canned_server(status: &'static str, body: &'static str) -> Result<SocketAddr> {
    // ---
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                // Read the request head; canned responses ignore its contents
                let mut seen = Vec::new();
                let mut buf = [0u8; 4096];
                loop {
                    match socket.read(&mut buf).await {
                        Ok(0) => break,
                        Ok(n) => {
                            seen.extend_from_slice(&buf[..n]);
                            if seen.windows(4).any(|w| w == b"\r\n\r\n") {
                                break;
                            }
                        }
                        Err(_) => return,
                    }
                }

                let response = format!(
                    "HTTP/1.1 {status}\r\n\
                     content-type: application/json\r\n\
                     content-length: {}\r\n\
                     connection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    Ok(addr)
}

fn config() -> Config {
    Config {
        channel_id: "123456".into(),
        api_key: "TESTKEY".into(),
    }
}

// ---

#[tokio::test]
async fn fetch_latest_parses_a_real_shaped_payload() -> Result<()> {
    // ---
    let addr = spawn_canned_server(
        "200 OK",
        r#"{"created_at":"2024-01-01T00:00:00Z","entry_id":7,
           "field1":"23.5","field2":"60","field3":"abc"}"#,
    )
    .await?;

    let client = TelemetryClient::with_base_url(format!("http://{addr}"));
    let reading = client.fetch_latest(&config()).await?;

    assert_eq!(reading.temperature, Some(23.5));
    assert_eq!(reading.humidity, Some(60.0));
    // Current-reading path: the unparsable gas field degrades to zero
    assert_eq!(reading.gas, Some(0.0));

    Ok(())
}

#[tokio::test]
async fn fetch_history_parses_the_feeds_envelope() -> Result<()> {
    // ---
    let addr = spawn_canned_server(
        "200 OK",
        r#"{"channel":{"id":123456,"name":"bench"},
            "feeds":[
              {"created_at":"2024-01-01T00:00:00Z","field1":"20","field2":"50","field3":"100"},
              {"created_at":"2024-01-01T01:00:00Z","field1":null,"field2":"51","field3":"abc"}
            ]}"#,
    )
    .await?;

    let client = TelemetryClient::with_base_url(format!("http://{addr}"));
    let readings = client.fetch_history(&config(), TimeRange::H24).await?;

    assert_eq!(readings.len(), 2);
    assert_eq!(readings[0].temperature, Some(20.0));
    assert_eq!(readings[0].gas, Some(100.0));
    // Historical path: absent and unparsable fields stay as gaps
    assert_eq!(readings[1].temperature, None);
    assert_eq!(readings[1].humidity, Some(51.0));
    assert_eq!(readings[1].gas, None);

    Ok(())
}

#[tokio::test]
async fn non_success_status_maps_to_fetch_error() -> Result<()> {
    // ---
    let addr = spawn_canned_server("404 Not Found", r#"{"error":"not found"}"#).await?;

    let client = TelemetryClient::with_base_url(format!("http://{addr}"));
    let err = client.fetch_latest(&config()).await.unwrap_err();

    assert!(matches!(err, DashError::Fetch { status: 404 }), "got: {err:?}");

    Ok(())
}

#[tokio::test]
async fn malformed_body_maps_to_parse_error() -> Result<()> {
    // ---
    let addr = spawn_canned_server("200 OK", "<html>definitely not json</html>").await?;

    let client = TelemetryClient::with_base_url(format!("http://{addr}"));

    let latest = client.fetch_latest(&config()).await.unwrap_err();
    assert!(matches!(latest, DashError::Parse(_)), "got: {latest:?}");

    let history = client.fetch_history(&config(), TimeRange::D30).await.unwrap_err();
    assert!(matches!(history, DashError::Parse(_)), "got: {history:?}");

    Ok(())
}
