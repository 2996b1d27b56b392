use rapip_cli::commands::measure::{MeasureOptions, measure};
use rapip_core::TransportKind;
use std::time::Duration;

/// Test that a proxied endpoint yields a corrected timing for each transport
#[tokio::test]
async fn test_measure_compare_with_proxy_headers() {
    // Arrange
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/summaries")
        .match_header("accept", "application/json")
        .with_header("x-rapip-proxy", "true")
        .with_header("x-rapip-proxy-overhead", "0")
        .with_body(r#"{"summaries": [{"id": 1}, {"id": 2}]}"#)
        .expect(2)
        .create_async()
        .await;

    let url = format!("{}/summaries", server.url());
    let options = MeasureOptions {
        headers: vec!["Accept: application/json".to_string()],
        ..MeasureOptions::default()
    };

    // Act
    let records = measure(&[TransportKind::Xhr, TransportKind::Fetch], &url, &options)
        .await
        .expect("Both transports should produce a record");

    // Assert
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].name, TransportKind::Xhr);
    assert_eq!(records[1].name, TransportKind::Fetch);
    for record in &records {
        assert_eq!(record.path, url);
        let proxy = record.proxy.as_ref().expect("Proxy block should be present");
        assert_eq!(proxy.proxy_overhead.raw, 0);
        assert_eq!(proxy.request_time_with_correction, proxy.request_time);
    }
}

/// Test that custom proxy header names are honored
#[tokio::test]
async fn test_measure_with_custom_proxy_headers() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/edge")
        .with_header("x-edge", "1")
        .with_header("x-edge-overhead", "0")
        .with_body("{}")
        .create_async()
        .await;

    let options = MeasureOptions {
        presence_header: "X-Edge".to_string(),
        overhead_header: "X-Edge-Overhead".to_string(),
        ..MeasureOptions::default()
    };

    let records = measure(
        &[TransportKind::Fetch],
        &format!("{}/edge", server.url()),
        &options,
    )
    .await
    .unwrap();

    assert!(records[0].proxy.is_some());
}

/// Test that an unreachable host produces an error rather than a record
#[tokio::test]
async fn test_measure_transport_failure() {
    let result = measure(
        &[TransportKind::Fetch],
        "http://127.0.0.1:1/",
        &MeasureOptions::default(),
    )
    .await;

    let err = result.expect_err("Unreachable host should not produce metrics");
    assert!(err.to_string().contains("produced no metrics"));
}

/// Test that the optional deadline cuts off a slow response
#[tokio::test]
async fn test_measure_timeout() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/stall")
        .with_chunked_body(|w| {
            std::thread::sleep(Duration::from_millis(500));
            w.write_all(b"{}")
        })
        .create_async()
        .await;

    let options = MeasureOptions {
        timeout: Some(Duration::from_millis(50)),
        ..MeasureOptions::default()
    };

    let err = measure(
        &[TransportKind::Xhr],
        &format!("{}/stall", server.url()),
        &options,
    )
    .await
    .expect_err("Slow response should time out");

    assert!(err.to_string().contains("timed out"));
}

/// Test that malformed request headers are rejected before sending
#[tokio::test]
async fn test_measure_rejects_bad_header() {
    let options = MeasureOptions {
        headers: vec!["no separator".to_string()],
        ..MeasureOptions::default()
    };

    let result = measure(&[TransportKind::Fetch], "http://127.0.0.1:1/", &options).await;

    assert!(result.is_err());
}
