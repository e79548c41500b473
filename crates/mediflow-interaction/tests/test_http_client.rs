use mediflow_core::analysis::{AnalysisService, DocumentUpload, ServiceError};
use mediflow_interaction::HttpAnalysisClient;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// What the one-shot server saw.
struct CapturedRequest {
    request_line: String,
    headers: String,
    body: Vec<u8>,
}

/// Serves exactly one HTTP request with a canned response.
async fn serve_once(
    status_line: &'static str,
    content_type: &'static str,
    body: &'static str,
) -> (String, oneshot::Receiver<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        let header_end = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before headers finished");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let content_length = head
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);

        while buf.len() < header_end + content_length {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }

        let response = format!(
            "{status_line}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();

        let mut lines = head.lines();
        let request_line = lines.next().unwrap_or_default().to_string();
        let headers = lines.collect::<Vec<_>>().join("\n");
        let _ = tx.send(CapturedRequest {
            request_line,
            headers,
            body: buf[header_end..].to_vec(),
        });
    });

    (format!("http://{addr}"), rx)
}

fn client(base_url: &str) -> HttpAnalysisClient {
    HttpAnalysisClient::new(base_url, Duration::from_secs(10)).unwrap()
}

#[tokio::test]
async fn test_ask_posts_json_and_returns_text() {
    let (base_url, captured) =
        serve_once("HTTP/1.1 200 OK", "text/plain", "Your hemoglobin is normal.").await;

    let reply = client(&base_url).ask("Is 13 g/dL ok?").await.unwrap();

    assert_eq!(reply, "Your hemoglobin is normal.");
    let request = captured.await.unwrap();
    assert_eq!(request.request_line, "POST /ask HTTP/1.1");
    let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
    assert_eq!(body, serde_json::json!({ "message": "Is 13 g/dL ok?" }));
}

#[tokio::test]
async fn test_analyze_report_sends_multipart_file_part() {
    let (base_url, captured) = serve_once("HTTP/1.1 200 OK", "text/plain", "All values normal").await;
    let upload = DocumentUpload::new("blood.pdf", b"%PDF-1.4 fake".to_vec());

    let analysis = client(&base_url).analyze_report(&upload).await.unwrap();

    assert_eq!(analysis, "All values normal");
    let request = captured.await.unwrap();
    assert_eq!(request.request_line, "POST /analyze_report HTTP/1.1");
    assert!(request.headers.to_lowercase().contains("multipart/form-data"));
    let body = String::from_utf8_lossy(&request.body);
    assert!(body.contains(r#"name="file""#));
    assert!(body.contains(r#"filename="blood.pdf""#));
    assert!(body.contains("application/pdf"));
}

#[tokio::test]
async fn test_analyze_trends_returns_raw_results() {
    let (base_url, captured) = serve_once(
        "HTTP/1.1 200 OK",
        "application/json",
        r#"[{"filename":"a.pdf","date":"2024-01-01","metrics":[{"name":"Hemoglobin","value":13,"unit":"g/dL"}]}]"#,
    )
    .await;
    let uploads = vec![
        DocumentUpload::new("a.pdf", b"a".to_vec()),
        DocumentUpload::new("b.png", b"b".to_vec()),
    ];

    let results = client(&base_url).analyze_trends(&uploads).await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["filename"], "a.pdf");
    let body = String::from_utf8_lossy(&captured.await.unwrap().body).to_string();
    assert_eq!(body.matches(r#"name="files""#).count(), 2);
}

#[tokio::test]
async fn test_analyze_trends_error_object_is_client_error() {
    let (base_url, _captured) =
        serve_once("HTTP/1.1 200 OK", "application/json", r#"{"error":"No text found"}"#).await;

    let err = client(&base_url).analyze_trends(&[]).await.unwrap_err();

    assert_eq!(err, ServiceError::Client("No text found".to_string()));
}

#[tokio::test]
async fn test_non_success_status_is_server_error() {
    let (base_url, _captured) = serve_once(
        "HTTP/1.1 503 Service Unavailable",
        "application/json",
        r#"{"detail":"Model is loading"}"#,
    )
    .await;

    let err = client(&base_url).ask("hello").await.unwrap_err();

    assert_eq!(
        err,
        ServiceError::Server {
            status: 503,
            detail: "Model is loading".to_string()
        }
    );
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    // Bind then drop to obtain a port with nothing listening.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{addr}")).ask("hello").await.unwrap_err();

    assert!(err.is_unreachable(), "unexpected error: {err:?}");
}
