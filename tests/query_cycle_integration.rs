//! End-to-end tests for the query cycle over real HTTP.
//!
//! Each test starts a one-shot HTTP server on a loopback port that returns a
//! canned response and records the request line it received.

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::sync::mpsc;
use std::thread;

use percent_encoding::percent_decode_str;
use qask::{
    AnswerSurface, MemorySurface, OutcomeKind, QaClientBuilder, QaTransport, QueryController,
};

/// Serves exactly one request with `status`/`body` and sends back the request line.
fn serve_once(status: &str, body: &str) -> (String, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
    let addr = listener.local_addr().expect("local addr");
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept");
        let request_line = read_request_head(&stream);
        let mut stream = stream;
        stream.write_all(response.as_bytes()).expect("write response");
        stream.flush().ok();
        tx.send(request_line).ok();
    });

    (format!("http://{addr}"), rx)
}

/// Reads the request head and returns its first line.
fn read_request_head(stream: &TcpStream) -> String {
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader.read_line(&mut request_line).expect("read request line");

    let mut header = String::new();
    loop {
        header.clear();
        let read = reader.read_line(&mut header).expect("read header");
        if read == 0 || header == "\r\n" {
            break;
        }
    }
    request_line.trim_end().to_string()
}

fn controller_for(base_url: &str, query: &str) -> QueryController<MemorySurface> {
    let client = QaClientBuilder::new()
        .base_url(base_url)
        .build()
        .expect("client should build");
    QueryController::new(Arc::new(client), MemorySurface::with_query(query))
}

#[test]
fn success_response_is_rendered() {
    let (base_url, requests) = serve_once(
        "200 OK",
        r#"{"answer":"Paris","sources":[{"text":"France's capital"},{"id":"d2"}]}"#,
    );
    let mut controller = controller_for(&base_url, "capital of France?");

    let result = controller.submit_query().expect("cycle should run");

    assert_eq!(result.kind(), OutcomeKind::Success);
    let surface = controller.surface();
    assert_eq!(surface.answer(), "Paris");
    assert_eq!(surface.sources().len(), 2);
    assert_eq!(surface.sources()[0].to_string(), "[0] France's capital");
    assert_eq!(surface.sources()[1].to_string(), r#"[1] {"id":"d2"}"#);
    assert!(surface.trigger_enabled());

    let request_line = requests.recv().expect("request recorded");
    assert!(request_line.starts_with("GET /qa?q=capital%20of%20France%3F "));
}

#[test]
fn query_with_reserved_characters_round_trips() {
    let query = "a&b=c + d/e?f#g%h 東京";
    let (base_url, requests) = serve_once("200 OK", r#"{"answer":"ok"}"#);
    let mut controller = controller_for(&base_url, query);

    controller.submit_query();

    let request_line = requests.recv().expect("request recorded");
    let target = request_line
        .split_whitespace()
        .nth(1)
        .expect("request target");
    let encoded = target.strip_prefix("/qa?q=").expect("single q parameter");
    assert!(!encoded.contains('&'), "query must stay one parameter");

    let decoded = percent_decode_str(encoded).decode_utf8().expect("utf-8");
    assert_eq!(decoded, query);
}

#[test]
fn server_error_shows_status_and_body() {
    let (base_url, _requests) = serve_once("500 Internal Server Error", "boom");
    let mut controller = controller_for(&base_url, "q");

    let result = controller.submit_query().expect("cycle should run");

    assert_eq!(result.kind(), OutcomeKind::HttpError);
    assert_eq!(
        controller.surface().answer(),
        "HTTP 500 Internal Server Error\n\nboom"
    );
    assert!(controller.surface().sources().is_empty());
    assert!(controller.surface().trigger_enabled());
}

#[test]
fn non_json_success_shows_body_verbatim() {
    let (base_url, _requests) = serve_once("200 OK", "not json");
    let mut controller = controller_for(&base_url, "q");

    let result = controller.submit_query().expect("cycle should run");

    assert_eq!(result.kind(), OutcomeKind::MalformedResponse);
    assert_eq!(controller.surface().answer(), "not json");
    assert!(controller.surface().trigger_enabled());
}

#[test]
fn missing_answer_shows_pretty_printed_body() {
    let (base_url, _requests) = serve_once("200 OK", r#"{"sources":[]}"#);
    let mut controller = controller_for(&base_url, "q");

    controller.submit_query();

    assert_eq!(controller.surface().answer(), "{\n  \"sources\": []\n}");
    assert!(controller.surface().sources().is_empty());
}

#[test]
fn refused_connection_is_a_network_error() {
    // Bind then drop to get a port with nothing listening
    let port = TcpListener::bind("127.0.0.1:0")
        .and_then(|l| l.local_addr())
        .expect("free port")
        .port();
    let mut controller = controller_for(&format!("http://127.0.0.1:{port}"), "q");

    let result = controller.submit_query().expect("cycle should run");

    assert_eq!(result.kind(), OutcomeKind::NetworkError);
    assert!(
        controller
            .surface()
            .answer()
            .starts_with("Fetch/network error: ")
    );
    assert!(controller.surface().trigger_enabled());
}

#[test]
fn second_query_replaces_first() {
    let (first_url, _first) = serve_once(
        "200 OK",
        r#"{"answer":"one","sources":[{"text":"a"},{"text":"b"}]}"#,
    );
    let (second_url, _second) =
        serve_once("200 OK", r#"{"answer":"two","sources":[{"text":"c"}]}"#);

    let mut controller = controller_for(&first_url, "q");
    controller.submit_query();
    assert_eq!(controller.surface().sources().len(), 2);

    let surface = controller.into_surface();
    let client = QaClientBuilder::new().base_url(&second_url).build().unwrap();
    let mut controller = QueryController::new(Arc::new(client), surface);
    controller.submit_query();

    assert_eq!(controller.surface().answer(), "two");
    assert_eq!(controller.surface().sources().len(), 1);
    assert_eq!(controller.surface().sources()[0].text, "c");
}

#[test]
fn client_builds_url_against_configured_base() {
    let client = QaClientBuilder::new()
        .base_url("http://localhost:8001")
        .build()
        .unwrap();
    assert_eq!(
        client.query_url("hello world"),
        "http://localhost:8001/qa?q=hello%20world"
    );
}
