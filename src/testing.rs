//! Test doubles: an in-memory presentation service and one-shot local HTTP servers.

use std::collections::{HashMap, VecDeque};
use std::io::Cursor;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use url::Url;

use crate::api::{EditConfig, GenerateRequest, TaskStatusResponse};
use crate::deck::fixture::{build_pptx, replace_text, FixtureShape};
use crate::deck::parse_deck;
use crate::error::{DeckError, Result};
use crate::service::PresentationService;

#[derive(Debug, Clone)]
pub(crate) enum EditMode {
    /// Apply replacements to every shape with a matching name and host the
    /// result under a fresh URL.
    Apply,
    Reject { status: u16, body: String },
    NoUrl,
}

struct FakeState {
    hosted: HashMap<String, Vec<u8>>,
    edit_mode: EditMode,
    edit_calls: Vec<(String, EditConfig)>,
    statuses: VecDeque<TaskStatusResponse>,
    status_polls: u32,
    generated: Vec<GenerateRequest>,
}

pub(crate) struct FakeService {
    state: Mutex<FakeState>,
}

impl FakeService {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FakeState {
                hosted: HashMap::new(),
                edit_mode: EditMode::Apply,
                edit_calls: Vec::new(),
                statuses: VecDeque::new(),
                status_polls: 0,
                generated: Vec::new(),
            }),
        }
    }

    pub fn host(&self, url: &Url, bytes: Vec<u8>) {
        self.state.lock().unwrap().hosted.insert(url.to_string(), bytes);
    }

    pub fn set_edit_mode(&self, mode: EditMode) {
        self.state.lock().unwrap().edit_mode = mode;
    }

    pub fn edit_calls(&self) -> Vec<(String, EditConfig)> {
        self.state.lock().unwrap().edit_calls.clone()
    }

    pub fn script_statuses(&self, raw: &[&str]) {
        let mut state = self.state.lock().unwrap();
        for body in raw {
            state.statuses.push_back(serde_json::from_str(body).unwrap());
        }
    }

    pub fn status_polls(&self) -> u32 {
        self.state.lock().unwrap().status_polls
    }

    pub fn generated(&self) -> Vec<GenerateRequest> {
        self.state.lock().unwrap().generated.clone()
    }
}

/// Rebuild fixture shapes from a deck; shapes without a text frame come back
/// as pictures.
fn fixture_from_deck(bytes: &[u8]) -> Result<Vec<Vec<FixtureShape>>> {
    let deck = parse_deck(Cursor::new(bytes), Path::new("upload.pptx"))?;
    Ok(deck
        .slides
        .into_iter()
        .map(|slide| {
            slide
                .shapes
                .into_iter()
                .map(|shape| match shape.text {
                    Some(text) => FixtureShape::Text {
                        name: shape.name,
                        text,
                    },
                    None => FixtureShape::Picture {
                        name: shape.name.unwrap_or_default(),
                    },
                })
                .collect()
        })
        .collect())
}

#[async_trait]
impl PresentationService for FakeService {
    async fn download(&self, url: &Url) -> Result<Vec<u8>> {
        let state = self.state.lock().unwrap();
        state
            .hosted
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| DeckError::Acquisition {
                url: url.to_string(),
                status: 404,
            })
    }

    async fn edit(&self, file_name: &str, deck: Vec<u8>, config: &EditConfig) -> Result<Url> {
        let mut state = self.state.lock().unwrap();
        state.edit_calls.push((file_name.to_string(), config.clone()));

        match state.edit_mode.clone() {
            EditMode::Reject { status, body } => Err(DeckError::RemoteEdit {
                status,
                reason: body,
            }),
            EditMode::NoUrl => Err(DeckError::RemoteEdit {
                status: 200,
                reason: "API response does not contain a URL".to_string(),
            }),
            EditMode::Apply => {
                let mut slides = fixture_from_deck(&deck)?;
                for replacement in &config.replacements {
                    replace_text(&mut slides, &replacement.shape_name, &replacement.content);
                }
                let url = Url::parse(&format!(
                    "http://fake.local/result_{}.pptx",
                    state.edit_calls.len()
                ))
                .unwrap();
                state.hosted.insert(url.to_string(), build_pptx(&slides));
                Ok(url)
            }
        }
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        state.generated.push(request.clone());
        Ok(format!("task-{}", state.generated.len()))
    }

    async fn task_status(&self, _task_id: &str) -> Result<TaskStatusResponse> {
        let mut state = self.state.lock().unwrap();
        state.status_polls += 1;
        state
            .statuses
            .pop_front()
            .ok_or_else(|| DeckError::Generation("no scripted status left".to_string()))
    }
}

/// One-shot HTTP/1.1 server on a local port. Answers the first request with
/// `status` and `body`; the handle yields the raw request as received.
pub(crate) async fn serve_once(status: u16, body: &str) -> (Url, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = Url::parse(&format!("http://{}/api/v1/", listener.local_addr().unwrap())).unwrap();
    let body = body.to_string();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let raw = read_request(&mut socket).await;
        let head = format!(
            "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            status,
            body.len()
        );
        socket.write_all(head.as_bytes()).await.unwrap();
        socket.write_all(body.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
        String::from_utf8_lossy(&raw).into_owned()
    });

    (base, handle)
}

/// Local server that reads one request and hangs up without answering.
pub(crate) async fn serve_hang_up() -> (Url, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = Url::parse(&format!("http://{}/api/v1/", listener.local_addr().unwrap())).unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        read_request(&mut socket).await;
    });

    (base, handle)
}

async fn read_request(socket: &mut TcpStream) -> Vec<u8> {
    let mut raw = Vec::new();
    let mut buf = [0u8; 4096];
    while !request_complete(&raw) {
        let n = socket.read(&mut buf).await.unwrap();
        if n == 0 {
            break;
        }
        raw.extend_from_slice(&buf[..n]);
    }
    raw
}

fn request_complete(raw: &[u8]) -> bool {
    let Some(end) = raw.windows(4).position(|w| w == b"\r\n\r\n") else {
        return false;
    };
    let head = String::from_utf8_lossy(&raw[..end]).to_lowercase();
    let body = &raw[end + 4..];

    let length = head
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok());
    match length {
        Some(length) => body.len() >= length,
        None if head.contains("transfer-encoding: chunked") => body.ends_with(b"0\r\n\r\n"),
        None => true,
    }
}
