use crate::core::geo::TileCoord;
use crate::MapError;
use crossbeam_channel::{unbounded, Receiver, Sender};
use once_cell::sync::Lazy;
use reqwest::blocking::Client;
use std::thread;
use std::time::Duration;

/// Shared blocking HTTP client with a custom User-Agent so that public tile
/// servers (e.g. OpenStreetMap) don't reject the request.
pub(crate) static HTTP_CLIENT: Lazy<Option<Client>> = Lazy::new(|| {
    Client::builder()
        .user_agent(concat!("tmsview/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| log::error!("failed to build tile HTTP client: {}", e))
        .ok()
});

/// Outcome of one tile download
#[derive(Debug)]
pub struct TileResult {
    pub coord: TileCoord,
    pub url: String,
    pub data: Result<Vec<u8>, String>,
}

/// Fetches tiles on background threads and reports the bytes (or the
/// failure) over a channel.
pub struct TileLoader {
    tx: Sender<TileResult>,
    rx: Receiver<TileResult>,
    max_attempts: usize,
}

impl TileLoader {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self {
            tx,
            rx,
            max_attempts: 2,
        }
    }

    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Start downloading `url` for `coord` on a detached thread.
    pub fn start_download(&self, coord: TileCoord, url: String) {
        let tx = self.tx.clone();
        let max_attempts = self.max_attempts;

        thread::spawn(move || {
            let mut last_error = String::new();
            for attempt in 1..=max_attempts {
                log::debug!("fetch tile {} attempt {}", coord, attempt);
                match fetch_bytes(&url) {
                    Ok(data) => {
                        log::debug!("downloaded tile {} ({} bytes)", coord, data.len());
                        let _ = tx.send(TileResult {
                            coord,
                            url,
                            data: Ok(data),
                        });
                        return;
                    }
                    Err(e) => {
                        log::warn!("tile {} download failed on attempt {}: {}", coord, attempt, e);
                        last_error = e.to_string();
                        if attempt < max_attempts {
                            thread::sleep(Duration::from_millis(100));
                        }
                    }
                }
            }
            let _ = tx.send(TileResult {
                coord,
                url,
                data: Err(last_error),
            });
        });
    }

    /// Drains every result that has arrived so far.
    pub fn drain(&self) -> Vec<TileResult> {
        self.rx.try_iter().collect()
    }
}

impl Default for TileLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn fetch_bytes(url: &str) -> crate::Result<Vec<u8>> {
    let client = HTTP_CLIENT
        .as_ref()
        .ok_or_else(|| MapError::Runtime("tile HTTP client unavailable".to_string()))?;
    let resp = client.get(url).send()?;
    if !resp.status().is_success() {
        return Err(MapError::HttpStatus(resp.status().as_u16()));
    }
    Ok(resp.bytes()?.to_vec())
}
