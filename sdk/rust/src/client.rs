use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

/// A song as returned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongRecord {
    pub id: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    /// Number or string, exactly as stored.
    pub year: Option<serde_json::Value>,
}

/// Body of a create or update request. `None` fields are sent as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SongInput {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub year: Option<serde_json::Value>,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("catalog returned error status {status}: {body}")]
    Status { status: StatusCode, body: String },
}

impl ClientError {
    /// Status code of a non-success response, if that is what failed.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Http(e) => e.status(),
        }
    }
}

pub struct CatalogClient {
    client: Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Use a preconfigured `reqwest` client (timeouts, proxy settings).
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn songs_url(&self) -> String {
        format!("{}/songs", self.base_url)
    }

    fn song_url(&self, id: &str) -> String {
        format!("{}/songs/{}", self.base_url, id)
    }

    pub async fn list_songs(&self) -> Result<Vec<SongRecord>, ClientError> {
        let resp = self.client.get(self.songs_url()).send().await?;
        parse_json(resp).await
    }

    pub async fn create_song(&self, song: &SongInput) -> Result<SongRecord, ClientError> {
        let resp = self.client.post(self.songs_url()).json(song).send().await?;
        parse_json(resp).await
    }

    pub async fn get_song(&self, id: &str) -> Result<SongRecord, ClientError> {
        let resp = self.client.get(self.song_url(id)).send().await?;
        parse_json(resp).await
    }

    /// Replace every field of a song. The service rejects missing fields.
    pub async fn update_song(&self, id: &str, song: &SongInput) -> Result<SongRecord, ClientError> {
        let resp = self.client.put(self.song_url(id)).json(song).send().await?;
        parse_json(resp).await
    }

    pub async fn delete_song(&self, id: &str) -> Result<(), ClientError> {
        let resp = self.client.delete(self.song_url(id)).send().await?;
        check_status(resp).await.map(|_| ())
    }
}

async fn check_status(resp: Response) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ClientError::Status { status, body })
}

async fn parse_json<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    let resp = check_status(resp).await?;
    Ok(resp.json::<T>().await?)
}
