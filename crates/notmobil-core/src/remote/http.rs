//! reqwest-backed remote note service.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};

use super::{status_error, NoteDto, RemoteError, RemoteNoteService, RemoteResult};
use crate::auth::Credential;
use crate::util::normalize_base_url;

/// Default bound for a single remote call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct HttpNoteService {
    base_url: String,
    client: Client,
}

impl HttpNoteService {
    /// Build a client for the API rooted at `base_url` (for example `http://host:8080/api`).
    pub fn new(base_url: &str, timeout: Duration) -> RemoteResult<Self> {
        let base_url = normalize_base_url(base_url).ok_or_else(|| {
            RemoteError::InvalidConfiguration(
                "base URL must include http:// or https://".to_string(),
            )
        })?;
        if timeout.is_zero() {
            return Err(RemoteError::InvalidConfiguration(
                "timeout must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            base_url,
            client: Client::builder()
                .timeout(timeout)
                .connect_timeout(timeout)
                .build()?,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn notes_url(&self) -> String {
        format!("{}/notes", self.base_url)
    }

    fn note_url(&self, id: &str) -> String {
        format!("{}/notes/{}", self.base_url, urlencoding::encode(id))
    }

    fn authorized(builder: RequestBuilder, credential: &Credential) -> RequestBuilder {
        builder
            .bearer_auth(credential.token())
            .header("Accept", "application/json")
    }

    async fn checked(response: Response) -> RemoteResult<Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(status_error(status, &body))
    }
}

impl RemoteNoteService for HttpNoteService {
    async fn list_notes(&self, credential: &Credential) -> RemoteResult<Vec<NoteDto>> {
        let response =
            Self::authorized(self.client.get(self.notes_url()), credential)
                .send()
                .await?;
        Ok(Self::checked(response).await?.json().await?)
    }

    async fn get_note(&self, credential: &Credential, id: &str) -> RemoteResult<NoteDto> {
        let response = Self::authorized(self.client.get(self.note_url(id)), credential)
            .send()
            .await?;
        Ok(Self::checked(response).await?.json().await?)
    }

    async fn create_note(&self, credential: &Credential, note: &NoteDto) -> RemoteResult<NoteDto> {
        let response = Self::authorized(self.client.post(self.notes_url()), credential)
            .json(note)
            .send()
            .await?;
        Ok(Self::checked(response).await?.json().await?)
    }

    async fn update_note(
        &self,
        credential: &Credential,
        id: &str,
        note: &NoteDto,
    ) -> RemoteResult<()> {
        let response = Self::authorized(self.client.put(self.note_url(id)), credential)
            .json(note)
            .send()
            .await?;
        Self::checked(response).await?;
        Ok(())
    }

    async fn delete_note(&self, credential: &Credential, id: &str) -> RemoteResult<()> {
        let response = Self::authorized(self.client.delete(self.note_url(id)), credential)
            .send()
            .await?;
        Self::checked(response).await?;
        Ok(())
    }
}
