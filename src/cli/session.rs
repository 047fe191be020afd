//! Who is signed in on this machine.
//!
//! `SessionContext` is an explicit value: binaries build one with
//! `restore` and pass it to whatever needs the signed-in professor.

use serde::Serialize;
use tracing::{info, warn};

use super::client::{ApiClient, ClientError};
use super::config::{SessionStore, StoredSession};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedInProfessor {
    pub id: i32,
    pub username: String,
    #[serde(rename = "isHOD")]
    pub is_hod: bool,
}

pub struct SessionContext {
    store: SessionStore,
    client: ApiClient,
    professor: Option<SignedInProfessor>,
}

impl SessionContext {
    /// Starts signed out, without reading the persisted session.
    pub fn signed_out(store: SessionStore, client: ApiClient) -> Self {
        Self {
            store,
            client,
            professor: None,
        }
    }

    /// Restores the persisted session, asking the server for `isHOD`.
    ///
    /// A 401 means the token expired: the persisted session is cleared. Any
    /// other failure leaves the file alone and starts signed out.
    pub async fn restore(store: SessionStore, client: ApiClient) -> Result<Self, ClientError> {
        let mut context = Self::signed_out(store, client);
        let Some(saved) = context.store.load()? else {
            return Ok(context);
        };

        context.client.set_token(Some(saved.token.clone()));
        match context.client.professor(saved.id).await {
            Ok(profile) => {
                context.professor = Some(SignedInProfessor {
                    id: saved.id,
                    username: saved.username,
                    is_hod: profile.professor.is_hod,
                });
            }
            Err(e) if e.is_unauthorized() => {
                info!("Stored session for {} has expired", saved.username);
                context.store.clear()?;
                context.client.set_token(None);
            }
            Err(e) => {
                warn!("Could not restore session for {}: {}", saved.username, e);
                context.client.set_token(None);
            }
        }

        Ok(context)
    }

    pub fn professor(&self) -> Option<&SignedInProfessor> {
        self.professor.as_ref()
    }

    /// The signed-in professor, or `NotLoggedIn`
    pub fn require_professor(&self) -> Result<&SignedInProfessor, ClientError> {
        self.professor.as_ref().ok_or(ClientError::NotLoggedIn)
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Result<&SignedInProfessor, ClientError> {
        let response = self.client.login(username, password).await?;

        self.store.save(&StoredSession {
            token: response.token.clone(),
            username: username.to_string(),
            id: response.id,
        })?;
        self.client.set_token(Some(response.token));

        Ok(self.professor.insert(SignedInProfessor {
            id: response.id,
            username: username.to_string(),
            is_hod: response.is_hod,
        }))
    }

    pub fn logout(&mut self) -> Result<(), ClientError> {
        self.store.clear()?;
        self.client.set_token(None);
        self.professor = None;
        Ok(())
    }
}
