//! Webhook registration state and persistence.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Persisted registration record. Both fields are set or both are unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRegistration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
}

/// Registration store shared between the server and its lifecycle hooks.
#[derive(Debug, Clone, Default)]
pub struct RegistrationStore {
    inner: Arc<Mutex<WebhookRegistration>>,
    persistence_path: Option<PathBuf>,
}

impl RegistrationStore {
    /// In-memory store.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// File-backed store; loads existing state when the file exists.
    pub fn load_from_file(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let registration = if path.exists() {
            let reader = BufReader::new(File::open(path)?);
            let registration: WebhookRegistration = serde_json::from_reader(reader)?;
            tracing::info!(
                path = %path.display(),
                registered = registration.webhook_id.is_some(),
                "Loaded webhook registration"
            );
            registration
        } else {
            WebhookRegistration::default()
        };

        Ok(Self {
            inner: Arc::new(Mutex::new(registration)),
            persistence_path: Some(path.to_path_buf()),
        })
    }

    pub async fn current(&self) -> WebhookRegistration {
        self.inner.lock().await.clone()
    }

    /// A registration exists when a webhook id is stored.
    pub async fn check_exists(&self) -> bool {
        self.inner.lock().await.webhook_id.is_some()
    }

    pub async fn create(&self, webhook_url: &str) -> std::io::Result<WebhookRegistration> {
        let mut guard = self.inner.lock().await;
        *guard = WebhookRegistration {
            webhook_id: Some(format!("immutable_{}", chrono::Utc::now().timestamp_millis())),
            webhook_url: Some(webhook_url.to_string()),
        };
        self.save(&guard)?;
        tracing::info!(
            webhook_id = guard.webhook_id.as_deref().unwrap_or_default(),
            webhook_url = %webhook_url,
            "Webhook registered"
        );
        Ok(guard.clone())
    }

    pub async fn delete(&self) -> std::io::Result<()> {
        let mut guard = self.inner.lock().await;
        *guard = WebhookRegistration::default();
        self.save(&guard)?;
        tracing::info!("Webhook deregistered");
        Ok(())
    }

    fn save(&self, registration: &WebhookRegistration) -> std::io::Result<()> {
        if let Some(path) = &self.persistence_path {
            let mut writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer(&mut writer, registration)?;
            writer.flush()?;
        }
        Ok(())
    }
}
