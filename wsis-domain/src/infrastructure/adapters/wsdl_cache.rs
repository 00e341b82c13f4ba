use crate::application::ports::{SoapOptions, WsdlCacheMode};
use crate::domain::errors::{ServiceError, ServiceResult};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, OnceLock};
use std::time::{Duration, SystemTime};
use tracing::{debug, warn};

/// Process-wide in-memory cache, keyed by service endpoint
fn memory_cache() -> &'static Mutex<HashMap<String, Arc<str>>> {
    static MEMORY_CACHE: OnceLock<Mutex<HashMap<String, Arc<str>>>> = OnceLock::new();
    MEMORY_CACHE.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Cache for service description documents (`<endpoint>?wsdl`).
///
/// Documents are stored verbatim; only the root element is inspected.
#[derive(Debug, Clone)]
pub struct WsdlCache {
    mode: WsdlCacheMode,
    dir: PathBuf,
    ttl: Duration,
}

impl WsdlCache {
    pub fn new(mode: WsdlCacheMode, dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            mode,
            dir: dir.into(),
            ttl,
        }
    }

    pub fn from_options(options: &SoapOptions) -> Self {
        Self::new(
            options.wsdl_cache,
            options.wsdl_cache_dir.clone(),
            options.get_wsdl_cache_ttl(),
        )
    }

    /// Return the cached document for `endpoint`, calling `fetch` on a miss
    pub async fn load<F, Fut>(&self, endpoint: &str, fetch: F) -> ServiceResult<Arc<str>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ServiceResult<String>>,
    {
        if self.mode.uses_memory() {
            if let Some(doc) = memory_get(endpoint) {
                debug!(endpoint, "service description served from memory cache");
                return Ok(doc);
            }
        }

        if self.mode.uses_disk() {
            if let Some(doc) = self.disk_get(endpoint).await {
                debug!(endpoint, "service description served from disk cache");
                let doc: Arc<str> = Arc::from(doc);
                if self.mode.uses_memory() {
                    memory_put(endpoint, doc.clone());
                }
                return Ok(doc);
            }
        }

        let raw = fetch().await?;
        check_service_description(&raw)?;

        if self.mode.uses_disk() {
            if let Err(e) = self.disk_put(endpoint, &raw).await {
                warn!(endpoint, "failed to write service description cache: {}", e);
            }
        }

        let doc: Arc<str> = Arc::from(raw);
        if self.mode.uses_memory() {
            memory_put(endpoint, doc.clone());
        }
        Ok(doc)
    }

    fn disk_path(&self, endpoint: &str) -> PathBuf {
        let name: String = endpoint
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        self.dir.join(format!("{name}.wsdl"))
    }

    async fn disk_get(&self, endpoint: &str) -> Option<String> {
        let path = self.disk_path(endpoint);
        let metadata = tokio::fs::metadata(&path).await.ok()?;
        let age = metadata
            .modified()
            .ok()
            .and_then(|modified| SystemTime::now().duration_since(modified).ok())?;
        if age > self.ttl {
            return None;
        }

        let doc = tokio::fs::read_to_string(&path).await.ok()?;
        check_service_description(&doc).ok()?;
        Some(doc)
    }

    async fn disk_put(&self, endpoint: &str, doc: &str) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.disk_path(endpoint), doc).await
    }
}

fn memory_get(endpoint: &str) -> Option<Arc<str>> {
    memory_cache()
        .lock()
        .ok()
        .and_then(|cache| cache.get(endpoint).cloned())
}

fn memory_put(endpoint: &str, doc: Arc<str>) {
    if let Ok(mut cache) = memory_cache().lock() {
        cache.insert(endpoint.to_string(), doc);
    }
}

/// Accept WSDL 1.1 (`definitions`) and WSDL 2.0 (`description`) documents
pub fn check_service_description(xml: &str) -> ServiceResult<()> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) => {
                return match e.local_name().as_ref() {
                    b"definitions" | b"description" => Ok(()),
                    other => Err(ServiceError::malformed(format!(
                        "unexpected service description root '{}'",
                        String::from_utf8_lossy(other)
                    ))),
                };
            }
            Event::Eof => {
                return Err(ServiceError::malformed("empty service description"));
            }
            _ => {}
        }
        buf.clear();
    }
}
