use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct StoredImage {
    /// Reference persisted on users and places, e.g. `images/<uuid>.png`.
    pub reference: String,
    pub size: i64,
}

#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn store_image(&self, extension: &str, bytes: &[u8]) -> anyhow::Result<StoredImage>;

    /// Fire-and-forget removal; failures are logged by the implementation.
    fn discard_image(&self, reference: &str);
}
