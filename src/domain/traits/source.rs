use async_trait::async_trait;
use crate::domain::entities::Update;
use crate::application::errors::BotError;

/// UpdateSource trait - abstraction over whatever delivers platform updates
///
/// Implementations own connection handling and decoding. A decode failure is
/// returned as an error for that one update; the source stays usable.
#[async_trait]
pub trait UpdateSource: Send {
    /// Next update, or `None` once the source is exhausted
    async fn next_update(&mut self) -> Result<Option<Update>, BotError>;

    /// Short name for logs
    fn name(&self) -> &str;
}
