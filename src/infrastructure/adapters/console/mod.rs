//! Console adapter - reads one JSON update per line from stdin or a file

use async_trait::async_trait;
use std::path::Path;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use crate::domain::entities::{MessageRecord, Update};
use crate::domain::traits::UpdateSource;
use crate::application::errors::BotError;

/// Update source over newline-delimited JSON.
///
/// Each line is either a full update (`{"update_id": .., "message": {..}}`)
/// or a bare message object, which is wrapped in an update numbered by line.
pub struct JsonLinesSource<R> {
    name: String,
    lines: Lines<R>,
    line_no: u64,
}

impl<R: AsyncBufRead + Unpin + Send> JsonLinesSource<R> {
    pub fn new(name: impl Into<String>, reader: R) -> Self {
        Self {
            name: name.into(),
            lines: reader.lines(),
            line_no: 0,
        }
    }
}

impl JsonLinesSource<BufReader<tokio::io::Stdin>> {
    pub fn stdin() -> Self {
        Self::new("stdin", BufReader::new(tokio::io::stdin()))
    }
}

impl JsonLinesSource<BufReader<tokio::fs::File>> {
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, BotError> {
        let path = path.as_ref();
        let file = tokio::fs::File::open(path).await?;
        Ok(Self::new(path.display().to_string(), BufReader::new(file)))
    }
}

/// Decode one JSON document as an update, falling back to a bare message
pub fn decode_update(text: &str, fallback_id: i64) -> Result<Update, BotError> {
    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| BotError::Parse(e.to_string()))?;

    let is_envelope = value.get("update_id").is_some() || value.get("message").is_some();
    if is_envelope {
        serde_json::from_value(value).map_err(|e| BotError::Parse(e.to_string()))
    } else {
        let record: MessageRecord = serde_json::from_value(value)
            .map_err(|e| BotError::Parse(e.to_string()))?;
        Ok(Update {
            update_id: fallback_id,
            message: Some(record),
        })
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> UpdateSource for JsonLinesSource<R> {
    async fn next_update(&mut self) -> Result<Option<Update>, BotError> {
        while let Some(line) = self.lines.next_line().await? {
            self.line_no += 1;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            return decode_update(trimmed, self.line_no as i64)
                .map(Some)
                .map_err(|e| match e {
                    BotError::Parse(reason) => BotError::Parse(format!("line {}: {}", self.line_no, reason)),
                    other => other,
                });
        }
        Ok(None)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
