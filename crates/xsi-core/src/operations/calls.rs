//! Active calls, conferences and call logs

use crate::client::XsiClient;
use crate::error::XsiResult;
use bwks_xml_core::{node_values, Document};
use tracing::info;

impl XsiClient {
    pub async fn get_calls(&self) -> XsiResult<Document> {
        self.get("calls").await
    }

    pub async fn get_conference_calls(&self) -> XsiResult<Document> {
        self.get("calls/conference").await
    }

    /// Release every active call; returns the released call ids
    pub async fn hangup_calls(&self) -> XsiResult<Vec<String>> {
        let calls = self.get_calls().await?;
        self.release_calls(&calls).await
    }

    /// Release every call of the active conference; returns the released call ids
    pub async fn hangup_conference_calls(&self) -> XsiResult<Vec<String>> {
        let calls = self.get_conference_calls().await?;
        self.release_calls(&calls).await
    }

    pub async fn get_call_logs(&self) -> XsiResult<Document> {
        self.get("directories/calllogs").await
    }

    pub async fn delete_call_logs(&self) -> XsiResult<bool> {
        self.delete("directories/calllogs").await
    }

    async fn release_calls(&self, calls: &Document) -> XsiResult<Vec<String>> {
        let ids = node_values(calls.root(), "call/callId");
        for id in &ids {
            self.delete(&format!("calls/{}", id)).await?;
        }
        info!(count = ids.len(), "calls released");
        Ok(ids)
    }
}
