//! Base stream implementation
//!
//! One `Stream` instance covers one entity type for one sync invocation.
//! Instances are constructed fresh per sync from the fetch capability,
//! the tap configuration, and the bookmark store, and hold no other
//! state.

use super::child;
use super::descriptor::{format_endpoint, Modifier, StreamDescriptor, SyncMode};
use super::modify::{apply_modifier, CustomFieldMaps};
use super::RecordSink;
use crate::config::TapConfig;
use crate::error::{Error, Result};
use crate::http::TrelloApi;
use crate::state::BookmarkStore;
use crate::types::Record;
use std::sync::Arc;

/// A syncable entity type bound to its collaborators
pub struct Stream {
    descriptor: &'static StreamDescriptor,
    api: Arc<dyn TrelloApi>,
    config: Arc<TapConfig>,
    store: BookmarkStore,
    /// Effective page size: config override or descriptor default
    page_size: Option<usize>,
}

impl Stream {
    /// Construct a stream for one sync invocation
    pub fn new(
        descriptor: &'static StreamDescriptor,
        api: Arc<dyn TrelloApi>,
        config: Arc<TapConfig>,
        store: BookmarkStore,
    ) -> Result<Self> {
        let page_size = config.page_size_for(descriptor.id, descriptor.max_page_size)?;
        Ok(Self {
            descriptor,
            api,
            config,
            store,
            page_size,
        })
    }

    /// The stream's stable name
    pub fn id(&self) -> &'static str {
        self.descriptor.id
    }

    /// The stream's static descriptor
    pub fn descriptor(&self) -> &'static StreamDescriptor {
        self.descriptor
    }

    /// Effective page size after config overrides
    pub fn page_size(&self) -> Option<usize> {
        self.page_size
    }

    pub(crate) fn api(&self) -> &dyn TrelloApi {
        self.api.as_ref()
    }

    pub(crate) fn api_arc(&self) -> &Arc<dyn TrelloApi> {
        &self.api
    }

    pub(crate) fn config(&self) -> &TapConfig {
        &self.config
    }

    pub(crate) fn config_arc(&self) -> &Arc<TapConfig> {
        &self.config
    }

    pub(crate) fn store(&self) -> &BookmarkStore {
        &self.store
    }

    /// Values for the endpoint template's positional placeholders.
    ///
    /// Top-level streams are scoped to the authenticated member; child
    /// streams receive their parent id from the iteration instead.
    pub fn format_values(&self) -> Vec<String> {
        match self.descriptor.sync_mode {
            SyncMode::TopLevel => vec![self.api.member_id().to_string()],
            SyncMode::Child | SyncMode::WindowedChild => Vec::new(),
        }
    }

    /// Fetch one batch of records and apply the stream's modifier.
    ///
    /// Issues a single request with `limit` (when the entity has a cap),
    /// the descriptor's static parameters, and any `additional_params`.
    /// For capped entities without native pagination, a response that
    /// fills the cap means the API silently dropped the remainder; that
    /// is a fatal error raised before any record of the batch is
    /// yielded.
    pub async fn get_records(
        &self,
        format_values: &[String],
        additional_params: &[(String, String)],
    ) -> Result<Vec<Record>> {
        let endpoint = format_endpoint(self.descriptor.endpoint, format_values)?;

        // Custom fields are defined per board, so the maps are rebuilt
        // for each parent this is called with.
        let custom_fields = match (self.descriptor.modifier, format_values.first()) {
            (Modifier::CustomFields, Some(board_id)) => {
                Some(CustomFieldMaps::load(self.api.as_ref(), board_id).await?)
            }
            _ => None,
        };

        let mut params: Vec<(String, String)> = Vec::new();
        if let Some(size) = self.page_size {
            params.push(("limit".to_string(), size.to_string()));
        }
        for (key, value) in self.descriptor.params {
            params.push(((*key).to_string(), (*value).to_string()));
        }
        params.extend(additional_params.iter().cloned());

        let records = self.api.get_list(&endpoint, &params).await?;

        if !self.descriptor.sync_mode.is_windowed() {
            if let Some(limit) = self.page_size {
                if records.len() >= limit {
                    return Err(Error::PageLimitExceeded {
                        stream: self.id().to_string(),
                        limit,
                    });
                }
            }
        }

        let parent_id = format_values.first().map(String::as_str);
        Ok(records
            .into_iter()
            .map(|record| {
                apply_modifier(
                    self.descriptor.modifier,
                    record,
                    parent_id,
                    custom_fields.as_ref(),
                )
            })
            .collect())
    }

    /// Extract every record of this stream into the sink.
    ///
    /// Top-level full-table streams are a single fetch; child streams run
    /// the parent-iteration state machine, which layers date windowing on
    /// top for incremental streams.
    pub async fn sync(&self, sink: &mut dyn RecordSink) -> Result<()> {
        match self.descriptor.sync_mode {
            SyncMode::TopLevel => {
                let records = self.get_records(&self.format_values(), &[]).await?;
                for record in records {
                    sink.push(self.id(), record)?;
                }
                Ok(())
            }
            SyncMode::Child | SyncMode::WindowedChild => child::sync_child(self, sink).await,
        }
    }
}

impl std::fmt::Debug for Stream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stream")
            .field("id", &self.descriptor.id)
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}
