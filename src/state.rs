use std::sync::{Arc, RwLock};

use crate::models::PictureRecord;
use crate::upstream::PictureClient;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub pictures: PictureClient,
    /// Last picture fetched successfully; overwritten by every new fetch.
    pub current: Arc<RwLock<Option<PictureRecord>>>,
}

impl AppState {
    pub fn new(pictures: PictureClient) -> Self {
        Self {
            pictures,
            current: Arc::new(RwLock::new(None)),
        }
    }

    pub fn current_picture(&self) -> Option<PictureRecord> {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn set_current_picture(&self, record: PictureRecord) {
        *self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(record);
    }
}
