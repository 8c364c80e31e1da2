//! Edit widget for a collection's marketing details.
//!
//! ```text
//! Idle ──load──▶ Loading ──ok──▶ Ready ──open_editor──▶ Editing ──save──▶ Saving
//!                  │  ▲             ▲                      │  ▲              │
//!                  └──┘ err         └────── cancel ────────┘  └──── err ─────┤
//!                                   ▲                                         │
//!                                   └─────────────────── ok ──────────────────┘
//! ```
//!
//! A failed load leaves the widget in `Loading` for good; there is no retry
//! and no error state. A failed save reopens the editor with the form intact
//! and the displayed details unchanged. Each async operation is split into a
//! `begin_*` and `finish_*` step so the intermediate state can be observed.

use super::{
    client::{ClientError, ClientResult, DetailsClient},
    view::{DetailsView, WidgetView},
};
use crate::models::{
    collection::Collection,
    details::{self, CollectionMarketingDetails, DetailsResponse, ValidationError},
};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetState {
    Idle,
    Loading,
    Ready {
        details: CollectionMarketingDetails,
    },
    Editing {
        details: CollectionMarketingDetails,
        form: CollectionMarketingDetails,
    },
    Saving {
        details: CollectionMarketingDetails,
        form: CollectionMarketingDetails,
    },
}

impl WidgetState {
    pub fn name(&self) -> &'static str {
        match self {
            WidgetState::Idle => "idle",
            WidgetState::Loading => "loading",
            WidgetState::Ready { .. } => "ready",
            WidgetState::Editing { .. } => "editing",
            WidgetState::Saving { .. } => "saving",
        }
    }
}

#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("cannot {action} while {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },
    #[error(transparent)]
    InvalidForm(#[from] ValidationError),
    #[error("saving collection details failed: {0}")]
    Save(#[from] ClientError),
}

pub struct DetailsWidget<C> {
    collection_id: String,
    client: C,
    state: WidgetState,
}

impl<C: DetailsClient> DetailsWidget<C> {
    pub fn new(collection_id: impl Into<String>, client: C) -> Self {
        Self {
            collection_id: collection_id.into(),
            client,
            state: WidgetState::Idle,
        }
    }

    pub fn collection_id(&self) -> &str {
        &self.collection_id
    }

    pub fn state(&self) -> &WidgetState {
        &self.state
    }

    /// Details currently on display, once loaded.
    pub fn details(&self) -> Option<&CollectionMarketingDetails> {
        match &self.state {
            WidgetState::Idle | WidgetState::Loading => None,
            WidgetState::Ready { details }
            | WidgetState::Editing { details, .. }
            | WidgetState::Saving { details, .. } => Some(details),
        }
    }

    /// The edit affordance only exists once details are loaded.
    pub fn can_edit(&self) -> bool {
        matches!(self.state, WidgetState::Ready { .. })
    }

    pub fn is_editor_open(&self) -> bool {
        matches!(
            self.state,
            WidgetState::Editing { .. } | WidgetState::Saving { .. }
        )
    }

    pub fn view(&self) -> WidgetView {
        match self.details() {
            Some(details) => WidgetView::Details(DetailsView::from(details)),
            None => WidgetView::Loading,
        }
    }

    /// Form values, editable only while the editor is open and idle.
    pub fn form_mut(&mut self) -> Option<&mut CollectionMarketingDetails> {
        match &mut self.state {
            WidgetState::Editing { form, .. } => Some(form),
            _ => None,
        }
    }

    pub fn begin_load(&mut self) -> Result<(), WidgetError> {
        match self.state {
            WidgetState::Idle | WidgetState::Loading | WidgetState::Ready { .. } => {
                self.state = WidgetState::Loading;
                Ok(())
            }
            _ => Err(self.invalid("load")),
        }
    }

    /// Apply a read result. Failures are logged and swallowed.
    pub fn finish_load(&mut self, result: ClientResult<DetailsResponse>) -> Result<(), WidgetError> {
        if self.state != WidgetState::Loading {
            return Err(self.invalid("finish loading"));
        }
        match result {
            Ok(response) => {
                debug!(collection_id = %self.collection_id, "collection details loaded");
                self.state = WidgetState::Ready {
                    details: response.into(),
                };
            }
            Err(err) => {
                error!(
                    collection_id = %self.collection_id,
                    "failed to load collection details: {}", err
                );
            }
        }
        Ok(())
    }

    pub async fn load(&mut self) -> Result<(), WidgetError> {
        self.begin_load()?;
        let result = self.client.fetch_details(&self.collection_id).await;
        self.finish_load(result)
    }

    /// Open the editor seeded with the details on display.
    pub fn open_editor(&mut self) -> Result<(), WidgetError> {
        match std::mem::replace(&mut self.state, WidgetState::Idle) {
            WidgetState::Ready { details } => {
                self.state = WidgetState::Editing {
                    form: details.clone(),
                    details,
                };
                Ok(())
            }
            other => {
                self.state = other;
                Err(self.invalid("open the editor"))
            }
        }
    }

    /// Close the editor and drop the form.
    pub fn cancel(&mut self) -> Result<(), WidgetError> {
        match std::mem::replace(&mut self.state, WidgetState::Idle) {
            WidgetState::Editing { details, .. } => {
                self.state = WidgetState::Ready { details };
                Ok(())
            }
            other => {
                self.state = other;
                Err(self.invalid("cancel"))
            }
        }
    }

    /// Validate the form and enter `Saving`. Returns the payload to send.
    ///
    /// An invalid form keeps the editor open.
    pub fn begin_save(&mut self) -> Result<CollectionMarketingDetails, WidgetError> {
        let WidgetState::Editing { form, .. } = &self.state else {
            return Err(self.invalid("save"));
        };
        details::validate(&Value::Object(form.to_metadata()))?;

        match std::mem::replace(&mut self.state, WidgetState::Idle) {
            WidgetState::Editing { details, form } => {
                self.state = WidgetState::Saving {
                    details,
                    form: form.clone(),
                };
                Ok(form)
            }
            other => {
                self.state = other;
                Err(self.invalid("save"))
            }
        }
    }

    /// Apply a write result.
    ///
    /// On success the submitted form becomes the displayed details and the
    /// editor closes. On failure the editor stays open and the error is
    /// returned.
    pub fn finish_save(&mut self, result: ClientResult<Collection>) -> Result<(), WidgetError> {
        match std::mem::replace(&mut self.state, WidgetState::Idle) {
            WidgetState::Saving { details, form } => match result {
                Ok(collection) => {
                    debug!(
                        collection_id = %self.collection_id,
                        version = collection.version,
                        "collection details saved"
                    );
                    self.state = WidgetState::Ready { details: form };
                    Ok(())
                }
                Err(err) => {
                    self.state = WidgetState::Editing { details, form };
                    Err(WidgetError::Save(err))
                }
            },
            other => {
                self.state = other;
                Err(self.invalid("finish saving"))
            }
        }
    }

    pub async fn save(&mut self) -> Result<(), WidgetError> {
        let payload = self.begin_save()?;
        let result = self.client.save_details(&self.collection_id, &payload).await;
        self.finish_save(result)
    }

    fn invalid(&self, action: &'static str) -> WidgetError {
        WidgetError::InvalidTransition {
            action,
            state: self.state.name(),
        }
    }
}
