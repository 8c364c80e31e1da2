//! What the widget shows, independent of any UI toolkit.

use crate::models::details::CollectionMarketingDetails;
use std::fmt;

pub const LOADING: &str = "Loading...";
pub const NO_DETAILS: &str = "No details available";
pub const NO_PAGE_DETAILS: &str = "Collection page details not entered";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetView {
    Loading,
    Details(DetailsView),
}

/// Displayable fields. Empty strings are treated as not set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailsView {
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub page_image_url: Option<String>,
    pub page_heading: Option<String>,
    pub page_content: Option<String>,
}

fn non_empty(text: &Option<String>) -> Option<String> {
    text.as_ref().filter(|t| !t.is_empty()).cloned()
}

impl From<&CollectionMarketingDetails> for DetailsView {
    fn from(details: &CollectionMarketingDetails) -> Self {
        Self {
            image_url: details.image.as_ref().map(|i| i.url.clone()),
            description: non_empty(&details.description),
            page_image_url: details.collection_page_image.as_ref().map(|i| i.url.clone()),
            page_heading: non_empty(&details.collection_page_heading),
            page_content: non_empty(&details.collection_page_content),
        }
    }
}

impl DetailsView {
    pub fn shows_details_placeholder(&self) -> bool {
        self.image_url.is_none() && self.description.is_none()
    }

    pub fn shows_page_placeholder(&self) -> bool {
        self.page_image_url.is_none() && self.page_heading.is_none() && self.page_content.is_none()
    }
}

impl fmt::Display for DetailsView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(url) = &self.image_url {
            writeln!(f, "[image] {}", url)?;
        }
        if let Some(description) = &self.description {
            writeln!(f, "{}", description)?;
        }
        if self.shows_details_placeholder() {
            writeln!(f, "{}", NO_DETAILS)?;
        }

        writeln!(f, "Collection Page")?;
        if let Some(url) = &self.page_image_url {
            writeln!(f, "[image] {}", url)?;
        }
        if let Some(heading) = &self.page_heading {
            writeln!(f, "{}", heading)?;
        }
        if let Some(content) = &self.page_content {
            writeln!(f, "{}", content)?;
        }
        if self.shows_page_placeholder() {
            writeln!(f, "{}", NO_PAGE_DETAILS)?;
        }
        Ok(())
    }
}

impl fmt::Display for WidgetView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WidgetView::Loading => writeln!(f, "{}", LOADING),
            WidgetView::Details(view) => fmt::Display::fmt(view, f),
        }
    }
}
