use async_trait::async_trait;

use crate::error::ApiError;
use crate::model::{ImageId, ImageMetadata, InstanceId};

/// Listing options shared by the unfiltered scan and every per-image lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// Maximum instances per page, `None` lets the service decide.
    pub page_size: Option<i32>,
    /// `instance-state-name` values to keep; empty keeps every state.
    pub states: Vec<String>,
}

/// Parameters of one instance listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstanceQuery {
    pub image_id: Option<ImageId>,
    pub states: Vec<String>,
    pub page_size: Option<i32>,
}

impl InstanceQuery {
    pub fn all(options: &ScanOptions) -> Self {
        Self {
            image_id: None,
            states: options.states.clone(),
            page_size: options.page_size,
        }
    }

    pub fn for_image(image_id: &ImageId, options: &ScanOptions) -> Self {
        Self {
            image_id: Some(image_id.clone()),
            ..Self::all(options)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstanceSummary {
    pub instance_id: Option<InstanceId>,
    pub image_id: Option<ImageId>,
}

impl InstanceSummary {
    pub fn new(instance_id: impl Into<InstanceId>, image_id: impl Into<ImageId>) -> Self {
        Self {
            instance_id: Some(instance_id.into()),
            image_id: Some(image_id.into()),
        }
    }
}

/// One page of an instance listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstancePage {
    pub instances: Vec<InstanceSummary>,
    pub next_token: Option<String>,
}

/// The remote compute API the inventory is built from.
#[async_trait]
pub trait ComputeApi: Send + Sync {
    /// Fetches a single page of instances, continuing from `token` when given.
    async fn list_instances(
        &self,
        query: &InstanceQuery,
        token: Option<&str>,
    ) -> Result<InstancePage, ApiError>;

    /// Describes the given images. Unknown images are simply absent from the result.
    async fn describe_images(&self, ids: &[ImageId]) -> Result<Vec<ImageMetadata>, ApiError>;
}

/// Walks every page of `query`, handing each instance to `visit` in listing order.
///
/// Pagination stops when the service returns no token or an empty one. Returns
/// the number of pages fetched.
pub(crate) async fn walk_instances<C, F>(
    api: &C,
    query: &InstanceQuery,
    mut visit: F,
) -> Result<usize, ApiError>
where
    C: ComputeApi + ?Sized,
    F: FnMut(InstanceSummary),
{
    let mut token: Option<String> = None;
    let mut pages = 0;

    loop {
        let page = api.list_instances(query, token.as_deref()).await?;
        pages += 1;
        tracing::debug!(
            page = pages,
            instances = page.instances.len(),
            image_id = query.image_id.as_ref().map(ImageId::as_str),
            "fetched instance page"
        );

        for instance in page.instances {
            visit(instance);
        }

        token = page.next_token.filter(|t| !t.is_empty());
        if token.is_none() {
            break;
        }
    }

    Ok(pages)
}
