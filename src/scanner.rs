use indexmap::IndexSet;

use crate::compute::{walk_instances, ComputeApi, InstanceQuery, ScanOptions};
use crate::error::{InventoryError, Stage};
use crate::model::ImageId;

/// Discovers the images behind every listed instance.
pub struct InstanceScanner<'a, C: ?Sized> {
    api: &'a C,
    options: ScanOptions,
}

impl<'a, C> InstanceScanner<'a, C>
where
    C: ComputeApi + ?Sized,
{
    pub fn new(api: &'a C, options: ScanOptions) -> Self {
        Self { api, options }
    }

    /// Returns each distinct image id once, in the order it was first seen.
    ///
    /// A failure on any page fails the whole scan; nothing gathered before the
    /// failing page is returned.
    pub async fn scan_image_ids(&self) -> Result<Vec<ImageId>, InventoryError> {
        let query = InstanceQuery::all(&self.options);
        let mut image_ids = IndexSet::new();
        let mut instances = 0usize;

        let pages = walk_instances(self.api, &query, |instance| {
            instances += 1;
            match instance.image_id {
                Some(image_id) => {
                    image_ids.insert(image_id);
                }
                None => tracing::debug!(
                    instance_id = instance.instance_id.as_ref().map(|id| id.as_str()),
                    "instance has no image id"
                ),
            }
        })
        .await
        .map_err(|e| InventoryError::at(Stage::Scan, e))?;

        tracing::info!(
            pages,
            instances,
            images = image_ids.len(),
            "scanned instances"
        );
        Ok(image_ids.into_iter().collect())
    }
}
