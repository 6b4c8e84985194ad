use crate::compute::{walk_instances, ComputeApi, InstanceQuery, ScanOptions};
use crate::error::{InventoryError, Stage};
use crate::model::{ImageId, InstanceId};

/// Looks up the instances launched from a single image.
pub struct InstanceFinder<'a, C: ?Sized> {
    api: &'a C,
    options: ScanOptions,
}

impl<'a, C> InstanceFinder<'a, C>
where
    C: ComputeApi + ?Sized,
{
    pub fn new(api: &'a C, options: ScanOptions) -> Self {
        Self { api, options }
    }

    /// Instance ids using `image_id`, in listing order across pages.
    ///
    /// No matching instance is `Ok` with an empty list. Any failed page is an
    /// error and discards the pages already read.
    pub async fn find_instances(
        &self,
        image_id: &ImageId,
    ) -> Result<Vec<InstanceId>, InventoryError> {
        let query = InstanceQuery::for_image(image_id, &self.options);
        let mut instance_ids = Vec::new();

        walk_instances(self.api, &query, |instance| {
            if let Some(instance_id) = instance.instance_id {
                instance_ids.push(instance_id);
            }
        })
        .await
        .map_err(|e| InventoryError::at(Stage::FindInstances(image_id.clone()), e))?;

        tracing::debug!(
            image_id = image_id.as_str(),
            instances = instance_ids.len(),
            "found instances for image"
        );
        Ok(instance_ids)
    }
}
