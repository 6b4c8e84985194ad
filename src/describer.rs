use crate::compute::{ComputeApi, ScanOptions};
use crate::error::{InventoryError, Stage};
use crate::finder::InstanceFinder;
use crate::model::{ImageId, ImageRecord};

/// Assembles the report entry for one image.
pub struct ImageDescriber<'a, C: ?Sized> {
    api: &'a C,
    finder: InstanceFinder<'a, C>,
    strict: bool,
}

impl<'a, C> ImageDescriber<'a, C>
where
    C: ComputeApi + ?Sized,
{
    pub fn new(api: &'a C, options: ScanOptions) -> Self {
        Self {
            api,
            finder: InstanceFinder::new(api, options),
            strict: false,
        }
    }

    /// Fail with [`InventoryError::NotFound`] instead of writing sentinel
    /// fields when EC2 has no metadata for an image.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub async fn describe(&self, image_id: &ImageId) -> Result<ImageRecord, InventoryError> {
        // Metadata first: a failure here skips the paginated instance lookup.
        let metadata = self
            .api
            .describe_images(std::slice::from_ref(image_id))
            .await
            .map_err(|e| InventoryError::at(Stage::DescribeImage(image_id.clone()), e))?
            .into_iter()
            .next();

        let metadata = match metadata {
            Some(metadata) => metadata,
            None if self.strict => {
                return Err(InventoryError::NotFound {
                    image_id: image_id.clone(),
                })
            }
            None => {
                tracing::warn!(image_id = image_id.as_str(), "no metadata found for image");
                Default::default()
            }
        };

        let instance_ids = self.finder.find_instances(image_id).await?;
        Ok(ImageRecord::new(metadata, instance_ids))
    }
}
