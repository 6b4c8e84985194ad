use async_trait::async_trait;
use aws_sdk_ec2::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_ec2::types::Filter;
use aws_sdk_ec2::Client as Ec2Client;

use crate::compute::{ComputeApi, InstancePage, InstanceQuery, InstanceSummary};
use crate::error::ApiError;
use crate::model::{ImageId, ImageMetadata, InstanceId};

/// Error codes EC2 returns for images that were deregistered or never existed.
const MISSING_IMAGE_CODES: &[&str] = &["InvalidAMIID.NotFound", "InvalidAMIID.Unavailable"];

/// [`ComputeApi`] backed by the EC2 `DescribeInstances` and `DescribeImages` calls.
pub struct Ec2Compute {
    client: Ec2Client,
}

impl Ec2Compute {
    pub fn new(client: Ec2Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ComputeApi for Ec2Compute {
    async fn list_instances(
        &self,
        query: &InstanceQuery,
        token: Option<&str>,
    ) -> Result<InstancePage, ApiError> {
        let filters = instance_filters(query);

        let resp = self
            .client
            .describe_instances()
            .set_filters((!filters.is_empty()).then_some(filters))
            .set_max_results(query.page_size)
            .set_next_token(token.map(str::to_string))
            .send()
            .await
            .map_err(api_error)?;

        let instances = resp
            .reservations()
            .iter()
            .flat_map(|res| res.instances())
            .map(|inst| InstanceSummary {
                instance_id: inst.instance_id().map(InstanceId::from),
                image_id: inst.image_id().map(ImageId::from),
            })
            .collect();

        Ok(InstancePage {
            instances,
            next_token: resp.next_token().map(str::to_string),
        })
    }

    async fn describe_images(&self, ids: &[ImageId]) -> Result<Vec<ImageMetadata>, ApiError> {
        let result = self
            .client
            .describe_images()
            .set_image_ids(Some(ids.iter().map(ToString::to_string).collect()))
            .send()
            .await;

        let resp = match result {
            Ok(resp) => resp,
            Err(err) if is_missing_image(err.as_service_error().and_then(|e| e.code())) => {
                tracing::debug!(images = ?ids, "images are no longer registered");
                return Ok(Vec::new());
            }
            Err(err) => return Err(api_error(err)),
        };

        Ok(resp
            .images()
            .iter()
            .map(|image| ImageMetadata {
                description: image.description().map(str::to_string),
                name: image.name().map(str::to_string),
                location: image.image_location().map(str::to_string),
                owner_id: image.owner_id().map(str::to_string),
            })
            .collect())
    }
}

fn instance_filters(query: &InstanceQuery) -> Vec<Filter> {
    let mut filters = Vec::new();

    if let Some(image_id) = &query.image_id {
        filters.push(
            Filter::builder()
                .name("image-id")
                .values(image_id.as_str())
                .build(),
        );
    }

    if !query.states.is_empty() {
        filters.push(
            Filter::builder()
                .name("instance-state-name")
                .set_values(Some(query.states.clone()))
                .build(),
        );
    }

    filters
}

fn is_missing_image(code: Option<&str>) -> bool {
    code.is_some_and(|code| MISSING_IMAGE_CODES.contains(&code))
}

fn api_error<E, R>(err: SdkError<E, R>) -> ApiError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let code = err.as_service_error().and_then(|e| e.code()).map(str::to_string);
    ApiError::from_code(code.as_deref(), DisplayErrorContext(&err).to_string())
}
