#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use rustami::{
    ApiError, ComputeApi, ImageId, ImageMetadata, InstancePage, InstanceQuery, InstanceSummary,
};

/// A call observed by [`FakeCompute`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List {
        image_id: Option<String>,
        token: Option<String>,
        states: Vec<String>,
        page_size: Option<i32>,
    },
    Describe(Vec<String>),
}

/// Where a scripted failure is injected.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Failure {
    ScanPage(usize),
    FindPage(String, usize),
    Describe(String),
}

/// In-memory compute API that pages a fixed instance listing.
pub struct FakeCompute {
    instances: Vec<InstanceSummary>,
    images: HashMap<String, ImageMetadata>,
    page_size: usize,
    empty_pages: bool,
    blank_final_token: bool,
    failure: Option<(Failure, ApiError)>,
    calls: Mutex<Vec<Call>>,
}

impl FakeCompute {
    pub fn new(instances: &[(&str, &str)]) -> Self {
        Self {
            instances: instances
                .iter()
                .map(|(instance, image)| InstanceSummary::new(*instance, *image))
                .collect(),
            images: HashMap::new(),
            page_size: 50,
            empty_pages: false,
            blank_final_token: false,
            failure: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_instance(mut self, instance: InstanceSummary) -> Self {
        self.instances.push(instance);
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Follows every page with an empty one.
    pub fn with_empty_pages(mut self) -> Self {
        self.empty_pages = true;
        self
    }

    /// Ends listings with `Some("")` rather than `None`.
    pub fn with_blank_final_token(mut self) -> Self {
        self.blank_final_token = true;
        self
    }

    pub fn with_image(mut self, image_id: &str, metadata: ImageMetadata) -> Self {
        self.images.insert(image_id.to_string(), metadata);
        self
    }

    pub fn failing_scan_page(mut self, page: usize) -> Self {
        self.failure = Some((Failure::ScanPage(page), call_error("InternalError")));
        self
    }

    pub fn failing_find_page(mut self, image_id: &str, page: usize) -> Self {
        self.failure = Some((
            Failure::FindPage(image_id.to_string(), page),
            call_error("RequestLimitExceeded"),
        ));
        self
    }

    pub fn failing_describe(mut self, image_id: &str) -> Self {
        self.failure = Some((
            Failure::Describe(image_id.to_string()),
            call_error("InternalError"),
        ));
        self
    }

    pub fn unauthorized(mut self) -> Self {
        self.failure = Some((
            Failure::ScanPage(0),
            ApiError::from_code(Some("AuthFailure"), "AWS was not able to validate the credentials"),
        ));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn list_calls_for(&self, image_id: Option<&str>) -> usize {
        self.calls()
            .iter()
            .filter(|call| {
                matches!(call, Call::List { image_id: id, .. } if id.as_deref() == image_id)
            })
            .count()
    }

    fn pages(&self, image_id: Option<&ImageId>) -> Vec<Vec<InstanceSummary>> {
        let matching: Vec<InstanceSummary> = self
            .instances
            .iter()
            .filter(|i| image_id.is_none() || i.image_id.as_ref() == image_id)
            .cloned()
            .collect();

        let mut pages: Vec<Vec<InstanceSummary>> = matching
            .chunks(self.page_size)
            .map(<[InstanceSummary]>::to_vec)
            .collect();
        if pages.is_empty() {
            pages.push(Vec::new());
        }
        if self.empty_pages {
            pages = pages.into_iter().flat_map(|p| [p, Vec::new()]).collect();
        }
        pages
    }

    fn scripted_failure(&self, failure: &Failure) -> Option<ApiError> {
        match &self.failure {
            Some((scripted, err)) if scripted == failure => Some(clone_error(err)),
            _ => None,
        }
    }
}

#[async_trait]
impl ComputeApi for FakeCompute {
    async fn list_instances(
        &self,
        query: &InstanceQuery,
        token: Option<&str>,
    ) -> Result<InstancePage, ApiError> {
        self.calls.lock().unwrap().push(Call::List {
            image_id: query.image_id.as_ref().map(ToString::to_string),
            token: token.map(str::to_string),
            states: query.states.clone(),
            page_size: query.page_size,
        });

        let index: usize = match token {
            Some(token) => token
                .strip_prefix("page-")
                .and_then(|n| n.parse().ok())
                .expect("token issued by this fake"),
            None => 0,
        };

        let failure = match &query.image_id {
            Some(image_id) => Failure::FindPage(image_id.to_string(), index),
            None => Failure::ScanPage(index),
        };
        if let Some(err) = self.scripted_failure(&failure) {
            return Err(err);
        }

        let mut pages = self.pages(query.image_id.as_ref());
        let next_token = if index + 1 < pages.len() {
            Some(format!("page-{}", index + 1))
        } else if self.blank_final_token {
            Some(String::new())
        } else {
            None
        };

        Ok(InstancePage {
            instances: pages.swap_remove(index),
            next_token,
        })
    }

    async fn describe_images(&self, ids: &[ImageId]) -> Result<Vec<ImageMetadata>, ApiError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Describe(ids.iter().map(ToString::to_string).collect()));

        for id in ids {
            if let Some(err) = self.scripted_failure(&Failure::Describe(id.to_string())) {
                return Err(err);
            }
        }

        Ok(ids
            .iter()
            .filter_map(|id| self.images.get(id.as_str()).cloned())
            .collect())
    }
}

pub fn metadata(description: &str, name: &str, location: &str, owner_id: &str) -> ImageMetadata {
    ImageMetadata {
        description: Some(description.into()),
        name: Some(name.into()),
        location: Some(location.into()),
        owner_id: Some(owner_id.into()),
    }
}

/// Distinct image ids in first-seen order, computed by linear scan.
pub fn distinct_images(instances: &[(String, String)]) -> Vec<ImageId> {
    let mut seen: Vec<ImageId> = Vec::new();
    for (_, image) in instances {
        let image = ImageId::from(image.as_str());
        if !seen.contains(&image) {
            seen.push(image);
        }
    }
    seen
}

fn call_error(code: &str) -> ApiError {
    ApiError::from_code(Some(code), format!("service error: {code}"))
}

fn clone_error(err: &ApiError) -> ApiError {
    match err {
        ApiError::Unauthorized { code, message } => ApiError::Unauthorized {
            code: code.clone(),
            message: message.clone(),
        },
        ApiError::Call { code, message } => ApiError::Call {
            code: code.clone(),
            message: message.clone(),
        },
    }
}
