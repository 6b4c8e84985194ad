use indexmap::IndexMap;
use serde::Serialize;

use crate::compute::{ComputeApi, ScanOptions};
use crate::describer::ImageDescriber;
use crate::error::InventoryError;
use crate::model::{ImageId, ImageRecord};
use crate::scanner::InstanceScanner;

/// Options for one inventory run.
#[derive(Debug, Clone, Default)]
pub struct InventoryOptions {
    pub scan: ScanOptions,
    /// Treat an image without metadata as an error.
    pub strict: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderStyle {
    /// Four space indentation.
    #[default]
    Pretty,
    Compact,
}

/// Image records keyed by image id, in the order the images were discovered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Report {
    records: IndexMap<ImageId, ImageRecord>,
}

impl Report {
    pub fn get(&self, image_id: &ImageId) -> Option<&ImageRecord> {
        self.records.get(image_id)
    }

    pub fn image_ids(&self) -> impl Iterator<Item = &ImageId> {
        self.records.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ImageId, &ImageRecord)> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn insert(&mut self, image_id: ImageId, record: ImageRecord) {
        self.records.insert(image_id, record);
    }

    pub fn render(&self, style: RenderStyle) -> Result<String, InventoryError> {
        match style {
            RenderStyle::Compact => Ok(serde_json::to_string(self)?),
            RenderStyle::Pretty => {
                let mut buf = Vec::new();
                let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
                let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
                self.serialize(&mut serializer)?;
                String::from_utf8(buf)
                    .map_err(|e| InventoryError::Serialization(serde::ser::Error::custom(e)))
            }
        }
    }
}

/// Drives the scan and per-image lookups into a [`Report`].
pub struct ReportAssembler<'a, C: ?Sized> {
    scanner: InstanceScanner<'a, C>,
    describer: ImageDescriber<'a, C>,
}

impl<'a, C> ReportAssembler<'a, C>
where
    C: ComputeApi + ?Sized,
{
    pub fn new(api: &'a C, options: InventoryOptions) -> Self {
        Self {
            scanner: InstanceScanner::new(api, options.scan.clone()),
            describer: ImageDescriber::new(api, options.scan).strict(options.strict),
        }
    }

    /// Builds the full report. The first failing call aborts the run.
    pub async fn build(&self) -> Result<Report, InventoryError> {
        let image_ids = self.scanner.scan_image_ids().await?;
        let mut report = Report::default();

        for image_id in image_ids {
            let record = self.describer.describe(&image_id).await?;
            report.insert(image_id, record);
        }

        tracing::info!(images = report.len(), "built image inventory");
        Ok(report)
    }
}
