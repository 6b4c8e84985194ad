//! Inventory of the AMIs backing EC2 instances.
//!
//! The pipeline scans every instance for its image id, describes each distinct
//! image and looks up the instances launched from it, then folds the results
//! into a [`Report`] keyed by image id in discovery order.

pub mod aws_config;
pub mod cli;
pub mod compute;
pub mod describer;
pub mod ec2;
pub mod error;
pub mod finder;
pub mod model;
pub mod report;
pub mod scanner;
pub mod settings;

pub use compute::{ComputeApi, InstancePage, InstanceQuery, InstanceSummary, ScanOptions};
pub use describer::ImageDescriber;
pub use ec2::Ec2Compute;
pub use error::{ApiError, InventoryError, Stage};
pub use finder::InstanceFinder;
pub use model::{ImageId, ImageMetadata, ImageRecord, InstanceId, NULL_SENTINEL};
pub use report::{InventoryOptions, RenderStyle, Report, ReportAssembler};
pub use scanner::InstanceScanner;
pub use settings::Settings;
