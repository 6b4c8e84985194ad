use clap::Parser;

use crate::compute::ScanOptions;
use crate::report::{InventoryOptions, RenderStyle};

const INSTANCE_STATES: [&str; 6] = [
    "pending",
    "running",
    "shutting-down",
    "terminated",
    "stopping",
    "stopped",
];

/// Report the AMIs in use in a region and the instances launched from each.
#[derive(Parser, Debug)]
#[command(name = "rustami", version, about)]
pub struct Cli {
    /// AWS region to inventory (defaults to AWS_DEFAULT_REGION, then the SDK chain)
    #[arg(short, long)]
    pub region: Option<String>,

    /// Named profile from the shared AWS config files
    #[arg(short, long)]
    pub profile: Option<String>,

    /// Instances requested per DescribeInstances page
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(i32).range(5..=1000))]
    pub page_size: i32,

    /// Only consider instances in this state (repeatable)
    #[arg(long = "state", value_parser = INSTANCE_STATES)]
    pub states: Vec<String>,

    /// Fail when an in-use image has no metadata instead of reporting "null" fields
    #[arg(long)]
    pub strict: bool,

    /// Print the report on a single line
    #[arg(long)]
    pub compact: bool,
}

impl Cli {
    pub fn inventory_options(&self) -> InventoryOptions {
        InventoryOptions {
            scan: ScanOptions {
                page_size: Some(self.page_size),
                states: self.states.clone(),
            },
            strict: self.strict,
        }
    }

    pub fn render_style(&self) -> RenderStyle {
        if self.compact {
            RenderStyle::Compact
        } else {
            RenderStyle::Pretty
        }
    }
}
