use aws_config::meta::region::RegionProviderChain;
use aws_config::BehaviorVersion;
use aws_types::region::Region;

use crate::settings::Settings;

/// Builds the SDK configuration shared by every EC2 call of a run.
///
/// The region comes from `region`, then the environment settings, then the
/// default provider chain. A named `profile` takes precedence over static
/// credentials from the environment.
pub async fn configure_aws(
    settings: &Settings,
    region: Option<String>,
    profile: Option<&str>,
) -> aws_types::SdkConfig {
    let region = region
        .filter(|r| !r.is_empty())
        .or_else(|| settings.region().map(str::to_string));
    let region_provider =
        RegionProviderChain::first_try(region.map(Region::new)).or_default_provider();

    let loader = aws_config::defaults(BehaviorVersion::v2024_03_28()).region(region_provider);
    let loader = match (profile, settings.static_credentials()) {
        (Some(profile), _) => loader.profile_name(profile),
        (None, Some(credentials)) => loader.credentials_provider(credentials),
        (None, None) => loader,
    };

    loader.load().await
}
