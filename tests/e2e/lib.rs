// Provcheck E2E Tests
//
// End-to-end scenarios combining test data, matrix generation, the poller
// and the fakes from provcheck-test-utils.

/// Shared test infrastructure for E2E tests
pub mod utils {
    use provcheck_matrix::{Args, FieldRequirement, Path, TestData};

    /// Upper bound for any single wait against a fake
    pub const WAIT_TIMEOUT_MS: u64 = 2000;

    /// Pause between two polls of a fake
    pub const POLL_DELAY_MS: u64 = 5;

    /// Provider types that cannot provision from ISO
    pub const ISO_UNSUPPORTED_TYPES: &[&str] = &["scvmm"];

    /// Fields a provider needs for ISO provisioning
    pub fn iso_requirements() -> Vec<FieldRequirement> {
        let mut requirements = vec![FieldRequirement::equals(["iso_datastore"], true)];
        requirements.extend(
            [
                "host",
                "datastore",
                "iso_template",
                "iso_file",
                "iso_kickstart",
                "iso_root_password",
                "iso_image_type",
                "vlan",
            ]
            .into_iter()
            .map(|field| FieldRequirement::exists(["provisioning", field])),
        );
        requirements
    }

    /// Secondary filter: supported provider type, and a kickstart template
    /// that the test data actually defines
    pub fn iso_supported<'d>(data: &'d TestData) -> impl Fn(&Args<'_>) -> bool + 'd {
        move |args| {
            let Some(provider) = args.entry("provider") else {
                return false;
            };
            if provider
                .provider_type()
                .map_or(false, |t| ISO_UNSUPPORTED_TYPES.contains(&t))
            {
                return false;
            }
            provider
                .get(&Path::from(["provisioning", "iso_kickstart"]))
                .and_then(|template| template.as_str())
                .map_or(false, |name| {
                    data.contains(&Path::from(["customization_templates", name]))
                })
        }
    }
}
