//! End-to-end tests for provisioning VMs from ISO across a provider matrix.
//!
//! Each test:
//! 1. Loads provider test data
//! 2. Builds the matrix of providers able to provision from ISO
//! 3. Runs the provisioning body once per provider against the fake provisioner
//! 4. Waits for the VM to appear and cleans it up through finalizers

use provcheck_e2e_tests::utils::{iso_requirements, iso_supported, POLL_DELAY_MS, WAIT_TIMEOUT_MS};
use provcheck_matrix::{Args, MatrixGenerator, MatrixRunner, Path, ProviderClass, RunStatus, TestData};
use provcheck_test_utils::{
    assert_matrix_consistent, assert_matrix_ids,
    data_generators::{create_iso_test_data_yaml, create_no_provisioning_test_data_yaml},
    gen_alphanumeric_with_prefix,
    implementations::FakeProvisioner,
    init_test_tracing,
    mocks::{ProvisionRequest, Provisioner},
    Finalizers, ProviderBuilder, TestConfig, TestDataBuilder,
};
use std::time::Duration;

fn iso_matrix(data: &TestData) -> provcheck_matrix::Matrix {
    MatrixGenerator::new()
        .classes([ProviderClass::Infra])
        .requirements(iso_requirements())
        .generate_filtered(data.providers(), iso_supported(data))
}

fn field(args: &Args<'_>, name: &str) -> anyhow::Result<String> {
    let provider = args
        .entry("provider")
        .ok_or_else(|| anyhow::anyhow!("missing provider argument"))?;
    provider
        .get(&Path::from(["provisioning", name]))
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("{} has no provisioning.{}", provider.name(), name))
}

/// Provision one VM from ISO and wait until the provider reports it
fn provision_from_iso(provisioner: &dyn Provisioner, args: &Args<'_>) -> anyhow::Result<()> {
    let provider = args.id().to_string();
    let vm_name = gen_alphanumeric_with_prefix(20, "test_iso_prov_");

    let finalizers = Finalizers::new();
    {
        let provider = provider.clone();
        let vm_name = vm_name.clone();
        finalizers.add(format!("delete {}", vm_name), move || {
            provisioner.delete_vm(&provider, &vm_name)?;
            Ok(())
        });
    }

    provisioner.request(&ProvisionRequest {
        provider: provider.clone(),
        vm_name: vm_name.clone(),
        template: field(args, "iso_template")?,
        host: field(args, "host")?,
        datastore: field(args, "datastore")?,
        kickstart: Some(field(args, "iso_kickstart")?),
    })?;

    let config = TestConfig {
        timeout: Duration::from_millis(WAIT_TIMEOUT_MS),
        retry_interval: Duration::from_millis(POLL_DELAY_MS),
    };
    config
        .poller()
        .message(format!("VM {} to appear on {}", vm_name, provider))
        .try_until(|| provisioner.vm_exists(&provider, &vm_name))?;

    finalizers.run_all()?;
    Ok(())
}

#[test]
fn test_iso_matrix_selects_supported_providers() {
    init_test_tracing();
    let data = TestData::from_yaml_str(&create_iso_test_data_yaml()).unwrap();

    let matrix = iso_matrix(&data);

    // scvmm is unsupported, rhv43 has no ISO datastore
    assert_matrix_ids(&matrix, &["vsphere65"]).unwrap();
    assert_matrix_consistent(&matrix).unwrap();
}

#[test]
fn test_provision_from_iso() {
    init_test_tracing();
    let data = TestData::from_yaml_str(&create_iso_test_data_yaml()).unwrap();
    let matrix = iso_matrix(&data);
    let provisioner = FakeProvisioner::new(["vsphere65"], 3);

    let summary = MatrixRunner::new("test_provision_from_iso")
        .run(&matrix, |args| provision_from_iso(&provisioner, args));

    assert_eq!(summary.status(), RunStatus::Passed);
    let requests = provisioner.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].provider, "vsphere65");
    assert_eq!(requests[0].kickstart.as_deref(), Some("rhel7-kickstart"));
    assert!(requests[0].vm_name.starts_with("test_iso_prov_"));
    assert_eq!(provisioner.deleted(), vec![("vsphere65".to_string(), requests[0].vm_name.clone())]);
}

#[test]
fn test_one_failing_provider_does_not_stop_the_others() {
    init_test_tracing();
    let data = TestDataBuilder::new()
        .provider(ProviderBuilder::infra("vsphere67", "virtualcenter", "6.7").iso_ready("rhel7-kickstart"))
        .provider(ProviderBuilder::infra("rhv44", "rhevm", "4.4").iso_ready("rhel7-kickstart"))
        .provider(ProviderBuilder::infra("vsphere70", "virtualcenter", "7.0").iso_ready("rhel8-kickstart"))
        .provider(ProviderBuilder::infra("rhv45", "rhevm", "4.5").iso_ready("no-such-template"))
        .customization_template("rhel7-kickstart", "kickstart")
        .customization_template("rhel8-kickstart", "kickstart")
        .build()
        .unwrap();

    let matrix = iso_matrix(&data);
    assert_matrix_ids(&matrix, &["vsphere67", "rhv44", "vsphere70"]).unwrap();

    // rhv44 is unknown to the provisioner and fails its request
    let provisioner = FakeProvisioner::new(["vsphere67", "vsphere70"], 1);
    let summary = MatrixRunner::new("test_provision_from_iso")
        .run(&matrix, |args| provision_from_iso(&provisioner, args));

    assert_eq!(summary.status(), RunStatus::Failed);
    assert_eq!(summary.failed_ids(), vec!["rhv44".to_string()]);
    assert_eq!(summary.passed(), 2);
    assert_eq!(provisioner.requests().len(), 2);

    let err = summary.into_result().unwrap_err();
    assert!(err.to_string().contains("1 of 3 cases failed (rhv44)"));
}

#[test]
fn test_vm_that_never_appears_times_out() {
    init_test_tracing();
    let data = TestData::from_yaml_str(&create_iso_test_data_yaml()).unwrap();
    let matrix = iso_matrix(&data);
    let provisioner = FakeProvisioner::new(["vsphere65"], usize::MAX);

    let summary = MatrixRunner::new("test_provision_from_iso").run(&matrix, |args| {
        let vm_name = gen_alphanumeric_with_prefix(20, "test_iso_prov_");
        provisioner.request(&ProvisionRequest {
            provider: args.id().to_string(),
            vm_name: vm_name.clone(),
            template: field(args, "iso_template")?,
            host: field(args, "host")?,
            datastore: field(args, "datastore")?,
            kickstart: None,
        })?;
        provcheck_core::Poller::new(Duration::from_millis(30))
            .delay(Duration::from_millis(POLL_DELAY_MS))
            .message(format!("VM {} to appear", vm_name))
            .try_until(|| provisioner.vm_exists(args.id(), &vm_name))?;
        Ok(())
    });

    assert_eq!(summary.status(), RunStatus::Failed);
    let outcome = summary.outcome("vsphere65").unwrap().to_string();
    assert!(outcome.contains("Timed out"), "unexpected outcome: {}", outcome);
}

#[test]
fn test_no_provider_with_provisioning_data_skips() {
    init_test_tracing();
    let data = TestData::from_yaml_str(&create_no_provisioning_test_data_yaml()).unwrap();
    let matrix = iso_matrix(&data);
    assert!(matrix.is_empty());

    let provisioner = FakeProvisioner::new(Vec::<String>::new(), 0);
    let summary = MatrixRunner::new("test_provision_from_iso")
        .run(&matrix, |args| provision_from_iso(&provisioner, args));

    assert_eq!(summary.status(), RunStatus::Skipped);
    assert!(summary.into_result().is_ok());
    assert!(provisioner.requests().is_empty());
}
