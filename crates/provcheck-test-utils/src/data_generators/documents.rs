//! Canned test-data documents.

/// A document with one fully configured ISO-provisioning provider, one
/// unsupported provider type and one provider lacking ISO data.
///
/// Only `vsphere65` qualifies for ISO provisioning.
pub fn create_iso_test_data_yaml() -> String {
    r#"
providers:
  vsphere65:
    type: virtualcenter
    class: infra
    version: 6.5
    iso_datastore: true
    provisioning:
      host: esx-01.example.com
      datastore: iso-ds
      iso_template: rhel7-iso
      iso_file: rhel-7.iso
      iso_kickstart: rhel7-kickstart
      iso_root_password: secret
      iso_image_type: RHEL-7
      vlan: VM Network
  scvmm2016:
    type: scvmm
    class: infra
    version: 2016
    iso_datastore: true
    provisioning:
      host: hyperv-01
      datastore: cluster-storage
      iso_template: rhel7-iso
      iso_file: rhel-7.iso
      iso_kickstart: rhel7-kickstart
      iso_root_password: secret
      iso_image_type: RHEL-7
      vlan: External
  rhv43:
    type: rhevm
    class: infra
    version: "4.3"
    iso_datastore: false
    provisioning:
      host: rhv-host-01
      datastore: data
customization_templates:
  rhel7-kickstart:
    type: kickstart
    image_type: RHEL-7
"#
    .to_string()
}

/// A document whose providers all lack provisioning data
pub fn create_no_provisioning_test_data_yaml() -> String {
    r#"
providers:
  ec2east:
    type: ec2
    class: cloud
    version: "1.0"
  openshift:
    type: openshift
    class: container
    version: "4.6"
"#
    .to_string()
}
