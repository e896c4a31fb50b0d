//! VM provisioning requests against a provider.

use mockall::mock;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProvisionError {
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),
    #[error("Request rejected: {0}")]
    Rejected(String),
    #[error("Provider unreachable: {0}")]
    Unreachable(String),
}

/// What a provisioning request asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionRequest {
    pub provider: String,
    pub vm_name: String,
    pub template: String,
    pub host: String,
    pub datastore: String,
    pub kickstart: Option<String>,
}

pub trait Provisioner {
    fn request(&self, request: &ProvisionRequest) -> Result<(), ProvisionError>;

    fn vm_exists(&self, provider: &str, vm_name: &str) -> Result<bool, ProvisionError>;

    fn delete_vm(&self, provider: &str, vm_name: &str) -> Result<(), ProvisionError>;
}

mock! {
    #[derive(Debug)]
    pub Provisioner {}

    impl Provisioner for Provisioner {
        fn request(&self, request: &ProvisionRequest) -> Result<(), ProvisionError>;
        fn vm_exists(&self, provider: &str, vm_name: &str) -> Result<bool, ProvisionError>;
        fn delete_vm(&self, provider: &str, vm_name: &str) -> Result<(), ProvisionError>;
    }
}
