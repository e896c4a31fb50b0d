//! Provisioner fake where VMs show up after a number of status checks.

use crate::mocks::{ProvisionError, ProvisionRequest, Provisioner};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// In-memory provisioner for testing.
///
/// Known providers accept requests; a requested VM reports as existing once
/// `checks_until_ready` calls to [`vm_exists`](Provisioner::vm_exists) have
/// been made for it.
#[derive(Debug)]
pub struct FakeProvisioner {
    providers: HashSet<String>,
    checks_until_ready: usize,
    // (provider, vm) -> remaining checks
    pending: Mutex<HashMap<(String, String), usize>>,
    requests: Mutex<Vec<ProvisionRequest>>,
    deleted: Mutex<Vec<(String, String)>>,
}

impl FakeProvisioner {
    pub fn new<I, S>(providers: I, checks_until_ready: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            providers: providers.into_iter().map(Into::into).collect(),
            checks_until_ready,
            pending: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ProvisionRequest> {
        self.requests.lock().clone()
    }

    pub fn deleted(&self) -> Vec<(String, String)> {
        self.deleted.lock().clone()
    }

    fn known(&self, provider: &str) -> Result<(), ProvisionError> {
        if self.providers.contains(provider) {
            Ok(())
        } else {
            Err(ProvisionError::UnknownProvider(provider.to_string()))
        }
    }
}

impl Provisioner for FakeProvisioner {
    fn request(&self, request: &ProvisionRequest) -> Result<(), ProvisionError> {
        self.known(&request.provider)?;
        debug!(provider = %request.provider, vm = %request.vm_name, "Provision request accepted");
        self.pending.lock().insert(
            (request.provider.clone(), request.vm_name.clone()),
            self.checks_until_ready,
        );
        self.requests.lock().push(request.clone());
        Ok(())
    }

    fn vm_exists(&self, provider: &str, vm_name: &str) -> Result<bool, ProvisionError> {
        self.known(provider)?;
        let mut pending = self.pending.lock();
        match pending.get_mut(&(provider.to_string(), vm_name.to_string())) {
            Some(0) => Ok(true),
            Some(remaining) => {
                *remaining -= 1;
                Ok(false)
            }
            None => Ok(false),
        }
    }

    fn delete_vm(&self, provider: &str, vm_name: &str) -> Result<(), ProvisionError> {
        self.known(provider)?;
        self.pending
            .lock()
            .remove(&(provider.to_string(), vm_name.to_string()));
        self.deleted
            .lock()
            .push((provider.to_string(), vm_name.to_string()));
        Ok(())
    }
}
