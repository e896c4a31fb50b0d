//! In-memory fakes of the collaborator interfaces in [`crate::mocks`].

pub mod fake_dashboard;
pub mod fake_provisioner;

pub use fake_dashboard::FakeDashboard;
pub use fake_provisioner::FakeProvisioner;
