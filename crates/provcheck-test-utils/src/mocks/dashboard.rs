//! Dashboard widgets as seen through the UI.

use mockall::mock;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardError {
    #[error("Widget not found: {0}")]
    WidgetNotFound(String),
    #[error("Dashboard unavailable: {0}")]
    Unavailable(String),
}

/// Read access to a dashboard plus the browser refresh used between polls
pub trait Dashboard {
    fn widget_titles(&self) -> Vec<String>;

    /// Timestamp text of the widget's last content generation, if any
    fn last_updated(&self, widget: &str) -> Result<Option<String>, DashboardError>;

    fn refresh(&self);
}

mock! {
    #[derive(Debug)]
    pub Dashboard {}

    impl Dashboard for Dashboard {
        fn widget_titles(&self) -> Vec<String>;
        fn last_updated(&self, widget: &str) -> Result<Option<String>, DashboardError>;
        fn refresh(&self);
    }
}
