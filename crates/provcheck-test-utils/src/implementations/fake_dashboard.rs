//! Dashboard fake whose widgets generate content after a few refreshes.

use crate::mocks::{Dashboard, DashboardError};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;

struct Widget {
    refreshes_until_ready: usize,
    last_updated: Option<String>,
}

/// In-memory dashboard for testing.
///
/// A widget added with [`add_pending`](FakeDashboard::add_pending) reports no
/// content until the dashboard has been refreshed the given number of times.
#[derive(Default)]
pub struct FakeDashboard {
    widgets: Mutex<Vec<(String, Widget)>>,
    refreshes: Mutex<usize>,
    unavailable_reads: Mutex<HashMap<String, usize>>,
}

impl fmt::Debug for FakeDashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeDashboard")
            .field("widget_count", &self.widgets.lock().len())
            .field("refreshes", &*self.refreshes.lock())
            .finish()
    }
}

impl FakeDashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A widget that already has content
    pub fn add_ready(&self, title: &str, last_updated: &str) {
        self.widgets.lock().push((
            title.to_string(),
            Widget {
                refreshes_until_ready: 0,
                last_updated: Some(last_updated.to_string()),
            },
        ));
    }

    /// A widget whose content appears after `refreshes` refreshes
    pub fn add_pending(&self, title: &str, refreshes: usize) {
        self.widgets.lock().push((
            title.to_string(),
            Widget {
                refreshes_until_ready: refreshes,
                last_updated: None,
            },
        ));
    }

    /// Make the next `reads` reads of `title` fail as unavailable
    pub fn fail_reads(&self, title: &str, reads: usize) {
        self.unavailable_reads.lock().insert(title.to_string(), reads);
    }

    pub fn remove(&self, title: &str) -> bool {
        let mut widgets = self.widgets.lock();
        let before = widgets.len();
        widgets.retain(|(t, _)| t != title);
        widgets.len() != before
    }

    pub fn refresh_count(&self) -> usize {
        *self.refreshes.lock()
    }
}

impl Dashboard for FakeDashboard {
    fn widget_titles(&self) -> Vec<String> {
        self.widgets.lock().iter().map(|(t, _)| t.clone()).collect()
    }

    fn last_updated(&self, widget: &str) -> Result<Option<String>, DashboardError> {
        if let Some(remaining) = self.unavailable_reads.lock().get_mut(widget) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(DashboardError::Unavailable(widget.to_string()));
            }
        }
        self.widgets
            .lock()
            .iter()
            .find(|(t, _)| t == widget)
            .map(|(_, w)| w.last_updated.clone())
            .ok_or_else(|| DashboardError::WidgetNotFound(widget.to_string()))
    }

    fn refresh(&self) {
        let count = {
            let mut refreshes = self.refreshes.lock();
            *refreshes += 1;
            *refreshes
        };
        for (_, widget) in self.widgets.lock().iter_mut() {
            if widget.last_updated.is_none() && count >= widget.refreshes_until_ready {
                widget.last_updated = Some(format!("refresh #{}", count));
            }
        }
    }
}
