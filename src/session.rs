//! Per-session dashboard state
//!
//! The UI never mutates state directly. It emits a `DashboardEvent`, the
//! event is applied to the session's `SessionContext`, and the next render
//! reads the updated context.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Which page the session is looking at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    Home,
    Company,
    ExecutiveDetail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Contributor,
    Viewer,
}

impl Role {
    /// Verb used on the home page button
    pub fn verb(&self) -> &'static str {
        match self {
            Role::Contributor => "Join",
            Role::Viewer => "View",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedCompany {
    pub ticker: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionContext {
    pub view: View,
    pub company: Option<SelectedCompany>,
    pub role: Option<Role>,
    pub focal_executive: Option<String>,
    /// Current review page per executive. Not reset when switching
    /// executives, so returning to one restores its page.
    pub review_pages: HashMap<String, usize>,
}

/// Everything the UI can ask the session to do
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DashboardEvent {
    CompanySelected {
        ticker: String,
        name: String,
        role: Role,
    },
    ViewChanged {
        view: View,
    },
    FocalChanged {
        executive: String,
    },
    PageChanged {
        executive: String,
        page: usize,
    },
    ReviewSubmitted {
        executive: String,
    },
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Review page for `executive`, 1 when never visited
    pub fn review_page(&self, executive: &str) -> usize {
        self.review_pages.get(executive).copied().unwrap_or(1)
    }

    /// Focal executive, falling back to the first key of `executives`
    pub fn focal_or_first<'a, I>(&'a self, mut executives: I) -> Option<&'a str>
    where
        I: Iterator<Item = &'a String>,
    {
        self.focal_executive
            .as_deref()
            .or_else(|| executives.next().map(String::as_str))
    }

    /// Message shown instead of a page that cannot render yet
    pub fn notice(&self) -> Option<&'static str> {
        match self.view {
            View::Home => None,
            View::Company | View::ExecutiveDetail if self.company.is_none() => {
                Some("Company not selected. Please return to the home page.")
            }
            View::Company | View::ExecutiveDetail if self.role.is_none() => {
                Some("Role not selected. Please return to the home page.")
            }
            _ => None,
        }
    }

    /// Apply one event
    pub fn apply(&mut self, event: DashboardEvent) {
        debug!("Applying {:?}", event);
        match event {
            DashboardEvent::CompanySelected { ticker, name, role } => {
                let switched = self
                    .company
                    .as_ref()
                    .map_or(true, |c| c.ticker != ticker);
                if switched {
                    self.focal_executive = None;
                }
                self.company = Some(SelectedCompany { ticker, name });
                self.role = Some(role);
                self.view = View::Company;
            }
            DashboardEvent::ViewChanged { view } => {
                self.view = view;
            }
            DashboardEvent::FocalChanged { executive } => {
                self.focal_executive = Some(executive);
            }
            DashboardEvent::PageChanged { executive, page } => {
                self.review_pages.insert(executive, page.max(1));
            }
            DashboardEvent::ReviewSubmitted { executive } => {
                self.review_pages.insert(executive, 1);
            }
        }
    }
}
