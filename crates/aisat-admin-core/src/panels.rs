//! Console panels bound to the local admin pages.
//!
//! Each panel is a static HTML page that talks to the service on its own once
//! it knows the bearer token and base URL. Handles are built the first time
//! a panel is opened and reused afterwards.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use reqwest::Url;
use tracing::debug;

use crate::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    PendingRequest,
    RejectedRequest,
    ScheduledRequest,
    Schedule,
    Users,
    PriorityUsers,
    RequestTicket,
    TransactionHistory,
    Announcements,
    AdminSettings,
    TvDisplay,
}

impl Panel {
    /// Menu order
    pub const ALL: [Panel; 11] = [
        Panel::PendingRequest,
        Panel::RejectedRequest,
        Panel::ScheduledRequest,
        Panel::Schedule,
        Panel::Users,
        Panel::PriorityUsers,
        Panel::RequestTicket,
        Panel::TransactionHistory,
        Panel::Announcements,
        Panel::AdminSettings,
        Panel::TvDisplay,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Panel::PendingRequest => "Pending Request",
            Panel::RejectedRequest => "Rejected Request",
            Panel::ScheduledRequest => "Scheduled Request",
            Panel::Schedule => "Schedule",
            Panel::Users => "Users",
            Panel::PriorityUsers => "Priority Users",
            Panel::RequestTicket => "Request Ticket",
            Panel::TransactionHistory => "Transaction History",
            Panel::Announcements => "Announcement Management",
            Panel::AdminSettings => "Admin Settings",
            Panel::TvDisplay => "TV Display",
        }
    }

    pub fn page(&self) -> &'static str {
        match self {
            Panel::PendingRequest => "pending_request.html",
            Panel::RejectedRequest => "rejected_request.html",
            Panel::ScheduledRequest => "scheduled_request.html",
            Panel::Schedule => "calendar.html",
            Panel::Users => "users.html",
            Panel::PriorityUsers => "priorities.html",
            Panel::RequestTicket => "request.html",
            Panel::TransactionHistory => "transachistory.html",
            Panel::Announcements => "ads.html",
            Panel::AdminSettings => "admin_settings.html",
            Panel::TvDisplay => "tv_display.html",
        }
    }

    /// Page function to run once the token is in place
    pub fn initial_call(&self) -> Option<&'static str> {
        match self {
            Panel::PendingRequest => Some("fetchPendingRequests"),
            Panel::RejectedRequest => Some("fetchRejectedRequests"),
            Panel::ScheduledRequest => Some("fetchScheduledRequests"),
            Panel::Schedule => Some("renderCalendar"),
            Panel::Users => Some("fetchUsers"),
            Panel::TvDisplay => Some("fetchAdminsAndQueues"),
            _ => None,
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// A constructed panel: the page on disk plus the URL that hands it the
/// session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelHandle {
    pub panel: Panel,
    pub page_path: PathBuf,
    pub theme: Theme,
    token: String,
    base_url: String,
}

impl PanelHandle {
    /// `file://` URL carrying the token, base URL, theme and initial call.
    pub fn launch_url(&self) -> Result<Url> {
        let mut url = Url::from_file_path(&self.page_path)
            .map_err(|()| anyhow::anyhow!("Page path is not absolute: {}", self.page_path.display()))?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("token", &self.token)
                .append_pair("baseUrl", &self.base_url)
                .append_pair("theme", self.theme.as_str());
            if let Some(call) = self.panel.initial_call() {
                query.append_pair("init", call);
            }
        }
        Ok(url)
    }

    pub fn page_exists(&self) -> bool {
        self.page_path.is_file()
    }
}

pub struct PanelRegistry {
    pages_dir: PathBuf,
    base_url: String,
    handles: [Option<PanelHandle>; Panel::ALL.len()],
}

impl PanelRegistry {
    /// A relative `pages_dir` is resolved against the working directory.
    pub fn new(pages_dir: impl AsRef<Path>, base_url: impl Into<String>) -> Result<Self> {
        let pages_dir = pages_dir.as_ref();
        let pages_dir = if pages_dir.is_absolute() {
            pages_dir.to_path_buf()
        } else {
            std::env::current_dir()
                .context("Failed to resolve working directory")?
                .join(pages_dir)
        };
        Ok(Self {
            pages_dir,
            base_url: base_url.into(),
            handles: Default::default(),
        })
    }

    pub fn pages_dir(&self) -> &Path {
        &self.pages_dir
    }

    /// Return the panel's handle, building it on first use.
    pub fn open(&mut self, panel: Panel, token: &str, theme: Theme) -> &PanelHandle {
        let pages_dir = &self.pages_dir;
        let base_url = &self.base_url;
        self.handles[panel.index()].get_or_insert_with(|| {
            debug!(panel = panel.title(), "Constructing panel");
            PanelHandle {
                panel,
                page_path: pages_dir.join(panel.page()),
                theme,
                token: token.to_string(),
                base_url: base_url.clone(),
            }
        })
    }

    pub fn get(&self, panel: Panel) -> Option<&PanelHandle> {
        self.handles[panel.index()].as_ref()
    }

    pub fn is_open(&self, panel: Panel) -> bool {
        self.get(panel).is_some()
    }

    pub fn open_count(&self) -> usize {
        self.handles.iter().flatten().count()
    }

    /// Push a theme change into every constructed panel
    pub fn set_theme(&mut self, theme: Theme) {
        for handle in self.handles.iter_mut().flatten() {
            handle.theme = theme;
        }
    }

    /// Drop every handle; their token is stale after logout
    pub fn clear(&mut self) {
        self.handles = Default::default();
    }
}
