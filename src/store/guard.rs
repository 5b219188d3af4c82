//! Page-level loading / error / redirect policy
//!
//! Every page backed by an asynchronous container asks a [`PageGuard`] what
//! to show. Branches are checked in a fixed order: loading first, then error,
//! then the empty/content split. A corrective re-fetch is only ever requested
//! when nothing is in flight.

use crate::models::AuthorizationStatus;

/// Loading and error flags of one container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContainerStatus {
    pub is_loading: bool,
    pub has_error: bool,
}

impl ContainerStatus {
    pub fn new(is_loading: bool, has_error: bool) -> Self {
        Self {
            is_loading,
            has_error,
        }
    }
}

/// Destinations the routing layer knows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Main,
    Login,
    Favorites,
    Offer(String),
    NotFound,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Main => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Favorites => "/favorites".to_string(),
            Route::Offer(id) => format!("/offer/{}", id),
            Route::NotFound => "/404".to_string(),
        }
    }
}

/// What a page does about an error flag that is up while nothing is loading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Send the user to the not-found page
    Redirect,
    /// Re-fetch, up to `budget` times in a row, then redirect
    Refetch { budget: u32 },
}

/// Decision for one render
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageView {
    Loading,
    Redirect(Route),
    /// Dispatch the page's fetch again before the next render
    Refetch,
    Empty,
    Content,
}

#[derive(Debug, Clone)]
pub struct PageGuard {
    recovery: Recovery,
    refetches: u32,
}

impl PageGuard {
    pub fn new(recovery: Recovery) -> Self {
        Self {
            recovery,
            refetches: 0,
        }
    }

    /// Guard for pages that leave on any error (main, offer)
    pub fn redirecting() -> Self {
        Self::new(Recovery::Redirect)
    }

    /// Guard for pages whose initial error flag means "not fetched yet" (favorites)
    pub fn refetching(budget: u32) -> Self {
        Self::new(Recovery::Refetch { budget })
    }

    pub fn evaluate(&mut self, status: ContainerStatus, is_empty: bool) -> PageView {
        if status.is_loading {
            return PageView::Loading;
        }

        if status.has_error {
            return match self.recovery {
                Recovery::Refetch { budget } if self.refetches < budget => {
                    self.refetches += 1;
                    PageView::Refetch
                }
                _ => PageView::Redirect(Route::NotFound),
            };
        }

        self.refetches = 0;
        if is_empty {
            PageView::Empty
        } else {
            PageView::Content
        }
    }
}

/// Authenticated-only actions send signed-out users to the login page instead
pub fn require_auth(status: AuthorizationStatus) -> Result<(), Route> {
    match status {
        AuthorizationStatus::Auth => Ok(()),
        AuthorizationStatus::Unknown | AuthorizationStatus::NotAuth => Err(Route::Login),
    }
}
