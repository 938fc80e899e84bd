//! Edit permissions derived from session role and window state

use std::sync::Arc;

use appraisal_domain::{AppraisalError, Result, Role, Session, WindowName};

use crate::time_window::TimeWindowResolver;

/// Decides whether the signed-in principal may view or edit a phase.
pub struct AccessPolicy {
    resolver: Arc<TimeWindowResolver>,
}

impl AccessPolicy {
    pub fn new(resolver: Arc<TimeWindowResolver>) -> Self {
        Self { resolver }
    }

    /// Employees see a phase only while its window is active; reviewers and
    /// admins can always look back at past phases.
    pub fn can_view(&self, window: WindowName, session: Option<&Session>) -> bool {
        match session {
            None => false,
            Some(session) if session.role == Role::Employee => {
                self.resolver.status(window).is_active()
            }
            Some(_) => true,
        }
    }

    /// Forms for a phase are editable only while its window is active and
    /// not read-only, whatever the role.
    pub fn can_edit(&self, window: WindowName, session: Option<&Session>) -> bool {
        session.is_some() && self.resolver.status(window).is_editable()
    }

    /// Window configuration is editable by admins at any time.
    pub fn can_manage_settings(&self, session: Option<&Session>) -> bool {
        session.is_some_and(|session| session.role == Role::Admin)
    }

    pub fn require_edit(&self, window: WindowName, session: Option<&Session>) -> Result<()> {
        if session.is_none() {
            return Err(AppraisalError::Auth("sign in required".into()));
        }
        let status = self.resolver.status(window);
        if status.is_editable() {
            Ok(())
        } else {
            Err(AppraisalError::InvalidInput(format!("{window} window is {status}; editing is closed")))
        }
    }

    pub fn require_settings_access(&self, session: Option<&Session>) -> Result<()> {
        if self.can_manage_settings(session) {
            Ok(())
        } else {
            Err(AppraisalError::Auth("administrator role required".into()))
        }
    }
}
