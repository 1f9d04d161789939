//! Group detail header: breadcrumbs, invitation link and email invites.
//!
//! Requests run elsewhere (the GUI spawns them on the runtime); results come
//! back through the `apply_*` / `finish_*` methods, which own all state changes.
//! A failed request shows the server's message and leaves prior state alone.

use crate::api::ApiError;
use crate::models::group::Group;
use crate::notification::Notifications;
use crate::validate;

pub const GROUPS_PATH: &str = "/groups";
pub const COPIED_MESSAGE: &str = "Copy to clipboard";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    pub title: String,
    pub to: String,
}

#[derive(Debug, Default, Clone)]
pub struct InviteForm {
    pub open: bool,
    pub email: String,
    pub error: Option<&'static str>,
    pub submitting: bool,
}

impl InviteForm {
    fn reset(&mut self) {
        self.email.clear();
        self.error = None;
        self.submitting = false;
    }
}

#[derive(Debug)]
pub struct GroupHeader {
    group_id: String,
    group: Option<Group>,
    pub invitation_open: bool,
    invitation_link: Option<String>,
    pub invite_form: InviteForm,
}

impl GroupHeader {
    pub fn new(group_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            group: None,
            invitation_open: false,
            invitation_link: None,
            invite_form: InviteForm::default(),
        }
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    pub fn group(&self) -> Option<&Group> {
        self.group.as_ref()
    }

    pub fn invitation_link(&self) -> Option<&str> {
        self.invitation_link.as_deref()
    }

    pub fn breadcrumbs(&self) -> [Breadcrumb; 2] {
        [
            Breadcrumb {
                title: "Groups".to_string(),
                to: GROUPS_PATH.to_string(),
            },
            Breadcrumb {
                title: self.group.as_ref().map(|g| g.name.clone()).unwrap_or_default(),
                to: "#".to_string(),
            },
        ]
    }

    pub fn apply_group(&mut self, result: Result<Group, ApiError>, notes: &mut Notifications) {
        match result {
            Ok(group) => self.group = Some(group),
            Err(e) => notes.show_fail(None, Some(&e.user_message())),
        }
    }

    /// The invitation dialog opens whether or not the link could be fetched.
    pub fn apply_invitation_link(
        &mut self,
        result: Result<String, ApiError>,
        notes: &mut Notifications,
    ) {
        match result {
            Ok(link) => self.invitation_link = Some(link),
            Err(e) => notes.show_fail(None, Some(&e.user_message())),
        }
        self.invitation_open = true;
    }

    pub fn close_invitation(&mut self) {
        self.invitation_link = None;
        self.invitation_open = false;
    }

    /// Returns the link to put on the clipboard.
    pub fn copy_invitation_link(&self, notes: &mut Notifications) -> Option<String> {
        let link = self.invitation_link.clone()?;
        notes.show_success(None, Some(COPIED_MESSAGE));
        Some(link)
    }

    pub fn open_invite_form(&mut self) {
        self.invite_form.reset();
        self.invite_form.open = true;
    }

    pub fn close_invite_form(&mut self) {
        self.invite_form.reset();
        self.invite_form.open = false;
    }

    /// Validates the form; returns the address to send when it is acceptable.
    pub fn begin_invite(&mut self) -> Option<String> {
        let email = self.invite_form.email.trim().to_string();
        match validate::email(&email) {
            Ok(()) => {
                self.invite_form.error = None;
                self.invite_form.submitting = true;
                Some(email)
            }
            Err(message) => {
                self.invite_form.error = Some(message);
                None
            }
        }
    }

    pub fn finish_invite(
        &mut self,
        result: Result<Option<String>, ApiError>,
        notes: &mut Notifications,
    ) {
        match result {
            Ok(message) => notes.show_success(None, message.as_deref()),
            Err(e) => notes.show_fail(None, Some(&e.user_message())),
        }
        self.invite_form.submitting = false;
        self.invite_form.open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::GroupApi;
    use crate::notification::NotificationKind;
    use async_trait::async_trait;
    use std::sync::Mutex;

    // Drives a header against an api the way the GUI does across frames.
    impl GroupHeader {
        async fn load(&mut self, api: &dyn GroupApi, notes: &mut Notifications) {
            let result = api.group(&self.group_id).await;
            self.apply_group(result, notes);
        }

        async fn open_invitation(&mut self, api: &dyn GroupApi, notes: &mut Notifications) {
            let result = api.invitation_link(&self.group_id).await;
            self.apply_invitation_link(result, notes);
        }

        async fn submit_invite(&mut self, api: &dyn GroupApi, notes: &mut Notifications) {
            let Some(email) = self.begin_invite() else {
                return;
            };
            let result = api.invite_by_email(&self.group_id, &email).await;
            self.finish_invite(result, notes);
        }
    }

    #[derive(Default)]
    struct FakeGroups {
        missing: bool,
        invites: Mutex<Vec<String>>,
    }

    fn not_found() -> ApiError {
        ApiError::Server {
            status: 404,
            message: Some("Not found".to_string()),
        }
    }

    #[async_trait]
    impl GroupApi for FakeGroups {
        async fn group(&self, group_id: &str) -> Result<Group, ApiError> {
            if self.missing {
                return Err(not_found());
            }
            Ok(Group {
                id: group_id.to_string(),
                name: "Rustaceans".to_string(),
                description: None,
            })
        }

        async fn invitation_link(&self, group_id: &str) -> Result<String, ApiError> {
            if self.missing {
                return Err(not_found());
            }
            Ok(format!("http://localhost:3000/groups/{}/join", group_id))
        }

        async fn invite_by_email(&self, _group_id: &str, email: &str) -> Result<Option<String>, ApiError> {
            self.invites.lock().unwrap().push(email.to_string());
            Ok(Some("Invitation sent".to_string()))
        }
    }

    #[tokio::test]
    async fn loads_group_into_breadcrumbs() {
        let api = FakeGroups::default();
        let mut notes = Notifications::new();
        let mut header = GroupHeader::new("g1");

        header.load(&api, &mut notes).await;

        assert_eq!(header.breadcrumbs()[1].title, "Rustaceans");
        assert_eq!(header.breadcrumbs()[0].to, "/groups");
        assert!(notes.items().is_empty());
    }

    #[tokio::test]
    async fn missing_group_shows_server_message_only() {
        let api = FakeGroups {
            missing: true,
            ..Default::default()
        };
        let mut notes = Notifications::new();
        let mut header = GroupHeader::new("g1");

        header.load(&api, &mut notes).await;

        let latest = notes.latest().unwrap();
        assert_eq!(latest.kind, NotificationKind::Failure);
        assert_eq!(latest.message.as_deref(), Some("Not found"));
        assert_eq!(notes.items().len(), 1);
        assert!(header.group().is_none());
        assert_eq!(header.breadcrumbs()[1].title, "");
    }

    #[tokio::test]
    async fn invitation_dialog_opens_even_on_failure() {
        let api = FakeGroups {
            missing: true,
            ..Default::default()
        };
        let mut notes = Notifications::new();
        let mut header = GroupHeader::new("g1");

        header.open_invitation(&api, &mut notes).await;
        assert!(header.invitation_open);
        assert!(header.invitation_link().is_none());
        assert!(header.copy_invitation_link(&mut notes).is_none());
    }

    #[tokio::test]
    async fn copy_and_close_invitation() {
        let api = FakeGroups::default();
        let mut notes = Notifications::new();
        let mut header = GroupHeader::new("g1");

        header.open_invitation(&api, &mut notes).await;
        let copied = header.copy_invitation_link(&mut notes).unwrap();
        assert_eq!(copied, "http://localhost:3000/groups/g1/join");
        assert_eq!(notes.latest().unwrap().message.as_deref(), Some(COPIED_MESSAGE));

        header.close_invitation();
        assert!(!header.invitation_open);
        assert!(header.invitation_link().is_none());
    }

    #[tokio::test]
    async fn invalid_email_never_reaches_api() {
        let api = FakeGroups::default();
        let mut notes = Notifications::new();
        let mut header = GroupHeader::new("g1");
        header.open_invite_form();
        header.invite_form.email = "not-an-email".to_string();

        header.submit_invite(&api, &mut notes).await;

        assert_eq!(header.invite_form.error, Some(validate::INVALID_EMAIL));
        assert!(header.invite_form.open);
        assert!(api.invites.lock().unwrap().is_empty());
        assert!(notes.items().is_empty());
    }

    #[tokio::test]
    async fn valid_email_is_sent_and_form_closes() {
        let api = FakeGroups::default();
        let mut notes = Notifications::new();
        let mut header = GroupHeader::new("g1");
        header.open_invite_form();
        header.invite_form.email = " jane@example.com ".to_string();

        header.submit_invite(&api, &mut notes).await;

        assert_eq!(*api.invites.lock().unwrap(), vec!["jane@example.com".to_string()]);
        assert!(!header.invite_form.open);
        assert!(!header.invite_form.submitting);
        assert_eq!(notes.latest().unwrap().message.as_deref(), Some("Invitation sent"));
    }
}
