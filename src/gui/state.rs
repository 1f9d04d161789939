use std::future::Future;
use std::sync::mpsc::{Receiver, Sender};

use log::{debug, warn};
use tokio::runtime::Runtime;

use crate::api::{ApiClient, ApiError, GroupApi, PresentationApi};
use crate::channel::Channel;
use crate::config::Config;
use crate::flow::{GuestView, HostView};
use crate::group::GroupHeader;
use crate::models::group::Group;
use crate::models::presentation::Presentation;
use crate::notification::Notifications;
use crate::routes::Route;
use crate::websocket::{SocketChannel, SocketOptions, Waker};

pub enum HostPage {
    Fetching { presentation_id: String },
    Failed { presentation_id: String },
    Live(HostView),
}

pub enum Page {
    Guest(GuestView),
    Host(HostPage),
    Group(GroupHeader),
}

/// Results of background requests, delivered back to the UI thread.
pub enum TaskResult {
    Presentation {
        presentation_id: String,
        result: Result<Presentation, ApiError>,
    },
    Group {
        group_id: String,
        result: Result<Group, ApiError>,
    },
    InvitationLink {
        group_id: String,
        result: Result<String, ApiError>,
    },
    Invite {
        group_id: String,
        result: Result<Option<String>, ApiError>,
    },
}

pub struct AppState {
    pub config: Config,
    pub channel: SocketChannel,
    pub notifications: Notifications,
    pub page: Page,
    pub code_input: String,
    pub status_message: String,
    api: ApiClient,
    runtime: Runtime,
    wake: Waker,
    results_tx: Sender<TaskResult>,
    results_rx: Receiver<TaskResult>,
}

impl AppState {
    pub fn new(config: Config, token: Option<String>, runtime: Runtime, wake: Waker) -> Self {
        let channel = SocketChannel::connect(
            runtime.handle(),
            SocketOptions {
                url: config.socket_url.clone(),
                token: token.clone(),
                reconnect_delay: config.reconnect_delay,
            },
            wake.clone(),
        );
        let api = ApiClient::new(config.backend_url.as_str(), token);
        let (results_tx, results_rx) = std::sync::mpsc::channel();

        let page = Page::Guest(GuestView::mount(&channel, None));
        Self {
            config,
            channel,
            notifications: Notifications::new(),
            page,
            code_input: String::new(),
            status_message: "Idle".to_owned(),
            api,
            runtime,
            wake,
            results_tx,
            results_rx,
        }
    }

    /// Replaces the current page. The old page's subscriptions go with it.
    pub fn navigate(&mut self, route: Route) {
        debug!("Navigating to {:?}", route);
        self.code_input.clear();
        self.page = match route {
            Route::Join { room_id } => Page::Guest(GuestView::mount(&self.channel, room_id.as_deref())),
            Route::Host { presentation_id } => {
                self.fetch_presentation(presentation_id.clone());
                Page::Host(HostPage::Fetching { presentation_id })
            }
            Route::Group { group_id } => {
                self.fetch_group(group_id.clone());
                Page::Group(GroupHeader::new(group_id))
            }
        };
    }

    fn spawn<F>(&self, task: F)
    where
        F: Future<Output = TaskResult> + Send + 'static,
    {
        let results_tx = self.results_tx.clone();
        let wake = self.wake.clone();
        self.runtime.spawn(async move {
            let result = task.await;
            if results_tx.send(result).is_err() {
                warn!("UI is gone, dropping request result");
            }
            wake();
        });
    }

    pub fn fetch_presentation(&self, presentation_id: String) {
        let api = self.api.clone();
        self.spawn(async move {
            let result = api.presentation(&presentation_id).await;
            TaskResult::Presentation {
                presentation_id,
                result,
            }
        });
    }

    pub fn fetch_group(&self, group_id: String) {
        let api = self.api.clone();
        self.spawn(async move {
            let result = api.group(&group_id).await;
            TaskResult::Group { group_id, result }
        });
    }

    pub fn fetch_invitation_link(&self, group_id: String) {
        let api = self.api.clone();
        self.spawn(async move {
            let result = api.invitation_link(&group_id).await;
            TaskResult::InvitationLink { group_id, result }
        });
    }

    pub fn send_invite(&self, group_id: String, email: String) {
        let api = self.api.clone();
        self.spawn(async move {
            let result = api.invite_by_email(&group_id, &email).await;
            TaskResult::Invite { group_id, result }
        });
    }

    /// Runs channel handlers and applies finished requests. Called once per frame.
    pub fn pump(&mut self) {
        self.channel.pump();
        while let Ok(result) = self.results_rx.try_recv() {
            self.apply(result);
        }
        self.status_message = self.channel.connection_state().to_string();
    }

    fn apply(&mut self, result: TaskResult) {
        match (result, &mut self.page) {
            (
                TaskResult::Presentation {
                    presentation_id,
                    result,
                },
                Page::Host(page),
            ) if matches!(&*page, HostPage::Fetching { presentation_id: id } if *id == presentation_id) => {
                *page = match result {
                    Ok(presentation) => HostPage::Live(HostView::mount(
                        &self.channel,
                        presentation,
                        self.config.origin.clone(),
                    )),
                    Err(e) => {
                        self.notifications.show_fail(None, Some(&e.user_message()));
                        HostPage::Failed { presentation_id }
                    }
                };
            }
            (TaskResult::Group { group_id, result }, Page::Group(header))
                if header.group_id() == group_id =>
            {
                header.apply_group(result, &mut self.notifications);
            }
            (TaskResult::InvitationLink { group_id, result }, Page::Group(header))
                if header.group_id() == group_id =>
            {
                header.apply_invitation_link(result, &mut self.notifications);
            }
            (TaskResult::Invite { group_id, result }, Page::Group(header))
                if header.group_id() == group_id =>
            {
                header.finish_invite(result, &mut self.notifications);
            }
            _ => debug!("Dropping result for a page that is no longer shown"),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.channel.connection_state().is_connected()
    }
}
