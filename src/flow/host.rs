use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info};
use reqwest::Url;

use crate::channel::{Channel, ConnectionState, Subscription};
use crate::chart::ChartModel;
use crate::models::events::{ClientEvent, RoomUpdate, ServerEvent, ServerEventKind};
use crate::models::presentation::{PollOption, Presentation};
use crate::routes::join_link;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostState {
    Initializing,
    AwaitingRoomId,
    RoomReady { room_id: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum HostScreen {
    Loading,
    Ready {
        room_id: String,
        invitation_link: String,
        chart: ChartModel,
        time: u32,
    },
}

/// Presenter side of a room: creates it, then mirrors the live tallies.
pub struct HostFlow {
    presentation: Presentation,
    origin: Url,
    state: HostState,
    options: Vec<PollOption>,
}

impl HostFlow {
    pub fn new(presentation: Presentation, origin: Url) -> Self {
        let options = presentation
            .multiple_choice_slide()
            .map(|slide| slide.options.clone())
            .unwrap_or_default();
        Self {
            presentation,
            origin,
            state: HostState::Initializing,
            options,
        }
    }

    pub fn state(&self) -> &HostState {
        &self.state
    }

    pub fn options(&self) -> &[PollOption] {
        &self.options
    }

    pub fn room_id(&self) -> Option<&str> {
        match &self.state {
            HostState::RoomReady { room_id } => Some(room_id),
            _ => None,
        }
    }

    pub fn invitation_link(&self) -> Option<String> {
        self.room_id().map(|room_id| join_link(&self.origin, room_id))
    }

    /// Leaves `Initializing` and yields the create-room request. Only once.
    pub fn start(&mut self) -> Option<ClientEvent> {
        if self.state != HostState::Initializing {
            return None;
        }
        self.state = HostState::AwaitingRoomId;
        Some(self.create_room())
    }

    fn create_room(&self) -> ClientEvent {
        ClientEvent::HostCreateRoom {
            presentation_id: self.presentation.id.clone(),
        }
    }

    pub fn handle(&mut self, event: &ServerEvent) {
        match event {
            ServerEvent::RoomCreated(created) => self.room_created(&created.room_id),
            ServerEvent::RoomUpdate(update) => self.room_update(update),
            ServerEvent::WaitJoinRoom(_) => {}
        }
    }

    fn room_created(&mut self, room_id: &str) {
        if self.state != HostState::AwaitingRoomId {
            debug!("Ignoring room id {} in state {:?}", room_id, self.state);
            return;
        }
        info!("Room {} created for presentation {}", room_id, self.presentation.id);
        self.state = HostState::RoomReady {
            room_id: room_id.to_string(),
        };
    }

    fn room_update(&mut self, update: &RoomUpdate) {
        match update {
            // Slide navigation is driven from elsewhere; the host view keeps its slide.
            RoomUpdate::NewSlide => {}
            RoomUpdate::NewVote(options) => {
                if self.room_id().is_none() || self.presentation.multiple_choice_slide().is_none() {
                    debug!("Vote update before the room is ready, ignoring");
                    return;
                }
                // Full replace: the newest tally wins.
                self.options = options.clone();
            }
            RoomUpdate::Info(_) => {}
            RoomUpdate::Unknown(kind) => debug!("Ignoring room update kind {}", kind),
        }
    }

    /// Request to resend after the transport came back, if the room never arrived.
    pub fn retry_after_reconnect(&self) -> Option<ClientEvent> {
        (self.state == HostState::AwaitingRoomId).then(|| self.create_room())
    }

    pub fn screen(&self) -> HostScreen {
        let (Some(slide), HostState::RoomReady { room_id }) =
            (self.presentation.multiple_choice_slide(), &self.state)
        else {
            return HostScreen::Loading;
        };
        HostScreen::Ready {
            room_id: room_id.clone(),
            invitation_link: join_link(&self.origin, room_id),
            chart: ChartModel::new(slide.title.clone(), &self.options),
            time: slide.display_time(),
        }
    }
}

/// A [`HostFlow`] mounted on the room channel.
pub struct HostView {
    flow: Rc<RefCell<HostFlow>>,
    _subscriptions: Vec<Subscription>,
}

impl HostView {
    pub fn mount(channel: &dyn Channel, presentation: Presentation, origin: Url) -> Self {
        let flow = Rc::new(RefCell::new(HostFlow::new(presentation, origin)));

        let mut subscriptions = Vec::new();
        for kind in [ServerEventKind::RoomCreated, ServerEventKind::RoomUpdate] {
            let flow = Rc::clone(&flow);
            subscriptions.push(channel.on(
                kind,
                Box::new(move |event, _| flow.borrow_mut().handle(event)),
            ));
        }

        let reconnecting = Rc::clone(&flow);
        let mut lost = false;
        subscriptions.push(channel.on_connection(Box::new(move |state, emitter| match state {
            ConnectionState::Disconnected { .. } => lost = true,
            ConnectionState::Connected if lost => {
                lost = false;
                if let Some(event) = reconnecting.borrow().retry_after_reconnect() {
                    info!("Reconnected before the room arrived, requesting it again");
                    emitter.emit(event);
                }
            }
            _ => {}
        })));

        let start = flow.borrow_mut().start();
        if let Some(event) = start {
            channel.emit(event);
        }

        Self {
            flow,
            _subscriptions: subscriptions,
        }
    }

    pub fn state(&self) -> HostState {
        self.flow.borrow().state().clone()
    }

    pub fn options(&self) -> Vec<PollOption> {
        self.flow.borrow().options().to_vec()
    }

    pub fn invitation_link(&self) -> Option<String> {
        self.flow.borrow().invitation_link()
    }

    pub fn screen(&self) -> HostScreen {
        self.flow.borrow().screen()
    }
}
