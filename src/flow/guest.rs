use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, info, warn};

use crate::channel::{Channel, ConnectionState, Subscription};
use crate::models::events::{ClientEvent, ServerEvent, ServerEventKind, UNKNOWN_OPTION_INDEX};
use crate::models::presentation::{PollOption, Presentation, Slide};

#[derive(Debug, Clone, PartialEq)]
pub enum GuestState {
    NeedRoomId,
    Joining { room_id: String },
    AwaitingSlide { room_id: String },
    Voting { room_id: String, slide: Slide },
    Voted {
        room_id: String,
        slide: Slide,
        vote: PollOption,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum GuestScreen {
    EnterCode,
    Waiting { room_id: String },
    Voting { title: String, options: Vec<PollOption> },
    Voted { title: String, choice: String },
}

/// Participant side of a room.
#[derive(Debug)]
pub struct GuestFlow {
    state: GuestState,
    /// Committed votes by slide id. Outlives state changes.
    votes: HashMap<String, PollOption>,
    connection_lost: bool,
}

impl Default for GuestFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl GuestFlow {
    pub fn new() -> Self {
        Self {
            state: GuestState::NeedRoomId,
            votes: HashMap::new(),
            connection_lost: false,
        }
    }

    pub fn state(&self) -> &GuestState {
        &self.state
    }

    pub fn room_id(&self) -> Option<&str> {
        match &self.state {
            GuestState::NeedRoomId => None,
            GuestState::Joining { room_id }
            | GuestState::AwaitingSlide { room_id }
            | GuestState::Voting { room_id, .. }
            | GuestState::Voted { room_id, .. } => Some(room_id),
        }
    }

    /// Moves to `Joining` and yields the join request. Blank codes are ignored.
    pub fn join(&mut self, code: &str) -> Option<ClientEvent> {
        let room_id = code.trim();
        if room_id.is_empty() {
            return None;
        }
        if self.state != GuestState::NeedRoomId {
            debug!("Already in room {:?}, ignoring join", self.room_id());
            return None;
        }
        self.state = GuestState::Joining {
            room_id: room_id.to_string(),
        };
        Some(ClientEvent::JoinRoom {
            room_id: room_id.to_string(),
        })
    }

    /// The join request is out; nothing acknowledges it, so wait for a slide.
    pub fn join_sent(&mut self) {
        if let GuestState::Joining { room_id } = &self.state {
            self.state = GuestState::AwaitingSlide {
                room_id: room_id.clone(),
            };
        }
    }

    pub fn handle(&mut self, event: &ServerEvent) {
        match event {
            ServerEvent::WaitJoinRoom(snapshot) => self.snapshot(&snapshot.data),
            ServerEvent::RoomCreated(_) | ServerEvent::RoomUpdate(_) => {}
        }
    }

    fn snapshot(&mut self, presentation: &Presentation) {
        let Some(room_id) = self.room_id().map(str::to_string) else {
            debug!("Slide snapshot before joining, ignoring");
            return;
        };
        let Some(slide) = presentation.multiple_choice_slide().cloned() else {
            debug!("Presentation {} has no multiple-choice slide yet", presentation.id);
            self.state = GuestState::AwaitingSlide { room_id };
            return;
        };

        self.state = match self.votes.get(&slide.id) {
            Some(vote) => GuestState::Voted {
                room_id,
                vote: vote.clone(),
                slide,
            },
            None => GuestState::Voting { room_id, slide },
        };
    }

    /// Commits the vote for the option at `position` and yields the vote
    /// event. Once committed, the slide never takes another vote.
    pub fn vote(&mut self, position: usize) -> Option<ClientEvent> {
        let GuestState::Voting { room_id, slide } = &self.state else {
            debug!("Not accepting votes in state {:?}", self.state);
            return None;
        };
        let Some(option) = slide.options.get(position).cloned() else {
            warn!("No option at position {}", position);
            return None;
        };

        // TODO: refuse to send the -1 sentinel once the backend rejects it explicitly.
        let option_index = option.index.map_or(UNKNOWN_OPTION_INDEX, i64::from);
        let event = ClientEvent::MemberVote {
            slide_id: slide.id.clone(),
            option_index,
        };
        info!("Voting for {:?} on slide {}", option.value, slide.id);
        self.votes.insert(slide.id.clone(), option.clone());
        self.state = GuestState::Voted {
            room_id: room_id.clone(),
            slide: slide.clone(),
            vote: option,
        };
        Some(event)
    }

    pub fn connection_lost(&mut self) {
        self.connection_lost = true;
    }

    /// After a reconnect, the join request for the current room, if any.
    pub fn take_rejoin(&mut self) -> Option<ClientEvent> {
        if !std::mem::take(&mut self.connection_lost) {
            return None;
        }
        self.room_id().map(|room_id| ClientEvent::JoinRoom {
            room_id: room_id.to_string(),
        })
    }

    pub fn screen(&self) -> GuestScreen {
        match &self.state {
            GuestState::NeedRoomId => GuestScreen::EnterCode,
            GuestState::Joining { room_id } | GuestState::AwaitingSlide { room_id } => {
                GuestScreen::Waiting {
                    room_id: room_id.clone(),
                }
            }
            GuestState::Voting { slide, .. } => GuestScreen::Voting {
                title: slide.title.clone(),
                options: slide.options.clone(),
            },
            GuestState::Voted { slide, vote, .. } => GuestScreen::Voted {
                title: slide.title.clone(),
                choice: vote.value.clone(),
            },
        }
    }
}

/// A [`GuestFlow`] mounted on the room channel.
pub struct GuestView {
    flow: Rc<RefCell<GuestFlow>>,
    _subscriptions: Vec<Subscription>,
}

impl GuestView {
    /// Mounts the guest flow; a room id from the launch link joins right away.
    pub fn mount(channel: &dyn Channel, room_id: Option<&str>) -> Self {
        let flow = Rc::new(RefCell::new(GuestFlow::new()));

        let snapshots = Rc::clone(&flow);
        let on_snapshot = channel.on(
            ServerEventKind::WaitJoinRoom,
            Box::new(move |event, _| snapshots.borrow_mut().handle(event)),
        );

        let reconnects = Rc::clone(&flow);
        let on_connection = channel.on_connection(Box::new(move |state, emitter| {
            let mut flow = reconnects.borrow_mut();
            match state {
                ConnectionState::Disconnected { .. } => flow.connection_lost(),
                ConnectionState::Connected => {
                    if let Some(event) = flow.take_rejoin() {
                        info!("Reconnected, rejoining room {:?}", flow.room_id());
                        emitter.emit(event);
                    }
                }
                ConnectionState::Connecting => {}
            }
        }));

        let view = Self {
            flow,
            _subscriptions: vec![on_snapshot, on_connection],
        };
        if let Some(room_id) = room_id {
            view.join(channel, room_id);
        }
        view
    }

    pub fn join(&self, channel: &dyn Channel, code: &str) {
        let mut flow = self.flow.borrow_mut();
        if let Some(event) = flow.join(code) {
            channel.emit(event);
            flow.join_sent();
        }
    }

    pub fn vote(&self, channel: &dyn Channel, position: usize) {
        let event = self.flow.borrow_mut().vote(position);
        if let Some(event) = event {
            channel.emit(event);
        }
    }

    pub fn state(&self) -> GuestState {
        self.flow.borrow().state().clone()
    }

    pub fn screen(&self) -> GuestScreen {
        self.flow.borrow().screen()
    }
}
