use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::presentation::{PollOption, Presentation};

/// Option index sent when the chosen option carries no index of its own.
pub const UNKNOWN_OPTION_INDEX: i64 = -1;

/// Messages the client sends over the room channel.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    #[serde(rename = "hostCreateRoom")]
    HostCreateRoom {
        #[serde(rename = "presentationId")]
        presentation_id: String,
    },
    #[serde(rename = "joinRoom")]
    JoinRoom {
        #[serde(rename = "roomId")]
        room_id: String,
    },
    #[serde(rename = "memberVote")]
    MemberVote {
        #[serde(rename = "slideId")]
        slide_id: String,
        #[serde(rename = "optionIndex")]
        option_index: i64,
    },
}

impl ClientEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::HostCreateRoom { .. } => "hostCreateRoom",
            ClientEvent::JoinRoom { .. } => "joinRoom",
            ClientEvent::MemberVote { .. } => "memberVote",
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct RoomCreated {
    #[serde(rename = "roomId")]
    pub room_id: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct RoomSnapshot {
    pub data: Presentation,
}

/// Live room updates pushed to the host, keyed by the `type` discriminant.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(try_from = "RawRoomUpdate")]
pub enum RoomUpdate {
    NewSlide,
    NewVote(Vec<PollOption>),
    Info(Value),
    /// A kind this client does not know yet.
    Unknown(String),
}

#[derive(Deserialize)]
struct RawRoomUpdate {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Value,
}

impl TryFrom<RawRoomUpdate> for RoomUpdate {
    type Error = serde_json::Error;

    fn try_from(raw: RawRoomUpdate) -> Result<Self, Self::Error> {
        Ok(match raw.kind.as_str() {
            "newSlide" => RoomUpdate::NewSlide,
            "newVote" => RoomUpdate::NewVote(serde_json::from_value(raw.data)?),
            "info" => RoomUpdate::Info(raw.data),
            _ => RoomUpdate::Unknown(raw.kind),
        })
    }
}

/// Messages the backend pushes over the room channel.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    RoomCreated(RoomCreated),
    WaitJoinRoom(RoomSnapshot),
    RoomUpdate(RoomUpdate),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServerEventKind {
    RoomCreated,
    WaitJoinRoom,
    RoomUpdate,
}

impl ServerEventKind {
    pub fn name(self) -> &'static str {
        match self {
            ServerEventKind::RoomCreated => "waitHostCreateRoom",
            ServerEventKind::WaitJoinRoom => "waitJoinRoom",
            ServerEventKind::RoomUpdate => "waitInRoom",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "waitHostCreateRoom" => Some(ServerEventKind::RoomCreated),
            "waitJoinRoom" => Some(ServerEventKind::WaitJoinRoom),
            "waitInRoom" => Some(ServerEventKind::RoomUpdate),
            _ => None,
        }
    }
}

impl ServerEvent {
    pub fn kind(&self) -> ServerEventKind {
        match self {
            ServerEvent::RoomCreated(_) => ServerEventKind::RoomCreated,
            ServerEvent::WaitJoinRoom(_) => ServerEventKind::WaitJoinRoom,
            ServerEvent::RoomUpdate(_) => ServerEventKind::RoomUpdate,
        }
    }
}

/// One text frame on the wire: `{"event": <name>, "data": <payload>}`.
#[derive(Serialize, Deserialize, Debug)]
pub struct Frame {
    pub event: String,
    #[serde(default)]
    pub data: Value,
}

pub fn encode(event: &ClientEvent) -> Result<String, serde_json::Error> {
    serde_json::to_string(event)
}

/// Decodes an inbound frame. Event names this client does not handle yield `Ok(None)`.
pub fn decode(text: &str) -> Result<Option<ServerEvent>, serde_json::Error> {
    let frame: Frame = serde_json::from_str(text)?;
    let Some(kind) = ServerEventKind::from_name(&frame.event) else {
        return Ok(None);
    };
    let event = match kind {
        ServerEventKind::RoomCreated => ServerEvent::RoomCreated(serde_json::from_value(frame.data)?),
        ServerEventKind::WaitJoinRoom => {
            ServerEvent::WaitJoinRoom(serde_json::from_value(frame.data)?)
        }
        ServerEventKind::RoomUpdate => ServerEvent::RoomUpdate(serde_json::from_value(frame.data)?),
    };
    Ok(Some(event))
}
