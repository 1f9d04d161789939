use livepoll::channel::memory::MemoryChannel;
use livepoll::channel::ConnectionState;
use livepoll::flow::{GuestScreen, GuestState, GuestView, HostScreen, HostState, HostView};
use livepoll::models::events::{self, ClientEvent, ServerEvent, ServerEventKind};
use livepoll::models::presentation::{PollOption, Presentation};
use livepoll::routes::Route;
use reqwest::Url;
use serde_json::json;

fn presentation() -> Presentation {
    serde_json::from_value(json!({
        "_id": "P",
        "slides": [{
            "_id": "S1",
            "slideType": "multipleChoice",
            "title": "Best letter?",
            "options": [
                { "index": 0, "value": "A", "quantity": 0 },
                { "index": 1, "value": "B", "quantity": 0 }
            ],
            "time": 30
        }]
    }))
    .expect("presentation fixture should parse")
}

/// Parses a frame the way it would arrive from the backend.
fn inbound(frame: serde_json::Value) -> ServerEvent {
    events::decode(&frame.to_string())
        .expect("frame should decode")
        .expect("event should be handled")
}

/// Full round: host creates room R1, guest joins and votes A, host sees the tally.
#[test]
fn test_host_and_guest_round() {
    let origin = Url::parse("http://localhost:3000").unwrap();
    let host_channel = MemoryChannel::new();
    let guest_channel = MemoryChannel::new();

    // 1. Host mounts and asks for a room
    let host = HostView::mount(&host_channel, presentation(), origin);
    assert_eq!(
        host_channel.take_sent(),
        vec![ClientEvent::HostCreateRoom {
            presentation_id: "P".to_string()
        }]
    );
    assert_eq!(host.state(), HostState::AwaitingRoomId);
    assert_eq!(host.screen(), HostScreen::Loading);

    // 2. Backend assigns R1
    host_channel.deliver(inbound(json!({
        "event": "waitHostCreateRoom",
        "data": { "roomId": "R1" }
    })));
    assert_eq!(
        host.invitation_link().as_deref(),
        Some("http://localhost:3000/presentation/join?id=R1")
    );

    // 3. Guest joins with the code
    let guest = GuestView::mount(&guest_channel, None);
    guest.join(&guest_channel, "R1");
    assert_eq!(
        guest_channel.take_sent(),
        vec![ClientEvent::JoinRoom {
            room_id: "R1".to_string()
        }]
    );

    // 4. Backend pushes the slide snapshot
    guest_channel.deliver(inbound(json!({
        "event": "waitJoinRoom",
        "data": { "data": serde_json::to_value(presentation()).unwrap() }
    })));
    match guest.screen() {
        GuestScreen::Voting { title, options } => {
            assert_eq!(title, "Best letter?");
            assert_eq!(options.len(), 2);
        }
        other => panic!("Expected voting screen, got {other:?}"),
    }

    // 5. Guest votes A, twice; only one vote leaves
    guest.vote(&guest_channel, 0);
    guest.vote(&guest_channel, 0);
    assert_eq!(
        guest_channel.take_sent(),
        vec![ClientEvent::MemberVote {
            slide_id: "S1".to_string(),
            option_index: 0
        }]
    );
    assert!(matches!(guest.state(), GuestState::Voted { .. }));

    // 6. Backend aggregates and updates the host
    host_channel.deliver(inbound(json!({
        "event": "waitInRoom",
        "data": { "type": "newVote", "data": [
            { "index": 0, "value": "A", "quantity": 1 },
            { "index": 1, "value": "B", "quantity": 0 }
        ]}
    })));
    match host.screen() {
        HostScreen::Ready { room_id, chart, .. } => {
            assert_eq!(room_id, "R1");
            let bars: Vec<(&str, u64)> = chart
                .bars
                .iter()
                .map(|bar| (bar.label.as_str(), bar.quantity))
                .collect();
            assert_eq!(bars, vec![("A", 1), ("B", 0)]);
        }
        HostScreen::Loading => panic!("Expected ready host screen"),
    }
}

#[test]
fn test_deep_link_skips_code_entry() {
    let channel = MemoryChannel::new();
    let route = Route::parse("http://localhost:3000/presentation/join?id=R1");
    let Route::Join { room_id } = route else {
        panic!("Expected join route");
    };

    let guest = GuestView::mount(&channel, room_id.as_deref());

    assert_ne!(guest.screen(), GuestScreen::EnterCode);
    assert_eq!(
        guest.state(),
        GuestState::AwaitingSlide {
            room_id: "R1".to_string()
        }
    );
    assert_eq!(
        channel.sent(),
        vec![ClientEvent::JoinRoom {
            room_id: "R1".to_string()
        }]
    );
}

#[test]
fn test_latest_vote_update_wins() {
    let channel = MemoryChannel::new();
    let host = HostView::mount(
        &channel,
        presentation(),
        Url::parse("http://localhost:3000").unwrap(),
    );
    channel.deliver(inbound(json!({
        "event": "waitHostCreateRoom",
        "data": { "roomId": "R1" }
    })));

    let tallies = [(3, 1), (0, 0), (2, 7)];
    for (a, b) in tallies {
        channel.deliver(inbound(json!({
            "event": "waitInRoom",
            "data": { "type": "newVote", "data": [
                { "index": 0, "value": "A", "quantity": a },
                { "index": 1, "value": "B", "quantity": b }
            ]}
        })));
        assert_eq!(
            host.options(),
            vec![PollOption::new(0, "A", a), PollOption::new(1, "B", b)]
        );
    }
}

#[test]
fn test_remounting_views_does_not_stack_handlers() {
    let channel = MemoryChannel::new();
    let origin = Url::parse("http://localhost:3000").unwrap();

    for _ in 0..5 {
        let _host = HostView::mount(&channel, presentation(), origin.clone());
        let _guest = GuestView::mount(&channel, Some("R1"));
    }
    assert_eq!(channel.handler_count(ServerEventKind::RoomCreated), 0);
    assert_eq!(channel.handler_count(ServerEventKind::WaitJoinRoom), 0);

    let _guest = GuestView::mount(&channel, Some("R1"));
    assert_eq!(channel.handler_count(ServerEventKind::WaitJoinRoom), 1);
}

#[test]
fn test_guest_rejoins_after_transport_drop() {
    let channel = MemoryChannel::new();
    let guest = GuestView::mount(&channel, Some("R1"));
    channel.deliver(inbound(json!({
        "event": "waitJoinRoom",
        "data": { "data": serde_json::to_value(presentation()).unwrap() }
    })));
    guest.vote(&channel, 1);
    channel.take_sent();

    channel.set_state(ConnectionState::Disconnected {
        reason: "connection reset".to_string(),
    });
    channel.set_state(ConnectionState::Connected);

    assert_eq!(
        channel.take_sent(),
        vec![ClientEvent::JoinRoom {
            room_id: "R1".to_string()
        }]
    );
    // Still voted: the same slide comes back and no second vote can leave
    channel.deliver(inbound(json!({
        "event": "waitJoinRoom",
        "data": { "data": serde_json::to_value(presentation()).unwrap() }
    })));
    guest.vote(&channel, 0);
    assert!(channel.take_sent().is_empty());
}
