//! Entry routing: maps a launch URL (or bare path) to a page.

use reqwest::Url;

pub const JOIN_PATH: &str = "/presentation/join";
pub const ROOM_QUERY_KEY: &str = "id";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Guest entry, optionally deep-linked to a room.
    Join { room_id: Option<String> },
    Host { presentation_id: String },
    Group { group_id: String },
}

impl Default for Route {
    fn default() -> Self {
        Route::Join { room_id: None }
    }
}

impl Route {
    /// Accepts a full URL (`http://host/presentation/join?id=R1`) or a path
    /// (`/presentation/join?id=R1`). Unknown paths fall back to the join page.
    pub fn parse(raw: &str) -> Self {
        let url = Url::parse(raw).or_else(|_| {
            Url::parse("app://livepoll/").and_then(|base| base.join(raw.trim()))
        });
        let Ok(url) = url else {
            return Route::default();
        };

        let segments: Vec<&str> = url
            .path_segments()
            .map(|segments| segments.filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();

        match segments.as_slice() {
            ["presentation", "join"] => Route::Join {
                room_id: url
                    .query_pairs()
                    .find(|(key, _)| key == ROOM_QUERY_KEY)
                    .map(|(_, value)| value.trim().to_string())
                    .filter(|value| !value.is_empty()),
            },
            ["presentation", id, "host"] => Route::Host {
                presentation_id: id.to_string(),
            },
            ["groups", id] => Route::Group {
                group_id: id.to_string(),
            },
            _ => Route::default(),
        }
    }
}

/// Shareable guest link: `<origin>/presentation/join?id=<room>`.
pub fn join_link(origin: &Url, room_id: &str) -> String {
    let mut url = origin.clone();
    url.set_path(JOIN_PATH);
    url.set_query(None);
    url.query_pairs_mut().append_pair(ROOM_QUERY_KEY, room_id);
    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_link_uses_origin() {
        let origin = Url::parse("http://localhost:3000").unwrap();
        assert_eq!(
            join_link(&origin, "R1"),
            "http://localhost:3000/presentation/join?id=R1"
        );
    }

    #[test]
    fn join_link_round_trips_through_route() {
        let origin = Url::parse("https://poll.example.com/").unwrap();
        let link = join_link(&origin, "R 1&x");
        assert_eq!(
            Route::parse(&link),
            Route::Join {
                room_id: Some("R 1&x".to_string())
            }
        );
    }

    #[test]
    fn parses_paths_and_urls() {
        assert_eq!(
            Route::parse("/presentation/join?id=R1"),
            Route::Join {
                room_id: Some("R1".to_string())
            }
        );
        assert_eq!(
            Route::parse("/presentation/join"),
            Route::Join { room_id: None }
        );
        assert_eq!(
            Route::parse("http://localhost:3000/presentation/p42/host"),
            Route::Host {
                presentation_id: "p42".to_string()
            }
        );
        assert_eq!(
            Route::parse("/groups/g7"),
            Route::Group {
                group_id: "g7".to_string()
            }
        );
        assert_eq!(Route::parse("/somewhere/else"), Route::default());
    }

    #[test]
    fn empty_room_query_means_manual_entry() {
        assert_eq!(
            Route::parse("/presentation/join?id="),
            Route::Join { room_id: None }
        );
    }
}
