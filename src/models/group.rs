use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Group {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Success body of the REST API: the payload lives under `data`.
#[derive(Deserialize, Debug)]
pub struct DataResponse<T> {
    pub data: T,
}

#[derive(Deserialize, Debug)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Error body of the REST API.
#[derive(Deserialize, Debug, Default)]
pub struct ErrorResponse {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct InviteRequest<'a> {
    pub email: &'a str,
}
