use log::{debug, info};

use super::{read_body, ApiClient, ApiError};
use crate::models::group::{DataResponse, Group, InviteRequest, MessageResponse};

pub async fn get_group(api: &ApiClient, group_id: &str) -> Result<Group, ApiError> {
    let url = api.url(&format!("/groups/{}", group_id));
    debug!("Fetching group: {}", url);
    let resp = api.authorize(api.client.get(&url)).send().await?;
    let response: DataResponse<Group> = read_body(resp).await?;
    info!("Group {} received", group_id);
    Ok(response.data)
}

pub async fn get_invitation_link(api: &ApiClient, group_id: &str) -> Result<String, ApiError> {
    let url = api.url(&format!("/groups/{}/invitation-link", group_id));
    let resp = api.authorize(api.client.get(&url)).send().await?;
    let response: DataResponse<String> = read_body(resp).await?;
    info!("Invitation link for group {} received", group_id);
    Ok(response.data)
}

pub async fn invite_user_via_email(
    api: &ApiClient,
    group_id: &str,
    email: &str,
) -> Result<Option<String>, ApiError> {
    let url = api.url(&format!("/groups/{}/invite", group_id));
    let resp = api
        .authorize(api.client.post(&url))
        .json(&InviteRequest { email })
        .send()
        .await?;
    let response: MessageResponse = read_body(resp).await?;
    info!("Invitation sent for group {}", group_id);
    Ok(response.message)
}
