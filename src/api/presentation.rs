use log::{debug, info};

use super::{read_body, ApiClient, ApiError};
use crate::models::group::DataResponse;
use crate::models::presentation::Presentation;

pub async fn get_presentation(
    api: &ApiClient,
    presentation_id: &str,
) -> Result<Presentation, ApiError> {
    let url = api.url(&format!("/presentations/{}", presentation_id));
    debug!("Fetching presentation: {}", url);
    let resp = api.authorize(api.client.get(&url)).send().await?;
    let response: DataResponse<Presentation> = read_body(resp).await?;
    info!("Presentation {} received", presentation_id);
    Ok(response.data)
}
