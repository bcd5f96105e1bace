use crate::api::TagsResponse;
use crate::core::backend::{check_status, BackendError};
use crate::utils::url::construct_api_url;

/// Query `GET /api/tags` and return the installed model ids in server order.
pub async fn fetch_models(
    client: &reqwest::Client,
    base_url: &str,
) -> Result<Vec<String>, BackendError> {
    let tags_url = construct_api_url(base_url, "api/tags");
    let response = client
        .get(tags_url)
        .send()
        .await
        .map_err(|err| BackendError::from_transport(base_url, err))?;
    let response = check_status(response).await?;

    let tags = response
        .json::<TagsResponse>()
        .await
        .map_err(|err| BackendError::RequestFailed(format!("Malformed model list: {err}")))?;
    Ok(model_ids(&tags))
}

pub fn model_ids(tags: &TagsResponse) -> Vec<String> {
    tags.models
        .iter()
        .filter_map(|tag| tag.id().map(str::to_owned))
        .collect()
}

/// Case-insensitive alphabetical order; ids that differ only in case keep
/// their relative order.
pub fn sort_models(models: &mut [String]) {
    models.sort_by_cached_key(|id| id.to_lowercase());
}
