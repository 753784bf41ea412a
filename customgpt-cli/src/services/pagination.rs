//! Paging through list endpoints
//!
//! Failures never surface as errors here: a page that cannot be fetched or
//! decoded ends the walk and whatever was collected so far is returned.

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::{ApiError, ApiResponse, ApiResult, Executor, Operation, Paginated};

/// Fetch every page of a collection, starting at page 1.
///
/// Stops on the first empty page, once the reported total is reached, or on
/// the first failed/malformed page. `container` names the key wrapping the
/// paginator when an endpoint nests it (e.g. `"pages"` for project pages).
pub async fn fetch_all_pages<T, F>(
    executor: &Executor,
    label: &str,
    container: Option<&str>,
    make_operation: F,
) -> Vec<T>
where
    T: DeserializeOwned,
    F: Fn(u32) -> Operation,
{
    let mut items: Vec<T> = Vec::new();
    let mut page = 1;

    loop {
        let Some(paginated) = fetch_page::<T>(executor, label, container, make_operation(page)).await
        else {
            break;
        };

        let Some(batch) = paginated.data else {
            warn!(
                "Incomplete or invalid response on {} page {} - stopping pagination",
                label, page
            );
            break;
        };

        if batch.is_empty() {
            break;
        }

        items.extend(batch);
        debug!("Fetched {} page {} ({} so far)", label, page, items.len());

        if let Some(total) = paginated.total {
            if items.len() as u64 >= total {
                break;
            }
        }

        page += 1;
    }

    items
}

/// Fetch and decode a single page; `None` (with a warning) when that fails
pub async fn fetch_page<T: DeserializeOwned>(
    executor: &Executor,
    label: &str,
    container: Option<&str>,
    operation: Operation,
) -> Option<Paginated<T>> {
    let Some(response) = executor.execute(&operation).await else {
        warn!(
            "No usable response for {} ({}) - stopping pagination",
            label,
            operation.name()
        );
        return None;
    };

    match decode_page(&response, container) {
        Ok(paginated) => Some(paginated),
        Err(err) => {
            warn!(
                "Incomplete or invalid response for {} ({}) - stopping pagination: {}",
                label,
                operation.name(),
                err
            );
            None
        }
    }
}

/// Decode one page from a response, unwrapping the `container` key if given
pub fn decode_page<T: DeserializeOwned>(
    response: &ApiResponse,
    container: Option<&str>,
) -> ApiResult<Paginated<T>> {
    let Some(key) = container else {
        return response.data::<Paginated<T>>();
    };

    let mut data: Value = response.data()?;
    let inner = data
        .get_mut(key)
        .map(Value::take)
        .ok_or_else(|| ApiError::malformed(format!("response has no `{}` container", key)))?;
    serde_json::from_value(inner)
        .map_err(|e| ApiError::malformed(format!("invalid `{}` page: {}", key, e)))
}
