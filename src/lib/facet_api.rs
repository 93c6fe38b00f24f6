use serde::{de::DeserializeOwned, Serialize};

use crate::{error::Result, models::Page};

/// A trait, necessary for every entity that will be used for talking to the
/// departments API. Paths are relative to the API base, e.g. `/facet/persona/`.
#[allow(async_fn_in_trait)]
pub trait FacetApi {
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T>;

    async fn post_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B)
        -> Result<T>;

    async fn put_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T>;

    async fn delete(&self, path: &str) -> Result<()>;

    /// One page of a listing. Implementations hand back `next`/`previous`
    /// in the same relative form they accept.
    async fn get_page<T: DeserializeOwned>(&self, path: &str) -> Result<Page<T>> {
        self.get_json(path).await
    }
}
