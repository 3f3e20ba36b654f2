//! Fetch, create and update

use reqwest::Method;

use super::MutationOutcome;
use super::parse_collection;
use super::parse_mutation;
use crate::AdminClient;
use crate::error::Error;
use crate::model::Entity;
use crate::model::Record;

impl AdminClient {
    /// Fetches a whole collection: `GET {base}/{entity}`.
    ///
    /// The records come back in the order the API sent them. The client
    /// never pages; the table controller slices the full collection.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let users = client.fetch(&Entity::Users).await?;
    /// let mut table = TabularDataController::new(screens::users(), users);
    /// ```
    pub async fn fetch(&self, entity: &Entity) -> Result<Vec<Record>, Error> {
        let url = self.build_url(&urlencoding::encode(entity.name()));
        let response = self.request(Method::GET, &url, None).await?;
        let records = parse_collection(response.status, &response.body, entity)?;
        log::debug!("fetched {} {}", records.len(), entity);
        Ok(records)
    }

    /// Creates a record: `POST {base}/{entity}`.
    pub async fn create(&self, entity: &Entity, record: &Record) -> Result<MutationOutcome, Error> {
        let url = self.build_url(&urlencoding::encode(entity.name()));
        let body = serde_json::to_string(record).map_err(Error::Serialization)?;
        let response = self.request(Method::POST, &url, Some(body)).await?;
        Ok(parse_mutation(response.status, &response.body, entity)?)
    }

    /// Updates a record: `PUT {base}/{entity}/{id}`.
    ///
    /// `changes` is sent as is; the API decides whether it is a partial or
    /// full replacement.
    pub async fn update(
        &self,
        entity: &Entity,
        id: &str,
        changes: &Record,
    ) -> Result<MutationOutcome, Error> {
        let url = self.build_url(&format!(
            "{}/{}",
            urlencoding::encode(entity.name()),
            urlencoding::encode(id)
        ));
        let body = serde_json::to_string(changes).map_err(Error::Serialization)?;
        let response = self.request(Method::PUT, &url, Some(body)).await?;
        Ok(parse_mutation(response.status, &response.body, entity)?)
    }
}
