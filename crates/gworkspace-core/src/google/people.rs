//! Google People API v1 Client (contacts)
//!
//! Provides methods for:
//! - Searching contacts by name or email
//! - Creating a contact
//! - Appending an email address to an existing contact
//!
//! Updates are guarded by the contact's etag: the current record is fetched
//! first and the update is refused when no etag comes back.

use serde_json::{json, Value};
use tracing::{debug, info};

use super::client::GoogleClient;
use super::common::extract_array;
use crate::common::{AppError, AppResult};

const PEOPLE_API_BASE: &str = "https://people.googleapis.com/v1";

/// Fields returned for each person in search results.
pub const SEARCH_READ_MASK: &str = "names,emailAddresses,phoneNumbers";

/// Fields fetched before an email update.
const UPDATE_READ_FIELDS: &str = "names,emailAddresses";

pub struct PeopleApi {
    client: GoogleClient,
    base_url: String,
}

super::google_api_wrapper!(PeopleApi, PEOPLE_API_BASE);

impl PeopleApi {
    /// Search contacts by name or email address
    ///
    /// # Returns
    /// The `person` object of each match
    pub async fn search_contacts(&self, query: &str, page_size: u32) -> AppResult<Vec<Value>> {
        info!("Searching contacts: {}", query);

        let url = format!("{}/people:searchContacts", self.base_url);
        let response = self
            .client
            .get(
                &url,
                &[
                    ("query", query.to_string()),
                    ("pageSize", page_size.to_string()),
                    ("readMask", SEARCH_READ_MASK.to_string()),
                ],
            )
            .await?;

        let people: Vec<Value> = extract_array(&response, "results")
            .into_iter()
            .map(|r| r.get("person").cloned().unwrap_or_else(|| json!({})))
            .collect();

        debug!("Found {} contacts", people.len());
        Ok(people)
    }

    /// Create a contact
    pub async fn create_contact(
        &self,
        given_name: &str,
        family_name: Option<&str>,
        email: Option<&str>,
        phone_number: Option<&str>,
    ) -> AppResult<Value> {
        info!("Creating contact: {} {}", given_name, family_name.unwrap_or(""));

        let body = new_contact_body(given_name, family_name, email, phone_number);
        let url = format!("{}/people:createContact", self.base_url);
        self.client.post(&url, &[], &body).await
    }

    /// Get a person by resource name (e.g. `people/c12345`)
    pub async fn get_person(&self, resource_name: &str, person_fields: &str) -> AppResult<Value> {
        check_resource_name(resource_name)?;
        debug!("Fetching person: {}", resource_name);

        let url = format!("{}/{}", self.base_url, resource_name);
        self.client
            .get(&url, &[("personFields", person_fields.to_string())])
            .await
    }

    /// Append an email address to a contact, keeping its existing addresses
    pub async fn add_contact_email(&self, resource_name: &str, email: &str) -> AppResult<Value> {
        check_resource_name(resource_name)?;
        info!("Adding email to contact: {}", resource_name);

        let current = self.get_person(resource_name, UPDATE_READ_FIELDS).await?;
        let body = email_update_body(&current, email)?;

        let url = format!("{}/{}:updateContact", self.base_url, resource_name);
        self.client
            .patch(&url, &[("updatePersonFields", "emailAddresses".to_string())], &body)
            .await
    }
}

/// A contact resource name is `people/<id>` and goes into the URL path as is.
pub fn check_resource_name(resource_name: &str) -> AppResult<()> {
    let valid = resource_name
        .strip_prefix("people/")
        .is_some_and(|id| !id.is_empty() && !id.contains(['/', '?', '#']) && !id.contains(".."));

    if valid {
        Ok(())
    } else {
        Err(AppError::invalid_params(format!(
            "Invalid contact resource name '{}'; expected 'people/<id>'",
            resource_name
        )))
    }
}

/// Request body for `people:createContact`.
///
/// Email and phone entries are only present when given.
pub fn new_contact_body(
    given_name: &str,
    family_name: Option<&str>,
    email: Option<&str>,
    phone_number: Option<&str>,
) -> Value {
    let mut body = json!({
        "names": [{"givenName": given_name, "familyName": family_name.unwrap_or("")}],
    });

    if let Some(email) = email.filter(|e| !e.is_empty()) {
        body["emailAddresses"] = json!([{ "value": email }]);
    }

    if let Some(phone) = phone_number.filter(|p| !p.is_empty()) {
        body["phoneNumbers"] = json!([{ "value": phone }]);
    }

    body
}

/// Update body adding `email` to the addresses already on `person`.
///
/// Fails when `person` carries no etag, so a record is never overwritten
/// without the version it was read at.
pub fn email_update_body(person: &Value, email: &str) -> AppResult<Value> {
    let etag = person
        .get("etag")
        .and_then(|v| v.as_str())
        .filter(|e| !e.is_empty())
        .ok_or_else(|| {
            AppError::precondition_failed("Could not retrieve etag for contact. Update failed.")
        })?;

    let mut addresses = extract_array(person, "emailAddresses");
    addresses.push(json!({ "value": email }));

    Ok(json!({
        "etag": etag,
        "emailAddresses": addresses,
    }))
}
