//! Contacts tools (Google People API)

use gworkspace_core::google::{GoogleClient, PeopleApi};
use gworkspace_core::scopes::{self, CONTACTS_READONLY_SCOPE, CONTACTS_SCOPE};
use gworkspace_core::AppResult;
use serde_json::{json, Value};
use tracing::info;

use super::args::{count_with_default, optional_string, require_string, schema};
use super::{unknown_handler, ToolDef};

pub fn definitions() -> Vec<ToolDef> {
    vec![
        ToolDef {
            name: "search_contacts",
            group: scopes::CONTACTS,
            description: "Searches for contacts by name or email address. Returns names, emails, \
                          phone numbers and resource names.",
            required_scopes: &[CONTACTS_READONLY_SCOPE],
            read_only: true,
            input_schema: schema(
                json!({
                    "query": {"type": "string", "description": "The name or email to search for."},
                    "page_size": {"type": "integer", "description": "Maximum number of contacts to return.", "default": 10}
                }),
                &["query"],
            ),
        },
        ToolDef {
            name: "create_contact",
            group: scopes::CONTACTS,
            description: "Creates a new contact with a name and optional email address and phone number.",
            required_scopes: &[CONTACTS_SCOPE],
            read_only: false,
            input_schema: schema(
                json!({
                    "given_name": {"type": "string", "description": "The contact's first name."},
                    "family_name": {"type": "string", "description": "The contact's last name."},
                    "email": {"type": "string", "description": "The contact's email address."},
                    "phone_number": {"type": "string", "description": "The contact's phone number."}
                }),
                &["given_name"],
            ),
        },
        ToolDef {
            name: "update_contact_email",
            group: scopes::CONTACTS,
            description: "Adds an email address to a contact. Use search_contacts first to get the resource name.",
            required_scopes: &[CONTACTS_SCOPE],
            read_only: false,
            input_schema: schema(
                json!({
                    "resource_name": {"type": "string", "description": "Resource name of the contact, e.g. 'people/c12345'."},
                    "email": {"type": "string", "description": "The email address to add."}
                }),
                &["resource_name", "email"],
            ),
        },
    ]
}

pub async fn call(name: &str, client: GoogleClient, account: &str, args: &Value) -> AppResult<String> {
    let people = PeopleApi::new(client);
    match name {
        "search_contacts" => search_contacts(&people, account, args).await,
        "create_contact" => create_contact(&people, account, args).await,
        "update_contact_email" => update_contact_email(&people, account, args).await,
        _ => Err(unknown_handler(scopes::CONTACTS, name)),
    }
}

async fn search_contacts(people: &PeopleApi, account: &str, args: &Value) -> AppResult<String> {
    let query = require_string(args, "query")?;
    let page_size = count_with_default(args, "page_size", 10, 30);
    info!("[search_contacts] Email: '{}', Query: '{}'", account, query);

    let results = people.search_contacts(query, page_size).await?;
    if results.is_empty() {
        return Ok(format!("No contacts found matching '{}' for {}.", query, account));
    }

    let blocks: Vec<String> = results.iter().map(format_contact_details).collect();
    Ok(format!(
        "Found {} contacts for {} matching '{}':\n{}",
        results.len(),
        account,
        query,
        blocks.join("\n")
    ))
}

async fn create_contact(people: &PeopleApi, account: &str, args: &Value) -> AppResult<String> {
    let given_name = require_string(args, "given_name")?;
    let family_name = optional_string(args, "family_name");
    info!(
        "[create_contact] Email: '{}', Name: '{} {}'",
        account,
        given_name,
        family_name.unwrap_or("")
    );

    let created = people
        .create_contact(
            given_name,
            family_name,
            optional_string(args, "email"),
            optional_string(args, "phone_number"),
        )
        .await?;

    Ok(format!(
        "Successfully created contact for {}:\n{}",
        account,
        format_contact_details(&created)
    ))
}

async fn update_contact_email(people: &PeopleApi, account: &str, args: &Value) -> AppResult<String> {
    let resource_name = require_string(args, "resource_name")?;
    let email = require_string(args, "email")?;
    info!("[update_contact_email] Email: '{}', Resource: '{}'", account, resource_name);

    let updated = people.add_contact_email(resource_name, email).await?;

    Ok(format!(
        "Successfully updated contact for {}:\n{}",
        account,
        format_contact_details(&updated)
    ))
}

/// Render a People API person as a short text block.
fn format_contact_details(person: &Value) -> String {
    let resource_name = person
        .get("resourceName")
        .and_then(|v| v.as_str())
        .unwrap_or("N/A");
    let display_name = person
        .get("names")
        .and_then(|v| v.as_array())
        .and_then(|names| names.first())
        .map(|n| n.get("displayName").and_then(|v| v.as_str()).unwrap_or("No Name"))
        .unwrap_or("No Name");

    format!(
        "- Name: \"{}\" (Resource Name: {})\n  Emails: {}\n  Phone Numbers: {}",
        display_name,
        resource_name,
        joined_values(person, "emailAddresses"),
        joined_values(person, "phoneNumbers"),
    )
}

/// Comma-joined `value` fields of a person's list field, or "None".
fn joined_values(person: &Value, field: &str) -> String {
    match person.get(field).and_then(|v| v.as_array()) {
        Some(items) if !items.is_empty() => items
            .iter()
            .map(|item| item.get("value").and_then(|v| v.as_str()).unwrap_or("N/A"))
            .collect::<Vec<_>>()
            .join(", "),
        _ => "None".to_string(),
    }
}
