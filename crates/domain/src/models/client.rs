//! Client domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use super::address::{Address, AddressInput};

/// Owning sales agent as embedded in a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRef {
    pub id: Uuid,
    pub name: String,
    /// User account linked to the agent; this is what the access policy compares.
    pub user_id: Option<Uuid>,
}

/// Entity type as embedded in a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityTypeRef {
    pub id: Uuid,
    pub name: String,
}

/// A client record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: Uuid,
    pub entity_type: Option<EntityTypeRef>,
    pub name: String,
    pub tax_id: String,
    pub email: Option<String>,
    pub phone: String,
    pub website: String,
    pub is_active: bool,
    pub note: String,
    pub agent: Option<AgentRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Client {
    /// User account that owns this client through its sales agent, if any.
    pub fn owner_user_id(&self) -> Option<Uuid> {
        self.agent.as_ref().and_then(|agent| agent.user_id)
    }
}

/// A client together with its addresses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientDetail {
    #[serde(flatten)]
    pub client: Client,
    pub addresses: Vec<Address>,
}

/// Response for client listing.
#[derive(Debug, Clone, Serialize)]
pub struct ListClientsResponse {
    pub data: Vec<Client>,
    pub count: usize,
}

/// Request payload for creating a client with its addresses.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateClientRequest {
    pub entity_type_id: Option<Uuid>,

    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    #[validate(custom(function = "crate::models::validate_not_blank"))]
    pub name: String,

    #[validate(length(min = 1, max = 20, message = "Tax id must be 1-20 characters"))]
    #[validate(custom(function = "crate::models::validate_not_blank"))]
    pub tax_id: String,

    #[validate(email(message = "Email must be a valid email address"))]
    pub email: String,

    #[validate(length(min = 1, max = 15, message = "Phone must be 1-15 characters"))]
    #[validate(custom(function = "crate::models::validate_not_blank"))]
    pub phone: String,

    #[serde(default)]
    #[validate(length(max = 100, message = "Website must be at most 100 characters"))]
    pub website: String,

    #[serde(default = "default_active")]
    pub is_active: bool,

    #[serde(default)]
    pub note: String,

    /// Only honoured for supervisors; agents always own what they create.
    pub agent_id: Option<Uuid>,

    /// Must not be empty; see [`CreateClientRequest::validate_all`].
    #[validate(nested)]
    #[serde(default)]
    pub addresses: Vec<AddressInput>,
}

impl CreateClientRequest {
    /// Field validation plus the rule that a client has at least one address.
    pub fn validate_all(&self) -> Result<(), ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        if self.addresses.is_empty() {
            errors.add("addresses", address_required());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Request payload for updating a client's basic fields.
///
/// Addresses are managed through their own endpoints.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateClientRequest {
    pub entity_type_id: Option<Uuid>,

    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    #[validate(custom(function = "crate::models::validate_not_blank"))]
    pub name: String,

    #[validate(length(min = 1, max = 20, message = "Tax id must be 1-20 characters"))]
    #[validate(custom(function = "crate::models::validate_not_blank"))]
    pub tax_id: String,

    #[validate(email(message = "Email must be a valid email address"))]
    pub email: String,

    #[validate(length(min = 1, max = 15, message = "Phone must be 1-15 characters"))]
    #[validate(custom(function = "crate::models::validate_not_blank"))]
    pub phone: String,

    #[serde(default)]
    #[validate(length(max = 100, message = "Website must be at most 100 characters"))]
    pub website: String,

    #[serde(default = "default_active")]
    pub is_active: bool,

    #[serde(default)]
    pub note: String,

    /// Ignored for agents.
    pub agent_id: Option<Uuid>,
}

fn default_active() -> bool {
    true
}

fn address_required() -> ValidationError {
    ValidationError::new("address_required").with_message(std::borrow::Cow::Borrowed(
        "At least one address is required",
    ))
}

/// Spreadsheet export header, one column per [`ClientExportRow`] field.
pub const EXPORT_HEADERS: [&str; 6] = ["Client", "Email", "Locality", "City", "Address", "Country"];

/// One exported row: a client paired with one of its addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientExportRow {
    pub client: String,
    pub email: String,
    pub locality: String,
    pub city: String,
    pub address: String,
    pub country: String,
}

impl ClientExportRow {
    pub fn cells(&self) -> [&str; 6] {
        [
            &self.client,
            &self.email,
            &self.locality,
            &self.city,
            &self.address,
            &self.country,
        ]
    }
}

/// Flattens clients into one row per address. Clients without addresses
/// produce no rows.
pub fn export_rows(clients: &[ClientDetail]) -> Vec<ClientExportRow> {
    clients
        .iter()
        .flat_map(|detail| {
            detail.addresses.iter().map(move |address| ClientExportRow {
                client: detail.client.name.clone(),
                email: detail.client.email.clone().unwrap_or_default(),
                locality: address.locality.clone(),
                city: address.city.clone(),
                address: address.street_line(),
                country: address.country.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::address::AddressTypeRef;
    use serde_json::json;

    fn address_input(street: &str, locality: &str) -> AddressInput {
        AddressInput {
            address_type_id: Uuid::new_v4(),
            street: street.to_string(),
            number: "100".to_string(),
            locality: locality.to_string(),
            city: "Valparaíso".to_string(),
            postal_code: String::new(),
            country: "Chile".to_string(),
            note: String::new(),
        }
    }

    fn create_request(addresses: Vec<AddressInput>) -> CreateClientRequest {
        CreateClientRequest {
            entity_type_id: None,
            name: "Comercial Andes SpA".to_string(),
            tax_id: "76.123.456-7".to_string(),
            email: "contacto@andes.cl".to_string(),
            phone: "+5622334455".to_string(),
            website: String::new(),
            is_active: true,
            note: String::new(),
            agent_id: None,
            addresses,
        }
    }

    fn client(name: &str, agent: Option<AgentRef>) -> Client {
        Client {
            id: Uuid::new_v4(),
            entity_type: None,
            name: name.to_string(),
            tax_id: "1-9".to_string(),
            email: Some(format!("{}@example.com", name.to_lowercase())),
            phone: String::new(),
            website: String::new(),
            is_active: true,
            note: String::new(),
            agent,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn address(client_id: Uuid, street: &str, number: &str) -> Address {
        Address {
            id: Uuid::new_v4(),
            client_id,
            address_type: AddressTypeRef {
                id: Uuid::new_v4(),
                name: "Main".to_string(),
            },
            street: street.to_string(),
            number: number.to_string(),
            locality: "Centro".to_string(),
            city: "Concepción".to_string(),
            postal_code: String::new(),
            country: "Chile".to_string(),
            note: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_create_client_with_address_is_valid() {
        let request = create_request(vec![address_input("O'Higgins", "Centro")]);
        assert!(request.validate_all().is_ok());
    }

    #[test]
    fn test_create_client_without_addresses_rejected() {
        let request = create_request(vec![]);
        assert!(request.validate().is_ok());
        let errors = request.validate_all().unwrap_err();
        assert!(errors.field_errors().contains_key("addresses"));
    }

    #[test]
    fn test_create_client_whitespace_address_fields_rejected() {
        let request = create_request(vec![address_input("  ", "Centro")]);
        let errors = request.validate_all().unwrap_err();
        // Nested field error on the street, not the address set rule
        assert!(!errors.field_errors().contains_key("addresses"));
        assert!(errors.errors().contains_key("addresses"));
    }

    #[test]
    fn test_create_client_blank_name_and_tax_id_rejected() {
        let mut request = create_request(vec![address_input("Colón", "Talcahuano")]);
        request.name = "   ".to_string();
        request.tax_id = "\t".to_string();
        let errors = request.validate_all().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("tax_id"));
    }

    #[test]
    fn test_update_client_blank_tax_id_rejected() {
        let request = UpdateClientRequest {
            entity_type_id: None,
            name: "Ferretería Sur".to_string(),
            tax_id: "  ".to_string(),
            email: "ventas@ferresur.cl".to_string(),
            phone: "412345678".to_string(),
            website: String::new(),
            is_active: true,
            note: String::new(),
            agent_id: None,
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("tax_id"));
    }

    #[test]
    fn test_create_client_invalid_nested_address_reported() {
        let mut bad = address_input("Colón", "Talcahuano");
        bad.country = String::new();
        let request = create_request(vec![bad]);
        let errors = request.validate_all().unwrap_err();
        assert!(errors.errors().contains_key("addresses"));
    }

    #[test]
    fn test_create_client_empty_address_fields_reported_once() {
        let request = create_request(vec![address_input("", "")]);
        let errors = request.validate_all().unwrap_err();
        // Nested field errors, not the set rule
        assert!(!errors.field_errors().contains_key("addresses"));
        assert!(errors.errors().contains_key("addresses"));
    }

    #[test]
    fn test_create_client_defaults_from_json() {
        let request: CreateClientRequest = serde_json::from_value(json!({
            "name": "Ferretería Sur",
            "tax_id": "77.000.111-2",
            "email": "ventas@ferresur.cl",
            "phone": "412345678"
        }))
        .unwrap();
        assert!(request.is_active);
        assert!(request.addresses.is_empty());
        assert!(request.agent_id.is_none());
    }

    #[test]
    fn test_update_client_rejects_bad_email() {
        let request = UpdateClientRequest {
            entity_type_id: None,
            name: "Ferretería Sur".to_string(),
            tax_id: "77.000.111-2".to_string(),
            email: "ventas-at-ferresur".to_string(),
            phone: "412345678".to_string(),
            website: String::new(),
            is_active: false,
            note: String::new(),
            agent_id: None,
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_owner_user_id() {
        let user_id = Uuid::new_v4();
        let owned = client(
            "Owned",
            Some(AgentRef {
                id: Uuid::new_v4(),
                name: "Agent".to_string(),
                user_id: Some(user_id),
            }),
        );
        assert_eq!(owned.owner_user_id(), Some(user_id));

        let unlinked_agent = client(
            "Unlinked",
            Some(AgentRef {
                id: Uuid::new_v4(),
                name: "Agent".to_string(),
                user_id: None,
            }),
        );
        assert_eq!(unlinked_agent.owner_user_id(), None);
        assert_eq!(client("Orphan", None).owner_user_id(), None);
    }

    #[test]
    fn test_export_rows_one_per_address() {
        let first = client("Alfa", None);
        let second = client("Beta", None);
        let details = vec![
            ClientDetail {
                addresses: vec![
                    address(first.id, "Los Carrera", "55"),
                    address(first.id, "Barros Arana", "1"),
                ],
                client: first,
            },
            ClientDetail {
                addresses: vec![],
                client: second,
            },
        ];

        let rows = export_rows(&details);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].client, "Alfa");
        assert_eq!(rows[0].address, "Los Carrera 55");
        assert_eq!(rows[1].address, "Barros Arana 1");
        assert_eq!(rows[0].cells().len(), EXPORT_HEADERS.len());
    }

    #[test]
    fn test_client_detail_serializes_flat() {
        let c = client("Gamma", None);
        let id = c.id;
        let detail = ClientDetail {
            client: c,
            addresses: vec![],
        };
        let value = serde_json::to_value(&detail).unwrap();
        assert_eq!(value["id"], json!(id));
        assert_eq!(value["name"], "Gamma");
        assert!(value["addresses"].as_array().unwrap().is_empty());
    }
}
