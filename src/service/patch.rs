use serde_json::Value;
use uuid::Uuid;

/// Typed views over the raw JSON held by a pending update. Only whitelisted
/// keys survive parsing; anything else is dropped before approval touches
/// the database.

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ProfilePatch {
    pub profile_image: Option<String>,
    pub experience_year: Option<i32>,
    pub service_skill: Option<String>,
    pub service_km: Option<i32>,
    pub document_type: Option<String>,
    pub document_file: Option<String>,
    pub addresses: Vec<AddressPatch>,
}

impl ProfilePatch {
    pub fn touches_profile(&self) -> bool {
        self.profile_image.is_some()
            || self.experience_year.is_some()
            || self.service_skill.is_some()
            || self.service_km.is_some()
            || self.document_type.is_some()
            || self.document_file.is_some()
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct AddressPatch {
    /// Targets an existing address when present; creates one when absent.
    pub id: Option<Uuid>,
    pub label: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub is_default: Option<bool>,
}

impl AddressPatch {
    pub fn is_empty(&self) -> bool {
        self.id.is_none()
            && self.label.is_none()
            && self.address.is_none()
            && self.city.is_none()
            && self.state.is_none()
            && self.pincode.is_none()
            && self.is_default.is_none()
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct BankDetailPatch {
    pub account_holder_name: Option<String>,
    pub account_number: Option<String>,
    pub ifsc_code: Option<String>,
    pub bank_name: Option<String>,
    pub upi_id: Option<String>,
}

impl BankDetailPatch {
    pub fn is_empty(&self) -> bool {
        self.account_holder_name.is_none()
            && self.account_number.is_none()
            && self.ifsc_code.is_none()
            && self.bank_name.is_none()
            && self.upi_id.is_none()
    }
}

/// Old mobile clients still send these key names.
const LEGACY_KEY_REMAP: &[(&str, &str)] = &[("street", "address"), ("zip_code", "pincode")];

fn canonical_key(key: &str) -> &str {
    LEGACY_KEY_REMAP
        .iter()
        .find(|(legacy, _)| *legacy == key)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(key)
}

fn as_string(value: &Value) -> Option<String> {
    value.as_str().map(|s| s.to_string())
}

fn as_i32(value: &Value) -> Option<i32> {
    value
        .as_i64()
        .map(|v| v as i32)
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
}

fn as_bool(value: &Value) -> Option<bool> {
    value
        .as_bool()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
}

fn as_uuid(value: &Value) -> Option<Uuid> {
    value.as_str().and_then(|s| Uuid::parse_str(s).ok())
}

pub fn parse_address_patch(data: &Value) -> AddressPatch {
    let mut patch = AddressPatch::default();
    let Some(map) = data.as_object() else {
        return patch;
    };

    for (key, value) in map {
        match canonical_key(key) {
            "id" => patch.id = as_uuid(value),
            "label" => patch.label = as_string(value),
            "address" => patch.address = as_string(value),
            "city" => patch.city = as_string(value),
            "state" => patch.state = as_string(value),
            "pincode" => patch.pincode = as_string(value),
            "is_default" => patch.is_default = as_bool(value),
            other => {
                tracing::debug!("ignoring non-whitelisted address key: {}", other);
            }
        }
    }

    patch
}

pub fn parse_profile_patch(data: &Value) -> ProfilePatch {
    let mut patch = ProfilePatch::default();
    let Some(map) = data.as_object() else {
        return patch;
    };

    // Flat payloads carry address fields at the top level; they collapse
    // into one implicit address entry.
    let mut implicit = AddressPatch::default();

    for (key, value) in map {
        match canonical_key(key) {
            "profile_image" => patch.profile_image = as_string(value),
            "experience_year" => patch.experience_year = as_i32(value),
            "service_skill" => patch.service_skill = as_string(value),
            "service_km" => patch.service_km = as_i32(value),
            "document_type" => patch.document_type = as_string(value),
            "document_file" => patch.document_file = as_string(value),
            "addresses" => {
                if let Some(entries) = value.as_array() {
                    for entry in entries {
                        let parsed = parse_address_patch(entry);
                        if !parsed.is_empty() {
                            patch.addresses.push(parsed);
                        }
                    }
                }
            }
            "id" => implicit.id = as_uuid(value),
            "label" => implicit.label = as_string(value),
            "address" => implicit.address = as_string(value),
            "city" => implicit.city = as_string(value),
            "state" => implicit.state = as_string(value),
            "pincode" => implicit.pincode = as_string(value),
            "is_default" => implicit.is_default = as_bool(value),
            other => {
                tracing::debug!("ignoring non-whitelisted profile key: {}", other);
            }
        }
    }

    if !implicit.is_empty() {
        patch.addresses.push(implicit);
    }

    patch
}

pub fn parse_bank_patch(data: &Value) -> BankDetailPatch {
    let mut patch = BankDetailPatch::default();
    let Some(map) = data.as_object() else {
        return patch;
    };

    for (key, value) in map {
        match key.as_str() {
            "account_holder_name" => patch.account_holder_name = as_string(value),
            "account_number" => patch.account_number = as_string(value),
            "ifsc_code" => patch.ifsc_code = as_string(value),
            "bank_name" => patch.bank_name = as_string(value),
            "upi_id" => patch.upi_id = as_string(value),
            other => {
                tracing::debug!("ignoring non-whitelisted bank key: {}", other);
            }
        }
    }

    patch
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn legacy_address_keys_are_remapped() {
        let patch = parse_address_patch(&json!({
            "street": "14 MG Road",
            "zip_code": "560001",
            "city": "Bengaluru"
        }));

        assert_eq!(patch.address.as_deref(), Some("14 MG Road"));
        assert_eq!(patch.pincode.as_deref(), Some("560001"));
        assert_eq!(patch.city.as_deref(), Some("Bengaluru"));
    }

    #[test]
    fn unknown_keys_are_dropped() {
        let patch = parse_profile_patch(&json!({
            "experience_year": 5,
            "wallet_balance": 99999.0,
            "is_admin_verified": true,
            "role": "admin"
        }));

        assert_eq!(patch.experience_year, Some(5));
        assert!(patch.addresses.is_empty());
        assert!(!patch.touches_profile() || patch.profile_image.is_none());
        assert_eq!(
            patch,
            ProfilePatch {
                experience_year: Some(5),
                ..Default::default()
            }
        );
    }

    #[test]
    fn flat_city_payload_becomes_new_address_entry() {
        let patch = parse_profile_patch(&json!({ "city": "Pune" }));

        assert!(!patch.touches_profile());
        assert_eq!(patch.addresses.len(), 1);
        let entry = &patch.addresses[0];
        assert!(entry.id.is_none());
        assert_eq!(entry.city.as_deref(), Some("Pune"));
    }

    #[test]
    fn addresses_array_entries_keep_their_ids() {
        let target = Uuid::new_v4();
        let patch = parse_profile_patch(&json!({
            "service_skill": "plumbing",
            "addresses": [
                { "id": target.to_string(), "street": "7 Lake View" },
                { "city": "Mumbai" }
            ]
        }));

        assert_eq!(patch.service_skill.as_deref(), Some("plumbing"));
        assert_eq!(patch.addresses.len(), 2);
        assert_eq!(patch.addresses[0].id, Some(target));
        assert_eq!(patch.addresses[0].address.as_deref(), Some("7 Lake View"));
        assert!(patch.addresses[1].id.is_none());
        assert_eq!(patch.addresses[1].city.as_deref(), Some("Mumbai"));
    }

    #[test]
    fn numeric_fields_accept_string_values() {
        let patch = parse_profile_patch(&json!({
            "experience_year": "7",
            "service_km": "25"
        }));

        assert_eq!(patch.experience_year, Some(7));
        assert_eq!(patch.service_km, Some(25));
    }

    #[test]
    fn bank_patch_keeps_only_bank_fields() {
        let patch = parse_bank_patch(&json!({
            "account_number": "000111222333",
            "ifsc_code": "HDFC0001234",
            "customer_id": "not-allowed",
            "id": "not-allowed-either"
        }));

        assert_eq!(patch.account_number.as_deref(), Some("000111222333"));
        assert_eq!(patch.ifsc_code.as_deref(), Some("HDFC0001234"));
        assert_eq!(
            patch,
            BankDetailPatch {
                account_number: Some("000111222333".to_string()),
                ifsc_code: Some("HDFC0001234".to_string()),
                ..Default::default()
            }
        );
    }

    #[test]
    fn non_object_payload_yields_empty_patch() {
        assert!(parse_bank_patch(&json!("just a string")).is_empty());
        assert!(parse_profile_patch(&json!(42)).addresses.is_empty());
    }
}
