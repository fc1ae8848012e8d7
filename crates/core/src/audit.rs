//! Audit trail action names and detail redaction.

/// Known action types for audit log entries.
pub mod action_types {
    pub const LOGIN: &str = "login";
    pub const LOGIN_FAILED: &str = "login_failed";
    pub const LOGOUT: &str = "logout";
    pub const ENTITY_CREATE: &str = "entity_create";
    pub const ENTITY_UPDATE: &str = "entity_update";
    pub const DISPATCH_ASSIGN: &str = "dispatch_assign";
    pub const CHECKLIST_DEPARTURE: &str = "checklist_departure";
    pub const CHECKLIST_ARRIVAL: &str = "checklist_arrival";
}

/// Entity type names recorded alongside audit entries and events.
pub mod entity_types {
    pub const USER: &str = "user";
    pub const SERVICE_ORDER: &str = "service_order";
    pub const VEHICLE: &str = "vehicle";
    pub const DRIVER: &str = "driver";
    pub const DISPATCH_ASSIGNMENT: &str = "dispatch_assignment";
    pub const CHAT_MESSAGE: &str = "chat_message";
}

/// Keys whose values never reach the audit table.
pub const SENSITIVE_FIELDS: &[&str] = &[
    "password",
    "token",
    "secret",
    "authorization",
    "credential",
];

/// Replace the value of any sensitive key with `"[REDACTED]"`, recursively.
pub fn redact_sensitive_fields(value: &serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => {
            let mut redacted = serde_json::Map::new();
            for (key, val) in map {
                let lower_key = key.to_lowercase();
                if SENSITIVE_FIELDS.iter().any(|f| lower_key.contains(f)) {
                    redacted.insert(
                        key.clone(),
                        serde_json::Value::String("[REDACTED]".to_string()),
                    );
                } else {
                    redacted.insert(key.clone(), redact_sensitive_fields(val));
                }
            }
            serde_json::Value::Object(redacted)
        }
        serde_json::Value::Array(items) => {
            serde_json::Value::Array(items.iter().map(redact_sensitive_fields).collect())
        }
        other => other.clone(),
    }
}
