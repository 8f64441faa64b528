use serde::Deserialize;

/// Partial update of the caller's own profile. Absent fields stay untouched.
#[derive(Debug, Deserialize)]
pub struct EditUserRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_fields_optional() {
        let req: EditUserRequest = serde_json::from_str("{}").unwrap();
        assert!(req.email.is_none());
        assert!(req.first_name.is_none());
        assert!(req.last_name.is_none());
    }

    #[test]
    fn partial_body_deserializes() {
        let req: EditUserRequest = serde_json::from_str(r#"{"first_name":"Ada"}"#).unwrap();
        assert_eq!(req.first_name.as_deref(), Some("Ada"));
        assert!(req.email.is_none());
    }
}
