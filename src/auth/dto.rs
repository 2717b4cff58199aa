use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Request bodies deliberately skip `Debug` so passwords never reach a log line.
// Missing fields default to empty and are rejected by validation.

/// Request body for user registration.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub country: String,
    pub password: String,
}

/// Request body for login.
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for the forgot-password reset.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ForgotRequest {
    pub email: String,
    pub new_password: String,
}

/// Response returned after register or login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub msg: String,
    pub token: String,
    pub user_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_request_reads_camel_case() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"fullName":"Ada","email":"a@x.com","country":"UK","password":"pw"}"#,
        )
        .unwrap();
        assert_eq!(req.full_name, "Ada");
        assert_eq!(req.country, "UK");
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let req: ForgotRequest = serde_json::from_str(r#"{"email":"a@x.com"}"#).unwrap();
        assert_eq!(req.email, "a@x.com");
        assert!(req.new_password.is_empty());
    }

    #[test]
    fn auth_response_uses_user_id_key() {
        let id = Uuid::new_v4();
        let json = serde_json::to_value(AuthResponse {
            msg: "Login successful".into(),
            token: "t".into(),
            user_id: id,
        })
        .unwrap();
        assert_eq!(json["userId"], id.to_string());
        assert_eq!(json["msg"], "Login successful");
    }
}
