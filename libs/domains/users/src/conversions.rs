//! User-specific proto ↔ domain conversions

use chrono::{DateTime, Utc};
use domain_auth::{Identity, IssuedToken};
use grpc_client::conversions::{datetime_to_timestamp, parse_uuid, timestamp_to_datetime};
use rpc::taskhub::v1 as proto;
use tonic::Status;

use crate::models::{RegisterUser, UpdateUser, User, UserResponse};

impl From<User> for proto::User {
    fn from(user: User) -> Self {
        proto::User {
            id: user.id.to_string(),
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            created_at: datetime_to_timestamp(user.created_at),
            updated_at: datetime_to_timestamp(user.updated_at),
        }
    }
}

impl From<User> for proto::UserResponse {
    fn from(user: User) -> Self {
        proto::UserResponse {
            user: Some(user.into()),
        }
    }
}

impl TryFrom<proto::User> for UserResponse {
    type Error = Status;

    fn try_from(msg: proto::User) -> Result<Self, Self::Error> {
        Ok(UserResponse {
            id: parse_uuid("id", &msg.id)?,
            username: msg.username,
            email: msg.email,
            first_name: msg.first_name,
            last_name: msg.last_name,
            created_at: timestamp_to_datetime("created_at", msg.created_at)?,
            updated_at: timestamp_to_datetime("updated_at", msg.updated_at)?,
        })
    }
}

impl From<proto::RegisterRequest> for RegisterUser {
    fn from(req: proto::RegisterRequest) -> Self {
        RegisterUser {
            username: req.username,
            email: req.email,
            password: req.password,
            first_name: req.first_name,
            last_name: req.last_name,
        }
    }
}

impl From<proto::UpdateUserRequest> for UpdateUser {
    fn from(req: proto::UpdateUserRequest) -> Self {
        UpdateUser {
            email: req.email,
            first_name: req.first_name,
            last_name: req.last_name,
            password: req.password,
        }
    }
}

/// Login and refresh share this response.
pub fn token_response(identity: Identity, issued: IssuedToken) -> proto::TokenResponse {
    proto::TokenResponse {
        access_token: issued.token,
        expires_at: datetime_to_timestamp(issued.expires_at),
        user_id: identity.id.to_string(),
        username: identity.username,
    }
}

/// Client-side view of a `TokenResponse`.
pub fn expires_at(resp: &proto::TokenResponse) -> Result<DateTime<Utc>, Status> {
    timestamp_to_datetime("expires_at", resp.expires_at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_proto_user_has_no_password() {
        let user = User::new(
            "alice".into(),
            "alice@example.com".into(),
            "$argon2id$...".into(),
            Some("Alice".into()),
            None,
        );
        let msg = proto::User::from(user.clone());

        assert_eq!(msg.id, user.id.to_string());
        assert_eq!(msg.first_name.as_deref(), Some("Alice"));
        assert_eq!(msg.created_at, user.created_at.timestamp());

        let back = UserResponse::try_from(msg).unwrap();
        assert_eq!(back.id, user.id);
        assert_eq!(back.username, "alice");
    }

    #[test]
    fn test_token_response_fields() {
        let identity = Identity {
            id: Uuid::now_v7(),
            username: "bob".into(),
        };
        let expires = Utc::now();
        let resp = token_response(
            identity.clone(),
            IssuedToken {
                token: "abc".into(),
                expires_at: expires,
            },
        );

        assert_eq!(resp.user_id, identity.id.to_string());
        assert_eq!(resp.access_token, "abc");
        assert_eq!(expires_at(&resp).unwrap().timestamp(), expires.timestamp());
    }
}
