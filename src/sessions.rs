use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

/// Header carrying the opaque session token issued by the host environment.
pub const SESSION_TOKEN_HEADER: &str = "x-session-token";
/// Header carrying the authenticated customer id, when a customer is logged
/// in. Populated by the identity subsystem in front of this service.
pub const CUSTOMER_ID_HEADER: &str = "x-customer-id";

const ANONYMOUS_TOKEN: &str = "anonymous";

/// Cart identity. Authenticated carts are keyed by customer id, anonymous
/// carts by the opaque session token; carts are never merged across keys.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CartKey {
    Customer(Uuid),
    Anonymous(String),
}

/// The identity attached to one request: who is shopping, and whether they
/// are authenticated. This is the consumed interface of the identity
/// subsystem; token verification happens upstream.
#[derive(Clone, Debug)]
pub struct SessionIdentity {
    pub session_token: String,
    pub customer_id: Option<Uuid>,
}

impl SessionIdentity {
    pub fn anonymous(token: impl Into<String>) -> Self {
        Self {
            session_token: token.into(),
            customer_id: None,
        }
    }

    pub fn authenticated(token: impl Into<String>, customer_id: Uuid) -> Self {
        Self {
            session_token: token.into(),
            customer_id: Some(customer_id),
        }
    }

    pub fn cart_key(&self) -> CartKey {
        match self.customer_id {
            Some(id) => CartKey::Customer(id),
            None => CartKey::Anonymous(self.session_token.clone()),
        }
    }
}

impl<S> FromRequestParts<S> for SessionIdentity
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session_token = parts
            .headers
            .get(SESSION_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or(ANONYMOUS_TOKEN)
            .to_string();

        let customer_id = parts
            .headers
            .get(CUSTOMER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| Uuid::parse_str(value).ok());

        Ok(Self {
            session_token,
            customer_id,
        })
    }
}
