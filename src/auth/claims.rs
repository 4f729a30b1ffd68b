use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims expected on tokens minted by the auth service.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: Uuid,   // authenticated subject (client or trainer ID)
    pub exp: usize,  // expiration time
    pub iat: usize,  // issued at
    pub iss: String, // issuer
    pub aud: String, // audience
}
