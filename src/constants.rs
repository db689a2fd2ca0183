// Fundamental configuration constants
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

// Request header carrying the bearer token, in both directions
pub const AUTH_HEADER: &str = "x-auth";

// Credential limits
pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 6;
pub const MAX_PASSWORD_LENGTH: usize = 1024;
pub const MAX_EMAIL_LENGTH: usize = 254;

// Anything longer than this cannot be a token we issued
pub const MAX_TOKEN_LENGTH: usize = 1000;

// Upper bound for JSON request bodies
pub const DEFAULT_MAX_BODY_BYTES: u64 = 16 * 1024;

// Minimum signing secret length
pub const MIN_SECRET_LENGTH: usize = 32;
