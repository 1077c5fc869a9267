/// Storage keys used by the session store
pub const IDENTITY_STORAGE_KEY: &str = "user";
pub const TOKEN_STORAGE_KEY: &str = "token";

/// Destination paths shared across crates
pub const ROOT_PATH: &str = "/";

pub const LOGIN_ROUTE_COMPONENT: &str = "login";
pub const LOGIN_PATH: &str = const_str::concat!("/", LOGIN_ROUTE_COMPONENT);

pub const UNAUTHORIZED_ROUTE_COMPONENT: &str = "unauthorized";
pub const UNAUTHORIZED_PATH: &str = const_str::concat!("/", UNAUTHORIZED_ROUTE_COMPONENT);

pub const DASHBOARD_ROUTE_COMPONENT: &str = "dashboard";
pub const DASHBOARD_PATH: &str = const_str::concat!("/", DASHBOARD_ROUTE_COMPONENT);

pub const PATIENT_RECORDS_ROUTE_COMPONENT: &str = "patient-records";
pub const PATIENT_RECORDS_PATH: &str = const_str::concat!("/", PATIENT_RECORDS_ROUTE_COMPONENT);

pub const BILLING_ROUTE_COMPONENT: &str = "billing";
pub const BILLING_PATH: &str = const_str::concat!("/", BILLING_ROUTE_COMPONENT);

pub const INSURANCE_CLAIMS_ROUTE_COMPONENT: &str = "insurance-claims";
pub const INSURANCE_CLAIMS_PATH: &str =
    const_str::concat!("/", INSURANCE_CLAIMS_ROUTE_COMPONENT);

pub const API_ROUTE_COMPONENT: &str = "api";

/// Cookie carrying the session token
pub const SESSION_COOKIE_NAME: &str = "wardgate_session";

/// Query parameter carrying the return-to continuation on login redirects
pub const RETURN_TO_PARAM: &str = "return_to";

/// Minimum password length accepted when provisioning accounts
pub const MIN_PASSWORD_LENGTH: usize = 6;
