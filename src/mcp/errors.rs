pub const INVALID_INPUT: &str = "invalid_input";
pub const API_ERROR: &str = "api_error";
pub const GENERATION_FAILED: &str = "generation_failed";
pub const INTERNAL_ERROR: &str = "internal_error";
