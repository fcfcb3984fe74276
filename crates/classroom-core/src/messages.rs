//! Client-facing validation and conflict messages shared across modules.

pub const EMAIL_TAKEN: &str = "This email has already been used";
pub const NAME_TAKEN: &str = "This name has already been used";
pub const ID_MISMATCH: &str = "id in body does not match id in path";
