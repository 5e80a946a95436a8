pub const DEFAULT_ROLE: &str = "Employee";

pub mod messages {

    pub const ALL_FIELDS_REQUIRED: &str = "All fields are required";

    pub const VALID_EMAIL_REQUIRED: &str = "Valid email required";

    pub const NO_USERS_FOUND: &str = "No users found";

    pub const NO_NOTES_FOUND: &str = "No notes found";

    pub const DUPLICATE_USERNAME: &str = "Duplicate username";

    pub const DUPLICATE_NOTE_TITLE: &str = "Duplicate note title";

    pub const USER_NOT_FOUND: &str = "User not found";

    pub const NOTE_NOT_FOUND: &str = "Note not found";

    pub const USER_ID_REQUIRED: &str = "User ID Required";

    pub const NOTE_ID_REQUIRED: &str = "Note ID required";

    pub const USER_HAS_NOTES: &str = "User has assigned notes";

    pub const INVALID_USER_DATA: &str = "Invalid user data received";

    pub const INVALID_NOTE_DATA: &str = "Invalid note data received";

    pub const UNAUTHORIZED: &str = "Unauthorized";

    pub const NOT_ALLOWED_BY_CORS: &str = "Not allowed by CORS";

    pub const TOO_MANY_LOGIN_ATTEMPTS: &str =
        "Too many login attempts from this IP, please try again after 60 second pause";
}

pub mod logs {

    pub const ERROR_LOG: &str = "errLog.log";

    pub const REQUEST_LOG: &str = "reqLog.log";
}

pub mod intervals {
    use std::time::Duration;

    pub const LIMITER_JANITOR: Duration = Duration::from_secs(60);
}
