/// Administrator account. Created out of band (`mkadmin`); the gate only
/// ever reads it for verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admin {
    username: String,
}

impl Admin {
    pub fn new(username: String) -> Self {
        Self { username }
    }
    pub fn username(&self) -> &str {
        &self.username
    }
}

mod schema {
    use super::*;
    use ghl_pg::*;

    /// Schema implementation for Admin (admins table).
    /// Note: hashword is a database-only field, not part of the Admin
    /// domain type.
    impl Schema for Admin {
        fn name() -> &'static str {
            ADMINS
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                ADMINS,
                " (
                    username    TEXT PRIMARY KEY,
                    hashword    TEXT NOT NULL
                );"
            )
        }
        fn indices() -> &'static str {
            ""
        }
    }
}
