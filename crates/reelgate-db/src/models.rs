/// A row of the `users` table. `password` holds the PHC-encoded hash,
/// never the plaintext.
#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: String,
    pub username: String,
    pub password: String,
    pub created_at: String,
}
