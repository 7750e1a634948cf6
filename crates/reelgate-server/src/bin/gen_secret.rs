//! Print a fresh signing secret in `.env` form.

use rand_core::{OsRng, RngCore};

const SECRET_BYTES: usize = 64;

fn main() {
    let mut secret = [0u8; SECRET_BYTES];
    OsRng.fill_bytes(&mut secret);
    let secret = hex::encode(secret);

    println!("Generated JWT secret:");
    println!("{}", secret);
    println!();
    println!("Add this to your .env file:");
    println!("REELGATE_JWT_SECRET={}", secret);
}
