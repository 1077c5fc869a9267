//! Print an Argon2 hash for `auth.accounts[].password_hash`.

use wardgate_service::auth::password::hash_password;

fn main() {
    let Some(password) = std::env::args().nth(1) else {
        eprintln!("Usage: hash_password <password>");
        std::process::exit(2);
    };

    match hash_password(&password) {
        Ok(hash) => {
            println!("{hash}");
        }
        Err(err) => {
            eprintln!("Failed to hash password: {err}");
            std::process::exit(1);
        }
    }
}
