use dotenv::dotenv;

/// Loads a `.env` file into the process environment when one is present.
pub fn init() {
    if let Err(e) = dotenv() {
        if !e.not_found() {
            eprintln!("failed to load .env file: {e}");
        }
    }
}
