//! Simple HTTP GET request example.
//!
//! Fetches a page with query parameters and prints the body.

use simplehttp::{Params, RequestError, SimpleHttpRequest};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = SimpleHttpRequest::new();

    let params = Params::new().with("name", "simple http").with("page", 1);

    println!("Sending request to httpbin.org...");
    match client.get_with("https://httpbin.org/get", &params).await {
        Ok(body) => println!("{body}"),
        Err(RequestError::Http { status, message }) => {
            println!("Server refused: {status} {message}");
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
