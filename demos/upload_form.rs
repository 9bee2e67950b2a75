//! Multipart upload example.
//!
//! Posts a text field and a file to httpbin.org, which echoes the form back.

use simplehttp::{Params, SimpleHttpRequest};
use std::io::Write;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A scratch file to upload
    let mut file = tempfile::Builder::new().suffix(".txt").tempfile()?;
    writeln!(file, "hello from simplehttp")?;

    let params = Params::new()
        .with("description", "a small text file")
        .with_file("attachment", file.path());

    let reply = SimpleHttpRequest::new()
        .post_with("https://httpbin.org/post", &params)
        .await?;
    println!("{reply}");

    Ok(())
}
