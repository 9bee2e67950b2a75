//! Download with progress example.
//!
//! Usage: `cargo run --example download_file -- <url> [dir]`

use simplehttp::SimpleHttpRequest;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let url = args
        .next()
        .unwrap_or_else(|| "https://httpbin.org/bytes/65536".to_string());
    let dir = args.next().map(PathBuf::from).unwrap_or(std::env::temp_dir());

    let client = SimpleHttpRequest::builder()
        .download_dir(&dir)
        .progress_step_size(16 * 1024)
        .build();

    let mut report = |downloaded: u64, total: i64| {
        if total > 0 {
            println!("{downloaded}/{total} bytes ({}%)", downloaded * 100 / total as u64);
        } else {
            println!("{downloaded} bytes");
        }
    };
    let file = client.download_with_progress(&url, &dir, &mut report).await?;

    println!("Saved {} ({} bytes)", file.path.display(), file.downloaded);
    Ok(())
}
