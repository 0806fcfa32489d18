use tracing::error;

use crate::giphy::ImageSearch;
use crate::platform::Reply;

/// Search for the joined arguments and reply with the top result's URL.
pub async fn run(images: &dyn ImageSearch, args: &[String]) -> Reply {
    let query = args.join(" ");

    match images.search(&query, 1).await {
        Ok(urls) => match urls.into_iter().next() {
            Some(url) => Reply::Text(url),
            None => Reply::text(format!("No results found for '{}'.", query)),
        },
        Err(e) => {
            error!("Gif search for '{}' failed: {:#}", query, e);
            Reply::unavailable("gif search")
        }
    }
}
