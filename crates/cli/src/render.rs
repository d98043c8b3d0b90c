//! Plain-text rendering of a generator page.

use gengtu_client::GeneratorPage;

pub fn page(page: &GeneratorPage) {
    let state = page.state();

    println!("Credits: {}", page.credits_label());
    if let Some(error) = &state.error {
        println!("Error: {error}");
    }
    if let (Some(result), Some((content_type, len))) = (&state.current, page.current_artifact_info()) {
        println!(
            "Result: {} ({content_type}, {len} bytes, {})",
            result.handle,
            result.created_at.format("%Y-%m-%d %H:%M:%S")
        );
    }

    match page.history_view() {
        Err(empty) => println!("{empty}"),
        Ok(entries) => {
            println!("History:");
            for entry in entries {
                println!("  #{:<6} {}  {}", entry.id, entry.caption, page.history_image_url(&entry));
            }
        }
    }
}
