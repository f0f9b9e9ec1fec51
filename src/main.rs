//! Off-device demo run of the capture-and-log core.
//!
//! There is no camera UI here: a placeholder provider synthesizes a
//! solid-color JPEG the way the capture flow would receive a real one,
//! and the result travels the full path — ticket, asynchronous delivery,
//! post-condition check, catalog insert, thumbnail — before the timeline
//! is printed.

use chrono::Utc;
use crossbeam_channel::{unbounded, Sender};
use image::{ImageBuffer, Rgb};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use photo_timeline::media::thumbnail;
use photo_timeline::{
    Catalog, CaptureEvent, CaptureProvider, CaptureTicket, Coordinator, GrantAll, ProviderOutcome,
    ProviderPayload, StoragePaths,
};

/// Stand-in capture provider for machines without a camera.
///
/// Writes a 300x300 solid-color JPEG to the ticket's destination from a
/// worker thread and posts the outcome back, mimicking the asynchronous
/// delivery of a real platform camera.
struct PlaceholderCamera {
    results: Sender<(u64, ProviderOutcome)>,
}

impl CaptureProvider for PlaceholderCamera {
    fn begin_capture(&self, ticket: &CaptureTicket) -> Result<(), String> {
        let results = self.results.clone();
        let ticket = ticket.clone();
        thread::spawn(move || {
            let img = ImageBuffer::from_pixel(300, 300, Rgb::<u8>([73, 109, 137]));
            let outcome = match img.save(&ticket.output_path) {
                Ok(()) => {
                    ProviderOutcome::Captured(ProviderPayload::File(ticket.output_path.clone()))
                }
                Err(e) => ProviderOutcome::Failed(format!("could not write placeholder: {}", e)),
            };
            let _ = results.send((ticket.token, outcome));
        });
        Ok(())
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .init();

    let paths = StoragePaths::new();

    // If this fails even after corruption recovery, the storage location
    // itself is unusable and there is nothing sensible to run
    let catalog = Catalog::open_or_recover(&paths.db_path())
        .expect("Failed to initialize catalog. Check permissions and disk space.");

    let count = catalog.count().unwrap_or(0);
    println!("📷 Photo timeline ready with {} photo(s)", count);

    let catalog = Arc::new(Mutex::new(catalog));
    let (event_tx, event_rx) = unbounded();
    let (result_tx, result_rx) = unbounded();

    let coordinator = Coordinator::new(
        Box::new(PlaceholderCamera { results: result_tx }),
        Box::new(GrantAll),
        catalog.clone(),
        event_tx,
        paths.media_dir(),
    );

    coordinator.request_capture();

    // Forward the provider's asynchronous result into the coordinator,
    // standing in for the platform's activity-result binding
    if let Ok((token, outcome)) = result_rx.recv_timeout(Duration::from_secs(5)) {
        coordinator.resolve(token, outcome);
    }

    match event_rx.recv_timeout(Duration::from_secs(5)) {
        Ok(CaptureEvent::Saved(photo)) => {
            println!("✅ Logged photo #{} at {}", photo.id, photo.media_path);
            if let Some(thumb) =
                thumbnail::generate_thumbnail_async(PathBuf::from(&photo.media_path), photo.id)
                    .await
            {
                println!("📸 Thumbnail cached at {}", thumb.display());
            }
        }
        Ok(CaptureEvent::Cancelled) => println!("Capture cancelled, nothing logged"),
        Ok(CaptureEvent::Failed(failure)) => println!("❌ Capture failed: {}", failure),
        Err(_) => println!("❌ No capture result arrived"),
    }

    let now = Utc::now().timestamp();
    let photos = catalog
        .lock()
        .expect("catalog lock poisoned")
        .photos()
        .unwrap_or_default();

    println!("\nTimeline ({} photo(s), newest first):", photos.len());
    for photo in &photos {
        println!(
            "  #{:<4} {}  ({} min ago)  {}",
            photo.id,
            photo.timestamp_label(),
            photo.age_minutes(now),
            photo.media_path
        );
    }
}
