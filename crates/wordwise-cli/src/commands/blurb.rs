//! The `wordwise blurb` command.

use anyhow::Result;

use wordwise_core::blurb::{compose_blurb, BlurbSource};
use wordwise_core::traits::BlurbRequest;
use wordwise_providers::create_generator;

use super::Session;

pub async fn execute(
    session: &Session,
    known: Vec<String>,
    new_words: Vec<String>,
    length: Option<usize>,
    offline: bool,
) -> Result<()> {
    let request = BlurbRequest {
        known_words: known,
        new_words,
        length: length.unwrap_or(session.config.blurb_length),
    };

    let generator = if offline {
        None
    } else {
        Some(create_generator(session.config.generator.as_ref())?)
    };

    let blurb = compose_blurb(generator.as_deref(), &request).await;
    if let BlurbSource::Generated { backend } = &blurb.source {
        tracing::debug!(backend = %backend, "blurb from generator");
    }
    println!("{}", blurb.text);
    Ok(())
}
