//! Short texts restricted to a learner's vocabulary.
//!
//! [`generate_blurb`] is the deterministic template. [`compose_blurb`]
//! optionally asks a [`TextGenerator`] first and keeps its answer only when
//! every word is on the whitelist.

use serde::{Deserialize, Serialize};

use crate::traits::{BlurbRequest, TextGenerator};
use crate::vocabulary::extract_vocabulary;

/// New words first, then known words; first occurrence wins.
pub fn allowed_words<'a, N, K>(l_plus_one_words: N, known_words: K) -> Vec<String>
where
    N: IntoIterator<Item = &'a str>,
    K: IntoIterator<Item = &'a str>,
{
    let mut allowed: Vec<String> = Vec::new();
    for word in l_plus_one_words.into_iter().chain(known_words) {
        if !allowed.iter().any(|w| w == word) {
            allowed.push(word.to_string());
        }
    }
    allowed
}

/// `length` words cycling through the whitelist. Empty when `length` is 0
/// or there are no words.
pub fn generate_blurb(known_words: &[String], l_plus_one_words: &[String], length: usize) -> String {
    let allowed = allowed_words(
        l_plus_one_words.iter().map(String::as_str),
        known_words.iter().map(String::as_str),
    );
    if length == 0 || allowed.is_empty() {
        return String::new();
    }
    allowed
        .iter()
        .cycle()
        .take(length)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether every word of `text` (case-insensitive) is in `allowed`.
pub fn fits_whitelist(text: &str, allowed: &[String]) -> bool {
    let allowed: Vec<String> = allowed.iter().map(|w| w.to_lowercase()).collect();
    let used = extract_vocabulary(text);
    !used.is_empty() && used.iter().all(|w| allowed.contains(w))
}

/// Where a composed blurb came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BlurbSource {
    Generated { backend: String },
    Template,
}

/// A blurb plus its origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blurb {
    pub text: String,
    pub source: BlurbSource,
}

/// Ask `generator` (if any) for a blurb, falling back to the template when
/// it fails or strays off the whitelist.
pub async fn compose_blurb(generator: Option<&dyn TextGenerator>, request: &BlurbRequest) -> Blurb {
    let template = || Blurb {
        text: generate_blurb(&request.known_words, &request.new_words, request.length),
        source: BlurbSource::Template,
    };

    let Some(generator) = generator else {
        return template();
    };
    if request.length == 0 {
        return template();
    }

    let allowed = allowed_words(
        request.new_words.iter().map(String::as_str),
        request.known_words.iter().map(String::as_str),
    );

    match generator.generate(request).await {
        Ok(generated) if fits_whitelist(&generated.text, &allowed) => Blurb {
            text: generated.text,
            source: BlurbSource::Generated {
                backend: generator.name().to_string(),
            },
        },
        Ok(generated) => {
            tracing::warn!(
                backend = generator.name(),
                text = %generated.text,
                "generated blurb used words outside the whitelist, using template"
            );
            template()
        }
        Err(e) => {
            tracing::warn!(backend = generator.name(), "blurb generation failed, using template: {e:#}");
            template()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::GeneratedText;
    use async_trait::async_trait;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    struct Fixed(anyhow::Result<String>);

    #[async_trait]
    impl TextGenerator for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn generate(&self, _request: &BlurbRequest) -> anyhow::Result<GeneratedText> {
            match &self.0 {
                Ok(text) => Ok(GeneratedText {
                    text: text.clone(),
                    model: "fixed".into(),
                    latency_ms: 0,
                }),
                Err(e) => Err(anyhow::anyhow!("{e}")),
            }
        }
    }

    fn request() -> BlurbRequest {
        BlurbRequest {
            known_words: words(&["the", "cat"]),
            new_words: words(&["sleeps"]),
            length: 5,
        }
    }

    #[test]
    fn template_cycles_new_words_first() {
        let blurb = generate_blurb(&words(&["a", "b"]), &words(&["new", "a"]), 5);
        assert_eq!(blurb, "new a b new a");
    }

    #[test]
    fn template_empty_cases() {
        assert_eq!(generate_blurb(&words(&["a"]), &[], 0), "");
        assert_eq!(generate_blurb(&[], &[], 4), "");
    }

    #[test]
    fn whitelist_check() {
        let allowed = words(&["the", "cat", "sleeps"]);
        assert!(fits_whitelist("The cat sleeps.", &allowed));
        assert!(!fits_whitelist("the dog sleeps", &allowed));
        assert!(!fits_whitelist("   ", &allowed));
    }

    #[tokio::test]
    async fn no_generator_uses_template() {
        let blurb = compose_blurb(None, &request()).await;
        assert_eq!(blurb.source, BlurbSource::Template);
        assert_eq!(blurb.text, "sleeps the cat sleeps the");
    }

    #[tokio::test]
    async fn accepts_generated_text_on_whitelist() {
        let generator = Fixed(Ok("the cat sleeps".into()));
        let blurb = compose_blurb(Some(&generator), &request()).await;
        assert_eq!(blurb.text, "the cat sleeps");
        assert_eq!(
            blurb.source,
            BlurbSource::Generated {
                backend: "fixed".into()
            }
        );
    }

    #[tokio::test]
    async fn falls_back_when_off_whitelist_or_failing() {
        let off = Fixed(Ok("the dog barks".into()));
        let blurb = compose_blurb(Some(&off), &request()).await;
        assert_eq!(blurb.source, BlurbSource::Template);

        let failing = Fixed(Err(anyhow::anyhow!("network down")));
        let blurb = compose_blurb(Some(&failing), &request()).await;
        assert_eq!(blurb.source, BlurbSource::Template);
        assert_eq!(blurb.text, "sleeps the cat sleeps the");
    }
}
