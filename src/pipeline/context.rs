use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::captions::{AssCaptionBurner, CaptionBurner, Transcriber, TranscriptionBackends};
use crate::collab::{
    ImageGenerator, OpenAiClient, RetryPolicy, ScriptWriter, SpeechSynthesizer, StyleBible,
};
use crate::foundation::error::ReelResult;
use crate::settings::Settings;

/// Collaborators used only by [`crate::pipeline::generate_job`].
pub struct Generators {
    pub script_writer: Box<dyn ScriptWriter>,
    pub images: Box<dyn ImageGenerator>,
    pub speech: Box<dyn SpeechSynthesizer>,
}

impl Generators {
    /// Use one client for all three roles.
    pub fn from_client<C>(client: C) -> Self
    where
        C: ScriptWriter + ImageGenerator + SpeechSynthesizer + Clone + 'static,
    {
        Self {
            script_writer: Box::new(client.clone()),
            images: Box::new(client.clone()),
            speech: Box::new(client),
        }
    }
}

/// Everything a job needs besides its directory. Built once per process and passed explicitly.
pub struct JobContext {
    pub settings: Settings,
    pub generators: Option<Generators>,
    pub transcriber: Box<dyn Transcriber>,
    pub caption_burner: Box<dyn CaptionBurner>,
    pub styles: StyleBible,
    pub rng: StdRng,
    pub retry: RetryPolicy,
}

impl JobContext {
    /// Validate `settings` and wire the given caption collaborators.
    ///
    /// Generators start unset, styles come from `image.style_bible` (or the built-in set) and the
    /// style RNG is seeded from OS entropy.
    pub fn new(
        settings: Settings,
        transcriber: Box<dyn Transcriber>,
        caption_burner: Box<dyn CaptionBurner>,
    ) -> ReelResult<Self> {
        settings.validate()?;
        let retry = RetryPolicy::new(
            settings.tts.max_attempts,
            Duration::from_millis(settings.tts.backoff_millis),
        )?;
        let styles = StyleBible::load_or_builtin(settings.image.style_bible.as_deref())?;
        Ok(Self {
            settings,
            generators: None,
            transcriber,
            caption_burner,
            styles,
            rng: StdRng::from_entropy(),
            retry,
        })
    }

    /// Default wiring: local/API transcription fallback, ASS caption burner, and the HTTP client
    /// as generator when an API key is available.
    pub fn from_settings(settings: Settings) -> ReelResult<Self> {
        let transcriber = Box::new(TranscriptionBackends::from_settings(
            &settings.transcription,
            &settings.api,
        ));
        let burner = Box::new(AssCaptionBurner::new(
            settings.video.canvas(),
            settings.video.encoder(),
        ));
        let generators = match OpenAiClient::from_settings(&settings) {
            Ok(client) => Some(Generators::from_client(client)),
            Err(e) => {
                tracing::debug!(error = %e, "generators unavailable");
                None
            }
        };
        let mut ctx = Self::new(settings, transcriber, burner)?;
        ctx.generators = generators;
        Ok(ctx)
    }

    pub fn with_generators(mut self, generators: Generators) -> Self {
        self.generators = Some(generators);
        self
    }

    /// Make art-style selection reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_styles(mut self, styles: StyleBible) -> Self {
        self.styles = styles;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}
