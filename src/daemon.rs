//! Daemon module - main event loop
//!
//! Wires the hotkey listener to the trigger orchestrator and waits for
//! Ctrl+C or SIGTERM. Activations run as local tasks on the current thread,
//! so a trigger that arrives mid-sequence reaches the orchestrator and is
//! turned away by its busy flag.

use crate::config::Config;
use crate::desktop;
use crate::error::{QuillkeyError, Result};
use crate::hotkey::{self, HotkeyEvent};
use crate::rewrite::{RewriteClient, Rewriter};
use crate::trigger::TriggerOrchestrator;
use std::rc::Rc;
use std::sync::Arc;
use tokio::signal::unix::{signal, SignalKind};

/// Check that the rewrite service is up and has the configured model
///
/// Only ever warns; the daemon keeps running either way and rewrites fall
/// back to the original text until the service appears.
pub fn check_service(client: &RewriteClient) -> bool {
    match client.probe() {
        Ok(models) => {
            tracing::info!("Connected to Ollama. Available models: {:?}", models);
            if client.has_model(&models) {
                true
            } else {
                tracing::warn!(
                    "Model {} not found. Run: ollama pull {}",
                    client.model(),
                    client.model()
                );
                false
            }
        }
        Err(e) => {
            tracing::warn!("Could not connect to Ollama: {}", e);
            tracing::warn!("Make sure Ollama is running with: ollama serve");
            false
        }
    }
}

/// Main daemon that owns the configuration for one run
pub struct Daemon {
    config: Config,
}

impl Daemon {
    /// Create a new daemon with the given configuration
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    fn print_banner(&self) {
        let chords = self
            .config
            .hotkey
            .chords
            .iter()
            .map(|c| c.join("+"))
            .collect::<Vec<_>>()
            .join(" | ");

        println!("quillkey is running...");
        println!("Press {} to rewrite the focused text", chords);
        println!("Press Ctrl+C to exit\n");
    }

    /// Run the daemon main loop
    ///
    /// Must be called from within a `tokio::task::LocalSet`.
    pub async fn run(&mut self) -> Result<()> {
        tracing::info!("Starting quillkey daemon");

        let mut sigterm = signal(SignalKind::terminate()).map_err(|e| {
            QuillkeyError::Config(format!("Failed to set up SIGTERM handler: {}", e))
        })?;

        let client = RewriteClient::new(&self.config.rewrite)?;
        tracing::info!("Model: {}", client.model());

        // Diagnostics only
        let probe_client = client.clone();
        if let Err(e) = tokio::task::spawn_blocking(move || check_service(&probe_client)).await {
            tracing::warn!("Service check failed to run: {}", e);
        }

        let rewriter: Arc<dyn Rewriter> = Arc::new(client);
        let orchestrator = Rc::new(TriggerOrchestrator::new(
            desktop::create_clipboard()?,
            desktop::create_focus_inspector(),
            desktop::create_input_synthesizer(),
            rewriter,
            &self.config,
        )?);

        tracing::debug!("Excluded apps: {:?}", self.config.excluded_apps);

        let mut listener = hotkey::create_listener(&self.config.hotkey)?;
        let mut hotkey_rx = listener.start()?;

        self.print_banner();

        loop {
            tokio::select! {
                event = hotkey_rx.recv() => {
                    match event {
                        Some(HotkeyEvent::Triggered) => {
                            tracing::debug!("Hotkey chord detected");
                            let orchestrator = Rc::clone(&orchestrator);
                            tokio::task::spawn_local(async move {
                                orchestrator.activate().await;
                            });
                        }
                        None => {
                            tracing::error!("Hotkey listener stopped unexpectedly");
                            break;
                        }
                    }
                }

                // Handle graceful shutdown (SIGINT from Ctrl+C)
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Received SIGINT, shutting down...");
                    break;
                }

                // Handle graceful shutdown (SIGTERM from launchctl/systemctl stop)
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM, shutting down...");
                    break;
                }
            }
        }

        listener.stop()?;

        println!("\nquillkey stopped");
        tracing::info!("Daemon stopped");

        Ok(())
    }
}
