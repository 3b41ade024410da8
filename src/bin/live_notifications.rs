//! Live notifications listener
//!
//! Connects to the bolão event stream, routes events through the
//! notification router and prints every bell notification as JSON.

use anyhow::{Context, Result};
use bolao_live::bin_common::{load_config_from_env, BinaryRunner, ConfigType, RunConfig};
use bolao_live::bolao::{
    build_live_events_client, init_tracing, ChannelSink, CurrentUserProvider, Heartbeat,
    HttpPreferencesLoader, LiveConfig, LiveEventsClient, NotificationRouter, RouterConfig,
    SharedUser, ShutdownManager,
};
use bolao_live::hyperstream::ClientEvent;
use crossbeam_channel::Receiver;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

struct LiveNotificationsApp {
    run_config: RunConfig,
    config: LiveConfig,
    shutdown: ShutdownManager,
    delivered: u64,
}

impl LiveNotificationsApp {
    fn new(config: LiveConfig, shutdown: ShutdownManager) -> Self {
        Self {
            run_config: RunConfig::new("Bolão Live Notifications")
                .with_heartbeat(config.heartbeat_interval_secs),
            config,
            shutdown,
            delivered: 0,
        }
    }

    fn drain_notifications(&mut self, notifications: &Receiver<bolao_live::bolao::Notification>) {
        for notification in notifications.try_iter() {
            self.delivered += 1;
            match serde_json::to_string(&notification) {
                Ok(json) => println!("{}", json),
                Err(e) => warn!("Failed to serialise notification: {}", e),
            }
        }
    }

    fn drain_lifecycle(&self, client: &LiveEventsClient) {
        for event in client.drain_events() {
            match event {
                ClientEvent::RetriesExhausted(attempts) => {
                    error!(
                        "[Live Events] Gave up after {} reconnection attempts; restart to retry",
                        attempts
                    );
                }
                ClientEvent::Error(message) => warn!("[Live Events] {}", message),
                other => info!("[Live Events] {:?}", other),
            }
        }
    }
}

impl BinaryRunner for LiveNotificationsApp {
    async fn run(&mut self) -> Result<()> {
        let client = build_live_events_client(&self.config)
            .context("Failed to build live events client")?;
        let loader = HttpPreferencesLoader::from_config(&self.config)?;
        let user: Arc<dyn CurrentUserProvider> = Arc::new(SharedUser::new(self.config.user.clone()));
        let (sink, notifications) = ChannelSink::new();

        let router = NotificationRouter::spawn(
            &client,
            sink,
            loader,
            user,
            RouterConfig {
                dedup_window: self.config.dedup_window(),
            },
        );

        info!(
            "Connecting in {:?} to {}",
            self.config.initial_connect_delay(),
            self.config.events_url()
        );
        client.connect_delayed();

        let mut heartbeat = Heartbeat::new(self.run_config.heartbeat_interval_secs);

        while self.shutdown.is_running() {
            self.drain_notifications(&notifications);
            self.drain_lifecycle(&client);

            if heartbeat.should_beat() {
                let metrics = client.metrics();
                let stats = router.stats();
                info!(
                    "Heartbeat: {} | frames: {} | events: {} | notifications: {} | duplicates: {}",
                    metrics.connection_state,
                    metrics.frames_received,
                    metrics.events_dispatched,
                    stats.notifications_emitted,
                    stats.duplicates_suppressed
                );
                heartbeat.beat();
            }

            self.shutdown.interruptible_sleep(POLL_INTERVAL).await;
        }

        client.disconnect();
        drop(router);
        self.drain_notifications(&notifications);

        Ok(())
    }

    fn config(&self) -> &RunConfig {
        &self.run_config
    }

    fn summary(&self) -> Option<String> {
        Some(format!("Notifications delivered: {}", self.delivered))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Load config first (before logging is initialized)
    let config_path = load_config_from_env(ConfigType::LiveEvents);
    let config_found = config_path.exists();
    let config = if config_found {
        LiveConfig::load(&config_path)
            .with_context(|| format!("Failed to load {}", config_path.display()))?
    } else {
        LiveConfig::from_env().context("Invalid configuration from environment")?
    };

    init_tracing(&config.log_level);
    if !config_found {
        warn!(
            "Config file {} not found, using defaults and environment",
            config_path.display()
        );
    }
    config.log();

    let shutdown = ShutdownManager::new();
    shutdown.spawn_signal_handler();

    let mut app = LiveNotificationsApp::new(config, shutdown);
    app.execute().await
}
