pub mod app;
pub mod components;
pub mod dialog;
pub mod events;
pub mod handlers;
pub mod hit_map;
pub mod theme;
pub mod ui;

pub use app::{App, Connector, Focus};
pub use events::{AppEvent, Event, EventHandler};

use taskboard_client::AuthSession;
use taskboard_core::AppConfig;
use taskboard_domain::Route;

/// Take over the terminal and run until the user quits.
pub async fn run(
    config: AppConfig,
    session: AuthSession,
    connector: Connector,
    route: Route,
) -> anyhow::Result<()> {
    let events = EventHandler::new();
    let app = App::new(config, session, connector, route, events.sender())?;
    app.run(events).await
}
