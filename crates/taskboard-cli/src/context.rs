use std::sync::Arc;

use taskboard_client::{resolve_role, AuthSession, FileStorage, Services};
use taskboard_core::{AppConfig, TaskboardError, TaskboardResult};
use taskboard_domain::{Board, BoardId, Role, User};
use taskboard_tui::Connector;

use crate::cli::ConnectionArgs;

/// Apply flag and environment overrides on top of the config file.
pub fn load_config(args: &ConnectionArgs) -> TaskboardResult<AppConfig> {
    let mut config = match &args.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load(),
    };
    if let Some(url) = &args.api_url {
        config.api_url = url.clone();
    }
    if let Some(url) = &args.auth_url {
        config.auth_url = url.clone();
    }
    if let Some(path) = &args.storage {
        config.storage_path = Some(path.clone());
    }
    Ok(config)
}

pub fn open_session(config: &AppConfig) -> TaskboardResult<AuthSession> {
    let storage = FileStorage::open(config.effective_storage_path())?;
    Ok(AuthSession::rehydrate(Box::new(storage)))
}

/// Remote services for whatever token the terminal UI currently holds.
pub fn remote_connector(config: AppConfig) -> Connector {
    Arc::new(move |token| Services::remote(&config, token))
}

/// Session and services for one CLI invocation.
pub struct CliContext {
    pub config: AppConfig,
    pub session: AuthSession,
    services: Services,
}

impl CliContext {
    pub fn load(args: &ConnectionArgs) -> TaskboardResult<Self> {
        let config = load_config(args)?;
        let session = open_session(&config)?;
        let services = Services::remote(&config, session.token())?;
        Ok(Self {
            config,
            session,
            services,
        })
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn require_user(&self) -> TaskboardResult<&User> {
        self.session.require_user()
    }

    /// Role used for permission checks: profile, then token claim, then USER.
    /// The resolved role replaces the stored one.
    pub async fn role(&mut self) -> TaskboardResult<Role> {
        self.require_user()?;
        let role = resolve_role(&self.services, self.session.token()).await;
        if self.session.role() != Some(role) {
            self.session.set_role(role)?;
        }
        Ok(role)
    }

    pub fn sign_in(&mut self, user: User) -> TaskboardResult<()> {
        self.session.login(user)?;
        self.services = Services::remote(&self.config, self.session.token())?;
        Ok(())
    }

    pub fn sign_out(&mut self) -> TaskboardResult<()> {
        self.session.logout()?;
        self.services = Services::remote(&self.config, None)?;
        Ok(())
    }

    pub async fn board(&self, id: BoardId) -> TaskboardResult<Board> {
        self.services
            .boards
            .list_boards()
            .await?
            .into_iter()
            .find(|board| board.id == id)
            .ok_or_else(|| TaskboardError::NotFound(format!("Board {id}")))
    }
}
