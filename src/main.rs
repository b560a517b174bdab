use tokenkeeper::domain_model::*;
use tokenkeeper::logger::*;
use tokenkeeper::server::*;
use tokenkeeper::settings::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let logger = Logger::new_bootstrap()?;

    let project_settings = parse_settings(cli.settings.as_deref())?;
    debug!(?project_settings);
    let logger_config = LogConfig {
        filter: project_settings.log.filter.clone(),
    };
    logger.reload_from_config(&logger_config)?;

    let server = Server::try_new(&project_settings).await?;
    let service = server.session_service;

    let output = match cli.command {
        Command::Issue { id, name, role } => {
            let tokens = service.issue_pair(&Principal::new(id, name, role)).await;
            tokens.map(serde_json::to_value)
        }
        Command::Validate { token, kind } => {
            let claims = match kind {
                TokenKind::Access => service.validate_access(&token).await,
                TokenKind::Refresh => service.validate_refresh(&token).await,
                TokenKind::Any => service.validate_token(&token).await,
            };
            claims.map(serde_json::to_value)
        }
        Command::Refresh { token } => {
            service.refresh(&token).await.map(serde_json::to_value)
        }
        Command::Revoke { token } => service
            .revoke(&token)
            .await
            .map(|_| Ok(serde_json::json!({ "revoked": true }))),
        Command::Unrevoke { token } => service
            .remove_from_blacklist(&token)
            .await
            .map(|_| Ok(serde_json::json!({ "revoked": false }))),
        Command::Logout { token } => service
            .logout(&token)
            .await
            .map(|_| Ok(serde_json::json!({ "logged_out": true }))),
        Command::Session { id } => service
            .has_session(PrincipalId(id))
            .await
            .map(|active| Ok(serde_json::json!({ "principal_id": id, "active": active }))),
    };

    match output {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value?)?);
            Ok(())
        }
        Err(e) => {
            error!(status = e.http_status(), "{e}");
            Err(e.into())
        }
    }
}
