use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use error_stack::{Report, ResultExt};
use farmhand_rpc::functions::{FarmId, GetFarms};
use farmhand_rpc::{
    BatchOptions, ClientConfig, Error, FileTokenStore, Result, RpcClient, Session, UserInfo,
    run_batched,
};
use serde_json::{Value, json};
use tracing::info;

use crate::args::{Cli, Command};

/// Everything a command needs
pub struct Context {
    pub client:  RpcClient,
    pub session: Session,
}

impl Context {
    /// Resolve configuration layers and open the token store
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut config = ClientConfig::load(cli.config.as_deref())?;
        if let Some(url) = &cli.proxy_url {
            config.proxy_url.clone_from(url);
        }
        if let Some(dir) = &cli.store_dir {
            config.store_dir = Some(dir.clone());
        }
        config.validate()?;

        let store = FileTokenStore::new(&config.store_dir()?);
        info!("Token store: {}", store.path().display());

        let mut session = Session::new().with_store(Arc::new(store));
        if let Some(token) = &cli.token {
            session = session.with_token(token.clone());
        }

        Ok(Self {
            client: RpcClient::new(&config)?,
            session,
        })
    }
}

fn parse_json(what: &str, text: &str) -> Result<Value> {
    serde_json::from_str(text)
        .map_err(|e| Error::invalid(what, e))
        .attach(format!("Input: {}", text.chars().take(200).collect::<String>()))
}

fn print_json(value: &Value) -> Result<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| Error::InvalidResponse(format!("Cannot render response: {e}")))?;
    println!("{text}");
    Ok(())
}

/// Run one subcommand
pub async fn run(command: Command, mut ctx: Context) -> Result<()> {
    match command {
        Command::Login {
            new_token,
            user_info,
        } => {
            let user = user_info
                .map(|raw| {
                    serde_json::from_str::<UserInfo>(&raw).map_err(|e| Error::invalid("user info", e))
                })
                .transpose()?;
            ctx.session.login(&new_token, user.as_ref())?;
            println!("Logged in");
        },
        Command::Logout => {
            ctx.session.logout()?;
            println!("Logged out");
        },
        Command::Whoami => {
            let user = ctx.session.user_info()?;
            let farm = ctx.session.selected_farm()?;
            print_json(&json!({
                "user": user.as_ref().map(|u| u.display_name()),
                "user_info": user,
                "selected_farm": farm,
            }))?;
        },
        Command::SelectFarm { farm_id } => {
            ctx.session.select_farm(FarmId::from(farm_id))?;
            println!("Farm selected");
        },
        Command::Call {
            function,
            params,
            unwrap,
        } => {
            let params = parse_json("params", &params)?;
            let value = if unwrap {
                ctx.client.call_unwrapped(&ctx.session, &function, params).await?
            } else {
                ctx.client.call(&ctx.session, &function, params).await?
            };
            print_json(&value)?;
        },
        Command::Farms => {
            let farms = ctx.client.invoke(&ctx.session, &GetFarms::default()).await?;
            for farm in farms {
                println!("{}\t{}", farm.id, farm.name.as_deref().unwrap_or("-"));
            }
        },
        Command::Batch {
            function,
            params_file,
            batch_size,
            delay_ms,
        } => {
            let options = BatchOptions {
                size:  batch_size,
                delay: Duration::from_millis(delay_ms),
            };
            run_batch(&ctx, &function, &params_file, options).await?;
        },
    }
    Ok(())
}

/// Read the parameter list and fan it out
async fn run_batch(
    ctx: &Context,
    function: &str,
    params_file: &Path,
    options: BatchOptions,
) -> Result<()> {
    let text = std::fs::read_to_string(params_file)
        .map_err(|e| Error::invalid("params file", e))
        .attach(format!("Path: {}", params_file.display()))?;
    let items = match parse_json("params file", &text)? {
        Value::Array(items) => items,
        other => {
            return Err(Report::new(Error::invalid(
                "params file",
                format!("expected a JSON array, got {}", json_kind(&other)),
            )));
        },
    };

    let client = &ctx.client;
    let session = &ctx.session;
    let results = run_batched(items, options, move |params| {
        client.call(session, function, params)
    })
    .await;

    let summary: Vec<Value> = results
        .into_iter()
        .enumerate()
        .map(|(index, result)| match result {
            Ok(value) => json!({"index": index, "ok": value}),
            Err(report) => json!({"index": index, "error": report.current_context().message()}),
        })
        .collect();
    print_json(&Value::Array(summary))
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_parse_json_reports_invalid_input() {
        let err = parse_json("params", "{oops").unwrap_err();
        assert!(matches!(err.current_context(), Error::InvalidArgument(_)));
        assert_eq!(parse_json("params", r#"{"a":1}"#).unwrap(), json!({"a": 1}));
    }

    #[tokio::test]
    async fn test_batch_rejects_non_array_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");
        std::fs::write(&path, r#"{"p_name":"Ana"}"#).unwrap();

        let ctx = Context {
            client:  RpcClient::new(&ClientConfig::default()).unwrap(),
            session: Session::new(),
        };
        let err = run_batch(&ctx, "create_worker_simple", &path, BatchOptions::default())
            .await
            .unwrap_err();
        assert!(err.current_context().message().contains("an object"));
    }

    #[test]
    fn test_proxy_url_flag_replaces_invalid_configured_url() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("farmhand.toml");
        std::fs::write(&config_path, "proxy_url = \"not a url\"\n").unwrap();
        let config = config_path.to_str().unwrap();
        let store = dir.path().to_str().unwrap();

        let cli = Cli::try_parse_from([
            "farmhand",
            "--config",
            config,
            "--store-dir",
            store,
            "--proxy-url",
            "http://localhost:9/proxy",
            "farms",
        ])
        .unwrap();
        let ctx = Context::from_cli(&cli).unwrap();
        assert_eq!(ctx.client.proxy_url().as_str(), "http://localhost:9/proxy");

        let cli =
            Cli::try_parse_from(["farmhand", "--config", config, "--store-dir", store, "farms"])
                .unwrap();
        let err = Context::from_cli(&cli).err().unwrap();
        assert!(matches!(err.current_context(), Error::Configuration(_)));
    }

    #[tokio::test]
    async fn test_login_then_whoami_through_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileTokenStore::new(dir.path()));
        let ctx = Context {
            client:  RpcClient::new(&ClientConfig::default()).unwrap(),
            session: Session::new().with_store(store.clone()),
        };

        run(
            Command::Login {
                new_token: "abc".to_string(),
                user_info: Some(r#"{"id":"u1","email":"ana@example.com"}"#.to_string()),
            },
            ctx,
        )
        .await
        .unwrap();

        let session = Session::new().with_store(store);
        assert_eq!(session.resolve_token().unwrap(), "abc");
        assert_eq!(session.user_info().unwrap().unwrap().id, "u1");
    }
}
